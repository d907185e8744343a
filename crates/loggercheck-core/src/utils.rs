//! Utility functions shared by the verification stages.

pub mod text;

#[doc(inline)]
pub use text::{ellipsize, unquote};
