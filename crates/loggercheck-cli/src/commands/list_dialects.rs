//! List dialects command implementation.

use loggercheck_rules::builtin_rulesets;

/// Runs the list-dialects command.
pub fn run() {
    println!("Built-in dialects:\n");
    println!("{:<10} {:<28} Package", "Name", "Dialect");
    println!("{}", "-".repeat(80));

    let mut rulesets: Vec<_> = builtin_rulesets().iter().collect();
    rulesets.sort_by(|a, b| a.name().cmp(b.name()));

    for ruleset in rulesets {
        println!(
            "{:<10} {:<28} {}",
            ruleset.name(),
            ruleset.dialect().label(),
            ruleset.package_import()
        );
        for rule in ruleset.rules() {
            println!("{:<10} {:<28}   {}", "", "", rule.display(ruleset.package_import()));
        }
    }

    println!("\nCustom rules are grouped under the \"custom\" dialect.");
    println!("\nUse --disable to skip dialects, e.g.:");
    println!("  loggercheck check --disable klog,zap dumps/");
}
