use druglikenz_core::error::DruglikenzError;
use druglikenz_core::rules::builtin::RuleCatalog;
use druglikenz_core::rules::load_ruleset;
use druglikenz_core::rules::schema::RuleDefinition;
use std::path::Path;

pub fn list() -> Result<(), DruglikenzError> {
    let catalog = RuleCatalog::builtin()?;
    println!("Available rule sets:\n");
    for rule in catalog.iter() {
        println!("  {:<10} {}", rule.key, rule.name);
        if let Some(ref desc) = rule.description {
            println!("             {}", desc);
        }
        println!("             {}", rule.policy);
        println!();
    }
    Ok(())
}

pub fn explain(name: &str) -> Result<(), DruglikenzError> {
    let catalog = RuleCatalog::builtin()?;
    let rule = catalog.get(name)?;
    print_rule(rule);
    Ok(())
}

fn print_rule(rule: &RuleDefinition) {
    println!("{} ({})\n", rule.name, rule.key);

    if let Some(ref desc) = rule.description {
        println!("{}\n", desc);
    }

    println!("Criteria:\n");
    let width = rule
        .predicates
        .iter()
        .map(|p| p.parameter.label().len())
        .max()
        .unwrap_or(4);
    for (i, predicate) in rule.predicates.iter().enumerate() {
        println!(
            "  {:>2}. {:<width$}  {}",
            i + 1,
            predicate.parameter.label(),
            predicate
        );
    }

    println!("\nA compound is {}.", rule.policy);
    println!("Bounds written <= or >= include the boundary value; < and > do not.");

    if let Some(ref reference) = rule.reference {
        println!("\nReference: {}", reference);
    }
    println!();
}

pub fn validate(file: &Path) -> Result<(), DruglikenzError> {
    let rule = load_ruleset(file)?;

    println!("Rule set '{}' ({}) is valid.", rule.name, rule.key);
    println!("  Criteria: {}", rule.column_labels().join(", "));
    println!("  Policy: {}", rule.policy);

    let catalog = RuleCatalog::builtin()?;
    if catalog.get(&rule.key).is_ok() {
        println!("\nWarning: key '{}' shadows a built-in rule set.", rule.key);
    }
    Ok(())
}
