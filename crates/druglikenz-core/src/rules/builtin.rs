use crate::error::DruglikenzError;
use crate::rules::parse_ruleset;
use crate::rules::schema::RuleDefinition;

const LIPINSKI_JSON: &str = include_str!("../../../../rules/lipinski.json");
const RO3_JSON: &str = include_str!("../../../../rules/ro3.json");
const MUEGGE_JSON: &str = include_str!("../../../../rules/muegge.json");
const VEBER_JSON: &str = include_str!("../../../../rules/veber.json");

/// Keys of the built-in rule sets, in menu order.
pub const PRESETS: &[&str] = &["lipinski", "ro3", "muegge", "veber"];

/// Load a built-in rule set by key.
pub fn load_preset(key: &str) -> Result<RuleDefinition, DruglikenzError> {
    let (json, source) = match key {
        "lipinski" => (LIPINSKI_JSON, "rules/lipinski.json"),
        "ro3" => (RO3_JSON, "rules/ro3.json"),
        "muegge" => (MUEGGE_JSON, "rules/muegge.json"),
        "veber" => (VEBER_JSON, "rules/veber.json"),
        _ => return Err(invalid_selection(key)),
    };
    parse_ruleset(json, source)
}

fn invalid_selection(name: &str) -> DruglikenzError {
    DruglikenzError::InvalidRuleSelection {
        name: name.to_string(),
        available: PRESETS.join(", "),
    }
}

/// The fixed, read-only mapping from rule name to definition.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    rules: Vec<RuleDefinition>,
}

impl RuleCatalog {
    /// Parse and validate all built-in rule sets.
    pub fn builtin() -> Result<RuleCatalog, DruglikenzError> {
        let rules = PRESETS
            .iter()
            .map(|key| load_preset(key))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RuleCatalog { rules })
    }

    /// Look up a rule by key or display name, ignoring case.
    pub fn get(&self, name: &str) -> Result<&RuleDefinition, DruglikenzError> {
        let wanted = name.trim();
        self.rules
            .iter()
            .find(|r| r.key.eq_ignore_ascii_case(wanted) || r.name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| invalid_selection(wanted))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuleDefinition> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
