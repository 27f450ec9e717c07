use std::collections::HashMap;

/// Immutable rule-name → required-claim table.
///
/// Built once at engine construction from configuration; lookups are
/// case-insensitive and total (empty or unknown names resolve to `None`,
/// never an error).
#[derive(Clone, Debug, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, String>,
}

impl RuleRegistry {
    /// Builds a registry from a rule map as it appears in configuration.
    /// Keys are folded to lowercase so lookups ignore case.
    pub fn from_map(rules: &HashMap<String, String>) -> Self {
        let rules = rules
            .iter()
            .map(|(name, claim)| (name.trim().to_lowercase(), claim.trim().to_string()))
            .collect();
        Self { rules }
    }

    /// Resolves a rule name to its required claim.
    pub fn resolve(&self, rule_name: &str) -> Option<&str> {
        let key = rule_name.trim().to_lowercase();
        if key.is_empty() {
            return None;
        }
        self.rules.get(&key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}
