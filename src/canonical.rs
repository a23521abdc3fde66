// 🏷️ Name Canonicalizer - rewrite price-site CPU names into benchmark-site names
//
// Rules are data: an ordered list of (pattern, replacement) pairs.
// Order matters, later rules assume the clock/socket boilerplate is gone.

use lazy_static::lazy_static;
use regex::Regex;

// ============================================================================
// RULE DEFINITION
// ============================================================================

#[derive(Debug, Clone)]
pub struct SubstitutionRule {
    /// Rule ID for tracing which rewrite fired
    pub id: &'static str,
    pub pattern: Regex,
    /// Replacement text, may reference capture groups ("${1}")
    pub replacement: &'static str,
}

impl SubstitutionRule {
    fn new(id: &'static str, pattern: &str, replacement: &'static str) -> Self {
        SubstitutionRule {
            id,
            pattern: Regex::new(pattern).expect("invalid canonicalization pattern"),
            replacement,
        }
    }

    pub fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, self.replacement).into_owned()
    }
}

lazy_static! {
    static ref CPU_RULES: Vec<SubstitutionRule> = vec![
        SubstitutionRule::new(
            "speed-socket-cooler",
            r" [0-9]\.?[0-9]?[0-9]?GHz Socket .* Box( without Cooler)?",
            "",
        ),
        SubstitutionRule::new("intel-core-hyphen", r"Intel Core i([0-9]+) ", "Intel Core i${1}-"),
        SubstitutionRule::new("intel-special-edition", r"KS Special Edition", "KS"),
        SubstitutionRule::new("amd-threadripper", r"AMD Ryzen Threadripper ", "AMD Ryzen TR "),
    ];
}

// ============================================================================
// CANONICALIZER
// ============================================================================

/// Turns a price-site CPU name into the join key used by the benchmark site
pub struct NameCanonicalizer {
    rules: &'static [SubstitutionRule],
}

impl NameCanonicalizer {
    pub fn new() -> Self {
        NameCanonicalizer { rules: &CPU_RULES }
    }

    pub fn rules(&self) -> &[SubstitutionRule] {
        self.rules
    }

    /// Apply every rule in order
    ///
    /// Example:
    /// ```
    /// use price_performance::NameCanonicalizer;
    ///
    /// let c = NameCanonicalizer::new();
    /// assert_eq!(c.canonicalize("Intel Core i5 7500 3.4GHz Socket 1151 Box"), "Intel Core i5-7500");
    /// ```
    pub fn canonicalize(&self, raw_name: &str) -> String {
        self.rules
            .iter()
            .fold(raw_name.to_string(), |name, rule| rule.apply(&name))
    }
}

impl Default for NameCanonicalizer {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
