// 🚨 Munge Errors - typed failures of the reconciliation core
//
// Application layers (sources, output, CLI) wrap these in anyhow::Error.

/// Errors raised by extraction, reconciliation, and enrichment
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MungeError {
    /// A collaborator handed us data in an unexpected shape (e.g. wrong CSV header)
    #[error("Malformed input from {source_name}: {reason}")]
    MalformedInput { source_name: String, reason: String },

    /// A merged row reached enrichment without a price
    #[error("Row '{name}' has no price")]
    MissingPrice { name: String },

    /// The price string could not be turned into a number
    #[error("Row '{name}' has an unparseable price '{price}'")]
    InvalidPrice { name: String, price: String },
}

impl MungeError {
    pub fn malformed(source_name: &str, reason: impl Into<String>) -> Self {
        MungeError::MalformedInput {
            source_name: source_name.to_string(),
            reason: reason.into(),
        }
    }
}
