/// Why a single candidate link is unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkDefect {
    /// A required field is empty or whitespace.
    #[error("missing {0}")]
    MissingField(&'static str),
    /// The evidence tag would be ambiguous once flattened.
    #[error("evidence tag '{0}' contains the ';' separator")]
    SeparatorInTag(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (duplicate source, missing org map, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// A candidate link reached the engine without its required fields.
    #[error("source '{origin}', record {index}: malformed record: {defect}")]
    MalformedRecord {
        origin: String,
        index: usize,
        defect: LinkDefect,
    },
}

pub type Result<T> = std::result::Result<T, ReconError>;
