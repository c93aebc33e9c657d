//! Resolution errors

/// Errors returned by control plane composition and the orchestrator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// A requested cluster feature has no catalog entry
    #[error("Unknown cluster feature: '{name}'")]
    UnknownFeature { name: String },
}

/// Errors from digesting a resolved set or building its report
#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error("Serialization error while digesting: {0}")]
    Serialize(#[from] serde_json::Error),
}
