use thiserror::Error;

/// Configuration faults, surfaced at startup rather than during resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Rules with neither a default template nor a catalog entry to fall back on.
    #[error("no default message reachable for rules: {}", .rules.join(", "))]
    MissingDefault { rules: Vec<String> },

    #[error("invalid locale code '{0}'")]
    InvalidLocale(String),

    #[error("a process-wide rule table is already installed")]
    AlreadyInstalled,
}
