use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid version format: {version:?}")]
    InvalidVersionFormat { version: String },

    #[error("malformed dataset entry {feature}/{browser}/{version}: {reason}")]
    MalformedDatasetEntry {
        feature: String,
        browser: String,
        version: String,
        reason: String,
    },

    #[error("Code is incompatible with minimum browser version")]
    Incompatible,

    #[error("failed to parse rules YAML: {source}")]
    RulesLoad {
        #[from]
        source: serde_yaml::Error,
    },

    #[error("failed to parse dataset: {source}")]
    Dataset {
        #[from]
        source: serde_json::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
