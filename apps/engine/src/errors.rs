use thiserror::Error;

/// Engine-level error type.
///
/// Deliberately small: parse misses are represented as absent `Option`
/// values and external-assistant failures are recovered by falling back to
/// the rule-based path. The only fatal condition is a skill dictionary that
/// cannot be loaded at startup.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to read skill dictionary at {path}: {source}")]
    DictionaryIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse skill dictionary: {0}")]
    DictionaryParse(#[from] serde_json::Error),

    #[error("skill dictionary contains no entries")]
    DictionaryEmpty,
}
