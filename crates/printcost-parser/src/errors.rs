use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("{normalizer}: could not find a company name column in {source_name}")]
    MissingIdentifier {
        normalizer: &'static str,
        source_name: String,
    },

    #[error(
        "{normalizer}: {source_name} is missing critical columns {missing:?}; detected columns: {detected:?}"
    )]
    MissingCriticalFields {
        normalizer: &'static str,
        source_name: String,
        missing: Vec<&'static str>,
        detected: Vec<String>,
    },

    #[error("{normalizer} CSV error in {source_name}: {source}")]
    Csv {
        normalizer: &'static str,
        source_name: String,
        #[source]
        source: csv::Error,
    },

    #[error("{normalizer}: {source_name} did not contain any rows")]
    EmptyInput {
        normalizer: &'static str,
        source_name: String,
    },
}

impl NormalizeError {
    pub fn normalizer(&self) -> &'static str {
        match self {
            NormalizeError::MissingIdentifier { normalizer, .. }
            | NormalizeError::MissingCriticalFields { normalizer, .. }
            | NormalizeError::Csv { normalizer, .. }
            | NormalizeError::EmptyInput { normalizer, .. } => normalizer,
        }
    }
}
