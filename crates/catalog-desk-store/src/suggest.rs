use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationServiceError {
    #[error("translation service unavailable: {0}")]
    Unavailable(String),
    #[error("translation service does not support language {0}")]
    UnsupportedLanguage(String),
}

pub trait Suggester {
    fn suggest(&self, source_text: &str, language_code: &str)
    -> Result<String, TranslationServiceError>;
}
