//! Error types for JBK Gestione

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum JbkError {
    /// Backend client could not be constructed (missing URL/key, bad config)
    #[error("Configurazione non valida: {0}")]
    Config(String),

    #[error("Username non trovato")]
    UsernameNotFound,

    /// Sign-in rejected; carries the backend's message verbatim
    #[error("{0}")]
    Auth(String),

    /// Request reached the backend and was refused; message verbatim
    #[error("{0}")]
    Backend(String),

    #[error("Errore di rete: {0}")]
    Network(String),

    #[error("Dati non validi: {0}")]
    InvalidData(String),

    /// Local form validation failed before any request was made
    #[error("{0}")]
    Validation(String),

    #[error("Sessione non valida, effettua di nuovo l'accesso")]
    NotAuthenticated,
}

impl From<serde_json::Error> for JbkError {
    fn from(e: serde_json::Error) -> Self {
        JbkError::InvalidData(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, JbkError>;
