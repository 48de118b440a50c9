//! Erros do núcleo de gerenciamento de energia

use thiserror::Error;

/// Resultado de operações do núcleo
pub type PowerResult<T> = Result<T, PowerError>;

/// Erros de construção, entrada e snapshot
#[derive(Debug, Error)]
pub enum PowerError {
    /// Parâmetro de configuração fora da faixa permitida
    #[error("Invalid configuration: {field} = {value} (expected {min}..={max})")]
    InvalidConfig {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    /// Vetor de entrada com tamanho diferente de N
    #[error("Input length mismatch for {field}: expected {expected}, got {got}")]
    InputLengthMismatch {
        field: &'static str,
        expected: usize,
        got: usize,
    },

    /// Snapshot incompatível com o sistema
    #[error("Snapshot mismatch: {0}")]
    SnapshotMismatch(String),

    /// Cenário de estímulo inválido
    #[error("Invalid scenario: {0}")]
    Scenario(String),

    /// Falha de (de)serialização
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Erro de I/O
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for PowerError {
    fn from(err: serde_json::Error) -> Self {
        PowerError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for PowerError {
    fn from(err: toml::de::Error) -> Self {
        PowerError::Serialization(err.to_string())
    }
}
