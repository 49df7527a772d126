use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    /// A read against the store failed (availability search, room lookup).
    #[error("Query failed: {0}")]
    Query(String),

    /// An insert failed; the enclosing transaction is rolled back.
    #[error("Write failed: {0}")]
    Write(String),

    /// Begin, commit or rollback itself failed.
    #[error("Transaction failed: {0}")]
    Transaction(String),

    #[error("Timed out after {seconds}s: {operation}")]
    Timeout {
        operation: &'static str,
        seconds: u64,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    /// Text returned to the client. Input and auth failures carry a message
    /// written for the caller and are sent without the variant prefix.
    pub fn client_message(&self) -> String {
        match self {
            Self::Validation(msg) | Self::Unauthorized(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    /// Whether the failure happened on the server side (store or transaction)
    /// rather than because of the caller's input.
    pub fn is_server_side(&self) -> bool {
        matches!(
            self,
            Self::Write(_) | Self::Transaction(_) | Self::Timeout { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Config file error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Metrics recorder error: {0}")]
    Metrics(String),
}
