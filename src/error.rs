use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrgError {
    #[error(transparent)]
    Vault(#[from] crate::vault::VaultError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("Other error: {0}")]
    Other(String),
}

pub type OrgResult<T> = Result<T, OrgError>;
