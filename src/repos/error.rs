/**
 * Responsibility
 * - what a record provider reports upward when a lookup cannot complete
 * - "no such user" is never an error here; that is `Ok(None)`
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("seed error: {0}")]
    Seed(String),
}

pub type RepoResult<T> = Result<T, RepoError>;
