use thiserror::Error;

/// Classified failures surfaced by the store and service layers. The web
/// layer maps each variant onto a status code; nothing below it retries.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Database(#[from] rusqlite::Error),

    #[error(transparent)]
    Pool(#[from] r2d2::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
