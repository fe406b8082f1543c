//! Error type shared by all SORTIE crates.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("unknown unit type token: {0:?}")]
    UnknownUnitType(String),

    #[error("type query names no unit types")]
    EmptyTypeQuery,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
