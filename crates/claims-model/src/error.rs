use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown fraud category: {0}")]
    UnknownCategory(String),
    #[error("fraud score {0} is outside 0..=100")]
    ScoreOutOfRange(i64),
}

pub type Result<T> = std::result::Result<T, ModelError>;
