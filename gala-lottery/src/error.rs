use thiserror::Error;

pub type Result<T> = std::result::Result<T, LotteryError>;

#[derive(Error, Debug, PartialEq)]
pub enum LotteryError {
    #[error("Winner count must be at least 1")]
    InvalidCount,

    #[error("No participants with a qualifying donation")]
    NoEligibleParticipants,

    #[error("At most {max} winners can be drawn")]
    TooManyWinners { max: usize },

    #[error("Cannot draw from an empty pool")]
    EmptyPool,

    #[error("Requested {requested} winners from a pool of {available}")]
    InsufficientPool { requested: usize, available: usize },

    #[error("Invalid session state: {0}")]
    InvalidState(String),
}
