use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum LadderError {
    #[error("player {0} not found")]
    PlayerNotFound(String),
    #[error("match report {0} not found")]
    ReportNotFound(String),
    #[error("unknown ladder division: {0}")]
    UnknownDivision(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("member aggregation failed")]
    Aggregation {
        #[source]
        source: StoreError,
    },
}
