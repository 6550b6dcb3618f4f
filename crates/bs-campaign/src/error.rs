//! Campaign errors.

use bs_core::StackError;
use bs_dst::DstError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CampaignError {
    #[error("invalid campaign config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Dst(#[from] DstError),

    #[error("could not create stack: {0}")]
    Stack(#[from] StackError),

    #[error("could not serialize report: {0}")]
    Report(#[from] serde_json::Error),
}
