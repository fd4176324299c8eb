use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Direction of a vote request: add the caller's vote or take it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum VoteDirection {
    Add,
    Remove,
}

impl VoteDirection {
    /// Wire encoding inherited from the HTTP contract: 1 adds, 0 removes.
    pub(crate) fn from_dir(dir: i16) -> Result<Self, DomainError> {
        match dir {
            1 => Ok(VoteDirection::Add),
            0 => Ok(VoteDirection::Remove),
            _ => Err(DomainError::Validation {
                field: "dir",
                message: "must be 0 or 1",
            }),
        }
    }
}
