use std::str::FromStr;

use crate::error::WatchError;

/// Review state reported by the status API for a single homework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl ReviewStatus {
    /// Human-readable verdict sent to the chat.
    pub fn verdict(&self) -> &'static str {
        match self {
            ReviewStatus::Approved => "Work reviewed: the reviewer liked everything. Hooray!",
            ReviewStatus::Reviewing => "Work taken for review by the reviewer.",
            ReviewStatus::Rejected => "Work reviewed: the reviewer has comments.",
        }
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewStatus::Approved => write!(f, "approved"),
            ReviewStatus::Reviewing => write!(f, "reviewing"),
            ReviewStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for ReviewStatus {
    type Err = WatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(ReviewStatus::Approved),
            "reviewing" => Ok(ReviewStatus::Reviewing),
            "rejected" => Ok(ReviewStatus::Rejected),
            other => Err(WatchError::UnknownStatus(other.to_string())),
        }
    }
}

/// A homework entry as returned by the status API.
///
/// Only the name (`homework_name` on the wire) and status are kept; any other
/// fields in the payload are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub name: String,
    pub status: ReviewStatus,
}

impl WorkItem {
    /// Notification text announcing this item's current verdict.
    pub fn message(&self) -> String {
        format!(
            "Changed review status for \"{}\". {}",
            self.name,
            self.status.verdict()
        )
    }
}
