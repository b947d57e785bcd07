use serde_json::Value;

use herald_common::error::WatchError;
use herald_common::types::{ReviewStatus, WorkItem};

const NAME_KEY: &str = "homework_name";
const STATUS_KEY: &str = "status";

/// Extract the name and review status from one raw homework entry.
pub fn parse_status(entry: &Value) -> Result<WorkItem, WatchError> {
    let object = entry
        .as_object()
        .ok_or_else(|| WatchError::Shape("homework is not an object".to_string()))?;

    let name = object
        .get(NAME_KEY)
        .ok_or_else(|| WatchError::MissingField(NAME_KEY.to_string()))?;
    let status = object
        .get(STATUS_KEY)
        .ok_or_else(|| WatchError::MissingField(STATUS_KEY.to_string()))?;

    let name = name
        .as_str()
        .ok_or_else(|| WatchError::Shape(format!("\"{NAME_KEY}\" is not a string")))?;
    let status: ReviewStatus = match status.as_str() {
        Some(s) => s.parse()?,
        None => return Err(WatchError::UnknownStatus(status.to_string())),
    };

    Ok(WorkItem {
        name: name.to_string(),
        status,
    })
}

/// Notification text for one raw homework entry.
pub fn format_status(entry: &Value) -> Result<String, WatchError> {
    parse_status(entry).map(|item| item.message())
}
