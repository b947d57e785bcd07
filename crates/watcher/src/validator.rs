//! Response contract checks for the homework status API.

use serde_json::Value;

use herald_common::error::WatchError;

const HOMEWORKS_KEY: &str = "homeworks";
const CURRENT_DATE_KEY: &str = "current_date";

/// A validated status API response.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusPage {
    /// Raw homework entries, in server order. Individual entries are checked
    /// by the formatter.
    pub homeworks: Vec<Value>,
    /// Server time to request from on the next cycle, if reported.
    pub current_date: Option<i64>,
}

/// Check that `payload` is an object carrying a `homeworks` list.
///
/// An empty list is a valid response.
pub fn check_response(payload: &Value) -> Result<StatusPage, WatchError> {
    let object = payload
        .as_object()
        .ok_or_else(|| WatchError::Shape("response is not an object".to_string()))?;

    let homeworks = object
        .get(HOMEWORKS_KEY)
        .ok_or_else(|| WatchError::MissingField(HOMEWORKS_KEY.to_string()))?
        .as_array()
        .ok_or_else(|| WatchError::Shape(format!("\"{HOMEWORKS_KEY}\" is not a list")))?;

    Ok(StatusPage {
        homeworks: homeworks.clone(),
        current_date: object.get(CURRENT_DATE_KEY).and_then(Value::as_i64),
    })
}
