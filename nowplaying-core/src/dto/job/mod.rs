//! Job DTOs for the submission and status endpoints

use serde::{Deserialize, Serialize};

use crate::domain::job::{JobHandle, PollResult};

/// Status string the remote reports for a finished, successful job
pub const STATUS_SUCCESS: &str = "success";

/// Form fields posted to the submission endpoint
///
/// Order is preserved so the encoded body is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubmitParams(Vec<(String, String)>);

impl SubmitParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters of a "current music" lookup for one user
    pub fn for_user(username: impl Into<String>) -> Self {
        Self::new().with("username", username)
    }

    /// Adds a field, replacing an earlier field with the same key
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();

        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }

        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Body returned by the submission endpoint: `{handle}` or `{error}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmitResponse {
    /// Resolves the body to a handle or the remote's error message
    ///
    /// An error wins over a handle; a body with neither is rejected too.
    pub fn into_handle(self) -> Result<JobHandle, String> {
        if let Some(error) = self.error {
            return Err(error);
        }

        match self.handle {
            Some(handle) if !handle.is_empty() => Ok(JobHandle::from(handle)),
            _ => Err("Submission response carried no job handle".to_string()),
        }
    }
}

/// Body returned by the status endpoint
///
/// One of `{running: true}`, `{status: "success", result}` or
/// `{status: <other>}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub running: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

impl StatusResponse {
    /// Classifies the body
    ///
    /// Only an explicit status is terminal. A body that is neither running
    /// nor carries a status keeps the job in the running state.
    pub fn into_poll_result(self) -> PollResult {
        if self.running == Some(true) {
            return PollResult::Running;
        }

        match self.status {
            Some(status) if status == STATUS_SUCCESS => {
                let payload = match self.result {
                    Some(serde_json::Value::String(raw)) => raw,
                    Some(serde_json::Value::Null) | None => String::new(),
                    Some(other) => other.to_string(),
                };
                PollResult::Succeeded(payload)
            }
            Some(status) => PollResult::Failed(status),
            None => PollResult::Running,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_params_replace_and_order() {
        let params = SubmitParams::for_user("alice")
            .with("source", "lastfm")
            .with("username", "bob");

        assert_eq!(params.get("username"), Some("bob"));
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            serde_json::json!([["username", "bob"], ["source", "lastfm"]])
        );
    }

    #[test]
    fn test_submit_response_error_wins() {
        let resp: SubmitResponse =
            serde_json::from_str(r#"{"handle":"job-1","error":"bad user"}"#).unwrap();
        assert_eq!(resp.into_handle().unwrap_err(), "bad user");

        let resp: SubmitResponse = serde_json::from_str(r#"{"handle":"job-1"}"#).unwrap();
        assert_eq!(resp.into_handle().unwrap(), JobHandle::new("job-1"));

        let resp: SubmitResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.into_handle().is_err());
    }

    #[test]
    fn test_status_classification() {
        let running: StatusResponse = serde_json::from_str(r#"{"running":true}"#).unwrap();
        assert_eq!(running.into_poll_result(), PollResult::Running);

        let success: StatusResponse = serde_json::from_str(
            r#"{"status":"success","result":"{\"data\":\"Artist - Title\"}"}"#,
        )
        .unwrap();
        assert_eq!(
            success.into_poll_result(),
            PollResult::Succeeded(r#"{"data":"Artist - Title"}"#.to_string())
        );

        let failure: StatusResponse = serde_json::from_str(r#"{"status":"failure"}"#).unwrap();
        assert_eq!(
            failure.into_poll_result(),
            PollResult::Failed("failure".to_string())
        );

        let idle: StatusResponse = serde_json::from_str(r#"{"running":false}"#).unwrap();
        assert_eq!(idle.into_poll_result(), PollResult::Running);
    }

    #[test]
    fn test_object_result_is_reencoded() {
        let resp: StatusResponse =
            serde_json::from_str(r#"{"status":"success","result":{"data":"A - B"}}"#).unwrap();
        assert_eq!(
            resp.into_poll_result(),
            PollResult::Succeeded(r#"{"data":"A - B"}"#.to_string())
        );
    }
}
