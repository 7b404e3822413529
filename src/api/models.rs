// Wire types for the /service endpoint

use serde::{Deserialize, Serialize};

/// Status the poller reports for a reachable service
pub const STATUS_OK: &str = "OK";
/// Status the poller reports for an unreachable service
pub const STATUS_FAIL: &str = "FAIL";
/// Status of a service the poller has not checked yet
pub const STATUS_UNKNOWN: &str = "Unknown";

/// One monitored service as listed by `GET /service`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub date: String,
}

impl ServiceRecord {
    /// Returns true if the last poll reached the service
    pub fn is_up(&self) -> bool {
        self.status.eq_ignore_ascii_case(STATUS_OK)
    }

    /// Returns true if the last poll failed
    pub fn is_down(&self) -> bool {
        self.status.eq_ignore_ascii_case(STATUS_FAIL)
    }

    /// Returns true if the service has not been polled yet
    pub fn is_pending(&self) -> bool {
        !self.is_up() && !self.is_down()
    }
}

/// Body of `POST /service`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewService {
    pub name: String,
    pub url: String,
}

impl NewService {
    /// Build a request body, trimming surrounding whitespace off both fields
    pub fn trimmed(name: &str, url: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            url: url.trim().to_string(),
        }
    }
}
