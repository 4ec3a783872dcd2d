//! Body of `GET /health`.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Health {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Probe {
    Ok,
    Error,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: Health,
    pub version: &'static str,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub storage: CheckStatus,
}

/// Outcome of one probe, with the backend name or the failure.
#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub status: Probe,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckStatus {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: Probe::Ok,
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Probe::Error,
            message: Some(message.into()),
        }
    }
}

impl HealthChecks {
    pub fn overall(&self) -> Health {
        match self.storage.status {
            Probe::Ok => Health::Healthy,
            Probe::Error => Health::Degraded,
        }
    }
}
