//! Error hierarchy for the deconfliction crate.
//!
//! `MissionError` covers the `InvalidInput` taxonomy (§7): every way a
//! caller-supplied mission can violate the data model. `EngineError`
//! wraps it for the HTTP façade and adds `Internal`, reserved for
//! conditions the engine's own invariants say cannot occur once a
//! `Mission` has passed validation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

#[derive(Debug, Clone, PartialEq)]
pub enum MissionError {
    EmptyDroneId,
    EmptyWaypoints,
    NegativeCoordinate { x: f64, y: f64, z: f64 },
    NegativeStartTime(f64),
    InvalidTimeWindow { start_time: f64, end_time: f64 },
    NonPositiveSpeed(f64),
    NonPositiveSafetyBuffer(f64),
}

impl std::fmt::Display for MissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissionError::EmptyDroneId => write!(f, "drone_id must not be empty"),
            MissionError::EmptyWaypoints => write!(f, "waypoints must contain at least one point"),
            MissionError::NegativeCoordinate { x, y, z } => {
                write!(f, "waypoint coordinates must be non-negative, got ({x}, {y}, {z})")
            }
            MissionError::NegativeStartTime(t) => {
                write!(f, "start_time must be non-negative, got {t}")
            }
            MissionError::InvalidTimeWindow {
                start_time,
                end_time,
            } => write!(
                f,
                "end_time ({end_time}) must be greater than start_time ({start_time})"
            ),
            MissionError::NonPositiveSpeed(s) => write!(f, "speed must be positive, got {s}"),
            MissionError::NonPositiveSafetyBuffer(b) => {
                write!(f, "safety_buffer must be positive, got {b}")
            }
        }
    }
}

impl std::error::Error for MissionError {}

/// Errors that can surface from the analyze-mission façade. Distinct
/// from `MissionError` so that a bug inside the engine (unreachable
/// after validation) is never confused with bad caller input.
#[derive(Debug)]
pub enum EngineError {
    InvalidMission(MissionError),
    /// Malformed request body — unparsable JSON or a missing/mistyped
    /// field, surfaced by axum's extractor before a handler runs (§7
    /// `MalformedRequest`). Carries axum's own rejection message.
    MalformedRequest(String),
    Internal(String),
}

impl From<MissionError> for EngineError {
    fn from(err: MissionError) -> Self {
        EngineError::InvalidMission(err)
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidMission(err) => write!(f, "{err}"),
            EngineError::MalformedRequest(msg) => write!(f, "malformed request: {msg}"),
            EngineError::Internal(msg) => write!(f, "internal engine error: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            EngineError::InvalidMission(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            EngineError::MalformedRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            EngineError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("{message}");
        }
        (
            status,
            Json(json!({
                "status": "error",
                "message": message,
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_mission_maps_to_400() {
        let err = EngineError::from(MissionError::EmptyDroneId);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_maps_to_500() {
        let err = EngineError::Internal("index returned an out-of-range segment".into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn malformed_request_maps_to_400() {
        let err = EngineError::MalformedRequest("missing field `mission`".into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
