use crate::validation::diagnosis::Diagnosis;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Liveness report, also telling clients which diagnosis catalog is served.
///
/// ```json
/// {
///   "status": "UP",
///   "version": "0.1.0",
///   "diagnosis_codes": 52,
///   "timestamp": "2024-03-10T15:30:45.123456789Z"
/// }
/// ```
#[derive(Serialize, Debug, PartialEq, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Crate version of the running service
    pub version: String,
    /// Number of codes a diagnosis may carry
    pub diagnosis_codes: usize,
    /// RFC 3339, UTC
    pub timestamp: String,
}

impl HealthResponse {
    pub fn up() -> Self {
        Self {
            status: "UP".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            diagnosis_codes: Diagnosis::ALL.len(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_health_response_up() {
        let response = HealthResponse::up();

        assert_eq!(response.status, "UP");
        assert_eq!(response.version, env!("CARGO_PKG_VERSION"));
        assert!(
            DateTime::parse_from_rfc3339(&response.timestamp).is_ok(),
            "Timestamp should be valid RFC3339 format"
        );
    }

    #[test]
    fn test_health_reports_catalog_size() {
        let response = HealthResponse::up();
        assert_eq!(response.diagnosis_codes, Diagnosis::ALL.len());
        assert!(Diagnosis::from_code(0).is_some());
    }

    #[test]
    fn test_health_response_json_fields() {
        let json = serde_json::to_value(HealthResponse::up()).unwrap();
        assert_eq!(json["status"], "UP");
        assert_eq!(json["diagnosis_codes"], Diagnosis::ALL.len());
    }
}
