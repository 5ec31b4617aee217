use crate::models::health::HealthResponse;
use async_graphql::{Context, Object, Result};

/// GraphQL representation of service health status, mirroring the REST
/// health response.
#[derive(Debug)]
pub struct Health {
    pub status: String,
    pub version: String,
    pub diagnosis_codes: usize,
    pub timestamp: String,
}

impl From<HealthResponse> for Health {
    fn from(response: HealthResponse) -> Self {
        Self {
            status: response.status,
            version: response.version,
            diagnosis_codes: response.diagnosis_codes,
            timestamp: response.timestamp,
        }
    }
}

#[Object]
impl Health {
    /// "UP" while the service is operational
    async fn status(&self) -> &str {
        &self.status
    }

    async fn version(&self) -> &str {
        &self.version
    }

    /// Number of codes a diagnosis may carry
    async fn diagnosis_codes(&self) -> i32 {
        i32::try_from(self.diagnosis_codes).unwrap_or(i32::MAX)
    }

    /// RFC 3339 timestamp of the check, UTC
    async fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

/// Root query type for health-related GraphQL operations
#[derive(Default)]
pub struct HealthQuery;

#[Object]
impl HealthQuery {
    /// Checks service health status
    async fn health(&self, _ctx: &Context<'_>) -> Result<Health> {
        Ok(Health::from(HealthResponse::up()))
    }
}
