use utoipa::OpenApi;

/// OpenAPI Specification Documentation
///
/// Generated at compile time from the `#[utoipa::path]` annotations on the
/// REST handlers.
///
/// # Endpoints
/// - Health Check: `GET /api/v1/health`
/// - Email Validation: `POST /api/v1/validate-email`
/// - Bulk Email Validation: `POST /api/v1/validate-emails-bulk`
///
/// # Tags
/// 1. **Health Check**: Service monitoring endpoints
/// 2. **Email Validation**: Address diagnosis operations
/// 3. **GraphQL**: Unified query interface
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health,
        crate::routes::email::validate_email,
        crate::routes::email::validate_emails_bulk,
    ),
    components(
        schemas(
            crate::models::health::HealthResponse,
            crate::models::email::EmailRequest,
            crate::models::email::BulkEmailRequest,
            crate::models::email::DiagnosisEntry,
            crate::models::email::EmailDiagnosisResponse,
            crate::models::email::BulkEmailDiagnosisResponse,
            crate::validation::aggregate::ValidationOptions,
            crate::validation::diagnosis::Band,
        )
    ),
    tags(
        (name = "Health Check", description = "Service health monitoring endpoints"),
        (name = "Email Validation", description = "Graded RFC 5321/5322 email address diagnosis"),
        (name = "GraphQL", description = "GraphQL API for interacting with all service features")
    ),
    info(
        description = "Graded email address validation with REST and GraphQL interfaces",
        title = "Email Diagnosis API",
        version = "0.1.0",
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| *p == "/api/v1/health"));
        assert!(paths.iter().any(|p| *p == "/api/v1/validate-email"));
        assert!(paths.iter().any(|p| *p == "/api/v1/validate-emails-bulk"));
    }

    #[test]
    fn test_document_serializes() {
        let json = ApiDoc::openapi().to_json().unwrap();
        assert!(json.contains("Email Diagnosis API"));
        assert!(json.contains("EmailDiagnosisResponse"));
    }
}
