use crate::models::{
    BulkEmailDiagnosisResponse, BulkEmailRequest, EmailDiagnosisResponse, EmailRequest,
};
use crate::validation::aggregate::{ValidationOptions, diagnose};
use crate::validation::dnsmx::DnsCollaborator;
use crate::validation::scanner::scan;
use actix_web::{HttpResponse, Responder, post, web};
use futures::future::join_all;
use tracing::debug;

/// Scans and grades one address, consulting `dns` when the options ask for it.
pub async fn diagnose_email(
    email: &str,
    options: &ValidationOptions,
    dns: &dyn DnsCollaborator,
) -> EmailDiagnosisResponse {
    let report = diagnose(scan(email), options, Some(dns)).await;
    EmailDiagnosisResponse::new(email, &report, options)
}

/// # Email Validation Endpoint
///
/// Grades an email address against RFC 5321/5322 and, optionally, DNS.
///
/// ## Request
/// - Method: POST
/// - Body: JSON object with `email`, optional `check_dns` and `threshold`
///
/// ## Responses
/// - **200 OK**: Always, for any address. The body tells whether it is valid
///   and lists every diagnosis.
/// - **400 Bad Request**: Body is not a valid request
///
/// ## Example Requests
/// ```json
/// { "email": "user@example.com" }
/// ```
///
/// Diagnose mode with DNS:
/// ```json
/// { "email": "user@example.com", "check_dns": true, "threshold": 16 }
/// ```
#[utoipa::path(
    post,
    path = "/api/v1/validate-email",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "Diagnosis of the address", body = EmailDiagnosisResponse),
        (status = 400, description = "Malformed request body")
    ),
    tag = "Email Validation"
)]
#[post("/validate-email")]
pub async fn validate_email(
    req: web::Json<EmailRequest>,
    dns: web::Data<dyn DnsCollaborator>,
) -> impl Responder {
    let response = diagnose_email(&req.email, &req.options(), dns.get_ref()).await;
    debug!(
        email = %response.email,
        status = response.status.code,
        "validate-email"
    );
    HttpResponse::Ok().json(response)
}

/// # Bulk Email Validation Endpoint
///
/// Grades several addresses concurrently with the same options.
///
/// ## Request
/// - Method: POST
/// - Body: JSON object with `emails` array, optional `check_dns` and `threshold`
///
/// ## Responses
/// - **200 OK**: Per-address results in request order, with counts
///
/// ## Example Request
/// ```json
/// { "emails": ["user1@example.com", "user2@example.com"] }
/// ```
#[utoipa::path(
    post,
    path = "/api/v1/validate-emails-bulk",
    request_body = BulkEmailRequest,
    responses(
        (status = 200, description = "Bulk diagnosis results", body = BulkEmailDiagnosisResponse)
    ),
    tag = "Email Validation"
)]
#[post("/validate-emails-bulk")]
pub async fn validate_emails_bulk(
    req: web::Json<BulkEmailRequest>,
    dns: web::Data<dyn DnsCollaborator>,
) -> impl Responder {
    let options = req.options();
    let validation_futures = req
        .emails
        .iter()
        .map(|email| diagnose_email(email, &options, dns.get_ref()));

    let response = BulkEmailDiagnosisResponse::from_results(join_all(validation_futures).await);
    debug!(
        total = response.results.len(),
        valid = response.valid_count,
        "validate-emails-bulk"
    );
    HttpResponse::Ok().json(response)
}

/// # Route Configuration
///
/// - `POST /validate-email`
/// - `POST /validate-emails-bulk`
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(validate_email).service(validate_emails_bulk);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::dnsmx::DnsError;
    use actix_web::{App, http::StatusCode, test};
    use async_trait::async_trait;
    use mockall::mock;
    use serde_json::{Value, json};
    use std::sync::Arc;

    mock! {
        pub Dns {}

        #[async_trait]
        impl DnsCollaborator for Dns {
            async fn resolve_mx(&self, domain: &str) -> Result<Vec<String>, DnsError>;
            async fn resolve_cname(&self, domain: &str) -> Result<Vec<String>, DnsError>;
            async fn resolve_a(&self, domain: &str) -> Result<Vec<String>, DnsError>;
            async fn resolve_aaaa(&self, domain: &str) -> Result<Vec<String>, DnsError>;
        }
    }

    /// A collaborator that fails the test if it is ever consulted.
    fn silent_dns() -> MockDns {
        let mut dns = MockDns::new();
        dns.expect_resolve_mx().never();
        dns.expect_resolve_cname().never();
        dns.expect_resolve_a().never();
        dns.expect_resolve_aaaa().never();
        dns
    }

    /// No records of any kind.
    fn empty_dns() -> MockDns {
        let mut dns = MockDns::new();
        dns.expect_resolve_mx().returning(|_| Err(DnsError::NoData));
        dns.expect_resolve_cname().returning(|_| Ok(Vec::new()));
        dns.expect_resolve_a().returning(|_| Ok(Vec::new()));
        dns.expect_resolve_aaaa().returning(|_| Ok(Vec::new()));
        dns
    }

    async fn post_json(dns: MockDns, uri: &str, body: Value) -> (StatusCode, Value) {
        let dns: Arc<dyn DnsCollaborator> = Arc::new(dns);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(dns))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post().uri(uri).set_json(body).to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body = test::read_body(resp).await;
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    #[actix_web::test]
    async fn test_valid_email_boolean_mode() {
        let (status, body) = post_json(
            silent_dns(),
            "/validate-email",
            json!({"email": "test@example.com"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], true);
        assert_eq!(body["verdict"], true);
        assert_eq!(body["status"]["name"], "VALID");
        assert_eq!(body["diagnoses"][0]["code"], 0);
    }

    #[actix_web::test]
    async fn test_invalid_email_is_still_200() {
        let (status, body) =
            post_json(silent_dns(), "/validate-email", json!({"email": "test@"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], false);
        assert_eq!(body["status"]["code"], 131);
        assert_eq!(body["status"]["name"], "ERR_NODOMAIN");
        assert_eq!(body["status"]["category"], "ERR");
    }

    #[actix_web::test]
    async fn test_diagnose_mode_returns_code() {
        let (_, body) = post_json(
            silent_dns(),
            "/validate-email",
            json!({"email": "john..doe@example.com", "threshold": 0}),
        )
        .await;

        assert_eq!(body["verdict"], 132);
        assert_eq!(body["valid"], false);
    }

    #[actix_web::test]
    async fn test_dns_warning_passes_boolean_mode() {
        let (_, body) = post_json(
            empty_dns(),
            "/validate-email",
            json!({"email": "test@example.com", "check_dns": true}),
        )
        .await;

        assert_eq!(body["verdict"], true);
        assert_eq!(body["status"]["name"], "DNSWARN_NO_RECORD");
        let codes: Vec<u64> = body["diagnoses"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["code"].as_u64().unwrap())
            .collect();
        assert_eq!(codes, vec![5, 6]);
    }

    #[actix_web::test]
    async fn test_dns_warning_in_diagnose_mode() {
        let (_, body) = post_json(
            empty_dns(),
            "/validate-email",
            json!({"email": "test@example.com", "check_dns": true, "threshold": 0}),
        )
        .await;

        assert_eq!(body["verdict"], 6);
    }

    #[actix_web::test]
    async fn test_missing_email_is_bad_request() {
        let (status, _) = post_json(silent_dns(), "/validate-email", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_bulk_validation_counts() {
        let (status, body) = post_json(
            silent_dns(),
            "/validate-emails-bulk",
            json!({"emails": ["test@example.com", "\"quoted\"@example.com", "test@", "a@b@c"]}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid_count"], 2);
        assert_eq!(body["invalid_count"], 2);

        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 4);
        assert_eq!(results[1]["email"], "\"quoted\"@example.com");
        assert_eq!(results[1]["status"]["code"], 11);
        assert_eq!(results[3]["status"]["name"], "ERR_EXPECTING_ATEXT");
    }

    #[actix_web::test]
    async fn test_bulk_validation_empty_list() {
        let (status, body) =
            post_json(silent_dns(), "/validate-emails-bulk", json!({"emails": []})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid_count"], 0);
        assert_eq!(body["invalid_count"], 0);
        assert!(body["results"].as_array().unwrap().is_empty());
    }
}
