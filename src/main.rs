use actix_web::{App, HttpServer, web::Data};
use email_diagnosis::config::ServiceConfig;
use email_diagnosis::graphql::schema::create_schema;
use email_diagnosis::openapi::ApiDoc;
use email_diagnosis::validation::dnsmx::{DnsCollaborator, TrustDnsCollaborator};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Email Diagnosis Service Entry Point
///
/// Configures and launches the Actix-web HTTP server with:
/// - REST endpoints under `/api/v1`
/// - GraphQL endpoint powered by Async-GraphQL
/// - Swagger UI for API documentation
/// - Environment configuration via `.env` file
///
/// # Endpoints
/// - REST: `/api/v1/health`, `/api/v1/validate-email`, `/api/v1/validate-emails-bulk`
/// - GraphQL: `/api/v1/graphql`, playground at `/api/v1/playground`
/// - Swagger UI: `/swagger-ui/`
/// - OpenAPI spec: `/api-docs/openapi.json`
///
/// # Configuration
/// See [`ServiceConfig`]. Log filtering follows `RUST_LOG`, defaulting to `info`.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServiceConfig::from_env().map_err(|e| {
        error!(error = %e, "invalid configuration");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let dns: Arc<dyn DnsCollaborator> = Arc::new(TrustDnsCollaborator::new(
        config.dns_timeout,
        config.dns_attempts,
    ));
    let schema = create_schema(dns.clone());

    info!(
        host = %config.host,
        port = config.port,
        dns_timeout_secs = config.dns_timeout.as_secs(),
        dns_attempts = config.dns_attempts,
        "starting email diagnosis service"
    );

    HttpServer::new(move || {
        let openapi = ApiDoc::openapi();

        App::new()
            .app_data(Data::from(dns.clone()))
            .app_data(Data::new(schema.clone()))
            .configure(email_diagnosis::routes::configure)
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
