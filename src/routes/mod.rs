use actix_web::web;

/// # Health Check Endpoint
///
/// Returns the current health status of the service along with a timestamp.
///
/// ## Example Response
///
/// ```json
/// {
///   "status": "UP",
///   "timestamp": "2023-10-05T12:34:56.789Z"
/// }
/// ```
pub mod health;

/// # Email Diagnosis Endpoints
///
/// Grade one or many addresses. Every address gets a 200 response carrying its
/// diagnoses; only a malformed request body is a 400.
///
/// Requires a `web::Data<dyn DnsCollaborator>` in the app data.
pub mod email;

/// # GraphQL Endpoints
///
/// `POST /graphql` executes queries against [`crate::graphql::schema::AppSchema`],
/// `GET /playground` serves the interactive playground.
pub mod graphql;

/// # API Route Configuration
///
/// Sets up versioned API endpoints under the `/api/v1` base path.
///
/// ## Example Endpoints
///
/// ```text
/// GET  /api/v1/health               - Service health status
/// POST /api/v1/validate-email       - Diagnose one address
/// POST /api/v1/validate-emails-bulk - Diagnose many addresses
/// POST /api/v1/graphql              - GraphQL queries
/// GET  /api/v1/playground           - GraphQL playground
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::configure_routes)
            .configure(email::configure_routes)
            .configure(graphql::configure_routes),
    );
}
