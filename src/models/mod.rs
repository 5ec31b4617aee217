/// # Email Diagnosis Payloads
///
/// Request bodies for single and bulk validation and the response shapes that
/// carry every diagnosis found.
///
/// ## Example JSON
/// ```json
/// {
///   "email": "\"quoted\"@example.com",
///   "valid": true,
///   "status": {
///     "code": 11,
///     "name": "RFC5321_QUOTEDSTRING",
///     "category": "RFC5321",
///     "description": "Address is valid but contains a quoted string"
///   },
///   "diagnoses": [ ... ],
///   "verdict": true
/// }
/// ```
pub mod email;

/// # Health Status Response
///
/// ## Fields
/// - `status`: String indicating service availability ("UP" or "DOWN")
/// - `timestamp`: ISO 8601 formatted timestamp of the status check
pub mod health;

pub use email::{
    BulkEmailDiagnosisResponse, BulkEmailRequest, DiagnosisEntry, EmailDiagnosisResponse,
    EmailRequest,
};
pub use health::HealthResponse;
