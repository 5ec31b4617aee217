use crate::validation::aggregate::{Report, ValidationOptions, Verdict, verdict};
use crate::validation::diagnosis::Diagnosis;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct EmailRequest {
    pub email: String,
    /// Confirm the domain through DNS.
    #[serde(default)]
    pub check_dns: bool,
    /// Switches to diagnose mode.
    #[serde(default)]
    pub threshold: Option<i32>,
}

impl EmailRequest {
    pub fn options(&self) -> ValidationOptions {
        ValidationOptions {
            check_dns: self.check_dns,
            threshold: self.threshold,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkEmailRequest {
    pub emails: Vec<String>,
    #[serde(default)]
    pub check_dns: bool,
    #[serde(default)]
    pub threshold: Option<i32>,
}

impl BulkEmailRequest {
    pub fn options(&self) -> ValidationOptions {
        ValidationOptions {
            check_dns: self.check_dns,
            threshold: self.threshold,
        }
    }
}

/// One diagnosis as shown to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DiagnosisEntry {
    pub code: u8,
    /// e.g. `RFC5321_QUOTEDSTRING`
    pub name: String,
    /// Severity band, e.g. `RFC5321`
    pub category: String,
    pub description: String,
}

impl From<Diagnosis> for DiagnosisEntry {
    fn from(diagnosis: Diagnosis) -> Self {
        Self {
            code: diagnosis.code(),
            name: diagnosis.name().to_string(),
            category: diagnosis.band().name().to_string(),
            description: diagnosis.description().to_string(),
        }
    }
}

/// Full diagnosis of one address.
///
/// `status` is always the most severe diagnosis found. `verdict` is what the
/// caller's mode makes of it: a boolean, or a code that may have collapsed to
/// 0 under the threshold. `valid` mirrors the verdict.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmailDiagnosisResponse {
    pub email: String,
    pub valid: bool,
    pub status: DiagnosisEntry,
    pub diagnoses: Vec<DiagnosisEntry>,
    #[schema(value_type = Object)]
    pub verdict: Verdict,
}

impl EmailDiagnosisResponse {
    pub fn new(email: impl Into<String>, report: &Report, options: &ValidationOptions) -> Self {
        let verdict = verdict(report, options);
        Self {
            email: email.into(),
            valid: verdict.is_valid(),
            status: report.status.into(),
            diagnoses: report.diagnoses.iter().copied().map(DiagnosisEntry::from).collect(),
            verdict,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkEmailDiagnosisResponse {
    pub results: Vec<EmailDiagnosisResponse>,
    pub valid_count: usize,
    pub invalid_count: usize,
}

impl BulkEmailDiagnosisResponse {
    pub fn from_results(results: Vec<EmailDiagnosisResponse>) -> Self {
        let valid_count = results.iter().filter(|result| result.valid).count();
        Self {
            invalid_count: results.len() - valid_count,
            valid_count,
            results,
        }
    }
}
