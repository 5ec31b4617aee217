use crate::models::{DiagnosisEntry, EmailDiagnosisResponse};
use crate::routes::email::diagnose_email;
use crate::validation::aggregate::{ValidationOptions, Verdict};
use crate::validation::dnsmx::DnsCollaborator;
use async_graphql::{Context, Object, Result, SimpleObject};
use futures::future::join_all;
use std::sync::Arc;

/// One diagnosis with its severity band.
#[derive(SimpleObject, Clone, Debug, PartialEq)]
pub struct DiagnosisInfo {
    /// Numeric code, 0 for VALID
    pub code: i32,
    /// Upper-case identifier such as RFC5321_QUOTEDSTRING
    pub name: String,
    /// Severity band such as RFC5321 or ERR
    pub category: String,
    pub description: String,
}

impl From<DiagnosisEntry> for DiagnosisInfo {
    fn from(entry: DiagnosisEntry) -> Self {
        Self {
            code: i32::from(entry.code),
            name: entry.name,
            category: entry.category,
            description: entry.description,
        }
    }
}

/// Diagnosis of a single address
#[derive(SimpleObject, Clone, Debug)]
pub struct EmailDiagnosis {
    pub email: String,
    /// Outcome of the requested mode
    pub valid: bool,
    /// Most severe diagnosis found
    pub status: DiagnosisInfo,
    /// Every diagnosis found, in the order raised
    pub diagnoses: Vec<DiagnosisInfo>,
    /// Diagnose mode only: the status code after the threshold was applied
    pub verdict_code: Option<i32>,
}

impl From<EmailDiagnosisResponse> for EmailDiagnosis {
    fn from(response: EmailDiagnosisResponse) -> Self {
        let verdict_code = match response.verdict {
            Verdict::Diagnosis(diagnosis) => Some(i32::from(diagnosis.code())),
            Verdict::Valid(_) => None,
        };

        Self {
            email: response.email,
            valid: response.valid,
            status: response.status.into(),
            diagnoses: response.diagnoses.into_iter().map(DiagnosisInfo::from).collect(),
            verdict_code,
        }
    }
}

#[derive(SimpleObject)]
pub struct BulkEmailDiagnosis {
    pub results: Vec<EmailDiagnosis>,
    pub valid_count: i32,
    pub invalid_count: i32,
}

/// Email diagnosis query operations
#[derive(Default)]
pub struct EmailQuery;

#[Object]
impl EmailQuery {
    /// Grades an address. Supplying `threshold` switches to diagnose mode.
    async fn validate_email(
        &self,
        ctx: &Context<'_>,
        email: String,
        check_dns: Option<bool>,
        threshold: Option<i32>,
    ) -> Result<EmailDiagnosis> {
        let dns = ctx.data::<Arc<dyn DnsCollaborator>>()?;
        let options = options_from(check_dns, threshold);

        Ok(diagnose_email(&email, &options, dns.as_ref()).await.into())
    }

    /// Grades several addresses concurrently with the same options.
    async fn validate_emails_bulk(
        &self,
        ctx: &Context<'_>,
        emails: Vec<String>,
        check_dns: Option<bool>,
        threshold: Option<i32>,
    ) -> Result<BulkEmailDiagnosis> {
        let dns = ctx.data::<Arc<dyn DnsCollaborator>>()?;
        let options = options_from(check_dns, threshold);

        let validation_futures = emails
            .iter()
            .map(|email| diagnose_email(email, &options, dns.as_ref()));
        let results: Vec<EmailDiagnosis> = join_all(validation_futures)
            .await
            .into_iter()
            .map(EmailDiagnosis::from)
            .collect();

        let valid = results.iter().filter(|result| result.valid).count();
        Ok(BulkEmailDiagnosis {
            valid_count: count(valid),
            invalid_count: count(results.len() - valid),
            results,
        })
    }
}

fn options_from(check_dns: Option<bool>, threshold: Option<i32>) -> ValidationOptions {
    ValidationOptions {
        check_dns: check_dns.unwrap_or(false),
        threshold,
    }
}

fn count(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}
