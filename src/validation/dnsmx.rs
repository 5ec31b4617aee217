use super::diagnosis::Diagnosis;
use async_trait::async_trait;
use futures::FutureExt;
use futures::future::{BoxFuture, select_ok};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use trust_dns_resolver::{
    TokioAsyncResolver,
    config::{ResolverConfig, ResolverOpts},
    error::{ResolveError, ResolveErrorKind},
    proto::{op::ResponseCode, rr::RecordType},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DnsError {
    /// The name exists but has no records of the requested type.
    #[error("no records of the requested type")]
    NoData,
    #[error("NXDOMAIN: domain does not exist")]
    NxDomain,
    #[error("timeout")]
    Timeout,
    #[error("DNS error: {0}")]
    Other(String),
}

/// Source of DNS answers for the optional domain-existence check.
///
/// Each lookup yields the records in presentation form. An empty `Ok` and
/// [`DnsError::NoData`] both mean "nothing of this type".
#[async_trait]
pub trait DnsCollaborator: Send + Sync {
    async fn resolve_mx(&self, domain: &str) -> Result<Vec<String>, DnsError>;
    async fn resolve_cname(&self, domain: &str) -> Result<Vec<String>, DnsError>;
    async fn resolve_a(&self, domain: &str) -> Result<Vec<String>, DnsError>;
    async fn resolve_aaaa(&self, domain: &str) -> Result<Vec<String>, DnsError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackRecord {
    Cname,
    A,
    Aaaa,
}

/// Result of asking the collaborator whether a domain exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainConfirmation {
    /// Warnings to fold into the address diagnosis.
    pub diagnoses: Vec<Diagnosis>,
    /// Some record proves the domain exists.
    pub confirmed: bool,
}

/// Checks that `domain` can receive mail.
///
/// 1. Any MX record confirms the domain.
/// 2. An MX failure other than "no data" gives `DNSWARN_NO_RECORD`.
/// 3. Otherwise `DNSWARN_NO_MX_RECORD` is raised and CNAME, A and AAAA are
///    queried together; the first non-empty answer confirms the domain, and if
///    none has records `DNSWARN_NO_RECORD` follows.
pub async fn confirm_domain(dns: &dyn DnsCollaborator, domain: &str) -> DomainConfirmation {
    match dns.resolve_mx(domain).await {
        Ok(records) if !records.is_empty() => {
            debug!(domain, mx = records.len(), "MX records found");
            return DomainConfirmation {
                diagnoses: Vec::new(),
                confirmed: true,
            };
        }
        Ok(_) | Err(DnsError::NoData) => {}
        Err(e) => {
            warn!(domain, error = %e, "MX lookup failed");
            return DomainConfirmation {
                diagnoses: vec![Diagnosis::DnswarnNoRecord],
                confirmed: false,
            };
        }
    }

    let mut diagnoses = vec![Diagnosis::DnswarnNoMxRecord];
    match first_fallback_record(dns, domain).await {
        Some(kind) => {
            debug!(domain, record = ?kind, "domain exists without MX");
            DomainConfirmation {
                diagnoses,
                confirmed: true,
            }
        }
        None => {
            debug!(domain, "no usable records for domain");
            diagnoses.push(Diagnosis::DnswarnNoRecord);
            DomainConfirmation {
                diagnoses,
                confirmed: false,
            }
        }
    }
}

/// Races the CNAME, A and AAAA lookups; resolves on the first one with records
/// or once all of them came back empty.
async fn first_fallback_record(dns: &dyn DnsCollaborator, domain: &str) -> Option<FallbackRecord> {
    let lookups = vec![
        record_lookup(FallbackRecord::Cname, dns.resolve_cname(domain)),
        record_lookup(FallbackRecord::A, dns.resolve_a(domain)),
        record_lookup(FallbackRecord::Aaaa, dns.resolve_aaaa(domain)),
    ];

    select_ok(lookups).await.ok().map(|(kind, _pending)| kind)
}

fn record_lookup<'a, F>(kind: FallbackRecord, lookup: F) -> BoxFuture<'a, Result<FallbackRecord, ()>>
where
    F: Future<Output = Result<Vec<String>, DnsError>> + Send + 'a,
{
    async move {
        match lookup.await {
            Ok(records) if !records.is_empty() => Ok(kind),
            _ => Err(()),
        }
    }
    .boxed()
}

/// [`DnsCollaborator`] backed by `trust-dns-resolver`.
///
/// One async resolver, built in [`TrustDnsCollaborator::new`], serves every
/// lookup.
#[derive(Clone)]
pub struct TrustDnsCollaborator {
    resolver: TokioAsyncResolver,
    timeout: Duration,
    attempts: usize,
}

impl TrustDnsCollaborator {
    /// Configures resolver with the given per-request timeout and retry count.
    pub fn new(timeout: Duration, attempts: usize) -> Self {
        let mut opts = ResolverOpts::default();
        opts.timeout = timeout;
        opts.attempts = attempts;

        Self {
            resolver: TokioAsyncResolver::tokio(ResolverConfig::default(), opts),
            timeout,
            attempts,
        }
    }

    async fn lookup(&self, domain: &str, record_type: RecordType) -> Result<Vec<String>, DnsError> {
        let answer = self
            .resolver
            .lookup(domain, record_type)
            .await
            .map(|lookup| lookup.iter().map(|rdata| rdata.to_string()).collect())
            .map_err(|e| classify_error(&e));

        debug!(
            domain,
            ?record_type,
            ok = answer.is_ok(),
            timeout_ms = self.timeout.as_millis() as u64,
            attempts = self.attempts,
            "DNS lookup finished"
        );
        answer
    }
}

impl Default for TrustDnsCollaborator {
    /// 2 second timeout per request, 2 attempts.
    fn default() -> Self {
        Self::new(Duration::from_secs(2), 2)
    }
}

#[async_trait]
impl DnsCollaborator for TrustDnsCollaborator {
    async fn resolve_mx(&self, domain: &str) -> Result<Vec<String>, DnsError> {
        self.lookup(domain, RecordType::MX).await
    }

    async fn resolve_cname(&self, domain: &str) -> Result<Vec<String>, DnsError> {
        self.lookup(domain, RecordType::CNAME).await
    }

    async fn resolve_a(&self, domain: &str) -> Result<Vec<String>, DnsError> {
        self.lookup(domain, RecordType::A).await
    }

    async fn resolve_aaaa(&self, domain: &str) -> Result<Vec<String>, DnsError> {
        self.lookup(domain, RecordType::AAAA).await
    }
}

fn classify_error(e: &ResolveError) -> DnsError {
    match e.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => {
            if *response_code == ResponseCode::NXDomain {
                DnsError::NxDomain
            } else {
                DnsError::NoData
            }
        }
        ResolveErrorKind::Timeout => DnsError::Timeout,
        _ => DnsError::Other(e.to_string()),
    }
}
