use super::diagnosis::{Band, Diagnosis, max_of};
use super::dnsmx::{DnsCollaborator, confirm_domain};
use super::scanner::{MAX_LABEL_OCTETS, ParseContext, RawScanResult, scan};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

/// RFC 5321 section 4.5.3.1.2: a domain is at most 255 octets.
const MAX_DOMAIN_OCTETS: usize = 255;
/// RFC 5321 section 4.5.3.1.3 via erratum 1690: a forward-path carries at most
/// 254 octets of address.
const MAX_ADDRESS_OCTETS: usize = 254;

/// Boolean mode accepts anything below the CFWS band.
pub const BOOLEAN_THRESHOLD: u8 = Band::Rfc5321.ceiling() + 1;

/// Caller options for one validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidationOptions {
    /// Confirm the domain exists through DNS.
    #[serde(default)]
    pub check_dns: bool,
    /// Present: diagnose mode, statuses below it collapse to VALID.
    /// Absent: boolean mode with a fixed cut-line.
    #[serde(default)]
    pub threshold: Option<i32>,
}

impl ValidationOptions {
    pub fn diagnose(threshold: i32) -> Self {
        Self {
            check_dns: false,
            threshold: Some(threshold),
        }
    }

    pub fn with_dns(mut self) -> Self {
        self.check_dns = true;
        self
    }
}

/// Outcome of `validate`: a diagnosis code in diagnose mode, a flag otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Verdict {
    Diagnosis(Diagnosis),
    Valid(bool),
}

impl Verdict {
    pub fn is_valid(self) -> bool {
        match self {
            Verdict::Diagnosis(diagnosis) => diagnosis.code() < BOOLEAN_THRESHOLD,
            Verdict::Valid(valid) => valid,
        }
    }
}

/// Every diagnosis raised for an address and the most severe of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// First-occurrence order, no duplicates. A lone VALID means nothing was
    /// found.
    pub diagnoses: Vec<Diagnosis>,
    pub status: Diagnosis,
    /// DNS found a record for the domain.
    pub dns_confirmed: bool,
}

/// Runs the end-of-input checks, the optional DNS confirmation and the TLD
/// heuristics over a finished scan.
///
/// DNS is consulted only when `options.check_dns` is set, a collaborator is
/// supplied and nothing worse than a DNS warning has been raised.
pub async fn diagnose(
    raw: RawScanResult,
    options: &ValidationOptions,
    dns: Option<&dyn DnsCollaborator>,
) -> Report {
    let mut diagnoses = raw.diagnoses.clone();
    check_end_of_input(&raw, &mut diagnoses);

    let mut dns_confirmed = false;
    if let Some(dns) = dns
        && options.check_dns
        && max_of(&diagnoses).code() < Band::DnsWarn.ceiling()
    {
        let name = dns_name(&raw);
        let confirmation = confirm_domain(dns, &name).await;
        diagnoses.extend(confirmation.diagnoses);
        dns_confirmed = confirmation.confirmed;
    }

    conclude(&raw, diagnoses, dns_confirmed)
}

/// [`diagnose`] without any DNS lookups.
pub fn diagnose_offline(raw: RawScanResult) -> Report {
    let mut diagnoses = raw.diagnoses.clone();
    check_end_of_input(&raw, &mut diagnoses);
    conclude(&raw, diagnoses, false)
}

/// Applies the caller's mode to a report.
pub fn verdict(report: &Report, options: &ValidationOptions) -> Verdict {
    match options.threshold {
        Some(threshold) if i32::from(report.status.code()) < threshold => {
            Verdict::Diagnosis(Diagnosis::Valid)
        }
        Some(_) => Verdict::Diagnosis(report.status),
        None => Verdict::Valid(report.status.code() < BOOLEAN_THRESHOLD),
    }
}

pub async fn finalize(
    raw: RawScanResult,
    options: &ValidationOptions,
    dns: Option<&dyn DnsCollaborator>,
) -> Verdict {
    let report = diagnose(raw, options, dns).await;
    verdict(&report, options)
}

/// Scans and grades `email`.
pub async fn validate(
    email: &str,
    options: &ValidationOptions,
    dns: Option<&dyn DnsCollaborator>,
) -> Verdict {
    finalize(scan(email), options, dns).await
}

/// Synchronous [`validate`]; `check_dns` has no effect here.
pub fn validate_offline(email: &str, options: &ValidationOptions) -> Verdict {
    let report = diagnose_offline(scan(email));
    verdict(&report, options)
}

fn check_end_of_input(raw: &RawScanResult, diagnoses: &mut Vec<Diagnosis>) {
    if max_of(diagnoses).code() >= Band::Rfc5322.ceiling() {
        return;
    }

    let local_octets = raw.local_part.text.len();
    let domain_octets = raw.domain.text.len();

    let found = match raw.context {
        ParseContext::QuotedString => Some(Diagnosis::ErrUnclosedQuotedStr),
        ParseContext::QuotedPair => Some(Diagnosis::ErrBackslashEnd),
        ParseContext::Comment => Some(Diagnosis::ErrUnclosedComment),
        ParseContext::DomainLiteral => Some(Diagnosis::ErrUnclosedDomLit),
        _ if raw.ended_on_cr => Some(Diagnosis::ErrFwsCrlfEnd),
        _ if domain_octets == 0 => Some(Diagnosis::ErrNoDomain),
        _ if raw.element_length() == 0 => Some(Diagnosis::ErrDotEnd),
        _ if raw.hyphen_flag() => Some(Diagnosis::ErrDomainHyphenEnd),
        _ if domain_octets > MAX_DOMAIN_OCTETS => Some(Diagnosis::Rfc5322DomainTooLong),
        _ if local_octets + 1 + domain_octets > MAX_ADDRESS_OCTETS => {
            Some(Diagnosis::Rfc5322TooLong)
        }
        _ if raw.element_length() > MAX_LABEL_OCTETS => Some(Diagnosis::Rfc5322LabelTooLong),
        _ => None,
    };

    if let Some(diagnosis) = found {
        diagnoses.push(diagnosis);
    }
}

/// Single-label domains are queried root-relative.
fn dns_name(raw: &RawScanResult) -> String {
    if raw.domain.element_count == 0 {
        format!("{}.", raw.domain.text)
    } else {
        raw.domain.text.clone()
    }
}

fn conclude(raw: &RawScanResult, mut diagnoses: Vec<Diagnosis>, dns_confirmed: bool) -> Report {
    if !dns_confirmed && max_of(&diagnoses).code() < Band::DnsWarn.ceiling() {
        if raw.domain.element_count == 0 {
            diagnoses.push(Diagnosis::Rfc5321Tld);
        } else if raw
            .domain
            .current_atom()
            .starts_with(|c: char| c.is_ascii_digit())
        {
            diagnoses.push(Diagnosis::Rfc5321TldNumeric);
        }
    }

    let mut unique = Vec::with_capacity(diagnoses.len());
    for diagnosis in diagnoses {
        if !unique.contains(&diagnosis) {
            unique.push(diagnosis);
        }
    }
    if unique.len() > 1 && unique[0] == Diagnosis::Valid {
        unique.remove(0);
    }

    let status = max_of(&unique);
    debug!(
        local = %raw.local_part.text,
        domain = %raw.domain.text,
        status = status.name(),
        found = unique.len(),
        "address diagnosed"
    );

    Report {
        diagnoses: unique,
        status,
        dns_confirmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::dnsmx::DnsError;
    use async_trait::async_trait;

    /// Answers every lookup with the same records.
    struct FixedDns(Vec<String>);

    #[async_trait]
    impl DnsCollaborator for FixedDns {
        async fn resolve_mx(&self, _domain: &str) -> Result<Vec<String>, DnsError> {
            Ok(self.0.clone())
        }
        async fn resolve_cname(&self, _domain: &str) -> Result<Vec<String>, DnsError> {
            Ok(self.0.clone())
        }
        async fn resolve_a(&self, _domain: &str) -> Result<Vec<String>, DnsError> {
            Ok(self.0.clone())
        }
        async fn resolve_aaaa(&self, _domain: &str) -> Result<Vec<String>, DnsError> {
            Ok(self.0.clone())
        }
    }

    fn status(email: &str) -> Diagnosis {
        diagnose_offline(scan(email)).status
    }

    #[test]
    fn boolean_and_diagnose_modes() {
        let boolean = ValidationOptions::default();
        let graded = ValidationOptions::diagnose(0);

        assert_eq!(validate_offline("test@example.com", &boolean), Verdict::Valid(true));
        assert_eq!(
            validate_offline("test@example.com", &graded),
            Verdict::Diagnosis(Diagnosis::Valid)
        );
        assert_eq!(validate_offline("test@", &boolean), Verdict::Valid(false));
        assert_eq!(
            validate_offline("test@", &graded),
            Verdict::Diagnosis(Diagnosis::ErrNoDomain)
        );
    }

    #[test]
    fn graded_examples() {
        assert_eq!(status("john..doe@example.com"), Diagnosis::ErrConsecutiveDots);
        assert_eq!(status("\"quoted\"@example.com"), Diagnosis::Rfc5321QuotedString);
        assert_eq!(status("test@[IPv6:2001:db8::1]"), Diagnosis::Rfc5321AddressLiteral);
        assert_eq!(
            status(&format!("{}@example.com", "a".repeat(65))),
            Diagnosis::Rfc5322LocalTooLong
        );
    }

    #[test]
    fn boolean_cut_line_is_fixed() {
        let boolean = ValidationOptions::default();
        assert_eq!(validate_offline("\"quoted\"@example.com", &boolean), Verdict::Valid(true));
        assert_eq!(
            validate_offline(&format!("{}@example.com", "a".repeat(65)), &boolean),
            Verdict::Valid(false)
        );
        assert_eq!(validate_offline("(c)test@example.com", &boolean), Verdict::Valid(false));
    }

    #[test]
    fn threshold_collapses_to_valid() {
        let email = "\"quoted\"@example.com";
        assert_eq!(
            validate_offline(email, &ValidationOptions::diagnose(12)),
            Verdict::Diagnosis(Diagnosis::Valid)
        );
        assert_eq!(
            validate_offline(email, &ValidationOptions::diagnose(11)),
            Verdict::Diagnosis(Diagnosis::Rfc5321QuotedString)
        );
        // A threshold above the boolean cut-line still reports the code.
        assert_eq!(
            validate_offline("(c)test@example.com", &ValidationOptions::diagnose(100)),
            Verdict::Diagnosis(Diagnosis::Valid)
        );
        assert_eq!(
            validate_offline("(c)test@example.com", &ValidationOptions::diagnose(17)),
            Verdict::Diagnosis(Diagnosis::CfwsComment)
        );
    }

    #[test]
    fn addresses_without_at_have_no_domain() {
        for email in ["test", "\"test\"", "test.test", "(comment)test"] {
            let report = diagnose_offline(scan(email));
            assert!(
                matches!(report.status, Diagnosis::ErrNoDomain | Diagnosis::ErrNoLocalPart),
                "{email}: {}",
                report.status
            );
        }
    }

    #[test]
    fn end_of_input_checks() {
        assert_eq!(status("\"test@example.com"), Diagnosis::ErrUnclosedQuotedStr);
        assert_eq!(status("test(comment@example.com"), Diagnosis::ErrUnclosedComment);
        assert_eq!(status("test@[1.2.3.4"), Diagnosis::ErrUnclosedDomLit);
        assert_eq!(status("test@example.com\r\n"), Diagnosis::ErrFwsCrlfEnd);
        assert_eq!(status("test@example."), Diagnosis::ErrDotEnd);
        assert_eq!(status("test@example-"), Diagnosis::ErrDomainHyphenEnd);
        assert_eq!(status("test@"), Diagnosis::ErrNoDomain);
    }

    #[test]
    fn unclosed_quoted_pair_is_backslash_end() {
        assert_eq!(status("\"test\\"), Diagnosis::ErrBackslashEnd);
    }

    #[test]
    fn length_limits() {
        let label = "a".repeat(64);
        assert_eq!(status(&format!("test@example.{label}")), Diagnosis::Rfc5322LabelTooLong);
        assert_eq!(status(&format!("test@{label}.com")), Diagnosis::Rfc5322LabelTooLong);

        let long_domain = vec!["a".repeat(63); 4].join(".");
        assert_eq!(long_domain.len(), 255);
        assert_eq!(status(&format!("a@{long_domain}")), Diagnosis::Rfc5322TooLong);
        assert_eq!(
            status(&format!("a@{long_domain}a")),
            Diagnosis::Rfc5322DomainTooLong
        );
    }

    #[test]
    fn tld_heuristics() {
        assert_eq!(status("test@localhost"), Diagnosis::Rfc5321Tld);
        assert_eq!(status("test@example.123"), Diagnosis::Rfc5321TldNumeric);
        assert_eq!(status("test@123.com"), Diagnosis::Valid);
    }

    #[test]
    fn diagnoses_are_deduplicated_in_order() {
        let report = diagnose_offline(scan("(a)test(b)@(c)example.com"));
        assert_eq!(
            report.diagnoses,
            vec![Diagnosis::CfwsComment, Diagnosis::DeprecCfwsNearAt]
        );
        assert_eq!(report.status, Diagnosis::DeprecCfwsNearAt);

        let report = diagnose_offline(scan("test@example.com"));
        assert_eq!(report.diagnoses, vec![Diagnosis::Valid]);
    }

    #[test]
    fn results_are_repeatable() {
        let options = ValidationOptions::diagnose(0);
        for email in ["test@example.com", "a(b)@c", "\"x\\y\"@[1.2.3.4]", "@", ""] {
            assert_eq!(
                validate_offline(email, &options),
                validate_offline(email, &options)
            );
        }
    }

    #[test]
    fn verdict_serializes_by_mode() {
        assert_eq!(serde_json::to_string(&Verdict::Valid(true)).unwrap(), "true");
        assert_eq!(
            serde_json::to_string(&Verdict::Diagnosis(Diagnosis::ErrNoDomain)).unwrap(),
            "131"
        );
    }

    #[test]
    fn options_default_from_empty_json() {
        let options: ValidationOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, ValidationOptions::default());
        assert!(!options.check_dns);
        assert_eq!(options.threshold, None);
    }

    #[tokio::test]
    async fn missing_records_warn_but_pass_boolean_mode() {
        let dns = FixedDns(Vec::new());
        let email = "test@example.com";

        let graded = ValidationOptions::diagnose(0).with_dns();
        assert_eq!(
            validate(email, &graded, Some(&dns)).await,
            Verdict::Diagnosis(Diagnosis::DnswarnNoRecord)
        );

        let boolean = ValidationOptions::default().with_dns();
        assert_eq!(validate(email, &boolean, Some(&dns)).await, Verdict::Valid(true));

        let report = diagnose(scan(email), &graded, Some(&dns)).await;
        assert_eq!(
            report.diagnoses,
            vec![Diagnosis::DnswarnNoMxRecord, Diagnosis::DnswarnNoRecord]
        );
        assert!(!report.dns_confirmed);
    }

    #[tokio::test]
    async fn confirmed_domain_skips_tld_heuristics() {
        let dns = FixedDns(vec!["10 mx.localhost.".to_string()]);
        let options = ValidationOptions::diagnose(0).with_dns();

        let report = diagnose(scan("test@localhost"), &options, Some(&dns)).await;
        assert!(report.dns_confirmed);
        assert_eq!(report.status, Diagnosis::Valid);
    }

    #[tokio::test]
    async fn dns_skipped_when_disabled_or_already_graded() {
        let dns = FixedDns(Vec::new());

        let offline = ValidationOptions::diagnose(0);
        let report = diagnose(scan("test@example.com"), &offline, Some(&dns)).await;
        assert_eq!(report.status, Diagnosis::Valid);

        let options = ValidationOptions::diagnose(0).with_dns();
        let report = diagnose(scan("\"quoted\"@example.com"), &options, Some(&dns)).await;
        assert_eq!(report.status, Diagnosis::Rfc5321QuotedString);
        assert!(!report.diagnoses.contains(&Diagnosis::DnswarnNoRecord));

        let report = diagnose(scan("test@example.com"), &options, None).await;
        assert_eq!(report.status, Diagnosis::Valid);
    }

    #[test]
    fn single_label_domains_are_root_relative() {
        assert_eq!(dns_name(&scan("test@localhost")), "localhost.");
        assert_eq!(dns_name(&scan("test@example.com")), "example.com");
    }

    #[test]
    fn finalize_blocks_on_runtime() {
        let verdict = tokio_test::block_on(finalize(
            scan("test@example.com"),
            &ValidationOptions::default(),
            None,
        ));
        assert_eq!(verdict, Verdict::Valid(true));
    }
}
