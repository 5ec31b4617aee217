/// Grades an address by combining the scanner output with end-of-input checks,
/// optional DNS confirmation and TLD heuristics.
///
/// Two modes are offered:
/// 1. Boolean mode (no threshold): `true` when the status is below 16
/// 2. Diagnose mode (threshold given): the status code, collapsed to VALID when
///    it is below the threshold
///
/// # Examples
/// ```
/// use email_diagnosis::validation::aggregate::{validate_offline, ValidationOptions, Verdict};
/// use email_diagnosis::validation::diagnosis::Diagnosis;
///
/// let boolean = ValidationOptions::default();
/// assert_eq!(validate_offline("test@example.com", &boolean), Verdict::Valid(true));
///
/// let graded = ValidationOptions::diagnose(0);
/// assert_eq!(
///     validate_offline("\"quoted\"@example.com", &graded),
///     Verdict::Diagnosis(Diagnosis::Rfc5321QuotedString)
/// );
/// ```
pub mod aggregate;

/// Catalog of every diagnosis code with its severity band.
///
/// # Examples
/// ```
/// use email_diagnosis::validation::diagnosis::{Band, Diagnosis};
///
/// assert_eq!(Diagnosis::ErrNoDomain.code(), 131);
/// assert_eq!(Diagnosis::CfwsComment.band(), Band::Cfws);
/// ```
pub mod diagnosis;

/// Confirms an address domain through DNS.
///
/// This module performs the lookups behind the `check_dns` option:
/// 1. Checks for MX (Mail Exchange) records first
/// 2. Races CNAME, A and AAAA lookups if no MX records are found
///
/// Lookups go through the [`dnsmx::DnsCollaborator`] trait so callers can plug
/// in their own resolver. [`dnsmx::TrustDnsCollaborator`] is the default.
pub mod dnsmx;

/// Classifies the contents of a domain literal (`[...]`) as an IPv4 or IPv6
/// address literal or a general RFC 5322 literal.
pub mod literal;

/// Context-driven scanner for the RFC 5322 addr-spec grammar.
///
/// Supports:
/// - Nested comments and folding white space anywhere CFWS is allowed
/// - Quoted strings and quoted pairs
/// - Domain literals
/// - Obsolete forms, reported as deprecations rather than errors
///
/// # Examples
/// ```
/// use email_diagnosis::validation::scanner::scan;
///
/// let raw = scan("first.last@example.com");
/// assert_eq!(raw.local_part.text, "first.last");
/// assert_eq!(raw.domain.atoms, vec!["example", "com"]);
/// ```
pub mod scanner;
