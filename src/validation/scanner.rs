use super::diagnosis::{Band, Diagnosis};
use super::literal::classify_address_literal;

/// US-ASCII visible characters that may not appear in atext.
const SPECIALS: &str = "()<>[]:;@\\,.\"";

/// RFC 5321 section 4.5.3.1.1: local-part is at most 64 octets.
pub const MAX_LOCAL_PART_OCTETS: usize = 64;
/// RFC 1035 section 2.3.4: labels are 63 octets or less.
pub const MAX_LABEL_OCTETS: usize = 63;

/// Grammar context the scanner is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseContext {
    LocalPart,
    Domain,
    DomainLiteral,
    Comment,
    FoldingWhitespace,
    QuotedString,
    QuotedPair,
}

/// Text and element bookkeeping for one side of the `@`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementTracking {
    /// Everything accepted into this component, CFWS excluded.
    pub text: String,
    /// Dot-separated elements; the last one is the element being scanned.
    pub atoms: Vec<String>,
    pub element_count: usize,
    /// Octets in the current element since the last separator.
    pub element_length: usize,
    /// Domain only: the last character of the current label was a hyphen.
    pub hyphen_flag: bool,
    /// Nothing but a separator, a closing quote or the end may follow.
    pub assert_end: bool,
}

impl Default for ElementTracking {
    fn default() -> Self {
        Self {
            text: String::new(),
            atoms: vec![String::new()],
            element_count: 0,
            element_length: 0,
            hyphen_flag: false,
            assert_end: false,
        }
    }
}

impl ElementTracking {
    pub fn current_atom(&self) -> &str {
        &self.atoms[self.element_count]
    }

    fn push_char(&mut self, c: char) {
        self.text.push(c);
        self.atoms[self.element_count].push(c);
        self.element_length += 1;
    }

    /// Quoted pairs keep their backslash: RFC 5321 limits count octets.
    fn push_quoted_pair(&mut self, c: char) {
        for unit in ['\\', c] {
            self.text.push(unit);
            self.atoms[self.element_count].push(unit);
        }
        self.element_length += 2;
    }

    fn next_element(&mut self) {
        self.text.push('.');
        self.element_count += 1;
        self.atoms.push(String::new());
        self.element_length = 0;
        self.assert_end = false;
    }
}

/// Everything the scan learned, before any end-of-input checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawScanResult {
    /// In the order they were raised; may contain duplicates.
    pub diagnoses: Vec<Diagnosis>,
    pub local_part: ElementTracking,
    pub domain: ElementTracking,
    /// Inner text of the domain literal, quoted pairs excluded.
    pub literal: String,
    /// Context the scan stopped in.
    pub context: ParseContext,
    /// The last unit scanned was a carriage return.
    pub ended_on_cr: bool,
    /// The scan got past the `@`.
    pub reached_domain: bool,
}

impl RawScanResult {
    fn active(&self) -> &ElementTracking {
        if self.reached_domain {
            &self.domain
        } else {
            &self.local_part
        }
    }

    pub fn element_count(&self) -> usize {
        self.active().element_count
    }

    pub fn element_length(&self) -> usize {
        self.active().element_length
    }

    pub fn hyphen_flag(&self) -> bool {
        self.active().hyphen_flag
    }

    /// Highest severity raised so far.
    pub fn worst(&self) -> Diagnosis {
        self.diagnoses.iter().copied().max().unwrap_or(Diagnosis::Valid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Advance,
    /// Leave the unit in place so the resumed context sees it again.
    Reprocess,
}

struct Scanner {
    units: Vec<char>,
    pos: usize,
    current: ParseContext,
    previous: ParseContext,
    stack: Vec<ParseContext>,
    local: ElementTracking,
    domain: ElementTracking,
    literal: String,
    reached_domain: bool,
    diagnoses: Vec<Diagnosis>,
    worst: Diagnosis,
    token: Option<char>,
    prev_token: Option<char>,
    crlf_count: usize,
}

/// Runs the addr-spec state machine over `input`.
///
/// Scanning stops as soon as a diagnosis beyond the RFC 5322 band is raised.
pub fn scan(input: &str) -> RawScanResult {
    Scanner::new(input).run()
}

impl Scanner {
    fn new(input: &str) -> Self {
        Self {
            units: input.chars().collect(),
            pos: 0,
            current: ParseContext::LocalPart,
            previous: ParseContext::LocalPart,
            stack: vec![ParseContext::LocalPart],
            local: ElementTracking::default(),
            domain: ElementTracking::default(),
            literal: String::new(),
            reached_domain: false,
            diagnoses: vec![Diagnosis::Valid],
            worst: Diagnosis::Valid,
            token: None,
            prev_token: None,
            crlf_count: 0,
        }
    }

    fn run(mut self) -> RawScanResult {
        while let Some(&token) = self.units.get(self.pos) {
            self.token = Some(token);

            let step = match self.current {
                ParseContext::LocalPart => self.local_part(token),
                ParseContext::Domain => self.domain_part(token),
                ParseContext::DomainLiteral => self.domain_literal(token),
                ParseContext::QuotedString => self.quoted_string(token),
                ParseContext::QuotedPair => self.quoted_pair(token),
                ParseContext::Comment => self.comment(token),
                ParseContext::FoldingWhitespace => self.folding_whitespace(token),
            };

            if step == Step::Advance {
                self.pos += 1;
            }

            if self.worst.is_fatal() {
                break;
            }
        }

        RawScanResult {
            diagnoses: self.diagnoses,
            local_part: self.local,
            domain: self.domain,
            literal: self.literal,
            context: self.current,
            ended_on_cr: self.token == Some('\r'),
            reached_domain: self.reached_domain,
        }
    }

    fn push(&mut self, diagnosis: Diagnosis) {
        self.diagnoses.push(diagnosis);
        self.worst = self.worst.max(diagnosis);
    }

    fn enter(&mut self, context: ParseContext) {
        self.stack.push(self.current);
        self.current = context;
    }

    fn exit(&mut self) {
        self.previous = self.current;
        self.current = self
            .stack
            .pop()
            .expect("context stack is never empty while scanning");
    }

    /// Consumes the LF that must follow a CR. Returns false after recording
    /// `ERR_CR_NO_LF`.
    fn expect_lf(&mut self) -> bool {
        self.pos += 1;
        if self.units.get(self.pos) == Some(&'\n') {
            true
        } else {
            self.push(Diagnosis::ErrCrNoLf);
            false
        }
    }

    fn local_part(&mut self, token: char) -> Step {
        let length = self.local.element_length;
        let count = self.local.element_count;

        match token {
            '(' => {
                if length == 0 {
                    self.push(if count == 0 {
                        Diagnosis::CfwsComment
                    } else {
                        Diagnosis::DeprecComment
                    });
                } else {
                    self.push(Diagnosis::CfwsComment);
                    self.local.assert_end = true;
                }
                self.enter(ParseContext::Comment);
            }
            '.' => {
                if length == 0 {
                    self.push(if count == 0 {
                        Diagnosis::ErrDotStart
                    } else {
                        Diagnosis::ErrConsecutiveDots
                    });
                } else {
                    // A quoted string as one word among several is obs-local-part.
                    if self.local.assert_end {
                        self.push(Diagnosis::DeprecLocalPart);
                    }
                    self.local.next_element();
                }
            }
            '"' => {
                if length == 0 {
                    self.push(if count == 0 {
                        Diagnosis::Rfc5321QuotedString
                    } else {
                        Diagnosis::DeprecLocalPart
                    });
                    self.local.push_char(token);
                    self.local.assert_end = true;
                    self.enter(ParseContext::QuotedString);
                } else {
                    self.push(Diagnosis::ErrExpectingAtext);
                }
            }
            '\r' | ' ' | '\t' => {
                if token == '\r' && !self.expect_lf() {
                    return Step::Advance;
                }
                if length == 0 {
                    self.push(if count == 0 {
                        Diagnosis::CfwsFws
                    } else {
                        Diagnosis::DeprecFws
                    });
                } else {
                    self.local.assert_end = true;
                }
                self.enter(ParseContext::FoldingWhitespace);
                self.prev_token = Some(token);
            }
            '@' => {
                assert_eq!(
                    self.stack.len(),
                    1,
                    "only the local part may be on the context stack at '@'"
                );

                if self.local.text.is_empty() {
                    self.push(Diagnosis::ErrNoLocalPart);
                } else if length == 0 {
                    self.push(Diagnosis::ErrDotEnd);
                } else if self.local.text.len() > MAX_LOCAL_PART_OCTETS {
                    self.push(Diagnosis::Rfc5322LocalTooLong);
                } else if matches!(
                    self.previous,
                    ParseContext::Comment | ParseContext::FoldingWhitespace
                ) {
                    // RFC 5322 3.4.1: CFWS SHOULD NOT be used around the "@".
                    self.push(Diagnosis::DeprecCfwsNearAt);
                }

                self.current = ParseContext::Domain;
                self.stack = vec![ParseContext::Domain];
                self.domain = ElementTracking::default();
                self.reached_domain = true;
            }
            _ => {
                if self.local.assert_end {
                    let diagnosis = match self.previous {
                        ParseContext::Comment | ParseContext::FoldingWhitespace => {
                            Diagnosis::ErrAtextAfterCfws
                        }
                        ParseContext::QuotedString => Diagnosis::ErrAtextAfterQs,
                        other => unreachable!("atext after end of element, previous context {other:?}"),
                    };
                    self.push(diagnosis);
                } else {
                    self.previous = ParseContext::LocalPart;
                    if !is_atext(token) {
                        self.push(Diagnosis::ErrExpectingAtext);
                    }
                    self.local.push_char(token);
                }
            }
        }

        Step::Advance
    }

    fn domain_part(&mut self, token: char) -> Step {
        let length = self.domain.element_length;
        let count = self.domain.element_count;

        match token {
            '(' => {
                if length == 0 {
                    self.push(if count == 0 {
                        Diagnosis::DeprecCfwsNearAt
                    } else {
                        Diagnosis::DeprecComment
                    });
                } else {
                    self.push(Diagnosis::CfwsComment);
                    self.domain.assert_end = true;
                }
                self.enter(ParseContext::Comment);
            }
            '.' => {
                if length == 0 {
                    self.push(if count == 0 {
                        Diagnosis::ErrDotStart
                    } else {
                        Diagnosis::ErrConsecutiveDots
                    });
                } else if self.domain.hyphen_flag {
                    self.push(Diagnosis::ErrDomainHyphenEnd);
                } else if length > MAX_LABEL_OCTETS {
                    self.push(Diagnosis::Rfc5322LabelTooLong);
                }
                self.domain.next_element();
            }
            '[' => {
                if self.domain.text.is_empty() {
                    // The literal has to be the whole domain.
                    self.domain.assert_end = true;
                    self.domain.push_char(token);
                    self.literal.clear();
                    self.enter(ParseContext::DomainLiteral);
                } else {
                    self.push(Diagnosis::ErrExpectingAtext);
                }
            }
            '\r' | ' ' | '\t' => {
                if token == '\r' && !self.expect_lf() {
                    return Step::Advance;
                }
                if length == 0 {
                    self.push(if count == 0 {
                        Diagnosis::DeprecCfwsNearAt
                    } else {
                        Diagnosis::DeprecFws
                    });
                } else {
                    self.push(Diagnosis::CfwsFws);
                    self.domain.assert_end = true;
                }
                self.enter(ParseContext::FoldingWhitespace);
                self.prev_token = Some(token);
            }
            _ => {
                if self.domain.assert_end {
                    let diagnosis = match self.previous {
                        ParseContext::Comment | ParseContext::FoldingWhitespace => {
                            Diagnosis::ErrAtextAfterCfws
                        }
                        ParseContext::DomainLiteral => Diagnosis::ErrAtextAfterDomLit,
                        other => unreachable!("atext after end of label, previous context {other:?}"),
                    };
                    self.push(diagnosis);
                }

                self.domain.hyphen_flag = false;
                if !is_atext(token) {
                    self.push(Diagnosis::ErrExpectingAtext);
                } else if token == '-' {
                    if length == 0 {
                        self.push(Diagnosis::ErrDomainHyphenStart);
                    }
                    self.domain.hyphen_flag = true;
                } else if !token.is_ascii_alphanumeric() {
                    // Legal atext, but RFC 5321 sub-domains are letter-digit-hyphen.
                    self.push(Diagnosis::Rfc5322Domain);
                }
                self.domain.push_char(token);
            }
        }

        Step::Advance
    }

    fn domain_literal(&mut self, token: char) -> Step {
        match token {
            ']' => {
                let diagnosis = if self.worst.code() < Band::Deprec.ceiling() {
                    classify_address_literal(&self.literal)
                } else {
                    Diagnosis::Rfc5322DomainLiteral
                };
                self.push(diagnosis);
                self.domain.push_char(token);
                self.exit();
            }
            '\\' => {
                self.push(Diagnosis::Rfc5322DomLitObsDtext);
                self.enter(ParseContext::QuotedPair);
            }
            '\r' | ' ' | '\t' => {
                if token == '\r' && !self.expect_lf() {
                    return Step::Advance;
                }
                self.push(Diagnosis::CfwsFws);
                self.enter(ParseContext::FoldingWhitespace);
                self.prev_token = Some(token);
            }
            _ => {
                let code = u32::from(token);
                if code > 127 || code == 0 || token == '[' {
                    self.push(Diagnosis::ErrExpectingDtext);
                    return Step::Advance;
                }
                if code < 33 || code == 127 {
                    self.push(Diagnosis::Rfc5322DomLitObsDtext);
                }
                self.literal.push(token);
                self.domain.push_char(token);
            }
        }

        Step::Advance
    }

    fn quoted_string(&mut self, token: char) -> Step {
        match token {
            '\\' => self.enter(ParseContext::QuotedPair),
            // A plain space is qtext here; only HTAB or a fold makes it FWS.
            '\r' | '\t' => {
                if token == '\r' && !self.expect_lf() {
                    return Step::Advance;
                }
                self.local.push_char(' ');
                self.push(Diagnosis::CfwsFws);
                self.enter(ParseContext::FoldingWhitespace);
                self.prev_token = Some(token);
            }
            '"' => {
                self.local.push_char(token);
                self.exit();
            }
            _ => {
                let code = u32::from(token);
                if code > 127 || code == 0 || code == 10 {
                    self.push(Diagnosis::ErrExpectingQtext);
                } else if code < 32 || code == 127 {
                    self.push(Diagnosis::DeprecQtext);
                }
                self.local.push_char(token);
            }
        }

        Step::Advance
    }

    fn quoted_pair(&mut self, token: char) -> Step {
        let code = u32::from(token);
        if code > 127 {
            self.push(Diagnosis::ErrExpectingQpair);
        } else if (code < 32 && token != '\t') || code == 127 {
            self.push(Diagnosis::DeprecQp);
        }

        self.exit();
        match self.current {
            ParseContext::Comment => {}
            ParseContext::QuotedString => self.local.push_quoted_pair(token),
            ParseContext::DomainLiteral => self.domain.push_quoted_pair(token),
            other => unreachable!("quoted pair opened from {other:?}"),
        }

        Step::Advance
    }

    fn comment(&mut self, token: char) -> Step {
        match token {
            '(' => self.enter(ParseContext::Comment),
            // Comments are semantically invisible: nothing reaches the text.
            ')' => self.exit(),
            '\\' => self.enter(ParseContext::QuotedPair),
            '\r' | ' ' | '\t' => {
                if token == '\r' && !self.expect_lf() {
                    return Step::Advance;
                }
                self.push(Diagnosis::CfwsFws);
                self.enter(ParseContext::FoldingWhitespace);
                self.prev_token = Some(token);
            }
            _ => {
                let code = u32::from(token);
                if code > 127 || code == 0 || code == 10 {
                    self.push(Diagnosis::ErrExpectingCtext);
                } else if code < 32 || code == 127 {
                    self.push(Diagnosis::DeprecCtext);
                }
            }
        }

        Step::Advance
    }

    /// FWS = ([*WSP CRLF] 1*WSP) / obs-FWS, where obs-FWS allows repeated folds
    /// (RFC 5322 erratum 1908).
    fn folding_whitespace(&mut self, token: char) -> Step {
        if self.prev_token == Some('\r') {
            if token == '\r' {
                self.push(Diagnosis::ErrFwsCrlfX2);
                return Step::Advance;
            }
            self.crlf_count += 1;
            if self.crlf_count > 1 {
                self.push(Diagnosis::DeprecFws);
            }
        }

        let step = match token {
            '\r' => {
                self.expect_lf();
                Step::Advance
            }
            ' ' | '\t' => Step::Advance,
            _ => {
                if self.prev_token == Some('\r') {
                    self.push(Diagnosis::ErrFwsCrlfEnd);
                }
                self.crlf_count = 0;
                self.exit();
                Step::Reprocess
            }
        };

        self.prev_token = Some(token);
        step
    }
}

fn is_atext(c: char) -> bool {
    matches!(u32::from(c), 33..=126) && !SPECIALS.contains(c)
}
