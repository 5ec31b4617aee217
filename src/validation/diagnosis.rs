use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use utoipa::ToSchema;

/// Severity band a diagnosis belongs to.
///
/// Bands are ordered by their fixed ceilings; a code belongs to the first band
/// whose ceiling it does not exceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Band {
    Valid,
    DnsWarn,
    Rfc5321,
    Cfws,
    Deprec,
    Rfc5322,
    Err,
}

impl Band {
    pub const ALL: [Band; 7] = [
        Band::Valid,
        Band::DnsWarn,
        Band::Rfc5321,
        Band::Cfws,
        Band::Deprec,
        Band::Rfc5322,
        Band::Err,
    ];

    /// Highest code that still falls inside this band.
    pub const fn ceiling(self) -> u8 {
        match self {
            Band::Valid => 0,
            Band::DnsWarn => 7,
            Band::Rfc5321 => 15,
            Band::Cfws => 31,
            Band::Deprec => 63,
            Band::Rfc5322 => 127,
            Band::Err => 255,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Band::Valid => "VALID",
            Band::DnsWarn => "DNSWARN",
            Band::Rfc5321 => "RFC5321",
            Band::Cfws => "CFWS",
            Band::Deprec => "DEPREC",
            Band::Rfc5322 => "RFC5322",
            Band::Err => "ERR",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! diagnoses {
    ($($variant:ident = $code:literal, $name:literal, $description:literal;)+) => {
        /// Every outcome the address scanner can report.
        ///
        /// The numeric value is stable and places the diagnosis in its [`Band`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum Diagnosis {
            $($variant = $code,)+
        }

        impl Diagnosis {
            pub const ALL: &'static [Diagnosis] = &[$(Diagnosis::$variant,)+];

            /// Upper-case identifier, e.g. `RFC5321_QUOTEDSTRING`.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Diagnosis::$variant => $name,)+
                }
            }

            pub const fn description(self) -> &'static str {
                match self {
                    $(Diagnosis::$variant => $description,)+
                }
            }

            pub fn from_code(code: u8) -> Option<Diagnosis> {
                match code {
                    $($code => Some(Diagnosis::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

diagnoses! {
    Valid = 0, "VALID", "Address is valid";
    DnswarnNoMxRecord = 5, "DNSWARN_NO_MX_RECORD", "Couldn't find an MX record for this domain but an A-record does exist";
    DnswarnNoRecord = 6, "DNSWARN_NO_RECORD", "Couldn't find an MX record or an A-record for this domain";
    Rfc5321Tld = 9, "RFC5321_TLD", "Address is valid but at a Top Level Domain";
    Rfc5321TldNumeric = 10, "RFC5321_TLDNUMERIC", "Address is valid but the Top Level Domain begins with a number";
    Rfc5321QuotedString = 11, "RFC5321_QUOTEDSTRING", "Address is valid but contains a quoted string";
    Rfc5321AddressLiteral = 12, "RFC5321_ADDRESSLITERAL", "Address is valid but at a literal address not a domain";
    Rfc5321Ipv6Deprecated = 13, "RFC5321_IPV6DEPRECATED", "Address is valid but contains a :: that only elides one zero group";
    CfwsComment = 17, "CFWS_COMMENT", "Address contains comments";
    CfwsFws = 18, "CFWS_FWS", "Address contains Folding White Space";
    DeprecLocalPart = 33, "DEPREC_LOCALPART", "The local part is in a deprecated form";
    DeprecFws = 34, "DEPREC_FWS", "Address contains an obsolete form of Folding White Space";
    DeprecQtext = 35, "DEPREC_QTEXT", "A quoted string contains a deprecated character";
    DeprecQp = 36, "DEPREC_QP", "A quoted pair contains a deprecated character";
    DeprecComment = 37, "DEPREC_COMMENT", "Address contains a comment in a position that is deprecated";
    DeprecCtext = 38, "DEPREC_CTEXT", "A comment contains a deprecated character";
    DeprecCfwsNearAt = 49, "DEPREC_CFWS_NEAR_AT", "Address contains a comment or Folding White Space around the @ sign";
    Rfc5322Domain = 65, "RFC5322_DOMAIN", "Address is RFC 5322 compliant but contains domain characters that are not allowed by DNS";
    Rfc5322TooLong = 66, "RFC5322_TOOLONG", "Address is too long";
    Rfc5322LocalTooLong = 67, "RFC5322_LOCAL_TOOLONG", "The local part of the address is too long";
    Rfc5322DomainTooLong = 68, "RFC5322_DOMAIN_TOOLONG", "The domain part is too long";
    Rfc5322LabelTooLong = 69, "RFC5322_LABEL_TOOLONG", "The domain part contains an element that is too long";
    Rfc5322DomainLiteral = 70, "RFC5322_DOMAINLITERAL", "The domain literal is not a valid RFC 5321 address literal";
    Rfc5322DomLitObsDtext = 71, "RFC5322_DOMLIT_OBSDTEXT", "The domain literal is not a valid RFC 5321 address literal and it contains obsolete characters";
    Rfc5322Ipv6GrpCount = 72, "RFC5322_IPV6_GRPCOUNT", "The IPv6 literal address contains the wrong number of groups";
    Rfc5322Ipv6TwoDoubleColons = 73, "RFC5322_IPV6_2X2XCOLON", "The IPv6 literal address contains too many :: sequences";
    Rfc5322Ipv6BadChar = 74, "RFC5322_IPV6_BADCHAR", "The IPv6 address contains an illegal group of characters";
    Rfc5322Ipv6MaxGroups = 75, "RFC5322_IPV6_MAXGRPS", "The IPv6 address has too many groups";
    Rfc5322Ipv6ColonStart = 76, "RFC5322_IPV6_COLONSTRT", "IPv6 address starts with a single colon";
    Rfc5322Ipv6ColonEnd = 77, "RFC5322_IPV6_COLONEND", "IPv6 address ends with a single colon";
    ErrExpectingDtext = 129, "ERR_EXPECTING_DTEXT", "A domain literal contains a character that is not allowed";
    ErrNoLocalPart = 130, "ERR_NOLOCALPART", "Address has no local part";
    ErrNoDomain = 131, "ERR_NODOMAIN", "Address has no domain part";
    ErrConsecutiveDots = 132, "ERR_CONSECUTIVEDOTS", "The address may not contain consecutive dots";
    ErrAtextAfterCfws = 133, "ERR_ATEXT_AFTER_CFWS", "Address contains text after a comment or Folding White Space";
    ErrAtextAfterQs = 134, "ERR_ATEXT_AFTER_QS", "Address contains text after a quoted string";
    ErrAtextAfterDomLit = 135, "ERR_ATEXT_AFTER_DOMLIT", "Extra characters were found after the end of the domain literal";
    ErrExpectingQpair = 136, "ERR_EXPECTING_QPAIR", "The address contains a character that is not allowed in a quoted pair";
    ErrExpectingAtext = 137, "ERR_EXPECTING_ATEXT", "Address contains a character that is not allowed";
    ErrExpectingQtext = 138, "ERR_EXPECTING_QTEXT", "A quoted string contains a character that is not allowed";
    ErrExpectingCtext = 139, "ERR_EXPECTING_CTEXT", "A comment contains a character that is not allowed";
    ErrBackslashEnd = 140, "ERR_BACKSLASHEND", "The address can't end with a backslash";
    ErrDotStart = 141, "ERR_DOT_START", "Neither part of the address may begin with a dot";
    ErrDotEnd = 142, "ERR_DOT_END", "Neither part of the address may end with a dot";
    ErrDomainHyphenStart = 143, "ERR_DOMAINHYPHENSTART", "A domain or subdomain cannot begin with a hyphen";
    ErrDomainHyphenEnd = 144, "ERR_DOMAINHYPHENEND", "A domain or subdomain cannot end with a hyphen";
    ErrUnclosedQuotedStr = 145, "ERR_UNCLOSEDQUOTEDSTR", "Unclosed quoted string";
    ErrUnclosedComment = 146, "ERR_UNCLOSEDCOMMENT", "Unclosed comment";
    ErrUnclosedDomLit = 147, "ERR_UNCLOSEDDOMLIT", "Domain literal is missing its closing bracket";
    ErrFwsCrlfX2 = 148, "ERR_FWS_CRLF_X2", "Folding White Space contains consecutive CRLF sequences";
    ErrFwsCrlfEnd = 149, "ERR_FWS_CRLF_END", "Folding White Space ends with a CRLF sequence";
    ErrCrNoLf = 150, "ERR_CR_NO_LF", "Address contains a carriage return that is not followed by a line feed";
}

impl Diagnosis {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn band(self) -> Band {
        band_of(self.code())
    }

    /// True once the diagnosis is beyond repair by anything later in the input.
    pub fn is_fatal(self) -> bool {
        self.code() > Band::Rfc5322.ceiling()
    }
}

impl PartialOrd for Diagnosis {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Diagnosis {
    fn cmp(&self, other: &Self) -> Ordering {
        self.code().cmp(&other.code())
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Diagnosis {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Returns the band whose ceiling `code` first falls under.
pub fn band_of(code: u8) -> Band {
    Band::ALL
        .into_iter()
        .find(|band| code <= band.ceiling())
        .unwrap_or(Band::Err)
}

/// Numerically largest diagnosis.
///
/// # Panics
/// On an empty slice. Callers always seed their list with [`Diagnosis::Valid`].
pub fn max_of(diagnoses: &[Diagnosis]) -> Diagnosis {
    diagnoses
        .iter()
        .copied()
        .max()
        .expect("diagnosis list must be seeded with VALID")
}
