use super::diagnosis::Diagnosis;

const IPV6_PREFIX: &str = "ipv6:";
const IPV6_MAX_GROUPS: usize = 8;

/// Classifies the text between `[` and `]` of a domain literal.
///
/// A bare dotted quad is an RFC 5321 IPv4 address literal, `IPv6:` introduces
/// an IPv6 address literal, anything else is only a general RFC 5322 literal.
/// When the IPv6 form breaks both a grouping rule and a shape rule, the more
/// severe of the two is reported.
pub fn classify_address_literal(literal: &str) -> Diagnosis {
    let mut address = literal.to_string();

    if let Some(index) = ipv4_tail(literal) {
        if index == 0 {
            return Diagnosis::Rfc5321AddressLiteral;
        }
        // An IPv4 tail stands in for the last two IPv6 groups.
        address.truncate(index);
        address.push_str("0:0");
    }

    let is_ipv6 = address
        .get(..IPV6_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(IPV6_PREFIX));
    if !is_ipv6 {
        return Diagnosis::Rfc5322DomainLiteral;
    }

    let ipv6 = &address[IPV6_PREFIX.len()..];
    let grouping = check_grouping(ipv6);
    let shape = check_shape(ipv6);

    match grouping {
        Some(grouping) => grouping.max(shape),
        None => shape,
    }
}

fn check_grouping(ipv6: &str) -> Option<Diagnosis> {
    let groups = ipv6.split(':').count();

    let Some(elision) = ipv6.find("::") else {
        return (groups != IPV6_MAX_GROUPS).then_some(Diagnosis::Rfc5322Ipv6GrpCount);
    };

    if ipv6.rfind("::") != Some(elision) {
        return Some(Diagnosis::Rfc5322Ipv6TwoDoubleColons);
    }

    // RFC 4291 lets "::" at either end stand beside seven other groups.
    let max_groups = if elision == 0 || elision + 2 == ipv6.len() {
        IPV6_MAX_GROUPS + 1
    } else {
        IPV6_MAX_GROUPS
    };

    match groups.cmp(&max_groups) {
        std::cmp::Ordering::Greater => Some(Diagnosis::Rfc5322Ipv6MaxGroups),
        std::cmp::Ordering::Equal => Some(Diagnosis::Rfc5321Ipv6Deprecated),
        std::cmp::Ordering::Less => None,
    }
}

fn check_shape(ipv6: &str) -> Diagnosis {
    let bytes = ipv6.as_bytes();
    let first = bytes.first().copied();
    let second = bytes.get(1).copied();
    let last = bytes.last().copied();
    let before_last = bytes.len().checked_sub(2).map(|i| bytes[i]);

    if first == Some(b':') && second != Some(b':') {
        Diagnosis::Rfc5322Ipv6ColonStart
    } else if last == Some(b':') && before_last != Some(b':') {
        Diagnosis::Rfc5322Ipv6ColonEnd
    } else if ipv6.split(':').all(is_hex_group) {
        Diagnosis::Rfc5321AddressLiteral
    } else {
        Diagnosis::Rfc5322Ipv6BadChar
    }
}

fn is_hex_group(group: &str) -> bool {
    group.len() <= 4 && group.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Byte offset of a dotted-quad IPv4 address that ends the literal, if any.
///
/// The address must start at a word boundary, so `a1.2.3.4` has no tail.
pub(crate) fn ipv4_tail(literal: &str) -> Option<usize> {
    let bytes = literal.as_bytes();
    (0..bytes.len())
        .filter(|&start| start == 0 || !is_word_byte(bytes[start - 1]))
        .find(|&start| literal.get(start..).is_some_and(is_dotted_quad))
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_dotted_quad(candidate: &str) -> bool {
    let octets: Vec<&str> = candidate.split('.').collect();
    octets.len() == 4
        && octets.iter().all(|octet| {
            (1..=3).contains(&octet.len())
                && octet.bytes().all(|b| b.is_ascii_digit())
                && octet.parse::<u16>().is_ok_and(|value| value <= 255)
        })
}
