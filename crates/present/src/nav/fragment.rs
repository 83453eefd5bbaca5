/// Parse a slide index from an address fragment such as `#3`.
///
/// The leading `#` is optional. Only plain ASCII digits are accepted, so an
/// empty fragment, a sign, whitespace or a fractional part all count as invalid.
pub fn parse(fragment: &str) -> Option<usize> {
    let digits = fragment.strip_prefix('#').unwrap_or(fragment);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Format a slide index as an address fragment.
pub fn format(index: usize) -> String {
    format!("#{index}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(parse("#0"), Some(0));
        assert_eq!(parse("#12"), Some(12));
        assert_eq!(parse("7"), Some(7));
        assert_eq!(parse("#007"), Some(7));
    }

    #[test]
    fn test_parse_invalid() {
        for fragment in ["", "#", "#-3", "#abc", "#1.5", "# 2", "#2 ", "#+1", "##1"] {
            assert_eq!(parse(fragment), None, "fragment {fragment:?}");
        }
    }

    #[test]
    fn test_parse_overflow_is_invalid() {
        assert_eq!(parse("#99999999999999999999999999"), None);
    }

    #[test]
    fn test_format() {
        assert_eq!(format(0), "#0");
        assert_eq!(format(42), "#42");
        assert_eq!(parse(&format(42)), Some(42));
    }
}
