//! Vendor error codes embedded in HTTP reason phrases
//!
//! The API appends ` (DOMAIN_ERROR=<integer>)` to the reason phrase of a
//! failed response. The suffix must be preceded by exactly one space; a
//! reason like `"Close, but no cigar.(DOMAIN_ERROR=100)"` carries no code.

use meridian_domain::constants::{DOMAIN_ERROR_SUFFIX_CLOSE, DOMAIN_ERROR_SUFFIX_OPEN};
use meridian_domain::DomainErrorCode;
use once_cell::sync::Lazy;
use regex::Regex;

#[allow(clippy::expect_used)]
static DOMAIN_ERROR_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(
        "{}(-?[0-9]+){}$",
        regex::escape(DOMAIN_ERROR_SUFFIX_OPEN),
        regex::escape(DOMAIN_ERROR_SUFFIX_CLOSE)
    );
    Regex::new(&pattern).expect("DOMAIN_ERROR_SUFFIX should compile - this is a bug")
});

/// A reason phrase split into its clean message and vendor code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReason {
    /// Reason phrase without the vendor suffix
    pub message: String,
    /// Embedded integer, recognized or not
    pub raw_code: Option<i64>,
    /// `raw_code` mapped through the known code table
    pub domain_code: Option<DomainErrorCode>,
}

/// Strip the vendor suffix from a reason phrase and decode its code.
///
/// Repeated suffixes are all stripped and the outermost code wins, so
/// parsing the returned message again never yields a code.
///
/// # Examples
///
/// ```
/// use meridian_common::classify::parse_reason_phrase;
/// use meridian_domain::DomainErrorCode;
///
/// let parsed = parse_reason_phrase("The specified EULA identifier is too long. (DOMAIN_ERROR=800)");
/// assert_eq!(parsed.message, "The specified EULA identifier is too long.");
/// assert_eq!(parsed.domain_code, Some(DomainErrorCode::EulaIdentifierTooLong));
/// ```
#[must_use]
pub fn parse_reason_phrase(reason: &str) -> ParsedReason {
    let mut message = reason;
    let mut raw_code = None;

    while let Some(captures) = DOMAIN_ERROR_SUFFIX.captures(message) {
        let (Some(whole), Some(digits)) = (captures.get(0), captures.get(1)) else {
            break;
        };
        // Out-of-range integers are not a recognizable suffix.
        let Ok(code) = digits.as_str().parse::<i64>() else {
            break;
        };
        raw_code.get_or_insert(code);
        message = &message[..whole.start()];
    }

    ParsedReason {
        message: message.to_string(),
        raw_code,
        domain_code: raw_code.and_then(DomainErrorCode::from_code),
    }
}
