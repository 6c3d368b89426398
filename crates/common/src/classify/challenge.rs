//! `WWW-Authenticate` challenge parsing (RFC 7235 / RFC 6750)

use meridian_domain::constants::{BEARER_SCHEME, INVALID_TOKEN_ERROR};

/// One authentication challenge: a scheme and its parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub scheme: String,
    pub params: Vec<(String, String)>,
}

impl Challenge {
    /// Parameter value by case-insensitive name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Parse every challenge in a `WWW-Authenticate` header value.
///
/// Several header lines may be joined with `,` before parsing. Token68
/// credentials are not interpreted.
#[must_use]
pub fn parse_challenges(header: &str) -> Vec<Challenge> {
    let mut challenges: Vec<Challenge> = Vec::new();
    let mut rest = header;

    loop {
        rest = rest.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
        let token_end =
            rest.find(|c: char| c == ',' || c == '=' || c.is_whitespace()).unwrap_or(rest.len());
        if token_end == 0 {
            break;
        }
        let token = &rest[..token_end];
        rest = rest[token_end..].trim_start();

        if let Some(after_eq) = rest.strip_prefix('=') {
            let (value, remainder) = read_param_value(after_eq.trim_start());
            rest = remainder;
            if let Some(current) = challenges.last_mut() {
                current.params.push((token.to_string(), value));
            }
        } else {
            challenges.push(Challenge { scheme: token.to_string(), params: Vec::new() });
        }
    }

    challenges
}

fn read_param_value(input: &str) -> (String, &str) {
    if let Some(quoted) = input.strip_prefix('"') {
        let mut value = String::new();
        let mut chars = quoted.char_indices();
        while let Some((idx, c)) = chars.next() {
            match c {
                '\\' => {
                    if let Some((_, escaped)) = chars.next() {
                        value.push(escaped);
                    }
                }
                '"' => return (value, &quoted[idx + 1..]),
                _ => value.push(c),
            }
        }
        // Unterminated quoted string consumes the remainder.
        (value, "")
    } else {
        let end = input.find(|c: char| c == ',' || c.is_whitespace()).unwrap_or(input.len());
        (input[..end].to_string(), &input[end..])
    }
}

/// Whether the header carries a `Bearer` challenge with `error="invalid_token"`.
#[must_use]
pub fn is_invalid_bearer_token(header: &str) -> bool {
    parse_challenges(header).iter().any(|challenge| {
        challenge.scheme.eq_ignore_ascii_case(BEARER_SCHEME)
            && challenge.param("error") == Some(INVALID_TOKEN_ERROR)
    })
}
