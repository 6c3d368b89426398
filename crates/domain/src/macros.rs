//! Macro for implementing Display and FromStr for wire-token enums
//!
//! Several domain enums travel as short lowercase tokens (resource kinds in
//! vendor media types, measure type tags in tree pages). This macro provides a
//! single implementation for both Display and FromStr so the token table is
//! written once per enum.
//!
//! # Example
//!
//! ```rust
//! use meridian_domain::impl_wire_token_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Period {
//!     OneYear,
//!     ThreeYears,
//! }
//!
//! impl_wire_token_conversions!(Period {
//!     OneYear => "1y",
//!     ThreeYears => "3y",
//! });
//!
//! assert_eq!("1Y".parse::<Period>().unwrap(), Period::OneYear);
//! ```

/// Implements Display and FromStr traits for wire-token enums
///
/// This macro generates:
/// - Display trait: writes the variant's token
/// - FromStr trait: parses case-insensitive tokens to enum variants
///
/// Tokens must be written in lowercase.
#[macro_export]
macro_rules! impl_wire_token_conversions {
    ($enum_name:ident { $($variant:ident => $token:literal),+ $(,)? }) => {
        impl $enum_name {
            /// Wire token for this variant.
            #[must_use]
            pub const fn as_token(&self) -> &'static str {
                match self {
                    $(Self::$variant => $token,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_token())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($token => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
