//! Conversions from external infrastructure errors into domain errors.

use meridian_domain::MeridianError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub MeridianError);

impl From<InfraError> for MeridianError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<MeridianError> for InfraError {
    fn from(value: MeridianError) -> Self {
        Self(value)
    }
}

trait IntoMeridianError {
    fn into_meridian(self) -> MeridianError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → MeridianError */
/* -------------------------------------------------------------------------- */

impl IntoMeridianError for HttpError {
    fn into_meridian(self) -> MeridianError {
        let kind = if self.is_timeout() {
            "request timed out"
        } else if self.is_connect() {
            "connection failed"
        } else if self.is_builder() {
            "invalid request"
        } else if self.is_body() || self.is_decode() {
            "failed to read response body"
        } else if self.is_redirect() {
            "too many redirects"
        } else {
            "request failed"
        };

        let url = self.url().map(|url| format!(" ({url})")).unwrap_or_default();
        MeridianError::Network(format!("HTTP {kind}{url}: {self}"))
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_meridian())
    }
}

/* -------------------------------------------------------------------------- */
/* Configuration file errors → MeridianError */
/* -------------------------------------------------------------------------- */

impl IntoMeridianError for std::io::Error {
    fn into_meridian(self) -> MeridianError {
        MeridianError::Config(format!("Failed to read config file: {self}"))
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        Self(value.into_meridian())
    }
}

impl IntoMeridianError for toml::de::Error {
    fn into_meridian(self) -> MeridianError {
        MeridianError::Config(format!("Invalid TOML format: {self}"))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        Self(value.into_meridian())
    }
}

impl IntoMeridianError for serde_json::Error {
    fn into_meridian(self) -> MeridianError {
        MeridianError::Config(format!("Invalid JSON format: {self}"))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        Self(value.into_meridian())
    }
}
