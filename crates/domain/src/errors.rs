//! Error types used throughout the client

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Meridian plumbing (configuration, transport setup)
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum MeridianError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Meridian operations
pub type Result<T> = std::result::Result<T, MeridianError>;

/// Vendor error codes the API embeds in its reason phrases.
///
/// Codes outside this table are kept as raw integers on
/// [`ClassifiedError::ProtocolError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DomainErrorCode {
    UnspecifiedFailure,
    InvalidResourceIdentifier,
    ResourceNotFound,
    InvalidQueryParameter,
    FairUsageQuotaExceeded,
    TenancyAppBlacklisted,
    EulaIdentifierTooLong,
    EulaNotAccepted,
    AnalysisNotAvailable,
}

impl DomainErrorCode {
    /// Map a raw vendor integer to a known code.
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            100 => Some(Self::UnspecifiedFailure),
            200 => Some(Self::InvalidResourceIdentifier),
            201 => Some(Self::ResourceNotFound),
            300 => Some(Self::InvalidQueryParameter),
            400 => Some(Self::FairUsageQuotaExceeded),
            401 => Some(Self::TenancyAppBlacklisted),
            800 => Some(Self::EulaIdentifierTooLong),
            801 => Some(Self::EulaNotAccepted),
            900 => Some(Self::AnalysisNotAvailable),
            _ => None,
        }
    }

    /// The vendor integer for this code.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::UnspecifiedFailure => 100,
            Self::InvalidResourceIdentifier => 200,
            Self::ResourceNotFound => 201,
            Self::InvalidQueryParameter => 300,
            Self::FairUsageQuotaExceeded => 400,
            Self::TenancyAppBlacklisted => 401,
            Self::EulaIdentifierTooLong => 800,
            Self::EulaNotAccepted => 801,
            Self::AnalysisNotAvailable => 900,
        }
    }
}

/// Structured classification of a failed remote call.
///
/// Created fresh per failed call; never mutated or persisted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedError {
    /// No structured response was available (DNS, connect, timeout).
    #[error("Unable to reach the server: {message}")]
    TransportFailure { message: String },

    /// The server answered with a non-success status not otherwise classified.
    #[error("{message} (HTTP {status})")]
    ProtocolError {
        status: u16,
        domain_code: Option<DomainErrorCode>,
        raw_code: Option<i64>,
        message: String,
    },

    /// The bearer token was expired or invalid.
    #[error("Access token rejected: {message} (HTTP {status})")]
    CredentialRejected { status: u16, message: String },

    /// The tenancy/application pair is blocked by the fair usage policy.
    #[error("Blocked by the fair usage policy: {message} (HTTP {status})")]
    PolicyBlocked { status: u16, domain_code: DomainErrorCode, message: String },
}

impl ClassifiedError {
    /// HTTP status, when the server responded at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::TransportFailure { .. } => None,
            Self::ProtocolError { status, .. }
            | Self::CredentialRejected { status, .. }
            | Self::PolicyBlocked { status, .. } => Some(*status),
        }
    }

    /// Recognized vendor error code, if any.
    #[must_use]
    pub const fn domain_code(&self) -> Option<DomainErrorCode> {
        match self {
            Self::ProtocolError { domain_code, .. } => *domain_code,
            Self::PolicyBlocked { domain_code, .. } => Some(*domain_code),
            Self::TransportFailure { .. } | Self::CredentialRejected { .. } => None,
        }
    }

    /// Human-readable message, without status decoration.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::TransportFailure { message }
            | Self::ProtocolError { message, .. }
            | Self::CredentialRejected { message, .. }
            | Self::PolicyBlocked { message, .. } => message,
        }
    }

    /// Whether this failure indicates an expired or invalid bearer token.
    #[must_use]
    pub const fn is_credential_rejected(&self) -> bool {
        matches!(self, Self::CredentialRejected { .. })
    }
}

/// Contract violations in a decoded representation.
///
/// Always fatal to the operation that observed it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("Malformed representation: {0}")]
    Malformed(String),

    #[error("Node {uri} carries both child segments and securities")]
    BothChildKinds { uri: String },

    #[error("Unknown measure type '{ty}' for measure '{id}'")]
    UnknownMeasureType { id: String, ty: String },

    #[error("Measure '{id}' declared as {expected} but carries {found}")]
    MeasureTypeMismatch { id: String, expected: String, found: String },

    #[error("Duplicate measure '{id}' in time period '{period}'")]
    DuplicateMeasure { period: String, id: String },

    #[error("Child kind mismatch between pages: expected {expected}, found {found}")]
    ChildKindMismatch { expected: String, found: String },

    #[error("Expected a {expected} resource but received {found}")]
    UnexpectedResource { expected: String, found: String },
}

/// Rejection of a partially-populated credential.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Credential field '{0}' is missing or empty")]
    MissingField(&'static str),

    #[error("Credential lifetime must be positive, got {0}")]
    NonPositiveLifetime(i64),
}

/// Failure to derive a resource kind from a media type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaTypeError {
    #[error("Cannot determine resource type from media type '{0}'")]
    UnknownResourceKind(String),

    #[error("Unsupported representation format in media type '{0}'")]
    UnsupportedFormat(String),
}
