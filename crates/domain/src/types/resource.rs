//! Resource representations returned by the API

use serde::{Deserialize, Serialize};

use crate::constants::{
    MEDIA_SUFFIX_JSON, MEDIA_SUFFIX_XML, MEDIA_TYPE_JSON, MEDIA_TYPE_XML, VENDOR_SUBTYPE_PREFIX,
};
use crate::errors::MediaTypeError;
use crate::impl_wire_token_conversions;

/// Representation format requested from, and returned by, the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepresentationFormat {
    /// XML
    StructuredMarkup,
    /// JSON
    TaggedObject,
}

impl RepresentationFormat {
    /// Value of the `Accept` header requesting this format.
    #[must_use]
    pub const fn accept_header(self) -> &'static str {
        match self {
            Self::StructuredMarkup => MEDIA_TYPE_XML,
            Self::TaggedObject => MEDIA_TYPE_JSON,
        }
    }

    const fn suffix(self) -> &'static str {
        match self {
            Self::StructuredMarkup => MEDIA_SUFFIX_XML,
            Self::TaggedObject => MEDIA_SUFFIX_JSON,
        }
    }
}

/// Logical resource kinds exposed by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Service,
    Portfolios,
    Portfolio,
    PortfolioAnalysis,
    Analysis,
    SegmentsTreeNode,
    TimeSeries,
}

impl_wire_token_conversions!(ResourceKind {
    Service => "service",
    Portfolios => "portfolios",
    Portfolio => "portfolio",
    PortfolioAnalysis => "portfolio-analysis",
    Analysis => "analysis",
    SegmentsTreeNode => "segments-tree-node",
    TimeSeries => "time-series",
});

impl ResourceKind {
    /// Derive the resource kind and format from a vendor media type.
    ///
    /// Accepts `application/vnd.<vendor>.<kind>+json|+xml`, optionally with
    /// parameters (`; charset=utf-8`). The kind token is the last
    /// dot-separated segment of the subtype.
    ///
    /// # Errors
    /// Returns [`MediaTypeError::UnsupportedFormat`] when the suffix is neither
    /// `+json` nor `+xml`, and [`MediaTypeError::UnknownResourceKind`] when the
    /// subtype is not a vendor subtype or names an unknown kind.
    pub fn from_media_type(
        media_type: &str,
    ) -> Result<(Self, RepresentationFormat), MediaTypeError> {
        let essence = media_type.split(';').next().unwrap_or_default().trim().to_lowercase();
        let subtype = essence
            .split_once('/')
            .map(|(_, subtype)| subtype)
            .ok_or_else(|| MediaTypeError::UnknownResourceKind(media_type.to_string()))?;

        let (stem, format) = [RepresentationFormat::TaggedObject, RepresentationFormat::StructuredMarkup]
            .into_iter()
            .find_map(|format| subtype.strip_suffix(format.suffix()).map(|stem| (stem, format)))
            .ok_or_else(|| MediaTypeError::UnsupportedFormat(media_type.to_string()))?;

        let vendor_path = stem
            .strip_prefix(VENDOR_SUBTYPE_PREFIX)
            .ok_or_else(|| MediaTypeError::UnknownResourceKind(media_type.to_string()))?;
        let token = vendor_path.rsplit('.').next().unwrap_or_default();

        let kind = token
            .parse::<Self>()
            .map_err(|_| MediaTypeError::UnknownResourceKind(media_type.to_string()))?;

        Ok((kind, format))
    }

    /// Vendor media type for this kind in the given format.
    #[must_use]
    pub fn media_type(self, vendor: &str, format: RepresentationFormat) -> String {
        format!("application/{VENDOR_SUBTYPE_PREFIX}{vendor}.{}{}", self.as_token(), format.suffix())
    }
}

/// A successful fetch result
///
/// Only constructed for 2xx responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEnvelope {
    representation: String,
    media_type: String,
    kind: ResourceKind,
    format: RepresentationFormat,
}

impl ResourceEnvelope {
    /// Build an envelope from a successful response body and its media type.
    ///
    /// # Errors
    /// Returns [`MediaTypeError`] when the resource kind cannot be determined.
    pub fn new(
        representation: impl Into<String>,
        media_type: impl Into<String>,
    ) -> Result<Self, MediaTypeError> {
        let media_type = media_type.into();
        let (kind, format) = ResourceKind::from_media_type(&media_type)?;
        Ok(Self { representation: representation.into(), media_type, kind, format })
    }

    #[must_use]
    pub fn representation(&self) -> &str {
        &self.representation
    }

    #[must_use]
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        self.kind
    }

    #[must_use]
    pub const fn format(&self) -> RepresentationFormat {
        self.format
    }

    /// Whether the representation is structured markup (XML).
    #[must_use]
    pub fn is_structured_markup(&self) -> bool {
        self.format == RepresentationFormat::StructuredMarkup
    }

    /// Consume the envelope, returning the raw representation.
    #[must_use]
    pub fn into_representation(self) -> String {
        self.representation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derives_kind_and_format_from_vendor_media_type() {
        let (kind, format) =
            ResourceKind::from_media_type("application/vnd.meridian.api.segments-tree-node+json")
                .unwrap();
        assert_eq!(kind, ResourceKind::SegmentsTreeNode);
        assert_eq!(format, RepresentationFormat::TaggedObject);

        let (kind, format) = ResourceKind::from_media_type(
            "application/vnd.meridian.api.portfolio-analysis+xml; charset=utf-8",
        )
        .unwrap();
        assert_eq!(kind, ResourceKind::PortfolioAnalysis);
        assert_eq!(format, RepresentationFormat::StructuredMarkup);
    }

    #[test]
    fn test_unknown_kind_is_an_error_not_empty_result() {
        let err = ResourceKind::from_media_type("application/vnd.meridian.api.widgets+json")
            .unwrap_err();
        assert!(matches!(err, MediaTypeError::UnknownResourceKind(_)));

        let err = ResourceKind::from_media_type("application/json").unwrap_err();
        assert!(matches!(err, MediaTypeError::UnsupportedFormat(_)));

        let err = ResourceKind::from_media_type("application/service+json").unwrap_err();
        assert!(matches!(err, MediaTypeError::UnknownResourceKind(_)));
    }

    #[test]
    fn test_media_type_builder_matches_parser() {
        let media = ResourceKind::TimeSeries.media_type("meridian.api", RepresentationFormat::StructuredMarkup);
        assert_eq!(media, "application/vnd.meridian.api.time-series+xml");
        let envelope = ResourceEnvelope::new("<timeSeries/>", media).unwrap();
        assert_eq!(envelope.kind(), ResourceKind::TimeSeries);
        assert!(envelope.is_structured_markup());
    }

    #[test]
    fn test_accept_headers() {
        assert_eq!(RepresentationFormat::TaggedObject.accept_header(), "application/json");
        assert_eq!(RepresentationFormat::StructuredMarkup.accept_header(), "application/xml");
    }
}
