//! Segments tree model
//!
//! A [`TreeNode`] is one segment-level node of an analysis result. Its
//! children are either child segments or securities (never both), and may be
//! split across several pages linked by a `next` cursor. Child segments and
//! securities share the [`ChildItem`] record; the [`Children`] variant is the
//! discriminator.

use std::collections::BTreeMap;

use crate::errors::StructuralError;
use crate::impl_wire_token_conversions;

/// Type tag of a measure value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasureKind {
    Real,
    Integer,
    Text,
}

impl_wire_token_conversions!(MeasureKind {
    Real => "real",
    Integer => "integer",
    Text => "string",
});

/// A single measure value; every kind may be null
#[derive(Debug, Clone, PartialEq)]
pub enum MeasureValue {
    Real(Option<f64>),
    Integer(Option<i64>),
    Text(Option<String>),
}

impl MeasureValue {
    #[must_use]
    pub const fn kind(&self) -> MeasureKind {
        match self {
            Self::Real(_) => MeasureKind::Real,
            Self::Integer(_) => MeasureKind::Integer,
            Self::Text(_) => MeasureKind::Text,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Real(None) | Self::Integer(None) | Self::Text(None))
    }
}

/// Measures are keyed by (time-period code, measure id)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MeasureKey {
    pub period: String,
    pub measure_id: String,
}

impl MeasureKey {
    #[must_use]
    pub fn new(period: impl Into<String>, measure_id: impl Into<String>) -> Self {
        Self { period: period.into(), measure_id: measure_id.into() }
    }
}

/// Measurement values of a node or child, ordered by key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasureSet {
    values: BTreeMap<MeasureKey, MeasureValue>,
}

impl MeasureSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the previous value for the key.
    pub fn insert(
        &mut self,
        period: impl Into<String>,
        measure_id: impl Into<String>,
        value: MeasureValue,
    ) -> Option<MeasureValue> {
        self.values.insert(MeasureKey::new(period, measure_id), value)
    }

    #[must_use]
    pub fn get(&self, period: &str, measure_id: &str) -> Option<&MeasureValue> {
        self.values.get(&MeasureKey::new(period, measure_id))
    }

    /// Distinct time-period codes, in key order.
    #[must_use]
    pub fn periods(&self) -> Vec<&str> {
        let mut periods: Vec<&str> = self.values.keys().map(|key| key.period.as_str()).collect();
        periods.dedup();
        periods
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MeasureKey, &MeasureValue)> {
        self.values.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A child segment or a security
#[derive(Debug, Clone, PartialEq)]
pub struct ChildItem {
    pub name: String,
    pub measures: MeasureSet,
}

impl ChildItem {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), measures: MeasureSet::new() }
    }
}

/// Which kind of children a node carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildKind {
    Segments,
    Securities,
}

impl_wire_token_conversions!(ChildKind {
    Segments => "child segments",
    Securities => "securities",
});

/// Children slot of a tree node
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Children {
    #[default]
    NoChildren,
    ChildSegments { items: Vec<ChildItem>, next: Option<String> },
    Securities { items: Vec<ChildItem>, next: Option<String> },
}

impl Children {
    #[must_use]
    pub const fn kind(&self) -> Option<ChildKind> {
        match self {
            Self::NoChildren => None,
            Self::ChildSegments { .. } => Some(ChildKind::Segments),
            Self::Securities { .. } => Some(ChildKind::Securities),
        }
    }

    #[must_use]
    pub fn items(&self) -> &[ChildItem] {
        match self {
            Self::NoChildren => &[],
            Self::ChildSegments { items, .. } | Self::Securities { items, .. } => items,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// The paging cursor, if more children remain on another page.
    #[must_use]
    pub fn next_page(&self) -> Option<&str> {
        match self {
            Self::NoChildren => None,
            Self::ChildSegments { next, .. } | Self::Securities { next, .. } => next.as_deref(),
        }
    }

    /// Remove and return the paging cursor.
    pub fn take_next_page(&mut self) -> Option<String> {
        match self {
            Self::NoChildren => None,
            Self::ChildSegments { next, .. } | Self::Securities { next, .. } => next.take(),
        }
    }

    /// Append another page's children onto this slot.
    ///
    /// The cursor of `self` is left untouched; the page's cursor is dropped.
    ///
    /// # Errors
    /// Returns [`StructuralError::ChildKindMismatch`] when the page carries a
    /// different child kind, or no children at all.
    pub fn append_page(&mut self, page: Self) -> Result<(), StructuralError> {
        let describe = |kind: Option<ChildKind>| {
            kind.map_or_else(|| "no children".to_string(), |kind| kind.to_string())
        };

        match (self, page) {
            (Self::ChildSegments { items, .. }, Self::ChildSegments { items: more, .. })
            | (Self::Securities { items, .. }, Self::Securities { items: more, .. }) => {
                items.extend(more);
                Ok(())
            }
            (this, page) => Err(StructuralError::ChildKindMismatch {
                expected: describe(this.kind()),
                found: describe(page.kind()),
            }),
        }
    }
}

/// One segment-level node of a segments tree
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// Self link of the node
    pub uri: String,
    pub name: String,
    pub measures: MeasureSet,
    pub children: Children,
}

impl TreeNode {
    #[must_use]
    pub fn new(uri: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            measures: MeasureSet::new(),
            children: Children::NoChildren,
        }
    }

    #[must_use]
    pub fn next_page(&self) -> Option<&str> {
        self.children.next_page()
    }

    /// Drop the paging cursor, making the node self-contained.
    pub fn clear_next_page(&mut self) {
        self.children.take_next_page();
    }
}
