//! JSON wire format of segments tree pages
//!
//! Pages arrive as tagged-object representations:
//!
//! ```json
//! {
//!   "segmentsTreeNode": {
//!     "href": "https://api.example.com/.../segments-tree-node",
//!     "name": "Total",
//!     "timePeriods": [
//!       { "code": "1Y", "measures": [ { "id": "Rp", "ty": "real", "val": 0.12 } ] }
//!     ],
//!     "childSegments": { "items": [ { "name": "Equity", "timePeriods": [] } ], "next": null }
//!   }
//! }
//! ```
//!
//! A node carries `childSegments` or `securities`, never both. Decoding is
//! strict: missing required fields, unknown measure types and values that
//! disagree with their declared type are [`StructuralError`]s.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::StructuralError;
use crate::types::{ChildItem, Children, MeasureKind, MeasureSet, MeasureValue, TreeNode};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SegmentsTreeNodeDocument {
    segments_tree_node: NodeDto,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeDto {
    href: String,
    name: String,
    #[serde(default)]
    time_periods: Vec<TimePeriodDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    child_segments: Option<ChildContainerDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    securities: Option<ChildContainerDto>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChildContainerDto {
    items: Vec<ChildDto>,
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChildDto {
    name: String,
    #[serde(default)]
    time_periods: Vec<TimePeriodDto>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TimePeriodDto {
    code: String,
    #[serde(default)]
    measures: Vec<MeasureDto>,
}

#[derive(Debug, Serialize, Deserialize)]
struct MeasureDto {
    id: String,
    ty: String,
    #[serde(default)]
    val: Value,
}

/// Decode one segments tree page.
///
/// # Errors
/// Returns a [`StructuralError`] when the document does not match the schema.
pub fn decode_segments_tree_node(representation: &str) -> Result<TreeNode, StructuralError> {
    let document: SegmentsTreeNodeDocument = serde_json::from_str(representation)
        .map_err(|e| StructuralError::Malformed(e.to_string()))?;
    document.segments_tree_node.try_into()
}

/// Encode a node back into its page representation.
///
/// # Errors
/// Returns [`StructuralError::Malformed`] if serialization fails.
pub fn encode_segments_tree_node(node: &TreeNode) -> Result<String, StructuralError> {
    let document = SegmentsTreeNodeDocument { segments_tree_node: NodeDto::from(node) };
    serde_json::to_string(&document).map_err(|e| StructuralError::Malformed(e.to_string()))
}

/// Encode one measure as `{ "id", "ty", "val" }`.
///
/// Non-finite reals have no JSON form and are written as `null`.
#[must_use]
pub fn encode_measure(id: &str, value: &MeasureValue) -> Value {
    serde_json::json!({
        "id": id,
        "ty": value.kind().as_token(),
        "val": measure_json(value),
    })
}

/// Decode one `{ "id", "ty", "val" }` measure into its id and value.
///
/// # Errors
/// Returns a [`StructuralError`] for malformed objects, unknown type tags,
/// or values that disagree with their tag.
pub fn decode_measure(value: &Value) -> Result<(String, MeasureValue), StructuralError> {
    let dto = MeasureDto::deserialize(value).map_err(|e| StructuralError::Malformed(e.to_string()))?;
    let decoded = dto.decode()?;
    Ok((dto.id, decoded))
}

impl MeasureDto {
    fn decode(&self) -> Result<MeasureValue, StructuralError> {
        let kind = self.ty.parse::<MeasureKind>().map_err(|_| {
            StructuralError::UnknownMeasureType { id: self.id.clone(), ty: self.ty.clone() }
        })?;

        let mismatch = || StructuralError::MeasureTypeMismatch {
            id: self.id.clone(),
            expected: kind.to_string(),
            found: json_type_name(&self.val).to_string(),
        };

        if self.val.is_null() {
            return Ok(match kind {
                MeasureKind::Real => MeasureValue::Real(None),
                MeasureKind::Integer => MeasureValue::Integer(None),
                MeasureKind::Text => MeasureValue::Text(None),
            });
        }

        match kind {
            MeasureKind::Real => self.val.as_f64().map(|v| MeasureValue::Real(Some(v))),
            MeasureKind::Integer => self.val.as_i64().map(|v| MeasureValue::Integer(Some(v))),
            MeasureKind::Text => {
                self.val.as_str().map(|v| MeasureValue::Text(Some(v.to_string())))
            }
        }
        .ok_or_else(mismatch)
    }
}

fn measure_json(value: &MeasureValue) -> Value {
    match value {
        MeasureValue::Real(Some(v)) => serde_json::Number::from_f64(*v).map_or(Value::Null, Value::Number),
        MeasureValue::Integer(Some(v)) => Value::from(*v),
        MeasureValue::Text(Some(v)) => Value::from(v.as_str()),
        MeasureValue::Real(None) | MeasureValue::Integer(None) | MeasureValue::Text(None) => {
            Value::Null
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "real",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn decode_measures(periods: Vec<TimePeriodDto>) -> Result<MeasureSet, StructuralError> {
    let mut set = MeasureSet::new();
    for period in periods {
        for measure in period.measures {
            let value = measure.decode()?;
            if set.insert(period.code.clone(), measure.id.clone(), value).is_some() {
                return Err(StructuralError::DuplicateMeasure {
                    period: period.code.clone(),
                    id: measure.id,
                });
            }
        }
    }
    Ok(set)
}

fn encode_measures(measures: &MeasureSet) -> Vec<TimePeriodDto> {
    let mut periods: Vec<TimePeriodDto> = Vec::new();
    for (key, value) in measures.iter() {
        let dto = MeasureDto {
            id: key.measure_id.clone(),
            ty: value.kind().as_token().to_string(),
            val: measure_json(value),
        };
        match periods.last_mut() {
            Some(period) if period.code == key.period => period.measures.push(dto),
            _ => periods.push(TimePeriodDto { code: key.period.clone(), measures: vec![dto] }),
        }
    }
    periods
}

fn decode_items(items: Vec<ChildDto>) -> Result<Vec<ChildItem>, StructuralError> {
    items
        .into_iter()
        .map(|child| -> Result<ChildItem, StructuralError> {
            Ok(ChildItem { name: child.name, measures: decode_measures(child.time_periods)? })
        })
        .collect()
}

impl TryFrom<NodeDto> for TreeNode {
    type Error = StructuralError;

    fn try_from(dto: NodeDto) -> Result<Self, Self::Error> {
        let children = match (dto.child_segments, dto.securities) {
            (Some(_), Some(_)) => return Err(StructuralError::BothChildKinds { uri: dto.href }),
            (Some(container), None) => Children::ChildSegments {
                items: decode_items(container.items)?,
                next: container.next,
            },
            (None, Some(container)) => Children::Securities {
                items: decode_items(container.items)?,
                next: container.next,
            },
            (None, None) => Children::NoChildren,
        };

        Ok(Self {
            uri: dto.href,
            name: dto.name,
            measures: decode_measures(dto.time_periods)?,
            children,
        })
    }
}

impl From<&TreeNode> for NodeDto {
    fn from(node: &TreeNode) -> Self {
        let container = |items: &[ChildItem], next: &Option<String>| ChildContainerDto {
            items: items
                .iter()
                .map(|item| ChildDto {
                    name: item.name.clone(),
                    time_periods: encode_measures(&item.measures),
                })
                .collect(),
            next: next.clone(),
        };

        let (child_segments, securities) = match &node.children {
            Children::NoChildren => (None, None),
            Children::ChildSegments { items, next } => (Some(container(items, next)), None),
            Children::Securities { items, next } => (None, Some(container(items, next))),
        };

        Self {
            href: node.uri.clone(),
            name: node.name.clone(),
            time_periods: encode_measures(&node.measures),
            child_segments,
            securities,
        }
    }
}
