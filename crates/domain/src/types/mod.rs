//! Domain types and models

pub mod credential;
pub mod resource;
pub mod tree;

pub use credential::Credential;
pub use resource::{RepresentationFormat, ResourceEnvelope, ResourceKind};
pub use tree::{ChildItem, ChildKind, Children, MeasureKey, MeasureKind, MeasureSet, MeasureValue, TreeNode};
