/*! Element descriptors and the structural notification stream. */

use super::ElementHandle;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Where an element sits in its parent's ordered child list.
///
/// `parent == None` marks a root (an independent top-level window or an
/// embedded content root); `child_index` is meaningless for roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ParentChildRelation {
  pub parent: Option<ElementHandle>,
  pub child: ElementHandle,
  /// Position in the parent's child list. Not guaranteed index-exact across
  /// races; out-of-range values clamp to append.
  pub child_index: u32,
}

/// Type/name pair describing a newly added element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ElementDescriptor {
  /// Fully qualified runtime type name.
  pub type_name: String,
  /// Developer-assigned element name; often empty.
  pub name: String,
}

impl ElementDescriptor {
  /// Title shown in the mirror tree: `"Type - Name"`, or just the type when
  /// the element is unnamed.
  pub fn display_title(&self) -> String {
    if self.name.is_empty() {
      self.type_name.clone()
    } else {
      format!("{} - {}", self.type_name, self.name)
    }
  }
}

/// One entry of the remote structural notification stream.
///
/// Delivery order across distinct handles is significant; the mirror applies
/// notifications strictly in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "data")]
#[ts(export)]
pub enum TreeNotification {
  /// An element appeared (or reappeared) in the remote tree.
  #[serde(rename = "added")]
  Added {
    relation: ParentChildRelation,
    descriptor: ElementDescriptor,
  },
  /// An element left the remote tree.
  #[serde(rename = "removed")]
  Removed { handle: ElementHandle },
}
