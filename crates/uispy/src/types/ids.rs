/*! Identifier newtypes for remote handles and presentation references. */

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Opaque, process-unique identifier for a live element in the inspected
/// process.
///
/// Handles are never minted locally; they arrive in notifications or from
/// resolved lookups, and stay valid for the element's lifetime in the remote
/// process. A reused handle shows up as a duplicate add and is recovered by
/// the mirror (remove + reinsert).
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Display,
  From,
  Into,
  Serialize,
  Deserialize,
  TS,
)]
#[ts(export)]
pub struct ElementHandle(pub u64);

/// Index of a property within a remote element's property table, used to
/// address `clear_property`/`set_property` mutation requests.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Display,
  From,
  Into,
  Serialize,
  Deserialize,
  TS,
)]
#[ts(export)]
pub struct PropertyIndex(pub u32);

/// Identity of a native window owned by the inspected process. Used only as
/// a key for per-window DPI and rectangle lookups.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Display,
  From,
  Into,
  Serialize,
  Deserialize,
  TS,
)]
#[ts(export)]
pub struct NativeWindowId(pub u64);

/// Opaque reference to a node in the presentation layer (a tree-widget item,
/// typically). Allocated and owned by the [`PresentationSink`]; the mirror
/// only caches it.
///
/// [`PresentationSink`]: crate::PresentationSink
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into, Serialize, TS,
)]
#[ts(export)]
pub struct PresentationRef(pub u64);
