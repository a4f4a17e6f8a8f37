/*! Event types emitted on the inspector's broadcast channel. */

use super::{ElementHandle, Rect};
use serde::Serialize;
use ts_rs::TS;

/// Events emitted as the mirror and selection state change.
///
/// This stream is an observability tap; the [`PresentationSink`] remains the
/// authoritative path to the UI. Per-element events fire on every applied
/// notification, while `StructureChanged` is the coalesced redraw signal.
///
/// [`PresentationSink`]: crate::PresentationSink
#[derive(Debug, Clone, Serialize, TS)]
#[serde(tag = "event", content = "data")]
#[ts(export)]
pub enum Event {
  #[serde(rename = "element:added")]
  ElementAdded {
    handle: ElementHandle,
    parent: Option<ElementHandle>,
    title: String,
  },

  #[serde(rename = "element:removed")]
  ElementRemoved { handle: ElementHandle },

  /// Coalesced structure-change signal; fires once per quiescence window.
  #[serde(rename = "structure:changed")]
  StructureChanged,

  #[serde(rename = "selection:changed")]
  SelectionChanged { handle: Option<ElementHandle> },

  #[serde(rename = "highlight:changed")]
  HighlightChanged { rect: Option<Rect> },
}
