/*!
The presentation sink contract.

The presentation layer (tree widget, attribute list, highlight overlay) is
a pure sink: it receives already-computed rows, titles and rectangles and
never talks to the remote process itself. The engine drives it through this
trait and caches the returned [`PresentationRef`]s in the mirror.
*/

use crate::types::{EditableProperty, ElementHandle, PresentationRef, PropertyRow, Rect};

/// Where to insert a node among its siblings in the presentation tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertAt {
  First,
  /// Directly after the given sibling.
  After(PresentationRef),
  Last,
}

/// Contract exposed to the UI layer.
///
/// `attach_node`/`detach_node` manage tree-widget items; detaching a node
/// detaches its whole visual subtree in one call. `suspend_painting` and
/// `on_structure_changed` bracket a coalescing window: painting is
/// suspended when the first structural event of a burst arrives and the
/// coalesced redraw fires once the burst goes quiet.
pub trait PresentationSink {
  /// Create a widget item for a mirrored node. `None` if the widget
  /// rejected the insertion; the engine then skips the node's subtree.
  fn attach_node(
    &mut self,
    parent: Option<PresentationRef>,
    at: InsertAt,
    handle: ElementHandle,
    title: &str,
  ) -> Option<PresentationRef>;

  /// Remove a widget item and its visual subtree.
  fn detach_node(&mut self, node: PresentationRef);

  /// Stop painting until the next `on_structure_changed`.
  fn suspend_painting(&mut self);

  /// Coalesced redraw signal; also resumes painting.
  fn on_structure_changed(&mut self);

  fn render_rows(&mut self, rows: &[PropertyRow]);

  /// Render the editable-property catalog. `preselect` is the entry the
  /// presentation should pre-select, restoring the user's last pick where
  /// possible.
  fn render_editable(&mut self, editable: &[EditableProperty], preselect: Option<usize>);

  /// Show or clear the highlight overlay. The rectangle is in physical
  /// pixels.
  fn render_highlight(&mut self, rect: Option<Rect>);

  /// Selection header: class name, element name, and the formatted
  /// rectangle string. Inline error strings are already substituted.
  fn render_selection_details(&mut self, class_name: &str, name: &str, rect: &str);

  /// Whether the currently selected item is scrolled into view. `false`
  /// when there is no selection.
  fn selection_on_screen(&self) -> bool;

  /// Scroll the current selection back into view.
  fn reveal_selection(&mut self);
}
