/*!
The remote introspection contract.

This trait is the narrow request/response boundary to the inspected
process's diagnostics channel. Core code only uses this trait; a concrete
binding (or a test fake) implements it. All calls are synchronous and
blocking; no retry is performed on failure - a failed call surfaces
immediately and the operation is abandoned.
*/

use crate::types::{
  ElementHandle, NativeWindowId, PointF, PropertyChain, PropertyIndex, Rect, RectF, SpyResult,
};

/// Result of capability-probing a root element.
///
/// The two root categories carry only the fields their resolution path
/// needs; there is no common base shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RootProbe {
  /// An independent top-level window. Its bounds are already DPI-independent
  /// logical coordinates; the native window identity, when recoverable, is
  /// kept for later DPI lookups.
  TopLevel {
    bounds: RectF,
    window: Option<NativeWindowId>,
  },

  /// A content root embedded in a native host window. The rectangle must be
  /// read from the host window and normalized from physical pixels.
  Embedded { window: NativeWindowId },
}

/// An element's layout slot, expressed in the coordinate space of its
/// owning root (the "transform to root" primitive).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
  pub offset: PointF,
  pub width: f32,
  pub height: f32,
}

/// Synchronous request/response contract with the inspected process.
///
/// `Object` is an opaque reference to a live visual element, resolvable
/// from and back to an [`ElementHandle`]. Geometry probes return `Option` -
/// an element destroyed mid-query or an unrecognized category is "nothing
/// to draw", never an error.
pub trait RemoteClient {
  /// Opaque visual element reference. Clone is cheap (reference-counted in
  /// real bindings).
  type Object: Clone;

  fn resolve_object(&self, handle: ElementHandle) -> SpyResult<Self::Object>;

  fn resolve_handle(&self, object: &Self::Object) -> SpyResult<ElementHandle>;

  /// Runtime class name of the referenced object.
  fn class_name(&self, object: &Self::Object) -> SpyResult<String>;

  /// Developer-assigned element name; empty for elements that cannot carry
  /// one.
  fn element_name(&self, object: &Self::Object) -> SpyResult<String>;

  /// Capability-probe an element for one of the two root categories.
  /// `None` when the element is not a root.
  fn probe_root(&self, object: &Self::Object) -> Option<RootProbe>;

  /// The content subtree hosted by a root element.
  fn root_content(&self, object: &Self::Object) -> Option<Self::Object>;

  /// Layout slot of a non-root element in its root's coordinate space.
  fn layout_to_root(&self, object: &Self::Object) -> Option<Layout>;

  /// Native hit test: all elements under a 1x1 probe region at `point`
  /// (relative to the subtree's root), topmost first.
  fn elements_at(&self, subtree: &Self::Object, point: PointF) -> Vec<Self::Object>;

  /// Raw pixel rectangle of a native window. `None` once the window is
  /// being torn down.
  fn window_rect(&self, window: NativeWindowId) -> Option<Rect>;

  /// Current DPI of a native window (96 = unscaled).
  fn window_dpi(&self, window: NativeWindowId) -> u32;

  fn property_chain(&self, handle: ElementHandle) -> SpyResult<PropertyChain>;

  fn clear_property(&self, handle: ElementHandle, property: PropertyIndex) -> SpyResult<()>;

  /// Create a remote instance of `type_name` from a literal string and
  /// return its handle.
  fn create_instance(&self, type_name: &str, value: &str) -> SpyResult<ElementHandle>;

  fn set_property(
    &self,
    handle: ElementHandle,
    value: ElementHandle,
    property: PropertyIndex,
  ) -> SpyResult<()>;
}
