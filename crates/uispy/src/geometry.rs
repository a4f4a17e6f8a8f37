/*!
Geometry resolution: one agreed-upon logical rectangle per element.

Every element resolves through one of two paths, picked by capability
probing on the remote object:

- an **independent top-level window** reports its own bounds, which are
  already DPI-independent; only rounding is needed.
- an **embedded content root** has no bounds of its own; the hosting native
  window's pixel rectangle is read and normalized to 96-DPI logical
  coordinates.

Any step that cannot obtain a geometry yields `None` - the element may have
been destroyed mid-query, or its hosting window may be tearing down. Callers
treat `None` as "nothing to draw or select".
*/

use crate::client::{RemoteClient, RootProbe};
use crate::types::{NativeWindowId, Rect};

/// A root element's resolved rectangle plus, when recoverable, the native
/// window used for later DPI lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRoot {
  /// 96-DPI logical rectangle.
  pub rect: Rect,
  pub window: Option<NativeWindowId>,
}

/// Resolve a root element's screen rectangle.
pub fn resolve_root_rect<C: RemoteClient>(client: &C, object: &C::Object) -> Option<ResolvedRoot> {
  match client.probe_root(object)? {
    RootProbe::TopLevel { bounds, window } => Some(ResolvedRoot {
      rect: bounds.round(),
      window,
    }),
    RootProbe::Embedded { window } => {
      let raw = client.window_rect(window)?;
      let dpi = client.window_dpi(window);
      Some(ResolvedRoot {
        rect: raw.to_logical(dpi),
        window: Some(window),
      })
    }
  }
}

/// Resolve a non-root element's rectangle in its owning root's logical
/// coordinate space. Offsets and sizes round to nearest; sub-pixel layout
/// offsets are small and a directional bias would be worse than the
/// rounding error.
pub fn resolve_relative_rect<C: RemoteClient>(client: &C, object: &C::Object) -> Option<Rect> {
  let layout = client.layout_to_root(object)?;
  Some(Rect {
    x: layout.offset.x.round() as i32,
    y: layout.offset.y.round() as i32,
    w: layout.width.round() as i32,
    h: layout.height.round() as i32,
  })
}
