/*!
Screen-point to element resolution across all known top-level roots.

Two-phase by design: a cheap root-rectangle containment test gates the
expensive native recursive probe, so the probe never runs against a window
the point cannot be in.
*/

use crate::client::RemoteClient;
use crate::geometry::resolve_root_rect;
use crate::mirror::MirrorTree;
use crate::types::{ElementHandle, Point, PointF};

/// Find the topmost element under a screen point, walking all known roots
/// in presentation order. `None` when the point is outside every root or
/// nothing under it resolves to a valid handle.
pub fn element_at<C: RemoteClient>(
  client: &C,
  mirror: &MirrorTree,
  point: Point,
) -> Option<ElementHandle> {
  for &root in mirror.roots() {
    let Ok(object) = client.resolve_object(root) else {
      continue;
    };
    let Some(resolved) = resolve_root_rect(client, &object) else {
      continue;
    };
    let Some(content) = client.root_content(&object) else {
      continue;
    };

    // The query point arrives in raw screen pixels; bring it into the
    // root's logical space when the hosting window's DPI is known.
    let logical = match resolved.window {
      Some(window) => point.to_logical(client.window_dpi(window)),
      None => point,
    };

    if !resolved.rect.contains(logical) {
      continue;
    }

    let relative = PointF::new(
      (logical.x - resolved.rect.x) as f32,
      (logical.y - resolved.rect.y) as f32,
    );

    // Topmost-first; the first candidate that still resolves wins.
    for candidate in client.elements_at(&content, relative) {
      if let Ok(handle) = client.resolve_handle(&candidate) {
        return Some(handle);
      }
    }
  }

  None
}
