/*!
uispy - live mirror and inspection engine for a remote UI element tree.

Maintains a local mirror of a running GUI process's element tree from its
add/remove notification stream, resolves per-element screen rectangles
across windows and scale factors, hit-tests screen points back onto live
elements, and presents property/override chains for display and editing.

```ignore
use uispy::{Inspector, Point, TreeNotification};

// `client` implements RemoteClient; `sink` implements PresentationSink.
let inspector = Inspector::new(client, sink);

// Feed the remote notification stream, in arrival order.
inspector.apply(&TreeNotification::Added { relation, descriptor });

// Drive the coalesced redraw from the host loop.
inspector.pump();

// Pick the element under the cursor and show its properties.
inspector.select_from_point(Point::new(640, 360));

// Subscribe to events
let mut events = inspector.subscribe();
while let Ok(event) = events.recv().await {
    // handle event
}
```
*/

mod client;
mod geometry;
mod hittest;
mod mirror;
mod properties;
mod session;
mod sink;

#[cfg(test)]
pub(crate) mod testing;

mod types;
pub use types::*;

pub use crate::client::{Layout, RemoteClient, RootProbe};
pub use crate::geometry::{resolve_relative_rect, resolve_root_rect, ResolvedRoot};
pub use crate::hittest::element_at;
pub use crate::mirror::{MirrorNode, MirrorTree, RedrawCoalescer, REDRAW_CEILING, REDRAW_DELAY};
pub use crate::properties::build_rows;
pub use crate::session::Inspector;
pub use crate::sink::{InsertAt, PresentationSink};
