/*!
The inspection session.

`Inspector` owns one mirror of one inspected process: the mirror tree, the
display-mode flags, the selection, the remote client and the presentation
sink. All tree, geometry, hit-test and property operations run on the
caller's thread; remote notifications are expected to be serialized into
the same queue as user-interaction events, so no locking is needed around
the mirrored state beyond the handle-sharing lock.
*/

use std::sync::Arc;
use std::time::Instant;

use async_broadcast::{InactiveReceiver, Receiver, Sender};
use parking_lot::RwLock;

use crate::client::RemoteClient;
use crate::geometry;
use crate::hittest;
use crate::mirror::MirrorTree;
use crate::properties;
use crate::sink::PresentationSink;
use crate::types::{
  EditableProperty, ElementHandle, Event, Point, PropertyCatalog, Rect, SpyResult,
  TreeNotification,
};

const EVENT_CHANNEL_CAPACITY: usize = 5000;

/// One inspection session. Clone is cheap (Arc bumps) - share freely.
///
/// The session is single-threaded in spirit: notifications and user
/// interactions must be fed from one logical thread of control. Remote
/// calls are synchronous; a slow remote call blocks for its duration.
pub struct Inspector<C: RemoteClient, S: PresentationSink> {
  state: Arc<RwLock<SessionState<C, S>>>,
  events_keepalive: InactiveReceiver<Event>,
}

impl<C: RemoteClient, S: PresentationSink> Clone for Inspector<C, S> {
  fn clone(&self) -> Self {
    Self {
      state: Arc::clone(&self.state),
      events_keepalive: self.events_keepalive.clone(),
    }
  }
}

impl<C: RemoteClient, S: PresentationSink> std::fmt::Debug for Inspector<C, S> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Inspector").finish_non_exhaustive()
  }
}

struct SessionState<C, S> {
  client: C,
  sink: S,
  mirror: MirrorTree,
  selected: Option<ElementHandle>,
  detailed: bool,
  highlight: bool,
  /// Display name of the editable property the user last picked; restored
  /// as the preselected entry on every catalog render.
  last_editable_selection: Option<String>,
  events_tx: Sender<Event>,
}

impl<C: RemoteClient, S: PresentationSink> Inspector<C, S> {
  pub fn new(client: C, sink: S) -> Self {
    let (mut tx, rx) = async_broadcast::broadcast(EVENT_CHANNEL_CAPACITY);
    tx.set_overflow(true); // Drop oldest events when full

    let state = SessionState {
      client,
      sink,
      mirror: MirrorTree::new(tx.clone()),
      selected: None,
      detailed: false,
      highlight: true,
      last_editable_selection: None,
      events_tx: tx,
    };

    Self {
      state: Arc::new(RwLock::new(state)),
      events_keepalive: rx.deactivate(),
    }
  }

  /// Subscribe to the session's event stream.
  pub fn subscribe(&self) -> Receiver<Event> {
    self.events_keepalive.activate_cloned()
  }

  #[inline]
  fn read<R>(&self, f: impl FnOnce(&SessionState<C, S>) -> R) -> R {
    f(&self.state.read())
  }

  #[inline]
  fn write<R>(&self, f: impl FnOnce(&mut SessionState<C, S>) -> R) -> R {
    f(&mut self.state.write())
  }

  /// Apply one notification from the remote stream, in arrival order.
  ///
  /// Post-condition: if the selected node was on-screen before the
  /// mutation, it is revealed again afterwards.
  pub fn apply(&self, notification: &TreeNotification) {
    let now = Instant::now();
    self.write(|s| {
      let keep_selected_visible = s.sink.selection_on_screen();

      match notification {
        TreeNotification::Added {
          relation,
          descriptor,
        } => {
          s.mirror.apply_added(relation, descriptor, &mut s.sink, now);
        }
        TreeNotification::Removed { handle } => {
          s.mirror.apply_removed(*handle, &mut s.sink, now);
          if s.selected == Some(*handle) {
            s.selected = None;
            s.emit(Event::SelectionChanged { handle: None });
            s.render_cleared();
          }
        }
      }

      if keep_selected_visible {
        s.sink.reveal_selection();
      }
    });
  }

  /// Drive the redraw coalescer; returns whether the coalesced redraw
  /// fired. Call this from the host loop's idle/timer tick.
  pub fn pump(&self) -> bool {
    let now = Instant::now();
    self.write(|s| s.mirror.pump(now, &mut s.sink))
  }

  /// Select an element and render its details, rows and highlight.
  pub fn select(&self, handle: ElementHandle) {
    self.write(|s| {
      s.selected = Some(handle);
      s.emit(Event::SelectionChanged {
        handle: Some(handle),
      });
      s.render_selection();
    });
  }

  /// Clear the selection and every dependent render.
  pub fn clear_selection(&self) {
    self.write(|s| {
      s.selected = None;
      s.emit(Event::SelectionChanged { handle: None });
      s.render_cleared();
    });
  }

  pub fn selected(&self) -> Option<ElementHandle> {
    self.read(|s| s.selected)
  }

  /// Hit test without changing the selection.
  pub fn element_at(&self, point: Point) -> Option<ElementHandle> {
    self.read(|s| hittest::element_at(&s.client, &s.mirror, point))
  }

  /// Hit test a screen point and select the result. Returns `false` when
  /// nothing was hit, or the hit element is not mirrored and attached.
  pub fn select_from_point(&self, point: Point) -> bool {
    self.write(|s| {
      let Some(handle) = hittest::element_at(&s.client, &s.mirror, point) else {
        return false;
      };
      let Some(node) = s.mirror.lookup(handle) else {
        return false;
      };
      if node.presentation.is_none() {
        return false;
      }

      s.selected = Some(handle);
      s.emit(Event::SelectionChanged {
        handle: Some(handle),
      });
      s.render_selection();
      s.sink.reveal_selection();
      true
    })
  }

  /// Toggle detailed property display; re-renders the attribute rows for
  /// the current selection.
  pub fn set_detailed(&self, detailed: bool) {
    self.write(|s| {
      s.detailed = detailed;
      s.render_rows_for_selection();
    });
  }

  pub fn detailed(&self) -> bool {
    self.read(|s| s.detailed)
  }

  /// Toggle selection highlighting; refreshes the overlay immediately.
  pub fn set_highlight(&self, highlight: bool) {
    self.write(|s| {
      s.highlight = highlight;
      s.refresh_highlight();
    });
  }

  pub fn highlight(&self) -> bool {
    self.read(|s| s.highlight)
  }

  /// Remember the editable property the user picked, so the next catalog
  /// render preselects it again.
  pub fn set_editable_selection(&self, display_name: &str) {
    self.write(|s| s.last_editable_selection = Some(display_name.to_owned()));
  }

  /// Clear a property on the selected element and re-render. No-op without
  /// a selection.
  pub fn clear_selected_property(&self, editable: &EditableProperty) -> SpyResult<()> {
    self.write(|s| {
      let Some(handle) = s.selected else {
        return Ok(());
      };
      s.client.clear_property(handle, editable.index)?;
      s.render_selection();
      Ok(())
    })
  }

  /// Set a property on the selected element from a literal string: the
  /// display name is split back into name and type, an instance of the
  /// type is created remotely from the literal, and the property is set to
  /// it. Re-renders on success. No-op without a selection.
  pub fn set_selected_property(&self, editable: &EditableProperty, literal: &str) -> SpyResult<()> {
    self.write(|s| {
      let Some(handle) = s.selected else {
        return Ok(());
      };
      let (_name, type_name) = editable.parse()?;
      let value_handle = s.client.create_instance(&type_name, literal)?;
      s.client.set_property(handle, value_handle, editable.index)?;
      s.render_selection();
      Ok(())
    })
  }

  /// Snapshot queries into the mirror.
  pub fn roots(&self) -> Vec<ElementHandle> {
    self.read(|s| s.mirror.roots().to_vec())
  }

  pub fn children_of(&self, handle: ElementHandle) -> Vec<ElementHandle> {
    self.read(|s| s.mirror.children_of(handle).to_vec())
  }

  pub fn title_of(&self, handle: ElementHandle) -> Option<String> {
    self.read(|s| s.mirror.lookup(handle).map(|node| node.title.clone()))
  }
}

impl<C: RemoteClient, S: PresentationSink> SessionState<C, S> {
  fn emit(&self, event: Event) {
    if let Err(e) = self.events_tx.try_broadcast(event) {
      if e.is_full() {
        log::error!("event channel overflow - events are being dropped");
      }
    }
  }

  /// Render everything that depends on the selection: the details header,
  /// the attribute rows, and the highlight.
  fn render_selection(&mut self) {
    let Some(handle) = self.selected else {
      self.render_cleared();
      return;
    };

    let is_root = self
      .mirror
      .lookup(handle)
      .is_some_and(|node| node.parent.is_none());

    let object = self.client.resolve_object(handle);

    let class_name = match &object {
      Ok(object) => self
        .client
        .class_name(object)
        .unwrap_or_else(|err| err.inline_message()),
      Err(err) => err.inline_message(),
    };

    let (name, rect_text) = match &object {
      Ok(object) => {
        let name = self
          .client
          .element_name(object)
          .unwrap_or_else(|err| err.inline_message());
        let rect = if is_root {
          geometry::resolve_root_rect(&self.client, object).map(|resolved| resolved.rect)
        } else {
          geometry::resolve_relative_rect(&self.client, object)
        };
        let rect_text = rect.map_or_else(|| "Unknown".to_owned(), |rect| rect.to_string());
        (name, rect_text)
      }
      Err(_) => (String::new(), String::new()),
    };

    self
      .sink
      .render_selection_details(&class_name, &name, &rect_text);

    self.render_rows_for_selection();
    self.refresh_highlight();
  }

  fn render_cleared(&mut self) {
    self.sink.render_selection_details("", "", "");
    self.sink.render_rows(&[]);
    self.sink.render_editable(&[], None);
    self.sink.render_highlight(None);
    self.emit(Event::HighlightChanged { rect: None });
  }

  /// Attribute rows and editable catalog; only mirrored non-root
  /// selections carry a property chain worth showing.
  fn render_rows_for_selection(&mut self) {
    let chain_owner = self.selected.filter(|&handle| {
      self
        .mirror
        .lookup(handle)
        .is_some_and(|node| node.parent.is_some())
    });

    match chain_owner {
      Some(handle) => {
        let catalog = properties::build_rows(&self.client, handle, self.detailed);
        let preselect = self.preselect_index(&catalog);
        self.sink.render_rows(&catalog.rows);
        self.sink.render_editable(&catalog.editable, preselect);
      }
      None => {
        self.sink.render_rows(&[]);
        self.sink.render_editable(&[], None);
      }
    }
  }

  /// Restore the user's last editable pick where possible, falling back to
  /// the first entry.
  fn preselect_index(&self, catalog: &PropertyCatalog) -> Option<usize> {
    if catalog.editable.is_empty() {
      return None;
    }
    self
      .last_editable_selection
      .as_deref()
      .and_then(|last| {
        catalog
          .editable
          .iter()
          .position(|entry| entry.display_name == last)
      })
      .or(Some(0))
  }

  fn refresh_highlight(&mut self) {
    let rect = if self.highlight {
      self.selected.and_then(|handle| self.highlight_rect(handle))
    } else {
      None
    };
    self.sink.render_highlight(rect);
    self.emit(Event::HighlightChanged { rect });
  }

  /// Physical-pixel rectangle for the highlight overlay: the element's
  /// logical rectangle in its root's space, translated by the root's
  /// origin, then scaled up by the hosting window's DPI.
  fn highlight_rect(&self, handle: ElementHandle) -> Option<Rect> {
    let root = self.mirror.root_of(handle)?;
    let root_object = self.client.resolve_object(root).ok()?;
    let resolved = geometry::resolve_root_rect(&self.client, &root_object)?;

    let logical = if root == handle {
      resolved.rect
    } else {
      let object = self.client.resolve_object(handle).ok()?;
      geometry::resolve_relative_rect(&self.client, &object)?
        .translate(resolved.rect.x, resolved.rect.y)
    };

    let physical = match resolved.window {
      Some(window) => logical.to_physical(self.client.window_dpi(window)),
      None => logical,
    };

    if physical.is_empty() {
      None
    } else {
      Some(physical)
    }
  }
}
