/*!
The mirror tree: a local, incrementally maintained copy of the remote
element hierarchy.

The tree is built exclusively from add/remove notifications; the full tree
is never re-fetched. All mutations go through methods that maintain the
invariants below and emit events.

## Invariants

1. **Uniqueness**: at most one [`MirrorNode`] per handle. A duplicate add is
   corruption recovery, not an error: the stale node is removed (detaching
   its presentation subtree, orphaning its children in the adjacency map)
   and the element is inserted fresh.
2. **Tree shape**: a non-root node's handle appears exactly once in its
   parent's ordered child list; roots appear exactly once in the root list.
3. **Lifetime split**: a node's lifetime in the map matches the remote
   element's lifetime. Presentation attachment is a derived, re-creatable
   projection - removal clears descendants' presentation references but
   leaves the descendants mirrored.

The notification stream is treated as adversarial: at-least-once delivery,
possibly reordered within a short window. Out-of-range child indexes clamp
to append, removals of unknown handles are no-ops.
*/

mod coalesce;

pub use coalesce::{RedrawCoalescer, REDRAW_CEILING, REDRAW_DELAY};

use std::collections::HashMap;
use std::time::Instant;

use async_broadcast::Sender;

use crate::sink::{InsertAt, PresentationSink};
use crate::types::{
  ElementDescriptor, ElementHandle, Event, ParentChildRelation, PresentationRef,
};

/// Local representation of one remote element.
#[derive(Debug, Clone)]
pub struct MirrorNode {
  pub handle: ElementHandle,
  /// `None` for roots.
  pub parent: Option<ElementHandle>,
  /// Display title, composed from the element's type and name.
  pub title: String,
  /// Cached presentation reference. Owned by the presentation layer; `None`
  /// while the node is not attached to a visible subtree.
  pub presentation: Option<PresentationRef>,
}

/// Owns the mirrored tree structure and the redraw coalescer.
pub struct MirrorTree {
  nodes: HashMap<ElementHandle, MirrorNode>,
  /// Parent handle to ordered child handles. Entries survive their parent's
  /// removal so orphaned subtrees can re-attach on recovery.
  children: HashMap<ElementHandle, Vec<ElementHandle>>,
  /// Top-level roots in insertion order.
  roots: Vec<ElementHandle>,
  coalescer: RedrawCoalescer,
  events_tx: Sender<Event>,
}

impl std::fmt::Debug for MirrorTree {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MirrorTree")
      .field("nodes", &self.nodes.len())
      .field("roots", &self.roots)
      .finish_non_exhaustive()
  }
}

impl MirrorTree {
  pub fn new(events_tx: Sender<Event>) -> Self {
    Self {
      nodes: HashMap::new(),
      children: HashMap::new(),
      roots: Vec::new(),
      coalescer: RedrawCoalescer::new(),
      events_tx,
    }
  }

  /// Apply an element-added notification.
  ///
  /// If the handle is already mirrored, the stale node is removed first
  /// (recovery path). An out-of-range `child_index` clamps to append. The
  /// node attaches to the presentation only when its parent is both
  /// mirrored and attached; otherwise it stays mirrored and unattached
  /// until a recovery reinsert of an ancestor brings it back.
  pub fn apply_added(
    &mut self,
    relation: &ParentChildRelation,
    descriptor: &ElementDescriptor,
    sink: &mut dyn PresentationSink,
    now: Instant,
  ) {
    let handle = relation.child;

    if self.nodes.contains_key(&handle) {
      log::warn!("duplicate add for element {handle}; removing the stale node first");
      self.apply_removed(handle, sink, now);
    }

    if self.coalescer.arm(now) {
      sink.suspend_painting();
    }

    let title = descriptor.display_title();
    self.emit(Event::ElementAdded {
      handle,
      parent: relation.parent,
      title: title.clone(),
    });
    self.nodes.insert(
      handle,
      MirrorNode {
        handle,
        parent: relation.parent,
        title,
        presentation: None,
      },
    );

    let (parent_ref, at) = match relation.parent {
      None => {
        self.roots.push(handle);
        (None, InsertAt::Last)
      }
      Some(parent) => {
        let at = self.link_child(parent, handle, relation.child_index);
        match self.nodes.get(&parent).and_then(|node| node.presentation) {
          Some(parent_ref) => (Some(parent_ref), at),
          None => return,
        }
      }
    };

    self.attach_subtree(handle, parent_ref, at, sink);
  }

  /// Apply an element-removed notification.
  ///
  /// No-op if the handle is unknown - the stream may emit a removal whose
  /// matching add was dropped earlier (observed with sandboxed host
  /// processes). Descendants stay mirrored with their presentation
  /// references cleared.
  pub fn apply_removed(
    &mut self,
    handle: ElementHandle,
    sink: &mut dyn PresentationSink,
    now: Instant,
  ) {
    let Some(node) = self.nodes.remove(&handle) else {
      log::debug!("removal for unknown element {handle}");
      return;
    };

    if self.coalescer.arm(now) {
      sink.suspend_painting();
    }

    if let Some(node_ref) = node.presentation {
      sink.detach_node(node_ref);
      self.clear_subtree_presentation(handle);
    }

    match node.parent {
      Some(parent) => {
        if let Some(siblings) = self.children.get_mut(&parent) {
          siblings.retain(|&sibling| sibling != handle);
        }
      }
      None => self.roots.retain(|&root| root != handle),
    }

    // The removed node's own child list stays behind: descendants remain
    // mirrored (orphaned) and re-attach on a recovery reinsert.

    self.emit(Event::ElementRemoved { handle });
  }

  /// Insert `child` into `parent`'s ordered child list and work out where
  /// the presentation item goes among its siblings.
  fn link_child(&mut self, parent: ElementHandle, child: ElementHandle, index: u32) -> InsertAt {
    let index = index as usize;
    let siblings = self.children.entry(parent).or_default();

    if index > siblings.len() {
      // Indexes can run ahead of the mirrored child list when notifications
      // race; clamp to append instead of failing.
      log::debug!(
        "child index {index} out of range for parent {parent} ({} mirrored); appending",
        siblings.len()
      );
      siblings.push(child);
      return InsertAt::Last;
    }

    let at = if index == 0 {
      InsertAt::First
    } else if index < siblings.len() {
      match siblings
        .get(index - 1)
        .and_then(|prev| self.nodes.get(prev))
        .and_then(|prev| prev.presentation)
      {
        Some(prev_ref) => InsertAt::After(prev_ref),
        None => InsertAt::Last,
      }
    } else {
      InsertAt::Last
    };

    siblings.insert(index, child);
    at
  }

  /// Attach a node and every already-mirrored descendant to the
  /// presentation. Iterative over an explicit stack; the remote tree can be
  /// arbitrarily deep.
  fn attach_subtree(
    &mut self,
    root: ElementHandle,
    parent_ref: Option<PresentationRef>,
    at: InsertAt,
    sink: &mut dyn PresentationSink,
  ) {
    let mut stack = vec![(root, parent_ref, at)];

    while let Some((handle, parent_ref, at)) = stack.pop() {
      let Some(node) = self.nodes.get_mut(&handle) else {
        log::warn!("mirrored child list refers to unknown element {handle}");
        continue;
      };

      let Some(node_ref) = sink.attach_node(parent_ref, at, handle, &node.title) else {
        // The widget rejected the insert; leave this subtree unattached.
        continue;
      };
      node.presentation = Some(node_ref);

      if let Some(kids) = self.children.get(&handle) {
        for &kid in kids.iter().rev() {
          stack.push((kid, Some(node_ref), InsertAt::Last));
        }
      }
    }
  }

  /// Clear the presentation reference of a subtree. Explicit work-list
  /// keyed by handle; recursion would overflow on deep trees.
  fn clear_subtree_presentation(&mut self, root: ElementHandle) {
    let mut queue = vec![root];
    while let Some(handle) = queue.pop() {
      if let Some(node) = self.nodes.get_mut(&handle) {
        node.presentation = None;
      }
      if let Some(kids) = self.children.get(&handle) {
        queue.extend(kids.iter().copied());
      }
    }
  }

  /// Drive the redraw coalescer. Fires the coalesced structure-changed
  /// signal when the quiescence window (or the storm ceiling) has elapsed.
  pub fn pump(&mut self, now: Instant, sink: &mut dyn PresentationSink) -> bool {
    if self.coalescer.fire(now) {
      sink.on_structure_changed();
      self.emit(Event::StructureChanged);
      true
    } else {
      false
    }
  }

  /// Whether a coalesced redraw is pending.
  pub const fn redraw_pending(&self) -> bool {
    self.coalescer.is_armed()
  }

  pub fn lookup(&self, handle: ElementHandle) -> Option<&MirrorNode> {
    self.nodes.get(&handle)
  }

  pub fn contains(&self, handle: ElementHandle) -> bool {
    self.nodes.contains_key(&handle)
  }

  /// Ordered children of an element (empty if none).
  pub fn children_of(&self, handle: ElementHandle) -> &[ElementHandle] {
    self.children.get(&handle).map_or(&[], Vec::as_slice)
  }

  /// Top-level roots in insertion order.
  pub fn roots(&self) -> &[ElementHandle] {
    &self.roots
  }

  /// Walk parent links up to the owning root. `None` when the chain is
  /// broken (an ancestor is no longer mirrored).
  pub fn root_of(&self, handle: ElementHandle) -> Option<ElementHandle> {
    let mut current = self.nodes.get(&handle)?;
    while let Some(parent) = current.parent {
      current = self.nodes.get(&parent)?;
    }
    Some(current.handle)
  }

  fn emit(&self, event: Event) {
    if let Err(e) = self.events_tx.try_broadcast(event) {
      if e.is_full() {
        log::error!("event channel overflow - events are being dropped");
      }
    }
  }
}
