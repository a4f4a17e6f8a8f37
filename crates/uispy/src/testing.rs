/*!
Test doubles: a recording presentation sink and a fake remote client
implementing the introspection contract, including the local-value write
semantics of `set_property`.
*/

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::client::{Layout, RemoteClient, RootProbe};
use crate::sink::{InsertAt, PresentationSink};
use crate::types::{
  EditableProperty, ElementHandle, NativeWindowId, PointF, PresentationRef, PropertyChain,
  PropertyIndex, PropertyRow, PropertySource, Rect, SpyError, SpyResult, ValueSource,
};

/// One recorded `attach_node` call.
#[derive(Debug, Clone)]
pub(crate) struct Attachment {
  pub(crate) node: PresentationRef,
  pub(crate) parent: Option<PresentationRef>,
  pub(crate) at: InsertAt,
  pub(crate) handle: ElementHandle,
  pub(crate) title: String,
}

/// Presentation sink that records every call.
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
  next_ref: u64,
  pub(crate) attachments: Vec<Attachment>,
  pub(crate) detached: Vec<PresentationRef>,
  pub(crate) suspend_count: usize,
  pub(crate) structure_changes: usize,
  pub(crate) rows: Vec<Vec<PropertyRow>>,
  pub(crate) editable: Vec<(Vec<EditableProperty>, Option<usize>)>,
  pub(crate) highlights: Vec<Option<Rect>>,
  pub(crate) details: Vec<(String, String, String)>,
  pub(crate) reveal_count: usize,
  /// When set, `attach_node` refuses the insertion.
  pub(crate) reject_attach: bool,
  /// Reported by `selection_on_screen`.
  pub(crate) selection_visible: bool,
}

impl RecordingSink {
  /// Latest attachment for a handle (a handle re-attaches on recovery).
  pub(crate) fn attachment_for(&self, handle: ElementHandle) -> Option<&Attachment> {
    self.attachments.iter().rev().find(|a| a.handle == handle)
  }

  pub(crate) fn last_rows(&self) -> Option<&Vec<PropertyRow>> {
    self.rows.last()
  }

  pub(crate) fn last_editable(&self) -> Option<&(Vec<EditableProperty>, Option<usize>)> {
    self.editable.last()
  }

  pub(crate) fn last_details(&self) -> Option<&(String, String, String)> {
    self.details.last()
  }
}

impl PresentationSink for RecordingSink {
  fn attach_node(
    &mut self,
    parent: Option<PresentationRef>,
    at: InsertAt,
    handle: ElementHandle,
    title: &str,
  ) -> Option<PresentationRef> {
    if self.reject_attach {
      return None;
    }
    self.next_ref += 1;
    let node = PresentationRef(self.next_ref);
    self.attachments.push(Attachment {
      node,
      parent,
      at,
      handle,
      title: title.to_owned(),
    });
    Some(node)
  }

  fn detach_node(&mut self, node: PresentationRef) {
    self.detached.push(node);
  }

  fn suspend_painting(&mut self) {
    self.suspend_count += 1;
  }

  fn on_structure_changed(&mut self) {
    self.structure_changes += 1;
  }

  fn render_rows(&mut self, rows: &[PropertyRow]) {
    self.rows.push(rows.to_vec());
  }

  fn render_editable(&mut self, editable: &[EditableProperty], preselect: Option<usize>) {
    self.editable.push((editable.to_vec(), preselect));
  }

  fn render_highlight(&mut self, rect: Option<Rect>) {
    self.highlights.push(rect);
  }

  fn render_selection_details(&mut self, class_name: &str, name: &str, rect: &str) {
    self
      .details
      .push((class_name.to_owned(), name.to_owned(), rect.to_owned()));
  }

  fn selection_on_screen(&self) -> bool {
    self.selection_visible
  }

  fn reveal_selection(&mut self) {
    self.reveal_count += 1;
  }
}

/// Shared handle to a [`RecordingSink`], for tests that hand the sink to an
/// inspector but still want to inspect it afterwards.
#[derive(Debug, Clone, Default)]
pub(crate) struct SharedSink(pub(crate) Rc<RefCell<RecordingSink>>);

impl PresentationSink for SharedSink {
  fn attach_node(
    &mut self,
    parent: Option<PresentationRef>,
    at: InsertAt,
    handle: ElementHandle,
    title: &str,
  ) -> Option<PresentationRef> {
    self.0.borrow_mut().attach_node(parent, at, handle, title)
  }

  fn detach_node(&mut self, node: PresentationRef) {
    self.0.borrow_mut().detach_node(node);
  }

  fn suspend_painting(&mut self) {
    self.0.borrow_mut().suspend_painting();
  }

  fn on_structure_changed(&mut self) {
    self.0.borrow_mut().on_structure_changed();
  }

  fn render_rows(&mut self, rows: &[PropertyRow]) {
    self.0.borrow_mut().render_rows(rows);
  }

  fn render_editable(&mut self, editable: &[EditableProperty], preselect: Option<usize>) {
    self.0.borrow_mut().render_editable(editable, preselect);
  }

  fn render_highlight(&mut self, rect: Option<Rect>) {
    self.0.borrow_mut().render_highlight(rect);
  }

  fn render_selection_details(&mut self, class_name: &str, name: &str, rect: &str) {
    self
      .0
      .borrow_mut()
      .render_selection_details(class_name, name, rect);
  }

  fn selection_on_screen(&self) -> bool {
    self.0.borrow().selection_on_screen()
  }

  fn reveal_selection(&mut self) {
    self.0.borrow_mut().reveal_selection();
  }
}

#[derive(Debug, Default)]
struct FakeInner {
  objects: RefCell<HashSet<ElementHandle>>,
  class_names: RefCell<HashMap<ElementHandle, SpyResult<String>>>,
  element_names: RefCell<HashMap<ElementHandle, SpyResult<String>>>,
  probes: RefCell<HashMap<ElementHandle, RootProbe>>,
  contents: RefCell<HashMap<ElementHandle, ElementHandle>>,
  layouts: RefCell<HashMap<ElementHandle, Layout>>,
  hits: RefCell<HashMap<ElementHandle, Vec<ElementHandle>>>,
  probed_points: RefCell<Vec<(ElementHandle, PointF)>>,
  bad_handles: RefCell<HashSet<ElementHandle>>,
  window_rects: RefCell<HashMap<NativeWindowId, Rect>>,
  window_dpis: RefCell<HashMap<NativeWindowId, u32>>,
  chains: RefCell<HashMap<ElementHandle, SpyResult<PropertyChain>>>,
  instance_literals: RefCell<HashMap<ElementHandle, String>>,
  created: RefCell<Vec<(String, String)>>,
  cleared: RefCell<Vec<(ElementHandle, PropertyIndex)>>,
  next_instance: Cell<u64>,
  fail_create: Cell<Option<u32>>,
  fail_set: Cell<Option<u32>>,
  fail_clear: Cell<Option<u32>>,
}

/// Fake remote client. Cheap to clone; clones share state, so tests can
/// keep one and hand another to the inspector.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeRemote {
  inner: Rc<FakeInner>,
}

impl FakeRemote {
  pub(crate) fn new() -> Self {
    let fake = Self::default();
    fake.inner.next_instance.set(0x9000_0000);
    fake
  }

  pub(crate) fn add_object(&self, handle: ElementHandle) {
    self.inner.objects.borrow_mut().insert(handle);
  }

  pub(crate) fn set_class(&self, handle: ElementHandle, class_name: &str) {
    self.add_object(handle);
    self
      .inner
      .class_names
      .borrow_mut()
      .insert(handle, Ok(class_name.to_owned()));
  }

  pub(crate) fn set_class_error(&self, handle: ElementHandle, code: u32) {
    self.add_object(handle);
    self
      .inner
      .class_names
      .borrow_mut()
      .insert(handle, Err(SpyError::Remote(code)));
  }

  pub(crate) fn set_element_name(&self, handle: ElementHandle, name: &str) {
    self
      .inner
      .element_names
      .borrow_mut()
      .insert(handle, Ok(name.to_owned()));
  }

  pub(crate) fn set_probe(&self, handle: ElementHandle, probe: RootProbe) {
    self.add_object(handle);
    self.inner.probes.borrow_mut().insert(handle, probe);
  }

  pub(crate) fn set_content(&self, root: ElementHandle, content: ElementHandle) {
    self.inner.contents.borrow_mut().insert(root, content);
  }

  pub(crate) fn set_layout(&self, handle: ElementHandle, layout: Layout) {
    self.inner.layouts.borrow_mut().insert(handle, layout);
  }

  pub(crate) fn set_hits(&self, subtree: ElementHandle, results: Vec<ElementHandle>) {
    self.inner.hits.borrow_mut().insert(subtree, results);
  }

  pub(crate) fn mark_bad_handle(&self, handle: ElementHandle) {
    self.inner.bad_handles.borrow_mut().insert(handle);
  }

  pub(crate) fn set_window(&self, window: NativeWindowId, rect: Rect, dpi: u32) {
    self.inner.window_rects.borrow_mut().insert(window, rect);
    self.inner.window_dpis.borrow_mut().insert(window, dpi);
  }

  pub(crate) fn set_window_dpi(&self, window: NativeWindowId, dpi: u32) {
    self.inner.window_dpis.borrow_mut().insert(window, dpi);
  }

  pub(crate) fn set_chain(&self, handle: ElementHandle, chain: PropertyChain) {
    self.inner.chains.borrow_mut().insert(handle, Ok(chain));
  }

  pub(crate) fn set_chain_error(&self, handle: ElementHandle, code: u32) {
    self
      .inner
      .chains
      .borrow_mut()
      .insert(handle, Err(SpyError::Remote(code)));
  }

  pub(crate) fn fail_create(&self, code: u32) {
    self.inner.fail_create.set(Some(code));
  }

  pub(crate) fn fail_set(&self, code: u32) {
    self.inner.fail_set.set(Some(code));
  }

  pub(crate) fn fail_clear(&self, code: u32) {
    self.inner.fail_clear.set(Some(code));
  }

  pub(crate) fn probed_points(&self) -> Vec<(ElementHandle, PointF)> {
    self.inner.probed_points.borrow().clone()
  }

  pub(crate) fn created(&self) -> Vec<(String, String)> {
    self.inner.created.borrow().clone()
  }

  pub(crate) fn cleared(&self) -> Vec<(ElementHandle, PropertyIndex)> {
    self.inner.cleared.borrow().clone()
  }
}

impl RemoteClient for FakeRemote {
  type Object = ElementHandle;

  fn resolve_object(&self, handle: ElementHandle) -> SpyResult<Self::Object> {
    if self.inner.objects.borrow().contains(&handle) {
      Ok(handle)
    } else {
      Err(SpyError::NotFound(handle))
    }
  }

  fn resolve_handle(&self, object: &Self::Object) -> SpyResult<ElementHandle> {
    if self.inner.bad_handles.borrow().contains(object) {
      Err(SpyError::Remote(0x8000_FFFF))
    } else {
      Ok(*object)
    }
  }

  fn class_name(&self, object: &Self::Object) -> SpyResult<String> {
    self
      .inner
      .class_names
      .borrow()
      .get(object)
      .cloned()
      .unwrap_or(Err(SpyError::Remote(0x8000_4002)))
  }

  fn element_name(&self, object: &Self::Object) -> SpyResult<String> {
    self
      .inner
      .element_names
      .borrow()
      .get(object)
      .cloned()
      .unwrap_or(Ok(String::new()))
  }

  fn probe_root(&self, object: &Self::Object) -> Option<RootProbe> {
    self.inner.probes.borrow().get(object).copied()
  }

  fn root_content(&self, object: &Self::Object) -> Option<Self::Object> {
    self.inner.contents.borrow().get(object).copied()
  }

  fn layout_to_root(&self, object: &Self::Object) -> Option<Layout> {
    self.inner.layouts.borrow().get(object).copied()
  }

  fn elements_at(&self, subtree: &Self::Object, point: PointF) -> Vec<Self::Object> {
    self.inner.probed_points.borrow_mut().push((*subtree, point));
    self
      .inner
      .hits
      .borrow()
      .get(subtree)
      .cloned()
      .unwrap_or_default()
  }

  fn window_rect(&self, window: NativeWindowId) -> Option<Rect> {
    self.inner.window_rects.borrow().get(&window).copied()
  }

  fn window_dpi(&self, window: NativeWindowId) -> u32 {
    self
      .inner
      .window_dpis
      .borrow()
      .get(&window)
      .copied()
      .unwrap_or(96)
  }

  fn property_chain(&self, handle: ElementHandle) -> SpyResult<PropertyChain> {
    self
      .inner
      .chains
      .borrow()
      .get(&handle)
      .cloned()
      .unwrap_or(Err(SpyError::NotFound(handle)))
  }

  fn clear_property(&self, handle: ElementHandle, property: PropertyIndex) -> SpyResult<()> {
    if let Some(code) = self.inner.fail_clear.get() {
      return Err(SpyError::Remote(code));
    }
    self.inner.cleared.borrow_mut().push((handle, property));
    Ok(())
  }

  fn create_instance(&self, type_name: &str, value: &str) -> SpyResult<ElementHandle> {
    if let Some(code) = self.inner.fail_create.get() {
      return Err(SpyError::Remote(code));
    }
    self
      .inner
      .created
      .borrow_mut()
      .push((type_name.to_owned(), value.to_owned()));
    let handle = ElementHandle(self.inner.next_instance.get());
    self.inner.next_instance.set(handle.0 + 1);
    self
      .inner
      .instance_literals
      .borrow_mut()
      .insert(handle, value.to_owned());
    Ok(handle)
  }

  fn set_property(
    &self,
    handle: ElementHandle,
    value: ElementHandle,
    property: PropertyIndex,
  ) -> SpyResult<()> {
    if let Some(code) = self.inner.fail_set.get() {
      return Err(SpyError::Remote(code));
    }

    let literal = self
      .inner
      .instance_literals
      .borrow()
      .get(&value)
      .cloned()
      .ok_or(SpyError::NotFound(value))?;

    let mut chains = self.inner.chains.borrow_mut();
    let Some(Ok(chain)) = chains.get_mut(&handle) else {
      return Err(SpyError::NotFound(handle));
    };

    // Setting a property makes it a local value on the next chain fetch.
    let local_index = match chain
      .sources
      .iter()
      .position(|s| s.source == ValueSource::Local)
    {
      Some(index) => index,
      None => {
        chain.sources.push(PropertySource {
          target_type: String::new(),
          name: String::new(),
          source: ValueSource::Local,
        });
        chain.sources.len() - 1
      }
    };

    if let Some(entry) = chain.values.iter_mut().find(|v| v.index == property) {
      entry.value = literal;
      entry.source_index = local_index as u32;
    }

    Ok(())
  }
}
