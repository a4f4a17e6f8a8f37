/*!
Property-chain presentation: turns the raw override chain into display rows
and the editable-property catalog.

Non-detailed mode answers "what did the developer explicitly set" - only
local values are shown, and null/handle values are substituted by readable
markers. Detailed mode shows every entry verbatim with full provenance.
*/

use crate::client::RemoteClient;
use crate::types::{
  EditableProperty, ElementHandle, MetadataBits, PropertyCatalog, PropertyRow, PropertyValue,
  ValueSource,
};

/// Build the display rows and editable catalog for an element.
///
/// A chain-fetch failure never escapes this boundary; it becomes a single
/// synthetic error row and an empty editable list.
pub fn build_rows<C: RemoteClient>(
  client: &C,
  handle: ElementHandle,
  detailed: bool,
) -> PropertyCatalog {
  let chain = match client.property_chain(handle) {
    Ok(chain) => chain,
    Err(err) => {
      return PropertyCatalog {
        rows: vec![PropertyRow::error(err.code())],
        editable: Vec::new(),
      }
    }
  };

  let mut catalog = PropertyCatalog::default();

  for value in &chain.values {
    // Every non-overridden entry is editable, duplicates included - the
    // catalog mirrors the chain, last write wins in display order.
    if !value.overridden {
      catalog
        .editable
        .push(EditableProperty::new(&value.name, &value.type_name, value.index));
    }

    let (source, target_type, source_name) = match chain.sources.get(value.source_index as usize) {
      Some(source) => (
        source.source,
        source.target_type.clone(),
        source.name.clone(),
      ),
      None => {
        log::debug!(
          "chain entry {} refers to source index {} of {}",
          value.name,
          value.source_index,
          chain.sources.len()
        );
        (ValueSource::Unknown, String::new(), String::new())
      }
    };

    if !detailed && source != ValueSource::Local {
      continue;
    }

    catalog.rows.push(PropertyRow {
      name: value.name.clone(),
      value: render_value(client, value, detailed),
      type_name: value.type_name.clone(),
      declaring_type: value.declaring_type.clone(),
      value_type: value.value_type.clone(),
      item_type: value.item_type.clone(),
      overridden: value.overridden,
      metadata: value.metadata,
      source_target_type: target_type,
      source_name,
      source,
    });
  }

  catalog
}

/// Display rendering of one chain value.
fn render_value<C: RemoteClient>(client: &C, value: &PropertyValue, detailed: bool) -> String {
  if detailed {
    return value.value.clone();
  }

  if value.metadata.contains(MetadataBits::VALUE_NULL) {
    return "(null)".to_owned();
  }

  if value.metadata.contains(MetadataBits::VALUE_HANDLE) {
    // The raw value is the referenced object's handle; show its class name
    // instead of a bare number.
    let referenced = ElementHandle(value.value.trim().parse().unwrap_or(0));
    let class_name = client
      .resolve_object(referenced)
      .and_then(|object| client.class_name(&object))
      .unwrap_or_else(|err| err.inline_message());
    let shape = if value.metadata.contains(MetadataBits::VALUE_COLLECTION) {
      "collection"
    } else {
      "data"
    };
    return format!("({shape}; {class_name})");
  }

  value.value.clone()
}
