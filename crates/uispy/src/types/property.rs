/*!
Property-chain data: what the remote reports, and the display-ready rows
the presenter derives from it.

The chain is the ordered set of candidate values/sources (local, style,
template, default, animation, ...) contributing to a property's effective
value on a remote element. Chain data is ephemeral; it is re-fetched on
every selection change and never persisted.
*/

use super::{PropertyIndex, SpyError};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Metadata bit-flags attached to a property-chain value.
///
/// The flag set is fixed by the remote protocol; unrecognized bits are kept
/// and rendered as their numeric remainder rather than silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MetadataBits(pub u64);

impl MetadataBits {
  /// The value string is the decimal handle of the referenced object.
  pub const VALUE_HANDLE: Self = Self(0x01);
  /// The property cannot be written.
  pub const PROPERTY_READ_ONLY: Self = Self(0x02);
  /// The referenced value is a collection.
  pub const VALUE_COLLECTION: Self = Self(0x04);
  /// The referenced collection cannot be modified.
  pub const VALUE_COLLECTION_READ_ONLY: Self = Self(0x08);
  /// The value is a binding expression rather than a settled value.
  pub const VALUE_BINDING_EXPRESSION: Self = Self(0x10);
  /// The value is null.
  pub const VALUE_NULL: Self = Self(0x20);
  /// Both a handle and an evaluated value are carried.
  pub const VALUE_HANDLE_AND_EVALUATED_VALUE: Self = Self(0x40);

  const LABELS: [(Self, &'static str); 7] = [
    (Self::VALUE_HANDLE, "IsValueHandle"),
    (Self::PROPERTY_READ_ONLY, "IsPropertyReadOnly"),
    (Self::VALUE_COLLECTION, "IsValueCollection"),
    (Self::VALUE_COLLECTION_READ_ONLY, "IsValueCollectionReadOnly"),
    (Self::VALUE_BINDING_EXPRESSION, "IsValueBindingExpression"),
    (Self::VALUE_NULL, "IsValueNull"),
    (
      Self::VALUE_HANDLE_AND_EVALUATED_VALUE,
      "IsValueHandleAndEvaluatedValue",
    ),
  ];

  pub const fn contains(self, flag: Self) -> bool {
    self.0 & flag.0 == flag.0
  }

  /// Comma-joined labels for display. Bits outside the known set are
  /// appended as their numeric remainder.
  pub fn labels(self) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut remainder = self.0;
    for (flag, label) in Self::LABELS {
      if self.contains(flag) {
        parts.push((*label).to_owned());
        remainder &= !flag.0;
      }
    }
    if remainder != 0 {
      parts.push(remainder.to_string());
    }
    parts.join(", ")
  }
}

/// Provenance of one candidate value in a property chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ValueSource {
  Unknown,
  Default,
  BuiltInStyle,
  Style,
  /// Set explicitly by the developer on the element itself.
  Local,
  Inherited,
  DefaultStyleTrigger,
  TemplateTrigger,
  StyleTrigger,
  ImplicitStyleReference,
  ParentTemplate,
  ParentTemplateTrigger,
  Animation,
  Coercion,
  VisualState,
  /// A source kind this build does not know about; carries the raw value.
  Other(i32),
}

impl ValueSource {
  /// Decode the remote protocol's raw source discriminant.
  pub const fn from_raw(raw: i32) -> Self {
    match raw {
      0 => Self::Unknown,
      1 => Self::Default,
      2 => Self::BuiltInStyle,
      3 => Self::Style,
      4 => Self::Local,
      5 => Self::Inherited,
      6 => Self::DefaultStyleTrigger,
      7 => Self::TemplateTrigger,
      8 => Self::StyleTrigger,
      9 => Self::ImplicitStyleReference,
      10 => Self::ParentTemplate,
      11 => Self::ParentTemplateTrigger,
      12 => Self::Animation,
      13 => Self::Coercion,
      14 => Self::VisualState,
      other => Self::Other(other),
    }
  }

  /// Display label. Matches the remote protocol's enumerator names;
  /// unrecognized values render as their raw number.
  pub fn label(self) -> String {
    match self {
      Self::Unknown => "BaseValueSourceUnknown".to_owned(),
      Self::Default => "BaseValueSourceDefault".to_owned(),
      Self::BuiltInStyle => "BaseValueSourceBuiltInStyle".to_owned(),
      Self::Style => "BaseValueSourceStyle".to_owned(),
      Self::Local => "BaseValueSourceLocal".to_owned(),
      Self::Inherited => "Inherited".to_owned(),
      Self::DefaultStyleTrigger => "DefaultStyleTrigger".to_owned(),
      Self::TemplateTrigger => "TemplateTrigger".to_owned(),
      Self::StyleTrigger => "StyleTrigger".to_owned(),
      Self::ImplicitStyleReference => "ImplicitStyleReference".to_owned(),
      Self::ParentTemplate => "ParentTemplate".to_owned(),
      Self::ParentTemplateTrigger => "ParentTemplateTrigger".to_owned(),
      Self::Animation => "Animation".to_owned(),
      Self::Coercion => "Coercion".to_owned(),
      Self::VisualState => "BaseValueSourceVisualState".to_owned(),
      Self::Other(raw) => raw.to_string(),
    }
  }
}

/// One entry of a chain's source table: where a candidate value came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PropertySource {
  /// Target type of the contributing style, when the source is one.
  pub target_type: String,
  /// Name of the contributing style/template resource.
  pub name: String,
  pub source: ValueSource,
}

/// One candidate value in a property chain, as reported by the remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PropertyValue {
  /// Index into the chain's source table.
  pub source_index: u32,
  /// Property index used to address mutation requests.
  pub index: PropertyIndex,
  pub name: String,
  /// Raw value string. When `metadata` carries `VALUE_HANDLE`, this is the
  /// decimal handle of the referenced object.
  pub value: String,
  pub type_name: String,
  pub declaring_type: String,
  pub value_type: String,
  pub item_type: String,
  /// Overridden entries lost to a higher-priority source; they are shown in
  /// detailed mode but are not editable.
  pub overridden: bool,
  pub metadata: MetadataBits,
}

/// The full property/override chain for one element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PropertyChain {
  pub sources: Vec<PropertySource>,
  pub values: Vec<PropertyValue>,
}

/// One display-ready attribute row. Rebuilt on every selection change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct PropertyRow {
  pub name: String,
  /// Display-ready value: verbatim in detailed mode, otherwise with null
  /// and handle values substituted by their markers.
  pub value: String,
  pub type_name: String,
  pub declaring_type: String,
  pub value_type: String,
  pub item_type: String,
  pub overridden: bool,
  pub metadata: MetadataBits,
  pub source_target_type: String,
  pub source_name: String,
  pub source: ValueSource,
}

impl PropertyRow {
  /// Synthetic row carrying a remote failure code; used when the chain
  /// itself could not be fetched.
  pub fn error(code: u32) -> Self {
    Self {
      name: format!("Error {code:08X}"),
      value: String::new(),
      type_name: String::new(),
      declaring_type: String::new(),
      value_type: String::new(),
      item_type: String::new(),
      overridden: false,
      metadata: MetadataBits::default(),
      source_target_type: String::new(),
      source_name: String::new(),
      source: ValueSource::Unknown,
    }
  }
}

/// A non-overridden chain entry offered for editing, displayed as
/// `"name (type)"` and addressed by its property index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct EditableProperty {
  pub display_name: String,
  pub index: PropertyIndex,
}

impl EditableProperty {
  pub fn new(name: &str, type_name: &str, index: PropertyIndex) -> Self {
    Self {
      display_name: format!("{name} ({type_name})"),
      index,
    }
  }

  /// Split the display name back into `(name, type)` for a mutation
  /// request. Rejects anything that doesn't have the `name (type)` shape.
  pub fn parse(&self) -> Result<(String, String), SpyError> {
    let display = self.display_name.as_str();
    let malformed = || SpyError::MalformedProperty(self.display_name.clone());

    let open = display.rfind('(').ok_or_else(malformed)?;
    if open < 2 || !display.ends_with(')') || display.as_bytes().get(open - 1) != Some(&b' ') {
      return Err(malformed());
    }

    let name = &display[..open - 1];
    let type_name = &display[open + 1..display.len() - 1];
    if name.is_empty() || type_name.is_empty() {
      return Err(malformed());
    }

    Ok((name.to_owned(), type_name.to_owned()))
  }
}

/// Output of the property-chain presenter: display rows plus the editable
/// catalog, in chain order.
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export)]
pub struct PropertyCatalog {
  pub rows: Vec<PropertyRow>,
  pub editable: Vec<EditableProperty>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn metadata_labels_join_known_bits() {
    let bits = MetadataBits(MetadataBits::VALUE_HANDLE.0 | MetadataBits::VALUE_NULL.0);
    assert_eq!(bits.labels(), "IsValueHandle, IsValueNull");
  }

  #[test]
  fn metadata_labels_keep_unknown_remainder() {
    let bits = MetadataBits(MetadataBits::PROPERTY_READ_ONLY.0 | 0x180);
    assert_eq!(bits.labels(), "IsPropertyReadOnly, 384");
  }

  #[test]
  fn metadata_labels_empty_for_zero() {
    assert_eq!(MetadataBits::default().labels(), "");
  }

  #[test]
  fn source_decoding_round_trips_known_values() {
    assert_eq!(ValueSource::from_raw(4), ValueSource::Local);
    assert_eq!(ValueSource::from_raw(14), ValueSource::VisualState);
    assert_eq!(ValueSource::from_raw(99), ValueSource::Other(99));
  }

  #[test]
  fn source_labels_match_protocol_names() {
    assert_eq!(ValueSource::Local.label(), "BaseValueSourceLocal");
    assert_eq!(ValueSource::Inherited.label(), "Inherited");
    assert_eq!(ValueSource::Other(37).label(), "37");
  }

  #[test]
  fn editable_parse_round_trips() {
    let editable =
      EditableProperty::new("Background", "Windows.UI.Xaml.Media.Brush", PropertyIndex(12));
    assert_eq!(
      editable.display_name,
      "Background (Windows.UI.Xaml.Media.Brush)"
    );
    assert_eq!(
      editable.parse().unwrap(),
      (
        "Background".to_owned(),
        "Windows.UI.Xaml.Media.Brush".to_owned()
      )
    );
  }

  #[test]
  fn editable_parse_handles_parenthesized_type_arguments() {
    // rfind picks the last '(' so generic-looking names still split at the
    // final type group.
    let editable = EditableProperty {
      display_name: "Content (Windows.Foundation.IReference`1<Double>)".to_owned(),
      index: PropertyIndex(3),
    };
    let (name, type_name) = editable.parse().unwrap();
    assert_eq!(name, "Content");
    assert_eq!(type_name, "Windows.Foundation.IReference`1<Double>");
  }

  #[test]
  fn editable_parse_rejects_malformed_entries() {
    for display in ["NoType", "Name()", "Name ()", "(Type)", "Name(Type)", "x (T"] {
      let editable = EditableProperty {
        display_name: display.to_owned(),
        index: PropertyIndex(0),
      };
      assert!(
        matches!(editable.parse(), Err(SpyError::MalformedProperty(_))),
        "expected rejection for {display:?}"
      );
    }
  }
}
