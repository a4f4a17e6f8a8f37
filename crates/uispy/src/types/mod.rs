/*! Core types for uispy. */

#![allow(missing_docs)]

mod element;
mod error;
mod event;
mod geometry;
mod ids;
mod property;

pub use element::{ElementDescriptor, ParentChildRelation, TreeNotification};
pub use error::{SpyError, SpyResult};
pub use event::Event;
pub use geometry::{Point, PointF, Rect, RectF};
pub use ids::{ElementHandle, NativeWindowId, PresentationRef, PropertyIndex};
pub use property::{
  EditableProperty, MetadataBits, PropertyCatalog, PropertyChain, PropertyRow, PropertySource,
  PropertyValue, ValueSource,
};
