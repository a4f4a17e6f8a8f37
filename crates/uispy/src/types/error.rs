/*! Error types for mirror and remote-call operations. */

use super::ElementHandle;

/// Errors surfaced by remote calls and edit operations.
///
/// Structural inconsistencies in the notification stream (duplicate adds,
/// out-of-range child indexes, removals of unknown handles) are recovered
/// inside the mirror and never reach this type. Geometry failures are
/// likewise not errors; resolvers return `None` and callers treat that as
/// "nothing to draw".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpyError {
  /// The inspected process or its diagnostics channel is gone.
  #[error("remote diagnostics channel unavailable")]
  RemoteUnavailable,

  /// A remote call failed with the given protocol failure code.
  #[error("remote call failed: {0:#010X}")]
  Remote(u32),

  /// The handle is no longer resolvable in the inspected process. Benign on
  /// removal paths, an error row on property-chain paths.
  #[error("element not found: {0}")]
  NotFound(ElementHandle),

  /// An editable-property entry did not have the `name (type)` shape.
  #[error("malformed editable property entry: {0:?}")]
  MalformedProperty(String),
}

impl SpyError {
  /// Protocol failure code for inline display. Variants without a remote
  /// code map onto the conventional codes the original protocol reports for
  /// the same situations.
  pub const fn code(&self) -> u32 {
    match self {
      Self::RemoteUnavailable => 0x800706BA,
      Self::Remote(code) => *code,
      Self::NotFound(_) => 0x80004005,
      Self::MalformedProperty(_) => 0x80070057,
    }
  }

  /// Inline error string shown in place of a value.
  pub fn inline_message(&self) -> String {
    format!("Error {:08X}", self.code())
  }
}

/// Result type for uispy operations.
pub type SpyResult<T> = Result<T, SpyError>;
