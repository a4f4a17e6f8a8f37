/*!
Geometry types and the DPI scaling rules shared by the resolvers.

All display-facing rectangles are integer rectangles in 96-DPI logical
coordinates. Two scaling policies coexist and must not be mixed up:

- Root rectangles read from a native window are normalized with **floor**
  scaling, and width/height are scaled independently of the offset. Scaling
  right/bottom instead would make the width drift by one pixel depending on
  the offset whenever the scale factor is non-integral.
- Points and element-relative rectangles round to **nearest**; their
  sub-pixel inputs are small and directional bias is worse than rounding
  error there.
*/

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Multiply-then-divide with the result floored (toward negative infinity).
fn mul_div_floor(value: i32, num: i64, den: i64) -> i32 {
  (i64::from(value) * num).div_euclid(den) as i32
}

/// Multiply-then-divide rounding half away from zero.
fn mul_div_round(value: i32, num: i64, den: i64) -> i32 {
  let product = i64::from(value) * num;
  let rounded = if product >= 0 {
    (product + den / 2) / den
  } else {
    (product - den / 2) / den
  };
  rounded as i32
}

const fn dpi_or_default(dpi: u32) -> i64 {
  if dpi == 0 {
    96
  } else {
    dpi as i64
  }
}

/// A 2D point in integer screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Point {
  pub x: i32,
  pub y: i32,
}

impl Point {
  pub const fn new(x: i32, y: i32) -> Self {
    Self { x, y }
  }

  /// Convert a raw (physical-pixel) point to 96-DPI logical coordinates,
  /// rounding to nearest.
  pub fn to_logical(self, dpi: u32) -> Self {
    let dpi = dpi_or_default(dpi);
    Self {
      x: mul_div_round(self.x, 96, dpi),
      y: mul_div_round(self.y, 96, dpi),
    }
  }
}

/// A 2D point with fractional coordinates, used for layout offsets and
/// native hit-test probes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PointF {
  pub x: f32,
  pub y: f32,
}

impl PointF {
  pub const fn new(x: f32, y: f32) -> Self {
    Self { x, y }
  }
}

/// Integer rectangle: origin plus size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rect {
  pub x: i32,
  pub y: i32,
  pub w: i32,
  pub h: i32,
}

impl Rect {
  pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
    Self { x, y, w, h }
  }

  pub const fn right(&self) -> i32 {
    self.x + self.w
  }

  pub const fn bottom(&self) -> i32 {
    self.y + self.h
  }

  pub const fn is_empty(&self) -> bool {
    self.w <= 0 || self.h <= 0
  }

  /// Half-open containment: left/top edges are inside, right/bottom are not.
  pub const fn contains(&self, point: Point) -> bool {
    point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
  }

  pub const fn translate(&self, dx: i32, dy: i32) -> Self {
    Self {
      x: self.x + dx,
      y: self.y + dy,
      w: self.w,
      h: self.h,
    }
  }

  /// Normalize a raw (physical-pixel) rectangle to 96-DPI logical
  /// coordinates. Floor scaling; width and height scale independently of
  /// the offset.
  pub fn to_logical(self, dpi: u32) -> Self {
    let dpi = dpi_or_default(dpi);
    Self {
      x: mul_div_floor(self.x, 96, dpi),
      y: mul_div_floor(self.y, 96, dpi),
      w: mul_div_floor(self.w, 96, dpi),
      h: mul_div_floor(self.h, 96, dpi),
    }
  }

  /// Scale a 96-DPI logical rectangle back up to physical pixels for the
  /// given window DPI. Same independence rule as [`Rect::to_logical`].
  pub fn to_physical(self, dpi: u32) -> Self {
    let dpi = dpi_or_default(dpi);
    Self {
      x: mul_div_floor(self.x, dpi, 96),
      y: mul_div_floor(self.y, dpi, 96),
      w: mul_div_floor(self.w, dpi, 96),
      h: mul_div_floor(self.h, dpi, 96),
    }
  }
}

impl std::fmt::Display for Rect {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "({},{}) - ({},{})  -  {}x{}",
      self.x,
      self.y,
      self.right(),
      self.bottom(),
      self.w,
      self.h
    )
  }
}

/// Rectangle with fractional coordinates, as reported by a remote window's
/// own bounds or an element's layout slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RectF {
  pub x: f32,
  pub y: f32,
  pub w: f32,
  pub h: f32,
}

impl RectF {
  pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
    Self { x, y, w, h }
  }

  /// Round every field to nearest independently.
  pub fn round(self) -> Rect {
    Rect {
      x: self.x.round() as i32,
      y: self.y.round() as i32,
      w: self.w.round() as i32,
      h: self.h.round() as i32,
    }
  }
}
