//! Shared geometric and color primitives used across document, component and editor modules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Rotates this point around `pivot` by `degrees` (clockwise in screen space).
    pub fn rotated_around(self, pivot: Point, degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let dx = self.x - pivot.x;
        let dy = self.y - pivot.y;
        Self {
            x: pivot.x + dx * cos - dy * sin,
            y: pivot.y + dx * sin + dy * cos,
        }
    }

    pub fn mirrored_x(self, axis_x: f64) -> Self {
        Self {
            x: 2.0 * axis_x - self.x,
            y: self.y,
        }
    }

    pub fn mirrored_y(self, axis_y: f64) -> Self {
        Self {
            x: self.x,
            y: 2.0 * axis_y - self.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn center(&self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Bounding box of this rectangle after rotating it by `degrees`.
    pub fn rotated_bounds(&self, degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let (sin, cos) = (sin.abs(), cos.abs());
        let width = f64::from(self.width);
        let height = f64::from(self.height);
        Self {
            width: round_dimension(width * cos + height * sin),
            height: round_dimension(width * sin + height * cos),
        }
    }

    /// Scales down (never up) to fit inside `max`, keeping the aspect ratio.
    pub fn fit_within(&self, max: Dimensions) -> Self {
        if self.is_empty() || max.is_empty() {
            return *self;
        }
        let scale_x = f64::from(max.width) / f64::from(self.width);
        let scale_y = f64::from(max.height) / f64::from(self.height);
        let scale = scale_x.min(scale_y).min(1.0);
        Self {
            width: round_dimension(f64::from(self.width) * scale).max(1),
            height: round_dimension(f64::from(self.height) * scale).max(1),
        }
    }
}

fn round_dimension(value: f64) -> u32 {
    let rounded = value.round();
    if rounded <= 0.0 {
        0
    } else if rounded >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        rounded as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color {0:?}: expected #rrggbb")]
pub struct ColorParseError(String);

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn rgb(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ColorParseError(value.to_string());
        let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Point, expected: Point) {
        assert!(
            (actual.x - expected.x).abs() < 1e-9 && (actual.y - expected.y).abs() < 1e-9,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn color_parses_and_formats_hex() {
        let color: Color = "#ff8000".parse().expect("valid hex");
        assert_eq!(color, Color::new(255, 128, 0));
        assert_eq!(color.to_string(), "#ff8000");
    }

    #[test]
    fn color_rejects_malformed_values() {
        for value in ["ff8000", "#ff80", "#gg0000", "#ff80001"] {
            assert!(value.parse::<Color>().is_err(), "{value} should be rejected");
        }
    }

    #[test]
    fn point_rotation_quarter_turn_around_pivot() {
        let rotated = Point::new(20.0, 10.0).rotated_around(Point::new(10.0, 10.0), 90.0);
        assert_close(rotated, Point::new(10.0, 20.0));
    }

    #[test]
    fn point_mirrors_across_axes() {
        assert_close(Point::new(3.0, 4.0).mirrored_x(5.0), Point::new(7.0, 4.0));
        assert_close(Point::new(3.0, 4.0).mirrored_y(5.0), Point::new(3.0, 6.0));
    }

    #[test]
    fn rotated_bounds_swap_on_quarter_turn() {
        let dims = Dimensions::new(400, 300);
        assert_eq!(dims.rotated_bounds(90.0), Dimensions::new(300, 400));
        assert_eq!(dims.rotated_bounds(-180.0), dims);
    }

    #[test]
    fn fit_within_only_scales_down() {
        let max = Dimensions::new(1000, 800);
        assert_eq!(Dimensions::new(2000, 800).fit_within(max), Dimensions::new(1000, 400));
        assert_eq!(Dimensions::new(200, 100).fit_within(max), Dimensions::new(200, 100));
    }
}
