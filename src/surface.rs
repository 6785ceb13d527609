//! Recorded 2D drawing surface.
//!
//! A [`Canvas`] stands in for a full-viewport raster: engines issue draw
//! commands against it each frame and a front end paints whatever the latest
//! frame recorded.

use std::{fmt, str::FromStr, sync::Arc};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Canvas shared between an engine and the front end that paints it.
pub type SharedCanvas = Arc<Mutex<Canvas>>;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// 8-bit RGBA color, written as `#rrggbb` or `#rrggbbaa` in configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub fn from_hex(hex: &str) -> Result<Self> {
        let invalid = || Error::InvalidColor(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.is_ascii() || !matches!(digits.len(), 6 | 8) {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        let a = if digits.len() == 8 { channel(6)? } else { 0xff };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a,
        })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 0xff {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleStyle {
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand {
    Circle {
        center: cgmath::Vector2<f32>,
        radius: f32,
        style: CircleStyle,
    },
}

#[derive(Debug, Default)]
pub struct Canvas {
    size: Viewport,
    commands: Vec<DrawCommand>,
}

impl Canvas {
    pub fn new(size: Viewport) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    pub fn shared(size: Viewport) -> SharedCanvas {
        Arc::new(Mutex::new(Self::new(size)))
    }

    pub fn size(&self) -> Viewport {
        self.size
    }

    /// Changing dimensions blanks the raster, like resizing an HTML canvas.
    pub fn set_size(&mut self, size: Viewport) {
        self.size = size;
        self.commands.clear();
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Filled circle with an outline.
    pub fn circle(&mut self, center: cgmath::Vector2<f32>, radius: f32, style: CircleStyle) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            style,
        });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_rgb_and_rgba() {
        assert_eq!(Color::from_hex("#e6f1f7").unwrap(), Color::rgb(0xe6, 0xf1, 0xf7));
        assert_eq!(
            Color::from_hex("#3a92c580").unwrap(),
            Color {
                r: 0x3a,
                g: 0x92,
                b: 0xc5,
                a: 0x80
            }
        );
    }

    #[test]
    fn rejects_malformed_colors() {
        for bad in ["e6f1f7", "#e6f1f", "#zzzzzz", "#e6f1f7a", "#ééé"] {
            assert!(
                matches!(Color::from_hex(bad), Err(Error::InvalidColor(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn display_matches_input_form() {
        assert_eq!(Color::rgb(0x3a, 0x92, 0xc5).to_string(), "#3a92c5");
        assert_eq!(Color::from_hex("#00000010").unwrap().to_string(), "#00000010");
    }

    #[test]
    fn resize_blanks_recorded_commands() {
        let style = CircleStyle {
            fill: Color::rgb(0, 0, 0),
            stroke: Color::rgb(255, 255, 255),
            stroke_width: 1.0,
        };
        let mut canvas = Canvas::new(Viewport::new(800.0, 600.0));
        canvas.circle(cgmath::vec2(1.0, 2.0), 3.0, style);
        assert_eq!(canvas.commands().len(), 1);

        canvas.set_size(Viewport::new(1024.0, 768.0));
        assert!(canvas.commands().is_empty());
        assert_eq!(canvas.size(), Viewport::new(1024.0, 768.0));
    }
}
