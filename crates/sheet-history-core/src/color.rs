//! CSS colors used by style properties.
//!
//! This module provides the [`Color`] type which validates its text with the
//! `DynamicColor` type from the color crate. The validated text is kept so a
//! color renders back into a fragment exactly as it was written.

use std::{fmt, str::FromStr};

use color::DynamicColor;

use crate::error::ValueError;

/// A CSS color such as `#ff0000`, `rgb(255, 0, 0)` or `red`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Color {
    text: String,
    alpha_bits: u32,
}

impl Color {
    /// Create a new `Color` from a string.
    ///
    /// The text is trimmed and lower-cased before it is stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use sheet_history_core::color::Color;
    ///
    /// let red = Color::new("#FF0000").unwrap();
    /// assert_eq!(red.to_string(), "#ff0000");
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, ValueError> {
        let text = color_str.trim().to_ascii_lowercase();
        match DynamicColor::from_str(&text) {
            Ok(color) => Ok(Self {
                text,
                alpha_bits: color.components[3].to_bits(),
            }),
            Err(err) => Err(ValueError::Invalid {
                kind: "color",
                text: format!("{color_str}: {err}"),
            }),
        }
    }

    /// Returns the alpha (transparency) component of this color.
    ///
    /// The value lies between 0.0 (fully transparent) and 1.0 (fully opaque).
    pub fn alpha(&self) -> f32 {
        f32::from_bits(self.alpha_bits)
    }
}

impl FromStr for Color {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_new_valid() {
        assert!(Color::new("red").is_ok());
        assert!(Color::new("#00ff00").is_ok());
        assert!(Color::new("rgb(0, 0, 255)").is_ok());
    }

    #[test]
    fn test_color_new_invalid() {
        assert!(Color::new("invalid-color").is_err());
        assert!(Color::new("#gggggg").is_err());
    }

    #[test]
    fn test_color_is_canonical() {
        assert_eq!(Color::new(" #ABCDEF ").unwrap(), Color::new("#abcdef").unwrap());
        assert_eq!(Color::new("Blue").unwrap().to_string(), "blue");
    }

    #[test]
    fn test_color_alpha() {
        assert_eq!(Color::new("red").unwrap().alpha(), 1.0);
        assert_eq!(Color::new("transparent").unwrap().alpha(), 0.0);
    }
}
