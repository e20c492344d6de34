//! Categorical color classification
//!
//! Maps a raw tri-channel intensity reading to one of a closed set of labels.
//! The rules run in strict order and the first match wins; callers that fail
//! to read the sensor use [`Classification::Error`] instead of classifying.

use std::fmt;

/// One raw reading from a color sensor (12-bit channels)
#[derive(Debug, Clone, Copy, Default)]
pub struct RgbSample {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl RgbSample {
    pub fn new(red: u16, green: u16, blue: u16) -> Self {
        Self { red, green, blue }
    }
}

/// Closed set of color labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Black,
    White,
    Brown,
    Red,
    Green,
    Blue,
    /// Sensor read failed this cycle
    Error,
    /// No observation yet
    Unknown,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Classification::Black => "Black",
            Classification::White => "White",
            Classification::Brown => "Brown",
            Classification::Red => "Red",
            Classification::Green => "Green",
            Classification::Blue => "Blue",
            Classification::Error => "Error",
            Classification::Unknown => "Unknown",
        };
        f.pad(name)
    }
}

/// Scale a 12-bit channel intensity down to 8 bits, saturating above 4095
#[inline]
pub fn scale8(x: u16) -> u8 {
    if x > 4095 {
        255
    } else {
        (x >> 4) as u8
    }
}

/// Classify a raw tri-channel reading
///
/// Rule order matters: Black, then White, then Brown, then the dominant
/// channel (red checked before green before blue).
pub fn classify(red: u16, green: u16, blue: u16) -> Classification {
    let r = scale8(red);
    let g = scale8(green);
    let b = scale8(blue);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);

    if max < 30 {
        return Classification::Black;
    }
    if min > 180 && max - min < 40 {
        return Classification::White;
    }

    let ratio_rg = f32::from(r) / f32::from(g);
    let ratio_rb = f32::from(r) / f32::from(b);
    if r > 60 && r < 200 && g > 30 && g < 140 && b < 80 && ratio_rg < 2.2 && ratio_rb < 4.0 {
        return Classification::Brown;
    }

    if r == max {
        Classification::Red
    } else if g == max {
        Classification::Green
    } else {
        Classification::Blue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale8() {
        assert_eq!(scale8(0), 0);
        assert_eq!(scale8(16), 1);
        assert_eq!(scale8(4095), 255);
        assert_eq!(scale8(4096), 255);
        assert_eq!(scale8(u16::MAX), 255);
    }

    #[test]
    fn test_all_dark_is_black() {
        // Every channel scaling below 30 must classify as Black.
        for v in [0u16, 100, 400, 463] {
            assert_eq!(classify(v, v, v), Classification::Black, "raw {}", v);
        }
        assert_eq!(classify(463, 0, 200), Classification::Black);
    }

    #[test]
    fn test_white() {
        // All channels high and close together.
        assert_eq!(classify(3200, 3200, 3200), Classification::White);
        assert_eq!(classify(3500, 3300, 3200), Classification::White);
    }

    #[test]
    fn test_high_spread_is_not_white() {
        // min > 180 but spread >= 40 falls through to dominant channel.
        assert_eq!(classify(4095, 2900, 2900), Classification::Red);
    }

    #[test]
    fn test_brown() {
        // r=100, g=80, b=40 scaled: ratios 1.25 and 2.5, inside every bound.
        assert_eq!(classify(1600, 1280, 640), Classification::Brown);
    }

    #[test]
    fn test_brown_ratio_bound() {
        // r/g at 2.5 exceeds the 2.2 bound; dominant red wins instead.
        assert_eq!(classify(1600, 640, 640), Classification::Red);
    }

    #[test]
    fn test_dominant_channel_order() {
        assert_eq!(classify(3500, 500, 500), Classification::Red);
        assert_eq!(classify(500, 3500, 500), Classification::Green);
        assert_eq!(classify(500, 500, 3500), Classification::Blue);
        // Ties resolve red before green before blue.
        assert_eq!(classify(3500, 3500, 500), Classification::Red);
        assert_eq!(classify(500, 3500, 3500), Classification::Green);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Classification::Brown.to_string(), "Brown");
        assert_eq!(Classification::Unknown.to_string(), "Unknown");
        assert_eq!(Classification::Error.to_string(), "Error");
    }
}
