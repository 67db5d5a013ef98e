//! Color space helpers with the host platform's rounding
//!
//! Hue is in degrees (0-360), saturation and value in percent (0-100) and RGB
//! channels in 0-255. Conversions to RGB truncate each channel, conversions
//! to HS round to three decimal places, matching the framework's own color
//! utilities so round trips agree with it.

use palette::{encoding, FromColor, Hsv, Srgb};

type SrgbHsv = Hsv<encoding::Srgb, f64>;

/// Convert hue and saturation to a fully bright RGB triple
pub fn hs_to_rgb(hue: f64, saturation: f64) -> (u8, u8, u8) {
    hsv_to_rgb(hue, saturation, 100.0)
}

/// Convert hue, saturation and value to an RGB triple
pub fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> (u8, u8, u8) {
    let hsv = SrgbHsv::new(hue, saturation / 100.0, value / 100.0);
    let rgb = Srgb::<f64>::from_color(hsv);
    (channel(rgb.red), channel(rgb.green), channel(rgb.blue))
}

/// Convert an RGB triple to hue and saturation
pub fn rgb_to_hs(red: u8, green: u8, blue: u8) -> (f64, f64) {
    let (hue, saturation, _) = rgb_to_hsv(red, green, blue);
    (hue, saturation)
}

/// Convert an RGB triple to hue, saturation and value
pub fn rgb_to_hsv(red: u8, green: u8, blue: u8) -> (f64, f64, f64) {
    let rgb = Srgb::new(
        f64::from(red) / 255.0,
        f64::from(green) / 255.0,
        f64::from(blue) / 255.0,
    );
    let hsv = SrgbHsv::from_color(rgb);
    (
        round3(hsv.hue.into_positive_degrees()),
        round3(hsv.saturation * 100.0),
        round3(hsv.value * 100.0),
    )
}

fn channel(component: f64) -> u8 {
    // truncation, not rounding
    (component * 255.0).clamp(0.0, 255.0) as u8
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round_ties_even() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_colors_to_hs() {
        assert_eq!(rgb_to_hs(255, 0, 0), (0.0, 100.0));
        assert_eq!(rgb_to_hs(0, 255, 0), (120.0, 100.0));
        assert_eq!(rgb_to_hs(0, 0, 255), (240.0, 100.0));
    }

    #[test]
    fn test_grey_has_no_hue_or_saturation() {
        assert_eq!(rgb_to_hs(255, 255, 255), (0.0, 0.0));
        assert_eq!(rgb_to_hs(0, 0, 0), (0.0, 0.0));
    }

    #[test]
    fn test_hs_to_rgb() {
        assert_eq!(hs_to_rgb(0.0, 100.0), (255, 0, 0));
        assert_eq!(hs_to_rgb(120.0, 100.0), (0, 255, 0));
        assert_eq!(hs_to_rgb(240.0, 100.0), (0, 0, 255));
        assert_eq!(hs_to_rgb(0.0, 0.0), (255, 255, 255));
    }

    #[test]
    fn test_hs_to_rgb_truncates() {
        // 0.5 * 255 = 127.5
        assert_eq!(hs_to_rgb(60.0, 50.0), (255, 255, 127));
    }

    #[test]
    fn test_round_trip_primary() {
        for rgb in [(255u8, 0u8, 0u8), (0, 255, 0), (0, 0, 255), (255, 255, 0)] {
            let (h, s) = rgb_to_hs(rgb.0, rgb.1, rgb.2);
            assert_eq!(hs_to_rgb(h, s), rgb);
        }
    }
}
