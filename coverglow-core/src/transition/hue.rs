//! HSV conversion and shortest-path hue interpolation

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use palette::{FromColor, Hsv, Srgb};

const RED_MAX: f32 = 31.0;
const GREEN_MAX: f32 = 63.0;
const BLUE_MAX: f32 = 31.0;

/// Color in hue/saturation/value, all channels in `[0, 1]`
///
/// Hue is normalized to `[0, 1)` rather than degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HsvColor {
    pub hue: f32,
    pub saturation: f32,
    pub value: f32,
}

impl HsvColor {
    /// Zero value, zero saturation
    pub const BLACK: HsvColor = HsvColor {
        hue: 0.0,
        saturation: 0.0,
        value: 0.0,
    };

    /// Convert from packed RGB-565
    pub fn from_rgb565(color: Rgb565) -> Self {
        let rgb = Srgb::new(
            color.r() as f32 / RED_MAX,
            color.g() as f32 / GREEN_MAX,
            color.b() as f32 / BLUE_MAX,
        );
        let hsv: Hsv = Hsv::from_color(rgb);
        Self {
            hue: wrap_unit(hsv.hue.into_positive_degrees() / 360.0),
            saturation: hsv.saturation,
            value: hsv.value,
        }
    }

    /// Convert back to packed RGB-565, rounding to the nearest level
    pub fn to_rgb565(self) -> Rgb565 {
        let hsv: Hsv = Hsv::new(self.hue * 360.0, self.saturation, self.value);
        let rgb: Srgb = Srgb::from_color(hsv);
        Rgb565::new(
            quantize(rgb.red, RED_MAX),
            quantize(rgb.green, GREEN_MAX),
            quantize(rgb.blue, BLUE_MAX),
        )
    }
}

fn quantize(channel: f32, max: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * max + 0.5) as u8
}

/// Reduce `x` into `[0, 1)`
fn wrap_unit(x: f32) -> f32 {
    let mut r = x % 1.0;
    if r < 0.0 {
        r += 1.0;
    }
    if r >= 1.0 {
        0.0
    } else {
        r
    }
}

fn lerp(from: f32, to: f32, fraction: f32) -> f32 {
    from + (to - from) * fraction
}

/// Interpolate between two normalized hues along the shorter arc
///
/// When the hues are more than half a turn apart, the smaller one is
/// lifted by a full turn before the linear step so the path crosses the
/// 0/1 seam instead of the far side of the wheel.
pub fn lerp_hue(from: f32, to: f32, fraction: f32) -> f32 {
    let (mut from, mut to) = (wrap_unit(from), wrap_unit(to));
    let delta = to - from;
    if delta > 0.5 {
        from += 1.0;
    } else if delta < -0.5 {
        to += 1.0;
    }
    wrap_unit(lerp(from, to, fraction))
}

impl HsvColor {
    /// Step from `self` toward `to`; hue takes the shorter arc
    pub fn blend(self, to: HsvColor, fraction: f32) -> HsvColor {
        HsvColor {
            hue: lerp_hue(self.hue, to.hue, fraction),
            saturation: lerp(self.saturation, to.saturation, fraction),
            value: lerp(self.value, to.value, fraction),
        }
    }
}

/// Blend two colors in HSV space
///
/// `fraction` 0 yields `from`, 1 yields `to` (up to 565 quantization).
pub fn interpolate(from: Rgb565, to: Rgb565, fraction: f32) -> Rgb565 {
    HsvColor::from_rgb565(from)
        .blend(HsvColor::from_rgb565(to), fraction)
        .to_rgb565()
}
