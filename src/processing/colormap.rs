//! "Hot" colormap: black -> red -> yellow -> white
//!
//! Piecewise-linear per channel. Red ramps up first, then green, then blue.

/// Point where red saturates
const RED_KNEE: f32 = 0.365_079;

/// Point where green saturates and blue starts
const GREEN_KNEE: f32 = 0.746_032;

/// Red level at zero, so the coldest cells are not pure black
const RED_FLOOR: f32 = 0.041_6;

fn ramp(value: f32, from: f32, to: f32, floor: f32) -> f32 {
    if value <= from {
        floor
    } else if value >= to {
        1.0
    } else {
        floor + (1.0 - floor) * (value - from) / (to - from)
    }
}

fn to_byte(channel: f32) -> u8 {
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Map a normalized intensity in `[0, 1]` to RGB.
///
/// Values outside the range are clamped; NaN maps to the coldest color.
pub fn hot(value: f32) -> [u8; 3] {
    let v = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };

    let r = if v >= RED_KNEE {
        1.0
    } else {
        RED_FLOOR + (1.0 - RED_FLOOR) * v / RED_KNEE
    };
    let g = ramp(v, RED_KNEE, GREEN_KNEE, 0.0);
    let b = ramp(v, GREEN_KNEE, 1.0, 0.0);

    [to_byte(r), to_byte(g), to_byte(b)]
}
