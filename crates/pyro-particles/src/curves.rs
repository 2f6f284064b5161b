//! Scalar and color interpolation helpers

/// Linear interpolation between two floats
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linear interpolation between two RGBA colors
pub fn lerp_color(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    [
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
        lerp_f32(a[3], b[3], t),
    ]
}

/// Material opacity from the lifetime fade and the particles' speed.
///
/// `fade` is `elapsed / duration`, `speed` is `|v| / max_speed`; both are
/// clamped to [0, 1]. Fast particles stay opaque late into the lifetime,
/// slow ones fade with it.
pub fn fade_opacity(fade: f32, speed: f32) -> f32 {
    let fade = fade.clamp(0.0, 1.0);
    let speed = speed.clamp(0.0, 1.0);
    lerp_f32(1.0, speed, fade).clamp(0.0, 1.0)
}
