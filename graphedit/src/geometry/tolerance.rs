// Shared tolerances for hit testing and layout

pub const EPS_POS: f32 = 1e-4;            // point coincidence threshold (px)
pub const EPS_LEN: f32 = 1e-6;            // zero-length vector threshold
pub const EPS_FLOAT: f64 = 1e-9;          // schedule/weight comparisons

#[inline] pub fn clamp01(x: f32) -> f32 { x.max(0.0).min(1.0) }
#[inline] pub fn approx_eq_f64(a: f64, b: f64) -> bool { (a - b).abs() <= EPS_FLOAT }

/// Snap a coordinate to the nearest multiple of `step`; non-positive steps leave it untouched.
#[inline]
pub fn snap(v: f32, step: f32) -> f32 {
    if step > EPS_LEN { (v / step).round() * step } else { v }
}
