use std::f32::consts::PI;

/// Offset added to the interpolated value before folding it into `[0, 1]`.
pub const BIAS: f32 = 0.4743;

/// Gradient noise over a square integer lattice.
///
/// Stateless: gradients are derived from the lattice coordinates through a
/// fixed integer hash, so one value can be shared by every worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoiseField;

impl NoiseField {
    pub fn new() -> Self {
        Self
    }

    /// Noise value at `(x, y)` in `[0, 1]`.
    ///
    /// The biased value is clamped to zero from below and mirrored back
    /// below one when it overshoots.
    pub fn evaluate(&self, x: f32, y: f32) -> f32 {
        let value = self.raw(x, y) + BIAS;
        if value < 0.0 {
            0.0
        } else if value > 1.0 {
            1.0 - (value - 1.0)
        } else {
            value
        }
    }

    /// Interpolated lattice value before bias and folding.
    pub fn raw(&self, x: f32, y: f32) -> f32 {
        let x0 = x.floor() as i32;
        let x1 = x0.wrapping_add(1);
        let y0 = y.floor() as i32;
        let y1 = y0.wrapping_add(1);

        let sx = x - x0 as f32;
        let sy = y - y0 as f32;

        let ix0 = interpolate(
            dot_grid_gradient(x0, y0, x, y),
            dot_grid_gradient(x1, y0, x, y),
            sx,
        );
        let ix1 = interpolate(
            dot_grid_gradient(x0, y1, x, y),
            dot_grid_gradient(x1, y1, x, y),
            sx,
        );

        interpolate(ix0, ix1, sy)
    }
}

/// Cubic smoothstep blend between `a0` and `a1`.
pub fn interpolate(a0: f32, a1: f32, w: f32) -> f32 {
    (a1 - a0) * (3.0 - w * 2.0) * w * w + a0
}

/// Unit gradient for a lattice corner.
pub fn random_gradient(ix: i32, iy: i32) -> (f32, f32) {
    let mut a = ix as u32;
    let mut b = iy as u32;
    // true rotates on unsigned words; a signed arithmetic shift gives other gradients
    a = a.wrapping_mul(3284157443);
    b ^= a.rotate_left(16);
    b = b.wrapping_mul(1911520717);
    a ^= b.rotate_left(16);
    a = a.wrapping_mul(2048419325);

    // [0, 2*PI)
    let angle = a as f32 * (PI / 2147483648.0);
    (angle.cos(), angle.sin())
}

fn dot_grid_gradient(ix: i32, iy: i32, x: f32, y: f32) -> f32 {
    let (gx, gy) = random_gradient(ix, iy);
    let dx = x - ix as f32;
    let dy = y - iy as f32;
    dx * gx + dy * gy
}
