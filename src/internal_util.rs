/// Extent of the sampled field along x.
pub const FIELD_WIDTH: f64 = 7.0;
/// Extent of the sampled field along y.
pub const FIELD_HEIGHT: f64 = 7.0;

const CENTER_X: f64 = FIELD_WIDTH / 2.0;
const CENTER_Y: f64 = FIELD_HEIGHT / 2.0;

/// Map a pixel onto the field.
/// Row 0 is the top of the field, so y decreases as the row grows.
pub fn to_field(col: usize, row: usize, width: usize, height: usize) -> (f32, f32) {
    let x = FIELD_WIDTH / width as f64 * col as f64 + CENTER_X - FIELD_WIDTH / 2.0;
    let y = -FIELD_HEIGHT / height as f64 * row as f64 + CENTER_Y + FIELD_HEIGHT / 2.0;
    (x as f32, y as f32)
}

/// Opaque `0xAARRGGBB` colour from hue, saturation and brightness in `[0, 1]`.
pub fn hsb_to_argb(hue: f32, saturation: f32, brightness: f32) -> u32 {
    let channel = |v: f32| (v * 255.0 + 0.5) as u32;

    let (r, g, b) = if saturation == 0.0 {
        let v = channel(brightness);
        (v, v, v)
    } else {
        let h = (hue - hue.floor()) * 6.0;
        let f = h - h.floor();
        let p = brightness * (1.0 - saturation);
        let q = brightness * (1.0 - saturation * f);
        let t = brightness * (1.0 - saturation * (1.0 - f));
        let (r, g, b) = match h as u32 {
            0 => (brightness, t, p),
            1 => (q, brightness, p),
            2 => (p, brightness, t),
            3 => (p, q, brightness),
            4 => (t, p, brightness),
            _ => (brightness, p, q),
        };
        (channel(r), channel(g), channel(b))
    };

    0xff00_0000 | (r << 16) | (g << 8) | b
}
