//! Geometric filters: top-left crop and the radial "drop" warp.

use crate::types::Grid;
use std::f32::consts::FRAC_PI_2;

/// Keep the top-left `width × height` region. Never pads: each axis is
/// `min(target, actual)`.
pub fn crop(input: &Grid, width: usize, height: usize) -> Grid {
    let height = height.min(input.height());
    if height == 0 {
        return Grid::empty();
    }
    input.sub_grid(width.min(input.width()), height)
}

/// Inverse radial warp around a centre point.
///
/// `None` for a centre coordinate means the geometric centre on that axis.
/// Inside `radius = min(center_x, center_y)` each output pixel samples the
/// source at `center + delta * scale`, where
/// `scale = radius * sin(distance / radius * π/2 * strength) / distance`,
/// using nearest-neighbour rounding clamped to the grid. The centre pixel
/// and everything at or beyond `radius` are copied unchanged.
pub fn drop_effect(
    input: &Grid,
    strength: f32,
    center_x: Option<f32>,
    center_y: Option<f32>,
) -> Grid {
    if input.height() == 0 {
        return Grid::empty();
    }
    let width = input.width();
    let height = input.height();
    let center_x = center_x.unwrap_or(width as f32 / 2.0);
    let center_y = center_y.unwrap_or(height as f32 / 2.0);
    let radius = center_x.min(center_y);
    let max_x = width as i64 - 1;
    let max_y = height as i64 - 1;

    Grid::from_fn(width, height, |x, y| {
        let delta_x = x as f32 - center_x;
        let delta_y = y as f32 - center_y;
        let distance = (delta_x * delta_x + delta_y * delta_y).sqrt();
        if distance <= 0.0 || distance >= radius {
            return input.get(x, y);
        }
        let distance_new = radius * (distance / radius * FRAC_PI_2 * strength).sin();
        let scale = distance_new / distance;
        let source_x = ((center_x + delta_x * scale).round() as i64).clamp(0, max_x);
        let source_y = ((center_y + delta_y * scale).round() as i64).clamp(0, max_y);
        input.get(source_x as usize, source_y as usize)
    })
}
