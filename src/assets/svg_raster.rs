use crate::{
    assets::store::AssetId,
    foundation::core::Affine,
    foundation::error::{ReelError, ReelResult},
};

/// Largest raster edge we are willing to allocate for one SVG.
const MAX_DIM: u32 = 16_384;

/// Cache key of one rasterization of an SVG at a given pixel size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SvgRasterKey {
    pub asset: AssetId,
    pub width: u32,
    pub height: u32,
}

/// Raster size for drawing `tree` with `transform`, plus the transform to draw the raster with.
///
/// Rasterizing at the drawn scale keeps upscaled SVGs sharp.
pub fn svg_raster_params(tree: &usvg::Tree, transform: Affine) -> ReelResult<(u32, u32, Affine)> {
    fn to_px(v: f32) -> ReelResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(ReelError::asset("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    }

    let size = tree.size();
    let base_w = to_px(size.width())?;
    let base_h = to_px(size.height())?;

    let [a, b, c, d, _, _] = transform.as_coeffs();
    let sx = a.hypot(b).max(1e-6);
    let sy = c.hypot(d).max(1e-6);

    let w = (f64::from(base_w) * sx).ceil().max(1.0) as u32;
    let h = (f64::from(base_h) * sy).ceil().max(1.0) as u32;
    if w > MAX_DIM || h > MAX_DIM {
        return Err(ReelError::evaluation(format!(
            "svg raster size too large: {w}x{h} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    Ok((w, h, transform * Affine::scale_non_uniform(1.0 / sx, 1.0 / sy)))
}

/// Render `tree` stretched to `width`×`height` into premultiplied RGBA8.
pub fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> ReelResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| ReelError::evaluation("failed to allocate svg pixmap"))?;

    let xform = resvg::tiny_skia::Transform::from_scale(
        width as f32 / tree.size().width(),
        height as f32 / tree.size().height(),
    );
    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/svg_raster.rs"]
mod tests;
