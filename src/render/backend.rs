use crate::{
    assets::PreparedAssetStore, compile::RenderPlan, foundation::error::ReelResult,
};

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha copy of the pixel at (`x`, `y`), if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px: [u8; 4] = self.data.get(i..i + 4)?.try_into().ok()?;
        if !self.premultiplied || px[3] == 0 || px[3] == 255 {
            return Some(px);
        }
        let a = u16::from(px[3]);
        let unpremul = |c: u8| ((u16::from(c) * 255 + a / 2) / a).min(255) as u8;
        Some([unpremul(px[0]), unpremul(px[1]), unpremul(px[2]), px[3]])
    }
}

/// Executes a compiled [`RenderPlan`] into pixels.
pub trait RenderBackend {
    fn render_plan(
        &mut self,
        plan: &RenderPlan,
        assets: &PreparedAssetStore,
    ) -> ReelResult<FrameRGBA>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// CPU raster backend powered by `vello_cpu`.
    #[default]
    Cpu,
}

pub fn create_backend(kind: BackendKind) -> Box<dyn RenderBackend> {
    match kind {
        BackendKind::Cpu => Box::new(crate::render::cpu::CpuBackend::new()),
    }
}
