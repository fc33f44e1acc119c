//! Render configuration.
//!
//! Defaults produce the full presentation at 1920×1080, 60 fps, on black. A JSON file can
//! override any subset of fields; the CLI overrides on top of that.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    assets::FontChoice,
    foundation::core::{Canvas, Color, Fps},
    foundation::error::{ReelError, ReelResult},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub background: Color,
    /// Directory holding `car.svg` and optionally `fonts/`.
    pub assets: PathBuf,
    /// Explicit font file; otherwise the asset fonts or a system sans-serif face.
    pub font: Option<PathBuf>,
    pub output: PathBuf,
    /// Reuse the previous frame when nothing on screen changed.
    pub static_frame_elision: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: 60,
            background: Color::BLACK,
            assets: PathBuf::from("assets"),
            font: None,
            output: PathBuf::from("out/derivatives.mp4"),
            static_frame_elision: true,
        }
    }
}

impl RenderConfig {
    pub fn from_json_file(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> ReelResult<()> {
        self.canvas()?;
        self.frame_rate()?;
        if self.background.a != 255 {
            return Err(ReelError::validation("background must be opaque"));
        }
        Ok(())
    }

    pub fn canvas(&self) -> ReelResult<Canvas> {
        Canvas::new(self.width, self.height)
    }

    pub fn frame_rate(&self) -> ReelResult<Fps> {
        Fps::new(self.fps, 1)
    }

    pub fn font_choice(&self) -> FontChoice {
        match &self.font {
            Some(path) => FontChoice::File(path.clone()),
            None => FontChoice::Auto,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
