pub mod store;
pub mod svg_raster;
pub mod text;

pub use store::{AssetId, FontChoice, PreparedAssetStore, PreparedFont, PreparedSvg};
pub use text::{ShapedText, TextCache};
