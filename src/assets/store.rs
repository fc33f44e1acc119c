use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    foundation::error::{ReelError, ReelResult},
    foundation::math::fnv1a64,
    scene::{
        dsl::ObjectSource,
        model::{Mobject, Shape},
    },
    script::Presentation,
};

/// Stable identifier of a prepared SVG, derived from its normalized path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetId(pub(crate) u64);

impl AssetId {
    pub fn as_u64(self) -> u64 {
        self.0
    }

    fn for_key(norm_path: &str) -> Self {
        Self(fnv1a64(&[b"svg:", norm_path.as_bytes()]))
    }
}

#[derive(Clone, Debug)]
pub struct PreparedSvg {
    pub tree: Arc<usvg::Tree>,
}

/// Font used for every text in the presentation.
#[derive(Clone)]
pub struct PreparedFont {
    pub bytes: Arc<Vec<u8>>,
    /// Face index inside `bytes` (non-zero only for collections).
    pub index: u32,
    /// Human-readable origin: a file path or a system family name.
    pub source: String,
}

impl std::fmt::Debug for PreparedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedFont")
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .field("source", &self.source)
            .finish()
    }
}

/// Where the presentation font comes from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FontChoice {
    /// First face under `<asset root>/fonts`, else the system sans-serif face.
    #[default]
    Auto,
    File(PathBuf),
}

/// Fonts and SVGs loaded up front. Rendering does no IO.
#[derive(Debug)]
pub struct PreparedAssetStore {
    root: PathBuf,
    font: PreparedFont,
    ids: HashMap<String, AssetId>,
    svgs: HashMap<AssetId, PreparedSvg>,
}

impl PreparedAssetStore {
    /// Load every SVG referenced by the presentation plus the text font. A missing asset is fatal.
    #[tracing::instrument(skip(presentation, root), fields(root))]
    pub fn prepare(
        presentation: &Presentation,
        root: impl Into<PathBuf>,
        font: &FontChoice,
    ) -> ReelResult<Self> {
        let root = root.into();
        tracing::Span::current().record("root", tracing::field::display(root.display()));

        let fontdb = build_fontdb(&root);
        let font = resolve_font(&root, font, &fontdb)?;

        let mut keys = Vec::new();
        for segment in presentation.segments() {
            for object in segment.objects() {
                if let ObjectSource::Static(m) = &object.source {
                    collect_svg_keys(m, &mut keys);
                }
            }
        }

        let mut store = Self {
            root,
            font,
            ids: HashMap::new(),
            svgs: HashMap::new(),
        };
        for key in keys {
            store.load_svg(&key, &fontdb)?;
        }

        tracing::info!(
            font = %store.font.source,
            svgs = store.svgs.len(),
            "assets prepared"
        );
        Ok(store)
    }

    pub fn font(&self) -> &PreparedFont {
        &self.font
    }

    pub fn id_for(&self, asset: &str) -> ReelResult<AssetId> {
        let norm = normalize_rel_path(asset)?;
        self.ids
            .get(&norm)
            .copied()
            .ok_or_else(|| ReelError::asset(format!("svg '{norm}' was not prepared")))
    }

    pub fn svg(&self, id: AssetId) -> ReelResult<&PreparedSvg> {
        self.svgs
            .get(&id)
            .ok_or_else(|| ReelError::asset(format!("unknown svg asset {:#x}", id.0)))
    }

    fn load_svg(&mut self, asset: &str, fontdb: &Arc<usvg::fontdb::Database>) -> ReelResult<()> {
        let norm = normalize_rel_path(asset)?;
        if self.ids.contains_key(&norm) {
            return Ok(());
        }

        let path = self.root.join(Path::new(&norm));
        if !path.is_file() {
            return Err(ReelError::asset(format!(
                "required asset '{}' not found",
                path.display()
            )));
        }
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read svg bytes from '{}'", path.display()))?;
        let svg = parse_svg(&path, &bytes, fontdb.clone())?;

        let id = AssetId::for_key(&norm);
        tracing::debug!(asset = %norm, id = id.0, "svg parsed");
        self.ids.insert(norm, id);
        self.svgs.insert(id, svg);
        Ok(())
    }
}

fn collect_svg_keys(m: &Mobject, out: &mut Vec<String>) {
    match &m.shape {
        Shape::Svg { asset, .. } => out.push(asset.clone()),
        Shape::Group(children) => {
            for child in children {
                collect_svg_keys(child, out);
            }
        }
        _ => {}
    }
}

fn parse_svg(
    path: &Path,
    bytes: &[u8],
    fontdb: Arc<usvg::fontdb::Database>,
) -> ReelResult<PreparedSvg> {
    let opts = usvg::Options {
        resources_dir: path.parent().map(Path::to_path_buf),
        fontdb,
        ..Default::default()
    };
    let tree = usvg::Tree::from_data(bytes, &opts)
        .map_err(|e| ReelError::asset(format!("parse svg '{}': {e}", path.display())))?;
    Ok(PreparedSvg {
        tree: Arc::new(tree),
    })
}

fn build_fontdb(root: &Path) -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    load_fonts_from_dir(&mut db, &root.join("fonts"));
    Arc::new(db)
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    let mut paths: Vec<PathBuf> = rd
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .and_then(|s| s.to_str())
                .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();
    for path in paths {
        if let Err(e) = db.load_font_file(&path) {
            tracing::debug!(path = %path.display(), error = %e, "skipping font file");
        }
    }
}

/// Sans-serif families tried, in order, before any name heuristics.
const PREFERRED_SANS: &[&str] = &[
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Open Sans",
    "Roboto",
    "Helvetica",
    "Arial",
];

/// Whether a family name reads as a proportional sans-serif face.
pub(crate) fn is_sans_family(name: &str) -> bool {
    if PREFERRED_SANS.contains(&name) {
        return true;
    }
    name.split_whitespace().any(|w| w == "Sans")
        && !name
            .split_whitespace()
            .any(|w| matches!(w, "Mono" | "Serif" | "Math" | "Symbols" | "Emoji"))
}

fn resolve_font(
    root: &Path,
    choice: &FontChoice,
    system: &usvg::fontdb::Database,
) -> ReelResult<PreparedFont> {
    if let FontChoice::File(path) = choice {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font file '{}'", path.display()))?;
        return Ok(PreparedFont {
            bytes: Arc::new(bytes),
            index: 0,
            source: path.display().to_string(),
        });
    }

    let mut local = usvg::fontdb::Database::new();
    load_fonts_from_dir(&mut local, &root.join("fonts"));
    if let Some(face) = local.faces().next() {
        return face_font(&local, face.id);
    }

    let id = system_sans_face(system)
        .or_else(|| {
            let face = system.faces().next()?;
            tracing::warn!(
                family = face.families.first().map(|(n, _)| n.as_str()).unwrap_or("?"),
                "no sans-serif face installed; using the first system face"
            );
            Some(face.id)
        })
        .ok_or_else(|| ReelError::asset("no usable font found; pass a font file explicitly"))?;
    face_font(system, id)
}

// fontdb's generic `SansSerif` maps to "Arial" unless configured, so named families come first.
fn system_sans_face(system: &usvg::fontdb::Database) -> Option<usvg::fontdb::ID> {
    PREFERRED_SANS
        .iter()
        .find_map(|name| query_regular(system, usvg::fontdb::Family::Name(name)))
        .or_else(|| query_regular(system, usvg::fontdb::Family::SansSerif))
        .or_else(|| {
            let mut names: Vec<&str> = system
                .faces()
                .filter_map(|f| f.families.first().map(|(n, _)| n.as_str()))
                .filter(|n| is_sans_family(n))
                .collect();
            names.sort_unstable();
            names
                .first()
                .and_then(|name| query_regular(system, usvg::fontdb::Family::Name(name)))
        })
}

fn query_regular(
    system: &usvg::fontdb::Database,
    family: usvg::fontdb::Family<'_>,
) -> Option<usvg::fontdb::ID> {
    system.query(&usvg::fontdb::Query {
        families: &[family],
        ..Default::default()
    })
}

fn face_font(db: &usvg::fontdb::Database, id: usvg::fontdb::ID) -> ReelResult<PreparedFont> {
    let source = db
        .face(id)
        .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
        .unwrap_or_else(|| "unnamed face".to_string());
    let (bytes, index) = db
        .with_face_data(id, |data, index| (data.to_vec(), index))
        .ok_or_else(|| ReelError::asset(format!("font face '{source}' has no data")))?;
    Ok(PreparedFont {
        bytes: Arc::new(bytes),
        index,
        source,
    })
}

/// Normalize and validate asset-root-relative paths: `/` separators, no `.` segments, no
/// absolute paths or `..` traversal.
pub fn normalize_rel_path(source: &str) -> ReelResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(ReelError::validation("asset paths must be relative"));
    }

    let parts: Vec<&str> = s
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect();
    if parts.contains(&"..") {
        return Err(ReelError::validation("asset paths must not contain '..'"));
    }
    if parts.is_empty() {
        return Err(ReelError::validation("asset path must name a file"));
    }
    Ok(parts.join("/"))
}

/// Load the configured font without preparing any SVG.
pub fn load_font(root: &Path, choice: &FontChoice) -> ReelResult<PreparedFont> {
    resolve_font(root, choice, &build_fontdb(root))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
