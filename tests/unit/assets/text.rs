use super::*;
use crate::assets::store::{FontChoice, load_font};

fn cache() -> Option<TextCache> {
    let font = load_font(std::path::Path::new("assets"), &FontChoice::Auto).ok()?;
    Some(TextCache::new(&font).unwrap())
}

#[test]
fn shaping_is_cached_by_text_and_size() {
    let Some(mut cache) = cache() else {
        return;
    };
    let a = cache.shape("Δx", 48.0).unwrap();
    let b = cache.shape("Δx", 48.0).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    cache.shape("Δx", 24.0).unwrap();
    assert_eq!(cache.len(), 2);
    assert!(!cache.family().is_empty());
}

#[test]
fn wider_text_measures_wider() {
    let Some(mut cache) = cache() else {
        return;
    };
    let short = cache.shape("ab", 48.0).unwrap();
    let long = cache.shape("abcdef", 48.0).unwrap();
    assert!(long.width_px > short.width_px);
    assert_eq!(long.glyph_count, 6);
    assert!(short.height_px > 0.0);

    let big = cache.shape("ab", 96.0).unwrap();
    assert!((big.width_px / short.width_px - 2.0).abs() < 0.1);
}

#[test]
fn empty_text_has_no_glyphs() {
    let Some(mut cache) = cache() else {
        return;
    };
    let empty = cache.shape("", 48.0).unwrap();
    assert_eq!(empty.glyph_count, 0);
    assert!(empty.width_px < 1e-3);
}

#[test]
fn invalid_sizes_are_rejected() {
    let Some(mut cache) = cache() else {
        return;
    };
    assert!(cache.shape("a", 0.0).is_err());
    assert!(cache.shape("a", f32::NAN).is_err());
}
