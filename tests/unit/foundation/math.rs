use super::*;

#[test]
fn fnv_hash_spans_chunks_and_is_order_sensitive() {
    let whole = fnv1a64(&[b"reel"]);
    assert_eq!(fnv1a64(&[b"r", b"eel"]), whole);
    assert_ne!(fnv1a64(&[b"leer"]), whole);
    // Empty input hashes to the offset basis.
    assert_eq!(fnv1a64(&[]), 0xcbf2_9ce4_8422_2325);
}

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(255, 0), 0);
    assert_eq!(mul_div255_u16(128, 255), 128);
    assert_eq!(mul_div255_u16(255, 128), 128);
}

#[test]
fn lerp_endpoints() {
    assert_eq!(lerp(2.0, 0.1, 0.0), 2.0);
    assert!((lerp(2.0, 0.1, 1.0) - 0.1).abs() < 1e-12);
    assert!((lerp(7.3, 1.0, 0.5) - 4.15).abs() < 1e-12);
}
