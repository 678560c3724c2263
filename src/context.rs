/// Neutral accessibility used when structure analysis is disabled.
pub const NEUTRAL_ACCESSIBILITY: f64 = 0.5;

/// Percent A+U in the window.
pub fn au_content(window: &[u8]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }

    let au = window
        .iter()
        .filter(|&&nuc| nuc == b'A' || nuc == b'U')
        .count();

    au as f64 / window.len() as f64 * 100.0
}

/// Structural-accessibility proxy: one minus the GC fraction of the window.
/// Deterministic for a given window and always within [0, 1].
pub fn accessibility(window: &[u8]) -> f64 {
    if window.is_empty() {
        return NEUTRAL_ACCESSIBILITY;
    }

    let gc = window
        .iter()
        .filter(|&&nuc| nuc == b'G' || nuc == b'C')
        .count();

    1.0 - gc as f64 / window.len() as f64
}
