use std::collections::HashSet;

// Helper method to format bytes in human-readable form
pub fn bytes2hr(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{bytes} bytes")
    } else if bytes < 1024 * 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

/// Bit-vector footprint: bit count, the 32-bit words backing it, and the
/// byte size.
pub fn bits2hr(bits: usize) -> String {
    let words = bits.div_ceil(u32::BITS as usize);
    format!(
        "{bits} bits, {words} x 32-bit words, {}",
        bytes2hr(words * 4)
    )
}

pub fn format_probability(p: f64) -> String {
    if !p.is_finite() {
        "n/a".to_string()
    } else if p == 0.0 {
        "0".to_string()
    } else if p < 1e-4 {
        format!("{p:.2e}")
    } else {
        format!("{p:.6}")
    }
}

/// Result of splitting free-form input into filter values.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedLines {
    pub values: Vec<String>,
    pub skipped_empty: usize,
    pub skipped_duplicates: usize,
}

/// Splits `text` into trimmed, non-empty lines. With `dedupe` only the
/// first occurrence of each value is kept.
pub fn parse_lines(text: &str, dedupe: bool) -> ParsedLines {
    let mut seen = HashSet::new();
    let mut parsed = ParsedLines::default();

    for raw in text.lines() {
        let value = raw.trim();
        if value.is_empty() {
            parsed.skipped_empty += 1;
            continue;
        }
        if dedupe && !seen.insert(value) {
            parsed.skipped_duplicates += 1;
            continue;
        }
        parsed.values.push(value.to_string());
    }

    parsed
}
