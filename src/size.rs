//! Human-readable byte sizes

const UNITS: [char; 7] = ['b', 'k', 'M', 'G', 'T', 'P', 'E'];
const KILO: f64 = 1024.0;

/// Format a byte count as a short human-readable size, e.g. `"12.3 M"`.
///
/// Uses base 1024 and one fractional digit. Zero is `"0 b"`.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 b".to_string();
    }

    let mut size = bytes as f64;
    let mut unit = 0;

    // 1023.95 would print as 1024.0, so promote it as well
    while size >= KILO - 0.05 && unit < UNITS.len() - 1 {
        size /= KILO;
        unit += 1;
    }

    format!("{:.1} {}", size, UNITS[unit])
}
