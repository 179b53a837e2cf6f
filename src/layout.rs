//! Column widths for plan tables

use crate::error::{AlterError, Result};

/// Width used when stdout is not a terminal and nothing else is configured
pub const DEFAULT_WIDTH: usize = 80;

/// Name | Arch | [Epoch:]Version-Release | Repository | Install Size
pub const PLAN_COLUMNS: [u32; 5] = [30, 15, 20, 15, 10];

/// Split `total_width` into absolute column widths.
///
/// Each width is `floor(weight * total_width / 100)`, so the widths never
/// add up to more than the line. Leftover characters are not handed out.
pub fn compute(weights: &[u32], total_width: usize) -> Result<Vec<usize>> {
    if weights.is_empty() {
        return Err(AlterError::InvalidParameter(
            "column layout needs at least one column".to_string(),
        ));
    }
    if total_width == 0 {
        return Err(AlterError::InvalidParameter(
            "column layout needs a positive width".to_string(),
        ));
    }

    let percent: u64 = weights.iter().map(|w| u64::from(*w)).sum();
    if percent > 100 {
        return Err(AlterError::InvalidParameter(format!(
            "column weights add up to {}%",
            percent
        )));
    }

    Ok(weights
        .iter()
        .map(|w| (u64::from(*w) * total_width as u64 / 100) as usize)
        .collect())
}

/// Width of the terminal attached to stdout, or `fallback` when there is none
pub fn terminal_width(fallback: usize) -> usize {
    terminal_size::terminal_size()
        .map(|(terminal_size::Width(w), _)| w as usize)
        .filter(|w| *w > 0)
        .unwrap_or(fallback)
}
