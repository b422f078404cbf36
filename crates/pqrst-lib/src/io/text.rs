use crate::signal::Wave;
use anyhow::{Context, Result};
use std::path::Path;

/// Parse one wave's landmark list: a sample index per line, blank lines and
/// `#` comments skipped.
pub fn parse_wave_indices(text: &str, wave: Wave) -> Result<Vec<usize>> {
    let mut out = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let sample: usize = trimmed.parse().with_context(|| {
            format!(
                "line {}: {} position is not a sample index: {}",
                idx + 1,
                wave,
                trimmed
            )
        })?;
        out.push(sample);
    }
    Ok(out)
}

pub fn read_wave_indices(path: &Path, wave: Wave) -> Result<Vec<usize>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_wave_indices(&text, wave).with_context(|| format!("in {}", path.display()))
}
