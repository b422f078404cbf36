use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrInterval {
    Prolonged,
    Normal,
}

/// Prolonged when at least `repetition_fraction` of the beats have a PR
/// segment longer than `distance_threshold`. A lone long segment is noise.
pub fn classify_pr_interval(
    pr_segments: &[f64],
    distance_threshold: f64,
    repetition_fraction: f64,
) -> PrInterval {
    if pr_segments.is_empty() {
        return PrInterval::Normal;
    }
    let prolonged = pr_segments
        .iter()
        .filter(|&&pr| pr > distance_threshold)
        .count();
    if prolonged as f64 >= repetition_fraction * pr_segments.len() as f64 {
        PrInterval::Prolonged
    } else {
        PrInterval::Normal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QrsWidth {
    Wide,
    Normal,
}

/// Wide as soon as any single complex exceeds `width_threshold`.
pub fn classify_qrs_width(qrs_widths: &[f64], width_threshold: f64) -> QrsWidth {
    if qrs_widths.iter().any(|&w| w > width_threshold) {
        QrsWidth::Wide
    } else {
        QrsWidth::Normal
    }
}
