use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rhythm {
    Regular,
    Irregular,
}

/// Regular when the RR spread does not exceed `threshold` samples.
pub fn classify_rhythm(rr_std_dev: f64, threshold: f64) -> Rhythm {
    if rr_std_dev <= threshold {
        Rhythm::Regular
    } else {
        Rhythm::Irregular
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PWaveTiming {
    Consistent,
    Inconsistent,
}

/// P-wave to R-peak distance stays put from beat to beat.
pub fn classify_p_wave_timing(pr_interval_std_dev: f64, threshold: f64) -> PWaveTiming {
    if pr_interval_std_dev <= threshold {
        PWaveTiming::Consistent
    } else {
        PWaveTiming::Inconsistent
    }
}
