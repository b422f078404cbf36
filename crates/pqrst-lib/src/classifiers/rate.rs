use serde::{Deserialize, Serialize};

/// Mean-rate verdict on a regular rhythm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeartRate {
    Tachycardia,
    Bradycardia,
    Normal,
}

impl HeartRate {
    pub fn code(&self) -> i32 {
        match self {
            HeartRate::Tachycardia => 1,
            HeartRate::Bradycardia => -1,
            HeartRate::Normal => 0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HeartRate::Tachycardia => "Tachycardia",
            HeartRate::Bradycardia => "Bradycardia",
            HeartRate::Normal => "Normal heart rate",
        }
    }
}

/// Both bounds are strict: a rate equal to either threshold is `Normal`.
pub fn classify_heart_rate(mean_bpm: f64, bradycardia_bpm: f64, tachycardia_bpm: f64) -> HeartRate {
    if mean_bpm > tachycardia_bpm {
        HeartRate::Tachycardia
    } else if mean_bpm < bradycardia_bpm {
        HeartRate::Bradycardia
    } else {
        HeartRate::Normal
    }
}
