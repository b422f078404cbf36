use crate::error::DiagnosisError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sampling rate assumed when a fiducial table does not carry one.
pub const DEFAULT_SAMPLING_RATE_HZ: f64 = 500.0;

/// Wave landmarks located per beat by the delineation stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wave {
    R,
    P,
    Q,
    S,
    T,
}

impl Wave {
    /// Waves that must line up beat-for-beat with the R-peaks.
    pub const ALIGNED: [Wave; 4] = [Wave::P, Wave::Q, Wave::S, Wave::T];

    pub fn as_str(&self) -> &'static str {
        match self {
            Wave::R => "R",
            Wave::P => "P",
            Wave::Q => "Q",
            Wave::S => "S",
            Wave::T => "T",
        }
    }
}

impl fmt::Display for Wave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-beat fiducial landmarks of one recording, as sample indices.
///
/// Beat `i` is described by `r_positions[i]` together with the `i`-th entry of
/// every other wave. T positions are carried along but not used by any rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiducialSet {
    /// Uniform sampling frequency in Hz
    #[serde(alias = "fs")]
    pub sampling_rate_hz: f64,
    pub r_positions: Vec<usize>,
    pub p_positions: Vec<usize>,
    pub q_positions: Vec<usize>,
    pub s_positions: Vec<usize>,
    pub t_positions: Vec<usize>,
}

impl FiducialSet {
    pub fn new(
        sampling_rate_hz: f64,
        r_positions: Vec<usize>,
        p_positions: Vec<usize>,
        q_positions: Vec<usize>,
        s_positions: Vec<usize>,
        t_positions: Vec<usize>,
    ) -> Self {
        Self {
            sampling_rate_hz,
            r_positions,
            p_positions,
            q_positions,
            s_positions,
            t_positions,
        }
    }

    pub fn beat_count(&self) -> usize {
        self.r_positions.len()
    }

    pub fn positions(&self, wave: Wave) -> &[usize] {
        match wave {
            Wave::R => &self.r_positions,
            Wave::P => &self.p_positions,
            Wave::Q => &self.q_positions,
            Wave::S => &self.s_positions,
            Wave::T => &self.t_positions,
        }
    }

    /// Check the preconditions every downstream computation relies on.
    pub fn validate(&self) -> Result<(), DiagnosisError> {
        let beats = self.beat_count();
        if beats < 2 {
            return Err(DiagnosisError::InsufficientData { beats });
        }
        for wave in Wave::ALIGNED {
            let got = self.positions(wave).len();
            if got != beats {
                return Err(DiagnosisError::MisalignedFiducials {
                    wave,
                    expected: beats,
                    got,
                });
            }
        }
        if let Some((i, w)) = self
            .r_positions
            .windows(2)
            .enumerate()
            .find(|(_, w)| w[1] <= w[0])
        {
            return Err(DiagnosisError::UnorderedPeaks {
                beat: i + 1,
                previous: w[0],
                sample: w[1],
            });
        }
        if !(self.sampling_rate_hz.is_finite() && self.sampling_rate_hz > 0.0) {
            return Err(DiagnosisError::NonPositiveSamplingRate {
                fs: self.sampling_rate_hz,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regular_set() -> FiducialSet {
        FiducialSet::new(
            500.0,
            vec![100, 600, 1100],
            vec![20, 520, 1020],
            vec![80, 580, 1080],
            vec![120, 620, 1120],
            vec![250, 750, 1250],
        )
    }

    #[test]
    fn accepts_aligned_recording() {
        assert!(regular_set().validate().is_ok());
    }

    #[test]
    fn rejects_single_beat() {
        let set = FiducialSet::new(500.0, vec![100], vec![20], vec![80], vec![120], vec![250]);
        assert_eq!(
            set.validate(),
            Err(DiagnosisError::InsufficientData { beats: 1 })
        );
    }

    #[test]
    fn rejects_short_wave_list() {
        let mut set = regular_set();
        set.s_positions.pop();
        assert_eq!(
            set.validate(),
            Err(DiagnosisError::MisalignedFiducials {
                wave: Wave::S,
                expected: 3,
                got: 2
            })
        );
    }

    #[test]
    fn t_wave_length_is_checked_too() {
        let mut set = regular_set();
        set.t_positions.push(1750);
        assert!(matches!(
            set.validate(),
            Err(DiagnosisError::MisalignedFiducials { wave: Wave::T, .. })
        ));
    }

    #[test]
    fn rejects_repeated_peak() {
        let mut set = regular_set();
        set.r_positions[2] = 600;
        assert_eq!(
            set.validate(),
            Err(DiagnosisError::UnorderedPeaks {
                beat: 2,
                previous: 600,
                sample: 600
            })
        );
    }

    #[test]
    fn rejects_zero_sampling_rate() {
        let mut set = regular_set();
        set.sampling_rate_hz = 0.0;
        assert!(matches!(
            set.validate(),
            Err(DiagnosisError::NonPositiveSamplingRate { .. })
        ));
    }

    #[test]
    fn deserializes_fs_alias() {
        let set: FiducialSet = serde_json::from_str(
            r#"{"fs":250,"r_positions":[1,2],"p_positions":[0,1],"q_positions":[0,1],"s_positions":[2,3],"t_positions":[3,4]}"#,
        )
        .unwrap();
        assert_eq!(set.sampling_rate_hz, 250.0);
        assert_eq!(set.positions(Wave::T), &[3, 4]);
    }
}
