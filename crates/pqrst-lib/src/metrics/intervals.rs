use crate::{error::DiagnosisError, signal::FiducialSet};
use serde::{Deserialize, Serialize};

/// Interval statistics derived from one fiducial set. All lengths are in samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalStatistics {
    pub rr_intervals: Vec<f64>,
    pub rr_std_dev: f64,
    pub mean_heart_rate_bpm: f64,
    pub pr_segment_samples: Vec<f64>,
    pub qrs_width_samples: Vec<f64>,
    pub pr_interval_std_dev: f64,
}

pub fn interval_statistics(fiducials: &FiducialSet) -> Result<IntervalStatistics, DiagnosisError> {
    fiducials.validate()?;
    let rr_intervals = rr_intervals(&fiducials.r_positions);
    let rr_std_dev = population_std(&rr_intervals);
    let mean_heart_rate_bpm = mean_heart_rate_bpm(&rr_intervals, fiducials.sampling_rate_hz);
    let pr_segment_samples = pairwise_span(&fiducials.p_positions, &fiducials.r_positions);
    let qrs_width_samples = pairwise_span(&fiducials.q_positions, &fiducials.s_positions);
    let pr_interval_std_dev = population_std(&pr_segment_samples);
    log::debug!(
        "RR std-dev {:.2} samples, mean rate {:.2} bpm, PR std-dev {:.2} samples",
        rr_std_dev,
        mean_heart_rate_bpm,
        pr_interval_std_dev
    );
    Ok(IntervalStatistics {
        rr_intervals,
        rr_std_dev,
        mean_heart_rate_bpm,
        pr_segment_samples,
        qrs_width_samples,
        pr_interval_std_dev,
    })
}

/// Consecutive R-peak distances.
pub fn rr_intervals(r_positions: &[usize]) -> Vec<f64> {
    r_positions
        .windows(2)
        .map(|w| w[1] as f64 - w[0] as f64)
        .collect()
}

/// `60 * fs / mean(rr)`; zero when there is no interval to average.
pub fn mean_heart_rate_bpm(rr_intervals: &[f64], fs: f64) -> f64 {
    let avg = mean(rr_intervals);
    if avg == 0.0 {
        return 0.0;
    }
    60.0 * fs / avg
}

/// Elementwise `end[i] - start[i]`. Signed, so a landmark placed after its
/// partner yields a negative span instead of wrapping.
pub fn pairwise_span(start: &[usize], end: &[usize]) -> Vec<f64> {
    start
        .iter()
        .zip(end)
        .map(|(&a, &b)| b as f64 - a as f64)
        .collect()
}

pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Standard deviation normalised by `n` (not `n - 1`).
pub fn population_std(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let m = mean(data);
    (data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / data.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fiducials(fs: f64, r: &[usize], pr: usize, qrs: usize) -> FiducialSet {
        FiducialSet::new(
            fs,
            r.to_vec(),
            r.iter().map(|x| x - pr).collect(),
            r.iter().map(|x| x - qrs / 2).collect(),
            r.iter().map(|x| x - qrs / 2 + qrs).collect(),
            r.iter().map(|x| x + 150).collect(),
        )
    }

    #[test]
    fn constant_spacing_has_zero_variability() {
        let stats = interval_statistics(&fiducials(500.0, &[100, 600, 1100, 1600], 80, 40)).unwrap();
        assert_eq!(stats.rr_intervals, vec![500.0, 500.0, 500.0]);
        assert_eq!(stats.rr_std_dev, 0.0);
        assert_eq!(stats.mean_heart_rate_bpm, 60.0);
        assert_eq!(stats.pr_segment_samples, vec![80.0; 4]);
        assert_eq!(stats.qrs_width_samples, vec![40.0; 4]);
        assert_eq!(stats.pr_interval_std_dev, 0.0);
    }

    #[test]
    fn std_dev_is_population_form() {
        // mean 3, squared deviations 4 + 0 + 4 over n = 3
        let sd = population_std(&[1.0, 3.0, 5.0]);
        assert!((sd - (8.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn mean_rate_uses_mean_interval() {
        // 60 * 500 / mean(250, 500) rather than the mean of per-interval rates
        let bpm = mean_heart_rate_bpm(&[250.0, 500.0], 500.0);
        assert!((bpm - 80.0).abs() < 1e-12);
    }

    #[test]
    fn span_can_be_negative() {
        assert_eq!(pairwise_span(&[10, 50], &[5, 60]), vec![-5.0, 10.0]);
    }

    #[test]
    fn two_beats_are_enough() {
        let stats = interval_statistics(&fiducials(500.0, &[200, 450], 60, 30)).unwrap();
        assert_eq!(stats.rr_intervals, vec![250.0]);
        assert_eq!(stats.rr_std_dev, 0.0);
        assert_eq!(stats.mean_heart_rate_bpm, 120.0);
    }

    #[test]
    fn fewer_than_two_beats_always_fail() {
        for r in [vec![], vec![900usize]] {
            let n = r.len();
            let set = FiducialSet::new(500.0, r.clone(), r.clone(), r.clone(), r.clone(), r);
            assert_eq!(
                interval_statistics(&set),
                Err(DiagnosisError::InsufficientData { beats: n })
            );
        }
    }

    #[test]
    fn repeated_calls_agree() {
        let set = fiducials(500.0, &[100, 420, 790, 1060, 1500], 90, 50);
        assert_eq!(interval_statistics(&set), interval_statistics(&set));
    }
}
