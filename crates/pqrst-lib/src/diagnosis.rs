use crate::{
    classifiers::{
        classify_heart_rate, classify_p_wave_timing, classify_pr_interval, classify_qrs_width,
        classify_rhythm, HeartRate, PWaveTiming, PrInterval, QrsWidth, Rhythm,
    },
    config::ThresholdConfig,
    error::{DiagnosisError, ErrorKind},
    metrics::intervals::{interval_statistics, IntervalStatistics},
    signal::FiducialSet,
};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Label reported for any recording the engine could not analyze.
pub const UNANALYZABLE_LABEL: &str = "ECG read/compute error";

/// Terminal clinical findings. Codes are stable and 0 means no pathology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diagnosis {
    NormalSinusRhythm,
    Tachycardia,
    Bradycardia,
    FirstDegreeAvBlock,
    VentricularTachycardia,
    HypertrophyIschemiaInfarction,
    Fibrillation,
}

impl Diagnosis {
    pub const ALL: [Diagnosis; 7] = [
        Diagnosis::NormalSinusRhythm,
        Diagnosis::Tachycardia,
        Diagnosis::Bradycardia,
        Diagnosis::FirstDegreeAvBlock,
        Diagnosis::VentricularTachycardia,
        Diagnosis::HypertrophyIschemiaInfarction,
        Diagnosis::Fibrillation,
    ];

    pub fn code(&self) -> i32 {
        match self {
            Diagnosis::NormalSinusRhythm => 0,
            Diagnosis::Tachycardia => 1,
            Diagnosis::Bradycardia => -1,
            Diagnosis::FirstDegreeAvBlock => -2,
            Diagnosis::VentricularTachycardia => -3,
            Diagnosis::HypertrophyIschemiaInfarction => -4,
            Diagnosis::Fibrillation => -5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Diagnosis::NormalSinusRhythm => "Normal sinus rhythm",
            Diagnosis::Tachycardia => "Tachycardia",
            Diagnosis::Bradycardia => "Bradycardia",
            Diagnosis::FirstDegreeAvBlock => "First-degree AV block",
            Diagnosis::VentricularTachycardia => "Ventricular tachycardia",
            Diagnosis::HypertrophyIschemiaInfarction => {
                "Hypertrophy / ischemia / infarction — unresolved"
            }
            Diagnosis::Fibrillation => "Fibrillation",
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.code() == code)
    }

    pub fn is_pathological(&self) -> bool {
        *self != Diagnosis::NormalSinusRhythm
    }
}

/// Outcome of one analysis: a clinical finding, or the reason there is none.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "DiagnosisReport")]
pub enum DiagnosisResult {
    Diagnosed(Diagnosis),
    Unanalyzable { kind: ErrorKind, detail: String },
}

impl DiagnosisResult {
    /// Clinical code, absent for unanalyzable recordings.
    pub fn code(&self) -> Option<i32> {
        self.diagnosis().map(|d| d.code())
    }

    pub fn label(&self) -> &'static str {
        match self {
            DiagnosisResult::Diagnosed(d) => d.label(),
            DiagnosisResult::Unanalyzable { .. } => UNANALYZABLE_LABEL,
        }
    }

    pub fn diagnosis(&self) -> Option<Diagnosis> {
        match self {
            DiagnosisResult::Diagnosed(d) => Some(*d),
            DiagnosisResult::Unanalyzable { .. } => None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            DiagnosisResult::Diagnosed(_) => None,
            DiagnosisResult::Unanalyzable { kind, .. } => Some(*kind),
        }
    }
}

impl From<DiagnosisError> for DiagnosisResult {
    fn from(err: DiagnosisError) -> Self {
        DiagnosisResult::Unanalyzable {
            kind: err.kind(),
            detail: err.to_string(),
        }
    }
}

/// Flat wire form of [`DiagnosisResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<Diagnosis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<DiagnosisResult> for DiagnosisReport {
    fn from(result: DiagnosisResult) -> Self {
        let label = result.label().to_string();
        match result {
            DiagnosisResult::Diagnosed(d) => DiagnosisReport {
                code: Some(d.code()),
                label,
                diagnosis: Some(d),
                error: None,
                detail: None,
            },
            DiagnosisResult::Unanalyzable { kind, detail } => DiagnosisReport {
                code: None,
                label,
                diagnosis: None,
                error: Some(kind),
                detail: Some(detail),
            },
        }
    }
}

/// Verdicts gathered along the branch taken through the decision tree.
/// Classifiers off that branch are left as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTrace {
    pub diagnosis: Diagnosis,
    pub statistics: IntervalStatistics,
    pub rhythm: Rhythm,
    pub heart_rate: Option<HeartRate>,
    pub pr_interval: Option<PrInterval>,
    pub qrs_width: Option<QrsWidth>,
    pub p_wave: Option<PWaveTiming>,
}

/// Walk the decision tree over precomputed statistics.
///
/// Rate findings take priority over conduction and morphology on a regular
/// rhythm; P-wave timing only splits the irregular branch.
pub fn decide(statistics: IntervalStatistics, cfg: &ThresholdConfig) -> DecisionTrace {
    let rhythm = classify_rhythm(statistics.rr_std_dev, cfg.rhythm_std_dev);
    let mut heart_rate = None;
    let mut pr_interval = None;
    let mut qrs_width = None;
    let mut p_wave = None;

    let diagnosis = match rhythm {
        Rhythm::Regular => {
            let rate = classify_heart_rate(
                statistics.mean_heart_rate_bpm,
                cfg.bradycardia_bpm,
                cfg.tachycardia_bpm,
            );
            heart_rate = Some(rate);
            match rate {
                HeartRate::Bradycardia => Diagnosis::Bradycardia,
                HeartRate::Normal => {
                    let pr = classify_pr_interval(
                        &statistics.pr_segment_samples,
                        cfg.pr_distance_samples,
                        cfg.pr_repetition_fraction,
                    );
                    pr_interval = Some(pr);
                    match pr {
                        PrInterval::Prolonged => Diagnosis::FirstDegreeAvBlock,
                        PrInterval::Normal => Diagnosis::NormalSinusRhythm,
                    }
                }
                HeartRate::Tachycardia => {
                    let qrs =
                        classify_qrs_width(&statistics.qrs_width_samples, cfg.qrs_width_samples);
                    qrs_width = Some(qrs);
                    match qrs {
                        QrsWidth::Wide => Diagnosis::VentricularTachycardia,
                        QrsWidth::Normal => Diagnosis::Tachycardia,
                    }
                }
            }
        }
        Rhythm::Irregular => {
            let timing =
                classify_p_wave_timing(statistics.pr_interval_std_dev, cfg.p_wave_std_dev);
            p_wave = Some(timing);
            match timing {
                PWaveTiming::Consistent => Diagnosis::HypertrophyIschemiaInfarction,
                PWaveTiming::Inconsistent => Diagnosis::Fibrillation,
            }
        }
    };

    log::debug!(
        "rhythm {:?}, rate {:?}, PR {:?}, QRS {:?}, P-wave {:?} => {:?}",
        rhythm,
        heart_rate,
        pr_interval,
        qrs_width,
        p_wave,
        diagnosis
    );

    DecisionTrace {
        diagnosis,
        statistics,
        rhythm,
        heart_rate,
        pr_interval,
        qrs_width,
        p_wave,
    }
}

/// Diagnose with the intermediate verdicts kept.
pub fn explain(
    fiducials: &FiducialSet,
    cfg: &ThresholdConfig,
) -> Result<DecisionTrace, DiagnosisError> {
    let statistics = interval_statistics(fiducials)?;
    Ok(decide(statistics, cfg))
}

pub fn try_diagnose(
    fiducials: &FiducialSet,
    cfg: &ThresholdConfig,
) -> Result<Diagnosis, DiagnosisError> {
    explain(fiducials, cfg).map(|trace| trace.diagnosis)
}

/// Diagnose one recording. Invalid input yields [`DiagnosisResult::Unanalyzable`]
/// instead of an error.
pub fn diagnose(fiducials: &FiducialSet, cfg: &ThresholdConfig) -> DiagnosisResult {
    match try_diagnose(fiducials, cfg) {
        Ok(diagnosis) => DiagnosisResult::Diagnosed(diagnosis),
        Err(err) => err.into(),
    }
}

/// Diagnose the output of an upstream fiducial extraction, folding its
/// failure into the unanalyzable outcome.
pub fn diagnose_extracted<E: Display>(
    extraction: Result<FiducialSet, E>,
    cfg: &ThresholdConfig,
) -> DiagnosisResult {
    match extraction {
        Ok(fiducials) => diagnose(&fiducials, cfg),
        Err(err) => {
            log::warn!("fiducial extraction failed: {err}");
            DiagnosisError::FiducialComputation(err.to_string()).into()
        }
    }
}

/// Diagnose many records, keeping going past the ones that fail.
pub fn diagnose_batch<K, E, I>(records: I, cfg: &ThresholdConfig) -> Vec<(K, DiagnosisResult)>
where
    I: IntoIterator<Item = (K, Result<FiducialSet, E>)>,
    E: Display,
{
    records
        .into_iter()
        .map(|(id, extraction)| (id, diagnose_extracted(extraction, cfg)))
        .collect()
}
