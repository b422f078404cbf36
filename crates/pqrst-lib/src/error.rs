use crate::signal::Wave;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a fiducial set cannot be turned into interval statistics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiagnosisError {
    #[error("at least 2 R-peaks are needed to form an RR interval, got {beats}")]
    InsufficientData { beats: usize },
    #[error("{wave} positions hold {got} entries but the recording has {expected} beats")]
    MisalignedFiducials {
        wave: Wave,
        expected: usize,
        got: usize,
    },
    #[error("R-peaks must be strictly increasing (beat {beat} at sample {sample} does not follow {previous})")]
    UnorderedPeaks {
        beat: usize,
        previous: usize,
        sample: usize,
    },
    #[error("sampling rate must be a positive finite number, got {fs}")]
    NonPositiveSamplingRate { fs: f64 },
    #[error("fiducial extraction failed: {0}")]
    FiducialComputation(String),
}

impl DiagnosisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DiagnosisError::InsufficientData { .. } => ErrorKind::InsufficientData,
            DiagnosisError::MisalignedFiducials { .. } => ErrorKind::MisalignedFiducials,
            DiagnosisError::UnorderedPeaks { .. } => ErrorKind::UnorderedPeaks,
            DiagnosisError::NonPositiveSamplingRate { .. } => ErrorKind::NonPositiveSamplingRate,
            DiagnosisError::FiducialComputation(_) => ErrorKind::FiducialComputation,
        }
    }
}

/// Failure classes reported alongside an unanalyzable result.
///
/// These never share a number space with clinical codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InsufficientData,
    MisalignedFiducials,
    UnorderedPeaks,
    NonPositiveSamplingRate,
    FiducialComputation,
}
