pub mod classifiers;
pub mod config;
pub mod diagnosis;
pub mod error;
pub mod io;
pub mod metrics;
pub mod signal;

pub use config::ThresholdConfig;
pub use diagnosis::{
    decide, diagnose, diagnose_batch, diagnose_extracted, explain, try_diagnose, DecisionTrace,
    Diagnosis, DiagnosisReport, DiagnosisResult,
};
pub use error::{DiagnosisError, ErrorKind};
pub use metrics::intervals::{interval_statistics, IntervalStatistics};
pub use signal::{FiducialSet, Wave};
