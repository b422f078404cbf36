//! Single-purpose threshold rules. Each one is a pure function of a derived
//! statistic and its thresholds; the order in which they run lives in
//! [`crate::diagnosis`].

pub mod conduction;
pub mod rate;
pub mod rhythm;

pub use conduction::{classify_pr_interval, classify_qrs_width, PrInterval, QrsWidth};
pub use rate::{classify_heart_rate, HeartRate};
pub use rhythm::{classify_p_wave_timing, classify_rhythm, PWaveTiming, Rhythm};
