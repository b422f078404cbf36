use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::info;
use pqrst_lib::{
    diagnosis::{diagnose, diagnose_batch, explain, DecisionTrace, DiagnosisResult},
    io::fiducials::{fiducial_files_in, load_fiducials, read_wave_files, WaveFiles},
    metrics::intervals::interval_statistics,
    signal::{FiducialSet, DEFAULT_SAMPLING_RATE_HZ},
    ThresholdConfig,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "pqrst",
    version,
    about = "Rule-based ECG diagnosis from per-beat fiducial landmarks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Threshold overrides, applied on top of `--config` (or the defaults).
#[derive(Args, Debug)]
struct ThresholdArgs {
    /// TOML file with any subset of thresholds
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    rhythm_std_dev: Option<f64>,
    #[arg(long)]
    bradycardia_bpm: Option<f64>,
    #[arg(long)]
    tachycardia_bpm: Option<f64>,
    #[arg(long)]
    pr_distance_samples: Option<f64>,
    #[arg(long)]
    pr_repetition_fraction: Option<f64>,
    #[arg(long)]
    qrs_width_samples: Option<f64>,
    #[arg(long)]
    p_wave_std_dev: Option<f64>,
}

impl ThresholdArgs {
    fn resolve(&self) -> Result<ThresholdConfig> {
        let mut cfg = match &self.config {
            Some(path) => ThresholdConfig::load(path)?,
            None => ThresholdConfig::default(),
        };
        let overrides = [
            (&mut cfg.rhythm_std_dev, self.rhythm_std_dev),
            (&mut cfg.bradycardia_bpm, self.bradycardia_bpm),
            (&mut cfg.tachycardia_bpm, self.tachycardia_bpm),
            (&mut cfg.pr_distance_samples, self.pr_distance_samples),
            (&mut cfg.pr_repetition_fraction, self.pr_repetition_fraction),
            (&mut cfg.qrs_width_samples, self.qrs_width_samples),
            (&mut cfg.p_wave_std_dev, self.p_wave_std_dev),
        ];
        for (slot, value) in overrides {
            if let Some(value) = value {
                *slot = value;
            }
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Diagnose one recording from a per-beat CSV table or a JSON fiducial set
    Diagnose {
        #[arg(long)]
        input: PathBuf,
        /// Sampling rate; defaults to 500 Hz for CSV, overrides the JSON value when set
        #[arg(long)]
        fs: Option<f64>,
        /// Include the intermediate classifier verdicts and statistics
        #[arg(long)]
        explain: bool,
        #[command(flatten)]
        thresholds: ThresholdArgs,
    },
    /// Diagnose one recording from newline-delimited index files, one per wave
    DiagnoseWaves {
        #[arg(long)]
        r: PathBuf,
        #[arg(long)]
        p: PathBuf,
        #[arg(long)]
        q: PathBuf,
        #[arg(long)]
        s: PathBuf,
        #[arg(long)]
        t: PathBuf,
        #[arg(long, default_value_t = DEFAULT_SAMPLING_RATE_HZ)]
        fs: f64,
        #[arg(long)]
        explain: bool,
        #[command(flatten)]
        thresholds: ThresholdArgs,
    },
    /// Print the RR / PR / QRS statistics the classifiers work from
    IntervalStats {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        fs: Option<f64>,
    },
    /// Diagnose every .csv/.json fiducial file in a directory, one JSON line each
    DiagnoseBatch {
        #[arg(long)]
        dir: PathBuf,
        #[arg(long)]
        fs: Option<f64>,
        #[command(flatten)]
        thresholds: ThresholdArgs,
    },
}

#[derive(Serialize)]
struct ExplainedResult {
    #[serde(flatten)]
    result: DiagnosisResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<DecisionTrace>,
}

#[derive(Serialize)]
struct BatchLine {
    record: String,
    #[serde(flatten)]
    result: DiagnosisResult,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Diagnose {
            input,
            fs,
            explain,
            thresholds,
        } => {
            let cfg = thresholds.resolve()?;
            let fiducials = load_fiducials(&input, fs)?;
            cmd_diagnose(&fiducials, &cfg, explain)?
        }
        Commands::DiagnoseWaves {
            r,
            p,
            q,
            s,
            t,
            fs,
            explain,
            thresholds,
        } => {
            let cfg = thresholds.resolve()?;
            let fiducials = read_wave_files(&WaveFiles { r, p, q, s, t }, fs)?;
            cmd_diagnose(&fiducials, &cfg, explain)?
        }
        Commands::IntervalStats { input, fs } => cmd_interval_stats(&input, fs)?,
        Commands::DiagnoseBatch {
            dir,
            fs,
            thresholds,
        } => cmd_diagnose_batch(&dir, fs, &thresholds.resolve()?)?,
    }
    Ok(())
}

fn cmd_diagnose(fiducials: &FiducialSet, cfg: &ThresholdConfig, with_trace: bool) -> Result<()> {
    let js = if with_trace {
        let out = match explain(fiducials, cfg) {
            Ok(trace) => ExplainedResult {
                result: DiagnosisResult::Diagnosed(trace.diagnosis),
                trace: Some(trace),
            },
            Err(err) => ExplainedResult {
                result: err.into(),
                trace: None,
            },
        };
        serde_json::to_string(&out)?
    } else {
        serde_json::to_string(&diagnose(fiducials, cfg))?
    };
    println!("{}", js);
    Ok(())
}

fn cmd_interval_stats(input: &Path, fs: Option<f64>) -> Result<()> {
    let fiducials = load_fiducials(input, fs)?;
    let stats = interval_statistics(&fiducials)?;
    println!("{}", serde_json::to_string(&stats)?);
    Ok(())
}

fn cmd_diagnose_batch(dir: &Path, fs: Option<f64>, cfg: &ThresholdConfig) -> Result<()> {
    let files = fiducial_files_in(dir)?;
    let records = files.iter().map(|path| {
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        // {:#} keeps the whole context chain in the unanalyzable detail
        let loaded = load_fiducials(path, fs).map_err(|e| format!("{:#}", e));
        (id, loaded)
    });
    let results = diagnose_batch(records, cfg);
    let unanalyzable = results
        .iter()
        .filter(|(_, r)| r.diagnosis().is_none())
        .count();
    for (record, result) in results {
        println!("{}", serde_json::to_string(&BatchLine { record, result })?);
    }
    info!(
        "diagnosed {} record(s) from {}, {} unanalyzable",
        files.len(),
        dir.display(),
        unanalyzable
    );
    Ok(())
}
