use crate::{
    io::text::read_wave_indices,
    signal::{FiducialSet, Wave, DEFAULT_SAMPLING_RATE_HZ},
};
use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

/// One row of a per-beat fiducial table.
#[derive(Debug, Deserialize)]
struct BeatRow {
    r: usize,
    p: usize,
    q: usize,
    s: usize,
    t: usize,
}

/// Read a per-beat table with `r,p,q,s,t` header columns (any order).
pub fn parse_fiducial_csv<R: Read>(reader: R, fs: f64) -> Result<FiducialSet> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);
    let mut set = FiducialSet::new(fs, Vec::new(), Vec::new(), Vec::new(), Vec::new(), Vec::new());
    for (idx, row) in reader.deserialize::<BeatRow>().enumerate() {
        let row = row.with_context(|| format!("reading beat {}", idx + 1))?;
        set.r_positions.push(row.r);
        set.p_positions.push(row.p);
        set.q_positions.push(row.q);
        set.s_positions.push(row.s);
        set.t_positions.push(row.t);
    }
    Ok(set)
}

pub fn read_fiducial_csv(path: &Path, fs: f64) -> Result<FiducialSet> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_fiducial_csv(file, fs).with_context(|| format!("in {}", path.display()))
}

pub fn read_fiducial_json(path: &Path) -> Result<FiducialSet> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(file).with_context(|| format!("parsing {}", path.display()))
}

/// Load a fiducial file by extension.
///
/// CSV tables carry no rate, so `fs` (or [`DEFAULT_SAMPLING_RATE_HZ`]) applies.
/// JSON documents carry their own rate, which `fs` overrides when given.
pub fn load_fiducials(path: &Path, fs: Option<f64>) -> Result<FiducialSet> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());
    match ext.as_deref() {
        Some("csv") => read_fiducial_csv(path, fs.unwrap_or(DEFAULT_SAMPLING_RATE_HZ)),
        Some("json") => {
            let mut set = read_fiducial_json(path)?;
            if let Some(fs) = fs {
                set.sampling_rate_hz = fs;
            }
            Ok(set)
        }
        _ => bail!(
            "unsupported fiducial file {} (expected .csv or .json)",
            path.display()
        ),
    }
}

/// Paths to newline-delimited index lists, one per wave.
#[derive(Debug, Clone)]
pub struct WaveFiles {
    pub r: PathBuf,
    pub p: PathBuf,
    pub q: PathBuf,
    pub s: PathBuf,
    pub t: PathBuf,
}

pub fn read_wave_files(files: &WaveFiles, fs: f64) -> Result<FiducialSet> {
    Ok(FiducialSet::new(
        fs,
        read_wave_indices(&files.r, Wave::R)?,
        read_wave_indices(&files.p, Wave::P)?,
        read_wave_indices(&files.q, Wave::Q)?,
        read_wave_indices(&files.s, Wave::S)?,
        read_wave_indices(&files.t, Wave::T)?,
    ))
}

/// Fiducial files (`.csv`/`.json`) directly inside `dir`, sorted by name.
pub fn fiducial_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let path = entry?.path();
        let supported = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv") || ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if path.is_file() && supported {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const TABLE: &str = "r,p,q,s,t\n100,20,80,120,250\n600,520,580,620,750\n1100,1020,1080,1120,1250\n";

    #[test]
    fn parses_beat_table() {
        let set = parse_fiducial_csv(TABLE.as_bytes(), 500.0).unwrap();
        assert_eq!(set.r_positions, vec![100, 600, 1100]);
        assert_eq!(set.p_positions, vec![20, 520, 1020]);
        assert_eq!(set.t_positions, vec![250, 750, 1250]);
        assert_eq!(set.sampling_rate_hz, 500.0);
    }

    #[test]
    fn column_order_and_spacing_do_not_matter() {
        let text = "# exported beats\nt, s, r, q, p\n250, 120, 100, 80, 20\n750, 620, 600, 580, 520\n";
        let set = parse_fiducial_csv(text.as_bytes(), 250.0).unwrap();
        assert_eq!(set.r_positions, vec![100, 600]);
        assert_eq!(set.q_positions, vec![80, 580]);
    }

    #[test]
    fn missing_column_is_an_error() {
        let text = "r,p,q,s\n100,20,80,120\n";
        assert!(parse_fiducial_csv(text.as_bytes(), 500.0).is_err());
    }

    #[test]
    fn dispatches_on_extension() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("rec.csv");
        fs::write(&csv_path, TABLE).unwrap();
        let json_path = dir.path().join("rec.json");
        let set = parse_fiducial_csv(TABLE.as_bytes(), 360.0).unwrap();
        fs::write(&json_path, serde_json::to_string(&set).unwrap()).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        assert_eq!(load_fiducials(&csv_path, None).unwrap().sampling_rate_hz, 500.0);
        assert_eq!(load_fiducials(&json_path, None).unwrap().sampling_rate_hz, 360.0);
        assert_eq!(
            load_fiducials(&json_path, Some(250.0)).unwrap().sampling_rate_hz,
            250.0
        );
        assert!(load_fiducials(&dir.path().join("notes.txt"), None).is_err());

        let listed = fiducial_files_in(dir.path()).unwrap();
        assert_eq!(listed, vec![csv_path, json_path]);
    }

    #[test]
    fn assembles_from_wave_files() {
        let dir = tempdir().unwrap();
        let write = |name: &str, body: &str| {
            let path = dir.path().join(name);
            fs::write(&path, body).unwrap();
            path
        };
        let files = WaveFiles {
            r: write("r.txt", "100\n600\n"),
            p: write("p.txt", "20\n520\n"),
            q: write("q.txt", "80\n580\n"),
            s: write("s.txt", "120\n620\n"),
            t: write("t.txt", "# T\n250\n750\n"),
        };
        let set = read_wave_files(&files, 500.0).unwrap();
        assert_eq!(set.beat_count(), 2);
        assert_eq!(set.s_positions, vec![120, 620]);
        assert!(set.validate().is_ok());
    }
}
