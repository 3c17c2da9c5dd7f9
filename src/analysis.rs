use crate::config::Config;
use anyhow::{Context, Result, bail};
use circstat::{Interval, Point, StatsError, circular, geometric};
use rmp_serde::encode;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::BufWriter,
    path::Path,
};

/// Summary statistics computed from a single data file.
pub trait Summary: Serialize + Sized {
    fn from_file(file: &Path, cfg: &Config) -> Result<Self>;
}

/// Circular statistics of a file of angular samples.
#[derive(Debug, Serialize, Deserialize)]
pub struct CircularReport {
    pub file: String,
    pub n_samples: usize,
    pub mean: f64,
    pub var: f64,
    pub std_dev: f64,
    pub median: f64,
    pub mad: f64,
    pub sample_range: f64,
    pub sample_interval: Interval,
}

impl Summary for CircularReport {
    fn from_file(file: &Path, cfg: &Config) -> Result<Self> {
        let samples = read_samples(file)?;
        let interval = cfg.circular.interval()?;

        let report = match interval {
            Some(int) => Self {
                file: file.display().to_string(),
                n_samples: samples.len(),
                mean: circular::mean_in(&samples, int).context("failed to compute mean")?,
                var: circular::var_in(&samples, int).context("failed to compute var")?,
                std_dev: circular::std_dev_in(&samples, int).context("failed to compute std")?,
                median: circular::median_in(&samples, int).context("failed to compute median")?,
                mad: circular::mad_in(&samples, int).context("failed to compute mad")?,
                sample_range: circular::sample_range_in(&samples, int)
                    .context("failed to compute sample range")?,
                sample_interval: circular::sample_interval_in(&samples, int)
                    .context("failed to compute sample interval")?,
            },
            None => Self {
                file: file.display().to_string(),
                n_samples: samples.len(),
                mean: circular::mean(&samples).context("failed to compute mean")?,
                var: circular::var(&samples).context("failed to compute var")?,
                std_dev: circular::std_dev(&samples).context("failed to compute std")?,
                median: circular::median(&samples).context("failed to compute median")?,
                mad: circular::mad(&samples).context("failed to compute mad")?,
                sample_range: circular::sample_range(&samples)
                    .context("failed to compute sample range")?,
                sample_interval: circular::sample_interval(&samples)
                    .context("failed to compute sample interval")?,
            },
        };

        Ok(report)
    }
}

/// Geometric statistics of a file of points.
#[derive(Debug, Serialize, Deserialize)]
pub struct GeometricReport {
    pub file: String,
    pub n_points: usize,
    pub dim: usize,
    pub median: Vec<f64>,
    pub mad: f64,
    pub std_dev: f64,
    pub most_distant: [usize; 2],
}

impl Summary for GeometricReport {
    fn from_file(file: &Path, cfg: &Config) -> Result<Self> {
        let (dim, rows) = read_points(file)?;

        let (median, mad, std_dev, most_distant) = match dim {
            1 => summarize(&rows.iter().map(|row| row[0]).collect::<Vec<_>>(), cfg, |pnt| {
                vec![pnt]
            }),
            2 => summarize(&to_arrays::<2>(&rows), cfg, |pnt| pnt.to_vec()),
            3 => summarize(&to_arrays::<3>(&rows), cfg, |pnt| pnt.to_vec()),
            _ => bail!("points must have 1, 2 or 3 coordinates, but have {dim}"),
        }
        .context("failed to summarize points")?;

        Ok(Self {
            file: file.display().to_string(),
            n_points: rows.len(),
            dim,
            median,
            mad,
            std_dev,
            most_distant,
        })
    }
}

fn summarize<P: Point>(
    points: &[P],
    cfg: &Config,
    to_vec: impl Fn(P) -> Vec<f64>,
) -> Result<(Vec<f64>, f64, f64, [usize; 2]), StatsError> {
    let median = geometric::geometric_median_with(points, &cfg.geometric)?;
    let mad = geometric::geometric_mad_with(points, &cfg.geometric)?;
    let std_dev = geometric::vec_std(points)?;
    let (i_a, i_b) = geometric::most_distant_points_ix(points)?;
    Ok((to_vec(median), mad, std_dev, [i_a, i_b]))
}

fn to_arrays<const N: usize>(rows: &[Vec<f64>]) -> Vec<[f64; N]> {
    rows.iter()
        .map(|row| std::array::from_fn(|idx| row[idx]))
        .collect()
}

/// Collects one [`Summary`] per data file.
pub struct Analyzer<S: Summary> {
    cfg: Config,
    reports: Vec<S>,
}

#[derive(Serialize)]
struct Reports<T> {
    reports: T,
}

impl<S: Summary> Analyzer<S> {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            reports: Vec::new(),
        }
    }

    pub fn add_file<P: AsRef<Path>>(&mut self, file: P) -> Result<()> {
        let file = file.as_ref();
        let report = S::from_file(file, &self.cfg)?;
        self.reports.push(report);
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        let reports = Reports {
            reports: &self.reports,
        };
        toml::to_string(&reports).context("failed to serialize reports")
    }

    pub fn save_results<P: AsRef<Path>>(&self, file: P) -> Result<()> {
        let file = file.as_ref();
        let file = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
        let mut writer = BufWriter::new(file);
        encode::write_named(&mut writer, &self.reports).context("failed to serialize reports")?;
        Ok(())
    }
}

/// Read one sample per line, skipping blank lines and `#` comments.
pub fn read_samples<P: AsRef<Path>>(file: P) -> Result<Vec<f64>> {
    let (dim, rows) = read_points(file)?;
    if dim != 1 {
        bail!("samples must have 1 coordinate, but have {dim}");
    }
    Ok(rows.into_iter().map(|row| row[0]).collect())
}

/// Read one point per line as whitespace-separated coordinates.
///
/// Returns the common dimension of the points together with the points.
pub fn read_points<P: AsRef<Path>>(file: P) -> Result<(usize, Vec<Vec<f64>>)> {
    let file = file.as_ref();
    let contents = fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

    let mut rows = Vec::new();
    for (i_line, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|tok| tok.parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("invalid number on line {}", i_line + 1))?;
        rows.push(row);
    }

    let Some(dim) = rows.first().map(Vec::len) else {
        bail!("{file:?} contains no data");
    };
    if let Some(row) = rows.iter().find(|row| row.len() != dim) {
        bail!("every point must have {dim} coordinates, but one has {}", row.len());
    }

    Ok((dim, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, path::PathBuf};

    fn write_tmp(name: &str, contents: &str) -> PathBuf {
        let dir = env::temp_dir().join("circstat-analysis-tests");
        fs::create_dir_all(&dir).expect("failed to create test directory");
        let file = dir.join(name);
        fs::write(&file, contents).expect("failed to write test file");
        file
    }

    #[test]
    fn reads_points_skipping_comments() {
        let file = write_tmp("points.txt", "# x y\n1 2\n\n 3.5  -4\n");
        let (dim, rows) = read_points(&file).unwrap();
        assert_eq!(dim, 2);
        assert_eq!(rows, vec![vec![1.0, 2.0], vec![3.5, -4.0]]);
        assert!(read_samples(&file).is_err());
    }

    #[test]
    fn rejects_ragged_and_malformed_files() {
        assert!(read_points(write_tmp("ragged.txt", "1 2\n3\n")).is_err());
        assert!(read_points(write_tmp("malformed.txt", "1\nabc\n")).is_err());
        assert!(read_points(write_tmp("blank.txt", "# nothing\n")).is_err());
    }

    #[test]
    fn circular_report_uses_configured_range() {
        let file = write_tmp("angles.txt", "350\n10\n0\n");
        let mut cfg = Config::default();
        cfg.circular.range = Some([0.0, 360.0]);
        let report = CircularReport::from_file(&file, &cfg).unwrap();
        assert_eq!(report.n_samples, 3);
        assert_eq!(report.median, 0.0);
        assert!(circular::distance_with_period(report.mean, 0.0, 360.0) < 1e-9);
        assert!((report.sample_range - 20.0).abs() < 1e-9);
    }

    #[test]
    fn geometric_report_dispatches_on_dimension() {
        let file = write_tmp("line.txt", "-3\n0\n0\n1\n2\n5\n10\n");
        let report = GeometricReport::from_file(&file, &Config::default()).unwrap();
        assert_eq!(report.dim, 1);
        assert!((report.median[0] - 1.0).abs() < 1e-6);
        assert_eq!(report.most_distant, [0, 6]);

        let file = write_tmp("cube.txt", "0 0 0\n1 0 0\n0 1 0\n0 0 1\n1 1 1\n");
        let report = GeometricReport::from_file(&file, &Config::default()).unwrap();
        assert_eq!(report.dim, 3);
        assert_eq!(report.median.len(), 3);

        let file = write_tmp("wide.txt", "0 0 0 0\n");
        assert!(GeometricReport::from_file(&file, &Config::default()).is_err());
    }
}
