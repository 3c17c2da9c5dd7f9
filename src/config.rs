use anyhow::{Context, Result, bail};
use circstat::{GeometricMedianOptions, Interval, UnwrapOptions};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

/// Analysis configuration parameters.
///
/// Loaded from a TOML file and validated before use.
/// See [`Config::from_file`] for loading.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Circular statistics parameters.
    pub circular: CircularConfig,
    /// Geometric median parameters.
    pub geometric: GeometricMedianOptions,
    /// Unwrapping parameters.
    pub unwrap: UnwrapOptions,
}

#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CircularConfig {
    /// Interval `[lo, hi]` the samples live on (`[-π, π]` if absent).
    pub range: Option<[f64; 2]>,
}

impl CircularConfig {
    pub fn interval(&self) -> Result<Option<Interval>> {
        self.range
            .map(|[lo, hi]| Interval::new(lo, hi).context("failed to construct interval"))
            .transpose()
    }
}

impl Config {
    /// Load a [`Config`] from a file.
    ///
    /// The file must be TOML-encoded; missing sections and keys take their
    /// default values. Performs validation on all parameters before returning.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some([lo, hi]) = self.circular.range {
            check_num(lo, f64::MIN..f64::MAX).context("invalid lower range bound")?;
            check_num(hi, lo..f64::MAX).context("invalid upper range bound")?;
            if hi == lo {
                bail!("range must have a positive width");
            }
        }

        check_num(self.geometric.max_iter, 1..=10_000_000)
            .context("invalid maximum number of iterations")?;
        check_num(self.geometric.atol, f64::MIN_POSITIVE..1.0)
            .context("invalid absolute tolerance")?;

        check_num(self.unwrap.period, f64::MIN_POSITIVE..f64::MAX)
            .context("invalid unwrapping period")?;
        if let Some(tol) = self.unwrap.tol {
            check_num(tol, f64::MIN_POSITIVE..f64::MAX).context("invalid unwrapping tolerance")?;
        }

        Ok(())
    }
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}
