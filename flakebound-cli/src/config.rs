//! Configuration loading from flakebound.toml
//!
//! Flakebound configuration can be specified in a `flakebound.toml` file in the
//! project root. The configuration is automatically discovered by walking up
//! from the current directory. Command line flags override file values.

use anyhow::Context;
use flakebound_report::OutputFormat;
use flakebound_stats::{DEFAULT_ALPHA, DEFAULT_CURVE_SPAN, DEFAULT_MAX_RETESTS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up during discovery
pub const CONFIG_FILE_NAME: &str = "flakebound.toml";

/// Flakebound configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FlakeConfig {
    /// Analysis defaults
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Analysis defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Confidence complement (0.05 for 95% confidence)
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Trials assumed when `--trials` is not given
    #[serde(default = "default_trials")]
    pub trials: u64,
    /// Largest retest count worth reporting
    #[serde(default = "default_max_retests")]
    pub max_retests: u64,
    /// Curve length as a multiple of the required retest count
    #[serde(default = "default_curve_span")]
    pub curve_span: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            trials: default_trials(),
            max_retests: default_max_retests(),
            curve_span: default_curve_span(),
        }
    }
}

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}
fn default_trials() -> u64 {
    4
}
fn default_max_retests() -> u64 {
    DEFAULT_MAX_RETESTS
}
fn default_curve_span() -> u64 {
    DEFAULT_CURVE_SPAN
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human", "json", "csv"
    #[serde(default = "default_format")]
    pub format: String,
    /// Draw the text chart in human output
    #[serde(default = "default_show_chart")]
    pub show_chart: bool,
    /// Most curve points kept in the report
    #[serde(default = "default_max_curve_points")]
    pub max_curve_points: usize,
    /// Chart width in characters
    #[serde(default = "default_chart_width")]
    pub chart_width: usize,
    /// Chart height in rows
    #[serde(default = "default_chart_height")]
    pub chart_height: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            show_chart: default_show_chart(),
            max_curve_points: default_max_curve_points(),
            chart_width: default_chart_width(),
            chart_height: default_chart_height(),
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}
fn default_show_chart() -> bool {
    true
}
fn default_max_curve_points() -> usize {
    500
}
fn default_chart_width() -> usize {
    60
}
fn default_chart_height() -> usize {
    12
}

impl FlakeConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid configuration in {}", path.display()))?;
        Ok(config)
    }

    /// Discover and load configuration by walking up from the current directory
    pub fn discover() -> anyhow::Result<Option<(PathBuf, Self)>> {
        let dir = std::env::current_dir()?;
        Self::discover_from(&dir)
    }

    /// Discover and load configuration by walking up from `start`.
    ///
    /// A file that exists but fails to load is an error, not a miss.
    pub fn discover_from(start: &Path) -> anyhow::Result<Option<(PathBuf, Self)>> {
        let mut dir = start.to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                let config = Self::load(&config_path)?;
                return Ok(Some((config_path, config)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> anyhow::Result<()> {
        let alpha = self.analysis.alpha;
        if !(alpha.is_finite() && alpha > 0.0 && alpha < 1.0) {
            anyhow::bail!("analysis.alpha must be in (0, 1), got {}", alpha);
        }
        if self.analysis.max_retests == 0 {
            anyhow::bail!("analysis.max_retests must be at least 1");
        }
        if self.analysis.curve_span == 0 {
            anyhow::bail!("analysis.curve_span must be at least 1");
        }
        self.output
            .format
            .parse::<OutputFormat>()
            .map_err(|e| anyhow::anyhow!("output.format: {}", e))?;
        if self.output.max_curve_points < 2 {
            anyhow::bail!(
                "output.max_curve_points must be at least 2, got {}",
                self.output.max_curve_points
            );
        }
        if self.output.chart_width < 10 || self.output.chart_height < 4 {
            anyhow::bail!(
                "chart must be at least 10x4, got {}x{}",
                self.output.chart_width,
                self.output.chart_height
            );
        }
        Ok(())
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# Flakebound Configuration

[analysis]
# Confidence complement: 0.05 means 95% confidence
alpha = 0.05
# Runs assumed when --trials is not given
trials = 4
# Give up (ResultTooLarge) beyond this many retests
max_retests = 1000000000
# Curve extends to required_tests * curve_span
curve_span = 2

[output]
# Default output format: human, json, csv
format = "human"
# Draw the confidence curve in human output
show_chart = true
# Long curves are thinned to this many points
max_curve_points = 500
# Chart dimensions in characters
chart_width = 60
chart_height = 12
"#
        .to_string()
    }
}
