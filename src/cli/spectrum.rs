//! # spectrum 子命令 CLI 定义
//!
//! 从 log 或 CSV 读取振动光谱，输出拟合曲线图或数据。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/spectrum.rs`

use crate::models::{Spectrum, SpectrumKind};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 光谱输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SpectrumOutputFormat {
    /// PNG image
    Png,
    /// SVG vector image
    Svg,
    /// CSV data file (frequency, intensity)
    Csv,
    /// Tab separated XY data file
    Xy,
}

/// 解析光谱类型（r/raman, ir/infrared）
pub fn parse_kind(input: &str) -> Result<SpectrumKind, String> {
    input.parse::<SpectrumKind>().map_err(|e| e.to_string())
}

/// spectrum 子命令参数
#[derive(Args, Debug)]
pub struct SpectrumArgs {
    /// Input: Gaussian .log/.out file or two-column CSV (frequency, intensity)
    pub input: PathBuf,

    /// Intensity source for log files: raman (r) or infrared (ir)
    #[arg(short, long, default_value = "raman", value_parser = parse_kind)]
    pub kind: SpectrumKind,

    /// Lorentzian half width at half maximum (1/cm)
    #[arg(short, long, env = "GPARSE_LORENTZIAN_WIDTH", default_value_t = Spectrum::DEFAULT_WIDTH)]
    pub width: f64,

    /// Number of sample points for the fitted curve
    #[arg(short, long, env = "GPARSE_POINTS", default_value_t = Spectrum::DEFAULT_POINTS)]
    pub points: usize,

    /// Lower frequency bound (default: lowest peak)
    #[arg(long, allow_hyphen_values = true)]
    pub min: Option<f64>,

    /// Upper frequency bound (default: highest peak)
    #[arg(long, allow_hyphen_values = true)]
    pub max: Option<f64>,

    /// Output file (plot or data)
    #[arg(short, long, default_value = "spectrum.png")]
    pub output: PathBuf,

    /// Output format (auto-detected from extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<SpectrumOutputFormat>,

    /// Subtract a second spectrum and output the difference curve
    #[arg(long)]
    pub subtract: Option<PathBuf>,

    /// Average the input with further spectra and output the mean curve
    #[arg(long, num_args = 1.., conflicts_with = "subtract")]
    pub average: Vec<PathBuf>,

    /// Draw stick lines at the discrete peak positions
    #[arg(long, default_value_t = false)]
    pub sticks: bool,

    /// Title for the plot (default: input file name)
    #[arg(long)]
    pub title: Option<String>,
}
