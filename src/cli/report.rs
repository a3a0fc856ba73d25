//! # report 子命令 CLI 定义
//!
//! 生成 Markdown 峰归属报告，支持单文件与目录批量模式。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/report.rs`

use crate::models::Spectrum;
use clap::Args;
use std::path::PathBuf;

/// report 子命令参数
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Input: Gaussian log file or directory containing log files
    pub input: PathBuf,

    /// Output directory (batch mode: one sub-directory per log file)
    #[arg(short, long, default_value = "peak_report")]
    pub output: PathBuf,

    /// Generate a PNG plot for every peak
    #[arg(long, default_value_t = false)]
    pub plots: bool,

    /// Exclude hydrogen atoms from the assignment tables
    #[arg(long, default_value_t = false)]
    pub heavy_only: bool,

    /// Lorentzian half width at half maximum (1/cm)
    #[arg(short, long, env = "GPARSE_LORENTZIAN_WIDTH", default_value_t = Spectrum::DEFAULT_WIDTH)]
    pub width: f64,

    /// Number of sample points per peak plot
    #[arg(long, env = "GPARSE_POINTS", default_value_t = Spectrum::DEFAULT_POINTS)]
    pub points: usize,

    // ─────────────────────────────────────────────────────────────
    // 批量处理参数
    // ─────────────────────────────────────────────────────────────
    /// Glob pattern for input files (batch mode, e.g., "*.log,*.out")
    #[arg(long, default_value = "*.log")]
    pub pattern: String,

    /// Recurse into subdirectories (batch mode)
    #[arg(long, default_value_t = false)]
    pub recursive: bool,

    /// Number of parallel jobs (0 = auto, batch mode only)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Overwrite existing reports
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}
