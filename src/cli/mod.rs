//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `spectrum`: Lorentzian 拟合光谱（绘图/导出/差谱）
//! - `matrix`: 距离矩阵读取与比较
//! - `assign`: 振动峰原子归属
//! - `report`: Markdown 峰归属报告（单文件或批量）
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: spectrum, matrix, assign, report

pub mod assign;
pub mod matrix;
pub mod report;
pub mod spectrum;

use clap::{Parser, Subcommand};

/// gparse - Gaussian 振动计算输出分析工具
#[derive(Parser)]
#[command(name = "gparse")]
#[command(version)]
#[command(
    about = "Parse Gaussian vibrational output: spectra, distance matrices and peak assignments",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Fit a Lorentzian spectrum from a log or CSV file and plot or export it
    Spectrum(spectrum::SpectrumArgs),

    /// Read a distance matrix and compare it with another structure
    Matrix(matrix::MatrixArgs),

    /// Rank the atoms contributing to each vibrational peak
    Assign(assign::AssignArgs),

    /// Write a Markdown peak assignment report
    Report(report::ReportArgs),
}
