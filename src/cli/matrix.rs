//! # matrix 子命令 CLI 定义
//!
//! 读取距离矩阵并与另一结构比较。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/matrix.rs`

use crate::models::DistanceUnit;
use clap::Args;
use std::path::PathBuf;

/// 解析距离单位（a, angstroms, nm, nanometers）
pub fn parse_unit(input: &str) -> Result<DistanceUnit, String> {
    input.parse::<DistanceUnit>().map_err(|e| e.to_string())
}

/// matrix 子命令参数
#[derive(Args, Debug)]
pub struct MatrixArgs {
    /// Input: Gaussian .log/.out file or lower-triangular CSV
    pub input: PathBuf,

    /// Second matrix to compare against
    #[arg(short, long)]
    pub against: Option<PathBuf>,

    /// Only include entries differing by less than this value in the RMS deviation
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Units of CSV inputs (log files are always angstroms)
    #[arg(short, long, default_value = "angstroms", value_parser = parse_unit)]
    pub units: DistanceUnit,

    /// Write the element-wise difference matrix to this CSV file
    #[arg(long, requires = "against")]
    pub diff_output: Option<PathBuf>,

    /// Write the parsed matrix to this CSV file
    #[arg(long)]
    pub export: Option<PathBuf>,
}
