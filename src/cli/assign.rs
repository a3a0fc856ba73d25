//! # assign 子命令 CLI 定义
//!
//! 按原子贡献为每个振动峰排序。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/assign.rs`

use clap::Args;
use std::path::PathBuf;

/// assign 子命令参数
#[derive(Args, Debug)]
pub struct AssignArgs {
    /// Gaussian frequency calculation output (.log/.out)
    pub log_file: PathBuf,

    /// Exclude hydrogen atoms from the ranking
    #[arg(long, default_value_t = false)]
    pub heavy_only: bool,

    /// Number of atoms to show per peak (0 = all)
    #[arg(short, long, default_value_t = 5)]
    pub top: usize,

    /// Only show peaks with Raman activity at or above this value
    #[arg(long)]
    pub min_activity: Option<f64>,

    /// Export all assignments to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}
