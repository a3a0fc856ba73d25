//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `models/`, `report/`, `utils/`
//! - 子模块: spectrum, matrix, assign, report

pub mod assign;
pub mod matrix;
pub mod report;
pub mod spectrum;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Spectrum(args) => spectrum::execute(args),
        Commands::Matrix(args) => matrix::execute(args),
        Commands::Assign(args) => assign::execute(args),
        Commands::Report(args) => report::execute(args),
    }
}
