//! # gparse - Gaussian 振动计算输出分析工具
//!
//! 解析 Gaussian 频率计算的 .log 输出及其 CSV 导出数据。
//!
//! ## 子命令
//! - `spectrum` - Lorentzian 拟合光谱（绘图/导出/差谱/平均）
//! - `matrix`   - 距离矩阵读取与 RMS 比较
//! - `assign`   - 振动峰原子归属
//! - `report`   - Markdown 峰归属报告（单文件或批量）
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (CSV 与 log 解析器)
//!   │     ├── report/    (绘图、导出、Markdown 报告)
//!   │     ├── batch/     (批量并行处理)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (数值工具与输出)
//!   └── error.rs    (错误处理)
//! ```
//!
//! 日志级别由 `RUST_LOG` 控制（如 `RUST_LOG=gparse=debug`）。

mod batch;
mod cli;
mod commands;
mod error;
mod models;
mod parsers;
mod report;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        log::debug!("command failed: {:?}", e);
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
