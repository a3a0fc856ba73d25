//! # 报告与导出模块
//!
//! 提供光谱绘图、数据导出与 Markdown 峰归属报告。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/`, `parsers/`
//! - 子模块: plot, export, markdown

pub mod export;
pub mod markdown;
pub mod plot;

pub use markdown::PeakReporter;
