//! # 工具函数模块
//!
//! 提供数值工具、美化输出与进度条。
//!
//! ## 依赖关系
//! - 被 `commands/`, `parsers/`, `models/` 模块使用
//! - 子模块: numeric, output, progress

pub mod numeric;
pub mod output;
pub mod progress;
