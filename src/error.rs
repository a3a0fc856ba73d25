//! # 统一错误处理模块
//!
//! 定义 gparse 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// gparse 统一错误类型
#[derive(Error, Debug)]
pub enum GparseError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    // ─────────────────────────────────────────────────────────────
    // 解析器状态错误（normal coordinates 块）
    // ─────────────────────────────────────────────────────────────
    #[error("Marker '{marker}' not found in {path}")]
    MarkerNotFound { marker: String, path: String },

    #[error("Unexpected end of file in {path} while reading {context}")]
    UnexpectedEof { path: String, context: String },

    // ─────────────────────────────────────────────────────────────
    // 参数 / 校验错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Unsupported distance unit '{unit}' (expected one of: a, angstroms, nm, nanometers)")]
    UnsupportedUnit { unit: String },

    // ─────────────────────────────────────────────────────────────
    // 形状错误
    // ─────────────────────────────────────────────────────────────
    #[error("Matrices have incompatible dimensions: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Matrices to compare must have the same units: {left} vs {right}")]
    UnitMismatch { left: String, right: String },

    #[error("No values to average: {0}")]
    EmptySelection(String),

    // ─────────────────────────────────────────────────────────────
    // CSV / 绘图错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Plotting failed: {0}")]
    PlotError(String),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, GparseError>;
