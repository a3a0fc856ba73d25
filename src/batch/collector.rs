//! # 文件收集器
//!
//! 根据输入路径和模式收集待处理的 Gaussian 输出文件。
//!
//! ## 功能
//! - 支持单文件和目录输入
//! - glob 模式匹配（逗号分隔多个模式）
//! - 递归目录搜索
//!
//! ## 依赖关系
//! - 被 `commands/report.rs` 调用
//! - 使用 `walkdir` 遍历目录
//! - 使用 `glob::Pattern` 匹配文件名

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 默认匹配模式
pub const DEFAULT_LOG_PATTERN: &str = "*.log";

/// 文件收集器
pub struct FileCollector {
    /// 输入路径
    input: PathBuf,
    /// 匹配模式列表
    patterns: Vec<Pattern>,
    /// 是否递归
    recursive: bool,
}

impl FileCollector {
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            patterns: Self::compile(DEFAULT_LOG_PATTERN),
            recursive: false,
        }
    }

    /// 设置匹配模式（逗号分隔的多模式）
    ///
    /// 无法编译的模式会被忽略；全部无效时回退到 `*.log`。
    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.patterns = Self::compile(pattern);
        if self.patterns.is_empty() {
            log::warn!("no usable pattern in '{}', using {}", pattern, DEFAULT_LOG_PATTERN);
            self.patterns = Self::compile(DEFAULT_LOG_PATTERN);
        }
        self
    }

    /// 设置是否递归搜索
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    fn compile(pattern: &str) -> Vec<Pattern> {
        pattern
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| match Pattern::new(s) {
                Ok(p) => Some(p),
                Err(e) => {
                    log::warn!("ignoring invalid pattern '{}': {}", s, e);
                    None
                }
            })
            .collect()
    }

    /// 收集所有匹配的文件（按路径排序）
    pub fn collect(&self) -> Vec<PathBuf> {
        if self.input.is_file() {
            return vec![self.input.clone()];
        }

        if !self.input.is_dir() {
            return vec![];
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };

        let mut files: Vec<PathBuf> = WalkDir::new(&self.input)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|entry| self.matches_patterns(entry.path()))
            .map(|e| e.path().to_path_buf())
            .collect();

        files.sort();
        files
    }

    /// 检查文件名是否匹配任一模式
    fn matches_patterns(&self, path: &Path) -> bool {
        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => self.patterns.iter().any(|p| p.matches(name)),
            None => false,
        }
    }
}
