//! # 数值工具
//!
//! 数字字符串判断、等间距采样、数值积分。
//!
//! ## 依赖关系
//! - 被 `models/`, `parsers/` 使用
//! - 无外部模块依赖

use crate::error::{GparseError, Result};

/// 判断字符串是否可解析为浮点数（支持科学计数法与前导零）
pub fn is_numeric(token: &str) -> bool {
    token.trim().parse::<f64>().is_ok()
}

/// 生成 `[start, end]` 闭区间上 `count` 个等间距点
pub fn evenly_spaced(start: f64, end: f64, count: usize) -> Result<Vec<f64>> {
    if start >= end {
        return Err(GparseError::InvalidRange(format!(
            "start ({}) must be less than end ({})",
            start, end
        )));
    }
    if count < 2 {
        return Err(GparseError::InvalidRange(format!(
            "at least two points are required, got {}",
            count
        )));
    }

    let step = (end - start) / (count - 1) as f64;
    Ok((0..count).map(|i| start + step * i as f64).collect())
}

/// 按顺序拼接嵌套序列
pub fn flatten<T: Clone>(nested: &[Vec<T>]) -> Vec<T> {
    nested.iter().flat_map(|row| row.iter().cloned()).collect()
}

/// 数值积分
///
/// 对 `i in 0..len-2` 累加 `(y[i] + y[i+1]) / 2 * (x[i+1] - x[i])`。
/// 最后一个区间不计入，与已有的积分结果保持一致。
pub fn integrate(xs: &[f64], ys: &[f64]) -> Result<f64> {
    if xs.len() != ys.len() {
        return Err(GparseError::InvalidArgument(format!(
            "x and y must have the same length ({} vs {})",
            xs.len(),
            ys.len()
        )));
    }

    let intervals = xs.len().saturating_sub(2);
    Ok((0..intervals)
        .map(|i| (ys[i] + ys[i + 1]) / 2.0 * (xs[i + 1] - xs[i]))
        .sum())
}
