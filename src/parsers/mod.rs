//! # 解析器模块
//!
//! 提供 CSV 导出数据与 Gaussian .log 输出的解析器。
//!
//! ## 依赖关系
//! - 被 `commands/`, `report/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: matrix_csv, spectrum_csv, gaussian_log, normal_modes

pub mod gaussian_log;
pub mod matrix_csv;
pub mod normal_modes;
pub mod spectrum_csv;

pub use normal_modes::PeakAssigner;

use crate::error::{GparseError, Result};
use crate::models::{DistanceMatrix, DistanceUnit, Spectrum, SpectrumKind};
use std::fs;
use std::path::Path;

/// 整体读入文本文件
pub fn read_text_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(GparseError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    fs::read_to_string(path).map_err(|e| GparseError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default()
}

/// 从文件扩展名推断格式并解析光谱
pub fn load_spectrum(path: &Path, kind: SpectrumKind, width: f64) -> Result<Spectrum> {
    match extension_of(path).as_str() {
        "csv" => spectrum_csv::parse_spectrum_csv_file(path, width),
        "log" | "out" => gaussian_log::parse_spectrum_log(path, kind, width),
        _ => Err(GparseError::UnsupportedFormat(format!(
            "Cannot determine spectrum format for: {}",
            path.display()
        ))),
    }
}

/// 从文件扩展名推断格式并解析距离矩阵
///
/// log 文件中的距离矩阵总以 angstroms 为单位，`units` 只作用于 CSV。
pub fn load_distance_matrix(path: &Path, units: DistanceUnit) -> Result<DistanceMatrix> {
    match extension_of(path).as_str() {
        "csv" => matrix_csv::parse_matrix_csv_file(path, units),
        "log" | "out" => gaussian_log::parse_distance_matrix_log(path),
        _ => Err(GparseError::UnsupportedFormat(format!(
            "Cannot determine distance matrix format for: {}",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let log = dir.path().join("run.log");
        fs::write(&log, gaussian_log::tests::SPECTRUM_LOG).unwrap();
        let s = load_spectrum(&log, SpectrumKind::Raman, 3.3).unwrap();
        assert_eq!(s.len(), 4);

        let csv = dir.path().join("run.csv");
        fs::write(&csv, "100,1\n200,2\n").unwrap();
        assert_eq!(load_spectrum(&csv, SpectrumKind::Raman, 3.3).unwrap().len(), 2);

        let matrix_log = dir.path().join("matrix.log");
        fs::write(&matrix_log, gaussian_log::tests::DISTANCE_LOG).unwrap();
        let m = load_distance_matrix(&matrix_log, DistanceUnit::Nm).unwrap();
        assert_eq!(m.len(), 7);
        assert_eq!(m.units, DistanceUnit::Angstroms);

        let other = dir.path().join("run.xyz");
        fs::write(&other, "").unwrap();
        assert!(matches!(
            load_spectrum(&other, SpectrumKind::Raman, 3.3),
            Err(GparseError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = read_text_file(Path::new("/nonexistent/gparse/file.log"));
        assert!(matches!(result, Err(GparseError::FileNotFound { .. })));
    }
}
