//! # 数据导出
//!
//! 导出拟合曲线、距离矩阵与峰归属表。
//!
//! ## 支持格式
//! - CSV: 曲线 (frequency, intensity)，归属表（每个参与原子一行）
//! - XY: 制表符分隔的 (frequency, intensity)，带注释头
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `models/` 数据结构
//! - 使用 `csv` 库写入 CSV 文件

use crate::error::{GparseError, Result};
use crate::models::{DistanceMatrix, ElementTable, SpectralPeak};

use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// 归属表中的一行
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentRow {
    pub peak: u32,
    pub frequency: f64,
    pub raman_activity: f64,
    pub ir_intensity: f64,
    pub rank: usize,
    pub atom: u32,
    pub element: String,
    pub eigen_sum: f64,
}

/// 展开所有峰的原子归属
pub fn assignment_rows(
    peaks: &[SpectralPeak],
    heavy_only: bool,
    elements: &ElementTable,
) -> Vec<AssignmentRow> {
    peaks
        .iter()
        .flat_map(|peak| {
            peak.assign(heavy_only)
                .into_iter()
                .enumerate()
                .map(move |(i, atom)| AssignmentRow {
                    peak: peak.number,
                    frequency: peak.frequency,
                    raman_activity: peak.raman_activity,
                    ir_intensity: peak.ir_intensity,
                    rank: i + 1,
                    atom: atom.number,
                    element: atom.element_name(elements),
                    eigen_sum: atom.eigen_sum,
                })
        })
        .collect()
}

/// 导出归属表为 CSV
pub fn assignments_to_csv(rows: &[AssignmentRow], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush().map_err(|e| GparseError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;
    Ok(())
}

/// 导出曲线为 CSV
pub fn curve_to_csv(xs: &[f64], ys: &[f64], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(["frequency", "intensity"])?;
    for (x, y) in xs.iter().zip(ys) {
        wtr.write_record(&[format!("{:.4}", x), format!("{:.6}", y)])?;
    }

    wtr.flush().map_err(|e| GparseError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 导出曲线为 XY 格式
pub fn curve_to_xy(xs: &[f64], ys: &[f64], title: &str, output_path: &Path) -> Result<()> {
    let write_err = |e: std::io::Error| GparseError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    };

    let file = File::create(output_path).map_err(write_err)?;
    let mut out = BufWriter::new(file);

    writeln!(out, "# Spectrum: {}", title).map_err(write_err)?;
    writeln!(out, "# Columns: frequency (1/cm), intensity").map_err(write_err)?;
    writeln!(out, "#").map_err(write_err)?;
    for (x, y) in xs.iter().zip(ys) {
        writeln!(out, "{:.4}\t{:.6}", x, y).map_err(write_err)?;
    }
    out.flush().map_err(write_err)?;

    Ok(())
}

/// 导出距离矩阵为下三角 CSV
pub fn matrix_to_csv(matrix: &DistanceMatrix, output_path: &Path) -> Result<()> {
    let text = matrix.to_csv_string()?;
    fs::write(output_path, text).map_err(|e| GparseError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })
}
