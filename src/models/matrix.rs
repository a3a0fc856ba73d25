//! # 原子间距离矩阵
//!
//! 下三角（含对角线）参差矩阵，`matrix[i][j]` 为原子 i 到原子 j 的距离。
//!
//! ## 依赖关系
//! - 被 `parsers/matrix_csv.rs`, `parsers/gaussian_log.rs` 构造
//! - 被 `commands/matrix.rs` 使用
//! - 使用 `utils/numeric.rs`

use crate::error::{GparseError, Result};
use crate::utils::numeric;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// 距离单位
///
/// 每个单位有长短两种写法，比较时只看单位族（首字母）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistanceUnit {
    A,
    #[default]
    Angstroms,
    Nm,
    Nanometers,
}

impl DistanceUnit {
    /// 单位族标识（`a` 或 `n`）
    pub fn family(self) -> char {
        match self {
            DistanceUnit::A | DistanceUnit::Angstroms => 'a',
            DistanceUnit::Nm | DistanceUnit::Nanometers => 'n',
        }
    }

    pub fn same_family(self, other: DistanceUnit) -> bool {
        self.family() == other.family()
    }
}

impl FromStr for DistanceUnit {
    type Err = GparseError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "a" => Ok(DistanceUnit::A),
            "angstroms" => Ok(DistanceUnit::Angstroms),
            "nm" => Ok(DistanceUnit::Nm),
            "nanometers" => Ok(DistanceUnit::Nanometers),
            other => Err(GparseError::UnsupportedUnit {
                unit: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceUnit::A => write!(f, "a"),
            DistanceUnit::Angstroms => write!(f, "angstroms"),
            DistanceUnit::Nm => write!(f, "nm"),
            DistanceUnit::Nanometers => write!(f, "nanometers"),
        }
    }
}

/// 分子距离矩阵
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DistanceMatrix {
    rows: Vec<Vec<f64>>,
    pub units: DistanceUnit,
}

impl DistanceMatrix {
    pub fn new(rows: Vec<Vec<f64>>, units: DistanceUnit) -> Self {
        DistanceMatrix { rows, units }
    }

    /// 以默认单位（angstroms）创建
    pub fn with_default_units(rows: Vec<Vec<f64>>) -> Self {
        Self::new(rows, DistanceUnit::default())
    }

    /// 矩阵长度 = 最长行的长度
    pub fn len(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// 按行展开为一维序列
    pub fn flattened(&self) -> Vec<f64> {
        numeric::flatten(&self.rows)
    }

    /// 每个元素加上 `delta`
    pub fn shift(&self, delta: f64) -> DistanceMatrix {
        let rows = self
            .rows
            .iter()
            .map(|row| row.iter().map(|d| d + delta).collect())
            .collect();
        DistanceMatrix::new(rows, self.units)
    }

    /// 逐元素相减
    ///
    /// 形状不一致时按较短的行/列截断，不做额外校验。
    pub fn difference(&self, other: &DistanceMatrix) -> DistanceMatrix {
        let rows = self
            .rows
            .iter()
            .zip(&other.rows)
            .map(|(a, b)| a.iter().zip(b).map(|(x, y)| x - y).collect())
            .collect();
        DistanceMatrix::new(rows, self.units)
    }

    /// 与另一矩阵的均方根偏差
    ///
    /// 给定 `distance_threshold` 时只统计 `|a - b| < threshold` 的元素。
    /// 单位必须完全一致（`a` 与 `angstroms` 视为不同单位），
    /// 这比 `==` 只比较单位族更严格。
    pub fn rms_deviation(
        &self,
        other: &DistanceMatrix,
        distance_threshold: Option<f64>,
    ) -> Result<f64> {
        if self.len() != other.len() {
            return Err(GparseError::DimensionMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        if self.units != other.units {
            return Err(GparseError::UnitMismatch {
                left: self.units.to_string(),
                right: other.units.to_string(),
            });
        }

        let squared: Vec<f64> = self
            .flattened()
            .into_iter()
            .zip(other.flattened())
            .map(|(a, b)| a - b)
            .filter(|d| distance_threshold.map_or(true, |t| d.abs() < t))
            .map(|d| d * d)
            .collect();

        if squared.is_empty() {
            return Err(GparseError::EmptySelection(match distance_threshold {
                Some(t) => format!("no matrix entries differ by less than {}", t),
                None => "matrices contain no entries".to_string(),
            }));
        }

        Ok((squared.iter().sum::<f64>() / squared.len() as f64).sqrt())
    }

    /// 序列化为下三角 CSV 文本（`from_csv` 的逆过程）
    pub fn to_csv_string(&self) -> Result<String> {
        let mut wtr = csv::WriterBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_writer(Vec::new());

        for row in &self.rows {
            wtr.write_record(row.iter().map(|d| d.to_string()))?;
        }

        let bytes = wtr
            .into_inner()
            .map_err(|e| GparseError::Other(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| GparseError::Other(e.to_string()))
    }
}

impl PartialEq for DistanceMatrix {
    fn eq(&self, other: &Self) -> bool {
        if !self.units.same_family(other.units) {
            return false;
        }
        self.rows
            .iter()
            .zip(&other.rows)
            .all(|(a, b)| a.iter().zip(b).all(|(x, y)| x == y))
    }
}

impl Index<usize> for DistanceMatrix {
    type Output = Vec<f64>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.rows[index]
    }
}

impl IndexMut<usize> for DistanceMatrix {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.rows[index]
    }
}

impl fmt::Display for DistanceMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangular_number(n: usize) -> usize {
        n * (n + 1) / 2
    }

    /// 5 原子下三角矩阵
    fn sample_matrix() -> DistanceMatrix {
        DistanceMatrix::with_default_units(vec![
            vec![0.0],
            vec![1.4, 0.0],
            vec![2.4, 1.4, 0.0],
            vec![2.8, 2.4, 1.4, 0.0],
            vec![1.1, 2.1, 3.4, 3.9, 0.0],
        ])
    }

    #[test]
    fn test_len() {
        assert_eq!(DistanceMatrix::default().len(), 0);
        assert!(DistanceMatrix::default().is_empty());
        let m = DistanceMatrix::with_default_units(vec![
            vec![1.0, 2.0],
            vec![1.0, 2.0, 3.0],
            vec![1.0, 2.0, 3.0, 4.0],
        ]);
        assert_eq!(m.len(), 4);
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!("a".parse::<DistanceUnit>().unwrap(), DistanceUnit::A);
        assert_eq!(
            "nanometers".parse::<DistanceUnit>().unwrap(),
            DistanceUnit::Nanometers
        );
        assert!(matches!(
            "bohr".parse::<DistanceUnit>(),
            Err(GparseError::UnsupportedUnit { .. })
        ));
        assert!(DistanceUnit::A.same_family(DistanceUnit::Angstroms));
        assert!(!DistanceUnit::Nm.same_family(DistanceUnit::Angstroms));
    }

    #[test]
    fn test_eq() {
        let m = sample_matrix();
        assert_eq!(m, m.clone());
        assert_ne!(m, m.shift(1.0));

        let mut short_units = m.clone();
        short_units.units = DistanceUnit::A;
        assert_eq!(m, short_units);

        let mut nm = m.clone();
        nm.units = DistanceUnit::Nm;
        assert_ne!(m, nm);
    }

    #[test]
    fn test_shift() {
        let m = DistanceMatrix::with_default_units(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let expected = DistanceMatrix::with_default_units(vec![vec![2.0, 3.0], vec![4.0, 5.0]]);
        assert_eq!(m.shift(1.0), expected);
        assert_eq!(m.shift(1.0).units, m.units);
    }

    #[test]
    fn test_difference_with_self_is_zero() {
        let m = sample_matrix();
        let diff = m.difference(&m);
        assert_eq!(diff.len(), m.len());
        for (row, original) in diff.rows().iter().zip(m.rows()) {
            assert_eq!(row.len(), original.len());
            assert!(row.iter().all(|d| *d == 0.0));
        }
    }

    #[test]
    fn test_flattened() {
        let m = sample_matrix();
        let flat = m.flattened();

        let total: usize = m.rows().iter().map(Vec::len).sum();
        assert_eq!(flat.len(), total);

        for i in 0..m.rows().len() {
            for j in 0..=i {
                assert_eq!(m[i][j], flat[triangular_number(i) + j]);
            }
        }
    }

    #[test]
    fn test_rms_deviation_shift() {
        let m = DistanceMatrix::with_default_units(vec![
            vec![0.0],
            vec![1.0, 0.0],
            vec![2.0, 1.0, 0.0],
        ]);
        for k in 1..10 {
            let shifted = m.shift(k as f64);
            assert_eq!(m.rms_deviation(&shifted, None).unwrap(), k as f64);
        }
    }

    #[test]
    fn test_rms_deviation_single_change_and_threshold() {
        let m = sample_matrix();
        let mut changed = m.clone();
        changed[4][2] = 1000.0;

        let full = m.rms_deviation(&changed, None).unwrap();
        assert!(full > 0.0);

        // 低通阈值排除大偏差元素
        let filtered = m.rms_deviation(&changed, Some(5.0)).unwrap();
        assert_ne!(full, filtered);
        assert_eq!(filtered, 0.0);
    }

    #[test]
    fn test_rms_deviation_errors() {
        let m = sample_matrix();
        let small = DistanceMatrix::with_default_units(vec![vec![0.0]]);
        assert!(matches!(
            m.rms_deviation(&small, None),
            Err(GparseError::DimensionMismatch { .. })
        ));

        let mut nm = m.clone();
        nm.units = DistanceUnit::Nanometers;
        assert!(matches!(
            m.rms_deviation(&nm, None),
            Err(GparseError::UnitMismatch { .. })
        ));

        let mut short_units = m.clone();
        short_units.units = DistanceUnit::A;
        assert_eq!(m, short_units);
        assert!(matches!(
            m.rms_deviation(&short_units, None),
            Err(GparseError::UnitMismatch { .. })
        ));

        let a = DistanceMatrix::new(vec![vec![0.0], vec![1.0, 0.0]], DistanceUnit::A);
        let angstroms = DistanceMatrix::new(vec![vec![0.0], vec![1.5, 0.0]], DistanceUnit::Angstroms);
        assert!(matches!(
            a.rms_deviation(&angstroms, None),
            Err(GparseError::UnitMismatch { .. })
        ));

        let shifted = m.shift(10.0);
        assert!(matches!(
            m.rms_deviation(&shifted, Some(1.0)),
            Err(GparseError::EmptySelection(_))
        ));
    }

    #[test]
    fn test_to_csv_string() {
        let m = DistanceMatrix::with_default_units(vec![vec![1.0], vec![2.0, 3.5]]);
        assert_eq!(m.to_csv_string().unwrap(), "1\n2,3.5\n");
    }
}
