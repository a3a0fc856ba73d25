//! # Gaussian .log 解析器
//!
//! 从 Gaussian 频率计算输出中提取距离矩阵与振动光谱。
//!
//! ## 距离矩阵格式说明
//! ```text
//!                     1          2          3          4          5
//!      1  C    0.000000
//!      2  C    1.395160   0.000000
//!      ...
//!      6  C    1.395160   2.416002   2.789512   2.416002   1.395160
//!                     6
//!      6  C    0.000000
//!  Stoichiometry    C6H6
//! ```
//! 每个列带最多 5 列；行首原子序号回落时进入下一个列带（列偏移 +5），
//! 序号为 2 的行表示新矩阵开始，列偏移归零。矩阵以含 "stoich" 的行结束。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs`, `commands/`, `report/markdown.rs` 使用
//! - 使用 `models/matrix.rs`, `models/spectrum.rs`
//! - 使用 `regex` 识别矩阵行

use crate::error::{GparseError, Result};
use crate::models::{DistanceMatrix, Spectrum, SpectrumKind};
use crate::parsers::read_text_file;
use crate::utils::numeric::{flatten, is_numeric};

use regex::Regex;
use std::path::Path;

/// 距离矩阵数据行
const MATRIX_ROW_PATTERN: &str = r"^\s*\d+\s*[A-Z]\s*(\d+\.\d+\s*)+$";

/// 每个列带的最大列数
const BAND_WIDTH: usize = 5;

/// 解析 log 文件中的距离矩阵
pub fn parse_distance_matrix_log(path: &Path) -> Result<DistanceMatrix> {
    let content = read_text_file(path)?;
    parse_distance_matrix_content(&content, &path.display().to_string())
}

/// 从 log 文本解析距离矩阵
pub fn parse_distance_matrix_content(content: &str, source_name: &str) -> Result<DistanceMatrix> {
    let row_re = Regex::new(MATRIX_ROW_PATTERN).map_err(|e| GparseError::Other(e.to_string()))?;

    let mut split_lines: Vec<Vec<&str>> = Vec::new();
    for line in content.lines() {
        let stripped = line.trim();
        if row_re.is_match(stripped) {
            split_lines.push(stripped.split_whitespace().collect());
        }
        if line.to_lowercase().contains("stoich") {
            break;
        }
    }

    if split_lines.is_empty() {
        return Err(matrix_error(source_name, "no distance matrix rows found".to_string()));
    }

    let mut atom_rows = Vec::with_capacity(split_lines.len());
    for fields in &split_lines {
        let number: usize = fields[0]
            .parse()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| matrix_error(source_name, format!("invalid atom number '{}'", fields[0])))?;
        atom_rows.push(number - 1);
    }

    let number_atoms = atom_rows.iter().max().map_or(0, |m| m + 1);
    let mut cells: Vec<Vec<Option<f64>>> = vec![vec![None; number_atoms]; number_atoms];

    let mut previous_row = 0;
    let mut column_offset = 0;
    for (fields, &row) in split_lines.iter().zip(&atom_rows) {
        if row < previous_row {
            column_offset += BAND_WIDTH;
        }
        if row == 1 {
            column_offset = 0;
        }

        for (column, token) in fields.iter().skip(2).enumerate() {
            let target = column + column_offset;
            let value: f64 = token
                .parse()
                .map_err(|_| matrix_error(source_name, format!("invalid distance '{}'", token)))?;
            let cell = cells
                .get_mut(row)
                .and_then(|r| r.get_mut(target))
                .ok_or_else(|| {
                    matrix_error(
                        source_name,
                        format!("column {} out of range for atom {}", target + 1, row + 1),
                    )
                })?;
            *cell = Some(value);
        }

        previous_row = row;
    }

    log::debug!(
        "{}: {} distance matrix lines for {} atoms",
        source_name,
        split_lines.len(),
        number_atoms
    );

    let rows = cells
        .into_iter()
        .map(|row| row.into_iter().flatten().collect())
        .collect();

    Ok(DistanceMatrix::with_default_units(rows))
}

/// 解析 log 文件中的振动光谱
pub fn parse_spectrum_log(path: &Path, kind: SpectrumKind, width: f64) -> Result<Spectrum> {
    let content = read_text_file(path)?;
    parse_spectrum_content(&content, kind, width)
}

/// 从 log 文本解析振动光谱
///
/// 频率取自所有含 "Frequencies" 的行，强度按 `kind` 取自
/// "Raman Activ" 或 "IR Inten" 行。
pub fn parse_spectrum_content(content: &str, kind: SpectrumKind, width: f64) -> Result<Spectrum> {
    let marker = kind.intensity_marker();

    let frequencies: Vec<Vec<f64>> = content
        .lines()
        .filter(|line| line.contains("Frequencies"))
        .map(numeric_tokens)
        .collect();
    let intensities: Vec<Vec<f64>> = content
        .lines()
        .filter(|line| line.contains(marker))
        .map(numeric_tokens)
        .collect();

    log::debug!(
        "{} frequency lines, {} '{}' lines",
        frequencies.len(),
        intensities.len(),
        marker
    );

    Spectrum::new(flatten(&frequencies), flatten(&intensities), width)
}

/// 提取一行中所有数值字段
fn numeric_tokens(line: &str) -> Vec<f64> {
    line.split_whitespace()
        .filter(|t| is_numeric(t))
        .filter_map(|t| t.parse().ok())
        .collect()
}

fn matrix_error(source_name: &str, reason: String) -> GparseError {
    GparseError::ParseError {
        format: "Gaussian log distance matrix".to_string(),
        path: source_name.to_string(),
        reason,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::DistanceUnit;
    use crate::parsers::matrix_csv::parse_matrix_csv_content;

    pub(crate) const DISTANCE_LOG: &str = r#"
 Symbolic Z-matrix:
 Charge = -1 Multiplicity = 1
                          Distance matrix (angstroms):
                    1          2          3          4          5
     1  C    0.000000
     2  C    1.395160   0.000000
     3  C    2.416002   1.395160   0.000000
     4  C    2.789512   2.416002   1.395160   0.000000
     5  C    2.416002   2.789512   2.416002   1.395160   0.000000
     6  C    1.395160   2.416002   2.789512   2.416002   1.395160
     7  H    2.153000   3.405000   3.874000   3.405000   2.153000
                    6          7
     6  C    0.000000
     7  H    1.089000   0.000000
 Stoichiometry    C6H(1-)
     1  C    9.999999
"#;

    pub(crate) const SPECTRUM_LOG: &str = r#"
 and normal coordinates:
                      1                      2                      3
                      A                      A                      A
 Frequencies --    400.1000               600.2000               800.3000
 Red. masses --      2.1000                 2.2000                 2.3000
 Frc consts  --      0.2000                 0.4000                 0.6000
 IR Inten    --      1.5000                 0.0000                12.2500
 Raman Activ --      5.0000                 7.5000                 0.2500
 Depolar (P) --      0.7500                 0.7500                 0.1200
 Depolar (U) --      0.8571                 0.8571                 0.2100
                      4
                      A
 Frequencies --   1000.4000
 Red. masses --      1.1000
 Frc consts  --      0.9000
 IR Inten    --     30.0000
 Raman Activ --     90.0000
 Depolar (P) --      0.2000
 Depolar (U) --      0.3000
"#;

    #[test]
    fn test_distance_matrix_banding() {
        let m = parse_distance_matrix_content(DISTANCE_LOG, "test.log").unwrap();
        assert_eq!(m.len(), 7);
        assert_eq!(m.rows().len(), 7);
        assert_eq!(m[0], vec![0.0]);
        assert_eq!(
            m[5],
            vec![1.395160, 2.416002, 2.789512, 2.416002, 1.395160, 0.0]
        );
        assert_eq!(
            m[6],
            vec![2.153, 3.405, 3.874, 3.405, 2.153, 1.089, 0.0]
        );
        // 对角线为 0，其余非零
        for row in m.rows() {
            assert_eq!(*row.last().unwrap(), 0.0);
            assert!(row[..row.len() - 1].iter().all(|d| *d != 0.0));
        }
        assert_eq!(m.units, DistanceUnit::Angstroms);
    }

    #[test]
    fn test_distance_matrix_matches_csv() {
        let csv = "0.0\n1.395160,0.0\n2.416002,1.395160,0.0\n2.789512,2.416002,1.395160,0.0\n\
                   2.416002,2.789512,2.416002,1.395160,0.0\n\
                   1.395160,2.416002,2.789512,2.416002,1.395160,0.0\n\
                   2.153,3.405,3.874,3.405,2.153,1.089,0.0\n";
        let from_csv = parse_matrix_csv_content(csv, DistanceUnit::Angstroms).unwrap();
        let from_log = parse_distance_matrix_content(DISTANCE_LOG, "test.log").unwrap();
        assert_eq!(from_log, from_csv);
    }

    #[test]
    fn test_distance_matrix_missing() {
        let result = parse_distance_matrix_content(SPECTRUM_LOG, "empty.log");
        assert!(matches!(result, Err(GparseError::ParseError { .. })));
    }

    #[test]
    fn test_spectrum_from_log_kinds() {
        let raman = parse_spectrum_content(SPECTRUM_LOG, SpectrumKind::Raman, 3.3).unwrap();
        let ir = parse_spectrum_content(SPECTRUM_LOG, SpectrumKind::Infrared, 3.3).unwrap();

        assert_eq!(raman.frequencies(), &[400.1, 600.2, 800.3, 1000.4]);
        assert_eq!(raman.intensities(), &[5.0, 7.5, 0.25, 90.0]);
        assert_eq!(ir.frequencies(), raman.frequencies());
        assert_eq!(ir.intensities(), &[1.5, 0.0, 12.25, 30.0]);
        assert_ne!(raman, ir);
    }

    #[test]
    fn test_spectrum_from_log_without_data() {
        let result = parse_spectrum_content("nothing here\n", SpectrumKind::Raman, 3.3);
        assert!(matches!(result, Err(GparseError::InvalidArgument(_))));
    }
}
