//! # 距离矩阵 CSV 解析器
//!
//! ## 格式说明
//! ```text
//! 0.0
//! 1.39,0.0
//! 2.41,1.39,0.0
//! ```
//! 第 k 行（从 0 计）恰有 k+1 个数值字段，行末单个空字段会被忽略。
//! 数据行之间或之前不允许空行，文件末尾的空行会被忽略。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs`, `commands/matrix.rs` 使用
//! - 使用 `models/matrix.rs`, `utils/numeric.rs`
//! - 使用 `csv` 库读取参差行

use crate::error::{GparseError, Result};
use crate::models::{DistanceMatrix, DistanceUnit};
use crate::utils::numeric::is_numeric;

use std::fs::File;
use std::io::Read;
use std::path::Path;

/// 从 .csv 文件解析距离矩阵
pub fn parse_matrix_csv_file(path: &Path, units: DistanceUnit) -> Result<DistanceMatrix> {
    if path.extension().and_then(|e| e.to_str()) != Some("csv") {
        return Err(GparseError::UnsupportedFormat(format!(
            "filetype must be .csv to create a DistanceMatrix: {}",
            path.display()
        )));
    }

    let file = File::open(path).map_err(|e| GparseError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_matrix_csv_reader(file, units, &path.display().to_string())
}

/// 从已打开的文本流解析距离矩阵
pub fn parse_matrix_csv_reader<R: Read>(
    reader: R,
    units: DistanceUnit,
    source_name: &str,
) -> Result<DistanceMatrix> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut next_line = 1;

    for record in rdr.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(next_line);

        // csv 读取器会跳过空行，行号不连续即说明中间有空行
        if line != next_line {
            return Err(shape_error(
                source_name,
                format!("blank line before line {}; matrix rows must be contiguous", line),
            ));
        }
        next_line = line + 1;

        let mut fields: Vec<&str> = record.iter().collect();
        if fields.last() == Some(&"") {
            fields.pop();
        }

        let expected = rows.len() + 1;
        if fields.len() != expected {
            return Err(shape_error(
                source_name,
                format!(
                    "line {} has {} fields, expected {}; data lines should be in order of ascending length",
                    line,
                    fields.len(),
                    expected
                ),
            ));
        }

        if let Some(bad) = fields.iter().find(|f| !is_numeric(f)) {
            return Err(shape_error(
                source_name,
                format!("line {} contains non-numeric field '{}'", line, bad),
            ));
        }

        // is_numeric 已校验
        let row = fields
            .iter()
            .map(|f| f.parse::<f64>().unwrap_or_default())
            .collect();
        rows.push(row);
    }

    log::debug!("{}: parsed {}-row distance matrix", source_name, rows.len());

    Ok(DistanceMatrix::new(rows, units))
}

/// 从字符串内容解析距离矩阵
pub fn parse_matrix_csv_content(content: &str, units: DistanceUnit) -> Result<DistanceMatrix> {
    parse_matrix_csv_reader(content.as_bytes(), units, "<memory>")
}

fn shape_error(source_name: &str, reason: String) -> GparseError {
    GparseError::ParseError {
        format: "distance matrix csv".to_string(),
        path: source_name.to_string(),
        reason,
    }
}
