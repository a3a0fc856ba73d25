//! # 光谱 CSV 解析器
//!
//! 读取 `frequency,intensity` 两列数值，表头、短行及非数值行直接跳过。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs`, `commands/spectrum.rs` 使用
//! - 使用 `models/spectrum.rs`, `utils/numeric.rs`

use crate::error::{GparseError, Result};
use crate::models::Spectrum;
use crate::utils::numeric::is_numeric;

use std::fs::File;
use std::io::Read;
use std::path::Path;

/// 从 .csv 文件解析光谱
pub fn parse_spectrum_csv_file(path: &Path, width: f64) -> Result<Spectrum> {
    if path.extension().and_then(|e| e.to_str()) != Some("csv") {
        return Err(GparseError::UnsupportedFormat(format!(
            "filetype must be .csv to create a Spectrum: {}",
            path.display()
        )));
    }

    let file = File::open(path).map_err(|e| GparseError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_spectrum_csv_reader(file, width)
}

/// 从文本流解析光谱
pub fn parse_spectrum_csv_reader<R: Read>(reader: R, width: f64) -> Result<Spectrum> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut frequencies = Vec::new();
    let mut intensities = Vec::new();
    let mut skipped = 0usize;

    for record in rdr.records() {
        let record = record?;
        match (record.get(0), record.get(1)) {
            (Some(f), Some(i)) if is_numeric(f) && is_numeric(i) => {
                frequencies.push(f.parse::<f64>().unwrap_or_default());
                intensities.push(i.parse::<f64>().unwrap_or_default());
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        log::debug!("skipped {} non-numeric spectrum csv lines", skipped);
    }

    Spectrum::new(frequencies, intensities, width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_header_and_junk() {
        let content = "frequency,intensity\n100.0,5.0\n200.0,7.5,extra\nnot,numbers\n300\n400.0,1e1\n";
        let s = parse_spectrum_csv_reader(content.as_bytes(), 3.3).unwrap();
        assert_eq!(s.frequencies(), &[100.0, 200.0, 400.0]);
        assert_eq!(s.intensities(), &[5.0, 7.5, 10.0]);
        assert_eq!(s.lorentzian_width(), 3.3);
    }

    #[test]
    fn test_parse_empty_fails() {
        let result = parse_spectrum_csv_reader("a,b\n".as_bytes(), 3.3);
        assert!(matches!(result, Err(GparseError::InvalidArgument(_))));
    }

    #[test]
    fn test_file_extension_check() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("spectrum.py");
        std::fs::write(&bad, "1,2\n").unwrap();
        assert!(parse_spectrum_csv_file(&bad, 3.3).is_err());

        let good = dir.path().join("spectrum.csv");
        std::fs::write(&good, "1,2\n3,4\n").unwrap();
        let s = parse_spectrum_csv_file(&good, 3.3).unwrap();
        assert_eq!(s.len(), 2);
    }
}
