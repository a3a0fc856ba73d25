//! # matrix 命令实现
//!
//! 读取原子间距离矩阵，可选与第二个结构比较 RMS 偏差。
//!
//! ## 依赖关系
//! - 使用 `cli/matrix.rs` 定义的参数
//! - 使用 `parsers/`, `report/export.rs`

use crate::cli::matrix::MatrixArgs;
use crate::error::Result;
use crate::models::DistanceMatrix;
use crate::parsers;
use crate::report::export;
use crate::utils::output;

/// 执行 matrix 命令
pub fn execute(args: MatrixArgs) -> Result<()> {
    output::print_header("Distance Matrix");

    let matrix = parsers::load_distance_matrix(&args.input, args.units)?;
    output::print_success(&format!(
        "Loaded {}-atom matrix from '{}'",
        matrix.len(),
        args.input.display()
    ));
    print_summary(&matrix);

    if let Some(path) = &args.export {
        export::matrix_to_csv(&matrix, path)?;
        output::print_written("Matrix", path);
    }

    let Some(against) = &args.against else {
        return Ok(());
    };

    let other = parsers::load_distance_matrix(against, args.units)?;
    output::print_info(&format!(
        "Comparing against {}-atom matrix from '{}'",
        other.len(),
        against.display()
    ));

    let rms = matrix.rms_deviation(&other, args.threshold)?;
    if let Some(t) = args.threshold {
        output::print_kv("Threshold", format!("{} {}", t, matrix.units));
    }
    output::print_kv("RMS deviation", format!("{:.6} {}", rms, matrix.units));

    if let Some(path) = &args.diff_output {
        export::matrix_to_csv(&matrix.difference(&other), path)?;
        output::print_written("Difference matrix", path);
    }

    Ok(())
}

fn print_summary(matrix: &DistanceMatrix) {
    let entries = matrix.flattened();
    let longest = entries.iter().copied().fold(0.0_f64, f64::max);

    output::print_kv("Atoms", matrix.len());
    output::print_kv("Entries", entries.len());
    output::print_kv("Units", matrix.units);
    output::print_kv("Longest distance", format!("{:.6}", longest));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GparseError;
    use crate::models::DistanceUnit;
    use crate::parsers::matrix_csv::parse_matrix_csv_file;
    use std::fs;
    use std::path::PathBuf;

    fn args(input: PathBuf) -> MatrixArgs {
        MatrixArgs {
            input,
            against: None,
            threshold: None,
            units: DistanceUnit::Angstroms,
            diff_output: None,
            export: None,
        }
    }

    #[test]
    fn test_compare_writes_difference() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        fs::write(&a, "0\n1.5,0\n2.5,1.5,0\n").unwrap();
        fs::write(&b, "0\n1,0\n2,1,0\n").unwrap();
        let diff = dir.path().join("diff.csv");

        let mut m = args(a);
        m.against = Some(b);
        m.diff_output = Some(diff.clone());
        execute(m).unwrap();

        let parsed = parse_matrix_csv_file(&diff, DistanceUnit::Angstroms).unwrap();
        assert_eq!(parsed[2], vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_size_mismatch_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        fs::write(&a, "0\n1.5,0\n").unwrap();
        fs::write(&b, "0\n1,0\n2,1,0\n").unwrap();

        let mut m = args(a);
        m.against = Some(b);
        assert!(matches!(
            execute(m),
            Err(GparseError::DimensionMismatch { left: 2, right: 3 })
        ));
    }
}
