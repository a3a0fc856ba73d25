//! # assign 命令实现
//!
//! 解析 normal coordinates 块，按振动本征值之和为每个峰的原子排序。
//!
//! ## 依赖关系
//! - 使用 `cli/assign.rs` 定义的参数
//! - 使用 `parsers/normal_modes.rs`, `report/export.rs`
//! - 使用 `tabled` 打印表格

use crate::cli::assign::AssignArgs;
use crate::error::Result;
use crate::models::{ElementTable, SpectralPeak};
use crate::parsers::PeakAssigner;
use crate::report::export;
use crate::utils::output;

use tabled::{Table, Tabled};

#[derive(Tabled)]
struct AtomRow {
    #[tabled(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "Atom #")]
    atom: u32,
    #[tabled(rename = "Element")]
    element: String,
    #[tabled(rename = "Eigenvalue sum")]
    eigen_sum: String,
}

/// 执行 assign 命令
pub fn execute(args: AssignArgs) -> Result<()> {
    output::print_header("Vibrational Peak Assignment");

    let assigner = PeakAssigner::from_log(&args.log_file, args.heavy_only)?;
    output::print_success(&format!(
        "Parsed {} vibrational modes from '{}'",
        assigner.peaks().len(),
        args.log_file.display()
    ));
    if args.heavy_only {
        output::print_info("Hydrogen atoms excluded");
    }

    let elements = ElementTable::default();
    let selected: Vec<&SpectralPeak> = assigner
        .peaks()
        .iter()
        .filter(|p| args.min_activity.map_or(true, |m| p.raman_activity >= m))
        .collect();

    if selected.is_empty() {
        output::print_warning("No peaks match the selection");
    }

    for peak in &selected {
        let rows = atom_rows(peak, args.heavy_only, args.top, &elements);
        println!(
            "\n{}  (Raman {:.4}, IR {:.4})",
            peak, peak.raman_activity, peak.ir_intensity
        );
        if rows.is_empty() {
            output::print_skip("no contributing atoms");
        } else {
            println!("{}", Table::new(&rows));
        }
    }

    if let Some(path) = &args.csv {
        let rows = export::assignment_rows(assigner.peaks(), args.heavy_only, &elements);
        export::assignments_to_csv(&rows, path)?;
        output::print_separator();
        output::print_written(&format!("{} assignments", rows.len()), path);
    }

    Ok(())
}

/// 单个峰的排序表，`top == 0` 表示全部
fn atom_rows(
    peak: &SpectralPeak,
    heavy_only: bool,
    top: usize,
    elements: &ElementTable,
) -> Vec<AtomRow> {
    let ranked = peak.assign(heavy_only);
    let limit = if top == 0 { ranked.len() } else { top };

    ranked
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, atom)| AtomRow {
            rank: i + 1,
            atom: atom.number,
            element: atom.element_name(elements),
            eigen_sum: format!("{:.4}", atom.eigen_sum),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::normal_modes::tests::NORMAL_MODES_LOG;
    use std::fs;

    #[test]
    fn test_atom_rows_limit() {
        let assigner = PeakAssigner::from_content(NORMAL_MODES_LOG, false, "t.log").unwrap();
        let peak = &assigner.peaks()[0];
        let elements = ElementTable::default();

        let all = atom_rows(peak, false, 0, &elements);
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].atom, 3);
        assert_eq!(all[0].element, "oxygen");
        assert_eq!(all[0].eigen_sum, "0.7000");

        assert_eq!(atom_rows(peak, false, 1, &elements).len(), 1);
        assert_eq!(atom_rows(peak, true, 0, &elements).len(), 2);
    }

    #[test]
    fn test_execute_exports_csv() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("modes.log");
        fs::write(&log, NORMAL_MODES_LOG).unwrap();
        let csv = dir.path().join("assign.csv");

        execute(AssignArgs {
            log_file: log,
            heavy_only: true,
            top: 2,
            min_activity: Some(50.0),
            csv: Some(csv.clone()),
        })
        .unwrap();

        let text = fs::read_to_string(&csv).unwrap();
        assert!(text.starts_with("peak,frequency,"));
        assert!(!text.contains(",hydrogen,"));
        assert!(text.contains(",oxygen,"));
    }
}
