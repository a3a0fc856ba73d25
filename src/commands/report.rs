//! # report 命令实现
//!
//! 为 Gaussian log 文件生成 Markdown 峰归属报告。
//!
//! ## 功能
//! - 单文件模式: 报告写入 `--output` 目录
//! - 批量模式: 每个 log 文件一个子目录 `<output>/<相对路径>/<stem>/`，并行处理
//! - 已存在的报告默认跳过
//!
//! ## 依赖关系
//! - 使用 `cli/report.rs` 定义的参数
//! - 使用 `batch/` 模块进行批量处理
//! - 使用 `report/markdown.rs` 生成报告

use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::report::ReportArgs;
use crate::error::{GparseError, Result};
use crate::report::markdown::REPORT_FILE;
use crate::report::PeakReporter;
use crate::utils::{output, progress};

use std::fs;
use std::path::{Path, PathBuf};

/// 报告生成设置（批量模式下在线程间共享）
struct ReportConfig {
    plots: bool,
    heavy_only: bool,
    width: f64,
    points: usize,
    overwrite: bool,
}

impl From<&ReportArgs> for ReportConfig {
    fn from(args: &ReportArgs) -> Self {
        ReportConfig {
            plots: args.plots,
            heavy_only: args.heavy_only,
            width: args.width,
            points: args.points,
            overwrite: args.overwrite,
        }
    }
}

/// 执行 report 命令
pub fn execute(args: ReportArgs) -> Result<()> {
    output::print_header("Peak Assignment Report");

    if args.input.is_file() {
        execute_single_file(&args)
    } else if args.input.is_dir() {
        execute_batch(&args)
    } else {
        Err(GparseError::FileNotFound {
            path: args.input.display().to_string(),
        })
    }
}

/// 单文件模式
fn execute_single_file(args: &ReportArgs) -> Result<()> {
    output::print_info(&format!("Single file mode: '{}'", args.input.display()));

    let config = ReportConfig::from(args);
    let spinner = config
        .plots
        .then(|| progress::create_spinner("Rendering peak plots..."));

    let result = process_log(&args.input, &args.output, &config);

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    match result {
        ProcessResult::Success(msg) => {
            output::print_success(&msg);
            Ok(())
        }
        ProcessResult::Skipped(msg) => {
            output::print_skip(&msg);
            Ok(())
        }
        ProcessResult::Failed(_, err) => Err(GparseError::Other(err)),
    }
}

/// 批量处理模式
fn execute_batch(args: &ReportArgs) -> Result<()> {
    output::print_info(&format!("Batch mode: directory '{}'", args.input.display()));

    let files = FileCollector::new(args.input.clone())
        .with_pattern(&args.pattern)
        .recursive(args.recursive)
        .collect();

    if files.is_empty() {
        output::print_warning(&format!(
            "No matching files found with pattern '{}'",
            args.pattern
        ));
        return Ok(());
    }

    output::print_info(&format!("Found {} log files", files.len()));

    fs::create_dir_all(&args.output).map_err(|e| GparseError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    let config = ReportConfig::from(args);
    let runner = BatchRunner::new(args.jobs);
    log::info!("writing {} reports with {} jobs", files.len(), runner.jobs());

    let result = runner.run(files, |file| {
        process_log(file, &report_dir(&args.input, file, &args.output), &config)
    });

    output::print_separator();
    output::print_success(&format!(
        "Batch complete: {} success, {} skipped, {} failed",
        result.success, result.skipped, result.failed
    ));

    if !result.failures.is_empty() {
        output::print_warning("Failed files:");
        for (path, err) in result.failures.iter().take(10) {
            output::print_error(&format!("  {}: {}", path, err));
        }
        if result.failures.len() > 10 {
            output::print_warning(&format!("  ... and {} more", result.failures.len() - 10));
        }
    }

    Ok(())
}

/// 批量模式下的报告目录
///
/// 保留 log 相对输入目录的子路径，递归搜索时同名文件不会写入同一目录。
fn report_dir(input_root: &Path, file: &Path, output: &Path) -> PathBuf {
    let relative = file.strip_prefix(input_root).unwrap_or(file);
    let stem = relative
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("report");

    match relative.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && relative != file => {
            output.join(parent).join(stem)
        }
        _ => output.join(stem),
    }
}

/// 为一个 log 文件写报告
fn process_log(input: &Path, output_dir: &Path, config: &ReportConfig) -> ProcessResult {
    let report_path = output_dir.join(REPORT_FILE);
    if report_path.exists() && !config.overwrite {
        return ProcessResult::Skipped(format!(
            "Report exists, skipping: {}",
            report_path.display()
        ));
    }

    let written = PeakReporter::new(input, config.heavy_only, config.width)
        .and_then(|reporter| reporter.write(output_dir, config.plots, config.points));

    match written {
        Ok(path) => ProcessResult::Success(format!("{} -> {}", input.display(), path.display())),
        Err(e) => ProcessResult::Failed(input.display().to_string(), e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Spectrum;
    use crate::parsers::normal_modes::tests::NORMAL_MODES_LOG;

    fn args(input: PathBuf, output: PathBuf) -> ReportArgs {
        ReportArgs {
            input,
            output,
            plots: false,
            heavy_only: false,
            width: Spectrum::DEFAULT_WIDTH,
            points: 100,
            pattern: "*.log".to_string(),
            recursive: false,
            jobs: 2,
            overwrite: false,
        }
    }

    #[test]
    fn test_single_file_report() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("mol.log");
        fs::write(&log, NORMAL_MODES_LOG).unwrap();
        let out = dir.path().join("out");

        execute(args(log, out.clone())).unwrap();
        let text = fs::read_to_string(out.join(REPORT_FILE)).unwrap();
        assert!(text.starts_with("# Peak Assignment Report\n"));
    }

    #[test]
    fn test_existing_report_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("mol.log");
        fs::write(&log, NORMAL_MODES_LOG).unwrap();
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();
        fs::write(out.join(REPORT_FILE), "keep").unwrap();

        let config = ReportConfig::from(&args(log.clone(), out.clone()));
        assert!(matches!(
            process_log(&log, &out, &config),
            ProcessResult::Skipped(_)
        ));
        assert_eq!(fs::read_to_string(out.join(REPORT_FILE)).unwrap(), "keep");

        let mut overwrite = args(log.clone(), out.clone());
        overwrite.overwrite = true;
        let config = ReportConfig::from(&overwrite);
        assert!(matches!(
            process_log(&log, &out, &config),
            ProcessResult::Success(_)
        ));
    }

    #[test]
    fn test_batch_reports() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        fs::create_dir(&logs).unwrap();
        fs::write(logs.join("a.log"), NORMAL_MODES_LOG).unwrap();
        fs::write(logs.join("b.log"), NORMAL_MODES_LOG).unwrap();
        fs::write(logs.join("broken.log"), "no modes here\n").unwrap();
        let out = dir.path().join("reports");

        execute(args(logs, out.clone())).unwrap();

        assert!(out.join("a").join(REPORT_FILE).is_file());
        assert!(out.join("b").join(REPORT_FILE).is_file());
        assert!(!out.join("broken").join(REPORT_FILE).exists());
    }

    #[test]
    fn test_report_dir_keeps_subdirectories() {
        let root = Path::new("/data/logs");
        let out = Path::new("/data/reports");
        assert_eq!(
            report_dir(root, &root.join("mol.log"), out),
            out.join("mol")
        );
        assert_eq!(
            report_dir(root, &root.join("sub").join("mol.log"), out),
            out.join("sub").join("mol")
        );
        assert_eq!(
            report_dir(root, Path::new("/elsewhere/x/mol.log"), out),
            out.join("mol")
        );
    }

    #[test]
    fn test_recursive_batch_same_stem() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        fs::create_dir_all(logs.join("sub")).unwrap();
        fs::write(logs.join("mol.log"), NORMAL_MODES_LOG).unwrap();
        fs::write(
            logs.join("sub").join("mol.log"),
            NORMAL_MODES_LOG.replace("400.1000", "411.1000"),
        )
        .unwrap();
        let out = dir.path().join("reports");

        let mut batch = args(logs, out.clone());
        batch.recursive = true;
        execute(batch).unwrap();

        let top = fs::read_to_string(out.join("mol").join(REPORT_FILE)).unwrap();
        let nested = fs::read_to_string(out.join("sub").join("mol").join(REPORT_FILE)).unwrap();
        assert!(top.contains("[400.1](#400.1)"));
        assert!(!top.contains("[411.1]"));
        assert!(nested.contains("[411.1](#411.1)"));
        assert!(!nested.contains("[400.1]"));
    }

    #[test]
    fn test_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let result = execute(args(dir.path().join("none.log"), dir.path().join("out")));
        assert!(matches!(result, Err(GparseError::FileNotFound { .. })));
    }
}
