//! # 峰归属报告
//!
//! 将同一 log 文件的 Raman 光谱与振动模式归属整理为 Markdown 报告，
//! 可选为每个峰生成局部放大图。
//!
//! ## 报告结构
//! ```text
//! # Peak Assignment Report
//! N peaks found in <log> at <time>
//! [freq](#freq) ...
//! ## Peak #n: freq 1/cm
//! Raman activity / 图 / 原子贡献表
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/report.rs` 调用
//! - 使用 `parsers/gaussian_log.rs`, `parsers/normal_modes.rs`
//! - 使用 `report/plot.rs` 生成单峰图

use crate::error::{GparseError, Result};
use crate::models::{ElementTable, Spectrum, SpectrumKind};
use crate::parsers::{gaussian_log, PeakAssigner};
use crate::report::plot;

use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// 报告文件名
pub const REPORT_FILE: &str = "report.md";

/// 报告生成器
#[derive(Debug, Clone)]
pub struct PeakReporter {
    log_file: PathBuf,
    spectrum: Spectrum,
    assigner: PeakAssigner,
    elements: ElementTable,
}

impl PeakReporter {
    /// 从 log 文件构建 Raman 光谱与峰归属
    pub fn new(log_file: &Path, heavy_only: bool, width: f64) -> Result<Self> {
        let spectrum = gaussian_log::parse_spectrum_log(log_file, SpectrumKind::Raman, width)?;
        let assigner = PeakAssigner::from_log(log_file, heavy_only)?;
        Ok(Self::from_parts(log_file, spectrum, assigner))
    }

    pub fn from_parts(log_file: &Path, spectrum: Spectrum, assigner: PeakAssigner) -> Self {
        PeakReporter {
            log_file: log_file.to_path_buf(),
            spectrum,
            assigner,
            elements: ElementTable::default(),
        }
    }

    pub fn with_elements(mut self, elements: ElementTable) -> Self {
        self.elements = elements;
        self
    }

    pub fn spectrum(&self) -> &Spectrum {
        &self.spectrum
    }

    pub fn assigner(&self) -> &PeakAssigner {
        &self.assigner
    }

    /// 单峰图文件名
    fn plot_name(frequency: f64) -> String {
        format!("{}.png", frequency)
    }

    /// 生成 Markdown 文本
    pub fn render_markdown(&self, with_plots: bool) -> String {
        let mut md = String::new();
        let peaks = self.assigner.peaks();

        md.push_str("# Peak Assignment Report\n");
        md.push_str(&format!(
            "{} peaks found in {} at {}\n\n",
            self.spectrum.len(),
            self.log_file.display(),
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ));

        for peak in peaks {
            md.push_str(&format!("[{}](#{})  \n", peak.frequency, peak.frequency));
        }
        md.push_str("  \n");

        for peak in peaks {
            md.push_str(&format!(
                "## Peak #{}: {} 1/cm <a name=\"{}\"></a>  \n",
                peak.number, peak.frequency, peak.frequency
            ));
            md.push_str(&format!("Raman activity: {}  \n", peak.raman_activity));

            if with_plots {
                let name = Self::plot_name(peak.frequency);
                md.push_str(&format!("![{}]({})\n\n", name, name));
            }

            md.push_str("| Atom # | Element | Sum of vibrational eigenvalues |\n");
            md.push_str("|--------|---------|--------------------------------|\n");
            for atom in peak.assign(self.assigner.heavy_only()) {
                md.push_str(&format!(
                    "| {} | {} | {} |\n",
                    atom.number,
                    atom.element_name(&self.elements),
                    atom.eigen_sum
                ));
            }
            md.push('\n');
        }

        md
    }

    /// 写出报告目录，返回 report.md 路径
    pub fn write(&self, output_dir: &Path, with_plots: bool, points: usize) -> Result<PathBuf> {
        fs::create_dir_all(output_dir).map_err(|e| GparseError::FileWriteError {
            path: output_dir.display().to_string(),
            source: e,
        })?;

        if with_plots {
            for peak in self.assigner.peaks() {
                let path = output_dir.join(Self::plot_name(peak.frequency));
                plot::generate_peak_plot(&self.spectrum, peak, points, &path)?;
            }
        }

        let report_path = output_dir.join(REPORT_FILE);
        fs::write(&report_path, self.render_markdown(with_plots)).map_err(|e| {
            GparseError::FileWriteError {
                path: report_path.display().to_string(),
                source: e,
            }
        })?;

        log::info!(
            "report for {} written to {}",
            self.log_file.display(),
            report_path.display()
        );
        Ok(report_path)
    }
}
