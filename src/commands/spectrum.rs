//! # spectrum 命令实现
//!
//! 读取振动光谱，采样 Lorentzian 拟合曲线并输出图像或数据。
//!
//! ## 功能
//! - 输入: Gaussian log (Raman/IR) 或两列 CSV
//! - 可选差谱 (`--subtract`) 与平均谱 (`--average`)
//! - 输出 PNG/SVG 图像或 CSV/XY 数据
//!
//! ## 依赖关系
//! - 使用 `cli/spectrum.rs` 定义的参数
//! - 使用 `parsers/`, `report/plot.rs`, `report/export.rs`

use crate::cli::spectrum::{SpectrumArgs, SpectrumOutputFormat};
use crate::error::Result;
use crate::models::{FitFunction, Spectrum};
use crate::parsers;
use crate::report::{export, plot};
use crate::utils::{numeric, output};

use std::path::Path;

/// 执行 spectrum 命令
pub fn execute(args: SpectrumArgs) -> Result<()> {
    output::print_header("Lorentzian Spectrum");

    let spectrum = parsers::load_spectrum(&args.input, args.kind, args.width)?;
    output::print_success(&format!(
        "Loaded {} peaks from '{}'",
        spectrum.len(),
        args.input.display()
    ));
    print_summary(&spectrum);

    let (label, function) = build_function(&spectrum, &args)?;
    let xs = spectrum.sample_x(args.points, args.min, args.max)?;
    let ys = function.sample(&xs);

    output::print_kv("Integral", format!("{:.4}", numeric::integrate(&xs, &ys)?));

    let format = args
        .format
        .unwrap_or_else(|| guess_format_from_extension(&args.output));

    match format {
        SpectrumOutputFormat::Png | SpectrumOutputFormat::Svg => {
            let title = args.title.clone().unwrap_or_else(|| default_title(&args.input));
            let mut options = plot::PlotOptions::new(title);
            options.use_svg = format == SpectrumOutputFormat::Svg;

            let sticks: Vec<(f64, f64)> = if args.sticks {
                spectrum
                    .frequencies()
                    .iter()
                    .copied()
                    .zip(spectrum.intensities().iter().copied())
                    .collect()
            } else {
                Vec::new()
            };

            let series = [plot::CurveSeries::new(label.clone(), &xs, &ys, plot::PRIMARY_COLOR)];
            plot::generate_spectrum_plot(&series, &sticks, &args.output, &options)?;
        }
        SpectrumOutputFormat::Csv => export::curve_to_csv(&xs, &ys, &args.output)?,
        SpectrumOutputFormat::Xy => export::curve_to_xy(&xs, &ys, &label, &args.output)?,
    }

    output::print_written(&label, &args.output);
    Ok(())
}

/// 根据参数构造待采样的函数及其标签
fn build_function(spectrum: &Spectrum, args: &SpectrumArgs) -> Result<(String, FitFunction)> {
    let name = default_title(&args.input);

    if let Some(other_path) = &args.subtract {
        let other = parsers::load_spectrum(other_path, args.kind, args.width)?;
        output::print_info(&format!(
            "Subtracting {} peaks from '{}'",
            other.len(),
            other_path.display()
        ));
        let label = format!("{} - {}", name, default_title(other_path));
        return Ok((label, spectrum.difference(&other)));
    }

    if !args.average.is_empty() {
        let mut spectra = vec![spectrum.copy()];
        for path in &args.average {
            spectra.push(parsers::load_spectrum(path, args.kind, args.width)?);
        }
        output::print_info(&format!("Averaging {} spectra", spectra.len()));
        let label = format!("{} (mean of {})", name, spectra.len());
        return Ok((label, Spectrum::average(&spectra)?));
    }

    Ok((format!("{} ({})", name, args.kind), spectrum.fit_function()))
}

fn print_summary(spectrum: &Spectrum) {
    output::print_kv("Peaks", spectrum.len());
    output::print_kv(
        "Range (1/cm)",
        format!(
            "{:.2} - {:.2}",
            spectrum.min_frequency(),
            spectrum.max_frequency()
        ),
    );
    output::print_kv("Lorentzian width", spectrum.lorentzian_width());
}

fn default_title(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("spectrum")
        .to_string()
}

/// 从文件扩展名推断输出格式
fn guess_format_from_extension(path: &Path) -> SpectrumOutputFormat {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .as_deref()
    {
        Some("svg") => SpectrumOutputFormat::Svg,
        Some("csv") => SpectrumOutputFormat::Csv,
        Some("xy") | Some("dat") | Some("txt") => SpectrumOutputFormat::Xy,
        _ => SpectrumOutputFormat::Png,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SpectrumKind;
    use std::fs;
    use std::path::PathBuf;

    fn args(input: PathBuf, output: PathBuf) -> SpectrumArgs {
        SpectrumArgs {
            input,
            kind: SpectrumKind::Raman,
            width: Spectrum::DEFAULT_WIDTH,
            points: 101,
            min: None,
            max: None,
            output,
            format: None,
            subtract: None,
            average: Vec::new(),
            sticks: false,
            title: None,
        }
    }

    #[test]
    fn test_guess_format() {
        assert_eq!(guess_format_from_extension(Path::new("a.SVG")), SpectrumOutputFormat::Svg);
        assert_eq!(guess_format_from_extension(Path::new("a.dat")), SpectrumOutputFormat::Xy);
        assert_eq!(guess_format_from_extension(Path::new("a")), SpectrumOutputFormat::Png);
    }

    #[test]
    fn test_execute_writes_curve_csv() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("peaks.csv");
        fs::write(&input, "100,10\n200,20\n").unwrap();
        let out = dir.path().join("curve.csv");

        execute(args(input, out.clone())).unwrap();

        let text = fs::read_to_string(&out).unwrap();
        assert_eq!(text.lines().count(), 102);
        assert!(text.starts_with("frequency,intensity\n100.0000,"));
    }

    #[test]
    fn test_subtract_self_is_flat() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("peaks.csv");
        fs::write(&input, "100,10\n200,20\n").unwrap();
        let out = dir.path().join("diff.xy");

        let mut a = args(input.clone(), out.clone());
        a.subtract = Some(input);
        execute(a).unwrap();

        let text = fs::read_to_string(&out).unwrap();
        assert!(text.starts_with("# Spectrum: peaks - peaks\n"));
        assert!(text
            .lines()
            .filter(|l| !l.starts_with('#'))
            .all(|l| l.ends_with("\t0.000000")));
    }

    #[test]
    fn test_average_label() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.csv");
        let other = dir.path().join("b.csv");
        fs::write(&input, "100,10\n200,20\n").unwrap();
        fs::write(&other, "100,30\n200,40\n").unwrap();

        let mut a = args(input, dir.path().join("mean.csv"));
        a.average = vec![other];
        let spectrum = parsers::load_spectrum(&a.input, a.kind, a.width).unwrap();
        let (label, function) = build_function(&spectrum, &a).unwrap();
        assert_eq!(label, "a (mean of 2)");
        let w2 = Spectrum::DEFAULT_WIDTH * Spectrum::DEFAULT_WIDTH;
        let tail = w2 / (10000.0 + w2);
        let expected = (10.0 + 20.0 * tail + 30.0 + 40.0 * tail) / 2.0;
        assert!((function.evaluate(100.0) - expected).abs() < 1e-9);
        assert!(matches!(function, FitFunction::Average(ref parts) if parts.len() == 2));
    }
}
