//! # 光谱图表生成
//!
//! 使用 `plotters` 库绘制 Lorentzian 拟合光谱。
//!
//! ## 功能
//! - 单条或多条曲线（拟合谱、差谱、单峰线型叠加）
//! - 可选竖线标出离散峰位
//! - 支持 PNG 和 SVG 输出
//!
//! ## 依赖关系
//! - 被 `commands/spectrum.rs`, `report/markdown.rs` 调用
//! - 使用 `models/spectrum.rs`, `models/peak.rs`
//! - 使用 `plotters` 渲染图表

use crate::error::{GparseError, Result};
use crate::models::{Lorentzian, SpectralPeak, Spectrum};

use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;

/// 一条待绘制的曲线
#[derive(Debug, Clone)]
pub struct CurveSeries {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub color: RGBColor,
}

impl CurveSeries {
    pub fn new(label: impl Into<String>, xs: &[f64], ys: &[f64], color: RGBColor) -> Self {
        CurveSeries {
            label: label.into(),
            points: xs.iter().copied().zip(ys.iter().copied()).collect(),
            color,
        }
    }
}

/// 主曲线颜色
pub const PRIMARY_COLOR: RGBColor = RGBColor(0, 102, 204);
/// 叠加曲线颜色
pub const OVERLAY_COLOR: RGBColor = RGBColor(204, 51, 0);

/// 图表设置
#[derive(Debug, Clone)]
pub struct PlotOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub use_svg: bool,
    /// 显式坐标范围；缺省时由数据决定
    pub x_range: Option<Range<f64>>,
    pub y_range: Option<Range<f64>>,
}

impl PlotOptions {
    pub fn new(title: impl Into<String>) -> Self {
        PlotOptions {
            title: title.into(),
            width: 1200,
            height: 800,
            use_svg: false,
            x_range: None,
            y_range: None,
        }
    }
}

/// 绘制曲线图；`sticks` 为离散峰位 (频率, 强度)
pub fn generate_spectrum_plot(
    series: &[CurveSeries],
    sticks: &[(f64, f64)],
    output_path: &Path,
    options: &PlotOptions,
) -> Result<()> {
    if series.iter().all(|s| s.points.is_empty()) {
        return Err(GparseError::PlotError("no data to plot".to_string()));
    }

    if options.use_svg {
        let root = SVGBackend::new(output_path, (options.width, options.height)).into_drawing_area();
        draw_chart(&root, series, sticks, options)?;
        root.present()
            .map_err(|e| GparseError::PlotError(e.to_string()))?;
    } else {
        let root =
            BitMapBackend::new(output_path, (options.width, options.height)).into_drawing_area();
        draw_chart(&root, series, sticks, options)?;
        root.present()
            .map_err(|e| GparseError::PlotError(e.to_string()))?;
    }

    log::debug!("plot written to {}", output_path.display());
    Ok(())
}

/// 报告用单峰图：整体拟合谱 + 该峰自身的 Lorentzian
///
/// 横轴为峰位附近 ±20%，纵轴上限为 Raman 活性的 1.2 倍。
pub fn generate_peak_plot(
    spectrum: &Spectrum,
    peak: &SpectralPeak,
    points: usize,
    output_path: &Path,
) -> Result<()> {
    let half_window = (peak.frequency.abs() * 0.2).max(10.0);
    let x_min = peak.frequency - half_window;
    let x_max = peak.frequency + half_window;

    let xs = spectrum.sample_x(points, Some(x_min), Some(x_max))?;
    let overall = spectrum.fit_function().sample(&xs);
    let own_line = Lorentzian::new(peak.raman_activity, peak.frequency, spectrum.lorentzian_width());
    let own: Vec<f64> = xs.iter().map(|&x| own_line.evaluate(x)).collect();

    let y_max = if peak.raman_activity > 0.0 {
        peak.raman_activity * 1.2
    } else {
        overall.iter().copied().fold(1.0, f64::max) * 1.2
    };

    let mut options = PlotOptions::new(format!("{}", peak));
    options.width = 800;
    options.height = 600;
    options.x_range = Some(x_min..x_max);
    options.y_range = Some(0.0..y_max);

    generate_spectrum_plot(
        &[
            CurveSeries::new("Spectrum", &xs, &overall, PRIMARY_COLOR),
            CurveSeries::new(format!("Mode {}", peak.number), &xs, &own, OVERLAY_COLOR),
        ],
        &[],
        output_path,
        &options,
    )
}

/// 数据范围
fn data_bounds(series: &[CurveSeries], sticks: &[(f64, f64)]) -> (Range<f64>, Range<f64>) {
    let all = series
        .iter()
        .flat_map(|s| s.points.iter())
        .chain(sticks.iter());

    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (0.0_f64, f64::NEG_INFINITY);
    for &(x, y) in all {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    if x_max <= x_min {
        x_min -= 1.0;
        x_max += 1.0;
    }
    if y_max <= y_min {
        y_max = y_min + 1.0;
    }
    let margin = (y_max - y_min) * 0.1;
    let y_low = if y_min < 0.0 { y_min - margin } else { y_min };

    (x_min..x_max, y_low..y_max + margin)
}

/// 绘制图表的核心逻辑
fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    series: &[CurveSeries],
    sticks: &[(f64, f64)],
    options: &PlotOptions,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| GparseError::PlotError(format!("{:?}", e)))?;

    let (auto_x, auto_y) = data_bounds(series, sticks);
    let x_range = options.x_range.clone().unwrap_or(auto_x);
    let y_range = options.y_range.clone().unwrap_or(auto_y);

    let mut chart = ChartBuilder::on(root)
        .caption(&options.title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)
        .map_err(|e| GparseError::PlotError(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .x_desc("Frequency (1/cm)")
        .y_desc("Intensity")
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(|e| GparseError::PlotError(format!("{:?}", e)))?;

    for curve in series {
        let color = curve.color;
        chart
            .draw_series(LineSeries::new(
                curve.points.iter().copied(),
                color.stroke_width(2),
            ))
            .map_err(|e| GparseError::PlotError(format!("{:?}", e)))?
            .label(curve.label.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    for &(frequency, intensity) in sticks {
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(frequency, 0.0), (frequency, intensity)],
                BLACK.mix(0.6).stroke_width(1),
            )))
            .map_err(|e| GparseError::PlotError(format!("{:?}", e)))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| GparseError::PlotError(format!("{:?}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_bounds() {
        let series = vec![CurveSeries::new(
            "a",
            &[100.0, 200.0],
            &[5.0, 15.0],
            PRIMARY_COLOR,
        )];
        let (x, y) = data_bounds(&series, &[(250.0, 20.0)]);
        assert_eq!(x, 100.0..250.0);
        assert_eq!(y.start, 0.0);
        assert!((y.end - 22.0).abs() < 1e-9);
    }

    #[test]
    fn test_data_bounds_negative_and_flat() {
        let series = vec![CurveSeries::new("d", &[1.0, 2.0], &[-4.0, 6.0], PRIMARY_COLOR)];
        let (_, y) = data_bounds(&series, &[]);
        assert_eq!(y.start, -5.0);
        assert_eq!(y.end, 7.0);

        let flat = vec![CurveSeries::new("f", &[3.0], &[0.0], PRIMARY_COLOR)];
        let (x, y) = data_bounds(&flat, &[]);
        assert_eq!(x, 2.0..4.0);
        assert!((y.end - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_empty_plot_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = generate_spectrum_plot(
            &[],
            &[],
            &dir.path().join("empty.png"),
            &PlotOptions::new("empty"),
        );
        assert!(matches!(result, Err(GparseError::PlotError(_))));
    }
}
