//! # 振动光谱数据模型
//!
//! 离散的 频率/强度 对，以及由 Lorentzian 叠加得到的连续拟合函数。
//!
//! ## 依赖关系
//! - 被 `parsers/spectrum_csv.rs`, `parsers/gaussian_log.rs` 构造
//! - 被 `report/`, `commands/spectrum.rs` 使用
//! - 使用 `utils/numeric.rs`

use crate::error::{GparseError, Result};
use crate::utils::numeric;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 单个 Lorentzian 线型 `A * w² / ((x - c)² + w²)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lorentzian {
    pub amplitude: f64,
    pub center: f64,
    pub width: f64,
}

impl Lorentzian {
    pub fn new(amplitude: f64, center: f64, width: f64) -> Self {
        Lorentzian {
            amplitude,
            center,
            width,
        }
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let w2 = self.width * self.width;
        let dx = x - self.center;
        self.amplitude * (w2 / (dx * dx + w2))
    }
}

/// 可逐点求值的连续光谱函数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FitFunction {
    /// Lorentzian 之和
    Sum(Vec<Lorentzian>),
    /// `minuend(x) - subtrahend(x)`
    Difference(Box<FitFunction>, Box<FitFunction>),
    /// 各分量的算术平均
    Average(Vec<FitFunction>),
}

impl FitFunction {
    pub fn evaluate(&self, x: f64) -> f64 {
        match self {
            FitFunction::Sum(terms) => terms.iter().map(|l| l.evaluate(x)).sum(),
            FitFunction::Difference(minuend, subtrahend) => {
                minuend.evaluate(x) - subtrahend.evaluate(x)
            }
            FitFunction::Average(parts) => {
                let n = parts.len() as f64;
                parts.iter().map(|p| p.evaluate(x) / n).sum()
            }
        }
    }

    /// 在给定采样点上求值
    pub fn sample(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }
}

/// 光谱类型（决定从 log 文件中读取哪一行强度）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpectrumKind {
    #[default]
    Raman,
    Infrared,
}

impl SpectrumKind {
    /// log 文件中强度行的标记
    pub fn intensity_marker(self) -> &'static str {
        match self {
            SpectrumKind::Raman => "Raman Activ",
            SpectrumKind::Infrared => "IR Inten",
        }
    }
}

impl FromStr for SpectrumKind {
    type Err = GparseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "r" | "raman" => Ok(SpectrumKind::Raman),
            "ir" | "infrared" => Ok(SpectrumKind::Infrared),
            other => Err(GparseError::InvalidArgument(format!(
                "spectrum kind must be r, ir, raman, or infrared (got '{}')",
                other
            ))),
        }
    }
}

impl fmt::Display for SpectrumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpectrumKind::Raman => write!(f, "raman"),
            SpectrumKind::Infrared => write!(f, "ir"),
        }
    }
}

/// 一条振动光谱
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spectrum {
    frequencies: Vec<f64>,
    intensities: Vec<f64>,
    lorentzian_width: f64,
}

impl Spectrum {
    /// 默认采样点数
    pub const DEFAULT_POINTS: usize = 5000;

    /// 默认 Lorentzian 半宽
    pub const DEFAULT_WIDTH: f64 = 3.3;

    pub fn new(frequencies: Vec<f64>, intensities: Vec<f64>, width: f64) -> Result<Self> {
        if frequencies.len() != intensities.len() {
            return Err(GparseError::InvalidArgument(format!(
                "there must be an equal number of frequencies and intensities ({} vs {})",
                frequencies.len(),
                intensities.len()
            )));
        }
        if frequencies.is_empty() {
            return Err(GparseError::InvalidArgument(
                "there must be at least one frequency-intensity pair".to_string(),
            ));
        }

        Ok(Spectrum {
            frequencies,
            intensities,
            lorentzian_width: width,
        })
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn intensities(&self) -> &[f64] {
        &self.intensities
    }

    pub fn lorentzian_width(&self) -> f64 {
        self.lorentzian_width
    }

    pub fn set_width(&mut self, width: f64) {
        self.lorentzian_width = width;
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// 构造时已保证非空
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// 浅拷贝
    pub fn copy(&self) -> Spectrum {
        self.clone()
    }

    /// 以当前宽度构造拟合函数
    pub fn fit_function(&self) -> FitFunction {
        FitFunction::Sum(
            self.frequencies
                .iter()
                .zip(&self.intensities)
                .map(|(&c, &a)| Lorentzian::new(a, c, self.lorentzian_width))
                .collect(),
        )
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        self.fit_function().evaluate(x)
    }

    pub fn min_frequency(&self) -> f64 {
        self.frequencies.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max_frequency(&self) -> f64 {
        self.frequencies
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// 采样横坐标；未指定的边界取数据极值
    pub fn sample_x(&self, count: usize, min: Option<f64>, max: Option<f64>) -> Result<Vec<f64>> {
        let lo = min.unwrap_or_else(|| self.min_frequency());
        let hi = max.unwrap_or_else(|| self.max_frequency());
        numeric::evenly_spaced(lo, hi, count)
    }

    /// 在默认范围内采样拟合曲线
    pub fn as_curve(&self, count: usize) -> Result<Vec<f64>> {
        let xs = self.sample_x(count, None, None)?;
        Ok(self.fit_function().sample(&xs))
    }

    /// 拟合曲线的数值积分
    pub fn integral(&self, count: usize) -> Result<f64> {
        let xs = self.sample_x(count, None, None)?;
        let ys = self.fit_function().sample(&xs);
        numeric::integrate(&xs, &ys)
    }

    /// 差谱函数 `x -> self(x) - other(x)`
    pub fn difference(&self, other: &Spectrum) -> FitFunction {
        FitFunction::Difference(
            Box::new(self.fit_function()),
            Box::new(other.fit_function()),
        )
    }

    /// 多条光谱的平均函数
    pub fn average(spectra: &[Spectrum]) -> Result<FitFunction> {
        if spectra.is_empty() {
            return Err(GparseError::EmptySelection(
                "cannot average zero spectra".to_string(),
            ));
        }
        Ok(FitFunction::Average(
            spectra.iter().map(Spectrum::fit_function).collect(),
        ))
    }
}

/// 仅比较输入数据，不比较拟合曲线与宽度
impl PartialEq for Spectrum {
    fn eq(&self, other: &Self) -> bool {
        self.frequencies == other.frequencies && self.intensities == other.intensities
    }
}
