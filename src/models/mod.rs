//! # 数据模型模块
//!
//! 定义距离矩阵、振动光谱、振动峰与原子位移的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `report/` 和 `commands/` 使用
//! - 子模块: matrix, spectrum, peak

pub mod matrix;
pub mod peak;
pub mod spectrum;

pub use matrix::{DistanceMatrix, DistanceUnit};
pub use peak::{Atom, ElementTable, SpectralPeak};
pub use spectrum::{FitFunction, Lorentzian, Spectrum, SpectrumKind};
