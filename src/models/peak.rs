//! # 振动峰与原子位移数据模型
//!
//! 一个振动模式（`SpectralPeak`）及其各原子的位移向量（`Atom`）。
//!
//! ## 依赖关系
//! - 被 `parsers/normal_modes.rs` 构造
//! - 被 `report/`, `commands/assign.rs` 使用

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 原子序数 -> 元素名 查找表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementTable {
    names: HashMap<u32, String>,
}

impl ElementTable {
    pub fn empty() -> Self {
        ElementTable {
            names: HashMap::new(),
        }
    }

    pub fn with_element(mut self, code: u32, name: impl Into<String>) -> Self {
        self.names.insert(code, name.into());
        self
    }

    /// 未知元素回退为序数本身
    pub fn name(&self, code: u32) -> String {
        self.names
            .get(&code)
            .cloned()
            .unwrap_or_else(|| code.to_string())
    }
}

impl Default for ElementTable {
    fn default() -> Self {
        ElementTable::empty()
            .with_element(1, "hydrogen")
            .with_element(6, "carbon")
            .with_element(8, "oxygen")
    }
}

/// 某一振动模式中单个原子的位移
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// 原子编号（log 中的顺序号）
    pub number: u32,
    /// 原子序数
    pub element: u32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// 贡献度，用于排序
    ///
    /// 取值为 `sqrt(x² + y² + x²)`：z 分量不参与，x 分量计入两次，
    /// 与位移向量的模不同。
    pub eigen_sum: f64,
}

impl Atom {
    pub fn new(number: u32, element: u32, x: f64, y: f64, z: f64) -> Self {
        Atom {
            number,
            element,
            x,
            y,
            z,
            eigen_sum: (x * x + y * y + x * x).sqrt(),
        }
    }

    /// 非氢原子
    pub fn is_heavy(&self) -> bool {
        self.element > 1
    }

    pub fn element_name(&self, table: &ElementTable) -> String {
        table.name(self.element)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Atom #{} (Z={}): {:.4}",
            self.number, self.element, self.eigen_sum
        )
    }
}

/// 一个振动模式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralPeak {
    pub number: u32,
    /// 频率 (cm⁻¹)
    pub frequency: f64,
    /// 约化质量 (AMU)
    pub reduced_mass: f64,
    /// 力常数 (mDyne/Å)
    pub force_constant: f64,
    /// IR 强度 (KM/Mole)
    pub ir_intensity: f64,
    /// Raman 活性 (Å⁴/AMU)
    pub raman_activity: f64,
    pub depolar_p: f64,
    pub depolar_u: f64,
    pub atoms: Vec<Atom>,
}

impl SpectralPeak {
    /// 性质顺序与 log 中各行顺序一致：
    /// frequency, reduced mass, force constant, IR intensity,
    /// Raman activity, depolarization (P), depolarization (U)
    pub fn from_properties(number: u32, props: [f64; 7]) -> Self {
        SpectralPeak {
            number,
            frequency: props[0],
            reduced_mass: props[1],
            force_constant: props[2],
            ir_intensity: props[3],
            raman_activity: props[4],
            depolar_p: props[5],
            depolar_u: props[6],
            atoms: Vec::new(),
        }
    }

    /// 按贡献度降序排列的参与原子
    ///
    /// 贡献为零的原子被剔除；`heavy_only` 时同时剔除氢原子。
    pub fn assign(&self, heavy_only: bool) -> Vec<&Atom> {
        let mut ranked: Vec<&Atom> = self.atoms.iter().collect();
        ranked.sort_by(|a, b| a.eigen_sum.total_cmp(&b.eigen_sum));
        ranked.reverse();
        ranked
            .into_iter()
            .filter(|a| a.eigen_sum != 0.0 && (a.is_heavy() || !heavy_only))
            .collect()
    }
}

impl fmt::Display for SpectralPeak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Peak #{}: {} 1/cm", self.number, self.frequency)
    }
}
