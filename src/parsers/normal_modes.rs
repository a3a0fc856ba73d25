//! # 振动模式（normal coordinates）解析器
//!
//! 解析 Gaussian 频率计算中 "and normal coordinates:" 之后的振动模式块，
//! 构造 `SpectralPeak` 并挂载各原子位移。
//!
//! ## 块格式
//! ```text
//!  and normal coordinates:
//!                       1                      2                      3
//!                       A                      A                      A
//!  Frequencies --    400.1000               600.2000               800.3000
//!  Red. masses --      2.1000                 2.2000                 2.3000
//!  Frc consts  --      0.2000                 0.4000                 0.6000
//!  IR Inten    --      1.5000                 0.0000                12.2500
//!  Raman Activ --      5.0000                 7.5000                 0.2500
//!  Depolar (P) --      0.7500                 0.7500                 0.1200
//!  Depolar (U) --      0.8571                 0.8571                 0.2100
//!   Atom  AN      X      Y      Z        X      Y      Z        X      Y      Z
//!      1   6     0.10   0.00   0.00     0.00   0.20   0.00     0.00   0.00   0.30
//!                       4                      5                      6
//!  ...
//!
//! ```
//! 原子行以 8 个空格开头的行结束当前块，空行结束整个解析。
//!
//! ## 状态机
//! `Seek -> BlockHeader -> PropertyRows -> AtomRows -> (BlockHeader | Done)`
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs`, `commands/assign.rs`, `report/markdown.rs` 使用
//! - 使用 `models/peak.rs`

use crate::error::{GparseError, Result};
use crate::models::{Atom, SpectralPeak};
use crate::parsers::read_text_file;

use std::fmt;
use std::path::Path;

/// 振动模式块的起始标记
pub const NORMAL_COORDINATES_MARKER: &str = "and normal coordinates:";

/// 每个模式的性质行数
const PROPERTY_ROWS: usize = 7;

/// 块结束标志：下一个块的序号行缩进
const BLOCK_INDENT: &str = "        ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Seek,
    BlockHeader,
    PropertyRows,
    AtomRows,
    Done,
}

/// 振动峰归属器
///
/// 持有一个 log 文件中全部振动模式，并按原子贡献排序给出归属。
#[derive(Debug, Clone)]
pub struct PeakAssigner {
    peaks: Vec<SpectralPeak>,
    heavy_only: bool,
}

impl PeakAssigner {
    /// 解析 log 文件
    pub fn from_log(path: &Path, heavy_only: bool) -> Result<Self> {
        let content = read_text_file(path)?;
        Self::from_content(&content, heavy_only, &path.display().to_string())
    }

    /// 从 log 文本解析
    pub fn from_content(content: &str, heavy_only: bool, source_name: &str) -> Result<Self> {
        let peaks = ModeParser::new(content, source_name).run()?;
        log::debug!("{}: parsed {} vibrational modes", source_name, peaks.len());
        Ok(PeakAssigner { peaks, heavy_only })
    }

    pub fn peaks(&self) -> &[SpectralPeak] {
        &self.peaks
    }

    pub fn heavy_only(&self) -> bool {
        self.heavy_only
    }

    /// 某个峰的原子贡献排序
    pub fn assign<'a>(&self, peak: &'a SpectralPeak, heavy_only: bool) -> Vec<&'a Atom> {
        peak.assign(heavy_only)
    }
}

impl fmt::Display for PeakAssigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for peak in &self.peaks {
            writeln!(f, "{}", peak)?;
            for atom in peak.assign(self.heavy_only) {
                writeln!(f, "{}", atom)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// 行游标解析器
struct ModeParser<'a> {
    lines: Vec<&'a str>,
    cursor: usize,
    source_name: &'a str,
    peaks: Vec<SpectralPeak>,
}

impl<'a> ModeParser<'a> {
    fn new(content: &'a str, source_name: &'a str) -> Self {
        ModeParser {
            lines: content.lines().collect(),
            cursor: 0,
            source_name,
            peaks: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<SpectralPeak>> {
        let mut state = ParseState::Seek;
        let mut numbers: Vec<u32> = Vec::new();
        let mut properties: Vec<Vec<f64>> = Vec::new();
        let mut block_size = 0;

        while state != ParseState::Done {
            state = match state {
                ParseState::Seek => {
                    let marker_line = self
                        .lines
                        .iter()
                        .position(|l| l.contains(NORMAL_COORDINATES_MARKER))
                        .ok_or_else(|| GparseError::MarkerNotFound {
                            marker: NORMAL_COORDINATES_MARKER.to_string(),
                            path: self.source_name.to_string(),
                        })?;
                    self.cursor = marker_line + 1;
                    ParseState::BlockHeader
                }
                ParseState::BlockHeader => {
                    numbers = self.parse_header()?;
                    properties.clear();
                    // 跳过对称性标签行
                    self.cursor += 2;
                    ParseState::PropertyRows
                }
                ParseState::PropertyRows => {
                    let line = self.line("vibrational properties")?;
                    if line.contains("Atom") {
                        block_size = self.push_block(&numbers, &properties)?;
                        self.cursor += 1;
                        ParseState::AtomRows
                    } else {
                        properties.push(parse_floats(line));
                        self.cursor += 1;
                        ParseState::PropertyRows
                    }
                }
                ParseState::AtomRows => {
                    let line = self.line("atom displacements")?;
                    if line.trim().is_empty() {
                        ParseState::Done
                    } else if line.starts_with(BLOCK_INDENT) {
                        ParseState::BlockHeader
                    } else {
                        self.push_atoms(line, block_size)?;
                        self.cursor += 1;
                        ParseState::AtomRows
                    }
                }
                ParseState::Done => ParseState::Done,
            };
        }

        Ok(self.peaks)
    }

    fn line(&self, context: &str) -> Result<&'a str> {
        self.lines
            .get(self.cursor)
            .copied()
            .ok_or_else(|| GparseError::UnexpectedEof {
                path: self.source_name.to_string(),
                context: context.to_string(),
            })
    }

    /// 模式序号行
    fn parse_header(&self) -> Result<Vec<u32>> {
        let line = self.line("mode numbers")?;
        let numbers = line
            .split_whitespace()
            .map(|t| {
                t.parse::<u32>()
                    .map_err(|_| self.error(format!("invalid mode number '{}'", t)))
            })
            .collect::<Result<Vec<u32>>>()?;

        if numbers.is_empty() {
            return Err(self.error("empty mode number line".to_string()));
        }
        log::trace!("{}: block header {:?}", self.source_name, numbers);
        Ok(numbers)
    }

    /// 转置性质行并追加新峰，返回块内峰数
    fn push_block(&mut self, numbers: &[u32], properties: &[Vec<f64>]) -> Result<usize> {
        if properties.len() != PROPERTY_ROWS {
            return Err(self.error(format!(
                "expected {} property rows before the atom table, found {}",
                PROPERTY_ROWS,
                properties.len()
            )));
        }

        let size = properties
            .iter()
            .map(Vec::len)
            .fold(numbers.len(), usize::min);

        for (column, &number) in numbers.iter().enumerate().take(size) {
            let mut props = [0.0; PROPERTY_ROWS];
            for (slot, row) in props.iter_mut().zip(properties) {
                *slot = row[column];
            }
            self.peaks.push(SpectralPeak::from_properties(number, props));
        }

        Ok(size)
    }

    /// 原子位移行：`<编号> <原子序数> (x y z) * block_size`
    fn push_atoms(&mut self, line: &str, block_size: usize) -> Result<()> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 2 + 3 * block_size {
            return Err(self.error(format!(
                "atom row has {} fields, expected {}",
                fields.len(),
                2 + 3 * block_size
            )));
        }

        let number: u32 = fields[0]
            .parse()
            .map_err(|_| self.error(format!("invalid atom number '{}'", fields[0])))?;
        let element: u32 = fields[1]
            .parse()
            .map_err(|_| self.error(format!("invalid atomic number '{}'", fields[1])))?;

        let total = self.peaks.len();
        for i in 0..block_size {
            let x = self.parse_coordinate(fields[2 + i * 3])?;
            let y = self.parse_coordinate(fields[3 + i * 3])?;
            let z = self.parse_coordinate(fields[4 + i * 3])?;
            // 块内第 i 个峰位于列表末尾倒数第 (block_size - i) 个
            self.peaks[total - (block_size - i)]
                .atoms
                .push(Atom::new(number, element, x, y, z));
        }

        Ok(())
    }

    fn parse_coordinate(&self, token: &str) -> Result<f64> {
        token
            .parse()
            .map_err(|_| self.error(format!("invalid displacement '{}'", token)))
    }

    fn error(&self, reason: String) -> GparseError {
        GparseError::ParseError {
            format: "Gaussian log normal coordinates".to_string(),
            path: self.source_name.to_string(),
            reason: format!("line {}: {}", self.cursor + 1, reason),
        }
    }
}

/// 提取一行中所有可解析的浮点数
fn parse_floats(line: &str) -> Vec<f64> {
    line.split_whitespace()
        .filter_map(|t| t.parse::<f64>().ok())
        .collect()
}
