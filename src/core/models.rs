//! 核心数据模型定义
//!
//! 配置记录（`Config`）的字段名与前端表单保持一致，不要随意改名。
//! 其余类型都是校验之后的内部形态，一次分析过程中只读。

use crate::core::parser::SEPARATORS;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 五行元素
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    /// 金
    Kim,
    /// 木
    Moc,
    /// 水
    Thuy,
    /// 火
    Hoa,
    /// 土
    Tho,
}

impl Element {
    /// 全部元素，顺序即各类计数数组的下标顺序
    pub const ALL: [Element; 5] = [
        Element::Kim,
        Element::Moc,
        Element::Thuy,
        Element::Hoa,
        Element::Tho,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// 带声调的越南语名称
    pub fn display_name(self) -> &'static str {
        match self {
            Element::Kim => "Kim",
            Element::Moc => "Mộc",
            Element::Thuy => "Thủy",
            Element::Hoa => "Hỏa",
            Element::Tho => "Thổ",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Element {
    type Err = ConfigError;

    /// 接受带或不带声调的名称（不区分大小写），以及命令行菜单里的序号 1-5
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        match key.as_str() {
            "kim" | "1" => Ok(Element::Kim),
            "moc" | "mộc" | "2" => Ok(Element::Moc),
            "thuy" | "thủy" | "thuỷ" | "3" => Ok(Element::Thuy),
            "hoa" | "hỏa" | "hoả" | "4" => Ok(Element::Hoa),
            "tho" | "thổ" | "5" => Ok(Element::Tho),
            _ => Err(ConfigError::UnknownElement(s.trim().to_string())),
        }
    }
}

/// 单个数字 0-9
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digit(u8);

impl Digit {
    pub fn new(value: u8) -> Option<Self> {
        (value <= 9).then_some(Self(value))
    }

    pub fn from_char(c: char) -> Option<Self> {
        c.to_digit(10).map(|d| Self(d as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// 数字所属元素相对参照元素（通常是本命）的关系
///
/// 标签描述的是参照元素一方的处境：数字元素生参照元素时，参照元素"被生"。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementRelation {
    /// 同行（cùng）
    Same,
    /// 参照元素生数字元素（sinh xuất）
    Generates,
    /// 数字元素生参照元素（sinh）
    GeneratedBy,
    /// 参照元素克数字元素（bị khắc）
    Clashes,
    /// 数字元素克参照元素（khắc）
    ClashedBy,
}

impl ElementRelation {
    pub const ALL: [ElementRelation; 5] = [
        ElementRelation::Same,
        ElementRelation::Generates,
        ElementRelation::GeneratedBy,
        ElementRelation::Clashes,
        ElementRelation::ClashedBy,
    ];

    /// 交换方向后的关系
    pub fn inverse(self) -> Self {
        match self {
            ElementRelation::Same => ElementRelation::Same,
            ElementRelation::Generates => ElementRelation::GeneratedBy,
            ElementRelation::GeneratedBy => ElementRelation::Generates,
            ElementRelation::Clashes => ElementRelation::ClashedBy,
            ElementRelation::ClashedBy => ElementRelation::Clashes,
        }
    }

    /// 对应的权重/阈值字段名
    pub fn kind_name(self) -> &'static str {
        match self {
            ElementRelation::Same => "cung",
            ElementRelation::Generates => "sinh_xuat",
            ElementRelation::GeneratedBy => "sinh",
            ElementRelation::Clashes => "bi_khac",
            ElementRelation::ClashedBy => "khac",
        }
    }
}

/// 一个号码的五类关系计数，总和恒等于参与计算的数字个数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RelationCounts {
    pub sinh: u32,
    pub cung: u32,
    pub bi_khac: u32,
    pub sinh_xuat: u32,
    pub khac: u32,
}

impl RelationCounts {
    pub fn record(&mut self, relation: ElementRelation) {
        *self.slot_mut(relation) += 1;
    }

    pub fn get(&self, relation: ElementRelation) -> u32 {
        match relation {
            ElementRelation::Same => self.cung,
            ElementRelation::Generates => self.sinh_xuat,
            ElementRelation::GeneratedBy => self.sinh,
            ElementRelation::Clashes => self.bi_khac,
            ElementRelation::ClashedBy => self.khac,
        }
    }

    fn slot_mut(&mut self, relation: ElementRelation) -> &mut u32 {
        match relation {
            ElementRelation::Same => &mut self.cung,
            ElementRelation::Generates => &mut self.sinh_xuat,
            ElementRelation::GeneratedBy => &mut self.sinh,
            ElementRelation::Clashes => &mut self.bi_khac,
            ElementRelation::ClashedBy => &mut self.khac,
        }
    }

    pub fn total(&self) -> u32 {
        self.sinh + self.cung + self.bi_khac + self.sinh_xuat + self.khac
    }

    /// 负面关系合计（khắc + bị khắc）
    pub fn negative(&self) -> u32 {
        self.khac + self.bi_khac
    }

    /// 单一关系的最大计数
    pub fn max_single(&self) -> u32 {
        ElementRelation::ALL
            .iter()
            .map(|r| self.get(*r))
            .max()
            .unwrap_or(0)
    }
}

/// 每种元素在号码中出现的次数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ElementCounts([u32; 5]);

impl ElementCounts {
    pub fn record(&mut self, element: Element) {
        self.0[element.index()] += 1;
    }

    pub fn get(&self, element: Element) -> u32 {
        self.0[element.index()]
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// 五行是否齐全
    pub fn is_complete(&self) -> bool {
        self.0.iter().all(|&c| c > 0)
    }
}

/// 用户资料
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserProfile {
    /// 本命元素
    pub user_menh: Element,
}

/// 评分权重
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    pub score_sinh: f64,
    pub score_cung: f64,
    pub score_bi_khac: f64,
    pub score_sinh_xuat: f64,
    pub score_khac: f64,
    /// 相邻数字和谐度权重，0 表示不参与
    pub score_adjacent: f64,
}

impl ScoringConfig {
    pub fn weight(&self, relation: ElementRelation) -> f64 {
        match relation {
            ElementRelation::Same => self.score_cung,
            ElementRelation::Generates => self.score_sinh_xuat,
            ElementRelation::GeneratedBy => self.score_sinh,
            ElementRelation::Clashes => self.score_bi_khac,
            ElementRelation::ClashedBy => self.score_khac,
        }
    }
}

/// 自定义规则，未启用的规则为 None
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CustomRules {
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub blacklist: Option<BTreeSet<char>>,
}

/// 筛选阈值与自定义规则
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    pub khac_max: u32,
    pub bi_khac_max: u32,
    pub sinh_min: u32,
    pub cung_min: u32,
    /// khắc + bị khắc 的上限
    pub tong_max: u32,
    /// 任一关系计数的上限
    pub any_max: u32,
    /// sinh + cùng 的上限，None 表示不限制
    pub sinh_cung_max: Option<u32>,
    /// 奇偶与前后半段和值检查
    pub parity_balance: bool,
    pub custom: CustomRules,
}

/// 附加评分开关
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Toggles {
    /// 五行分布均衡度加减分
    pub static_balance: bool,
    /// 五行齐全加分
    pub completeness: bool,
}

/// 分析模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// 以本命为参照
    #[default]
    Compatibility,
    /// 以号码自身的主导元素为参照
    AbsoluteBalance,
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Compatibility" => Ok(Mode::Compatibility),
            "AbsoluteBalance" => Ok(Mode::AbsoluteBalance),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}

/// 解析后的候选号码（纯数字），创建后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateNumber(String);

impl CandidateNumber {
    /// 调用方保证内容只含 ASCII 数字
    pub(crate) fn from_digits(digits: String) -> Self {
        debug_assert!(digits.chars().all(|c| c.is_ascii_digit()));
        Self(digits)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn digits(&self) -> impl Iterator<Item = Digit> + '_ {
        self.0.chars().filter_map(Digit::from_char)
    }
}

impl fmt::Display for CandidateNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 批量分析的单条结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub number: String,
    pub score: f64,
}

/// 格式不合法时的原因代码
pub const FORMAT_REASON: &str = "format";

/// 单号快速检查结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QuickCheckResult {
    Valid { score: f64 },
    Invalid { reason: String },
}

impl QuickCheckResult {
    pub fn score(&self) -> Option<f64> {
        match self {
            QuickCheckResult::Valid { score } => Some(*score),
            QuickCheckResult::Invalid { .. } => None,
        }
    }
}

/// 筛选失败原因，按检查顺序排列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum FilterReason {
    #[error("blacklist")]
    Blacklist,
    #[error("prefix")]
    Prefix,
    #[error("suffix")]
    Suffix,
    #[error("khac_max")]
    KhacMax,
    #[error("bi_khac_max")]
    BiKhacMax,
    #[error("sinh_min")]
    SinhMin,
    #[error("cung_min")]
    CungMin,
    #[error("tong_max")]
    TongMax,
    #[error("any_max")]
    AnyMax,
    #[error("sinh_cung_max")]
    SinhCungMax,
    #[error("parity_balance")]
    ParityBalance,
}

impl FilterReason {
    pub fn code(self) -> String {
        self.to_string()
    }
}

/// 配置错误，整个调用失败且不返回部分结果
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("配置解析失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("未知的分析模式: {0}")]
    UnknownMode(String),

    #[error("未知的本命元素: {0}")]
    UnknownElement(String),

    #[error("权重 {field} 必须是绝对值不超过 1e9 的有限数值，实际为 {value}")]
    InvalidWeight { field: &'static str, value: f64 },

    #[error("阈值 {field} 不能为负数，实际为 {value}")]
    InvalidThreshold { field: &'static str, value: i64 },

    #[error("五行表无效: {0}")]
    InvalidTable(String),
}

/// 调用方提交的配置记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub mode: String,
    pub user_menh: String,

    pub score_sinh: f64,
    pub score_cung: f64,
    pub score_bi_khac: f64,
    pub score_sinh_xuat: f64,
    pub score_khac: f64,
    /// 旧版配置没有此字段
    #[serde(default)]
    pub score_adjacent: f64,

    pub filter_khac_max: i64,
    pub filter_bi_khac_max: i64,
    pub filter_sinh_min: i64,
    pub filter_cung_min: i64,
    pub filter_tong_max: i64,
    pub filter_any_max: i64,
    /// 为空表示不限制
    #[serde(default)]
    pub filter_sinh_cung_max: Option<i64>,

    pub toggle_static_balance: bool,
    pub toggle_completeness: bool,
    #[serde(default)]
    pub toggle_parity_balance: bool,

    pub toggle_prefix_filter: bool,
    pub prefix_value: String,
    pub toggle_suffix_filter: bool,
    pub suffix_value: String,
    pub toggle_blacklist_filter: bool,
    pub blacklist_digits: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: "Compatibility".to_string(),
            user_menh: "Kim".to_string(),
            score_sinh: 3.0,
            score_cung: 2.0,
            score_bi_khac: 1.0,
            score_sinh_xuat: -1.0,
            score_khac: -3.0,
            score_adjacent: 0.0,
            filter_khac_max: 1,
            filter_bi_khac_max: 2,
            filter_sinh_min: 2,
            filter_cung_min: 2,
            filter_tong_max: 3,
            filter_any_max: 4,
            filter_sinh_cung_max: None,
            toggle_static_balance: false,
            toggle_completeness: false,
            toggle_parity_balance: false,
            toggle_prefix_filter: false,
            prefix_value: String::new(),
            toggle_suffix_filter: false,
            suffix_value: String::new(),
            toggle_blacklist_filter: false,
            blacklist_digits: String::new(),
        }
    }
}

impl Config {
    /// 从 JSON 文本解析；字段缺失或类型不符（如权重不是数字）都算配置错误
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 校验并转换为内部使用的分析参数
    pub fn validate(&self) -> Result<AnalysisSettings, ConfigError> {
        let mode: Mode = self.mode.parse()?;
        let user_menh: Element = self.user_menh.parse()?;

        let scoring = ScoringConfig {
            score_sinh: finite_weight("score_sinh", self.score_sinh)?,
            score_cung: finite_weight("score_cung", self.score_cung)?,
            score_bi_khac: finite_weight("score_bi_khac", self.score_bi_khac)?,
            score_sinh_xuat: finite_weight("score_sinh_xuat", self.score_sinh_xuat)?,
            score_khac: finite_weight("score_khac", self.score_khac)?,
            score_adjacent: finite_weight("score_adjacent", self.score_adjacent)?,
        };

        let custom = CustomRules {
            prefix: self
                .toggle_prefix_filter
                .then(|| strip_separators(&self.prefix_value)),
            suffix: self
                .toggle_suffix_filter
                .then(|| strip_separators(&self.suffix_value)),
            blacklist: self.toggle_blacklist_filter.then(|| {
                self.blacklist_digits
                    .chars()
                    .filter(|c| c.is_ascii_digit())
                    .collect()
            }),
        };

        let filter = FilterConfig {
            khac_max: threshold("filter_khac_max", self.filter_khac_max)?,
            bi_khac_max: threshold("filter_bi_khac_max", self.filter_bi_khac_max)?,
            sinh_min: threshold("filter_sinh_min", self.filter_sinh_min)?,
            cung_min: threshold("filter_cung_min", self.filter_cung_min)?,
            tong_max: threshold("filter_tong_max", self.filter_tong_max)?,
            any_max: threshold("filter_any_max", self.filter_any_max)?,
            sinh_cung_max: self
                .filter_sinh_cung_max
                .map(|value| threshold("filter_sinh_cung_max", value))
                .transpose()?,
            parity_balance: self.toggle_parity_balance,
            custom,
        };

        Ok(AnalysisSettings {
            mode,
            user: UserProfile { user_menh },
            scoring,
            filter,
            toggles: Toggles {
                static_balance: self.toggle_static_balance,
                completeness: self.toggle_completeness,
            },
        })
    }
}

/// 权重绝对值上限，保证任意长度号码的总分仍是有限数值
pub const MAX_WEIGHT: f64 = 1e9;

fn finite_weight(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value.abs() <= MAX_WEIGHT {
        Ok(value)
    } else {
        Err(ConfigError::InvalidWeight { field, value })
    }
}

/// 号码比较前去掉分组符，与解析后的号码保持同一形态
fn strip_separators(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|c| !SEPARATORS.contains(c))
        .collect()
}

fn threshold(field: &'static str, value: i64) -> Result<u32, ConfigError> {
    // 超出 u32 的阈值等价于不设上限
    if value < 0 {
        return Err(ConfigError::InvalidThreshold { field, value });
    }
    Ok(u32::try_from(value).unwrap_or(u32::MAX))
}

/// 校验后的分析参数，一次调用内只读
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub mode: Mode,
    pub user: UserProfile,
    pub scoring: ScoringConfig,
    pub filter: FilterConfig,
    pub toggles: Toggles,
}
