//! 号码解析模块
//!
//! 把原始文本拆成候选号码列表。此模块只做格式校验，不做任何评分判断。

use crate::core::models::CandidateNumber;

/// 默认最短位数
pub const MIN_DIGITS: usize = 10;
/// 默认最长位数（旧的 11 位号码）
pub const MAX_DIGITS: usize = 11;

/// 号码内部允许出现的分组符，解析时去掉
pub(crate) const SEPARATORS: [char; 3] = [' ', '-', '.'];

/// 号码解析器
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parser {
    min_len: usize,
    max_len: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            min_len: MIN_DIGITS,
            max_len: MAX_DIGITS,
        }
    }

    /// 设置可接受的位数范围（闭区间）
    pub fn with_length_range(mut self, min_len: usize, max_len: usize) -> Self {
        self.min_len = min_len.max(1);
        self.max_len = max_len.max(self.min_len);
        self
    }

    /// 按行解析，丢弃空行和格式不合法的行，保持原顺序，不去重
    ///
    /// `\n`、`\r\n` 和单独的 `\r` 都视为换行。
    pub fn parse(&self, raw_text: &str) -> Vec<CandidateNumber> {
        let text = raw_text.trim_start_matches('\u{feff}');
        let candidates: Vec<_> = text
            .split(['\n', '\r'])
            .filter_map(|line| self.parse_single(line))
            .collect();

        tracing::debug!("解析得到 {} 个候选号码", candidates.len());
        candidates
    }

    /// 解析单个号码，不合法时返回 None
    pub fn parse_single(&self, token: &str) -> Option<CandidateNumber> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }

        let mut digits = String::with_capacity(token.len());
        for c in token.chars() {
            if c.is_ascii_digit() {
                digits.push(c);
            } else if !SEPARATORS.contains(&c) {
                return None;
            }
        }

        if !(self.min_len..=self.max_len).contains(&digits.len()) {
            return None;
        }

        Some(CandidateNumber::from_digits(digits))
    }
}

/// 使用默认解析器
pub fn parse(raw_text: &str) -> Vec<CandidateNumber> {
    Parser::new().parse(raw_text)
}
