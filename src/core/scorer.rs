//! 评分模块
//!
//! 逐位统计数字元素相对参照元素的关系，再按权重加总。
//! 两种模式在计数阶段结构相同，只是参照元素不同：
//! - Compatibility：参照元素为本命
//! - AbsoluteBalance：参照元素为号码自身的主导元素
//!
//! 在加权和之上，可选叠加均衡度、齐全度和相邻和谐度三项附加分。

use crate::core::element::ElementTable;
use crate::core::models::{
    CandidateNumber, Element, ElementCounts, Mode, RelationCounts, ScoringConfig, Toggles,
    UserProfile,
};

/// 均衡度附加分的幅度，取值区间为 [-2, 2]
pub const STATIC_BALANCE_WEIGHT: f64 = 2.0;
/// 五行齐全加分
pub const COMPLETENESS_BONUS: f64 = 2.0;

/// 评分器
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    table: &'a ElementTable,
}

impl<'a> Scorer<'a> {
    pub fn new(table: &'a ElementTable) -> Self {
        Self { table }
    }

    /// 计算关系计数与总分，纯函数
    pub fn score(
        &self,
        candidate: &CandidateNumber,
        user: UserProfile,
        cfg: &ScoringConfig,
        mode: Mode,
        toggles: Toggles,
    ) -> (RelationCounts, f64) {
        let elements = self.elements(candidate);
        let element_counts = count_elements(&elements);
        let reference = self.reference_element(&elements, &element_counts, user, mode);

        let mut counts = RelationCounts::default();
        for &element in &elements {
            counts.record(self.table.relation(element, reference));
        }

        let mut score = f64::from(counts.sinh) * cfg.score_sinh
            + f64::from(counts.cung) * cfg.score_cung
            + f64::from(counts.bi_khac) * cfg.score_bi_khac
            + f64::from(counts.sinh_xuat) * cfg.score_sinh_xuat
            + f64::from(counts.khac) * cfg.score_khac;

        if toggles.static_balance {
            score += static_balance_term(&element_counts);
        }
        if toggles.completeness && element_counts.is_complete() {
            score += COMPLETENESS_BONUS;
        }
        if cfg.score_adjacent != 0.0 {
            score += cfg.score_adjacent * f64::from(self.adjacency_sum(&elements));
        }

        (counts, score)
    }

    /// 号码各位数字对应的元素
    pub fn elements(&self, candidate: &CandidateNumber) -> Vec<Element> {
        candidate
            .digits()
            .map(|d| self.table.element_of(d))
            .collect()
    }

    /// 选择参照元素
    fn reference_element(
        &self,
        elements: &[Element],
        element_counts: &ElementCounts,
        user: UserProfile,
        mode: Mode,
    ) -> Element {
        match mode {
            Mode::Compatibility => user.user_menh,
            Mode::AbsoluteBalance => {
                dominant_element(elements, element_counts).unwrap_or(user.user_menh)
            }
        }
    }

    /// 相邻数字元素和谐度之和
    fn adjacency_sum(&self, elements: &[Element]) -> i32 {
        elements
            .windows(2)
            .map(|w| i32::from(self.table.adjacency(w[0], w[1])))
            .sum()
    }
}

fn count_elements(elements: &[Element]) -> ElementCounts {
    let mut counts = ElementCounts::default();
    for &element in elements {
        counts.record(element);
    }
    counts
}

/// 出现次数最多的元素；并列时取在号码中最先出现的那个
pub fn dominant_element(elements: &[Element], counts: &ElementCounts) -> Option<Element> {
    let max = Element::ALL.iter().map(|e| counts.get(*e)).max()?;
    elements.iter().copied().find(|e| counts.get(*e) == max)
}

/// 均衡度附加分
///
/// 偏差 D = Σ|c - n/5|，最坏情况（全部集中在一种元素）为 8n/5。
/// 均衡度 = 1 - D / (8n/5)，再线性映射到 [-W, W]。
pub fn static_balance_term(counts: &ElementCounts) -> f64 {
    let n = f64::from(counts.total());
    if n == 0.0 {
        return 0.0;
    }

    let ideal = n / 5.0;
    let deviation: f64 = Element::ALL
        .iter()
        .map(|e| (f64::from(counts.get(*e)) - ideal).abs())
        .sum();
    let evenness = 1.0 - deviation / (8.0 * n / 5.0);
    STATIC_BALANCE_WEIGHT * (2.0 * evenness - 1.0)
}
