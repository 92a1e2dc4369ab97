//! 五行模型
//!
//! 数字到元素的归属表，以及任意两个元素之间的关系。
//! 表本身是一个值，分析引擎持有它；测试可以换成别的表。
//!
//! 相克关系由相生环推导：环上每个元素克制其后第二个元素。

use crate::core::models::{ConfigError, Digit, Element, ElementRelation};

/// 五行归属表
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementTable {
    /// 下标为数字 0-9
    digits: [Element; 10],
    /// 相生环
    generating: [Element; 5],
    /// 每个元素在相生环上的位置，下标为 `Element::index`
    positions: [usize; 5],
    /// 相邻数字和谐度，行列下标为 `Element::index`
    adjacency: [[i8; 5]; 5],
}

impl ElementTable {
    /// 构造自定义表，相生环必须恰好包含五个不同元素
    pub fn new(
        digits: [Element; 10],
        generating: [Element; 5],
        adjacency: [[i8; 5]; 5],
    ) -> Result<Self, ConfigError> {
        let mut seen = [false; 5];
        for element in generating {
            if seen[element.index()] {
                return Err(ConfigError::InvalidTable(format!(
                    "相生环中元素重复: {}",
                    element
                )));
            }
            seen[element.index()] = true;
        }

        Ok(Self::from_parts(digits, generating, adjacency))
    }

    fn from_parts(
        digits: [Element; 10],
        generating: [Element; 5],
        adjacency: [[i8; 5]; 5],
    ) -> Self {
        let mut positions = [0; 5];
        for (pos, element) in generating.iter().enumerate() {
            positions[element.index()] = pos;
        }
        Self {
            digits,
            generating,
            positions,
            adjacency,
        }
    }

    /// 标准表
    ///
    /// - 1 → Thủy
    /// - 0, 2, 5, 8 → Thổ
    /// - 3, 4 → Mộc
    /// - 6, 7 → Kim
    /// - 9 → Hỏa
    ///
    /// 相生环：Kim → Thủy → Mộc → Hỏa → Thổ → Kim
    pub fn standard() -> Self {
        use Element::{Hoa, Kim, Moc, Tho, Thuy};

        Self::from_parts(
            [Tho, Thuy, Tho, Moc, Moc, Tho, Kim, Kim, Tho, Hoa],
            [Kim, Thuy, Moc, Hoa, Tho],
            // 行：前一个数字的元素；列：后一个数字的元素（Kim, Mộc, Thủy, Hỏa, Thổ）
            [
                [0, 1, 1, -1, 0],
                [-1, 0, 0, 1, 1],
                [0, 1, 0, -1, -1],
                [1, 0, -1, 0, 1],
                [0, -1, 1, 1, 0],
            ],
        )
    }

    pub fn element_of(&self, digit: Digit) -> Element {
        self.digits[usize::from(digit.value())]
    }

    /// `from` 相对 `to` 的关系，标签描述 `to` 一方的处境
    pub fn relation(&self, from: Element, to: Element) -> ElementRelation {
        if from == to {
            ElementRelation::Same
        } else if self.generates(from) == to {
            ElementRelation::GeneratedBy
        } else if self.clashes(from) == to {
            ElementRelation::ClashedBy
        } else if self.clashes(to) == from {
            ElementRelation::Clashes
        } else {
            // 五个元素中只剩 to 生 from
            ElementRelation::Generates
        }
    }

    /// `element` 所生的元素
    pub fn generates(&self, element: Element) -> Element {
        self.generating[(self.positions[element.index()] + 1) % 5]
    }

    /// `element` 所克的元素
    pub fn clashes(&self, element: Element) -> Element {
        self.generating[(self.positions[element.index()] + 2) % 5]
    }

    pub fn adjacency(&self, first: Element, second: Element) -> i8 {
        self.adjacency[first.index()][second.index()]
    }
}

impl Default for ElementTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// 按标准表查询数字的元素
pub fn element_of(digit: Digit) -> Element {
    ElementTable::standard().element_of(digit)
}

/// 按标准表判定两个元素的关系
pub fn relation(from: Element, to: Element) -> ElementRelation {
    ElementTable::standard().relation(from, to)
}
