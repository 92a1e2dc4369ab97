//! 筛选模块
//!
//! 按固定顺序检查规则，报告第一条不满足的规则：
//! 黑名单 → 前缀 → 后缀 → khắc 上限 → bị khắc 上限 → sinh 下限 → cùng 下限
//! → 负面关系合计上限 → 单一关系上限 → sinh + cùng 上限 → 奇偶均衡。
//! 最后两条默认关闭。
//! 未启用的自定义规则在校验配置时已置为 None，这里直接跳过。

use crate::core::models::{CandidateNumber, FilterConfig, FilterReason, RelationCounts};

impl FilterConfig {
    /// 检查号码是否通过全部规则
    pub fn check(
        &self,
        counts: &RelationCounts,
        candidate: &CandidateNumber,
    ) -> Result<(), FilterReason> {
        let number = candidate.as_str();

        // 检查黑名单数字
        if let Some(ref blacklist) = self.custom.blacklist {
            if number.chars().any(|c| blacklist.contains(&c)) {
                return Err(FilterReason::Blacklist);
            }
        }

        // 检查前缀
        if let Some(ref prefix) = self.custom.prefix {
            if !number.starts_with(prefix.as_str()) {
                return Err(FilterReason::Prefix);
            }
        }

        // 检查后缀
        if let Some(ref suffix) = self.custom.suffix {
            if !number.ends_with(suffix.as_str()) {
                return Err(FilterReason::Suffix);
            }
        }

        if counts.khac > self.khac_max {
            return Err(FilterReason::KhacMax);
        }
        if counts.bi_khac > self.bi_khac_max {
            return Err(FilterReason::BiKhacMax);
        }
        if counts.sinh < self.sinh_min {
            return Err(FilterReason::SinhMin);
        }
        if counts.cung < self.cung_min {
            return Err(FilterReason::CungMin);
        }
        if counts.negative() > self.tong_max {
            return Err(FilterReason::TongMax);
        }
        if counts.max_single() > self.any_max {
            return Err(FilterReason::AnyMax);
        }
        if let Some(max) = self.sinh_cung_max {
            if counts.sinh + counts.cung > max {
                return Err(FilterReason::SinhCungMax);
            }
        }
        if self.parity_balance && !has_parity_balance(candidate) {
            return Err(FilterReason::ParityBalance);
        }

        Ok(())
    }
}

/// 偶数位个数为 4 或 5，且前五位之和与其余各位之和都不是 8 的倍数
fn has_parity_balance(candidate: &CandidateNumber) -> bool {
    let digits: Vec<u32> = candidate.digits().map(|d| u32::from(d.value())).collect();

    let even = digits.iter().filter(|d| *d % 2 == 0).count();
    if !(4..=5).contains(&even) {
        return false;
    }

    let split = digits.len().min(5);
    let head: u32 = digits[..split].iter().sum();
    let tail: u32 = digits[split..].iter().sum();
    head % 8 != 0 && tail % 8 != 0
}

/// 判断号码是否通过筛选
pub fn passes(
    counts: &RelationCounts,
    cfg: &FilterConfig,
    candidate: &CandidateNumber,
) -> Result<(), FilterReason> {
    cfg.check(counts, candidate)
}
