//! 分析引擎模块
//!
//! 串联 解析 → 评分 → 筛选 三个阶段，提供批量分析与单号快速检查两个入口。
//!
//! 每个号码的评分和筛选只读取共享的只读配置，因此批量阶段用 rayon 并行处理，
//! 最后按 分数降序 / 原始顺序升序 重新排序，保证结果确定。

use crate::core::element::ElementTable;
use crate::core::models::{
    AnalysisResult, AnalysisSettings, CandidateNumber, Config, ConfigError, FilterReason,
    QuickCheckResult, FORMAT_REASON,
};
use crate::core::parser::Parser;
use crate::core::scorer::Scorer;
use rayon::prelude::*;
use std::cmp::Ordering;

/// 分析引擎
#[derive(Debug, Clone, Default)]
pub struct Engine {
    table: ElementTable,
    parser: Parser,
}

impl Engine {
    /// 使用指定五行表创建引擎
    pub fn new(table: ElementTable) -> Self {
        Self {
            table,
            parser: Parser::new(),
        }
    }

    /// 替换号码解析器
    pub fn with_parser(mut self, parser: Parser) -> Self {
        self.parser = parser;
        self
    }

    /// 批量分析：配置不合法时整体失败
    pub fn analyze(
        &self,
        raw_text: &str,
        config: &Config,
    ) -> Result<Vec<AnalysisResult>, ConfigError> {
        let settings = config.validate()?;
        Ok(self.analyze_with(raw_text, &settings))
    }

    /// 使用已校验的参数批量分析
    pub fn analyze_with(&self, raw_text: &str, settings: &AnalysisSettings) -> Vec<AnalysisResult> {
        let candidates = self.parser.parse(raw_text);

        let mut ranked: Vec<(usize, AnalysisResult)> = candidates
            .par_iter()
            .enumerate()
            .filter_map(|(index, candidate)| match self.evaluate(candidate, settings) {
                Ok(score) => Some((
                    index,
                    AnalysisResult {
                        number: candidate.as_str().to_string(),
                        score,
                    },
                )),
                Err(reason) => {
                    tracing::debug!("号码 {} 未通过筛选: {}", candidate, reason);
                    None
                }
            })
            .collect();

        ranked.sort_by(|(ia, a), (ib, b)| rank_order(a.score, b.score).then(ia.cmp(ib)));

        tracing::info!(
            "分析完成：共 {} 个候选号码，{} 个通过筛选",
            candidates.len(),
            ranked.len()
        );

        ranked.into_iter().map(|(_, result)| result).collect()
    }

    /// 单号快速检查：配置不合法时返回错误，号码问题通过 `Invalid` 报告
    pub fn quick_check(
        &self,
        number: &str,
        config: &Config,
    ) -> Result<QuickCheckResult, ConfigError> {
        let settings = config.validate()?;
        Ok(self.quick_check_with(number, &settings))
    }

    /// 使用已校验的参数检查单个号码
    pub fn quick_check_with(&self, number: &str, settings: &AnalysisSettings) -> QuickCheckResult {
        let candidate = match self.parser.parse_single(number) {
            Some(c) => c,
            None => {
                return QuickCheckResult::Invalid {
                    reason: FORMAT_REASON.to_string(),
                }
            }
        };

        match self.evaluate(&candidate, settings) {
            Ok(score) => QuickCheckResult::Valid { score },
            Err(reason) => QuickCheckResult::Invalid {
                reason: reason.code(),
            },
        }
    }

    /// 评分并筛选单个号码
    fn evaluate(
        &self,
        candidate: &CandidateNumber,
        settings: &AnalysisSettings,
    ) -> Result<f64, FilterReason> {
        let (counts, score) = Scorer::new(&self.table).score(
            candidate,
            settings.user,
            &settings.scoring,
            settings.mode,
            settings.toggles,
        );
        debug_assert_eq!(counts.total() as usize, candidate.len());

        settings.filter.check(&counts, candidate)?;
        Ok(score)
    }
}

/// 分数降序；-0.0 与 0.0 视为相等
fn rank_order(a: f64, b: f64) -> Ordering {
    let normalize = |s: f64| if s == 0.0 { 0.0 } else { s };
    normalize(b).total_cmp(&normalize(a))
}

/// 使用标准五行表批量分析
pub fn analyze(raw_text: &str, config: &Config) -> Result<Vec<AnalysisResult>, ConfigError> {
    Engine::default().analyze(raw_text, config)
}

/// 使用标准五行表检查单个号码
pub fn quick_check_single_number(
    number: &str,
    config: &Config,
) -> Result<QuickCheckResult, ConfigError> {
    Engine::default().quick_check(number, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Element;

    fn numbers(results: &[AnalysisResult]) -> Vec<&str> {
        results.iter().map(|r| r.number.as_str()).collect()
    }

    #[test]
    fn test_analyze_ranks_by_score() {
        // 分数（本命 Kim，默认权重）：0866772813 = 20, 0977886621 = 16, 0962771358 = 15
        let text = "0962771358\n0999999999\n0866772813\nhello\n0977886621\n";
        let results = analyze(text, &Config::default()).unwrap();

        assert_eq!(
            numbers(&results),
            vec!["0866772813", "0977886621", "0962771358"]
        );
        assert_eq!(results[0].score, 20.0);
        assert_eq!(results[1].score, 16.0);
        assert_eq!(results[2].score, 15.0);
    }

    #[test]
    fn test_ties_keep_input_order() {
        // 三个号码分数都是 15
        let text = "0386672159\n0962771358\n0328677159\n";
        let results = analyze(text, &Config::default()).unwrap();
        assert_eq!(
            numbers(&results),
            vec!["0386672159", "0962771358", "0328677159"]
        );
    }

    #[test]
    fn test_duplicates_are_kept() {
        let results = analyze("0866772813\n0866772813\n", &Config::default()).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_empty_and_malformed_input() {
        assert!(analyze("", &Config::default()).unwrap().is_empty());
        assert!(analyze("abc\n123\n\n", &Config::default()).unwrap().is_empty());
    }

    #[test]
    fn test_config_error_fails_whole_call() {
        let config = Config {
            user_menh: "Gỗ".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            analyze("0866772813", &config),
            Err(ConfigError::UnknownElement(_))
        ));
        assert!(matches!(
            quick_check_single_number("0866772813", &config),
            Err(ConfigError::UnknownElement(_))
        ));
    }

    #[test]
    fn test_quick_check_valid() {
        let result = quick_check_single_number("086-677-2813", &Config::default()).unwrap();
        assert_eq!(result, QuickCheckResult::Valid { score: 20.0 });
    }

    #[test]
    fn test_quick_check_format() {
        for input in ["", "abc", "09123", "0912345678x"] {
            let result = quick_check_single_number(input, &Config::default()).unwrap();
            assert_eq!(
                result,
                QuickCheckResult::Invalid {
                    reason: "format".to_string()
                }
            );
        }
    }

    #[test]
    fn test_quick_check_reports_first_violation() {
        let result = quick_check_single_number("0999999999", &Config::default()).unwrap();
        assert_eq!(
            result,
            QuickCheckResult::Invalid {
                reason: "khac_max".to_string()
            }
        );

        let config = Config {
            toggle_blacklist_filter: true,
            blacklist_digits: "4".to_string(),
            ..Config::default()
        };
        let result = quick_check_single_number("0912345678", &config).unwrap();
        assert_eq!(
            result,
            QuickCheckResult::Invalid {
                reason: "blacklist".to_string()
            }
        );
    }

    #[test]
    fn test_custom_table_is_used() {
        let standard = ElementTable::standard();
        // 所有数字都归 Kim：对本命 Kim 全部为 cùng
        let table = ElementTable::new(
            [Element::Kim; 10],
            [Element::Kim, Element::Thuy, Element::Moc, Element::Hoa, Element::Tho],
            [[0; 5]; 5],
        )
        .unwrap();
        assert_ne!(&table, &standard);

        let config = Config {
            filter_sinh_min: 0,
            filter_any_max: 10,
            ..Config::default()
        };
        let engine = Engine::new(table);
        let result = engine.quick_check("0866772813", &config).unwrap();
        assert_eq!(result, QuickCheckResult::Valid { score: 20.0 });
    }

    #[test]
    fn test_custom_parser_is_used() {
        let engine = Engine::default().with_parser(Parser::new().with_length_range(3, 4));
        let config = Config {
            filter_khac_max: 10,
            filter_bi_khac_max: 10,
            filter_sinh_min: 0,
            filter_cung_min: 0,
            filter_tong_max: 10,
            filter_any_max: 10,
            ..Config::default()
        };

        // 613：cùng 2 + sinh xuất -1 + bị khắc 1
        let results = engine.analyze("613\n0866772813\n", &config).unwrap();
        assert_eq!(numbers(&results), vec!["613"]);
        assert_eq!(results[0].score, 2.0);

        let result = engine.quick_check("0866772813", &config).unwrap();
        assert_eq!(
            result,
            QuickCheckResult::Invalid {
                reason: "format".to_string()
            }
        );
    }

    #[test]
    fn test_separated_prefix_matches_number() {
        let config = Config {
            toggle_prefix_filter: true,
            prefix_value: "086-6".to_string(),
            toggle_suffix_filter: true,
            suffix_value: "28 13".to_string(),
            ..Config::default()
        };
        let result = quick_check_single_number("086-677-2813", &config).unwrap();
        assert_eq!(result, QuickCheckResult::Valid { score: 20.0 });

        let results = analyze("0866772813\n0977886621\n", &config).unwrap();
        assert_eq!(numbers(&results), vec!["0866772813"]);
    }

    #[test]
    fn test_bare_carriage_return_separates_numbers() {
        let results = analyze("0866772813\r0866772813", &Config::default()).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_optional_filters_follow_original_rules() {
        // 0866772813 有 6 个偶数位
        let config = Config {
            toggle_parity_balance: true,
            ..Config::default()
        };
        let result = quick_check_single_number("0866772813", &config).unwrap();
        assert_eq!(
            result,
            QuickCheckResult::Invalid {
                reason: "parity_balance".to_string()
            }
        );

        // 本命 Kim：0866772813 的 sinh 4 + cùng 4
        let config = Config {
            filter_sinh_cung_max: Some(5),
            ..Config::default()
        };
        let result = quick_check_single_number("0866772813", &config).unwrap();
        assert_eq!(
            result,
            QuickCheckResult::Invalid {
                reason: "sinh_cung_max".to_string()
            }
        );

        // 0328677159：sinh 4 + cùng 3，偶数位 4 个，两段和 19 / 29
        let config = Config {
            toggle_parity_balance: true,
            filter_sinh_cung_max: Some(7),
            ..Config::default()
        };
        let results = analyze("0866772813\n0328677159\n0962771358\n", &config).unwrap();
        assert_eq!(numbers(&results), vec!["0328677159"]);
        assert_eq!(results[0].score, 15.0);
    }

    #[test]
    fn test_rank_order_treats_signed_zero_equal() {
        assert_eq!(rank_order(0.0, -0.0), Ordering::Equal);
        assert_eq!(rank_order(1.0, 2.0), Ordering::Greater);
        assert_eq!(rank_order(2.0, 1.0), Ordering::Less);
    }
}
