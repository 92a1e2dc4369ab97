//! calsdt - 五行（Ngũ Hành）号码分析工具
//!
//! 核心只做纯计算：输入原始文本和配置记录，输出排序后的结果或单号检查结论。
//! 文件读写、界面展示都在核心之外。

pub mod core;
pub mod storage;

pub use crate::core::engine::{analyze, quick_check_single_number, Engine};
pub use crate::core::models::{AnalysisResult, Config, ConfigError, QuickCheckResult};
