//! 结果导出模块
//!
//! 每行一个号码：`<号码>  score=<两位小数>`。

use crate::core::models::AnalysisResult;
use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use std::path::Path;

/// 渲染导出文本，行之间以换行分隔
pub fn format_results(results: &[AnalysisResult]) -> String {
    results
        .iter()
        .map(|r| format!("{}  score={:.2}", r.number, r.score))
        .collect::<Vec<_>>()
        .join("\n")
}

/// 默认导出文件名，例如 `ket_qua_20240615_120000.txt`
pub fn export_file_name<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("ket_qua_{}.txt", timestamp.format("%Y%m%d_%H%M%S"))
}

/// 写入导出文件
pub fn write_results(path: &Path, results: &[AnalysisResult]) -> Result<()> {
    // 确保目录存在
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(path, format_results(results))
        .with_context(|| format!("写入结果文件失败: {}", path.display()))?;

    tracing::info!("已写入 {} 条结果到 {}", results.len(), path.display());
    Ok(())
}
