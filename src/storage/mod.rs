//! Storage模块 - 配置文件与结果导出

pub mod config;
pub mod export;
