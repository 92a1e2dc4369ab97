//! Core模块 - 五行号码分析的全部核心逻辑

pub mod models;
pub mod element;
pub mod parser;
pub mod scorer;
pub mod filter;
pub mod engine;
