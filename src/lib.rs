//! ts-catalog
//!
//! Qt Linguist `.ts` 翻訳カタログの読み込み・検証・参照

pub mod catalog;
pub mod cli;
pub mod config;
pub mod export;
pub mod indexer;
pub mod lint;
pub mod types;
