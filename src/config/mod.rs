//! 配置管理
//!
//! 按 `config.toml` → `config.{APP_ENV}.toml` → `EDU_*` 环境变量（层级用 `__` 分隔）的顺序叠加。

mod r#impl;
mod structs;

pub use structs::*;
