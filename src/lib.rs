//! LearnSystem - 编程学习平台进度核心
//!
//! 基于 SeaORM 构建的练习判定、进度累积、游戏化与任务跟踪核心库。
//!
//! # 架构
//! - `cache`: 缓存层（Moka）
//! - `catalog`: 内容目录访问（练习/关卡定义，只读）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `evaluator`: 答案判定（纯函数）
//! - `models`: 数据模型定义
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层（进度/游戏化/任务/提交编排）
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod catalog;
pub mod config;
pub mod entity;
pub mod errors;
pub mod evaluator;
pub mod models;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
