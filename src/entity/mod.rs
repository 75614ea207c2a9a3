//! 数据库实体定义模块

pub mod assigned_tasks;
pub mod prelude;
pub mod user_badges;
pub mod user_progress;
pub mod user_stats;
