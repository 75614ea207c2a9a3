//! 实体预导入

pub use super::assigned_tasks::Entity as AssignedTasks;
pub use super::user_badges::Entity as UserBadges;
pub use super::user_progress::Entity as UserProgress;
pub use super::user_stats::Entity as UserStats;
