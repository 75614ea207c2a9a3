use std::sync::Arc;

use crate::models::{
    badges::entities::AwardedBadge,
    progress::entities::UserProgressRecord,
    stats::{entities::UserAggregateStats, responses::LeaderboardScope},
    tasks::entities::{AssignedTask, TaskMetrics, TaskRecurrence, TaskStatus},
};

use crate::errors::Result;

pub mod sea_orm_storage;

/// 带乐观锁版本号的读取结果
///
/// version 是读取时刻的 lock_version，guarded 更新以它为 CAS 期望值。
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    pub value: T,
    pub version: i64,
}

/// 新建进度行
#[derive(Debug, Clone)]
pub struct NewProgress {
    pub user_id: i64,
    pub exercise_id: i64,
    pub completed: bool,
    pub best_points: i32,
    pub last_submitted_at: i64,
}

/// 进度行的棘轮更新（写入完整新值，单调性由服务层保证）
#[derive(Debug, Clone)]
pub struct ProgressPatch {
    pub completed: bool,
    pub best_points: i32,
    pub attempts: i32,
    pub last_submitted_at: i64,
}

/// 新建任务行
#[derive(Debug, Clone)]
pub struct NewAssignedTask {
    pub user_id: i64,
    pub template_id: i64,
    pub title: String,
    pub recurrence: TaskRecurrence,
    pub auto_renew: bool,
    pub status: TaskStatus,
    pub period_start: i64,
    pub period_end: i64,
    pub targets: TaskMetrics,
}

/// 任务行的进度/状态更新
#[derive(Debug, Clone)]
pub struct TaskPatch {
    pub status: TaskStatus,
    pub current: TaskMetrics,
    pub completed_at: Option<i64>,
}

/// 排行榜行
#[derive(Debug, Clone)]
pub struct LeaderboardRow {
    pub user_id: i64,
    pub xp: i64,
}

/// XP 入账事务的结果
///
/// 领取标记置位和统计写入在同一事务里提交。AlreadyGranted 表示
/// 标记已被占用（奖励已入账），Conflict 表示统计行版本不符或
/// 并发首建，调用方重读后重试。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XpCommitOutcome {
    Committed,
    AlreadyGranted,
    Conflict,
}

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 进度管理方法
    // 获取某 (user, exercise) 对的进度
    async fn get_progress(
        &self,
        user_id: i64,
        exercise_id: i64,
    ) -> Result<Option<Versioned<UserProgressRecord>>>;
    // 列出用户全部进度
    async fn list_progress_by_user(&self, user_id: i64) -> Result<Vec<UserProgressRecord>>;
    // 新建进度行；(user, exercise) 已存在时返回 None（并发首次提交撞唯一索引）
    async fn insert_progress(&self, fresh: NewProgress) -> Result<Option<UserProgressRecord>>;
    // CAS 更新进度行，版本不符返回 false
    async fn update_progress_guarded(
        &self,
        id: i64,
        expected_version: i64,
        patch: ProgressPatch,
    ) -> Result<bool>;
    // 列出已完成但 XP 尚未入账的进度行
    async fn list_pending_awards(&self, user_id: i64) -> Result<Vec<UserProgressRecord>>;

    /// 统计管理方法
    // 获取用户聚合统计
    async fn get_stats(&self, user_id: i64) -> Result<Option<Versioned<UserAggregateStats>>>;
    // 单事务内置位进度行的 xp_granted 并写入统计行（expected_version
    // 为 None 时首建，否则按版本 CAS）；标记与入账同生共死
    async fn commit_xp_award(
        &self,
        record_id: i64,
        stats: &UserAggregateStats,
        expected_version: Option<i64>,
    ) -> Result<XpCommitOutcome>;
    // 读时排序的排行榜查询；daily/monthly 按窗口起点过滤
    async fn list_leaderboard(
        &self,
        scope: LeaderboardScope,
        window_start: i64,
        limit: u64,
    ) -> Result<Vec<LeaderboardRow>>;

    /// 徽章管理方法
    // 列出用户已持有的徽章
    async fn list_user_badges(&self, user_id: i64) -> Result<Vec<AwardedBadge>>;
    // 授予徽章；已持有时返回 false（唯一索引兜底）
    async fn insert_user_badge(&self, user_id: i64, badge_id: &str, awarded_at: i64)
    -> Result<bool>;

    /// 任务管理方法
    // 新建任务行；同 (user, template, period) 已存在时返回 None
    async fn insert_task(&self, fresh: NewAssignedTask) -> Result<Option<AssignedTask>>;
    // 列出用户全部任务
    async fn list_tasks_by_user(&self, user_id: i64) -> Result<Vec<Versioned<AssignedTask>>>;
    // CAS 更新任务行，版本不符返回 false
    async fn update_task_guarded(
        &self,
        task_id: i64,
        expected_version: i64,
        patch: TaskPatch,
    ) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
