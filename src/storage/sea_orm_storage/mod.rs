//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。
//! 所有带 guarded 后缀的更新都以 lock_version 做 CAS。

mod badges;
mod progress;
mod stats;
mod tasks;

use crate::config::AppConfig;
use crate::errors::{LearnSystemError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;
        Self::new_with_url(&db_url, config.database.pool_size).await
    }

    /// 指定连接串和连接池大小创建实例
    ///
    /// 测试用 sqlite::memory: 时连接池必须为 1，每个连接各自是一个库。
    pub async fn new_with_url(url: &str, pool_size: u32) -> Result<Self> {
        let db = if url.starts_with("sqlite:") {
            Self::connect_sqlite(url, pool_size).await?
        } else {
            Self::connect_generic(url, pool_size).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| LearnSystemError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, pool_size: u32) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| LearnSystemError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| LearnSystemError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, pool_size: u32) -> Result<DatabaseConnection> {
        let timeout = AppConfig::get().database.timeout;
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(timeout))
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| LearnSystemError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(LearnSystemError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 是否为唯一约束冲突
    ///
    /// 三种后端的报错文案各不相同，只能按关键字匹配。
    pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
        let text = err.to_string();
        text.contains("UNIQUE constraint failed")
            || text.contains("duplicate key")
            || text.contains("Duplicate entry")
    }
}

// Storage trait 实现
use crate::models::{
    badges::entities::AwardedBadge,
    progress::entities::UserProgressRecord,
    stats::{entities::UserAggregateStats, responses::LeaderboardScope},
    tasks::entities::AssignedTask,
};
use crate::storage::{
    LeaderboardRow, NewAssignedTask, NewProgress, ProgressPatch, Storage, TaskPatch, Versioned,
    XpCommitOutcome,
};
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 进度模块
    async fn get_progress(
        &self,
        user_id: i64,
        exercise_id: i64,
    ) -> Result<Option<Versioned<UserProgressRecord>>> {
        self.get_progress_impl(user_id, exercise_id).await
    }

    async fn list_progress_by_user(&self, user_id: i64) -> Result<Vec<UserProgressRecord>> {
        self.list_progress_by_user_impl(user_id).await
    }

    async fn insert_progress(&self, fresh: NewProgress) -> Result<Option<UserProgressRecord>> {
        self.insert_progress_impl(fresh).await
    }

    async fn update_progress_guarded(
        &self,
        id: i64,
        expected_version: i64,
        patch: ProgressPatch,
    ) -> Result<bool> {
        self.update_progress_guarded_impl(id, expected_version, patch)
            .await
    }

    async fn list_pending_awards(&self, user_id: i64) -> Result<Vec<UserProgressRecord>> {
        self.list_pending_awards_impl(user_id).await
    }

    // 统计模块
    async fn get_stats(&self, user_id: i64) -> Result<Option<Versioned<UserAggregateStats>>> {
        self.get_stats_impl(user_id).await
    }

    async fn commit_xp_award(
        &self,
        record_id: i64,
        stats: &UserAggregateStats,
        expected_version: Option<i64>,
    ) -> Result<XpCommitOutcome> {
        self.commit_xp_award_impl(record_id, stats, expected_version)
            .await
    }

    async fn list_leaderboard(
        &self,
        scope: LeaderboardScope,
        window_start: i64,
        limit: u64,
    ) -> Result<Vec<LeaderboardRow>> {
        self.list_leaderboard_impl(scope, window_start, limit).await
    }

    // 徽章模块
    async fn list_user_badges(&self, user_id: i64) -> Result<Vec<AwardedBadge>> {
        self.list_user_badges_impl(user_id).await
    }

    async fn insert_user_badge(
        &self,
        user_id: i64,
        badge_id: &str,
        awarded_at: i64,
    ) -> Result<bool> {
        self.insert_user_badge_impl(user_id, badge_id, awarded_at)
            .await
    }

    // 任务模块
    async fn insert_task(&self, fresh: NewAssignedTask) -> Result<Option<AssignedTask>> {
        self.insert_task_impl(fresh).await
    }

    async fn list_tasks_by_user(&self, user_id: i64) -> Result<Vec<Versioned<AssignedTask>>> {
        self.list_tasks_by_user_impl(user_id).await
    }

    async fn update_task_guarded(
        &self,
        task_id: i64,
        expected_version: i64,
        patch: TaskPatch,
    ) -> Result<bool> {
        self.update_task_guarded_impl(task_id, expected_version, patch)
            .await
    }
}
