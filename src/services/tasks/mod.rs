//! 任务跟踪服务
//!
//! 分配、进度跟踪、到期与续期。没有后台定时器：到期判定和按周期
//! 续期都在读/写路径上惰性发生。

mod assign;
mod renew;
mod track;

use std::sync::Arc;

use crate::errors::Result;
use crate::models::tasks::entities::AssignedTask;
use crate::storage::Storage;

pub struct TaskService {
    pub(crate) storage: Arc<dyn Storage>,
}

impl TaskService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// 列出用户全部任务，先惰性刷新到期/续期状态
    pub async fn list_user_tasks(
        &self,
        user_id: i64,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<AssignedTask>> {
        self.refresh_user_tasks(user_id, now).await?;
        Ok(self
            .storage
            .list_tasks_by_user(user_id)
            .await?
            .into_iter()
            .map(|v| v.value)
            .collect())
    }
}
