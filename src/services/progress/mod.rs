//! 进度累积服务
//!
//! 维护 (user, exercise) 进度行的单调棘轮语义，并在首次完成时
//! 产出 FirstCompletion 事件供下游（XP/徽章/任务）消费。

mod record;

use std::sync::Arc;

use crate::catalog::ContentCatalog;
use crate::errors::Result;
use crate::models::progress::entities::UserProgressRecord;
use crate::storage::Storage;

pub struct ProgressService {
    pub(crate) storage: Arc<dyn Storage>,
    pub(crate) catalog: Arc<dyn ContentCatalog>,
}

impl ProgressService {
    pub fn new(storage: Arc<dyn Storage>, catalog: Arc<dyn ContentCatalog>) -> Self {
        Self { storage, catalog }
    }

    /// 查询单个练习的进度
    pub async fn get_progress(
        &self,
        user_id: i64,
        exercise_id: i64,
    ) -> Result<Option<UserProgressRecord>> {
        Ok(self
            .storage
            .get_progress(user_id, exercise_id)
            .await?
            .map(|v| v.value))
    }

    /// 列出用户全部进度
    pub async fn list_progress(&self, user_id: i64) -> Result<Vec<UserProgressRecord>> {
        self.storage.list_progress_by_user(user_id).await
    }
}
