//! 提交编排服务
//!
//! 单次提交的完整管线：待入账奖励结算 → 取练习定义 → 校验答案
//! 载荷 → 判定 → 进度棘轮 → 首次完成的 XP/徽章/任务副作用。

mod settle;
mod submit;

use std::sync::Arc;

use crate::catalog::ContentCatalog;
use crate::services::gamification::GamificationService;
use crate::services::progress::ProgressService;
use crate::services::tasks::TaskService;
use crate::storage::Storage;
use crate::utils::keyed_lock::KeyedLocks;

pub struct SubmissionService {
    pub(crate) storage: Arc<dyn Storage>,
    pub(crate) catalog: Arc<dyn ContentCatalog>,
    pub(crate) progress: Arc<ProgressService>,
    pub(crate) gamification: Arc<GamificationService>,
    pub(crate) tasks: Arc<TaskService>,
    pub(crate) locks: KeyedLocks,
}

impl SubmissionService {
    pub fn new(
        storage: Arc<dyn Storage>,
        catalog: Arc<dyn ContentCatalog>,
        progress: Arc<ProgressService>,
        gamification: Arc<GamificationService>,
        tasks: Arc<TaskService>,
    ) -> Self {
        Self {
            storage,
            catalog,
            progress,
            gamification,
            tasks,
            locks: KeyedLocks::new(),
        }
    }
}
