use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户练习进度（每个 (user, exercise) 对一条，单调棘轮）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/progress.ts")]
pub struct UserProgressRecord {
    pub id: i64,
    pub user_id: i64,
    pub exercise_id: i64,
    // 完成标志，一旦为 true 永不回退
    pub completed: bool,
    // 历史最高得分，只增不减
    pub best_points: i32,
    // 提交次数，无论对错都累加
    pub attempts: i32,
    pub last_submitted_at: chrono::DateTime<chrono::Utc>,
    // XP 是否已入账；完成后由游戏化引擎置位，作为幂等重试标记
    pub xp_granted: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 首次完成事件
///
/// (user, exercise) 对从未完成到完成的那一次转变，是 XP/徽章/任务
/// 副作用的唯一触发器。重复提交已完成的练习不会再产生该事件。
#[derive(Debug, Clone)]
pub struct FirstCompletion {
    pub user_id: i64,
    pub exercise_id: i64,
    // 本次应入账的 XP（等于练习分值）
    pub xp: i64,
    // 若该练习补齐了所在关卡的最后一个缺口，携带关卡 ID
    pub completed_level: Option<i64>,
}
