use serde::Deserialize;
use ts_rs::TS;

/// 练习提交请求（HTTP 层透传，answer 为未校验的原始 JSON）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmitExerciseRequest {
    pub user_id: i64,
    pub exercise_id: i64,
    // 形状校验在 utils::validate 中按题型进行
    pub answer: serde_json::Value,
}
