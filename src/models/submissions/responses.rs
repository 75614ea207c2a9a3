use serde::Serialize;
use ts_rs::TS;

/// 练习提交响应
///
/// correct / points 永远可信；xp_earned 与 new_badges 是尽力而为的结果，
/// 缺失只代表"本次响应未确认"，不代表没有授予。
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmitExerciseResponse {
    pub correct: bool,
    pub points_earned: i32,
    pub points_max: i32,
    pub xp_earned: i64,
    pub new_badges: Vec<String>,
    pub details: serde_json::Value,
}
