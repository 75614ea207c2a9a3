use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::exercises::entities::ExerciseKind;

// 答案载荷（和题型一一对应，形状在类型层面绑定）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub enum AnswerPayload {
    MultipleChoice { selected_options: Vec<String> },
    Ordering { sequence: Vec<String> },
    BlockArrangement { sequence: Vec<String> },
    FillInBlank { text: String },
    TextInput { text: String },
    SpotTheError { index: u32 },
    // passed 来自外部判题服务，评估器原样信任
    Code { passed: bool },
}

impl AnswerPayload {
    pub fn kind(&self) -> ExerciseKind {
        match self {
            AnswerPayload::MultipleChoice { .. } => ExerciseKind::MultipleChoice,
            AnswerPayload::Ordering { .. } => ExerciseKind::Ordering,
            AnswerPayload::BlockArrangement { .. } => ExerciseKind::BlockArrangement,
            AnswerPayload::FillInBlank { .. } => ExerciseKind::FillInBlank,
            AnswerPayload::TextInput { .. } => ExerciseKind::TextInput,
            AnswerPayload::SpotTheError { .. } => ExerciseKind::SpotTheError,
            AnswerPayload::Code { .. } => ExerciseKind::Code,
        }
    }
}

// 评估结果（瞬时值，不落库）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct EvaluationResult {
    pub correct: bool,
    pub points_earned: i32,
    pub points_max: i32,
    // 面向客户端展示的自由格式明细（命中数、错位下标等）
    pub details: serde_json::Value,
}
