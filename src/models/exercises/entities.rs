use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 练习题型（封闭集合）
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/exercise.ts")]
pub enum ExerciseKind {
    MultipleChoice,   // 多选题
    Code,             // 代码题
    Ordering,         // 排序题
    FillInBlank,      // 填空题
    TextInput,        // 文本输入题
    SpotTheError,     // 找错题
    BlockArrangement, // 积木排列题
}

impl ExerciseKind {
    pub const MULTIPLE_CHOICE: &'static str = "multiple_choice";
    pub const CODE: &'static str = "code";
    pub const ORDERING: &'static str = "ordering";
    pub const FILL_IN_BLANK: &'static str = "fill_in_blank";
    pub const TEXT_INPUT: &'static str = "text_input";
    pub const SPOT_THE_ERROR: &'static str = "spot_the_error";
    pub const BLOCK_ARRANGEMENT: &'static str = "block_arrangement";

    pub fn all_kinds() -> &'static [&'static str] {
        &[
            Self::MULTIPLE_CHOICE,
            Self::CODE,
            Self::ORDERING,
            Self::FILL_IN_BLANK,
            Self::TEXT_INPUT,
            Self::SPOT_THE_ERROR,
            Self::BLOCK_ARRANGEMENT,
        ]
    }
}

impl<'de> Deserialize<'de> for ExerciseKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的练习题型: '{s}'. 支持的题型: {}",
                ExerciseKind::all_kinds().join(", ")
            ))
        })
    }
}

impl std::fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExerciseKind::MultipleChoice => write!(f, "{}", ExerciseKind::MULTIPLE_CHOICE),
            ExerciseKind::Code => write!(f, "{}", ExerciseKind::CODE),
            ExerciseKind::Ordering => write!(f, "{}", ExerciseKind::ORDERING),
            ExerciseKind::FillInBlank => write!(f, "{}", ExerciseKind::FILL_IN_BLANK),
            ExerciseKind::TextInput => write!(f, "{}", ExerciseKind::TEXT_INPUT),
            ExerciseKind::SpotTheError => write!(f, "{}", ExerciseKind::SPOT_THE_ERROR),
            ExerciseKind::BlockArrangement => write!(f, "{}", ExerciseKind::BLOCK_ARRANGEMENT),
        }
    }
}

impl std::str::FromStr for ExerciseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::MULTIPLE_CHOICE => Ok(ExerciseKind::MultipleChoice),
            Self::CODE => Ok(ExerciseKind::Code),
            Self::ORDERING => Ok(ExerciseKind::Ordering),
            Self::FILL_IN_BLANK => Ok(ExerciseKind::FillInBlank),
            Self::TEXT_INPUT => Ok(ExerciseKind::TextInput),
            Self::SPOT_THE_ERROR => Ok(ExerciseKind::SpotTheError),
            Self::BLOCK_ARRANGEMENT => Ok(ExerciseKind::BlockArrangement),
            _ => Err(format!("Invalid exercise kind: {s}")),
        }
    }
}

// 题型专属的标准答案（和题型一一对应的和类型）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/exercise.ts")]
pub enum ExerciseSolution {
    MultipleChoice { correct_options: Vec<String> },
    Ordering { sequence: Vec<String> },
    BlockArrangement { sequence: Vec<String> },
    FillInBlank { expected: String },
    TextInput { expected: String },
    SpotTheError { index: u32 },
    // 代码题由外部判题信号决定，本体不携带答案
    Code,
}

impl ExerciseSolution {
    pub fn kind(&self) -> ExerciseKind {
        match self {
            ExerciseSolution::MultipleChoice { .. } => ExerciseKind::MultipleChoice,
            ExerciseSolution::Ordering { .. } => ExerciseKind::Ordering,
            ExerciseSolution::BlockArrangement { .. } => ExerciseKind::BlockArrangement,
            ExerciseSolution::FillInBlank { .. } => ExerciseKind::FillInBlank,
            ExerciseSolution::TextInput { .. } => ExerciseKind::TextInput,
            ExerciseSolution::SpotTheError { .. } => ExerciseKind::SpotTheError,
            ExerciseSolution::Code => ExerciseKind::Code,
        }
    }
}

// 练习定义（内容目录子系统所有，对本核心只读）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exercise.ts")]
pub struct ExerciseDefinition {
    // 唯一 ID
    pub id: i64,
    // 所属关卡 ID
    pub level_id: i64,
    // 练习标题
    pub title: String,
    // 练习分值（答对得满分，答错 0 分）
    pub points: i32,
    // 题型专属答案
    pub solution: ExerciseSolution,
}

impl ExerciseDefinition {
    pub fn kind(&self) -> ExerciseKind {
        self.solution.kind()
    }
}

// 关卡定义（用于 levels_completed 汇总）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exercise.ts")]
pub struct Level {
    pub id: i64,
    pub title: String,
    // 关卡内全部练习 ID，全部完成即视为通关
    pub exercise_ids: Vec<i64>,
}
