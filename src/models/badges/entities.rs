use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 徽章判据类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/badge.ts")]
pub enum BadgeCriterionType {
    Xp,        // 总 XP 达标
    Streak,    // 连续活跃天数达标
    Exercises, // 完成练习数达标
}

impl BadgeCriterionType {
    pub const XP: &'static str = "xp";
    pub const STREAK: &'static str = "streak";
    pub const EXERCISES: &'static str = "exercises";
}

impl<'de> Deserialize<'de> for BadgeCriterionType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            BadgeCriterionType::XP => Ok(BadgeCriterionType::Xp),
            BadgeCriterionType::STREAK => Ok(BadgeCriterionType::Streak),
            BadgeCriterionType::EXERCISES => Ok(BadgeCriterionType::Exercises),
            _ => Err(serde::de::Error::custom(format!(
                "无效的徽章判据类型: '{s}'. 支持的类型: xp, streak, exercises"
            ))),
        }
    }
}

impl std::fmt::Display for BadgeCriterionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BadgeCriterionType::Xp => write!(f, "xp"),
            BadgeCriterionType::Streak => write!(f, "streak"),
            BadgeCriterionType::Exercises => write!(f, "exercises"),
        }
    }
}

// 徽章判据（单一条件，各徽章相互独立）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/badge.ts")]
pub struct BadgeCriterion {
    #[serde(rename = "type")]
    pub criterion_type: BadgeCriterionType,
    pub threshold: i64,
}

// 徽章定义（不可变目录条目，进程启动时加载）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/badge.ts")]
pub struct BadgeDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: Option<String>,
    pub criterion: BadgeCriterion,
}

// 已授予的徽章
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/badge.ts")]
pub struct AwardedBadge {
    pub badge_id: String,
    pub awarded_at: chrono::DateTime<chrono::Utc>,
}
