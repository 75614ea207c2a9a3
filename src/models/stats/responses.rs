use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 排行榜口径
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub enum LeaderboardScope {
    Total,   // 总 XP
    Daily,   // 当日 XP 桶
    Monthly, // 当月 XP 桶
}

impl LeaderboardScope {
    pub const TOTAL: &'static str = "total";
    pub const DAILY: &'static str = "daily";
    pub const MONTHLY: &'static str = "monthly";
}

impl<'de> Deserialize<'de> for LeaderboardScope {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            LeaderboardScope::TOTAL => Ok(LeaderboardScope::Total),
            LeaderboardScope::DAILY => Ok(LeaderboardScope::Daily),
            LeaderboardScope::MONTHLY => Ok(LeaderboardScope::Monthly),
            _ => Err(serde::de::Error::custom(format!(
                "无效的排行榜口径: '{s}'. 支持的口径: total, daily, monthly"
            ))),
        }
    }
}

impl std::fmt::Display for LeaderboardScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaderboardScope::Total => write!(f, "total"),
            LeaderboardScope::Daily => write!(f, "daily"),
            LeaderboardScope::Monthly => write!(f, "monthly"),
        }
    }
}

impl std::str::FromStr for LeaderboardScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "total" => Ok(LeaderboardScope::Total),
            "daily" => Ok(LeaderboardScope::Daily),
            "monthly" => Ok(LeaderboardScope::Monthly),
            _ => Err(format!("Invalid leaderboard scope: {s}")),
        }
    }
}

// 排行榜条目
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub user_id: i64,
    pub xp: i64,
}

// 排行榜响应（读时排序，无物化榜单）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct LeaderboardResponse {
    pub scope: LeaderboardScope,
    pub entries: Vec<LeaderboardEntry>,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}
