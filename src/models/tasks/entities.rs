use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 任务状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub enum TaskStatus {
    Pending,    // 已分配，尚无进度
    InProgress, // 已有进度
    Completed,  // 全部非零目标达成
    Expired,    // 周期结束仍未完成
}

impl TaskStatus {
    pub const PENDING: &'static str = "pending";
    pub const IN_PROGRESS: &'static str = "in_progress";
    pub const COMPLETED: &'static str = "completed";
    pub const EXPIRED: &'static str = "expired";

    /// 是否还能接受进度事件
    pub fn is_active(&self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::InProgress)
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的任务状态: '{s}'. 支持的状态: pending, in_progress, completed, expired"
            ))
        })
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "{}", TaskStatus::PENDING),
            TaskStatus::InProgress => write!(f, "{}", TaskStatus::IN_PROGRESS),
            TaskStatus::Completed => write!(f, "{}", TaskStatus::COMPLETED),
            TaskStatus::Expired => write!(f, "{}", TaskStatus::EXPIRED),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::PENDING => Ok(TaskStatus::Pending),
            Self::IN_PROGRESS => Ok(TaskStatus::InProgress),
            Self::COMPLETED => Ok(TaskStatus::Completed),
            Self::EXPIRED => Ok(TaskStatus::Expired),
            _ => Err(format!("Invalid task status: {s}")),
        }
    }
}

// 任务周期类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub enum TaskRecurrence {
    Once,   // 一次性任务，不续期
    Daily,  // 按日续期
    Weekly, // 按周续期
}

impl TaskRecurrence {
    pub const ONCE: &'static str = "once";
    pub const DAILY: &'static str = "daily";
    pub const WEEKLY: &'static str = "weekly";

    /// 周期长度（秒），一次性任务无固定长度
    pub fn period_seconds(&self) -> Option<i64> {
        match self {
            TaskRecurrence::Once => None,
            TaskRecurrence::Daily => Some(86_400),
            TaskRecurrence::Weekly => Some(7 * 86_400),
        }
    }
}

impl<'de> Deserialize<'de> for TaskRecurrence {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的任务周期: '{s}'. 支持的周期: once, daily, weekly"
            ))
        })
    }
}

impl std::fmt::Display for TaskRecurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskRecurrence::Once => write!(f, "{}", TaskRecurrence::ONCE),
            TaskRecurrence::Daily => write!(f, "{}", TaskRecurrence::DAILY),
            TaskRecurrence::Weekly => write!(f, "{}", TaskRecurrence::WEEKLY),
        }
    }
}

impl std::str::FromStr for TaskRecurrence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::ONCE => Ok(TaskRecurrence::Once),
            Self::DAILY => Ok(TaskRecurrence::Daily),
            Self::WEEKLY => Ok(TaskRecurrence::Weekly),
            _ => Err(format!("Invalid task recurrence: {s}")),
        }
    }
}

// 任务指标种类
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub enum MetricKind {
    ExercisesSubmitted,
    LevelsCompleted,
    HoursSpent,
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricKind::ExercisesSubmitted => write!(f, "exercises_submitted"),
            MetricKind::LevelsCompleted => write!(f, "levels_completed"),
            MetricKind::HoursSpent => write!(f, "hours_spent"),
        }
    }
}

// 任务指标组（目标为 0 表示该指标不跟踪）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub struct TaskMetrics {
    pub exercises_submitted: i32,
    pub levels_completed: i32,
    pub hours_spent: f64,
}

impl TaskMetrics {
    pub fn zero() -> Self {
        Self {
            exercises_submitted: 0,
            levels_completed: 0,
            hours_spent: 0.0,
        }
    }

    /// 指标是否被该目标组跟踪
    pub fn tracks(&self, kind: MetricKind) -> bool {
        match kind {
            MetricKind::ExercisesSubmitted => self.exercises_submitted > 0,
            MetricKind::LevelsCompleted => self.levels_completed > 0,
            MetricKind::HoursSpent => self.hours_spent > 0.0,
        }
    }

    /// 把 delta 记入指标，按 target 截断（超出目标的进度不再记录）
    pub fn add_clamped(&mut self, kind: MetricKind, delta: f64, target: &TaskMetrics) {
        match kind {
            MetricKind::ExercisesSubmitted => {
                self.exercises_submitted = (self.exercises_submitted + delta as i32)
                    .min(target.exercises_submitted)
                    .max(self.exercises_submitted);
            }
            MetricKind::LevelsCompleted => {
                self.levels_completed = (self.levels_completed + delta as i32)
                    .min(target.levels_completed)
                    .max(self.levels_completed);
            }
            MetricKind::HoursSpent => {
                self.hours_spent = (self.hours_spent + delta)
                    .min(target.hours_spent)
                    .max(self.hours_spent);
            }
        }
    }

    /// 所有非零目标是否都已达成
    pub fn meets(&self, target: &TaskMetrics) -> bool {
        (target.exercises_submitted == 0 || self.exercises_submitted >= target.exercises_submitted)
            && (target.levels_completed == 0 || self.levels_completed >= target.levels_completed)
            && (target.hours_spent == 0.0 || self.hours_spent >= target.hours_spent)
    }
}

// 已分配任务（每 (user, template, period) 三元组一条）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub struct AssignedTask {
    pub id: i64,
    pub user_id: i64,
    pub template_id: i64,
    pub title: String,
    pub recurrence: TaskRecurrence,
    pub auto_renew: bool,
    pub status: TaskStatus,
    pub period_start: chrono::DateTime<chrono::Utc>,
    pub period_end: chrono::DateTime<chrono::Utc>,
    pub targets: TaskMetrics,
    pub current: TaskMetrics,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets() -> TaskMetrics {
        TaskMetrics {
            exercises_submitted: 3,
            levels_completed: 0,
            hours_spent: 0.0,
        }
    }

    #[test]
    fn test_untracked_metric() {
        let t = targets();
        assert!(t.tracks(MetricKind::ExercisesSubmitted));
        assert!(!t.tracks(MetricKind::LevelsCompleted));
        assert!(!t.tracks(MetricKind::HoursSpent));
    }

    #[test]
    fn test_add_clamped_never_exceeds_target() {
        let t = targets();
        let mut current = TaskMetrics::zero();
        current.add_clamped(MetricKind::ExercisesSubmitted, 10.0, &t);
        assert_eq!(current.exercises_submitted, 3);
    }

    #[test]
    fn test_meets_ignores_zero_targets() {
        let t = targets();
        let current = TaskMetrics {
            exercises_submitted: 3,
            levels_completed: 0,
            hours_spent: 0.0,
        };
        assert!(current.meets(&t));
    }

    #[test]
    fn test_meets_requires_all_nonzero_targets() {
        let t = TaskMetrics {
            exercises_submitted: 2,
            levels_completed: 1,
            hours_spent: 0.0,
        };
        let current = TaskMetrics {
            exercises_submitted: 2,
            levels_completed: 0,
            hours_spent: 0.0,
        };
        assert!(!current.meets(&t));
    }
}
