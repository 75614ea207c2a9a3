//! 徽章注册表
//!
//! 不可变的徽章定义集合，进程启动时加载一次后注入游戏化引擎，
//! 不做全局可变状态，测试可以用 from_definitions 替换成任意注册表。

use std::collections::HashSet;
use std::path::Path;

use tracing::info;

use crate::errors::{LearnSystemError, Result};
use crate::models::badges::entities::{BadgeCriterion, BadgeCriterionType, BadgeDefinition};

#[derive(Debug, Clone)]
pub struct BadgeRegistry {
    badges: Vec<BadgeDefinition>,
}

impl BadgeRegistry {
    /// 从 JSON 文件加载徽章定义
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            LearnSystemError::badge_registry(format!(
                "读取徽章定义文件失败: {}: {e}",
                path.as_ref().display()
            ))
        })?;
        let badges: Vec<BadgeDefinition> = serde_json::from_str(&raw)
            .map_err(|e| LearnSystemError::badge_registry(format!("解析徽章定义失败: {e}")))?;
        let registry = Self::from_definitions(badges)?;
        info!(
            "Badge registry loaded from {} ({} badges)",
            path.as_ref().display(),
            registry.len()
        );
        Ok(registry)
    }

    /// 从内存定义构建注册表（测试注入口）
    pub fn from_definitions(badges: Vec<BadgeDefinition>) -> Result<Self> {
        let mut seen = HashSet::new();
        for badge in &badges {
            if !seen.insert(badge.id.as_str()) {
                return Err(LearnSystemError::badge_registry(format!(
                    "徽章 ID 重复: {}",
                    badge.id
                )));
            }
            if badge.criterion.threshold <= 0 {
                return Err(LearnSystemError::badge_registry(format!(
                    "徽章 {} 的阈值必须为正数: {}",
                    badge.id, badge.criterion.threshold
                )));
            }
        }
        Ok(Self { badges })
    }

    /// 内置默认徽章集（未配置定义文件时兜底）
    pub fn builtin_defaults() -> Self {
        fn badge(
            id: &str,
            name: &str,
            description: &str,
            criterion_type: BadgeCriterionType,
            threshold: i64,
        ) -> BadgeDefinition {
            BadgeDefinition {
                id: id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                icon: None,
                criterion: BadgeCriterion {
                    criterion_type,
                    threshold,
                },
            }
        }

        Self {
            badges: vec![
                badge(
                    "XP_NOVICE",
                    "初学者",
                    "累计获得 100 XP",
                    BadgeCriterionType::Xp,
                    100,
                ),
                badge(
                    "XP_ADEPT",
                    "进阶者",
                    "累计获得 1000 XP",
                    BadgeCriterionType::Xp,
                    1000,
                ),
                badge(
                    "XP_MASTER",
                    "大师",
                    "累计获得 10000 XP",
                    BadgeCriterionType::Xp,
                    10000,
                ),
                badge(
                    "STREAK_3",
                    "三日坚持",
                    "连续活跃 3 天",
                    BadgeCriterionType::Streak,
                    3,
                ),
                badge(
                    "STREAK_7",
                    "七日坚持",
                    "连续活跃 7 天",
                    BadgeCriterionType::Streak,
                    7,
                ),
                badge(
                    "STREAK_30",
                    "月度坚持",
                    "连续活跃 30 天",
                    BadgeCriterionType::Streak,
                    30,
                ),
                badge(
                    "EXERCISES_10",
                    "小试牛刀",
                    "完成 10 道练习",
                    BadgeCriterionType::Exercises,
                    10,
                ),
                badge(
                    "EXERCISES_50",
                    "勤学苦练",
                    "完成 50 道练习",
                    BadgeCriterionType::Exercises,
                    50,
                ),
                badge(
                    "EXERCISES_100",
                    "百题斩",
                    "完成 100 道练习",
                    BadgeCriterionType::Exercises,
                    100,
                ),
            ],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &BadgeDefinition> {
        self.badges.iter()
    }

    pub fn get(&self, badge_id: &str) -> Option<&BadgeDefinition> {
        self.badges.iter().find(|b| b.id == badge_id)
    }

    pub fn len(&self) -> usize {
        self.badges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.badges.is_empty()
    }
}
