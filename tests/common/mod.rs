//! 集成测试公共脚手架
//!
//! 每个用例一个独立的内存 SQLite 库；连接池固定为 1，
//! sqlite::memory: 的每个连接都是独立的库。

#![allow(dead_code)]

use std::sync::Arc;

use rust_learnsystem_next::catalog::{ContentCatalog, InMemoryCatalog};
use rust_learnsystem_next::models::badges::entities::{
    BadgeCriterion, BadgeCriterionType, BadgeDefinition,
};
use rust_learnsystem_next::models::badges::registry::BadgeRegistry;
use rust_learnsystem_next::models::exercises::entities::{
    ExerciseDefinition, ExerciseSolution, Level,
};
use rust_learnsystem_next::services::gamification::GamificationService;
use rust_learnsystem_next::services::progress::ProgressService;
use rust_learnsystem_next::services::submissions::SubmissionService;
use rust_learnsystem_next::services::tasks::TaskService;
use rust_learnsystem_next::storage::Storage;
use rust_learnsystem_next::storage::sea_orm_storage::SeaOrmStorage;

pub struct TestCore {
    pub storage: Arc<dyn Storage>,
    pub catalog: Arc<InMemoryCatalog>,
    pub progress: Arc<ProgressService>,
    pub gamification: Arc<GamificationService>,
    pub tasks: Arc<TaskService>,
    pub submissions: Arc<SubmissionService>,
}

pub async fn setup() -> TestCore {
    setup_with_badges(BadgeRegistry::builtin_defaults()).await
}

pub async fn setup_with_badges(badges: BadgeRegistry) -> TestCore {
    setup_with_storage(memory_storage().await, badges).await
}

pub async fn memory_storage() -> Arc<dyn Storage> {
    Arc::new(
        SeaOrmStorage::new_with_url("sqlite::memory:", 1)
            .await
            .expect("内存数据库初始化失败"),
    )
}

pub async fn setup_with_storage(storage: Arc<dyn Storage>, badges: BadgeRegistry) -> TestCore {
    let catalog = Arc::new(InMemoryCatalog::new());
    let catalog_dyn: Arc<dyn ContentCatalog> = catalog.clone();

    let progress = Arc::new(ProgressService::new(storage.clone(), catalog_dyn.clone()));
    let gamification = Arc::new(GamificationService::new(storage.clone(), Arc::new(badges)));
    let tasks = Arc::new(TaskService::new(storage.clone()));
    let submissions = Arc::new(SubmissionService::new(
        storage.clone(),
        catalog_dyn,
        progress.clone(),
        gamification.clone(),
        tasks.clone(),
    ));

    TestCore {
        storage,
        catalog,
        progress,
        gamification,
        tasks,
        submissions,
    }
}

/// 一道 points 分的多选题，正确答案 {a, c}
pub fn mc_exercise(id: i64, level_id: i64, points: i32) -> ExerciseDefinition {
    ExerciseDefinition {
        id,
        level_id,
        title: format!("练习 {id}"),
        points,
        solution: ExerciseSolution::MultipleChoice {
            correct_options: vec!["a".to_string(), "c".to_string()],
        },
    }
}

pub fn level(id: i64, exercise_ids: Vec<i64>) -> Level {
    Level {
        id,
        title: format!("关卡 {id}"),
        exercise_ids,
    }
}

pub fn xp_badge(id: &str, threshold: i64) -> BadgeDefinition {
    BadgeDefinition {
        id: id.to_string(),
        name: id.to_string(),
        description: String::new(),
        icon: None,
        criterion: BadgeCriterion {
            criterion_type: BadgeCriterionType::Xp,
            threshold,
        },
    }
}

/// 正确的多选作答（原始 JSON 形态，走完整校验管线）
pub fn correct_mc_answer() -> serde_json::Value {
    serde_json::json!({ "selected_options": ["c", "a"] })
}

pub fn wrong_mc_answer() -> serde_json::Value {
    serde_json::json!({ "selected_options": ["a"] })
}
