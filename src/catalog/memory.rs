//! 内存目录实现
//!
//! 用于测试和嵌入场景：宿主进程把练习/关卡定义一次性灌入。

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::exercises::entities::{ExerciseDefinition, Level};

use super::ContentCatalog;

#[derive(Default)]
pub struct InMemoryCatalog {
    exercises: RwLock<HashMap<i64, ExerciseDefinition>>,
    levels: RwLock<HashMap<i64, Level>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_exercise(&self, exercise: ExerciseDefinition) {
        self.exercises
            .write()
            .expect("Catalog lock poisoned")
            .insert(exercise.id, exercise);
    }

    pub fn insert_level(&self, level: Level) {
        self.levels
            .write()
            .expect("Catalog lock poisoned")
            .insert(level.id, level);
    }
}

#[async_trait]
impl ContentCatalog for InMemoryCatalog {
    async fn get_exercise(&self, exercise_id: i64) -> Result<Option<ExerciseDefinition>> {
        Ok(self
            .exercises
            .read()
            .expect("Catalog lock poisoned")
            .get(&exercise_id)
            .cloned())
    }

    async fn get_level(&self, level_id: i64) -> Result<Option<Level>> {
        Ok(self
            .levels
            .read()
            .expect("Catalog lock poisoned")
            .get(&level_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::exercises::entities::ExerciseSolution;

    #[tokio::test]
    async fn test_insert_and_get() {
        let catalog = InMemoryCatalog::new();
        catalog.insert_exercise(ExerciseDefinition {
            id: 7,
            level_id: 1,
            title: "变量声明".to_string(),
            points: 10,
            solution: ExerciseSolution::Code,
        });

        let found = catalog.get_exercise(7).await.unwrap();
        assert_eq!(found.unwrap().points, 10);
        assert!(catalog.get_exercise(8).await.unwrap().is_none());
    }
}
