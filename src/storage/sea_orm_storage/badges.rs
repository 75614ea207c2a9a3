use super::SeaOrmStorage;
use crate::entity::user_badges::{ActiveModel, Column, Entity as UserBadges};
use crate::errors::{LearnSystemError, Result};
use crate::models::badges::entities::AwardedBadge;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 列出用户已持有的徽章
    pub async fn list_user_badges_impl(&self, user_id: i64) -> Result<Vec<AwardedBadge>> {
        let rows = UserBadges::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_asc(Column::AwardedAt)
            .all(&self.db)
            .await
            .map_err(|e| LearnSystemError::database_operation(format!("查询徽章失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_awarded()).collect())
    }

    /// 授予徽章
    ///
    /// (user, badge) 唯一索引保证重复授予安静失败，返回 false。
    pub async fn insert_user_badge_impl(
        &self,
        user_id: i64,
        badge_id: &str,
        awarded_at: i64,
    ) -> Result<bool> {
        let model = ActiveModel {
            user_id: Set(user_id),
            badge_id: Set(badge_id.to_string()),
            awarded_at: Set(awarded_at),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(_) => Ok(true),
            Err(e) if Self::is_unique_violation(&e) => Ok(false),
            Err(e) => Err(LearnSystemError::database_operation(format!(
                "授予徽章失败: {e}"
            ))),
        }
    }
}
