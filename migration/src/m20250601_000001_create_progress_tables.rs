use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户练习进度表
        manager
            .create_table(
                Table::create()
                    .table(UserProgress::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserProgress::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserProgress::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserProgress::ExerciseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserProgress::Completed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(UserProgress::BestPoints)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserProgress::Attempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserProgress::LastSubmittedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserProgress::XpGranted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(UserProgress::LockVersion)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserProgress::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserProgress::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建用户聚合统计表（每个用户一行，user_id 为主键）
        manager
            .create_table(
                Table::create()
                    .table(UserStats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserStats::UserId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserStats::TotalXp)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserStats::ExercisesCompleted)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserStats::LevelsCompleted)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserStats::CompletedLevelIds)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserStats::DailyWindowStart)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserStats::DailyXp)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserStats::MonthlyWindowStart)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserStats::MonthlyXp)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserStats::StreakDays)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserStats::LastActiveDay)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserStats::LockVersion)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserStats::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserStats::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建用户徽章表（只增不删）
        manager
            .create_table(
                Table::create()
                    .table(UserBadges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserBadges::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserBadges::UserId).big_integer().not_null())
                    .col(ColumnDef::new(UserBadges::BadgeId).string().not_null())
                    .col(
                        ColumnDef::new(UserBadges::AwardedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建任务分配表
        manager
            .create_table(
                Table::create()
                    .table(AssignedTasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AssignedTasks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AssignedTasks::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssignedTasks::TemplateId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AssignedTasks::Title).string().not_null())
                    .col(
                        ColumnDef::new(AssignedTasks::Recurrence)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssignedTasks::AutoRenew)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(AssignedTasks::Status).string().not_null())
                    .col(
                        ColumnDef::new(AssignedTasks::PeriodStart)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssignedTasks::PeriodEnd)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssignedTasks::TargetExercises)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AssignedTasks::TargetLevels)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AssignedTasks::TargetHours)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(AssignedTasks::CurrentExercises)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AssignedTasks::CurrentLevels)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AssignedTasks::CurrentHours)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(AssignedTasks::CompletedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AssignedTasks::LockVersion)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AssignedTasks::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssignedTasks::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        // 进度表：同一 (user, exercise) 只允许一条记录，单调棘轮依赖该约束
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_progress_user_exercise")
                    .table(UserProgress::Table)
                    .col(UserProgress::UserId)
                    .col(UserProgress::ExerciseId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_progress_user_id")
                    .table(UserProgress::Table)
                    .col(UserProgress::UserId)
                    .to_owned(),
            )
            .await?;

        // 徽章表：同一 (user, badge) 只允许授予一次
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_badges_user_badge")
                    .table(UserBadges::Table)
                    .col(UserBadges::UserId)
                    .col(UserBadges::BadgeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 任务表：惰性续期靠该约束保证同一周期不会重复创建
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_assigned_tasks_user_template_period")
                    .table(AssignedTasks::Table)
                    .col(AssignedTasks::UserId)
                    .col(AssignedTasks::TemplateId)
                    .col(AssignedTasks::PeriodStart)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_assigned_tasks_user_status")
                    .table(AssignedTasks::Table)
                    .col(AssignedTasks::UserId)
                    .col(AssignedTasks::Status)
                    .to_owned(),
            )
            .await?;

        // 排行榜是读时排序，给三个 XP 字段建索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_stats_total_xp")
                    .table(UserStats::Table)
                    .col(UserStats::TotalXp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_stats_daily_xp")
                    .table(UserStats::Table)
                    .col(UserStats::DailyXp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_stats_monthly_xp")
                    .table(UserStats::Table)
                    .col(UserStats::MonthlyXp)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(AssignedTasks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserBadges::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserStats::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserProgress::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum UserProgress {
    #[sea_orm(iden = "user_progress")]
    Table,
    Id,
    UserId,
    ExerciseId,
    Completed,
    BestPoints,
    Attempts,
    LastSubmittedAt,
    XpGranted,
    LockVersion,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserStats {
    #[sea_orm(iden = "user_stats")]
    Table,
    UserId,
    TotalXp,
    ExercisesCompleted,
    LevelsCompleted,
    CompletedLevelIds,
    DailyWindowStart,
    DailyXp,
    MonthlyWindowStart,
    MonthlyXp,
    StreakDays,
    LastActiveDay,
    LockVersion,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserBadges {
    #[sea_orm(iden = "user_badges")]
    Table,
    Id,
    UserId,
    BadgeId,
    AwardedAt,
}

#[derive(DeriveIden)]
enum AssignedTasks {
    #[sea_orm(iden = "assigned_tasks")]
    Table,
    Id,
    UserId,
    TemplateId,
    Title,
    Recurrence,
    AutoRenew,
    Status,
    PeriodStart,
    PeriodEnd,
    TargetExercises,
    TargetLevels,
    TargetHours,
    CurrentExercises,
    CurrentLevels,
    CurrentHours,
    CompletedAt,
    LockVersion,
    CreatedAt,
    UpdatedAt,
}
