//! 任务跟踪集成测试

mod common;

use chrono::{Duration, Utc};
use common::{correct_mc_answer, mc_exercise, setup};
use rust_learnsystem_next::models::submissions::requests::SubmitExerciseRequest;
use rust_learnsystem_next::models::tasks::entities::{
    MetricKind, TaskMetrics, TaskRecurrence, TaskStatus,
};
use rust_learnsystem_next::models::tasks::requests::{AssignTasksRequest, TaskTemplate};

fn template(id: i64, recurrence: TaskRecurrence, auto_renew: bool, targets: TaskMetrics) -> TaskTemplate {
    TaskTemplate {
        id,
        title: format!("模板 {id}"),
        recurrence,
        auto_renew,
        targets,
    }
}

fn exercises_target(n: i32) -> TaskMetrics {
    TaskMetrics {
        exercises_submitted: n,
        levels_completed: 0,
        hours_spent: 0.0,
    }
}

#[tokio::test]
async fn test_assign_is_idempotent_per_period() {
    let core = setup().await;
    let now = Utc::now();
    let request = AssignTasksRequest {
        template: template(1, TaskRecurrence::Once, false, exercises_target(3)),
        user_ids: vec![100, 200],
        period_start: now,
        period_end: now + Duration::days(7),
    };

    let created = core.tasks.assign_tasks(request.clone()).await.unwrap();
    assert_eq!(created.len(), 2);
    assert!(created.iter().all(|t| t.status == TaskStatus::Pending));

    // 同周期重复分配安静跳过
    let again = core.tasks.assign_tasks(request).await.unwrap();
    assert!(again.is_empty());

    let tasks = core.tasks.list_user_tasks(100, Utc::now()).await.unwrap();
    assert_eq!(tasks.len(), 1);
}

#[tokio::test]
async fn test_invalid_period_rejected() {
    let core = setup().await;
    let now = Utc::now();
    let err = core
        .tasks
        .assign_tasks(AssignTasksRequest {
            template: template(1, TaskRecurrence::Once, false, exercises_target(1)),
            user_ids: vec![100],
            period_start: now,
            period_end: now,
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), "E005");
}

#[tokio::test]
async fn test_single_event_completes_target_of_one() {
    let core = setup().await;
    let now = Utc::now();
    core.tasks
        .assign_tasks(AssignTasksRequest {
            template: template(1, TaskRecurrence::Once, false, exercises_target(1)),
            user_ids: vec![100],
            period_start: now - Duration::hours(1),
            period_end: now + Duration::days(1),
        })
        .await
        .unwrap();

    // 返回值就是被更新的任务
    let updated = core
        .tasks
        .on_progress_event(100, MetricKind::ExercisesSubmitted, 1.0, now)
        .await
        .unwrap();
    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0].status, TaskStatus::Completed);
    assert!(updated[0].completed_at.is_some());
    assert_eq!(updated[0].current.exercises_submitted, 1);

    let tasks = core.tasks.list_user_tasks(100, now).await.unwrap();
    assert_eq!(tasks[0].status, TaskStatus::Completed);
    assert!(tasks[0].completed_at.is_some());
    assert_eq!(tasks[0].current.exercises_submitted, 1);
}

#[tokio::test]
async fn test_progress_clamped_to_target() {
    let core = setup().await;
    let now = Utc::now();
    core.tasks
        .assign_tasks(AssignTasksRequest {
            template: template(1, TaskRecurrence::Once, false, exercises_target(3)),
            user_ids: vec![100],
            period_start: now - Duration::hours(1),
            period_end: now + Duration::days(1),
        })
        .await
        .unwrap();

    let updated = core
        .tasks
        .on_progress_event(100, MetricKind::ExercisesSubmitted, 10.0, now)
        .await
        .unwrap();
    // 超出目标的进度被截断
    assert_eq!(updated[0].current.exercises_submitted, 3);
    assert_eq!(updated[0].status, TaskStatus::Completed);

    let tasks = core.tasks.list_user_tasks(100, now).await.unwrap();
    assert_eq!(tasks[0].current.exercises_submitted, 3);
    assert_eq!(tasks[0].status, TaskStatus::Completed);
}

#[tokio::test]
async fn test_untracked_metric_ignored() {
    let core = setup().await;
    let now = Utc::now();
    core.tasks
        .assign_tasks(AssignTasksRequest {
            template: template(1, TaskRecurrence::Once, false, exercises_target(2)),
            user_ids: vec![100],
            period_start: now - Duration::hours(1),
            period_end: now + Duration::days(1),
        })
        .await
        .unwrap();

    // 目标组不跟踪时长指标，没有任务被更新
    let updated = core
        .tasks
        .on_progress_event(100, MetricKind::HoursSpent, 2.0, now)
        .await
        .unwrap();
    assert!(updated.is_empty());

    let tasks = core.tasks.list_user_tasks(100, now).await.unwrap();
    assert_eq!(tasks[0].status, TaskStatus::Pending);
    assert_eq!(tasks[0].current.hours_spent, 0.0);
}

#[tokio::test]
async fn test_partial_progress_marks_in_progress() {
    let core = setup().await;
    let now = Utc::now();
    core.tasks
        .assign_tasks(AssignTasksRequest {
            template: template(1, TaskRecurrence::Once, false, exercises_target(3)),
            user_ids: vec![100],
            period_start: now - Duration::hours(1),
            period_end: now + Duration::days(1),
        })
        .await
        .unwrap();

    let updated = core
        .tasks
        .on_progress_event(100, MetricKind::ExercisesSubmitted, 1.0, now)
        .await
        .unwrap();
    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0].status, TaskStatus::InProgress);

    let tasks = core.tasks.list_user_tasks(100, now).await.unwrap();
    assert_eq!(tasks[0].status, TaskStatus::InProgress);
    assert_eq!(tasks[0].current.exercises_submitted, 1);
}

#[tokio::test]
async fn test_expired_task_no_longer_accepts_events() {
    let core = setup().await;
    let now = Utc::now();
    core.tasks
        .assign_tasks(AssignTasksRequest {
            template: template(1, TaskRecurrence::Once, false, exercises_target(1)),
            user_ids: vec![100],
            period_start: now - Duration::days(2),
            period_end: now - Duration::days(1),
        })
        .await
        .unwrap();

    let updated = core
        .tasks
        .on_progress_event(100, MetricKind::ExercisesSubmitted, 1.0, now)
        .await
        .unwrap();
    assert!(updated.is_empty());

    let tasks = core.tasks.list_user_tasks(100, now).await.unwrap();
    assert_eq!(tasks.len(), 1);
    // 周期已过：惰性标记为过期，事件不再计入
    assert_eq!(tasks[0].status, TaskStatus::Expired);
    assert_eq!(tasks[0].current.exercises_submitted, 0);
}

#[tokio::test]
async fn test_auto_renew_skips_missed_periods() {
    let core = setup().await;
    let now = Utc::now();
    // 三天前开始的日任务，中间两个周期没人碰
    core.tasks
        .assign_tasks(AssignTasksRequest {
            template: template(1, TaskRecurrence::Daily, true, exercises_target(1)),
            user_ids: vec![100],
            period_start: now - Duration::days(3),
            period_end: now - Duration::days(2),
        })
        .await
        .unwrap();

    let tasks = core.tasks.list_user_tasks(100, now).await.unwrap();
    // 旧任务过期 + 包含 now 的新周期任务，错过的周期不回填
    assert_eq!(tasks.len(), 2);

    let expired: Vec<_> = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Expired)
        .collect();
    let pending: Vec<_> = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Pending)
        .collect();
    assert_eq!(expired.len(), 1);
    assert_eq!(pending.len(), 1);

    let renewed = pending[0];
    assert!(renewed.period_start <= now && now < renewed.period_end);
    assert_eq!(
        (renewed.period_end - renewed.period_start).num_seconds(),
        86_400
    );
}

#[tokio::test]
async fn test_completed_task_not_renewed_early() {
    let core = setup().await;
    let now = Utc::now();
    core.tasks
        .assign_tasks(AssignTasksRequest {
            template: template(1, TaskRecurrence::Daily, true, exercises_target(1)),
            user_ids: vec![100],
            period_start: now - Duration::hours(1),
            period_end: now + Duration::hours(23),
        })
        .await
        .unwrap();

    core.tasks
        .on_progress_event(100, MetricKind::ExercisesSubmitted, 1.0, now)
        .await
        .unwrap();

    // 周期未结束，已完成的任务不会提前续期
    let tasks = core.tasks.list_user_tasks(100, now).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status, TaskStatus::Completed);
}

#[tokio::test]
async fn test_submission_pipeline_drives_task_progress() {
    let core = setup().await;
    let now = Utc::now();
    core.catalog.insert_exercise(mc_exercise(1, 1, 10));
    core.tasks
        .assign_tasks(AssignTasksRequest {
            template: template(1, TaskRecurrence::Once, false, exercises_target(1)),
            user_ids: vec![100],
            period_start: now - Duration::hours(1),
            period_end: now + Duration::days(1),
        })
        .await
        .unwrap();

    core.submissions
        .submit_exercise(SubmitExerciseRequest {
            user_id: 100,
            exercise_id: 1,
            answer: correct_mc_answer(),
        })
        .await
        .unwrap();

    let tasks = core.tasks.list_user_tasks(100, Utc::now()).await.unwrap();
    assert_eq!(tasks[0].status, TaskStatus::Completed);
}
