//! 游戏化引擎集成测试

mod common;

use common::{correct_mc_answer, mc_exercise, setup, setup_with_badges, xp_badge};
use rust_learnsystem_next::models::badges::registry::BadgeRegistry;
use rust_learnsystem_next::models::stats::responses::LeaderboardScope;
use rust_learnsystem_next::models::submissions::requests::SubmitExerciseRequest;

fn submit_req(user_id: i64, exercise_id: i64) -> SubmitExerciseRequest {
    SubmitExerciseRequest {
        user_id,
        exercise_id,
        answer: correct_mc_answer(),
    }
}

#[tokio::test]
async fn test_badge_awarded_exactly_at_threshold() {
    let registry =
        BadgeRegistry::from_definitions(vec![xp_badge("XP_100", 100)]).unwrap();
    let core = setup_with_badges(registry).await;
    core.catalog.insert_exercise(mc_exercise(1, 1, 99));
    core.catalog.insert_exercise(mc_exercise(2, 1, 1));

    // 99 XP：未达标
    let response = core.submissions.submit_exercise(submit_req(100, 1)).await.unwrap();
    assert!(response.new_badges.is_empty());

    // 恰好跨过 100：授予
    let response = core.submissions.submit_exercise(submit_req(100, 2)).await.unwrap();
    assert_eq!(response.new_badges, vec!["XP_100".to_string()]);

    let held = core.gamification.list_badges(100).await.unwrap();
    assert_eq!(held.len(), 1);
    assert_eq!(held[0].badge_id, "XP_100");
}

#[tokio::test]
async fn test_badge_never_awarded_twice() {
    let registry = BadgeRegistry::from_definitions(vec![xp_badge("XP_10", 10)]).unwrap();
    let core = setup_with_badges(registry).await;
    core.catalog.insert_exercise(mc_exercise(1, 1, 10));
    core.catalog.insert_exercise(mc_exercise(2, 1, 10));

    let first = core.submissions.submit_exercise(submit_req(100, 1)).await.unwrap();
    assert_eq!(first.new_badges, vec!["XP_10".to_string()]);

    // 继续答题，徽章不再重复授予
    let second = core.submissions.submit_exercise(submit_req(100, 2)).await.unwrap();
    assert!(second.new_badges.is_empty());
    assert_eq!(core.gamification.list_badges(100).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_one_event_unlocks_multiple_badges() {
    let registry = BadgeRegistry::from_definitions(vec![
        xp_badge("XP_10", 10),
        xp_badge("XP_50", 50),
    ])
    .unwrap();
    let core = setup_with_badges(registry).await;
    core.catalog.insert_exercise(mc_exercise(1, 1, 60));

    let response = core.submissions.submit_exercise(submit_req(100, 1)).await.unwrap();
    let mut badges = response.new_badges.clone();
    badges.sort();
    assert_eq!(badges, vec!["XP_10".to_string(), "XP_50".to_string()]);
}

#[tokio::test]
async fn test_exercises_badge_counts_distinct_completions() {
    let core = setup().await;
    // 内置 EXERCISES_10 需要完成 10 道不同的练习
    for id in 1..=10 {
        core.catalog.insert_exercise(mc_exercise(id, 1, 5));
    }
    for id in 1..=9 {
        let response = core.submissions.submit_exercise(submit_req(100, id)).await.unwrap();
        assert!(!response.new_badges.contains(&"EXERCISES_10".to_string()));
    }

    let response = core.submissions.submit_exercise(submit_req(100, 10)).await.unwrap();
    assert!(response.new_badges.contains(&"EXERCISES_10".to_string()));
}

#[tokio::test]
async fn test_leaderboard_total_ordering_and_ranks() {
    let core = setup().await;
    core.catalog.insert_exercise(mc_exercise(1, 1, 10));
    core.catalog.insert_exercise(mc_exercise(2, 1, 20));
    core.catalog.insert_exercise(mc_exercise(3, 1, 30));

    core.submissions.submit_exercise(submit_req(100, 1)).await.unwrap();
    core.submissions.submit_exercise(submit_req(200, 2)).await.unwrap();
    core.submissions.submit_exercise(submit_req(300, 3)).await.unwrap();

    let board = core
        .gamification
        .leaderboard(LeaderboardScope::Total, None, chrono::Utc::now())
        .await
        .unwrap();

    let order: Vec<(i64, i64, i64)> = board
        .entries
        .iter()
        .map(|e| (e.rank, e.user_id, e.xp))
        .collect();
    assert_eq!(order, vec![(1, 300, 30), (2, 200, 20), (3, 100, 10)]);
}

#[tokio::test]
async fn test_leaderboard_tie_breaks_by_user_id() {
    let core = setup().await;
    core.catalog.insert_exercise(mc_exercise(1, 1, 10));

    core.submissions.submit_exercise(submit_req(200, 1)).await.unwrap();
    core.submissions.submit_exercise(submit_req(100, 1)).await.unwrap();

    let board = core
        .gamification
        .leaderboard(LeaderboardScope::Total, None, chrono::Utc::now())
        .await
        .unwrap();
    // 同分时 user_id 小者在前
    assert_eq!(board.entries[0].user_id, 100);
    assert_eq!(board.entries[1].user_id, 200);
}

#[tokio::test]
async fn test_leaderboard_respects_limit() {
    let core = setup().await;
    core.catalog.insert_exercise(mc_exercise(1, 1, 10));

    for user_id in 1..=5 {
        core.submissions.submit_exercise(submit_req(user_id, 1)).await.unwrap();
    }

    let board = core
        .gamification
        .leaderboard(LeaderboardScope::Total, Some(3), chrono::Utc::now())
        .await
        .unwrap();
    assert_eq!(board.entries.len(), 3);
}

#[tokio::test]
async fn test_daily_scope_reflects_current_window() {
    let core = setup().await;
    core.catalog.insert_exercise(mc_exercise(1, 1, 10));
    core.submissions.submit_exercise(submit_req(100, 1)).await.unwrap();

    let now = chrono::Utc::now();
    let daily = core
        .gamification
        .leaderboard(LeaderboardScope::Daily, None, now)
        .await
        .unwrap();
    assert_eq!(daily.entries.len(), 1);
    assert_eq!(daily.entries[0].xp, 10);

    // 明天的榜单上今天的桶已过期
    let tomorrow = now + chrono::Duration::days(1);
    let stale = core
        .gamification
        .leaderboard(LeaderboardScope::Daily, None, tomorrow)
        .await
        .unwrap();
    assert!(stale.entries.is_empty());
}

#[tokio::test]
async fn test_stats_default_to_zero_for_unknown_user() {
    let core = setup().await;
    let stats = core.gamification.get_stats(12345).await.unwrap();
    assert_eq!(stats.total_xp, 0);
    assert_eq!(stats.exercises_completed, 0);
    assert_eq!(stats.streak_days, 0);
}
