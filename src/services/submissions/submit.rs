use tracing::warn;

use super::SubmissionService;
use crate::errors::{LearnSystemError, Result};
use crate::evaluator;
use crate::models::submissions::requests::SubmitExerciseRequest;
use crate::models::submissions::responses::SubmitExerciseResponse;
use crate::utils::validate;

impl SubmissionService {
    /// 处理一次练习提交
    pub async fn submit_exercise(
        &self,
        request: SubmitExerciseRequest,
    ) -> Result<SubmitExerciseResponse> {
        // 同一 (user, exercise) 对进程内串行化
        let _guard = self
            .locks
            .acquire(request.user_id, request.exercise_id)
            .await;

        // 先结清上次留下的待入账奖励，避免欠账越积越多
        if let Err(e) = self.settle_pending_awards(request.user_id).await {
            warn!("待入账奖励结算失败，推迟到下次提交: user={}, error={e}", request.user_id);
        }

        let exercise = self
            .catalog
            .get_exercise(request.exercise_id)
            .await?
            .ok_or_else(|| {
                LearnSystemError::not_found(format!("练习不存在: {}", request.exercise_id))
            })?;

        let payload = validate::parse_answer_payload(exercise.kind(), &request.answer)?;
        let evaluation = evaluator::evaluate(&exercise, &payload)?;

        let now = chrono::Utc::now();
        let (record, first_completion) = self
            .progress
            .record_submission(request.user_id, &exercise, &evaluation, now)
            .await?;

        // 首次完成触发奖励结算；失败不回滚进度，留给下次提交补结
        let mut xp_earned = 0;
        let mut new_badges = Vec::new();
        if let Some(first) = first_completion {
            match self.settle_award(record.id, &first).await {
                Ok((xp, badges)) => {
                    xp_earned = xp;
                    new_badges = badges;
                }
                Err(e) => {
                    warn!(
                        "首次完成奖励结算失败，推迟到下次提交: user={}, exercise={}, error={e}",
                        first.user_id, first.exercise_id
                    );
                }
            }
        }

        Ok(SubmitExerciseResponse {
            correct: evaluation.correct,
            points_earned: evaluation.points_earned,
            points_max: evaluation.points_max,
            xp_earned,
            new_badges,
            details: evaluation.details,
        })
    }
}
