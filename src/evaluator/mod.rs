//! 答案判定模块
//!
//! 纯函数：不触库、不触网，只比对标准答案和作答载荷。
//! 计分是二元的：答对得满分 points，答错得 0，没有部分分。

use std::collections::HashSet;

use serde_json::json;

use crate::errors::{LearnSystemError, Result};
use crate::models::exercises::entities::{ExerciseDefinition, ExerciseSolution};
use crate::models::submissions::entities::{AnswerPayload, EvaluationResult};

/// 判定一次作答
///
/// 答案载荷的题型必须和练习题型一致；正常调用链里 utils::validate
/// 已按练习题型解析载荷，这里的不一致只可能来自调用方的编程错误。
pub fn evaluate(exercise: &ExerciseDefinition, answer: &AnswerPayload) -> Result<EvaluationResult> {
    if answer.kind() != exercise.kind() {
        return Err(LearnSystemError::malformed_answer_shape(format!(
            "答案载荷题型 {} 与练习题型 {} 不符",
            answer.kind(),
            exercise.kind()
        )));
    }

    let (correct, details) = match (&exercise.solution, answer) {
        (
            ExerciseSolution::MultipleChoice { correct_options },
            AnswerPayload::MultipleChoice { selected_options },
        ) => {
            // 集合相等：漏选、多选、错选都判错
            let expected: HashSet<&str> = correct_options.iter().map(String::as_str).collect();
            let selected: HashSet<&str> = selected_options.iter().map(String::as_str).collect();
            let correct = expected == selected;
            (
                correct,
                json!({
                    "missing": expected.difference(&selected).count(),
                    "extra": selected.difference(&expected).count(),
                }),
            )
        }
        (ExerciseSolution::Ordering { sequence: expected }, AnswerPayload::Ordering { sequence })
        | (
            ExerciseSolution::BlockArrangement { sequence: expected },
            AnswerPayload::BlockArrangement { sequence },
        ) => {
            let correct = expected == sequence;
            (
                correct,
                json!({
                    "expected_len": expected.len(),
                    "submitted_len": sequence.len(),
                }),
            )
        }
        (ExerciseSolution::FillInBlank { expected }, AnswerPayload::FillInBlank { text }) => {
            // 忽略首尾空白和大小写
            let correct = normalize(text) == normalize(expected);
            (correct, json!({}))
        }
        (ExerciseSolution::TextInput { expected }, AnswerPayload::TextInput { text }) => {
            // 自由文本放宽到包含匹配：答案里出现关键表述即算对
            let correct = normalize(text).contains(&normalize(expected));
            (correct, json!({}))
        }
        (
            ExerciseSolution::SpotTheError { index: expected },
            AnswerPayload::SpotTheError { index },
        ) => (index == expected, json!({ "submitted_index": index })),
        // 代码题信任外部判题信号
        (ExerciseSolution::Code, AnswerPayload::Code { passed }) => {
            (*passed, json!({ "judge_passed": passed }))
        }
        // kind 比对已排除其余组合
        _ => {
            return Err(LearnSystemError::malformed_answer_shape(format!(
                "答案载荷与练习 {} 的答案形状不符",
                exercise.id
            )));
        }
    };

    Ok(EvaluationResult {
        correct,
        points_earned: if correct { exercise.points } else { 0 },
        points_max: exercise.points,
        details,
    })
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(solution: ExerciseSolution) -> ExerciseDefinition {
        ExerciseDefinition {
            id: 1,
            level_id: 1,
            title: "测试练习".to_string(),
            points: 10,
            solution,
        }
    }

    fn mc_exercise() -> ExerciseDefinition {
        exercise(ExerciseSolution::MultipleChoice {
            correct_options: vec!["a".to_string(), "c".to_string()],
        })
    }

    #[test]
    fn test_multiple_choice_exact_set() {
        let ex = mc_exercise();
        // 顺序无关
        let result = evaluate(
            &ex,
            &AnswerPayload::MultipleChoice {
                selected_options: vec!["c".to_string(), "a".to_string()],
            },
        )
        .unwrap();
        assert!(result.correct);
        assert_eq!(result.points_earned, 10);
    }

    #[test]
    fn test_multiple_choice_partial_is_wrong() {
        let ex = mc_exercise();
        // 漏选
        let missing = evaluate(
            &ex,
            &AnswerPayload::MultipleChoice {
                selected_options: vec!["a".to_string()],
            },
        )
        .unwrap();
        assert!(!missing.correct);
        assert_eq!(missing.points_earned, 0);

        // 多选一个错项
        let extra = evaluate(
            &ex,
            &AnswerPayload::MultipleChoice {
                selected_options: vec!["a".to_string(), "c".to_string(), "b".to_string()],
            },
        )
        .unwrap();
        assert!(!extra.correct);
        assert_eq!(extra.points_max, 10);
    }

    #[test]
    fn test_ordering_requires_exact_sequence() {
        let ex = exercise(ExerciseSolution::Ordering {
            sequence: vec!["let".to_string(), "x".to_string(), "=".to_string()],
        });
        let right = evaluate(
            &ex,
            &AnswerPayload::Ordering {
                sequence: vec!["let".to_string(), "x".to_string(), "=".to_string()],
            },
        )
        .unwrap();
        assert!(right.correct);

        let swapped = evaluate(
            &ex,
            &AnswerPayload::Ordering {
                sequence: vec!["x".to_string(), "let".to_string(), "=".to_string()],
            },
        )
        .unwrap();
        assert!(!swapped.correct);
    }

    #[test]
    fn test_fill_in_blank_ignores_case_and_whitespace() {
        let ex = exercise(ExerciseSolution::FillInBlank {
            expected: "dynamique".to_string(),
        });
        let ok = evaluate(
            &ex,
            &AnswerPayload::FillInBlank {
                text: " Dynamique ".to_string(),
            },
        )
        .unwrap();
        assert!(ok.correct);

        let wrong = evaluate(
            &ex,
            &AnswerPayload::FillInBlank {
                text: "dynamic".to_string(),
            },
        )
        .unwrap();
        assert!(!wrong.correct);
    }

    #[test]
    fn test_text_input_contains() {
        let ex = exercise(ExerciseSolution::TextInput {
            expected: "borrow checker".to_string(),
        });
        let ok = evaluate(
            &ex,
            &AnswerPayload::TextInput {
                text: "The Borrow Checker enforces aliasing rules".to_string(),
            },
        )
        .unwrap();
        assert!(ok.correct);
    }

    #[test]
    fn test_spot_the_error_index() {
        let ex = exercise(ExerciseSolution::SpotTheError { index: 3 });
        assert!(
            evaluate(&ex, &AnswerPayload::SpotTheError { index: 3 })
                .unwrap()
                .correct
        );
        assert!(
            !evaluate(&ex, &AnswerPayload::SpotTheError { index: 2 })
                .unwrap()
                .correct
        );
    }

    #[test]
    fn test_code_trusts_judge_signal() {
        let ex = exercise(ExerciseSolution::Code);
        assert!(
            evaluate(&ex, &AnswerPayload::Code { passed: true })
                .unwrap()
                .correct
        );
        assert!(
            !evaluate(&ex, &AnswerPayload::Code { passed: false })
                .unwrap()
                .correct
        );
    }

    #[test]
    fn test_kind_mismatch_is_malformed() {
        let ex = mc_exercise();
        let err = evaluate(
            &ex,
            &AnswerPayload::FillInBlank {
                text: "a".to_string(),
            },
        )
        .unwrap_err();
        assert_eq!(err.code(), "E102");
    }
}
