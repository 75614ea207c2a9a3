//! 外部输入校验
//!
//! HTTP 层透传的答案是未校验的原始 JSON，这里按练习题型把它解析成
//! 封闭的 AnswerPayload 和类型。题型未知报 UnsupportedExerciseType，
//! 形状不符报 MalformedAnswerShape；进入核心之后不再有这两类错误。

use serde_json::Value;

use crate::errors::{LearnSystemError, Result};
use crate::models::exercises::entities::ExerciseKind;
use crate::models::submissions::entities::AnswerPayload;

/// 解析外部提供的题型字符串
///
/// 宿主层（HTTP 接口、内容导入）把原始类型字符串映射成 ExerciseKind
/// 的入口；库内部的目录数据已是类型化的，不经过这里。
pub fn parse_exercise_kind(raw: &str) -> Result<ExerciseKind> {
    raw.parse().map_err(|_| {
        LearnSystemError::unsupported_exercise_type(format!(
            "未知的练习题型: '{raw}'. 支持的题型: {}",
            ExerciseKind::all_kinds().join(", ")
        ))
    })
}

/// 按题型把原始 JSON 解析成类型化的答案载荷
pub fn parse_answer_payload(kind: ExerciseKind, raw: &Value) -> Result<AnswerPayload> {
    let malformed = |expected: &str| {
        LearnSystemError::malformed_answer_shape(format!(
            "题型 {kind} 期望 {expected}，实际收到: {raw}"
        ))
    };

    match kind {
        ExerciseKind::MultipleChoice => string_array(raw, "selected_options")
            .map(|selected_options| AnswerPayload::MultipleChoice { selected_options })
            .ok_or_else(|| malformed("{ selected_options: string[] }")),
        ExerciseKind::Ordering => string_array(raw, "sequence")
            .map(|sequence| AnswerPayload::Ordering { sequence })
            .ok_or_else(|| malformed("{ sequence: string[] }")),
        ExerciseKind::BlockArrangement => string_array(raw, "sequence")
            .map(|sequence| AnswerPayload::BlockArrangement { sequence })
            .ok_or_else(|| malformed("{ sequence: string[] }")),
        ExerciseKind::FillInBlank => text_field(raw)
            .map(|text| AnswerPayload::FillInBlank { text })
            .ok_or_else(|| malformed("{ text: string } 或字符串")),
        ExerciseKind::TextInput => text_field(raw)
            .map(|text| AnswerPayload::TextInput { text })
            .ok_or_else(|| malformed("{ text: string } 或字符串")),
        ExerciseKind::SpotTheError => raw
            .get("index")
            .and_then(Value::as_u64)
            .and_then(|i| u32::try_from(i).ok())
            .map(|index| AnswerPayload::SpotTheError { index })
            .ok_or_else(|| malformed("{ index: number }")),
        ExerciseKind::Code => raw
            .get("passed")
            .and_then(Value::as_bool)
            .map(|passed| AnswerPayload::Code { passed })
            .ok_or_else(|| malformed("{ passed: boolean }")),
    }
}

fn string_array(raw: &Value, field: &str) -> Option<Vec<String>> {
    raw.get(field)?
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

// 文本题同时接受裸字符串和 { text: "..." } 两种写法
fn text_field(raw: &Value) -> Option<String> {
    if let Some(s) = raw.as_str() {
        return Some(s.to_string());
    }
    raw.get("text")?.as_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_known_kinds() {
        assert_eq!(
            parse_exercise_kind("multiple_choice").unwrap(),
            ExerciseKind::MultipleChoice
        );
        assert_eq!(
            parse_exercise_kind("spot_the_error").unwrap(),
            ExerciseKind::SpotTheError
        );
    }

    #[test]
    fn test_unknown_kind_is_unsupported() {
        let err = parse_exercise_kind("hologram").unwrap_err();
        assert_eq!(err.code(), "E101");
    }

    #[test]
    fn test_multiple_choice_payload() {
        let payload = parse_answer_payload(
            ExerciseKind::MultipleChoice,
            &json!({ "selected_options": ["a", "c"] }),
        )
        .unwrap();
        match payload {
            AnswerPayload::MultipleChoice { selected_options } => {
                assert_eq!(selected_options, vec!["a", "c"]);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        // 序列题收到字符串
        let err =
            parse_answer_payload(ExerciseKind::Ordering, &json!("not a sequence")).unwrap_err();
        assert_eq!(err.code(), "E102");

        // 多选题的数组里混入非字符串
        let err = parse_answer_payload(
            ExerciseKind::MultipleChoice,
            &json!({ "selected_options": ["a", 3] }),
        )
        .unwrap_err();
        assert_eq!(err.code(), "E102");
    }

    #[test]
    fn test_text_accepts_bare_string_and_object() {
        let bare = parse_answer_payload(ExerciseKind::FillInBlank, &json!("réponse")).unwrap();
        let wrapped =
            parse_answer_payload(ExerciseKind::FillInBlank, &json!({ "text": "réponse" })).unwrap();
        for payload in [bare, wrapped] {
            match payload {
                AnswerPayload::FillInBlank { text } => assert_eq!(text, "réponse"),
                other => panic!("unexpected payload: {other:?}"),
            }
        }
    }

    #[test]
    fn test_code_requires_passed_signal() {
        let ok = parse_answer_payload(ExerciseKind::Code, &json!({ "passed": true })).unwrap();
        assert!(matches!(ok, AnswerPayload::Code { passed: true }));

        let err = parse_answer_payload(ExerciseKind::Code, &json!({ "output": "42" })).unwrap_err();
        assert_eq!(err.code(), "E102");
    }

    #[test]
    fn test_spot_the_error_index() {
        let payload =
            parse_answer_payload(ExerciseKind::SpotTheError, &json!({ "index": 2 })).unwrap();
        assert!(matches!(payload, AnswerPayload::SpotTheError { index: 2 }));

        let err =
            parse_answer_payload(ExerciseKind::SpotTheError, &json!({ "index": -1 })).unwrap_err();
        assert_eq!(err.code(), "E102");
    }
}
