//! Per-question correctness and marks. Never fails: malformed answers are simply wrong.

use serde::Serialize;
use serde_json::Value;

use crate::models::domain::{AnswerKey, Question};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub is_correct: bool,
    pub marks_obtained: f64,
}

/// Scores one submitted answer. Wrong answers cost `penalty` marks; right answers earn the
/// question's marks and are never penalised.
pub fn evaluate(question: &Question, submitted: &Value, penalty: f64) -> Evaluation {
    let is_correct = is_correct(&question.answer_key, submitted);

    let marks_obtained = if is_correct {
        question.marks()
    } else if penalty > 0.0 {
        -penalty
    } else {
        0.0
    };

    Evaluation {
        is_correct,
        marks_obtained,
    }
}

fn is_correct(key: &AnswerKey, submitted: &Value) -> bool {
    match key {
        AnswerKey::FillBlank(Some(correct))
        | AnswerKey::TrueFalse(Some(correct))
        | AnswerKey::SingleChoice(Some(correct)) => matches_text(correct, submitted),
        AnswerKey::MultiSelect(Some(correct)) => matches_set(correct, submitted),
        AnswerKey::Match(Some(correct)) => matches_exactly(correct, submitted),
        AnswerKey::Reorder(Some(correct)) | AnswerKey::Sort(Some(correct)) => {
            matches_exactly(correct, submitted)
        }
        AnswerKey::FillBlank(None)
        | AnswerKey::TrueFalse(None)
        | AnswerKey::SingleChoice(None)
        | AnswerKey::MultiSelect(None)
        | AnswerKey::Match(None)
        | AnswerKey::Reorder(None)
        | AnswerKey::Sort(None) => false,
    }
}

/// Trimmed, case-folded comparison of scalar answers.
fn matches_text(correct: &str, submitted: &Value) -> bool {
    let Some(submitted) = scalar_text(submitted) else {
        return false;
    };

    let expected = normalize(correct);
    !expected.is_empty() && expected == normalize(&submitted)
}

/// Order-independent exact set match; no partial credit.
fn matches_set(correct: &[String], submitted: &Value) -> bool {
    let Some(items) = submitted.as_array() else {
        return false;
    };
    if correct.is_empty() || items.is_empty() {
        return false;
    }

    let submitted: Option<Vec<String>> = items
        .iter()
        .map(|item| scalar_text(item).map(|text| normalize(&text)))
        .collect();
    let Some(mut submitted) = submitted else {
        return false;
    };

    let mut expected: Vec<String> = correct.iter().map(|c| normalize(c)).collect();
    expected.sort();
    submitted.sort();

    expected == submitted
}

/// Structural equality, exactly as authored.
fn matches_exactly<T: Serialize>(correct: &T, submitted: &Value) -> bool {
    match serde_json::to_value(correct) {
        Ok(expected) => expected == *submitted,
        Err(_) => false,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::question::MatchPair;
    use serde_json::json;

    fn question(key: AnswerKey) -> Question {
        Question::new("topic-1", "Question", key)
    }

    fn single(correct: &str) -> Question {
        question(AnswerKey::SingleChoice(Some(correct.to_string())))
    }

    fn multi(correct: &[&str]) -> Question {
        question(AnswerKey::MultiSelect(Some(
            correct.iter().map(|c| c.to_string()).collect(),
        )))
    }

    #[test]
    fn scalar_answers_ignore_case_and_whitespace() {
        let result = evaluate(&single("Paris"), &json!("  paris "), 0.0);
        assert!(result.is_correct);
        assert_eq!(result.marks_obtained, 1.0);
    }

    #[test]
    fn true_false_and_fill_blank_use_the_same_rule() {
        let tf = question(AnswerKey::TrueFalse(Some("True".to_string())));
        assert!(evaluate(&tf, &json!("true"), 0.0).is_correct);
        assert!(evaluate(&tf, &json!(true), 0.0).is_correct);
        assert!(!evaluate(&tf, &json!("False"), 0.0).is_correct);

        let blank = question(AnswerKey::FillBlank(Some("Oxygen".to_string())));
        assert!(evaluate(&blank, &json!("OXYGEN"), 0.0).is_correct);
    }

    #[test]
    fn empty_scalar_answers_are_wrong() {
        assert!(!evaluate(&single("Paris"), &json!("   "), 0.0).is_correct);
        assert!(!evaluate(&single("  "), &json!("  "), 0.0).is_correct);
        assert!(!evaluate(&single("Paris"), &Value::Null, 0.0).is_correct);
    }

    #[test]
    fn multi_select_is_order_and_case_insensitive() {
        let result = evaluate(&multi(&["a", "b"]), &json!(["B", "A"]), 0.0);
        assert!(result.is_correct);
    }

    #[test]
    fn multi_select_gives_no_partial_credit() {
        let q = multi(&["a", "b", "c"]);
        assert!(!evaluate(&q, &json!(["a", "b"]), 0.0).is_correct);
        assert!(!evaluate(&q, &json!(["a", "b", "c", "d"]), 0.0).is_correct);
        assert!(!evaluate(&q, &json!([]), 0.0).is_correct);
        assert!(!evaluate(&q, &json!("a"), 0.0).is_correct);
    }

    #[test]
    fn multi_select_compares_as_multiset() {
        let q = multi(&["a", "a", "b"]);
        assert!(!evaluate(&q, &json!(["a", "b", "b"]), 0.0).is_correct);
        assert!(evaluate(&q, &json!(["b", "a", "a"]), 0.0).is_correct);
    }

    #[test]
    fn reorder_and_sort_require_exact_order_and_case() {
        let reorder = question(AnswerKey::Reorder(Some(vec![
            "First".to_string(),
            "Second".to_string(),
        ])));
        assert!(evaluate(&reorder, &json!(["First", "Second"]), 0.0).is_correct);
        assert!(!evaluate(&reorder, &json!(["Second", "First"]), 0.0).is_correct);
        assert!(!evaluate(&reorder, &json!(["first", "second"]), 0.0).is_correct);

        let sort = question(AnswerKey::Sort(Some(vec!["1".to_string(), "2".to_string()])));
        assert!(!evaluate(&sort, &json!([1, 2]), 0.0).is_correct);
    }

    #[test]
    fn match_pairs_are_compared_structurally() {
        let q = question(AnswerKey::Match(Some(vec![
            MatchPair {
                left: "France".to_string(),
                right: "Paris".to_string(),
            },
            MatchPair {
                left: "Spain".to_string(),
                right: "Madrid".to_string(),
            },
        ])));

        let right = json!([
            { "right": "Paris", "left": "France" },
            { "left": "Spain", "right": "Madrid" }
        ]);
        let swapped = json!([
            { "left": "Spain", "right": "Madrid" },
            { "left": "France", "right": "Paris" }
        ]);

        assert!(evaluate(&q, &right, 0.0).is_correct);
        assert!(!evaluate(&q, &swapped, 0.0).is_correct);
    }

    #[test]
    fn missing_answer_key_is_always_wrong() {
        let keys = [
            AnswerKey::FillBlank(None),
            AnswerKey::TrueFalse(None),
            AnswerKey::SingleChoice(None),
            AnswerKey::MultiSelect(None),
            AnswerKey::Match(None),
            AnswerKey::Reorder(None),
            AnswerKey::Sort(None),
        ];

        for key in keys {
            let result = evaluate(&question(key), &json!("anything"), 0.5);
            assert!(!result.is_correct);
            assert_eq!(result.marks_obtained, -0.5);
        }
    }

    #[test]
    fn negative_marking_never_touches_correct_answers() {
        let q = single("Paris").with_marks(3.0);

        let right = evaluate(&q, &json!("Paris"), 2.0);
        assert_eq!(right.marks_obtained, 3.0);

        let wrong = evaluate(&q, &json!("Rome"), 2.0);
        assert_eq!(wrong.marks_obtained, -2.0);
    }

    #[test]
    fn wrong_answers_without_penalty_score_zero() {
        let wrong = evaluate(&single("Paris"), &json!("Rome"), 0.0);
        assert_eq!(wrong.marks_obtained, 0.0);
        assert!(wrong.marks_obtained.is_sign_positive());
    }
}
