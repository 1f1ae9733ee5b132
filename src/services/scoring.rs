use std::collections::{HashMap, HashSet};

use crate::{
    models::{
        domain::{AttemptAnswer, Question, Topic},
        dto::request::AnswerInput,
    },
    services::answer_evaluator,
};

/// Share of the raw score available as a bonus when finishing instantly.
const TIME_BONUS_RATE: f64 = 0.10;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSummary {
    pub raw_score: f64,
    pub time_bonus: f64,
    pub total_score: f64,
    /// Sum of marks over the live question set.
    pub max_score: f64,
    pub correct_count: usize,
    pub passed: bool,
    pub perfect: bool,
    pub answers: Vec<AttemptAnswer>,
}

/// Scores a submission against the topic's live question set.
///
/// Only the first answer per question counts; later answers to the same question are
/// ignored. Answers naming a question outside the set are skipped. The result depends
/// only on the inputs.
pub fn score_submission(
    topic: &Topic,
    questions: &[Question],
    answers: &[AnswerInput],
    time_taken_secs: i64,
) -> ScoreSummary {
    let by_id: HashMap<&str, &Question> =
        questions.iter().map(|q| (q.id.as_str(), q)).collect();
    let penalty = topic.penalty();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut processed = Vec::with_capacity(answers.len());
    let mut raw_score = 0.0;

    for answer in answers {
        let Some(question) = by_id.get(answer.question_id.as_str()) else {
            log::debug!("Skipping answer for unknown question {}", answer.question_id);
            continue;
        };
        if !seen.insert(question.id.as_str()) {
            continue;
        }

        let evaluation =
            answer_evaluator::evaluate(question, &answer.submitted_answer, penalty);
        raw_score += evaluation.marks_obtained;

        processed.push(AttemptAnswer {
            question_id: question.id.clone(),
            submitted_answer: answer.submitted_answer.clone(),
            is_correct: evaluation.is_correct,
            marks_obtained: evaluation.marks_obtained,
        });
    }

    let time_bonus = time_bonus(topic, raw_score, time_taken_secs);
    let total_score = raw_score + time_bonus;
    let max_score = max_score(questions);
    let correct_count = processed.iter().filter(|a| a.is_correct).count();

    let passed = if topic.passing_marks > 0.0 {
        total_score >= topic.passing_marks
    } else {
        correct_count > 0
    };

    ScoreSummary {
        raw_score,
        time_bonus,
        total_score,
        max_score,
        correct_count,
        passed,
        perfect: max_score > 0.0 && raw_score >= max_score,
        answers: processed,
    }
}

/// Bonus proportional to time saved, only for timed topics finished strictly inside the
/// limit. Follows the sign of the raw score.
pub fn time_bonus(topic: &Topic, raw_score: f64, time_taken_secs: i64) -> f64 {
    let limit = topic.time_limit_secs;
    if !topic.time_based_scoring || limit <= 0 || time_taken_secs >= limit {
        return 0.0;
    }

    let saved = (limit - time_taken_secs) as f64;
    round_half_up(raw_score * TIME_BONUS_RATE * saved / limit as f64)
}

pub fn max_score(questions: &[Question]) -> f64 {
    questions.iter().map(Question::marks).sum()
}

/// Halves round towards positive infinity, so -2.5 becomes -2.
fn round_half_up(value: f64) -> f64 {
    let rounded = (value + 0.5).floor();
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
