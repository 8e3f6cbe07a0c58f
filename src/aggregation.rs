//! Turns raw survey responses into per-question statistics.
//!
//! Everything here is a pure function of its inputs: the same survey and the
//! same set of responses always produce identical results.

use std::collections::HashMap;

use crate::model::{
    api::results::{OptionCount, QuestionResult, RatingCount, ResultData, SurveyResults},
    common::{Answer, QuestionType, RATING_VALUES},
    db::survey::{Question, Survey},
    mongodb::Id,
};

/// Aggregate every response to a survey.
///
/// Each item of `responses` is the list of answers in one response. Answers to
/// questions the survey does not define are ignored.
pub fn aggregate_survey<'a, I>(survey: &Survey, responses: I) -> SurveyResults
where
    I: IntoIterator<Item = &'a [Answer]>,
{
    let mut total_responses = 0;
    let mut by_question: HashMap<&Id, Vec<&Answer>> = HashMap::new();
    for answers in responses {
        total_responses += 1;
        for answer in answers {
            by_question.entry(&answer.question_id).or_default().push(answer);
        }
    }

    let results = survey
        .ordered_questions()
        .into_iter()
        .map(|question| {
            let answers = by_question
                .get(&question.id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            aggregate_question(question, answers)
        })
        .collect();

    SurveyResults {
        survey_id: survey.id.clone(),
        survey_title: survey.title_i18n.clone(),
        survey_description: survey.description_i18n.clone(),
        total_responses,
        results,
    }
}

/// Aggregate the answers to a single question.
///
/// `answers` should already be restricted to this question; any that are not
/// are skipped.
pub fn aggregate_question(question: &Question, answers: &[&Answer]) -> QuestionResult {
    let answers = answers
        .iter()
        .copied()
        .filter(|answer| answer.question_id == question.id)
        .collect::<Vec<_>>();

    let data = match question.question_type {
        QuestionType::Rating => rating_data(&answers),
        QuestionType::SingleChoice | QuestionType::MultipleChoice => choice_data(question, &answers),
        QuestionType::Other(_) => ResultData::default(),
    };

    QuestionResult {
        id: question.id.clone(),
        text_i18n: question.text_i18n.clone(),
        question_type: question.question_type.clone(),
        order: question.order,
        total_answers: answers.len() as u64,
        data,
        insight: question.insight,
    }
}

fn rating_data(answers: &[&Answer]) -> ResultData {
    let ratings = answers
        .iter()
        .map(|answer| answer.value.rating().unwrap_or(0))
        .collect::<Vec<_>>();

    let rating_counts = RATING_VALUES
        .map(|value| RatingCount {
            value,
            count: ratings.iter().filter(|&&rating| rating == value).count() as u64,
        })
        .collect();

    // Non-rating payloads count as zero, matching how they were always summed.
    let sum: i64 = ratings.iter().map(|&rating| i64::from(rating)).sum();
    let average_rating = if ratings.is_empty() {
        0.0
    } else {
        sum as f64 / ratings.len() as f64
    };

    ResultData {
        rating_counts: Some(rating_counts),
        average_rating: Some(average_rating),
        option_counts: None,
    }
}

fn choice_data(question: &Question, answers: &[&Answer]) -> ResultData {
    let option_counts = question
        .ordered_options()
        .into_iter()
        .map(|option| OptionCount {
            id: option.id.clone(),
            text_i18n: option.text_i18n.clone(),
            count: answers
                .iter()
                .filter(|answer| answer.value.selects(&option.id))
                .count() as u64,
        })
        .collect();

    ResultData {
        option_counts: Some(option_counts),
        ..Default::default()
    }
}

/// Format `count` as a whole-number percentage of `total`.
///
/// Halves round up. A zero total gives `"0%"`.
pub fn format_percentage(count: u64, total: u64) -> String {
    format!("{}%", percentage(count, total))
}

/// Format a mean rating to one decimal place.
///
/// A mean exactly halfway between two tenths rounds up, so 4.25 gives
/// `"4.3"`.
pub fn format_mean(mean: f64) -> String {
    let tenths = mean * 10.0;
    // Only exact quarters can sit halfway between two tenths.
    let rounded = if tenths.fract() == 0.5 && (mean * 4.0).fract() == 0.0 {
        tenths.ceil() / 10.0
    } else {
        mean
    };
    format!("{rounded:.1}")
}

/// `count` as a whole-number percentage of `total`; see [`format_percentage`].
pub fn percentage(count: u64, total: u64) -> u64 {
    if total == 0 {
        0
    } else {
        (count as f64 / total as f64 * 100.0 + 0.5).floor() as u64
    }
}
