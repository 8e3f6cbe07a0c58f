//! Short narrative summaries of aggregated question results.
//!
//! Insights are English sentences; option texts are interpolated in the
//! requested language.

mod span;
mod template;

pub use span::{Insight, Span, EMPHASIS_MARKER};
pub use template::{InsightTemplate, TemplateKind};

use crate::aggregation::{format_mean, format_percentage};
use crate::model::api::results::{OptionCount, QuestionResult, RatingCount};

/// How many options a multiple-choice summary lists.
const TOP_OPTIONS: usize = 3;

/// Describe notable patterns in one question's results.
///
/// Questions without a usable template, or without the data their type
/// needs, produce no insights.
pub fn generate_insights(result: &QuestionResult, language: &str) -> Vec<Insight> {
    let text = result.text_i18n.get(language);
    let template = match InsightTemplate::select(result.insight, &result.question_type, text) {
        Some(template) => template,
        None => return Vec::new(),
    };

    let total = result.total_answers;
    match template.kind() {
        TemplateKind::Rating => match (&result.data.rating_counts, result.data.average_rating) {
            (Some(counts), Some(average)) => rating_insights(template, counts, average, total),
            _ => Vec::new(),
        },
        TemplateKind::SingleChoice => match &result.data.option_counts {
            Some(counts) => single_choice_insights(template, counts, total, language),
            None => Vec::new(),
        },
        TemplateKind::MultipleChoice => match &result.data.option_counts {
            Some(counts) => multiple_choice_insights(template, counts, total, language),
            None => Vec::new(),
        },
        TemplateKind::None => Vec::new(),
    }
}

/// The bucket with the highest count; the lowest rating wins ties.
fn dominant_rating(counts: &[RatingCount]) -> Option<&RatingCount> {
    counts
        .iter()
        .fold(None, |best: Option<&RatingCount>, count| match best {
            Some(best) if best.count >= count.count => Some(best),
            _ => Some(count),
        })
}

/// The option with the highest count; the earliest option wins ties.
fn dominant_option(counts: &[OptionCount]) -> Option<&OptionCount> {
    counts
        .iter()
        .fold(None, |best: Option<&OptionCount>, count| match best {
            Some(best) if best.count >= count.count => Some(best),
            _ => Some(count),
        })
}

/// Options by descending count; ties keep option order.
fn ranked_options(counts: &[OptionCount]) -> Vec<&OptionCount> {
    let mut ranked = counts.iter().collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}

fn rating_insights(
    template: InsightTemplate,
    counts: &[RatingCount],
    average: f64,
    total: u64,
) -> Vec<Insight> {
    let dominant = match dominant_rating(counts) {
        Some(dominant) => format_percentage(dominant.count, total),
        None => return Vec::new(),
    };
    let mean = format_mean(average);
    let average_line = |subject: &str, ending: &str| {
        Insight::new()
            .text(format!("The average {subject} is "))
            .strong(mean.clone())
            .text(format!(" out of 5{ending}"))
    };
    let headline = |ending: &str| Insight::new().strong(dominant.clone()).text(ending);

    match template {
        InsightTemplate::Worry if average >= 4.0 => vec![
            headline(" of respondents are very worried about climate change."),
            average_line("concern level", ", indicating high awareness."),
        ],
        InsightTemplate::Worry if average >= 3.0 => {
            vec![average_line("concern level", ", showing moderate awareness.")]
        }
        InsightTemplate::Worry => vec![average_line(
            "concern level",
            ", suggesting that awareness could be improved.",
        )],
        InsightTemplate::Importance if average >= 4.0 => vec![
            headline(
                " of respondents think learning about climate change in school is very important.",
            ),
            average_line(
                "importance rating",
                ", showing strong support for climate education.",
            ),
        ],
        InsightTemplate::Importance => vec![average_line(
            "importance rating",
            " for learning about climate change in school.",
        )],
        InsightTemplate::Interest if average >= 4.0 => vec![
            headline(
                " of respondents are very interested in learning more about protecting the environment.",
            ),
            average_line("interest level", ", indicating high engagement potential."),
        ],
        InsightTemplate::Interest => vec![average_line(
            "interest level",
            " for learning more about environmental protection.",
        )],
        InsightTemplate::Confidence if average >= 4.0 => vec![
            headline(" of respondents feel very confident explaining climate change to others."),
            average_line("confidence level", ", showing strong knowledge."),
        ],
        InsightTemplate::Confidence if average <= 2.0 => vec![average_line(
            "confidence level",
            ", suggesting that more education on climate change is needed.",
        )],
        InsightTemplate::Confidence => vec![average_line(
            "confidence level",
            " for explaining climate change to others.",
        )],
        _ => Vec::new(),
    }
}

fn single_choice_insights(
    template: InsightTemplate,
    counts: &[OptionCount],
    total: u64,
    language: &str,
) -> Vec<Insight> {
    let dominant = match dominant_option(counts) {
        Some(dominant) => dominant,
        None => return Vec::new(),
    };
    let share = format_percentage(dominant.count, total);
    let shown = dominant.text_i18n.get(language).to_lowercase();
    // Follow-up sentences are keyed to the English option text so they work
    // in every language.
    let key = dominant.text_i18n.english();

    let (headline, follow_up) = match template {
        InsightTemplate::TalkFrequency => (
            format!(" of respondents {shown} talk about climate change with their family."),
            match key {
                "Very often" | "Often" => Some(
                    "This indicates that climate change is a regular topic of discussion in many households.",
                ),
                "Never" => Some(
                    "This suggests an opportunity to encourage more family discussions about climate change.",
                ),
                _ => None,
            },
        ),
        InsightTemplate::Commute => (
            format!(" of respondents usually {shown} to school."),
            match key {
                "Walk" | "Bicycle" => Some(
                    "This is encouraging as active transportation reduces carbon emissions.",
                ),
                "Car" => Some(
                    "This highlights an area where sustainable transportation options could be promoted.",
                ),
                _ => None,
            },
        ),
        InsightTemplate::NatureTime => (
            format!(" of respondents {shown} spend time in nature."),
            match key {
                "Every day" | "A few times a week" => Some(
                    "This strong connection to nature can foster environmental stewardship.",
                ),
                "Rarely" => Some(
                    "Increasing time in nature could help strengthen environmental awareness.",
                ),
                _ => None,
            },
        ),
        InsightTemplate::LearningFeeling => (
            format!(" of respondents feel {shown} when learning about ways to help the environment."),
            match key {
                "Very excited" | "Hopeful" => Some(
                    "This positive emotional response is encouraging for environmental education efforts.",
                ),
                "Confused" => Some(
                    "This suggests a need for clearer communication about environmental actions.",
                ),
                _ => None,
            },
        ),
        _ => return Vec::new(),
    };

    let mut insights = vec![Insight::new().strong(share).text(headline)];
    insights.extend(follow_up.map(|sentence| Insight::new().text(sentence)));
    insights
}

fn multiple_choice_insights(
    template: InsightTemplate,
    counts: &[OptionCount],
    total: u64,
    language: &str,
) -> Vec<Insight> {
    let heading = match template {
        InsightTemplate::NoticedEffects => {
            "The most commonly noticed climate change effects in respondents' areas are:"
        }
        InsightTemplate::HomeActions => "The most common environmental actions taken at home are:",
        InsightTemplate::Topics => {
            "The environmental topics respondents are most interested in learning about are:"
        }
        InsightTemplate::WorryingEffects => {
            "The climate change effects that worry respondents the most are:"
        }
        InsightTemplate::Solutions => {
            "The solutions respondents think are most effective for climate change are:"
        }
        InsightTemplate::Sources => "The most common sources for learning about climate change are:",
        _ => return Vec::new(),
    };

    let mut insights = vec![Insight::new().text(heading)];
    insights.extend(
        ranked_options(counts)
            .into_iter()
            .take(TOP_OPTIONS)
            .map(|option| {
                Insight::bullet()
                    .strong(option.text_i18n.get(language))
                    .text(format!(" ({})", format_percentage(option.count, total)))
            }),
    );
    insights
}
