//! A simple CLI tool for summarising exported survey responses offline.
//! This uses the server's own aggregation and insight code, so its output
//! matches the results endpoints.

use std::fs::File;
use std::io::BufReader;

use clap::{Arg, ArgAction, ArgMatches, Command};
use rocket::serde::json::serde_json;
use serde::Deserialize;

use survey_backend::aggregation::aggregate_survey;
use survey_backend::insight::generate_insights;
use survey_backend::model::{
    api::{results::SurveyResults, survey::SurveyDescription},
    common::{Answer, FALLBACK_LANGUAGE},
    db::survey::{Survey, SurveyCore},
};

const PROGRAM_NAME: &str = "survey-results";

const ABOUT_TEXT: &str = "Aggregate exported survey responses and describe the results.

EXIT CODES:
     0: Success.
     1: The export could not be read.";

const EXPORT_PATH: &str = "EXPORT_PATH";

const EXPORT_PATH_HELP: &str = "The path to a JSON export of the form\n\
{\"survey\": ..., \"responses\": [{\"answers\": [...]}, ...]},\n\
where the survey is as returned by `GET /surveys/<survey_id>`";

const INSIGHTS: &str = "insights";

const LANGUAGE: &str = "lang";

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME)
        .about(ABOUT_TEXT)
        .arg(
            Arg::new(EXPORT_PATH)
                .help(EXPORT_PATH_HELP)
                .action(ArgAction::Set)
                .required(true),
        )
        .arg(
            Arg::new(INSIGHTS)
                .long(INSIGHTS)
                .short('i')
                .help("Print narrative insights instead of JSON results")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(LANGUAGE)
                .long(LANGUAGE)
                .short('l')
                .help("Language for question and option text")
                .action(ArgAction::Set)
                .default_value(FALLBACK_LANGUAGE),
        )
}

/// Errors that this program may produce.
#[derive(Debug, Eq, PartialEq)]
enum Error {
    /// IO error described by the inner message.
    IO(String),
    /// Failed to decode the JSON export.
    Format(String),
}

#[derive(Deserialize)]
struct Export {
    survey: SurveyDescription,
    #[serde(default)]
    responses: Vec<ExportedResponse>,
}

#[derive(Deserialize)]
struct ExportedResponse {
    answers: Vec<Answer>,
}

/// Load an export and aggregate it.
fn summarise(path: &str) -> Result<SurveyResults, Error> {
    // Load the file.
    let file = BufReader::new(File::open(path).map_err(|e| Error::IO(e.to_string()))?);
    let export: Export = serde_json::from_reader(file).map_err(|e| Error::Format(e.to_string()))?;

    let survey = Survey {
        id: export.survey.id,
        survey: SurveyCore {
            title_i18n: export.survey.title_i18n,
            description_i18n: export.survey.description_i18n,
            questions: export.survey.questions,
        },
    };
    let answers = export.responses.iter().map(|r| r.answers.as_slice());
    Ok(aggregate_survey(&survey, answers))
}

/// Render the insights for every question as text.
fn describe(results: &SurveyResults, language: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for result in &results.results {
        let insights = generate_insights(result, language);
        if insights.is_empty() {
            continue;
        }
        lines.push(format!("{}:", result.text_i18n.get(language)));
        lines.extend(insights.iter().map(|insight| format!("  {insight}")));
    }
    lines
}

/// Run the summary, print it, and return the exit code.
fn run(args: &ArgMatches) -> u8 {
    let path: &String = args.get_one(EXPORT_PATH).unwrap(); // Required argument is guaranteed to be present.
    let language: &String = args.get_one(LANGUAGE).unwrap(); // Has a default.
    match summarise(path) {
        Ok(results) if args.get_flag(INSIGHTS) => {
            println!(
                "{} ({} responses)",
                results.survey_title.get(language),
                results.total_responses
            );
            for line in describe(&results, language) {
                println!("{line}");
            }
            0
        }
        Ok(results) => match serde_json::to_string_pretty(&results) {
            Ok(json) => {
                println!("{json}");
                0
            }
            Err(e) => {
                println!("Failed to encode results: {e}");
                1
            }
        },
        Err(Error::IO(msg)) => {
            println!("IO error: {}", msg);
            1
        }
        Err(Error::Format(msg)) => {
            println!("Invalid JSON: {}", msg);
            1
        }
    }
}

fn main() {
    let args = cli().get_matches();
    let exit_code = run(&args);
    std::process::exit(exit_code.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary() {
        log4rs_test_utils::test_logging::init_logging_once_for(["survey_backend"], None, None);

        let results = summarise("example_dumps/survey.json").unwrap();
        assert_eq!(results.total_responses, 5);
        assert_eq!(results.results[0].data.average_rating, Some(4.4));

        assert_eq!(
            describe(&results, "en"),
            vec![
                "How worried are you about climate change?:",
                "  **60%** of respondents are very worried about climate change.",
                "  The average concern level is **4.4** out of 5, indicating high awareness.",
                "How often do you talk about climate change with your family?:",
                "  **60%** of respondents often talk about climate change with their family.",
                "  This indicates that climate change is a regular topic of discussion in many households.",
            ]
        );

        let turkish = describe(&results, "tr");
        assert_eq!(
            turkish[4],
            "  **60%** of respondents sık talk about climate change with their family."
        );
    }

    #[test]
    fn unreadable_exports() {
        assert!(matches!(
            summarise("example_dumps/survey_malformed.json"),
            Err(Error::Format(_))
        ));
        assert!(matches!(summarise("not a real file"), Err(Error::IO(_))));
    }

    #[test]
    fn correct_cli_usage() {
        let command_line = [PROGRAM_NAME, "example_dumps/survey.json"];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(run(&args), 0);

        let command_line = [PROGRAM_NAME, "--insights", "--lang", "tr", "example_dumps/survey.json"];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(run(&args), 0);

        let command_line = [PROGRAM_NAME, "example_dumps/survey_malformed.json"];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(run(&args), 1);

        let command_line = [PROGRAM_NAME, "not a real file"];
        let args = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(run(&args), 1);
    }

    #[test]
    fn bad_cli_usage() {
        // Too many paths.
        let command_line = [PROGRAM_NAME, "this", "invocation", "is", "incorrect"];
        cli().try_get_matches_from(command_line).unwrap_err();

        // No options at all.
        let command_line = [PROGRAM_NAME];
        cli().try_get_matches_from(command_line).unwrap_err();
    }
}
