mod answer;
mod i18n;
mod question;

pub use answer::{Answer, AnswerValue};
pub use i18n::{LocalizedText, FALLBACK_LANGUAGE};
pub use question::{QuestionType, RATING_VALUES};
