//! The climate change survey installed into an empty database.

use log::info;

use crate::error::Result;
use crate::insight::InsightTemplate;
use crate::model::{
    common::{LocalizedText, QuestionType},
    db::survey::{Question, Survey, SurveyCore, SurveyOption},
    mongodb::Coll,
};

/// `(english, turkish)` text pair.
type Text = (&'static str, &'static str);

fn localized((en, tr): Text) -> LocalizedText {
    LocalizedText::new().with("en", en).with("tr", tr)
}

struct QuestionSeed {
    text: Text,
    /// Wire tag of the question type.
    question_type: &'static str,
    insight: InsightTemplate,
    options: &'static [Text],
}

const QUESTIONS: &[QuestionSeed] = &[
    QuestionSeed {
        text: (
            "How worried are you about climate change?",
            "İklim değişikliği konusunda ne kadar endişelisin?",
        ),
        question_type: "RATING",
        insight: InsightTemplate::Worry,
        options: &[],
    },
    QuestionSeed {
        text: (
            "How often do you talk about climate change with your family?",
            "Ailenle iklim değişikliği hakkında ne sıklıkla konuşursun?",
        ),
        question_type: "SINGLE_CHOICE",
        insight: InsightTemplate::TalkFrequency,
        options: &[
            ("Very often", "Çok sık"),
            ("Often", "Sık"),
            ("Sometimes", "Bazen"),
            ("Rarely", "Nadiren"),
            ("Never", "Hiçbir zaman"),
        ],
    },
    QuestionSeed {
        text: (
            "Which of these have you noticed in your area?",
            "Bölgende bunlardan hangilerini fark ettin?",
        ),
        question_type: "MULTIPLE_CHOICE",
        insight: InsightTemplate::NoticedEffects,
        options: &[
            ("Hotter summers", "Daha sıcak yazlar"),
            ("Less snow in winter", "Kışın daha az kar"),
            ("More storms", "Daha fazla fırtına"),
            ("Floods", "Seller"),
            ("Droughts", "Kuraklık"),
            ("Forest fires", "Orman yangınları"),
        ],
    },
    QuestionSeed {
        text: (
            "How important do you think it is to learn about climate change in school?",
            "Okulda iklim değişikliğini öğrenmenin ne kadar önemli olduğunu düşünüyorsun?",
        ),
        question_type: "RATING",
        insight: InsightTemplate::Importance,
        options: &[],
    },
    QuestionSeed {
        text: (
            "Which of these do you do at home?",
            "Evde bunlardan hangilerini yapıyorsun?",
        ),
        question_type: "MULTIPLE_CHOICE",
        insight: InsightTemplate::HomeActions,
        options: &[
            ("Recycling", "Geri dönüşüm"),
            ("Turning off lights", "Işıkları kapatmak"),
            ("Saving water", "Su tasarrufu"),
            ("Composting", "Kompost yapmak"),
            ("Using less plastic", "Daha az plastik kullanmak"),
        ],
    },
    QuestionSeed {
        text: (
            "How do you usually get to school?",
            "Okula genellikle nasıl gidersin?",
        ),
        question_type: "SINGLE_CHOICE",
        insight: InsightTemplate::Commute,
        options: &[
            ("Walk", "Yürüyerek"),
            ("Bicycle", "Bisikletle"),
            ("Bus", "Otobüsle"),
            ("Car", "Arabayla"),
        ],
    },
    QuestionSeed {
        text: (
            "How interested are you in learning more about protecting the environment?",
            "Çevreyi korumak hakkında daha fazla şey öğrenmeye ne kadar ilgilisin?",
        ),
        question_type: "RATING",
        insight: InsightTemplate::Interest,
        options: &[],
    },
    QuestionSeed {
        text: (
            "Which environmental topics would you like to learn more about?",
            "Hangi çevre konularında daha fazla şey öğrenmek istersin?",
        ),
        question_type: "MULTIPLE_CHOICE",
        insight: InsightTemplate::Topics,
        options: &[
            ("Renewable energy", "Yenilenebilir enerji"),
            ("Protecting animals", "Hayvanları korumak"),
            ("Ocean pollution", "Okyanus kirliliği"),
            ("Forests", "Ormanlar"),
            ("Recycling", "Geri dönüşüm"),
        ],
    },
    QuestionSeed {
        text: (
            "How often do you spend time in nature?",
            "Doğada ne sıklıkla vakit geçirirsin?",
        ),
        question_type: "SINGLE_CHOICE",
        insight: InsightTemplate::NatureTime,
        options: &[
            ("Every day", "Her gün"),
            ("A few times a week", "Haftada birkaç kez"),
            ("Once a week", "Haftada bir"),
            ("Rarely", "Nadiren"),
        ],
    },
    QuestionSeed {
        text: (
            "How confident do you feel about explaining climate change to a friend?",
            "İklim değişikliğini bir arkadaşına açıklama konusunda kendine ne kadar güveniyorsun?",
        ),
        question_type: "RATING",
        insight: InsightTemplate::Confidence,
        options: &[],
    },
    QuestionSeed {
        text: (
            "Which of these climate change effects worry you the most?",
            "İklim değişikliğinin bu etkilerinden hangileri seni en çok endişelendiriyor?",
        ),
        question_type: "MULTIPLE_CHOICE",
        insight: InsightTemplate::WorryingEffects,
        options: &[
            ("Rising sea levels", "Yükselen deniz seviyesi"),
            ("Extreme weather", "Aşırı hava olayları"),
            ("Animals losing their homes", "Yuvasını kaybeden hayvanlar"),
            ("Food and water shortages", "Gıda ve su kıtlığı"),
            ("Air pollution", "Hava kirliliği"),
        ],
    },
    QuestionSeed {
        text: (
            "How do you feel when you learn about ways to help the environment?",
            "Çevreye yardım etmenin yollarını öğrendiğinde kendini nasıl hissedersin?",
        ),
        question_type: "SINGLE_CHOICE",
        insight: InsightTemplate::LearningFeeling,
        options: &[
            ("Very excited", "Çok heyecanlı"),
            ("Hopeful", "Umutlu"),
            ("Neutral", "Kararsız"),
            ("Worried", "Endişeli"),
            ("Confused", "Kafası karışık"),
        ],
    },
    QuestionSeed {
        text: (
            "Which of these do you think are good solutions for climate change?",
            "Sence bunlardan hangileri iklim değişikliği için iyi çözümlerdir?",
        ),
        question_type: "MULTIPLE_CHOICE",
        insight: InsightTemplate::Solutions,
        options: &[
            ("Planting trees", "Ağaç dikmek"),
            ("Solar and wind power", "Güneş ve rüzgar enerjisi"),
            ("Using public transport", "Toplu taşıma kullanmak"),
            ("Eating less meat", "Daha az et yemek"),
            ("Reducing waste", "Atığı azaltmak"),
        ],
    },
    QuestionSeed {
        text: (
            "How often do you learn about climate change from these sources?",
            "İklim değişikliğini bu kaynaklardan ne sıklıkla öğreniyorsun?",
        ),
        question_type: "MULTIPLE_CHOICE",
        insight: InsightTemplate::Sources,
        options: &[
            ("School", "Okul"),
            ("Family", "Aile"),
            ("Television", "Televizyon"),
            ("Internet", "İnternet"),
            ("Books", "Kitaplar"),
        ],
    },
    QuestionSeed {
        text: (
            "How important is recycling to you?",
            "Geri dönüşüm senin için ne kadar önemli?",
        ),
        question_type: "RATING",
        // The question text would otherwise pick up the school template.
        insight: InsightTemplate::Disabled,
        options: &[],
    },
];

/// Build the climate change survey with fresh IDs.
pub fn climate_survey() -> Survey {
    let questions = QUESTIONS
        .iter()
        .zip(1..)
        .map(|(seed, order)| Question {
            id: Default::default(),
            text_i18n: localized(seed.text),
            question_type: QuestionType::from(seed.question_type.to_string()),
            required: true,
            order,
            options: seed
                .options
                .iter()
                .zip(1..)
                .map(|(text, order)| SurveyOption {
                    id: Default::default(),
                    text_i18n: localized(*text),
                    order,
                })
                .collect(),
            insight: Some(seed.insight),
        })
        .collect();

    Survey::new(SurveyCore {
        title_i18n: localized((
            "Climate Change Awareness Survey",
            "İklim Değişikliği Farkındalık Anketi",
        )),
        description_i18n: Some(localized((
            "Help us understand what you think and do about climate change",
            "İklim değişikliği hakkında ne düşündüğünü ve neler yaptığını anlamamıza yardım et",
        ))),
        questions,
    })
}

/// Install the climate change survey if there are no surveys at all.
pub async fn ensure_survey_exists(surveys: &Coll<Survey>) -> Result<()> {
    if surveys.count_documents(None, None).await? == 0 {
        let survey = climate_survey();
        surveys.insert_one(&survey, None).await?;
        info!("Seeded survey {}", survey.id);
    }
    Ok(())
}
