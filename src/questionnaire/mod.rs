//! Static definition of the survey instrument.
//!
//! Everything questionnaire-specific lives here as data: the literal header
//! texts of the export, the option catalogs for multi-select questions, the
//! label→code mappings, the rename table and the target column order. A
//! revision of the survey instrument should only ever touch this module;
//! the pipeline stages themselves are generic over these tables.
//!
//! Mapping texts are reproduced exactly as they appear in the export,
//! including the mixed hyphen/en-dash spellings in the income brackets: the
//! code map has to match the raw answer text byte-for-byte.

use chrono::NaiveDate;
use once_cell::sync::Lazy;

// =============================================================================
// Column header texts (as exported)
// =============================================================================

pub const ID: &str = "ID";
pub const GENDER: &str = "What is your gender?";
pub const AGE: &str = "What is your age?";
pub const POSTCODE: &str = "What is your postcode?";
pub const AWARENESS: &str =
    "Which of the following brands of electricity providers are you aware of?";
pub const MAIN_PROVIDER: &str = "And which ONE of these brands is your main provider?";
pub const FAVOURABILITY: &str =
    "Thinking about 'Origin', how favourable is your overall impression of them?";
pub const RECOMMEND: &str = "How likely are you to recommend 'Origin' to friends or family?";
pub const RECOMMEND_WHY: &str =
    "You said you would be [unlikely/likely] to recommend 'Origin'. Why do you say that?";
pub const RATING_TRUST: &str =
    "How would you rate 'Origin' on each of the following? (Trustworthiness)";
pub const RATING_VALUE: &str =
    "How would you rate 'Origin' on each of the following? (Value for money)";
pub const RATING_SERVICE: &str =
    "How would you rate 'Origin' on each of the following? (Customer service)";
pub const RATING_INNOVATION: &str =
    "How would you rate 'Origin' on each of the following? (Innovation)";
pub const AD_EXPOSURE: &str =
    "In the past 12 months, have you seen or heard any advertising for 'Origin'?";
pub const AD_CHANNELS: &str = "Where did you see or hear advertising for 'Origin'?";
pub const WORK_STATUS: &str = "Which of the following best describes your current work status?";
pub const INCOME: &str =
    "Which of the following best describes your total annual household income?";
pub const HOUSEHOLD: &str = "Which of the following best describes your household structure?";
pub const COMPLETED_DATE: &str = "CompletedDate";
pub const WAVE: &str = "Wave";

/// Companion free-text column for the "Other (please specify)" option of a
/// question, as named by the survey platform.
pub fn other_column(base: &str) -> String {
    format!("{base} (Other (please specify))")
}

// =============================================================================
// Instrument constants
// =============================================================================

pub const OTHER_LABEL: &str = "Other (please specify)";
pub const NONE_LABEL: &str = "None of these";
/// The brand the evaluation block (Q3–Q5) is asked about.
pub const TARGET_BRAND: &str = "Origin";
/// Age bracket that should have terminated the survey.
pub const DISQUALIFYING_AGE: &str = "Under 18";
/// Q6 answers that skip the advertising-channel follow-up.
pub const AD_EXPOSURE_NEGATIVE: &[&str] = &["No", "Don't know"];

/// Key fields a usable respondent record must carry.
pub const KEY_COLUMNS: &[&str] = &[GENDER, AGE, POSTCODE, COMPLETED_DATE];

/// Brand block gated by the awareness "None of these" skip (Q2–Q5).
pub const BRAND_BLOCK: &[&str] = &[
    MAIN_PROVIDER,
    FAVOURABILITY,
    RECOMMEND,
    RATING_TRUST,
    RATING_VALUE,
    RATING_SERVICE,
    RATING_INNOVATION,
];

/// Evaluation block only the target brand's customers should answer (Q3–Q5).
pub const EVALUATION_BLOCK: &[&str] = &[
    FAVOURABILITY,
    RECOMMEND,
    RATING_TRUST,
    RATING_VALUE,
    RATING_SERVICE,
    RATING_INNOVATION,
];

/// Monday the fieldwork started; wave 1 is the week commencing this date.
pub static WAVE_ANCHOR: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(2025, 8, 4).expect("valid anchor date"));

// =============================================================================
// Multi-select questions
// =============================================================================

/// A multi-select question: source column, short code and its ordered option
/// catalog of (label, option code) pairs.
#[derive(Debug, Clone, Copy)]
pub struct MultiQuestion {
    pub code: &'static str,
    pub column: &'static str,
    pub options: &'static [(&'static str, &'static str)],
}

/// Q1: brand awareness.
pub const Q1_MULTI: MultiQuestion = MultiQuestion {
    code: "Q1",
    column: AWARENESS,
    options: &[
        ("Synergy", "1"),
        ("Western Power", "2"),
        ("AGL", "3"),
        ("Origin", "4"),
        ("Horizon Power", "5"),
        ("Red Energy", "6"),
        (OTHER_LABEL, "97"),
        (NONE_LABEL, "99"),
    ],
};

/// Q7: advertising channels.
pub const Q7_MULTI: MultiQuestion = MultiQuestion {
    code: "Q7",
    column: AD_CHANNELS,
    options: &[
        ("TV", "1"),
        ("Online / Social media", "2"),
        ("Outdoor (billboards, bus stops, etc.)", "3"),
        ("Radio", "4"),
        ("Print (newspaper, magazine)", "5"),
        (OTHER_LABEL, "97"),
    ],
};

pub const MULTI_QUESTIONS: &[MultiQuestion] = &[Q1_MULTI, Q7_MULTI];

// =============================================================================
// Scalar categorical questions (label → code)
// =============================================================================

/// A scalar categorical question and its exact label→code mapping.
#[derive(Debug, Clone, Copy)]
pub struct CodedQuestion {
    pub column: &'static str,
    pub map: &'static [(&'static str, i64)],
}

const GENDER_MAP: &[(&str, i64)] = &[
    ("Male", 1),
    ("Female", 2),
    ("Non-binary / Other", 3),
    ("Prefer not to say", 99),
];

const AGE_MAP: &[(&str, i64)] = &[
    ("18-24", 2),
    ("25-34", 3),
    ("35-44", 4),
    ("45-54", 5),
    ("55-64", 6),
    ("65+", 7),
];

const PROVIDER_MAP: &[(&str, i64)] = &[
    ("Synergy", 1),
    ("Western Power", 2),
    ("AGL", 3),
    ("Origin", 4),
    ("Horizon Power", 5),
    ("Red Energy", 6),
    (OTHER_LABEL, 97),
    (NONE_LABEL, 99),
];

const FAVOURABILITY_MAP: &[(&str, i64)] = &[
    ("Very unfavourable", 1),
    ("Somewhat unfavourable", 2),
    ("Neutral", 3),
    ("Somewhat favourable", 4),
    ("Very favourable", 5),
];

const RATING_MAP: &[(&str, i64)] = &[
    ("Very poor", 1),
    ("Poor", 2),
    ("Fair", 3),
    ("Good", 4),
    ("Excellent", 5),
    ("Don't know", 98),
];

const AD_EXPOSURE_MAP: &[(&str, i64)] = &[("Yes", 1), ("No", 2), ("Don't know", 98)];

const WORK_MAP: &[(&str, i64)] = &[
    ("Working full time", 1),
    ("Working part time", 2),
    ("Self-employed", 3),
    ("Student", 4),
    ("Unemployed and looking for work", 5),
    ("Retired", 6),
    (OTHER_LABEL, 97),
];

const INCOME_MAP: &[(&str, i64)] = &[
    ("Less than $30,000", 1),
    ("$30,000-$59,999", 2),
    ("$60,000\u{2013}$89,999", 3),
    ("$90,000\u{2013}$119,999", 4),
    ("$120,000\u{2013}$149,999", 5),
    ("$150,000 or more", 6),
    ("Prefer not to say", 99),
];

const HOUSEHOLD_MAP: &[(&str, i64)] = &[
    ("Live alone", 1),
    ("Single, no children", 2),
    ("Single parent with children at home", 3),
    ("Couple, no children", 4),
    ("Couple, with children at home", 5),
    ("Group household / share house", 6),
    (OTHER_LABEL, 97),
];

/// Every scalar categorical column and its mapping, in questionnaire order.
/// The recommend scale (Q4a) is handled separately by the code mapper.
pub const CODED_QUESTIONS: &[CodedQuestion] = &[
    CodedQuestion { column: GENDER, map: GENDER_MAP },
    CodedQuestion { column: AGE, map: AGE_MAP },
    CodedQuestion { column: MAIN_PROVIDER, map: PROVIDER_MAP },
    CodedQuestion { column: FAVOURABILITY, map: FAVOURABILITY_MAP },
    CodedQuestion { column: RATING_TRUST, map: RATING_MAP },
    CodedQuestion { column: RATING_VALUE, map: RATING_MAP },
    CodedQuestion { column: RATING_SERVICE, map: RATING_MAP },
    CodedQuestion { column: RATING_INNOVATION, map: RATING_MAP },
    CodedQuestion { column: AD_EXPOSURE, map: AD_EXPOSURE_MAP },
    CodedQuestion { column: WORK_STATUS, map: WORK_MAP },
    CodedQuestion { column: INCOME, map: INCOME_MAP },
    CodedQuestion { column: HOUSEHOLD, map: HOUSEHOLD_MAP },
];

// =============================================================================
// Schema normalization
// =============================================================================

/// Header text → short variable code. Companion "Other" columns are added by
/// [`rename_table`] because their names are derived.
const RENAME_BASE: &[(&str, &str)] = &[
    (ID, "ID"),
    (GENDER, "S1"),
    (AGE, "S2"),
    (POSTCODE, "S3"),
    (MAIN_PROVIDER, "Q2"),
    (FAVOURABILITY, "Q3"),
    (RECOMMEND, "Q4a"),
    (RECOMMEND_WHY, "Q4b"),
    (RATING_TRUST, "Q5_1"),
    (RATING_VALUE, "Q5_2"),
    (RATING_SERVICE, "Q5_3"),
    (RATING_INNOVATION, "Q5_4"),
    (AD_EXPOSURE, "Q6"),
    (WORK_STATUS, "D1"),
    (INCOME, "D2"),
    (HOUSEHOLD, "D3"),
    (COMPLETED_DATE, "CompletedDate"),
];

/// Full rename table including the derived companion free-text columns.
pub static RENAME_TABLE: Lazy<Vec<(String, String)>> = Lazy::new(|| {
    let mut table: Vec<(String, String)> = RENAME_BASE
        .iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();
    table.push((other_column(AWARENESS), "Q1_97_Oth".into()));
    table.push((other_column(MAIN_PROVIDER), "Q2_97_Oth".into()));
    table.push((other_column(AD_CHANNELS), "Q7_97_Oth".into()));
    table.push((other_column(WORK_STATUS), "D1_97_Oth".into()));
    table.push((other_column(HOUSEHOLD), "D3_97_Oth".into()));
    table
});

/// Target output column order. Columns absent from the dataset are omitted;
/// extras are appended after, keeping their relative order.
pub const COLUMN_ORDER: &[&str] = &[
    "ID", "S1", "S2", "S3",
    // Q1 awareness indicators
    "Q1_1", "Q1_2", "Q1_3", "Q1_4", "Q1_5", "Q1_6", "Q1_99", "Q1_97", "Q1_97_Oth",
    // main provider
    "Q2", "Q2_97_Oth",
    // evaluation block
    "Q3", "Q4a", "Q4b", "Q5_1", "Q5_2", "Q5_3", "Q5_4",
    // advertising
    "Q6",
    // Q7 channel indicators
    "Q7_1", "Q7_2", "Q7_3", "Q7_4", "Q7_5", "Q7_97", "Q7_97_Oth",
    // demographics
    "D1", "D1_97_Oth", "D2", "D3", "D3_97_Oth",
    // wave and completion timestamp
    "Wave", "CompletedDate",
];

/// Multi-select source columns that must not survive into the output.
pub const MULTI_SOURCE_COLUMNS: &[&str] = &[AWARENESS, AD_CHANNELS];

// =============================================================================
// Label texts (for the metadata builder)
// =============================================================================

/// Question text per scalar output variable.
pub const QUESTION_TEXTS: &[(&str, &str)] = &[
    ("ID", "Respondent ID"),
    ("S1", GENDER),
    ("S2", AGE),
    ("S3", POSTCODE),
    ("Q2", MAIN_PROVIDER),
    ("Q3", FAVOURABILITY),
    ("Q4a", RECOMMEND),
    ("Q4b", RECOMMEND_WHY),
    ("Q6", AD_EXPOSURE),
    ("D1", WORK_STATUS),
    ("D2", INCOME),
    ("D3", HOUSEHOLD),
    ("Wave", "Data collection wave"),
    ("CompletedDate", "Completion date and time"),
];

/// Q5 is a rating grid: one output column per facet, labelled
/// `{base} - {facet}`.
pub const Q5_BASE_TEXT: &str = "How would you rate 'Origin' on each of the following?";
pub const Q5_FACETS: &[(&str, &str)] = &[
    ("1", "Trustworthiness"),
    ("2", "Value for money"),
    ("3", "Customer service"),
    ("4", "Innovation"),
];

/// Companion free-text columns and the base question they belong to.
pub const OTHER_TEXT_COLUMNS: &[(&str, &str)] = &[
    ("Q1_97_Oth", AWARENESS),
    ("Q2_97_Oth", MAIN_PROVIDER),
    ("Q7_97_Oth", AD_CHANNELS),
    ("D1_97_Oth", WORK_STATUS),
    ("D3_97_Oth", HOUSEHOLD),
];

/// Value labels per coded output variable. Display texts use the
/// typographically-correct en-dashes throughout, independent of what the raw
/// export contained.
pub const VALUE_LABEL_TABLES: &[(&str, &[(i64, &str)])] = &[
    ("S1", &[(1, "Male"), (2, "Female"), (3, "Non-binary / Other"), (99, "Prefer not to say")]),
    ("S2", &[(2, "18-24"), (3, "25-34"), (4, "35-44"), (5, "45-54"), (6, "55-64"), (7, "65+")]),
    (
        "Q2",
        &[
            (1, "Synergy"),
            (2, "Western Power"),
            (3, "AGL"),
            (4, "Origin"),
            (5, "Horizon Power"),
            (6, "Red Energy"),
            (97, OTHER_LABEL),
            (99, NONE_LABEL),
        ],
    ),
    (
        "Q3",
        &[
            (1, "Very unfavourable"),
            (2, "Somewhat unfavourable"),
            (3, "Neutral"),
            (4, "Somewhat favourable"),
            (5, "Very favourable"),
        ],
    ),
    (
        "Q4a",
        &[
            (0, "Not at all likely"),
            (1, "1"),
            (2, "2"),
            (3, "3"),
            (4, "4"),
            (5, "5"),
            (6, "6"),
            (7, "7"),
            (8, "8"),
            (9, "9"),
            (10, "Extremely likely"),
        ],
    ),
    ("Q5_1", RATING_VALUE_LABELS),
    ("Q5_2", RATING_VALUE_LABELS),
    ("Q5_3", RATING_VALUE_LABELS),
    ("Q5_4", RATING_VALUE_LABELS),
    ("Q6", &[(1, "Yes"), (2, "No"), (98, "Don't know")]),
    (
        "D1",
        &[
            (1, "Working full time"),
            (2, "Working part time"),
            (3, "Self-employed"),
            (4, "Student"),
            (5, "Unemployed and looking for work"),
            (6, "Retired"),
            (97, OTHER_LABEL),
        ],
    ),
    (
        "D2",
        &[
            (1, "Less than $30,000"),
            (2, "$30,000\u{2013}$59,999"),
            (3, "$60,000\u{2013}$89,999"),
            (4, "$90,000\u{2013}$119,999"),
            (5, "$120,000\u{2013}$149,999"),
            (6, "$150,000 or more"),
            (99, "Prefer not to say"),
        ],
    ),
    (
        "D3",
        &[
            (1, "Live alone"),
            (2, "Single, no children"),
            (3, "Single parent with children at home"),
            (4, "Couple, no children"),
            (5, "Couple, with children at home"),
            (6, "Group household / share house"),
            (97, OTHER_LABEL),
        ],
    ),
    (
        "Wave",
        &[
            (1, "Week commencing 4th August"),
            (2, "Week commencing 11th August"),
            (3, "Week commencing 18th August"),
            (4, "Week commencing 25th August"),
        ],
    ),
];

const RATING_VALUE_LABELS: &[(i64, &str)] = &[
    (1, "Very poor"),
    (2, "Poor"),
    (3, "Fair"),
    (4, "Good"),
    (5, "Excellent"),
    (98, "Don't know"),
];

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_column_naming() {
        assert_eq!(
            other_column(AD_CHANNELS),
            "Where did you see or hear advertising for 'Origin'? (Other (please specify))"
        );
    }

    #[test]
    fn test_rename_table_covers_companions() {
        let targets: Vec<&str> = RENAME_TABLE.iter().map(|(_, to)| to.as_str()).collect();
        for oth in ["Q1_97_Oth", "Q2_97_Oth", "Q7_97_Oth", "D1_97_Oth", "D3_97_Oth"] {
            assert!(targets.contains(&oth), "missing rename target {oth}");
        }
    }

    #[test]
    fn test_column_order_contains_all_rename_targets() {
        for (_, to) in RENAME_TABLE.iter() {
            assert!(
                COLUMN_ORDER.contains(&to.as_str()),
                "rename target {to} not in column order"
            );
        }
    }

    #[test]
    fn test_every_coded_question_has_value_labels() {
        // Each coded source column renames to a code with a value table.
        let rename = |col: &str| -> Option<String> {
            RENAME_TABLE
                .iter()
                .find(|(from, _)| from == col)
                .map(|(_, to)| to.clone())
        };
        for q in CODED_QUESTIONS {
            let code = rename(q.column).expect("coded column renames");
            assert!(
                VALUE_LABEL_TABLES.iter().any(|(c, _)| *c == code),
                "no value labels for {code}"
            );
        }
    }

    #[test]
    fn test_wave_anchor_is_a_monday() {
        use chrono::Datelike;
        assert_eq!(WAVE_ANCHOR.weekday(), chrono::Weekday::Mon);
    }
}
