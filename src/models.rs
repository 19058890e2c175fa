use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Display name used when a feedback campaign points at a project that no
/// longer exists (or never did).
pub const UNKNOWN_PROJECT: &str = "Unknown";

// Closed vocabularies shared by the records, the filters and the forms.
// Values parse case-insensitively and accept '-' or ' ' in place of '_'.
macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            pub fn parse(value: &str) -> Option<Self> {
                let normalized = value.trim().replace(&['-', ' '][..], "_");
                Self::ALL
                    .iter()
                    .copied()
                    .find(|choice| choice.as_str().eq_ignore_ascii_case(&normalized))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choice_enum!(
    /// Lifecycle of a project. `Planning` is what new projects start as.
    ProjectStatus {
        Planning => "planning",
        Active => "active",
        Completed => "completed",
        Delayed => "delayed",
        Cancelled => "cancelled",
        Upcoming => "upcoming",
    }
);

choice_enum!(FeedbackStatus {
    Upcoming => "upcoming",
    Active => "active",
    Completed => "completed",
});

choice_enum!(QuestionType {
    Text => "text",
    MultipleChoice => "multiple_choice",
    Sentiment => "sentiment",
    Rating => "rating",
    SingleChoice => "single_choice",
});

choice_enum!(Sentiment {
    Positive => "positive",
    Neutral => "neutral",
    Negative => "negative",
});

choice_enum!(Priority {
    High => "high",
    Medium => "medium",
    Low => "low",
});

/// Yes/no answers as typed into forms and filters.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "yes" | "y" | "true" => Some(true),
        "no" | "n" | "false" => Some(false),
        _ => None,
    }
}

pub fn flag_name(flag: &bool) -> &'static str {
    if *flag {
        "yes"
    } else {
        "no"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamMember {
    pub id: u32,
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRecord {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub dates: DateRange,
    pub status: ProjectStatus,
    /// Percent complete, always within 0..=100.
    pub progress: u8,
    pub team: Vec<TeamMember>,
    pub responses: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackRecord {
    pub id: u32,
    pub title: String,
    /// Not enforced: may point at a project that is not in the collection.
    pub project_id: u32,
    pub description: String,
    pub dates: DateRange,
    pub status: FeedbackStatus,
    pub question_ids: Vec<u32>,
    pub responses: u32,
    pub sentiment: Option<Sentiment>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerOption {
    pub text: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionRecord {
    pub id: u32,
    pub text: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub category: String,
    pub required: bool,
    pub options: Vec<AnswerOption>,
    pub usage_count: u32,
    pub response_count: u32,
    pub last_used: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigItem {
    pub key_name: String,
    pub value: String,
    pub description: String,
    pub is_default: bool,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PopupMode {
    None,
    Search,
    Form,
}
