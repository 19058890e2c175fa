//! Turning popup form input into typed records.
//!
//! Blank optional fields get defaults; anything typed has to parse.

use chrono::NaiveDate;
use thiserror::Error;

use crate::collection::Draft;
use crate::form::{Form, FormField};
use crate::models::{
    flag_name, parse_flag, AnswerOption, DateRange, FeedbackRecord, FeedbackStatus, Priority, ProjectRecord,
    ProjectStatus, QuestionRecord, QuestionType, Sentiment, TeamMember,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("fill in the required fields: {}", .0.join(", "))]
    MissingRequired(Vec<&'static str>),
    #[error("{field}: '{value}' is not valid ({expected})")]
    Invalid {
        field: &'static str,
        value: String,
        expected: String,
    },
    #[error("progress must be between 0 and 100, got {0}")]
    ProgressOutOfRange(i64),
    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

fn invalid(field: &'static str, value: &str, expected: impl Into<String>) -> FormError {
    FormError::Invalid {
        field,
        value: value.to_string(),
        expected: expected.into(),
    }
}

fn ensure_complete(form: &Form) -> Result<(), FormError> {
    let missing = form.missing_required();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(FormError::MissingRequired(missing))
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<Option<NaiveDate>, FormError> {
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(Some)
        .map_err(|_| invalid(field, value, "YYYY-MM-DD"))
}

/// Start defaults to `today`, end defaults to start.
fn parse_range(form: &Form, today: NaiveDate) -> Result<DateRange, FormError> {
    let start = parse_date(START, form.value(START))?.unwrap_or(today);
    let end = parse_date(END, form.value(END))?.unwrap_or(start);
    if end < start {
        return Err(FormError::EndBeforeStart { start, end });
    }
    Ok(DateRange::new(start, end))
}

fn parse_count(field: &'static str, value: &str) -> Result<u32, FormError> {
    if value.is_empty() {
        return Ok(0);
    }
    value.parse().map_err(|_| invalid(field, value, "a whole number"))
}

fn parse_choice<T: Copy>(
    field: &'static str,
    value: &str,
    parse: fn(&str) -> Option<T>,
    choices: &[T],
    names: fn(&T) -> &'static str,
) -> Result<Option<T>, FormError> {
    if value.is_empty() {
        return Ok(None);
    }
    parse(value).map(Some).ok_or_else(|| {
        let expected: Vec<&str> = choices.iter().map(names).collect();
        invalid(field, value, expected.join(" | "))
    })
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|item| !item.is_empty())
}

fn optional_text(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

pub const NAME: &str = "Name";
pub const TITLE: &str = "Title";
pub const TEXT: &str = "Question";
pub const DESCRIPTION: &str = "Description";
pub const START: &str = "Start date";
pub const END: &str = "End date";
pub const STATUS: &str = "Status";
pub const PROGRESS: &str = "Progress";
pub const TEAM: &str = "Team";
pub const PROJECT: &str = "Project id";
pub const QUESTIONS: &str = "Question ids";
pub const SENTIMENT: &str = "Sentiment";
pub const PRIORITY: &str = "Priority";
pub const CATEGORY: &str = "Category";
pub const TAGS: &str = "Tags";
pub const TYPE: &str = "Type";
pub const REQUIRED: &str = "Required";
pub const OPTIONS: &str = "Options";

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub dates: DateRange,
    pub status: ProjectStatus,
    pub progress: u8,
    pub team: Vec<TeamMember>,
}

impl ProjectDraft {
    pub fn form() -> Form {
        Form::new(
            "New Project",
            vec![
                FormField::new(NAME, "").required(),
                FormField::new(DESCRIPTION, ""),
                FormField::new(START, "YYYY-MM-DD, defaults to today"),
                FormField::new(END, "YYYY-MM-DD, defaults to start"),
                FormField::new(STATUS, "planning | active | completed | delayed | cancelled | upcoming"),
                FormField::new(PROGRESS, "0-100"),
                FormField::new(TEAM, "Name:Role, Name:Role"),
            ],
        )
    }

    pub fn from_form(form: &Form, today: NaiveDate) -> Result<Self, FormError> {
        ensure_complete(form)?;
        let status = parse_choice(
            STATUS,
            form.value(STATUS),
            ProjectStatus::parse,
            ProjectStatus::ALL,
            ProjectStatus::as_str,
        )?
        .unwrap_or(ProjectStatus::Planning);

        let raw_progress = form.value(PROGRESS);
        let progress = if raw_progress.is_empty() {
            0
        } else {
            let value: i64 = raw_progress
                .parse()
                .map_err(|_| invalid(PROGRESS, raw_progress, "a whole number"))?;
            u8::try_from(value)
                .ok()
                .filter(|p| *p <= 100)
                .ok_or(FormError::ProgressOutOfRange(value))?
        };

        let team = split_list(form.value(TEAM))
            .enumerate()
            .map(|(i, entry)| {
                let (name, role) = entry.split_once(':').unwrap_or((entry, ""));
                TeamMember {
                    id: i as u32 + 1,
                    name: name.trim().to_string(),
                    role: role.trim().to_string(),
                }
            })
            .collect();

        Ok(ProjectDraft {
            name: form.value(NAME).to_string(),
            description: form.value(DESCRIPTION).to_string(),
            dates: parse_range(form, today)?,
            status,
            progress,
            team,
        })
    }
}

impl Draft for ProjectDraft {
    type Record = ProjectRecord;

    fn into_record(self, id: u32) -> ProjectRecord {
        ProjectRecord {
            id,
            name: self.name,
            description: self.description,
            dates: self.dates,
            status: self.status,
            progress: self.progress,
            team: self.team,
            responses: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackDraft {
    pub title: String,
    pub project_id: u32,
    pub description: String,
    pub dates: DateRange,
    pub status: FeedbackStatus,
    pub question_ids: Vec<u32>,
    pub sentiment: Option<Sentiment>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub tags: Vec<String>,
}

impl FeedbackDraft {
    pub fn form() -> Form {
        Form::new(
            "New Feedback",
            vec![
                FormField::new(TITLE, "").required(),
                FormField::new(PROJECT, "id of the owning project"),
                FormField::new(DESCRIPTION, ""),
                FormField::new(START, "YYYY-MM-DD, defaults to today"),
                FormField::new(END, "YYYY-MM-DD, defaults to start"),
                FormField::new(STATUS, "upcoming | active | completed"),
                FormField::new(QUESTIONS, "comma separated ids"),
                FormField::new(SENTIMENT, "positive | neutral | negative"),
                FormField::new(PRIORITY, "high | medium | low"),
                FormField::new(CATEGORY, ""),
                FormField::new(TAGS, "comma separated"),
            ],
        )
    }

    pub fn from_form(form: &Form, today: NaiveDate) -> Result<Self, FormError> {
        ensure_complete(form)?;
        let status = parse_choice(
            STATUS,
            form.value(STATUS),
            FeedbackStatus::parse,
            FeedbackStatus::ALL,
            FeedbackStatus::as_str,
        )?
        .unwrap_or(FeedbackStatus::Upcoming);
        let sentiment = parse_choice(
            SENTIMENT,
            form.value(SENTIMENT),
            Sentiment::parse,
            Sentiment::ALL,
            Sentiment::as_str,
        )?;
        let priority = parse_choice(
            PRIORITY,
            form.value(PRIORITY),
            Priority::parse,
            Priority::ALL,
            Priority::as_str,
        )?;

        let mut question_ids: Vec<u32> = Vec::new();
        for raw in split_list(form.value(QUESTIONS)) {
            let id = raw
                .parse()
                .map_err(|_| invalid(QUESTIONS, raw, "comma separated ids"))?;
            if !question_ids.contains(&id) {
                question_ids.push(id);
            }
        }

        Ok(FeedbackDraft {
            title: form.value(TITLE).to_string(),
            project_id: parse_count(PROJECT, form.value(PROJECT))?,
            description: form.value(DESCRIPTION).to_string(),
            dates: parse_range(form, today)?,
            status,
            question_ids,
            sentiment,
            priority,
            category: optional_text(form.value(CATEGORY)),
            tags: split_list(form.value(TAGS)).map(str::to_string).collect(),
        })
    }
}

impl Draft for FeedbackDraft {
    type Record = FeedbackRecord;

    fn into_record(self, id: u32) -> FeedbackRecord {
        FeedbackRecord {
            id,
            title: self.title,
            project_id: self.project_id,
            description: self.description,
            dates: self.dates,
            status: self.status,
            question_ids: self.question_ids,
            responses: 0,
            sentiment: self.sentiment,
            priority: self.priority,
            category: self.category,
            tags: self.tags,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionDraft {
    pub text: String,
    pub description: Option<String>,
    pub kind: QuestionType,
    pub category: String,
    pub required: bool,
    pub options: Vec<AnswerOption>,
}

impl QuestionDraft {
    pub fn form() -> Form {
        Form::new(
            "New Question",
            vec![
                FormField::new(TEXT, "").required(),
                FormField::new(DESCRIPTION, ""),
                FormField::new(TYPE, "text | multiple_choice | sentiment | rating | single_choice"),
                FormField::new(CATEGORY, ""),
                FormField::new(REQUIRED, "yes | no"),
                FormField::new(OPTIONS, "Label or Label=value, comma separated"),
            ],
        )
    }

    pub fn from_form(form: &Form) -> Result<Self, FormError> {
        ensure_complete(form)?;
        let kind = parse_choice(
            TYPE,
            form.value(TYPE),
            QuestionType::parse,
            QuestionType::ALL,
            QuestionType::as_str,
        )?
        .unwrap_or(QuestionType::Text);

        let required = parse_choice(REQUIRED, form.value(REQUIRED), parse_flag, &[true, false], flag_name)?
            .unwrap_or(false);

        let options = split_list(form.value(OPTIONS))
            .map(|entry| match entry.split_once('=') {
                Some((text, value)) => AnswerOption {
                    text: text.trim().to_string(),
                    value: value.trim().to_string(),
                },
                None => AnswerOption {
                    text: entry.to_string(),
                    value: entry.to_lowercase().replace(' ', "_"),
                },
            })
            .collect();

        Ok(QuestionDraft {
            text: form.value(TEXT).to_string(),
            description: optional_text(form.value(DESCRIPTION)),
            kind,
            category: form.value(CATEGORY).to_string(),
            required,
            options,
        })
    }
}

impl Draft for QuestionDraft {
    type Record = QuestionRecord;

    fn into_record(self, id: u32) -> QuestionRecord {
        QuestionRecord {
            id,
            text: self.text,
            description: self.description,
            kind: self.kind,
            category: self.category,
            required: self.required,
            options: self.options,
            usage_count: 0,
            response_count: 0,
            last_used: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Collection;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 2).unwrap()
    }

    fn filled(mut form: Form, values: &[(&str, &str)]) -> Form {
        for (label, value) in values {
            form.set_value(label, value);
        }
        form
    }

    #[test]
    fn project_defaults_fill_blank_fields() {
        let form = filled(ProjectDraft::form(), &[(NAME, "Hybrid work pilot")]);
        let draft = ProjectDraft::from_form(&form, today()).unwrap();
        assert_eq!(draft.status, ProjectStatus::Planning);
        assert_eq!(draft.progress, 0);
        assert_eq!(draft.dates, DateRange::new(today(), today()));
        assert!(draft.description.is_empty());
        assert!(draft.team.is_empty());
    }

    #[test]
    fn project_parses_team_and_dates() {
        let form = filled(
            ProjectDraft::form(),
            &[
                (NAME, "Hybrid work pilot"),
                (START, "2024-05-01"),
                (END, "2024-08-31"),
                (STATUS, "Active"),
                (PROGRESS, "40"),
                (TEAM, "Ana Silva:Lead, Jo Park"),
            ],
        );
        let draft = ProjectDraft::from_form(&form, today()).unwrap();
        assert_eq!(draft.status, ProjectStatus::Active);
        assert_eq!(draft.progress, 40);
        assert_eq!(draft.team.len(), 2);
        assert_eq!(draft.team[0].role, "Lead");
        assert_eq!(draft.team[1].name, "Jo Park");
        assert_eq!(draft.team[1].role, "");
    }

    #[test]
    fn missing_name_is_rejected() {
        let form = filled(ProjectDraft::form(), &[(DESCRIPTION, "no name yet")]);
        assert_eq!(
            ProjectDraft::from_form(&form, today()),
            Err(FormError::MissingRequired(vec![NAME]))
        );
    }

    #[test]
    fn progress_above_one_hundred_is_rejected() {
        let form = filled(ProjectDraft::form(), &[(NAME, "x"), (PROGRESS, "140")]);
        assert_eq!(
            ProjectDraft::from_form(&form, today()),
            Err(FormError::ProgressOutOfRange(140))
        );
        let form = filled(ProjectDraft::form(), &[(NAME, "x"), (PROGRESS, "-3")]);
        assert_eq!(
            ProjectDraft::from_form(&form, today()),
            Err(FormError::ProgressOutOfRange(-3))
        );
    }

    #[test]
    fn end_before_start_is_rejected() {
        let form = filled(
            ProjectDraft::form(),
            &[(NAME, "x"), (START, "2024-05-01"), (END, "2024-04-01")],
        );
        assert!(matches!(
            ProjectDraft::from_form(&form, today()),
            Err(FormError::EndBeforeStart { .. })
        ));
    }

    #[test]
    fn unknown_status_names_the_choices() {
        let form = filled(ProjectDraft::form(), &[(NAME, "x"), (STATUS, "paused")]);
        let err = ProjectDraft::from_form(&form, today()).unwrap_err();
        assert!(err.to_string().contains("planning | active"));
    }

    #[test]
    fn feedback_parses_lists_and_optional_choices() {
        let form = filled(
            FeedbackDraft::form(),
            &[
                (TITLE, "Q2 engagement pulse"),
                (PROJECT, "3"),
                (QUESTIONS, "4, 2, 4,"),
                (PRIORITY, "HIGH"),
                (TAGS, "quarterly, remote"),
            ],
        );
        let draft = FeedbackDraft::from_form(&form, today()).unwrap();
        assert_eq!(draft.project_id, 3);
        assert_eq!(draft.question_ids, vec![4, 2]);
        assert_eq!(draft.priority, Some(Priority::High));
        assert_eq!(draft.sentiment, None);
        assert_eq!(draft.category, None);
        assert_eq!(draft.status, FeedbackStatus::Upcoming);
        assert_eq!(draft.tags, vec!["quarterly", "remote"]);
    }

    #[test]
    fn feedback_rejects_non_numeric_question_ids() {
        let form = filled(FeedbackDraft::form(), &[(TITLE, "x"), (QUESTIONS, "1, two")]);
        assert!(matches!(
            FeedbackDraft::from_form(&form, today()),
            Err(FormError::Invalid { field: QUESTIONS, .. })
        ));
    }

    #[test]
    fn question_options_take_explicit_or_derived_values() {
        let form = filled(
            QuestionDraft::form(),
            &[
                (TEXT, "How supported do you feel?"),
                (TYPE, "single choice"),
                (REQUIRED, "Yes"),
                (OPTIONS, "Very supported=5, Not at all"),
            ],
        );
        let draft = QuestionDraft::from_form(&form).unwrap();
        assert_eq!(draft.kind, QuestionType::SingleChoice);
        assert!(draft.required);
        assert_eq!(draft.options[0].value, "5");
        assert_eq!(draft.options[1].value, "not_at_all");
    }

    #[test]
    fn submitted_drafts_get_fresh_ids() {
        let mut questions: Collection<QuestionRecord> = Collection::default();
        let form = filled(QuestionDraft::form(), &[(TEXT, "Anything else?")]);
        let first = questions.append(QuestionDraft::from_form(&form).unwrap()).id;
        let second = questions.append(QuestionDraft::from_form(&form).unwrap()).id;
        assert_eq!((first, second), (1, 2));
        let created = questions.get(2).unwrap();
        assert_eq!(created.kind, QuestionType::Text);
        assert!(!created.required);
        assert_eq!(created.usage_count, 0);
    }
}
