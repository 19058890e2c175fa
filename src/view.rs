//! Derived list views: search, categorical filters and a stable sort over a
//! record slice. Nothing here mutates the records it is given.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::borrow::Cow;
use std::cmp::Ordering;

use crate::collection::Record;
use crate::models::{FeedbackRecord, ProjectRecord, QuestionRecord, UNKNOWN_PROJECT};
use crate::suggest::did_you_mean;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    Status,
    Priority,
    Sentiment,
    Category,
    Type,
    Project,
    Required,
}

impl Facet {
    pub fn as_str(&self) -> &'static str {
        match self {
            Facet::Status => "status",
            Facet::Priority => "priority",
            Facet::Sentiment => "sentiment",
            Facet::Category => "category",
            Facet::Type => "type",
            Facet::Project => "project",
            Facet::Required => "required",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterValue {
    #[default]
    All,
    Is(String),
}

impl FilterValue {
    /// `all` (any case) and blank input disable the filter.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            FilterValue::All
        } else {
            FilterValue::Is(value.to_string())
        }
    }

    /// Like `parse`, for facets over a closed vocabulary: spelling variants
    /// map onto the canonical name and unknown values are refused.
    pub fn choice<T>(
        facet: Facet,
        value: &str,
        choices: &[T],
        parse: fn(&str) -> Option<T>,
        name: fn(&T) -> &'static str,
    ) -> Result<Self> {
        let raw = match FilterValue::parse(value) {
            FilterValue::All => return Ok(FilterValue::All),
            FilterValue::Is(raw) => raw,
        };
        match parse(&raw) {
            Some(choice) => Ok(FilterValue::Is(name(&choice).to_string())),
            None => {
                let names: Vec<&str> = choices.iter().map(name).collect();
                bail!(
                    "'{}' is not a {} value{}; expected all, {}",
                    raw,
                    facet.as_str(),
                    did_you_mean(&raw, &names),
                    names.join(", ")
                )
            }
        }
    }

    /// A record without a value for the facet only passes `All`.
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            FilterValue::All => true,
            FilterValue::Is(wanted) => value.map_or(false, |v| v.eq_ignore_ascii_case(wanted)),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            FilterValue::All => "all",
            FilterValue::Is(value) => value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Name,
    Date,
    Progress,
    Responses,
    Usage,
    LastUsed,
    /// Keeps the collection's insertion order. Also what unknown key names
    /// resolve to.
    Insertion,
}

impl SortKey {
    pub const KNOWN: &'static [SortKey] = &[
        SortKey::Name,
        SortKey::Date,
        SortKey::Progress,
        SortKey::Responses,
        SortKey::Usage,
        SortKey::LastUsed,
        SortKey::Insertion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Date => "date",
            SortKey::Progress => "progress",
            SortKey::Responses => "responses",
            SortKey::Usage => "usage",
            SortKey::LastUsed => "last_used",
            SortKey::Insertion => "insertion",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::KNOWN.iter().map(SortKey::as_str).collect()
    }

    /// Strict lookup; `lastUsed`, `last-used` and `last_used` are the same key.
    pub fn from_name(name: &str) -> Option<SortKey> {
        let folded: String = name
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_lowercase();
        Self::KNOWN
            .iter()
            .copied()
            .find(|key| key.as_str().replace('_', "") == folded)
    }

    /// Lenient lookup used by the pages: unknown names keep insertion order.
    pub fn resolve(name: &str) -> SortKey {
        match Self::from_name(name) {
            Some(key) => key,
            None => {
                log::warn!("unknown sort key '{}', keeping insertion order", name);
                SortKey::Insertion
            }
        }
    }

    /// One direction per key: text and calendar keys run ascending,
    /// counters run largest first.
    pub fn direction(&self) -> SortDirection {
        match self {
            SortKey::Name | SortKey::Date | SortKey::LastUsed | SortKey::Insertion => {
                SortDirection::Ascending
            }
            SortKey::Progress | SortKey::Responses | SortKey::Usage => SortDirection::Descending,
        }
    }

    pub fn next(&self, choices: &[SortKey]) -> SortKey {
        match choices.iter().position(|key| key == self) {
            Some(i) => choices[(i + 1) % choices.len()],
            None => choices.first().copied().unwrap_or(SortKey::Insertion),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue<'a> {
    Text(Cow<'a, str>),
    Number(u64),
    Date(NaiveDate),
}

impl<'a> SortValue<'a> {
    /// Text keys compare case-folded.
    pub fn text(value: &'a str) -> Self {
        if value.chars().any(char::is_uppercase) {
            SortValue::Text(Cow::Owned(value.to_lowercase()))
        } else {
            SortValue::Text(Cow::Borrowed(value))
        }
    }
}

/// What a record exposes to the list view.
pub trait Listable {
    /// Fields the free-text search looks into.
    fn search_fields(&self) -> Vec<&str>;

    fn facet(&self, facet: Facet) -> Option<Cow<'_, str>>;

    fn sort_value(&self, key: SortKey) -> Option<SortValue<'_>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub search: String,
    pub filters: Vec<(Facet, FilterValue)>,
    pub sort: SortKey,
    pub reverse: bool,
}

impl ListQuery {
    pub fn new(sort: SortKey) -> Self {
        ListQuery {
            search: String::new(),
            filters: Vec::new(),
            sort,
            reverse: false,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_filter(mut self, facet: Facet, value: FilterValue) -> Self {
        self.set_filter(facet, value);
        self
    }

    pub fn reversed(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn filter(&self, facet: Facet) -> &FilterValue {
        const ALL: &FilterValue = &FilterValue::All;
        self.filters
            .iter()
            .find(|(f, _)| *f == facet)
            .map_or(ALL, |(_, value)| value)
    }

    pub fn set_filter(&mut self, facet: Facet, value: FilterValue) {
        match self.filters.iter_mut().find(|(f, _)| *f == facet) {
            Some(slot) => slot.1 = value,
            None => self.filters.push((facet, value)),
        }
    }

    /// Drops search, filters and reverse. The sort key stays.
    pub fn clear(&mut self) {
        self.search.clear();
        self.filters.clear();
        self.reverse = false;
    }

    pub fn is_descending(&self) -> bool {
        (self.sort.direction() == SortDirection::Descending) != self.reverse
    }

    pub fn matches<T: Listable>(&self, record: &T) -> bool {
        let needle = self.search.trim().to_lowercase();
        matches_search(record, &needle)
            && self
                .filters
                .iter()
                .all(|(facet, value)| value.matches(record.facet(*facet).as_deref()))
    }
}

fn matches_search<T: Listable>(record: &T, needle: &str) -> bool {
    needle.is_empty()
        || record
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
}

/// Filters then sorts `records`. The result borrows from the input, keeps
/// insertion order among equal keys and puts records without a value for the
/// sort key last.
pub fn derive_view<'a, T: Listable>(records: &'a [T], query: &ListQuery) -> Vec<&'a T> {
    let mut view: Vec<&T> = records.iter().filter(|record| query.matches(*record)).collect();

    if query.sort == SortKey::Insertion {
        if query.reverse {
            view.reverse();
        }
        return view;
    }

    let key = query.sort;
    let descending = query.is_descending();
    view.sort_by(|a, b| compare_keys(a.sort_value(key), b.sort_value(key), descending));
    view
}

fn compare_keys(a: Option<SortValue<'_>>, b: Option<SortValue<'_>>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Distinct values of `facet` across `records`, first-seen order, compared
/// case-insensitively.
pub fn facet_options<T: Listable>(records: &[T], facet: Facet) -> Vec<String> {
    let mut options: Vec<String> = Vec::new();
    for record in records {
        if let Some(value) = record.facet(facet) {
            if !options.iter().any(|o| o.eq_ignore_ascii_case(&value)) {
                options.push(value.into_owned());
            }
        }
    }
    options
}

impl Listable for ProjectRecord {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.description.as_str()];
        fields.extend(self.team.iter().map(|member| member.name.as_str()));
        fields
    }

    fn facet(&self, facet: Facet) -> Option<Cow<'_, str>> {
        match facet {
            Facet::Status => Some(Cow::Borrowed(self.status.as_str())),
            _ => None,
        }
    }

    fn sort_value(&self, key: SortKey) -> Option<SortValue<'_>> {
        match key {
            SortKey::Name => Some(SortValue::text(&self.name)),
            SortKey::Date => Some(SortValue::Date(self.dates.start)),
            SortKey::Progress => Some(SortValue::Number(self.progress.into())),
            SortKey::Responses => Some(SortValue::Number(self.responses.into())),
            _ => None,
        }
    }
}

impl Listable for QuestionRecord {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.text.as_str(), self.category.as_str()];
        if let Some(description) = &self.description {
            fields.push(description);
        }
        fields
    }

    fn facet(&self, facet: Facet) -> Option<Cow<'_, str>> {
        match facet {
            Facet::Type => Some(Cow::Borrowed(self.kind.as_str())),
            Facet::Category => Some(Cow::Borrowed(&self.category)),
            Facet::Required => Some(Cow::Borrowed(if self.required { "yes" } else { "no" })),
            _ => None,
        }
    }

    fn sort_value(&self, key: SortKey) -> Option<SortValue<'_>> {
        match key {
            SortKey::Name => Some(SortValue::text(&self.text)),
            SortKey::Usage => Some(SortValue::Number(self.usage_count.into())),
            SortKey::Responses => Some(SortValue::Number(self.response_count.into())),
            // Questions carry no date range; their only date is last use.
            SortKey::Date | SortKey::LastUsed => self.last_used.map(SortValue::Date),
            _ => None,
        }
    }
}

/// A feedback campaign joined with the name of the project it belongs to,
/// which the feedback page both displays and searches.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackRow<'a> {
    #[serde(flatten)]
    pub feedback: &'a FeedbackRecord,
    pub project_name: &'a str,
    /// Referenced questions that resolve to an existing question.
    pub question_count: usize,
}

pub fn feedback_rows<'a>(
    feedback: &'a [FeedbackRecord],
    projects: &'a [ProjectRecord],
    questions: &'a [QuestionRecord],
) -> Vec<FeedbackRow<'a>> {
    feedback
        .iter()
        .map(|record| FeedbackRow {
            feedback: record,
            project_name: project_name(projects, record.project_id),
            question_count: record
                .question_ids
                .iter()
                .filter(|id| questions.iter().any(|q| q.id() == **id))
                .count(),
        })
        .collect()
}

pub fn project_name(projects: &[ProjectRecord], id: u32) -> &str {
    projects
        .iter()
        .find(|project| project.id == id)
        .map_or(UNKNOWN_PROJECT, |project| project.name.as_str())
}

impl Listable for FeedbackRow<'_> {
    fn search_fields(&self) -> Vec<&str> {
        let record = self.feedback;
        let mut fields = vec![record.title.as_str(), record.description.as_str(), self.project_name];
        if let Some(category) = &record.category {
            fields.push(category);
        }
        fields.extend(record.tags.iter().map(String::as_str));
        fields
    }

    fn facet(&self, facet: Facet) -> Option<Cow<'_, str>> {
        let record = self.feedback;
        match facet {
            Facet::Status => Some(Cow::Borrowed(record.status.as_str())),
            Facet::Priority => record.priority.map(|p| Cow::Borrowed(p.as_str())),
            Facet::Sentiment => record.sentiment.map(|s| Cow::Borrowed(s.as_str())),
            Facet::Category => record.category.as_deref().map(Cow::Borrowed),
            Facet::Project => Some(Cow::Borrowed(self.project_name)),
            _ => None,
        }
    }

    fn sort_value(&self, key: SortKey) -> Option<SortValue<'_>> {
        let record = self.feedback;
        match key {
            SortKey::Name => Some(SortValue::text(&record.title)),
            SortKey::Date => Some(SortValue::Date(record.dates.start)),
            SortKey::Responses => Some(SortValue::Number(record.responses.into())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        flag_name, parse_flag, DateRange, FeedbackStatus, Priority, ProjectStatus, QuestionType,
        Sentiment, TeamMember,
    };
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn project(id: u32, name: &str, progress: u8, start: NaiveDate) -> ProjectRecord {
        ProjectRecord {
            id,
            name: name.to_string(),
            description: format!("{} description", name),
            dates: DateRange::new(start, start),
            status: ProjectStatus::Active,
            progress,
            team: vec![TeamMember { id: 1, name: "Dana Reyes".to_string(), role: "Lead".to_string() }],
            responses: 0,
        }
    }

    fn feedback(id: u32, title: &str, category: &str, status: FeedbackStatus) -> FeedbackRecord {
        FeedbackRecord {
            id,
            title: title.to_string(),
            project_id: 1,
            description: String::new(),
            dates: DateRange::new(date(2024, 1, 1), date(2024, 2, 1)),
            status,
            question_ids: Vec::new(),
            responses: 0,
            sentiment: None,
            priority: None,
            category: Some(category.to_string()),
            tags: Vec::new(),
        }
    }

    fn question(id: u32, text: &str, usage: u32) -> QuestionRecord {
        QuestionRecord {
            id,
            text: text.to_string(),
            description: None,
            kind: QuestionType::Rating,
            category: "Engagement".to_string(),
            required: false,
            options: Vec::new(),
            usage_count: usage,
            response_count: 0,
            last_used: None,
        }
    }

    fn ids<T: Record>(view: &[&T]) -> Vec<u32> {
        view.iter().map(|r| r.id()).collect()
    }

    fn row_ids(view: &[&FeedbackRow<'_>]) -> Vec<u32> {
        view.iter().map(|r| r.feedback.id).collect()
    }

    #[test]
    fn category_filter_keeps_original_order() {
        let records = vec![
            feedback(1, "Roadmap review", "Product", FeedbackStatus::Active),
            feedback(2, "Help desk", "Service", FeedbackStatus::Upcoming),
            feedback(3, "Release notes", "Product", FeedbackStatus::Active),
        ];
        let rows = feedback_rows(&records, &[], &[]);
        let query = ListQuery::new(SortKey::Insertion)
            .with_filter(Facet::Category, FilterValue::parse("Product"))
            .with_filter(Facet::Status, FilterValue::parse("all"));
        assert_eq!(row_ids(&derive_view(&rows, &query)), vec![1, 3]);
    }

    #[test]
    fn progress_sorts_largest_first() {
        let start = date(2024, 3, 1);
        let records = vec![
            project(1, "Onboarding", 65, start),
            project(2, "Benefits", 0, start),
            project(3, "Offsite", 100, start),
        ];
        let view = derive_view(&records, &ListQuery::new(SortKey::Progress));
        let progress: Vec<u8> = view.iter().map(|p| p.progress).collect();
        assert_eq!(progress, vec![100, 65, 0]);
    }

    #[test]
    fn reverse_flips_the_declared_direction() {
        let start = date(2024, 3, 1);
        let records = vec![
            project(1, "Onboarding", 65, start),
            project(2, "Benefits", 0, start),
            project(3, "Offsite", 100, start),
        ];
        let query = ListQuery::new(SortKey::Progress).reversed(true);
        assert_eq!(ids(&derive_view(&records, &query)), vec![2, 1, 3]);
    }

    #[test]
    fn name_sorts_ascending_ignoring_case() {
        let start = date(2024, 3, 1);
        let records = vec![
            project(1, "wellness", 0, start),
            project(2, "Benefits", 0, start),
            project(3, "Culture", 0, start),
        ];
        assert_eq!(ids(&derive_view(&records, &ListQuery::new(SortKey::Name))), vec![2, 3, 1]);
    }

    #[test]
    fn date_sorts_chronologically() {
        let records = vec![
            project(1, "b", 0, date(2024, 6, 1)),
            project(2, "a", 0, date(2023, 12, 31)),
            project(3, "c", 0, date(2024, 1, 15)),
        ];
        assert_eq!(ids(&derive_view(&records, &ListQuery::new(SortKey::Date))), vec![2, 3, 1]);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let records = vec![
            feedback(1, "Roadmap review", "Product", FeedbackStatus::Active),
            feedback(2, "Help desk", "Service", FeedbackStatus::Active),
        ];
        let rows = feedback_rows(&records, &[], &[]);
        let query = ListQuery::new(SortKey::Insertion).with_search("PRODUCT");
        assert_eq!(row_ids(&derive_view(&rows, &query)), vec![1]);
    }

    #[test]
    fn search_reaches_project_name_and_team_members() {
        let projects = vec![project(1, "Onboarding", 10, date(2024, 1, 1))];
        let records = vec![feedback(1, "Week one", "People", FeedbackStatus::Active)];
        let rows = feedback_rows(&records, &projects, &[]);
        let query = ListQuery::new(SortKey::Insertion).with_search("onboard");
        assert_eq!(derive_view(&rows, &query).len(), 1);

        let query = ListQuery::new(SortKey::Insertion).with_search("reyes");
        assert_eq!(derive_view(&projects, &query).len(), 1);
    }

    #[test]
    fn dangling_project_shows_unknown() {
        let records = vec![feedback(1, "Orphan", "People", FeedbackStatus::Active)];
        let rows = feedback_rows(&records, &[], &[]);
        assert_eq!(rows[0].project_name, UNKNOWN_PROJECT);
        let query = ListQuery::new(SortKey::Insertion)
            .with_filter(Facet::Project, FilterValue::parse("unknown"));
        assert_eq!(derive_view(&rows, &query).len(), 1);
    }

    #[test]
    fn question_count_skips_dangling_references() {
        let mut record = feedback(1, "Pulse", "People", FeedbackStatus::Active);
        record.question_ids = vec![1, 2, 99];
        let questions = vec![question(1, "a", 0), question(2, "b", 0)];
        let records = vec![record];
        let rows = feedback_rows(&records, &[], &questions);
        assert_eq!(rows[0].question_count, 2);
    }

    #[test]
    fn missing_facet_value_only_passes_all() {
        let mut with_sentiment = feedback(1, "a", "People", FeedbackStatus::Active);
        with_sentiment.sentiment = Some(Sentiment::Positive);
        let records = vec![with_sentiment, feedback(2, "b", "People", FeedbackStatus::Active)];
        let rows = feedback_rows(&records, &[], &[]);

        let positive = ListQuery::new(SortKey::Insertion)
            .with_filter(Facet::Sentiment, FilterValue::parse("Positive"));
        assert_eq!(row_ids(&derive_view(&rows, &positive)), vec![1]);

        let all = ListQuery::new(SortKey::Insertion).with_filter(Facet::Sentiment, FilterValue::All);
        assert_eq!(row_ids(&derive_view(&rows, &all)), vec![1, 2]);
    }

    #[test]
    fn records_without_a_sort_value_go_last() {
        let mut recent = question(1, "recent", 0);
        recent.last_used = Some(date(2024, 5, 1));
        let never = question(2, "never", 0);
        let mut old = question(3, "old", 0);
        old.last_used = Some(date(2023, 5, 1));
        let records = vec![recent, never, old];

        let ascending = ListQuery::new(SortKey::LastUsed);
        assert_eq!(ids(&derive_view(&records, &ascending)), vec![3, 1, 2]);
        let descending = ascending.reversed(true);
        assert_eq!(ids(&derive_view(&records, &descending)), vec![1, 3, 2]);
    }

    #[test]
    fn unknown_sort_key_keeps_insertion_order() {
        let records = vec![question(5, "z", 1), question(2, "a", 9), question(7, "m", 4)];
        let key = SortKey::resolve("popularity");
        assert_eq!(key, SortKey::Insertion);
        assert_eq!(ids(&derive_view(&records, &ListQuery::new(key))), vec![5, 2, 7]);
    }

    #[test]
    fn clear_keeps_only_the_sort_key() {
        let mut query = ListQuery::new(SortKey::Usage)
            .with_search("team")
            .with_filter(Facet::Type, FilterValue::parse("rating"))
            .reversed(true);
        query.clear();
        assert_eq!(query, ListQuery::new(SortKey::Usage));
        assert!(query.is_descending());
    }

    #[test]
    fn question_date_sort_follows_last_use() {
        let mut recent = question(1, "recent", 0);
        recent.last_used = Some(date(2024, 5, 1));
        let never = question(2, "never", 0);
        let mut old = question(3, "old", 0);
        old.last_used = Some(date(2023, 5, 1));
        let records = vec![recent, never, old];
        let by_date = ids(&derive_view(&records, &ListQuery::new(SortKey::Date)));
        let by_last_used = ids(&derive_view(&records, &ListQuery::new(SortKey::LastUsed)));
        assert_eq!(by_date, vec![3, 1, 2]);
        assert_eq!(by_date, by_last_used);
    }

    #[test]
    fn choice_filters_accept_spelling_variants() {
        let value = FilterValue::choice(
            Facet::Type,
            "multiple choice",
            QuestionType::ALL,
            QuestionType::parse,
            QuestionType::as_str,
        )
        .unwrap();
        assert_eq!(value, FilterValue::Is("multiple_choice".to_string()));

        let mut survey = question(1, "a", 0);
        survey.kind = QuestionType::MultipleChoice;
        let records = vec![survey, question(2, "b", 0)];
        let query = ListQuery::new(SortKey::Insertion).with_filter(Facet::Type, value);
        assert_eq!(ids(&derive_view(&records, &query)), vec![1]);

        let required = FilterValue::choice(Facet::Required, "true", &[true, false], parse_flag, flag_name).unwrap();
        assert_eq!(required, FilterValue::Is("yes".to_string()));
        let all = FilterValue::choice(Facet::Type, " ALL ", QuestionType::ALL, QuestionType::parse, QuestionType::as_str);
        assert_eq!(all.unwrap(), FilterValue::All);
    }

    #[test]
    fn choice_filters_refuse_unknown_values() {
        let err = FilterValue::choice(
            Facet::Priority,
            "hihg",
            Priority::ALL,
            Priority::parse,
            Priority::as_str,
        )
        .unwrap_err()
        .to_string();
        assert!(err.contains("'hihg' is not a priority value"), "{}", err);
        assert!(err.contains("high, medium, low"), "{}", err);
    }

    #[test]
    fn sort_key_names_are_forgiving() {
        assert_eq!(SortKey::from_name("lastUsed"), Some(SortKey::LastUsed));
        assert_eq!(SortKey::from_name("last-used"), Some(SortKey::LastUsed));
        assert_eq!(SortKey::from_name("PROGRESS"), Some(SortKey::Progress));
        assert_eq!(SortKey::from_name("size"), None);
    }

    #[test]
    fn empty_collection_gives_empty_view() {
        let records: Vec<ProjectRecord> = Vec::new();
        let query = ListQuery::new(SortKey::Name).with_search("anything");
        assert!(derive_view(&records, &query).is_empty());
    }

    #[test]
    fn facet_options_are_distinct_in_first_seen_order() {
        let records = vec![
            feedback(1, "a", "Product", FeedbackStatus::Active),
            feedback(2, "b", "Service", FeedbackStatus::Active),
            feedback(3, "c", "product", FeedbackStatus::Active),
        ];
        let rows = feedback_rows(&records, &[], &[]);
        assert_eq!(facet_options(&rows, Facet::Category), vec!["Product", "Service"]);
    }

    fn arb_questions() -> impl Strategy<Value = Vec<QuestionRecord>> {
        prop::collection::vec(
            (
                "[A-Za-z ]{0,12}",
                prop::sample::select(vec!["Engagement", "Culture", "Growth"]),
                prop::sample::select(QuestionType::ALL.to_vec()),
                0u32..5,
                any::<bool>(),
            ),
            0..24,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (text, category, kind, usage, required))| QuestionRecord {
                    id: i as u32 + 1,
                    text,
                    description: None,
                    kind,
                    category: category.to_string(),
                    required,
                    options: Vec::new(),
                    usage_count: usage,
                    response_count: 0,
                    last_used: None,
                })
                .collect()
        })
    }

    fn arb_sort_key() -> impl Strategy<Value = SortKey> {
        prop::sample::select(SortKey::KNOWN.to_vec())
    }

    proptest! {
        #[test]
        fn open_query_is_a_permutation(records in arb_questions(), key in arb_sort_key(), reverse in any::<bool>()) {
            let query = ListQuery::new(key)
                .reversed(reverse)
                .with_filter(Facet::Category, FilterValue::All)
                .with_filter(Facet::Type, FilterValue::All);
            let mut got = ids(&derive_view(&records, &query));
            got.sort_unstable();
            let mut want: Vec<u32> = records.iter().map(|q| q.id).collect();
            want.sort_unstable();
            prop_assert_eq!(got, want);
        }

        #[test]
        fn view_is_a_subset(records in arb_questions(), search in "[a-z]{0,3}", key in arb_sort_key()) {
            let query = ListQuery::new(key).with_search(search);
            let view = derive_view(&records, &query);
            prop_assert!(view.len() <= records.len());
            for item in &view {
                prop_assert!(records.iter().any(|r| std::ptr::eq(r, *item)));
                prop_assert!(query.matches(*item));
            }
        }

        #[test]
        fn deriving_twice_is_identical(records in arb_questions(), search in "[a-z]{0,2}", key in arb_sort_key()) {
            let query = ListQuery::new(key)
                .with_search(search)
                .with_filter(Facet::Required, FilterValue::parse("yes"));
            let first = ids(&derive_view(&records, &query));
            let second = ids(&derive_view(&records, &query));
            prop_assert_eq!(first, second);
        }

        #[test]
        fn disjoint_filters_give_nothing(records in arb_questions()) {
            let query = ListQuery::new(SortKey::Name)
                .with_filter(Facet::Required, FilterValue::parse("yes"))
                .with_filter(Facet::Category, FilterValue::parse("Culture"));
            let culture_required = records.iter().any(|q| q.required && q.category == "Culture");
            prop_assert_eq!(derive_view(&records, &query).is_empty(), !culture_required);

            let both = ListQuery::new(SortKey::Insertion)
                .with_filter(Facet::Category, FilterValue::parse("Growth"))
                .with_filter(Facet::Type, FilterValue::parse("text"));
            let expected: Vec<u32> = records
                .iter()
                .filter(|q| q.category == "Growth" && q.kind == QuestionType::Text)
                .map(|q| q.id)
                .collect();
            prop_assert_eq!(ids(&derive_view(&records, &both)), expected);

            let impossible = ListQuery::new(SortKey::Name)
                .with_filter(Facet::Required, FilterValue::parse("yes"))
                .with_filter(Facet::Type, FilterValue::parse("text"));
            let disjoint: Vec<QuestionRecord> = records
                .iter()
                .filter(|q| q.required != (q.kind == QuestionType::Text))
                .cloned()
                .collect();
            prop_assert!(derive_view(&disjoint, &impossible).is_empty());
        }

        #[test]
        fn equal_keys_keep_insertion_order(records in arb_questions()) {
            let view = derive_view(&records, &ListQuery::new(SortKey::Usage));
            for pair in view.windows(2) {
                prop_assert!(pair[0].usage_count >= pair[1].usage_count);
                if pair[0].usage_count == pair[1].usage_count {
                    prop_assert!(pair[0].id < pair[1].id);
                }
            }
        }
    }
}
