//! Seed data the dashboard starts from on every launch.

use chrono::NaiveDate;

use crate::models::{
    AnswerOption, DateRange, FeedbackRecord, FeedbackStatus, Priority, ProjectRecord,
    ProjectStatus, QuestionRecord, QuestionType, Sentiment, TeamMember,
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn range(start: (i32, u32, u32), end: (i32, u32, u32)) -> DateRange {
    DateRange::new(day(start.0, start.1, start.2), day(end.0, end.1, end.2))
}

fn member(id: u32, name: &str, role: &str) -> TeamMember {
    TeamMember {
        id,
        name: name.to_string(),
        role: role.to_string(),
    }
}

fn options(pairs: &[(&str, &str)]) -> Vec<AnswerOption> {
    pairs
        .iter()
        .map(|(text, value)| AnswerOption {
            text: text.to_string(),
            value: value.to_string(),
        })
        .collect()
}

pub fn projects() -> Vec<ProjectRecord> {
    vec![
        ProjectRecord {
            id: 1,
            name: "Employee Onboarding Revamp".to_string(),
            description: "Rework the first 90 days for new hires based on survey input".to_string(),
            dates: range((2024, 1, 8), (2024, 6, 28)),
            status: ProjectStatus::Active,
            progress: 65,
            team: vec![
                member(1, "Maya Chen", "Project Lead"),
                member(2, "Luis Ortega", "HR Partner"),
                member(3, "Priya Nair", "Analyst"),
            ],
            responses: 248,
        },
        ProjectRecord {
            id: 2,
            name: "Hybrid Work Policy".to_string(),
            description: "Collect input on office days, equipment and meeting norms".to_string(),
            dates: range((2024, 7, 1), (2024, 10, 31)),
            status: ProjectStatus::Planning,
            progress: 0,
            team: vec![member(1, "Sam Whitaker", "Project Lead"), member(2, "Ines Duarte", "Facilities")],
            responses: 0,
        },
        ProjectRecord {
            id: 3,
            name: "Annual Engagement Survey".to_string(),
            description: "Company-wide engagement baseline with team level breakdowns".to_string(),
            dates: range((2023, 9, 4), (2023, 12, 15)),
            status: ProjectStatus::Completed,
            progress: 100,
            team: vec![
                member(1, "Priya Nair", "Analyst"),
                member(2, "Tom Becker", "People Ops"),
            ],
            responses: 1312,
        },
        ProjectRecord {
            id: 4,
            name: "Manager Effectiveness".to_string(),
            description: "Upward feedback on line managers ahead of the leadership program".to_string(),
            dates: range((2024, 2, 12), (2024, 5, 31)),
            status: ProjectStatus::Delayed,
            progress: 35,
            team: vec![member(1, "Luis Ortega", "HR Partner")],
            responses: 97,
        },
        ProjectRecord {
            id: 5,
            name: "Benefits Review".to_string(),
            description: "Which benefits people use and which they would trade".to_string(),
            dates: range((2024, 11, 4), (2025, 1, 31)),
            status: ProjectStatus::Upcoming,
            progress: 0,
            team: vec![member(1, "Tom Becker", "People Ops"), member(2, "Ana Silva", "Finance")],
            responses: 0,
        },
    ]
}

pub fn feedback() -> Vec<FeedbackRecord> {
    vec![
        FeedbackRecord {
            id: 1,
            title: "New Hire 30-Day Check-in".to_string(),
            project_id: 1,
            description: "How the first month went for people who joined this quarter".to_string(),
            dates: range((2024, 2, 1), (2024, 3, 15)),
            status: FeedbackStatus::Completed,
            question_ids: vec![1, 2, 5],
            responses: 86,
            sentiment: Some(Sentiment::Positive),
            priority: Some(Priority::Medium),
            category: Some("Onboarding".to_string()),
            tags: vec!["new-hires".to_string(), "quarterly".to_string()],
        },
        FeedbackRecord {
            id: 2,
            title: "Buddy Program Feedback".to_string(),
            project_id: 1,
            description: "Whether onboarding buddies helped and how often they met".to_string(),
            dates: range((2024, 4, 1), (2024, 5, 15)),
            status: FeedbackStatus::Active,
            question_ids: vec![2, 3, 6],
            responses: 41,
            sentiment: Some(Sentiment::Neutral),
            priority: Some(Priority::Low),
            category: Some("Onboarding".to_string()),
            tags: vec!["buddy".to_string()],
        },
        FeedbackRecord {
            id: 3,
            title: "Office Days Preference".to_string(),
            project_id: 2,
            description: "Preferred office days and commute constraints".to_string(),
            dates: range((2024, 7, 15), (2024, 8, 9)),
            status: FeedbackStatus::Upcoming,
            question_ids: vec![4, 7],
            responses: 0,
            sentiment: None,
            priority: Some(Priority::High),
            category: Some("Workplace".to_string()),
            tags: vec!["hybrid".to_string(), "facilities".to_string()],
        },
        FeedbackRecord {
            id: 4,
            title: "Engagement Pulse 2023".to_string(),
            project_id: 3,
            description: "Annual engagement questionnaire".to_string(),
            dates: range((2023, 9, 11), (2023, 10, 20)),
            status: FeedbackStatus::Completed,
            question_ids: vec![1, 3, 4, 5, 8],
            responses: 1312,
            sentiment: Some(Sentiment::Positive),
            priority: Some(Priority::High),
            category: Some("Engagement".to_string()),
            tags: vec!["annual".to_string()],
        },
        FeedbackRecord {
            id: 5,
            title: "Upward Review Round 1".to_string(),
            project_id: 4,
            description: "Direct reports rate their manager's support and clarity".to_string(),
            dates: range((2024, 3, 4), (2024, 4, 12)),
            status: FeedbackStatus::Active,
            question_ids: vec![3, 8, 12],
            responses: 97,
            sentiment: Some(Sentiment::Negative),
            priority: Some(Priority::High),
            category: Some("Leadership".to_string()),
            tags: vec!["managers".to_string(), "confidential".to_string()],
        },
        FeedbackRecord {
            id: 6,
            title: "Exit Interview Themes".to_string(),
            project_id: 9,
            description: "Free text themes from leavers, kept for the archive".to_string(),
            dates: range((2023, 5, 1), (2023, 12, 31)),
            status: FeedbackStatus::Completed,
            question_ids: vec![6],
            responses: 58,
            sentiment: Some(Sentiment::Negative),
            priority: None,
            category: None,
            tags: vec!["archive".to_string()],
        },
    ]
}

pub fn questions() -> Vec<QuestionRecord> {
    let agreement = options(&[
        ("Strongly disagree", "1"),
        ("Disagree", "2"),
        ("Neutral", "3"),
        ("Agree", "4"),
        ("Strongly agree", "5"),
    ]);
    vec![
        QuestionRecord {
            id: 1,
            text: "How likely are you to recommend working here to a friend?".to_string(),
            description: Some("0-10 scale, used for eNPS".to_string()),
            kind: QuestionType::Rating,
            category: "Engagement".to_string(),
            required: true,
            options: Vec::new(),
            usage_count: 14,
            response_count: 2210,
            last_used: Some(day(2024, 3, 15)),
        },
        QuestionRecord {
            id: 2,
            text: "Did you have what you needed on your first day?".to_string(),
            description: None,
            kind: QuestionType::SingleChoice,
            category: "Onboarding".to_string(),
            required: true,
            options: options(&[("Yes", "yes"), ("Partly", "partly"), ("No", "no")]),
            usage_count: 6,
            response_count: 127,
            last_used: Some(day(2024, 5, 15)),
        },
        QuestionRecord {
            id: 3,
            text: "My manager gives me useful feedback".to_string(),
            description: None,
            kind: QuestionType::MultipleChoice,
            category: "Leadership".to_string(),
            required: false,
            options: agreement.clone(),
            usage_count: 9,
            response_count: 1450,
            last_used: Some(day(2024, 4, 12)),
        },
        QuestionRecord {
            id: 4,
            text: "How do you feel about your current working arrangement?".to_string(),
            description: Some("Mood picker".to_string()),
            kind: QuestionType::Sentiment,
            category: "Workplace".to_string(),
            required: false,
            options: Vec::new(),
            usage_count: 3,
            response_count: 1312,
            last_used: Some(day(2023, 10, 20)),
        },
        QuestionRecord {
            id: 5,
            text: "I understand how my work contributes to company goals".to_string(),
            description: None,
            kind: QuestionType::MultipleChoice,
            category: "Engagement".to_string(),
            required: true,
            options: agreement,
            usage_count: 9,
            response_count: 1398,
            last_used: Some(day(2024, 3, 15)),
        },
        QuestionRecord {
            id: 6,
            text: "What is one thing we should change?".to_string(),
            description: Some("Open text, optional".to_string()),
            kind: QuestionType::Text,
            category: "General".to_string(),
            required: false,
            options: Vec::new(),
            usage_count: 21,
            response_count: 640,
            last_used: Some(day(2024, 5, 15)),
        },
        QuestionRecord {
            id: 7,
            text: "Which days would you prefer to be in the office?".to_string(),
            description: None,
            kind: QuestionType::MultipleChoice,
            category: "Workplace".to_string(),
            required: false,
            options: options(&[
                ("Monday", "mon"),
                ("Tuesday", "tue"),
                ("Wednesday", "wed"),
                ("Thursday", "thu"),
                ("Friday", "fri"),
            ]),
            usage_count: 0,
            response_count: 0,
            last_used: None,
        },
        QuestionRecord {
            id: 8,
            text: "How would you rate team communication?".to_string(),
            description: None,
            kind: QuestionType::Rating,
            category: "Leadership".to_string(),
            required: false,
            options: Vec::new(),
            usage_count: 9,
            response_count: 1409,
            last_used: Some(day(2024, 4, 12)),
        },
    ]
}
