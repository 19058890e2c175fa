use serde::Serialize;

use crate::models::{
    FeedbackRecord, FeedbackStatus, ProjectRecord, ProjectStatus, QuestionRecord, QuestionType,
    Sentiment,
};

/// Label used for feedback that has no sentiment yet.
pub const UNRATED: &str = "unrated";

const TOP_QUESTIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub projects: ProjectSummary,
    pub feedback: FeedbackSummary,
    pub questions: QuestionSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectSummary {
    pub total: usize,
    pub by_status: Vec<(String, usize)>,
    pub mean_progress: f64,
    pub total_responses: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackSummary {
    pub total: usize,
    pub by_status: Vec<(String, usize)>,
    pub by_sentiment: Vec<(String, usize)>,
    pub total_responses: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopQuestion {
    pub id: u32,
    pub text: String,
    pub usage_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionSummary {
    pub total: usize,
    pub by_type: Vec<(String, usize)>,
    pub required: usize,
    pub most_used: Vec<TopQuestion>,
}

// One bucket per choice, in declaration order, zero buckets included.
fn tally<T: Copy + PartialEq>(
    choices: &[T],
    name: fn(&T) -> &'static str,
    values: impl Iterator<Item = T> + Clone,
) -> Vec<(String, usize)> {
    choices
        .iter()
        .map(|choice| {
            let count = values.clone().filter(|value| value == choice).count();
            (name(choice).to_string(), count)
        })
        .collect()
}

pub fn summarize(
    projects: &[ProjectRecord],
    feedback: &[FeedbackRecord],
    questions: &[QuestionRecord],
) -> Summary {
    let mean_progress = if projects.is_empty() {
        0.0
    } else {
        projects.iter().map(|p| f64::from(p.progress)).sum::<f64>() / projects.len() as f64
    };

    let mut by_sentiment = tally(
        Sentiment::ALL,
        Sentiment::as_str,
        feedback.iter().filter_map(|f| f.sentiment),
    );
    by_sentiment.push((
        UNRATED.to_string(),
        feedback.iter().filter(|f| f.sentiment.is_none()).count(),
    ));

    // Stable sort keeps the collection order among equally used questions.
    let mut ranked: Vec<&QuestionRecord> = questions.iter().collect();
    ranked.sort_by(|a, b| b.usage_count.cmp(&a.usage_count));
    let most_used = ranked
        .into_iter()
        .take(TOP_QUESTIONS)
        .map(|q| TopQuestion {
            id: q.id,
            text: q.text.clone(),
            usage_count: q.usage_count,
        })
        .collect();

    Summary {
        projects: ProjectSummary {
            total: projects.len(),
            by_status: tally(
                ProjectStatus::ALL,
                ProjectStatus::as_str,
                projects.iter().map(|p| p.status),
            ),
            mean_progress,
            total_responses: projects.iter().map(|p| u64::from(p.responses)).sum(),
        },
        feedback: FeedbackSummary {
            total: feedback.len(),
            by_status: tally(
                FeedbackStatus::ALL,
                FeedbackStatus::as_str,
                feedback.iter().map(|f| f.status),
            ),
            by_sentiment,
            total_responses: feedback.iter().map(|f| u64::from(f.responses)).sum(),
        },
        questions: QuestionSummary {
            total: questions.len(),
            by_type: tally(
                QuestionType::ALL,
                QuestionType::as_str,
                questions.iter().map(|q| q.kind),
            ),
            required: questions.iter().filter(|q| q.required).count(),
            most_used,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample;

    fn count(buckets: &[(String, usize)], name: &str) -> usize {
        buckets
            .iter()
            .find(|(label, _)| label == name)
            .map_or(0, |(_, n)| *n)
    }

    #[test]
    fn empty_collections_summarize_to_zeroes() {
        let summary = summarize(&[], &[], &[]);
        assert_eq!(summary.projects.total, 0);
        assert_eq!(summary.projects.mean_progress, 0.0);
        assert_eq!(count(&summary.feedback.by_sentiment, UNRATED), 0);
        assert!(summary.questions.most_used.is_empty());
        assert_eq!(summary.projects.by_status.len(), ProjectStatus::ALL.len());
    }

    #[test]
    fn sample_data_summary() {
        let summary = summarize(&sample::projects(), &sample::feedback(), &sample::questions());
        assert_eq!(summary.projects.total, 5);
        assert_eq!(count(&summary.projects.by_status, "active"), 1);
        assert_eq!(summary.projects.mean_progress, 40.0);
        assert_eq!(count(&summary.feedback.by_sentiment, "negative"), 2);
        assert_eq!(count(&summary.feedback.by_sentiment, UNRATED), 1);
        assert_eq!(summary.questions.required, 3);
        let top: Vec<u32> = summary.questions.most_used.iter().map(|q| q.id).collect();
        assert_eq!(top, vec![6, 1, 3]);
    }
}
