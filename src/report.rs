//! Plain-text and JSON printers for the command line listings.

use anyhow::Result;
use serde::Serialize;

use crate::config::format_date;
use crate::models::{ConfigItem, ProjectRecord, QuestionRecord};
use crate::summary::Summary;
use crate::view::FeedbackRow;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn project_line(project: &ProjectRecord, date_format: &str) -> String {
    format!(
        "#{} {} | Status: {} | Progress: {}% | {} - {} | Team: {} | Responses: {}",
        project.id,
        project.name,
        project.status,
        project.progress,
        format_date(project.dates.start, date_format),
        format_date(project.dates.end, date_format),
        project.team.len(),
        project.responses
    )
}

pub fn feedback_line(row: &FeedbackRow<'_>, date_format: &str) -> String {
    let record = row.feedback;
    let mut line = format!(
        "#{} {} | Project: {} | Status: {} | {} - {} | Questions: {} | Responses: {}",
        record.id,
        record.title,
        row.project_name,
        record.status,
        format_date(record.dates.start, date_format),
        format_date(record.dates.end, date_format),
        row.question_count,
        record.responses
    );
    if let Some(priority) = record.priority {
        line.push_str(&format!(" | Priority: {}", priority));
    }
    if let Some(sentiment) = record.sentiment {
        line.push_str(&format!(" | Sentiment: {}", sentiment));
    }
    line
}

pub fn question_line(question: &QuestionRecord, date_format: &str) -> String {
    let last_used = question
        .last_used
        .map_or_else(|| "never".to_string(), |date| format_date(date, date_format));
    format!(
        "#{} {} | Type: {} | Category: {} | Required: {} | Used: {} | Responses: {} | Last used: {}",
        question.id,
        question.text,
        question.kind,
        question.category,
        if question.required { "yes" } else { "no" },
        question.usage_count,
        question.response_count,
        last_used
    )
}

pub fn print_lines(heading: &str, lines: Vec<String>, total: usize) {
    println!("{}", heading);
    println!("{}", "-".repeat(heading.len()));
    if lines.is_empty() {
        println!("No matches.");
    }
    for line in &lines {
        println!("{}", line);
    }
    println!("\n{} of {} shown", lines.len(), total);
}

fn buckets(pairs: &[(String, usize)]) -> String {
    pairs
        .iter()
        .map(|(label, count)| format!("{}: {}", label, count))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn summary_text(summary: &Summary) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Projects: {} (mean progress {:.0}%, {} responses)\n  {}\n",
        summary.projects.total,
        summary.projects.mean_progress,
        summary.projects.total_responses,
        buckets(&summary.projects.by_status)
    ));
    out.push_str(&format!(
        "Feedback: {} ({} responses)\n  {}\n  {}\n",
        summary.feedback.total,
        summary.feedback.total_responses,
        buckets(&summary.feedback.by_status),
        buckets(&summary.feedback.by_sentiment)
    ));
    out.push_str(&format!(
        "Questions: {} ({} required)\n  {}\n",
        summary.questions.total,
        summary.questions.required,
        buckets(&summary.questions.by_type)
    ));
    out.push_str("Most used questions:\n");
    for question in &summary.questions.most_used {
        out.push_str(&format!("  #{} {} ({} uses)\n", question.id, question.text, question.usage_count));
    }
    out
}

pub fn print_configs(items: &[ConfigItem]) {
    println!("Configs:");
    println!("--------");
    for item in items {
        let origin = if item.is_default { "default" } else { "set" };
        println!("{} = {} ({}) | {}", item.key_name, item.value, origin, item.description);
    }
}
