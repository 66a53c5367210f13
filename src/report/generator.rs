//! Dashboard rendering.
//!
//! This module turns a computed [`Dashboard`] into Markdown for the
//! terminal, or JSON for other tools.

use crate::models::{AggregateRow, Dashboard, RatingEvent, Recommendations};
use anyhow::Result;

const BAR_CHAR: char = '█';

/// Generate the complete Markdown dashboard.
pub fn generate_markdown_dashboard(dashboard: &Dashboard, chart_width: usize) -> String {
    let mut output = String::new();

    output.push_str("# ☕ Café Rating Recommendations\n\n");

    match &dashboard.recommendations {
        Recommendations::Ranked(ranking) => {
            output.push_str(&generate_ranking_section(&ranking.rows));
            output.push_str(&format!(
                "🥇 **Top recommended item right now: {}** ({:.2})\n\n",
                ranking.top.item, ranking.top.mean_rating
            ));
            output.push_str(&generate_chart_section(&ranking.rows, chart_width));
            if ranking.skipped > 0 {
                output.push_str(&format!(
                    "*{} event(s) with non-numeric ratings were left out of the averages.*\n\n",
                    ranking.skipped
                ));
            }
        }
        Recommendations::NoData { message } => {
            output.push_str("## Recommendations\n\n");
            output.push_str(&format!(
                "ℹ️  {}: there are no numeric ratings to rank yet.\n\n",
                capitalize(message)
            ));
        }
    }

    output.push_str(&generate_recent_section(
        &dashboard.recent_events,
        dashboard.total_events,
    ));

    output
}

/// Generate the ranked table section.
fn generate_ranking_section(rows: &[AggregateRow]) -> String {
    let mut section = String::new();

    section.push_str("## Recommendations\n\n");
    section.push_str("| # | Item | Average rating | Ratings |\n");
    section.push_str("|:---:|:---|:---:|:---:|\n");

    for (i, row) in rows.iter().enumerate() {
        section.push_str(&format!(
            "| {} | {} | {:.2} | {} |\n",
            i + 1,
            escape_cell(&row.item),
            row.mean_rating,
            row.ratings
        ));
    }
    section.push('\n');

    section
}

/// Generate the bar chart section.
fn generate_chart_section(rows: &[AggregateRow], width: usize) -> String {
    let mut section = String::new();

    section.push_str("## Average rating by item\n\n```\n");
    section.push_str(&render_bar_chart(rows, width));
    section.push_str("```\n\n");

    section
}

/// Render a horizontal bar chart, one line per row.
///
/// Bars are scaled so the highest mean spans `width` characters.
pub fn render_bar_chart(rows: &[AggregateRow], width: usize) -> String {
    let label_width = rows
        .iter()
        .map(|row| row.item.chars().count())
        .max()
        .unwrap_or(0);
    let peak = rows
        .iter()
        .map(|row| row.mean_rating)
        .fold(0.0_f64, f64::max);

    let mut chart = String::new();
    for row in rows {
        let len = if peak > 0.0 {
            ((row.mean_rating.max(0.0) / peak) * width as f64).round() as usize
        } else {
            0
        };
        let padding = label_width - row.item.chars().count();
        chart.push_str(&format!(
            "{}{} | {} {:.2}\n",
            row.item,
            " ".repeat(padding),
            BAR_CHAR.to_string().repeat(len),
            row.mean_rating
        ));
    }

    chart
}

/// Generate the recent events section.
fn generate_recent_section(events: &[RatingEvent], total: usize) -> String {
    let mut section = String::new();

    section.push_str(&format!(
        "## Latest events ({} of {})\n\n",
        events.len(),
        total
    ));

    if events.is_empty() {
        section.push_str("The event log is empty.\n\n");
        return section;
    }

    section.push_str("| Customer | Item | Rating | Timestamp |\n");
    section.push_str("|:---|:---|:---:|:---|\n");

    for event in events {
        section.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            escape_cell(&event.customer),
            escape_cell(&event.item),
            escape_cell(&event.rating.to_string()),
            event.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }
    section.push('\n');

    section
}

/// Escape a value for use inside a Markdown table cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Generate a JSON dashboard.
pub fn generate_json_dashboard(dashboard: &Dashboard) -> Result<String> {
    serde_json::to_string_pretty(dashboard).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Ranking, Rating};
    use chrono::{TimeZone, Utc};

    fn row(item: &str, mean_rating: f64, ratings: usize) -> AggregateRow {
        AggregateRow {
            item: item.to_string(),
            mean_rating,
            ratings,
        }
    }

    fn create_test_dashboard() -> Dashboard {
        let rows = vec![row("Latte", 5.0, 1), row("Capuccino", 3.0, 2)];
        let timestamp = Utc.with_ymd_and_hms(2025, 5, 4, 9, 0, 0).unwrap();

        Dashboard {
            generated_at: timestamp,
            total_events: 3,
            recommendations: Recommendations::Ranked(Ranking {
                top: rows[0].clone(),
                rows,
                skipped: 0,
            }),
            recent_events: vec![
                RatingEvent::new("Cliente_1", "Capuccino", Rating::Score(4.0), timestamp),
                RatingEvent::new("Cliente_2", "Capuccino", Rating::Score(2.0), timestamp),
                RatingEvent::new("Cliente_3", "Latte", Rating::Score(5.0), timestamp),
            ],
        }
    }

    #[test]
    fn test_generate_markdown_dashboard() {
        let markdown = generate_markdown_dashboard(&create_test_dashboard(), 10);

        assert!(markdown.contains("## Recommendations"));
        assert!(markdown.contains("| 1 | Latte | 5.00 | 1 |"));
        assert!(markdown.contains("| 2 | Capuccino | 3.00 | 2 |"));
        assert!(markdown.contains("Top recommended item right now: Latte"));
        assert!(markdown.contains("## Latest events (3 of 3)"));
        assert!(markdown.contains("| Cliente_3 | Latte | 5 | 2025-05-04 09:00:00 UTC |"));
    }

    #[test]
    fn test_markdown_without_data() {
        let dashboard = Dashboard {
            generated_at: Utc::now(),
            total_events: 0,
            recommendations: Recommendations::NoData {
                message: "no data available".to_string(),
            },
            recent_events: Vec::new(),
        };

        let markdown = generate_markdown_dashboard(&dashboard, 10);
        assert!(markdown.contains("No data available"));
        assert!(!markdown.contains("Top recommended"));
        assert!(markdown.contains("The event log is empty."));
    }

    #[test]
    fn test_pipe_in_names_is_escaped() {
        let mut dashboard = create_test_dashboard();
        let timestamp = dashboard.generated_at;
        let rows = vec![row("Té | limón", 4.0, 1)];
        dashboard.recommendations = Recommendations::Ranked(Ranking {
            top: rows[0].clone(),
            rows,
            skipped: 0,
        });
        dashboard.recent_events = vec![RatingEvent::new(
            "Ana|B",
            "Té | limón",
            Rating::Raw("4|5".to_string()),
            timestamp,
        )];

        let markdown = generate_markdown_dashboard(&dashboard, 10);
        assert!(markdown.contains("| 1 | Té \\| limón | 4.00 | 1 |"));
        assert!(markdown.contains("| Ana\\|B | Té \\| limón | 4\\|5 | 2025-05-04 09:00:00 UTC |"));
    }

    #[test]
    fn test_render_bar_chart() {
        let rows = vec![row("Latte", 5.0, 1), row("Cheesecake", 2.5, 2)];
        let chart = render_bar_chart(&rows, 10);
        let lines: Vec<_> = chart.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], format!("Latte      | {} 5.00", "█".repeat(10)));
        assert_eq!(lines[1], format!("Cheesecake | {} 2.50", "█".repeat(5)));
    }

    #[test]
    fn test_generate_json_dashboard() {
        let json = generate_json_dashboard(&create_test_dashboard()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["total_events"], 3);
        assert_eq!(value["recommendations"]["status"], "ranked");
        assert_eq!(value["recommendations"]["top"]["item"], "Latte");
        assert_eq!(value["recent_events"][2]["rating"], 5.0);
    }
}
