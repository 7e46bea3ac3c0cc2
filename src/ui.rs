use crate::catalog::{self, ACTIVITIES, MOODS};
use crate::models::{MoodEntry, StatsResponse};
use crate::window::Period;
use askama::Template;
use chrono::NaiveDate;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub date: NaiveDate,
    pub today_summary: String,
    pub average: String,
    pub total: usize,
    pub moods: Vec<MoodOption>,
    pub activities: Vec<ActivityOption>,
    pub notes: String,
    pub selected_mood: u8,
    pub periods: Vec<PeriodTab>,
    pub chart_title: &'static str,
    /// Serialized `StatsResponse`, inserted unescaped into the page script.
    pub stats_json: String,
}

pub struct MoodOption {
    pub value: u8,
    pub emoji: &'static str,
    pub label: &'static str,
    pub color: &'static str,
    pub active: bool,
}

pub struct ActivityOption {
    pub id: &'static str,
    pub emoji: &'static str,
    pub name: &'static str,
    pub checked: bool,
}

pub struct PeriodTab {
    pub key: &'static str,
    pub label: String,
    pub title: &'static str,
    pub active: bool,
}

#[derive(Template)]
#[template(path = "export.html")]
pub struct ExportTemplate {
    pub generated: String,
    pub entries: Vec<ExportEntry>,
}

pub struct ExportEntry {
    pub color: &'static str,
    pub date: String,
    pub emoji: String,
    pub mood: u8,
    pub activities: String,
    pub notes: String,
}

pub fn render_index(
    today: NaiveDate,
    entry: Option<&MoodEntry>,
    stats: &StatsResponse,
) -> Result<String, askama::Error> {
    let selected_mood = entry.map_or(0, |entry| entry.mood);
    let selected_activities: &[String] = entry
        .map(|entry| entry.activities.as_slice())
        .unwrap_or_default();
    let period = stats.period.parse::<Period>().unwrap_or_default();

    let moods = MOODS
        .iter()
        .map(|level| MoodOption {
            value: level.value,
            emoji: level.emoji,
            label: level.label,
            color: level.color,
            active: level.value == selected_mood,
        })
        .collect();

    let activities = ACTIVITIES
        .iter()
        .map(|activity| ActivityOption {
            id: activity.id,
            emoji: activity.emoji,
            name: activity.name,
            checked: selected_activities.iter().any(|id| id == activity.id),
        })
        .collect();

    let periods = Period::ALL
        .iter()
        .map(|&tab| PeriodTab {
            key: tab.as_str(),
            label: format!("{} days", tab.days()),
            title: tab.display_label(),
            active: tab == period,
        })
        .collect();

    let today_summary = match entry {
        Some(entry) => format!("{} {}/5", entry.mood_emoji, entry.mood),
        None => "Not logged yet".to_string(),
    };
    let stats_json = serde_json::to_string(stats)
        .map_err(|err| askama::Error::Custom(Box::new(err)))?
        .replace("</", "<\\/");

    IndexTemplate {
        date: today,
        today_summary,
        average: format!("{:.2}", stats.stats.average_mood),
        total: stats.stats.total_entries,
        moods,
        activities,
        notes: entry
            .and_then(|entry| entry.notes.clone())
            .unwrap_or_default(),
        selected_mood,
        periods,
        chart_title: period.display_label(),
        stats_json,
    }
    .render()
}

/// Printable document listing every entry, newest first.
pub fn render_export(
    entries: &[MoodEntry],
    generated_on: NaiveDate,
) -> Result<String, askama::Error> {
    let entries = entries
        .iter()
        .map(|entry| ExportEntry {
            color: catalog::mood_color(entry.mood),
            date: entry.date.format("%A, %-d %B %Y").to_string(),
            emoji: entry.mood_emoji.clone(),
            mood: entry.mood,
            activities: entry
                .activities
                .iter()
                .map(|id| catalog::activity(id).map_or(id.as_str(), |activity| activity.name))
                .collect::<Vec<_>>()
                .join(", "),
            notes: entry.notes.clone().unwrap_or_default(),
        })
        .collect();

    ExportTemplate {
        generated: generated_on.format("%-d %B %Y").to_string(),
        entries,
    }
    .render()
}
