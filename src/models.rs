use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One saved mood record. At most one exists per calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    pub id: u64,
    pub date: NaiveDate,
    pub mood: u8,
    pub mood_emoji: String,
    pub activities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A validated entry ready to be written. The store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMoodEntry {
    pub date: NaiveDate,
    pub mood: u8,
    pub mood_emoji: String,
    pub activities: Vec<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewMoodEntry {
    pub fn into_entry(self, id: u64) -> MoodEntry {
        MoodEntry {
            id,
            date: self.date,
            mood: self.mood,
            mood_emoji: self.mood_emoji,
            activities: self.activities,
            notes: self.notes,
            created_at: self.created_at,
        }
    }
}

/// On-disk snapshot of the whole diary.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StoreData {
    #[serde(default)]
    pub next_id: u64,
    #[serde(default)]
    pub entries: BTreeMap<NaiveDate, MoodEntry>,
}

#[derive(Debug, Deserialize)]
pub struct SaveEntryRequest {
    #[serde(default)]
    pub date: Option<String>,
    pub mood: i64,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodCount {
    pub mood: u8,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyMood {
    pub date: NaiveDate,
    pub mood: u8,
}

/// Aggregated view over a window of entries. Recomputed on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MoodStats {
    pub average_mood: f64,
    pub total_entries: usize,
    pub most_common_mood: u8,
    pub mood_distribution: Vec<MoodCount>,
    pub weekly_data: Vec<DailyMood>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityCount {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub period: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub stats: MoodStats,
    pub top_activities: Vec<ActivityCount>,
    pub insight: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodayResponse {
    pub date: NaiveDate,
    pub entry: Option<MoodEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteAllResponse {
    pub deleted: usize,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub period: Option<String>,
}
