use crate::catalog::{self, Activity};
use crate::models::{ActivityCount, DailyMood, MoodCount, MoodEntry, MoodStats};
use std::collections::{BTreeMap, HashMap};

pub const DEFAULT_TOP_ACTIVITIES: usize = 5;

/// Aggregates a window of entries. Entry contents are not validated; an empty
/// slice yields the zero value.
pub fn compute_stats(entries: &[MoodEntry]) -> MoodStats {
    if entries.is_empty() {
        return MoodStats::default();
    }

    let total: u64 = entries.iter().map(|entry| u64::from(entry.mood)).sum();
    let average_mood = round2(total as f64 / entries.len() as f64);

    let mut counts: BTreeMap<u8, usize> = BTreeMap::new();
    for entry in entries {
        *counts.entry(entry.mood).or_default() += 1;
    }

    // Ascending key order with a strict comparison: the lowest mood wins ties.
    let mut most_common_mood = 0u8;
    let mut best_count = 0usize;
    for (&mood, &count) in &counts {
        if count > best_count {
            most_common_mood = mood;
            best_count = count;
        }
    }

    let mood_distribution = counts
        .into_iter()
        .map(|(mood, count)| MoodCount { mood, count })
        .collect();

    let weekly_data = entries
        .iter()
        .map(|entry| DailyMood {
            date: entry.date,
            mood: entry.mood,
        })
        .collect();

    MoodStats {
        average_mood,
        total_entries: entries.len(),
        most_common_mood,
        mood_distribution,
        weekly_data,
    }
}

/// Rounds to two decimals, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Most frequent activity tags across `entries`, highest count first.
/// Ids missing from `catalog` are dropped; ties follow catalog order.
pub fn top_activities(entries: &[MoodEntry], catalog: &[Activity], limit: usize) -> Vec<ActivityCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entry in entries {
        for id in &entry.activities {
            *counts.entry(id.as_str()).or_default() += 1;
        }
    }

    let mut ranked: Vec<(usize, &Activity, usize)> = catalog
        .iter()
        .enumerate()
        .filter_map(|(position, activity)| {
            counts
                .get(activity.id)
                .map(|&count| (position, activity, count))
        })
        .collect();

    ranked.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));

    ranked
        .into_iter()
        .take(limit)
        .map(|(_, activity, count)| ActivityCount {
            id: activity.id.to_string(),
            name: activity.name.to_string(),
            emoji: activity.emoji.to_string(),
            count,
        })
        .collect()
}

/// Short feedback line shown next to the average for a non-empty window.
pub fn insight_for(average_mood: f64) -> &'static str {
    if average_mood >= 4.0 {
        "You seem to be doing great! 😊"
    } else if average_mood >= 3.0 {
        "Your mood has been fairly steady. 🙂"
    } else {
        "Hang in there, better days are coming. 💪"
    }
}

/// Convenience wrapper ranking against the built-in activity catalog.
pub fn top_catalog_activities(entries: &[MoodEntry], limit: usize) -> Vec<ActivityCount> {
    top_activities(entries, &catalog::ACTIVITIES, limit)
}
