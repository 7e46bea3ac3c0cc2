use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoodLevel {
    pub value: u8,
    pub emoji: &'static str,
    pub label: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    Work,
    Health,
    Social,
    Hobby,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub id: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
    pub category: ActivityCategory,
}

pub const MIN_MOOD: u8 = 1;
pub const MAX_MOOD: u8 = 5;

pub static MOODS: [MoodLevel; 5] = [
    MoodLevel { value: 1, emoji: "😢", label: "Very sad", color: "#FF6B6B" },
    MoodLevel { value: 2, emoji: "😔", label: "Sad", color: "#FFA07A" },
    MoodLevel { value: 3, emoji: "😐", label: "Okay", color: "#FFD93D" },
    MoodLevel { value: 4, emoji: "😊", label: "Happy", color: "#6BCF7F" },
    MoodLevel { value: 5, emoji: "😄", label: "Very happy", color: "#4ECDC4" },
];

/// Declaration order here is also the tie-break order for activity rankings.
pub static ACTIVITIES: [Activity; 18] = [
    Activity { id: "work", name: "Work", emoji: "💼", category: ActivityCategory::Work },
    Activity { id: "meeting", name: "Meeting", emoji: "🤝", category: ActivityCategory::Work },
    Activity { id: "study", name: "Study", emoji: "📚", category: ActivityCategory::Work },
    Activity { id: "exercise", name: "Exercise", emoji: "🏃", category: ActivityCategory::Health },
    Activity { id: "meditation", name: "Meditation", emoji: "🧘", category: ActivityCategory::Health },
    Activity { id: "sleep", name: "Good sleep", emoji: "😴", category: ActivityCategory::Health },
    Activity { id: "healthy-eating", name: "Healthy eating", emoji: "🥗", category: ActivityCategory::Health },
    Activity { id: "friends", name: "Friends", emoji: "👥", category: ActivityCategory::Social },
    Activity { id: "video-call", name: "Video call", emoji: "📱", category: ActivityCategory::Social },
    Activity { id: "family", name: "Family", emoji: "👪", category: ActivityCategory::Social },
    Activity { id: "movies", name: "Movies", emoji: "🎬", category: ActivityCategory::Hobby },
    Activity { id: "reading", name: "Reading", emoji: "📖", category: ActivityCategory::Hobby },
    Activity { id: "music", name: "Music", emoji: "🎵", category: ActivityCategory::Hobby },
    Activity { id: "gaming", name: "Gaming", emoji: "🎮", category: ActivityCategory::Hobby },
    Activity { id: "cooking", name: "Cooking", emoji: "🍳", category: ActivityCategory::Hobby },
    Activity { id: "shopping", name: "Shopping", emoji: "🛒", category: ActivityCategory::Other },
    Activity { id: "walk", name: "Going out", emoji: "🚶", category: ActivityCategory::Other },
    Activity { id: "rest", name: "Rest", emoji: "😌", category: ActivityCategory::Other },
];

pub fn mood_level(value: u8) -> Option<&'static MoodLevel> {
    MOODS.iter().find(|level| level.value == value)
}

/// Emoji stored alongside an entry at save time.
pub fn mood_emoji(value: u8) -> Option<&'static str> {
    mood_level(value).map(|level| level.emoji)
}

/// Chart color for a mood; out-of-range values fall back to the neutral color.
pub fn mood_color(value: u8) -> &'static str {
    mood_level(value).map_or(MOODS[2].color, |level| level.color)
}

pub fn activity(id: &str) -> Option<&'static Activity> {
    ACTIVITIES.iter().find(|activity| activity.id == id)
}
