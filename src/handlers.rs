use crate::catalog::{self, Activity, MoodLevel, MAX_MOOD, MIN_MOOD};
use crate::errors::AppError;
use crate::models::{
    DeleteAllResponse, MoodEntry, NewMoodEntry, RangeQuery, RecentQuery, SaveEntryRequest,
    StatsQuery, StatsResponse, TodayResponse,
};
use crate::state::AppState;
use crate::stats::{compute_stats, insight_for, top_catalog_activities, DEFAULT_TOP_ACTIVITIES};
use crate::ui::{render_export, render_index};
use crate::window::{window_for, Period};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    Json,
};
use chrono::{DateTime, Local, NaiveDate, Utc};
use tracing::{error, info};

const DEFAULT_RECENT_LIMIT: usize = 30;
const MAX_RECENT_LIMIT: usize = 365;
const MAX_NOTES_CHARS: usize = 2000;

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let today = today();
    let entry = state.store.get_by_date(today).await?;
    let stats = stats_for(&state, Period::Week, today).await?;
    render_page(render_index(today, entry.as_ref(), &stats), "index")
}

pub async fn get_today(State(state): State<AppState>) -> Result<Json<TodayResponse>, AppError> {
    let date = today();
    let entry = state.store.get_by_date(date).await?;
    Ok(Json(TodayResponse { date, entry }))
}

pub async fn save_entry(
    State(state): State<AppState>,
    Json(payload): Json<SaveEntryRequest>,
) -> Result<(StatusCode, Json<MoodEntry>), AppError> {
    let entry = validate_entry(payload, today(), Utc::now())?;
    let saved = state.store.upsert(entry).await?;
    info!(date = %saved.date, mood = saved.mood, "mood entry saved");
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn get_entry(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<MoodEntry>, AppError> {
    let date = parse_date(&date)?;
    state
        .store
        .get_by_date(date)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("no entry for {date}")))
}

pub async fn list_recent(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<MoodEntry>>, AppError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .min(MAX_RECENT_LIMIT);
    Ok(Json(state.store.get_recent(limit).await?))
}

pub async fn list_range(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<MoodEntry>>, AppError> {
    let start = parse_date(&query.start)?;
    let end = parse_date(&query.end)?;
    Ok(Json(state.store.get_range(start, end).await?))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<StatusCode, AppError> {
    let date = parse_date(&date)?;
    if state.store.delete_by_date(date).await? {
        info!(%date, "mood entry deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!("no entry for {date}")))
    }
}

pub async fn delete_all(
    State(state): State<AppState>,
) -> Result<Json<DeleteAllResponse>, AppError> {
    let deleted = state.store.delete_all().await?;
    Ok(Json(DeleteAllResponse { deleted }))
}

pub async fn get_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatsResponse>, AppError> {
    let period = match query.period.as_deref() {
        Some(raw) => raw.parse::<Period>().map_err(AppError::bad_request)?,
        None => Period::default(),
    };
    Ok(Json(stats_for(&state, period, today()).await?))
}

pub async fn list_moods() -> Json<&'static [MoodLevel]> {
    Json(catalog::MOODS.as_slice())
}

pub async fn list_activities() -> Json<&'static [Activity]> {
    Json(catalog::ACTIVITIES.as_slice())
}

pub async fn export(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let entries = state.store.get_all().await?;
    if entries.is_empty() {
        return Err(AppError::not_found("no mood entries to export"));
    }
    info!(entries = entries.len(), "exporting diary");
    render_page(render_export(&entries, today()), "export")
}

fn render_page(
    rendered: Result<String, askama::Error>,
    label: &str,
) -> Result<Html<String>, AppError> {
    rendered.map(Html).map_err(|err| {
        error!(error = %err, page = label, "failed to render page");
        AppError::internal(err)
    })
}

async fn stats_for(
    state: &AppState,
    period: Period,
    today: NaiveDate,
) -> Result<StatsResponse, AppError> {
    let (start, end) = window_for(period, today);
    let entries = state.store.get_range(start, end).await?;
    let stats = compute_stats(&entries);
    let top_activities = top_catalog_activities(&entries, DEFAULT_TOP_ACTIVITIES);
    let insight = (stats.total_entries > 0).then(|| insight_for(stats.average_mood).to_string());

    tracing::debug!(%period, %start, %end, entries = stats.total_entries, "stats computed");

    Ok(StatsResponse {
        period: period.as_str().to_string(),
        start,
        end,
        stats,
        top_activities,
        insight,
    })
}

/// Checks a save request and fills in the derived fields.
pub fn validate_entry(
    request: SaveEntryRequest,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<NewMoodEntry, AppError> {
    let date = match request.date.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => parse_date(raw)?,
        _ => today,
    };

    let mood = u8::try_from(request.mood)
        .ok()
        .filter(|mood| (MIN_MOOD..=MAX_MOOD).contains(mood))
        .ok_or_else(|| {
            AppError::bad_request(format!("mood must be between {MIN_MOOD} and {MAX_MOOD}"))
        })?;
    let mood_emoji = catalog::mood_emoji(mood).unwrap_or_default().to_string();

    let mut activities: Vec<String> = Vec::with_capacity(request.activities.len());
    for raw in request.activities {
        let id = raw.trim();
        if catalog::activity(id).is_none() {
            return Err(AppError::bad_request(format!("unknown activity '{id}'")));
        }
        if !activities.iter().any(|existing| existing == id) {
            activities.push(id.to_string());
        }
    }

    let notes = request
        .notes
        .map(|notes| notes.trim().to_string())
        .filter(|notes| !notes.is_empty());
    if notes
        .as_ref()
        .is_some_and(|notes| notes.chars().count() > MAX_NOTES_CHARS)
    {
        return Err(AppError::bad_request(format!(
            "notes must be at most {MAX_NOTES_CHARS} characters"
        )));
    }

    Ok(NewMoodEntry {
        date,
        mood,
        mood_emoji,
        activities,
        notes,
        created_at: now,
    })
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::bad_request(format!("invalid date '{raw}', expected YYYY-MM-DD")))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
