use chrono::{Duration as Days, Local, NaiveDate};
use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Entry {
    id: u64,
    date: String,
    mood: u8,
    mood_emoji: String,
    activities: Vec<String>,
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MoodCount {
    mood: u8,
    count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Stats {
    average_mood: f64,
    total_entries: usize,
    most_common_mood: u8,
    mood_distribution: Vec<MoodCount>,
    weekly_data: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivityCount {
    id: String,
    count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    period: String,
    start: String,
    end: String,
    stats: Stats,
    top_activities: Vec<ActivityCount>,
    insight: Option<String>,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::Once;
    use std::sync::atomic::{AtomicI32, Ordering};

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("mood_diary_http_{}_{}", std::process::id(), nanos));
    path.push("entries.json");
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/today")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_mood_diary"))
        .env("PORT", port.to_string())
        .env("BIND_ADDR", "127.0.0.1")
        .env("MOOD_DATA_PATH", unique_data_path())
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn reset(client: &Client, base_url: &str) {
    let response = client
        .delete(format!("{base_url}/api/entries"))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}

async fn save(client: &Client, base_url: &str, body: serde_json::Value) -> reqwest::Response {
    client
        .post(format!("{base_url}/api/entries"))
        .json(&body)
        .send()
        .await
        .unwrap()
}

fn days_ago(n: i64) -> NaiveDate {
    Local::now().date_naive() - Days::days(n)
}

#[tokio::test]
async fn http_save_replaces_entry_for_same_date() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset(&client, &server.base_url).await;

    let first = save(
        &client,
        &server.base_url,
        json!({ "date": "2024-01-03", "mood": 2, "activities": ["work"], "notes": "long day" }),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let first: Entry = first.json().await.unwrap();

    let second: Entry = save(
        &client,
        &server.base_url,
        json!({ "date": "2024-01-03", "mood": 5, "activities": ["music", "music"] }),
    )
    .await
    .json()
    .await
    .unwrap();
    assert_ne!(first.id, second.id);

    let stored: Entry = client
        .get(format!("{}/api/entries/2024-01-03", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(stored.date, "2024-01-03");
    assert_eq!(stored.mood, 5);
    assert_eq!(stored.mood_emoji, "😄");
    assert_eq!(stored.activities, vec!["music".to_string()]);
    assert_eq!(stored.notes, None);
}

#[tokio::test]
async fn http_range_is_inclusive_and_ascending() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset(&client, &server.base_url).await;

    for date in ["2024-01-08", "2024-01-07", "2023-12-31", "2024-01-01", "2024-01-04"] {
        let response = save(&client, &server.base_url, json!({ "date": date, "mood": 3 })).await;
        assert!(response.status().is_success());
    }

    let entries: Vec<Entry> = client
        .get(format!(
            "{}/api/entries/range?start=2024-01-01&end=2024-01-07",
            server.base_url
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let dates: Vec<&str> = entries.iter().map(|e| e.date.as_str()).collect();
    assert_eq!(dates, vec!["2024-01-01", "2024-01-04", "2024-01-07"]);

    let recent: Vec<Entry> = client
        .get(format!("{}/api/entries?limit=2", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let dates: Vec<&str> = recent.iter().map(|e| e.date.as_str()).collect();
    assert_eq!(dates, vec!["2024-01-08", "2024-01-07"]);
}

#[tokio::test]
async fn http_stats_cover_the_requested_window() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset(&client, &server.base_url).await;

    let seeds = [
        (0, 5, vec!["exercise", "music"]),
        (1, 5, vec!["music"]),
        (6, 3, vec!["work"]),
        (7, 1, vec!["work"]),
    ];
    for (ago, mood, activities) in seeds {
        let response = save(
            &client,
            &server.base_url,
            json!({ "date": days_ago(ago).to_string(), "mood": mood, "activities": activities }),
        )
        .await;
        assert!(response.status().is_success());
    }

    let week: StatsResponse = client
        .get(format!("{}/api/stats?period=week", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(week.period, "week");
    assert_eq!(week.start, days_ago(6).to_string());
    assert_eq!(week.end, days_ago(0).to_string());
    assert_eq!(week.stats.total_entries, 3);
    assert_eq!(week.stats.average_mood, 4.33);
    assert_eq!(week.stats.most_common_mood, 5);
    let distribution: Vec<(u8, usize)> = week
        .stats
        .mood_distribution
        .iter()
        .map(|c| (c.mood, c.count))
        .collect();
    assert_eq!(distribution, vec![(3, 1), (5, 2)]);
    assert_eq!(week.stats.weekly_data.len(), 3);
    assert_eq!(week.top_activities[0].id, "music");
    assert_eq!(week.top_activities[0].count, 2);
    assert!(week.insight.is_some());

    let month: StatsResponse = client
        .get(format!("{}/api/stats?period=month", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(month.stats.total_entries, 4);
    assert_eq!(month.stats.average_mood, 3.5);

    let bad = client
        .get(format!("{}/api/stats?period=decade", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_empty_window_returns_zero_stats() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset(&client, &server.base_url).await;

    let stats: StatsResponse = client
        .get(format!("{}/api/stats", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(stats.period, "week");
    assert_eq!(stats.stats.average_mood, 0.0);
    assert_eq!(stats.stats.total_entries, 0);
    assert_eq!(stats.stats.most_common_mood, 0);
    assert!(stats.stats.mood_distribution.is_empty());
    assert!(stats.stats.weekly_data.is_empty());
    assert!(stats.top_activities.is_empty());
    assert!(stats.insight.is_none());

    let export = client
        .get(format!("{}/api/export", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(export.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_rejects_invalid_entries() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset(&client, &server.base_url).await;

    for body in [
        json!({ "mood": 0 }),
        json!({ "mood": 6 }),
        json!({ "date": "03/01/2024", "mood": 3 }),
        json!({ "mood": 3, "activities": ["skydiving"] }),
    ] {
        let response = save(&client, &server.base_url, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let all: Vec<Entry> = client
        .get(format!("{}/api/entries", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn http_delete_and_export() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    reset(&client, &server.base_url).await;

    save(
        &client,
        &server.base_url,
        json!({ "date": "2024-02-01", "mood": 4, "activities": ["reading"], "notes": "finished <the> book" }),
    )
    .await;
    save(&client, &server.base_url, json!({ "date": "2024-02-02", "mood": 2 })).await;

    let export = client
        .get(format!("{}/api/export", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(export.status().is_success());
    let html = export.text().await.unwrap();
    assert!(html.contains("Mood Diary Export"));
    assert!(html.contains("finished &lt;the&gt; book"));

    let deleted = client
        .delete(format!("{}/api/entries/2024-02-01", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let missing = client
        .get(format!("{}/api/entries/2024-02-01", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let again = client
        .delete(format!("{}/api/entries/2024-02-01", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::NOT_FOUND);

    let cleared: serde_json::Value = client
        .delete(format!("{}/api/entries", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cleared["deleted"], 1);
}

#[tokio::test]
async fn http_index_and_catalogs() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let page = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(page.status().is_success());
    let body = page.text().await.unwrap();
    assert!(body.contains("Mood Diary"));
    assert!(body.contains(r#"data-period="quarter" data-title="Last 90 days">90 days</button>"#));

    let moods: Vec<serde_json::Value> = client
        .get(format!("{}/api/moods", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(moods.len(), 5);

    let activities: Vec<serde_json::Value> = client
        .get(format!("{}/api/activities", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(activities.iter().any(|a| a["id"] == "exercise"));
}
