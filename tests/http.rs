use httpmock::prelude::*;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct StatsView {
    count_250g: String,
    count_1kg: String,
    count_2kg: String,
    peak_hour: String,
}

#[derive(Debug, Deserialize)]
struct TrendBadge {
    class: String,
    percent: u64,
}

#[derive(Debug, Deserialize)]
struct PredictionView {
    hours_remaining: String,
    trend: Option<TrendBadge>,
}

#[derive(Debug, Deserialize)]
struct DashboardView {
    open: bool,
    stats: StatsView,
    prediction: PredictionView,
    history: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ActionResponse {
    outcome: String,
    notice: Option<String>,
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

#[cfg(unix)]
mod cleanup {
    use std::sync::Mutex;
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PIDS: Mutex<Vec<i32>> = Mutex::new(Vec::new());

    pub fn register(pid: u32) {
        if let Ok(mut pids) = PIDS.lock() {
            pids.push(pid as i32);
        }
        REGISTER.call_once(|| unsafe {
            libc::atexit(on_exit);
        });
    }

    extern "C" fn on_exit() {
        if let Ok(pids) = PIDS.lock() {
            for pid in pids.iter().copied().filter(|pid| *pid > 0) {
                unsafe {
                    libc::kill(pid, libc::SIGTERM);
                }
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

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/dashboard")).send().await {
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

async fn spawn_server(remote: &MockServer) -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_shop_sync"))
        .env("PORT", port.to_string())
        .env("SHOP_REMOTE_URL", remote.base_url())
        .env("SHOP_RETRAIN_DELAY_SECS", "0")
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

async fn mock_remote() -> MockServer {
    let remote = MockServer::start_async().await;
    remote
        .mock_async(|when, then| {
            when.method(GET).path("/api/stats");
            then.status(200)
                .json_body(json!({"c250": 5, "c1kg": 2, "peak_hour": "15h00"}));
        })
        .await;
    remote
        .mock_async(|when, then| {
            when.method(GET).path("/api/prediction");
            then.status(200).json_body(json!({
                "heures_restantes": 2.5,
                "meteo": "Ensoleillé",
                "previsions": {"250g": 4, "1kg": 1, "2kg": 0},
                "debug_info": "IA active (Tendance: 72%)"
            }));
        })
        .await;
    remote
        .mock_async(|when, then| {
            when.method(GET).path("/api/history");
            then.status(200).json_body(json!([
                {"type": "VENTE", "detail": "250g", "heure": "14:05"},
                {"type": "CONVERSION", "detail": "2kg", "heure": "13:40"}
            ]));
        })
        .await;
    remote
        .mock_async(|when, then| {
            when.method(GET).path("/api/status");
            then.status(200).json_body(json!({"ouvert": true}));
        })
        .await;
    remote
}

#[tokio::test]
async fn http_dashboard_reflects_remote_snapshots() {
    let remote = mock_remote().await;
    let server = spawn_server(&remote).await;
    let client = Client::new();

    sleep(Duration::from_millis(200)).await;
    let dashboard: DashboardView = client
        .get(format!("{}/api/dashboard", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(dashboard.open);
    assert_eq!(dashboard.stats.count_250g, "5");
    assert_eq!(dashboard.stats.count_1kg, "2");
    assert_eq!(dashboard.stats.count_2kg, "0");
    assert_eq!(dashboard.stats.peak_hour, "15h00");
    assert_eq!(dashboard.prediction.hours_remaining, "2.5");
    let trend = dashboard.prediction.trend.expect("trend badge");
    assert_eq!(trend.class, "calm");
    assert_eq!(trend.percent, 72);
    assert_eq!(dashboard.history.len(), 2);

    let page = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains(r#"data-open="true""#));
    assert!(page.contains(r#"<div id="count-2kg" class="value">0</div>"#));
    assert!(page.contains("Calm (72%)"));
}

#[tokio::test]
async fn http_log_action_dispatches_to_remote() {
    let remote = mock_remote().await;
    let log = remote
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/log")
                .json_body(json!({"type": "CONVERSION", "detail": "2kg"}));
            then.status(200).json_body(json!({"status": "success"}));
        })
        .await;
    let server = spawn_server(&remote).await;
    let client = Client::new();

    let response: ActionResponse = client
        .post(format!("{}/api/log", server.base_url))
        .json(&json!({"type": "CONVERSION", "detail": "2kg"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(response.outcome, "success");
    assert_eq!(log.hits_async().await, 1);

    let rejected = client
        .post(format!("{}/api/log", server.base_url))
        .json(&json!({"type": "REFUND", "detail": "2kg"}))
        .send()
        .await
        .unwrap();
    assert_eq!(rejected.status(), reqwest::StatusCode::BAD_REQUEST);
    assert_eq!(log.hits_async().await, 1);
}

#[tokio::test]
async fn http_undo_surfaces_nothing_to_undo() {
    let remote = mock_remote().await;
    remote
        .mock_async(|when, then| {
            when.method(POST).path("/api/undo");
            then.status(200)
                .json_body(json!({"status": "error", "message": "Rien à annuler"}));
        })
        .await;
    let server = spawn_server(&remote).await;
    let client = Client::new();

    let response: ActionResponse = client
        .post(format!("{}/api/undo", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(response.outcome, "nothing_to_undo");
    assert_eq!(response.notice.as_deref(), Some("Rien à annuler"));
}

#[tokio::test]
async fn http_week_reports_unavailable_forecast() {
    let remote = mock_remote().await;
    let week = remote
        .mock_async(|when, then| {
            when.method(GET).path("/api/forecast_week");
            then.status(200).json_body(json!({"error": "IA non entraînée"}));
        })
        .await;
    let server = spawn_server(&remote).await;
    let client = Client::new();

    for _ in 0..2 {
        let response = client
            .get(format!("{}/api/week", server.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::SERVICE_UNAVAILABLE);
    }

    let page = client
        .get(format!("{}/week", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Forecast unavailable."));
    assert_eq!(week.hits_async().await, 1);
}
