//! End-to-end ingestion tests: gateway push → HTTP server → normalizer →
//! dispatcher → plugins → outbound action API (stubbed).

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::response::Json;
use axum::routing::post;
use axum::Router;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use relaybot::core::config::{BotConfig, GatewaySection};
use relaybot::gateway::api::GatewayClient;
use relaybot::plugin::api::{BotContext, Dispatcher, PluginManager};
use relaybot::plugin::builtin::ActivityPlugin;
use relaybot::server::api::{build_router, AppState};

type CapturedCalls = Arc<Mutex<Vec<(String, Value)>>>;

/// Stub of the gateway's action API: records every call, answers ok.
async fn start_gateway_stub() -> (String, CapturedCalls) {
    let calls: CapturedCalls = Arc::new(Mutex::new(Vec::new()));

    async fn record(
        State(calls): State<CapturedCalls>,
        axum::extract::Path(action): axum::extract::Path<String>,
        Json(params): Json<Value>,
    ) -> Json<Value> {
        calls.lock().await.push((action, params));
        Json(json!({"status": "ok", "retcode": 0, "data": {}}))
    }

    let app = Router::new()
        .route("/{action}", post(record))
        .with_state(Arc::clone(&calls));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), calls)
}

struct Harness {
    ingest_url: String,
    calls: CapturedCalls,
    activity: Arc<relaybot::plugin::builtin::activity::ActivityAggregator>,
    client: reqwest::Client,
}

async fn start_bot() -> Harness {
    let (gateway_url, calls) = start_gateway_stub().await;

    let mut config = BotConfig::default();
    config.gateway = GatewaySection {
        base_url: gateway_url,
        token: String::new(),
        timeout_secs: 2,
    };
    let config = Arc::new(config);
    let gateway = Arc::new(GatewayClient::new(&config.gateway).unwrap());
    let ctx = Arc::new(BotContext::new(Arc::clone(&config), gateway));

    let manager = PluginManager::new();
    let activity_plugin = ActivityPlugin::new(Arc::clone(&ctx));
    let activity = activity_plugin.aggregator();
    for plugin in [
        Box::new(activity_plugin) as Box<dyn relaybot::plugin::api::BotPlugin>,
        Box::new(relaybot::plugin::builtin::EchoPlugin::new(Arc::clone(&ctx))),
    ] {
        manager.register(plugin).await.unwrap();
    }

    let state = AppState {
        dispatcher: Arc::new(Dispatcher::new(manager.registry().clone())),
        command_prefix: Arc::from("/"),
    };
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build_router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Harness {
        ingest_url: format!("http://{}/", addr),
        calls,
        activity,
        client: reqwest::Client::new(),
    }
}

fn group_message_payload(text: &str, user_id: i64) -> Value {
    json!({
        "post_type": "message",
        "message_type": "group",
        "group_id": 777,
        "user_id": user_id,
        "time": 1700000000,
        "message": [{"type": "text", "data": {"text": text}}],
        "raw_message": text,
    })
}

/// Dispatch runs detached from the HTTP response; poll until the condition
/// holds or the deadline passes.
async fn wait_for<F>(mut condition: F)
where
    F: FnMut() -> bool,
{
    for _ in 0..100 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("condition not reached within deadline");
}

#[tokio::test]
async fn pushed_group_messages_are_counted() {
    let harness = start_bot().await;

    for _ in 0..3 {
        let response = harness
            .client
            .post(&harness.ingest_url)
            .json(&group_message_payload("hello", 42))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
    }
    let response = harness
        .client
        .post(&harness.ingest_url)
        .json(&group_message_payload("hi there", 43))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let day = chrono::DateTime::from_timestamp(1700000000, 0)
        .unwrap()
        .date_naive();
    let activity = Arc::clone(&harness.activity);
    wait_for(move || activity.daily_active_users(777, day) == 2).await;
    assert_eq!(harness.activity.user_activity(777, 42), vec![(day, 3)]);
}

#[tokio::test]
async fn private_messages_never_reach_group_counters() {
    let harness = start_bot().await;

    let payload = json!({
        "post_type": "message",
        "message_type": "private",
        "user_id": 42,
        "time": 1700000000,
        "message": "psst",
    });
    let response = harness
        .client
        .post(&harness.ingest_url)
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    // Give the detached dispatch a moment, then check nothing was recorded
    tokio::time::sleep(Duration::from_millis(200)).await;
    let today = chrono::Utc::now().date_naive();
    let report = harness.activity.report(777, 7, today);
    assert_eq!(report.total_messages, 0);
}

#[tokio::test]
async fn echo_command_round_trips_to_the_gateway() {
    let harness = start_bot().await;

    let response = harness
        .client
        .post(&harness.ingest_url)
        .json(&group_message_payload("/echo ping", 42))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let calls = Arc::clone(&harness.calls);
    wait_for(move || !calls.try_lock().map(|c| c.is_empty()).unwrap_or(true)).await;

    let calls = harness.calls.lock().await;
    let (action, params) = &calls[0];
    assert_eq!(action, "send_msg");
    assert_eq!(params["message_type"], "group");
    assert_eq!(params["group_id"], 777);
    assert_eq!(params["message"], "ping");
}

#[tokio::test]
async fn activity_report_command_replies_into_the_group() {
    let harness = start_bot().await;

    for user in [1, 2, 3] {
        harness
            .client
            .post(&harness.ingest_url)
            .json(&group_message_payload("chatter", user))
            .send()
            .await
            .unwrap();
    }
    harness
        .client
        .post(&harness.ingest_url)
        .json(&group_message_payload("/activity.report 7", 1))
        .send()
        .await
        .unwrap();

    let calls = Arc::clone(&harness.calls);
    wait_for(move || !calls.try_lock().map(|c| c.is_empty()).unwrap_or(true)).await;

    let calls = harness.calls.lock().await;
    let (action, params) = &calls[0];
    assert_eq!(action, "send_msg");
    let text = params["message"].as_str().unwrap();
    assert!(text.contains("Activity for group 777"));
}

#[tokio::test]
async fn malformed_payload_is_rejected_and_never_dispatched() {
    let harness = start_bot().await;

    let response = harness
        .client
        .post(&harness.ingest_url)
        .json(&json!({"message_type": "group", "group_id": 777, "user_id": 42}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "failed");

    tokio::time::sleep(Duration::from_millis(200)).await;
    let today = chrono::Utc::now().date_naive();
    assert_eq!(harness.activity.report(777, 7, today).total_messages, 0);
    assert!(harness.calls.lock().await.is_empty());
}
