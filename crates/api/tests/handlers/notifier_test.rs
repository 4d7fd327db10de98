use std::time::Duration;

use barberbook_api::{config::WebhookConfig, notifier::Notifier};
use barberbook_core::models::{
    booking::{BookSlotResponse, WebhookStatus},
    slot::SlotStatus,
};
use barberbook_db::SlotStore;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

use crate::test_utils::{SLOT_ID, TestContext, admin_config, webhook_config};

async fn book(ctx: &TestContext) -> BookSlotResponse {
    book_slot(ctx, SLOT_ID).await
}

async fn book_slot(ctx: &TestContext, slot_id: &str) -> BookSlotResponse {
    let response = ctx
        .server
        .post(&format!("/api/appointments/{}/book", slot_id))
        .json(&json!({ "name": "Anna", "email": "a@x.com" }))
        .await;
    response.assert_status_ok();
    response.json()
}

fn context_for(config: WebhookConfig) -> TestContext {
    let notifier = Notifier::spawn(config).expect("notifier should start");
    TestContext::with_options(notifier, admin_config(false))
}

async fn wait_for_requests(server: &MockServer, expected: usize) -> usize {
    for _ in 0..100 {
        let seen = server.received_requests().await.map_or(0, |r| r.len());
        if seen >= expected {
            return seen;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    server.received_requests().await.map_or(0, |r| r.len())
}

#[tokio::test]
async fn test_webhook_success() {
    let sink = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hooks/booking"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "eventType": "appointmentBooked",
            "appointment": {
                "id": SLOT_ID,
                "status": "booked",
                "customerName": "Anna",
                "customerEmail": "a@x.com"
            }
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&sink)
        .await;

    let ctx = context_for(webhook_config(format!("{}/hooks/booking", sink.uri()), 2));

    let booked = book(&ctx).await;

    assert_eq!(booked.webhook_status, WebhookStatus::Success);
    assert_eq!(booked.appointment.status, SlotStatus::Booked);
}

#[tokio::test]
async fn test_webhook_failure_keeps_booking_and_retries() {
    let sink = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&sink)
        .await;

    let ctx = context_for(webhook_config(sink.uri(), 2));

    let booked = book(&ctx).await;

    assert_eq!(
        booked.webhook_status,
        WebhookStatus::failed("500 Internal Server Error")
    );
    let slot = ctx.store.get(SLOT_ID).await.unwrap().unwrap();
    assert_eq!(slot.status, SlotStatus::Booked);

    // One initial attempt plus two retries, delivered in the background
    assert_eq!(wait_for_requests(&sink, 3).await, 3);
}

#[tokio::test]
async fn test_retries_do_not_delay_next_booking() {
    const NEXT_SLOT_ID: &str = "2025-01-06-14";

    let sink = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "appointment": { "id": SLOT_ID } })))
        .respond_with(ResponseTemplate::new(500).set_delay(Duration::from_millis(1800)))
        .mount(&sink)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "appointment": { "id": NEXT_SLOT_ID } })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&sink)
        .await;

    let ctx = context_for(webhook_config(sink.uri(), 2));

    let first = book_slot(&ctx, SLOT_ID).await;
    assert_eq!(
        first.webhook_status,
        WebhookStatus::failed("500 Internal Server Error")
    );

    // The first booking's retries are still in flight against the slow sink
    let started = std::time::Instant::now();
    let second = book_slot(&ctx, NEXT_SLOT_ID).await;

    assert_eq!(second.webhook_status, WebhookStatus::Success);
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_webhook_timeout_is_reported() {
    let sink = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&sink)
        .await;

    let config = WebhookConfig {
        timeout: Duration::from_millis(200),
        ..webhook_config(sink.uri(), 0)
    };
    let ctx = context_for(config);

    let booked = book(&ctx).await;

    assert_eq!(booked.webhook_status, WebhookStatus::failed("timed out"));
    assert_eq!(booked.appointment.status, SlotStatus::Booked);
}

#[tokio::test]
async fn test_webhook_unreachable_sink() {
    let ctx = context_for(webhook_config("http://127.0.0.1:9/hook".to_string(), 0));

    let booked = book(&ctx).await;

    assert!(booked.webhook_status.to_string().starts_with("failed: "));
    assert_eq!(booked.appointment.status, SlotStatus::Booked);
}

#[tokio::test]
async fn test_no_webhook_for_rejected_booking() {
    let sink = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&sink)
        .await;

    let ctx = context_for(webhook_config(sink.uri(), 0));
    ctx.store.toggle(SLOT_ID).await.unwrap();

    ctx.server
        .post(&format!("/api/appointments/{}/book", SLOT_ID))
        .json(&json!({ "name": "Anna", "email": "a@x.com" }))
        .await
        .assert_status(axum::http::StatusCode::CONFLICT);
}
