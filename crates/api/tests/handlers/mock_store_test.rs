use std::sync::Arc;

use axum::http::StatusCode;
use barberbook_api::notifier::Notifier;
use barberbook_core::{errors::BookingError, models::slot::Slot};
use barberbook_db::mock::MockSlotStore;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::test_utils::{admin_config, build_state, server_for};

fn server_with(store: MockSlotStore) -> axum_test::TestServer {
    server_for(build_state(Arc::new(store), Notifier::disabled(), admin_config(false)))
}

#[tokio::test]
async fn test_list_delegates_to_store() {
    let mut store = MockSlotStore::new();
    let slot = Slot::free(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(), 13);
    let expected = vec![slot.clone()];
    store
        .expect_list()
        .times(1)
        .returning(move || Ok(vec![slot.clone()]));

    let slots: Vec<Slot> = server_with(store).get("/api/appointments").await.json();

    assert_eq!(slots, expected);
}

#[tokio::test]
async fn test_validation_happens_before_store() {
    let mut store = MockSlotStore::new();
    store.expect_book_if_free().never();

    let response = server_with(store)
        .post("/api/appointments/2025-01-06-13/book")
        .json(&json!({ "name": "Anna" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_store_failure_maps_to_server_error() {
    let mut store = MockSlotStore::new();
    store
        .expect_book_if_free()
        .times(1)
        .returning(|_, _| Err(BookingError::Database(eyre::eyre!("connection reset"))));

    let response = server_with(store)
        .post("/api/appointments/2025-01-06-13/book")
        .json(&json!({ "name": "Anna", "email": "a@x.com" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("connection reset"));
}

#[tokio::test]
async fn test_toggle_passes_slot_id_through() {
    let mut store = MockSlotStore::new();
    store
        .expect_toggle()
        .times(1)
        .returning(|id| {
            assert_eq!(id, "2025-01-08-19");
            Err(BookingError::slot_not_found())
        });

    server_with(store)
        .post("/api/appointments/2025-01-08-19/toggle")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
