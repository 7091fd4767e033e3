use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::services::ArchiveService;
use shared_utils::test_utils::{MockStoreResponses, TestConfig};

fn service(store_url: &str) -> ArchiveService {
    ArchiveService::new(&TestConfig::with_store_url(store_url))
}

fn march_10() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

fn sweep_instant() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 1, 0, 0).unwrap()
}

#[tokio::test]
async fn sweep_expires_stale_pending_and_archives_settled_bookings() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/appointments.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "-P1": MockStoreResponses::appointment("maria-santos", "2025-03-08", "09:00", "Ana Cruz", "pending"),
            "-C1": MockStoreResponses::appointment("maria-santos", "2025-03-08", "11:00", "Ben Reyes", "confirmed"),
            "-X1": MockStoreResponses::appointment("maria-santos", "2025-03-09", "13:00", "Carla Lim", "cancelled"),
            "-F1": MockStoreResponses::appointment("maria-santos", "2025-03-11", "09:00", "Dan Tan", "pending"),
            "-E1": MockStoreResponses::appointment("maria-santos", "2025-03-01", "09:00", "Ela Santos", "expired"),
        })))
        .mount(&mock_server)
        .await;

    // Stale pending booking is expired in place.
    Mock::given(method("PATCH"))
        .and(path("/appointments/-P1.json"))
        .and(body_partial_json(json!({ "status": "expired" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Settled past bookings are copied into the archive, then removed.
    for id in ["-C1", "-X1"] {
        Mock::given(method("PUT"))
            .and(path(format!("/appointmentArchive/{}.json", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(format!("/appointments/{}.json", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(Value::Null))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let summary = service(&mock_server.uri())
        .run_sweep(sweep_instant(), march_10())
        .await
        .unwrap();

    assert_eq!(summary.expired, 1);
    assert_eq!(summary.archived, 2);
}

#[tokio::test]
async fn archived_copy_carries_the_archive_timestamp() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/appointments.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "-C1": MockStoreResponses::appointment("maria-santos", "2025-03-08", "11:00", "Ben Reyes", "confirmed"),
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/appointmentArchive/-C1.json"))
        .and(body_partial_json(json!({
            "name": "Ben Reyes",
            "status": "confirmed",
            "archivedAt": "2025-03-10T01:00:00Z"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/appointments/-C1.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Null))
        .expect(1)
        .mount(&mock_server)
        .await;

    let summary = service(&mock_server.uri())
        .run_sweep(sweep_instant(), march_10())
        .await
        .unwrap();
    assert_eq!(summary.archived, 1);
}

#[tokio::test]
async fn history_prefers_the_archive_copy_when_both_exist() {
    let mock_server = MockServer::start().await;

    let mut archived = MockStoreResponses::appointment(
        "maria-santos",
        "2025-03-08",
        "11:00",
        "Ben Reyes",
        "confirmed",
    );
    archived["archivedAt"] = json!("2025-03-09T01:00:00Z");

    Mock::given(method("GET"))
        .and(path("/appointmentArchive.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "-C1": archived })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/appointments.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            // Stale active copy of the same record, left by an interrupted sweep.
            "-C1": MockStoreResponses::appointment("maria-santos", "2025-03-08", "11:00", "Ben Reyes", "confirmed"),
            "-OLD": MockStoreResponses::appointment("maria-santos", "2025-03-09", "09:00", "Ana Cruz", "expired"),
            "-NEW": MockStoreResponses::appointment("maria-santos", "2025-03-11", "09:00", "Dan Tan", "pending"),
        })))
        .mount(&mock_server)
        .await;

    let history = service(&mock_server.uri())
        .merged_history(march_10())
        .await
        .unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(
        history["-C1"].archived_at,
        Some(Utc.with_ymd_and_hms(2025, 3, 9, 1, 0, 0).unwrap())
    );
    assert!(history.contains_key("-OLD"));
    assert!(!history.contains_key("-NEW"));
}

#[tokio::test]
async fn purge_deletes_the_whole_archive_collection() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/appointmentArchive.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Null))
        .expect(1)
        .mount(&mock_server)
        .await;

    service(&mock_server.uri()).purge().await.unwrap();
}

#[tokio::test]
async fn archiving_one_appointment_copies_then_deletes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/appointments/-A9.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockStoreResponses::appointment(
            "maria-santos",
            "2025-03-08",
            "09:00",
            "Ana Cruz",
            "cancelled",
        )))
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/appointmentArchive/-A9.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/appointments/-A9.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Null))
        .expect(1)
        .mount(&mock_server)
        .await;

    service(&mock_server.uri())
        .archive_one("-A9", sweep_instant())
        .await
        .unwrap();
}
