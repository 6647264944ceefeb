use super::*;
use crate::net::mock::{MockApi, conditions_response, sample_site};

const PERIOD: Duration = Duration::from_secs(300);

async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

fn setup() -> (Arc<MockApi>, Store, ConditionsCoordinator) {
    let api = Arc::new(MockApi::default());
    let store = Store::new();
    let coordinator = ConditionsCoordinator::new(api.clone(), store.clone(), PERIOD);
    (api, store, coordinator)
}

#[tokio::test]
async fn refresh_populates_sites_and_timestamps() {
    let (api, store, coordinator) = setup();
    api.set_conditions(Ok(conditions_response(vec![sample_site("A", 0), sample_site("B", 2)])));

    coordinator.refresh().await.unwrap();

    let state = store.snapshot();
    assert_eq!(state.data.sites.len(), 2);
    assert_eq!(state.data.data_date.as_deref(), Some("2024-06-15"));
    assert_eq!(state.data.last_updated.as_deref(), Some("2024-06-15T12:00:00"));
    assert!(!state.ui.loading);
    assert!(state.ui.error.is_none());
}

#[tokio::test]
async fn refresh_failure_keeps_sites_and_records_error() {
    let (api, store, coordinator) = setup();
    store.set_sites(vec![sample_site("A", 0)]);
    api.set_conditions(Err(ApiError::Http { status: 503, body: "down".into() }));

    let err = coordinator.refresh().await.unwrap_err();
    assert_eq!(err.status(), 503);

    let state = store.snapshot();
    assert_eq!(state.data.sites.len(), 1);
    assert_eq!(state.ui.error.as_deref(), Some("API Error: 503 - down"));
    assert!(!state.ui.loading);
}

#[tokio::test]
async fn refresh_clears_previous_error_on_start() {
    let (api, store, coordinator) = setup();
    store.set_error(Some("stale".into()));
    api.set_conditions(Ok(conditions_response(vec![sample_site("A", 0)])));

    coordinator.refresh().await.unwrap();
    assert!(store.read(|s| s.ui.error.is_none()));
}

#[tokio::test(start_paused = true)]
async fn activate_fetches_immediately_when_empty() {
    let (api, store, coordinator) = setup();
    api.set_conditions(Ok(conditions_response(vec![sample_site("A", 0)])));

    let _handle = coordinator.activate();
    settle().await;

    assert_eq!(api.call_count("current_conditions"), 1);
    assert_eq!(store.read(|s| s.data.sites.len()), 1);
}

#[tokio::test(start_paused = true)]
async fn activate_skips_initial_fetch_when_sites_loaded() {
    let (api, store, coordinator) = setup();
    store.set_sites(vec![sample_site("A", 0)]);
    api.set_conditions(Ok(conditions_response(vec![sample_site("A", 0), sample_site("B", 1)])));

    let _handle = coordinator.activate();
    settle().await;
    assert_eq!(api.call_count("current_conditions"), 0);

    tokio::time::sleep(PERIOD).await;
    assert_eq!(api.call_count("current_conditions"), 1);
    assert_eq!(store.read(|s| s.data.sites.len()), 2);
}

#[tokio::test(start_paused = true)]
async fn polls_every_period_until_handle_dropped() {
    let (api, _store, coordinator) = setup();
    api.set_conditions(Ok(conditions_response(vec![sample_site("A", 0)])));

    let handle = coordinator.activate();
    settle().await;
    tokio::time::sleep(PERIOD * 2).await;
    assert_eq!(api.call_count("current_conditions"), 3);

    drop(handle);
    tokio::time::sleep(PERIOD * 3).await;
    assert_eq!(api.call_count("current_conditions"), 3);
}

#[tokio::test(start_paused = true)]
async fn polling_failure_keeps_last_good_sites() {
    let (api, store, coordinator) = setup();
    api.set_conditions(Ok(conditions_response(vec![sample_site("A", 0), sample_site("B", 2)])));

    let _handle = coordinator.activate();
    settle().await;
    api.set_conditions(Err(ApiError::Transport("connection refused".into())));
    tokio::time::sleep(PERIOD).await;

    let state = store.snapshot();
    assert_eq!(state.data.sites.len(), 2);
    assert_eq!(state.ui.error.as_deref(), Some("Network error: connection refused"));
}

#[tokio::test(start_paused = true)]
async fn dropping_handle_mid_fetch_lets_fetch_finish() {
    let (api, store, coordinator) = setup();
    api.set_conditions(Ok(conditions_response(vec![sample_site("A", 0), sample_site("B", 2)])));
    api.set_conditions_delay(Duration::from_secs(2));

    let handle = coordinator.activate();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(store.read(|s| s.ui.loading));

    drop(handle);
    tokio::time::sleep(Duration::from_secs(10)).await;

    let state = store.snapshot();
    assert!(!state.ui.loading);
    assert_eq!(state.data.sites.len(), 2);
    assert_eq!(api.call_count("current_conditions"), 1);
}
