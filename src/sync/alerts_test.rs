use super::*;
use crate::net::mock::{MockApi, alerts_response, sample_alert};
use crate::net::types::AlertType;

const PERIOD: Duration = Duration::from_secs(600);

fn setup() -> (Arc<MockApi>, Store, AlertsCoordinator) {
    let api = Arc::new(MockApi::default());
    let store = Store::new();
    let coordinator = AlertsCoordinator::new(api.clone(), store.clone(), PERIOD);
    (api, store, coordinator)
}

#[tokio::test(start_paused = true)]
async fn activate_fetches_immediately_and_every_period() {
    let (api, store, coordinator) = setup();
    api.set_alerts(Ok(alerts_response(vec![sample_alert("x", AlertType::Bleaching, true)])));

    let _handle = coordinator.activate();
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(api.call_count("alerts"), 1);
    assert_eq!(store.read(|s| s.data.alerts.len()), 1);

    tokio::time::sleep(PERIOD).await;
    assert_eq!(api.call_count("alerts"), 2);
}

#[tokio::test]
async fn failure_preserves_last_known_alerts() {
    let (api, store, coordinator) = setup();
    api.set_alerts(Ok(alerts_response(vec![sample_alert("x", AlertType::Bleaching, true)])));
    coordinator.refresh().await.unwrap();

    api.set_alerts(Err(ApiError::Http { status: 500, body: "oops".into() }));
    assert!(coordinator.refresh().await.is_err());

    let state = store.snapshot();
    assert_eq!(state.data.alerts.len(), 1);
    assert_eq!(state.ui.error.as_deref(), Some("API Error: 500 - oops"));
}

#[tokio::test]
async fn refresh_does_not_touch_loading_flag() {
    let (api, store, coordinator) = setup();
    store.set_loading(true);
    api.set_alerts(Ok(alerts_response(Vec::new())));
    coordinator.refresh().await.unwrap();
    assert!(store.read(|s| s.ui.loading));
}
