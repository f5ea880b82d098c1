use std::time::Duration;

use enode_auth::Settings;
use enode_stub::{closed_port_url, vehicle, vehicles_page, StatusCode, StubServer};
use xpeng::{setup_entry, validate_credentials, DisplayValue, UpdateError};

fn settings_for(url: &str, client_secret: &str) -> Settings {
    let mut settings = Settings::with_credentials("id1", client_secret);
    settings.oauth_url = url.to_string();
    settings.api_url = url.to_string();
    settings
}

async fn stub_with_one_vehicle() -> StubServer {
    let stub = StubServer::start("id1", "secret1").await.unwrap();
    stub.state
        .set_vehicles(vehicles_page(vec![vehicle("car-a", 72, true)]))
        .await;
    stub
}

fn state_of(integration: &xpeng::Integration, unique_id: &str) -> Option<DisplayValue> {
    let snapshot = integration.coordinator.snapshot()?;
    integration
        .entities
        .iter()
        .find(|e| e.unique_id() == unique_id)?
        .state(&snapshot)
        .map(|state| state.value)
}

#[tokio::test]
async fn setup_fetches_and_projects_one_vehicle() {
    let stub = stub_with_one_vehicle().await;

    let integration = setup_entry(&settings_for(&stub.url(), "secret1"))
        .await
        .unwrap();

    let snapshot = integration.coordinator.snapshot().unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.vehicles[0].charge_state.battery_level, 72);
    assert!(snapshot.vehicles[0].charge_state.is_charging);

    assert_eq!(integration.unique_id, "id1");
    assert_eq!(integration.entities.len(), 7);
    assert_eq!(
        state_of(&integration, "car_a_battery"),
        Some(DisplayValue::Integer(72))
    );
    assert_eq!(
        state_of(&integration, "car_a_charging"),
        Some(DisplayValue::Bool(true))
    );
    assert_eq!(
        state_of(&integration, "car_a_location_tracker"),
        Some(DisplayValue::Position {
            latitude: 52.3676,
            longitude: 4.9041
        })
    );
    assert_eq!(integration.entities[0].name(), "XPENG G6 battery");
    assert_eq!(
        stub.state.last_vehicles_authorization().await.as_deref(),
        Some("Bearer tok")
    );
    assert!(integration.coordinator.last_update_success().await);
}

#[tokio::test]
async fn refresh_picks_up_new_values() {
    let stub = stub_with_one_vehicle().await;
    let integration = setup_entry(&settings_for(&stub.url(), "secret1"))
        .await
        .unwrap();

    stub.state
        .set_vehicles(vehicles_page(vec![vehicle("car-a", 80, false)]))
        .await;
    integration.coordinator.refresh().await.unwrap();

    assert_eq!(
        state_of(&integration, "car_a_battery"),
        Some(DisplayValue::Integer(80))
    );
    assert_eq!(
        state_of(&integration, "car_a_plugged_in"),
        Some(DisplayValue::Bool(false))
    );
    assert_eq!(stub.state.token_requests(), 1);
}

#[tokio::test]
async fn vehicle_dropping_out_makes_entities_unavailable() {
    let stub = StubServer::start("id1", "secret1").await.unwrap();
    stub.state
        .set_vehicles(vehicles_page(vec![
            vehicle("car-a", 72, true),
            vehicle("car-b", 40, false),
        ]))
        .await;
    let integration = setup_entry(&settings_for(&stub.url(), "secret1"))
        .await
        .unwrap();
    assert_eq!(integration.entities.len(), 14);

    stub.state
        .set_vehicles(vehicles_page(vec![vehicle("car-b", 41, false)]))
        .await;
    integration.coordinator.refresh().await.unwrap();

    assert_eq!(state_of(&integration, "car_a_battery"), None);
    assert_eq!(
        state_of(&integration, "car_b_battery"),
        Some(DisplayValue::Integer(41))
    );
}

#[tokio::test]
async fn rejected_token_leaves_snapshot_untouched() {
    let stub = stub_with_one_vehicle().await;
    let integration = setup_entry(&settings_for(&stub.url(), "secret1"))
        .await
        .unwrap();
    let before = integration.coordinator.snapshot().unwrap();

    stub.state.fail_vehicles(Some(StatusCode::UNAUTHORIZED)).await;
    let err = integration.coordinator.refresh().await.unwrap_err();

    assert!(matches!(err, UpdateError::AuthFailed(_)));
    assert_eq!(*integration.coordinator.snapshot().unwrap(), *before);
    assert!(!integration.coordinator.last_update_success().await);
}

#[tokio::test]
async fn timeout_leaves_snapshot_untouched() {
    let stub = stub_with_one_vehicle().await;
    let mut settings = settings_for(&stub.url(), "secret1");
    settings.request_timeout_secs = 1;
    let integration = setup_entry(&settings).await.unwrap();
    let before = integration.coordinator.snapshot().unwrap();

    stub.state.delay_vehicles(Duration::from_secs(3)).await;
    let err = integration.coordinator.refresh().await.unwrap_err();

    assert!(matches!(err, UpdateError::UpdateFailed(_)));
    assert_eq!(*integration.coordinator.snapshot().unwrap(), *before);
}

#[tokio::test]
async fn short_lived_tokens_are_reissued_before_use() {
    let stub = stub_with_one_vehicle().await;
    stub.state.set_expires_in(120);
    let integration = setup_entry(&settings_for(&stub.url(), "secret1"))
        .await
        .unwrap();
    let after_setup = stub.state.token_requests();

    stub.state.set_access_token("tok2").await;
    integration.coordinator.refresh().await.unwrap();

    assert_eq!(stub.state.token_requests(), after_setup + 1);
    assert_eq!(
        stub.state.last_vehicles_authorization().await.as_deref(),
        Some("Bearer tok2")
    );
}

#[tokio::test]
async fn validate_accepts_good_credentials() {
    let stub = stub_with_one_vehicle().await;

    let unique_id = validate_credentials(&settings_for(&stub.url(), "secret1"))
        .await
        .unwrap();

    assert_eq!(unique_id, "id1");
    assert_eq!(stub.state.token_requests(), 1);
    assert_eq!(stub.state.vehicle_requests(), 0);
}

#[tokio::test]
async fn validate_reports_invalid_auth() {
    let stub = stub_with_one_vehicle().await;

    let err = validate_credentials(&settings_for(&stub.url(), "wrong"))
        .await
        .unwrap_err();

    assert_eq!(err.key(), "invalid_auth");
}

#[tokio::test]
async fn validate_reports_cannot_connect() {
    let url = closed_port_url().unwrap();

    let err = validate_credentials(&settings_for(&url, "secret1"))
        .await
        .unwrap_err();

    assert_eq!(err.key(), "cannot_connect");
}

#[tokio::test]
async fn token_server_error_is_cannot_connect() {
    let stub = stub_with_one_vehicle().await;
    stub.state
        .fail_token(Some(StatusCode::SERVICE_UNAVAILABLE))
        .await;

    let err = validate_credentials(&settings_for(&stub.url(), "secret1"))
        .await
        .unwrap_err();

    assert_eq!(err.key(), "cannot_connect");
}

#[tokio::test]
async fn setup_fails_when_first_refresh_fails() {
    let stub = stub_with_one_vehicle().await;
    stub.state
        .fail_vehicles(Some(StatusCode::INTERNAL_SERVER_ERROR))
        .await;

    let err = setup_entry(&settings_for(&stub.url(), "secret1"))
        .await
        .err()
        .unwrap();

    assert_eq!(err.key(), "cannot_connect");
}

#[tokio::test]
async fn setup_with_wrong_secret_is_invalid_auth() {
    let stub = stub_with_one_vehicle().await;

    let err = setup_entry(&settings_for(&stub.url(), "wrong"))
        .await
        .err()
        .unwrap();

    assert_eq!(err.key(), "invalid_auth");
    assert_eq!(stub.state.vehicle_requests(), 0);
}
