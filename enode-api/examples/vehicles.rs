use enode_api::{Client, EnodeApiError};
use enode_auth::Settings;

#[tokio::main]
pub async fn main() -> Result<(), EnodeApiError> {
    let settings = Settings::with_credentials("client_id", "client_secret");
    let client = Client::from_settings(&settings)?;

    client.tokens().acquire().await?;
    let response = client.vehicles().await?;

    for vehicle in &response.data {
        println!(
            "{} {}: {}% ({} km)",
            vehicle.information.brand,
            vehicle.information.model,
            vehicle.charge_state.battery_level,
            vehicle.charge_state.range
        );
    }
    Ok(())
}
