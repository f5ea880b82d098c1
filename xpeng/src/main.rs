use anyhow::{Context, Result};
use enode_auth::Settings;
use xpeng::{logging, setup_entry, Entity, FleetSnapshot};

fn log_states(entities: &[Entity], snapshot: &FleetSnapshot) {
    for entity in entities {
        match entity.state(snapshot) {
            Some(state) => tracing::info!(
                entity = entity.unique_id(),
                value = %state.value,
                unit = entity.view().unit().unwrap_or(""),
                state_class = entity.view().state_class().unwrap_or(""),
                "{}",
                entity.name()
            ),
            None => {
                tracing::info!(entity = entity.unique_id(), "{} unavailable", entity.name())
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::new().context("Failed to load settings")?;
    let (log_path, _guard) = logging::init_logging()?;
    tracing::info!(log_path = %log_path.display(), "Starting xpeng");

    let integration = setup_entry(&settings)
        .await
        .with_context(|| format!("Setup failed for client {}", settings.client_id))?;
    tracing::info!(unique_id = %integration.unique_id, "Set up");

    let coordinator = integration.coordinator.clone();
    let entities = integration.entities;
    let mut updates = coordinator.store().subscribe();

    if let Some(snapshot) = updates.borrow_and_update().clone() {
        log_states(&entities, &snapshot);
    }
    let reporter = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            if let Some(snapshot) = updates.borrow_and_update().clone() {
                log_states(&entities, &snapshot);
            }
        }
    });

    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl-C");
        }
    };
    coordinator.run(settings.poll_interval(), shutdown).await;

    reporter.abort();
    Ok(())
}
