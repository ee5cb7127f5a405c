use events::EventPublisher;
use log::{error, info};
use migration::{Migrator, MigratorTrait};
use service::{config::Config, logging::Logger, AppState};
use sse::{Hub, SseDomainEventHandler};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config);

    let db = match service::init_database(&config).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = Migrator::up(db.as_ref(), None).await {
        error!("Failed to run database migrations: {e}");
        std::process::exit(1);
    }

    let hub = Hub::spawn();
    let event_publisher =
        EventPublisher::new().with_handler(Arc::new(SseDomainEventHandler::new(hub.clone())));

    let app_state = AppState::new(config, &db, hub.clone(), Arc::new(event_publisher));

    if let Err(e) = web::init_server(app_state).await {
        error!("Server failed: {e}");
        std::process::exit(1);
    }

    // Closes every subscriber queue so in-flight streams observe end-of-stream.
    hub.shutdown();
    info!("Server stopped");
}
