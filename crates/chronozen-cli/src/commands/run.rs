//! Interactive shell entry point.

use std::sync::Arc;

use chronozen_core::{
    App, Config, Database, HttpMessageGenerator, KeyValueStore, Location, MemoryStore,
    MessageGenerator,
};
use tracing::{info, warn};

use crate::shell;

pub fn run(location: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let location = location.and_then(|raw| {
        let parsed = Location::parse(raw);
        if parsed.is_none() {
            warn!(location = raw, "ignoring malformed location");
        }
        parsed
    });

    let config = Config::load_or_default();
    let store: Box<dyn KeyValueStore + Send> = match Database::open() {
        Ok(db) => Box::new(db),
        Err(e) => {
            warn!(error = %e, "database unavailable, state will not be saved");
            Box::new(MemoryStore::new())
        }
    };
    let app = App::load(store, location, config.notifications.permission);

    let generator: Option<Arc<dyn MessageGenerator>> =
        match HttpMessageGenerator::from_config(&config.congrats) {
            Ok(generator) => Some(Arc::new(generator)),
            Err(e) => {
                info!(error = %e, "congratulations disabled");
                None
            }
        };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(shell::run(app, config, generator))
}
