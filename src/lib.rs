pub mod allocation;
pub mod config;
pub mod controllers;
pub mod database;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod reservation;
pub mod store;

use std::sync::Arc;

use anyhow::Context;

use crate::reservation::ReservationEngine;
use crate::store::PgSeatStore;

// Shared state для всего приложения
pub struct AppState {
    pub db: database::Database,
    pub engine: ReservationEngine<PgSeatStore>,
    pub config: config::Config,
}

impl AppState {
    pub async fn new(config: config::Config) -> anyhow::Result<Arc<Self>> {
        let db = database::Database::new(&config.database.url, config.database.pool_size)
            .await
            .context("failed to connect to database")?;

        db.run_migrations()
            .await
            .context("failed to run migrations")?;

        let store = PgSeatStore::new(db.pool.clone());
        store
            .provision(config.seating.total_seats)
            .await
            .context("failed to provision seats")?;

        let engine = ReservationEngine::new(store, config.seating.clone());

        Ok(Arc::new(Self { db, engine, config }))
    }
}
