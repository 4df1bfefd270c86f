//! Coupon Service Library
//!
//! Coupon marketplace backend: enterprises publish coupons, clients buy them
//! as uniquely identified offers and enterprise employees redeem those offers
//! at the point of sale.

pub mod api;
pub mod config;
pub mod infra;
pub mod repository;
pub mod service;
pub mod types;

use std::sync::Arc;

use tracing::info;

use domain::AdministratorProfile;

use crate::api::{create_router, AppState};
use crate::config::CouponServiceConfig;
use crate::infra::{Database, Persistence};
use crate::service::{AccountManager, AccountService, Credentials, JwtGuard};

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Administrator bootstrap data supplied on the command line.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub email: String,
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Run the HTTP server until Ctrl-C.
pub async fn run_server(config: CouponServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect(&config.database).await?;
    let app = create_router(AppState::from_database(db, config.jwt));

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("{} listening on http://{}", config.server.service_name, addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(
    config: &CouponServiceConfig,
    action: MigrateAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            for (name, applied) in db.migration_status().await? {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Create an administrator account. Administrators cannot self-register.
pub async fn create_administrator(
    config: CouponServiceConfig,
    seed: AdminSeed,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect(&config.database).await?;
    let uow = Arc::new(Persistence::new(db.get_connection()));
    let accounts = AccountManager::new(uow, Arc::new(JwtGuard::new(config.jwt)));

    let account = accounts
        .register_administrator(
            Credentials {
                email: seed.email,
                username: seed.username,
                password: seed.password,
            },
            AdministratorProfile {
                first_name: seed.first_name,
                last_name: seed.last_name,
            },
        )
        .await?;

    info!(email = %account.email, "Administrator created");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
