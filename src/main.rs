mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use config::environment::EnvironmentConfig;
use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("🚗 LocaCar Manager - API de back-office");
    info!("=======================================");

    let config = EnvironmentConfig::from_env();

    if let Ok(url) = std::env::var("DATABASE_URL") {
        info!(
            "🗄️  Base de datos: {}",
            database::connection::mask_database_url(&url)
        );
    }

    // Inicializar base de datos
    let pool = match database::connection::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    // CORS: permisivo en desarrollo, orígenes concretos si se configuran
    let cors = if config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(config.cors_origins.clone())
    };

    let addr: SocketAddr = config.server_url().parse()?;
    let app_state = AppState::new(pool, config);

    let app = routes::create_api_router(app_state.clone())
        .layer(cors)
        .with_state(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /api/ping - Comprobación de vida");
    info!("   GET  /api/db_ping - Comprobación de base de datos");
    info!("🔐 Auth:");
    info!("   POST /api/auth/login - Iniciar sesión");
    info!("   POST /api/auth/logout - Cerrar sesión");
    info!("   GET  /api/auth/status - Estado de la sesión");
    info!("🚗 Coches (lecturas manager, escrituras admin):");
    info!("   GET|POST /api/cars - Listar / crear coche");
    info!("   GET|PUT|DELETE /api/cars/:id - Consultar / editar / borrar");
    info!("👥 Clientes (manager, borrado admin):");
    info!("   GET|POST /api/clients - Listar / registrar cliente");
    info!("   GET|PUT|DELETE /api/clients/:id - Consultar / editar / borrar");
    info!("🧑‍💼 Managers (admin):");
    info!("   GET|POST /api/managers - Listar / crear manager");
    info!("   GET|PUT|DELETE /api/managers/:id - Consultar / editar / borrar");
    info!("📅 Reservas (manager):");
    info!("   GET|POST /api/reservations - Listar / crear reserva");
    info!("   GET|PUT|DELETE /api/reservations/:id - Consultar / editar / borrar");
    info!("   PUT  /api/reservations/:id/status - Transición de estado");
    info!("📋 Bitácora y paneles:");
    info!("   GET  /api/audit-logs - Bitácora paginada (admin)");
    info!("   GET  /api/admin/stats - Estadísticas de admin");
    info!("   GET  /api/manager/dashboard/stats - Panel del manager");
    info!("   GET  /api/manager/dashboard/recent-clients - Últimos clientes");
    info!("   GET  /api/manager/dashboard/recent-reservations - Últimas reservas");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
