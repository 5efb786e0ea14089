use portal::core::{
    api::salvo_config::get_salvo_service, database::db::establish_connection,
    env::app_env::AppEnv,
};
use salvo::{conn::Acceptor, prelude::*};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let env = AppEnv::new()?;
    let pool = establish_connection(&env)?;

    let http_addr = format!("0.0.0.0:{}", env.app_port);
    let acceptor = TcpListener::new(http_addr).bind().await;

    tracing::info!(
        port = env.app_port,
        prefix = %env.api_prefix,
        "MediGuru portal API listening"
    );

    run_server(Server::new(acceptor), get_salvo_service(&env, pool)).await;

    Ok(())
}

async fn run_server<A: Acceptor + Send>(server: Server<A>, service: Service) {
    let handle = server.handle();

    // Graceful shutdown handler
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl_c: {}", e);
            return;
        }
        tracing::info!("Signal received, shutting down gracefully...");
        handle.stop_graceful(None);
    });

    server.serve(service).await;
}
