//! Solace HTTP Server
//!
//! Main entry point for the HTTP API server.

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use application::{
    ports::{ArtifactStorePort, InferencePort, SpeechSynthesisPort, TranscriptionPort},
    SessionOrchestrator, SessionPorts,
};
use infrastructure::{
    AppConfig, FsArtifactStore, InferenceAdapter, SynthesisAdapter, TranscriptionAdapter,
    build_tts, init_logging, load_blocklist, telemetry::DEFAULT_LOG_FILTER,
};
use presentation_http::{AppState, create_router, with_middleware};
use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    init_logging(config.server.log_format(), DEFAULT_LOG_FILTER)
        .context("Failed to initialize logging")?;

    info!("Solace v{} starting...", env!("CARGO_PKG_VERSION"));

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
    config.warn_on_suspicious_settings();

    info!(
        host = %config.server.host,
        port = config.server.port,
        provider = %config.inference.provider,
        model = %config.inference.resolved_model(),
        tts = ?config.speech.tts_provider,
        "Configuration loaded"
    );

    let sdk_config = ai_speech::aws::load_sdk_config(&config.speech).await;

    let inference: Arc<dyn InferencePort> = Arc::new(
        InferenceAdapter::from_config(config.inference.clone(), config.retry.clone())
            .context("Failed to initialize inference")?,
    );
    let transcription: Arc<dyn TranscriptionPort> = Arc::new(
        TranscriptionAdapter::from_config(&config.speech, &sdk_config)
            .context("Failed to initialize transcription")?,
    );
    let synthesis: Arc<dyn SpeechSynthesisPort> = Arc::new(SynthesisAdapter::new(
        build_tts(&config.speech, &sdk_config).context("Failed to initialize speech synthesis")?,
        config.retry.clone(),
    ));
    let artifacts: Arc<dyn ArtifactStorePort> = Arc::new(
        FsArtifactStore::open(config.artifacts.directory.clone())
            .await
            .context("Failed to open artifact store")?,
    );

    let blocklist = Arc::new(load_blocklist(&config.moderation).await);

    let orchestrator = Arc::new(SessionOrchestrator::new(
        blocklist,
        SessionPorts {
            inference,
            transcription,
            synthesis,
            artifacts,
        },
        config.session_config(),
    ));

    let app = with_middleware(
        create_router(AppState::new(Arc::clone(&orchestrator))),
        &config.server,
    );

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Server listening on http://{}", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    // Generated audio never outlives the process
    match orchestrator.end_session().await {
        Ok(deleted) if !deleted.is_empty() => {
            info!(count = deleted.len(), "Removed leftover audio artifacts");
        },
        Ok(_) => {},
        Err(e) => warn!(error = %e, "Failed to remove leftover audio artifacts"),
    }

    info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("Waiting up to {:?} for connections to close...", timeout);
}
