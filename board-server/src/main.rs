use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use board_server::board::{BoardEngine, LineStyles, StationLayout};
use board_server::cache::CachedCalendarClient;
use board_server::calendar::{CalendarClient, CalendarClientConfig};
use board_server::clock::Clock;
use board_server::config::BoardConfig;
use board_server::refresh::{BoardRuntime, Refresher, RuntimeConfig, SnapshotStore};
use board_server::timetable::{
    FileTimetableSource, TimetableClient, TimetableClientConfig, TimetableSource,
};
use board_server::web::{AppState, create_router};

const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = BoardConfig::from_env()?;

    let source = match &config.timetable_file {
        Some(path) => {
            info!(path = %path.display(), "reading timetable from file");
            TimetableSource::File(FileTimetableSource::new(path))
        }
        None => {
            let client_config = TimetableClientConfig::new(&config.api_base_url)
                .with_timeout(config.request_timeout_secs);
            TimetableSource::Http(TimetableClient::new(client_config)?)
        }
    };

    let calendar_config = CalendarClientConfig::new(&config.calendar_url)
        .with_encoding(&config.calendar_encoding)
        .with_timeout(config.request_timeout_secs);
    let calendar = CachedCalendarClient::new(
        CalendarClient::new(calendar_config)?,
        &config.cache_config(),
    );

    let layout = match &config.layout_file {
        Some(path) => StationLayout::load(path)?,
        None => StationLayout::default(),
    };
    if layout.is_empty() {
        warn!("station layout is empty, only buses will be shown");
    }

    let clock = Clock::from_override(config.debug_datetime);
    let refresher = Refresher::new(
        source,
        Some(Arc::new(calendar)),
        config.normalize_options(),
        clock,
        SnapshotStore::new(),
    );
    let engine = BoardEngine::new(layout, LineStyles::default(), config.rank_config());
    let runtime = BoardRuntime::start(
        refresher,
        engine,
        clock,
        RuntimeConfig {
            data_refresh: config.data_refresh,
            clock_tick: config.clock_tick,
        },
    );

    let state = AppState::new(runtime.subscribe(), config.show_footer);
    let app = create_router(state, STATIC_DIR);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "departure board listening");
    info!("  GET  /            - Board page");
    info!("  GET  /api/board   - Board as JSON");
    info!("  GET  /health      - Health check");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    runtime.shutdown();
    Ok(())
}
