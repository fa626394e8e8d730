// Player dashboard entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Build the HTTP client and projection page source
// 4. Load the player directory and season stats
// 5. Scrape projections (degrades to empty tables on failure)
// 6. Assemble the resolver and app state
// 7. Create mpsc channels
// 8. Spawn the app command loop
// 9. Run the TUI (blocking until the user quits)
// 10. Cleanup on exit

use player_dashboard::app;
use player_dashboard::config;
use player_dashboard::data;
use player_dashboard::images;
use player_dashboard::net;
use player_dashboard::resolve;
use player_dashboard::tui;

use anyhow::Context;
use data::projections::{ProjectionPages, SubstringMatcher};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("Player dashboard starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: seasons {}-{}, projections week {}",
        config.seasons.first, config.seasons.last, config.projections.week
    );

    // 3. Build the HTTP client and projection page source
    let client =
        net::build_client(config.image_timeout()).context("failed to build the HTTP client")?;
    let pages: Box<dyn ProjectionPages> = match &config.projections.pages_dir {
        Some(dir) => {
            info!("Reading projection pages from {}", dir);
            Box::new(net::DirPages::new(dir))
        }
        None => Box::new(net::HttpPages::new(
            client.clone(),
            config.projections.base_url.clone(),
            config.projections.week.clone(),
        )),
    };

    // 4. Load the player directory and season stats
    let directory = data::directory::load_directory(&config.data.roster_csv)
        .context("failed to load the player directory")?;
    info!(
        "Loaded {} players from {}",
        directory.len(),
        config.data.roster_csv
    );

    let stats = data::stats::load_season_stats(&config.data.stats_csv, config.season_range())
        .context("failed to load season stats")?;
    info!(
        "Loaded {} season stat rows from {}",
        stats.len(),
        config.data.stats_csv
    );

    // 5. Scrape projections. A dead site leaves empty tables behind; the
    //    dashboard still runs on directory and stats alone.
    info!("Loading projections...");
    let projections = data::projections::load_projections(pages.as_ref()).await;
    if projections.is_empty() {
        warn!("No projection rows loaded; projection panels will be empty");
    } else {
        info!("Loaded {} projection rows", projections.len());
    }

    // 6. Assemble the resolver and app state
    let headshots =
        images::HeadshotClient::new(client, config.images.page_lookup_fallback);
    let resolver = resolve::Resolver::new(
        directory,
        stats,
        projections,
        headshots,
        Box::new(SubstringMatcher),
    );
    let app_state = app::AppState::new(config, resolver);

    // 7. Create mpsc channels
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    // 8. Spawn the app command loop
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 9. Run the TUI event loop (blocking until user quits)
    info!("Application ready");
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    // 10. Cleanup: wait for the app task to finish (with timeout)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("Player dashboard shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("huddle.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("player_dashboard=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
