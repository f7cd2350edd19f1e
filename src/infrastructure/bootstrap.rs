//! Infrastructure bootstrap helpers for runtime wiring.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::adapter::inbound::http::{self, AppState};
use crate::adapter::outbound::memory::MemoryProductStore;
#[cfg(feature = "telegram")]
use crate::adapter::outbound::notifier::telegram::{
    spawn_command_worker, TelegramControl, TelegramNotifier,
};
use crate::adapter::outbound::scraper::HttpStockSource;
use crate::adapter::outbound::sqlite::{create_pool, run_migrations, SqliteProductStore};
use crate::application::{Orchestrator, TrackingService};
use crate::error::Result;
use crate::infrastructure::config::settings::{Config, IN_MEMORY_DATABASE};
use crate::port::{CheckControl, LogNotifier, Notifier, ProductStore, StockSource};

/// Which long-running parts of the process to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Chat bot plus the periodic scheduler.
    pub bot: bool,
    /// HTTP dashboard.
    pub web: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            bot: true,
            web: true,
        }
    }
}

/// Open the configured product store, running migrations for SQLite.
///
/// # Errors
/// Returns an error if the database directory, pool or migrations fail.
pub fn open_store(database: &str) -> Result<Arc<dyn ProductStore>> {
    if database == IN_MEMORY_DATABASE {
        info!("Using in-memory product store");
        return Ok(Arc::new(MemoryProductStore::new()));
    }

    if let Some(parent) = Path::new(database)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent)?;
    }
    let pool = create_pool(database)?;
    run_migrations(&pool)?;
    info!(path = database, "Opened SQLite product store");
    Ok(Arc::new(SqliteProductStore::new(pool)))
}

/// Build the page-fetching stock source.
///
/// # Errors
/// Returns an error if the HTTP client cannot be built.
pub fn build_source(config: &Config) -> Result<Arc<dyn StockSource>> {
    let http = config
        .source
        .http_config(config.checker.request_timeout());
    Ok(Arc::new(HttpStockSource::new(&http)?))
}

/// Pick Telegram delivery when configured, else log-only alerts.
fn build_notifier(config: &Config) -> Arc<dyn Notifier> {
    #[cfg(feature = "telegram")]
    {
        if let Some(telegram) = config.telegram.adapter_config() {
            info!(delivery = ?telegram.delivery, "Telegram alerts enabled");
            return Arc::new(TelegramNotifier::new(&telegram));
        }
    }

    if config.telegram.enabled {
        warn!("Telegram is enabled but unavailable in this build, alerts go to the log");
    } else {
        info!("Telegram disabled, alerts go to the log");
    }
    Arc::new(LogNotifier)
}

/// Wired application services.
#[derive(Clone)]
pub struct Components {
    pub store: Arc<dyn ProductStore>,
    pub source: Arc<dyn StockSource>,
    pub notifier: Arc<dyn Notifier>,
    pub tracking: TrackingService,
    pub orchestrator: Orchestrator,
}

impl Components {
    /// Build every service from configuration.
    ///
    /// # Errors
    /// Returns an error if the store or the source cannot be created.
    pub fn build(config: &Config) -> Result<Self> {
        let store = open_store(&config.database)?;
        let source = build_source(config)?;
        let notifier = build_notifier(config);
        Ok(Self::from_parts(config, store, source, notifier))
    }

    /// Wire services over existing collaborators.
    #[must_use]
    pub fn from_parts(
        config: &Config,
        store: Arc<dyn ProductStore>,
        source: Arc<dyn StockSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let tracking = TrackingService::new(
            Arc::clone(&source),
            Arc::clone(&store),
            config.source.rules(),
        );
        let orchestrator = Orchestrator::new(
            Arc::clone(&source),
            Arc::clone(&store),
            Arc::clone(&notifier),
            config.checker.settings(),
        );
        Self {
            store,
            source,
            notifier,
            tracking,
            orchestrator,
        }
    }
}

/// Run the tracker until a shutdown signal arrives.
///
/// # Errors
/// Returns an error if startup fails or the dashboard stops with an error.
pub async fn run(config: Config, options: RunOptions) -> Result<()> {
    let components = Components::build(&config)?;
    run_with(config, options, components, shutdown_signal()).await
}

/// Run with prebuilt components until `shutdown` resolves.
///
/// # Errors
/// Returns an error if the dashboard cannot bind or fails while serving.
pub async fn run_with<F>(
    config: Config,
    options: RunOptions,
    components: Components,
    shutdown: F,
) -> Result<()>
where
    F: std::future::Future<Output = ()>,
{
    match components.tracking.stats().await {
        Ok(stats) => info!(
            products = stats.total_products,
            subscribers = stats.total_subscribers,
            in_stock = stats.in_stock,
            out_of_stock = stats.out_of_stock,
            "Tracker loaded"
        ),
        Err(e) => warn!(error = %e, "Failed to read startup stats"),
    }

    let (stop_tx, stop_rx) = watch::channel(false);

    let scheduler = options
        .bot
        .then(|| components.orchestrator.start_periodic(config.checker.interval()));
    let bot = if options.bot {
        start_bot(&config, &components)
    } else {
        None
    };

    let web = if options.web && config.web.enabled {
        let listener = http::bind(config.web.bind_addr()?).await?;
        let checker: Arc<dyn CheckControl> = Arc::new(components.orchestrator.clone());
        let state = AppState::new(components.tracking.clone(), checker);
        let mut stop = stop_rx.clone();
        Some(tokio::spawn(http::serve(listener, state, async move {
            let _ = stop.changed().await;
        })))
    } else {
        None
    };

    info!(
        scheduler = scheduler.is_some(),
        bot = bot.is_some(),
        web = web.is_some(),
        "stockwatch running"
    );
    shutdown.await;
    info!("Shutdown signal received");

    if let Some(scheduler) = scheduler {
        scheduler.shutdown().await;
    }
    if let Some(bot) = bot {
        bot.abort();
    }
    let _ = stop_tx.send(true);
    if let Some(web) = web {
        match web.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!(error = %e, "Dashboard failed");
                return Err(e);
            }
            Err(e) => warn!(error = %e, "Dashboard task ended abnormally"),
        }
    }

    info!("stockwatch stopped");
    Ok(())
}

#[cfg(feature = "telegram")]
fn start_bot(config: &Config, components: &Components) -> Option<JoinHandle<()>> {
    let telegram = config.telegram.adapter_config()?;
    let control = TelegramControl::new(components.tracking.clone());
    Some(spawn_command_worker(&telegram, control))
}

#[cfg(not(feature = "telegram"))]
fn start_bot(_config: &Config, _components: &Components) -> Option<JoinHandle<()>> {
    None
}

/// Resolve on Ctrl-C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
