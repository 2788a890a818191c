//! `metamapa run`: start the Telegram bot and keep it running until Ctrl-C.

use std::time::Duration;

use {
    anyhow::{Result, bail},
    metamapa_backends::{BackendUrls, Backends, build_client},
    metamapa_commands::{Dispatcher, DispatcherOptions},
    metamapa_config::{
        LoadedConfig, MetamapaConfig,
        validate::{self, Severity},
    },
    tracing::{debug, error, info, warn},
};

/// Build the dispatcher over one shared HTTP client.
pub fn build_dispatcher(config: &MetamapaConfig) -> Result<Dispatcher> {
    let backends = &config.backends;
    let client = build_client(Duration::from_secs(backends.timeout_secs))?;
    let clients = Backends::new(&client, BackendUrls {
        aggregator: &backends.aggregator_url,
        sources: &backends.sources_url,
        pdi: &backends.pdi_url,
        requests: &backends.requests_url,
    });
    Ok(Dispatcher::new(clients, DispatcherOptions {
        fetch_fact_images: config.commands.fetch_fact_images,
        list_limit: config.commands.list_limit,
    }))
}

pub async fn handle_run(loaded: LoadedConfig) -> Result<()> {
    let config = loaded.config;

    if !config.telegram.enabled {
        info!("telegram is disabled in config; nothing to run");
        return Ok(());
    }

    let result = validate::validate(&config, loaded.path.as_deref());
    for d in &result.diagnostics {
        match d.severity {
            Severity::Error => error!(path = %d.path, "{}", d.message),
            Severity::Warning => warn!(path = %d.path, "{}", d.message),
            Severity::Info => debug!(path = %d.path, "{}", d.message),
        }
    }
    if result.has_errors() {
        bail!(
            "configuration has {} error(s); run `metamapa check` for details",
            result.count(Severity::Error)
        );
    }

    let dispatcher = build_dispatcher(&config)?;
    let cancel = metamapa_telegram::start_polling(&config.telegram, dispatcher).await?;

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("shutdown requested");
            cancel.cancel();
        },
        () = cancel.cancelled() => {
            warn!("telegram polling ended");
        },
    }

    Ok(())
}
