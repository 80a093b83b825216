use std::str::FromStr;

use anyhow::{Context, Result};
use backend::config::config_loader::{load_database, load_smtp, optional, required};

use super::config_model::{DotEnvyConfig, PendingSweep, WorkerServer};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let worker_server = WorkerServer {
        port: required("SERVER_PORT_WORKER")?
            .parse()
            .context("SERVER_PORT_WORKER is invalid")?,
        timeout: optional_parsed("SERVER_TIMEOUT")?.unwrap_or(30),
    };

    Ok(DotEnvyConfig {
        worker_server,
        database: load_database()?,
        smtp: load_smtp()?,
        sweep: load_sweep()?,
    })
}

pub fn load_sweep() -> Result<PendingSweep> {
    sweep_from(optional)
}

fn sweep_from(lookup: impl Fn(&str) -> Option<String>) -> Result<PendingSweep> {
    let defaults = PendingSweep::default();

    let sweep = PendingSweep {
        interval_secs: parse_with(&lookup, "PENDING_SWEEP_INTERVAL_SECS")?
            .unwrap_or(defaults.interval_secs),
        remind_after_secs: parse_with(&lookup, "PENDING_REMINDER_AFTER_SECS")?
            .unwrap_or(defaults.remind_after_secs),
        batch_size: parse_with(&lookup, "PENDING_SWEEP_BATCH_SIZE")?
            .unwrap_or(defaults.batch_size),
    };

    anyhow::ensure!(sweep.interval_secs > 0, "PENDING_SWEEP_INTERVAL_SECS must be positive");
    anyhow::ensure!(sweep.remind_after_secs >= 0, "PENDING_REMINDER_AFTER_SECS must not be negative");
    anyhow::ensure!(sweep.batch_size > 0, "PENDING_SWEEP_BATCH_SIZE must be positive");

    Ok(sweep)
}

fn optional_parsed<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    parse_with(&optional, key)
}

fn parse_with<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| raw.parse::<T>().with_context(|| format!("{} is invalid", key)))
        .transpose()
}
