use backend::config::config_model::Database;
use eventhub::mail::smtp::SmtpConfig;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub worker_server: WorkerServer,
    pub database: Database,
    pub smtp: SmtpConfig,
    pub sweep: PendingSweep,
}

#[derive(Debug, Clone)]
pub struct WorkerServer {
    pub port: u16,
    /// seconds
    pub timeout: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSweep {
    /// seconds between sweeps
    pub interval_secs: u64,
    /// how long an order stays `PENDING` before it is reminded
    pub remind_after_secs: i64,
    pub batch_size: i64,
}

impl Default for PendingSweep {
    fn default() -> Self {
        Self {
            interval_secs: 300,
            remind_after_secs: 1800,
            batch_size: 100,
        }
    }
}
