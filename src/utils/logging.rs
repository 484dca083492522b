use once_cell::sync::OnceCell;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::core::models::BuildMode;

static INIT: OnceCell<()> = OnceCell::new();

pub struct Logger;

impl Logger {
    /// Install the subscriber once; later calls are no-ops so tests can
    /// run commands back to back. Logs go to stderr so `show` can pipe
    /// clean JSON through stdout.
    pub fn init() {
        INIT.get_or_init(|| {
            let filter = tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("kumi=info"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        });
    }

    pub fn assemble_start(mode: BuildMode, root: &str) {
        info!("🧩 Kumi - Configuration Assembly");
        info!("═══════════════════════════════════════");
        info!("📁 Project: {}", root);
        info!("🎛️  Mode: {}", mode);
    }

    pub fn mode_resolved(mode: BuildMode, source: &str) {
        debug!("🎛️  Mode {} resolved from {}", mode, source);
    }

    pub fn config_file_loaded(path: &str) {
        debug!("📄 Loaded config file: {}", path);
    }

    pub fn no_config_file() {
        debug!("📄 No kumi.config.json found, using defaults");
    }

    pub fn assembled(entries: usize, rules: usize, plugins: usize) {
        info!(
            "🧩 Assembled {} entries, {} module rules, {} plugins",
            entries, rules, plugins
        );
    }

    pub fn emitted(path: &str, bytes: usize) {
        info!("📦 Wrote {} ({} bytes)", path, bytes);
    }

    pub fn warn(msg: &str) {
        warn!("⚠️  {}", msg);
    }
}

pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn start(name: &str) -> Self {
        debug!("⏱️  Starting: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        debug!("⏱️  Completed: {} in {:.2?}", self.name, self.elapsed());
    }
}
