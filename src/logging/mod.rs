//! Logging setup for PDF Compressor
//! Installs env_logger behind the `log` facade; `RUST_LOG` wins over the configured level

use log::debug;

pub fn init(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let result = env_logger::Builder::from_env(env)
        .format_timestamp_secs()
        .format_target(false)
        .try_init();

    if result.is_err() {
        debug!("Logger already initialized");
    }
}
