//! Utility functions shared by the binaries.

use super::errors::*;
use chrono;
use env_logger;
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Initializes logging as `<local time> <level>:<module>: <message>`.
///
/// The level is `info` unless `RUST_LOG` says otherwise. Calling it again is
/// harmless.
pub fn init_logger() {
    let mut builder = env_logger::Builder::new();
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {}:{}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.module_path().unwrap_or("?"),
                record.args()
            )
        })
        .filter_level(LevelFilter::Info);
    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    if builder.try_init().is_err() {
        debug!("logger already initialized");
    }
}

/// Logs an error together with its causes.
pub fn log_error_chain(e: &Error) {
    error!("{}", e);
    for cause in e.iter().skip(1) {
        error!("caused by: {}", cause);
    }
}

/// Splits a comma separated list, dropping empty items.
pub fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| item.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logger_can_be_initialized_twice() {
        init_logger();
        init_logger();
        info!("still logging");
    }

    #[test]
    fn error_chain_is_logged() {
        let e: Error = Error::from(ErrorKind::Timeout(3)).chain_err(|| "sweep aborted");
        assert_eq!(e.iter().count(), 2);
        log_error_chain(&e);
    }

    #[test]
    fn split_lists() {
        assert_eq!(split_list("a, b,,c "), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
    }
}
