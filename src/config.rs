//! Support for library configuration options

use std::sync::{Arc, Mutex};
use std::time::Duration;

use once_cell::sync::Lazy;

/// The base URL of the remote to-do API, used by [`Client::new_from_config`](crate::client::Client::new_from_config).
/// Feel free to override it when initing this library.
pub static API_BASE_URL: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("http://localhost:8001".to_string())));

/// How often the notification scanner wakes up to look for due tasks.
/// An alert can thus lag its target timestamp by up to this interval.
/// Feel free to override it when initing this library.
pub static SCAN_INTERVAL: Lazy<Arc<Mutex<Duration>>> = Lazy::new(|| Arc::new(Mutex::new(Duration::from_secs(60))));

/// The currently configured scan interval
pub fn scan_interval() -> Duration {
    *SCAN_INTERVAL.lock().unwrap()
}
