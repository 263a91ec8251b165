//! Background services: debounced autosave and periodic backups.


pub mod autosave;
pub mod backup;

/// Parse an environment variable with a typed default.
pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
