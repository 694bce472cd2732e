use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "PostCare";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default backend base URL when `ASSISTANT_API_URL` is not set.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Per-request timeout for backend calls, in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 20;

/// Backend base URL, overridable via the `ASSISTANT_API_URL` environment
/// variable. Trailing slashes are stripped so path joining stays uniform.
pub fn api_base_url() -> String {
    std::env::var("ASSISTANT_API_URL")
        .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Get the application data directory
/// ~/PostCare/ on all platforms (user-visible, keeps exports findable)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("PostCare")
}

/// Get the directory where exported agent logs are written
pub fn exports_dir() -> PathBuf {
    app_data_dir().join("exports")
}

/// Default tracing filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> String {
    "postcare=info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("PostCare"));
    }

    #[test]
    fn exports_dir_under_app_data() {
        let exports = exports_dir();
        let app = app_data_dir();
        assert!(exports.starts_with(app));
        assert!(exports.ends_with("exports"));
    }

    #[test]
    fn app_name_is_postcare() {
        assert_eq!(APP_NAME, "PostCare");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
