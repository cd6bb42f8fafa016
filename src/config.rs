#[derive(Clone)]
pub struct Config {
    pub data_path: String,
    pub sqlite_path: String,
    pub category: String,
    pub sort: String,
    pub top_n: usize,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            data_path: std::env::var("DATA_PATH").unwrap_or_else(|_| "data/components.json".to_string()),
            sqlite_path: std::env::var("SQLITE_PATH").unwrap_or_else(|_| "./weartrack.sqlite".to_string()),
            category: std::env::var("CATEGORY").unwrap_or_else(|_| "all".to_string()),
            sort: std::env::var("SORT").unwrap_or_else(|_| "wear-high".to_string()),
            top_n: std::env::var("TOP_N").ok().and_then(|v| v.parse().ok()).unwrap_or(3),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(10),
        }
    }
}
