/// Bump on every deployment that changes any precached asset. Activation of the
/// new worker deletes every cache that does not carry this version.
pub const CACHE_VERSION: u32 = 5;
pub const CACHE_PREFIX: &str = "pwa-cache-v";
pub const OFFLINE_URL: &str = "/offline.html";
pub const START_URL: &str = "/";
/// Worker bundle. `www/sw.js` loads the wasm from the cache first so a
/// worker restarted while offline can still answer.
pub const WORKER_SCRIPT_URL: &str = "/pkg/pwa_sw.js";
pub const WORKER_WASM_URL: &str = "/pkg/pwa_sw_bg.wasm";
pub const PRECACHE_URLS: [&str; 10] = [
    "/",
    "/index.html",
    "/offline.html",
    "/manifest.webmanifest",
    "/pkg/pwa_shell.js",
    "/pkg/pwa_shell_bg.wasm",
    WORKER_SCRIPT_URL,
    WORKER_WASM_URL,
    "/icons/icon-192.png",
    "/icons/icon-512.png",
];

pub fn cache_name(version: u32) -> String {
    format!("{CACHE_PREFIX}{version}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub cache_name: String,
    pub precache_urls: Vec<String>,
    /// Served for navigations when both the cache and the network miss.
    pub offline_url: String,
    /// Opened when a notification click finds no window to focus.
    pub start_url: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            cache_name: cache_name(CACHE_VERSION),
            precache_urls: PRECACHE_URLS.iter().map(|url| url.to_string()).collect(),
            offline_url: OFFLINE_URL.to_string(),
            start_url: START_URL.to_string(),
        }
    }
}

impl WorkerConfig {
    pub fn with_precache<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.precache_urls = urls.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.cache_name = cache_name(version);
        self
    }
}
