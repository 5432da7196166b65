pub const SW_SCRIPT_URL: &str = "/sw.js";
pub const SW_SCOPE: &str = "/";
pub const UPDATE_CHECK_INTERVAL_MS: i32 = 60_000;
/// Local-storage key holding the serialized `PushSubscription`.
pub const SUBSCRIPTION_STORAGE_KEY: &str = "pushSubscription";
/// VAPID public key (uncompressed P-256 point, base64url).
pub const APPLICATION_SERVER_KEY: &str =
    "BEl62iUYgUivxIkv69yViEuiBIa-Ib9-SkvMeAtA3LFgDzkrxZJjSgSnfckjBJuBkr3qBUYIHBQFLXYp5Nksh8U";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub sw_url: String,
    pub scope: String,
    pub update_interval_ms: i32,
    pub subscription_key: String,
    pub server_key: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            sw_url: SW_SCRIPT_URL.to_string(),
            scope: SW_SCOPE.to_string(),
            update_interval_ms: UPDATE_CHECK_INTERVAL_MS,
            subscription_key: SUBSCRIPTION_STORAGE_KEY.to_string(),
            server_key: APPLICATION_SERVER_KEY.to_string(),
        }
    }
}
