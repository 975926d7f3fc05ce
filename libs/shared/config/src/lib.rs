use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    /// How many minutes before `scheduled_at` the video-call window opens.
    pub video_window_before_minutes: i64,
    /// How many minutes after `scheduled_at` the video-call window closes.
    pub video_window_after_minutes: i64,
    /// Chat lifetime used when an activation request does not name one.
    pub default_chat_expiry_days: i64,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            video_window_before_minutes: parse_env_i64("VIDEO_WINDOW_BEFORE_MINUTES", 15),
            video_window_after_minutes: parse_env_i64("VIDEO_WINDOW_AFTER_MINUTES", 30),
            default_chat_expiry_days: parse_env_i64("DEFAULT_CHAT_EXPIRY_DAYS", 7),
            port: parse_env_i64("PORT", 3000) as u16,
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.jwt_secret.is_empty()
    }
}

fn parse_env_i64(name: &str, default: i64) -> i64 {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} is not a valid integer ({}), using default {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}
