//! Canonical valid configurations for tests.

use crate::config::{Config, GgselConfig, TelegramConfig};

/// A config that passes validation: real-looking credentials, defaults
/// everywhere else.
pub fn test_config() -> Config {
    Config {
        ggsel: test_ggsel_config(),
        telegram: TelegramConfig {
            bot_token: test_bot_token().into(),
            allowed_chats: Vec::new(),
        },
        ..Config::default()
    }
}

pub fn test_ggsel_config() -> GgselConfig {
    GgselConfig {
        seller_id: 777,
        api_key: "test-api-key".into(),
        ..GgselConfig::default()
    }
}

/// Shaped like a real BotFather token (colon, 30+ characters) without
/// being one.
pub fn test_bot_token() -> &'static str {
    "123456789:AAFakeTokenFakeTokenFakeToken00"
}
