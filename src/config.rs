use std::env;
use std::fs;

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;

use crate::chat::filter::default_blocked_words;

/// Upper bound on the analysis webhook timeout.  Slower answers are
/// reported as `TIMEOUT` rather than held open.
pub const MAX_ANALYSIS_TIMEOUT_MS: u64 = 30_000;

/// Longest accepted gap between sends from one sender (one hour).
pub const MAX_SEND_INTERVAL_MS: u64 = 3_600_000;

/// Longest accepted visitor timeout (one day).
pub const MAX_VISITOR_TIMEOUT_SECS: u64 = 86_400;

/// Size and length bounds of one chat store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatLimits {
    pub cap: usize,
    pub max_author_chars: usize,
    pub max_body_chars: usize,
}

impl ChatLimits {
    pub const PUBLIC: ChatLimits = ChatLimits {
        cap: 100,
        max_author_chars: 20,
        max_body_chars: 200,
    };
    pub const DIRECT: ChatLimits = ChatLimits {
        cap: 200,
        max_author_chars: 20,
        max_body_chars: 500,
    };

    /// Fill the fields `partial` leaves out from `self`.
    fn merged(self, partial: Option<PartialChatLimits>) -> ChatLimits {
        let Some(p) = partial else {
            return self;
        };
        ChatLimits {
            cap: p.cap.unwrap_or(self.cap),
            max_author_chars: p.max_author_chars.unwrap_or(self.max_author_chars),
            max_body_chars: p.max_body_chars.unwrap_or(self.max_body_chars),
        }
    }

    fn validate(&self, which: &str) -> Result<()> {
        if self.cap == 0 || self.max_author_chars == 0 || self.max_body_chars == 0 {
            bail!("{} limits must all be at least 1", which);
        }
        Ok(())
    }
}

/// Chat limits as written in the config file; missing fields keep the
/// store's default.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PartialChatLimits {
    #[serde(default)]
    pub cap: Option<usize>,
    #[serde(default)]
    pub max_author_chars: Option<usize>,
    #[serde(default)]
    pub max_body_chars: Option<usize>,
}

/// Contents of the optional JSON file named by `DRAFTBOARD_CONFIG`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatFileConfig {
    #[serde(default)]
    pub blocked_words: Option<Vec<String>>,
    #[serde(default)]
    pub admin_addresses: Vec<String>,
    #[serde(default)]
    pub public_chat: Option<PartialChatLimits>,
    #[serde(default)]
    pub direct_chat: Option<PartialChatLimits>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub blocked_words: Vec<String>,
    pub admin_addresses: Vec<String>,
    pub public_chat: ChatLimits,
    pub direct_chat: ChatLimits,
    pub send_interval_ms: u64,
    pub visitor_timeout_secs: u64,
    pub max_request_bytes: Option<usize>,
    pub analysis_webhook_url: Option<String>,
    pub analysis_timeout_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            blocked_words: default_blocked_words(),
            admin_addresses: Vec::new(),
            public_chat: ChatLimits::PUBLIC,
            direct_chat: ChatLimits::DIRECT,
            send_interval_ms: 1000,
            visitor_timeout_secs: 30,
            max_request_bytes: None,
            analysis_webhook_url: None,
            analysis_timeout_ms: MAX_ANALYSIS_TIMEOUT_MS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let file = if let Ok(path) = env::var("DRAFTBOARD_CONFIG") {
            let content = fs::read_to_string(&path).with_context(|| {
                format!("Failed to read DRAFTBOARD_CONFIG '{}': file unreadable", path)
            })?;
            serde_json::from_str::<ChatFileConfig>(&content).with_context(|| {
                format!(
                    "Failed to parse DRAFTBOARD_CONFIG '{}': invalid JSON configuration",
                    path
                )
            })?
        } else {
            ChatFileConfig::default()
        };

        let defaults = AppConfig::default();

        let mut admin_addresses = file.admin_addresses;
        if let Ok(raw) = env::var("DRAFTBOARD_ADMIN_ADDRESSES") {
            admin_addresses.extend(
                raw.split(',')
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(|s| s.to_string()),
            );
        }

        let public_chat = defaults.public_chat.merged(file.public_chat);
        public_chat.validate("publicChat")?;
        let direct_chat = defaults.direct_chat.merged(file.direct_chat);
        direct_chat.validate("directChat")?;

        let send_interval_ms =
            parse_optional_u64("DRAFTBOARD_SEND_INTERVAL_MS")?.unwrap_or(defaults.send_interval_ms);
        if send_interval_ms > MAX_SEND_INTERVAL_MS {
            bail!(
                "DRAFTBOARD_SEND_INTERVAL_MS must be at most {}",
                MAX_SEND_INTERVAL_MS
            );
        }
        let visitor_timeout_secs = parse_optional_u64("DRAFTBOARD_VISITOR_TIMEOUT_SECS")?
            .unwrap_or(defaults.visitor_timeout_secs);
        if visitor_timeout_secs == 0 || visitor_timeout_secs > MAX_VISITOR_TIMEOUT_SECS {
            bail!(
                "DRAFTBOARD_VISITOR_TIMEOUT_SECS must be between 1 and {}",
                MAX_VISITOR_TIMEOUT_SECS
            );
        }
        let max_request_bytes =
            parse_optional_u64("DRAFTBOARD_MAX_REQUEST_BYTES")?.map(|v| v as usize);

        let analysis_webhook_url = env::var("ANALYSIS_WEBHOOK_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let analysis_timeout_ms =
            parse_optional_u64("ANALYSIS_TIMEOUT_MS")?.unwrap_or(defaults.analysis_timeout_ms);
        if analysis_timeout_ms == 0 || analysis_timeout_ms > MAX_ANALYSIS_TIMEOUT_MS {
            bail!(
                "ANALYSIS_TIMEOUT_MS must be between 1 and {}",
                MAX_ANALYSIS_TIMEOUT_MS
            );
        }

        Ok(Self {
            blocked_words: file.blocked_words.unwrap_or(defaults.blocked_words),
            admin_addresses,
            public_chat,
            direct_chat,
            send_interval_ms,
            visitor_timeout_secs,
            max_request_bytes,
            analysis_webhook_url,
            analysis_timeout_ms,
        })
    }
}

fn parse_optional_u64(var: &str) -> Result<Option<u64>> {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| anyhow!("{} must be a positive integer", var)),
        Ok(_) => Ok(None),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(err.into()),
    }
}
