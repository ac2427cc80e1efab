//! Starboard gating configuration.
//!
//! The configuration is loaded once at startup and never changes afterwards.
//! JSON and TOML files are supported, chosen by extension. A missing file is a
//! fatal startup error; the loader writes an example next to the expected
//! location so the operator has something to start from.
//!
//! ```json
//! {
//!   "guildId": "123456789012345678",
//!   "starEmoji": "⭐",
//!   "selfStarring": true,
//!   "blockedStarrers": ["$bots", "/^spam-\\d+$/", 987654321098765432],
//!   "badStars": [
//!     { "authors": ["$bots", "$hooks"] },
//!     { "aged": 1440 },
//!     { "channels": [555], "content": { "startsWith": "!" }, "reason": "no starring commands" }
//!   ]
//! }
//! ```

use crate::platform::{ChannelId, GuildId, Sender, UserId, WebhookId};
use serde::{Deserialize, Serialize};
use starwarden_std::{PatternCache, PatternCompileError};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while loading configuration. All of them are fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error(
        "configuration file {} not found; an example was written to {}",
        .path.display(),
        .example.display()
    )]
    Missing {
        /// Where the configuration was expected.
        path: PathBuf,
        /// Where the example was written.
        example: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("failed to read {}", .path.display())]
    Read {
        /// The file.
        path: PathBuf,
        /// The I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The example configuration could not be written.
    #[error("failed to write {}", .path.display())]
    Write {
        /// The file.
        path: PathBuf,
        /// The I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON/TOML or does not fit the schema.
    #[error("failed to parse {}: {message}", .path.display())]
    Parse {
        /// The file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// The example configuration could not be rendered in the requested format.
    #[error("failed to render example for {}: {message}", .path.display())]
    Render {
        /// The target file.
        path: PathBuf,
        /// Serializer message.
        message: String,
    },

    /// The file extension is neither `.json` nor `.toml`.
    #[error("unsupported configuration format: {}", .path.display())]
    UnsupportedFormat {
        /// The file.
        path: PathBuf,
    },

    /// A required field is missing or out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Who may not star anything.
///
/// In configuration: `"$bots"`, `"/pattern/"` (optionally followed by `i`,
/// `m`, `s` or `x` flags), a literal username, or a numeric account identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RuleText", into = "RuleText")]
pub enum StarrerRule {
    /// Every automated account.
    Bots,
    /// Exact match on the current handle.
    Username(String),
    /// Regular expression over the current handle.
    UsernamePattern(String),
    /// One account.
    User(UserId),
}

/// Whose messages a disqualification rule applies to.
///
/// In configuration: `"$bots"`, `"$hooks"`, `"$hook:<id>"`, or a numeric
/// account identifier (number or numeric string).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RuleText", into = "RuleText")]
pub enum AuthorMatcher {
    /// Every automated account.
    Bots,
    /// Every external integration.
    Hooks,
    /// One external integration.
    Hook(WebhookId),
    /// One account.
    Account(UserId),
}

/// Rule entries as written in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleText {
    /// A numeric identifier.
    Id(u64),
    /// A selector, pattern or name.
    Text(String),
}

const BOTS: &str = "$bots";
const HOOKS: &str = "$hooks";
const HOOK_PREFIX: &str = "$hook:";

impl TryFrom<RuleText> for StarrerRule {
    type Error = String;

    fn try_from(raw: RuleText) -> Result<Self, Self::Error> {
        let text = match raw {
            RuleText::Id(id) => return Ok(StarrerRule::User(UserId(id))),
            RuleText::Text(text) => text,
        };
        if text == BOTS {
            return Ok(StarrerRule::Bots);
        }
        if text.starts_with('$') {
            return Err(format!("unknown starrer selector `{text}`"));
        }
        if let Some(rest) = text.strip_prefix('/') {
            return username_pattern(rest)
                .map(StarrerRule::UsernamePattern)
                .ok_or_else(|| format!("`{text}` is not a `/pattern/` or `/pattern/flags` rule"));
        }
        Ok(StarrerRule::Username(text))
    }
}

/// `pattern/flags` (after the leading slash) to a pattern with inline flags.
///
/// Flags are any of `i`, `m`, `s`, `x`, each at most once.
fn username_pattern(rest: &str) -> Option<String> {
    let (body, flags) = rest.rsplit_once('/')?;
    if body.is_empty() {
        return None;
    }
    let mut seen = String::new();
    for flag in flags.chars() {
        if !matches!(flag, 'i' | 'm' | 's' | 'x') || seen.contains(flag) {
            return None;
        }
        seen.push(flag);
    }
    Some(if flags.is_empty() {
        body.to_owned()
    } else {
        format!("(?{flags}){body}")
    })
}

impl From<StarrerRule> for RuleText {
    fn from(rule: StarrerRule) -> Self {
        match rule {
            StarrerRule::Bots => RuleText::Text(BOTS.into()),
            StarrerRule::Username(name) => RuleText::Text(name),
            StarrerRule::UsernamePattern(pattern) => RuleText::Text(format!("/{pattern}/")),
            StarrerRule::User(id) => RuleText::Id(id.get()),
        }
    }
}

impl TryFrom<RuleText> for AuthorMatcher {
    type Error = String;

    fn try_from(raw: RuleText) -> Result<Self, Self::Error> {
        let text = match raw {
            RuleText::Id(id) => return Ok(AuthorMatcher::Account(UserId(id))),
            RuleText::Text(text) => text,
        };
        match text.as_str() {
            BOTS => Ok(AuthorMatcher::Bots),
            HOOKS => Ok(AuthorMatcher::Hooks),
            _ => {
                if let Some(id) = text.strip_prefix(HOOK_PREFIX) {
                    return id
                        .parse()
                        .map(|id| AuthorMatcher::Hook(WebhookId(id)))
                        .map_err(|_| format!("`{text}` does not name a webhook identifier"));
                }
                text.parse()
                    .map(|id| AuthorMatcher::Account(UserId(id)))
                    .map_err(|_| format!("unknown author matcher `{text}`"))
            }
        }
    }
}

impl From<AuthorMatcher> for RuleText {
    fn from(matcher: AuthorMatcher) -> Self {
        match matcher {
            AuthorMatcher::Bots => RuleText::Text(BOTS.into()),
            AuthorMatcher::Hooks => RuleText::Text(HOOKS.into()),
            AuthorMatcher::Hook(id) => RuleText::Text(format!("{HOOK_PREFIX}{id}")),
            AuthorMatcher::Account(id) => RuleText::Id(id.get()),
        }
    }
}

impl AuthorMatcher {
    /// Whether `sender` is covered by this entry.
    ///
    /// Integration posts only ever match `Hooks` and `Hook`.
    pub fn matches(&self, sender: Sender<'_>) -> bool {
        match (self, sender) {
            (AuthorMatcher::Bots, Sender::Account(user)) => user.bot,
            (AuthorMatcher::Account(id), Sender::Account(user)) => user.id == *id,
            (AuthorMatcher::Hooks, Sender::Integration(_)) => true,
            (AuthorMatcher::Hook(id), Sender::Integration(webhook)) => webhook == *id,
            _ => false,
        }
    }
}

/// Case-sensitive test over message text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentMatcher {
    /// Text equals the value.
    Equals(String),
    /// Text starts with the value.
    StartsWith(String),
    /// Text ends with the value.
    EndsWith(String),
    /// Text contains the value.
    Includes(String),
}

impl ContentMatcher {
    /// Whether `text` satisfies the matcher.
    pub fn matches(&self, text: &str) -> bool {
        match self {
            ContentMatcher::Equals(value) => text == value,
            ContentMatcher::StartsWith(value) => text.starts_with(value.as_str()),
            ContentMatcher::EndsWith(value) => text.ends_with(value.as_str()),
            ContentMatcher::Includes(value) => text.contains(value.as_str()),
        }
    }
}

/// Messages that may never be starred.
///
/// Every present field must hold; a rule with no condition fields matches
/// every message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisqualificationRule {
    /// Minimum age in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aged: Option<u64>,
    /// Channels the rule applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<Vec<ChannelId>>,
    /// Senders the rule applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<AuthorMatcher>>,
    /// Text the rule applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentMatcher>,
    /// Explanation shown to the user whose star was removed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

fn default_star_emoji() -> String {
    "⭐".to_string()
}

/// Gating configuration for one community.
///
/// An absent section disables its step entirely; an empty list keeps the
/// step but it never matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatingConfig {
    /// The community this instance governs.
    pub guild_id: GuildId,
    /// The emoji that counts as a star.
    #[serde(default = "default_star_emoji")]
    pub star_emoji: String,
    /// When `true`, starring one's own message is rejected.
    #[serde(
        default,
        alias = "selfStarringAllowed",
        skip_serializing_if = "Option::is_none"
    )]
    pub self_starring: Option<bool>,
    /// Actors who may not star anything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_starrers: Option<Vec<StarrerRule>>,
    /// Messages that may never be starred.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bad_stars: Option<Vec<DisqualificationRule>>,
    /// Deadline for each gating step, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_timeout_ms: Option<u64>,
}

impl GatingConfig {
    /// The configuration written to example files.
    pub fn example(guild_id: GuildId) -> Self {
        Self {
            guild_id,
            star_emoji: default_star_emoji(),
            self_starring: Some(true),
            blocked_starrers: Some(vec![StarrerRule::Bots]),
            bad_stars: Some(vec![
                DisqualificationRule {
                    authors: Some(vec![AuthorMatcher::Bots, AuthorMatcher::Hooks]),
                    ..Default::default()
                },
                DisqualificationRule {
                    aged: Some(1440),
                    ..Default::default()
                },
            ]),
            step_timeout_ms: None,
        }
    }

    /// Check required fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.guild_id.get() == 0 {
            return Err(ConfigError::Invalid("`guildId` must be set".into()));
        }
        if self.star_emoji.trim().is_empty() {
            return Err(ConfigError::Invalid("`starEmoji` must not be empty".into()));
        }
        if self.step_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "`stepTimeoutMs` must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Per-step deadline, if configured.
    pub fn step_timeout(&self) -> Option<Duration> {
        self.step_timeout_ms.map(Duration::from_millis)
    }

    /// Compile every username pattern ahead of time.
    ///
    /// Gating itself compiles patterns lazily; this is for operators who want
    /// to catch mistakes before the first event. Returns the number of
    /// patterns compiled.
    pub fn validate_patterns(&self, cache: &PatternCache) -> Result<usize, PatternCompileError> {
        let mut compiled = 0;
        for rule in self.blocked_starrers.iter().flatten() {
            if let StarrerRule::UsernamePattern(pattern) = rule {
                cache.compile(pattern)?;
                compiled += 1;
            }
        }
        Ok(compiled)
    }
}

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.json`
    Json,
    /// `.toml`
    Toml,
}

impl ConfigFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(ConfigFormat::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(ConfigFormat::Toml),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Parse configuration text in the given format and validate it.
pub fn parse_config(raw: &str, format: ConfigFormat, path: &Path) -> Result<GatingConfig, ConfigError> {
    let parsed = match format {
        ConfigFormat::Json => serde_json::from_str(raw).map_err(|e| e.to_string()),
        ConfigFormat::Toml => toml::from_str(raw).map_err(|e| e.to_string()),
    };
    let config: GatingConfig = parsed.map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    })?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from `path`.
pub fn load_config(path: &Path) -> Result<GatingConfig, ConfigError> {
    let format = ConfigFormat::from_path(path)?;
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&raw, format, path)?;
    debug!(path = %path.display(), guild_id = %config.guild_id, "loaded gating configuration");
    Ok(config)
}

/// Where the example for `path` is written: `starboard.json` becomes
/// `starboard.example.json`.
pub fn example_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("starboard");
    let name = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!("{stem}.example.{ext}"),
        None => format!("{stem}.example"),
    };
    path.with_file_name(name)
}

/// Render the example configuration in the format implied by `path`.
pub fn render_example(path: &Path, guild_id: GuildId) -> Result<String, ConfigError> {
    let example = GatingConfig::example(guild_id);
    let rendered = match ConfigFormat::from_path(path)? {
        ConfigFormat::Json => serde_json::to_string_pretty(&example).map_err(|e| e.to_string()),
        ConfigFormat::Toml => toml::to_string_pretty(&example).map_err(|e| e.to_string()),
    };
    rendered.map_err(|message| ConfigError::Render {
        path: path.to_path_buf(),
        message,
    })
}

/// Write the example configuration to `path`.
pub fn write_example(path: &Path, guild_id: GuildId) -> Result<(), ConfigError> {
    let rendered = render_example(path, guild_id)?;
    fs::write(path, rendered).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Load configuration, writing an example next to `path` if it is missing.
pub fn load_or_write_example(path: &Path) -> Result<GatingConfig, ConfigError> {
    if path.exists() {
        return load_config(path);
    }
    let example = example_path(path);
    write_example(&example, GuildId(0))?;
    warn!(
        path = %path.display(),
        example = %example.display(),
        "gating configuration missing; wrote example"
    );
    Err(ConfigError::Missing {
        path: path.to_path_buf(),
        example,
    })
}
