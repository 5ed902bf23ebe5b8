//! Runtime configuration for feature runs.
//!
//! Two switches are read from the environment:
//!
//! - `TRELLIS_TAGS` restricts a run to scenarios carrying at least one of the
//!   listed tags.
//! - `TRELLIS_CHECK_ONLY` turns a run into a pass that only validates steps
//!   against the registry.
//!
//! The check-only flag may also be overridden in-process, which tests use to
//! toggle it without touching the environment.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU8, Ordering};

/// Environment variable holding the comma-separated tag filter.
pub const TAGS_ENV: &str = "TRELLIS_TAGS";
/// Environment variable enabling check-only runs.
pub const CHECK_ONLY_ENV: &str = "TRELLIS_CHECK_ONLY";

const OVERRIDE_UNSET: u8 = 0;
const OVERRIDE_FALSE: u8 = 1;
const OVERRIDE_TRUE: u8 = 2;

static CHECK_ONLY_OVERRIDE: AtomicU8 = AtomicU8::new(OVERRIDE_UNSET);

const TRUTHY: [&str; 4] = ["1", "true", "yes", "on"];
const FALSY: [&str; 4] = ["0", "false", "no", "off"];

/// Interpret a boolean environment value, ignoring case.
///
/// Returns `None` for anything unrecognised.
#[must_use]
pub fn parse_env_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    let is = |word: &&str| word.eq_ignore_ascii_case(value);
    if TRUTHY.iter().any(is) {
        Some(true)
    } else if FALSY.iter().any(is) {
        Some(false)
    } else {
        None
    }
}

fn override_state() -> Option<bool> {
    match CHECK_ONLY_OVERRIDE.load(Ordering::Relaxed) {
        OVERRIDE_FALSE => Some(false),
        OVERRIDE_TRUE => Some(true),
        _ => None,
    }
}

/// Override the check-only flag for the current process.
///
/// Call [`clear_check_only_override`] to restore environment driven
/// behaviour.
pub fn set_check_only(enabled: bool) {
    let value = if enabled {
        OVERRIDE_TRUE
    } else {
        OVERRIDE_FALSE
    };
    CHECK_ONLY_OVERRIDE.store(value, Ordering::Relaxed);
}

/// Remove any in-process override for the check-only flag.
pub fn clear_check_only_override() {
    CHECK_ONLY_OVERRIDE.store(OVERRIDE_UNSET, Ordering::Relaxed);
}

/// Run-wide switches.
///
/// # Examples
/// ```
/// use trellis_bdd::config::RunConfig;
///
/// let config = RunConfig::from_lookup(|key| match key {
///     "TRELLIS_TAGS" => Some("slow, db".to_string()),
///     _ => None,
/// });
/// assert!(!config.check_only());
/// assert!(config.matches_tags(&["db".to_string()].into_iter().collect()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunConfig {
    tags: BTreeSet<String>,
    check_only: bool,
}

impl RunConfig {
    /// Read the configuration from the process environment, honouring the
    /// in-process check-only override.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    ///
    /// The in-process check-only override still takes precedence.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let tags = lookup(TAGS_ENV)
            .map(|raw| parse_tags(&raw))
            .unwrap_or_default();
        let check_only = override_state()
            .or_else(|| lookup(CHECK_ONLY_ENV).as_deref().and_then(parse_env_bool))
            .unwrap_or(false);
        Self { tags, check_only }
    }

    /// Replace the tag filter.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the check-only flag.
    #[must_use]
    pub fn with_check_only(mut self, check_only: bool) -> Self {
        self.check_only = check_only;
        self
    }

    /// The tag filter; empty means every scenario runs.
    #[must_use]
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Whether runs only validate steps.
    #[must_use]
    pub fn check_only(&self) -> bool {
        self.check_only
    }

    /// Whether a scenario carrying `tags` passes the filter.
    #[must_use]
    pub fn matches_tags(&self, tags: &BTreeSet<String>) -> bool {
        self.tags.is_empty() || !self.tags.is_disjoint(tags)
    }
}

fn parse_tags(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
