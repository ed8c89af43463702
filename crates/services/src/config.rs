use std::env;
use std::time::Duration;

use learn_core::flashcards::DEFAULT_MIN_GENERIC_LEN;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Where the learning backend lives and how long to wait for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl ApiConfig {
    /// # Errors
    ///
    /// Returns `url::ParseError` when `base_url` is not an absolute URL.
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `LEARN_API_BASE_URL` and `LEARN_API_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` when the configured base URL is invalid.
    pub fn from_env() -> Result<Self, url::ParseError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ApiConfig::from_env`] with an injectable variable source.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` when the configured base URL is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, url::ParseError> {
        let base_url = lookup("LEARN_API_BASE_URL")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let timeout = lookup("LEARN_API_TIMEOUT_SECS")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Ok(Self::new(&base_url)?.with_timeout(Duration::from_secs(timeout)))
    }
}

// Endpoint paths are joined onto the base, so it must end with a slash.
fn normalize_base_url(raw: &str) -> Result<Url, url::ParseError> {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("{trimmed}/"))
    }
}

/// Client-side knobs for the learning controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Detail bullets longer than this become generic flashcards.
    pub flashcard_min_len: usize,
    /// Pause between registering an assessment answer and showing the next question.
    pub feedback_delay: Duration,
    /// How long the "Saved!" note indicator stays up.
    pub saved_indicator: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            flashcard_min_len: DEFAULT_MIN_GENERIC_LEN,
            feedback_delay: Duration::from_millis(400),
            saved_indicator: Duration::from_secs(2),
        }
    }
}

impl ControllerConfig {
    /// Defaults without the assessment feedback pause.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            feedback_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}
