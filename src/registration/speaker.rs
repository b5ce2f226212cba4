// Speaker records and their supporting types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned by the speaker store on a successful registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpeakerId(pub i64);

impl fmt::Display for SpeakerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Browsers reported by the client-side detection layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BrowserName {
    Chrome,
    Firefox,
    Edge,
    Safari,
    Opera,
    InternetExplorer,
    Unknown,
}

impl BrowserName {
    /// Parse a browser name string into a BrowserName enum.
    ///
    /// Handles the strings the detection layer emits, including legacy
    /// "MSIE" tokens. Anything unrecognized maps to `Unknown`.
    pub fn from_str_name(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "chrome" | "google chrome" => BrowserName::Chrome,
            "firefox" | "mozilla firefox" => BrowserName::Firefox,
            "edge" | "microsoft edge" => BrowserName::Edge,
            "safari" => BrowserName::Safari,
            "opera" => BrowserName::Opera,
            "internet explorer" | "internetexplorer" | "ie" | "msie" => {
                BrowserName::InternetExplorer
            }
            _ => BrowserName::Unknown,
        }
    }

    /// Return the display string for this browser.
    pub fn display_str(&self) -> &'static str {
        match self {
            BrowserName::Chrome => "Chrome",
            BrowserName::Firefox => "Firefox",
            BrowserName::Edge => "Edge",
            BrowserName::Safari => "Safari",
            BrowserName::Opera => "Opera",
            BrowserName::InternetExplorer => "Internet Explorer",
            BrowserName::Unknown => "Unknown",
        }
    }
}

/// Browser descriptor attached to a submission by client-side detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserInfo {
    pub name: BrowserName,
    pub major_version: u32,
}

impl Default for BrowserInfo {
    fn default() -> Self {
        Self {
            name: BrowserName::Unknown,
            major_version: 0,
        }
    }
}

/// A proposed conference talk.
///
/// `approved` is set during session screening on a registration attempt and
/// is never true before evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub approved: bool,
}

impl Session {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            approved: false,
        }
    }
}

/// A speaker submission as received from intake.
///
/// `registration_fee` is computed, not input: it stays zero until the speaker
/// passes evaluation, at which point the evaluator writes the tiered fee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Speaker {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub experience_years: Option<u32>,
    pub has_blog: bool,
    pub blog_url: Option<String>,
    pub browser: BrowserInfo,
    pub certifications: Vec<String>,
    pub employer: Option<String>,
    #[serde(default)]
    pub registration_fee: u32,
    pub sessions: Vec<Session>,
}

impl Speaker {
    /// The domain part of the speaker's email: everything after the last `@`.
    /// An address without an `@` yields the whole string.
    pub fn email_domain(&self) -> &str {
        self.email.rsplit('@').next().unwrap_or("")
    }

    /// Full display name ("First Last") for logs and reports.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}
