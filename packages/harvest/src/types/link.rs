//! Frontier link types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a discovered link.
///
/// Transitions are `Pending -> Scraped` or `Pending -> Error`, both
/// terminal. There is no automatic requeue; retrying a failed link is a
/// deliberate operator action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Pending,
    Scraped,
    Error,
}

impl LinkStatus {
    /// Stable string form used by storage backends.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Scraped => "scraped",
            Self::Error => "error",
        }
    }

    /// Parse the storage string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "scraped" => Some(Self::Scraped),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// A candidate source URL in the frontier.
///
/// Links are append-only history of crawl decisions: they are created when
/// a fetch observes an outbound link and mutated only through status
/// transitions, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveredLink {
    /// Unique id
    pub id: Uuid,

    /// The candidate URL (globally unique in the frontier)
    pub url: String,

    /// URL of the page where this link was observed
    pub discovered_from: String,

    /// Lifecycle status
    pub status: LinkStatus,

    /// Relevance priority; higher is more urgent
    pub priority: i32,

    /// Jurisdiction guessed from the URL, if any
    pub jurisdiction_hint: Option<String>,

    /// Terminal error message when status is `Error`
    pub error_message: Option<String>,

    /// When the link entered the frontier (tie-breaker for dequeue order)
    pub discovered_at: DateTime<Utc>,

    /// When the link reached a terminal status
    pub scraped_at: Option<DateTime<Utc>>,
}

impl DiscoveredLink {
    /// Create a new pending link.
    pub fn new(url: impl Into<String>, discovered_from: impl Into<String>, priority: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
            discovered_from: discovered_from.into(),
            status: LinkStatus::Pending,
            priority,
            jurisdiction_hint: None,
            error_message: None,
            discovered_at: Utc::now(),
            scraped_at: None,
        }
    }

    /// Set the jurisdiction hint.
    pub fn with_jurisdiction(mut self, jurisdiction: impl Into<String>) -> Self {
        self.jurisdiction_hint = Some(jurisdiction.into());
        self
    }
}
