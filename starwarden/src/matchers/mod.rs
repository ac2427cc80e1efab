//! Predicate matchers for star reactions.
//!
//! Each matcher is a [`Check`](starwarden_core::Check) over
//! [`ReactionAdd`](crate::platform::ReactionAdd) answering a [`Verdict`].

pub mod disqualify;
pub mod self_star;
pub mod starrer;

pub use disqualify::BadStars;
pub use self_star::SelfStar;
pub use starrer::BlockedStarrers;

use starwarden_core::Positive;

/// Why a star was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detail {
    /// Rejected without a configured explanation.
    Flagged,
    /// Rejected with the explanation configured on the matching rule.
    Reason(String),
}

impl Detail {
    /// Use the configured reason when there is a non-empty one.
    pub fn from_reason(reason: Option<&str>) -> Self {
        match reason {
            Some(reason) if !reason.is_empty() => Detail::Reason(reason.to_string()),
            _ => Detail::Flagged,
        }
    }

    /// The configured reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Detail::Flagged => None,
            Detail::Reason(reason) => Some(reason),
        }
    }
}

impl Positive for Detail {
    fn is_positive(&self) -> bool {
        true
    }
}

/// A matcher's answer: `None` lets the star through.
pub type Verdict = Option<Detail>;
