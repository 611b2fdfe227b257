//! Review rating rules and the review status state machine.
//!
//! Statuses move between `draft`, `published` and `flagged`. The rules:
//!
//! - entering `published` requires a non-empty body and stamps `published_at`
//!   the first time;
//! - entering `flagged` stamps `flagged_at` the first time;
//! - `published -> draft` is rejected;
//! - a self-transition leaves the lifecycle untouched.

use serde::{Deserialize, Serialize};
use validator::ValidationError;

use crate::error::CoreError;
use crate::types::Timestamp;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Maximum length of a review body, in characters.
pub const MAX_BODY_LENGTH: usize = 5_000;

/// Lowest allowed rating.
pub const MIN_RATING: f64 = 0.5;

/// Highest allowed rating.
pub const MAX_RATING: f64 = 5.0;

/// Ratings move in half-star steps.
pub const RATING_STEP: f64 = 0.5;

/// Every rating a review may carry (0.5 through 5.0).
pub const ALLOWED_RATINGS: [f64; 10] = [0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0];

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_PUBLISHED: &str = "published";
pub const STATUS_FLAGGED: &str = "flagged";

const BODY_REQUIRED: &str = "Body is required when publishing.";

/* --------------------------------------------------------------------------
Ratings
-------------------------------------------------------------------------- */

/// Whether `rating` is one of the [`ALLOWED_RATINGS`].
pub fn is_allowed_rating(rating: f64) -> bool {
    ALLOWED_RATINGS.contains(&rating)
}

/// `validator` hook for rating fields.
pub fn validate_rating(rating: f64) -> Result<(), ValidationError> {
    if is_allowed_rating(rating) {
        Ok(())
    } else {
        let mut err = ValidationError::new("rating");
        err.message = Some("Rating must be between 0.5 and 5.0 in steps of 0.5.".into());
        Err(err)
    }
}

/* --------------------------------------------------------------------------
Body
-------------------------------------------------------------------------- */

/// Trim a review body; blank bodies collapse to `None`.
pub fn normalize_body(body: Option<String>) -> Option<String> {
    body.map(|b| b.trim().to_string()).filter(|b| !b.is_empty())
}

fn has_body(body: Option<&str>) -> bool {
    body.is_some_and(|b| !b.trim().is_empty())
}

/* --------------------------------------------------------------------------
ReviewStatus
-------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Draft,
    Published,
    Flagged,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => STATUS_DRAFT,
            Self::Published => STATUS_PUBLISHED,
            Self::Flagged => STATUS_FLAGGED,
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s.trim() {
            STATUS_DRAFT => Ok(Self::Draft),
            STATUS_PUBLISHED => Ok(Self::Published),
            STATUS_FLAGGED => Ok(Self::Flagged),
            other => Err(CoreError::invalid_field(
                "status",
                format!("Invalid status '{other}'. Must be one of: draft, published, flagged"),
            )),
        }
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/* --------------------------------------------------------------------------
Listing filter
-------------------------------------------------------------------------- */

/// Status filter accepted by review listings.
///
/// Only [`StatusFilter::Published`] is public; every other filter exposes
/// drafts or flagged reviews of other users and is restricted to admins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    Published,
    Draft,
    Flagged,
    All,
}

impl StatusFilter {
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s.trim() {
            "all" => Ok(Self::All),
            other => match ReviewStatus::from_str(other) {
                Ok(ReviewStatus::Published) => Ok(Self::Published),
                Ok(ReviewStatus::Draft) => Ok(Self::Draft),
                Ok(ReviewStatus::Flagged) => Ok(Self::Flagged),
                Err(_) => Err(CoreError::invalid_field(
                    "status",
                    format!(
                        "Invalid status filter '{other}'. Must be one of: \
                         published, draft, flagged, all"
                    ),
                )),
            },
        }
    }

    /// The single status to match, or `None` for every status.
    pub fn status(&self) -> Option<ReviewStatus> {
        match self {
            Self::Published => Some(ReviewStatus::Published),
            Self::Draft => Some(ReviewStatus::Draft),
            Self::Flagged => Some(ReviewStatus::Flagged),
            Self::All => None,
        }
    }

    pub fn requires_admin(&self) -> bool {
        *self != Self::Published
    }
}

/* --------------------------------------------------------------------------
Lifecycle
-------------------------------------------------------------------------- */

/// Status plus the timestamps the state machine maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifecycle {
    pub status: ReviewStatus,
    pub published_at: Option<Timestamp>,
    pub flagged_at: Option<Timestamp>,
}

impl Lifecycle {
    /// Lifecycle of a freshly created review.
    pub fn initial(
        status: ReviewStatus,
        body: Option<&str>,
        now: Timestamp,
    ) -> Result<Self, CoreError> {
        let empty = Self {
            status: ReviewStatus::Draft,
            published_at: None,
            flagged_at: None,
        };
        empty.transition(status, body, now)
    }

    /// Move to `target`, given the body the review will have afterwards.
    pub fn transition(
        &self,
        target: ReviewStatus,
        body: Option<&str>,
        now: Timestamp,
    ) -> Result<Self, CoreError> {
        if self.status == ReviewStatus::Published && target == ReviewStatus::Draft {
            return Err(CoreError::Conflict(
                "Cannot revert a published review to draft".into(),
            ));
        }

        if target == ReviewStatus::Published && !has_body(body) {
            return Err(CoreError::invalid_field("body", BODY_REQUIRED));
        }

        let published_at = match target {
            ReviewStatus::Published => self.published_at.or(Some(now)),
            _ => self.published_at,
        };
        let flagged_at = match target {
            ReviewStatus::Flagged => self.flagged_at.or(Some(now)),
            _ => self.flagged_at,
        };

        Ok(Self {
            status: target,
            published_at,
            flagged_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    use super::*;

    const ALL_STATUSES: [ReviewStatus; 3] = [
        ReviewStatus::Draft,
        ReviewStatus::Published,
        ReviewStatus::Flagged,
    ];

    fn lifecycle(status: ReviewStatus) -> Lifecycle {
        Lifecycle::initial(status, Some("A mind-bender."), Utc::now()).unwrap()
    }

    // -- ratings -------------------------------------------------------------

    #[test]
    fn every_half_step_between_bounds_is_allowed() {
        let mut rating = MIN_RATING;
        while rating <= MAX_RATING {
            assert!(is_allowed_rating(rating), "{rating} should be allowed");
            rating += RATING_STEP;
        }
    }

    #[test]
    fn off_step_and_out_of_range_ratings_are_rejected() {
        for rating in [0.0, 0.25, 0.75, 1.2, 4.9, 5.5, -1.0, 10.0, f64::NAN] {
            assert!(validate_rating(rating).is_err(), "{rating} should be rejected");
        }
    }

    // -- body ----------------------------------------------------------------

    #[test]
    fn normalize_body_trims_and_drops_blank() {
        assert_eq!(normalize_body(Some("  good  ".into())), Some("good".into()));
        assert_eq!(normalize_body(Some("   ".into())), None);
        assert_eq!(normalize_body(None), None);
    }

    // -- status parsing ------------------------------------------------------

    #[test]
    fn status_parses_known_values() {
        for status in ALL_STATUSES {
            assert_eq!(ReviewStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert_matches!(
            ReviewStatus::from_str("archived"),
            Err(CoreError::InvalidField { field: "status", .. })
        );
    }

    #[test]
    fn only_published_filter_is_public() {
        assert!(!StatusFilter::Published.requires_admin());
        for filter in ["draft", "flagged", "all"] {
            assert!(StatusFilter::from_str(filter).unwrap().requires_admin());
        }
        assert_eq!(StatusFilter::All.status(), None);
        assert!(StatusFilter::from_str("everything").is_err());
    }

    // -- initial state -------------------------------------------------------

    #[test]
    fn initial_draft_has_no_timestamps() {
        let l = Lifecycle::initial(ReviewStatus::Draft, None, Utc::now()).unwrap();
        assert_eq!(l.status, ReviewStatus::Draft);
        assert!(l.published_at.is_none());
        assert!(l.flagged_at.is_none());
    }

    #[test]
    fn initial_published_requires_body() {
        let now = Utc::now();
        assert_matches!(
            Lifecycle::initial(ReviewStatus::Published, Some(""), now),
            Err(CoreError::InvalidField { field: "body", .. })
        );
        let l = Lifecycle::initial(ReviewStatus::Published, Some("Great"), now).unwrap();
        assert_eq!(l.published_at, Some(now));
    }

    #[test]
    fn initial_flagged_stamps_flagged_at() {
        let now = Utc::now();
        let l = Lifecycle::initial(ReviewStatus::Flagged, None, now).unwrap();
        assert_eq!(l.flagged_at, Some(now));
    }

    // -- transitions ---------------------------------------------------------

    #[test]
    fn published_never_returns_to_draft() {
        let published = lifecycle(ReviewStatus::Published);
        assert_matches!(
            published.transition(ReviewStatus::Draft, Some("body"), Utc::now()),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn publishing_without_body_is_rejected_from_every_state() {
        for status in ALL_STATUSES {
            let l = lifecycle(status);
            for body in [None, Some(""), Some("   ")] {
                assert_matches!(
                    l.transition(ReviewStatus::Published, body, Utc::now()),
                    Err(CoreError::InvalidField { field: "body", .. })
                );
            }
        }
    }

    #[test]
    fn published_at_is_set_exactly_once() {
        let first = Utc::now();
        let later = first + Duration::hours(1);

        let draft = lifecycle(ReviewStatus::Draft);
        let published = draft
            .transition(ReviewStatus::Published, Some("body"), first)
            .unwrap();
        assert_eq!(published.published_at, Some(first));

        let flagged = published
            .transition(ReviewStatus::Flagged, Some("body"), later)
            .unwrap();
        let republished = flagged
            .transition(ReviewStatus::Published, Some("body"), later)
            .unwrap();
        assert_eq!(republished.published_at, Some(first));
    }

    #[test]
    fn any_state_can_be_flagged() {
        let now = Utc::now();
        for status in ALL_STATUSES {
            let flagged = lifecycle(status)
                .transition(ReviewStatus::Flagged, None, now)
                .unwrap();
            assert_eq!(flagged.status, ReviewStatus::Flagged);
            assert!(flagged.flagged_at.is_some());
        }
    }

    #[test]
    fn flagged_can_return_to_draft_or_published() {
        let flagged = lifecycle(ReviewStatus::Flagged);
        let now = Utc::now();
        assert_eq!(
            flagged.transition(ReviewStatus::Draft, None, now).unwrap().status,
            ReviewStatus::Draft
        );
        assert_eq!(
            flagged
                .transition(ReviewStatus::Published, Some("ok"), now)
                .unwrap()
                .status,
            ReviewStatus::Published
        );
    }

    #[test]
    fn self_transition_is_a_no_op() {
        let now = Utc::now() + Duration::days(1);
        for status in ALL_STATUSES {
            let l = lifecycle(status);
            assert_eq!(l.transition(status, Some("A mind-bender."), now).unwrap(), l);
        }
    }
}
