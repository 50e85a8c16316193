//! Design review lifecycle and its guarded transition function.
//!
//! Approval fields are only ever written by [`apply_approval_action`]. The
//! legal transitions are:
//!
//! ```text
//! draft            --request approval-->  pending_approval
//! rejected         --request approval-->  pending_approval
//! pending_approval --approve----------->  approved
//! pending_approval --reject------------>  rejected
//! approved         --schedule---------->  scheduled
//! ```
//!
//! Every other pair fails with [`CoreError::InvalidTransition`] and leaves
//! the input design untouched.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::design::{Design, SaveAction};
use crate::error::CoreError;
use crate::scheduling::{ScheduleInfo, SchedulePayload};
use crate::types::{EntityId, Timestamp};

/// Maximum length of a rejection reason.
pub const MAX_REJECTION_REASON_LENGTH: usize = 2_000;

/// Maximum length of reviewer notes attached to an approval.
pub const MAX_APPROVAL_NOTES_LENGTH: usize = 2_000;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Review state of a design.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    #[default]
    Draft,
    PendingApproval,
    Approved,
    Rejected,
    Scheduled,
}

impl ApprovalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ApprovalStatus::Draft => "draft",
            ApprovalStatus::PendingApproval => "pending_approval",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
            ApprovalStatus::Scheduled => "scheduled",
        }
    }

    /// Actions that are legal from this status.
    pub fn allowed_actions(self) -> &'static [ApprovalActionKind] {
        match self {
            ApprovalStatus::Draft | ApprovalStatus::Rejected => {
                &[ApprovalActionKind::RequestApproval]
            }
            ApprovalStatus::PendingApproval => {
                &[ApprovalActionKind::Approve, ApprovalActionKind::Reject]
            }
            ApprovalStatus::Approved => &[ApprovalActionKind::Schedule],
            ApprovalStatus::Scheduled => &[],
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// Status plus actor/timestamp metadata of a design's review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRecord {
    #[serde(rename = "approvalStatus", default)]
    status: ApprovalStatus,
    #[serde(rename = "approvalRequestedBy", default)]
    requested_by: Option<EntityId>,
    #[serde(rename = "approvalRequestedAt", default)]
    requested_at: Option<Timestamp>,
    #[serde(rename = "approvedBy", default)]
    approved_by: Option<EntityId>,
    #[serde(rename = "approvedAt", default)]
    approved_at: Option<Timestamp>,
    #[serde(rename = "approvalNotes", default)]
    notes: Option<String>,
    #[serde(rename = "rejectedBy", default)]
    rejected_by: Option<EntityId>,
    #[serde(rename = "rejectedAt", default)]
    rejected_at: Option<Timestamp>,
    #[serde(rename = "rejectionReason", default)]
    rejection_reason: Option<String>,
}

impl ApprovalRecord {
    pub fn status(&self) -> ApprovalStatus {
        self.status
    }

    pub fn requested_by(&self) -> Option<&str> {
        self.requested_by.as_deref()
    }

    pub fn requested_at(&self) -> Option<Timestamp> {
        self.requested_at
    }

    pub fn approved_by(&self) -> Option<&str> {
        self.approved_by.as_deref()
    }

    pub fn approved_at(&self) -> Option<Timestamp> {
        self.approved_at
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn rejected_by(&self) -> Option<&str> {
        self.rejected_by.as_deref()
    }

    pub fn rejected_at(&self) -> Option<Timestamp> {
        self.rejected_at
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Discriminant of an [`ApprovalAction`], used in error messages and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalActionKind {
    RequestApproval,
    Approve,
    Reject,
    Schedule,
}

impl ApprovalActionKind {
    /// Human-readable verb phrase.
    pub fn verb(self) -> &'static str {
        match self {
            ApprovalActionKind::RequestApproval => "request approval for",
            ApprovalActionKind::Approve => "approve",
            ApprovalActionKind::Reject => "reject",
            ApprovalActionKind::Schedule => "schedule",
        }
    }
}

/// A review action together with its required input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalAction {
    RequestApproval {
        requester_id: EntityId,
    },
    Approve {
        reviewer_id: EntityId,
        notes: Option<String>,
    },
    Reject {
        reviewer_id: EntityId,
        reason: String,
    },
    Schedule(SchedulePayload),
}

impl ApprovalAction {
    pub fn kind(&self) -> ApprovalActionKind {
        match self {
            ApprovalAction::RequestApproval { .. } => ApprovalActionKind::RequestApproval,
            ApprovalAction::Approve { .. } => ApprovalActionKind::Approve,
            ApprovalAction::Reject { .. } => ApprovalActionKind::Reject,
            ApprovalAction::Schedule(_) => ApprovalActionKind::Schedule,
        }
    }

    /// The user performing the action, if the action has one.
    pub fn actor(&self) -> Option<&str> {
        match self {
            ApprovalAction::RequestApproval { requester_id } => Some(requester_id),
            ApprovalAction::Approve { reviewer_id, .. }
            | ApprovalAction::Reject { reviewer_id, .. } => Some(reviewer_id),
            ApprovalAction::Schedule(_) => None,
        }
    }

    /// Check the action's own input, independent of the design's status.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            ApprovalAction::RequestApproval { requester_id } => {
                validate_actor("requester_id", requester_id)
            }
            ApprovalAction::Approve { reviewer_id, notes } => {
                validate_actor("reviewer_id", reviewer_id)?;
                if let Some(n) = notes {
                    if n.chars().count() > MAX_APPROVAL_NOTES_LENGTH {
                        return Err(CoreError::Validation(format!(
                            "Approval notes exceed maximum length of {MAX_APPROVAL_NOTES_LENGTH} characters"
                        )));
                    }
                }
                Ok(())
            }
            ApprovalAction::Reject { reviewer_id, reason } => {
                validate_actor("reviewer_id", reviewer_id)?;
                validate_rejection_reason(reason)
            }
            ApprovalAction::Schedule(payload) => payload.validate(),
        }
    }
}

fn validate_actor(field: &str, id: &str) -> Result<(), CoreError> {
    if id.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// A rejection must say why.
pub fn validate_rejection_reason(reason: &str) -> Result<(), CoreError> {
    if reason.trim().is_empty() {
        return Err(CoreError::Validation(
            "A rejection reason is required".to_string(),
        ));
    }
    if reason.chars().count() > MAX_REJECTION_REASON_LENGTH {
        return Err(CoreError::Validation(format!(
            "Rejection reason exceeds maximum length of {MAX_REJECTION_REASON_LENGTH} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Transition function
// ---------------------------------------------------------------------------

/// Check whether `action` is legal from `from`.
pub fn can_apply(from: ApprovalStatus, action: ApprovalActionKind) -> bool {
    from.allowed_actions().contains(&action)
}

/// Apply a review action to a design, returning the updated copy.
///
/// Input validation runs before the status check, so an empty rejection
/// reason is reported as a validation failure even on an illegal transition.
pub fn apply_approval_action(
    design: &Design,
    action: ApprovalAction,
    now: Timestamp,
) -> Result<Design, CoreError> {
    action.validate()?;

    let from = design.approval().status;
    let kind = action.kind();
    if !can_apply(from, kind) {
        return Err(CoreError::InvalidTransition {
            from,
            action: kind.verb(),
        });
    }

    let mut next = design.clone();
    let record = next.approval_mut();

    match action {
        ApprovalAction::RequestApproval { requester_id } => {
            record.status = ApprovalStatus::PendingApproval;
            record.requested_by = Some(requester_id);
            record.requested_at = Some(now);
            record.approved_by = None;
            record.approved_at = None;
            record.notes = None;
            next.last_save_action = Some(SaveAction::SendForApproval);
        }
        ApprovalAction::Approve { reviewer_id, notes } => {
            record.status = ApprovalStatus::Approved;
            record.approved_by = Some(reviewer_id);
            record.approved_at = Some(now);
            record.notes = notes.filter(|n| !n.trim().is_empty());
            record.rejected_by = None;
            record.rejected_at = None;
            record.rejection_reason = None;
        }
        ApprovalAction::Reject { reviewer_id, reason } => {
            record.status = ApprovalStatus::Rejected;
            record.rejected_by = Some(reviewer_id);
            record.rejected_at = Some(now);
            record.rejection_reason = Some(reason.trim().to_string());
        }
        ApprovalAction::Schedule(payload) => {
            record.status = ApprovalStatus::Scheduled;
            next.set_schedule(ScheduleInfo::from_payload(payload));
            next.last_save_action = Some(SaveAction::Schedule);
        }
    }

    next.updated_at = now;
    Ok(next)
}

/// [`apply_approval_action`] stamped with the current time.
pub fn apply_approval_action_now(design: &Design, action: ApprovalAction) -> Result<Design, CoreError> {
    apply_approval_action(design, action, chrono::Utc::now())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use assert_matches::assert_matches;
    use chrono::{Duration, NaiveDate, Utc};

    use super::*;
    use crate::design::create_initial_design;
    use crate::format::DesignFormat;
    use crate::scheduling::Platform;

    fn draft() -> Design {
        create_initial_design(DesignFormat::SocialSquare, "brand-1", None).unwrap()
    }

    fn request(by: &str) -> ApprovalAction {
        ApprovalAction::RequestApproval {
            requester_id: by.to_string(),
        }
    }

    fn approve(by: &str) -> ApprovalAction {
        ApprovalAction::Approve {
            reviewer_id: by.to_string(),
            notes: Some("Looks great".to_string()),
        }
    }

    fn reject(by: &str, reason: &str) -> ApprovalAction {
        ApprovalAction::Reject {
            reviewer_id: by.to_string(),
            reason: reason.to_string(),
        }
    }

    fn schedule() -> ApprovalAction {
        ApprovalAction::Schedule(SchedulePayload {
            date: NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
            time: None,
            platforms: BTreeSet::from([Platform::Instagram]),
            auto_publish: true,
        })
    }

    fn pending() -> Design {
        apply_approval_action_now(&draft(), request("creator-1")).unwrap()
    }

    // -- Happy path ---------------------------------------------------------

    #[test]
    fn request_approval_stamps_requester() {
        let before = Utc::now();
        let design = pending();
        let record = design.approval();

        assert_eq!(record.status(), ApprovalStatus::PendingApproval);
        assert_eq!(record.requested_by(), Some("creator-1"));
        let at = record.requested_at().unwrap();
        assert!(at >= before);
        assert!(at <= Utc::now());
        assert_eq!(design.last_save_action, Some(SaveAction::SendForApproval));
    }

    #[test]
    fn approve_stamps_reviewer_and_notes() {
        let now = Utc::now();
        let design = apply_approval_action(&pending(), approve("reviewer-9"), now).unwrap();
        let record = design.approval();

        assert_eq!(record.status(), ApprovalStatus::Approved);
        assert_eq!(record.approved_by(), Some("reviewer-9"));
        assert_eq!(record.approved_at(), Some(now));
        assert_eq!(record.notes(), Some("Looks great"));
        assert_eq!(design.updated_at, now);
    }

    #[test]
    fn reject_stamps_reason() {
        let design =
            apply_approval_action_now(&pending(), reject("reviewer-9", "  Off-brand colours ")).unwrap();
        let record = design.approval();

        assert_eq!(record.status(), ApprovalStatus::Rejected);
        assert_eq!(record.rejected_by(), Some("reviewer-9"));
        assert!(record.rejected_at().is_some());
        assert_eq!(record.rejection_reason(), Some("Off-brand colours"));
    }

    #[test]
    fn resubmit_after_rejection_then_approve_clears_rejection() {
        let rejected = apply_approval_action_now(&pending(), reject("r", "Too busy")).unwrap();
        let later = Utc::now() + Duration::seconds(5);
        let resubmitted = apply_approval_action(&rejected, request("creator-2"), later).unwrap();

        assert_eq!(resubmitted.approval().status(), ApprovalStatus::PendingApproval);
        assert_eq!(resubmitted.approval().requested_by(), Some("creator-2"));
        assert_eq!(resubmitted.approval().requested_at(), Some(later));

        let approved = apply_approval_action_now(&resubmitted, approve("r")).unwrap();
        assert_eq!(approved.approval().rejected_by(), None);
        assert_eq!(approved.approval().rejected_at(), None);
        assert_eq!(approved.approval().rejection_reason(), None);
    }

    #[test]
    fn schedule_sets_schedule_fields() {
        let approved = apply_approval_action_now(&pending(), approve("r")).unwrap();
        let scheduled = apply_approval_action_now(&approved, schedule()).unwrap();

        assert_eq!(scheduled.approval().status(), ApprovalStatus::Scheduled);
        let info = scheduled.schedule();
        assert_eq!(info.scheduled_date(), NaiveDate::from_ymd_opt(2026, 11, 2));
        assert!(info.scheduled_platforms().contains(&Platform::Instagram));
        assert!(info.auto_publish());
        assert_eq!(scheduled.last_save_action, Some(SaveAction::Schedule));
    }

    #[test]
    fn blank_approval_notes_are_dropped() {
        let action = ApprovalAction::Approve {
            reviewer_id: "r".to_string(),
            notes: Some("   ".to_string()),
        };
        let design = apply_approval_action_now(&pending(), action).unwrap();
        assert_eq!(design.approval().notes(), None);
    }

    // -- Validation ---------------------------------------------------------

    #[test]
    fn empty_rejection_reason_fails_validation() {
        let design = pending();
        let err = apply_approval_action_now(&design, reject("r", "")).unwrap_err();
        assert_matches!(err, CoreError::Validation(_));

        let err = apply_approval_action_now(&design, reject("r", "   ")).unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
        assert_eq!(design.approval().status(), ApprovalStatus::PendingApproval);
    }

    #[test]
    fn empty_actor_fails_validation() {
        let err = apply_approval_action_now(&draft(), request(" ")).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("requester_id"));
    }

    #[test]
    fn overlong_reason_fails_validation() {
        let reason = "x".repeat(MAX_REJECTION_REASON_LENGTH + 1);
        let err = apply_approval_action_now(&pending(), reject("r", &reason)).unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn length_limits_count_characters_not_bytes() {
        // Each 'é' is two bytes in UTF-8.
        let reason = "é".repeat(MAX_REJECTION_REASON_LENGTH);
        assert!(reason.len() > MAX_REJECTION_REASON_LENGTH);
        let rejected = apply_approval_action_now(&pending(), reject("r", &reason)).unwrap();
        assert_eq!(rejected.approval().status(), ApprovalStatus::Rejected);

        let notes = "日".repeat(MAX_APPROVAL_NOTES_LENGTH);
        let action = ApprovalAction::Approve {
            reviewer_id: "r".to_string(),
            notes: Some(notes),
        };
        assert!(action.validate().is_ok());

        let too_long = "é".repeat(MAX_REJECTION_REASON_LENGTH + 1);
        assert_matches!(
            apply_approval_action_now(&pending(), reject("r", &too_long)),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn schedule_without_platforms_fails_validation() {
        let approved = apply_approval_action_now(&pending(), approve("r")).unwrap();
        let action = ApprovalAction::Schedule(SchedulePayload {
            date: NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
            time: None,
            platforms: BTreeSet::new(),
            auto_publish: false,
        });
        assert_matches!(
            apply_approval_action_now(&approved, action),
            Err(CoreError::Validation(_))
        );
    }

    // -- Illegal transitions ------------------------------------------------

    #[test]
    fn approve_draft_is_invalid() {
        let err = apply_approval_action_now(&draft(), approve("r")).unwrap_err();
        assert_matches!(
            err,
            CoreError::InvalidTransition {
                from: ApprovalStatus::Draft,
                action: "approve"
            }
        );
    }

    #[test]
    fn approve_already_approved_is_invalid() {
        let approved = apply_approval_action_now(&pending(), approve("r")).unwrap();
        let err = apply_approval_action_now(&approved, approve("r")).unwrap_err();
        assert_matches!(err, CoreError::InvalidTransition { from: ApprovalStatus::Approved, .. });
        assert_eq!(approved.approval().status(), ApprovalStatus::Approved);
    }

    #[test]
    fn reject_scheduled_is_invalid() {
        let approved = apply_approval_action_now(&pending(), approve("r")).unwrap();
        let scheduled = apply_approval_action_now(&approved, schedule()).unwrap();
        let err = apply_approval_action_now(&scheduled, reject("r", "late change")).unwrap_err();
        assert!(err.to_string().contains("cannot reject a design that is scheduled"));
    }

    #[test]
    fn schedule_pending_is_invalid() {
        assert_matches!(
            apply_approval_action_now(&pending(), schedule()),
            Err(CoreError::InvalidTransition { .. })
        );
    }

    #[test]
    fn request_twice_is_invalid() {
        assert_matches!(
            apply_approval_action_now(&pending(), request("creator-1")),
            Err(CoreError::InvalidTransition { from: ApprovalStatus::PendingApproval, .. })
        );
    }

    #[test]
    fn transition_table_is_closed() {
        let all = [
            ApprovalActionKind::RequestApproval,
            ApprovalActionKind::Approve,
            ApprovalActionKind::Reject,
            ApprovalActionKind::Schedule,
        ];
        let legal = [
            (ApprovalStatus::Draft, ApprovalActionKind::RequestApproval),
            (ApprovalStatus::Rejected, ApprovalActionKind::RequestApproval),
            (ApprovalStatus::PendingApproval, ApprovalActionKind::Approve),
            (ApprovalStatus::PendingApproval, ApprovalActionKind::Reject),
            (ApprovalStatus::Approved, ApprovalActionKind::Schedule),
        ];
        for status in [
            ApprovalStatus::Draft,
            ApprovalStatus::PendingApproval,
            ApprovalStatus::Approved,
            ApprovalStatus::Rejected,
            ApprovalStatus::Scheduled,
        ] {
            for action in all {
                assert_eq!(
                    can_apply(status, action),
                    legal.contains(&(status, action)),
                    "{status} / {action:?}"
                );
            }
        }
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&ApprovalStatus::PendingApproval).unwrap();
        assert_eq!(json, "\"pending_approval\"");
    }
}
