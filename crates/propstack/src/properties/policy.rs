//! Visibility and approval rules for property records.
//!
//! Every function here is pure: role plus record in, decision out. Unknown
//! or unauthenticated callers always land on the public approved-only
//! branch; the rules fail closed, never open.

use serde::{Deserialize, Serialize};

use super::domain::{Actor, ApprovalStatus, Property, Role, UserId};

/// Why a review transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionDenied {
    #[error("sellers and buyers cannot review property submissions")]
    ReviewerRole,
    #[error("admins may review seller submissions only")]
    AdminScope,
    #[error("no review rule covers this creator role")]
    CreatorRole,
}

/// Review state stamped onto a record by creation and edit side effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewStamp {
    pub status: ApprovalStatus,
    pub approved_by: Option<UserId>,
}

impl ReviewStamp {
    fn pending() -> Self {
        Self {
            status: ApprovalStatus::Pending,
            approved_by: None,
        }
    }

    fn approved_by(actor: &Actor) -> Self {
        Self {
            status: ApprovalStatus::Approved,
            approved_by: Some(actor.id.clone()),
        }
    }
}

/// Whether `viewer` may see `property` in listings and detail views.
///
/// Anonymous callers and buyers see approved records only; sellers see their
/// own submissions in any status; admins see their own records plus the
/// seller moderation queue (seller-created, pending); superAdmins see
/// everything. Admins deliberately do not see other admins' unapproved work.
pub fn can_view(viewer: Option<&Actor>, property: &Property) -> bool {
    let Some(actor) = viewer else {
        return property.approval_status == ApprovalStatus::Approved;
    };

    match actor.role {
        Role::Buyer => property.approval_status == ApprovalStatus::Approved,
        Role::Seller => property.created_by == actor.id,
        Role::Admin => {
            property.created_by == actor.id
                || (property.created_by_role == Role::Seller
                    && property.approval_status == ApprovalStatus::Pending)
        }
        Role::SuperAdmin => true,
    }
}

/// Whether `actor` may move `property` between review states.
///
/// Admins moderate seller submissions only; superAdmins moderate admin and
/// seller submissions. Any other creator role is refused outright rather
/// than silently passed.
pub fn authorize_transition(actor: &Actor, property: &Property) -> Result<(), TransitionDenied> {
    match actor.role {
        Role::Buyer | Role::Seller => Err(TransitionDenied::ReviewerRole),
        Role::Admin => {
            if property.created_by_role == Role::Seller {
                Ok(())
            } else {
                Err(TransitionDenied::AdminScope)
            }
        }
        Role::SuperAdmin => match property.created_by_role {
            Role::Seller | Role::Admin => Ok(()),
            Role::Buyer | Role::SuperAdmin => Err(TransitionDenied::CreatorRole),
        },
    }
}

pub fn can_transition(actor: &Actor, property: &Property) -> bool {
    authorize_transition(actor, property).is_ok()
}

/// Review state for a freshly created record: superAdmin submissions are
/// self-approving, everyone else starts in the review queue.
pub fn initial_review(actor: &Actor) -> ReviewStamp {
    match actor.role {
        Role::SuperAdmin => ReviewStamp::approved_by(actor),
        Role::Buyer | Role::Seller | Role::Admin => ReviewStamp::pending(),
    }
}

/// Review state after `actor` edits `property`.
///
/// SuperAdmin edits stay approved under their own stamp. Creators editing
/// their own approved record keep the existing approver; any other state
/// drops back to pending for re-review. An admin editing someone else's
/// (a seller's) record leaves review state untouched, since edits on behalf
/// of a seller are not an approval.
pub fn review_after_edit(actor: &Actor, property: &Property) -> ReviewStamp {
    match actor.role {
        Role::SuperAdmin => ReviewStamp::approved_by(actor),
        Role::Admin => {
            if property.created_by == actor.id {
                retain_if_approved(property)
            } else {
                ReviewStamp {
                    status: property.approval_status,
                    approved_by: property.approved_by.clone(),
                }
            }
        }
        Role::Buyer | Role::Seller => retain_if_approved(property),
    }
}

fn retain_if_approved(property: &Property) -> ReviewStamp {
    if property.approval_status == ApprovalStatus::Approved {
        ReviewStamp {
            status: ApprovalStatus::Approved,
            approved_by: property.approved_by.clone(),
        }
    } else {
        ReviewStamp::pending()
    }
}

/// Only listing roles may create properties.
pub fn can_create(actor: &Actor) -> bool {
    matches!(actor.role, Role::Seller | Role::Admin | Role::SuperAdmin)
}

/// Only the creator, or a moderator role, may update a record.
pub fn can_edit(actor: &Actor, property: &Property) -> bool {
    matches!(actor.role, Role::Admin | Role::SuperAdmin) || property.created_by == actor.id
}

/// Deletion is reserved for superAdmins.
pub fn can_delete(actor: &Actor) -> bool {
    actor.role == Role::SuperAdmin
}
