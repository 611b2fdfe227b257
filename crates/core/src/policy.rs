//! Authorization policy shared by every component.
//!
//! The authenticated actor is represented once, as a [`Principal`], and the
//! admin/owner rule lives here so handlers never compare roles or ids by hand.

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// The authenticated actor: identity plus role, derived from a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: DbId,
    pub role: Role,
}

impl Principal {
    pub fn new(user_id: DbId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Whether `principal` may act on a resource owned by `owner_id`.
///
/// True for the owner and for any admin.
pub fn can_moderate(principal: &Principal, owner_id: DbId) -> bool {
    principal.is_admin() || principal.user_id == owner_id
}

/// Reject non-admin principals with `Forbidden`.
pub fn require_admin(principal: &Principal) -> Result<(), CoreError> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(CoreError::Forbidden("Admin role required".into()))
    }
}

/// Reject principals that are neither the owner nor an admin.
///
/// `action` completes the sentence "Only the author or an admin can ...".
pub fn require_moderator(
    principal: &Principal,
    owner_id: DbId,
    action: &str,
) -> Result<(), CoreError> {
    if can_moderate(principal, owner_id) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Only the author or an admin can {action}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const OWNER: DbId = 7;

    #[test]
    fn owner_can_moderate_own_resource() {
        let owner = Principal::new(OWNER, Role::User);
        assert!(can_moderate(&owner, OWNER));
    }

    #[test]
    fn admin_can_moderate_any_resource() {
        let admin = Principal::new(1, Role::Admin);
        assert!(can_moderate(&admin, OWNER));
    }

    #[test]
    fn other_users_cannot_moderate() {
        for id in [1, 2, 6, 8, 1_000] {
            let stranger = Principal::new(id, Role::User);
            assert!(!can_moderate(&stranger, OWNER));
            assert_matches!(
                require_moderator(&stranger, OWNER, "edit this review"),
                Err(CoreError::Forbidden(msg)) if msg.contains("edit this review")
            );
        }
    }

    #[test]
    fn require_admin_only_passes_admins() {
        assert!(require_admin(&Principal::new(1, Role::Admin)).is_ok());
        assert_matches!(
            require_admin(&Principal::new(1, Role::User)),
            Err(CoreError::Forbidden(_))
        );
    }
}
