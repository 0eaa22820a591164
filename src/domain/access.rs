//! Access control predicates.
//!
//! Pure functions over a resolved caller identity and the roles an
//! operation accepts. Role checks are exact set membership: admin is
//! not implicitly an instructor unless the operation lists it.
//! Authentication itself (token presence/validity) is handled by the
//! JWT middleware before these run.

use bson::oid::ObjectId;

use crate::errors::{AppError, AppResult};

use super::Role;

/// Succeeds iff the caller's role is in `allowed`.
pub fn require_role(role: Role, allowed: &[Role]) -> AppResult<()> {
    if allowed.contains(&role) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Succeeds iff the caller owns the resource OR holds one of `allowed`.
///
/// Used for course update/delete: the owning instructor, or any admin.
pub fn require_owner_or_role(
    caller_id: &ObjectId,
    caller_role: Role,
    owner_id: &ObjectId,
    allowed: &[Role],
) -> AppResult<()> {
    if caller_id == owner_id || allowed.contains(&caller_role) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_check_is_exact_membership() {
        assert!(require_role(Role::Instructor, &[Role::Instructor, Role::Admin]).is_ok());
        assert!(require_role(Role::Admin, &[Role::Instructor, Role::Admin]).is_ok());
        assert!(require_role(Role::Student, &[Role::Instructor, Role::Admin]).is_err());
        // No hierarchy: admin does not pass a student-only gate
        assert!(require_role(Role::Admin, &[Role::Student]).is_err());
    }

    #[test]
    fn owner_passes_regardless_of_role() {
        let owner = ObjectId::new();
        assert!(require_owner_or_role(&owner, Role::Instructor, &owner, &[Role::Admin]).is_ok());
    }

    #[test]
    fn non_owner_needs_a_listed_role() {
        let owner = ObjectId::new();
        let other = ObjectId::new();
        assert!(require_owner_or_role(&other, Role::Admin, &owner, &[Role::Admin]).is_ok());
        // Another instructor cannot touch someone else's course
        assert!(require_owner_or_role(&other, Role::Instructor, &owner, &[Role::Admin]).is_err());
        assert!(require_owner_or_role(&other, Role::Student, &owner, &[Role::Admin]).is_err());
    }
}
