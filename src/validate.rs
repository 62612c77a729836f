//! Acceptance rules for a resolved candidate.

use crate::model::{KnownUsers, ResolvedUser};
use std::fmt;

/// Why a record was not submitted. Checked in declaration order; the first
/// failure wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NoOrganizationNodes,
    NoSecurityNodes,
    DuplicateUser,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NoOrganizationNodes => f.write_str("must have organization nodes"),
            RejectReason::NoSecurityNodes => f.write_str("must have security nodes"),
            RejectReason::DuplicateUser => f.write_str("duplicate user"),
        }
    }
}

/// Pure accept/reject predicate; submission is licensed by `Ok(())` and
/// nothing else. The caller owns `known` and keeps it current.
pub fn validate(resolved: &ResolvedUser, known: &KnownUsers) -> Result<(), RejectReason> {
    if resolved.user.company_groups.is_empty() {
        return Err(RejectReason::NoOrganizationNodes);
    }
    if resolved.user.security_groups.is_empty() {
        return Err(RejectReason::NoSecurityNodes);
    }
    if known.contains(&resolved.user.name) {
        return Err(RejectReason::DuplicateUser);
    }
    Ok(())
}
