//! Canonicalization of free-text group and role labels.
//!
//! Roster authors type "admin" or "Entire Organization"; the catalog knows
//! those nodes by internal sentinel names. Aliases live in data tables so a
//! new spelling is a new row, not a new branch.

/// Catalog name of the organization root node.
pub const ORG_ROOT: &str = "**Org**";

/// Catalog names of the built-in security clearances.
pub const SECURITY_EVERYTHING: &str = "**EverythingSecurity**";
pub const SECURITY_SUPERVISOR: &str = "**SupervisorSecurity**";
pub const SECURITY_VIEW_ONLY: &str = "**ViewOnlySecurity**";
pub const SECURITY_NOTHING: &str = "**NothingSecurity**";

const ORG_ALIASES: &[(&str, &str)] = &[
    ("organization", ORG_ROOT),
    ("entire organization", ORG_ROOT),
];

const SECURITY_ALIASES: &[(&str, &str)] = &[
    ("administrator", SECURITY_EVERYTHING),
    ("admin", SECURITY_EVERYTHING),
    // "superviser" shows up in real rosters often enough to keep
    ("superviser", SECURITY_SUPERVISOR),
    ("supervisor", SECURITY_SUPERVISOR),
    ("view only", SECURITY_VIEW_ONLY),
    ("viewonly", SECURITY_VIEW_ONLY),
    ("nothing", SECURITY_NOTHING),
];

fn canonicalize(label: &str, aliases: &[(&str, &str)]) -> String {
    let folded = label.trim().to_lowercase();
    aliases
        .iter()
        .find(|(alias, _)| *alias == folded)
        .map(|(_, sentinel)| (*sentinel).to_string())
        .unwrap_or(folded)
}

/// Map an organization node label to its catalog lookup key.
pub fn normalize_org_name(label: &str) -> String {
    canonicalize(label, ORG_ALIASES)
}

/// Map a security role label to its catalog lookup key.
pub fn normalize_security_name(label: &str) -> String {
    canonicalize(label, SECURITY_ALIASES)
}
