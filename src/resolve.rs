//! Group-name resolution against the fetched catalogs.
//!
//! Resolution is deliberately permissive: an unknown name yields an empty
//! result, never an error. The validator is the single place that rejects
//! records, which keeps these lookups testable without a live catalog.

use crate::model::Group;
use crate::normalize::{normalize_org_name, normalize_security_name};

/// Secondary delimiter inside the organization-nodes roster field.
pub const ORG_NODE_SEPARATOR: char = '|';

/// Resolve a pipe-separated list of organization node names against the
/// organization catalog. Matching is case-insensitive on the display name;
/// names with no catalog match are dropped. Request order is preserved.
pub fn resolve_organization_groups(raw_nodes: &str, catalog: &[Group]) -> Vec<Group> {
    let mut resolved = Vec::new();
    for requested in raw_nodes
        .split(ORG_NODE_SEPARATOR)
        .map(normalize_org_name)
    {
        if let Some(group) = catalog
            .iter()
            .find(|g| g.name.eq_ignore_ascii_case(&requested))
        {
            resolved.push(group.clone());
        }
    }
    resolved
}

/// Resolve a security role name against the security catalog (the subtree
/// under the security root). The canonical name must match exactly; the
/// first catalog hit wins. An empty label resolves to nothing.
pub fn resolve_security_group(raw_node: &str, catalog: &[Group]) -> Vec<Group> {
    if raw_node.trim().is_empty() {
        return Vec::new();
    }

    let requested = normalize_security_name(raw_node);
    catalog
        .iter()
        .find(|g| g.name == requested)
        .cloned()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{ORG_ROOT, SECURITY_EVERYTHING, SECURITY_VIEW_ONLY};

    fn org_catalog() -> Vec<Group> {
        vec![
            Group::organization("g0", ORG_ROOT),
            Group::organization("g1", "Org A"),
            Group::organization("g2", "Org B"),
        ]
    }

    fn security_catalog() -> Vec<Group> {
        vec![
            Group::security("s1", SECURITY_EVERYTHING),
            Group::security("s2", SECURITY_VIEW_ONLY),
        ]
    }

    #[test]
    fn resolves_multiple_org_names_in_request_order() {
        let groups = resolve_organization_groups("Org A|Org B", &org_catalog());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].id, "g1");
        assert_eq!(groups[1].id, "g2");
    }

    #[test]
    fn unknown_org_name_is_dropped_without_error() {
        let groups = resolve_organization_groups("Org A|No Such Org", &org_catalog());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, "g1");

        assert!(resolve_organization_groups("Nowhere", &org_catalog()).is_empty());
    }

    #[test]
    fn org_root_alias_hits_the_sentinel_node() {
        let groups = resolve_organization_groups("Entire Organization", &org_catalog());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, "g0");
    }

    #[test]
    fn security_role_resolves_via_alias() {
        let groups = resolve_security_group("admin", &security_catalog());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, "s1");
    }

    #[test]
    fn empty_security_label_resolves_to_nothing() {
        assert!(resolve_security_group("", &security_catalog()).is_empty());
        assert!(resolve_security_group("   ", &security_catalog()).is_empty());
    }

    #[test]
    fn first_security_match_wins_on_catalog_duplicates() {
        let catalog = vec![
            Group::security("s1", SECURITY_EVERYTHING),
            Group::security("s1-dup", SECURITY_EVERYTHING),
        ];
        let groups = resolve_security_group("Administrator", &catalog);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, "s1");
    }

    #[test]
    fn security_match_is_case_sensitive_on_canonical_names() {
        // a catalog entry whose name is not lower-case cannot be reached by
        // a pass-through label, only by an alias sentinel
        let catalog = vec![Group::security("s9", "Dispatcher")];
        assert!(resolve_security_group("Dispatcher", &catalog).is_empty());

        let lower = vec![Group::security("s9", "dispatcher")];
        assert_eq!(resolve_security_group("Dispatcher", &lower).len(), 1);
    }
}
