//! Wire-facing data model: users, groups, and the running name index.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Time zone assigned to every imported account.
pub const DEFAULT_TIME_ZONE: &str = "America/Los_Angeles";

/// Validity window applied to every imported account, wide enough to be
/// "always active" in practice.
pub fn default_active_from() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1986, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("hard-coded date is valid")
}

pub fn default_active_to() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2050, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("hard-coded date is valid")
}

/// How the platform checks the account's credentials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthenticationType {
    /// Name and password held by the platform itself.
    #[default]
    BasicAuthentication,
}

/// Which catalog a group came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupKind {
    #[default]
    Organization,
    Security,
}

/// A node in the platform's group hierarchy. Sourced entirely from the
/// remote catalog; never created locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(skip)]
    pub kind: GroupKind,
}

impl Group {
    pub fn organization(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: GroupKind::Organization,
        }
    }

    pub fn security(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: GroupKind::Security,
        }
    }
}

/// The user entity as submitted to the platform.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub user_authentication_type: AuthenticationType,
    pub active_from: NaiveDateTime,
    pub active_to: NaiveDateTime,
    pub private_user_groups: Vec<Group>,
    pub time_zone_id: String,
    pub is_driver: bool,
    pub is_email_report_enabled: bool,
    pub company_groups: Vec<Group>,
    pub security_groups: Vec<Group>,
}

/// One roster row: the account entity with its defaults applied, plus the
/// raw group text still to be resolved against the catalogs.
#[derive(Debug, Clone)]
pub struct CandidateUser {
    pub user: User,
    /// Pipe-separated organization node names, verbatim from the roster.
    pub organization_nodes: String,
    /// Security role name, verbatim from the roster.
    pub security_node: String,
}

impl CandidateUser {
    pub fn new(
        name: impl Into<String>,
        password: impl Into<String>,
        organization_nodes: impl Into<String>,
        security_node: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            user: User {
                id: None,
                name: name.into(),
                first_name: first_name.into(),
                last_name: last_name.into(),
                password: password.into(),
                user_authentication_type: AuthenticationType::BasicAuthentication,
                active_from: default_active_from(),
                active_to: default_active_to(),
                private_user_groups: Vec::new(),
                time_zone_id: DEFAULT_TIME_ZONE.to_string(),
                is_driver: false,
                is_email_report_enabled: true,
                company_groups: Vec::new(),
                security_groups: Vec::new(),
            },
            organization_nodes: organization_nodes.into(),
            security_node: security_node.into(),
        }
    }

    /// Attach resolved group references. The record is immutable afterwards,
    /// apart from the identifier assigned on successful creation.
    pub fn resolve(self, company_groups: Vec<Group>, security_groups: Vec<Group>) -> ResolvedUser {
        let mut user = self.user;
        user.company_groups = company_groups;
        user.security_groups = security_groups;
        ResolvedUser { user }
    }
}

/// A candidate with its group references resolved, ready for validation.
#[derive(Debug, Clone)]
pub struct ResolvedUser {
    pub user: User,
}

impl ResolvedUser {
    pub fn name(&self) -> &str {
        &self.user.name
    }
}

/// Slim view of an already-provisioned account, as returned by the user
/// catalog fetch. Only the name matters for duplicate detection.
#[derive(Debug, Clone, Deserialize)]
pub struct UserSummary {
    #[serde(default)]
    pub name: String,
}

/// Case-insensitive set of account names known to exist. Seeded from the
/// catalog fetch and grown by one entry per successful creation within a
/// run; owned and mutated exclusively by the import pipeline.
#[derive(Debug, Default)]
pub struct KnownUsers(HashSet<String>);

impl KnownUsers {
    pub fn from_names<I>(names: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self(
            names
                .into_iter()
                .map(|n| n.as_ref().trim().to_lowercase())
                .collect(),
        )
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(&name.trim().to_lowercase())
    }

    pub fn insert(&mut self, name: &str) -> bool {
        self.0.insert(name.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_defaults() {
        let candidate = CandidateUser::new("jane@x.com", "pw", "Org A", "Admin", "Jane", "Doe");
        let user = &candidate.user;

        assert_eq!(user.time_zone_id, "America/Los_Angeles");
        assert_eq!(
            user.user_authentication_type,
            AuthenticationType::BasicAuthentication
        );
        assert!(!user.is_driver);
        assert!(user.is_email_report_enabled);
        assert!(user.company_groups.is_empty());
        assert!(user.security_groups.is_empty());
        assert!(user.active_from < user.active_to);
        assert_eq!(user.active_from.to_string(), "1986-01-01 00:00:00");
        assert_eq!(user.active_to.to_string(), "2050-01-01 00:00:00");
    }

    #[test]
    fn known_users_is_case_insensitive() {
        let mut known = KnownUsers::from_names(["Jane"]);
        assert!(known.contains("JANE"));
        assert!(known.contains(" jane "));
        assert!(!known.contains("john"));

        assert!(known.insert("John"));
        assert!(!known.insert("JOHN"));
        assert!(known.contains("john"));
        assert_eq!(known.len(), 2);
    }

    #[test]
    fn user_serializes_to_wire_shape() {
        let mut candidate = CandidateUser::new("jane@x.com", "pw", "", "", "Jane", "Doe");
        candidate.user.company_groups = vec![Group::organization("g1", "**Org**")];

        let value = serde_json::to_value(&candidate.user).unwrap();
        assert_eq!(value["name"], "jane@x.com");
        assert_eq!(value["firstName"], "Jane");
        assert_eq!(value["userAuthenticationType"], "BasicAuthentication");
        assert_eq!(value["timeZoneId"], "America/Los_Angeles");
        assert_eq!(value["isDriver"], false);
        assert_eq!(value["isEmailReportEnabled"], true);
        assert_eq!(value["companyGroups"][0]["id"], "g1");
        // unassigned id is omitted entirely
        assert!(value.get("id").is_none());
    }
}
