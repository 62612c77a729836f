//! Orchestrates a full import run: fetch catalogs once, then walk the
//! roster in file order, resolving, validating, and submitting each record.
//!
//! Catalog fetches are fatal when they fail; per-record problems never are.
//! The running name index is updated immediately after each successful
//! creation, so a roster that lists the same account twice rejects the
//! second occurrence as a duplicate.

use crate::api::Gateway;
use crate::model::{CandidateUser, KnownUsers};
use crate::resolve::{resolve_organization_groups, resolve_security_group};
use crate::validate::{validate, RejectReason};
use crate::ImportResult;
use tracing::{debug, error, info, warn};

/// What happened to one roster record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The platform created the account and assigned this identifier.
    Created { name: String, id: String },
    /// Validation rejected the record; nothing was submitted.
    Rejected { name: String, reason: RejectReason },
    /// Submission was attempted and failed; the run continued.
    Failed { name: String, error: String },
}

impl RecordOutcome {
    pub fn name(&self) -> &str {
        match self {
            RecordOutcome::Created { name, .. }
            | RecordOutcome::Rejected { name, .. }
            | RecordOutcome::Failed { name, .. } => name,
        }
    }
}

/// Run the import. Returns one outcome per candidate, in roster order.
pub async fn run_import<G: Gateway>(
    gateway: &G,
    candidates: Vec<CandidateUser>,
) -> ImportResult<Vec<RecordOutcome>> {
    debug!("fetching catalogs");
    let existing = gateway.existing_users().await?;
    let org_catalog = gateway.organization_groups().await?;
    let security_catalog = gateway.security_groups().await?;

    let mut known = KnownUsers::from_names(existing.iter().map(|u| u.name.as_str()));
    info!(
        existing_users = known.len(),
        organization_groups = org_catalog.len(),
        security_groups = security_catalog.len(),
        "catalogs fetched"
    );

    let mut outcomes = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let company = resolve_organization_groups(&candidate.organization_nodes, &org_catalog);
        let security = resolve_security_group(&candidate.security_node, &security_catalog);
        let resolved = candidate.resolve(company, security);
        let name = resolved.user.name.clone();

        if let Err(reason) = validate(&resolved, &known) {
            warn!(user = %name, %reason, "invalid user");
            outcomes.push(RecordOutcome::Rejected { name, reason });
            continue;
        }

        match gateway.add_user(&resolved).await {
            Ok(id) => {
                info!(user = %name, %id, "user added");
                known.insert(&name);
                outcomes.push(RecordOutcome::Created { name, id });
            }
            Err(err) => {
                error!(user = %name, error = %err, "failed to import user");
                outcomes.push(RecordOutcome::Failed {
                    name,
                    error: err.to_string(),
                });
            }
        }
    }

    info!("users imported");
    Ok(outcomes)
}
