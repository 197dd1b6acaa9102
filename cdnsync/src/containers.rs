//! Reconciliation of dictionaries and ACLs.
//!
//! Their items and entries live outside of versions and are managed with the
//! `dictionary` and `acl` commands, so only the containers themselves are
//! compared, by name. Container changes do not show up in version diffs,
//! which is why the caller treats any change here as reason to activate.

use std::collections::BTreeSet;

use anyhow::{bail, Result};
use cdnsync_api::{
    client,
    schema::{ConfigObject, Service, Version},
    ConfigApi,
};
use cdnsync_core::{entry::present, Entry};
use tracing::debug;

use crate::reconcile::ReconcileOutcome;

pub(crate) async fn reconcile_containers<T: ConfigObject>(
    api: &dyn ConfigApi,
    service: &Service,
    draft: &Version,
    desired: &[Entry<T>],
) -> Result<ReconcileOutcome> {
    let kind = T::KIND;
    let mut wanted = BTreeSet::new();
    for container in present(desired) {
        if !wanted.insert(container.name()) {
            bail!("{} {} is listed more than once", kind.label(), container.name());
        }
    }

    let mut outcome = ReconcileOutcome::default();
    let existing: Vec<T> = client::list(api, &service.id, draft.number).await?;
    let mut seen = BTreeSet::new();
    for remote in &existing {
        if wanted.contains(remote.name()) {
            debug!("Found matching {} {}. Not creating.", kind, remote.name());
            seen.insert(remote.name());
        } else {
            debug!("Found non-matching {} {}. Deleting.", kind, remote.name());
            client::delete::<T>(api, &service.id, draft.number, remote.name()).await?;
            outcome.deleted.push(remote.name().to_string());
        }
    }

    for container in present(desired) {
        if seen.contains(container.name()) {
            continue;
        }
        debug!("Creating missing {} {}.", kind, container.name());
        let mut container = container.clone();
        container.clear_server_fields();
        client::create(api, &service.id, draft.number, &container).await?;
        outcome.created.push(container.name().to_string());
    }
    Ok(outcome)
}
