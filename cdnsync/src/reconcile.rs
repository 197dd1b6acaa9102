//! The name-keyed merge of desired objects into a draft version.

use std::collections::BTreeSet;

use anyhow::{bail, Result};
use cdnsync_api::{
    client,
    schema::{ConfigObject, DirectorBackend, Service, Settings, Version},
    ConfigApi,
};
use cdnsync_core::{entry::present, Entry};
use tracing::debug;

/// What a reconciliation did, by object name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct ReconcileOutcome {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub deleted: Vec<String>,
}

impl ReconcileOutcome {
    /// Whether any mutation was issued.
    pub(crate) fn changed(&self) -> bool {
        !(self.created.is_empty() && self.updated.is_empty() && self.deleted.is_empty())
    }
}

/// Copies of the present entries with their server fields cleared, after
/// checking that no name occurs twice.
fn worklist<T: ConfigObject>(desired: &[Entry<T>]) -> Result<Vec<T>> {
    let mut names = BTreeSet::new();
    let mut list = Vec::new();
    for object in present(desired) {
        if !names.insert(object.name()) {
            bail!(
                "{} {} is listed more than once",
                T::KIND.label(),
                object.name()
            );
        }
        let mut object = object.clone();
        object.clear_server_fields();
        list.push(object);
    }
    Ok(list)
}

/// Make the objects of one category in `draft` match `desired`.
///
/// Remote objects are matched to desired ones by name. Equal objects are
/// left alone, differing ones updated in place, and remote objects without
/// a desired counterpart deleted. Whatever is left of `desired` is created.
/// Every call mutates the draft immediately; an error stops the category
/// where it is and rerunning picks up from the state left behind.
pub(crate) async fn reconcile<T: ConfigObject>(
    api: &dyn ConfigApi,
    service: &Service,
    draft: &Version,
    desired: &[Entry<T>],
) -> Result<ReconcileOutcome> {
    let kind = T::KIND;
    let mut worklist = worklist(desired)?;
    let mut outcome = ReconcileOutcome::default();

    let existing: Vec<T> = client::list(api, &service.id, draft.number).await?;
    for mut remote in existing {
        remote.clear_server_fields();
        let found = worklist
            .iter()
            .position(|d| *d == remote || d.name() == remote.name());
        match found {
            Some(i) if worklist[i] == remote => {
                debug!("Found matching {} {}. Not creating.", kind, remote.name());
                worklist.remove(i);
            }
            Some(i) => {
                debug!(
                    "Found mismatched existing {} {}. Updating.",
                    kind,
                    remote.name()
                );
                let wanted = worklist.remove(i);
                client::update(api, &service.id, draft.number, remote.name(), &wanted).await?;
                outcome.updated.push(wanted.name().to_string());
            }
            None => {
                debug!(
                    "Found non-matching {} {}. Deleting.",
                    kind,
                    remote.name()
                );
                client::delete::<T>(api, &service.id, draft.number, remote.name()).await?;
                outcome.deleted.push(remote.name().to_string());
            }
        }
    }

    for wanted in worklist {
        debug!("Creating missing {} {}.", kind, wanted.name());
        client::create(api, &service.id, draft.number, &wanted).await?;
        outcome.created.push(wanted.name().to_string());
    }
    Ok(outcome)
}

/// Update the service-wide settings if they differ. `None` leaves them be.
pub(crate) async fn reconcile_settings(
    api: &dyn ConfigApi,
    service: &Service,
    draft: &Version,
    desired: Option<&Settings>,
) -> Result<bool> {
    let Some(desired) = desired else {
        return Ok(false);
    };
    let mut desired = desired.clone();
    desired.clear_server_fields();
    let mut existing = api.get_settings(&service.id, draft.number).await?;
    existing.clear_server_fields();
    if existing == desired {
        return Ok(false);
    }
    debug!("Mismatched settings. Updating.");
    api.update_settings(&service.id, draft.number, &desired)
        .await?;
    Ok(true)
}

/// Attach every desired backend to its director, where not attached yet.
///
/// Mappings can only be fetched one at a time, so those that aren't desired
/// are never found and stay until their director is deleted.
pub(crate) async fn reconcile_director_backends(
    api: &dyn ConfigApi,
    service: &Service,
    draft: &Version,
    desired: &[DirectorBackend],
) -> Result<ReconcileOutcome> {
    let mut outcome = ReconcileOutcome::default();
    for mapping in desired {
        let found = api
            .get_director_backend(&service.id, draft.number, &mapping.director, &mapping.backend)
            .await;
        match found {
            Ok(_) => {
                debug!(
                    "Found backend {} in director {}. Not creating.",
                    mapping.backend, mapping.director
                );
            }
            Err(e) if e.is_not_found() => {
                debug!(
                    "Adding backend {} to director {}.",
                    mapping.backend, mapping.director
                );
                api.create_director_backend(
                    &service.id,
                    draft.number,
                    &mapping.director,
                    &mapping.backend,
                )
                .await?;
                outcome
                    .created
                    .push(format!("{}/{}", mapping.director, mapping.backend));
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(outcome)
}
