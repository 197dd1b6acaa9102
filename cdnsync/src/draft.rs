//! Obtaining the one draft version a run writes to, per service.

use std::collections::BTreeMap;

use anyhow::Result;
use cdnsync_api::{
    schema::{Service, Version},
    ConfigApi,
};
use tracing::{debug, info};

/// Comment that marks a version as created by this tool. A marked draft left
/// behind by an earlier, interrupted run is picked up again.
pub(crate) const VERSION_COMMENT: &str = "cdnsync";

/// The drafts chosen during this run, by service id.
#[derive(Debug, Default)]
pub(crate) struct DraftRegistry {
    drafts: BTreeMap<String, Version>,
}

impl DraftRegistry {
    pub(crate) fn get(&self, service_id: &str) -> Option<&Version> {
        self.drafts.get(service_id)
    }

    pub(crate) fn remove(&mut self, service_id: &str) -> Option<Version> {
        self.drafts.remove(service_id)
    }

    fn register(&mut self, service_id: &str, version: Version) -> Version {
        self.drafts.insert(service_id.to_string(), version.clone());
        version
    }
}

/// Return the draft for `service`, reusing or creating it on first use.
pub(crate) async fn get_draft(
    api: &dyn ConfigApi,
    drafts: &mut DraftRegistry,
    service: &Service,
) -> Result<Version> {
    if let Some(draft) = drafts.get(&service.id) {
        return Ok(draft.clone());
    }

    let active = service.active_version()?;
    let versions = api.list_versions(&service.id).await?;
    if let Some(draft) = versions.into_iter().find(|v| {
        v.number > active && v.comment == VERSION_COMMENT && !v.active && !v.locked
    }) {
        debug!("Reusing pending version {} of {}", draft.number, service.name);
        return Ok(drafts.register(&service.id, draft));
    }

    let mut draft = api.clone_version(&service.id, active).await?;
    draft.comment = VERSION_COMMENT.to_string();
    // The API rejects updates that carry these.
    draft.created_at = None;
    draft.updated_at = None;
    let draft = api.update_version(&service.id, &draft).await?;
    info!(
        "Cloned version {} of {} to {}",
        active, service.name, draft.number
    );
    Ok(drafts.register(&service.id, draft))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, FakeApi};

    #[tokio::test]
    async fn clones_active_version_once() {
        let api = FakeApi::new();
        let service = api.add_service("SVC", "www");
        let mut drafts = DraftRegistry::default();

        let draft = get_draft(&api, &mut drafts, &service).await.unwrap();
        assert_eq!(draft.number, 2);
        assert_eq!(draft.comment, VERSION_COMMENT);
        assert!(api.calls().contains(&Call::CloneVersion(1)));
        assert!(api.calls().contains(&Call::UpdateVersion(2)));

        // A second request within the same run is served from the registry.
        api.clear_calls();
        let again = get_draft(&api, &mut drafts, &service).await.unwrap();
        assert_eq!(again, draft);
        assert_eq!(api.calls(), vec![]);
    }

    #[tokio::test]
    async fn reuses_marked_draft() {
        let api = FakeApi::new();
        let service = api.add_service("SVC", "www");
        api.add_version("SVC", "someone else's change");
        api.add_version("SVC", VERSION_COMMENT);
        let mut drafts = DraftRegistry::default();

        let draft = get_draft(&api, &mut drafts, &service).await.unwrap();
        assert_eq!(draft.number, 3);
        assert_eq!(api.mutations(), vec![]);
        assert_eq!(drafts.get("SVC"), Some(&draft));
    }

    #[tokio::test]
    async fn ignores_locked_drafts() {
        let api = FakeApi::new();
        let service = api.add_service("SVC", "www");
        let v2 = api.add_version("SVC", VERSION_COMMENT);
        api.lock_version("SVC", v2);
        let mut drafts = DraftRegistry::default();

        let draft = get_draft(&api, &mut drafts, &service).await.unwrap();
        assert_eq!(draft.number, 3);
        assert!(api.calls().contains(&Call::CloneVersion(1)));
    }

    #[tokio::test]
    async fn clone_errors_propagate() {
        let api = FakeApi::new();
        let service = api.add_service("SVC", "www");
        api.fail_on(Call::CloneVersion(1));
        let mut drafts = DraftRegistry::default();

        let err = get_draft(&api, &mut drafts, &service).await.unwrap_err();
        let err = err.downcast_ref::<cdnsync_api::ApiError>().unwrap();
        assert_eq!(err.status(), Some(500));
        assert!(drafts.get("SVC").is_none());
    }
}
