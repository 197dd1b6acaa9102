//! The commands that inspect or change a service outside of `push`.

pub(crate) mod acl;
pub(crate) mod ban;
pub(crate) mod dictionary;
pub(crate) mod service;
pub(crate) mod version;

use anyhow::{anyhow, Context as _, Result};
use cdnsync_api::{
    client,
    schema::{ConfigObject, Service},
    ConfigApi,
};

/// Find a dictionary or ACL in the active version of a service, returning
/// the service and the container's id.
async fn active_container<T: ConfigObject>(
    api: &dyn ConfigApi,
    service_name: &str,
    name: &str,
    id: impl FnOnce(&T) -> Option<String>,
) -> Result<(Service, String)> {
    let service = api
        .search_service(service_name)
        .await
        .with_context(|| format!("looking up service {}", service_name))?;
    let active = service.active_version()?;
    let container: T = client::get(api, &service.id, active, name)
        .await
        .with_context(|| format!("looking up {} {}", T::KIND.label(), name))?;
    let id = id(&container).ok_or_else(|| anyhow!("{} {} has no id", T::KIND.label(), name))?;
    Ok((service, id))
}
