use anyhow::Result;
use cdnsync_api::{
    schema::{DiffFormat, Service},
    ConfigApi,
};

/// Whether version `draft` is the same configuration as `active`.
///
/// The generated VCL can't be compared directly: its ordering changes with
/// no-op edits such as removing and re-adding every domain. Instead, diff
/// `active` against itself to get the rendering of "no difference", and
/// compare that with the diff from `active` to `draft`.
pub(crate) async fn versions_equal(
    api: &dyn ConfigApi,
    service: &Service,
    active: u32,
    draft: u32,
) -> Result<bool> {
    let baseline = api
        .diff(&service.id, active, active, DiffFormat::Text)
        .await?;
    let diff = api
        .diff(&service.id, active, draft, DiffFormat::Text)
        .await?;
    Ok(baseline.diff == diff.diff)
}
