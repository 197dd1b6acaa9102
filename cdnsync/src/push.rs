//! The `push` command: reconcile every targeted service and activate what
//! changed.

use anyhow::{anyhow, bail, Context as _, Result};
use cdnsync_api::schema::{ConfigObject, DirectorBackend, Service};
use cdnsync_core::{normalize::normalize, Entry};
use tracing::{info_span, warn, Instrument as _};

use crate::{
    activation::{self, NON_INTERACTIVE},
    containers::reconcile_containers,
    context::RunContext,
    draft::get_draft,
    equivalence::versions_equal,
    reconcile::{reconcile, reconcile_director_backends, reconcile_settings, ReconcileOutcome},
};

#[derive(clap::Parser, Debug, Clone)]
pub(crate) struct Args {
    /// Names of the services to push
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    pub services: Vec<String>,

    /// Push every service named in the config file
    #[arg(long)]
    pub all: bool,

    /// Reconcile and validate, but don't activate
    #[arg(long)]
    pub noop: bool,
}

/// Run the `push` command.
pub(crate) async fn push(ctx: &mut RunContext<'_>, args: &Args) -> Result<()> {
    if !ctx.options.assume_yes && !args.noop && !ctx.terminal.is_interactive() {
        bail!(NON_INTERACTIVE);
    }

    for name in &args.services {
        if !ctx.config.contains(name) {
            warn!("Service {} is not in the config file, skipping", name);
        }
    }

    let services: Vec<Service> = ctx
        .api
        .list_services()
        .await
        .context("listing services")?
        .into_iter()
        .filter(|s| ctx.config.contains(&s.name))
        .filter(|s| args.all || args.services.contains(&s.name))
        .collect();
    if services.is_empty() {
        bail!("no matching services could be found to be synced");
    }

    for service in &services {
        ctx.terminal.say(&format!("Syncing {}", service.name));
        sync_service(ctx, service, args.noop)
            .instrument(info_span!("service", name = %service.name))
            .await?;
    }
    Ok(())
}

/// Reconcile every category of one service into its draft, then hand the
/// draft to the activation gate if it changes anything.
async fn sync_service(ctx: &mut RunContext<'_>, service: &Service, noop: bool) -> Result<()> {
    let config = ctx
        .config
        .service(&service.name)
        .ok_or_else(|| anyhow!("service {} is not in the config file", service.name))?;
    let desired = normalize(
        &service.name,
        config,
        ctx.config.base_dir(),
        &ctx.options.s3,
    )
    .with_context(|| format!("reading config for service {}", service.name))?;

    // Any mutation forces activation, even when the rendered diff hides it.
    let mut forced = false;
    forced |= sync_containers(ctx, service, &desired.dictionaries)
        .await?
        .changed();
    forced |= sync_containers(ctx, service, &desired.acls)
        .await?
        .changed();
    forced |= sync_category(ctx, service, &desired.conditions)
        .await?
        .changed();
    forced |= sync_category(ctx, service, &desired.healthchecks)
        .await?
        .changed();
    forced |= sync_category(ctx, service, &desired.cache_settings)
        .await?
        .changed();
    forced |= sync_category(ctx, service, &desired.response_objects)
        .await?
        .changed();
    forced |= sync_category(ctx, service, &desired.request_settings)
        .await?
        .changed();
    forced |= sync_category(ctx, service, &desired.backends)
        .await?
        .changed();
    forced |= sync_category(ctx, service, &desired.headers)
        .await?
        .changed();
    forced |= sync_category(ctx, service, &desired.syslogs)
        .await?
        .changed();
    forced |= sync_category(ctx, service, &desired.papertrails)
        .await?
        .changed();
    forced |= sync_category(ctx, service, &desired.sumologics)
        .await?
        .changed();
    forced |= sync_category(ctx, service, &desired.ftps)
        .await?
        .changed();
    forced |= sync_category(ctx, service, &desired.gcss)
        .await?
        .changed();
    forced |= sync_category(ctx, service, &desired.s3s)
        .await?
        .changed();
    forced |= sync_category(ctx, service, &desired.domains)
        .await?
        .changed();
    forced |= async {
        let draft = get_draft(ctx.api, &mut ctx.drafts, service).await?;
        reconcile_settings(ctx.api, service, &draft, desired.settings.as_ref()).await
    }
    .instrument(info_span!("category", kind = "settings"))
    .await
    .with_context(|| format!("syncing settings for service {}", service.name))?;
    forced |= sync_category(ctx, service, &desired.gzips)
        .await?
        .changed();
    forced |= sync_category(ctx, service, &desired.vcls)
        .await?
        .changed();
    // Directors refer to backends, and deleting a director drops its
    // mappings, so mappings go last.
    forced |= sync_category(ctx, service, &desired.directors)
        .await?
        .changed();
    forced |= sync_director_backends(ctx, service, &desired.director_backends)
        .await?
        .changed();

    let draft = get_draft(ctx.api, &mut ctx.drafts, service).await?;
    let active = service.active_version()?;
    let equal = versions_equal(ctx.api, service, active, draft.number)
        .await
        .with_context(|| format!("comparing versions of service {}", service.name))?;
    if equal && !forced {
        ctx.terminal
            .say(&format!("No changes for service {}", service.name));
        ctx.drafts.remove(&service.id);
        return Ok(());
    }

    if noop {
        activation::validate(ctx.api, ctx.terminal, service, draft.number).await?;
        ctx.terminal.say(&format!(
            "Not activating version {} for {} (--noop)",
            draft.number, service.name
        ));
        return Ok(());
    }
    activation::activate(
        ctx.api,
        ctx.terminal,
        ctx.options.assume_yes,
        service,
        &draft,
    )
    .await
    .with_context(|| format!("activating service {}", service.name))?;
    Ok(())
}

async fn sync_category<T: ConfigObject>(
    ctx: &mut RunContext<'_>,
    service: &Service,
    desired: &[Entry<T>],
) -> Result<ReconcileOutcome> {
    async {
        let draft = get_draft(ctx.api, &mut ctx.drafts, service).await?;
        reconcile(ctx.api, service, &draft, desired).await
    }
    .instrument(info_span!("category", kind = %T::KIND))
    .await
    .with_context(|| format!("syncing {} for service {}", T::KIND.plural(), service.name))
}

async fn sync_containers<T: ConfigObject>(
    ctx: &mut RunContext<'_>,
    service: &Service,
    desired: &[Entry<T>],
) -> Result<ReconcileOutcome> {
    async {
        let draft = get_draft(ctx.api, &mut ctx.drafts, service).await?;
        reconcile_containers(ctx.api, service, &draft, desired).await
    }
    .instrument(info_span!("category", kind = %T::KIND))
    .await
    .with_context(|| format!("syncing {} for service {}", T::KIND.plural(), service.name))
}

async fn sync_director_backends(
    ctx: &mut RunContext<'_>,
    service: &Service,
    desired: &[DirectorBackend],
) -> Result<ReconcileOutcome> {
    async {
        let draft = get_draft(ctx.api, &mut ctx.drafts, service).await?;
        reconcile_director_backends(ctx.api, service, &draft, desired).await
    }
    .instrument(info_span!("category", kind = "director backend"))
    .await
    .with_context(|| format!("syncing director backends for service {}", service.name))
}
