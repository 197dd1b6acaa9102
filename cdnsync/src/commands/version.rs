use anyhow::{anyhow, bail, Context as _, Result};
use cdnsync_api::ConfigApi;

use crate::activation::{self, Terminal};

#[derive(clap::Subcommand, Debug)]
pub(crate) enum Command {
    /// List the versions of a service
    List {
        /// Service name
        service: String,
    },
    /// Check a version for errors without activating it
    Validate {
        /// Service name
        service: String,
        /// Version number
        version: u32,
    },
    /// Validate and activate a version
    Activate {
        /// Service name
        service: String,
        /// Version number
        version: u32,
    },
}

pub(crate) async fn run(
    api: &dyn ConfigApi,
    terminal: &mut dyn Terminal,
    assume_yes: bool,
    command: &Command,
) -> Result<()> {
    match command {
        Command::List { service } => {
            let service = api.search_service(service).await?;
            let versions = api.list_versions(&service.id).await?;
            terminal.say(&format!("Versions for {}:\n", service.name));
            terminal.say(&format!(
                "{:>5} {:<27} {:<27} {}",
                "ID", "Created", "Updated", "Comment"
            ));
            for v in versions {
                terminal.say(&format!(
                    "{:>2} {:>4} {:<27} {:<27} {}",
                    if v.active { "*" } else { "" },
                    v.number,
                    v.created_at.as_deref().unwrap_or_default(),
                    v.updated_at.as_deref().unwrap_or_default(),
                    v.comment
                ));
            }
            Ok(())
        }
        Command::Validate { service, version } => {
            let service = api.search_service(service).await?;
            activation::validate(api, terminal, &service, *version).await
        }
        Command::Activate { service, version } => {
            let service = api.search_service(service).await?;
            let target = api
                .list_versions(&service.id)
                .await?
                .into_iter()
                .find(|v| v.number == *version)
                .ok_or_else(|| {
                    anyhow!("version {} not found for service {}", version, service.name)
                })?;
            if target.active {
                bail!(
                    "version {} is already active for service {}",
                    version,
                    service.name
                );
            }
            activation::activate(api, terminal, assume_yes, &service, &target)
                .await
                .with_context(|| format!("activating service {}", service.name))?;
            Ok(())
        }
    }
}
