//! Banning client addresses through an edge dictionary that the service's
//! VCL consults. Items are not versioned, so changes apply immediately.

use std::net::IpAddr;

use anyhow::{Context as _, Result};
use cdnsync_api::{
    client,
    schema::{Dictionary, DictionaryItem, Service},
    ConfigApi,
};
use tracing::debug;

use crate::activation::Terminal;

pub(crate) const DEFAULT_DICTIONARY: &str = "banned_ips";

/// Stored as the item value when no comment is given.
const NO_COMMENT: &str = "1";

#[derive(clap::Args, Debug)]
pub(crate) struct Args {
    /// Dictionary that holds the banned addresses
    #[arg(short = 'D', long, global = true, default_value = DEFAULT_DICTIONARY)]
    pub dictionary: String,

    /// Service to change; every service when not given
    #[arg(short = 's', long = "service", global = true)]
    pub services: Vec<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub(crate) enum Command {
    /// List the banned addresses
    Ls,
    /// Ban addresses
    Add {
        #[arg(required = true, value_name = "ADDRESS")]
        addresses: Vec<IpAddr>,
        /// Stored alongside each address
        #[arg(long)]
        comment: Option<String>,
    },
    /// Lift bans
    Rm {
        #[arg(required = true, value_name = "ADDRESS")]
        addresses: Vec<IpAddr>,
    },
}

async fn target_services(api: &dyn ConfigApi, names: &[String]) -> Result<Vec<Service>> {
    if names.is_empty() {
        return api.list_services().await.context("listing services");
    }
    let mut services = Vec::new();
    for name in names {
        let service = api
            .search_service(name)
            .await
            .with_context(|| format!("looking up service {}", name))?;
        services.push(service);
    }
    Ok(services)
}

async fn dictionary_id(api: &dyn ConfigApi, service: &Service, name: &str) -> Option<String> {
    let active = service.active_version().ok()?;
    match client::get::<Dictionary>(api, &service.id, active, name).await {
        Ok(d) => d.id,
        Err(e) => {
            debug!("fetching dictionary {} of {}: {}", name, service.name, e);
            None
        }
    }
}

pub(crate) async fn run(api: &dyn ConfigApi, terminal: &mut dyn Terminal, args: &Args) -> Result<()> {
    let dictionary = args.dictionary.as_str();
    for service in target_services(api, &args.services).await? {
        let Some(id) = dictionary_id(api, &service, dictionary).await else {
            terminal.say(&format!(
                "Unable to fetch dictionary {} on service {}. Skipping",
                dictionary, service.name
            ));
            continue;
        };

        match &args.command {
            Command::Ls => {
                let items = api
                    .list_dictionary_items(&service.id, &id)
                    .await
                    .with_context(|| format!("listing {} on service {}", dictionary, service.name))?;
                terminal.say(&format!("Banned IP addresses for service {}:\n", service.name));
                for item in items {
                    terminal.say(&format!("{} {}", item.item_key, item.item_value));
                }
                terminal.say("");
            }
            Command::Add { addresses, comment } => {
                let value = comment
                    .as_deref()
                    .filter(|c| !c.is_empty())
                    .unwrap_or(NO_COMMENT);
                for address in addresses {
                    let item = DictionaryItem {
                        item_key: address.to_string(),
                        item_value: value.to_string(),
                        ..Default::default()
                    };
                    api.create_dictionary_item(&service.id, &id, &item)
                        .await
                        .with_context(|| {
                            format!("adding {} to {} on service {}", address, dictionary, service.name)
                        })?;
                    terminal.say(&format!(
                        "Added address {} to dictionary {} on service {}",
                        address, dictionary, service.name
                    ));
                }
            }
            Command::Rm { addresses } => {
                for address in addresses {
                    let key = address.to_string();
                    match api.delete_dictionary_item(&service.id, &id, &key).await {
                        Ok(()) => terminal.say(&format!(
                            "Removed address {} from dictionary {} on service {}",
                            address, dictionary, service.name
                        )),
                        Err(e) if e.is_not_found() => terminal.say(&format!(
                            "IP {} not found in dictionary {} on service {}. Skipping",
                            address, dictionary, service.name
                        )),
                        Err(e) => {
                            return Err(e).with_context(|| {
                                format!(
                                    "removing {} from {} on service {}",
                                    address, dictionary, service.name
                                )
                            })
                        }
                    }
                }
            }
        }
    }
    Ok(())
}
