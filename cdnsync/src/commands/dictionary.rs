use anyhow::Result;
use cdnsync_api::{
    client,
    schema::{Dictionary, DictionaryItem},
    ConfigApi,
};

use super::active_container;
use crate::activation::Terminal;

#[derive(clap::Subcommand, Debug)]
pub(crate) enum Command {
    /// List the dictionaries of a service's active version
    List {
        /// Service name
        service: String,
    },
    /// List the items of a dictionary
    ItemLs {
        /// Service name
        service: String,
        /// Dictionary name
        dictionary: String,
    },
    /// Add an item to a dictionary, replacing any item with the same key
    ItemAdd {
        /// Service name
        service: String,
        /// Dictionary name
        dictionary: String,
        key: String,
        value: String,
    },
    /// Remove an item from a dictionary
    ItemRm {
        /// Service name
        service: String,
        /// Dictionary name
        dictionary: String,
        key: String,
    },
}

async fn dictionary_id(
    api: &dyn ConfigApi,
    service: &str,
    dictionary: &str,
) -> Result<(String, String)> {
    let (service, id) =
        active_container::<Dictionary>(api, service, dictionary, |d| d.id.clone()).await?;
    Ok((service.id, id))
}

pub(crate) async fn run(
    api: &dyn ConfigApi,
    terminal: &mut dyn Terminal,
    command: &Command,
) -> Result<()> {
    match command {
        Command::List { service } => {
            let service = api.search_service(service).await?;
            let active = service.active_version()?;
            let dictionaries: Vec<Dictionary> = client::list(api, &service.id, active).await?;
            terminal.say(&format!("Dictionaries for {}:\n", service.name));
            for d in dictionaries {
                terminal.say(&d.name);
            }
        }
        Command::ItemLs {
            service,
            dictionary,
        } => {
            let (service_id, id) = dictionary_id(api, service, dictionary).await?;
            let items = api.list_dictionary_items(&service_id, &id).await?;
            terminal.say(&format!(
                "Items in dictionary {} for service {}:\n",
                dictionary, service
            ));
            for item in items {
                terminal.say(&format!("{} {}", item.item_key, item.item_value));
            }
        }
        Command::ItemAdd {
            service,
            dictionary,
            key,
            value,
        } => {
            let (service_id, id) = dictionary_id(api, service, dictionary).await?;
            let item = DictionaryItem {
                item_key: key.clone(),
                item_value: value.clone(),
                ..Default::default()
            };
            api.create_dictionary_item(&service_id, &id, &item).await?;
            terminal.say(&format!("Added {} to dictionary {}", key, dictionary));
        }
        Command::ItemRm {
            service,
            dictionary,
            key,
        } => {
            let (service_id, id) = dictionary_id(api, service, dictionary).await?;
            api.delete_dictionary_item(&service_id, &id, key).await?;
            terminal.say(&format!("Removed {} from dictionary {}", key, dictionary));
        }
    }
    Ok(())
}
