use std::{net::IpAddr, str::FromStr};

use anyhow::{anyhow, bail, Result};
use cdnsync_api::{
    client,
    schema::{Acl, AclEntry},
    ConfigApi,
};

use super::active_container;
use crate::activation::Terminal;

/// An address with an optional prefix length, as in `192.0.2.0/24`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IpMask {
    pub ip: String,
    pub subnet: Option<u32>,
}

impl FromStr for IpMask {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (ip, subnet) = match s.split_once('/') {
            Some((ip, mask)) => (ip, Some(mask)),
            None => (s, None),
        };
        let addr: IpAddr = ip
            .parse()
            .map_err(|_| anyhow!("invalid IP address: {}", ip))?;
        let max = if addr.is_ipv4() { 32 } else { 128 };
        let subnet = subnet
            .map(|mask| match mask.parse::<u32>() {
                Ok(n) if n <= max => Ok(n),
                _ => Err(anyhow!("invalid mask for {}: {}", ip, mask)),
            })
            .transpose()?;
        Ok(IpMask {
            ip: ip.to_string(),
            subnet,
        })
    }
}

#[derive(clap::Subcommand, Debug)]
pub(crate) enum Command {
    /// List the ACLs of a service's active version
    List {
        /// Service name
        service: String,
    },
    /// List the entries of an ACL
    EntryLs {
        /// Service name
        service: String,
        /// ACL name
        acl: String,
    },
    /// Add an entry to an ACL
    EntryAdd {
        /// Service name
        service: String,
        /// ACL name
        acl: String,
        /// Address, optionally with a prefix length
        #[arg(value_name = "IP[/MASK]")]
        ip: IpMask,
        #[arg(long, default_value = "")]
        comment: String,
        /// Match every address except this one
        #[arg(long)]
        negated: bool,
    },
    /// Remove an entry from an ACL
    EntryRm {
        /// Service name
        service: String,
        /// ACL name
        acl: String,
        /// Address, optionally with a prefix length
        #[arg(value_name = "IP[/MASK]")]
        ip: IpMask,
    },
}

async fn acl_id(api: &dyn ConfigApi, service: &str, acl: &str) -> Result<(String, String)> {
    let (service, id) = active_container::<Acl>(api, service, acl, |a| a.id.clone()).await?;
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
            let acls: Vec<Acl> = client::list(api, &service.id, active).await?;
            terminal.say(&format!("ACLs for {}:\n", service.name));
            for a in acls {
                terminal.say(&a.name);
            }
        }
        Command::EntryLs { service, acl } => {
            let (service_id, id) = acl_id(api, service, acl).await?;
            let entries = api.list_acl_entries(&service_id, &id).await?;
            terminal.say(&format!(
                "Entries in acl {} for service {}:\n",
                acl, service
            ));
            for e in entries {
                terminal.say(&format!(
                    "{} {} {} {}",
                    e.ip,
                    e.subnet.map(|s| s.to_string()).unwrap_or_default(),
                    e.negated,
                    e.comment
                ));
            }
        }
        Command::EntryAdd {
            service,
            acl,
            ip,
            comment,
            negated,
        } => {
            let (service_id, id) = acl_id(api, service, acl).await?;
            let entry = AclEntry {
                ip: ip.ip.clone(),
                subnet: ip.subnet,
                comment: comment.clone(),
                negated: *negated,
                ..Default::default()
            };
            api.create_acl_entry(&service_id, &id, &entry).await?;
            terminal.say(&format!("Added {} to acl {}", ip.ip, acl));
        }
        Command::EntryRm { service, acl, ip } => {
            let (service_id, id) = acl_id(api, service, acl).await?;
            let entries = api.list_acl_entries(&service_id, &id).await?;
            let Some(entry_id) = entries
                .into_iter()
                .find(|e| e.ip == ip.ip && e.subnet == ip.subnet)
                .and_then(|e| e.id)
            else {
                bail!("Unable to find ACL entry");
            };
            api.delete_acl_entry(&service_id, &id, &entry_id).await?;
            terminal.say(&format!("Removed {} from acl {}", ip.ip, acl));
        }
    }
    Ok(())
}
