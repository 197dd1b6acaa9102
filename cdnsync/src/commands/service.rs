use anyhow::Result;
use cdnsync_api::ConfigApi;

use crate::activation::Terminal;

#[derive(clap::Subcommand, Debug)]
pub(crate) enum Command {
    /// List the services of the account
    List {},
}

pub(crate) async fn run(
    api: &dyn ConfigApi,
    terminal: &mut dyn Terminal,
    command: &Command,
) -> Result<()> {
    match command {
        Command::List {} => {
            let services = api.list_services().await?;
            terminal.say(&format!("{:>25} {:>8}  {}", "ID", "Version", "Name"));
            for s in services {
                terminal.say(&format!("{:>25} {:>8}  {}", s.id, s.version, s.name));
            }
            Ok(())
        }
    }
}
