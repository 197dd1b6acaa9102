mod activation;
mod application;
mod commands;
mod containers;
mod context;
mod draft;
mod equivalence;
mod logging;
mod options;
mod push;
mod reconcile;
#[cfg(test)]
mod testing;

use activation::Console;
use anyhow::Result;
use application::{handle_result, runtime};
use clap::{CommandFactory as _, Parser, Subcommand};
use commands::{acl, ban, dictionary, service, version};
use context::RunContext;
use options::Options;

fn main() {
    let args = Args::parse();
    handle_result(run_args(args));
}

fn run_args(args: Args) -> Result<()> {
    let _logging = logging::set_up(logging::Options {
        verbose: args.options.debug,
        color: args.options.use_color(),
    })?;
    let options = &args.options;
    match &args.command {
        Commands::Push(subargs) => {
            let config = application::load_config(options)?;
            let api = application::api(options)?;
            let mut console = Console::new(options.is_interactive());
            let mut ctx = RunContext::new(
                &api,
                &mut console,
                config,
                application::run_options(options),
            );
            runtime().block_on(push::push(&mut ctx, subargs))
        }
        Commands::Service(sub) => {
            let api = application::api(options)?;
            let mut console = Console::new(options.is_interactive());
            runtime().block_on(service::run(&api, &mut console, sub))
        }
        Commands::Version(sub) => {
            let api = application::api(options)?;
            let mut console = Console::new(options.is_interactive());
            runtime().block_on(version::run(&api, &mut console, options.assume_yes, sub))
        }
        Commands::Dictionary(sub) => {
            let api = application::api(options)?;
            let mut console = Console::new(options.is_interactive());
            runtime().block_on(dictionary::run(&api, &mut console, sub))
        }
        Commands::Acl(sub) => {
            let api = application::api(options)?;
            let mut console = Console::new(options.is_interactive());
            runtime().block_on(acl::run(&api, &mut console, sub))
        }
        Commands::Ban(sub) => {
            let api = application::api(options)?;
            let mut console = Console::new(options.is_interactive());
            runtime().block_on(ban::run(&api, &mut console, sub))
        }
        Commands::GenerateMan => (|| {
            let cmd = Args::command();
            let man = clap_mangen::Man::new(cmd);
            let mut buffer: Vec<u8> = Default::default();
            man.render(&mut buffer)?;
            println!("{}", String::from_utf8(buffer)?);
            Ok(())
        })(),
        Commands::GenerateMarkdown => {
            let opts = clap_markdown::MarkdownOptions::new().show_footer(false);
            let markdown: String = clap_markdown::help_markdown_custom::<Args>(&opts);
            println!("{}", markdown);
            Ok(())
        }
        Commands::GenerateCompletion { shell } => {
            let mut cmd = Args::command();
            clap_complete::generate(*shell, &mut cmd, "cdnsync", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// cdnsync: push declarative CDN service configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    options: Options,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Make services match the config file and activate the result
    #[command()]
    Push(push::Args),

    /// Inspect services
    #[command(subcommand)]
    Service(service::Command),

    /// Inspect, validate and activate versions
    #[command(subcommand)]
    Version(version::Command),

    /// Manage dictionary items, which are not versioned
    #[command(subcommand)]
    Dictionary(dictionary::Command),

    /// Manage ACL entries, which are not versioned
    #[command(subcommand)]
    Acl(acl::Command),

    /// Ban client addresses through an edge dictionary
    Ban(ban::Args),

    /// Generate markdown documentation for cdnsync
    #[command(hide = true)]
    GenerateMarkdown,

    /// Generate a manpage for cdnsync
    #[command(hide = true)]
    GenerateMan,

    /// Generate shell completion for cdnsync
    #[command(hide = true)]
    GenerateCompletion {
        /// The shell to generate completion for
        #[arg(long)]
        shell: clap_complete::Shell,
    },
}
