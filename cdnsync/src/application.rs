use crate::context::RunOptions;
use crate::options::Options;
use anyhow::{Context, Result};
use cdnsync_api::{http::DEFAULT_BASE_URL, HttpApi};
use cdnsync_core::{load::load_file, normalize::S3Credentials, DesiredConfig};
use std::process::exit;

/// Create the single-threaded tokio runtime used by the CLI.
///
/// Panics if the runtime cannot be created.
pub fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to initialize tokio runtime")
}

/// Handle a Result, printing the error and exiting with code 1 on failure.
pub fn handle_result(r: Result<()>) {
    match r {
        Ok(()) => {}
        Err(e) => {
            eprintln!("cdnsync error: {:?}", e);
            exit(1);
        }
    }
}

/// Build the API client from the global options.
pub fn api(options: &Options) -> Result<HttpApi> {
    let cwd = std::env::current_dir().context("getting current directory")?;
    let key = options.api_key(&cwd)?;
    let base_url = options.api_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
    Ok(HttpApi::new(base_url, &key)?)
}

pub fn load_config(options: &Options) -> Result<DesiredConfig> {
    load_file(&options.config)
        .with_context(|| format!("loading config file {}", options.config.display()))
}

pub(crate) fn run_options(options: &Options) -> RunOptions {
    RunOptions {
        assume_yes: options.assume_yes,
        s3: S3Credentials {
            access_key: options.s3_access_key.clone(),
            secret_key: options.s3_secret_key.clone(),
        },
    }
}
