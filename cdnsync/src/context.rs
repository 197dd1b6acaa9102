use cdnsync_api::ConfigApi;
use cdnsync_core::{normalize::S3Credentials, DesiredConfig};

use crate::{activation::Terminal, draft::DraftRegistry};

/// Settings of a push that don't change between services.
#[derive(Debug, Clone, Default)]
pub(crate) struct RunOptions {
    pub assume_yes: bool,
    pub s3: S3Credentials,
}

/// Everything a push needs, constructed once per invocation.
pub(crate) struct RunContext<'a> {
    pub api: &'a dyn ConfigApi,
    pub terminal: &'a mut dyn Terminal,
    pub drafts: DraftRegistry,
    pub config: DesiredConfig,
    pub options: RunOptions,
}

impl<'a> RunContext<'a> {
    pub(crate) fn new(
        api: &'a dyn ConfigApi,
        terminal: &'a mut dyn Terminal,
        config: DesiredConfig,
        options: RunOptions,
    ) -> Self {
        Self {
            api,
            terminal,
            drafts: DraftRegistry::default(),
            config,
            options,
        }
    }
}
