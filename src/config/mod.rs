use crate::config::cli::Args;
use crate::error::{DevlogError, Result};
use crate::infrastructure::{FeedClient, FeedSource};
use crate::render::{LinkMode, ListStyle, RenderOptions, Shell};
use crate::services::viewer::ViewerService;
use clap::Parser;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::info;

pub mod cli;

pub struct Config {
    pub args: Args,
    pub feed_source: FeedSource,
    pub http_client: Client,
}

impl Config {
    pub fn new() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    pub fn from_args(args: Args) -> Result<Self> {
        let feed_source = FeedSource::parse(&args.feed)?;

        let mut builder = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = args.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder.build()?;

        Ok(Self {
            args,
            feed_source,
            http_client,
        })
    }

    pub fn render_options(&self) -> Result<RenderOptions> {
        let image_base = self
            .args
            .image_base
            .as_deref()
            .map(|base| {
                Url::parse(base)
                    .map_err(|e| DevlogError::Other(format!("Invalid image base {base}: {e}")))
            })
            .transpose()?;

        Ok(RenderOptions {
            list_style: if self.args.bullets {
                ListStyle::Bullets
            } else {
                ListStyle::Lines
            },
            image_base,
            links: LinkMode::Fragment,
        })
    }

    pub async fn shell(&self) -> Result<Shell> {
        match &self.args.shell {
            Some(path) => {
                info!("Using page shell {:?}", path);
                Shell::from_file(path).await
            }
            None => Ok(Shell::default()),
        }
    }

    pub async fn viewer_service(&self) -> Result<ViewerService> {
        let feed = FeedClient::new(self.http_client.clone(), self.feed_source.clone());
        Ok(ViewerService::new(feed, self.shell().await?, self.render_options()?))
    }
}
