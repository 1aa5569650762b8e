use crate::error::MedelError;
use crate::medel::config;
use crate::medel::generate;
use crate::medel::notify::ExpoSender;
use crate::medel::pipeline::{self, PipelineDeps};
use crate::medel::registry::ProviderRegistry;
use crate::medel::rng::ThreadRngPicker;
use crate::medel::store::FileStore;
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "medel", version, about = "Daily motivational push notification from a model")]
pub struct Cli {
    /// Provider key to generate with.
    #[arg(long, default_value = "gpt")]
    pub model: String,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Resolve the provider before touching config, store, or network so a
    // bad key fails with zero downstream calls.
    let registry = ProviderRegistry::builtin();
    let provider = registry.resolve(&cli.model)?;
    info!(model = provider.key, "using provider");

    let config = config::load()?;
    let completion = generate::backend_for(provider).map_err(MedelError::Generation)?;
    let store = FileStore::new(config.store_dir.clone());
    let sender = ExpoSender::new(&config.gateway_url).context("failed to build push client")?;
    let mut picker = ThreadRngPicker;

    let report = pipeline::run(PipelineDeps {
        config: &config,
        provider,
        completion: completion.as_ref(),
        store: &store,
        sender: &sender,
        picker: &mut picker,
    })?;

    info!(
        id = report.id,
        provider = %report.provider,
        message = %report.message,
        "daily message delivered"
    );
    Ok(())
}
