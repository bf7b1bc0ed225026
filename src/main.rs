use tracing::info;
use tracing_subscriber::EnvFilter;

mod args;
mod audio;
mod coding;
mod config;
mod error;
mod misc;
mod modules;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let module = args::parse_args()?;
    info!("Running module `{}`", module.name());
    module.run()
}
