use clap::Parser;
use job_tracker::cli::{Cli, Commands};
use job_tracker::{Config, run};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.command() == Commands::Init {
        let path = cli.config.unwrap_or_else(Config::default_config_path);
        if Config::create_default_if_missing(&path)? {
            println!("Wrote default configuration to {}", path.display());
        } else {
            println!("{} already exists, leaving it untouched", path.display());
        }
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?;
    let worker_threads = config.general.worker_threads;

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();

    if worker_threads > 0 {
        builder.worker_threads(worker_threads);
    }

    let runtime = builder.build()?;
    runtime.block_on(run(config))
}
