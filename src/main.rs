use anyhow::Result;
use clap::Parser;
use longscribe::app::{
    init_logging, load_config, run_config_command, run_info_command, run_transcribe_command,
};
use longscribe::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Transcribe(args) => run_transcribe_command(config, args).await?,
        Commands::Info => run_info_command(&config)?,
        Commands::Config { action } => run_config_command(action, &config)?,
    }

    Ok(())
}
