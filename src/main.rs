// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use bwb_clean::utils::logging::{format_info, format_success, format_warning};
use bwb_clean::{
    Config, EnvCredentials, HfHubClient, HubRowStream, NoopHub, PipelineRunner, RecordSource,
    RunOptions,
};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "bwb_clean")]
#[command(version = "0.1.0")]
#[command(about = "Strips XML markup from the Basiswettenbestand dataset and republishes it", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream, clean, shard, and upload the dataset
    Run {
        #[arg(long, value_name = "NUM")]
        limit: Option<usize>,

        /// Write shards locally without touching the hub
        #[arg(long)]
        skip_upload: bool,
    },

    /// Check credentials, source reachability, and the target repository
    Verify,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    bwb_clean::utils::logging::init_logger(cli.color, cli.verbose);

    info!("Basiswettenbestand cleaning pipeline");
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    match cli.command {
        Commands::Run { limit, skip_upload } => {
            cmd_run(&config, limit, skip_upload, cli.color).await?;
        }
        Commands::Verify => {
            cmd_verify(&config).await?;
        }
    }

    Ok(())
}

async fn cmd_run(
    config: &Config,
    limit: Option<usize>,
    skip_upload: bool,
    colored: bool,
) -> Result<()> {
    let mut source = HubRowStream::new(&config.source);
    let options = RunOptions { limit, colored };

    let stats = if skip_upload {
        info!("Upload disabled, shards are written locally only");
        let mut local = config.clone();
        local.pipeline.keep_local = true;
        if local.pipeline.work_dir.is_none() {
            local.pipeline.work_dir = Some(PathBuf::from("./shards"));
        }
        let work_dir = local.pipeline.work_dir.clone();

        let stats = PipelineRunner::new(local)
            .run(&mut source, &NoopHub, &options)
            .await
            .context("Pipeline run failed")?;

        if let Some(dir) = work_dir {
            println!("{}", format_info(&format!("Shards kept in {}", dir.display())));
        }
        stats
    } else {
        let credentials = EnvCredentials::new(&config.target.token_env);
        let client = HfHubClient::new(&config.target.hub_endpoint, &credentials);

        if client.is_authenticated() {
            if let Some(account) = client.verify_token().await.context("Token check failed")? {
                info!("Authenticated as {}", account);
            }
        } else {
            info!(
                "No token in ${}; assuming the target allows anonymous writes",
                config.target.token_env
            );
        }

        PipelineRunner::new(config.clone())
            .run(&mut source, &client, &options)
            .await
            .context("Pipeline run failed")?
    };

    println!(
        "{}",
        format_success(&format!(
            "Cleaned {} records into {} shards ({} filtered out)",
            stats.records_cleaned, stats.shards_uploaded, stats.records_filtered
        ))
    );

    Ok(())
}

async fn cmd_verify(config: &Config) -> Result<()> {
    let credentials = EnvCredentials::new(&config.target.token_env);
    let client = HfHubClient::new(&config.target.hub_endpoint, &credentials);

    match client.verify_token().await {
        Ok(Some(account)) => {
            println!("{}", format_success(&format!("Token valid for {account}")));
        }
        Ok(None) => {
            println!(
                "{}",
                format_info(&format!(
                    "No token in ${}; uploads will be anonymous",
                    config.target.token_env
                ))
            );
        }
        Err(e) => {
            println!("{}", format_warning(&format!("Token check failed: {e}")));
        }
    }

    let mut probe = config.source.clone();
    probe.page_size = 1;
    let mut stream = HubRowStream::new(&probe);
    match stream.next_record().await {
        Ok(Some(_)) => {
            let total = stream
                .size_hint()
                .map(|n| format!("{n} rows"))
                .unwrap_or_else(|| "row count unknown".to_string());
            println!(
                "{}",
                format_success(&format!(
                    "Source dataset {} reachable ({total})",
                    config.source.dataset
                ))
            );
        }
        Ok(None) => {
            println!(
                "{}",
                format_warning(&format!("Source dataset {} is empty", config.source.dataset))
            );
        }
        Err(e) => {
            println!("{}", format_warning(&format!("Source check failed: {e}")));
        }
    }

    match client.repo_exists(&config.target.dataset).await {
        Ok(true) => {
            println!(
                "{}",
                format_success(&format!(
                    "Target repository {} exists",
                    config.target.dataset
                ))
            );
        }
        Ok(false) => {
            println!(
                "{}",
                format_info(&format!(
                    "Target repository {} will be created on first run",
                    config.target.dataset
                ))
            );
        }
        Err(e) => {
            println!("{}", format_warning(&format!("Target check failed: {e}")));
        }
    }

    Ok(())
}
