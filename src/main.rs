mod cli;
mod config;
mod error;
mod netbox;
mod openconfig;
mod repo;
mod repofile;
mod services;
mod synth;
mod utils;

#[cfg(test)]
mod testutil;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Args;
use config::Config;
use netbox::NetBoxClient;
use repo::{GitLabClient, RepoService};
use services::config_gen;
use synth::SynthOptions;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // A local .env is optional
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "netbox_oc_synth=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config_types = match args.validate() {
        Ok(config_types) => config_types,
        Err(message) => {
            println!("{}", message);
            return Ok(());
        }
    };

    let cfg = Config::load()?;
    let opts = SynthOptions {
        config_types,
        filter: args.filter.clone(),
        auto_desc: !args.explicit_descriptions,
        category_tags: cfg.category_tags.clone(),
        vlan_key: args.vlan_key,
    };
    tracing::info!("NetBox: {}", cfg.sot_url);
    tracing::info!("Repository: {} project {}", cfg.repo_url, cfg.repo_project_id);

    let sot = NetBoxClient::new(cfg.sot_url.clone(), cfg.sot_token.clone(), cfg.http_timeout)?;
    let gitlab = GitLabClient::new(&cfg.repo_url, &cfg.repo_project_id, cfg.repo_token.clone(), cfg.http_timeout)?;

    let listing: Vec<String> = gitlab.list_files().await.into_iter().map(|e| e.path).collect();
    tracing::info!("Repository lists {} paths", listing.len());

    let files = config_gen::generate(&sot, &args.devices, &listing, &opts, args.interface_layout).await?;

    if args.stdout {
        for (path, content) in config_gen::render(&files, args.output_format)? {
            tracing::info!("{}", path);
            println!("{}", content);
        }
        return Ok(());
    }

    let branch = args.branch.clone().unwrap_or_else(repo::default_branch_name);
    let outcome = config_gen::commit(&gitlab, &files, &listing, args.output_format, &cfg.author(), &branch).await?;
    println!("{}", outcome);
    Ok(())
}
