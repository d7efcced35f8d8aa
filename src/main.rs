use anyhow::Context;
use citylookup::{cli, config, geocoder, pipeline};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            input,
            output,
            table,
            region,
            delay_ms,
            timeout,
            limit,
            reject_mismatches,
            no_progress,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(table) = table {
                config.table.name = table;
            }
            if let Some(region) = region {
                config.search.region = region;
            }
            if let Some(delay_ms) = delay_ms {
                config.search.request_delay_ms = delay_ms;
            }
            if let Some(timeout) = timeout {
                config.search.timeout_seconds = timeout;
            }
            if reject_mismatches {
                config.validation.reject_mismatches = true;
            }

            println!("🌎 citylookup - 緯度経度付加\n");
            println!(
                "緯度経度を検索中... (地域: {}, 間隔: {}ms)",
                config.search.region, config.search.request_delay_ms
            );

            let client = geocoder::NominatimClient::new(&config)?;
            let progress = (!no_progress).then(progress_bar);

            let result =
                pipeline::run(&config, &input, &output, limit, &client, progress.as_ref()).await;
            if let Some(pb) = &progress {
                pb.finish_and_clear();
            }
            let stats = result?;

            println!(
                "✔ 検索完了: {}件中 {}件取得 / 未取得 {}件（失敗 {}件、チェック不一致 {}件）",
                stats.rows,
                stats.found,
                stats.not_found(),
                stats.failed,
                stats.mismatched + stats.rejected
            );
            println!("✔ SQL出力: {}", output.display());

            println!("\n✅ 完了");
        }

        Commands::Check => {
            let config = load_config(cli.config.as_deref())?;
            print!("{}", config.describe_columns()?);
            println!("\n✔ 設定は有効です");
        }

        Commands::Config { init, force, show } => {
            if init {
                let path = match &cli.config {
                    Some(p) => p.clone(),
                    None => Config::config_path()?,
                };
                if Config::init_file(&path, force)? {
                    println!("✔ 設定ファイルを作成しました: {}", path.display());
                } else {
                    println!("設定ファイルが既に存在します: {}（--force で上書き）", path.display());
                }
            }

            if show || !init {
                let config = load_config(cli.config.as_deref())?;
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    Config::load(path).context("設定の読み込みに失敗しました")
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "citylookup=debug"
    } else {
        "citylookup=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// 長さは読み込み後に設定される
fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    let style = ProgressStyle::with_template("  {bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}]")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}
