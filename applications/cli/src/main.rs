/// Podcast Player - command-line front end
use anyhow::Context;
use clap::{Parser, Subcommand};
use podcast_cli::{
    config::{parse_rate, AppConfig},
    output,
    player::{play_headless, PlayOptions},
};
use podcast_client::{EpisodeResolver, SearchPipeline, ServiceClient};
use podcast_core::{ContentRepository, EpisodeId, SeriesId};
use podcast_playback::EpisodeSource;
use std::{path::PathBuf, sync::Arc, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "podcast")]
#[command(about = "Browse the podcast catalog and play episodes", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./podcast.toml if present)
    #[arg(short, long, env = "PODCAST_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all series
    Series,
    /// List the episodes of a series
    Episodes {
        /// Series id
        series_id: String,
    },
    /// Search episode titles
    Search {
        /// Search text
        query: String,
    },
    /// Print the playable audio and cover URLs of an episode
    Resolve {
        /// Episode id
        episode_id: String,
    },
    /// Play an episode on a simulated clock
    Play {
        /// Episode id
        episode_id: String,
        /// Stop after this many simulated seconds
        #[arg(short, long)]
        seconds: Option<u64>,
        /// Playback rate (1, 1.25, 1.5, 1.75 or 2)
        #[arg(short, long)]
        rate: Option<f32>,
        /// Start again from the beginning at the end
        #[arg(long)]
        repeat: bool,
        /// Episode length in seconds when the catalog does not know it
        #[arg(long)]
        duration: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "podcast=info,podcast_cli=info,podcast_playback=info,podcast_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    config.validate()?;
    let client = ServiceClient::new(config.client_config())?;

    match cli.command {
        Commands::Series => list_series(&client).await?,
        Commands::Episodes { series_id } => list_episodes(&client, &series_id).await?,
        Commands::Search { query } => search(&client, &config, query).await?,
        Commands::Resolve { episode_id } => resolve(&client, &config, &episode_id).await?,
        Commands::Play {
            episode_id,
            seconds,
            rate,
            repeat,
            duration,
        } => {
            let mut session = config.session_config()?;
            if let Some(rate) = rate {
                session.rate = parse_rate(rate)?;
            }
            session.repeat |= repeat;

            let options = PlayOptions {
                tick: config.tick(),
                limit: seconds.map(Duration::from_secs),
            };

            tokio::select! {
                result = play(&client, &config, &episode_id, session, options, duration) => result?,
                _ = tokio::signal::ctrl_c() => tracing::info!("Interrupted"),
            }
        }
    }

    Ok(())
}

async fn list_series(client: &ServiceClient) -> anyhow::Result<()> {
    let series = client.catalog().list_series().await?;
    if series.is_empty() {
        println!("No series yet");
    }
    for s in &series {
        println!("{}", output::series_line(s));
    }
    Ok(())
}

async fn list_episodes(client: &ServiceClient, series_id: &str) -> anyhow::Result<()> {
    let catalog = client.catalog();
    let series_id = SeriesId::new(series_id);
    let series = catalog.get_series(&series_id).await?;
    let episodes = catalog.list_episodes(&series_id).await?;

    println!("{}", series.title);
    for episode in &episodes {
        println!("  {}", output::episode_line(episode));
    }
    Ok(())
}

async fn search(client: &ServiceClient, config: &AppConfig, query: String) -> anyhow::Result<()> {
    let (queries, mut results) = SearchPipeline::new(Arc::new(client.catalog()))
        .with_debounce(config.search_debounce())
        .spawn(4);
    queries.send(query).await.context("search pipeline stopped")?;
    drop(queries);

    while let Some(outcome) = results.recv().await {
        if let Some(error) = outcome.error {
            anyhow::bail!("search for '{}' failed: {}", outcome.query, error);
        }
        if outcome.episodes.is_empty() {
            println!("No episodes match '{}'", outcome.query);
        }
        for episode in &outcome.episodes {
            println!("{}", output::episode_line(episode));
        }
    }
    Ok(())
}

fn resolver(
    client: &ServiceClient,
    config: &AppConfig,
) -> EpisodeResolver<podcast_client::CatalogClient, podcast_client::StorageClient> {
    EpisodeResolver::new(
        Arc::new(client.catalog()),
        Arc::new(client.storage()),
        config.asset_access(),
    )
}

async fn resolve(client: &ServiceClient, config: &AppConfig, episode_id: &str) -> anyhow::Result<()> {
    let resolved = resolver(client, config)
        .resolve(&EpisodeId::new(episode_id))
        .await?;
    for line in output::resolved_lines(&resolved) {
        println!("{}", line);
    }
    Ok(())
}

async fn play(
    client: &ServiceClient,
    config: &AppConfig,
    episode_id: &str,
    session: podcast_playback::SessionConfig,
    options: PlayOptions,
    duration_override: Option<u64>,
) -> anyhow::Result<()> {
    let resolved = resolver(client, config)
        .resolve(&EpisodeId::new(episode_id))
        .await?;

    let duration = duration_override
        .map(Duration::from_secs)
        .or_else(|| resolved.episode.duration())
        .context("episode duration is unknown; pass --duration")?;

    let mut source = EpisodeSource::from_url(&resolved.audio_url).with_title(&resolved.episode.title);
    if let Some(series_title) = &resolved.series_title {
        source = source.with_series_title(series_title);
    }
    if let Some(cover_url) = &resolved.cover_url {
        source = source.with_cover_url(cover_url);
    }

    println!("{}", resolved.episode.title);
    let last = play_headless(source, duration, session, options, |snapshot| {
        println!("{}", output::progress_line(snapshot));
    })
    .await?;

    tracing::info!(state = ?last.state, position_secs = last.position_secs, "Playback finished");
    Ok(())
}
