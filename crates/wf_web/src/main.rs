use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use wf_core::{FeedSource, FeedStore};
use wf_web::{create_app, AppState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the feed JSON snapshots
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Article feed file name inside the data directory
    #[arg(long, default_value = "warroom-articles.json")]
    articles_file: String,

    /// Video channel as a name=file pair, repeatable
    #[arg(long = "channel", value_parser = parse_channel)]
    channels: Vec<(String, String)>,

    /// Base URL of a co-located endpoint serving the same snapshots,
    /// used as a fallback when a local read fails
    #[arg(long)]
    fallback_base: Option<String>,

    #[arg(long, default_value = "127.0.0.1:3002")]
    listen: SocketAddr,
}

fn parse_channel(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(name, file)| (name.to_string(), file.to_string()))
        .ok_or_else(|| format!("expected name=file, got '{}'", s))
}

fn fallback_for(base: &Option<String>, file: &str) -> Option<FeedSource> {
    base.as_ref()
        .map(|base| FeedSource::Http(format!("{}/{}", base.trim_end_matches('/'), file)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let channels = if cli.channels.is_empty() {
        vec![
            ("warroom".to_string(), "videos.json".to_string()),
            ("winters".to_string(), "natalie-videos.json".to_string()),
        ]
    } else {
        cli.channels.clone()
    };

    let mut store = FeedStore::new();
    store.set_articles(
        FeedSource::File(cli.data_dir.join(&cli.articles_file)),
        fallback_for(&cli.fallback_base, &cli.articles_file),
    );
    for (name, file) in &channels {
        store.add_channel(
            name,
            FeedSource::File(cli.data_dir.join(file)),
            fallback_for(&cli.fallback_base, file),
        );
    }

    let app = create_app(AppState { store }).await;

    let listener = tokio::net::TcpListener::bind(cli.listen)
        .await
        .with_context(|| format!("failed to bind {}", cli.listen))?;
    info!("serving feeds on http://{}", cli.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
