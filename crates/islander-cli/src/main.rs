mod config;
mod serve_cmd;
mod tui;

#[cfg(test)]
mod test_util;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use islander_core::channel::MapChannel;
use islander_core::config::ClientConfig;
use islander_core::content::Content;
use islander_core::explore::ExploreController;
use islander_core::map_html::map_html;
use islander_core::planner::{HttpPlanner, TripPlannerChat};
use islander_core::search::{MIN_QUERY_CHARS, NominatimGeocoder, PlaceSearch};

#[derive(Parser)]
#[command(name = "islander", about = "Andaman Islands trip planner")]
struct Cli {
    /// Planner base URL (overrides ISLANDER_PLANNER_URL env var)
    #[arg(long, global = true)]
    planner_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an islander config file
    Init {
        /// Planner backend base URL
        #[arg(long, default_value = ClientConfig::DEFAULT_PLANNER_URL)]
        url: String,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Ask the trip planner a question
    Plan {
        /// What you want to plan
        prompt: String,
    },
    /// Search for a place in the Andaman region
    Search {
        /// Place name (at least 3 characters)
        query: String,
    },
    /// List the map places
    Places,
    /// List things to do
    Activities,
    /// List bus routes
    Routes,
    /// Write the Leaflet map page
    MapHtml {
        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Serve the map page and content over HTTP. The page is driven by
    /// map commands posted to it by an embedding host.
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        /// Port to listen on
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
    /// Launch the interactive TUI
    Dashboard,
}

/// Execute `islander init`: write the config file.
fn cmd_init(planner_url: &str, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        planner: config::PlannerSection {
            url: planner_url.to_string(),
        },
        geocoder: config::GeocoderSection::default(),
    };
    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  planner.url = {planner_url}");
    println!("  geocoder.url = {}", cfg.geocoder.url);
    Ok(())
}

fn chat_client(config: &ClientConfig, content: &Content) -> anyhow::Result<TripPlannerChat> {
    let planner = HttpPlanner::new(config).context("failed to build planner client")?;
    Ok(TripPlannerChat::new(Arc::new(planner)).with_suggestions(content.quick_suggestions()))
}

fn search_client(config: &ClientConfig) -> anyhow::Result<PlaceSearch> {
    let geocoder = NominatimGeocoder::new(&config.geocoder_url, config.timeout)
        .context("failed to build geocoder client")?;
    Ok(PlaceSearch::new(Arc::new(geocoder), &config.region_hint))
}

async fn cmd_plan(config: &ClientConfig, prompt: &str) -> anyhow::Result<()> {
    let chat = chat_client(config, &Content::load())?;
    match chat.send_prompt(prompt).await {
        Some(reply) => println!("{}", reply.text),
        None => println!("Nothing to send."),
    }
    Ok(())
}

/// Whether `query` is long enough for the search client to send it.
fn is_searchable(query: &str) -> bool {
    query.chars().count() >= MIN_QUERY_CHARS
}

async fn cmd_search(config: &ClientConfig, query: &str) -> anyhow::Result<()> {
    if !is_searchable(query) {
        println!("Type at least {MIN_QUERY_CHARS} characters to search.");
        return Ok(());
    }
    let results = search_client(config)?.search(query).await;
    if results.is_empty() {
        println!("No places found.");
    }
    for (i, r) in results.iter().enumerate() {
        println!("{}. {} ({:.4}, {:.4})", i + 1, r.title(), r.latitude, r.longitude);
        println!("   {}", r.subtitle());
    }
    Ok(())
}

fn cmd_places(content: &Content) {
    for p in &content.places {
        println!(
            "{:<4} {} {:<20} {:.4}, {:.4}",
            p.id, p.icon, p.name, p.latitude, p.longitude
        );
    }
    println!();
    println!("Popular:");
    for c in &content.curated {
        println!("  {}", c.name);
    }
}

fn cmd_activities(content: &Content) {
    for a in &content.activities {
        println!("{a}");
    }
}

fn cmd_routes(content: &Content) {
    for r in &content.routes {
        println!("{} [{}] {} stops", r.label, r.color, r.coordinates.len());
    }
}

fn cmd_map_html(content: &Content, output: Option<PathBuf>) -> anyhow::Result<()> {
    let html = map_html(content);
    match output {
        Some(path) => {
            std::fs::write(&path, html)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Map written to {}", path.display());
        }
        None => print!("{html}"),
    }
    Ok(())
}

async fn cmd_dashboard(config: &ClientConfig) -> anyhow::Result<()> {
    let content = Content::load();
    let chat = chat_client(config, &content)?;
    let (map_tx, map_rx) = MapChannel::new();
    let explore = ExploreController::new(&content, search_client(config)?, map_tx);
    let app = tui::app::App::new(content, chat, explore, map_rx);
    tui::run_dashboard(app).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The dashboard owns the terminal; keep logs out of it unless asked.
    let default_filter = match cli.command {
        Commands::Dashboard => "off",
        _ => "info",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    let resolved = config::resolve(cli.planner_url.as_deref());

    match cli.command {
        Commands::Init { url, force } => {
            cmd_init(&url, force)?;
        }
        Commands::Plan { prompt } => {
            cmd_plan(&resolved, &prompt).await?;
        }
        Commands::Search { query } => {
            cmd_search(&resolved, &query).await?;
        }
        Commands::Places => cmd_places(&Content::load()),
        Commands::Activities => cmd_activities(&Content::load()),
        Commands::Routes => cmd_routes(&Content::load()),
        Commands::MapHtml { output } => {
            cmd_map_html(&Content::load(), output)?;
        }
        Commands::Serve { bind, port } => {
            serve_cmd::run_serve(Content::load(), &bind, port).await?;
        }
        Commands::Dashboard => {
            cmd_dashboard(&resolved).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_planner_url_parses_after_subcommand() {
        let cli = Cli::parse_from(["islander", "plan", "Ross Island", "--planner-url", "http://p"]);
        assert_eq!(cli.planner_url.as_deref(), Some("http://p"));
        assert!(matches!(cli.command, Commands::Plan { ref prompt } if prompt == "Ross Island"));
    }

    #[test]
    fn serve_defaults() {
        let cli = Cli::parse_from(["islander", "serve"]);
        assert!(matches!(
            cli.command,
            Commands::Serve { ref bind, port: 3000 } if bind == "127.0.0.1"
        ));
    }

    #[tokio::test]
    async fn search_command_uses_client_length_rule() {
        let geo = islander_test_utils::spawn_geocoder(|_| {
            islander_test_utils::Reply::json(islander_test_utils::nominatim_results("Ab", 1))
        })
        .await;
        let config = ClientConfig::new("http://127.0.0.1:9", geo.search_url());

        cmd_search(&config, "ab").await.unwrap();
        assert_eq!(geo.hits(), 0);

        // Trailing whitespace counts, exactly as in `PlaceSearch::search`.
        cmd_search(&config, "ab ").await.unwrap();
        assert_eq!(geo.hits(), 1);
        assert_eq!(geo.requests()[0].key, "ab  Andaman");
    }

    #[test]
    fn map_html_writes_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("map.html");
        cmd_map_html(&Content::load(), Some(path.clone())).unwrap();
        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("Port Blair"));
    }
}
