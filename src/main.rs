use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use league_stats::api::{build_router, state::AppState};
use league_stats::auth::{hash_password, LocalAuth};
use league_stats::calculate::{
    compute_player_stats, format_score, player_label, resolve_club_filter, sorted_by_matches,
};
use league_stats::config::AppConfig;
use league_stats::league::LeagueController;
use league_stats::models::{League, LeagueId, PlayerId};
use league_stats::storage::{DocumentStore, JsonlStore, StorageConfig};

#[derive(Parser)]
#[command(name = "league-stats")]
#[command(about = "Doubles tennis league dashboard and admin backend")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print a league's ranking table
    Ranking {
        /// League ID
        #[arg(long)]
        league: String,

        /// Restrict to the club with this name
        #[arg(long)]
        club: Option<String>,
    },

    /// Print one player's statistics
    PlayerStats {
        /// Player ID
        #[arg(long)]
        player: String,

        /// Only count matches from this league
        #[arg(long)]
        league: Option<String>,
    },

    /// List active leagues
    Leagues,

    /// Create a league
    AddLeague {
        #[arg(long)]
        name: String,

        /// Create it hidden from the league selector
        #[arg(long)]
        inactive: bool,
    },

    /// Print the SHA-256 digest of a password for the config file
    HashPassword { password: String },
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

fn open_store(config: &AppConfig) -> Arc<dyn DocumentStore> {
    Arc::new(JsonlStore::new(StorageConfig::new(config.data_dir.clone())))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_tracing(&config.log_level, cli.json_logs);
    tracing::info!("Starting league-stats v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            if config.auth.admins.is_empty() {
                tracing::warn!("No admin accounts configured; admin endpoints are unreachable");
            }

            let addr = format!("{}:{}", config.server.host, config.server.port);
            let store = open_store(&config);
            let auth = Arc::new(LocalAuth::new(config.auth.admins.clone()));
            tracing::info!("Using {} store at {:?}", store.name(), config.data_dir);

            let app = build_router(AppState::new(store, auth, config));
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Dashboard: http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Ranking { league, club } => {
            let controller = LeagueController::new(open_store(&config));
            let league_id = LeagueId::from(league);
            let Some(league) = controller.league(&league_id).await? else {
                bail!("No league with ID {}", league_id);
            };

            let snapshot = controller.snapshot(Some(&league_id)).await?;
            let club_name = club.or_else(|| config.league.ranking_club.clone());
            let club_filter = club_name
                .as_deref()
                .and_then(|name| resolve_club_filter(&snapshot.clubs, name));
            let rows = snapshot.ranking(club_filter.as_ref());

            println!("\n=== {} ===", league.name);
            if let (Some(name), Some(_)) = (&club_name, &club_filter) {
                println!("Club: {}", name);
            }
            if rows.is_empty() {
                println!("No players to rank.");
            }
            for row in rows {
                println!(
                    "{:>3}. {:<30} {:>3} played {:>3} won {:>3} lost {:>6}%",
                    row.position,
                    row.name,
                    row.matches,
                    row.wins,
                    row.losses,
                    row.effectiveness_display
                );
            }
        }
        Commands::PlayerStats { player, league } => {
            let controller = LeagueController::new(open_store(&config));
            let player_id = PlayerId::from(player);
            let league_id = league.map(LeagueId::from);

            let players = controller.snapshot(None).await?.players;
            let matches = controller.player_matches(&player_id, league_id.as_ref()).await?;
            let stats = compute_player_stats(&player_id, &matches, &players);

            if !players.contains_key(&player_id) && matches.is_empty() {
                bail!("No player with ID {}", player_id);
            }

            println!("\n=== {} ===", stats.name);
            println!(
                "Played: {}  Won: {}  Lost: {}  Effectiveness: {:.1}%",
                stats.matches, stats.wins, stats.losses, stats.effectiveness
            );

            println!("\nPartners:");
            for p in sorted_by_matches(&stats.partners) {
                println!(
                    "  {:<30} {:>3} played {:>3} won ({:.1}%)",
                    player_label(&players, &p.player_id),
                    p.matches,
                    p.wins,
                    p.effectiveness()
                );
            }

            println!("\nOpponents:");
            for o in sorted_by_matches(&stats.opponents).into_iter().take(10) {
                println!(
                    "  {:<30} {:>3} played {:>3} won ({:.1}%)",
                    player_label(&players, &o.player_id),
                    o.matches,
                    o.wins,
                    o.effectiveness()
                );
            }

            println!("\nHistory:");
            for h in &stats.history {
                println!(
                    "  {}  {}  with {} vs {}  {}",
                    h.date.format("%d %b %Y"),
                    if h.won { "W" } else { "L" },
                    h.partner_name,
                    h.opponents_names,
                    format_score(&h.sets, h.super_tiebreak.as_ref())
                );
            }
        }
        Commands::Leagues => {
            let controller = LeagueController::new(open_store(&config));
            let leagues = controller.active_leagues().await?;
            if leagues.is_empty() {
                println!("No active leagues.");
            }
            for league in leagues {
                println!("{}  {}", league.id, league.name);
            }
        }
        Commands::AddLeague { name, inactive } => {
            let controller = LeagueController::new(open_store(&config));
            let league = controller.add_league(League::new(name, !inactive)).await?;
            println!("Created league {} ({})", league.name, league.id);
        }
        Commands::HashPassword { password } => {
            println!("{}", hash_password(&password));
        }
    }

    Ok(())
}
