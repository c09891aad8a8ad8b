use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use iching_cast::{
    api,
    casting::{CastingSession, RandomCoins},
    config::{CastingConfig, Config},
    db,
    interpretation::IchingLibrary,
    models::AnalysisRequest,
    oracle::AnalysisClient,
    presentation::ResultView,
    terminal::{self, TerminalPresenter},
};

#[derive(Parser)]
#[command(name = "iching")]
#[command(about = "Coin-toss I Ching casting with AI commentary")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "8001")]
        port: u16,
    },
    /// Cast a hexagram in the terminal
    Cast {
        /// The question to put to the oracle
        #[arg(short, long)]
        question: String,

        /// Seed the coins for a reproducible casting
        #[arg(long)]
        seed: Option<u64>,

        /// Ask the analysis endpoint for commentary afterwards
        #[arg(long)]
        ai: bool,
    },
    /// Show casting statistics
    Stats,
    /// Print the interpretation record for a hexagram
    Hex {
        /// King Wen sequence number (1-64)
        code: u8,
    },
}

/// Initialize tracing with output to stderr (for terminal castings) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "iching_cast=debug,tower_http=debug".into()),
    );

    if use_stderr {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn open_database() -> anyhow::Result<db::Database> {
    let db = db::Database::open_default()?;
    db.migrate()?;
    Ok(db)
}

async fn serve(port: u16, config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting iching server on port {}", port);

    let db = open_database()?;
    let library = IchingLibrary::load(&config.data_path);
    if config.api_key.is_none() {
        tracing::warn!("SILICONFLOW_API_KEY not set, /api/ai will refuse requests");
    }

    let app = api::create_router(api::AppState::new(db, library, &config));

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("iching server listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn cast(
    question: String,
    seed: Option<u64>,
    ai: bool,
    config: Config,
) -> anyhow::Result<()> {
    let coins = match seed {
        Some(seed) => RandomCoins::with_seed(seed),
        None => RandomCoins::new(),
    };
    let mut session = CastingSession::new(coins, CastingConfig::default());
    let presenter = TerminalPresenter::default();

    let hexagram = session.cast(&question, &presenter).await?;

    let library = IchingLibrary::load(&config.data_path);
    let record = library.find(hexagram.sequence, &hexagram.name);
    let view = ResultView::new(&hexagram, record);

    println!();
    print!("{}", terminal::render_hexagram(session.sequencer().lines()));
    println!();
    println!("{}", view.header);
    println!("{}  {}", view.title, view.subtitle);
    println!("卦辞：{}", view.judgement);
    println!("象曰：{}", view.image);
    for text in &view.line_texts {
        println!("{}", text);
    }
    println!("{}", view.link);

    // Statistics never block the result.
    match open_database()
        .and_then(|db| db.record_casting(&hexagram, Some(&question), Utc::now().date_naive()))
    {
        Ok(_) => {}
        Err(e) => tracing::warn!("Failed to record casting: {:#}", e),
    }

    if ai {
        println!();
        println!("AI 解读中...");
        let request = AnalysisRequest::new(&question, None, &hexagram, record);
        match AnalysisClient::new(config.api_base.clone()).analyse(&request).await {
            Ok(content) => println!("{}", content),
            Err(e) => println!("{}", e.user_message()),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Terminal castings print to stdout, so logs go to stderr
    let use_stderr = !matches!(cli.command, Some(Commands::Serve { .. }) | None);
    init_tracing(use_stderr);

    let config = Config::from_env();

    match cli.command {
        Some(Commands::Serve { port }) => serve(port, config).await?,
        Some(Commands::Cast { question, seed, ai }) => cast(question, seed, ai, config).await?,
        Some(Commands::Stats) => {
            let db = open_database()?;
            let stats = db.get_stats(Utc::now().date_naive())?;
            println!("累计：{}", stats.total);
            println!("今日：{}", stats.today);
            println!("最常见：{}", stats.most_frequent_label());
        }
        Some(Commands::Hex { code }) => {
            let library = IchingLibrary::load(&config.data_path);
            let record = library
                .lookup(code)
                .with_context(|| format!("No interpretation record for hexagram {}", code))?;
            println!("{}", serde_json::to_string_pretty(record)?);
        }
        None => serve(8001, config).await?,
    }

    Ok(())
}
