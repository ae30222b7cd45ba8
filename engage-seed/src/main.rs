use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use engage_store::config::Settings;
use engage_store::{ActivityLoader, Database, PostRepository, ReportRepository};
use engage_types::{
    format_timestamp, LoadSummary, PostEngagement, RankedPost, ReportKind, TableCounts,
    UserPostReport,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Engage Seed Utility
///
/// Normalizes flat per-post activity rows into users, posts, likes and
/// comments, then reports on engagement.
#[derive(Parser, Debug)]
#[command(name = "engage-seed")]
#[command(about = "Load flat activity data and report on engagement", long_about = None)]
struct Args {
    /// Path to the SQLite database file (defaults to settings)
    #[arg(short, long, env = "DATABASE_PATH")]
    database: Option<String>,

    /// Print reports as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a JSON array of activity records (the bundled sample when omitted)
    Load {
        #[arg(short, long)]
        seed: Option<PathBuf>,
    },
    /// Print engagement reports
    Report {
        /// One of: top, ranked, users (all when omitted)
        #[arg(short, long, value_parser = parse_report_kind)]
        kind: Option<ReportKind>,

        /// Number of rows in the top-engagement listing
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Print table counts and verify every like counter
    Check,
}

fn parse_report_kind(s: &str) -> Result<ReportKind, String> {
    ReportKind::parse(s).ok_or_else(|| format!("unknown report kind '{}'", s))
}

/// Open (creating if needed) the database and make sure the schema exists
fn open_database(path: &str) -> Result<Database> {
    tracing::info!("Opening database: {}", path);
    let db = Database::new(path)
        .with_context(|| format!("Failed to open database {}", path))?;
    db.initialize().context("Failed to initialize database schema")?;
    Ok(db)
}

fn run_load(db: &Database, seed: Option<PathBuf>) -> Result<LoadSummary> {
    let records = match seed {
        Some(path) => engage_store::read_records(&path)
            .with_context(|| format!("Failed to read seed file {}", path.display()))?,
        None => engage_store::sample_records().context("Failed to parse bundled sample data")?,
    };
    tracing::info!("Loading {} activity records", records.len());

    ActivityLoader::new(db.pool.clone())
        .load(&records)
        .context("Failed to load activity records")
}

fn format_summary(summary: &LoadSummary) -> String {
    let mut out = String::new();
    out.push_str("Load Summary\n");
    out.push_str("============\n");
    out.push_str(&format!("Records staged:   {}\n", summary.records));
    out.push_str(&format!(
        "Users inserted:   {} ({} duplicate rows skipped)\n",
        summary.users_inserted, summary.users_skipped
    ));
    out.push_str(&format!(
        "Posts inserted:   {} ({} duplicate rows skipped)\n",
        summary.posts_inserted, summary.posts_skipped
    ));
    out.push_str(&format!("Likes created:    {}\n", summary.likes_created));
    out.push_str(&format!("Comments created: {}\n", summary.comments_created));
    out
}

fn format_top(rows: &[PostEngagement]) -> String {
    let mut out = format!(
        "{:<8} {:<16} {:>6} {:>9}  {}\n",
        "post", "user", "likes", "comments", "content"
    );
    for row in rows {
        out.push_str(&format!(
            "{:<8} {:<16} {:>6} {:>9}  {}\n",
            row.post_id, row.username, row.total_likes, row.total_comments, row.content
        ));
    }
    out
}

fn format_ranked(rows: &[RankedPost]) -> String {
    let mut out = format!(
        "{:>4} {:<8} {:<16} {:>6} {:>6} {:>9}\n",
        "rank", "post", "user", "score", "likes", "comments"
    );
    for row in rows {
        out.push_str(&format!(
            "{:>4} {:<8} {:<16} {:>6.1} {:>6} {:>9}\n",
            row.rank, row.post_id, row.username, row.score, row.total_likes, row.total_comments
        ));
    }
    out
}

fn format_users(rows: &[UserPostReport]) -> String {
    let mut out = format!(
        "{:<16} {:<8} {:<19} {:>6} {:>9}\n",
        "user", "post", "posted", "likes", "comments"
    );
    for row in rows {
        let post = row
            .post_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        let posted = row
            .created_at
            .as_ref()
            .map(format_timestamp)
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:<16} {:<8} {:<19} {:>6} {:>9}\n",
            row.username, post, posted, row.total_likes, row.total_comments
        ));
    }
    out
}

/// Render one report as a table or as JSON
fn render_report(
    reports: &ReportRepository,
    kind: ReportKind,
    limit: usize,
    json: bool,
) -> Result<String> {
    let rendered = match kind {
        ReportKind::Top => {
            let rows = reports.top_engagement(limit)?;
            if json {
                serde_json::to_string_pretty(&rows)?
            } else {
                format_top(&rows)
            }
        }
        ReportKind::Ranked => {
            let rows = reports.ranked_engagement()?;
            if json {
                serde_json::to_string_pretty(&rows)?
            } else {
                format_ranked(&rows)
            }
        }
        ReportKind::Users => {
            let rows = reports.user_report()?;
            if json {
                serde_json::to_string_pretty(&rows)?
            } else {
                format_users(&rows)
            }
        }
    };
    Ok(rendered)
}

fn format_counts(counts: &TableCounts) -> String {
    format!(
        "Users: {}\nPosts: {}\nLikes: {}\nComments: {}\nStaged rows: {}\n",
        counts.users, counts.posts, counts.likes, counts.comments, counts.staged
    )
}

/// Print table counts and fail if any like counter has drifted
fn run_check(db: &Database) -> Result<()> {
    let counts = db.table_counts().context("Failed to count tables")?;
    println!("=== Database Diagnostic ===\n");
    print!("{}", format_counts(&counts));

    let drift = PostRepository::new(db.pool.clone())
        .like_count_drift()
        .context("Failed to audit like counters")?;
    if drift.is_empty() {
        println!("\nLike counters: consistent");
        return Ok(());
    }

    for d in &drift {
        println!("  post {}: cached {} but {} like rows", d.post_id, d.cached, d.actual);
    }
    anyhow::bail!("{} posts have inconsistent like counters", drift.len())
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "engage_seed=info,engage_store=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let settings = Settings::new().context("Failed to load settings")?;
    let database_path = args.database.unwrap_or(settings.database.path);
    let db = open_database(&database_path)?;

    match args.command {
        Command::Load { seed } => {
            let seed = seed.or_else(|| settings.seed.path.map(PathBuf::from));
            let summary = run_load(&db, seed)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", format_summary(&summary));
            }
        }
        Command::Report { kind, limit } => {
            let limit = limit.unwrap_or(settings.reports.top_limit);
            let reports = ReportRepository::new(db.pool.clone());
            let kinds = kind.map(|k| vec![k]).unwrap_or_else(|| ReportKind::ALL.to_vec());
            for kind in kinds {
                if !args.json {
                    println!("{}", kind.title());
                    println!("{}", "=".repeat(kind.title().len()));
                }
                println!("{}", render_report(&reports, kind, limit, args.json)?);
            }
        }
        Command::Check => run_check(&db)?,
    }

    Ok(())
}
