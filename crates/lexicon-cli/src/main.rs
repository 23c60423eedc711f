//! Lexicon CLI
//!
//! Command-line interface for the vocabulary scheduler.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Days, NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use lexicon_core::{
    Category, Clock, Config, EntryUpdate, FixedClock, NewEntry, ReviewRecord, ReviewService,
    ReviewSession, SearchField, SessionStatus, Storage, SystemClock, VocabularyEntry,
};

/// Lexicon - Vocabulary Trainer CLI
#[derive(Parser)]
#[command(name = "lexicon")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Spaced-repetition vocabulary trainer (SM-2)")]
#[command(long_about = "Lexicon schedules Portuguese-German vocabulary with the SM-2 algorithm.\n\nRate each recall from 0 (blackout) to 5 (perfect); the word comes back when it is due.")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file (overrides config and LEXICON_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// Print JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a vocabulary entry
    Add {
        /// Portuguese word
        word_pt: String,
        /// German translation
        word_de: String,
        /// Example sentence
        #[arg(long, default_value = "")]
        example: String,
        /// Category (verbs, nouns, adjectives)
        #[arg(long, default_value = "verbs")]
        category: Category,
        /// Difficulty level
        #[arg(long, default_value = "1")]
        level: i32,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
        /// Pronunciation hint
        #[arg(long)]
        pronunciation: Option<String>,
        /// Tags (comma-separated)
        #[arg(long)]
        tags: Option<String>,
        /// First due date (defaults to today)
        #[arg(long)]
        due: Option<NaiveDate>,
    },

    /// Change an entry's words, example or metadata
    Edit(EditArgs),

    /// Find entries by word or example (case-insensitive)
    Search {
        /// Text to look for
        query: String,
        /// Where to look (word, pt, de, example)
        #[arg(long, default_value = "word")]
        field: SearchField,
        /// Maximum entries to show
        #[arg(long, default_value = "50")]
        limit: u32,
    },

    /// Show one entry with its scheduling state
    Show {
        /// Entry ID
        id: String,
    },

    /// List entries
    List {
        /// Only this category
        #[arg(long)]
        category: Option<Category>,
        /// Maximum entries to show
        #[arg(long, default_value = "50")]
        limit: u32,
        /// Entries to skip
        #[arg(long, default_value = "0")]
        offset: u32,
    },

    /// List entries due for review
    Due {
        /// Maximum entries to show
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Record a review (quality 0-5)
    Review {
        /// Entry ID
        id: String,
        /// Quality rating; out-of-range values are clamped unless strict
        #[arg(allow_hyphen_values = true)]
        quality: i32,
        /// Notes stored with the history record
        #[arg(long)]
        notes: Option<String>,
    },

    /// Show what each rating would schedule, without saving
    Preview {
        /// Entry ID
        id: String,
    },

    /// Show review history of an entry, or of all entries in a date range
    History {
        /// Entry ID
        id: Option<String>,
        /// Range start (defaults to 7 days ago)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Range end (defaults to today)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Delete an entry and its history
    Delete {
        /// Entry ID
        id: String,
    },

    /// Review sessions
    #[command(subcommand)]
    Session(SessionCommand),
}

#[derive(Args)]
struct EditArgs {
    /// Entry ID
    id: String,
    /// New Portuguese word
    #[arg(long)]
    pt: Option<String>,
    /// New German translation
    #[arg(long)]
    de: Option<String>,
    /// New example sentence
    #[arg(long)]
    example: Option<String>,
    /// New category
    #[arg(long)]
    category: Option<Category>,
    /// New difficulty level
    #[arg(long)]
    level: Option<i32>,
    /// New notes (empty string clears)
    #[arg(long)]
    notes: Option<String>,
    /// New pronunciation hint (empty string clears)
    #[arg(long)]
    pronunciation: Option<String>,
    /// Replace tags (comma-separated)
    #[arg(long)]
    tags: Option<String>,
}

impl EditArgs {
    fn into_update(self) -> EntryUpdate {
        let mut update = EntryUpdate::new();
        update.word_pt = self.pt;
        update.word_de = self.de;
        update.example = self.example;
        update.category = self.category;
        update.level = self.level;
        update.notes = self.notes;
        update.pronunciation = self.pronunciation;
        update.tags = self.tags.map(|t| parse_tags(Some(&t)));
        update
    }
}

#[derive(Subcommand)]
enum SessionCommand {
    /// Start a session over the entries due today
    Start {
        /// Maximum entries in the session
        #[arg(long)]
        limit: Option<u32>,
        /// Only this category
        #[arg(long)]
        category: Option<Category>,
    },
    /// Show a session and its progress
    Show {
        /// Session ID
        id: String,
    },
    /// Rate one entry of a session
    Rate {
        /// Session ID
        session_id: String,
        /// Entry ID
        entry_id: String,
        /// Quality rating (0-5)
        #[arg(allow_hyphen_values = true)]
        quality: i32,
    },
    /// Mark a session completed
    Complete {
        /// Session ID
        id: String,
    },
    /// Mark a session abandoned
    Abandon {
        /// Session ID
        id: String,
    },
    /// List sessions by status, or by start date range
    List {
        /// Status (in_progress, completed, abandoned)
        #[arg(long, default_value = "in_progress")]
        status: SessionStatus,
        /// Range start; with --to, lists sessions started in the range instead
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,
        /// Range end
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries command output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(false)
        .init();

    let service = open_service(&cli)?;
    let json = cli.json;

    match cli.command {
        Commands::Add {
            word_pt,
            word_de,
            example,
            category,
            level,
            notes,
            pronunciation,
            tags,
            due,
        } => {
            let mut input = NewEntry::new(word_pt, word_de, example)
                .with_category(category)
                .with_tags(parse_tags(tags.as_deref()));
            input.level = level;
            input.notes = notes;
            input.pronunciation = pronunciation;
            input.due = due;
            run_add(&service, input, json)
        }
        Commands::Edit(args) => run_edit(&service, args, json),
        Commands::Search {
            query,
            field,
            limit,
        } => run_search(&service, &query, field, limit, json),
        Commands::Show { id } => run_show(&service, &id, json),
        Commands::List {
            category,
            limit,
            offset,
        } => run_list(&service, category, limit, offset, json),
        Commands::Due { limit } => run_due(&service, limit, json),
        Commands::Review { id, quality, notes } => {
            run_review(&service, &id, quality, notes, json)
        }
        Commands::Preview { id } => run_preview(&service, &id, json),
        Commands::History { id, from, to } => run_history(&service, id, from, to, json),
        Commands::Delete { id } => run_delete(&service, &id, json),
        Commands::Session(command) => run_session(&service, command, json),
    }
}

/// Resolve config, database and clock into a review service
fn open_service(cli: &Cli) -> anyhow::Result<ReviewService<Storage>> {
    let config = Config::load(cli.config.as_deref())?.with_env_overrides();
    let db_path = cli.db.clone().or_else(|| config.storage.db_path.clone());

    if let Some(parent) = db_path.as_ref().and_then(|p| p.parent()) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let storage = Storage::new(db_path)?;
    tracing::debug!("Using database {}", storage.path().display());

    let clock: Arc<dyn Clock> = match cli.today {
        Some(date) => Arc::new(FixedClock(date)),
        None => Arc::new(SystemClock),
    };

    Ok(ReviewService::from_config(Arc::new(storage), &config, clock))
}

fn parse_tags(tags: Option<&str>) -> Vec<String> {
    tags.map(|t| {
        t.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ============================================================================
// ENTRIES
// ============================================================================

fn run_add(service: &ReviewService<Storage>, input: NewEntry, json: bool) -> anyhow::Result<()> {
    if input.word_pt.trim().is_empty() || input.word_de.trim().is_empty() {
        anyhow::bail!("Both words are required");
    }

    let entry = service.add_entry(input)?;
    if json {
        return print_json(&entry);
    }

    println!("{}", "=== Lexicon Add ===".cyan().bold());
    println!();
    println!("{}: {}", "Entry ID".white().bold(), entry.id);
    println!("{}: {} = {}", "Word".white().bold(), entry.word_pt, entry.word_de);
    println!("{}: {}", "First Review".white().bold(), entry.scheduling.next_review_date);
    Ok(())
}

fn run_edit(service: &ReviewService<Storage>, args: EditArgs, json: bool) -> anyhow::Result<()> {
    let id = args.id.clone();
    let update = args.into_update();
    if update.is_empty() {
        anyhow::bail!("Nothing to change; pass at least one of --pt, --de, --example, --category, --level, --notes, --pronunciation, --tags");
    }
    if [&update.word_pt, &update.word_de]
        .into_iter()
        .flatten()
        .any(|w| w.trim().is_empty())
    {
        anyhow::bail!("Words cannot be empty");
    }

    let entry = match service.store().update_entry(&id, update) {
        Err(lexicon_core::StorageError::NotFound(_)) => anyhow::bail!("Entry not found: {}", id),
        other => other?,
    };
    if json {
        return print_json(&entry);
    }

    println!("{}", format!("Updated {} = {}", entry.word_pt, entry.word_de).green().bold());
    Ok(())
}

fn run_search(
    service: &ReviewService<Storage>,
    query: &str,
    field: SearchField,
    limit: u32,
    json: bool,
) -> anyhow::Result<()> {
    let entries = service.store().search(query, field, limit)?;

    if json {
        return print_json(&entries);
    }

    println!("{}", format!("=== Search: {} ===", query).cyan().bold());
    println!();
    if entries.is_empty() {
        println!("{}", "No matching entries.".dimmed());
        return Ok(());
    }
    print_entry_table(&entries, service.today());
    println!();
    println!("{}: {}", "Found".white().bold(), entries.len());
    Ok(())
}

fn run_show(service: &ReviewService<Storage>, id: &str, json: bool) -> anyhow::Result<()> {
    let entry = service
        .store()
        .get_entry(id)?
        .ok_or_else(|| anyhow::anyhow!("Entry not found: {}", id))?;

    if json {
        return print_json(&entry);
    }

    let today = service.today();
    let state = &entry.scheduling;

    println!("{}", format!("=== {} ===", entry.word_pt).cyan().bold());
    println!();
    println!("{}: {}", "German".white().bold(), entry.word_de);
    if !entry.example.is_empty() {
        println!("{}: {}", "Example".white().bold(), entry.example.italic());
    }
    println!("{}: {}", "Category".white().bold(), entry.category);
    println!("{}: {}", "Level".white().bold(), entry.level);
    if let Some(ref p) = entry.pronunciation {
        println!("{}: {}", "Pronunciation".white().bold(), p);
    }
    if let Some(ref n) = entry.notes {
        println!("{}: {}", "Notes".white().bold(), n);
    }
    if !entry.tags.is_empty() {
        println!("{}: {}", "Tags".white().bold(), entry.tags.join(", "));
    }

    println!();
    println!("{}", "=== Scheduling ===".yellow().bold());
    println!("{}: {}", "Phase".white().bold(), state.phase());
    println!("{}: {}", "Repetitions".white().bold(), state.repetitions.unwrap_or(0));
    match state.ease_factor {
        Some(ef) => println!("{}: {:.2}", "Ease Factor".white().bold(), ef),
        None => println!("{}: {}", "Ease Factor".white().bold(), "not reviewed".dimmed()),
    }
    match state.last_review_date {
        Some(d) => println!("{}: {}", "Last Review".white().bold(), d),
        None => println!("{}: {}", "Last Review".white().bold(), "never".dimmed()),
    }
    let due = if state.is_due(today) {
        format!("{} (due)", state.next_review_date).red().bold()
    } else {
        state.next_review_date.to_string().green()
    };
    println!("{}: {}", "Next Review".white().bold(), due);
    Ok(())
}

fn print_entry_table(entries: &[VocabularyEntry], today: NaiveDate) {
    for entry in entries {
        let next = entry.scheduling.next_review_date;
        let next = if entry.scheduling.is_due(today) {
            next.to_string().red()
        } else {
            next.to_string().normal()
        };
        println!(
            "  {}  {:<20} {:<20} {:<10} {}",
            entry.id.dimmed(),
            entry.word_pt.white().bold(),
            entry.word_de,
            entry.category.to_string(),
            next
        );
    }
}

fn list_entries(
    service: &ReviewService<Storage>,
    category: Option<Category>,
    limit: u32,
    offset: u32,
) -> anyhow::Result<Vec<VocabularyEntry>> {
    Ok(match category {
        Some(c) => service.store().list_by_category(c, limit, offset)?,
        None => service.store().list_entries(limit, offset)?,
    })
}

fn run_list(
    service: &ReviewService<Storage>,
    category: Option<Category>,
    limit: u32,
    offset: u32,
    json: bool,
) -> anyhow::Result<()> {
    let entries = list_entries(service, category, limit, offset)?;

    if json {
        return print_json(&entries);
    }

    println!("{}", "=== Lexicon Entries ===".cyan().bold());
    println!();
    if entries.is_empty() {
        println!("{}", "No entries found.".dimmed());
        return Ok(());
    }
    print_entry_table(&entries, service.today());
    println!();
    println!("{}: {}", "Shown".white().bold(), entries.len());
    Ok(())
}

fn run_due(service: &ReviewService<Storage>, limit: Option<u32>, json: bool) -> anyhow::Result<()> {
    let today = service.today();
    let entries = service.store().get_due_entries(today, limit)?;

    if json {
        return print_json(&entries);
    }

    println!("{}", format!("=== Due on {} ===", today).cyan().bold());
    println!();
    if entries.is_empty() {
        println!("{}", "Nothing due. Come back tomorrow.".green());
        return Ok(());
    }
    print_entry_table(&entries, today);
    println!();
    println!("{}: {}", "Due".white().bold(), entries.len());
    Ok(())
}

fn run_delete(service: &ReviewService<Storage>, id: &str, json: bool) -> anyhow::Result<()> {
    if !service.store().delete_entry(id)? {
        anyhow::bail!("Entry not found: {}", id)
    }
    if json {
        return print_json(&serde_json::json!({ "id": id, "deleted": true }));
    }
    println!("{}", format!("Deleted entry {}", id).green().bold());
    Ok(())
}

// ============================================================================
// REVIEWS
// ============================================================================

fn run_review(
    service: &ReviewService<Storage>,
    id: &str,
    quality: i32,
    notes: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let outcome = service.record_review(id, quality, notes.as_deref())?;
    if json {
        return print_json(&outcome);
    }
    let state = &outcome.state;

    println!("{}", "=== Lexicon Review ===".cyan().bold());
    println!();
    let rating = format!("{} ({})", outcome.quality, outcome.quality.describe());
    let rating = if outcome.quality.is_passing() {
        rating.green()
    } else {
        rating.red()
    };
    println!("{}: {}", "Quality".white().bold(), rating);
    println!(
        "{}: {} -> {}",
        "Repetitions".white().bold(),
        outcome.previous.repetitions.unwrap_or(0),
        state.repetitions.unwrap_or(0)
    );
    println!(
        "{}: {:.2} -> {:.2}",
        "Ease Factor".white().bold(),
        outcome
            .previous
            .ease_factor
            .unwrap_or(service.scheduler().config().default_ease_factor),
        state.ease_factor.unwrap_or_default()
    );
    println!(
        "{}: {} ({} day(s))",
        "Next Review".white().bold(),
        state.next_review_date,
        state.interval_days.unwrap_or_default()
    );
    Ok(())
}

fn run_preview(service: &ReviewService<Storage>, id: &str, json: bool) -> anyhow::Result<()> {
    let preview = service.preview(id)?;
    if json {
        let outcomes: Vec<_> = preview
            .iter()
            .map(|(quality, state)| serde_json::json!({ "quality": quality, "state": state }))
            .collect();
        return print_json(&outcomes);
    }

    println!("{}", format!("=== Preview for {} ===", service.today()).cyan().bold());
    println!();
    for (quality, state) in preview.iter() {
        let label = format!("{} {:<28}", quality, quality.describe());
        let label = if quality.is_passing() {
            label.green()
        } else {
            label.red()
        };
        println!(
            "  {}  next {}  ease {:.2}  reps {}",
            label,
            state.next_review_date,
            state.ease_factor.unwrap_or_default(),
            state.repetitions.unwrap_or(0)
        );
    }
    Ok(())
}

fn print_history(records: &[ReviewRecord]) {
    for r in records {
        let quality = if r.quality_rating >= 3 {
            r.quality_rating.to_string().green()
        } else {
            r.quality_rating.to_string().red()
        };
        println!(
            "  {}  {}  q={}  reps {}  ease {:.2}  next {}{}",
            r.review_date,
            r.entry_id.dimmed(),
            quality,
            r.repetitions,
            r.ease_factor,
            r.next_review_date,
            r.notes
                .as_deref()
                .map(|n| format!("  \"{}\"", n))
                .unwrap_or_default()
        );
    }
}

fn run_history(
    service: &ReviewService<Storage>,
    id: Option<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    json: bool,
) -> anyhow::Result<()> {
    let (title, records) = match id {
        Some(id) => (
            format!("=== History of {} ===", id),
            service.store().get_review_history(&id)?,
        ),
        None => {
            let to = to.unwrap_or_else(|| service.today());
            let from = from.unwrap_or_else(|| to.checked_sub_days(Days::new(7)).unwrap_or(to));
            (
                format!("=== History {} .. {} ===", from, to),
                service.history_between(from, to)?,
            )
        }
    };

    if json {
        return print_json(&records);
    }

    println!("{}", title.cyan().bold());
    println!();
    if records.is_empty() {
        println!("{}", "No reviews recorded.".dimmed());
    } else {
        print_history(&records);
    }
    Ok(())
}

// ============================================================================
// SESSIONS
// ============================================================================

fn print_session(session: &ReviewSession) {
    let status = match session.status {
        SessionStatus::InProgress => session.status.to_string().yellow().bold(),
        SessionStatus::Completed => session.status.to_string().green().bold(),
        SessionStatus::Abandoned => session.status.to_string().red().bold(),
    };
    println!("{}: {}", "Session ID".white().bold(), session.id);
    println!("{}: {}", "Status".white().bold(), status);
    println!(
        "{}: {}",
        "Started".white().bold(),
        session.start_time.format("%Y-%m-%d %H:%M:%S")
    );
    if let Some(end) = session.end_time {
        println!("{}: {}", "Ended".white().bold(), end.format("%Y-%m-%d %H:%M:%S"));
    }
    println!(
        "{}: {}/{}",
        "Progress".white().bold(),
        session.completed_entries,
        session.total_entries
    );
}

fn run_session(
    service: &ReviewService<Storage>,
    command: SessionCommand,
    json: bool,
) -> anyhow::Result<()> {
    match command {
        SessionCommand::Start { limit, category } => {
            let session = service.start_session(limit, category)?;
            if json {
                return print_json(&session);
            }
            println!("{}", "=== Session Started ===".cyan().bold());
            println!();
            print_session(&session);
            if session.entries.is_empty() {
                println!();
                println!("{}", "Nothing due. Session is empty.".dimmed());
            }
            Ok(())
        }
        SessionCommand::Show { id } => {
            let session = service.get_session(&id)?;
            if json {
                return print_json(&session);
            }
            println!("{}", "=== Review Session ===".cyan().bold());
            println!();
            print_session(&session);
            println!();
            for slot in &session.entries {
                let word = service
                    .store()
                    .get_entry(&slot.entry_id)?
                    .map(|e| format!("{} = {}", e.word_pt, e.word_de))
                    .unwrap_or_else(|| "(deleted)".to_string());
                match slot.quality_rating {
                    Some(q) if slot.reviewed => {
                        println!("  {} {}  {}  q={}", "x".green(), slot.entry_id.dimmed(), word, q)
                    }
                    _ => println!("  {} {}  {}", " ".normal(), slot.entry_id.dimmed(), word),
                }
            }
            Ok(())
        }
        SessionCommand::Rate {
            session_id,
            entry_id,
            quality,
        } => {
            let session = service.rate_in_session(&session_id, &entry_id, quality)?;
            if json {
                return print_json(&session);
            }
            println!(
                "{}",
                format!(
                    "Rated {} ({}/{} done)",
                    entry_id, session.completed_entries, session.total_entries
                )
                .green()
                .bold()
            );
            Ok(())
        }
        SessionCommand::Complete { id } => {
            let session = service.complete_session(&id)?;
            if json {
                return print_json(&session);
            }
            println!("{}", "=== Session Completed ===".cyan().bold());
            println!();
            print_session(&session);
            Ok(())
        }
        SessionCommand::Abandon { id } => {
            let session = service.abandon_session(&id)?;
            if json {
                return print_json(&session);
            }
            println!("{}", "=== Session Abandoned ===".cyan().bold());
            println!();
            print_session(&session);
            Ok(())
        }
        SessionCommand::List { status, from, to } => {
            let sessions = match (from, to) {
                (Some(from), Some(to)) => {
                    let start = from.and_time(NaiveTime::MIN).and_utc();
                    let end = to
                        .checked_add_days(Days::new(1))
                        .unwrap_or(to)
                        .and_time(NaiveTime::MIN)
                        .and_utc();
                    service.sessions_between(start, end)?
                }
                _ => service.sessions_by_status(status)?,
            };

            if json {
                return print_json(&sessions);
            }

            println!("{}", "=== Review Sessions ===".cyan().bold());
            println!();
            if sessions.is_empty() {
                println!("{}", "No sessions found.".dimmed());
            }
            for session in &sessions {
                print_session(session);
                println!();
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags(Some("a1, core,,verbs ")), vec!["a1", "core", "verbs"]);
        assert!(parse_tags(None).is_empty());
    }

    #[test]
    fn test_negative_quality_parses() {
        let cli = Cli::try_parse_from(["lexicon", "review", "abc", "-2"]).unwrap();
        match cli.command {
            Commands::Review { quality, .. } => assert_eq!(quality, -2),
            _ => panic!("expected review"),
        }
    }

    #[test]
    fn test_global_today() {
        let cli = Cli::try_parse_from(["lexicon", "due", "--today", "2024-05-01"]).unwrap();
        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2024, 5, 1));
    }

    #[test]
    fn test_open_service_with_explicit_db() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("cli.db");
        let cli = Cli::try_parse_from([
            "lexicon",
            "--db",
            db.to_str().unwrap(),
            "--today",
            "2024-05-01",
            "due",
        ])
        .unwrap();

        let service = open_service(&cli).unwrap();
        assert_eq!(service.today(), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert!(db.exists());
    }

    fn temp_service() -> (ReviewService<Storage>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("cli.db");
        let cli = Cli::try_parse_from([
            "lexicon",
            "--db",
            db.to_str().unwrap(),
            "--today",
            "2024-05-01",
            "due",
        ])
        .unwrap();
        (open_service(&cli).unwrap(), dir)
    }

    #[test]
    fn test_category_listing_honors_offset() {
        let (service, _dir) = temp_service();
        let mut nouns = Vec::new();
        for pt in ["casa", "livro", "mesa"] {
            let input = NewEntry::new(pt, "-", "").with_category(Category::Nouns);
            nouns.push(service.add_entry(input).unwrap().id);
        }
        service.add_entry(NewEntry::new("falar", "sprechen", "")).unwrap();

        let page = list_entries(&service, Some(Category::Nouns), 10, 2).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, nouns[2]);
        assert_eq!(list_entries(&service, None, 10, 3).unwrap().len(), 1);
    }

    #[test]
    fn test_search_and_edit_parse() {
        let cli = Cli::try_parse_from(["lexicon", "search", "água", "--field", "pt"]).unwrap();
        match cli.command {
            Commands::Search { query, field, .. } => {
                assert_eq!(query, "água");
                assert_eq!(field, SearchField::WordPt);
            }
            _ => panic!("expected search"),
        }

        let cli = Cli::try_parse_from([
            "lexicon", "--json", "edit", "abc", "--de", "reden", "--tags", "b1, verbs", "--notes", "",
        ])
        .unwrap();
        assert!(cli.json);
        let Commands::Edit(args) = cli.command else {
            panic!("expected edit");
        };
        let update = args.into_update();
        assert_eq!(update.word_de.as_deref(), Some("reden"));
        assert_eq!(update.word_pt, None);
        assert_eq!(update.notes.as_deref(), Some(""));
        assert_eq!(update.tags, Some(vec!["b1".to_string(), "verbs".to_string()]));
    }

    #[test]
    fn test_edit_rejects_empty_and_unknown() {
        let (service, _dir) = temp_service();
        let entry = service.add_entry(NewEntry::new("falar", "sprechen", "")).unwrap();

        let parse = |args: &[&str]| {
            let mut argv = vec!["lexicon", "edit"];
            argv.extend_from_slice(args);
            match Cli::try_parse_from(argv).unwrap().command {
                Commands::Edit(args) => args,
                _ => panic!("expected edit"),
            }
        };

        let id = entry.id.as_str();
        assert!(run_edit(&service, parse(&[id]), true).is_err());
        assert!(run_edit(&service, parse(&[id, "--pt", " "]), true).is_err());
        assert!(run_edit(&service, parse(&["missing", "--pt", "falar"]), true).is_err());

        run_edit(&service, parse(&[id, "--example", "Eu falo."]), true).unwrap();
        let stored = service.store().get_entry(&entry.id).unwrap().unwrap();
        assert_eq!(stored.example, "Eu falo.");
        assert_eq!(stored.scheduling, entry.scheduling);
    }
}
