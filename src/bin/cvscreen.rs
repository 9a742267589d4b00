//! CLI binary for edgequake-screen.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ScreeningConfig` and the store/board adapters, and prints results.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use edgequake_screen::{
    generate_prompt, Bucket, CardBoard, DocumentError, DriveStore, EvaluationPrompt, FileStore,
    LlmTransport, LocalStore, ProgressCallback, RoutingOutcome, Screener, ScreeningConfig,
    ScreeningProgressCallback, TrelloBoard,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress: a bar anchored at the bottom and one status line per
/// resume printed above it.
struct CliProgressCallback {
    bar: ProgressBar,
    started: Mutex<Option<Instant>>,
    cards_failed: AtomicUsize,
}

impl CliProgressCallback {
    /// Spinner until `on_batch_start` tells us how many resumes there are.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Listing folder…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            started: Mutex::new(None),
            cards_failed: AtomicUsize::new(0),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} resumes  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Screening");
        self.bar.reset_eta();
    }

    fn elapsed(&self) -> String {
        let secs = self
            .started
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .take()
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        dim(&format!("{secs:.1}s"))
    }
}

impl ScreeningProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total: usize) {
        self.activate_bar(total);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Screening {total} resumes…"))
        ));
    }

    fn on_document_start(&self, _index: usize, _total: usize, name: &str) {
        *self.started.lock().unwrap_or_else(|p| p.into_inner()) = Some(Instant::now());
        self.bar.set_message(name.to_string());
    }

    fn on_document_routed(&self, index: usize, total: usize, outcome: &RoutingOutcome) {
        let verdict = match outcome.bucket {
            Bucket::Approved => green(&format!("{:<9}", outcome.bucket.label())),
            Bucket::Reproved => yellow(&format!("{:<9}", outcome.bucket.label())),
        };
        let card = if outcome.card_created {
            dim("card ✓")
        } else {
            self.cards_failed.fetch_add(1, Ordering::SeqCst);
            red("card ✗")
        };

        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {:>3}  {}  {}  {}",
            green("✓"),
            index,
            total,
            verdict,
            outcome.score,
            outcome.candidate_name,
            card,
            self.elapsed(),
        ));
        self.bar.inc(1);
    }

    fn on_document_skipped(&self, index: usize, total: usize, name: &str, reason: &DocumentError) {
        let msg = reason.to_string();
        let msg = if msg.chars().count() > 80 {
            format!("{}\u{2026}", msg.chars().take(79).collect::<String>())
        } else {
            msg
        };

        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}  {}",
            red("✗"),
            index,
            total,
            name,
            red(&msg),
            self.elapsed(),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total: usize, routed: usize) {
        let skipped = total.saturating_sub(routed);
        self.bar.finish_and_clear();

        if skipped == 0 {
            eprintln!(
                "{} {} resumes screened",
                green("✔"),
                bold(&routed.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} resumes screened  ({} skipped)",
                if routed == 0 { red("✘") } else { cyan("⚠") },
                bold(&routed.to_string()),
                total,
                red(&skipped.to_string()),
            );
        }
        let failed = self.cards_failed.load(Ordering::SeqCst);
        if failed > 0 {
            eprintln!("  {} {} cards could not be created", red("✗"), failed);
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Find the folder and list ids
  cvscreen folders
  cvscreen boards
  cvscreen lists <BOARD_ID>

  # Screen a Drive folder
  cvscreen run --folder <FOLDER_ID> --approved-list <LIST_ID> --reproved-list <LIST_ID>

  # Resolve lists by name on a board, stricter threshold
  cvscreen run --folder <FOLDER_ID> --board <BOARD_ID> \
      --approved-list Aprovados --reproved-list Reprovados --threshold 85

  # Screen PDFs and photographed resumes from a local directory
  cvscreen run --local-dir ./curriculos --folder vaga-dados \
      --content-type application/pdf --content-type image/jpeg --content-type image/png \
      --approved-list <LIST_ID> --reproved-list <LIST_ID>

  # Write a rubric for another position, then use it
  cvscreen generate-prompt --job vaga.txt -o rubrica.md
  cvscreen run --prompt rubrica.md ...

  # Machine-readable report
  cvscreen run --json ... > report.json

ENVIRONMENT VARIABLES:
  GOOGLE_DRIVE_TOKEN      OAuth access token for the Drive v3 API
  TRELLO_API_KEY          Trello API key
  TRELLO_TOKEN            Trello API token
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  GEMINI_API_KEY          Google Gemini API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (openai, anthropic, gemini, ollama)
  PDFIUM_LIB_PATH         Path to libpdfium (otherwise ./ and the system path)
"#;

/// Screen resumes with LLMs and route candidates to Trello lists.
#[derive(Parser, Debug)]
#[command(
    name = "cvscreen",
    version,
    about = "Screen resumes with LLMs and route candidates to Trello lists",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(long, global = true, env = "EDGEQUAKE_PROVIDER")]
    provider: Option<String>,

    /// HTTP timeout in seconds for Drive and Trello requests.
    #[arg(long, global = true, env = "CVSCREEN_HTTP_TIMEOUT", default_value_t = 30)]
    http_timeout: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "CVSCREEN_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "CVSCREEN_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List folders in the file store.
    Folders(StoreArgs),

    /// List Trello boards.
    Boards(TrelloArgs),

    /// List the lists of a Trello board.
    Lists {
        /// Board id.
        board: String,

        #[command(flatten)]
        trello: TrelloArgs,
    },

    /// Generate an evaluation rubric from a job description.
    GeneratePrompt(GenerateArgs),

    /// Screen every resume in a folder.
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct StoreArgs {
    /// Read resumes from this directory instead of Google Drive.
    #[arg(long, env = "CVSCREEN_LOCAL_DIR")]
    local_dir: Option<PathBuf>,

    /// Drive OAuth access token.
    #[arg(long, env = "GOOGLE_DRIVE_TOKEN", hide_env_values = true)]
    drive_token: Option<String>,
}

#[derive(Args, Debug)]
struct TrelloArgs {
    #[arg(long, env = "TRELLO_API_KEY", hide_env_values = true)]
    trello_key: Option<String>,

    #[arg(long, env = "TRELLO_TOKEN", hide_env_values = true)]
    trello_token: Option<String>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// File with the job description (`-` for stdin).
    #[arg(long)]
    job: PathBuf,

    /// Write the rubric here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Model that writes the rubric.
    #[arg(long, env = "CVSCREEN_MODEL", default_value = edgequake_screen::config::DEFAULT_SCORING_MODEL)]
    model: String,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Folder id (Drive) or sub-directory name (`--local-dir`, `.` for the root).
    #[arg(long, env = "CVSCREEN_FOLDER")]
    folder: String,

    #[command(flatten)]
    store: StoreArgs,

    #[command(flatten)]
    trello: TrelloArgs,

    /// Board used to resolve list names given to --approved-list/--reproved-list.
    #[arg(long, env = "CVSCREEN_BOARD")]
    board: Option<String>,

    /// List for approved candidates (id, or name with --board).
    #[arg(long, env = "CVSCREEN_APPROVED_LIST")]
    approved_list: String,

    /// List for reproved candidates (id, or name with --board).
    #[arg(long, env = "CVSCREEN_REPROVED_LIST")]
    reproved_list: String,

    /// Minimum score (inclusive) for approval.
    #[arg(long, env = "CVSCREEN_THRESHOLD", default_value_t = 80,
          value_parser = clap::value_parser!(u32).range(0..=100))]
    threshold: u32,

    /// Evaluation rubric file (default: built-in rubric).
    #[arg(long, env = "CVSCREEN_PROMPT")]
    prompt: Option<PathBuf>,

    /// Content types to screen (repeatable).
    #[arg(long = "content-type", env = "CVSCREEN_CONTENT_TYPES", value_delimiter = ',',
          default_value = "application/pdf")]
    content_types: Vec<String>,

    /// Model that scores resumes.
    #[arg(long, env = "CVSCREEN_MODEL", default_value = edgequake_screen::config::DEFAULT_SCORING_MODEL)]
    model: String,

    /// Model that transcribes image resumes.
    #[arg(long, env = "CVSCREEN_VISION_MODEL", default_value = edgequake_screen::config::DEFAULT_VISION_MODEL)]
    vision_model: String,

    /// Per model call timeout in seconds.
    #[arg(long, env = "CVSCREEN_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Print the batch report as JSON on stdout.
    #[arg(long, env = "CVSCREEN_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "CVSCREEN_NO_PROGRESS")]
    no_progress: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // INFO library logs would fight with the progress bar; the bar's status
    // lines carry the same information.
    let show_progress = match &cli.command {
        Command::Run(args) => !cli.quiet && !args.no_progress && !args.json,
        _ => false,
    };
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match &cli.command {
        Command::Folders(args) => {
            let store = build_store(args, cli.http_timeout)?;
            for folder in store.list_folders().await.context("Failed to list folders")? {
                println!("{}  {}", folder.id, folder.name);
            }
        }
        Command::Boards(args) => {
            let board = build_board(args, cli.http_timeout)?;
            for b in board.list_boards().await.context("Failed to list boards")? {
                println!("{}  {}", b.id, b.name);
            }
        }
        Command::Lists { board, trello } => {
            let client = build_board(trello, cli.http_timeout)?;
            for list in client.list_lists(board).await.context("Failed to list board lists")? {
                println!("{}  {}", list.id, list.name);
            }
        }
        Command::GeneratePrompt(args) => generate(&cli, args).await?,
        Command::Run(args) => run(&cli, args, show_progress).await?,
    }

    Ok(())
}

async fn generate(cli: &Cli, args: &GenerateArgs) -> Result<()> {
    let job_description = if args.job.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read job description from stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(&args.job)
            .await
            .with_context(|| format!("Failed to read job description from {:?}", args.job))?
    };

    let transport = LlmTransport::new(cli.provider.clone());
    transport.check(&args.model)?;

    let prompt = generate_prompt(&transport, &args.model, &job_description)
        .await
        .context("Rubric generation failed")?;

    match args.output {
        Some(ref path) => {
            prompt.save(path).await?;
            if !cli.quiet {
                eprintln!("{} Rubric written to {}", green("✔"), bold(&path.display().to_string()));
            }
        }
        None => println!("{prompt}"),
    }
    Ok(())
}

async fn run(cli: &Cli, args: &RunArgs, show_progress: bool) -> Result<()> {
    let store = build_store(&args.store, cli.http_timeout)?;
    let board = build_board(&args.trello, cli.http_timeout)?;

    let (approved, reproved) = match args.board {
        Some(ref board_id) => {
            let lists = board
                .list_lists(board_id)
                .await
                .context("Failed to list board lists")?;
            (
                resolve_list(&lists, &args.approved_list)?,
                resolve_list(&lists, &args.reproved_list)?,
            )
        }
        None => (args.approved_list.clone(), args.reproved_list.clone()),
    };

    let transport = Arc::new(LlmTransport::new(cli.provider.clone()));
    transport.check(&args.model)?;
    if args.content_types.iter().any(|t| t.starts_with("image/")) {
        transport.check(&args.vision_model)?;
    }

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new_dynamic() as Arc<dyn ScreeningProgressCallback>)
    } else {
        None
    };
    let config = build_config(args, approved, reproved, progress_cb).await?;

    let screener = Screener::new(store, board, transport);
    let report = screener
        .screen_folder(&args.folder, &args.content_types, &config)
        .await
        .context("Screening failed")?;

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
    } else if !show_progress && !cli.quiet {
        for o in &report.outcomes {
            println!(
                "{}\t{}\t{}\t{}",
                o.bucket.label(),
                o.score,
                o.candidate_name,
                if o.card_created { "card" } else { "no card" }
            );
        }
        for s in &report.skipped {
            eprintln!("skipped\t{}\t{}", s.document_name, s.reason);
        }
    }

    if !cli.quiet && !args.json {
        eprintln!(
            "   {} approved  /  {} reproved  /  {} skipped  —  {}ms total",
            green(&report.stats.approved.to_string()),
            yellow(&report.stats.reproved.to_string()),
            dim(&report.stats.skipped.to_string()),
            report.stats.duration_ms,
        );
    }
    Ok(())
}

fn build_store(args: &StoreArgs, http_timeout: u64) -> Result<Arc<dyn FileStore>> {
    if let Some(ref dir) = args.local_dir {
        if !dir.is_dir() {
            bail!("--local-dir {:?} is not a directory", dir);
        }
        return Ok(Arc::new(LocalStore::new(dir)));
    }
    let token = args.drive_token.clone().unwrap_or_default();
    Ok(Arc::new(DriveStore::new(token, http_timeout)?))
}

fn build_board(args: &TrelloArgs, http_timeout: u64) -> Result<Arc<dyn CardBoard>> {
    Ok(Arc::new(TrelloBoard::new(
        args.trello_key.clone().unwrap_or_default(),
        args.trello_token.clone().unwrap_or_default(),
        http_timeout,
    )?))
}

/// Accept a list id or a (case-insensitive) list name.
fn resolve_list(lists: &[edgequake_screen::CardList], wanted: &str) -> Result<String> {
    lists
        .iter()
        .find(|l| l.id == wanted)
        .or_else(|| lists.iter().find(|l| l.name.eq_ignore_ascii_case(wanted)))
        .map(|l| l.id.clone())
        .with_context(|| {
            let names: Vec<&str> = lists.iter().map(|l| l.name.as_str()).collect();
            format!("No list '{}' on the board (have: {})", wanted, names.join(", "))
        })
}

/// Map CLI args to `ScreeningConfig`.
async fn build_config(
    args: &RunArgs,
    approved: String,
    reproved: String,
    progress: Option<ProgressCallback>,
) -> Result<ScreeningConfig> {
    let prompt = match args.prompt {
        Some(ref path) => EvaluationPrompt::from_file(path).await?,
        None => EvaluationPrompt::default(),
    };
    if !prompt.has_output_markers() {
        tracing::warn!("Rubric does not ask for 'Nome do candidato:' and 'Nota final:'; scores may default to 0");
    }

    let mut builder = ScreeningConfig::builder()
        .threshold(args.threshold)
        .prompt(prompt)
        .destinations(approved, reproved)
        .scoring_model(args.model.clone())
        .vision_model(args.vision_model.clone())
        .api_timeout_secs(args.api_timeout);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
