// GrepMark - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading, then logging initialisation (the config
//    selects the log level and log file)
// 3. Store and session wiring from platform paths
// 4. Subcommand dispatch to the orchestrator

use grepmark::app::orchestrator::{self, Notice, NoticeLevel, RunOutcome};
use grepmark::app::session::SessionState;
use grepmark::app::store::{Placement, ProfileStore};
use grepmark::core::model::{ColoredWord, WordLists};
use grepmark::platform::config::{load_config, AppConfig, PlatformPaths};
use grepmark::platform::fs;
use grepmark::ui::page::{write_page, PageOptions};
use grepmark::ui::theme::Theme;
use grepmark::util::error::{GrepMarkError, ImportError, InputError, StoreError};
use grepmark::util::{self, constants};

use clap::{Args, Parser, Subcommand};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Exit code for refused operations (unknown profile, no name given).
const EXIT_REFUSED: i32 = 2;

/// GrepMark - keep the lines you care about, drop the ones you don't,
/// and colour the words that matter.
///
/// Reads text from a file or stdin, filters lines by include/exclude
/// words, and writes a self-contained HTML page with highlighted words.
/// Word lists can be saved as named profiles.
#[derive(Parser, Debug)]
#[command(name = "grepmark", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    /// Override the configuration directory (config.toml, primary profiles).
    #[arg(long = "config-dir", global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Override the data directory (backup profiles, session).
    #[arg(long = "data-dir", global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Palette for automatically coloured highlight words.
    #[arg(long = "theme", global = true, value_name = "dark|light")]
    theme: Option<Theme>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter and highlight text, writing an HTML result page.
    Run {
        /// Input file ("-" or omitted reads stdin).
        file: Option<PathBuf>,

        #[command(flatten)]
        words: WordArgs,

        /// Use the word lists of a stored profile.
        #[arg(short = 'p', long = "profile", value_name = "NAME", conflicts_with_all = ["include", "exclude", "highlight"])]
        profile: Option<String>,

        /// Write the page to this file instead of stdout.
        #[arg(short = 'o', long = "output", value_name = "OUT.html")]
        output: Option<PathBuf>,

        /// Neither read nor update the session snapshot.
        #[arg(long = "no-session")]
        no_session: bool,
    },

    /// Save word lists as a named profile (defaults to the session's lists).
    Save {
        name: String,

        #[command(flatten)]
        words: WordArgs,
    },

    /// Load a profile into the session.
    Load { name: String },

    /// Delete a profile from both tiers.
    Delete { name: String },

    /// List stored profiles.
    List,

    /// Print canonical JSON for a profile, or for the session.
    Export { name: Option<String> },

    /// Import canonical JSON into the session: inline JSON, @FILE, or - for stdin.
    Import {
        #[arg(value_name = "JSON|@FILE|-")]
        source: String,

        /// Also save the imported lists under this profile name.
        #[arg(long = "save", value_name = "NAME")]
        save: Option<String>,
    },

    /// Show or clear the session snapshot.
    Session {
        #[arg(long = "clear")]
        clear: bool,
    },
}

/// Word list options shared by `run` and `save`.
#[derive(Args, Debug, Default)]
struct WordArgs {
    /// Keep lines containing WORD (any include word suffices).
    #[arg(short = 'g', long = "grep", value_name = "WORD")]
    include: Vec<String>,

    /// Drop lines containing WORD (exclusion wins over inclusion).
    #[arg(short = 'v', long = "exclude", value_name = "WORD")]
    exclude: Vec<String>,

    /// Highlight WORD, optionally with COLOR (split on the last '=').
    #[arg(short = 'H', long = "highlight", value_name = "WORD[=COLOR]")]
    highlight: Vec<String>,
}

impl WordArgs {
    fn is_given(&self) -> bool {
        !(self.include.is_empty() && self.exclude.is_empty() && self.highlight.is_empty())
    }

    fn to_lists(&self, theme: Theme) -> WordLists {
        let highlights = self
            .highlight
            .iter()
            .enumerate()
            .map(|(i, spec)| parse_highlight(spec, i, theme))
            .collect();
        WordLists::new(self.include.clone(), self.exclude.clone(), highlights)
    }
}

/// Parse `WORD[=COLOR]`. Without a colour (or with an empty one) the
/// `index`-th palette colour is used.
fn parse_highlight(spec: &str, index: usize, theme: Theme) -> ColoredWord {
    match spec.rsplit_once('=') {
        Some((word, color)) if !color.trim().is_empty() => ColoredWord::new(word, color.trim()),
        Some((word, _)) => ColoredWord::new(word, theme.auto_color(index)),
        None => ColoredWord::new(spec, theme.auto_color(index)),
    }
}

/// Resolved runtime context shared by all subcommands.
struct Context {
    config: AppConfig,
    paths: PlatformPaths,
    theme: Theme,
}

impl Context {
    fn store(&self) -> ProfileStore {
        let primary = self
            .config
            .primary_file
            .clone()
            .unwrap_or_else(|| self.paths.primary_store_file());
        let backup = self
            .config
            .backup_file
            .clone()
            .unwrap_or_else(|| self.paths.backup_store_file());
        ProfileStore::open(&primary, &backup)
    }

    fn session(&self) -> SessionState {
        SessionState::new(self.paths.session_file())
    }
}

fn main() {
    let cli = Cli::parse();

    let paths =
        PlatformPaths::resolve().with_overrides(cli.config_dir.as_deref(), cli.data_dir.as_deref());
    let (config, config_warnings) = load_config(&paths.config_file());

    util::logging::init(
        cli.debug,
        config.log_level.as_deref(),
        config.log_file.as_deref(),
    );

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        "GrepMark starting"
    );
    for warning in &config_warnings {
        tracing::warn!(error = %warning, "Configuration warning");
    }

    let theme = cli
        .theme
        .unwrap_or_else(|| Theme::from_dark_mode(config.dark_mode));
    let ctx = Context {
        config,
        paths,
        theme,
    };

    match dispatch(&ctx, cli.command) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn dispatch(ctx: &Context, command: Command) -> Result<i32, GrepMarkError> {
    match command {
        Command::Run {
            file,
            words,
            profile,
            output,
            no_session,
        } => cmd_run(ctx, file.as_deref(), &words, profile.as_deref(), output.as_deref(), no_session),

        Command::Save { name, words } => {
            let lists = if words.is_given() {
                words.to_lists(ctx.theme)
            } else {
                session_words(&ctx.session())
            };
            let reply = orchestrator::save_profile(&mut ctx.store(), &name, &lists);
            Ok(report(&reply.notice))
        }

        Command::Load { name } => {
            let reply = orchestrator::load_profile(&ctx.store(), &ctx.session(), &name);
            let code = report(&reply.notice);
            if let Some(profile) = reply.profile {
                print_words(&profile.words)?;
            }
            Ok(code)
        }

        Command::Delete { name } => {
            let reply = orchestrator::delete_profile(&mut ctx.store(), &name);
            Ok(report(&reply.notice))
        }

        Command::List => {
            let store = ctx.store();
            for name in orchestrator::list_profiles(&store) {
                match store.placement(&name) {
                    Placement::BackupOnly => println!("{name}\t(backup)"),
                    Placement::Both => println!("{name}\t(primary, backup)"),
                    Placement::PrimaryOnly | Placement::Absent => println!("{name}"),
                }
            }
            Ok(0)
        }

        Command::Export { name } => {
            let json = match orchestrator::export_profile(&ctx.store(), &ctx.session(), name.as_deref()) {
                Ok(json) => json,
                Err(GrepMarkError::Store(e @ StoreError::NotFound { .. })) => {
                    return Ok(report(&Notice::error(e.to_string())));
                }
                Err(e) => return Err(e),
            };
            println!("{json}");
            Ok(0)
        }

        Command::Import { source, save } => {
            let json = read_import_source(&source)?;
            let reply =
                orchestrator::import_profile(&mut ctx.store(), &ctx.session(), &json, save.as_deref())?;
            Ok(report(&reply.notice))
        }

        Command::Session { clear } => {
            let session = ctx.session();
            if clear {
                session.clear()?;
                println!("Session cleared");
                return Ok(0);
            }
            match orchestrator::restore_session(&session) {
                Some(snapshot) => {
                    if !snapshot.setting_name.is_empty() {
                        println!("setting: {}", snapshot.setting_name);
                    }
                    print_words(&snapshot.words)?;
                }
                None => println!("Session is empty"),
            }
            Ok(0)
        }
    }
}

fn cmd_run(
    ctx: &Context,
    file: Option<&Path>,
    words: &WordArgs,
    profile: Option<&str>,
    output: Option<&Path>,
    no_session: bool,
) -> Result<i32, GrepMarkError> {
    let session = ctx.session();

    let lists = if let Some(name) = profile {
        match ctx.store().load(name) {
            Ok(p) => {
                if !no_session {
                    orchestrator::record_session(&session, &p.name, &p.words);
                }
                p.words
            }
            Err(e @ (StoreError::NotFound { .. } | StoreError::EmptyName)) => {
                return Ok(report(&Notice::error(e.to_string())));
            }
            Err(e) => return Err(e.into()),
        }
    } else if words.is_given() {
        let lists = words.to_lists(ctx.theme);
        if !no_session {
            orchestrator::record_session(&session, "", &lists);
        }
        lists
    } else if no_session {
        WordLists::default()
    } else {
        session_words(&session)
    };

    let lines = fs::read_input_lines(file)?;

    let result = match orchestrator::run(&lines, &lists) {
        RunOutcome::Rendered(result) => result,
        RunOutcome::NoMatches => return Ok(report(&RunOutcome::no_matches_notice())),
    };

    let options = PageOptions {
        font_size: ctx.config.font_size,
        wrap: ctx.config.wrap,
        theme: ctx.theme,
        source: match file {
            Some(p) if p != Path::new("-") => p.display().to_string(),
            _ => "<stdin>".to_string(),
        },
    };

    match output {
        Some(path) => {
            let output_err = |source| GrepMarkError::Output {
                path: path.to_path_buf(),
                source,
            };
            let f = std::fs::File::create(path).map_err(output_err)?;
            write_page(&result, &options, BufWriter::new(f)).map_err(output_err)?;
            tracing::info!(path = %path.display(), lines = result.lines.len(), "Result page written");
        }
        None => {
            let stdout = io::stdout();
            write_page(&result, &options, BufWriter::new(stdout.lock())).map_err(|source| {
                GrepMarkError::Output {
                    path: PathBuf::from("<stdout>"),
                    source,
                }
            })?;
        }
    }
    Ok(0)
}

/// Word lists of the session snapshot, or empty lists.
fn session_words(session: &SessionState) -> WordLists {
    orchestrator::restore_session(session)
        .map(|s| s.words)
        .unwrap_or_default()
}

/// Read import JSON: `-` is stdin, `@path` is a file, anything else is
/// the JSON text itself.
fn read_import_source(source: &str) -> Result<String, GrepMarkError> {
    if source == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|source| InputError::Io {
                path: PathBuf::from("<stdin>"),
                source,
            })?;
        return Ok(text);
    }
    match source.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            GrepMarkError::Import(ImportError::Io {
                path: PathBuf::from(path),
                source: e,
            })
        }),
        None => Ok(source.to_string()),
    }
}

/// Print a notice and return the exit code it implies.
fn report(notice: &Notice) -> i32 {
    match notice.level {
        NoticeLevel::Info => {
            println!("{notice}");
            0
        }
        NoticeLevel::Warning => {
            eprintln!("Warning: {notice}");
            0
        }
        NoticeLevel::Error => {
            eprintln!("Error: {notice}");
            EXIT_REFUSED
        }
    }
}

/// Print word lists to stdout.
fn print_words(words: &WordLists) -> Result<(), GrepMarkError> {
    write_words(words, io::stdout().lock()).map_err(|source| GrepMarkError::Output {
        path: PathBuf::from("<stdout>"),
        source,
    })
}

fn write_words<W: Write>(words: &WordLists, mut out: W) -> io::Result<()> {
    writeln!(out, "grep:      {}", words.include.join(", "))?;
    writeln!(out, "exclude:   {}", words.exclude.join(", "))?;
    let highlights = words
        .highlights
        .iter()
        .map(|cw| format!("{}={}", cw.word, cw.color))
        .collect::<Vec<_>>()
        .join(", ");
    writeln!(out, "highlight: {highlights}")?;
    out.flush()
}
