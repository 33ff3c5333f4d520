use anyhow::{Context, Result};
use chromavisage::cli_style::{self, get_styles, CommandGroup, CommandHelp};
use chromavisage::config::{AppConfig, CliConfig, FileConfig, ProviderKind};
use chromavisage::inference::{format_size, ImageInput};
use chromavisage::session::{AnalysisOutcome, AnalysisSession, Completion, SessionState};
use chromavisage::seasons::SeasonId;
use chromavisage::view::{terminal, View};
use clap::{CommandFactory, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rustyline::{
    completion::Completer, highlight::Highlighter, history::FileHistory, validate::Validator,
    CompletionType, Config, Editor, Helper,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(styles=get_styles(), version, about)]
struct CliArgs {
    /// Portrait to analyze. Starts the interactive shell when omitted.
    #[clap(value_parser = parse_path)]
    pub image: Option<PathBuf>,

    /// Path to a TOML config file. Its values override the flags below.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Print the resulting view as JSON instead of the styled report.
    #[clap(long)]
    pub json: bool,

    /// The vision model backend.
    #[clap(long, value_enum, default_value_t = ProviderKind::Gemini)]
    pub provider: ProviderKind,

    /// API base URL, defaults to the provider's public endpoint.
    #[clap(long)]
    pub base_url: Option<String>,

    /// Model name, defaults per provider.
    #[clap(long)]
    pub model: Option<String>,

    /// Environment variable holding the API key.
    #[clap(long)]
    pub api_key_env: Option<String>,

    /// Shell command printing the API key, run before every analysis.
    #[clap(long)]
    pub api_key_command: Option<String>,

    /// Largest image accepted, in megabytes.
    #[clap(long, default_value_t = 20)]
    pub max_image_mb: u64,

    /// Sampling temperature, within [0, 1].
    #[clap(long, default_value_t = 0.2)]
    pub temperature: f32,

    /// Optional cap on the generated tokens.
    #[clap(long)]
    pub max_output_tokens: Option<u32>,

    /// Timeout in seconds for the provider call.
    #[clap(long, default_value_t = 60)]
    pub timeout_sec: u64,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            provider: self.provider,
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            api_key_env: self.api_key_env.clone(),
            api_key_command: self.api_key_command.clone(),
            max_image_mb: self.max_image_mb,
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
            timeout_sec: self.timeout_sec,
        }
    }
}

fn init_logging(default_level: LevelFilter) {
    // Logs go to stderr so that stdout only carries the report.
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli_args = CliArgs::parse();

    init_logging(if cli_args.image.is_some() {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    });

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let app_config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;
    info!(
        provider = ?app_config.provider,
        model = %app_config.model,
        base_url = %app_config.base_url,
        max_image = %format_size(app_config.max_image_bytes),
        "Configuration resolved"
    );

    match &cli_args.image {
        Some(path) => run_once(&app_config, path, cli_args.json).await,
        None => {
            run_shell(&app_config).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// One-shot mode
// ═══════════════════════════════════════════════════════════════════════════════

async fn run_once(config: &AppConfig, path: &Path, json: bool) -> Result<ExitCode> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read image {:?}", path))?;

    let mut session = AnalysisSession::new(config.build_client());
    // Rejections leave the session idle with the error, which the view shows.
    if let Ok(pending) = session.select(Some(ImageInput::Bytes(bytes))) {
        let spinner = loading_spinner(&session.view(), json)?;
        let outcome = pending.run().await;
        spinner.finish_and_clear();
        session.complete(outcome);
    }

    let view = session.view();
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        terminal::print_view(&view);
    }

    Ok(match session.state() {
        SessionState::Displaying { .. } => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

fn loading_spinner(view: &View<'_>, hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("  {spinner} {msg}")?);
    if let View::Loading { title, message } = view {
        spinner.set_message(format!("{}  {}", title, message));
    }
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Interactive shell
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Parser)]
#[command(styles=get_styles(), name = "", disable_help_subcommand = true)]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

#[derive(Subcommand)]
enum InnerCommand {
    /// Selects a portrait and starts analyzing it in the background.
    Select { path: Option<String> },

    /// Shows the current view.
    Status,

    /// Waits for the running analysis and shows its outcome.
    Wait,

    /// Discards the displayed result, or cancels the running analysis.
    Reset,

    /// Lists the 12 seasons in wheel order.
    Seasons,

    /// Shows a season with its palette.
    Season { id: String },

    /// Checks that the provider accepts the configured API key.
    Ping,

    /// Shows the available commands.
    Help,

    /// Close this program.
    Exit,
}

const COMMANDS: &[CommandHelp] = &[
    CommandHelp {
        name: "select",
        args: "<path>",
        description: "Analyze a portrait in the background",
        group: CommandGroup::Analysis,
    },
    CommandHelp {
        name: "status",
        args: "",
        description: "Show the current view",
        group: CommandGroup::Analysis,
    },
    CommandHelp {
        name: "wait",
        args: "",
        description: "Wait for the running analysis",
        group: CommandGroup::Analysis,
    },
    CommandHelp {
        name: "reset",
        args: "",
        description: "Discard the result or cancel the analysis",
        group: CommandGroup::Analysis,
    },
    CommandHelp {
        name: "seasons",
        args: "",
        description: "List the 12 seasons",
        group: CommandGroup::Seasons,
    },
    CommandHelp {
        name: "season",
        args: "<ID>",
        description: "Show a season and its palette",
        group: CommandGroup::Seasons,
    },
    CommandHelp {
        name: "ping",
        args: "",
        description: "Check the provider and API key",
        group: CommandGroup::System,
    },
    CommandHelp {
        name: "help",
        args: "",
        description: "Show this help",
        group: CommandGroup::System,
    },
    CommandHelp {
        name: "exit",
        args: "",
        description: "Close this program",
        group: CommandGroup::System,
    },
];

enum CommandExecutionResult {
    Ok,
    Exit,
    Error(String),
}

/// The session plus the task running its current analysis, if any.
struct Shell {
    session: AnalysisSession,
    in_flight: Option<JoinHandle<AnalysisOutcome>>,
}

impl Shell {
    fn new(session: AnalysisSession) -> Self {
        Self {
            session,
            in_flight: None,
        }
    }

    /// Applies the outcome of a finished background analysis, if any.
    async fn poll_in_flight(&mut self) {
        if self.in_flight.as_ref().is_some_and(|h| h.is_finished()) {
            if let Some(Completion::Applied) = self.join_in_flight().await {
                terminal::print_view(&self.session.view());
            }
        }
    }

    async fn join_in_flight(&mut self) -> Option<Completion> {
        let handle = self.in_flight.take()?;
        match handle.await {
            Ok(outcome) => Some(self.session.complete(outcome)),
            Err(err) => {
                error!("Analysis task failed: {}", err);
                self.session.reset();
                None
            }
        }
    }

    async fn execute_command(&mut self, line: String) -> CommandExecutionResult {
        if line.is_empty() {
            return CommandExecutionResult::Ok;
        }

        let args = shlex::split(&line)
            .unwrap_or_else(|| line.split_whitespace().map(String::from).collect());

        let cli =
            InnerCli::try_parse_from(std::iter::once(" ").chain(args.iter().map(String::as_str)));

        match cli {
            Ok(cli) => match cli.command {
                InnerCommand::Select { path } => return self.select(path).await,
                InnerCommand::Status => terminal::print_view(&self.session.view()),
                InnerCommand::Wait => {
                    if self.in_flight.is_none() {
                        cli_style::print_info("No analysis is running.");
                        return CommandExecutionResult::Ok;
                    }
                    let spinner = match loading_spinner(&self.session.view(), false) {
                        Ok(spinner) => spinner,
                        Err(err) => return CommandExecutionResult::Error(err.to_string()),
                    };
                    let completion = self.join_in_flight().await;
                    spinner.finish_and_clear();
                    if completion.is_some() {
                        terminal::print_view(&self.session.view());
                    }
                }
                InnerCommand::Reset => {
                    let was = self.session.state().name();
                    self.session.reset();
                    // The cancelled task resolves right away and is discarded.
                    if let Some(completion) = self.join_in_flight().await {
                        debug!(?completion, "Cancelled analysis joined");
                    }
                    if was != "idle" {
                        cli_style::print_success("Session reset.");
                    }
                }
                InnerCommand::Seasons => terminal::print_seasons_table(),
                InnerCommand::Season { id } => match id.parse::<SeasonId>() {
                    Ok(id) => terminal::print_season(id.entry()),
                    Err(err) => return CommandExecutionResult::Error(err.to_string()),
                },
                InnerCommand::Ping => match self.session.client().health_check().await {
                    Ok(()) => cli_style::print_success(&format!(
                        "{} ({}) is reachable.",
                        self.session.client().provider_name(),
                        self.session.client().model()
                    )),
                    Err(err) => return CommandExecutionResult::Error(err.to_string()),
                },
                InnerCommand::Help => cli_style::print_help(COMMANDS),
                InnerCommand::Exit => return CommandExecutionResult::Exit,
            },
            Err(e) => {
                if e.print().is_err() {
                    println!("{}", e);
                }
            }
        }
        CommandExecutionResult::Ok
    }

    async fn select(&mut self, path: Option<String>) -> CommandExecutionResult {
        let input = match path {
            Some(path) => {
                let path = match parse_path(&path) {
                    Ok(path) => path,
                    Err(err) => return CommandExecutionResult::Error(err.to_string()),
                };
                match tokio::fs::read(&path).await {
                    Ok(bytes) => Some(ImageInput::Bytes(bytes)),
                    Err(err) => {
                        return CommandExecutionResult::Error(format!(
                            "Could not read {:?}: {}",
                            path, err
                        ))
                    }
                }
            }
            None => None,
        };

        match self.session.select(input) {
            Ok(pending) => {
                self.in_flight = Some(tokio::spawn(pending.run()));
                terminal::print_view(&self.session.view());
                CommandExecutionResult::Ok
            }
            Err(err) => {
                warn!(state = self.session.state().name(), "Select rejected: {}", err);
                CommandExecutionResult::Error(err.to_string())
            }
        }
    }
}

#[derive(rustyline_derive::Hinter)]
struct MyHelper {
    commands_names: Vec<String>,
}

impl MyHelper {
    pub fn new() -> Self {
        let commands_names: Vec<String> = InnerCli::command()
            .get_subcommands()
            .map(|sc| sc.get_name().to_string())
            .collect();

        MyHelper { commands_names }
    }
}

impl Completer for MyHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        if line.contains(' ') {
            return Ok((0, Vec::with_capacity(0)));
        }
        let matches = self
            .commands_names
            .iter()
            .filter(|c| c.starts_with(line))
            .map(|c| c.to_string())
            .collect::<Vec<_>>();

        Ok((0, matches))
    }
}

impl Highlighter for MyHelper {}
impl Validator for MyHelper {}
impl Helper for MyHelper {}

async fn run_shell(config: &AppConfig) -> Result<()> {
    let mut shell = Shell::new(AnalysisSession::new(config.build_client()));
    cli_style::print_welcome(&shell.session);
    terminal::print_view(&shell.session.view());

    let rl_config = Config::builder()
        .completion_type(CompletionType::List)
        .build();
    let mut rl = Editor::<MyHelper, FileHistory>::with_config(rl_config)?;
    rl.set_helper(Some(MyHelper::new()));

    loop {
        shell.poll_in_flight().await;
        let readline = rl.readline(&cli_style::get_prompt(shell.session.state()));
        shell.poll_in_flight().await;

        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                match shell.execute_command(line.trim().to_string()).await {
                    CommandExecutionResult::Ok => {}
                    CommandExecutionResult::Exit => break,
                    CommandExecutionResult::Error(err) => {
                        cli_style::print_error(&err);
                        continue;
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("CTRL-D: exiting.");
                break;
            }
            Err(e) => {
                println!("Error: {:?}", e);
                break;
            }
        }
        cli_style::flush();
    }

    shell.session.reset();
    cli_style::print_goodbye();
    Ok(())
}
