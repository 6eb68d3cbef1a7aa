use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_style;

use agentic_rpg_client::client::{ConnectOutcome, GameClient};
use agentic_rpg_client::config::{AppConfig, CliConfig, FileConfig, DEFAULT_EVENT_LOG_LINES};
use agentic_rpg_client::health::HealthChecker;
use agentic_rpg_client::model::PlayerCommand;
use agentic_rpg_client::store::GameStore;
use cli_style::{get_styles, say, CommandHelp, Tone};

use rustyline::{
    completion::Completer,
    highlight::Highlighter,
    history::{FileHistory, History},
    validate::Validator,
    CompletionType, Config, Editor, Helper,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(styles=get_styles(), version)]
struct CliArgs {
    /// WebSocket base URL of the game server, e.g. ws://localhost:8000.
    /// Falls back to $RPG_WEBSOCKET_URL.
    #[clap(long)]
    pub websocket_url: Option<String>,

    /// Identifier to join the game with. A random one is generated if omitted.
    #[clap(long)]
    pub client_id: Option<String>,

    /// Path to a TOML config file. Its values override the CLI flags.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// How many event log lines to show with each world update.
    #[clap(long, default_value_t = DEFAULT_EVENT_LOG_LINES)]
    pub event_log_lines: usize,

    /// File to keep the prompt history in.
    #[clap(long, value_parser = parse_path)]
    pub history_file: Option<PathBuf>,

    /// Only check whether the game server is healthy, then exit.
    #[clap(long)]
    pub health_check: bool,
}

/// Commands handled by the client itself, typed with a leading `/`.
#[derive(Parser)]
#[command(styles=get_styles(), name = "", disable_help_subcommand = true)]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

#[derive(Subcommand)]
enum InnerCommand {
    /// Shows the connection status and who you are playing as.
    Status,

    /// Prints the latest world snapshot.
    State,

    /// Asks the game server whether it is healthy.
    Health,

    /// Connects to the game server. Does nothing while already connected.
    Connect { client_id: Option<String> },

    /// Closes the connection to the game server.
    Disconnect,

    /// Shows the available commands.
    Help,

    /// Close this program.
    Exit,
}

enum CommandExecutionResult {
    Ok,
    Exit,
    Error(String),
}

const PROMPT: &str = "rpg> ";

struct PromptContext {
    client: Arc<GameClient>,
    config: AppConfig,
    health: HealthChecker,
    runtime: Handle,
}

fn print_commands_help() {
    let commands: Vec<CommandHelp> = InnerCli::command()
        .get_subcommands()
        .map(|sc| CommandHelp {
            name: sc.get_name().to_string(),
            args: sc
                .get_positionals()
                .map(|arg| format!("[{}]", arg.get_id()))
                .collect::<Vec<_>>()
                .join(" "),
            description: sc.get_about().map(|a| a.to_string()).unwrap_or_default(),
        })
        .collect();
    cli_style::print_help(&commands);
}

fn yes_no(value: bool) -> String {
    let text = if value { "yes" } else { "no" };
    text.to_string()
}

fn print_status(ctx: &PromptContext) {
    let state = ctx.client.store().game_state().get();
    let client_id = ctx
        .client
        .client_id()
        .unwrap_or_else(|| ctx.config.client_id.clone());

    cli_style::print_fields(
        "Status",
        &[
            ("Server", ctx.client.endpoint().base().to_string()),
            ("Client id", client_id),
            ("Connected", yes_no(ctx.client.is_connected())),
            ("Players online", state.player_count().to_string()),
            (
                "Version",
                format!("{} ({})", env!("CARGO_PKG_VERSION"), env!("GIT_HASH")),
            ),
        ],
    );
}

fn run_health_check(ctx: &PromptContext) -> CommandExecutionResult {
    match ctx.runtime.block_on(ctx.health.check()) {
        Ok(status) if status.is_ok() => {
            say(Tone::Success, &format!("Server is healthy: {}", status.message));
            CommandExecutionResult::Ok
        }
        Ok(status) => CommandExecutionResult::Error(format!(
            "Server reported '{}': {}",
            status.status, status.message
        )),
        Err(err) => CommandExecutionResult::Error(format!("{:#}", err)),
    }
}

fn execute_inner_command(line: &str, ctx: &PromptContext) -> CommandExecutionResult {
    let args =
        shlex::split(line).unwrap_or_else(|| line.split_whitespace().map(String::from).collect());

    let cli = InnerCli::try_parse_from(std::iter::once(" ").chain(args.iter().map(String::as_str)));

    match cli {
        Ok(cli) => match cli.command {
            InnerCommand::Status => print_status(ctx),
            InnerCommand::State => {
                let state = ctx.client.store().game_state().get();
                cli_style::print_snapshot(&state, ctx.config.event_log_lines);
            }
            InnerCommand::Health => return run_health_check(ctx),
            InnerCommand::Connect { client_id } => {
                let client_id = client_id.unwrap_or_else(|| ctx.config.client_id.clone());
                let _guard = ctx.runtime.enter();
                match ctx.client.connect(&client_id) {
                    ConnectOutcome::Started => {
                        say(Tone::Info, &format!("Connecting as '{}'...", client_id))
                    }
                    ConnectOutcome::AlreadyConnected => {
                        say(Tone::Warning, "Already connected, /disconnect first")
                    }
                }
            }
            InnerCommand::Disconnect => ctx.runtime.block_on(ctx.client.disconnect()),
            InnerCommand::Help => print_commands_help(),
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

fn execute_command(line: &str, ctx: &PromptContext) -> CommandExecutionResult {
    let line = line.trim();
    if let Some(inner) = line.strip_prefix('/') {
        return execute_inner_command(inner, ctx);
    }

    let Some(command) = PlayerCommand::parse_line(line) else {
        return CommandExecutionResult::Ok;
    };
    match ctx.client.send(&command) {
        Ok(()) => CommandExecutionResult::Ok,
        Err(err) => CommandExecutionResult::Error(format!("{} (try /connect)", err)),
    }
}

#[derive(rustyline_derive::Hinter)]
struct PromptHelper {
    commands_names: Vec<String>,
}

impl PromptHelper {
    pub fn new() -> Self {
        let commands_names: Vec<String> = InnerCli::command()
            .get_subcommands()
            .map(|sc| format!("/{}", sc.get_name()))
            .collect();

        PromptHelper { commands_names }
    }
}

impl Completer for PromptHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        if !line.starts_with('/') || line.contains(' ') {
            return Ok((0, Vec::with_capacity(0)));
        }
        let matches = self
            .commands_names
            .iter()
            .filter(|c| c.starts_with(line))
            .cloned()
            .collect::<Vec<_>>();

        Ok((0, matches))
    }
}

impl Highlighter for PromptHelper {}
impl Validator for PromptHelper {}
impl Helper for PromptHelper {}

/// Blocking prompt loop; runs on its own thread.
fn run_prompt(ctx: PromptContext) -> Result<()> {
    let config = Config::builder()
        .completion_type(CompletionType::List)
        .build();

    let mut rl = Editor::<PromptHelper, FileHistory>::with_config(config)?;
    rl.set_helper(Some(PromptHelper::new()));

    if let Some(path) = &ctx.config.history_file {
        if path.exists() {
            if let Err(e) = rl.history_mut().load(path) {
                say(Tone::Warning, &format!("Could not load history: {}", e));
            }
        }
    }

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }
                match execute_command(&line, &ctx) {
                    CommandExecutionResult::Ok => {}
                    CommandExecutionResult::Exit => break,
                    CommandExecutionResult::Error(err) => say(Tone::Failure, &err),
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
                say(Tone::Failure, &format!("Error: {:?}", e));
                break;
            }
        }
    }

    if let Some(path) = &ctx.config.history_file {
        if let Err(e) = rl.history_mut().save(path) {
            say(Tone::Warning, &format!("Could not save history: {}", e));
        }
    }
    Ok(())
}

/// Prints every world snapshot the server pushes.
fn spawn_state_printer(store: &GameStore, log_lines: usize) -> JoinHandle<()> {
    let mut updates = store.game_state().subscribe();
    tokio::spawn(async move {
        while let Some(state) = updates.changed().await {
            cli_style::print_snapshot(&state, log_lines);
        }
    })
}

/// Reports connectivity transitions.
fn spawn_connection_printer(store: &GameStore) -> JoinHandle<()> {
    let mut updates = store.socket_connected().subscribe();
    tokio::spawn(async move {
        let mut was_connected = updates.latest();
        while let Some(connected) = updates.changed().await {
            if connected == was_connected {
                continue;
            }
            was_connected = connected;
            if connected {
                say(Tone::Success, "Connected to the game server");
            } else {
                say(Tone::Warning, "Disconnected from the game server");
            }
            cli_style::flush();
        }
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let cli_config = CliConfig {
        websocket_url: cli_args.websocket_url,
        client_id: cli_args.client_id,
        event_log_lines: cli_args.event_log_lines,
        history_file: cli_args.history_file,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;
    let health = HealthChecker::new(&config.endpoint);

    if cli_args.health_check {
        match health.check().await {
            Ok(status) if status.is_ok() => {
                println!("{}: {}", status.status, status.message);
                std::process::exit(0);
            }
            Ok(status) => {
                eprintln!("Health check failed: {}: {}", status.status, status.message);
                std::process::exit(1);
            }
            Err(e) => {
                eprintln!("Health check failed: {:#}", e);
                std::process::exit(1);
            }
        }
    }

    cli_style::print_banner();

    let store = GameStore::new();
    let client = Arc::new(GameClient::new(config.endpoint.clone(), store.clone()));
    let state_printer = spawn_state_printer(&store, config.event_log_lines);
    let connection_printer = spawn_connection_printer(&store);

    let joining = format!(
        "Joining {} as '{}'. Type /help for commands.",
        config.endpoint.base(),
        config.client_id
    );
    say(Tone::Info, &joining);
    client.connect(&config.client_id);

    let ctx = PromptContext {
        client: client.clone(),
        config,
        health,
        runtime: Handle::current(),
    };
    let prompt_result = tokio::task::spawn_blocking(move || run_prompt(ctx)).await?;

    client.disconnect().await;
    state_printer.abort();
    connection_printer.abort();
    cli_style::print_goodbye();

    prompt_result
}
