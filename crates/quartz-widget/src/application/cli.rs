use std::io;
use std::path;

use anyhow::Result;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::configuration::Config;
use crate::configuration::ConfigKey;

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    let name = cmd.get_name().to_string();
    generate(gen, cmd, name, &mut io::stdout());
}

fn default_help(key: ConfigKey, help: &str) -> String {
    return format!("{help} [default: {}]", Config::default(key));
}

fn arg_string(key: ConfigKey, env: &'static str, help: &str) -> Arg {
    return Arg::new(key.to_string())
        .long(key.to_string())
        .env(env)
        .num_args(1)
        .help(default_help(key, help));
}

fn arg_number(key: ConfigKey, env: &'static str, help: &str) -> Arg {
    return arg_string(key, env, help).value_parser(|val: &str| -> Result<String, String> {
        return val
            .parse::<u64>()
            .map(|_| val.to_string())
            .map_err(|_| format!("'{val}' is not a non-negative integer"));
    });
}

fn arg_resume() -> Arg {
    return Arg::new(ConfigKey::Resume.to_string())
        .long(ConfigKey::Resume.to_string())
        .env("QUARTZ_RESUME")
        .action(ArgAction::SetTrue)
        .help(default_help(
            ConfigKey::Resume,
            "Keep the previous run's session and reopen the widget if it was left open.",
        ));
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions")
        .arg(
            Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options")
        .subcommand(Command::new("default").about("Print the default config.toml"))
        .subcommand(Command::new("path").about("Print the config.toml path"))
        .arg_required_else_help(true);
}

pub fn build() -> Command {
    return Command::new("quartz-widget")
        .about("Terminal host for the Quartz AI chat widget")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .arg(arg_string(
            ConfigKey::BackendUrl,
            "QUARTZ_BACKEND_URL",
            "Base URL of the chat backend.",
        ))
        .arg(arg_string(
            ConfigKey::AgentName,
            "QUARTZ_AGENT_NAME",
            "Agent the conversation is about.",
        ))
        .arg(arg_string(
            ConfigKey::UserLabel,
            "QUARTZ_USER_LABEL",
            "Label shown above your messages.",
        ))
        .arg(arg_string(
            ConfigKey::AssistantLabel,
            "QUARTZ_ASSISTANT_LABEL",
            "Label shown above assistant messages.",
        ))
        .arg(arg_number(
            ConfigKey::CountdownSeconds,
            "QUARTZ_COUNTDOWN_SECONDS",
            "Seconds before the widget closes once the conversation concludes.",
        ))
        .arg(arg_number(
            ConfigKey::CompletionDelayMs,
            "QUARTZ_COMPLETION_DELAY_MS",
            "Milliseconds between a concluding reply and the closing countdown.",
        ))
        .arg(arg_number(
            ConfigKey::RequestTimeoutMs,
            "QUARTZ_REQUEST_TIMEOUT_MS",
            "Backend request timeout in milliseconds.",
        ))
        .arg(arg_string(
            ConfigKey::StorageFile,
            "QUARTZ_STORAGE_FILE",
            "JSON file the widget state is persisted to. Empty keeps state in memory.",
        ))
        .arg(arg_string(
            ConfigKey::LogFile,
            "QUARTZ_LOG_FILE",
            "File JSON logs are written to. Empty disables logging.",
        ))
        .arg(arg_resume())
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("QUARTZ_CONFIG_FILE")
                .num_args(1)
                .help(default_help(ConfigKey::ConfigFile, "Path to configuration file.")),
        );
}

/// Installs a JSON subscriber writing to the configured log file, so log lines
/// never land on the terminal the widget draws on. The returned guard flushes
/// pending lines when dropped.
pub fn init_tracing() -> Result<Option<WorkerGuard>> {
    let log_file = Config::get(ConfigKey::LogFile);
    if log_file.is_empty() {
        return Ok(None);
    }

    let log_path = path::PathBuf::from(&log_file);
    let directory = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => path::PathBuf::from("."),
    };
    let file_name = log_path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "quartz-widget.log".to_string());
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_env("QUARTZ_LOG")
        .unwrap_or_else(|_| EnvFilter::new("quartz_widget=info,quartz_client=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json().with_writer(writer).with_ansi(false))
        .try_init()?;

    return Ok(Some(guard));
}

/// Handles subcommands and loads configuration. Returns false when the
/// process has nothing left to do.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();
    return handle_matches(&matches).await;
}

async fn handle_matches(matches: &ArgMatches) -> Result<bool> {
    match matches.subcommand() {
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(false);
        }
        Some(("config", subcmd_matches)) => {
            match subcmd_matches.subcommand() {
                Some(("default", _)) => {
                    println!("{}", Config::serialize_default(build()));
                }
                Some(("path", _)) => {
                    Config::load(build(), vec![matches]).await?;
                    println!("{}", Config::get(ConfigKey::ConfigFile));
                }
                _ => {
                    subcommand_config().print_long_help()?;
                }
            }
            return Ok(false);
        }
        _ => {
            Config::load(build(), vec![matches]).await?;
        }
    }

    return Ok(true);
}
