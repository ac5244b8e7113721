use anyhow::Context;
use chatgql::clock::SystemClock;
use chatgql::conversion::{self, InboundOptions};
use chatgql::gql::{CreateChatCompletionData, CreateChatCompletionOutput, MessageOutput};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chatgql")]
#[command(about = "Convert chat messages to and from the createChatCompletion GraphQL format", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Create the configuration directory and a default config file.
    Init {
        /// Config file path (default: CHATGQL_CONFIG_PATH or ~/.chatgql/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Convert a JSON array of messages (tagged by "type") into MessageInput records.
    Encode {
        /// Config file path (default: CHATGQL_CONFIG_PATH or ~/.chatgql/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Input file (default: stdin)
        #[arg(long, short, value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Convert mutation output (record array, createChatCompletion object, or full GraphQL response) into messages.
    Decode {
        /// Config file path (default: CHATGQL_CONFIG_PATH or ~/.chatgql/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Input file (default: stdin)
        #[arg(long, short, value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Recover a JSON value from truncated action arguments.
    Repair {
        /// Input file (default: stdin)
        #[arg(long, short, value_name = "FILE")]
        input: Option<PathBuf>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let res = match cli.command {
        Some(Commands::Version) => {
            println!("chatgql {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(Commands::Init { config }) => run_init(config),
        Some(Commands::Encode { config, input }) => run_encode(config, input),
        Some(Commands::Decode { config, input }) => run_decode(config, input),
        Some(Commands::Repair { input }) => run_repair(input),
        None => {
            println!("Run with --help for usage");
            Ok(())
        }
    };
    if let Err(e) = res {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run_init(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(chatgql::config::default_config_path);
    let dir = chatgql::init::init_config_dir(&path)?;
    println!("initialized configuration at {}", dir.display());
    Ok(())
}

fn read_input(input: Option<PathBuf>) -> anyhow::Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading input from {}", path.display())),
        None => {
            let mut s = String::new();
            std::io::stdin()
                .read_to_string(&mut s)
                .context("reading input from stdin")?;
            Ok(s)
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let s = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", s);
    Ok(())
}

fn run_encode(config_path: Option<PathBuf>, input: Option<PathBuf>) -> anyhow::Result<()> {
    let (config, _) = chatgql::config::load_config(config_path)?;
    let text = read_input(input)?;
    let values: Vec<serde_json::Value> =
        serde_json::from_str(&text).context("input must be a JSON array of messages")?;
    let inputs = conversion::convert_json_messages_to_gql_input(&values)?;
    log::info!("encoded {} message(s)", inputs.len());
    print_json(&inputs, chatgql::config::resolve_pretty_output(&config))
}

/// Shapes accepted by `decode`.
#[derive(Deserialize)]
#[serde(untagged)]
enum DecodeInput {
    Response { data: CreateChatCompletionData },
    Data(CreateChatCompletionData),
    Records(Vec<MessageOutput>),
}

impl DecodeInput {
    fn into_output(self) -> CreateChatCompletionOutput {
        match self {
            DecodeInput::Response { data } | DecodeInput::Data(data) => data.create_chat_completion,
            DecodeInput::Records(messages) => CreateChatCompletionOutput {
                thread_id: None,
                run_id: None,
                messages,
            },
        }
    }
}

fn run_decode(config_path: Option<PathBuf>, input: Option<PathBuf>) -> anyhow::Result<()> {
    let (config, _) = chatgql::config::load_config(config_path)?;
    let text = read_input(input)?;
    let output = serde_json::from_str::<DecodeInput>(&text)
        .context("input must be output records, a createChatCompletion object, or a GraphQL response")?
        .into_output();
    let options = InboundOptions::from(&config.conversion);
    let messages = conversion::convert_completion_output(&output, &SystemClock, &options)?;
    log::info!("decoded {} message(s)", messages.len());
    print_json(&messages, chatgql::config::resolve_pretty_output(&config))
}

fn run_repair(input: Option<PathBuf>) -> anyhow::Result<()> {
    let text = read_input(input)?;
    // A trailing newline from the file or terminal is not part of the arguments.
    let text = text.trim_end_matches(|c: char| c == '\n' || c == '\r');
    let value = conversion::parse_partial_arguments(&[text]);
    print_json(&value, false)
}
