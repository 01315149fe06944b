use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use vasu_core::{agent, config, ledger, providers, tools};

mod onboard;

#[derive(Parser)]
#[command(name = "vasu")]
#[command(about = "vasu - a conversational personal finance assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Onboard,
    Chat {
        #[arg(short, long)]
        message: Option<String>,
    },
}

/// Terminal channel backed by a line editor with persistent history.
struct TerminalChannel {
    editor: DefaultEditor,
    history_path: PathBuf,
}

impl TerminalChannel {
    fn new() -> Result<Self> {
        let mut editor = DefaultEditor::new()?;
        let history_path = config::get_vasu_dir().join("history");
        let _ = editor.load_history(&history_path);
        Ok(Self {
            editor,
            history_path,
        })
    }
}

impl agent::Channel for TerminalChannel {
    fn read_line(&mut self) -> Result<Option<String>> {
        match self.editor.readline("User: ") {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn reply(&mut self, text: &str) -> Result<()> {
        println!("{} {}\n", style("Assistant:").green().bold(), text);
        Ok(())
    }

    fn report_error(&mut self, error: &anyhow::Error) -> Result<()> {
        eprintln!("{}\n", style(format!("Error: {:#}", error)).red());
        Ok(())
    }
}

impl Drop for TerminalChannel {
    fn drop(&mut self) {
        if config::ensure_vasu_dir().is_ok() {
            let _ = self.editor.save_history(&self.history_path);
        }
    }
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Chat { message: None }) {
        Commands::Onboard => {
            let onboard_config = onboard::run_onboard().map_err(|e| {
                eprintln!("{}", style(format!("Onboarding failed: {}", e)).red());
                anyhow::anyhow!("Onboarding failed: {}", e)
            })?;
            config::save_config(&onboard_config)?;
            println!(
                "Saved configuration to {}",
                config::get_config_path().display()
            );
        }
        Commands::Chat { message } => {
            let config = config::Config::load_or_default()?;

            let ledger = ledger::create_ledger(&config.ledger).await?;
            tracing::info!("Using {} ledger", ledger.name());

            let mut registry = agent::ToolRegistry::new();
            tools::register_finance_tools(&mut registry, ledger, &config.currency)?;

            let provider: Arc<dyn vasu_core::Provider> =
                Arc::from(providers::create_provider(&config)?);

            let context_builder = agent::ContextBuilder::new(&config.assistant_name)
                .with_currency(&config.currency)
                .with_tool_specs(registry.get_specs().to_vec());
            let mut session = context_builder.start_session();

            let agent_loop = agent::AgentLoop::new(provider, Arc::new(registry), &config.model)
                .with_temperature(config.temperature);

            if let Some(msg) = message {
                match agent_loop.process_turn(&mut session, &msg).await {
                    Ok(response) => println!("{}", response),
                    Err(e) => {
                        eprintln!("{}", style(format!("Error: {:#}", e)).red());
                        anyhow::bail!("Agent processing failed: {}", e);
                    }
                }
            } else {
                println!("{}", style(&config.assistant_name).cyan().bold());
                println!(
                    "Type your message (\"{}\" or Ctrl+D to exit):\n",
                    agent::TERMINATION_TOKEN
                );

                let mut channel = TerminalChannel::new()?;
                agent_loop.run(&mut session, &mut channel).await?;
                println!("Goodbye!");
            }
        }
    }

    Ok(())
}
