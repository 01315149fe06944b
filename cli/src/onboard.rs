use anyhow::{Context, Result};
use console::style;
use dialoguer::{Input, Password, Select};
use vasu_core::config::Config;

const PROVIDERS: &[&str] = &["groq", "openai"];
const CURRENCIES: &[&str] = &["INR", "USD", "EUR", "GBP"];

fn print_step(step: usize, total: usize, title: &str) {
    println!();
    println!(
        "{}",
        style(format!("[{}/{}] {}", step, total, title))
            .cyan()
            .bold()
    );
    println!();
}

fn setup_provider() -> Result<String> {
    let selection = Select::new()
        .with_prompt("Select your completion provider")
        .items(PROVIDERS)
        .default(0)
        .interact()
        .context("Failed to select provider")?;

    Ok(PROVIDERS[selection].to_string())
}

fn setup_api_key(provider: &str) -> Result<String> {
    let api_key: String = Password::new()
        .with_prompt(format!(
            "Enter your {} API key (leave empty to use the environment)",
            provider
        ))
        .allow_empty_password(true)
        .interact()
        .context("Failed to read API key")?;

    Ok(api_key.trim().to_string())
}

fn default_model(provider: &str) -> &'static str {
    match provider {
        "openai" => "gpt-4o-mini",
        _ => "openai/gpt-oss-20b",
    }
}

fn setup_model(provider: &str) -> Result<String> {
    let model: String = Input::new()
        .with_prompt("Model")
        .default(default_model(provider).to_string())
        .interact_text()
        .context("Failed to read model")?;

    Ok(model)
}

fn setup_currency() -> Result<String> {
    let selection = Select::new()
        .with_prompt("Select your currency")
        .items(CURRENCIES)
        .default(0)
        .interact()
        .context("Failed to select currency")?;

    Ok(CURRENCIES[selection].to_string())
}

pub fn run_onboard() -> Result<Config> {
    println!("  {}", style("Welcome to Vasu!").white().bold());
    println!(
        "  {}",
        style("This wizard sets up your finance assistant.").dim()
    );

    print_step(1, 4, "Provider");
    let provider = setup_provider()?;

    print_step(2, 4, "API Key");
    let api_key = setup_api_key(&provider)?;

    print_step(3, 4, "Model");
    let model = setup_model(&provider)?;

    print_step(4, 4, "Currency");
    let currency = setup_currency()?;

    let config = Config {
        provider: Some(provider),
        api_key,
        model,
        currency,
        ..Default::default()
    };

    println!();
    println!("  {}", style("Setup complete.").green().bold());
    println!(
        "  {}",
        style("Run `vasu` to start chatting, type \"bye\" to leave.").dim()
    );

    Ok(config)
}
