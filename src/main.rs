use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use voice_auth_client::audio::{wav_summary, EXPECTED_SAMPLE_RATE};
use voice_auth_client::config::{ApiConfig, ClientConfig, Environment};
use voice_auth_client::paths::AppPaths;
use voice_auth_client::VoiceAuthClient;

/// Command line client for the voice authentication API
#[derive(Parser)]
#[command(name = "voice-auth")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Environment profile to use (development or production)
    #[arg(short, long)]
    env: Option<Environment>,
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override the profile base URL
    #[arg(long)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the service is up
    Health,
    /// Fetch a challenge phrase
    Challenge,
    /// Enroll a user's voice
    Enroll(VoiceArgs),
    /// Verify a user's voice
    Verify(VoiceArgs),
    /// Check whether a voice profile exists for a user
    UserExists {
        /// User id
        #[arg(short, long)]
        user: String,
    },
    /// Print the resolved profile
    ShowConfig,
}

#[derive(Args)]
struct VoiceArgs {
    /// User id
    #[arg(short, long)]
    user: String,
    /// Phrase spoken in the recording; fetched from the service when omitted
    #[arg(short, long)]
    phrase: Option<String>,
    /// WAV recording (path or file:// URI)
    #[arg(short, long)]
    audio: String,
}

#[derive(Serialize)]
struct ResolvedConfig<'a> {
    environment: Environment,
    base_url: &'a str,
    timeout_ms: u64,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    log::info!(
        "Using {} profile: {}",
        config.environment(),
        config.base_url()
    );
    let client = VoiceAuthClient::new(config).context("Failed to create API client")?;

    match cli.command {
        Commands::Health => {
            let health = client.health().await?;
            if !health.is_healthy() {
                log::warn!("Service reports status '{}'", health.status);
            }
            print_json(&health)
        }
        Commands::Challenge => {
            let phrase = client.get_challenge_phrase().await?;
            println!("{}", phrase);
            Ok(())
        }
        Commands::Enroll(args) => {
            let phrase = phrase_or_challenge(&client, args.phrase).await?;
            inspect_audio(&args.audio);
            let response = client.enroll_user(&args.user, &phrase, args.audio.as_str()).await?;
            if !response.success {
                log::warn!("Enrollment not accepted: {}", response.message);
            }
            print_json(&response)
        }
        Commands::Verify(args) => {
            let phrase = phrase_or_challenge(&client, args.phrase).await?;
            inspect_audio(&args.audio);
            let response = client.verify_user(&args.user, &phrase, args.audio.as_str()).await?;
            log::info!(
                "Verification for '{}': {}",
                args.user,
                if response.authenticated { "PASS" } else { "FAIL" }
            );
            print_json(&response)
        }
        Commands::UserExists { user } => {
            let response = client.user_exists(&user).await?;
            print_json(&response)
        }
        Commands::ShowConfig => {
            let config = client.config();
            print_json(&ResolvedConfig {
                environment: config.environment(),
                base_url: config.base_url(),
                timeout_ms: config.timeout_ms(),
            })
        }
    }
}

/// Config file, then profile selection, then CLI overrides
fn resolve_config(cli: &Cli) -> Result<ApiConfig> {
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => {
            let paths = AppPaths::new()?;
            paths.ensure_directories()?;
            paths.config_file()
        }
    };

    let file_config = ClientConfig::load_or_create(&config_path)?;
    let resolved = file_config
        .resolve(cli.env)
        .with_context(|| format!("Invalid profile in {}", config_path.display()))?;

    match &cli.base_url {
        Some(base_url) => ApiConfig::new(resolved.environment(), base_url.clone(), resolved.timeout_ms())
            .context("Invalid --base-url"),
        None => Ok(resolved),
    }
}

async fn phrase_or_challenge(client: &VoiceAuthClient, phrase: Option<String>) -> Result<String> {
    match phrase {
        Some(phrase) => Ok(phrase),
        None => {
            let phrase = client
                .get_challenge_phrase()
                .await
                .context("Failed to fetch challenge phrase")?;
            log::info!("No phrase given, using challenge: '{}'", phrase);
            Ok(phrase)
        }
    }
}

/// Warn about recordings the service will have to convert; never fails
fn inspect_audio(locator: &str) {
    let source = voice_auth_client::AudioSource::from_locator(locator);
    let Some(path) = source.path() else {
        return;
    };

    match wav_summary(path) {
        Ok(summary) => {
            log::debug!("Audio: {:?}", summary);
            if !summary.is_service_native() {
                log::warn!(
                    "Recording is {}Hz/{}ch; the service expects {}Hz mono and will resample",
                    summary.sample_rate,
                    summary.channels,
                    EXPECTED_SAMPLE_RATE
                );
            }
        }
        Err(e) => log::warn!("Could not inspect audio: {:#}", e),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize response")?;
    println!("{}", json);
    Ok(())
}
