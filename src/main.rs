use std::path::{Path, PathBuf};

use aitagger::utils::settings_path;
use aitagger::{
    DocumentHost, FsVault, ModelCatalog, Provider, Settings, Tagger, TaggerError, TaggerHandle,
    TaggingService,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// aitagger - generate tags for Markdown notes with an LLM
#[derive(Parser)]
#[command(name = "aitagger")]
#[command(about = "Generate tags for Markdown notes with a large language model")]
#[command(version)]
struct Cli {
    /// Root directory of the notes vault
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    vault: PathBuf,

    /// Settings file (defaults to AITAGGER_SETTINGS or the user config dir)
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Model id to use instead of the one in settings
    #[arg(long, global = true, value_name = "ID")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Generate tags for one document
    Tag(TagCommand),
    /// Generate tags for every document under a folder
    Folder(FolderCommand),
    /// List supported models
    Models(ModelsCommand),
    /// Validate settings and credentials without calling the provider
    Check,
}

#[derive(Parser)]
struct TagCommand {
    /// Document to tag, relative to the vault
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Tag using this text instead of the whole document
    #[arg(long, value_name = "TEXT")]
    selection: Option<String>,
}

#[derive(Parser)]
struct FolderCommand {
    /// Folder to tag recursively, relative to the vault
    #[arg(value_name = "DIR")]
    dir: PathBuf,
}

#[derive(Parser)]
struct ModelsCommand {
    /// Only list models of this provider
    #[arg(long, value_name = "PROVIDER")]
    provider: Option<Provider>,
}

/// A failure the vault already showed to the user.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
struct Notified(TaggerError);

fn main() {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("aitagger=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Tag(cmd) => handle_tag(&cli, cmd),
        Commands::Folder(cmd) => handle_folder(&cli, cmd),
        Commands::Models(cmd) => handle_models(cmd),
        Commands::Check => handle_check(&cli),
    };

    if let Err(e) = result {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        if e.downcast_ref::<Notified>().is_none() {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(exit_code);
    }
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are fixed by changing settings or input: unknown model,
/// missing or rejected API key, bad base URL, oversized document.
fn is_user_error(error: &anyhow::Error) -> bool {
    if let Some(Notified(err)) = error.downcast_ref::<Notified>() {
        return err.is_user_error();
    }
    error
        .downcast_ref::<TaggerError>()
        .is_some_and(TaggerError::is_user_error)
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let path = settings_path(cli.settings.as_deref())
        .context("Failed to determine config directory for settings")?;
    let mut settings = Settings::load_or_default(&path)?;

    if let Some(model) = &cli.model {
        settings.model = model.clone();
    }
    Ok(settings)
}

fn open_service(cli: &Cli) -> Result<TaggingService<FsVault>> {
    let settings = load_settings(cli)?;
    let vault = FsVault::open(&cli.vault)?;
    Ok(TaggingService::new(vault, TaggerHandle::new(settings)))
}

fn handle_tag(cli: &Cli, cmd: &TagCommand) -> Result<()> {
    let service = open_service(cli)?;
    let added = match &cmd.selection {
        Some(text) => service.tag_selection(&cmd.file, text),
        None => service.tag_document(&cmd.file),
    }
    .map_err(Notified)?;

    for tag in added {
        println!("{tag}");
    }
    Ok(())
}

fn handle_folder(cli: &Cli, cmd: &FolderCommand) -> Result<()> {
    let service = open_service(cli)?;
    let report = service.tag_folder(&cmd.dir).map_err(Notified)?;

    for (path, tags) in &report.tagged {
        println!("{}\t{}", relative(service.host().root(), path), tags.join(" "));
    }

    if !report.is_success() {
        anyhow::bail!(
            "{} of {} documents could not be tagged",
            report.failed.len(),
            report.total()
        );
    }
    Ok(())
}

fn handle_models(cmd: &ModelsCommand) -> Result<()> {
    let models: Vec<_> = match cmd.provider {
        Some(provider) => ModelCatalog::by_provider(provider).collect(),
        None => ModelCatalog::all().iter().collect(),
    };

    for model in models {
        let marker = if model.model_id == aitagger::DEFAULT_MODEL_ID { "*" } else { " " };
        println!(
            "{marker} {:<40} {:<14} {:<20} {:>8}",
            model.model_id,
            model.company(),
            model.display_name,
            model.token_limit
        );
    }
    Ok(())
}

fn handle_check(cli: &Cli) -> Result<()> {
    let settings = load_settings(cli)?;
    let vault = FsVault::open(&cli.vault)?;

    let tagger = Tagger::initialize(&settings).map_err(|err| {
        vault.notify(&err.user_message());
        Notified(err)
    })?;

    let model = tagger.model();
    let documents = vault.all_documents()?.len();
    println!("Model:     {model} ({})", model.model_id);
    println!("Provider:  {}", model.provider);
    if let Some(url) = settings.base_url_override()? {
        println!("Base URL:  {url}");
    }
    println!("Vault:     {} ({documents} documents)", cli.vault.display());
    Ok(())
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aitagger::ConfigError;

    #[test]
    fn parses_tag_command_with_global_flags() {
        let cli = Cli::try_parse_from([
            "aitagger",
            "tag",
            "notes/redis.md",
            "--selection",
            "just this",
            "--vault",
            "/tmp/vault",
            "--model",
            "gpt-4o",
        ])
        .unwrap();

        assert_eq!(cli.vault, PathBuf::from("/tmp/vault"));
        assert_eq!(cli.model.as_deref(), Some("gpt-4o"));
        match cli.command {
            Commands::Tag(cmd) => {
                assert_eq!(cmd.file, PathBuf::from("notes/redis.md"));
                assert_eq!(cmd.selection.as_deref(), Some("just this"));
            }
            _ => panic!("expected tag command"),
        }
    }

    #[test]
    fn models_provider_filter_parses_settings_identifier() {
        let cli = Cli::try_parse_from(["aitagger", "models", "--provider", "google-genai"]).unwrap();
        match cli.command {
            Commands::Models(cmd) => assert_eq!(cmd.provider, Some(Provider::GoogleGenai)),
            _ => panic!("expected models command"),
        }
        assert!(Cli::try_parse_from(["aitagger", "models", "--provider", "acme"]).is_err());
    }

    #[test]
    fn vault_defaults_to_current_directory() {
        let cli = Cli::try_parse_from(["aitagger", "check"]).unwrap();
        assert_eq!(cli.vault, PathBuf::from("."));
    }

    #[test]
    fn config_errors_are_user_errors() {
        let err = anyhow::Error::new(TaggerError::from(ConfigError::MissingBaseUrl));
        assert!(is_user_error(&err));

        let notified = anyhow::Error::new(Notified(TaggerError::from(ConfigError::ModelNotFound(
            "x".into(),
        ))));
        assert!(is_user_error(&notified));
    }

    #[test]
    fn io_failures_are_internal_errors() {
        let err = anyhow::anyhow!("disk on fire");
        assert!(!is_user_error(&err));
    }

    #[test]
    fn load_settings_applies_model_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"model": "gpt-4o", "language": "German"}"#).unwrap();

        let cli = Cli::try_parse_from([
            "aitagger",
            "check",
            "--settings",
            path.to_str().unwrap(),
            "--model",
            "qwen2.5",
        ])
        .unwrap();

        let settings = load_settings(&cli).unwrap();
        assert_eq!(settings.model, "qwen2.5");
        assert_eq!(settings.language, "German");
    }
}
