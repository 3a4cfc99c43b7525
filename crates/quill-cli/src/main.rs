//! Quill - creative writing feedback CLI
//!
//! ## Commands
//!
//! - `review`: Critique a manuscript on every craft dimension of its genre
//! - `analyze`: Critique a single craft dimension
//! - `prompt`: Generate a writing prompt for a genre
//! - `expand`: Expand a scene sketch into a fuller draft
//! - `dialogue`: Coach a dialogue excerpt
//! - `elements`: List genres and the craft dimensions they are reviewed on

mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use quill_core::{
    Coach, CraftDimension, GenerativeBackend, GenreRegistry, Manuscript, PromptConstraints,
    ReviewConfig,
};
use quill_ollama::config::{DEFAULT_HOST, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use quill_ollama::{OllamaBackend, OllamaConfig};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, Level};

use render::{
    elements_json, render_auxiliary_text, render_critique_text, render_elements_text,
    render_review_text,
};

#[derive(Parser)]
#[command(name = "quill")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Structured feedback on creative writing", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Ollama server URL
    #[arg(long, global = true, env = "QUILL_OLLAMA_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Model to generate with
    #[arg(long, global = true, env = "QUILL_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Per-request timeout in seconds
    #[arg(
        long,
        global = true,
        env = "QUILL_REQUEST_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    timeout_secs: u64,

    /// Extra attempts after a timeout, connection failure or server error
    #[arg(long, global = true, default_value_t = 2)]
    retries: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Review a manuscript across every craft dimension of its genre
    Review {
        /// Manuscript file, or `-` for stdin
        input: PathBuf,

        /// Genre, e.g. "Flash Fiction"
        #[arg(short, long)]
        genre: String,

        /// Manuscript title
        #[arg(short, long)]
        title: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// TOML file overriding per-dimension guidance
        #[arg(long)]
        guidance: Option<PathBuf>,

        /// Dimension analyses in flight at once
        #[arg(long, default_value_t = 4)]
        max_concurrent: usize,

        /// Minimum share of succeeded dimensions before a summary is written
        #[arg(long, default_value_t = 0.5, value_parser = parse_ratio)]
        min_completeness: f64,
    },

    /// Critique one craft dimension of a manuscript
    Analyze {
        /// Manuscript file, or `-` for stdin
        input: PathBuf,

        #[arg(short, long)]
        genre: String,

        /// Craft dimension, e.g. "dialogue"
        #[arg(short, long)]
        element: CraftDimension,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Generate a writing prompt
    Prompt {
        #[arg(short, long)]
        genre: String,

        #[arg(long)]
        theme: Option<String>,

        /// Free-form constraints, e.g. "second person, under 500 words"
        #[arg(long)]
        constraints: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Expand a scene sketch
    Expand {
        /// The scene sketch
        scene: String,

        /// Where the expansion should go
        #[arg(short, long)]
        direction: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Coach a dialogue excerpt
    Dialogue {
        /// Dialogue file, or `-` for stdin
        input: PathBuf,

        /// Situation the exchange happens in
        #[arg(short, long)]
        context: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List genres and craft dimensions
    Elements {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

impl Cli {
    fn ollama_config(&self) -> OllamaConfig {
        OllamaConfig::new(&self.host, &self.model)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_retries(self.retries, Duration::from_millis(500))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    quill_core::init_tracing(cli.json_logs, level);

    let config = cli.ollama_config();
    let output = match cli.command {
        Commands::Elements { format } => cmd_elements(&GenreRegistry::builtin(), format)?,
        command => {
            debug!(host = %config.host, model = %config.model, "connecting to ollama");
            let backend: Arc<dyn GenerativeBackend> = Arc::new(
                OllamaBackend::new(config).context("Failed to configure Ollama backend")?,
            );
            run_command(backend, command).await?
        }
    };

    println!("{}", output);
    Ok(())
}

async fn run_command(backend: Arc<dyn GenerativeBackend>, command: Commands) -> Result<String> {
    match command {
        Commands::Review {
            input,
            genre,
            title,
            format,
            guidance,
            max_concurrent,
            min_completeness,
        } => {
            let registry = load_registry(guidance.as_deref())?;
            let config = ReviewConfig {
                max_concurrent,
                min_completeness,
                ..ReviewConfig::default()
            };
            let coach = Coach::with_parts(backend, registry, config);
            let text = read_input(&input)?;
            cmd_review(&coach, text, &genre, title.as_deref(), format).await
        }
        Commands::Analyze {
            input,
            genre,
            element,
            format,
        } => {
            let coach = Coach::new(backend);
            let text = read_input(&input)?;
            cmd_analyze(&coach, text, &genre, element, format).await
        }
        Commands::Prompt {
            genre,
            theme,
            constraints,
            format,
        } => {
            let coach = Coach::new(backend);
            let output = coach
                .generate_prompt(&genre, &PromptConstraints { theme, constraints })
                .await
                .with_context(|| format!("Failed to generate a {} prompt", genre))?;
            render_output(&output, format, render_auxiliary_text)
        }
        Commands::Expand {
            scene,
            direction,
            format,
        } => {
            let coach = Coach::new(backend);
            let output = coach
                .expand_scene(&scene, direction.as_deref())
                .await
                .context("Scene expansion failed")?;
            render_output(&output, format, render_auxiliary_text)
        }
        Commands::Dialogue {
            input,
            context,
            format,
        } => {
            let coach = Coach::new(backend);
            let dialogue = read_input(&input)?;
            let output = coach
                .coach_dialogue(&dialogue, context.as_deref())
                .await
                .context("Dialogue coaching failed")?;
            render_output(&output, format, render_auxiliary_text)
        }
        Commands::Elements { format } => cmd_elements(&GenreRegistry::builtin(), format),
    }
}

async fn cmd_review(
    coach: &Coach,
    text: String,
    genre: &str,
    title: Option<&str>,
    format: OutputFormat,
) -> Result<String> {
    let mut manuscript = Manuscript::new(text, genre).context("Nothing to review")?;
    if let Some(title) = title {
        manuscript = manuscript.with_title(title);
    }

    let review = coach
        .review(&manuscript)
        .await
        .with_context(|| format!("Cannot review as '{}'", genre))?;

    info!(
        review_id = %review.review_id(),
        completeness = review.completeness_ratio(),
        "Review complete"
    );
    render_output(&review, format, render_review_text)
}

async fn cmd_analyze(
    coach: &Coach,
    text: String,
    genre: &str,
    element: CraftDimension,
    format: OutputFormat,
) -> Result<String> {
    let manuscript = Manuscript::new(text, genre).context("Nothing to analyze")?;
    let critique = coach
        .analyze_element(&manuscript, element)
        .await
        .with_context(|| format!("Cannot analyze as '{}'", genre))?;
    render_output(&critique, format, render_critique_text)
}

fn cmd_elements(registry: &GenreRegistry, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(&elements_json(registry))?,
        OutputFormat::Text => render_elements_text(registry),
    })
}

fn render_output<T: Serialize>(
    value: &T,
    format: OutputFormat,
    text: fn(&T) -> String,
) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Text => text(value),
    })
}

fn load_registry(guidance: Option<&Path>) -> Result<GenreRegistry> {
    let registry = GenreRegistry::builtin();
    let Some(path) = guidance else {
        return Ok(registry);
    };
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read guidance file: {:?}", path))?;
    registry
        .with_overrides_toml(&source)
        .with_context(|| format!("Invalid guidance file: {:?}", path))
}

/// Read a file, or stdin when the path is `-`.
fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
}

fn parse_ratio(s: &str) -> std::result::Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{} is outside 0.0..=1.0", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::fakes::{Reply, ScriptedBackend};
    use quill_core::BackendFailure;
    use serde_json::Value;

    const CRITIQUE: &str =
        r#"{"strengths": ["mood"], "weaknesses": ["static"], "suggestions": ["add a turn"]}"#;

    fn coach(backend: &Arc<ScriptedBackend>) -> Coach {
        Coach::new(Arc::clone(backend) as Arc<dyn GenerativeBackend>)
    }

    #[test]
    fn test_parse_review_defaults() {
        let cli = Cli::try_parse_from(["quill", "review", "story.txt", "--genre", "Flash Fiction"])
            .unwrap();
        match cli.command {
            Commands::Review {
                input,
                genre,
                format,
                max_concurrent,
                min_completeness,
                ..
            } => {
                assert_eq!(input, PathBuf::from("story.txt"));
                assert_eq!(genre, "Flash Fiction");
                assert_eq!(format, OutputFormat::Text);
                assert_eq!(max_concurrent, 4);
                assert_eq!(min_completeness, 0.5);
            }
            _ => panic!("expected review"),
        }
    }

    #[test]
    fn test_parse_analyze_element() {
        let cli = Cli::try_parse_from([
            "quill", "analyze", "-", "--genre", "memoir", "--element", "dialogue",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Analyze {
                element: CraftDimension::Dialogue,
                ..
            }
        ));

        assert!(Cli::try_parse_from([
            "quill", "analyze", "-", "--genre", "memoir", "--element", "smell",
        ])
        .is_err());
    }

    #[test]
    fn test_min_completeness_must_be_a_ratio() {
        assert!(Cli::try_parse_from([
            "quill", "review", "a.txt", "--genre", "Poetry", "--min-completeness", "1.5",
        ])
        .is_err());
        assert!(parse_ratio("0.75").is_ok());
        assert!(parse_ratio("lots").is_err());
    }

    #[test]
    fn test_global_flags_build_ollama_config() {
        let cli = Cli::try_parse_from([
            "quill",
            "elements",
            "--host",
            "http://gpu-box:11434",
            "--model",
            "mistral",
            "--timeout-secs",
            "9",
            "--retries",
            "0",
        ])
        .unwrap();
        let config = cli.ollama_config();
        assert_eq!(config.host, "http://gpu-box:11434");
        assert_eq!(config.model, "mistral");
        assert_eq!(config.request_timeout, Duration::from_secs(9));
        assert_eq!(config.max_retries, 0);
    }

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("story.txt");
        std::fs::write(&path, "It was a dark night.").unwrap();

        assert_eq!(read_input(&path).unwrap(), "It was a dark night.");
        assert!(read_input(&dir.path().join("missing.txt")).is_err());
    }

    #[test]
    fn test_load_registry_with_guidance_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guidance.toml");
        std::fs::write(
            &path,
            "[guidance.\"Flash Fiction\"]\npacing = \"Cut every adverb.\"\n",
        )
        .unwrap();

        let registry = load_registry(Some(&path)).unwrap();
        let profile = registry.profile_for("Flash Fiction").unwrap();
        assert_eq!(
            profile
                .guidance_for(CraftDimension::Pacing)
                .unwrap()
                .guidance,
            "Cut every adverb."
        );

        std::fs::write(&path, "[guidance.Haiku]\npacing = \"x\"\n").unwrap();
        assert!(load_registry(Some(&path)).is_err());
    }

    #[tokio::test]
    async fn test_review_text_output() {
        let backend = Arc::new(ScriptedBackend::with_default(Reply::text(CRITIQUE)).when(
            "overall assessment",
            Reply::text("A moody opening that needs a turn."),
        ));

        let out = cmd_review(
            &coach(&backend),
            "It was a dark night.".to_string(),
            "Flash Fiction",
            Some("Night"),
            OutputFormat::Text,
        )
        .await
        .unwrap();

        assert!(out.starts_with("Review: Night"));
        assert!(out.contains("Completeness: 100% (5/5 dimensions)"));
        assert!(out.contains("## Dialogue"));
        assert!(out.contains("A moody opening that needs a turn."));
    }

    #[tokio::test]
    async fn test_review_json_output_keeps_failed_dimensions() {
        let backend = Arc::new(
            ScriptedBackend::with_default(Reply::text(CRITIQUE)).when_dimension(
                "Dialogue",
                Reply::fail(BackendFailure::Timeout { after_ms: 1000 }),
            ),
        );

        let out = cmd_review(
            &coach(&backend),
            "It was a dark night.".to_string(),
            "Flash Fiction",
            None,
            OutputFormat::Json,
        )
        .await
        .unwrap();

        let json: Value = serde_json::from_str(&out).unwrap();
        let critiques = json["critiques"].as_array().unwrap();
        assert_eq!(critiques.len(), 5);
        let dialogue = critiques
            .iter()
            .find(|c| c["dimension"] == "dialogue")
            .unwrap();
        assert_eq!(dialogue["status"], "failed");
        assert_eq!(json["completeness_ratio"], 0.8);
    }

    #[tokio::test]
    async fn test_review_unknown_genre_is_fatal() {
        let backend = Arc::new(ScriptedBackend::with_default(Reply::text(CRITIQUE)));

        let err = cmd_review(
            &coach(&backend),
            "An old silent pond.".to_string(),
            "Haiku",
            None,
            OutputFormat::Text,
        )
        .await
        .unwrap_err();

        assert!(format!("{:#}", err).contains("unknown genre: Haiku"));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_analyze_renders_single_dimension() {
        let backend = Arc::new(ScriptedBackend::with_default(Reply::text(
            r#"{"suggestions": ["add a turn"], "mentor_texts": ["Hills Like White Elephants"]}"#,
        )));

        let out = cmd_analyze(
            &coach(&backend),
            "\"Fine,\" she said.".to_string(),
            "Short Story",
            CraftDimension::Dialogue,
            OutputFormat::Text,
        )
        .await
        .unwrap();

        assert!(out.starts_with("## Dialogue"));
        assert!(out.contains("- add a turn"));
        assert!(out.contains("Mentor texts:\n- Hills Like White Elephants"));
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_prompt_command_surfaces_backend_failure() {
        let backend = Arc::new(ScriptedBackend::with_default(Reply::fail(
            BackendFailure::Unreachable {
                detail: "connection refused".to_string(),
            },
        )));
        let command = Commands::Prompt {
            genre: "Poetry".to_string(),
            theme: None,
            constraints: None,
            format: OutputFormat::Text,
        };

        let err = run_command(backend, command).await.unwrap_err();
        assert!(format!("{:#}", err).contains("connection refused"));
    }

    #[test]
    fn test_elements_lists_every_genre() {
        let registry = GenreRegistry::builtin();
        let text = cmd_elements(&registry, OutputFormat::Text).unwrap();
        for genre in quill_core::Genre::ALL {
            assert!(text.contains(genre.display_name()));
        }

        let out = cmd_elements(&registry, OutputFormat::Json).unwrap();
        let json: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["genres"].as_array().unwrap().len(), 8);
        assert_eq!(json["craft_dimensions"].as_array().unwrap().len(), 10);
    }
}
