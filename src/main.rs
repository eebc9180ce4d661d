//! resume-matcher: score a resume against a job description

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use resume_matcher::cli::{self, Cli, Commands, ConfigAction, JobSource, ModelAction};
use resume_matcher::config::Config;
use resume_matcher::error::{MatcherError, Result};
use resume_matcher::input::InputManager;
use resume_matcher::output::{report_path, save_report_to_file, ReportGenerator};
use resume_matcher::processing::embedding_manager::EmbeddingModelManager;
use resume_matcher::processing::{
    Embedder, KeywordExtractor, LinguisticPipeline, MatchingEngine, RuleBasedPipeline, Vocabulary,
};
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

fn resolve_model(manager: &EmbeddingModelManager, requested: &str) -> Result<String> {
    manager
        .resolve_model_id(requested)
        .ok_or_else(|| MatcherError::ModelNotFound(requested.to_string()))
}

/// Download if needed, then load the embedding model once for the whole run
async fn load_embedder(config: &Config, requested: Option<&str>) -> Result<Arc<dyn Embedder>> {
    let mut manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;
    let requested = requested.unwrap_or(&config.models.default_embedding_model);
    let model_id = resolve_model(&manager, requested)?;

    if !manager.is_model_downloaded(&model_id) {
        let bar = spinner(&format!("Downloading {}", model_id));
        let result = manager.ensure_model_available(&model_id).await;
        bar.finish_and_clear();
        result?;
    }

    let bar = spinner(&format!("Loading {}", model_id));
    let embedder = manager.load_embedder(&model_id);
    bar.finish_and_clear();
    embedder
}

fn read_job(input: &InputManager, job: &JobSource) -> Result<String> {
    match (&job.job, &job.job_text) {
        (Some(path), _) => input.read_job_description(path),
        (None, Some(text)) => Ok(text.clone()),
        (None, None) => Err(MatcherError::InvalidInput(
            "A job description file or text is required".to_string(),
        )),
    }
}

/// Resumes go through document extraction, anything else is read as a job description
fn read_any(input: &InputManager, path: &Path) -> Result<String> {
    match input.extract_resume(path) {
        Err(MatcherError::UnsupportedFormat(_)) => input.read_job_description(path),
        other => other,
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Match {
            resume,
            job,
            output,
            save,
            embedding,
            no_color,
        } => {
            let format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(MatcherError::InvalidInput)?,
                None => config.output.format,
            };

            let input = InputManager::new();
            let resume_text = input.extract_resume(&resume)?;
            let job_text = read_job(&input, &job)?;

            let pipeline: Arc<dyn LinguisticPipeline> = Arc::new(RuleBasedPipeline::new());
            let embedder = load_embedder(&config, embedding.as_deref()).await?;
            let vocabulary = Vocabulary::from_config(&config.vocabulary)?;
            let engine = MatchingEngine::new(pipeline, embedder, vocabulary, config.scoring.clone());

            info!("Matching {} against the job description", resume.display());
            let report = engine.analyze(&job_text, &resume_text)?;

            let use_colors = config.output.color_output && !no_color && save.is_none();
            let rendered = ReportGenerator::with_options(use_colors, true, true).generate_report(&report, format)?;

            match save {
                Some(target) => {
                    let path = report_path(&target, format, &resume);
                    save_report_to_file(&rendered, &path)?;
                    info!("Report saved to {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Keywords { file, text } => {
            let content = match (file, text) {
                (Some(path), _) => read_any(&InputManager::new(), &path)?,
                (None, Some(text)) => text,
                (None, None) => {
                    return Err(MatcherError::InvalidInput("Provide --file or --text".to_string()))
                }
            };

            let extractor = KeywordExtractor::new(Arc::new(RuleBasedPipeline::new()));
            let keywords = extractor.extract(&content);
            println!("{} keywords:", keywords.len());
            for keyword in keywords.iter() {
                println!("  {}", keyword);
            }
        }

        Commands::Models { action } => {
            let mut manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;

            match action {
                ModelAction::List => {
                    println!("Embedding models ({}):\n", config.models_dir().display());
                    for (id, model) in manager.list_available_models() {
                        let status = if manager.is_model_downloaded(id) { "downloaded" } else { "available" };
                        let default = if *id == config.models.default_embedding_model { " (default)" } else { "" };
                        println!("  {}{} - {} MB [{}]", id, default, model.size_mb, status);
                        println!("    {}", model.description);
                    }
                }

                ModelAction::Download { model, force } => {
                    let model_id = resolve_model(&manager, &model)?;
                    if !force && manager.is_model_downloaded(&model_id) {
                        println!("Model '{}' is already downloaded (use --force to re-download)", model_id);
                        return Ok(());
                    }

                    let bar = spinner(&format!("Downloading {}", model_id));
                    let result = manager.download_model(&model_id, force).await;
                    bar.finish_and_clear();
                    let path = result?;
                    println!("Model '{}' downloaded to {}", model_id, path.display());
                }

                ModelAction::Remove { model } => {
                    let model_id = resolve_model(&manager, &model)?;
                    if manager.remove_model(&model_id).await? {
                        println!("Model '{}' removed", model_id);
                    } else {
                        println!("Model '{}' is not downloaded", model_id);
                    }
                }

                ModelAction::Info { model } => {
                    let model_id = resolve_model(&manager, &model)?;
                    let info = manager
                        .get_model_info(&model_id)
                        .ok_or_else(|| MatcherError::ModelNotFound(model_id.clone()))?;

                    println!("Id: {}", model_id);
                    println!("Name: {}", info.name);
                    println!("Repository: {}", info.repo_id);
                    println!("Backend: {:?}", info.backend);
                    println!("Dimensions: {}", info.dimensions);
                    println!("Size: {} MB", info.size_mb);
                    println!("Description: {}", info.description);
                    match manager.get_model_path(&model_id) {
                        Some(path) => println!("Status: downloaded ({})", path.display()),
                        None => println!("Status: available, run `resume-matcher models download {}`", model_id),
                    }
                }
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("Configuration file: {}\n", config_path.display());
                println!("Models directory: {}", config.models_dir().display());
                println!("Default embedding model: {}", config.models.default_embedding_model);
                println!("\nScoring:");
                println!("  Semantic weight: {}", config.scoring.semantic_weight);
                println!("  Overlap weight: {}", config.scoring.overlap_weight);
                println!("  Max score: {}", config.scoring.max_score);
                println!(
                    "\nVocabulary: {}",
                    config
                        .vocabulary
                        .path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "built-in".to_string())
                );
                println!("Output: {:?} (color: {})", config.output.format, config.output.color_output);
            }

            Some(ConfigAction::Reset) => {
                Config::default().save_to(config_path)?;
                println!("Configuration reset to defaults");
            }

            Some(ConfigAction::Path) => println!("{}", config_path.display()),
        },
    }

    Ok(())
}
