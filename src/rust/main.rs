use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use log::{error, info, warn};

use comment_guard::api::create_router;
use comment_guard::api::handlers::AppState;
use comment_guard::config::{self, ServiceConfig};
use comment_guard::{
    ArtifactError, ArtifactManager, ArtifactManifest, ClassifierRuntime, CommentClassifier, LoadPolicy,
    RestCountriesSource, SuggestionService,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind
    #[arg(long, default_value = config::DEFAULT_HOST)]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = config::DEFAULT_PORT)]
    port: u16,

    /// Directory holding the manifest, vectorizer and classifier artifacts
    #[arg(short, long, env = config::ARTIFACTS_ENV)]
    artifacts_dir: Option<PathBuf>,

    /// Defer loading the artifacts until the first classification request
    #[arg(long)]
    lazy_load: bool,

    /// Endpoint returning the country records
    #[arg(long, default_value = config::DEFAULT_COUNTRIES_URL)]
    countries_url: String,

    /// Timeout for the country lookup, in seconds
    #[arg(long, default_value_t = config::DEFAULT_LOOKUP_TIMEOUT_SECS)]
    lookup_timeout_secs: u64,

    /// Maximum number of suggestions returned
    #[arg(long, default_value_t = config::DEFAULT_SUGGESTION_LIMIT)]
    suggestion_limit: usize,

    /// Download the artifact set from this base URL before starting
    #[arg(long)]
    fetch_artifacts: Option<String>,

    /// Remove existing artifact files before fetching
    #[arg(short, long, requires = "fetch_artifacts")]
    fresh: bool,

    /// Classify TEXT with the local artifacts and exit without serving.
    /// Repeatable; `-` reads one comment per line from stdin.
    #[arg(short, long, value_name = "TEXT")]
    classify: Vec<String>,
}

impl Args {
    fn into_config(self) -> ServiceConfig {
        let defaults = ServiceConfig::default();
        ServiceConfig {
            host: self.host,
            port: self.port,
            artifacts_dir: self.artifacts_dir.unwrap_or(defaults.artifacts_dir),
            load_policy: if self.lazy_load { LoadPolicy::Lazy } else { LoadPolicy::Eager },
            countries_url: self.countries_url,
            lookup_timeout: Duration::from_secs(self.lookup_timeout_secs),
            suggestion_limit: self.suggestion_limit,
            ..defaults
        }
    }
}

/// Manifest to clean up for `--fresh`. A corrupt local manifest is removed and
/// the default layout is cleaned instead.
fn manifest_for_removal(manager: &ArtifactManager) -> anyhow::Result<ArtifactManifest> {
    match manager.load_manifest() {
        Ok(manifest) => Ok(manifest),
        Err(e @ (ArtifactError::Parse { .. } | ArtifactError::Invalid { .. })) => {
            warn!("Discarding unusable local manifest: {}", e);
            std::fs::remove_file(manager.manifest_path())
                .with_context(|| format!("cannot remove {:?}", manager.manifest_path()))?;
            Ok(ArtifactManifest::default())
        }
        Err(e) => Err(e.into()),
    }
}

async fn ensure_artifacts(manager: &ArtifactManager, base_url: &str, fresh: bool) -> anyhow::Result<()> {
    if fresh {
        info!("Fresh download requested - removing any existing artifact files...");
        let manifest = manifest_for_removal(manager)?;
        manager.remove_artifacts(&manifest)?;
    }

    let manifest = manager.load_manifest()?;
    if !fresh && manager.verify_artifacts(&manifest)? {
        info!("Artifact set {} already present and verified", manifest.identity());
        return Ok(());
    }

    info!("Fetching artifacts from {}...", base_url);
    manager.download_artifacts(base_url).await?;
    Ok(())
}

fn process_input(classifier: &CommentClassifier, text: &str) -> anyhow::Result<()> {
    info!("Processing: {}", text);

    match classifier.classify(text) {
        Ok(result) => {
            println!("\nResults:");
            println!("  Comment: {}", result.comment);
            println!("  Prediction: {}", result.label);
            println!("  Category: {}", result.category);
        }
        Err(e) => {
            eprintln!("\nError processing text: {}", e);
            eprintln!("Consider:");
            eprintln!("  - Checking if the text is empty");
            eprintln!("  - Checking that the artifacts in use are the intended set");
            return Err(e.into());
        }
    }

    Ok(())
}

/// Classifies each input against the local artifacts without starting the server.
fn run_classify(manager: &ArtifactManager, inputs: &[String]) -> anyhow::Result<()> {
    let start_time = Instant::now();
    let classifier = manager
        .load_classifier()
        .context("classifier artifacts could not be loaded")?;
    info!(
        "=== Classifier {} loaded (took {:.2?}) ===",
        classifier.identity(),
        start_time.elapsed()
    );

    for input in inputs {
        if input == "-" {
            for line in std::io::stdin().lock().lines() {
                let line = line?;
                if !line.trim().is_empty() {
                    process_input(&classifier, &line)?;
                }
            }
        } else {
            process_input(&classifier, input)?;
        }
    }
    Ok(())
}

async fn wait_for_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install Ctrl+C handler: {}", e);
    }
    info!("Shutting down gracefully, draining in-flight requests...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    comment_guard::init_logger();
    let mut args = Args::parse();
    let fetch = args.fetch_artifacts.clone();
    let fresh = args.fresh;
    let inputs = std::mem::take(&mut args.classify);
    let config = args.into_config();

    info!("=== Starting comment-guard ===");

    let manager = ArtifactManager::new(&config.artifacts_dir)
        .with_context(|| format!("cannot use artifact directory {:?}", config.artifacts_dir))?;
    if let Some(base_url) = fetch {
        ensure_artifacts(&manager, &base_url, fresh).await?;
    }

    if !inputs.is_empty() {
        return run_classify(&manager, &inputs);
    }

    let runtime = ClassifierRuntime::start(manager, config.load_policy)
        .await
        .map_err(|e| {
            error!("Failed to load classifier artifacts from {:?}: {}", config.artifacts_dir, e);
            e
        })
        .context("classifier artifacts could not be loaded")?;

    let source = RestCountriesSource::new(&config.countries_url, config.lookup_timeout)?;
    let state = AppState {
        suggestions: Arc::new(SuggestionService::new(Arc::new(source), config.suggestion_limit)),
        classifier: Arc::new(runtime),
        max_query_chars: config.max_query_chars,
        max_comment_chars: config.max_comment_chars,
    };

    let app = create_router(state);
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("cannot bind {}", addr))?;

    info!(
        "Listening on {} (artifacts: {:?}, load policy: {:?}, countries: {})",
        addr, config.artifacts_dir, config.load_policy, config.countries_url
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_signal())
        .await?;

    info!("=== Shutdown complete ===");
    Ok(())
}
