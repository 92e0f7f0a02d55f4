//! Explainboard - Main Entry Point
//!
//! Trains the model, explains the dataset, then serves the dashboard until
//! the process is terminated.

use clap::Parser;
use explainboard::dataset::Dataset;
use explainboard::pipeline::{ExplainPipeline, PipelineConfig};
use explainboard::server::{run_server, ServerConfig};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "explainboard", about = "Interactive model explanation dashboard")]
struct Args {
    /// Address to bind; env API_HOST applies when omitted
    #[arg(long)]
    host: Option<String>,

    /// Port to bind; env API_PORT applies when omitted
    #[arg(long)]
    port: Option<u16>,

    /// Number of trees in the forest
    #[arg(long, default_value_t = 100)]
    trees: usize,

    /// Seed for training and attribution sampling
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Sampled permutations per explained row
    #[arg(long, default_value_t = 64)]
    shap_samples: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "explainboard=info,tower_http=warn".into()),
        )
        .init();

    let args = Args::parse();

    let mut server_config = ServerConfig::default();
    if let Some(host) = args.host {
        server_config.host = host;
    }
    if let Some(port) = args.port {
        server_config.port = port;
    }

    let dataset = Dataset::iris()?;
    info!(
        rows = dataset.n_rows(),
        features = dataset.n_features(),
        classes = dataset.n_classes()?,
        "dataset loaded"
    );

    let pipeline_config = PipelineConfig {
        n_estimators: args.trees,
        seed: args.seed,
        shap_samples: args.shap_samples,
        ..PipelineConfig::default()
    };
    let output = ExplainPipeline::new(pipeline_config).run(&dataset)?;

    run_server(server_config, output).await
}
