use std::env;

use anyhow::{Context, Result};
use simprobe::{
    ai::{SimilarityClient, SimilarityService},
    config::load_config,
    init_tracing,
    report::format_report,
    setup::load_credentials_or_empty,
};
use tracing::error;

struct TestSet {
    title: &'static str,
    texts: &'static [&'static str],
}

const DEFAULT_SETS: &[TestSet] = &[
    TestSet {
        title: "Test Set 1: Original Examples",
        texts: &[
            "Hello world",
            "Machine learning is fascinating",
            "PGVector is a great extension for PostgreSQL",
        ],
    },
    TestSet {
        title: "\nTest Set 2: Machine Learning Related Sentences",
        texts: &[
            "What is machine learning?",
            "Machine learning is AI technology",
            "Deep learning is a subset of machine learning",
            "Natural language processing uses machine learning",
        ],
    },
];

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        error!(error = %err, "Similarity query failed");
        eprintln!("Similarity query failed: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    init_tracing();

    let config = load_config()
        .await
        .context("Failed to load application configuration")?;
    // A missing credential file still sends the queries; each failure is reported per set.
    let creds = load_credentials_or_empty(&config.env_file)?;
    let client = SimilarityClient::new(creds.hf_token, Some(config.embedding.endpoint))?;

    let args: Vec<String> = env::args().skip(1).collect();
    match args.split_first() {
        Some((query, texts)) => query_similarity(&client, query, texts).await,
        None => {
            for set in DEFAULT_SETS {
                println!("{}", set.title);
                let texts: Vec<String> = set.texts[1..].iter().map(|s| s.to_string()).collect();
                query_similarity(&client, set.texts[0], &texts).await;
            }
        }
    }
    Ok(())
}

/// Failures are logged and swallowed so the next query still runs.
async fn query_similarity(service: &dyn SimilarityService, query: &str, texts: &[String]) {
    let scores = match service.similarity(query, texts).await {
        Ok(scores) => scores,
        Err(err) => {
            error!(error = %err, "Failed to get similarity scores");
            return;
        }
    };
    match format_report(query, texts, scores.as_slice()) {
        Ok(report) => print!("{report}"),
        Err(err) => error!(error = %err, "Failed to format similarity scores"),
    }
}
