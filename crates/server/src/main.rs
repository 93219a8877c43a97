use advisor_core::Advisor;
use advisor_knowledge::KnowledgeStore;
use advisor_matcher::{EmbeddingModel, SemanticMatcher};
use advisor_server::build_router;
use anyhow::Result;
use std::sync::Arc;

const DEFAULT_BIND: &str = "127.0.0.1:5000";
const DEFAULT_DATASET: &str = "data/intern_qa.json";

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let dataset_path =
        std::env::var("ADVISOR_DATASET").unwrap_or_else(|_| DEFAULT_DATASET.to_string());
    let knowledge = Arc::new(KnowledgeStore::load(&dataset_path));

    let embedder = Arc::new(EmbeddingModel::from_env()?);
    let matcher = SemanticMatcher::new(embedder, &knowledge).await?;
    let advisor = Arc::new(Advisor::new(matcher, knowledge));
    log::info!(
        "Advisor ready: {} knowledge categories, {} QA rows",
        advisor.knowledge().len(),
        advisor.knowledge().dataset().len()
    );

    let bind = std::env::var("ADVISOR_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    let local_addr = listener.local_addr()?;
    log::info!("Serving chat API: http://{local_addr}/chat");
    log::info!("Summary endpoint: http://{local_addr}/conversation/summary");
    log::info!("Suggestions endpoint: http://{local_addr}/suggestions");

    axum::serve(listener, build_router(advisor)).await?;
    Ok(())
}
