use slidegen_orchestrator::{
    GenerationOptions, GenerationOrchestrator, OrchestratorConfig, SlideContext, SlideType,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = OrchestratorConfig::from_env().unwrap();
    let orchestrator = GenerationOrchestrator::from_config(&config);

    for provider in orchestrator.list_providers().await {
        println!("{:<16} {:?}", provider.name, provider.status);
    }

    let result = orchestrator
        .generate_slide(
            SlideType::Problem,
            SlideContext {
                company_name: Some("Leafline".to_string()),
                industry: Some("food delivery".to_string()),
                target_market: Some("specialty tea drinkers".to_string()),
                ..SlideContext::default()
            },
            GenerationOptions::default(),
        )
        .await;

    println!("{}", serde_json::to_string_pretty(&result).unwrap());
}
