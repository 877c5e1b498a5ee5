//! Live checks against the model providers. Run with `--features api`.

use strictly_four::{
    Board, GameConfig, LlmClient, LlmProposer, LlmProvider, MoveProposer, Player,
};
use tracing::instrument;

fn proposer_for(provider: LlmProvider, model: &str) -> LlmProposer {
    dotenvy::dotenv().ok();

    let config = GameConfig::default()
        .with_llm_provider(provider)
        .with_llm_model(model)
        .with_llm_max_tokens(256u32);
    let llm = config.create_llm_config().expect("API key not set");
    LlmProposer::new(
        format!("{provider} test"),
        LlmClient::new(llm).expect("HTTP client"),
    )
}

fn position() -> Board {
    "
    . . . . . . .
    . . . . . . .
    . . . . . . .
    . . . X . . .
    . . . X O . .
    . . . X O . .
    "
    .parse()
    .expect("valid picture")
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_gemini_proposes_playable_column() {
    let proposer = proposer_for(LlmProvider::Gemini, "gemini-2.5-flash");
    let board = position();

    let column = proposer
        .propose(&board, Player::Ai)
        .await
        .expect("Failed to propose");

    assert!(column < board.cols());
    assert!(!board.is_column_full(column));
    eprintln!("Gemini proposed column {column}");
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_openai_proposes_playable_column() {
    let proposer = proposer_for(LlmProvider::OpenAI, "gpt-4o-mini");
    let board = position();

    let column = proposer
        .propose(&board, Player::Ai)
        .await
        .expect("Failed to propose");

    assert!(column < board.cols());
    eprintln!("OpenAI proposed column {column}");
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_anthropic_connectivity() {
    dotenvy::dotenv().ok();

    let config = GameConfig::default()
        .with_llm_provider(LlmProvider::Anthropic)
        .with_llm_model("claude-3-5-haiku-20241022")
        .with_llm_max_tokens(50u32);
    let llm = config.create_llm_config().expect("ANTHROPIC_API_KEY not set");
    let client = LlmClient::new(llm).expect("HTTP client");

    let response = client
        .generate(
            "You are a helpful assistant.",
            "Answer with the JSON object {\"column\": 3} and nothing else.",
        )
        .await
        .expect("Failed to generate");

    assert!(!response.is_empty(), "Response should not be empty");
    eprintln!("Response: {}", response);
}
