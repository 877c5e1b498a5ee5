//! Proposer backed by a large language model.

use super::{MoveProposer, ProposerError, ProposerErrorKind, validate_column};
use crate::llm_client::LlmClient;
use serde::Deserialize;
use strictly_four_rules::{Board, Player};
use tracing::{debug, info, instrument};

const SYSTEM_PROMPT: &str =
    "You are an expert, strategic Connect Four player. Your goal is to win the game.";

/// Expected shape of the model's answer.
#[derive(Debug, Deserialize)]
struct ColumnAnswer {
    column: i64,
}

/// Asks an LLM for a column and validates whatever comes back.
#[derive(Debug, Clone)]
pub struct LlmProposer {
    name: String,
    client: LlmClient,
}

impl LlmProposer {
    /// Creates a proposer around an LLM client.
    #[instrument(skip_all)]
    pub fn new(name: impl Into<String>, client: LlmClient) -> Self {
        let name = name.into();
        info!(proposer = %name, "Creating LLM proposer");
        Self { name, client }
    }

    /// Builds the user message describing the position.
    #[instrument(skip(board))]
    pub fn build_prompt(board: &Board, player: Player) -> Result<String, ProposerError> {
        let grid = serde_json::to_string_pretty(board).map_err(|e| {
            ProposerError::new(ProposerErrorKind::Transport(format!(
                "Failed to serialize board: {}",
                e
            )))
        })?;
        let opponent = player.opponent();

        Ok(format!(
            "You are playing Connect Four as {player} (token {me}).\n\
             The board has {rows} rows and {cols} columns, listed top row first.\n\
             - null is an empty cell.\n\
             - {them} is a piece of your opponent, {opponent}.\n\
             - {me} is one of your pieces.\n\n\
             Current board:\n{grid}\n\n\
             Choose a column from 0 to {last}. The column must not be full.\n\
             Win if you can; otherwise block your opponent from winning.\n\
             Answer with a JSON object with a single key \"column\".",
            me = player.token(),
            them = opponent.token(),
            rows = board.rows(),
            cols = board.cols(),
            last = board.cols().saturating_sub(1),
        ))
    }
}

/// Extracts the proposed column from a model answer.
///
/// Accepts a bare JSON object, one wrapped in prose or a Markdown code
/// fence, or a lone integer. The value is not range-checked here.
#[instrument(skip(text), fields(text_length = text.len()))]
pub fn parse_column(text: &str) -> Result<i64, ProposerError> {
    let trimmed = text.trim();

    if let Ok(column) = trimmed.parse::<i64>() {
        return Ok(column);
    }

    let object = match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => {
            return Err(ProposerError::new(ProposerErrorKind::MalformedResponse(
                format!("No JSON object in answer: {}", trimmed),
            )));
        }
    };

    serde_json::from_str::<ColumnAnswer>(object)
        .map(|answer| answer.column)
        .map_err(|e| {
            ProposerError::new(ProposerErrorKind::MalformedResponse(format!(
                "Failed to parse answer {}: {}",
                object, e
            )))
        })
}

#[async_trait::async_trait]
impl MoveProposer for LlmProposer {
    #[instrument(skip(self, board), fields(proposer = %self.name))]
    async fn propose(&self, board: &Board, player: Player) -> Result<usize, ProposerError> {
        let prompt = Self::build_prompt(board, player)?;

        debug!("Requesting move from model");
        let answer = self.client.generate(SYSTEM_PROMPT, &prompt).await?;

        let raw = parse_column(&answer)?;
        let column = validate_column(board, raw)?;
        info!(column, "Model proposed column");
        Ok(column)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_object() {
        assert_eq!(parse_column(r#"{"column": 3}"#).unwrap(), 3);
    }

    #[test]
    fn test_parse_fenced_object_with_prose() {
        let answer = "Blocking the open three.\n```json\n{ \"column\": 5 }\n```";
        assert_eq!(parse_column(answer).unwrap(), 5);
    }

    #[test]
    fn test_parse_bare_integer() {
        assert_eq!(parse_column(" 2\n").unwrap(), 2);
        assert_eq!(parse_column("-1").unwrap(), -1);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for answer in ["", "column three", r#"{"col": 3}"#, r#"{"column": "3"}"#, "} {"] {
            let err = parse_column(answer).unwrap_err();
            assert!(
                matches!(err.kind(), ProposerErrorKind::MalformedResponse(_)),
                "expected malformed for {answer:?}"
            );
        }
    }

    #[test]
    fn test_prompt_contains_serialized_board() {
        let board = Board::standard().drop_piece(3, Player::Human).unwrap();
        let prompt = LlmProposer::build_prompt(&board, Player::Ai).unwrap();
        assert!(prompt.contains("6 rows and 7 columns"));
        assert!(prompt.contains("from 0 to 6"));
        assert!(prompt.contains("null"));
        assert!(prompt.contains("as Ai (token 2)"));
    }
}
