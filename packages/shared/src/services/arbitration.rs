//! Game state transitions. Every function takes the stored record and
//! returns a new one; callers persist the result.

use chess::{Color, Piece};
use chrono::{DateTime, Utc};
use rand::Rng;

use crate::engine::difficulty;
use crate::models::game::{
    Difficulty, Game, GameResult, GameStatus, MoveRecord, Mover, PlayerColor,
};
use crate::models::requests::{ExportFormat, MoveRequest};
use crate::models::responses::{GameExport, GameTextResponse};
use crate::rules::notation::{parse_promotion, parse_square};
use crate::rules::{Position, RulesError};
use crate::services::errors::game_service_errors::GameServiceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveInput {
    pub from: String,
    pub to: String,
    pub promotion: Option<String>,
}

impl From<&MoveRequest> for MoveInput {
    fn from(request: &MoveRequest) -> Self {
        MoveInput {
            from: request.from.clone(),
            to: request.to.clone(),
            promotion: request.promotion.clone(),
        }
    }
}

/// New game record. When the human plays black the computer opens.
pub fn start_game<R: Rng + ?Sized>(
    difficulty: Difficulty,
    player_color: PlayerColor,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<Game, GameServiceError> {
    let mut game = Game::new(difficulty, player_color, now);
    let mut position = Position::from_fen(&game.started_fen)?;

    if player_color == PlayerColor::Black {
        play_computer_move(&mut game, &mut position, rng)?;
        finish_if_over(&mut game, &position, now);
    }

    sync(&mut game, &position);
    Ok(game)
}

/// Apply the human's move and, unless that ends the game, the computer's reply.
pub fn apply_human_move<R: Rng + ?Sized>(
    game: &Game,
    input: &MoveInput,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<Game, GameServiceError> {
    if game.is_finished() {
        return Err(GameServiceError::GameAlreadyFinished);
    }

    let mut position = load_position(game)?;
    if PlayerColor::from(position.side_to_move()) != game.player_color {
        return Err(GameServiceError::WrongTurn);
    }

    let from = parse_square(&input.from)?;
    let to = parse_square(&input.to)?;
    let promotion = match input.promotion.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Some(parse_promotion(text)?),
        _ => None,
    };

    // a promotion letter only counts when the move actually promotes
    let promotion = promotion.filter(|_| position.requires_promotion(from, to));

    let played = match position.play(from, to, promotion) {
        Ok(played) => played,
        Err(RulesError::IllegalMove(_))
            if promotion.is_none() && position.requires_promotion(from, to) =>
        {
            position.play(from, to, Some(Piece::Queen))?
        }
        Err(err) => return Err(err.into()),
    };

    let mut next = game.clone();
    next.moves.push(MoveRecord {
        san: played.san,
        uci: played.uci,
        by: Mover::Human,
    });

    if !finish_if_over(&mut next, &position, now) {
        play_computer_move(&mut next, &mut position, rng)?;
        finish_if_over(&mut next, &position, now);
    }

    sync(&mut next, &position);
    next.version = game.version + 1;
    Ok(next)
}

pub fn export_game_text(game: &Game) -> String {
    game.pgn.clone()
}

pub fn export_game_json(game: &Game) -> GameTextResponse {
    GameTextResponse {
        pgn: game.pgn.clone(),
    }
}

pub fn export_game(game: &Game, format: ExportFormat) -> GameExport {
    match format {
        ExportFormat::Text => GameExport::Text(export_game_text(game)),
        ExportFormat::Json => GameExport::Json(export_game_json(game)),
    }
}

fn load_position(game: &Game) -> Result<Position, GameServiceError> {
    Position::from_game_text(&game.started_fen, &game.pgn).map_err(|e| {
        GameServiceError::EngineFailure(format!("stored game {} does not replay: {}", game.id, e))
    })
}

fn play_computer_move<R: Rng + ?Sized>(
    game: &mut Game,
    position: &mut Position,
    rng: &mut R,
) -> Result<(), GameServiceError> {
    let ai_color = Color::from(game.ai_color());
    if position.side_to_move() != ai_color {
        return Err(GameServiceError::EngineFailure(
            "turn mismatch: computer asked to move for the human".to_string(),
        ));
    }

    let mv = difficulty::best_move(position, game.difficulty, ai_color, rng).ok_or_else(|| {
        GameServiceError::EngineFailure("engine produced no move".to_string())
    })?;
    let played = position.play_move(mv.chess_move).map_err(|e| {
        GameServiceError::EngineFailure(format!("engine move rejected: {}", e))
    })?;

    game.moves.push(MoveRecord {
        san: played.san,
        uci: played.uci,
        by: Mover::Ai,
    });
    Ok(())
}

fn finish_if_over(game: &mut Game, position: &Position, now: DateTime<Utc>) -> bool {
    match position.outcome() {
        Some(outcome) => {
            game.status = GameStatus::Finished;
            game.result = Some(GameResult::from(outcome));
            game.finished_at = Some(now);
            true
        }
        None => false,
    }
}

fn sync(game: &mut Game, position: &Position) {
    game.fen = position.fen();
    let text = position.game_text();
    game.pgn = match game.result {
        Some(result) if text.is_empty() => result.as_str().to_string(),
        Some(result) => format!("{} {}", text, result.as_str()),
        None => text,
    };
}
