use std::fmt::Write;

use anyhow::{Context, Result};
use chess_rules::notation::move_to_san;
use chess_rules::perft::{perft, perft_divide};
use chess_rules::{Game, Move, Position, START_FEN};
use tracing::{debug, info};

/// Accepted by `play` in place of a FEN.
pub const STARTPOS: &str = "startpos";

fn parse_position(fen: &str) -> Result<Position> {
    let fen = if fen == STARTPOS { START_FEN } else { fen };
    Position::from_fen(fen).with_context(|| format!("Couldn't parse given fen: `{}`", fen))
}

/// Per-depth statistics table, or with `divide` the leaf count under each
/// root move.
pub fn perft_report(fen: &str, depth: usize, divide: bool) -> Result<String> {
    let position = parse_position(fen)?;
    debug!(fen, depth, divide, "running perft");

    let mut report = String::new();
    if divide {
        let mut move_counts = perft_divide(&position, depth);
        move_counts.sort_by_key(|(mve, _)| mve.to_string());

        let mut tot_nodes = 0;
        for (mve, move_nodes) in move_counts {
            writeln!(report, "{}:  {}", mve, move_nodes)?;
            tot_nodes += move_nodes;
        }
        writeln!(report, "Total: {}", tot_nodes)?;
    } else {
        let res = perft(&position, depth);
        info!(nodes = res.tot_nodes, "perft finished");
        write!(report, "{}", res)?;
    }
    Ok(report)
}

/// Legal moves of the side to move, one per line in coordinate and
/// algebraic notation.
pub fn moves_report(fen: &str) -> Result<String> {
    let position = parse_position(fen)?;
    let game = Game::from_position(position).context("Position can't start a game")?;

    let mut moves = game.legal_moves();
    moves.sort_by_key(Move::to_string);

    let mut report = String::new();
    for mve in moves {
        let san = move_to_san(game.position(), mve)?;
        writeln!(report, "{}  {}", mve, san)?;
    }
    writeln!(report, "status: {}", game.status())?;
    Ok(report)
}

/// Plays coordinate moves from `start` and reports the final FEN and status.
/// Stops at the first move the game rejects.
pub fn play_report<S: AsRef<str>>(start: &str, moves: &[S]) -> Result<String> {
    let position = parse_position(start)?;
    let mut game = Game::from_position(position).context("Position can't start a game")?;

    for (idx, text) in moves.iter().map(AsRef::as_ref).enumerate() {
        let mve: Move = text
            .parse()
            .with_context(|| format!("Couldn't parse move {}: `{}`", idx + 1, text))?;
        game.apply_move(mve)
            .with_context(|| format!("Move {} `{}` rejected", idx + 1, text))?;
    }

    Ok(format!(
        "fen: {}\nstatus: {}\n",
        game.position().to_fen(),
        game.status()
    ))
}
