use std::fmt;
use std::time::{Duration, Instant};

use tabled::{Table, Tabled};

use crate::legality;
use crate::position::{Move, Position};

/// Statistics over every legal move played at one ply of the tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Tabled)]
pub struct PerftDepthResult {
    pub nodes: u64,
    pub captures: u64,
    pub en_passants: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

impl PerftDepthResult {
    pub fn new(
        nodes: u64,
        captures: u64,
        en_passants: u64,
        castles: u64,
        promotions: u64,
        checks: u64,
        checkmates: u64,
    ) -> Self {
        PerftDepthResult {
            nodes,
            captures,
            en_passants,
            castles,
            promotions,
            checks,
            checkmates,
        }
    }
}

pub struct PerftResult {
    /// Entry `i` describes the moves played at ply `i + 1`.
    pub depth_results: Vec<PerftDepthResult>,
    pub tot_nodes: u64,
    pub time_elapsed: Duration,
    pub nodes_per_second: f64,
}

impl fmt::Display for PerftResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "total nodes: {}", self.tot_nodes)?;
        writeln!(f, "time elapsed: {}", self.time_elapsed.as_secs_f32())?;
        writeln!(f, "nodes/s: {:.0}", self.nodes_per_second)?;
        writeln!(f, "{}", Table::new(&self.depth_results))?;
        Ok(())
    }
}

pub fn perft(position: &Position, depth: usize) -> PerftResult {
    let mut depth_results = vec![PerftDepthResult::default(); depth];

    let start = Instant::now();
    perft_helper(&mut depth_results, position);
    let time_elapsed = start.elapsed();

    let tot_nodes = depth_results.iter().map(|res| res.nodes).sum();
    let nodes_per_second = tot_nodes as f64 / time_elapsed.as_secs_f64().max(f64::EPSILON);

    PerftResult {
        depth_results,
        tot_nodes,
        time_elapsed,
        nodes_per_second,
    }
}

fn perft_helper(depth_results: &mut [PerftDepthResult], position: &Position) {
    let Some((curr_res, deeper)) = depth_results.split_first_mut() else {
        return;
    };

    for mve in legality::legal_moves(position, position.state.to_move) {
        let mut move_position = position.clone();
        if move_position.make_move(mve).is_err() {
            continue;
        }

        curr_res.nodes += 1;
        if mve.flags.capture {
            curr_res.captures += 1;
        }
        if mve.flags.en_passant {
            curr_res.en_passants += 1;
        }
        if mve.is_castle() {
            curr_res.castles += 1;
        }
        if mve.promotion.is_some() {
            curr_res.promotions += 1;
        }
        if move_position.is_in_check() {
            curr_res.checks += 1;
            if !legality::has_legal_move(&move_position) {
                curr_res.checkmates += 1;
            }
        }

        perft_helper(deeper, &move_position);
    }
}

/// Number of leaf nodes `depth` plies below `position`.
pub fn count_nodes(position: &Position, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = legality::legal_moves(position, position.state.to_move);
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .into_iter()
        .map(|mve| {
            let mut move_position = position.clone();
            match move_position.make_move(mve) {
                Ok(_) => count_nodes(&move_position, depth - 1),
                Err(_) => 0,
            }
        })
        .sum()
}

/// Leaf counts below each legal root move, for comparing against another
/// move generator one branch at a time.
pub fn perft_divide(position: &Position, depth: usize) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    legality::legal_moves(position, position.state.to_move)
        .into_iter()
        .filter_map(|mve| {
            let mut move_position = position.clone();
            move_position.make_move(mve).ok()?;
            Some((mve, count_nodes(&move_position, depth - 1)))
        })
        .collect()
}
