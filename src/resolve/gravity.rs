//! Gravity and refill.

use log::{trace, warn};

use crate::core::Position;
use crate::events::TokenMove;
use crate::grid::{Grid, Token, TokenFactory};

/// What one gravity pass did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GravityReport {
    /// Survivors that dropped, per column left to right, bottom first.
    pub moved: Vec<TokenMove>,
    /// New tokens, per column left to right, top first.
    pub spawned: Vec<Token>,
}

/// Drop survivors to the bottom of each column, keeping their order, and
/// fill the cells above them with fresh tokens.
///
/// Moved and spawned tokens get the `falling` flag. Refills are not
/// scrubbed, so the result may hold new matches.
pub fn apply_gravity(grid: &mut Grid, factory: &mut TokenFactory) -> GravityReport {
    let dimension = grid.dimension() as i32;
    let mut report = GravityReport::default();

    for col in 0..dimension {
        let mut write = dimension - 1;
        for row in (0..dimension).rev() {
            let from = Position::new(row, col);
            let Some(mut token) = grid.take(from) else {
                continue;
            };
            let to = Position::new(write, col);
            if to != from {
                token.flags.falling = true;
                report.moved.push(TokenMove {
                    token: token.id,
                    from,
                    to,
                });
            }
            // `to` is in the column being compacted, so it is in bounds.
            if let Err(err) = grid.place(to, token) {
                warn!("gravity lost {}: {}", token.id, err);
            }
            write -= 1;
        }

        for row in 0..=write {
            let pos = Position::new(row, col);
            let mut token = factory.spawn(pos);
            token.flags.falling = true;
            if let Err(err) = grid.place(pos, token) {
                warn!("refill lost {}: {}", token.id, err);
            }
            report.spawned.push(token);
        }
        if write >= 0 {
            trace!("column {}: refilled {} cells", col, write + 1);
        }
    }

    report
}
