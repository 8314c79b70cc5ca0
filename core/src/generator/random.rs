use rand::rngs::SmallRng;

use super::*;

/// How many full-board rerolls are tried before a board with a pre-existing
/// match is accepted as a degraded outcome.
pub const MAX_GENERATION_ATTEMPTS: u16 = 200;

/// Fills the board with uniformly random pieces, overlays obstacles and
/// locks from the level config, and rerolls until no match pre-exists.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, config: &LevelConfig) -> Grid {
        use rand::prelude::*;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut attempts: u16 = 0;

        loop {
            let grid = fill_attempt(config, &mut rng);
            if find_best_match(&grid).is_none() {
                return grid;
            }

            attempts += 1;
            if attempts >= MAX_GENERATION_ATTEMPTS {
                log::warn!(
                    "Board generation budget exhausted after {} attempts, accepting a board with a pre-existing match",
                    attempts
                );
                return grid;
            }
        }
    }
}

fn fill_attempt(config: &LevelConfig, rng: &mut SmallRng) -> Grid {
    let size = config.board_size;
    let mut grid = Grid::new(size);

    for x in 0..size {
        for y in 0..size {
            grid.set((x, y), Cell::piece(random_category(rng, config.category_count)));
        }
    }

    for spec in &config.obstacles {
        // the obstacle remembers the piece it replaced as its hidden category
        let hidden = grid.get(spec.pos).match_category();
        grid.set(
            spec.pos,
            Cell::Obstacle {
                hits_taken: 0,
                hits_to_break: spec.hits_to_break,
                hidden,
            },
        );
    }

    for &pos in &config.locked {
        if let Cell::Piece { category, .. } = grid.get(pos) {
            grid.set(pos, Cell::Piece { category, locked: true });
        }
    }

    grid
}
