use rand::rngs::SmallRng;

use crate::*;

/// Resolves one cascade or special activation on a borrowed board. Holds the
/// grid and refill RNG only for the duration of a single call chain; the
/// session owns both.
pub struct ResolutionEngine<'a> {
    grid: &'a mut Grid,
    rng: &'a mut SmallRng,
    category_count: u8,
}

impl<'a> ResolutionEngine<'a> {
    pub fn new(grid: &'a mut Grid, rng: &'a mut SmallRng, category_count: u8) -> Self {
        Self {
            grid,
            rng,
            category_count,
        }
    }

    /// One full cascade: clear the best match, score it, spawn a special for
    /// 4-cell matches, settle the board, and rescan until stable. Runs to
    /// completion once started. Returns the score delta.
    pub fn run_cascade(&mut self, events: &mut Vec<GameEvent>) -> u32 {
        let mut score = 0;
        let mut combo: u32 = 0;

        while let Some(found) = find_best_match(self.grid) {
            combo += 1;
            score += self.clear_match(&found, combo, events);
            self.settle(events);
        }

        score
    }

    /// Clears every cell whose resolved category equals `target`, except the
    /// special's own cell; obstacles keep hidden pieces safe. Settles, then
    /// chains into a normal cascade when the refilled board matches.
    pub fn activate_special(
        &mut self,
        target: Category,
        special_pos: Coord2,
        events: &mut Vec<GameEvent>,
    ) -> u32 {
        log::debug!("Special activated targeting category {}", target.0);
        events.push(GameEvent::SpecialActivated {
            target_category: target,
        });

        let size = self.grid.size();
        for x in 0..size {
            for y in 0..size {
                if (x, y) == special_pos {
                    continue;
                }
                let cell = self.grid.get((x, y));
                if cell.is_obstacle() || cell.is_empty() {
                    continue;
                }
                if cell.resolved_category() == Some(target) {
                    self.grid.set((x, y), Cell::Empty);
                }
            }
        }

        self.settle(events);
        self.run_cascade(events)
    }

    /// Steps 2–4 of one cascade iteration: remove the match, award base and
    /// combo points, leave a special behind for 4-cell matches.
    fn clear_match(&mut self, found: &Match, combo: u32, events: &mut Vec<GameEvent>) -> u32 {
        for &pos in &found.coords {
            self.grid.set(pos, Cell::Empty);
        }
        events.push(GameEvent::MatchCleared {
            coords: found.coords.clone(),
            shape: found.shape,
        });

        let mut score = found.shape.score();
        if combo > 1 {
            let bonus = 5 * combo;
            score += bonus;
            events.push(GameEvent::ComboBonus {
                amount: bonus,
                combo_index: combo,
            });
        }

        if found.shape.spawns_special() {
            let (x, y) = found.anchor();
            self.grid.set((x, y), Cell::Special(found.category));
            events.push(GameEvent::SpecialSpawned {
                x,
                y,
                category: found.category,
            });
        }

        score
    }

    fn settle(&mut self, events: &mut Vec<GameEvent>) {
        self.apply_gravity(events);
        self.refill(events);
    }

    /// Compacts each column downward, preserving relative order. Obstacles
    /// are fixed anchors: they never move, are never overwritten, and pieces
    /// never pass through them, so each run of cells between obstacles
    /// settles independently.
    fn apply_gravity(&mut self, events: &mut Vec<GameEvent>) {
        let size = self.grid.size();
        for x in 0..size {
            let mut write: Coord = 0;
            for y in 0..size {
                let cell = self.grid.get((x, y));
                if cell.is_obstacle() {
                    write = y + 1;
                    continue;
                }
                if cell.falls() {
                    if write != y {
                        self.grid.set((x, write), cell);
                        self.grid.set((x, y), Cell::Empty);
                        events.push(GameEvent::Dropped {
                            from: (x, y),
                            to: (x, write),
                        });
                    }
                    write += 1;
                }
            }
        }
    }

    /// Fills every hole left after gravity with a fresh random piece.
    fn refill(&mut self, events: &mut Vec<GameEvent>) {
        let size = self.grid.size();
        for x in 0..size {
            for y in 0..size {
                if self.grid.get((x, y)).is_empty() {
                    let category = random_category(self.rng, self.category_count);
                    self.grid.set((x, y), Cell::piece(category));
                    events.push(GameEvent::Refilled { x, y, category });
                }
            }
        }
    }
}
