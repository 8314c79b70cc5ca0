use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

/// What a swap request did once accepted.
#[derive(Clone, Debug, PartialEq)]
pub enum SwapOutcome {
    /// No special involved and no match formed; the swap was undone and no
    /// move was spent.
    Reverted,
    /// Valid move, resolved to completion; the events describe everything
    /// that happened, in order.
    Resolved(Vec<GameEvent>),
}

/// UI-visible counters, queryable at any time.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub score: u32,
    pub remaining_moves: u32,
    pub time_remaining: f32,
    pub stars_earned: u8,
    pub game_over: bool,
}

/// One play-through of a level. Owns the grid, the move/time/score counters,
/// and the refill RNG; a replay constructs a fresh instance.
#[derive(Clone, Debug)]
pub struct GameSession {
    config: LevelConfig,
    grid: Grid,
    rng: SmallRng,
    remaining_moves: u32,
    time_remaining: f32,
    score: u32,
    stars_earned: u8,
    game_over: bool,
    swap_in_progress: bool,
}

impl GameSession {
    /// Validates the config and generates a fresh board from `seed`.
    pub fn new(config: LevelConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = RandomBoardGenerator::new(seed).generate(&config);
        Self::with_grid(config, grid, seed)
    }

    /// Starts a session on a host-supplied board, e.g. a scripted or
    /// restored layout.
    pub fn with_grid(config: LevelConfig, grid: Grid, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        if grid.size() != config.board_size {
            return Err(ConfigError::GridSizeMismatch {
                actual: grid.size(),
                expected: config.board_size,
            });
        }
        Ok(Self {
            remaining_moves: config.move_limit,
            time_remaining: config.time_limit,
            score: 0,
            stars_earned: 0,
            game_over: false,
            swap_in_progress: false,
            rng: SmallRng::seed_from_u64(seed),
            grid,
            config,
        })
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn level_number(&self) -> u32 {
        self.config.level_number
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn remaining_moves(&self) -> u32 {
        self.remaining_moves
    }

    pub fn time_remaining(&self) -> f32 {
        self.time_remaining
    }

    /// Remaining fraction of the level timer, for progress-ring style UI.
    pub fn time_fraction(&self) -> f32 {
        self.time_remaining / self.config.time_limit
    }

    pub fn stars_earned(&self) -> u8 {
        self.stars_earned
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_busy(&self) -> bool {
        self.swap_in_progress
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            score: self.score,
            remaining_moves: self.remaining_moves,
            time_remaining: self.time_remaining,
            stars_earned: self.stars_earned,
            game_over: self.game_over,
        }
    }

    /// Attempts to swap two adjacent cells. Rejections leave the session
    /// untouched; an accepted swap either resolves fully (special activation
    /// or cascade, one move spent) or reverts when nothing matched.
    pub fn try_swap(&mut self, a: Coord2, b: Coord2) -> Result<SwapOutcome> {
        if self.game_over {
            return Err(SwapError::GameOver);
        }
        if self.swap_in_progress {
            return Err(SwapError::SessionBusy);
        }
        let a = self.grid.validate_coords(a)?;
        let b = self.grid.validate_coords(b)?;
        if manhattan(a, b) != 1 {
            return Err(SwapError::NotAdjacent);
        }

        let cell_a = self.grid.get(a);
        let cell_b = self.grid.get(b);
        if cell_a.is_obstacle() || cell_b.is_obstacle() {
            return Err(SwapError::Obstacle);
        }
        if cell_a.is_empty() || cell_b.is_empty() {
            return Err(SwapError::EmptyCell);
        }
        // the input layer already refuses to select locked pieces; re-check
        if cell_a.is_locked() || cell_b.is_locked() {
            return Err(SwapError::Locked);
        }

        self.swap_in_progress = true;
        self.grid.swap_cells(a, b);

        // a special swapped with an ordinary piece clears that piece's
        // category; the special ends up on the other cell of the pair
        let special_swap = match (cell_a, cell_b) {
            (Cell::Special(_), Cell::Piece { category, .. }) => Some((b, category)),
            (Cell::Piece { category, .. }, Cell::Special(_)) => Some((a, category)),
            _ => None,
        };

        let mut events = Vec::new();
        let delta = if let Some((special_pos, target)) = special_swap {
            self.engine().activate_special(target, special_pos, &mut events)
        } else if find_best_match(&self.grid).is_some() {
            self.engine().run_cascade(&mut events)
        } else {
            self.grid.swap_cells(a, b);
            self.swap_in_progress = false;
            return Ok(SwapOutcome::Reverted);
        };

        self.remaining_moves = self.remaining_moves.saturating_sub(1);
        self.score += delta;
        self.swap_in_progress = false;
        self.check_game_over(&mut events);
        Ok(SwapOutcome::Resolved(events))
    }

    /// Counts down the level timer. No-ops while a swap is resolving or
    /// after game over.
    pub fn tick(&mut self, dt: f32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.game_over || self.swap_in_progress {
            return events;
        }
        self.time_remaining = (self.time_remaining - dt).max(0.0);
        self.check_game_over(&mut events);
        events
    }

    /// Safety net for matches that appear outside a direct swap, e.g. after
    /// external board mutation. Spends no move. No-ops while a swap is
    /// resolving or after game over.
    pub fn resolve_stray_matches(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.game_over || self.swap_in_progress {
            return events;
        }
        if find_best_match(&self.grid).is_none() {
            return events;
        }

        self.swap_in_progress = true;
        let delta = self.engine().run_cascade(&mut events);
        self.score += delta;
        self.swap_in_progress = false;
        events
    }

    fn engine(&mut self) -> ResolutionEngine<'_> {
        ResolutionEngine::new(&mut self.grid, &mut self.rng, self.config.category_count)
    }

    /// One-way transition; evaluates stars once and emits `GameOver` exactly
    /// once.
    fn check_game_over(&mut self, events: &mut Vec<GameEvent>) {
        if self.game_over {
            return;
        }
        if self.remaining_moves == 0 || self.time_remaining <= 0.0 {
            self.game_over = true;
            self.stars_earned = self.config.stars_for_score(self.score);
            log::debug!(
                "Level {} over, score {}, {} stars",
                self.config.level_number,
                self.score,
                self.stars_earned
            );
            events.push(GameEvent::GameOver {
                final_score: self.score,
                stars: self.stars_earned,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::grid_from_rows;

    fn config(board_size: Coord) -> LevelConfig {
        LevelConfig {
            level_number: 1,
            board_size,
            move_limit: 20,
            time_limit: 120.0,
            category_count: 6,
            obstacles: vec![],
            locked: vec![],
            star_thresholds: [50, 100, 150],
        }
    }

    /// 7x7 board built from the repeating (x + y) % 3 pattern, which never
    /// contains a match, with targeted overrides applied on top.
    fn patterned_grid(overrides: &[(Coord2, Cell)]) -> Grid {
        let mut grid = Grid::new(7);
        for x in 0..7 {
            for y in 0..7 {
                grid.set((x, y), Cell::piece(Category((x + y) % 3)));
            }
        }
        for &(pos, cell) in overrides {
            grid.set(pos, cell);
        }
        grid
    }

    fn session_with(overrides: &[(Coord2, Cell)]) -> GameSession {
        let grid = patterned_grid(overrides);
        assert_eq!(find_best_match(&grid), None, "fixture must start stable");
        GameSession::with_grid(config(7), grid, 0).unwrap()
    }

    #[test]
    fn rejections_leave_the_session_untouched() {
        let mut session = session_with(&[
            ((3, 3), Cell::Obstacle {
                hits_taken: 0,
                hits_to_break: 1,
                hidden: None,
            }),
            ((0, 0), Cell::Piece {
                category: Category(0),
                locked: true,
            }),
            ((5, 5), Cell::Empty),
        ]);
        let before = session.grid().clone();

        assert_eq!(session.try_swap((0, 7), (0, 6)), Err(SwapError::OutOfBounds));
        assert_eq!(session.try_swap((1, 1), (2, 2)), Err(SwapError::NotAdjacent));
        assert_eq!(session.try_swap((1, 1), (1, 1)), Err(SwapError::NotAdjacent));
        assert_eq!(session.try_swap((3, 3), (3, 4)), Err(SwapError::Obstacle));
        assert_eq!(session.try_swap((5, 5), (5, 4)), Err(SwapError::EmptyCell));
        assert_eq!(session.try_swap((0, 0), (1, 0)), Err(SwapError::Locked));

        assert_eq!(session.grid(), &before);
        assert_eq!(session.remaining_moves(), 20);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn swap_without_match_reverts_and_spends_no_move() {
        let mut session = session_with(&[]);
        let before = session.grid().clone();

        let outcome = session.try_swap((2, 2), (2, 3)).unwrap();

        assert_eq!(outcome, SwapOutcome::Reverted);
        assert_eq!(session.grid(), &before);
        assert_eq!(session.remaining_moves(), 20);
        assert_eq!(session.score(), 0);
        assert!(!session.is_busy());
    }

    #[test]
    fn four_in_a_row_swap_scores_twenty_and_spawns_a_special() {
        // swapping (3,2) and (3,3) completes a horizontal 4-run of
        // category 0 anchored at (2,3)
        let mut session = session_with(&[
            ((2, 3), Cell::piece(Category(0))),
            ((4, 3), Cell::piece(Category(0))),
            ((5, 3), Cell::piece(Category(0))),
            ((6, 3), Cell::piece(Category(1))),
            ((3, 2), Cell::piece(Category(0))),
            ((3, 3), Cell::piece(Category(2))),
        ]);

        let outcome = session.try_swap((3, 2), (3, 3)).unwrap();

        let SwapOutcome::Resolved(events) = outcome else {
            panic!("expected a resolved swap");
        };
        assert_eq!(
            events[0],
            GameEvent::MatchCleared {
                coords: smallvec::smallvec![(2, 3), (3, 3), (4, 3), (5, 3)],
                shape: MatchShape::Line4,
            }
        );
        assert_eq!(
            events[1],
            GameEvent::SpecialSpawned {
                x: 2,
                y: 3,
                category: Category(0),
            }
        );
        assert!(matches!(events[2], GameEvent::Dropped { .. }));
        assert!(events.iter().any(|e| matches!(e, GameEvent::Refilled { .. })));
        assert_eq!(session.grid().get((2, 3)), Cell::Special(Category(0)));
        assert_eq!(session.remaining_moves(), 19);
        assert!(session.score() >= 20);
        assert_eq!(find_best_match(session.grid()), None);
    }

    #[test]
    fn special_activation_clears_the_target_category_and_counts_the_move() {
        // categories 1-3 on the base pattern; the lone category-0 piece at
        // (1,2) is the activation target, the special sits at (1,1)
        let mut grid = Grid::new(7);
        for x in 0..7 {
            for y in 0..7 {
                grid.set((x, y), Cell::piece(Category((x + y) % 3 + 1)));
            }
        }
        grid.set((1, 1), Cell::Special(Category(5)));
        grid.set((1, 2), Cell::piece(Category(0)));
        assert_eq!(find_best_match(&grid), None);
        let mut session = GameSession::with_grid(config(7), grid, 0).unwrap();

        let outcome = session.try_swap((1, 1), (1, 2)).unwrap();

        let SwapOutcome::Resolved(events) = outcome else {
            panic!("expected a resolved swap");
        };
        // the swapped-in piece was the only category-0 cell; it is cleared,
        // the special drops into the hole, and one refill tops the column up
        assert_eq!(
            events[0],
            GameEvent::SpecialActivated {
                target_category: Category(0),
            }
        );
        assert_eq!(
            events[1],
            GameEvent::Dropped {
                from: (1, 2),
                to: (1, 1),
            }
        );
        assert_eq!(events.len(), 7);
        assert!(matches!(events[6], GameEvent::Refilled { x: 1, y: 6, .. }));
        assert_eq!(session.grid().get((1, 1)), Cell::Special(Category(5)));
        assert_eq!(session.remaining_moves(), 19);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn swapping_two_ordinary_pieces_never_activates_a_special() {
        let mut session = session_with(&[]);
        let outcome = session.try_swap((4, 4), (4, 5)).unwrap();
        assert_eq!(outcome, SwapOutcome::Reverted);
    }

    #[test]
    fn last_move_failing_to_match_keeps_the_game_alive() {
        let mut config = config(7);
        config.move_limit = 1;
        let mut session = GameSession::with_grid(config, patterned_grid(&[]), 0).unwrap();

        let outcome = session.try_swap((2, 2), (2, 3)).unwrap();

        assert_eq!(outcome, SwapOutcome::Reverted);
        assert_eq!(session.remaining_moves(), 1);
        assert!(!session.is_game_over());
    }

    #[test]
    fn exhausting_moves_ends_the_game_exactly_once() {
        let mut config = config(7);
        config.move_limit = 1;
        let grid = patterned_grid(&[
            ((2, 3), Cell::piece(Category(0))),
            ((4, 3), Cell::piece(Category(0))),
            ((5, 3), Cell::piece(Category(0))),
            ((6, 3), Cell::piece(Category(1))),
            ((3, 2), Cell::piece(Category(0))),
            ((3, 3), Cell::piece(Category(2))),
        ]);
        assert_eq!(find_best_match(&grid), None);
        let mut session = GameSession::with_grid(config, grid, 0).unwrap();

        let SwapOutcome::Resolved(events) = session.try_swap((3, 2), (3, 3)).unwrap() else {
            panic!("expected a resolved swap");
        };

        let game_over_events: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .collect();
        assert_eq!(game_over_events.len(), 1);
        assert!(session.is_game_over());
        assert_eq!(session.remaining_moves(), 0);

        // every later swap is rejected without touching the board
        assert_eq!(session.try_swap((0, 0), (0, 1)), Err(SwapError::GameOver));
    }

    #[test]
    fn time_running_out_ends_the_game_on_tick() {
        let mut session = session_with(&[]);

        assert!(session.tick(60.0).is_empty());
        assert!(!session.is_game_over());

        let events = session.tick(61.0);

        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], GameEvent::GameOver { stars: 0, .. }));
        assert!(session.is_game_over());
        assert_eq!(session.time_remaining(), 0.0);
        assert!(session.tick(1.0).is_empty());
    }

    #[test]
    fn stray_matches_resolve_without_spending_a_move() {
        let mut session = session_with(&[]);
        assert!(session.resolve_stray_matches().is_empty());

        // mutate the board behind the engine's back into a 3-run
        let mut grid = session.grid().clone();
        grid.set((0, 0), Cell::piece(Category(0)));
        grid.set((1, 0), Cell::piece(Category(0)));
        grid.set((2, 0), Cell::piece(Category(0)));
        grid.set((3, 0), Cell::piece(Category(1)));
        let mut session = GameSession::with_grid(config(7), grid, 0).unwrap();

        let events = session.resolve_stray_matches();

        assert!(!events.is_empty());
        assert!(session.score() >= 10);
        assert_eq!(session.remaining_moves(), 20);
        assert_eq!(find_best_match(session.grid()), None);
    }

    #[test]
    fn stars_reflect_the_final_score() {
        let mut config = config(7);
        config.star_thresholds = [10, 100, 150];
        config.move_limit = 1;
        let grid = patterned_grid(&[
            ((2, 3), Cell::piece(Category(0))),
            ((4, 3), Cell::piece(Category(0))),
            ((5, 3), Cell::piece(Category(0))),
            ((6, 3), Cell::piece(Category(1))),
            ((3, 2), Cell::piece(Category(0))),
            ((3, 3), Cell::piece(Category(2))),
        ]);
        assert_eq!(find_best_match(&grid), None);
        let mut session = GameSession::with_grid(config, grid, 0).unwrap();
        session.try_swap((3, 2), (3, 3)).unwrap();

        // the 4-match alone is worth 20, past the one-star threshold
        assert!(session.is_game_over());
        assert!(session.stars_earned() >= 1);
        assert_eq!(
            session.stars_earned(),
            session.config().stars_for_score(session.score())
        );
    }
}
