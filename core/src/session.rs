use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::GameConfig;
use crate::error::Result;
use crate::grid::Grid;
use crate::types::{CellCount, Coord2, Pixel};

/// Top-level game phase.
///
/// Valid transitions:
/// - Intro -> Playing (start command)
/// - Playing -> Won | Lost (tile reveal)
/// - Won | Lost -> Playing (restart command)
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SessionState {
    Intro,
    Playing,
    Won,
    Lost,
}

impl SessionState {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Intro
    }
}

/// Outcome of a reveal attempt. Anything that cannot act right now is
/// reported as `Ignored`, never as an error.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    Ignored,
    Safe,
    Exploded,
    Won,
}

impl RevealOutcome {
    /// Whether this outcome changed anything a renderer would repaint.
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            Ignored => false,
            Safe => true,
            Exploded => true,
            Won => true,
        }
    }
}

/// One play session: the current board plus the round counters. The session
/// is the only mutator of its grid; callers drive it through the command
/// methods and read back borrows for drawing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    config: GameConfig,
    grid: Grid,
    state: SessionState,
    safe_total: CellCount,
    safe_clicked: CellCount,
    input_locked: bool,
}

impl Session {
    /// Session in the intro state, with a mineless preview board so the
    /// intro screen has something to draw.
    pub fn new(config: GameConfig) -> Self {
        let config = config.sanitized();
        let grid = Grid::build(config.cols, config.rows, config.tile_size, config.padding);
        Self {
            config,
            grid,
            state: SessionState::default(),
            safe_total: config.safe_total(),
            safe_clicked: 0,
            input_locked: false,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn safe_total(&self) -> CellCount {
        self.safe_total
    }

    pub fn safe_clicked(&self) -> CellCount {
        self.safe_clicked
    }

    pub fn input_locked(&self) -> bool {
        self.input_locked
    }

    /// Start command: Intro -> Playing. Ignored in any other state.
    ///
    /// Locks input until [`Session::unlock_input`]; the caller schedules the
    /// unlock for the end of the current event-processing turn so a click
    /// coalesced with the start control is swallowed.
    pub fn start(&mut self, seed: u64) {
        if !matches!(self.state, SessionState::Intro) {
            return;
        }
        self.begin_round(seed);
    }

    /// Restart command: Won | Lost -> Playing with a fresh board. Locks
    /// input the same way as [`Session::start`].
    pub fn restart(&mut self, seed: u64) {
        if !self.state.is_finished() {
            return;
        }
        self.begin_round(seed);
    }

    fn begin_round(&mut self, seed: u64) {
        self.input_locked = true;
        self.grid = Grid::build(
            self.config.cols,
            self.config.rows,
            self.config.tile_size,
            self.config.padding,
        );
        let mut rng = SmallRng::seed_from_u64(seed);
        self.grid.place_mines(&mut rng, self.config.mines);
        self.safe_total = self.grid.total_cells() - self.grid.mine_count();
        self.safe_clicked = 0;
        self.state = SessionState::Playing;
        log::debug!(
            "round started, seed {}, {} safe tiles",
            seed,
            self.safe_total
        );
    }

    /// Scripted round with a fixed mine layout instead of random placement.
    /// Skips the input lock; callers own the pacing.
    pub fn start_with_mines(&mut self, mine_coords: &[Coord2]) -> Result<()> {
        let mut grid = Grid::build(
            self.config.cols,
            self.config.rows,
            self.config.tile_size,
            self.config.padding,
        );
        grid.place_mines_at(mine_coords)?;
        self.safe_total = grid.total_cells() - grid.mine_count();
        self.safe_clicked = 0;
        self.grid = grid;
        self.state = SessionState::Playing;
        self.input_locked = false;
        Ok(())
    }

    /// Clears the restart guard. Deferred by the caller to the end of the
    /// event turn, not called inline with the start/restart command.
    pub fn unlock_input(&mut self) {
        self.input_locked = false;
    }

    /// Reveals the tile under a pixel position; misses are ignored.
    pub fn click_pixel(&mut self, px: Pixel, py: Pixel) -> RevealOutcome {
        match self.grid.coords_at_pixel(px, py) {
            Some(coords) => self.reveal(coords),
            None => RevealOutcome::Ignored,
        }
    }

    /// Reveals the tile at `coords`. No-op while not playing, while input is
    /// locked, out of bounds, or on an already revealed tile.
    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        if !self.state.is_playing() || self.input_locked {
            return RevealOutcome::Ignored;
        }
        let Some(tile) = self.grid.tile_at_mut(coords) else {
            return RevealOutcome::Ignored;
        };
        if tile.revealed() {
            return RevealOutcome::Ignored;
        }

        tile.reveal(false);
        if tile.is_mine() {
            self.state = SessionState::Lost;
            log::debug!("mine hit at {:?}", coords);
            return RevealOutcome::Exploded;
        }

        self.safe_clicked += 1;
        log::debug!(
            "safe tile at {:?}, {}/{}",
            coords,
            self.safe_clicked,
            self.safe_total
        );
        if self.safe_clicked >= self.safe_total {
            self.state = SessionState::Won;
            self.grid.reveal_all_mines();
            RevealOutcome::Won
        } else {
            RevealOutcome::Safe
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TileColor;

    fn config_2x1() -> GameConfig {
        GameConfig {
            cols: 2,
            rows: 1,
            tile_size: 64,
            padding: 16,
            mines: 1,
        }
    }

    /// 2x1 board, mine at (1, 0), one safe tile at (0, 0).
    fn session_2x1() -> Session {
        let mut session = Session::new(config_2x1());
        session.start_with_mines(&[(1, 0)]).unwrap();
        session
    }

    #[test]
    fn new_session_is_in_intro_with_a_mineless_preview() {
        let session = Session::new(config_2x1());

        assert_eq!(session.state(), SessionState::Intro);
        assert_eq!(session.grid().mine_count(), 0);
        assert_eq!(session.safe_total(), 1);
        assert_eq!(session.safe_clicked(), 0);
    }

    #[test]
    fn clicks_before_start_are_ignored() {
        let mut session = Session::new(config_2x1());

        assert_eq!(session.reveal((0, 0)), RevealOutcome::Ignored);
        assert_eq!(session.state(), SessionState::Intro);
        assert!(!session.grid().tile_at((0, 0)).unwrap().revealed());
    }

    #[test]
    fn start_places_mines_and_enters_playing() {
        let mut session = Session::new(config_2x1());

        session.start(42);

        assert_eq!(session.state(), SessionState::Playing);
        assert_eq!(session.grid().mine_count(), 1);
        assert_eq!(session.safe_total(), 1);
        assert!(session.input_locked());
    }

    #[test]
    fn start_is_ignored_outside_intro() {
        let mut session = session_2x1();
        session.reveal((1, 0));
        assert_eq!(session.state(), SessionState::Lost);

        session.start(42);

        assert_eq!(session.state(), SessionState::Lost);
    }

    #[test]
    fn clicking_the_last_safe_tile_wins_and_reveals_all_mines() {
        let mut session = session_2x1();

        let outcome = session.reveal((0, 0));

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(session.state(), SessionState::Won);
        assert_eq!(session.safe_clicked(), 1);
        assert_eq!(
            session.grid().tile_at((1, 0)).unwrap().color(),
            TileColor::Mine
        );
    }

    #[test]
    fn clicking_a_mine_loses_without_counting_a_safe_click() {
        let mut session = session_2x1();

        let outcome = session.reveal((1, 0));

        assert_eq!(outcome, RevealOutcome::Exploded);
        assert_eq!(session.state(), SessionState::Lost);
        assert_eq!(session.safe_clicked(), 0);
        assert_eq!(
            session.grid().tile_at((1, 0)).unwrap().color(),
            TileColor::Mine
        );
        // the lone safe tile was never shown
        assert!(session.grid().tile_at((0, 0)).unwrap().color().is_hidden());
    }

    #[test]
    fn clicks_after_the_round_ended_are_ignored() {
        let mut session = session_2x1();
        session.reveal((1, 0));

        assert_eq!(session.reveal((0, 0)), RevealOutcome::Ignored);
        assert_eq!(session.safe_clicked(), 0);
    }

    #[test]
    fn revealed_tiles_ignore_further_clicks() {
        let mut session = Session::new(GameConfig {
            cols: 3,
            rows: 1,
            mines: 1,
            ..GameConfig::default()
        });
        session.start_with_mines(&[(2, 0)]).unwrap();

        assert_eq!(session.reveal((0, 0)), RevealOutcome::Safe);
        assert_eq!(session.reveal((0, 0)), RevealOutcome::Ignored);
        assert_eq!(session.safe_clicked(), 1);
    }

    #[test]
    fn locked_input_swallows_clicks_until_unlocked() {
        let mut session = session_2x1();
        session.reveal((1, 0));
        session.restart(7);
        assert!(session.input_locked());

        assert_eq!(session.click_pixel(20, 20), RevealOutcome::Ignored);

        session.unlock_input();
        assert_ne!(session.click_pixel(20, 20), RevealOutcome::Ignored);
    }

    #[test]
    fn restart_after_loss_resets_the_round() {
        let mut session = session_2x1();
        session.reveal((1, 0));
        assert_eq!(session.state(), SessionState::Lost);

        session.restart(7);

        assert_eq!(session.state(), SessionState::Playing);
        assert_eq!(session.safe_clicked(), 0);
        assert_eq!(session.grid().mine_count(), 1);
        assert!(session.grid().iter().all(|tile| !tile.revealed()));
    }

    #[test]
    fn restart_is_ignored_while_playing() {
        let mut session = Session::new(GameConfig {
            cols: 3,
            rows: 1,
            mines: 1,
            ..GameConfig::default()
        });
        session.start_with_mines(&[(2, 0)]).unwrap();
        session.reveal((0, 0));

        session.restart(7);

        assert_eq!(session.safe_clicked(), 1);
        assert!(!session.input_locked());
        assert!(session.grid().tile_at((0, 0)).unwrap().revealed());
    }

    #[test]
    fn restart_works_from_won() {
        let mut session = session_2x1();
        session.reveal((0, 0));
        assert_eq!(session.state(), SessionState::Won);

        session.restart(7);

        assert_eq!(session.state(), SessionState::Playing);
        assert_eq!(session.safe_clicked(), 0);
    }

    #[test]
    fn pixel_clicks_use_the_grid_mapping() {
        let mut session = session_2x1();

        // padding band
        assert_eq!(session.click_pixel(10, 20), RevealOutcome::Ignored);
        // (0, 0) spans [16, 80)
        assert_eq!(session.click_pixel(79, 40), RevealOutcome::Won);
    }

    #[test]
    fn full_mine_board_has_no_safe_tiles() {
        let mut session = Session::new(GameConfig {
            cols: 2,
            rows: 1,
            mines: 9,
            ..GameConfig::default()
        });
        session.start(3);

        assert_eq!(session.safe_total(), 0);
        session.unlock_input();
        assert_eq!(session.reveal((0, 0)), RevealOutcome::Exploded);
    }
}
