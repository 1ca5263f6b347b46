//! Resolution controller - the turn state machine
//!
//! The controller exclusively owns the [`Grid`] and advances it one phase per
//! [`Controller::update`] call:
//!
//! ```text
//! Ready --request_swap--> GemsSelected --legal--> GemsSwapped --runs--> SequenceDetected
//!   ^                          |                      |                     | (remove delay)
//!   |<--------illegal----------+                      |                     v
//!   |<-----------------no runs------------------------+               SequencesRemoved
//!   |                                                                       | (drop delay)
//!   |<-----------------no runs---------------- GemsDropped <--no holes------+
//!                                                  |--runs--> SequenceDetected (cascade)
//! ```
//!
//! Delays are checked against an injected [`Clock`]; a delayed phase re-enters
//! itself every tick until its [`PhaseTimer`] has elapsed. Nothing blocks.

use crate::config::EngineConfig;
use crate::events::SubscriptionId;
use crate::grid::Grid;
use crate::rng::SimpleRng;
use crate::snapshot::BoardSnapshot;
use crate::timer::{Clock, PhaseTimer, SystemClock};
use crate::types::{BoardState, GridEvent, GridEventKind, Swap};

#[derive(Debug)]
pub struct Controller<C: Clock = SystemClock> {
    grid: Grid,
    state: BoardState,
    /// Swap waiting for the next tick
    selection: Option<Swap>,
    timer: PhaseTimer,
    clock: C,
    remove_delay_ms: u32,
    drop_delay_ms: u32,
    /// Detection passes that found runs during the current turn
    cascade: u32,
}

impl Controller<SystemClock> {
    /// Controller on the wall clock. The board stays empty until [`Controller::initialize`].
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_clock(config, SystemClock::new())
    }
}

impl<C: Clock> Controller<C> {
    pub fn with_clock(config: &EngineConfig, clock: C) -> Self {
        let rng = match config.seed {
            Some(seed) => SimpleRng::new(seed),
            None => SimpleRng::from_entropy(),
        };
        let grid = Grid::new(config.columns, config.rows, config.colors, rng);
        Self {
            grid,
            state: BoardState::Uninitialized,
            selection: None,
            timer: PhaseTimer::new(),
            clock,
            remove_delay_ms: config.remove_delay_ms,
            drop_delay_ms: config.drop_delay_ms,
            cascade: 0,
        }
    }

    /// Take over a prepared grid as-is (no populate) and accept input right away.
    pub fn from_grid(grid: Grid, config: &EngineConfig, clock: C) -> Self {
        Self {
            grid,
            state: BoardState::Ready,
            selection: None,
            timer: PhaseTimer::new(),
            clock,
            remove_delay_ms: config.remove_delay_ms,
            drop_delay_ms: config.drop_delay_ms,
            cascade: 0,
        }
    }

    pub fn state(&self) -> BoardState {
        self.state
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn columns(&self) -> u8 {
        self.grid.columns()
    }

    pub fn rows(&self) -> u8 {
        self.grid.rows()
    }

    pub fn holes(&self) -> usize {
        self.grid.holes()
    }

    pub fn cascade(&self) -> u32 {
        self.cascade
    }

    pub fn selection(&self) -> Option<Swap> {
        self.selection
    }

    /// Input is only accepted between turns.
    pub fn is_input_enabled(&self) -> bool {
        self.state == BoardState::Ready
    }

    pub fn subscribe(&mut self, handler: impl FnMut(GridEvent) + 'static) -> SubscriptionId {
        self.grid.subscribe(handler)
    }

    pub fn subscribe_kind(
        &mut self,
        kind: GridEventKind,
        handler: impl FnMut(GridEvent) + 'static,
    ) -> SubscriptionId {
        self.grid.subscribe_kind(kind, handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.grid.events_mut().unsubscribe(id)
    }

    /// Fill the board with fresh gems and run a first detection pass.
    ///
    /// Ends in `Ready`, or in `SequenceDetected` when the new board already
    /// holds a run so it resolves before the first move.
    pub fn initialize(&mut self) {
        self.grid.populate();
        self.selection = None;
        self.timer.disarm();
        self.cascade = 0;

        self.grid.detect_color_sequences();
        let next = if self.grid.contains_sequences() {
            BoardState::SequenceDetected
        } else {
            BoardState::Ready
        };
        log::info!(
            "board initialized ({}x{}, {} colors)",
            self.grid.columns(),
            self.grid.rows(),
            self.grid.palette()
        );
        self.transition(next);
    }

    /// Pause (`true`) or resume (`false`) the board, overriding the current phase.
    pub fn freeze(&mut self, frozen: bool) {
        self.timer.disarm();
        self.selection = None;
        let next = if frozen {
            BoardState::Freeze
        } else {
            BoardState::Ready
        };
        self.transition(next);
    }

    /// Queue a swap for the next tick.
    ///
    /// Only accepted in `Ready`; anything else (frozen, mid-cascade,
    /// uninitialized) is ignored. Legality is decided on the next tick.
    pub fn request_swap(&mut self, swap: Swap) -> bool {
        if self.state != BoardState::Ready {
            log::debug!("swap request ignored in state {}", self.state.as_str());
            return false;
        }
        self.selection = Some(swap);
        self.cascade = 0;
        self.transition(BoardState::GemsSelected);
        true
    }

    /// Advance the state machine by one tick and return the resulting state.
    pub fn update(&mut self) -> BoardState {
        match self.state {
            BoardState::Uninitialized | BoardState::Freeze | BoardState::Ready => {}
            BoardState::GemsSelected => self.swap_gems(),
            BoardState::GemsSwapped | BoardState::GemsDropped => self.find_sequences(),
            BoardState::SequenceDetected => self.remove_sequences(),
            BoardState::SequencesRemoved => self.drop_gems(),
        }
        self.state
    }

    /// Tick until the board is back in `Ready` (or frozen), at most `max_ticks`.
    ///
    /// Only meaningful with a clock that advances on its own, or with zero delays.
    pub fn run_until_idle(&mut self, max_ticks: usize) -> bool {
        for _ in 0..max_ticks {
            if !self.update().is_resolving() {
                return true;
            }
        }
        !self.state.is_resolving()
    }

    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        out.columns = self.grid.columns();
        out.rows = self.grid.rows();
        self.grid.write_cells(&mut out.cells);
        out.marked.clear();
        out.marked.extend_from_slice(self.grid.sequence_mask());
        out.holes = self.grid.holes();
        out.state = self.state;
        out.input_enabled = self.is_input_enabled();
        out.cascade = self.cascade;
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let mut s = BoardSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    fn swap_gems(&mut self) {
        let Some(swap) = self.selection.take() else {
            self.transition(BoardState::Ready);
            return;
        };

        if self.grid.swap_colors(swap.source, swap.target) {
            log::debug!("swap accepted: {:?} <-> {:?}", swap.source, swap.target);
            self.transition(BoardState::GemsSwapped);
        } else {
            log::debug!("swap rejected: {:?} <-> {:?}", swap.source, swap.target);
            self.transition(BoardState::Ready);
        }
    }

    fn find_sequences(&mut self) {
        let marked = self.grid.detect_color_sequences();
        if self.grid.contains_sequences() {
            self.cascade += 1;
            log::debug!("cascade {}: {} cells in runs", self.cascade, marked);
            self.transition(BoardState::SequenceDetected);
        } else {
            log::trace!("settled board:\n{}", self.grid);
            self.transition(BoardState::Ready);
        }
    }

    fn remove_sequences(&mut self) {
        let now = self.clock.now_ms();
        if !self.timer.is_armed() {
            self.timer.arm(now);
            return;
        }
        if self.timer.elapsed(now, self.remove_delay_ms) {
            self.timer.disarm();
            self.grid.remove_sequences();
            self.transition(BoardState::SequencesRemoved);
        }
    }

    fn drop_gems(&mut self) {
        if self.grid.holes() == 0 {
            self.transition(BoardState::GemsDropped);
            return;
        }

        let now = self.clock.now_ms();
        if !self.timer.is_armed() {
            self.timer.arm(now);
            return;
        }
        if self.timer.elapsed(now, self.drop_delay_ms) {
            self.timer.disarm();
            self.grid.drop_colors();
        }
    }

    fn transition(&mut self, next: BoardState) {
        if self.state != next {
            log::debug!("board state {} -> {}", self.state.as_str(), next.as_str());
            self.state = next;
        }
    }
}
