//! Single-threaded driver around the simulation
//!
//! Input handlers push commands at any time; the frame callback drains them in
//! arrival order and then ticks once, so the simulation only ever sees one
//! ordered stream of transitions.

use std::collections::VecDeque;

use crate::highscores::ScoreBook;
use crate::sim::{Command, GameEvent, Simulation, SimulationState};
use crate::tuning::Tuning;

pub struct GameLoop {
    sim: Simulation,
    state: SimulationState,
    commands: VecDeque<Command>,
    scores: ScoreBook,
    scores_dirty: bool,
}

impl GameLoop {
    pub fn new(tuning: Tuning, scores: ScoreBook) -> Self {
        let sim = Simulation::new(tuning);
        let state = sim.initial();
        Self {
            sim,
            state,
            commands: VecDeque::new(),
            scores,
            scores_dirty: false,
        }
    }

    /// Queue a command for the next frame
    pub fn queue_command(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = Command>) {
        self.commands.extend(commands);
    }

    /// Number of commands waiting for the next frame
    pub fn pending(&self) -> usize {
        self.commands.len()
    }

    /// Apply queued commands, then tick to `timestamp`
    pub fn frame(&mut self, timestamp: f64) -> Vec<GameEvent> {
        let mut events = Vec::new();

        while let Some(command) = self.commands.pop_front() {
            if command == Command::Restart && !self.state.paused {
                self.finish_episode(self.state.score);
            }
            let (next, mut produced) = self.sim.step(&self.state, command);
            self.state = next;
            events.append(&mut produced);
        }

        if !timestamp.is_finite() {
            log::warn!("Non-finite timestamp {timestamp}, dropping tick");
            return events;
        }
        if timestamp < self.state.last_timestamp {
            log::warn!(
                "Timestamp went backwards ({} < {}), skipping integration",
                timestamp,
                self.state.last_timestamp
            );
        }

        let (next, mut produced) = self.sim.step(&self.state, Command::tick(timestamp));
        self.state = next;
        for event in &produced {
            if let GameEvent::Crashed { score } = *event {
                self.finish_episode(score);
            }
        }
        events.append(&mut produced);

        events
    }

    fn finish_episode(&mut self, score: u64) {
        if self.scores.record(score) {
            log::info!("New best score: {score}");
        }
        self.scores_dirty = true;
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        self.sim.tuning()
    }

    pub fn scores(&self) -> &ScoreBook {
        &self.scores
    }

    /// Scores changed since the last call; hand them out for saving
    pub fn take_dirty_scores(&mut self) -> Option<ScoreBook> {
        if std::mem::take(&mut self.scores_dirty) {
            Some(self.scores)
        } else {
            None
        }
    }
}
