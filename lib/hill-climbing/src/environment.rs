/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

use weighted_network::Graph;

use crate::TimeStep;

/// The world agents move through: a read-only network plus a shared clock.
///
/// Notice that the Environment does not decide when a trial ends. The Simulation keeps stepping
/// while `is_running()` holds.
#[derive(Debug, Clone)]
pub struct Environment {
    graph: Graph,
    horizon: TimeStep,
    current_time: TimeStep,
    // set by the tick that leaves step `horizon`; the clock alone cannot show this at
    // `TimeStep::MAX`
    past_horizon: bool,
}

impl Environment {
    pub fn new(graph: Graph, horizon: TimeStep) -> Self {
        Self {
            graph,
            horizon,
            current_time: 0,
            past_horizon: false,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn horizon(&self) -> TimeStep {
        self.horizon
    }

    pub fn current_time(&self) -> TimeStep {
        self.current_time
    }

    /// Steps `0..=horizon` are simulated.
    pub fn is_running(&self) -> bool {
        !self.past_horizon
    }

    /// Advance the clock by one step. The clock saturates at `TimeStep::MAX`, so a horizon of
    /// `TimeStep::MAX` still ends after its last step.
    pub fn tick(&mut self) {
        if self.current_time >= self.horizon {
            self.past_horizon = true;
        }
        self.current_time = self.current_time.saturating_add(1);
    }

    #[cfg(test)]
    pub(crate) fn fast_forward(&mut self, to: TimeStep) {
        self.current_time = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_starts_at_time_zero() {
        let env = Environment::new(Graph::new(3), 5);
        assert_eq!(env.current_time(), 0);
        assert_eq!(env.horizon(), 5);
        assert_eq!(env.graph().node_count(), 3);
        assert!(env.is_running());
    }

    #[test]
    fn test_tick_advances_clock_only() {
        let mut env = Environment::new(Graph::new(1), 1);
        env.tick();
        assert_eq!(env.current_time(), 1);
        assert!(env.is_running());
        env.tick();
        assert_eq!(env.current_time(), 2);
        assert!(!env.is_running());
        assert_eq!(env.horizon(), 1);
    }

    #[test]
    fn test_maximum_horizon_stops_without_overflow() {
        let mut env = Environment::new(Graph::new(1), TimeStep::MAX);
        env.fast_forward(TimeStep::MAX - 1);
        env.tick();
        assert_eq!(env.current_time(), TimeStep::MAX);
        assert!(env.is_running());
        env.tick();
        assert_eq!(env.current_time(), TimeStep::MAX);
        assert!(!env.is_running());
        env.tick();
        assert!(!env.is_running());
    }

    #[test]
    fn test_zero_horizon_runs_a_single_step() {
        let mut env = Environment::new(Graph::new(1), 0);
        assert!(env.is_running());
        env.tick();
        assert!(!env.is_running());
    }
}
