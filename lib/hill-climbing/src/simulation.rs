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

use crate::agent::{Agent, AgentError, AgentReport};
use crate::environment::Environment;
use crate::TimeStep;

/// A Simulation runs many Agents through one trial in Performance, Environment, Action, Sensing
/// (PEAS) cycles.
///
/// Every step, each live agent perceives, interprets and acts, in the order the agents were
/// given. Then the clock ticks. Dead agents are skipped but kept, so reports cover everyone.
/// The trial always runs to the horizon, however many agents have died.
pub struct Simulation {
    environment: Environment,
    agents: Vec<Agent>,
    steps_run: u64,
}

impl Simulation {
    pub fn new(environment: Environment, agents: Vec<Agent>) -> Self {
        Self {
            environment,
            agents,
            steps_run: 0,
        }
    }

    /// Run one step for every live agent, then tick the clock. A decision-cycle error means the
    /// cycle was driven incorrectly (or an agent kind cannot run) and is returned as is.
    pub fn step(&mut self) -> Result<(), AgentError> {
        let environment = &self.environment;
        for agent in self.agents.iter_mut().filter(|agent| agent.is_alive()) {
            agent.perceive(environment)?;
            agent.interpret(environment)?;
            agent.act(environment)?;
        }
        self.environment.tick();
        self.steps_run += 1;
        Ok(())
    }

    /// Run every remaining step up to and including the horizon. Agent kinds without a decision
    /// cycle are rejected before the first step, so a failed run leaves the trial untouched.
    pub fn run(&mut self) -> Result<(), AgentError> {
        for agent in &self.agents {
            agent.ensure_implemented()?;
        }
        tracing::info!(
            agents = self.agents.len(),
            horizon = self.environment.horizon(),
            nodes = self.environment.graph().node_count(),
            "starting trial"
        );
        while self.environment.is_running() {
            self.step()?;
        }
        tracing::info!(
            steps = self.steps_run,
            alive = self.agents.iter().filter(|agent| agent.is_alive()).count(),
            "trial finished"
        );
        Ok(())
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn steps_run(&self) -> u64 {
        self.steps_run
    }

    pub fn reports(&self) -> Vec<AgentReport> {
        self.agents.iter().map(Agent::report).collect()
    }
}
