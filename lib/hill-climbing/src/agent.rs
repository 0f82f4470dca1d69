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

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use weighted_network::{Edge, Length, NodeId};

use crate::environment::Environment;
use crate::{HashSet, TimeStep};

/// What an agent sees from its current node: the outgoing edges it may still take, with their
/// lengths, in ascending destination order.
pub type Percept = BTreeMap<Edge, Length>;

/// The edge an agent chose to follow during one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub edge: Edge,
    pub length: Length,
}

/// The closed set of agent behaviours. Only `GreedyNavigator` has a decision cycle; the others
/// are placeholders that refuse to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    /// Hill-climbing agent: always follows the shortest edge to a node it has not visited yet.
    GreedyNavigator,
    Maverick,
    Follower,
}

impl AgentKind {
    pub fn has_decision_cycle(self) -> bool {
        matches!(self, AgentKind::GreedyNavigator)
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentKind::GreedyNavigator => write!(f, "greedy navigator"),
            AgentKind::Maverick => write!(f, "maverick"),
            AgentKind::Follower => write!(f, "follower"),
        }
    }
}

/// Where an agent is in its per-step cycle. Each step must go perceive, interpret, act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No cycle has started yet.
    Idle,
    Perceived,
    Interpreted,
    /// The last cycle is complete; the next one may start once the clock has moved on.
    Acted,
}

/// One of the three decision-cycle operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Perceive,
    Interpret,
    Act,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Perceive => write!(f, "perceive"),
            Operation::Interpret => write!(f, "interpret"),
            Operation::Act => write!(f, "act"),
        }
    }
}

/// Agent errors. Apart from `LocationOutsideGraph`, which is a configuration error, these are
/// all caller bugs: the driver invoked the decision cycle in a way it must not.
///
/// Running out of unvisited neighbors is not an error. It is observed through `is_alive()`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    #[error("agent {identity}: initial location {location} is outside the graph ({node_count} nodes)")]
    LocationOutsideGraph {
        identity: String,
        location: NodeId,
        node_count: usize,
    },

    #[error("agent {identity}: cannot {operation} in phase {phase:?}")]
    OutOfOrder {
        identity: String,
        operation: Operation,
        phase: Phase,
    },

    #[error("agent {identity}: cannot {operation} at step {now}, current cycle belongs to step {cycle_step}")]
    StepMismatch {
        identity: String,
        operation: Operation,
        cycle_step: TimeStep,
        now: TimeStep,
    },

    #[error("agent {0} is no longer alive")]
    NotAlive(String),

    #[error("agent {identity}: {kind} behaviour is not implemented")]
    NotImplemented { identity: String, kind: AgentKind },
}

/// End-of-trial summary of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentReport {
    pub identity: String,
    pub kind: AgentKind,
    /// Node occupied at the start of each simulated step, in step order.
    pub locations: Vec<NodeId>,
    /// Total length of all edges taken. Lower is better.
    pub performance: Length,
    pub alive: bool,
}

/// An agent walking the environment's network.
///
/// The agent does not own the Environment. Each phase borrows it, so the simulation is free to
/// advance the clock between steps.
#[derive(Debug, Clone)]
pub struct Agent {
    identity: String,
    kind: AgentKind,
    location: NodeId,
    alive: bool,
    performance: Length,
    percept: Percept,
    decisions: BTreeMap<TimeStep, Decision>,
    history: BTreeMap<TimeStep, NodeId>,
    // values of `history`, kept as a set for percept filtering
    visited: HashSet<NodeId>,
    phase: Phase,
    cycle_step: TimeStep,
}

impl Agent {
    pub fn new(
        identity: impl Into<String>,
        kind: AgentKind,
        location: NodeId,
        environment: &Environment,
    ) -> Result<Self, AgentError> {
        let identity = identity.into();
        let graph = environment.graph();
        if !graph.contains_node(location) {
            return Err(AgentError::LocationOutsideGraph {
                identity,
                location,
                node_count: graph.node_count(),
            });
        }
        Ok(Self {
            identity,
            kind,
            location,
            alive: true,
            performance: 0.0,
            percept: Percept::new(),
            decisions: BTreeMap::new(),
            history: BTreeMap::new(),
            visited: HashSet::default(),
            phase: Phase::Idle,
            cycle_step: 0,
        })
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn kind(&self) -> AgentKind {
        self.kind
    }

    pub fn location(&self) -> NodeId {
        self.location
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn performance(&self) -> Length {
        self.performance
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn last_percept(&self) -> &Percept {
        &self.percept
    }

    pub fn decisions(&self) -> &BTreeMap<TimeStep, Decision> {
        &self.decisions
    }

    pub fn location_history(&self) -> &BTreeMap<TimeStep, NodeId> {
        &self.history
    }

    pub fn report(&self) -> AgentReport {
        AgentReport {
            identity: self.identity.clone(),
            kind: self.kind,
            locations: self.history.values().copied().collect(),
            performance: self.performance,
            alive: self.alive,
        }
    }

    /// Look at the outgoing edges of the current node, dropping every edge that leads back to a
    /// node already recorded in the location history.
    pub fn perceive(&mut self, environment: &Environment) -> Result<&Percept, AgentError> {
        self.ensure_implemented()?;
        let now = environment.current_time();
        self.check_order(Operation::Perceive, now)?;

        let visited = &self.visited;
        self.percept = environment
            .graph()
            .neighbors_with_weights(self.location)
            .into_iter()
            .filter(|(edge, _)| !visited.contains(&edge.destination))
            .collect();
        self.phase = Phase::Perceived;
        self.cycle_step = now;

        tracing::trace!(
            agent = %self.identity,
            step = now,
            location = self.location,
            candidates = self.percept.len(),
            "perceived"
        );
        Ok(&self.percept)
    }

    /// Pick the shortest edge of the last percept. Ties go to the lowest destination node, the
    /// first minimum in percept order. An empty percept means there is nowhere left to go: the
    /// agent dies and no decision is recorded.
    pub fn interpret(&mut self, environment: &Environment) -> Result<Option<Decision>, AgentError> {
        self.ensure_implemented()?;
        let now = environment.current_time();
        self.check_order(Operation::Interpret, now)?;
        self.phase = Phase::Interpreted;

        let decision = self
            .percept
            .iter()
            .min_by(|(_, length1), (_, length2)| length1.total_cmp(length2))
            .map(|(&edge, &length)| Decision { edge, length });

        match decision {
            Some(decision) => {
                tracing::trace!(
                    agent = %self.identity,
                    step = now,
                    edge = %decision.edge,
                    length = decision.length,
                    "decided"
                );
                self.decisions.insert(now, decision);
            }
            None => {
                tracing::debug!(
                    agent = %self.identity,
                    step = now,
                    location = self.location,
                    performance = self.performance,
                    "no unvisited neighbors, agent stops"
                );
                self.alive = false;
            }
        }
        Ok(decision)
    }

    /// Record where the agent stood at the start of this step, then follow this step's decision
    /// if there is one.
    pub fn act(&mut self, environment: &Environment) -> Result<Option<Decision>, AgentError> {
        self.ensure_implemented()?;
        let now = environment.current_time();
        self.check_order(Operation::Act, now)?;
        self.phase = Phase::Acted;

        self.history.insert(now, self.location);
        self.visited.insert(self.location);
        if !self.alive {
            return Ok(None);
        }

        let decision = self.decisions.get(&now).copied();
        if let Some(decision) = decision {
            self.location = decision.edge.destination;
            self.performance += decision.length;
        }
        Ok(decision)
    }

    /// Fails with `NotImplemented` for agent kinds that have no decision cycle.
    pub fn ensure_implemented(&self) -> Result<(), AgentError> {
        if self.kind.has_decision_cycle() {
            return Ok(());
        }
        Err(AgentError::NotImplemented {
            identity: self.identity.clone(),
            kind: self.kind,
        })
    }

    fn check_order(&self, operation: Operation, now: TimeStep) -> Result<(), AgentError> {
        // a dead agent may only finish the step it died in
        let closing_fatal_step = operation == Operation::Act && self.phase == Phase::Interpreted;
        if !self.alive && !closing_fatal_step {
            return Err(AgentError::NotAlive(self.identity.clone()));
        }

        let in_order = matches!(
            (operation, self.phase),
            (Operation::Perceive, Phase::Idle | Phase::Acted)
                | (Operation::Interpret, Phase::Perceived)
                | (Operation::Act, Phase::Interpreted)
        );
        if !in_order {
            return Err(AgentError::OutOfOrder {
                identity: self.identity.clone(),
                operation,
                phase: self.phase,
            });
        }

        // a new cycle needs a fresh step; the rest of a cycle stays on the step it began in
        let step_ok = match self.phase {
            Phase::Idle => true,
            Phase::Acted => now > self.cycle_step,
            Phase::Perceived | Phase::Interpreted => now == self.cycle_step,
        };
        if !step_ok {
            return Err(AgentError::StepMismatch {
                identity: self.identity.clone(),
                operation,
                cycle_step: self.cycle_step,
                now,
            });
        }
        Ok(())
    }
}
