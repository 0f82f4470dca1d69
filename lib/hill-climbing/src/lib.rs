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

// PEAS - Performance, Environment, Action, Sensing
//
// See:
// -  Chapter 2: Intelligent Agents, page 40
// -  Chapter 4: Local search, hill-climbing, page 111

pub mod agent;
pub mod environment;
pub mod simulation;

pub use agent::{Agent, AgentError, AgentKind, AgentReport, Decision, Operation, Percept, Phase};
pub use environment::Environment;
pub use simulation::Simulation;
pub use weighted_network::{Edge, Graph, Length, NodeId};

/// A discrete step of the shared simulation clock.
pub type TimeStep = u32;

pub type HashSet<T> = rustc_hash::FxHashSet<T>;
