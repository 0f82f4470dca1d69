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

#![warn(missing_docs)]

//! Directed, weighted networks for path-following agents.
//!
//! A network is a set of nodes `0..node_count` joined by directed edges, each of which carries a
//! strictly positive length. Agents only ever read a network; once built it is handed to an
//! environment and never changes during a trial.

pub mod generate;
pub mod graph;

pub use generate::{create_network, LengthDistribution, UniformBounds};
pub use graph::{Edge, EdgeList, Graph, GraphError};

/// Node identifier. Nodes are numbered densely from zero.
pub type NodeId = usize;

/// Length (cost) of travelling along an edge.
pub type Length = f64;

/// Random number generator used to build networks, seedable for reproducible runs.
pub type Rng = rand_pcg::Pcg64;
