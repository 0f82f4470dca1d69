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

//! Build networks from a declarative description of their edge lengths.

use rand::Rng as _;
use serde::{Deserialize, Serialize};

use crate::graph::{Graph, GraphError};
use crate::{Length, Rng};

/// Inclusive bounds for uniformly drawn integer lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniformBounds {
    /// Smallest length that can be drawn. Must be at least 1.
    pub lower_bound: u32,

    /// Largest length that can be drawn.
    pub upper_bound: u32,
}

/// How edge lengths are assigned when a network is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LengthDistribution {
    /// Every pair `i < j` is joined by a single forward edge `i -> j` of length 1.
    #[default]
    Default,

    /// Every pair of distinct nodes is joined in both directions. Each direction gets its own
    /// integer length drawn uniformly from the bounds.
    Uniform {
        /// Bounds of the drawn lengths.
        parameters: UniformBounds,
    },

    /// Like `Uniform`, but both directions of a pair share one drawn length.
    Symmetric {
        /// Bounds of the drawn lengths.
        parameters: UniformBounds,
    },
}

impl UniformBounds {
    fn validate(self) -> Result<Self, GraphError> {
        if self.lower_bound == 0 || self.lower_bound > self.upper_bound {
            return Err(GraphError::InvalidLengthBounds {
                lower_bound: self.lower_bound,
                upper_bound: self.upper_bound,
            });
        }
        Ok(self)
    }

    fn draw(&self, rng: &mut Rng) -> Length {
        Length::from(rng.gen_range(self.lower_bound..=self.upper_bound))
    }
}

/// Create a network of `num_nodes` nodes whose edges follow `distribution`.
pub fn create_network(
    num_nodes: usize,
    distribution: &LengthDistribution,
    rng: &mut Rng,
) -> Result<Graph, GraphError> {
    let mut graph = Graph::new(num_nodes);
    match distribution {
        LengthDistribution::Default => {
            for source in 0..num_nodes {
                for destination in source + 1..num_nodes {
                    graph.add_edge(source, destination, 1.0)?;
                }
            }
        }
        LengthDistribution::Uniform { parameters } => {
            let bounds = parameters.validate()?;
            for i in 0..num_nodes {
                for j in i + 1..num_nodes {
                    graph.add_edge(i, j, bounds.draw(rng))?;
                    graph.add_edge(j, i, bounds.draw(rng))?;
                }
            }
        }
        LengthDistribution::Symmetric { parameters } => {
            let bounds = parameters.validate()?;
            for i in 0..num_nodes {
                for j in i + 1..num_nodes {
                    let length = bounds.draw(rng);
                    graph.add_edge(i, j, length)?;
                    graph.add_edge(j, i, length)?;
                }
            }
        }
    }
    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "created network"
    );
    Ok(graph)
}
