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

//! The network itself: nodes, directed edges and their lengths.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Length, NodeId};

/// Errors raised while building a network. These are configuration errors and are surfaced
/// before any agent acts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// An edge would connect a node to itself.
    #[error("self-loop on node {0}")]
    SelfLoop(NodeId),

    /// An edge endpoint is not a node of the graph.
    #[error("node {node} is outside the graph ({node_count} nodes)")]
    NodeOutOfRange {
        /// The offending endpoint.
        node: NodeId,

        /// Number of nodes in the graph.
        node_count: usize,
    },

    /// Edge lengths must be finite and strictly positive.
    #[error("edge {edge} has invalid length {length}")]
    InvalidLength {
        /// The offending edge.
        edge: Edge,

        /// The rejected length.
        length: Length,
    },

    /// Uniform length bounds must satisfy `1 <= lower_bound <= upper_bound`.
    #[error("invalid uniform length bounds [{lower_bound}, {upper_bound}]")]
    InvalidLengthBounds {
        /// Lower bound, inclusive.
        lower_bound: u32,

        /// Upper bound, inclusive.
        upper_bound: u32,
    },
}

/// A directed edge. Edges order by source, then destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Node the edge leaves.
    pub source: NodeId,

    /// Node the edge enters.
    pub destination: NodeId,
}

impl Edge {
    /// Create a new edge.
    pub fn new(source: NodeId, destination: NodeId) -> Self {
        Self {
            source,
            destination,
        }
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}->{}", self.source, self.destination)
    }
}

/// Directed graph with a positive length on every edge. There are no self-loops.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Graph {
    // outgoing[source] maps destination -> length
    outgoing: Vec<BTreeMap<NodeId, Length>>,
}

impl Graph {
    /// Create a graph with nodes `0..node_count` and no edges.
    pub fn new(node_count: usize) -> Self {
        Self {
            outgoing: vec![BTreeMap::new(); node_count],
        }
    }

    /// Build a graph from a list of `(source, destination, length)` triples.
    pub fn from_edges(
        node_count: usize,
        edges: impl IntoIterator<Item = (NodeId, NodeId, Length)>,
    ) -> Result<Self, GraphError> {
        let mut graph = Self::new(node_count);
        for (source, destination, length) in edges {
            graph.add_edge(source, destination, length)?;
        }
        Ok(graph)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.outgoing.len()
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.outgoing.iter().map(BTreeMap::len).sum()
    }

    /// Whether `node` is a node of this graph.
    pub fn contains_node(&self, node: NodeId) -> bool {
        node < self.outgoing.len()
    }

    /// Add an edge, replacing the length of an existing edge between the same pair of nodes.
    pub fn add_edge(
        &mut self,
        source: NodeId,
        destination: NodeId,
        length: Length,
    ) -> Result<(), GraphError> {
        let node_count = self.node_count();
        for node in [source, destination] {
            if node >= node_count {
                return Err(GraphError::NodeOutOfRange { node, node_count });
            }
        }
        if source == destination {
            return Err(GraphError::SelfLoop(source));
        }
        if !length.is_finite() || length <= 0.0 {
            return Err(GraphError::InvalidLength {
                edge: Edge::new(source, destination),
                length,
            });
        }
        self.outgoing[source].insert(destination, length);
        Ok(())
    }

    /// Length of an edge, if it exists.
    pub fn length(&self, edge: Edge) -> Option<Length> {
        self.outgoing
            .get(edge.source)
            .and_then(|destinations| destinations.get(&edge.destination))
            .copied()
    }

    /// Outgoing edges of `node` with their lengths, in ascending destination order. A node that
    /// is not part of the graph has no neighbors.
    pub fn neighbors_with_weights(&self, node: NodeId) -> BTreeMap<Edge, Length> {
        match self.outgoing.get(node) {
            Some(destinations) => destinations
                .iter()
                .map(|(&destination, &length)| (Edge::new(node, destination), length))
                .collect(),
            None => BTreeMap::new(),
        }
    }

    /// All edges in `(source, destination)` order.
    pub fn edges(&self) -> impl Iterator<Item = (Edge, Length)> + '_ {
        self.outgoing
            .iter()
            .enumerate()
            .flat_map(|(source, destinations)| {
                destinations
                    .iter()
                    .map(move |(&destination, &length)| (Edge::new(source, destination), length))
            })
    }
}

/// A network written out as data: a node count plus `(source, destination, length)` triples.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeList {
    /// Number of nodes. Nodes are `0..node_count`.
    pub node_count: usize,

    /// Directed edges as `(source, destination, length)`.
    #[serde(default)]
    pub edges: Vec<(NodeId, NodeId, Length)>,
}

impl EdgeList {
    /// Validate every edge and build the graph.
    pub fn into_graph(self) -> Result<Graph, GraphError> {
        Graph::from_edges(self.node_count, self.edges)
    }
}

impl From<&Graph> for EdgeList {
    fn from(graph: &Graph) -> Self {
        Self {
            node_count: graph.node_count(),
            edges: graph
                .edges()
                .map(|(edge, length)| (edge.source, edge.destination, length))
                .collect(),
        }
    }
}
