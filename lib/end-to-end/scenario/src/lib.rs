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

//! Scenario files: a YAML description of the network, the agents and the time horizon of one
//! trial, and the wiring that turns it into a ready-to-run `Simulation`.

use std::path::{Path, PathBuf};

use hill_climbing::{Agent, AgentError, AgentKind, Environment, Simulation, TimeStep};
use rand::{Rng as _, SeedableRng};
use serde::{Deserialize, Serialize};
use weighted_network::{EdgeList, Graph, GraphError, LengthDistribution, UniformBounds};

pub use weighted_network::Rng;

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid scenario: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid network: {0}")]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error("cannot place {agents} agents on a network without nodes")]
    NoNodes { agents: usize },

    #[error("network needs either `load` or `nodes`")]
    MissingNetwork,

    #[error("{count} {kind} agents requested, but {kind} agents cannot run yet")]
    UnsupportedAgentKind { kind: AgentKind, count: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub num_nodes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EdgeSpec {
    #[serde(default)]
    pub length: LengthDistribution,
}

/// Where the network comes from. A `load` file wins over `nodes` and `edges`, which then go
/// unused.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// YAML edge list, see `weighted_network::EdgeList`. Relative paths are resolved against the
    /// scenario file's directory by `Scenario::from_path`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<NodeSpec>,

    #[serde(default)]
    pub edges: EdgeSpec,
}

impl NetworkSpec {
    fn build(&self, rng: &mut Rng) -> Result<Graph, ScenarioError> {
        if let Some(path) = &self.load {
            let yaml = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
                path: path.clone(),
                source,
            })?;
            let edge_list: EdgeList = serde_yaml::from_str(&yaml)?;
            tracing::debug!(
                path = %path.display(),
                edges = edge_list.edges.len(),
                "loaded network"
            );
            return Ok(edge_list.into_graph()?);
        }
        let nodes = self.nodes.ok_or(ScenarioError::MissingNetwork)?;
        Ok(weighted_network::create_network(
            nodes.num_nodes,
            &self.edges.length,
            rng,
        )?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub number: usize,
}

/// How many agents of each kind to create. A missing group means none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AgentsSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mavericks: Option<GroupSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers: Option<GroupSpec>,

    /// Greedy navigators.
    #[serde(
        default,
        rename = "HE_agents",
        skip_serializing_if = "Option::is_none"
    )]
    pub hill_climbers: Option<GroupSpec>,
}

impl AgentsSpec {
    fn groups(&self) -> [(&'static str, AgentKind, usize); 3] {
        let count = |group: Option<GroupSpec>| group.map_or(0, |g| g.number);
        [
            ("Mav", AgentKind::Maverick, count(self.mavericks)),
            ("Fol", AgentKind::Follower, count(self.followers)),
            ("HE", AgentKind::GreedyNavigator, count(self.hill_climbers)),
        ]
    }

    pub fn total(&self) -> usize {
        self.groups().iter().map(|(_, _, count)| count).sum()
    }

    fn ensure_supported(&self) -> Result<(), ScenarioError> {
        for (_, kind, count) in self.groups() {
            if count > 0 && !kind.has_decision_cycle() {
                return Err(ScenarioError::UnsupportedAgentKind { kind, count });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSpec {
    /// Last simulated step. Steps `0..=T` run.
    #[serde(rename = "T")]
    pub horizon: TimeStep,
}

/// One trial's configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub network: NetworkSpec,
    #[serde(default)]
    pub agents: AgentsSpec,
    pub time: TimeSpec,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            seed: None,
            network: NetworkSpec {
                load: None,
                nodes: Some(NodeSpec { num_nodes: 10 }),
                edges: EdgeSpec {
                    length: LengthDistribution::Uniform {
                        parameters: UniformBounds {
                            lower_bound: 1,
                            upper_bound: 10,
                        },
                    },
                },
            },
            agents: AgentsSpec {
                hill_climbers: Some(GroupSpec { number: 1 }),
                ..AgentsSpec::default()
            },
            time: TimeSpec { horizon: 10 },
        }
    }
}

impl Scenario {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ScenarioError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut scenario = Self::from_yaml_str(&yaml)?;
        if let (Some(load), Some(dir)) = (&scenario.network.load, path.parent()) {
            if load.is_relative() {
                scenario.network.load = Some(dir.join(load));
            }
        }
        Ok(scenario)
    }

    /// Build the network, the environment and the agents. Agents start on uniformly random
    /// nodes and are ordered mavericks, followers, then greedy navigators. Agent kinds that
    /// cannot run are rejected before anything is built.
    pub fn build_simulation(&self, rng: &mut Rng) -> Result<Simulation, ScenarioError> {
        self.agents.ensure_supported()?;
        let graph = self.network.build(rng)?;
        let num_nodes = graph.node_count();
        let environment = Environment::new(graph, self.time.horizon);

        let total = self.agents.total();
        if total > 0 && num_nodes == 0 {
            return Err(ScenarioError::NoNodes { agents: total });
        }

        let mut agents = Vec::with_capacity(total);
        for (prefix, kind, count) in self.agents.groups() {
            for i in 0..count {
                let location = rng.gen_range(0..num_nodes);
                let agent = Agent::new(format!("{}_{}", prefix, i), kind, location, &environment)?;
                agents.push(agent);
            }
        }
        tracing::debug!(agents = agents.len(), nodes = num_nodes, "built scenario");
        Ok(Simulation::new(environment, agents))
    }
}

pub fn seeded_rng(seed: u64) -> Rng {
    rand_pcg::Pcg64::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    const TEMPLATE: &str = r#"
seed: 7
network:
  nodes:
    num_nodes: 6
  edges:
    length:
      type: uniform
      parameters:
        lower_bound: 1
        upper_bound: 9
agents:
  HE_agents:
    number: 3
time:
  T: 10
"#;

    #[test]
    fn test_parse_template() {
        let scenario = Scenario::from_yaml_str(TEMPLATE).expect("parse failed");
        assert_eq!(scenario.seed, Some(7));
        assert_eq!(scenario.network.load, None);
        assert_eq!(scenario.network.nodes, Some(NodeSpec { num_nodes: 6 }));
        assert_eq!(
            scenario.network.edges.length,
            LengthDistribution::Uniform {
                parameters: UniformBounds {
                    lower_bound: 1,
                    upper_bound: 9
                }
            }
        );
        assert_eq!(scenario.agents.hill_climbers, Some(GroupSpec { number: 3 }));
        assert_eq!(scenario.agents.mavericks, None);
        assert_eq!(scenario.agents.total(), 3);
        assert_eq!(scenario.time.horizon, 10);
    }

    #[test]
    fn test_edges_default_to_unit_forward_network() {
        let yaml = "network:\n  nodes:\n    num_nodes: 3\ntime:\n  T: 2\n";
        let scenario = Scenario::from_yaml_str(yaml).expect("parse failed");
        assert_eq!(scenario.network.edges.length, LengthDistribution::Default);
        assert_eq!(scenario.agents.total(), 0);
        assert_eq!(scenario.seed, None);
    }

    #[test]
    fn test_default_length_type_parses() {
        let yaml = r#"
network:
  nodes: { num_nodes: 3 }
  edges:
    length: { type: default }
time: { T: 1 }
"#;
        let scenario = Scenario::from_yaml_str(yaml).expect("parse failed");
        assert_eq!(scenario.network.edges.length, LengthDistribution::Default);
    }

    #[test]
    fn test_symmetric_length_type_parses() {
        let yaml = r#"
network:
  nodes: { num_nodes: 3 }
  edges:
    length:
      type: symmetric
      parameters: { lower_bound: 2, upper_bound: 4 }
time: { T: 1 }
"#;
        let scenario = Scenario::from_yaml_str(yaml).expect("parse failed");
        assert_eq!(
            scenario.network.edges.length,
            LengthDistribution::Symmetric {
                parameters: UniformBounds {
                    lower_bound: 2,
                    upper_bound: 4
                }
            }
        );
    }

    #[test]
    fn test_missing_time_is_an_error() {
        let yaml = "network:\n  nodes:\n    num_nodes: 3\n";
        assert!(matches!(
            Scenario::from_yaml_str(yaml),
            Err(ScenarioError::Yaml(_))
        ));
    }

    #[test]
    fn test_unknown_length_type_is_an_error() {
        let yaml = r#"
network:
  nodes: { num_nodes: 3 }
  edges:
    length: { type: normal }
time: { T: 1 }
"#;
        assert!(matches!(
            Scenario::from_yaml_str(yaml),
            Err(ScenarioError::Yaml(_))
        ));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let result = Scenario::from_path("/definitely/not/a/scenario.yml");
        assert!(matches!(result, Err(ScenarioError::Io { .. })));
    }

    #[test]
    fn test_network_without_source_is_an_error() {
        let scenario = Scenario::from_yaml_str("network: {}\ntime: { T: 1 }\n").expect("parse");
        assert!(matches!(
            scenario.build_simulation(&mut seeded_rng(0)),
            Err(ScenarioError::MissingNetwork)
        ));
    }

    #[test]
    fn test_build_names_and_orders_agents() {
        let scenario = Scenario::from_yaml_str(TEMPLATE).expect("parse failed");
        let simulation = scenario
            .build_simulation(&mut seeded_rng(1))
            .expect("build failed");

        let names: Vec<&str> = simulation.agents().iter().map(Agent::identity).collect();
        assert_eq!(names, vec!["HE_0", "HE_1", "HE_2"]);
        for agent in simulation.agents() {
            assert_eq!(agent.kind(), AgentKind::GreedyNavigator);
            assert!(agent.location() < 6);
        }
        assert_eq!(simulation.environment().graph().edge_count(), 30);
        assert_eq!(simulation.environment().horizon(), 10);
    }

    #[test]
    fn test_unsupported_agent_kinds_are_rejected_at_build() {
        let mut scenario = Scenario::from_yaml_str(TEMPLATE).expect("parse failed");
        scenario.agents.followers = Some(GroupSpec { number: 2 });
        assert!(matches!(
            scenario.build_simulation(&mut seeded_rng(1)),
            Err(ScenarioError::UnsupportedAgentKind {
                kind: AgentKind::Follower,
                count: 2
            })
        ));

        scenario.agents.followers = None;
        scenario.agents.mavericks = Some(GroupSpec { number: 1 });
        assert!(matches!(
            scenario.build_simulation(&mut seeded_rng(1)),
            Err(ScenarioError::UnsupportedAgentKind {
                kind: AgentKind::Maverick,
                count: 1
            })
        ));

        // an empty group is the same as no group
        scenario.agents.mavericks = Some(GroupSpec { number: 0 });
        assert!(scenario.build_simulation(&mut seeded_rng(1)).is_ok());
    }

    #[test]
    fn test_same_seed_gives_same_trial() {
        let scenario = Scenario::from_yaml_str(TEMPLATE).expect("parse failed");
        let run = |seed| {
            let mut simulation = scenario
                .build_simulation(&mut seeded_rng(seed))
                .expect("build failed");
            simulation.run().expect("run failed");
            simulation.reports()
        };
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn test_agents_on_empty_network_is_an_error() {
        let mut scenario = Scenario::default();
        scenario.network.nodes = Some(NodeSpec { num_nodes: 0 });
        assert!(matches!(
            scenario.build_simulation(&mut seeded_rng(0)),
            Err(ScenarioError::NoNodes { agents: 1 })
        ));
    }

    #[test]
    fn test_invalid_bounds_surface_as_graph_error() {
        let mut scenario = Scenario::default();
        scenario.network.edges.length = LengthDistribution::Uniform {
            parameters: UniformBounds {
                lower_bound: 0,
                upper_bound: 3,
            },
        };
        assert!(matches!(
            scenario.build_simulation(&mut seeded_rng(0)),
            Err(ScenarioError::Graph(GraphError::InvalidLengthBounds { .. }))
        ));
    }

    #[test]
    fn test_load_network_relative_to_scenario_file() {
        let dir = tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("chain.yml"),
            "node_count: 3\nedges:\n  - [0, 1, 2.5]\n  - [1, 2, 1.0]\n",
        )
        .expect("write network");
        let scenario_path = dir.path().join("scenario.yml");
        std::fs::write(
            &scenario_path,
            "network:\n  load: chain.yml\nagents:\n  HE_agents: { number: 2 }\ntime: { T: 4 }\n",
        )
        .expect("write scenario");

        let scenario = Scenario::from_path(&scenario_path).expect("parse failed");
        assert_eq!(scenario.network.load, Some(dir.path().join("chain.yml")));
        let simulation = scenario
            .build_simulation(&mut seeded_rng(3))
            .expect("build failed");
        let graph = simulation.environment().graph();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.length(weighted_network::Edge::new(0, 1)), Some(2.5));
        assert_eq!(simulation.agents().len(), 2);
    }

    #[test]
    fn test_loaded_self_loop_is_rejected_at_build() {
        let dir = tempdir().expect("tempdir");
        let network_path = dir.path().join("loop.yml");
        std::fs::write(
            &network_path,
            "node_count: 2\nedges:\n  - [0, 1, 1.0]\n  - [1, 1, 1.0]\n",
        )
        .expect("write network");
        let scenario = Scenario {
            network: NetworkSpec {
                load: Some(network_path),
                ..NetworkSpec::default()
            },
            ..Scenario::default()
        };
        assert!(matches!(
            scenario.build_simulation(&mut seeded_rng(0)),
            Err(ScenarioError::Graph(GraphError::SelfLoop(1)))
        ));
    }

    #[test]
    fn test_missing_network_file_is_an_io_error() {
        let scenario = Scenario {
            network: NetworkSpec {
                load: Some(PathBuf::from("/definitely/not/a/network.yml")),
                ..NetworkSpec::default()
            },
            ..Scenario::default()
        };
        assert!(matches!(
            scenario.build_simulation(&mut seeded_rng(0)),
            Err(ScenarioError::Io { .. })
        ));
    }

    #[test]
    fn test_default_scenario_runs() {
        let scenario = Scenario::default();
        let mut simulation = scenario
            .build_simulation(&mut seeded_rng(42))
            .expect("build failed");
        simulation.run().expect("run failed");
        assert_eq!(simulation.steps_run(), 11);
        let reports = simulation.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].identity, "HE_0");
        assert!(!reports[0].locations.is_empty());
    }

    #[test]
    fn test_scenario_round_trips_through_yaml() {
        let scenario = Scenario::from_yaml_str(TEMPLATE).expect("parse failed");
        let yaml = serde_yaml::to_string(&scenario).expect("serialize failed");
        assert_eq!(Scenario::from_yaml_str(&yaml).expect("parse failed"), scenario);
    }
}
