//! Maximum Flow Algorithm Implementation
//!
//! Edmonds-Karp maximum flow over a dense capacity matrix: Ford-Fulkerson
//! with breadth-first augmenting-path search. Shortest augmenting paths bound
//! the number of phases by O(V·E), independent of the capacity values.
//!
//! The networks this crate builds are small and dense, so the residual graph
//! is a plain `V×V` matrix owned by a single `solve` call.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::algorithm::{Algorithm, AlgorithmError, AlgorithmParameter, NodeId, ParameterType};

/// Edge capacity; absence of an edge is capacity zero
pub type Capacity = u64;

/// Flow value carried by an edge or a whole network
pub type Flow = u64;

/// Neighbour scan order used by the breadth-first search
///
/// Both orders find shortest augmenting paths; they only differ in how ties
/// between equally short paths are broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOrder {
    /// Scan neighbours from the lowest node index upwards
    #[default]
    Ascending,
    /// Scan neighbours from the highest node index downwards
    Descending,
}

impl SearchOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchOrder::Ascending => "ascending",
            SearchOrder::Descending => "descending",
        }
    }
}

impl fmt::Display for SearchOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchOrder {
    type Err = AlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascending" => Ok(SearchOrder::Ascending),
            "descending" => Ok(SearchOrder::Descending),
            other => Err(AlgorithmError::InvalidParameter {
                name: "search_order".to_string(),
                reason: format!("expected ascending or descending, got {other}"),
            }),
        }
    }
}

/// Flow algorithm errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("Flow network has no vertices")]
    EmptyNetwork,
    #[error("Vertex {node} is outside a network of {vertex_count} vertices")]
    InvalidVertex { node: NodeId, vertex_count: usize },
    #[error("Source and sink are the same vertex {0}")]
    SourceIsSink(NodeId),
    #[error("Capacity row {row} has {found} entries, expected {expected}")]
    NotSquare { row: usize, expected: usize, found: usize },
    #[error("Residual capacity overflow on edge {from} -> {to}")]
    CapacityOverflow { from: NodeId, to: NodeId },
    #[error("Total flow out of {node} exceeds the u64 range")]
    FlowOverflow { node: NodeId },
}

/// Directed flow network as a dense capacity matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowNetwork {
    /// Number of vertices in network
    vertex_count: usize,
    /// `capacity[u][v]` is the capacity of edge u -> v
    capacity: Vec<Vec<Capacity>>,
}

impl FlowNetwork {
    /// Create a network with no edges
    pub fn new(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            capacity: vec![vec![0; vertex_count]; vertex_count],
        }
    }

    /// Wrap an existing capacity matrix, which must be square
    pub fn from_matrix(capacity: Vec<Vec<Capacity>>) -> Result<Self, FlowError> {
        let vertex_count = capacity.len();
        for (row, entries) in capacity.iter().enumerate() {
            if entries.len() != vertex_count {
                return Err(FlowError::NotSquare {
                    row,
                    expected: vertex_count,
                    found: entries.len(),
                });
            }
        }
        Ok(Self {
            vertex_count,
            capacity,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Set the capacity of edge `from -> to`, replacing any previous value
    ///
    /// # Panics
    /// If either endpoint is outside the network.
    pub fn set_capacity(&mut self, from: NodeId, to: NodeId, capacity: Capacity) {
        self.capacity[from.as_usize()][to.as_usize()] = capacity;
    }

    pub fn capacity(&self, from: NodeId, to: NodeId) -> Capacity {
        self.capacity[from.as_usize()][to.as_usize()]
    }

    pub fn capacities(&self) -> &[Vec<Capacity>] {
        &self.capacity
    }

    /// Number of edges with positive capacity
    pub fn edge_count(&self) -> usize {
        self.capacity
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&capacity| capacity > 0)
            .count()
    }

    /// Total capacity leaving `node`
    pub fn outgoing_capacity(&self, node: NodeId) -> Capacity {
        self.capacity[node.as_usize()]
            .iter()
            .fold(0, |acc: Capacity, &c| acc.saturating_add(c))
    }

    /// Total capacity entering `node`
    pub fn incoming_capacity(&self, node: NodeId) -> Capacity {
        self.capacity
            .iter()
            .fold(0, |acc: Capacity, row| acc.saturating_add(row[node.as_usize()]))
    }

    fn check_vertex(&self, node: NodeId) -> Result<(), FlowError> {
        if node.as_usize() >= self.vertex_count {
            return Err(FlowError::InvalidVertex {
                node,
                vertex_count: self.vertex_count,
            });
        }
        Ok(())
    }
}

/// Predecessor of every node reached by the latest breadth-first search
type ParentMap = Vec<Option<usize>>;

/// Residual capacities, mutated in place while augmenting
struct ResidualGraph {
    residual: Vec<Vec<Capacity>>,
}

impl ResidualGraph {
    fn from_network(network: &FlowNetwork) -> Self {
        Self {
            residual: network.capacity.clone(),
        }
    }

    /// Breadth-first search for a shortest augmenting path
    ///
    /// Returns true when `sink` was reached; `parent` then holds the path.
    fn find_augmenting_path(
        &self,
        source: usize,
        sink: usize,
        order: SearchOrder,
        parent: &mut ParentMap,
        explored: &mut usize,
    ) -> bool {
        let vertex_count = self.residual.len();
        parent.clear();
        parent.resize(vertex_count, None);

        let mut visited = vec![false; vertex_count];
        let mut queue = VecDeque::new();
        visited[source] = true;
        queue.push_back(source);

        while let Some(vertex) = queue.pop_front() {
            *explored += 1;

            for step in 0..vertex_count {
                let next = match order {
                    SearchOrder::Ascending => step,
                    SearchOrder::Descending => vertex_count - 1 - step,
                };
                if visited[next] || self.residual[vertex][next] == 0 {
                    continue;
                }
                visited[next] = true;
                parent[next] = Some(vertex);
                if next == sink {
                    return true;
                }
                queue.push_back(next);
            }
        }

        false
    }

    /// Smallest residual capacity along the parent chain from `sink` back to `source`
    fn bottleneck(&self, parent: &ParentMap, source: usize, sink: usize) -> Capacity {
        let mut bottleneck = Capacity::MAX;
        let mut vertex = sink;
        while vertex != source {
            let Some(previous) = parent[vertex] else {
                break;
            };
            bottleneck = bottleneck.min(self.residual[previous][vertex]);
            vertex = previous;
        }
        bottleneck
    }

    /// Push `amount` along the path, opening reverse residual capacity
    fn augment(
        &mut self,
        parent: &ParentMap,
        source: usize,
        sink: usize,
        amount: Flow,
    ) -> Result<Vec<usize>, FlowError> {
        let mut path = vec![sink];
        let mut vertex = sink;
        while vertex != source {
            let Some(previous) = parent[vertex] else {
                break;
            };
            self.residual[previous][vertex] -= amount;
            self.residual[vertex][previous] = self.residual[vertex][previous]
                .checked_add(amount)
                .ok_or(FlowError::CapacityOverflow {
                    from: NodeId(vertex),
                    to: NodeId(previous),
                })?;
            path.push(previous);
            vertex = previous;
        }
        path.reverse();
        Ok(path)
    }
}

/// Flow algorithm performance metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowMetrics {
    /// Number of augmenting paths found
    pub augmenting_paths: usize,
    /// Vertices dequeued across all breadth-first searches
    pub vertices_explored: usize,
    /// Wall-clock time spent in the solver
    pub execution_time: Duration,
}

/// Maximum flow value with the flow assignment that achieves it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxFlowResult {
    /// Maximum flow value
    pub max_flow: Flow,
    /// `flow[u][v]` is the flow sent along u -> v
    pub flow: Vec<Vec<Flow>>,
    /// Algorithm performance metrics
    pub metrics: FlowMetrics,
}

impl MaxFlowResult {
    pub fn flow_on(&self, from: NodeId, to: NodeId) -> Flow {
        self.flow[from.as_usize()][to.as_usize()]
    }

    /// Total flow entering `node`, `None` if it does not fit in a `Flow`
    pub fn inflow(&self, node: NodeId) -> Option<Flow> {
        self.flow
            .iter()
            .try_fold(0, |acc: Flow, row| acc.checked_add(row[node.as_usize()]))
    }

    /// Total flow leaving `node`, `None` if it does not fit in a `Flow`
    pub fn outflow(&self, node: NodeId) -> Option<Flow> {
        self.flow[node.as_usize()]
            .iter()
            .try_fold(0, |acc: Flow, &f| acc.checked_add(f))
    }
}

/// Edmonds-Karp maximum flow solver
#[derive(Debug, Clone, Default)]
pub struct MaxFlowSolver {
    /// Breadth-first search tie-break
    search_order: SearchOrder,
}

impl MaxFlowSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_order(search_order: SearchOrder) -> Self {
        Self { search_order }
    }

    pub fn search_order(&self) -> SearchOrder {
        self.search_order
    }

    /// Compute the maximum flow from `source` to `sink`
    ///
    /// Precondition violations (empty network, out-of-range vertices,
    /// `source == sink`) are reported before any work is done.
    pub fn solve(
        &self,
        network: &FlowNetwork,
        source: NodeId,
        sink: NodeId,
    ) -> Result<MaxFlowResult, FlowError> {
        if network.vertex_count == 0 {
            return Err(FlowError::EmptyNetwork);
        }
        network.check_vertex(source)?;
        network.check_vertex(sink)?;
        if source == sink {
            return Err(FlowError::SourceIsSink(source));
        }

        let started = Instant::now();
        let (s, t) = (source.as_usize(), sink.as_usize());
        let mut residual = ResidualGraph::from_network(network);
        let mut parent = ParentMap::with_capacity(network.vertex_count);
        let mut metrics = FlowMetrics::default();
        let mut max_flow: Flow = 0;

        while residual.find_augmenting_path(
            s,
            t,
            self.search_order,
            &mut parent,
            &mut metrics.vertices_explored,
        ) {
            let bottleneck = residual.bottleneck(&parent, s, t);
            let path = residual.augment(&parent, s, t, bottleneck)?;
            trace!("augmenting path {:?} carries {}", path, bottleneck);

            max_flow = max_flow
                .checked_add(bottleneck)
                .ok_or(FlowError::FlowOverflow { node: source })?;
            metrics.augmenting_paths += 1;
        }

        let flow = network
            .capacity
            .iter()
            .zip(&residual.residual)
            .map(|(capacities, residuals)| {
                capacities
                    .iter()
                    .zip(residuals)
                    .map(|(&c, &r)| c.saturating_sub(r))
                    .collect()
            })
            .collect();

        metrics.execution_time = started.elapsed();
        debug!(
            "{}: max flow {} from {} to {} after {} augmenting paths",
            self.name(),
            max_flow,
            source,
            sink,
            metrics.augmenting_paths
        );

        Ok(MaxFlowResult {
            max_flow,
            flow,
            metrics,
        })
    }
}

impl Algorithm for MaxFlowSolver {
    fn name(&self) -> &'static str {
        "Edmonds-Karp"
    }

    fn category(&self) -> &'static str {
        "max_flow"
    }

    fn description(&self) -> String {
        "Ford-Fulkerson maximum flow with breadth-first shortest augmenting paths, O(V·E²).".to_string()
    }

    fn parameters(&self) -> Vec<AlgorithmParameter> {
        vec![AlgorithmParameter {
            name: "search_order".to_string(),
            value: self.search_order.to_string(),
            value_type: ParameterType::Enum(vec![
                SearchOrder::Ascending.to_string(),
                SearchOrder::Descending.to_string(),
            ]),
        }]
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError> {
        match name {
            "search_order" => {
                self.search_order = value.parse()?;
                Ok(())
            }
            _ => Err(AlgorithmError::UnknownParameter(name.to_string())),
        }
    }

    fn get_parameters(&self) -> HashMap<String, String> {
        HashMap::from([("search_order".to_string(), self.search_order.to_string())])
    }
}
