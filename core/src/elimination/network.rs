//! Flow-network construction for the elimination question
//!
//! For a distinguished team 0 the network has one source, one game node per
//! unordered pair of the other teams, one team node per other team and one
//! sink. Games flow from the source into game nodes, from game nodes into
//! either participant, and from each team into the sink up to the number of
//! extra wins that team may absorb without passing team 0's best total.
//!
//! Nodes are tagged with a `NodeRole`; indices come from one enumeration of
//! the role list, so no positional arithmetic maps pairs to matrix offsets.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::algorithm::graph::max_flow::{Capacity, FlowNetwork};
use crate::algorithm::NodeId;
use crate::config::UnboundedCapacity;
use crate::standings::{Standings, TeamIndex, Wins, DISTINGUISHED};

/// Role of a node in the elimination network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum NodeRole {
    Source,
    /// Games left between two non-distinguished teams, `first < second`
    Game { first: TeamIndex, second: TeamIndex },
    /// A non-distinguished team
    Team { team: TeamIndex },
    Sink,
}

/// Number of unordered pairs among `teams` teams
pub fn pair_count(teams: usize) -> usize {
    teams * teams.saturating_sub(1) / 2
}

/// Flow network for one distinguished team, with its node roles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EliminationNetwork {
    network: FlowNetwork,
    roles: Vec<NodeRole>,
    target_score: Wins,
    required_wins: Wins,
    game_capacity: Capacity,
}

impl EliminationNetwork {
    pub fn network(&self) -> &FlowNetwork {
        &self.network
    }

    pub fn roles(&self) -> &[NodeRole] {
        &self.roles
    }

    pub fn role(&self, node: NodeId) -> Option<NodeRole> {
        self.roles.get(node.as_usize()).copied()
    }

    /// Node carrying `role`, if the network has one
    pub fn node(&self, role: NodeRole) -> Option<NodeId> {
        self.roles.iter().position(|&r| r == role).map(NodeId)
    }

    pub fn source(&self) -> NodeId {
        NodeId(0)
    }

    pub fn sink(&self) -> NodeId {
        NodeId(self.roles.len() - 1)
    }

    /// Best final win total of the distinguished team
    pub fn target_score(&self) -> Wins {
        self.target_score
    }

    /// Games among non-distinguished teams, each of which needs a winner
    pub fn required_wins(&self) -> Wins {
        self.required_wins
    }

    /// Capacity used on game-to-team edges
    pub fn game_capacity(&self) -> Capacity {
        self.game_capacity
    }

    pub fn game_count(&self) -> usize {
        self.roles
            .iter()
            .filter(|role| matches!(role, NodeRole::Game { .. }))
            .count()
    }
}

/// Outcome of network construction
#[derive(Debug, Clone)]
pub enum Construction {
    /// Only one rival: decided by comparing win totals, no network needed
    Direct { target_score: Wins, rival_wins: Wins },
    /// A rival already has more wins than the distinguished team can reach
    RivalAhead {
        target_score: Wins,
        team: TeamIndex,
        deficit: Wins,
    },
    /// General case: the max flow of this network decides
    Network(EliminationNetwork),
}

/// Builds the elimination network for team 0 of a `Standings`
#[derive(Debug, Clone)]
pub struct NetworkBuilder<'a> {
    standings: &'a Standings,
    game_capacity: UnboundedCapacity,
}

impl<'a> NetworkBuilder<'a> {
    pub fn new(standings: &'a Standings) -> Self {
        Self {
            standings,
            game_capacity: UnboundedCapacity::default(),
        }
    }

    pub fn game_capacity(mut self, game_capacity: UnboundedCapacity) -> Self {
        self.game_capacity = game_capacity;
        self
    }

    /// Best possible final win total of the distinguished team
    pub fn target_score(&self) -> Wins {
        self.standings.best_possible_wins(DISTINGUISHED)
    }

    /// Total games among the non-distinguished teams
    pub fn required_wins(&self) -> Wins {
        self.rival_pairs()
            .map(|(first, second)| self.standings.games_between(first, second))
            .sum()
    }

    /// Pairs `(i, j)` of non-distinguished teams with `i < j`, lexicographically
    fn rival_pairs(&self) -> impl Iterator<Item = (TeamIndex, TeamIndex)> + '_ {
        let teams = self.standings.team_count();
        (1..teams).flat_map(move |first| ((first + 1)..teams).map(move |second| (first, second)))
    }

    /// Rival furthest above the target score, lowest index on ties
    fn rival_ahead(&self, target_score: Wins) -> Option<(TeamIndex, Wins)> {
        let mut worst: Option<(TeamIndex, Wins)> = None;
        for team in 1..self.standings.team_count() {
            let wins = self.standings.wins(team);
            if wins > target_score {
                let deficit = wins - target_score;
                if worst.map_or(true, |(_, d)| deficit > d) {
                    worst = Some((team, deficit));
                }
            }
        }
        worst
    }

    /// Source, game nodes, team nodes, sink, in index order
    fn roles(&self) -> Vec<NodeRole> {
        let teams = self.standings.team_count();
        let mut roles = Vec::with_capacity(pair_count(teams - 1) + teams + 1);
        roles.push(NodeRole::Source);
        roles.extend(
            self.rival_pairs()
                .map(|(first, second)| NodeRole::Game { first, second }),
        );
        roles.extend((1..teams).map(|team| NodeRole::Team { team }));
        roles.push(NodeRole::Sink);
        roles
    }

    pub fn build(&self) -> Construction {
        let target_score = self.target_score();

        if self.standings.team_count() == 2 {
            return Construction::Direct {
                target_score,
                rival_wins: self.standings.wins(1),
            };
        }

        if let Some((team, deficit)) = self.rival_ahead(target_score) {
            debug!(
                "team {} already has {} more wins than the best possible total {}",
                team, deficit, target_score
            );
            return Construction::RivalAhead {
                target_score,
                team,
                deficit,
            };
        }

        let roles = self.roles();
        let index: HashMap<NodeRole, NodeId> = roles
            .iter()
            .enumerate()
            .map(|(i, &role)| (role, NodeId(i)))
            .collect();
        let source = index[&NodeRole::Source];
        let sink = index[&NodeRole::Sink];

        let required_wins = self.required_wins();
        let game_capacity = self.game_capacity.resolve(required_wins);
        if let UnboundedCapacity::Fixed(fixed) = self.game_capacity {
            if fixed < game_capacity {
                warn!(
                    "game edge capacity {} is below the {} games among rivals, using {}",
                    fixed, required_wins, game_capacity
                );
            }
        }

        let mut network = FlowNetwork::new(roles.len());
        for &role in &roles {
            let node = index[&role];
            match role {
                NodeRole::Game { first, second } => {
                    let games = self.standings.games_between(first, second);
                    network.set_capacity(source, node, games);
                    network.set_capacity(node, index[&NodeRole::Team { team: first }], game_capacity);
                    network.set_capacity(node, index[&NodeRole::Team { team: second }], game_capacity);
                }
                NodeRole::Team { team } => {
                    // rival_ahead() ruled out a negative allowance
                    let allowance = target_score - self.standings.wins(team);
                    network.set_capacity(node, sink, allowance);
                }
                NodeRole::Source | NodeRole::Sink => {}
            }
        }

        debug!(
            "elimination network: {} nodes ({} games, {} teams), {} edges, target score {}, {} games to assign",
            network.vertex_count(),
            pair_count(self.standings.team_count() - 1),
            self.standings.team_count() - 1,
            network.edge_count(),
            target_score,
            required_wins
        );

        Construction::Network(EliminationNetwork {
            network,
            roles,
            target_score,
            required_wins,
            game_capacity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_teams() -> Standings {
        Standings::new(
            vec![83, 80, 78, 77],
            vec![
                vec![0, 1, 6, 1],
                vec![1, 0, 0, 2],
                vec![6, 0, 0, 0],
                vec![1, 2, 0, 0],
            ],
        )
        .unwrap()
    }

    fn expect_network(construction: Construction) -> EliminationNetwork {
        match construction {
            Construction::Network(network) => network,
            other => panic!("expected a flow network, got {:?}", other),
        }
    }

    #[test]
    fn test_pair_count() {
        assert_eq!(pair_count(0), 0);
        assert_eq!(pair_count(1), 0);
        assert_eq!(pair_count(2), 1);
        assert_eq!(pair_count(3), 3);
        assert_eq!(pair_count(29), 406);
    }

    #[test]
    fn test_node_layout() {
        let elimination = expect_network(NetworkBuilder::new(&four_teams()).build());

        assert_eq!(elimination.roles().len(), 3 + 3 + 2);
        assert_eq!(elimination.game_count(), 3);
        assert_eq!(
            elimination.roles(),
            &[
                NodeRole::Source,
                NodeRole::Game { first: 1, second: 2 },
                NodeRole::Game { first: 1, second: 3 },
                NodeRole::Game { first: 2, second: 3 },
                NodeRole::Team { team: 1 },
                NodeRole::Team { team: 2 },
                NodeRole::Team { team: 3 },
                NodeRole::Sink,
            ]
        );
        assert_eq!(elimination.source(), NodeId(0));
        assert_eq!(elimination.sink(), NodeId(7));
        assert_eq!(elimination.node(NodeRole::Team { team: 2 }), Some(NodeId(5)));
        assert_eq!(elimination.role(NodeId(2)), Some(NodeRole::Game { first: 1, second: 3 }));
        assert_eq!(elimination.role(NodeId(8)), None);
    }

    #[test]
    fn test_capacities() {
        let elimination = expect_network(NetworkBuilder::new(&four_teams()).build());
        let network = elimination.network();

        assert_eq!(elimination.target_score(), 91);
        assert_eq!(elimination.required_wins(), 2);
        assert_eq!(elimination.game_capacity(), 3);

        // source -> games
        assert_eq!(network.capacity(NodeId(0), NodeId(1)), 0);
        assert_eq!(network.capacity(NodeId(0), NodeId(2)), 2);
        assert_eq!(network.capacity(NodeId(0), NodeId(3)), 0);

        // game (1,3) -> teams 1 and 3 only
        assert_eq!(network.capacity(NodeId(2), NodeId(4)), 3);
        assert_eq!(network.capacity(NodeId(2), NodeId(6)), 3);
        assert_eq!(network.capacity(NodeId(2), NodeId(5)), 0);

        // teams -> sink
        assert_eq!(network.capacity(NodeId(4), NodeId(7)), 11);
        assert_eq!(network.capacity(NodeId(5), NodeId(7)), 13);
        assert_eq!(network.capacity(NodeId(6), NodeId(7)), 14);

        assert_eq!(network.outgoing_capacity(NodeId(7)), 0);
        assert_eq!(network.incoming_capacity(NodeId(0)), 0);
    }

    #[test]
    fn test_fixed_game_capacity() {
        let standings = four_teams();
        let elimination = expect_network(
            NetworkBuilder::new(&standings)
                .game_capacity(UnboundedCapacity::Fixed(10000))
                .build(),
        );
        assert_eq!(elimination.game_capacity(), 10000);
        assert_eq!(elimination.network().capacity(NodeId(1), NodeId(4)), 10000);

        let elimination = expect_network(
            NetworkBuilder::new(&standings)
                .game_capacity(UnboundedCapacity::Fixed(1))
                .build(),
        );
        assert_eq!(elimination.game_capacity(), elimination.required_wins() + 1);
    }

    #[test]
    fn test_two_teams_are_direct() {
        let standings = Standings::new(vec![10, 8], vec![vec![0, 1], vec![1, 0]]).unwrap();
        match NetworkBuilder::new(&standings).build() {
            Construction::Direct {
                target_score,
                rival_wins,
            } => {
                assert_eq!(target_score, 11);
                assert_eq!(rival_wins, 8);
            }
            other => panic!("expected direct comparison, got {:?}", other),
        }
    }

    #[test]
    fn test_rival_ahead_short_circuits() {
        let standings = four_teams().with_distinguished(3).unwrap();
        match NetworkBuilder::new(&standings).build() {
            Construction::RivalAhead {
                target_score,
                team,
                deficit,
            } => {
                assert_eq!(target_score, 80);
                assert_eq!(team, 1);
                assert_eq!(deficit, 3);
            }
            other => panic!("expected rival ahead, got {:?}", other),
        }
    }
}
