//! A best-first agent to pick moves in Connect 4

use log::{debug, trace};

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::{config::*, error::GameError, game_state::GameState, Player};

/// Merit of an entry for which nothing has been ruled out yet
pub const MERIT_INFINITY: i32 = i32::MAX;

const ROOT: usize = 0;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
enum Status {
    Live,
    Solved,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum NodeKind {
    // the root mover picks the move and maximises
    Or,
    // the opponent picks the move and minimises
    And,
}

struct SearchNode {
    state: GameState,
    parent: Option<usize>,
    depth: usize,
    kind: NodeKind,
    // the root-level column this node descends from
    move_from_root: Option<usize>,
    solved: bool,
    children: Vec<usize>,
    // OR nodes only: the child whose solution solved this node
    proof: Option<usize>,
    // AND nodes only: children handed to the open list, children solved and
    // the lowest value seen among them
    released: usize,
    solved_children: usize,
    bound: i32,
}

impl SearchNode {
    fn new(
        state: GameState,
        parent: Option<usize>,
        depth: usize,
        kind: NodeKind,
        move_from_root: Option<usize>,
    ) -> Self {
        Self {
            state,
            parent,
            depth,
            kind,
            move_from_root,
            solved: false,
            children: Vec::new(),
            proof: None,
            released: 0,
            solved_children: 0,
            bound: MERIT_INFINITY,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
struct OpenEntry {
    merit: i32,
    depth: usize,
    move_from_root: Option<usize>,
    node: usize,
    status: Status,
}

impl Ord for OpenEntry {
    // the heap pops the greatest entry: highest merit first, then the
    // shallowest, then the lowest root column, then the oldest node
    fn cmp(&self, other: &Self) -> Ordering {
        self.merit
            .cmp(&other.merit)
            .then_with(|| other.depth.cmp(&self.depth))
            .then_with(|| other.move_from_root.cmp(&self.move_from_root))
            .then_with(|| other.node.cmp(&self.node))
            .then_with(|| self.status.cmp(&other.status))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The result of a single search
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct SearchReport {
    /// The chosen root column
    pub column: usize,
    /// Value of the root within the horizon, from the root mover's perspective
    pub value: i32,
    pub nodes_expanded: usize,
    pub nodes_generated: usize,
    /// Open list entries discarded because an ancestor was already solved
    pub purged: usize,
    pub peak_open: usize,
}

struct SearchTree {
    nodes: Vec<SearchNode>,
    open: BinaryHeap<OpenEntry>,
    root_player: Player,
    horizon: usize,
    and_expansion: AndExpansion,
    nodes_expanded: usize,
    purged: usize,
    peak_open: usize,
}

impl SearchTree {
    fn new(root: GameState, config: EngineConfig) -> Self {
        let mut tree = Self {
            root_player: root.current_player(),
            nodes: vec![SearchNode::new(root, None, 0, NodeKind::Or, None)],
            open: BinaryHeap::new(),
            horizon: config.depth,
            and_expansion: config.and_expansion,
            nodes_expanded: 0,
            purged: 0,
            peak_open: 0,
        };
        tree.push(ROOT, Status::Live, MERIT_INFINITY);
        tree
    }

    fn push(&mut self, node: usize, status: Status, merit: i32) {
        let search_node = &self.nodes[node];
        self.open.push(OpenEntry {
            merit,
            depth: search_node.depth,
            move_from_root: search_node.move_from_root,
            node,
            status,
        });
        self.peak_open = self.peak_open.max(self.open.len());
    }

    /// Walks up from `node` and returns the tightest bound set by an AND
    /// ancestor, or `None` if an ancestor is already solved
    fn ancestor_ceiling(&self, node: usize) -> Option<i32> {
        let mut ceiling = MERIT_INFINITY;
        let mut current = self.nodes[node].parent;
        while let Some(ancestor) = current {
            let ancestor = &self.nodes[ancestor];
            if ancestor.solved {
                return None;
            }
            if ancestor.kind == NodeKind::And {
                ceiling = ceiling.min(ancestor.bound);
            }
            current = ancestor.parent;
        }
        Some(ceiling)
    }

    fn run(mut self) -> Result<SearchReport, GameError> {
        while let Some(entry) = self.open.pop() {
            let ceiling = match self.ancestor_ceiling(entry.node) {
                Some(ceiling) => ceiling,
                None => {
                    self.purged += 1;
                    continue;
                }
            };
            // a sibling solved lower since this entry was queued
            if ceiling < entry.merit {
                self.push(entry.node, entry.status, ceiling);
                continue;
            }

            match entry.status {
                Status::Live => self.expand(entry.node, entry.merit)?,
                Status::Solved => match self.nodes[entry.node].parent {
                    None => return Ok(self.report(entry.node, entry.merit)),
                    Some(parent) => self.propagate(parent, entry.node, entry.merit),
                },
            }
        }
        unreachable!("open list exhausted before the root was solved")
    }

    fn expand(&mut self, node: usize, merit: i32) -> Result<(), GameError> {
        self.nodes_expanded += 1;

        let (depth, kind) = (self.nodes[node].depth, self.nodes[node].kind);
        if depth >= self.horizon || self.nodes[node].state.is_terminal() {
            // scored from the root mover's perspective at every depth
            let value = self.nodes[node].state.score(self.root_player).min(merit);
            self.nodes[node].solved = true;
            self.push(node, Status::Solved, value);
            return Ok(());
        }

        let child_kind = match kind {
            NodeKind::Or => NodeKind::And,
            NodeKind::And => NodeKind::Or,
        };
        let moves = self.nodes[node].state.legal_moves();
        let mut children = Vec::with_capacity(moves.len());
        for column in moves {
            let mut child = self.nodes[node].state.clone();
            child.apply(column)?;
            let move_from_root = self.nodes[node].move_from_root.or(Some(column));
            children.push(self.nodes.len());
            self.nodes.push(SearchNode::new(
                child,
                Some(node),
                depth + 1,
                child_kind,
                move_from_root,
            ));
        }
        trace!(
            "expanded {:?} node {} at depth {} into {} children, merit {}",
            kind,
            node,
            depth,
            children.len(),
            merit
        );

        let release = match (kind, self.and_expansion) {
            (NodeKind::And, AndExpansion::Sequential) => 1,
            _ => children.len(),
        };
        for &child in children[..release].iter() {
            self.push(child, Status::Live, merit);
        }
        self.nodes[node].released = release;
        self.nodes[node].children = children;
        Ok(())
    }

    fn propagate(&mut self, parent: usize, child: usize, value: i32) {
        match self.nodes[parent].kind {
            NodeKind::Or => {
                // nothing left on the open list can beat this child, so it
                // proves the parent and the remaining siblings are purged
                self.nodes[parent].solved = true;
                self.nodes[parent].proof = Some(child);
                trace!("OR node {} solved by node {} at {}", parent, child, value);
                self.push(parent, Status::Solved, value);
            }
            NodeKind::And => {
                let (bound, done, next) = {
                    let and_node = &mut self.nodes[parent];
                    and_node.solved_children += 1;
                    and_node.bound = and_node.bound.min(value);
                    let next = if and_node.released < and_node.children.len() {
                        and_node.released += 1;
                        Some(and_node.children[and_node.released - 1])
                    } else {
                        None
                    };
                    (
                        and_node.bound,
                        and_node.solved_children == and_node.children.len(),
                        next,
                    )
                };

                if done {
                    self.nodes[parent].solved = true;
                    self.push(parent, Status::Solved, bound);
                } else if let Some(next) = next {
                    self.push(next, Status::Live, bound);
                }
            }
        }
    }

    fn report(&self, root: usize, value: i32) -> SearchReport {
        let column = match self.nodes[root]
            .proof
            .and_then(|child| self.nodes[child].move_from_root)
        {
            Some(column) => column,
            None => unreachable!("root solved without a proving child"),
        };
        SearchReport {
            column,
            value,
            nodes_expanded: self.nodes_expanded,
            nodes_generated: self.nodes.len(),
            purged: self.purged,
            peak_open: self.peak_open,
        }
    }
}

/// An agent that picks moves with SSS*
///
/// # Notes
/// SSS* keeps a global open list of partially explored positions ordered by
/// merit, an upper bound on the value the root mover can still reach through
/// them, and always refines the most promising one. It never expands more
/// positions than alpha-beta on the same tree, at the cost of holding the
/// open list in memory.
///
/// # Position Scoring
/// Positions are scored from the point of view of the player to move at the
/// root: +100 for a connected 4, -100 for an opponent's connected 4 and 0 for
/// anything else, including positions still undecided at the horizon.
#[derive(Clone, Debug)]
pub struct SearchEngine {
    config: EngineConfig,

    /// The number of nodes expanded by this `SearchEngine` so far (for diagnostics only)
    pub node_count: usize,
}

impl SearchEngine {
    /// Creates a new `SearchEngine` looking `depth` plies ahead
    ///
    /// A horizon of 0 is treated as 1.
    pub fn new(depth: usize) -> Self {
        Self::with_config(EngineConfig {
            depth,
            ..EngineConfig::default()
        })
    }

    pub fn with_config(mut config: EngineConfig) -> Self {
        config.depth = config.depth.max(1);
        Self {
            config,
            node_count: 0,
        }
    }

    pub fn depth(&self) -> usize {
        self.config.depth
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Searches `state` and returns the chosen column along with search statistics
    ///
    /// `state` itself is never modified.
    pub fn search(&mut self, state: &GameState) -> Result<SearchReport, GameError> {
        if state.is_terminal() {
            return Err(GameError::NoLegalMove);
        }

        let report = SearchTree::new(state.clone(), self.config).run()?;
        self.node_count += report.nodes_expanded;

        debug!(
            "depth {} search for {:?}: column {} value {}, {} expanded, {} generated, {} purged, peak open list {}",
            self.config.depth,
            state.current_player(),
            report.column,
            report.value,
            report.nodes_expanded,
            report.nodes_generated,
            report.purged,
            report.peak_open
        );
        Ok(report)
    }

    /// Returns the column with the best guaranteed outcome within the horizon
    pub fn choose_move(&mut self, state: &GameState) -> Result<usize, GameError> {
        Ok(self.search(state)?.column)
    }
}
