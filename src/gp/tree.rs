//! Decision trees: the individuals of the GP population.
//!
//! A [`Node`] is either a test with two owned children or an action leaf.
//! Nodes are addressed by their **preorder index** (root = 0, then the
//! `on_true` subtree, then the `on_false` subtree). The slot a node
//! occupies in its parent is found from that index, which is what
//! crossover needs to splice subtrees between two trees without any
//! parent pointers in the owning structure.

use super::fitness;
use super::primitives::{Action, Label, Test};
use crate::level::Level;
use rand::Rng;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// Fitness of a tree that has not been scored yet.
pub const UNEVALUATED: f64 = -1.0;

/// Which child slot of a test node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Branch {
    /// Followed when the test holds.
    OnTrue,
    /// Followed when the test fails.
    OnFalse,
}

/// A node of a decision tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Internal node: branches on `test`.
    Test {
        /// Predicate evaluated at the agent's position.
        test: Test,
        /// Subtree taken when the test holds.
        on_true: Box<Node>,
        /// Subtree taken when the test fails.
        on_false: Box<Node>,
    },
    /// Leaf node.
    Action(Action),
}

impl Node {
    /// Creates a test node.
    pub fn test(test: Test, on_true: Node, on_false: Node) -> Self {
        Node::Test {
            test,
            on_true: Box::new(on_true),
            on_false: Box::new(on_false),
        }
    }

    /// Creates an action leaf.
    pub fn action(action: Action) -> Self {
        Node::Action(action)
    }

    /// Samples a random tree whose root is a test.
    ///
    /// Children are drawn breadth-first from the whole alphabet until a
    /// node sits at depth `max_height - 1`; its children are then drawn
    /// from the actions only, so the result is never deeper than
    /// `max_height` (at least 2).
    pub fn sample<R: Rng + ?Sized>(rng: &mut R, max_height: usize) -> Self {
        let max_height = max_height.max(2);
        let mut draft = Draft::default();
        let root = draft.push(Label::Test(Test::random(rng)), 1);
        let mut pending = VecDeque::from([root]);

        // Each popped node receives both children before the next one is
        // looked at; a node is never revisited.
        while let Some(parent) = pending.pop_front() {
            let depth = draft.depths[parent];
            let leaves_only = depth + 1 >= max_height;
            let mut draw = |rng: &mut R| {
                let label = if leaves_only {
                    Label::Action(Action::random(rng))
                } else {
                    Label::random(rng)
                };
                let child = draft.push(label, depth + 1);
                if label.is_test() {
                    pending.push_back(child);
                }
                child
            };
            let on_true = draw(&mut *rng);
            let on_false = draw(&mut *rng);
            draft.children[parent] = Some([on_true, on_false]);
        }

        draft.assemble(root)
    }

    /// The node's label.
    pub fn label(&self) -> Label {
        match self {
            Node::Test { test, .. } => Label::Test(*test),
            Node::Action(action) => Label::Action(*action),
        }
    }

    /// Whether this is a test node.
    pub fn is_internal(&self) -> bool {
        matches!(self, Node::Test { .. })
    }

    /// Children in `[on_true, on_false]` order, for test nodes.
    pub fn children(&self) -> Option<[&Node; 2]> {
        match self {
            Node::Test {
                on_true, on_false, ..
            } => Some([&**on_true, &**on_false]),
            Node::Action(_) => None,
        }
    }

    /// Number of nodes in this subtree.
    pub fn len(&self) -> usize {
        match self {
            Node::Test {
                on_true, on_false, ..
            } => 1 + on_true.len() + on_false.len(),
            Node::Action(_) => 1,
        }
    }

    /// Height of this subtree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Node::Test {
                on_true, on_false, ..
            } => 1 + on_true.depth().max(on_false.depth()),
            Node::Action(_) => 1,
        }
    }

    /// Number of test nodes in this subtree.
    pub fn internal_count(&self) -> usize {
        match self {
            Node::Test {
                on_true, on_false, ..
            } => 1 + on_true.internal_count() + on_false.internal_count(),
            Node::Action(_) => 0,
        }
    }

    /// Number of action leaves in this subtree.
    pub fn leaf_count(&self) -> usize {
        self.len() - self.internal_count()
    }

    /// Walks the tree for an agent at `position` and returns the chosen action.
    pub fn decide(&self, level: &Level, position: isize) -> Action {
        let mut node = self;
        loop {
            match node {
                Node::Action(action) => return *action,
                Node::Test {
                    test,
                    on_true,
                    on_false,
                } => {
                    node = if test.evaluate(level, position) {
                        &**on_true
                    } else {
                        &**on_false
                    };
                }
            }
        }
    }

    /// Node at preorder index `k`.
    pub fn nth(&self, k: usize) -> Option<&Node> {
        if k == 0 {
            return Some(self);
        }
        match self {
            Node::Action(_) => None,
            Node::Test {
                on_true, on_false, ..
            } => {
                let left = on_true.len();
                if k <= left {
                    on_true.nth(k - 1)
                } else {
                    on_false.nth(k - 1 - left)
                }
            }
        }
    }

    fn nth_mut(&mut self, k: usize) -> Option<&mut Node> {
        if k == 0 {
            return Some(self);
        }
        match self {
            Node::Action(_) => None,
            Node::Test {
                on_true, on_false, ..
            } => {
                let left = on_true.len();
                if k <= left {
                    on_true.nth_mut(k - 1)
                } else {
                    on_false.nth_mut(k - 1 - left)
                }
            }
        }
    }

    /// The parent slot holding the node at preorder index `k`.
    ///
    /// `None` for the root (`k == 0`) and for out-of-range indices.
    fn slot_mut(&mut self, k: usize) -> Option<&mut Box<Node>> {
        if k == 0 {
            return None;
        }
        match self {
            Node::Action(_) => None,
            Node::Test {
                on_true, on_false, ..
            } => {
                let left = on_true.len();
                if k == 1 {
                    Some(on_true)
                } else if k <= left {
                    on_true.slot_mut(k - 1)
                } else if k == left + 1 {
                    Some(on_false)
                } else {
                    on_false.slot_mut(k - 1 - left)
                }
            }
        }
    }

    /// Replaces the label, keeping the children. Fails on a category mismatch.
    fn set_label(&mut self, label: Label) -> bool {
        match (self, label) {
            (Node::Test { test, .. }, Label::Test(next)) => {
                *test = next;
                true
            }
            (Node::Action(action), Label::Action(next)) => {
                *action = next;
                true
            }
            _ => false,
        }
    }

    fn write_indented(
        &self,
        f: &mut fmt::Formatter<'_>,
        indent: usize,
        prefix: &str,
    ) -> fmt::Result {
        writeln!(f, "{:indent$}{prefix}{}", "", self.label())?;
        if let Node::Test {
            on_true, on_false, ..
        } = self
        {
            on_true.write_indented(f, indent + 2, "yes: ")?;
            on_false.write_indented(f, indent + 2, "no: ")?;
        }
        Ok(())
    }
}

/// Flat breadth-first draft used while sampling.
#[derive(Default)]
struct Draft {
    labels: Vec<Label>,
    depths: Vec<usize>,
    children: Vec<Option<[usize; 2]>>,
}

impl Draft {
    fn push(&mut self, label: Label, depth: usize) -> usize {
        self.labels.push(label);
        self.depths.push(depth);
        self.children.push(None);
        self.labels.len() - 1
    }

    fn assemble(&self, index: usize) -> Node {
        match self.labels[index] {
            Label::Action(action) => Node::Action(action),
            Label::Test(test) => {
                let [on_true, on_false] = self.children[index]
                    .expect("every drafted test is expanded before the queue drains");
                Node::test(test, self.assemble(on_true), self.assemble(on_false))
            }
        }
    }
}

/// One row of a tree dump.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeRecord {
    /// Preorder index.
    pub index: usize,
    /// Node label.
    pub label: Label,
    /// Distance from the root plus one.
    pub depth: usize,
    /// Preorder index of the parent.
    pub parent: Option<usize>,
    /// Slot of the parent this node occupies.
    pub branch: Option<Branch>,
    /// Preorder indices of `[on_true, on_false]`.
    pub children: Option<[usize; 2]>,
}

/// A scored decision tree.
///
/// The tree keeps the level it is scored against and recomputes its
/// fitness after every structural change, so [`Tree::fitness`] is always
/// current.
#[derive(Debug, Clone)]
pub struct Tree {
    root: Node,
    fitness: f64,
    level: Arc<Level>,
}

impl Tree {
    /// Wraps a root node and scores it against `level`.
    pub fn new(root: Node, level: Arc<Level>) -> Self {
        let mut tree = Self {
            root,
            fitness: UNEVALUATED,
            level,
        };
        tree.refresh_fitness();
        tree
    }

    /// Samples a random tree (see [`Node::sample`]) and scores it.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, max_height: usize, level: Arc<Level>) -> Self {
        Self::new(Node::sample(rng, max_height), level)
    }

    /// Cached fitness.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Level the fitness was computed against.
    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Root node.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// Always `false`: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Tree height; a lone leaf has depth 1.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Number of test nodes.
    pub fn internal_count(&self) -> usize {
        self.root.internal_count()
    }

    /// Number of action leaves.
    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Node at preorder index `k`.
    pub fn node(&self, k: usize) -> Option<&Node> {
        self.root.nth(k)
    }

    /// Action chosen for an agent at `position` on the tree's level.
    pub fn decide(&self, position: isize) -> Action {
        self.root.decide(&self.level, position)
    }

    /// Replaces the label of node `k` with one of the same category.
    ///
    /// Returns `false` (leaving the tree untouched) if `k` is out of range
    /// or the label category does not match the node.
    pub fn relabel(&mut self, k: usize, label: Label) -> bool {
        let changed = self
            .root
            .nth_mut(k)
            .is_some_and(|node| node.set_label(label));
        if changed {
            self.refresh_fitness();
        }
        changed
    }

    /// Exchanges node `ka` of `a` with node `kb` of `b`, subtrees included.
    ///
    /// Ownership of each subtree moves to the other tree; nothing is
    /// copied. Roots cannot be exchanged: returns `false` if either index
    /// is 0 or out of range.
    pub fn swap_subtrees(a: &mut Tree, ka: usize, b: &mut Tree, kb: usize) -> bool {
        let (Some(slot_a), Some(slot_b)) = (a.root.slot_mut(ka), b.root.slot_mut(kb)) else {
            return false;
        };
        std::mem::swap(slot_a, slot_b);
        a.refresh_fitness();
        b.refresh_fitness();
        true
    }

    /// Preorder node list with parent/child links.
    pub fn dump(&self) -> Vec<NodeRecord> {
        let mut records = Vec::with_capacity(self.len());
        dump_into(&self.root, None, 1, &mut records);
        records
    }

    fn refresh_fitness(&mut self) {
        self.fitness = fitness::evaluate(&self.root, &self.level);
    }
}

fn dump_into(
    node: &Node,
    parent: Option<(usize, Branch)>,
    depth: usize,
    records: &mut Vec<NodeRecord>,
) -> usize {
    let index = records.len();
    records.push(NodeRecord {
        index,
        label: node.label(),
        depth,
        parent: parent.map(|(p, _)| p),
        branch: parent.map(|(_, b)| b),
        children: None,
    });
    if let Node::Test {
        on_true, on_false, ..
    } = node
    {
        let t = dump_into(on_true, Some((index, Branch::OnTrue)), depth + 1, records);
        let f = dump_into(on_false, Some((index, Branch::OnFalse)), depth + 1, records);
        records[index].children = Some([t, f]);
    }
    index
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "fitness {:.4}, depth {}, {} nodes",
            self.fitness,
            self.depth(),
            self.len()
        )?;
        self.root.write_indented(f, 0, "")
    }
}
