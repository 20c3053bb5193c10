//! Multi-way instance built as a bit-prefix trie.
//!
//! Alternatives are 256-bit identities. Runs of bits that every live
//! alternative shares are covered by a unary node; the first bit on which
//! live alternatives disagree is decided by a binary node whose two sides
//! lead to the sub-tries for each bit value. A poll walks down the preferred
//! path, splitting the votes at each binary node, so one poll can advance
//! several independent bit decisions at once. Once a node finalizes it is
//! replaced by its child: the bits it covered are decided for good and votes
//! disagreeing with them are filtered out before reaching the trie.

use super::{BinarySnowball, Consensus, Parameters, UnarySnowball};
use crate::bag::Bag;
use snowfall_types::BlockId;
use std::fmt;

/// Bit-prefix trie of unary and binary counters.
pub struct Tree {
    params: Parameters,
    root: TreeNode,
    /// Set by a falter; applied when the next poll reaches the root.
    should_reset: bool,
}

enum TreeNode {
    Unary(UnaryNode),
    Binary(BinaryNode),
}

/// Covers bits `[decided_prefix, common_prefix)`, on which every alternative
/// below it agrees.
struct UnaryNode {
    preference: BlockId,
    decided_prefix: usize,
    common_prefix: usize,
    snowball: UnarySnowball,
    should_reset: bool,
    child: Option<Box<TreeNode>>,
}

/// Decides bit `bit`. A side with no child is a single alternative.
struct BinaryNode {
    bit: usize,
    snowball: BinarySnowball,
    should_reset: [bool; 2],
    preferences: [BlockId; 2],
    children: [Option<Box<TreeNode>>; 2],
}

impl Tree {
    pub fn new(params: Parameters, choice: BlockId) -> Self {
        Self::from_unary(params, choice, UnarySnowball::new(params.beta_virtuous))
    }

    /// A trie whose root covers every bit of `choice` and carries `streak`.
    pub fn from_unary(params: Parameters, choice: BlockId, streak: UnarySnowball) -> Self {
        Self {
            params,
            root: TreeNode::Unary(UnaryNode::leaf(choice, 0, streak)),
            should_reset: false,
        }
    }

    fn take_root(&mut self) -> TreeNode {
        let placeholder = TreeNode::Unary(UnaryNode::leaf(
            BlockId::ZERO,
            0,
            UnarySnowball::new(self.params.beta_virtuous),
        ));
        std::mem::replace(&mut self.root, placeholder)
    }
}

impl Consensus for Tree {
    fn add(&mut self, choice: BlockId) {
        let prefix = self.root.decided_prefix();
        if !self.root.preference().equal_subset(0, prefix, &choice) {
            // Conflicts with bits that were already decided.
            return;
        }
        let root = self.take_root();
        self.root = root.add(&self.params, choice);
    }

    fn preference(&self) -> BlockId {
        self.root.preference()
    }

    fn record_poll(&mut self, votes: &Bag) -> bool {
        let prefix = self.root.decided_prefix();
        let filtered = votes.filter(0, prefix, &self.root.preference());
        let reset = std::mem::take(&mut self.should_reset);
        let root = self.take_root();
        let (root, successful) = root.record_poll(&self.params, &filtered, reset);
        self.root = root;
        successful
    }

    fn record_unsuccessful_poll(&mut self) {
        self.should_reset = true;
    }

    fn finalized(&self) -> bool {
        self.root.finalized()
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt_indented(f, 0)
    }
}

impl TreeNode {
    fn preference(&self) -> BlockId {
        match self {
            Self::Unary(u) => u.preference,
            Self::Binary(b) => b.preferences[b.snowball.preference()],
        }
    }

    /// First bit this node has not yet decided.
    fn decided_prefix(&self) -> usize {
        match self {
            Self::Unary(u) => u.decided_prefix,
            Self::Binary(b) => b.bit,
        }
    }

    fn finalized(&self) -> bool {
        match self {
            Self::Unary(u) => u.snowball.finalized(),
            Self::Binary(b) => b.snowball.finalized(),
        }
    }

    fn add(self, params: &Parameters, choice: BlockId) -> TreeNode {
        match self {
            Self::Unary(u) => u.add(params, choice),
            Self::Binary(b) => b.add(params, choice),
        }
    }

    fn record_poll(self, params: &Parameters, votes: &Bag, reset: bool) -> (TreeNode, bool) {
        match self {
            Self::Unary(u) => u.record_poll(params, votes, reset),
            Self::Binary(b) => b.record_poll(params, votes, reset),
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "    ".repeat(depth);
        match self {
            Self::Unary(u) => {
                writeln!(
                    f,
                    "{}{} Bits = [{}, {})",
                    indent, u.snowball, u.decided_prefix, u.common_prefix
                )?;
                if let Some(child) = &u.child {
                    child.fmt_indented(f, depth + 1)?;
                }
            }
            Self::Binary(b) => {
                writeln!(f, "{}{} Bit = {}", indent, b.snowball, b.bit)?;
                for child in b.children.iter().flatten() {
                    child.fmt_indented(f, depth + 1)?;
                }
            }
        }
        Ok(())
    }
}

impl UnaryNode {
    fn leaf(preference: BlockId, decided_prefix: usize, snowball: UnarySnowball) -> Self {
        Self {
            preference,
            decided_prefix,
            common_prefix: BlockId::NUM_BITS,
            snowball,
            should_reset: false,
            child: None,
        }
    }

    fn add(mut self, params: &Parameters, choice: BlockId) -> TreeNode {
        if self.snowball.finalized() {
            return TreeNode::Unary(self);
        }

        let index = match self
            .preference
            .first_difference(self.decided_prefix, self.common_prefix, &choice)
        {
            Some(index) => index,
            None => {
                // No split here. Without a child the choice is already known.
                if let Some(child) = self.child.take() {
                    self.child = Some(Box::new(child.add(params, choice)));
                }
                return TreeNode::Unary(self);
            }
        };

        let bit = self.preference.bit(index);
        let mut preferences = [BlockId::ZERO; 2];
        preferences[bit] = self.preference;
        preferences[1 - bit] = choice;
        let mut binary = BinaryNode {
            bit: index,
            snowball: self.snowball.extend(params.beta_rogue, bit),
            should_reset: [self.should_reset; 2],
            preferences,
            children: [None, None],
        };
        // The newcomer's branch is decided in its favour up to and including
        // the split bit, and nothing conflicts with it below.
        let newcomer = Box::new(TreeNode::Unary(UnaryNode::leaf(
            choice,
            index + 1,
            UnarySnowball::new(params.beta_virtuous),
        )));

        if self.decided_prefix + 1 == self.common_prefix {
            // This node voted on exactly one bit: the binary node replaces it.
            let has_child = self.child.is_some();
            binary.children[bit] = self.child.take();
            if has_child {
                binary.children[1 - bit] = Some(newcomer);
            }
            TreeNode::Binary(binary)
        } else if index == self.decided_prefix {
            // Split on the first bit: this node moves below the split.
            self.decided_prefix += 1;
            binary.children[bit] = Some(Box::new(TreeNode::Unary(self)));
            binary.children[1 - bit] = Some(newcomer);
            TreeNode::Binary(binary)
        } else if index + 1 == self.common_prefix {
            // Split on the last bit: the binary node slots in as the child.
            self.common_prefix -= 1;
            let has_child = self.child.is_some();
            binary.children[bit] = self.child.take();
            if has_child {
                binary.children[1 - bit] = Some(newcomer);
            }
            self.child = Some(Box::new(TreeNode::Binary(binary)));
            TreeNode::Unary(self)
        } else {
            // Split on an interior bit: a new unary node covers the bits
            // above the split, this node keeps the bits below it.
            let above = UnaryNode {
                preference: self.preference,
                decided_prefix: self.decided_prefix,
                common_prefix: index,
                snowball: self.snowball.clone(),
                should_reset: self.should_reset,
                child: None,
            };
            self.decided_prefix = index + 1;
            binary.children[bit] = Some(Box::new(TreeNode::Unary(self)));
            binary.children[1 - bit] = Some(newcomer);
            TreeNode::Unary(UnaryNode {
                child: Some(Box::new(TreeNode::Binary(binary))),
                ..above
            })
        }
    }

    fn record_poll(mut self, params: &Parameters, votes: &Bag, reset: bool) -> (TreeNode, bool) {
        // Every vote reaching this node already agrees on the bits it covers.
        if reset {
            self.snowball.record_unsuccessful_poll();
            self.should_reset = true;
        }

        if votes.len() < params.alpha {
            self.snowball.record_unsuccessful_poll();
            self.should_reset = true;
            return (TreeNode::Unary(self), false);
        }

        self.snowball.record_successful_poll();

        if let Some(child) = self.child.take() {
            let (child, _) = child.record_poll(params, votes, self.should_reset);
            if self.snowball.finalized() {
                return (child, true);
            }
            self.preference = child.preference();
            self.child = Some(Box::new(child));
        }
        self.should_reset = false;
        (TreeNode::Unary(self), true)
    }
}

impl BinaryNode {
    fn add(mut self, params: &Parameters, choice: BlockId) -> TreeNode {
        let bit = choice.bit(self.bit);
        if let Some(child) = self.children[bit].take() {
            let decided = child.decided_prefix();
            let child = if self.preferences[bit].equal_subset(self.bit + 1, decided, &choice) {
                child.add(params, choice)
            } else {
                // The choice contradicts a bit already decided below us.
                *child
            };
            self.children[bit] = Some(Box::new(child));
        }
        TreeNode::Binary(self)
    }

    fn record_poll(mut self, params: &Parameters, votes: &Bag, reset: bool) -> (TreeNode, bool) {
        let [zeros, ones] = votes.split(self.bit);
        // Strict majority for the set bit; ties go to the zero side, which
        // holds the lexicographically smaller identities.
        let bit = usize::from(ones.len() > zeros.len());
        let side = if bit == 1 { ones } else { zeros };

        if reset {
            self.snowball.record_unsuccessful_poll();
            self.should_reset[bit] = true;
        }
        self.should_reset[1 - bit] = true;

        if side.len() < params.alpha {
            self.snowball.record_unsuccessful_poll();
            self.should_reset[bit] = true;
            return (TreeNode::Binary(self), false);
        }

        self.snowball.record_successful_poll(bit);

        if let Some(child) = self.children[bit].take() {
            let filtered =
                side.filter(self.bit + 1, child.decided_prefix(), &self.preferences[bit]);
            let (child, _) = child.record_poll(params, &filtered, self.should_reset[bit]);
            if self.snowball.finalized() {
                return (child, true);
            }
            self.preferences[bit] = child.preference();
            self.children[bit] = Some(Box::new(child));
        }
        self.should_reset[bit] = false;
        (TreeNode::Binary(self), true)
    }
}
