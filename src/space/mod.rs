//! Arena-backed prefix tree.
//!
//! An [`AddressSpace`] owns every [`PrefixNode`] it has realized. Nodes refer to
//! their parent and children by [`NodeId`], so there are no reference cycles and
//! the root is an ordinary value passed explicitly to callers.
//!
//! - `alloc` - split, step, floor/ceil, offset and other arithmetic on nodes
//! - `lookup` - lazy indexed access to children
//! - `shared` - one-lock-per-tree wrapper for use across threads

mod alloc;
mod lookup;
mod shared;

pub use lookup::LookupKey;
pub use shared::SharedAddressSpace;

use crate::error::{PrefixError, Result};
use crate::models::{NodeId, PrefixNode, Supernet};

/// One arena cell; `node` is `None` once deleted.
#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<PrefixNode>,
}

/// A tree of prefixes rooted at `0.0.0.0/0`.
#[derive(Debug, Clone)]
pub struct AddressSpace {
    slots: Vec<Slot>,
    free: Vec<usize>,
    live: usize,
    root: NodeId,
}

impl Default for AddressSpace {
    fn default() -> Self {
        AddressSpace::new()
    }
}

impl AddressSpace {
    /// Fresh address space holding only the root block.
    pub fn new() -> AddressSpace {
        AddressSpace {
            slots: vec![Slot {
                generation: 0,
                node: Some(PrefixNode::root()),
            }],
            free: Vec::new(),
            live: 1,
            root: NodeId::new(0, 0),
        }
    }

    /// The `0.0.0.0/0` node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, including unlinked ones.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn get(&self, id: NodeId) -> Result<&PrefixNode> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_ref())
            .ok_or_else(|| unknown_node(id))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut PrefixNode> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_mut())
            .ok_or_else(|| unknown_node(id))
    }

    fn push(&mut self, node: PrefixNode) -> NodeId {
        self.live += 1;
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.node = Some(node);
                NodeId::new(index, slot.generation)
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId::new(self.slots.len() - 1, 0)
            }
        }
    }

    /// Delete a node and everything realized below it.
    fn release(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(cursor) = stack.pop() {
            if self.get(cursor).is_err() {
                continue;
            }
            let slot = &mut self.slots[cursor.index()];
            if let Some(node) = slot.node.take() {
                stack.extend(node.children.into_values());
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(cursor.index());
                self.live -= 1;
            }
        }
        log::debug!("release: {id:?}, {} nodes live", self.live);
    }

    /// Store `child` and register it in `parent`'s registry under its canonical text.
    ///
    /// An existing entry with the same key is replaced and deleted.
    fn register(&mut self, parent: NodeId, child: PrefixNode) -> Result<NodeId> {
        // Fail before touching the arena.
        self.get(parent)?;
        let key = child.to_string();
        let id = self.push(child);
        if let Some(old) = self.get_mut(parent)?.children.insert(key.clone(), id) {
            log::debug!("register: {key} replaces {old:?} under {parent:?}");
            self.release(old);
        }
        Ok(id)
    }

    /// Add a node as the top of its own tree, with no parent.
    pub fn insert(&mut self, node: PrefixNode) -> NodeId {
        let boundary = node.boundary();
        let node = node.linked(Supernet::Detached, boundary);
        log::debug!("insert: {node}");
        self.push(node)
    }

    /// Register an externally built node as a child of `parent`.
    ///
    /// The node must lie inside the parent's block and end at or before the
    /// parent's boundary.
    pub fn attach(&mut self, parent: NodeId, node: PrefixNode) -> Result<NodeId> {
        let p = self.get(parent)?;
        if !p.contains(&node) || node.last_address() > p.boundary() {
            return Err(PrefixError::Range(format!("{node} does not fit inside {p}")));
        }
        let linked = node.linked(Supernet::Node(parent), p.last_address());
        log::debug!("attach: {linked} under {p}");
        self.register(parent, linked)
    }

    /// Delete a child of `parent`, with its realized subtree.
    ///
    /// Returns the id the child had; it no longer resolves afterwards.
    pub fn remove(&mut self, parent: NodeId, key: &str) -> Result<NodeId> {
        let canonical = PrefixNode::from_text(key, None)
            .map(|p| p.to_string())
            .unwrap_or_else(|_| key.to_string());
        let p = self.get_mut(parent)?;
        match p.children.remove(&canonical) {
            Some(id) => {
                log::debug!("remove: {canonical} from {p}");
                self.release(id);
                Ok(id)
            }
            None => Err(PrefixError::Key {
                parent: p.to_string(),
                key: key.to_string(),
            }),
        }
    }

    /// Realized children of a node, in address order.
    pub fn children(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let node = self.get(id)?;
        let mut children = Vec::with_capacity(node.children.len());
        for child in node.children.values() {
            children.push((self.get(*child)?, *child));
        }
        children.sort_by(|a, b| a.0.cmp(b.0));
        Ok(children.into_iter().map(|(_, child)| child).collect())
    }

    /// Parent of a node, `None` for the root and for unlinked nodes.
    pub fn supernet(&self, id: NodeId) -> Result<Option<NodeId>> {
        match self.get(id)?.supernet() {
            Supernet::Node(parent) => Ok(Some(parent)),
            Supernet::Root | Supernet::Detached => Ok(None),
        }
    }

    /// Chain of ancestors from the top of the tree down to `id` itself.
    pub fn netpath(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let mut path = vec![id];
        let mut cursor = id;
        while let Some(parent) = self.supernet(cursor)? {
            path.push(parent);
            cursor = parent;
        }
        path.reverse();
        Ok(path)
    }

    /// Depth-first listing of the realized tree below `id`, with depths.
    pub fn walk(&self, id: NodeId) -> Result<Vec<(usize, NodeId)>> {
        let mut out = Vec::new();
        let mut stack = vec![(0usize, id)];
        while let Some((depth, cursor)) = stack.pop() {
            out.push((depth, cursor));
            for child in self.children(cursor)?.into_iter().rev() {
                stack.push((depth + 1, child));
            }
        }
        Ok(out)
    }
}

fn unknown_node(id: NodeId) -> PrefixError {
    PrefixError::Key {
        parent: "address space".to_string(),
        key: format!("node #{}", id.index()),
    }
}
