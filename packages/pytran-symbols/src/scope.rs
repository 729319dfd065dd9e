//! The lexical scope tree and active-scope stack.

use std::ops::{Index, IndexMut};

use la_arena::{Arena, Idx};

use crate::store::HashStore;

pub type ScopeId = Idx<ScopeData>;

/// Control-flow context flags of a scope.
///
/// Plain block scopes inherit these from their parent; function and class
/// bodies reset them so `break`/`return` legality is decided correctly at any
/// nesting depth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeFlags {
    pub in_loop: bool,
    pub in_function: bool,
}

/// One lexical scope.
#[derive(Debug)]
pub struct ScopeData {
    /// Nesting level; the global scope has depth 0.
    pub depth: u32,
    /// Sibling index at this depth. Indices are numbered depth-globally: two
    /// scopes at the same depth under different parents share one counter.
    /// Diagnostic output depends on this numbering.
    pub index_at_depth: u32,
    pub parent: Option<ScopeId>,
    /// Children in creation order.
    pub children: Vec<ScopeId>,
    pub flags: ScopeFlags,
    /// Entries declared directly in this scope.
    pub store: HashStore,
}

impl ScopeData {
    /// Human-readable label: `0`, `1`, `1a`, `1b`, ... The letter suffix
    /// disambiguates the second and later scopes at a depth.
    pub fn label(&self) -> String {
        let mut label = self.depth.to_string();
        let mut n = self.index_at_depth;
        let mut suffix = String::new();
        while n > 0 {
            n -= 1;
            suffix.insert(0, (b'a' + (n % 26) as u8) as char);
            n /= 26;
        }
        label.push_str(&suffix);
        label
    }
}

/// Tree of scopes plus the active-scope stack for one translation unit.
///
/// Parent links are arena indices, so the tree tears down from the root with
/// no cycle-breaking. The global scope is created up front and never removed.
#[derive(Debug)]
pub struct ScopeTree {
    scopes: Arena<ScopeData>,
    root: ScopeId,
    stack: Vec<ScopeId>,
    /// Next sibling index per depth, keyed by depth alone.
    depth_counters: Vec<u32>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        let mut scopes = Arena::new();
        let root = scopes.alloc(ScopeData {
            depth: 0,
            index_at_depth: 0,
            parent: None,
            children: Vec::new(),
            flags: ScopeFlags::default(),
            store: HashStore::new(),
        });
        Self {
            scopes,
            root,
            stack: vec![root],
            depth_counters: vec![1],
        }
    }

    pub fn root(&self) -> ScopeId {
        self.root
    }

    pub fn current(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or(self.root)
    }

    pub fn current_flags(&self) -> ScopeFlags {
        self.scopes[self.current()].flags
    }

    /// Create a child of the current scope and make it current. Flags are
    /// inherited from the parent.
    pub fn enter_scope(&mut self) -> ScopeId {
        let flags = self.current_flags();
        self.enter_with_flags(flags)
    }

    /// Enter a function body: `in_function` set, `in_loop` reset so a loop
    /// outside the function does not leak into it.
    pub fn enter_function_scope(&mut self) -> ScopeId {
        self.enter_with_flags(ScopeFlags {
            in_loop: false,
            in_function: true,
        })
    }

    /// Enter a loop body: `in_loop` set, `in_function` inherited.
    pub fn enter_loop_scope(&mut self) -> ScopeId {
        let flags = self.current_flags();
        self.enter_with_flags(ScopeFlags {
            in_loop: true,
            in_function: flags.in_function,
        })
    }

    /// Enter a class body: both flags reset.
    pub fn enter_class_scope(&mut self) -> ScopeId {
        self.enter_with_flags(ScopeFlags::default())
    }

    pub fn enter_with_flags(&mut self, flags: ScopeFlags) -> ScopeId {
        let parent = self.current();
        let depth = self.scopes[parent].depth + 1;
        if self.depth_counters.len() <= depth as usize {
            self.depth_counters.resize(depth as usize + 1, 0);
        }
        let index_at_depth = self.depth_counters[depth as usize];
        self.depth_counters[depth as usize] += 1;

        let id = self.scopes.alloc(ScopeData {
            depth,
            index_at_depth,
            parent: Some(parent),
            children: Vec::new(),
            flags,
            store: HashStore::new(),
        });
        self.scopes[parent].children.push(id);
        self.stack.push(id);
        id
    }

    /// Pop the current scope and return its id. At the global scope this is a
    /// no-op that returns the global scope's id; exiting past the root is
    /// impossible, never an error.
    pub fn exit_scope(&mut self) -> ScopeId {
        if self.stack.len() <= 1 {
            return self.root;
        }
        self.stack.pop().unwrap_or(self.root)
    }

    /// `id` followed by its ancestors up to the root.
    pub fn ancestors(&self, id: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(id), move |&id| self.scopes[id].parent)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScopeId, &ScopeData)> {
        self.scopes.iter()
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn max_depth(&self) -> u32 {
        self.scopes.iter().map(|(_, s)| s.depth).max().unwrap_or(0)
    }
}

impl Index<ScopeId> for ScopeTree {
    type Output = ScopeData;

    fn index(&self, id: ScopeId) -> &Self::Output {
        &self.scopes[id]
    }
}

impl IndexMut<ScopeId> for ScopeTree {
    fn index_mut(&mut self, id: ScopeId) -> &mut Self::Output {
        &mut self.scopes[id]
    }
}
