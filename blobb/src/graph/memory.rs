use std::{
    collections::{BTreeMap, HashMap, hash_map::DefaultHasher},
    hash::{Hash, Hasher},
    sync::{Mutex, MutexGuard, RwLock},
};

use super::FollowGraphStore;
use crate::{
    errors::GraphResult,
    types::{FollowEdge, Page, UserId},
};

/// Default number of pair-lock stripes.
pub const DEFAULT_LOCK_STRIPES: usize = 64;

/// Adjacency-map store held in process memory.
///
/// Mutations on a pair are serialized by a striped lock table. Both stripes of
/// a pair are always taken in ascending stripe order, so the order does not
/// depend on edge direction and A->B racing B->A cannot deadlock. The adjacency
/// maps themselves sit behind a single `RwLock`, which makes forward and
/// reverse entries of an edge appear and disappear together.
#[derive(Debug)]
pub struct MemoryGraphStore {
    adjacency: RwLock<Adjacency>,
    stripes: Vec<Mutex<()>>,
}

#[derive(Debug, Default)]
struct Adjacency {
    next_seq: u64,
    edges: HashMap<(UserId, UserId), u64>,
    outgoing: HashMap<UserId, BTreeMap<u64, UserId>>,
    incoming: HashMap<UserId, BTreeMap<u64, UserId>>,
}

impl Adjacency {
    fn contains(&self, follower: &UserId, followee: &UserId) -> bool {
        self.edges.contains_key(&(follower.clone(), followee.clone()))
    }

    fn insert(&mut self, edge: &FollowEdge) -> bool {
        let pair = (edge.follower().clone(), edge.followee().clone());
        if self.edges.contains_key(&pair) {
            return false;
        }
        self.next_seq += 1;
        let seq = self.next_seq;
        self.edges.insert(pair, seq);
        self.outgoing
            .entry(edge.follower().clone())
            .or_default()
            .insert(seq, edge.followee().clone());
        self.incoming
            .entry(edge.followee().clone())
            .or_default()
            .insert(seq, edge.follower().clone());
        true
    }

    fn remove(&mut self, follower: &UserId, followee: &UserId) -> bool {
        let Some(seq) = self.edges.remove(&(follower.clone(), followee.clone())) else {
            return false;
        };
        Self::detach(&mut self.outgoing, follower, seq);
        Self::detach(&mut self.incoming, followee, seq);
        true
    }

    fn detach(side: &mut HashMap<UserId, BTreeMap<u64, UserId>>, owner: &UserId, seq: u64) {
        if let Some(neighbours) = side.get_mut(owner) {
            neighbours.remove(&seq);
            if neighbours.is_empty() {
                side.remove(owner);
            }
        }
    }

    fn page(side: &HashMap<UserId, BTreeMap<u64, UserId>>, of: &UserId, page: Page) -> Vec<UserId> {
        match side.get(of) {
            Some(neighbours) => page.apply(neighbours.values().filter(|id| *id != of).cloned()),
            None => Vec::new(),
        }
    }

    fn count(side: &HashMap<UserId, BTreeMap<u64, UserId>>, of: &UserId) -> u64 {
        side.get(of)
            .map(|neighbours| neighbours.values().filter(|id| *id != of).count() as u64)
            .unwrap_or(0)
    }
}

/// Holds the stripe locks covering one unordered pair of ids.
struct PairGuard<'a> {
    _low: MutexGuard<'a, ()>,
    _high: Option<MutexGuard<'a, ()>>,
}

impl MemoryGraphStore {
    pub fn new() -> Self {
        Self::with_stripes(DEFAULT_LOCK_STRIPES)
    }

    /// A store with `stripes` pair locks (at least one).
    pub fn with_stripes(stripes: usize) -> Self {
        Self {
            adjacency: RwLock::new(Adjacency::default()),
            stripes: (0..stripes.max(1)).map(|_| Mutex::new(())).collect(),
        }
    }

    pub fn edge_count(&self) -> GraphResult<usize> {
        Ok(self.adjacency.read()?.edges.len())
    }

    fn stripe_of(&self, id: &UserId) -> usize {
        let mut hasher = DefaultHasher::new();
        id.hash(&mut hasher);
        (hasher.finish() % self.stripes.len() as u64) as usize
    }

    fn lock_pair(&self, a: &UserId, b: &UserId) -> GraphResult<PairGuard<'_>> {
        let (sa, sb) = (self.stripe_of(a), self.stripe_of(b));
        let (low, high) = (sa.min(sb), sa.max(sb));
        let low_guard = self.stripes[low].lock()?;
        let high_guard = if high != low {
            Some(self.stripes[high].lock()?)
        } else {
            None
        };
        Ok(PairGuard {
            _low: low_guard,
            _high: high_guard,
        })
    }
}

impl Default for MemoryGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FollowGraphStore for MemoryGraphStore {
    async fn edge_exists(&self, follower: &UserId, followee: &UserId) -> GraphResult<bool> {
        if follower == followee {
            return Ok(false);
        }
        Ok(self.adjacency.read()?.contains(follower, followee))
    }

    async fn create_edge(&self, follower: &UserId, followee: &UserId) -> GraphResult<bool> {
        let edge = FollowEdge::new(follower, followee)?;
        let _pair = self.lock_pair(follower, followee)?;
        // Duplicate follows stop here without contending for the write lock.
        if self.adjacency.read()?.contains(follower, followee) {
            log::debug!("edge {follower} -> {followee} already exists");
            return Ok(false);
        }
        let created = self.adjacency.write()?.insert(&edge);
        log::debug!("created edge {follower} -> {followee}");
        Ok(created)
    }

    async fn remove_edge(&self, follower: &UserId, followee: &UserId) -> GraphResult<bool> {
        let _pair = self.lock_pair(follower, followee)?;
        let removed = self.adjacency.write()?.remove(follower, followee);
        log::debug!("remove edge {follower} -> {followee}: removed={removed}");
        Ok(removed)
    }

    async fn list_followees(&self, of: &UserId, page: Page) -> GraphResult<Vec<UserId>> {
        log::trace!("list followees of {of} {page:?}");
        Ok(Adjacency::page(&self.adjacency.read()?.outgoing, of, page))
    }

    async fn list_followers(&self, of: &UserId, page: Page) -> GraphResult<Vec<UserId>> {
        log::trace!("list followers of {of} {page:?}");
        Ok(Adjacency::page(&self.adjacency.read()?.incoming, of, page))
    }

    async fn count_followees(&self, of: &UserId) -> GraphResult<u64> {
        Ok(Adjacency::count(&self.adjacency.read()?.outgoing, of))
    }

    async fn count_followers(&self, of: &UserId) -> GraphResult<u64> {
        Ok(Adjacency::count(&self.adjacency.read()?.incoming, of))
    }
}
