//! Doubly linked list threaded through nodes stored in a [`NodePool`].
//!
//! Unlike a list that owns its nodes, a `SlotList` holds only `head`, `tail`
//! and a length; the `prev`/`next` links live inside the pooled nodes
//! themselves ([`ListLinks`]). Several lists (and a [`HashIndex`]) can
//! therefore share one pool, and moving a node between positions is index
//! manipulation rather than reallocation.
//!
//! ```text
//!   pool (NodePool<T: Listed>)
//!   ┌────────┬───────────────────────────────────────┐
//!   │ SlotId │ links { prev, next }                  │
//!   ├────────┼───────────────────────────────────────┤
//!   │ id_4   │ { prev: None,       next: Some(id_0) }│
//!   │ id_0   │ { prev: Some(id_4), next: Some(id_7) }│
//!   │ id_7   │ { prev: Some(id_0), next: None }      │
//!   └────────┴───────────────────────────────────────┘
//!
//!   head ─► [id_4] ◄──► [id_0] ◄──► [id_7] ◄── tail
//! ```
//!
//! ## Performance
//! - `push_front` / `pop_back` / `unlink` / `move_to_front`: O(1)
//! - `iter_ids`: O(n)
//!
//! [`HashIndex`]: crate::ds::hash_index::HashIndex

use crate::ds::node_pool::{NodePool, SlotId};

/// Per-node list linkage.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListLinks {
    pub prev: Option<SlotId>,
    pub next: Option<SlotId>,
}

/// A pooled node that can be threaded onto a [`SlotList`].
pub trait Listed {
    fn links(&self) -> &ListLinks;
    fn links_mut(&mut self) -> &mut ListLinks;
}

#[derive(Debug, Default)]
pub struct SlotList {
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
}

impl SlotList {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Most recently pushed/moved node.
    #[inline]
    pub fn front(&self) -> Option<SlotId> {
        self.head
    }

    /// Oldest node; the next one `pop_back` returns.
    #[inline]
    pub fn back(&self) -> Option<SlotId> {
        self.tail
    }

    /// Links a node that is not currently on any list at the front.
    #[inline]
    pub fn push_front<T: Listed>(&mut self, pool: &mut NodePool<T>, id: SlotId) {
        self.attach_front(pool, id);
        self.len += 1;
    }

    /// Unlinks and returns the back node. The node stays allocated in `pool`.
    #[inline]
    pub fn pop_back<T: Listed>(&mut self, pool: &mut NodePool<T>) -> Option<SlotId> {
        let id = self.tail?;
        self.unlink(pool, id);
        Some(id)
    }

    /// Removes `id` from the list. `id` must be a member of this list.
    #[inline]
    pub fn unlink<T: Listed>(&mut self, pool: &mut NodePool<T>, id: SlotId) {
        self.detach(pool, id);
        self.len -= 1;
    }

    /// Moves a member of this list to the front.
    #[inline]
    pub fn move_to_front<T: Listed>(&mut self, pool: &mut NodePool<T>, id: SlotId) {
        if self.head == Some(id) {
            return;
        }
        self.detach(pool, id);
        self.attach_front(pool, id);
    }

    /// Iterates member ids from front to back.
    pub fn iter_ids<'a, T: Listed>(&self, pool: &'a NodePool<T>) -> SlotListIter<'a, T> {
        SlotListIter {
            pool,
            current: self.head,
        }
    }

    fn detach<T: Listed>(&mut self, pool: &mut NodePool<T>, id: SlotId) {
        let ListLinks { prev, next } = *pool.node(id).links();

        match prev {
            Some(prev_id) => pool.node_mut(prev_id).links_mut().next = next,
            None => self.head = next,
        }
        match next {
            Some(next_id) => pool.node_mut(next_id).links_mut().prev = prev,
            None => self.tail = prev,
        }

        *pool.node_mut(id).links_mut() = ListLinks::default();
    }

    fn attach_front<T: Listed>(&mut self, pool: &mut NodePool<T>, id: SlotId) {
        let old_head = self.head;
        *pool.node_mut(id).links_mut() = ListLinks {
            prev: None,
            next: old_head,
        };
        match old_head {
            Some(head_id) => pool.node_mut(head_id).links_mut().prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants<T: Listed>(&self, pool: &NodePool<T>) {
        if self.head.is_none() || self.tail.is_none() {
            assert!(self.head.is_none());
            assert!(self.tail.is_none());
            assert_eq!(self.len, 0);
            return;
        }

        let mut count = 0usize;
        let mut prev = None;
        let mut current = self.head;
        while let Some(id) = current {
            let links = pool.get(id).expect("list member missing from pool").links();
            assert_eq!(links.prev, prev);
            if links.next.is_none() {
                assert_eq!(self.tail, Some(id));
            }
            prev = Some(id);
            current = links.next;
            count += 1;
            assert!(count <= self.len, "cycle or length drift in SlotList");
        }
        assert_eq!(count, self.len);
    }
}

/// Iterator over [`SlotList`] member ids, front to back.
pub struct SlotListIter<'a, T> {
    pool: &'a NodePool<T>,
    current: Option<SlotId>,
}

impl<T: Listed> Iterator for SlotListIter<'_, T> {
    type Item = SlotId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.pool.get(id)?.links().next;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Item {
        value: u32,
        links: ListLinks,
    }

    impl Listed for Item {
        fn links(&self) -> &ListLinks {
            &self.links
        }

        fn links_mut(&mut self) -> &mut ListLinks {
            &mut self.links
        }
    }

    fn item(value: u32) -> Item {
        Item {
            value,
            links: ListLinks::default(),
        }
    }

    fn values(list: &SlotList, pool: &NodePool<Item>) -> Vec<u32> {
        list.iter_ids(pool).map(|id| pool.node(id).value).collect()
    }

    #[test]
    fn slot_list_push_front_orders_newest_first() {
        let mut pool = NodePool::new(4);
        let mut list = SlotList::new();
        for v in 1..=3 {
            let id = pool.acquire(item(v));
            list.push_front(&mut pool, id);
        }
        assert_eq!(values(&list, &pool), vec![3, 2, 1]);
        assert_eq!(list.len(), 3);
        list.debug_validate_invariants(&pool);
    }

    #[test]
    fn slot_list_pop_back_returns_oldest() {
        let mut pool = NodePool::new(4);
        let mut list = SlotList::new();
        let a = pool.acquire(item(1));
        let b = pool.acquire(item(2));
        list.push_front(&mut pool, a);
        list.push_front(&mut pool, b);

        assert_eq!(list.pop_back(&mut pool), Some(a));
        assert_eq!(list.pop_back(&mut pool), Some(b));
        assert_eq!(list.pop_back(&mut pool), None);
        assert!(list.is_empty());
        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
        // Popped nodes remain allocated; the list only unlinks them.
        assert!(pool.contains(a));
        list.debug_validate_invariants(&pool);
    }

    #[test]
    fn slot_list_move_to_front_edges() {
        let mut pool = NodePool::new(4);
        let mut list = SlotList::new();
        let ids: Vec<_> = (1..=3)
            .map(|v| {
                let id = pool.acquire(item(v));
                list.push_front(&mut pool, id);
                id
            })
            .collect();
        // [3, 2, 1]
        list.move_to_front(&mut pool, ids[2]);
        assert_eq!(values(&list, &pool), vec![3, 2, 1]);

        list.move_to_front(&mut pool, ids[0]);
        assert_eq!(values(&list, &pool), vec![1, 3, 2]);
        assert_eq!(list.back(), Some(ids[1]));

        list.move_to_front(&mut pool, ids[2]);
        assert_eq!(values(&list, &pool), vec![3, 1, 2]);
        list.debug_validate_invariants(&pool);
    }

    #[test]
    fn slot_list_unlink_middle_and_ends() {
        let mut pool = NodePool::new(4);
        let mut list = SlotList::new();
        let a = pool.acquire(item(1));
        let b = pool.acquire(item(2));
        let c = pool.acquire(item(3));
        for id in [a, b, c] {
            list.push_front(&mut pool, id);
        }

        list.unlink(&mut pool, b);
        assert_eq!(values(&list, &pool), vec![3, 1]);
        assert_eq!(pool.node(b).links, ListLinks::default());

        list.unlink(&mut pool, c);
        assert_eq!(list.front(), Some(a));
        assert_eq!(list.back(), Some(a));

        list.unlink(&mut pool, a);
        assert!(list.is_empty());
        list.debug_validate_invariants(&pool);
    }

    #[test]
    fn two_lists_share_one_pool() {
        let mut pool = NodePool::new(4);
        let mut left = SlotList::new();
        let mut right = SlotList::new();
        let a = pool.acquire(item(1));
        let b = pool.acquire(item(2));
        let c = pool.acquire(item(3));
        left.push_front(&mut pool, a);
        right.push_front(&mut pool, b);
        left.push_front(&mut pool, c);

        assert_eq!(values(&left, &pool), vec![3, 1]);
        assert_eq!(values(&right, &pool), vec![2]);
        left.debug_validate_invariants(&pool);
        right.debug_validate_invariants(&pool);
    }
}
