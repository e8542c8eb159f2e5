//! Fixed-size node arena with a LIFO free-slot stack.
//!
//! Every slot is allocated up front; [`NodePool::acquire`] and
//! [`NodePool::release`] only move indices between the free stack and the
//! occupied set, so the pool never allocates after construction.
//!
//! ```text
//!   slots: [ Some(n0) | None | Some(n2) | None | None ]
//!   free:  [ 4, 3, 1 ]            ◄── top (next acquire returns slot 1)
//! ```
//!
//! The most recently released slot is reused first, which keeps recently
//! touched memory hot.

/// Stable handle to a slot in a [`NodePool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub(crate) usize);

#[derive(Debug)]
pub struct NodePool<T> {
    slots: Box<[Option<T>]>,
    free: Vec<SlotId>,
}

impl<T> NodePool<T> {
    /// Creates a pool with exactly `size` slots, all free.
    ///
    /// Slot 0 is handed out by the first [`acquire`](Self::acquire).
    pub fn new(size: usize) -> Self {
        let slots = std::iter::repeat_with(|| None).take(size).collect();
        let free = (0..size).rev().map(SlotId).collect();
        Self { slots, free }
    }

    /// Moves `value` into a free slot and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if no slot is free. Callers must reclaim space first.
    #[inline]
    pub fn acquire(&mut self, value: T) -> SlotId {
        let Some(id) = self.free.pop() else {
            panic!(
                "node pool exhausted: all {} slots are occupied",
                self.slots.len()
            );
        };
        debug_assert!(self.slots[id.0].is_none(), "free stack held a live slot");
        self.slots[id.0] = Some(value);
        id
    }

    /// Takes the value out of `id` and returns the slot to the free stack.
    ///
    /// Returns `None` (and leaves the free stack untouched) if the slot is
    /// already free or out of range.
    #[inline]
    pub fn release(&mut self, id: SlotId) -> Option<T> {
        let value = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id);
        Some(value)
    }

    #[inline]
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0).and_then(|slot| slot.as_ref())
    }

    /// Returns the live node at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` refers to a free slot; link structures must never hold
    /// such handles.
    #[inline]
    pub fn node(&self, id: SlotId) -> &T {
        match self.get(id) {
            Some(node) => node,
            None => panic!("stale SlotId {:?}: slot is free", id),
        }
    }

    /// Mutable counterpart of [`node`](Self::node).
    #[inline]
    pub fn node_mut(&mut self, id: SlotId) -> &mut T {
        match self.slots.get_mut(id.0).and_then(|slot| slot.as_mut()) {
            Some(node) => node,
            None => panic!("stale SlotId {:?}: slot is free", id),
        }
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    /// Number of occupied slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.free.len() == self.slots.len()
    }

    /// Number of slots available to [`acquire`](Self::acquire).
    #[inline]
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.free.is_empty()
    }

    /// Total slot count; fixed at construction.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_pool_acquire_release_reuse() {
        let mut pool = NodePool::new(4);
        assert_eq!(pool.free_len(), 4);
        assert!(pool.is_empty());

        let a = pool.acquire("a");
        let b = pool.acquire("b");
        assert_eq!(a, SlotId(0));
        assert_eq!(b, SlotId(1));
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get(a), Some(&"a"));

        assert_eq!(pool.release(a), Some("a"));
        assert!(!pool.contains(a));
        assert_eq!(pool.free_len(), 3);

        // Most recently released slot comes back first.
        let c = pool.acquire("c");
        assert_eq!(c, a);
        assert_eq!(pool.node(c), &"c");
    }

    #[test]
    fn node_pool_double_release_is_ignored() {
        let mut pool = NodePool::new(2);
        let a = pool.acquire(1u32);
        assert_eq!(pool.release(a), Some(1));
        assert_eq!(pool.release(a), None);
        assert_eq!(pool.free_len(), 2);
        assert_eq!(pool.release(SlotId(99)), None);
    }

    #[test]
    fn node_pool_fill_to_capacity() {
        let mut pool = NodePool::new(3);
        for i in 0..3 {
            pool.acquire(i);
        }
        assert!(pool.is_full());
        assert_eq!(pool.len(), pool.capacity());
        for i in 0..3 {
            assert_eq!(pool.get(SlotId(i)), Some(&i));
        }
    }

    #[test]
    #[should_panic(expected = "node pool exhausted")]
    fn node_pool_acquire_when_full_panics() {
        let mut pool = NodePool::new(1);
        pool.acquire(1);
        pool.acquire(2);
    }

    #[test]
    #[should_panic(expected = "stale SlotId")]
    fn node_pool_node_on_free_slot_panics() {
        let pool: NodePool<u8> = NodePool::new(1);
        let _ = pool.node(SlotId(0));
    }

    #[test]
    fn node_pool_node_mut_updates_value() {
        let mut pool = NodePool::new(1);
        let id = pool.acquire(10);
        *pool.node_mut(id) = 20;
        *pool.node_mut(id) += 1;
        assert_eq!(pool.get(id), Some(&21));
    }
}
