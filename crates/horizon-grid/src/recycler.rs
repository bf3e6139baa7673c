//! Pools of detached views keyed by item type.

use horizon_grid_core::logging::targets;

use crate::bridge::ViewHandle;

/// Detached views waiting to be rebound, one pool per item type.
///
/// A pooled view is never referenced by a [`GridItem`](crate::layout::GridItem):
/// items give up their view before it is offered here.
#[derive(Debug, Clone, Default)]
pub struct ViewRecycler {
    pools: Vec<Vec<ViewHandle>>,
    limit: usize,
}

impl ViewRecycler {
    /// Create a recycler with `type_count` pools of at most `limit` views each.
    pub fn new(type_count: usize, limit: usize) -> Self {
        Self {
            pools: vec![Vec::new(); type_count],
            limit,
        }
    }

    #[inline]
    pub fn type_count(&self) -> usize {
        self.pools.len()
    }

    /// Number of pooled views of one type.
    pub fn pooled(&self, view_type: usize) -> usize {
        self.pools.get(view_type).map_or(0, Vec::len)
    }

    /// Number of pooled views across all types.
    pub fn len(&self) -> usize {
        self.pools.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.iter().all(Vec::is_empty)
    }

    /// Take a pooled view of `view_type`, most recently pooled first.
    pub fn take(&mut self, view_type: usize) -> Option<ViewHandle> {
        let Some(pool) = self.pools.get_mut(view_type) else {
            tracing::warn!(
                target: targets::RECYCLER,
                view_type,
                type_count = self.pools.len(),
                "take: item type out of range"
            );
            return None;
        };
        let view = pool.pop();
        if let Some(view) = view {
            tracing::trace!(target: targets::RECYCLER, view_type, view = view.id(), "reused view");
        }
        view
    }

    /// Offer a view to the pool.
    ///
    /// # Errors
    ///
    /// Hands the view back when the pool is full or the type is out of range;
    /// the caller discards it.
    pub fn put(&mut self, view_type: usize, view: ViewHandle) -> Result<(), ViewHandle> {
        let type_count = self.pools.len();
        let Some(pool) = self.pools.get_mut(view_type) else {
            tracing::warn!(target: targets::RECYCLER, view_type, type_count, "put: item type out of range");
            return Err(view);
        };
        if pool.len() >= self.limit {
            return Err(view);
        }
        debug_assert!(!pool.contains(&view), "view pooled twice");
        pool.push(view);
        tracing::trace!(target: targets::RECYCLER, view_type, view = view.id(), "pooled view");
        Ok(())
    }

    /// Empty every pool, returning `(type, view)` pairs.
    pub fn drain(&mut self) -> Vec<(usize, ViewHandle)> {
        self.pools
            .iter_mut()
            .enumerate()
            .flat_map(|(view_type, pool)| pool.drain(..).map(move |view| (view_type, view)))
            .collect()
    }

    /// Resize to a new type count. Views of dropped types are returned.
    pub fn set_type_count(&mut self, type_count: usize) -> Vec<(usize, ViewHandle)> {
        let mut dropped = Vec::new();
        if type_count < self.pools.len() {
            for (offset, pool) in self.pools.drain(type_count..).enumerate() {
                dropped.extend(pool.into_iter().map(|view| (type_count + offset, view)));
            }
        } else {
            self.pools.resize_with(type_count, Vec::new);
        }
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_returns_pooled_view_of_same_type() {
        let mut recycler = ViewRecycler::new(2, 4);
        recycler.put(1, ViewHandle::new(10)).unwrap();

        assert_eq!(recycler.take(0), None);
        assert_eq!(recycler.take(1), Some(ViewHandle::new(10)));
        assert_eq!(recycler.take(1), None);
    }

    #[test]
    fn test_put_overflow_hands_view_back() {
        let mut recycler = ViewRecycler::new(1, 1);
        assert!(recycler.put(0, ViewHandle::new(1)).is_ok());
        assert_eq!(recycler.put(0, ViewHandle::new(2)), Err(ViewHandle::new(2)));
        assert_eq!(recycler.pooled(0), 1);
    }

    #[test]
    fn test_out_of_range_type_is_refused() {
        let mut recycler = ViewRecycler::new(1, 8);
        assert_eq!(recycler.put(3, ViewHandle::new(1)), Err(ViewHandle::new(1)));
        assert_eq!(recycler.take(3), None);
    }

    #[test]
    fn test_drain_empties_all_pools() {
        let mut recycler = ViewRecycler::new(2, 8);
        recycler.put(0, ViewHandle::new(1)).unwrap();
        recycler.put(1, ViewHandle::new(2)).unwrap();

        let mut drained = recycler.drain();
        drained.sort();
        assert_eq!(drained, vec![(0, ViewHandle::new(1)), (1, ViewHandle::new(2))]);
        assert!(recycler.is_empty());
    }

    #[test]
    fn test_shrinking_type_count_returns_views() {
        let mut recycler = ViewRecycler::new(3, 8);
        recycler.put(2, ViewHandle::new(5)).unwrap();
        assert_eq!(recycler.set_type_count(2), vec![(2, ViewHandle::new(5))]);
        assert_eq!(recycler.type_count(), 2);
    }
}
