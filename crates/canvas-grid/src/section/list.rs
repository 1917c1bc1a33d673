use canvas_grid_core::logging::targets;

use super::traits::SectionMap;
use crate::error::{GridResult, check_move, check_range};

/// Per-section sizes with logarithmic queries.
///
/// Sizes are kept alongside a Fenwick tree of their prefix sums, so
/// `section_position`, `section_at` and `set_section_size` are O(log n).
/// Insertions, removals and moves rebuild the tree in O(n).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionList {
    sizes: Vec<u32>,
    /// 1-based Fenwick tree; `tree[0]` is unused.
    tree: Vec<u64>,
    default_size: u32,
}

impl SectionList {
    /// `count` sections of `default_size`.
    pub fn new(count: usize, default_size: u32) -> Self {
        Self::from_sizes(vec![default_size; count], default_size)
    }

    /// Sections with explicit sizes; `default_size` applies to later insertions.
    pub fn from_sizes(sizes: impl Into<Vec<u32>>, default_size: u32) -> Self {
        let mut list = Self {
            sizes: sizes.into(),
            tree: Vec::new(),
            default_size,
        };
        list.rebuild();
        list
    }

    /// Sizes of all sections, in order.
    pub fn sizes(&self) -> &[u32] {
        &self.sizes
    }

    fn rebuild(&mut self) {
        let n = self.sizes.len();
        self.tree.clear();
        self.tree.resize(n + 1, 0);
        for (i, &size) in self.sizes.iter().enumerate() {
            self.tree[i + 1] += u64::from(size);
        }
        for i in 1..=n {
            let parent = i + lowest_bit(i);
            if parent <= n {
                self.tree[parent] += self.tree[i];
            }
        }
    }

    /// Sum of the first `index` sizes.
    fn prefix(&self, index: usize) -> u64 {
        let mut i = index.min(self.sizes.len());
        let mut sum = 0;
        while i > 0 {
            sum += self.tree[i];
            i -= lowest_bit(i);
        }
        sum
    }

    fn adjust(&mut self, index: usize, old: u32, new: u32) {
        let mut i = index + 1;
        while i < self.tree.len() {
            self.tree[i] = self.tree[i] - u64::from(old) + u64::from(new);
            i += lowest_bit(i);
        }
    }
}

fn lowest_bit(i: usize) -> usize {
    i & i.wrapping_neg()
}

impl SectionMap for SectionList {
    fn count(&self) -> usize {
        self.sizes.len()
    }

    fn total_size(&self) -> u64 {
        self.prefix(self.sizes.len())
    }

    fn section_position(&self, index: usize) -> u64 {
        self.prefix(index)
    }

    fn section_size(&self, index: usize) -> u32 {
        self.sizes.get(index).copied().unwrap_or(0)
    }

    fn section_at(&self, position: u64) -> Option<usize> {
        let n = self.sizes.len();
        if n == 0 {
            return None;
        }
        // Largest `pos` with prefix(pos) <= position.
        let mut pos = 0;
        let mut remaining = position;
        let mut step: usize = 1 <<(usize::BITS - 1 - n.leading_zeros());
        while step > 0 {
            let next = pos + step;
            if next <= n && self.tree[next] <= remaining {
                pos = next;
                remaining -= self.tree[next];
            }
            step >>= 1;
        }
        (pos < n).then_some(pos)
    }

    fn insert_sections(&mut self, start: usize, count: usize) -> GridResult<()> {
        check_range("section", start, start, self.sizes.len())?;
        let default_size = self.default_size;
        self.sizes
            .splice(start..start, std::iter::repeat_n(default_size, count));
        self.rebuild();
        Ok(())
    }

    fn remove_sections(&mut self, start: usize, count: usize) -> GridResult<()> {
        check_range("section", start, start + count, self.sizes.len())?;
        self.sizes.drain(start..start + count);
        self.rebuild();
        Ok(())
    }

    fn move_sections(&mut self, start: usize, count: usize, destination: usize) -> GridResult<()> {
        check_move("section", start, start + count, destination, self.sizes.len())?;
        if count == 0 || start == destination {
            return Ok(());
        }
        let block: Vec<u32> = self.sizes.drain(start..start + count).collect();
        self.sizes.splice(destination..destination, block);
        self.rebuild();
        Ok(())
    }

    fn reset(&mut self, count: usize) {
        self.sizes.clear();
        self.sizes.resize(count, self.default_size);
        self.rebuild();
    }

    fn set_section_size(&mut self, index: usize, size: u32) -> GridResult<()> {
        check_range("section", index, index + 1, self.sizes.len())?;
        let old = std::mem::replace(&mut self.sizes[index], size);
        if old != size {
            tracing::trace!(target: targets::SECTION, index, old, size, "section resized");
            self.adjust(index, old, size);
        }
        Ok(())
    }

    fn default_size(&self) -> u32 {
        self.default_size
    }

    fn supports_per_section_sizes(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_follow_sizes() {
        let list = SectionList::from_sizes(vec![10, 20, 0, 5, 15], 10);
        assert_eq!(list.total_size(), 50);
        let positions: Vec<u64> = (0..=5).map(|i| list.section_position(i)).collect();
        assert_eq!(positions, vec![0, 10, 30, 30, 35, 50]);
    }

    #[test]
    fn test_section_at_skips_zero_size() {
        let list = SectionList::from_sizes(vec![10, 20, 0, 5, 15], 10);
        assert_eq!(list.section_at(0), Some(0));
        assert_eq!(list.section_at(9), Some(0));
        assert_eq!(list.section_at(10), Some(1));
        assert_eq!(list.section_at(29), Some(1));
        assert_eq!(list.section_at(30), Some(3));
        assert_eq!(list.section_at(49), Some(4));
        assert_eq!(list.section_at(50), None);
    }

    #[test]
    fn test_resize_updates_following_positions() {
        let mut list = SectionList::new(100, 24);
        list.set_section_size(10, 100).unwrap();
        assert_eq!(list.section_position(11), 10 * 24 + 100);
        assert_eq!(list.section_at(10 * 24 + 99), Some(10));
        assert_eq!(list.total_size(), 99 * 24 + 100);
        assert!(list.set_section_size(100, 1).is_err());
    }

    #[test]
    fn test_insert_rows_shifts_following_sections() {
        let mut list = SectionList::new(10, 24);
        list.set_section_size(5, 40).unwrap();
        list.insert_sections(5, 3).unwrap();

        assert_eq!(list.count(), 13);
        assert_eq!(list.sizes()[8], 40);
        assert_eq!(list.section_position(8), 8 * 24);
        assert_eq!(list.section_at(8 * 24), Some(8));
    }

    #[test]
    fn test_move_and_remove() {
        let mut list = SectionList::from_sizes(vec![1, 2, 3, 4, 5], 1);
        list.move_sections(0, 2, 3).unwrap();
        assert_eq!(list.sizes(), &[3, 4, 5, 1, 2]);
        assert_eq!(list.section_position(3), 12);

        list.remove_sections(1, 2).unwrap();
        assert_eq!(list.sizes(), &[3, 1, 2]);
        assert_eq!(list.total_size(), 6);
        assert!(list.move_sections(0, 2, 2).is_err());
    }

    #[test]
    fn test_reset_and_empty() {
        let mut list = SectionList::from_sizes(vec![7, 8], 3);
        list.reset(0);
        assert_eq!(list.section_at(0), None);
        assert_eq!(list.section_position(0), 0);
        list.reset(4);
        assert_eq!(list.total_size(), 12);
    }
}
