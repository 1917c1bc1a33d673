use super::traits::SectionMap;
use crate::error::{GridError, GridResult, check_move, check_range};

/// Every section has the same size.
///
/// All queries are O(1). Requests to resize an individual section fail with
/// [`GridError::UniformSections`] unless they ask for the size it already has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformSectionMap {
    count: usize,
    size: u32,
}

impl UniformSectionMap {
    pub fn new(count: usize, size: u32) -> Self {
        Self { count, size }
    }
}

impl SectionMap for UniformSectionMap {
    fn count(&self) -> usize {
        self.count
    }

    fn total_size(&self) -> u64 {
        self.count as u64 * u64::from(self.size)
    }

    fn section_position(&self, index: usize) -> u64 {
        index.min(self.count) as u64 * u64::from(self.size)
    }

    fn section_size(&self, index: usize) -> u32 {
        if index < self.count { self.size } else { 0 }
    }

    fn section_at(&self, position: u64) -> Option<usize> {
        if self.size == 0 || position >= self.total_size() {
            return None;
        }
        Some((position / u64::from(self.size)) as usize)
    }

    fn insert_sections(&mut self, start: usize, count: usize) -> GridResult<()> {
        check_range("section", start, start, self.count)?;
        self.count += count;
        Ok(())
    }

    fn remove_sections(&mut self, start: usize, count: usize) -> GridResult<()> {
        check_range("section", start, start + count, self.count)?;
        self.count -= count;
        Ok(())
    }

    fn move_sections(&mut self, start: usize, count: usize, destination: usize) -> GridResult<()> {
        check_move("section", start, start + count, destination, self.count)
    }

    fn reset(&mut self, count: usize) {
        self.count = count;
    }

    fn set_section_size(&mut self, index: usize, size: u32) -> GridResult<()> {
        check_range("section", index, index + 1, self.count)?;
        if size == self.size {
            return Ok(());
        }
        Err(GridError::UniformSections)
    }

    fn default_size(&self) -> u32 {
        self.size
    }

    fn supports_per_section_sizes(&self) -> bool {
        false
    }
}
