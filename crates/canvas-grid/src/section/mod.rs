//! Section geometry: index to pixel mapping along one axis.
//!
//! Rows and columns are both "sections". A [`SectionMap`] answers where a
//! section starts, how large it is and which section covers a pixel, and
//! applies the structural edits announced by a model.
//!
//! | Map | Sizes | Lookup | Structural edit |
//! |---|---|---|---|
//! | [`UniformSectionMap`] | one size | O(1) | O(1) |
//! | [`SectionList`] | per section | O(log n) | O(n) |
//!
//! ```
//! use canvas_grid::section::{SectionList, SectionMap};
//!
//! let mut rows = SectionList::new(10, 24);
//! rows.insert_sections(5, 3).unwrap();
//! assert_eq!(rows.count(), 13);
//! assert_eq!(rows.section_at(8 * 24), Some(8));
//! ```

mod list;
mod traits;
mod uniform;

pub use list::SectionList;
pub use traits::SectionMap;
pub use uniform::UniformSectionMap;
