//! Geometry invariants of both section maps under random edit sequences.

use canvas_grid::section::{SectionList, SectionMap, UniformSectionMap};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Edit {
    Insert { at: usize, count: usize },
    Remove { at: usize, count: usize },
    Move { at: usize, count: usize, to: usize },
    Resize { at: usize, size: u32 },
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (any::<usize>(), 0usize..6).prop_map(|(at, count)| Edit::Insert { at, count }),
        (any::<usize>(), 0usize..6).prop_map(|(at, count)| Edit::Remove { at, count }),
        (any::<usize>(), 0usize..6, any::<usize>())
            .prop_map(|(at, count, to)| Edit::Move { at, count, to }),
        (any::<usize>(), 0u32..60).prop_map(|(at, size)| Edit::Resize { at, size }),
    ]
}

/// Apply `edit` to both the map and a plain vector of sizes, choosing
/// in-bounds arguments from the raw values.
fn apply(map: &mut dyn SectionMap, sizes: &mut Vec<u32>, edit: &Edit) {
    let len = sizes.len();
    match *edit {
        Edit::Insert { at, count } => {
            let at = at % (len + 1);
            map.insert_sections(at, count).unwrap();
            let default = map.default_size();
            sizes.splice(at..at, std::iter::repeat_n(default, count));
        }
        Edit::Remove { at, count } => {
            let at = at % (len + 1);
            let count = count.min(len - at);
            map.remove_sections(at, count).unwrap();
            sizes.drain(at..at + count);
        }
        Edit::Move { at, count, to } => {
            let at = at % (len + 1);
            let count = count.min(len - at);
            let to = to % (len - count + 1);
            map.move_sections(at, count, to).unwrap();
            let block: Vec<u32> = sizes.drain(at..at + count).collect();
            sizes.splice(to..to, block);
        }
        Edit::Resize { at, size } => {
            if len == 0 {
                return;
            }
            let at = at % len;
            map.set_section_size(at, size).unwrap();
            sizes[at] = size;
        }
    }
}

fn check(map: &dyn SectionMap, sizes: &[u32]) {
    assert_eq!(map.count(), sizes.len());

    let mut position = 0u64;
    for (index, &size) in sizes.iter().enumerate() {
        assert_eq!(map.section_position(index), position, "position of {index}");
        assert_eq!(map.section_size(index), size, "size of {index}");
        if size > 0 {
            assert_eq!(map.section_at(position), Some(index));
            assert_eq!(map.section_at(position + u64::from(size) - 1), Some(index));
        }
        position += u64::from(size);
    }

    assert_eq!(map.total_size(), position);
    assert_eq!(map.section_position(sizes.len()), position);
    assert_eq!(map.section_size(sizes.len()), 0);
    assert_eq!(map.section_at(position), None);
}

proptest! {
    #[test]
    fn section_list_stays_contiguous(
        initial in proptest::collection::vec(0u32..60, 0..20),
        edits in proptest::collection::vec(edit(), 0..40),
    ) {
        let mut map = SectionList::from_sizes(initial.clone(), 24);
        let mut sizes = initial;
        check(&map, &sizes);
        for edit in &edits {
            apply(&mut map, &mut sizes, edit);
            check(&map, &sizes);
        }
    }

    #[test]
    fn uniform_map_stays_contiguous(
        count in 0usize..50,
        size in 1u32..40,
        edits in proptest::collection::vec(edit(), 0..40),
    ) {
        let mut map = UniformSectionMap::new(count, size);
        let mut sizes = vec![size; count];
        for edit in edits.iter().filter(|e| !matches!(e, Edit::Resize { .. })) {
            apply(&mut map, &mut sizes, edit);
            check(&map, &sizes);
        }
    }

    #[test]
    fn visible_range_covers_exactly_the_overlapping_sections(
        sizes in proptest::collection::vec(0u32..60, 0..30),
        offset in 0u64..1200,
        extent in 0u64..400,
    ) {
        let map = SectionList::from_sizes(sizes.clone(), 24);
        let visible = map.visible_range(offset, extent);

        let mut position = 0u64;
        for (index, &size) in sizes.iter().enumerate() {
            let end = position + u64::from(size);
            if size > 0 {
                let overlaps = position < offset + extent && offset < end;
                prop_assert_eq!(visible.contains(&index), overlaps, "section {}", index);
            }
            position = end;
        }
    }
}

#[test]
fn out_of_range_queries_are_documented_values() {
    let map = SectionList::from_sizes(vec![10, 0, 5], 24);
    assert_eq!(map.section_position(7), 15);
    assert_eq!(map.section_size(7), 0);
    assert_eq!(map.section_at(15), None);
    assert_eq!(map.section_at(10), Some(2));
}

#[test]
fn invalid_edits_leave_the_map_untouched() {
    let mut map = SectionList::new(5, 10);
    assert!(map.insert_sections(6, 1).is_err());
    assert!(map.remove_sections(3, 3).is_err());
    assert!(map.move_sections(0, 2, 4).is_err());
    assert!(map.set_section_size(5, 1).is_err());
    check(&map, &[10; 5]);

    let mut uniform = UniformSectionMap::new(5, 10);
    assert!(uniform.set_section_size(1, 11).is_err());
    assert!(uniform.set_section_size(1, 10).is_ok());
    check(&uniform, &[10; 5]);
}
