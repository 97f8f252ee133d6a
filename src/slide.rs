//! Sliding a run of elements inside a slice.

use core::ops::Range;

/// Moves `slice[run]` so that it starts at the gap `dest`.
///
/// `dest` is a gap index of the slice before the move (`0..=slice.len()`).
/// Returns the range of the slice whose elements changed places, i.e. the
/// window that needs its position indices refreshed. The window is empty when
/// `dest` lies inside or at the edges of `run`.
///
/// ```text
/// [a b c d e], run = 1..3, dest = 4  =>  [a d b c e], window = 1..4
/// [a b c d e], run = 3..4, dest = 0  =>  [d a b c e], window = 0..4
/// ```
///
/// # Panics
///
/// Panics if `run` or `dest` is out of bounds.
pub(crate) fn slide<E>(slice: &mut [E], run: Range<usize>, dest: usize) -> Range<usize> {
    assert!(
        run.start <= run.end && run.end <= slice.len() && dest <= slice.len(),
        "[precondition] the run and the destination must be inside the slice"
    );
    if dest < run.start {
        // Elements in `dest..run.start` shift right behind the run.
        slice[dest..run.end].rotate_right(run.end - run.start);
        dest..run.end
    } else if run.end < dest {
        // Elements in `run.end..dest` shift left in front of the run.
        slice[run.start..dest].rotate_left(run.end - run.start);
        run.start..dest
    } else {
        run.start..run.start
    }
}
