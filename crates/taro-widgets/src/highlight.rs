//! Keyboard highlight navigation over a filtered option list.
//!
//! The highlight is `Option<usize>`: `None` means no row is highlighted
//! (the empty-list or all-disabled case).  Whenever it is `Some(i)`, the row
//! at `i` is guaranteed non-disabled.  Movement wraps around both ends and
//! skips disabled rows, bounded by one full cycle so an all-disabled list
//! leaves the highlight untouched instead of spinning.

/// Direction of a highlight move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Advance the highlight one step with wraparound, skipping disabled rows.
///
/// `is_disabled` is queried with indices in `0..len`.  Returns the existing
/// highlight unchanged when the list is empty or every row is disabled.
pub fn step(
    len: usize,
    current: Option<usize>,
    direction: Direction,
    is_disabled: impl Fn(usize) -> bool,
) -> Option<usize> {
    if len == 0 {
        return None;
    }

    let start = match (current, direction) {
        (Some(i), Direction::Forward) => (i + 1) % len,
        (Some(i), Direction::Backward) => (i + len - 1) % len,
        (None, Direction::Forward) => 0,
        (None, Direction::Backward) => len - 1,
    };

    let mut candidate = start;
    for _ in 0..len {
        if !is_disabled(candidate) {
            return Some(candidate);
        }
        candidate = match direction {
            Direction::Forward => (candidate + 1) % len,
            Direction::Backward => (candidate + len - 1) % len,
        };
    }
    current
}

/// First non-disabled index, if any.
pub fn first_eligible(len: usize, is_disabled: impl Fn(usize) -> bool) -> Option<usize> {
    (0..len).find(|&i| !is_disabled(i))
}

/// Last non-disabled index, if any.
pub fn last_eligible(len: usize, is_disabled: impl Fn(usize) -> bool) -> Option<usize> {
    (0..len).rev().find(|&i| !is_disabled(i))
}

/// Adjust a scroll offset so that `highlighted` is visible in a window of
/// `visible` rows, moving the window as little as possible ("nearest"
/// semantics: no movement if the row is already in view).
pub fn scroll_into_view(offset: usize, highlighted: usize, visible: usize) -> usize {
    if visible == 0 {
        return offset;
    }
    if highlighted < offset {
        highlighted
    } else if highlighted >= offset + visible {
        highlighted + 1 - visible
    } else {
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE_DISABLED: fn(usize) -> bool = |_| false;

    #[test]
    fn forward_wraps() {
        assert_eq!(step(3, Some(2), Direction::Forward, NONE_DISABLED), Some(0));
        assert_eq!(step(3, Some(0), Direction::Forward, NONE_DISABLED), Some(1));
    }

    #[test]
    fn backward_wraps() {
        assert_eq!(
            step(3, Some(0), Direction::Backward, NONE_DISABLED),
            Some(2)
        );
    }

    #[test]
    fn from_none_forward_starts_at_zero() {
        assert_eq!(step(3, None, Direction::Forward, NONE_DISABLED), Some(0));
    }

    #[test]
    fn from_none_backward_starts_at_end() {
        assert_eq!(step(3, None, Direction::Backward, NONE_DISABLED), Some(2));
    }

    #[test]
    fn skips_disabled_forward() {
        // rows: [enabled, disabled, enabled]
        let disabled = |i: usize| i == 1;
        assert_eq!(step(3, Some(0), Direction::Forward, disabled), Some(2));
    }

    #[test]
    fn skips_disabled_backward() {
        let disabled = |i: usize| i == 1;
        assert_eq!(step(3, Some(2), Direction::Backward, disabled), Some(0));
    }

    #[test]
    fn all_disabled_leaves_highlight_unchanged() {
        assert_eq!(step(3, None, Direction::Forward, |_| true), None);
        assert_eq!(step(3, Some(1), Direction::Forward, |_| true), Some(1));
    }

    #[test]
    fn empty_list_is_none() {
        assert_eq!(step(0, None, Direction::Forward, NONE_DISABLED), None);
        assert_eq!(step(0, Some(5), Direction::Backward, NONE_DISABLED), None);
    }

    #[test]
    fn first_and_last_eligible() {
        let disabled = |i: usize| i == 0 || i == 3;
        assert_eq!(first_eligible(4, disabled), Some(1));
        assert_eq!(last_eligible(4, disabled), Some(2));
        assert_eq!(first_eligible(4, |_| true), None);
        assert_eq!(last_eligible(0, NONE_DISABLED), None);
    }

    #[test]
    fn scroll_nearest_no_move_when_visible() {
        assert_eq!(scroll_into_view(2, 4, 5), 2);
    }

    #[test]
    fn scroll_up_to_reveal() {
        assert_eq!(scroll_into_view(5, 2, 4), 2);
    }

    #[test]
    fn scroll_down_to_reveal() {
        assert_eq!(scroll_into_view(0, 6, 4), 3);
    }
}
