//! Repeat policy
//!
//! Pure index arithmetic: given a queue length, the cursor index and the
//! repeat mode, decide where "next" and "previous" land. Shuffle is not a
//! concern here because the queue store already holds the shuffled order.

use crate::types::RepeatMode;

/// Outcome of one navigation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Stay on the same index (RepeatOne)
    Stay(usize),

    /// Move to a neighbouring index
    Move(usize),

    /// Crossed the queue boundary and wrapped around (RepeatAll)
    Wrap(usize),

    /// No entry in that direction
    End,
}

impl Step {
    /// Target index, if any
    pub fn index(self) -> Option<usize> {
        match self {
            Step::Stay(i) | Step::Move(i) | Step::Wrap(i) => Some(i),
            Step::End => None,
        }
    }

    pub fn is_wrap(self) -> bool {
        matches!(self, Step::Wrap(_))
    }
}

/// Where "next" lands from `index` in a queue of `len` entries
///
/// Returns [`Step::End`] for an empty queue or an index outside it.
pub fn step_forward(len: usize, index: usize, repeat: RepeatMode) -> Step {
    if index >= len {
        return Step::End;
    }
    match repeat {
        RepeatMode::One => Step::Stay(index),
        _ if index + 1 < len => Step::Move(index + 1),
        RepeatMode::All => Step::Wrap(0),
        RepeatMode::Off => Step::End,
    }
}

/// Where "previous" lands from `index` in a queue of `len` entries
pub fn step_backward(len: usize, index: usize, repeat: RepeatMode) -> Step {
    if index >= len {
        return Step::End;
    }
    match repeat {
        RepeatMode::One => Step::Stay(index),
        _ if index > 0 => Step::Move(index - 1),
        RepeatMode::All => Step::Wrap(len - 1),
        RepeatMode::Off => Step::End,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_off_stops_at_end() {
        assert_eq!(step_forward(3, 0, RepeatMode::Off), Step::Move(1));
        assert_eq!(step_forward(3, 2, RepeatMode::Off), Step::End);
    }

    #[test]
    fn forward_all_wraps_to_start() {
        assert_eq!(step_forward(3, 2, RepeatMode::All), Step::Wrap(0));
        assert_eq!(step_forward(1, 0, RepeatMode::All), Step::Wrap(0));
    }

    #[test]
    fn forward_one_stays() {
        assert_eq!(step_forward(3, 1, RepeatMode::One), Step::Stay(1));
    }

    #[test]
    fn backward_off_has_nothing_before_first() {
        assert_eq!(step_backward(3, 0, RepeatMode::Off), Step::End);
        assert_eq!(step_backward(3, 2, RepeatMode::Off), Step::Move(1));
    }

    #[test]
    fn backward_all_wraps_to_last() {
        assert_eq!(step_backward(3, 0, RepeatMode::All), Step::Wrap(2));
    }

    #[test]
    fn backward_one_stays() {
        assert_eq!(step_backward(3, 0, RepeatMode::One), Step::Stay(0));
    }

    #[test]
    fn invalid_input_is_end() {
        assert_eq!(step_forward(0, 0, RepeatMode::All), Step::End);
        assert_eq!(step_backward(2, 5, RepeatMode::All), Step::End);
    }
}
