//! Queue store
//!
//! Ordered list of queue entries plus the "now playing" cursor.
//!
//! ```text
//! original (insertion order):  A  B  C  D  E
//! active (shuffled view):      C  A  E  B  D
//!                                 ^ cursor = A's QueueId, index re-resolved on read
//! ```
//!
//! The cursor is a [`QueueId`], never a raw index, so reorder and removal of
//! other entries cannot make it point at the wrong track.

use crate::error::{PlaybackError, Result};
use crate::policy::{self, Step};
use crate::shuffle::{draw_cycle, shuffle_pinned};
use crate::types::{QueueEntry, QueueId, RepeatMode, Track};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Result of removing an entry
#[derive(Debug, Clone, PartialEq)]
pub struct Removal {
    /// The entry that was removed
    pub entry: QueueEntry,

    /// Whether the removed entry was the cursor
    pub was_current: bool,

    /// The queue emptied under the cursor; playback must stop
    pub stop: bool,
}

/// Queue of tracks with shuffle support
#[derive(Debug, Clone)]
pub struct Queue {
    /// Active play order (shuffled while shuffle is on)
    entries: Vec<QueueEntry>,

    /// Insertion order, kept only while shuffled
    original: Option<Vec<QueueEntry>>,

    /// Current entry
    cursor: Option<QueueId>,

    /// Entries played in this shuffle session (most recent = back)
    shuffle_history: VecDeque<QueueId>,

    /// Entry whose end already triggered a fresh shuffled cycle
    cycle_drawn_for: Option<QueueId>,

    /// Next queue-local identity to hand out
    next_id: u64,

    rng: StdRng,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create a queue with a deterministic shuffle sequence
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            entries: Vec::new(),
            original: None,
            cursor: None,
            shuffle_history: VecDeque::new(),
            cycle_drawn_for: None,
            next_id: 0,
            rng,
        }
    }

    // ===== Inspection =====

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in play order
    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    /// Entries in insertion order (differs from [`Self::entries`] while shuffled)
    pub fn original_order(&self) -> &[QueueEntry] {
        self.original.as_deref().unwrap_or(&self.entries)
    }

    pub fn is_shuffled(&self) -> bool {
        self.original.is_some()
    }

    /// Entries already played in the current shuffle session (oldest first)
    pub fn shuffle_history(&self) -> impl Iterator<Item = QueueId> + '_ {
        self.shuffle_history.iter().copied()
    }

    pub fn get(&self, id: QueueId) -> Option<&QueueEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn contains(&self, id: QueueId) -> bool {
        self.get(id).is_some()
    }

    /// Current index of an entry
    pub fn index_of(&self, id: QueueId) -> Result<usize> {
        self.entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(PlaybackError::UnknownEntry(id))
    }

    /// Identity of the entry at `index`
    pub fn id_at(&self, index: usize) -> Result<QueueId> {
        self.entries
            .get(index)
            .map(|entry| entry.id)
            .ok_or(PlaybackError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
    }

    /// Identity of the current entry
    pub fn cursor(&self) -> Option<QueueId> {
        self.cursor
    }

    /// Index of the current entry, resolved now
    pub fn cursor_index(&self) -> Option<usize> {
        let cursor = self.cursor?;
        self.entries.iter().position(|entry| entry.id == cursor)
    }

    /// Current entry
    pub fn current(&self) -> Option<&QueueEntry> {
        self.get(self.cursor?)
    }

    /// Up to `count` entries after the cursor (from the start if none)
    pub fn upcoming(&self, count: usize) -> &[QueueEntry] {
        let start = self.cursor_index().map_or(0, |index| index + 1);
        let end = (start + count).min(self.entries.len());
        &self.entries[start.min(end)..end]
    }

    /// Sum of all known track durations
    pub fn total_duration(&self) -> Duration {
        self.entries.iter().map(|entry| entry.track.duration).sum()
    }

    // ===== Mutation =====

    fn make_entry(&mut self, track: Arc<Track>) -> QueueEntry {
        let id = QueueId::new(self.next_id);
        self.next_id += 1;
        QueueEntry { id, track }
    }

    /// Add a track at the end of the queue
    pub fn append(&mut self, track: impl Into<Arc<Track>>) -> QueueId {
        let entry = self.make_entry(track.into());
        let id = entry.id;
        if let Some(original) = &mut self.original {
            original.push(entry.clone());
        }
        self.entries.push(entry);
        id
    }

    /// Add several tracks at the end, in order
    pub fn extend<I, T>(&mut self, tracks: I) -> Vec<QueueId>
    where
        I: IntoIterator<Item = T>,
        T: Into<Arc<Track>>,
    {
        tracks.into_iter().map(|track| self.append(track)).collect()
    }

    /// Insert a track so it plays right after the current one
    ///
    /// Without a cursor the track goes to the front.
    pub fn insert_after_current(&mut self, track: impl Into<Arc<Track>>) -> QueueId {
        let entry = self.make_entry(track.into());
        let id = entry.id;
        let cursor = self.cursor;

        if let Some(original) = &mut self.original {
            let at = cursor
                .and_then(|c| original.iter().position(|e| e.id == c))
                .map_or(0, |index| index + 1);
            original.insert(at, entry.clone());
        }

        let at = self.cursor_index().map_or(0, |index| index + 1);
        self.entries.insert(at, entry);
        id
    }

    /// Remove an entry by identity
    ///
    /// When the current entry goes, the cursor moves to what would have
    /// played next under `repeat` (RepeatOne counts as Off here, since its
    /// "next" is the entry being removed), falling back to the previous
    /// entry at the end of the queue.
    pub fn remove(&mut self, id: QueueId, repeat: RepeatMode) -> Result<Removal> {
        let index = self.index_of(id)?;
        let was_current = self.cursor == Some(id);
        let len = self.entries.len();

        let successor = if was_current {
            let mode = match repeat {
                RepeatMode::One => RepeatMode::Off,
                other => other,
            };
            policy::step_forward(len, index, mode)
                .index()
                .filter(|&i| i != index)
                .or_else(|| {
                    policy::step_backward(len, index, mode)
                        .index()
                        .filter(|&i| i != index)
                })
                .map(|i| self.entries[i].id)
        } else {
            None
        };

        let entry = self.entries.remove(index);
        if let Some(original) = &mut self.original {
            original.retain(|e| e.id != id);
        }
        self.shuffle_history.retain(|&played| played != id);
        if self.cycle_drawn_for == Some(id) {
            self.cycle_drawn_for = None;
        }

        if was_current {
            self.cursor = successor;
            self.cycle_drawn_for = None;
        }

        Ok(Removal {
            entry,
            was_current,
            stop: was_current && self.cursor.is_none(),
        })
    }

    /// Move an entry to `new_index` in the play order
    ///
    /// The cursor keeps pointing at the same entry.
    pub fn move_entry(&mut self, id: QueueId, new_index: usize) -> Result<()> {
        let len = self.entries.len();
        if new_index >= len {
            return Err(PlaybackError::IndexOutOfRange {
                index: new_index,
                len,
            });
        }
        let from = self.index_of(id)?;
        if from != new_index {
            let entry = self.entries.remove(from);
            self.entries.insert(new_index, entry);
        }
        Ok(())
    }

    /// Clear entire queue
    ///
    /// Shuffle stays switched on if it was.
    pub fn clear(&mut self) {
        self.entries.clear();
        if let Some(original) = &mut self.original {
            original.clear();
        }
        self.cursor = None;
        self.shuffle_history.clear();
        self.cycle_drawn_for = None;
    }

    /// Replace the queue contents and put the cursor on `start`
    ///
    /// While shuffled, the new contents are shuffled around the start entry.
    pub fn replace<I, T>(&mut self, tracks: I, start: usize) -> Result<Vec<QueueId>>
    where
        I: IntoIterator<Item = T>,
        T: Into<Arc<Track>>,
    {
        let tracks: Vec<Arc<Track>> = tracks.into_iter().map(Into::into).collect();
        if !tracks.is_empty() && start >= tracks.len() {
            return Err(PlaybackError::IndexOutOfRange {
                index: start,
                len: tracks.len(),
            });
        }

        let shuffled = self.is_shuffled();
        self.set_shuffle(false);
        self.clear();
        let ids = self.extend(tracks);
        if let Some(&first) = ids.get(start) {
            self.set_cursor(first)?;
        }
        self.set_shuffle(shuffled);
        Ok(ids)
    }

    /// Make `id` the current entry
    pub fn set_cursor(&mut self, id: QueueId) -> Result<()> {
        self.index_of(id)?;
        self.move_cursor(id);
        Ok(())
    }

    pub fn clear_cursor(&mut self) {
        self.cursor = None;
        self.cycle_drawn_for = None;
    }

    fn move_cursor(&mut self, id: QueueId) {
        if self.cursor != Some(id) {
            self.cycle_drawn_for = None;
        }
        self.cursor = Some(id);
        if self.is_shuffled() {
            self.record_played(id);
        }
    }

    fn record_played(&mut self, id: QueueId) {
        if self.shuffle_history.back() == Some(&id) {
            return;
        }
        self.shuffle_history.push_back(id);
        while self.shuffle_history.len() > self.entries.len() {
            self.shuffle_history.pop_front();
        }
    }

    // ===== Navigation =====

    /// Entry that plays after the current one under `repeat`
    ///
    /// Does not move the cursor. When shuffled and RepeatAll wraps past the
    /// end, a fresh cycle order is drawn (once per finished entry) with the
    /// just-finished entry kept out of the first slot.
    pub fn peek_next(&mut self, repeat: RepeatMode) -> Option<QueueId> {
        let Some(index) = self.cursor_index() else {
            return self.entries.first().map(|entry| entry.id);
        };
        let step = policy::step_forward(self.entries.len(), index, repeat);

        if step.is_wrap() && self.is_shuffled() && self.entries.len() > 1 {
            let finished = self.entries[index].id;
            if self.cycle_drawn_for != Some(finished) {
                draw_cycle(&mut self.entries, index, &mut self.rng);
                self.shuffle_history.clear();
                self.shuffle_history.push_back(finished);
                self.cycle_drawn_for = Some(finished);
            }
            return self.entries.first().map(|entry| entry.id);
        }

        step.index().map(|i| self.entries[i].id)
    }

    /// Entry that plays before the current one under `repeat`
    pub fn peek_previous(&self, repeat: RepeatMode) -> Option<QueueId> {
        let index = self.cursor_index()?;
        match policy::step_backward(self.entries.len(), index, repeat) {
            Step::End => None,
            step => step.index().map(|i| self.entries[i].id),
        }
    }

    /// Move the cursor to [`Self::peek_next`]
    pub fn advance(&mut self, repeat: RepeatMode) -> Option<QueueId> {
        let next = self.peek_next(repeat)?;
        self.move_cursor(next);
        Some(next)
    }

    /// Move the cursor to [`Self::peek_previous`]
    pub fn retreat(&mut self, repeat: RepeatMode) -> Option<QueueId> {
        let previous = self.peek_previous(repeat)?;
        self.move_cursor(previous);
        Some(previous)
    }

    // ===== Shuffle =====

    /// Switch shuffle on or off
    ///
    /// On: the insertion order is kept aside and every entry except the
    /// current one is permuted; the current entry keeps its index.
    /// Off: the insertion order comes back and the cursor resolves to the
    /// current entry's place in it.
    pub fn set_shuffle(&mut self, enabled: bool) {
        if enabled == self.is_shuffled() {
            return;
        }
        self.cycle_drawn_for = None;
        self.shuffle_history.clear();

        if enabled {
            self.original = Some(self.entries.clone());
            let pinned = self.cursor_index();
            shuffle_pinned(&mut self.entries, pinned, &mut self.rng);
            if let Some(cursor) = self.cursor {
                self.shuffle_history.push_back(cursor);
            }
        } else if let Some(original) = self.original.take() {
            self.entries = original;
        }
    }

    /// Flip shuffle, returning the new state
    pub fn toggle_shuffle(&mut self) -> bool {
        let enabled = !self.is_shuffled();
        self.set_shuffle(enabled);
        enabled
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_track(id: &str) -> Track {
        Track::new(id, format!("Track {}", id), "Test Artist", Duration::from_secs(180))
    }

    fn queue_of(ids: &[&str]) -> (Queue, Vec<QueueId>) {
        let mut queue = Queue::with_seed(42);
        let qids = queue.extend(ids.iter().map(|id| create_test_track(id)));
        (queue, qids)
    }

    fn track_ids(entries: &[QueueEntry]) -> Vec<String> {
        entries.iter().map(|e| e.track.id.to_string()).collect()
    }

    #[test]
    fn create_empty_queue() {
        let queue = Queue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.cursor(), None);
        assert!(queue.current().is_none());
    }

    #[test]
    fn ids_are_unique_and_monotonic() {
        let (mut queue, ids) = queue_of(&["1", "2", "3"]);
        let removed = ids[2];
        queue.remove(removed, RepeatMode::Off).unwrap();
        let fresh = queue.append(create_test_track("4"));
        assert!(fresh > removed);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn insert_after_current() {
        let (mut queue, ids) = queue_of(&["1", "2", "3"]);
        queue.set_cursor(ids[0]).unwrap();
        queue.insert_after_current(create_test_track("x"));
        assert_eq!(track_ids(queue.entries()), ["1", "x", "2", "3"]);
    }

    #[test]
    fn insert_without_cursor_goes_first() {
        let (mut queue, _) = queue_of(&["1", "2"]);
        queue.insert_after_current(create_test_track("x"));
        assert_eq!(track_ids(queue.entries()), ["x", "1", "2"]);
    }

    #[test]
    fn move_keeps_current_entry() {
        let (mut queue, ids) = queue_of(&["1", "2", "3", "4"]);
        queue.set_cursor(ids[1]).unwrap();

        queue.move_entry(ids[3], 0).unwrap();
        assert_eq!(track_ids(queue.entries()), ["4", "1", "2", "3"]);
        assert_eq!(queue.cursor(), Some(ids[1]));
        assert_eq!(queue.cursor_index(), Some(2));

        queue.move_entry(ids[1], 3).unwrap();
        assert_eq!(queue.cursor_index(), Some(3));
    }

    #[test]
    fn move_rejects_bad_index() {
        let (mut queue, ids) = queue_of(&["1", "2"]);
        let err = queue.move_entry(ids[0], 2).unwrap_err();
        assert!(matches!(err, PlaybackError::IndexOutOfRange { index: 2, len: 2 }));
    }

    #[test]
    fn unknown_id_is_rejected() {
        let (mut queue, ids) = queue_of(&["1"]);
        queue.remove(ids[0], RepeatMode::Off).unwrap();
        assert!(queue.set_cursor(ids[0]).unwrap_err().is_out_of_range());
        assert!(queue.remove(ids[0], RepeatMode::Off).unwrap_err().is_out_of_range());
        assert!(queue.id_at(0).unwrap_err().is_out_of_range());
    }

    #[test]
    fn remove_current_moves_to_next() {
        let (mut queue, ids) = queue_of(&["1", "2", "3"]);
        queue.set_cursor(ids[1]).unwrap();
        let removal = queue.remove(ids[1], RepeatMode::Off).unwrap();
        assert!(removal.was_current);
        assert!(!removal.stop);
        assert_eq!(queue.cursor(), Some(ids[2]));
    }

    #[test]
    fn remove_last_current_falls_back_to_previous() {
        let (mut queue, ids) = queue_of(&["1", "2", "3"]);
        queue.set_cursor(ids[2]).unwrap();
        queue.remove(ids[2], RepeatMode::Off).unwrap();
        assert_eq!(queue.cursor(), Some(ids[1]));
    }

    #[test]
    fn remove_last_current_wraps_under_repeat_all() {
        let (mut queue, ids) = queue_of(&["1", "2", "3"]);
        queue.set_cursor(ids[2]).unwrap();
        queue.remove(ids[2], RepeatMode::All).unwrap();
        assert_eq!(queue.cursor(), Some(ids[0]));
    }

    #[test]
    fn remove_only_entry_signals_stop() {
        let (mut queue, ids) = queue_of(&["1"]);
        queue.set_cursor(ids[0]).unwrap();
        let removal = queue.remove(ids[0], RepeatMode::One).unwrap();
        assert!(removal.stop);
        assert!(queue.is_empty());
        assert_eq!(queue.cursor(), None);
    }

    #[test]
    fn remove_other_entry_keeps_cursor() {
        let (mut queue, ids) = queue_of(&["1", "2", "3"]);
        queue.set_cursor(ids[2]).unwrap();
        let removal = queue.remove(ids[0], RepeatMode::Off).unwrap();
        assert!(!removal.was_current);
        assert_eq!(queue.cursor(), Some(ids[2]));
        assert_eq!(queue.cursor_index(), Some(1));
    }

    #[test]
    fn next_and_previous_without_shuffle() {
        let (mut queue, ids) = queue_of(&["1", "2", "3"]);
        assert_eq!(queue.peek_next(RepeatMode::Off), Some(ids[0]));
        queue.set_cursor(ids[0]).unwrap();

        assert_eq!(queue.advance(RepeatMode::Off), Some(ids[1]));
        assert_eq!(queue.advance(RepeatMode::Off), Some(ids[2]));
        assert_eq!(queue.advance(RepeatMode::Off), None);
        assert_eq!(queue.cursor(), Some(ids[2]));

        assert_eq!(queue.peek_next(RepeatMode::All), Some(ids[0]));
        assert_eq!(queue.peek_next(RepeatMode::One), Some(ids[2]));

        assert_eq!(queue.retreat(RepeatMode::Off), Some(ids[1]));
        assert_eq!(queue.retreat(RepeatMode::Off), Some(ids[0]));
        assert_eq!(queue.peek_previous(RepeatMode::Off), None);
        assert_eq!(queue.peek_previous(RepeatMode::All), Some(ids[2]));
        assert_eq!(queue.peek_previous(RepeatMode::One), Some(ids[0]));
    }

    #[test]
    fn shuffle_keeps_current_in_place() {
        let (mut queue, ids) = queue_of(&["1", "2", "3", "4", "5", "6"]);
        queue.set_cursor(ids[3]).unwrap();

        queue.set_shuffle(true);
        assert!(queue.is_shuffled());
        assert_eq!(queue.cursor_index(), Some(3));
        assert_eq!(queue.shuffle_history().collect::<Vec<_>>(), vec![ids[3]]);
        assert_eq!(track_ids(queue.original_order()), ["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn unshuffle_restores_order_and_cursor() {
        let (mut queue, ids) = queue_of(&["1", "2", "3", "4", "5"]);
        queue.set_cursor(ids[1]).unwrap();
        queue.set_shuffle(true);
        queue.advance(RepeatMode::Off);
        let playing = queue.cursor().unwrap();

        queue.set_shuffle(false);
        assert_eq!(track_ids(queue.entries()), ["1", "2", "3", "4", "5"]);
        assert_eq!(queue.cursor(), Some(playing));
        assert_eq!(queue.cursor_index(), queue.index_of(playing).ok());
    }

    #[test]
    fn edits_while_shuffled_reach_original_order() {
        let (mut queue, ids) = queue_of(&["1", "2", "3"]);
        queue.set_cursor(ids[0]).unwrap();
        queue.set_shuffle(true);

        queue.append(create_test_track("4"));
        queue.insert_after_current(create_test_track("x"));
        queue.remove(ids[2], RepeatMode::Off).unwrap();

        queue.set_shuffle(false);
        assert_eq!(track_ids(queue.entries()), ["1", "x", "2", "4"]);
    }

    #[test]
    fn shuffled_repeat_all_draws_new_cycle() {
        let (mut queue, ids) = queue_of(&["1", "2", "3", "4", "5"]);
        queue.set_cursor(ids[0]).unwrap();
        queue.set_shuffle(true);
        for _ in 0..4 {
            queue.advance(RepeatMode::All);
        }
        let finished = queue.cursor().unwrap();
        assert_eq!(queue.cursor_index(), Some(4));

        let first = queue.peek_next(RepeatMode::All).unwrap();
        assert_ne!(first, finished);
        // Peeking again must not draw another cycle
        assert_eq!(queue.peek_next(RepeatMode::All), Some(first));
        assert_eq!(queue.cursor(), Some(finished));

        assert_eq!(queue.advance(RepeatMode::All), Some(first));
        assert_eq!(queue.cursor_index(), Some(0));
    }

    #[test]
    fn shuffle_history_is_bounded_by_queue_length() {
        let (mut queue, ids) = queue_of(&["1", "2", "3"]);
        queue.set_cursor(ids[0]).unwrap();
        queue.set_shuffle(true);
        for _ in 0..10 {
            queue.advance(RepeatMode::All);
            assert!(queue.shuffle_history().count() <= queue.len());
        }
    }

    #[test]
    fn replace_sets_cursor() {
        let (mut queue, _) = queue_of(&["old"]);
        let ids = queue
            .replace(["1", "2", "3"].iter().map(|id| create_test_track(id)), 1)
            .unwrap();
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.cursor(), Some(ids[1]));
        assert!(queue
            .replace(vec![create_test_track("a")], 3)
            .unwrap_err()
            .is_out_of_range());
    }

    #[test]
    fn replace_while_shuffled_stays_shuffled() {
        let mut queue = Queue::with_seed(5);
        queue.set_shuffle(true);
        let ids = queue
            .replace(["1", "2", "3", "4"].iter().map(|id| create_test_track(id)), 2)
            .unwrap();
        assert!(queue.is_shuffled());
        assert_eq!(queue.cursor_index(), Some(2));
        assert_eq!(queue.cursor(), Some(ids[2]));
    }

    #[test]
    fn clear_queue() {
        let (mut queue, ids) = queue_of(&["1", "2"]);
        queue.set_cursor(ids[0]).unwrap();
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.cursor(), None);
        assert_eq!(queue.peek_next(RepeatMode::All), None);
    }

    #[test]
    fn upcoming_and_duration() {
        let (mut queue, ids) = queue_of(&["1", "2", "3", "4"]);
        assert_eq!(queue.upcoming(2).len(), 2);
        queue.set_cursor(ids[2]).unwrap();
        assert_eq!(track_ids(queue.upcoming(10)), ["4"]);
        queue.set_cursor(ids[3]).unwrap();
        assert!(queue.upcoming(10).is_empty());
        assert_eq!(queue.total_duration(), Duration::from_secs(720));
    }
}
