//! Playback queue with cursor, shuffle and repeat navigation.
//!
//! Shuffling materialises a full permutation of the working order and keeps
//! the order the queue was supplied in, so turning shuffle off restores it
//! exactly.

use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

use crate::track::{Track, TrackId};

/// Ordered track handles plus a cursor into them.
///
/// The cursor is either unset or a valid index into [`tracks`](Self::tracks).
#[derive(Debug, Clone, Default)]
pub struct PlaybackQueue {
    tracks: Vec<Arc<Track>>,
    original: Vec<Arc<Track>>,
    cursor: Option<usize>,
    shuffled: bool,
}

impl PlaybackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Tracks in playback order.
    pub fn tracks(&self) -> &[Arc<Track>] {
        &self.tracks
    }

    pub fn ids(&self) -> Vec<TrackId> {
        self.tracks.iter().map(|track| track.id.clone()).collect()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    pub fn current(&self) -> Option<&Arc<Track>> {
        self.cursor.and_then(|index| self.tracks.get(index))
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Track>> {
        self.tracks.get(index)
    }

    /// Replace the contents wholesale. The cursor is cleared.
    ///
    /// When the queue is in shuffle mode the new tracks become the restore
    /// order and a fresh permutation becomes the working order.
    pub fn replace<R: Rng + ?Sized>(&mut self, tracks: Vec<Arc<Track>>, rng: &mut R) {
        self.original = tracks.clone();
        self.tracks = tracks;
        self.cursor = None;
        if self.shuffled {
            self.tracks.shuffle(rng);
        }
    }

    /// Point the cursor at `track`, appending it when absent.
    ///
    /// The entry at the current cursor wins over an earlier duplicate.
    pub fn focus(&mut self, track: &Arc<Track>) -> usize {
        if let Some(index) = self.cursor {
            if self.tracks.get(index).map(|t| &t.id) == Some(&track.id) {
                return index;
            }
        }

        let index = match self.position_of(&track.id) {
            Some(index) => index,
            None => {
                self.tracks.push(Arc::clone(track));
                self.original.push(Arc::clone(track));
                self.tracks.len() - 1
            }
        };
        self.cursor = Some(index);
        index
    }

    /// Set the cursor to an index already in range.
    pub fn set_cursor(&mut self, index: usize) -> Option<&Arc<Track>> {
        if index < self.tracks.len() {
            self.cursor = Some(index);
            self.tracks.get(index)
        } else {
            None
        }
    }

    /// Index `next` should move to, or `None` when it should do nothing.
    ///
    /// In shuffle mode any index may be picked, the current one included.
    /// Otherwise the last index wraps to 0 only when `repeat` is set.
    pub fn next_index<R: Rng + ?Sized>(&self, shuffle: bool, repeat: bool, rng: &mut R) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }
        if shuffle {
            return Some(rng.gen_range(0..self.tracks.len()));
        }

        let last = self.tracks.len() - 1;
        match self.cursor {
            None => Some(0),
            Some(index) if index >= last => repeat.then_some(0),
            Some(index) => Some(index + 1),
        }
    }

    /// Index `previous` should move to. Index 0 always wraps to the end.
    pub fn previous_index(&self) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }

        let last = self.tracks.len() - 1;
        match self.cursor {
            None | Some(0) => Some(last),
            Some(index) => Some(index - 1),
        }
    }

    /// Switch to a fresh uniform permutation, keeping the cursor on the same track.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if !self.shuffled {
            self.original = self.tracks.clone();
            self.shuffled = true;
        }
        let current = self.current().cloned();
        self.tracks.shuffle(rng);
        self.refocus(current);
    }

    /// Restore the order the queue was supplied in.
    pub fn unshuffle(&mut self) {
        if !self.shuffled {
            return;
        }
        let current = self.current().cloned();
        self.tracks = self.original.clone();
        self.shuffled = false;
        self.refocus(current);
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
        self.original.clear();
        self.cursor = None;
    }

    fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| &t.id == id)
    }

    fn refocus(&mut self, current: Option<Arc<Track>>) {
        self.cursor = current.and_then(|track| {
            self.tracks
                .iter()
                .position(|t| Arc::ptr_eq(t, &track))
                .or_else(|| self.position_of(&track.id))
        });
    }
}
