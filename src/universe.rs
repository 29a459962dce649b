//! Per-universe channel state.
//!
//! A [`Universe`] holds 512 channel values and tracks how many leading
//! channels still have to be transmitted. Only writes that change a value
//! extend that dirty prefix; taking the payload for a send resets it.
//!
//! # Example
//!
//! ```
//! use artnet_dmx::Universe;
//!
//! let mut universe = Universe::new();
//! assert!(universe.write(9, &[10, 20, 30]));
//! assert_eq!(universe.dirty_count(), 12);
//!
//! // Writing the same values again changes nothing
//! assert!(!universe.write(9, &[10, 20, 30]));
//!
//! let payload = universe.take_payload(false);
//! assert_eq!(payload.len(), 12);
//! assert_eq!(universe.dirty_count(), 0);
//! ```

use tokio::task::JoinHandle;

use crate::packet::DMX_CHANNELS;

/// Channel buffer of one universe plus its send bookkeeping.
#[derive(Debug)]
pub struct Universe {
    channels: [u8; DMX_CHANNELS],
    dirty_count: usize,
    sequence: u8,
    /// Deferred send requested during a throttle window; `Some(true)` for a refresh.
    pub(crate) pending: Option<bool>,
    pub(crate) throttle: Option<JoinHandle<()>>,
    pub(crate) refresh: Option<JoinHandle<()>>,
}

impl Universe {
    /// Creates a universe with every channel at zero.
    pub fn new() -> Self {
        Self {
            channels: [0; DMX_CHANNELS],
            dirty_count: 0,
            sequence: 0,
            pending: None,
            throttle: None,
            refresh: None,
        }
    }

    /// Writes consecutive values starting at a 0-based index.
    ///
    /// Values past the last channel are ignored. Returns whether any value
    /// changed.
    pub fn write(&mut self, index: usize, values: &[u8]) -> bool {
        let mut changed = false;
        for (offset, &value) in values.iter().enumerate() {
            let Some(position) = index.checked_add(offset) else {
                break;
            };
            let Some(slot) = self.channels.get_mut(position) else {
                break;
            };
            if *slot != value {
                *slot = value;
                self.dirty_count = self.dirty_count.max(position + 1);
                changed = true;
            }
        }
        changed
    }

    /// Returns all 512 channel values.
    pub fn channels(&self) -> &[u8; DMX_CHANNELS] {
        &self.channels
    }

    /// Returns the number of leading channels waiting to be sent.
    pub fn dirty_count(&self) -> usize {
        self.dirty_count
    }

    /// Captures the data for a send and clears the dirty prefix.
    ///
    /// A refresh captures all 512 channels; otherwise only the dirty prefix.
    pub fn take_payload(&mut self, refresh: bool) -> Vec<u8> {
        let len = if refresh {
            DMX_CHANNELS
        } else {
            self.dirty_count
        };
        self.dirty_count = 0;
        self.channels[..len].to_vec()
    }

    /// Advances and returns the sequence number, cycling through 1-255.
    pub fn next_sequence(&mut self) -> u8 {
        self.sequence = if self.sequence == u8::MAX {
            1
        } else {
            self.sequence + 1
        };
        self.sequence
    }

    /// Aborts any timer owned by this universe.
    pub(crate) fn cancel_timers(&mut self) {
        if let Some(handle) = self.throttle.take() {
            handle.abort();
        }
        if let Some(handle) = self.refresh.take() {
            handle.abort();
        }
        self.pending = None;
    }
}

impl Default for Universe {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirty_count_only_grows_on_change() {
        let mut universe = Universe::new();
        assert!(universe.write(99, &[1]));
        assert_eq!(universe.dirty_count(), 100);

        // A change below the boundary keeps it
        assert!(universe.write(4, &[1]));
        assert_eq!(universe.dirty_count(), 100);

        // Unchanged bytes past the boundary do not extend it
        let mut values = vec![0u8; 200];
        values[0] = 7;
        assert!(universe.write(0, &values));
        assert_eq!(universe.dirty_count(), 100);
    }

    #[test]
    fn test_write_ignores_values_past_last_channel() {
        let mut universe = Universe::new();
        assert!(universe.write(510, &[1, 2, 3, 4]));
        assert_eq!(universe.dirty_count(), 512);
        assert_eq!(&universe.channels()[510..], &[1, 2]);
    }

    #[test]
    fn test_write_far_past_last_channel() {
        let mut universe = Universe::new();
        assert!(!universe.write(usize::MAX, &[1, 2, 3]));
        assert!(!universe.write(usize::MAX - 1, &[1, 2, 3]));
        assert_eq!(universe.dirty_count(), 0);
    }

    #[test]
    fn test_take_payload() {
        let mut universe = Universe::new();
        universe.write(2, &[255]);
        assert_eq!(universe.take_payload(false), vec![0, 0, 255]);
        assert!(universe.take_payload(false).is_empty());

        let full = universe.take_payload(true);
        assert_eq!(full.len(), 512);
        assert_eq!(full[2], 255);
    }

    #[test]
    fn test_sequence_skips_zero() {
        let mut universe = Universe::new();
        assert_eq!(universe.next_sequence(), 1);
        for _ in 0..253 {
            universe.next_sequence();
        }
        assert_eq!(universe.next_sequence(), 255);
        assert_eq!(universe.next_sequence(), 1);
    }
}
