use std::fmt;
use std::sync::Arc;
use lazy_static::lazy_static;
use parking_lot::Mutex;

/// Single-letter thread identifiers drawn from a shared pool.
///
/// This module provides the pool of 26 letter slots ('a'..'z') that background
/// threads borrow for the lifetime of their logging activity, and the handle
/// that gives a slot back when it is dropped. When every slot is taken the
/// pool hands out a shared overflow assignment rendered as `'+'`.
///
/// # Thread Safety
///
/// All pool state sits behind a single `parking_lot::Mutex`. Acquiring and
/// releasing are rare compared to logging, and both do a bounded amount of
/// work while holding the lock.

/// Number of letter slots in a pool.
pub const SLOT_COUNT: u8 = 26;

/// Letter reported for threads that could not get a slot.
pub const OVERFLOW_LETTER: char = '+';

/// Result of asking the pool for a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotAssignment {
    /// An exclusively owned slot in `0..SLOT_COUNT`.
    Slot(u8),
    /// The shared overflow marker. Never owned, never released.
    Overflow,
}

impl SlotAssignment {
    /// Returns the letter this assignment renders as.
    #[inline]
    pub fn letter(self) -> char {
        letter_of(self)
    }

    /// Returns true for the shared overflow assignment.
    #[inline]
    pub fn is_overflow(self) -> bool {
        matches!(self, SlotAssignment::Overflow)
    }
}

impl fmt::Display for SlotAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Maps an assignment to its letter.
///
/// Real slots map to `'a' + number`, overflow maps to `'+'`. A slot number
/// outside the pool range also renders as `'+'`, since no pool ever hands one
/// out.
///
/// # Examples
///
/// ```
/// # use letter_log::thread_letter::{letter_of, SlotAssignment};
/// assert_eq!(letter_of(SlotAssignment::Slot(0)), 'a');
/// assert_eq!(letter_of(SlotAssignment::Slot(25)), 'z');
/// assert_eq!(letter_of(SlotAssignment::Overflow), '+');
/// ```
#[inline]
pub fn letter_of(assignment: SlotAssignment) -> char {
    match assignment {
        SlotAssignment::Slot(n) if n < SLOT_COUNT => (b'a' + n) as char,
        _ => OVERFLOW_LETTER,
    }
}

/// Maps a letter back to the assignment it came from.
///
/// Returns `None` for characters no pool produces.
///
/// # Examples
///
/// ```
/// # use letter_log::thread_letter::{assignment_of, SlotAssignment};
/// assert_eq!(assignment_of('c'), Some(SlotAssignment::Slot(2)));
/// assert_eq!(assignment_of('+'), Some(SlotAssignment::Overflow));
/// assert_eq!(assignment_of('M'), None);
/// ```
pub fn assignment_of(letter: char) -> Option<SlotAssignment> {
    match letter {
        'a'..='z' => Some(SlotAssignment::Slot(letter as u8 - b'a')),
        OVERFLOW_LETTER => Some(SlotAssignment::Overflow),
        _ => None,
    }
}

struct PoolState {
    // Bit n set means slot n is checked out.
    unavailable: u32,
    cursor: u8,
}

/// A pool of 26 letter slots shared by many threads.
///
/// Slots are handed out round-robin: each scan starts at the slot after the
/// one most recently acquired, so a slot that was just freed is not the first
/// one reused. This spreads letters over time and keeps concurrent output
/// easy to tell apart by thread.
///
/// # Examples
///
/// ```
/// # use letter_log::thread_letter::{IdentifierPool, SlotAssignment};
/// let pool = IdentifierPool::new();
/// let a = pool.acquire_slot();
/// let b = pool.acquire_slot();
/// assert_eq!(a, SlotAssignment::Slot(0));
/// assert_eq!(b, SlotAssignment::Slot(1));
///
/// pool.release(a);
/// // The cursor moved past 'b', so the freed 'a' is not reused yet
/// assert_eq!(pool.acquire_slot(), SlotAssignment::Slot(2));
/// ```
pub struct IdentifierPool {
    state: Mutex<PoolState>,
}

impl IdentifierPool {
    /// Creates an empty pool with the cursor at slot 0.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(PoolState { unavailable: 0, cursor: 0 }),
        }
    }

    /// Takes the next free slot, or the overflow assignment if none is left.
    ///
    /// Never fails and never blocks for longer than one 26-step scan. The
    /// lock is released before anything is logged, so a `log` backend may
    /// call back into the pool.
    pub fn acquire_slot(&self) -> SlotAssignment {
        let assignment = self.scan();
        match assignment {
            SlotAssignment::Slot(_) => {
                log::trace!(target: "letter_log::pool", "acquired slot {}", letter_of(assignment));
            }
            SlotAssignment::Overflow => {
                log::debug!(target: "letter_log::pool", "all {} slots in use, handing out overflow", SLOT_COUNT);
            }
        }
        assignment
    }

    fn scan(&self) -> SlotAssignment {
        let mut state = self.state.lock();
        for i in 0..SLOT_COUNT {
            let candidate = (state.cursor + i) % SLOT_COUNT;
            let bit = 1u32 << candidate;
            if state.unavailable & bit == 0 {
                state.unavailable |= bit;
                state.cursor = (candidate + 1) % SLOT_COUNT;
                return SlotAssignment::Slot(candidate);
            }
        }
        SlotAssignment::Overflow
    }

    /// Takes a slot and wraps it in a handle that gives it back on drop.
    pub fn acquire(self: &Arc<Self>) -> ThreadIdentifierHandle {
        ThreadIdentifierHandle {
            assignment: self.acquire_slot(),
            pool: Arc::clone(self),
        }
    }

    /// Returns a slot to the pool.
    ///
    /// Releasing the overflow assignment, a slot that is not checked out, or
    /// a number outside the pool is a no-op. The cursor is left alone.
    pub fn release(&self, assignment: SlotAssignment) {
        let SlotAssignment::Slot(n) = assignment else {
            return;
        };
        if n >= SLOT_COUNT {
            return;
        }

        let bit = 1u32 << n;
        let released = {
            let mut state = self.state.lock();
            let held = state.unavailable & bit != 0;
            state.unavailable &= !bit;
            held
        };

        if released {
            log::trace!(target: "letter_log::pool", "released slot {}", letter_of(assignment));
        }
    }

    /// Number of slots currently checked out.
    pub fn in_use(&self) -> usize {
        self.state.lock().unavailable.count_ones() as usize
    }

    /// Number of slots still free.
    pub fn available(&self) -> usize {
        SLOT_COUNT as usize - self.in_use()
    }

    /// Returns true when the next acquisition would overflow.
    pub fn is_exhausted(&self) -> bool {
        self.available() == 0
    }
}

impl Default for IdentifierPool {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IdentifierPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentifierPool")
            .field("in_use", &self.in_use())
            .finish()
    }
}

lazy_static! {
    /// The process-wide pool behind `current_thread_letter`.
    static ref GLOBAL_POOL: Arc<IdentifierPool> = Arc::new(IdentifierPool::new());
}

/// Returns the process-wide pool used by the thread registry.
pub fn global_pool() -> &'static Arc<IdentifierPool> {
    &GLOBAL_POOL
}

/// Binds one thread to one pool slot for as long as it lives.
///
/// Dropping the handle gives a real slot back to the pool it came from,
/// exactly once. An overflow handle releases nothing.
///
/// # Examples
///
/// ```
/// # use std::sync::Arc;
/// # use letter_log::thread_letter::IdentifierPool;
/// let pool = Arc::new(IdentifierPool::new());
/// {
///     let handle = pool.acquire();
///     assert_eq!(handle.letter(), 'a');
///     assert_eq!(pool.in_use(), 1);
/// }
/// assert_eq!(pool.in_use(), 0);
/// ```
pub struct ThreadIdentifierHandle {
    assignment: SlotAssignment,
    pool: Arc<IdentifierPool>,
}

impl ThreadIdentifierHandle {
    /// The letter this handle renders as.
    #[inline]
    pub fn letter(&self) -> char {
        letter_of(self.assignment)
    }

    /// The slot this handle owns, or the overflow marker.
    pub fn assignment(&self) -> SlotAssignment {
        self.assignment
    }

    /// Returns true if the pool was exhausted when this handle was made.
    pub fn is_overflow(&self) -> bool {
        self.assignment.is_overflow()
    }
}

impl fmt::Debug for ThreadIdentifierHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadIdentifierHandle")
            .field("letter", &self.letter())
            .finish()
    }
}

impl Drop for ThreadIdentifierHandle {
    fn drop(&mut self) {
        if !self.assignment.is_overflow() {
            self.pool.release(self.assignment);
        }
    }
}
