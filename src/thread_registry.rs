use std::cell::{Cell, RefCell};
use std::thread;
use crate::thread_letter::{global_pool, ThreadIdentifierHandle, OVERFLOW_LETTER};

/// Per-thread letter lookup backed by thread-local storage.
///
/// Each thread gets its letter the first time it asks for one. The handle is
/// stored in a `thread_local!` slot, so the fast path is a plain thread-local
/// read with no lock, and the slot goes back to the pool when the runtime
/// tears the thread down.
///
/// # Thread Exit
///
/// Rust runs thread-local destructors when a thread spawned through
/// `std::thread` exits. Threads created by foreign runtimes may never run
/// them; such threads must call [`release_current_thread`] before they exit,
/// otherwise their slot stays checked out for the rest of the process and the
/// pool shrinks by one letter.
///
/// # Primary Thread
///
/// Rust has no portable way to ask whether the current thread is the
/// process's main thread. By convention the runtime names that thread
/// `"main"`, and any thread carrying that name reports `'M'`, including one
/// spawned with `thread::Builder::name("main")`. Hosts that need a different
/// primary thread call [`designate_primary_thread`] from it.
///
/// # Logging Backends
///
/// The pool reports acquisitions and releases through `log`. A backend that
/// itself asks for the thread letter while this thread is inside the pool
/// gets `'+'` (or the letter already assigned) instead of recursing.

/// Letter reported by the primary thread.
pub const PRIMARY_LETTER: char = 'M';

enum ThreadTag {
    Primary,
    Pooled(ThreadIdentifierHandle),
}

impl ThreadTag {
    fn letter(&self) -> char {
        match self {
            ThreadTag::Primary => PRIMARY_LETTER,
            ThreadTag::Pooled(handle) => handle.letter(),
        }
    }
}

thread_local! {
    static THREAD_TAG: RefCell<Option<ThreadTag>> = const { RefCell::new(None) };
    static IN_POOL: Cell<bool> = const { Cell::new(false) };
}

/// Marks this thread as busy with the pool until dropped.
struct PoolGuard {
    outermost: bool,
}

impl PoolGuard {
    fn enter() -> Self {
        let outermost = !IN_POOL.with(|busy| busy.replace(true));
        Self { outermost }
    }

    fn is_busy() -> bool {
        IN_POOL.with(|busy| busy.get())
    }
}

impl Drop for PoolGuard {
    fn drop(&mut self) {
        if self.outermost {
            IN_POOL.with(|busy| busy.set(false));
        }
    }
}

// Naming convention only, see the module docs
fn is_runtime_main_thread() -> bool {
    thread::current().name() == Some("main")
}

/// Returns the letter of the calling thread.
///
/// * `'M'` on the primary thread, which never takes a pool slot
/// * `'a'..='z'` on other threads, acquired on first call and cached
/// * `'+'` when the pool was exhausted at the time of the first call
///
/// An overflow letter sticks for the life of the thread even if slots free
/// up later. Calling this while the thread's locals are being destroyed
/// returns `'+'` without touching the pool.
///
/// # Examples
///
/// ```
/// # use letter_log::current_thread_letter;
/// let letter = std::thread::spawn(|| {
///     let first = current_thread_letter();
///     assert_eq!(first, current_thread_letter());
///     first
/// }).join().unwrap();
/// assert!(letter.is_ascii_lowercase() || letter == '+');
/// ```
pub fn current_thread_letter() -> char {
    THREAD_TAG
        .try_with(|cell| {
            if let Some(tag) = cell.borrow().as_ref() {
                return tag.letter();
            }

            let tag = if is_runtime_main_thread() {
                ThreadTag::Primary
            } else if PoolGuard::is_busy() {
                // Asked again from a `log` backend while acquiring or releasing
                return OVERFLOW_LETTER;
            } else {
                let _guard = PoolGuard::enter();
                ThreadTag::Pooled(global_pool().acquire())
            };
            let letter = tag.letter();
            *cell.borrow_mut() = Some(tag);
            letter
        })
        .unwrap_or(OVERFLOW_LETTER)
}

/// Marks the calling thread as the primary thread.
///
/// For hosts where the thread that should report `'M'` is not the one the
/// Rust runtime calls `main`. Any slot the thread already held goes back to
/// the pool.
pub fn designate_primary_thread() {
    let _ = THREAD_TAG.try_with(|cell| {
        let previous = cell.borrow_mut().replace(ThreadTag::Primary);
        let _guard = PoolGuard::enter();
        drop(previous);
    });
}

/// Returns true if the calling thread reports `'M'`.
pub fn is_primary_thread() -> bool {
    THREAD_TAG
        .try_with(|cell| match cell.borrow().as_ref() {
            Some(ThreadTag::Primary) => true,
            Some(ThreadTag::Pooled(_)) => false,
            None => is_runtime_main_thread(),
        })
        .unwrap_or(false)
}

/// Gives the calling thread's slot back to the pool right away.
///
/// Required before exit on threads that never run thread-local destructors.
/// Returns true if a real slot was released. The next letter query on this
/// thread acquires a fresh one. The primary thread keeps its `'M'`.
pub fn release_current_thread() -> bool {
    THREAD_TAG
        .try_with(|cell| {
            let taken = cell.borrow_mut().take();
            let _guard = PoolGuard::enter();
            match taken {
                Some(ThreadTag::Pooled(handle)) => !handle.is_overflow(),
                Some(ThreadTag::Primary) => {
                    *cell.borrow_mut() = Some(ThreadTag::Primary);
                    false
                }
                None => false,
            }
        })
        .unwrap_or(false)
}
