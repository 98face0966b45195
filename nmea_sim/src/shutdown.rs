use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Cooperative stop signal shared between the controlling thread, the writer
/// thread, and the signal handler.
///
/// Requesting shutdown is idempotent and the flag never resets; every clone
/// observes the same state.
#[derive(Clone, Debug, Default)]
pub struct ShutdownToken {
    flag: Arc<AtomicBool>,
}

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// The underlying flag, for registration APIs that store into the atomic
    /// directly.
    pub fn as_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}
