//! Directory listing port definition.

use std::path::Path;

/// Port for enumerating the local storage directory.
/// Implementations must be thread-safe.
#[cfg_attr(test, mockall::automock)]
pub trait DirectoryLister: Send + Sync {
    /// Lists the names of regular files directly inside `dir`.
    ///
    /// # Errors
    /// Returns the I/O error if the directory itself cannot be read.
    fn list_files(&self, dir: &Path) -> std::io::Result<Vec<String>>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Wraps another lister and counts how often it is called.
    pub struct CountingLister<L> {
        inner: L,
        calls: AtomicUsize,
    }

    impl<L: DirectoryLister> CountingLister<L> {
        /// Creates a counting wrapper.
        pub fn new(inner: L) -> Self {
            Self {
                inner,
                calls: AtomicUsize::new(0),
            }
        }

        /// Returns the number of listings performed so far.
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl<L: DirectoryLister> DirectoryLister for CountingLister<L> {
        fn list_files(&self, dir: &Path) -> std::io::Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.list_files(dir)
        }
    }
}
