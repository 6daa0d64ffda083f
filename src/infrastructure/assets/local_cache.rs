//! Snapshot cache over the local storage directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::{debug, info, trace, warn};

use super::probe::{ProbeError, probe_file};
use crate::domain::entities::{LocalAsset, Snapshot};
use crate::domain::errors::CacheError;
use crate::domain::ports::{Clock, DirectoryLister};

/// Default freshness window (5 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Immutable cache configuration.
#[derive(Debug, Clone)]
pub struct CacheSettings {
    /// Directory holding the local assets.
    pub storage_path: PathBuf,
    /// Public path prefix assets are served under.
    pub public_prefix: String,
    /// Maximum snapshot age served without rebuilding.
    pub ttl: Duration,
    /// List files that are not decodable images, with unknown dimensions.
    pub list_unprobed: bool,
}

impl CacheSettings {
    /// Creates settings with the default freshness window.
    #[must_use]
    pub fn new(storage_path: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            storage_path: storage_path.into(),
            public_prefix: public_prefix.into(),
            ttl: DEFAULT_TTL,
            list_unprobed: false,
        }
    }

    /// Sets the freshness window.
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sets whether undecodable files are listed.
    #[must_use]
    pub const fn with_list_unprobed(mut self, list_unprobed: bool) -> Self {
        self.list_unprobed = list_unprobed;
        self
    }
}

/// A published snapshot and the instant it was built.
/// Always replaced as a pair.
struct Published {
    snapshot: Snapshot,
    built_at: Instant,
}

/// Cache of the local storage directory contents.
///
/// Readers share a fresh snapshot under a read lock. A stale snapshot is
/// rebuilt under the write lock, after re-checking freshness so that callers
/// queued behind a rebuild reuse its result.
pub struct LocalAssetCache {
    settings: CacheSettings,
    lister: Arc<dyn DirectoryLister>,
    clock: Arc<dyn Clock>,
    state: RwLock<Option<Published>>,
    rebuilds: AtomicU64,
    skipped: AtomicU64,
}

impl LocalAssetCache {
    /// Creates an empty cache. The first `get` performs the initial scan.
    #[must_use]
    pub fn new(
        settings: CacheSettings,
        lister: Arc<dyn DirectoryLister>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            settings,
            lister,
            clock,
            state: RwLock::new(None),
            rebuilds: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
        }
    }

    /// Returns the storage directory.
    #[must_use]
    pub fn storage_path(&self) -> &Path {
        &self.settings.storage_path
    }

    /// Returns how many rebuilds have completed.
    #[must_use]
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds.load(Ordering::Relaxed)
    }

    /// Returns how many files the last completed rebuild left out.
    #[must_use]
    pub fn skipped_count(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    /// Returns a snapshot no older than the freshness window.
    ///
    /// # Errors
    /// Returns `CacheError::Listing` if a rebuild was needed and the storage
    /// directory could not be listed. The previous snapshot is not served
    /// in that case.
    pub fn get(&self) -> Result<Snapshot, CacheError> {
        if let Some(snapshot) = self.fresh(&self.state.read()) {
            trace!(entries = snapshot.len(), "Local asset cache hit");
            return Ok(snapshot);
        }

        let mut state = self.state.write();

        // Another caller may have rebuilt while we waited for the lock.
        if let Some(snapshot) = self.fresh(&state) {
            trace!(entries = snapshot.len(), "Reusing concurrently rebuilt snapshot");
            return Ok(snapshot);
        }

        let snapshot = self.rebuild()?;
        *state = Some(Published {
            snapshot: Arc::clone(&snapshot),
            built_at: self.clock.now(),
        });
        self.rebuilds.fetch_add(1, Ordering::Relaxed);

        Ok(snapshot)
    }

    /// Runs [`get`](Self::get) on the blocking thread pool.
    ///
    /// # Errors
    /// Returns the error of `get`, or `CacheError::Task` if the blocking task
    /// did not complete.
    pub async fn get_async(self: &Arc<Self>) -> Result<Snapshot, CacheError> {
        let cache = Arc::clone(self);
        tokio::task::spawn_blocking(move || cache.get())
            .await
            .map_err(|e| CacheError::Task(e.to_string()))?
    }

    /// Returns true if the current snapshot has at least one asset.
    /// A listing failure is logged and reported as no assets.
    pub fn has_assets(&self) -> bool {
        match self.get() {
            Ok(snapshot) => {
                info!(count = snapshot.len(), "Found local files");
                !snapshot.is_empty()
            }
            Err(e) => {
                warn!(error = %e, "Error listing local files");
                false
            }
        }
    }

    /// Drops the current snapshot so the next `get` rescans.
    pub fn invalidate(&self) {
        *self.state.write() = None;
        debug!("Invalidated local asset cache");
    }

    fn fresh(&self, state: &Option<Published>) -> Option<Snapshot> {
        let published = state.as_ref()?;
        let age = self
            .clock
            .now()
            .saturating_duration_since(published.built_at);
        (age < self.settings.ttl).then(|| Arc::clone(&published.snapshot))
    }

    fn rebuild(&self) -> Result<Snapshot, CacheError> {
        let started = Instant::now();
        let dir = &self.settings.storage_path;

        let names = self
            .lister
            .list_files(dir)
            .map_err(|e| CacheError::listing(dir, e))?;

        let mut assets = Vec::with_capacity(names.len());
        let mut skipped = 0u64;

        for name in names {
            match probe_file(&dir.join(&name)) {
                Ok(probed) => assets.push(
                    LocalAsset::new(name, &self.settings.public_prefix, probed.mimetype)
                        .with_dimensions(probed.width, probed.height),
                ),
                Err(ProbeError::Undecodable { mimetype, reason }) if self.settings.list_unprobed => {
                    debug!(file = %name, reason = %reason, "Listing file without dimensions");
                    assets.push(LocalAsset::new(name, &self.settings.public_prefix, mimetype));
                }
                Err(e) => {
                    warn!(file = %name, error = %e, "Skipping local file");
                    skipped += 1;
                }
            }
        }

        debug!(
            dir = %dir.display(),
            entries = assets.len(),
            skipped = skipped,
            elapsed_ms = started.elapsed().as_millis(),
            "Rebuilt local asset cache"
        );
        self.skipped.store(skipped, Ordering::Relaxed);

        Ok(assets.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::{CountingLister, ManualClock, MockDirectoryLister};
    use crate::infrastructure::assets::FsDirectoryLister;
    use image::{ImageFormat, RgbImage};
    use std::sync::Barrier;
    use tempfile::TempDir;

    const TTL: Duration = Duration::from_secs(60);

    fn fixture_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        RgbImage::new(10, 10).save(dir.path().join("a.png")).unwrap();
        RgbImage::new(20, 30)
            .save_with_format(dir.path().join("b.jpg"), ImageFormat::Jpeg)
            .unwrap();
        RgbImage::new(5, 7).save(dir.path().join("c.png")).unwrap();
        std::fs::write(dir.path().join("corrupt.png"), b"not really a png").unwrap();
        std::fs::create_dir(dir.path().join("subdir")).unwrap();
        dir
    }

    struct Harness {
        cache: Arc<LocalAssetCache>,
        lister: Arc<CountingLister<FsDirectoryLister>>,
        clock: Arc<ManualClock>,
        _dir: TempDir,
    }

    fn harness(configure: impl FnOnce(CacheSettings) -> CacheSettings) -> Harness {
        let dir = fixture_dir();
        let lister = Arc::new(CountingLister::new(FsDirectoryLister));
        let clock = Arc::new(ManualClock::new());
        let settings = configure(CacheSettings::new(dir.path(), "/gif/").with_ttl(TTL));
        let cache = Arc::new(LocalAssetCache::new(
            settings,
            lister.clone(),
            clock.clone(),
        ));
        Harness {
            cache,
            lister,
            clock,
            _dir: dir,
        }
    }

    #[test]
    fn test_skips_undecodable_files() {
        let h = harness(|s| s);

        let snapshot = h.cache.get().unwrap();

        let names: Vec<&str> = snapshot.iter().map(|a| a.filename.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.jpg", "c.png"]);
        assert!(snapshot.iter().all(LocalAsset::has_dimensions));
        assert_eq!(snapshot[1].mimetype, "image/jpeg");
        assert_eq!((snapshot[1].width, snapshot[1].height), (Some(20), Some(30)));
        assert_eq!(snapshot[0].url, format!("/gif/{}", snapshot[0].id));
        assert_eq!(h.cache.skipped_count(), 1);
    }

    #[test]
    fn test_lists_unprobed_when_enabled() {
        let h = harness(|s| s.with_list_unprobed(true));

        let snapshot = h.cache.get().unwrap();

        assert_eq!(snapshot.len(), 4);
        let corrupt = snapshot.iter().find(|a| a.filename == "corrupt.png").unwrap();
        assert_eq!(corrupt.width, None);
        assert_eq!(corrupt.height, None);
        assert_eq!(h.cache.skipped_count(), 0);
    }

    #[test]
    fn test_fresh_snapshot_is_shared() {
        let h = harness(|s| s);

        let first = h.cache.get().unwrap();
        h.clock.advance(TTL / 2);
        let second = h.cache.get().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(h.lister.calls(), 1);
        assert_eq!(h.cache.rebuild_count(), 1);
    }

    #[test]
    fn test_stale_snapshot_is_rebuilt() {
        let h = harness(|s| s);

        let first = h.cache.get().unwrap();
        h.clock.advance(TTL);
        let second = h.cache.get().unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first, second);
        assert_eq!(h.lister.calls(), 2);
    }

    #[test]
    fn test_rebuild_picks_up_new_files() {
        let h = harness(|s| s);

        assert_eq!(h.cache.get().unwrap().len(), 3);
        RgbImage::new(1, 1)
            .save(h.cache.storage_path().join("d.png"))
            .unwrap();
        assert_eq!(h.cache.get().unwrap().len(), 3);

        h.clock.advance(TTL);
        assert_eq!(h.cache.get().unwrap().len(), 4);
    }

    #[test]
    fn test_invalidate_forces_rescan() {
        let h = harness(|s| s);

        h.cache.get().unwrap();
        h.cache.invalidate();
        h.cache.get().unwrap();

        assert_eq!(h.lister.calls(), 2);
    }

    #[test]
    fn test_concurrent_refresh_scans_once() {
        const THREADS: usize = 16;
        let h = harness(|s| s);

        h.cache.get().unwrap();
        h.clock.advance(TTL + Duration::from_secs(1));

        let barrier = Barrier::new(THREADS);
        let snapshots: Vec<Snapshot> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        h.cache.get().unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|handle| handle.join().unwrap()).collect()
        });

        assert_eq!(h.lister.calls(), 2);
        assert!(snapshots.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn test_listing_failure_is_surfaced() {
        let h = harness(|s| s);
        h.cache.get().unwrap();

        std::fs::remove_dir_all(h.cache.storage_path()).unwrap();
        h.clock.advance(TTL);

        let err = h.cache.get().unwrap_err();
        assert!(matches!(err, CacheError::Listing { .. }));
        assert!(!h.cache.has_assets());
    }

    #[test]
    fn test_mocked_lister_within_window() {
        let dir = fixture_dir();
        let mut lister = MockDirectoryLister::new();
        lister
            .expect_list_files()
            .times(1)
            .returning(|_| Ok(vec!["a.png".to_string(), "missing.png".to_string()]));

        let cache = LocalAssetCache::new(
            CacheSettings::new(dir.path(), "/gif/").with_ttl(TTL),
            Arc::new(lister),
            Arc::new(ManualClock::new()),
        );

        for _ in 0..3 {
            let snapshot = cache.get().unwrap();
            assert_eq!(snapshot.len(), 1);
            assert_eq!(snapshot[0].filename, "a.png");
        }
    }

    #[test]
    fn test_zero_ttl_always_rebuilds() {
        let h = harness(|s| s.with_ttl(Duration::ZERO));

        h.cache.get().unwrap();
        h.cache.get().unwrap();

        assert_eq!(h.lister.calls(), 2);
    }

    #[test]
    fn test_has_assets() {
        let h = harness(|s| s);
        assert!(h.cache.has_assets());

        let empty = TempDir::new().unwrap();
        let cache = LocalAssetCache::new(
            CacheSettings::new(empty.path(), "/gif/"),
            Arc::new(FsDirectoryLister),
            Arc::new(ManualClock::new()),
        );
        assert!(!cache.has_assets());
    }

    #[tokio::test]
    async fn test_get_async_shares_snapshot() {
        let h = harness(|s| s);

        let first = h.cache.get_async().await.unwrap();
        let second = h.cache.get().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(h.lister.calls(), 1);
    }
}
