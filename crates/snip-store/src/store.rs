use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tracing::debug;

use snip_types::{EditToken, Language, PasteId, Theme, Ttl};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::object::{Paste, Version};

/// Parameters for [`PasteStore::create`].
///
/// Tag fields arrive as raw caller input: `language` and `theme` are
/// normalized against the known tag sets, `ttl` uses the vocabulary of
/// [`Ttl::parse`].
#[derive(Clone, Debug, Default)]
pub struct CreateRequest {
    pub content: String,
    pub language: String,
    pub ttl: String,
    pub theme: String,
    pub editable: bool,
    pub author: String,
}

/// Internal shared state for the store.
struct StoreInner {
    items: RwLock<HashMap<PasteId, Paste>>,
    /// Sender to signal shutdown to the sweeper task.
    shutdown_tx: watch::Sender<bool>,
}

/// Concurrent, ephemeral paste store with TTL expiry.
///
/// An explicitly constructed instance; no process-wide globals. `Clone`
/// shares the same underlying container, so handlers and the sweeper all
/// see one store.
///
/// Reads take the shared lock and clone the paste out; every mutation is a
/// single short critical section under the exclusive lock. A paste whose
/// expiry has passed is reported absent on every read path regardless of
/// whether the background sweeper has physically removed it yet.
///
/// # Panics
///
/// Construction panics outside of a tokio runtime context: the store
/// spawns its expiry sweeper on the ambient runtime. The sweeper stops
/// when [`PasteStore::shutdown`] is called or the last handle is dropped.
#[derive(Clone)]
pub struct PasteStore {
    inner: Arc<StoreInner>,
}

impl PasteStore {
    /// Create a store with the default configuration.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create a store with an explicit configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        if tokio::runtime::Handle::try_current().is_err() {
            panic!(
                "snip_store::PasteStore requires a tokio runtime: \
                 the expiry sweeper is spawned on the ambient runtime"
            );
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let inner = Arc::new(StoreInner {
            items: RwLock::new(HashMap::new()),
            shutdown_tx,
        });

        // The sweeper holds only a weak handle so dropping the last store
        // handle tears the container down and stops the task.
        let sweeper_inner = Arc::downgrade(&inner);
        tokio::spawn(Self::sweeper_task(
            sweeper_inner,
            config.sweep_interval,
            shutdown_rx,
        ));

        Self { inner }
    }

    /// Background task that periodically reclaims expired pastes.
    async fn sweeper_task(
        inner: std::sync::Weak<StoreInner>,
        interval: Duration,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        let mut ticker = tokio::time::interval(interval);
        // Skip the immediate first tick; the first sweep happens one full
        // interval after startup.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let Some(inner) = inner.upgrade() else {
                        break;
                    };
                    let removed = Self::sweep_map(&inner.items);
                    if removed > 0 {
                        debug!(removed, "sweeper reclaimed expired pastes");
                    }
                }
                changed = shutdown_rx.changed() => {
                    // A send error means the store is gone entirely.
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
    }

    /// One sweep pass: a single write-lock acquisition that drops every
    /// expired entry. Removing an already-absent id is a no-op, so the
    /// sweeper has no error path.
    fn sweep_map(items: &RwLock<HashMap<PasteId, Paste>>) -> usize {
        let now = Utc::now();
        let mut items = items.write().expect("lock poisoned");
        let before = items.len();
        items.retain(|_, paste| !paste.is_expired(now));
        before - items.len()
    }

    /// Create a paste from validated caller input.
    ///
    /// The paste is built whole (first version, edit token if requested)
    /// before insertion, so no reader ever observes a partial record. The
    /// freshly generated id is re-rolled while it collides with a live
    /// entry; an entry that is present but expired is dead and may be
    /// replaced.
    pub fn create(&self, req: CreateRequest) -> StoreResult<Paste> {
        let content = req.content.trim();
        if content.is_empty() {
            return Err(StoreError::EmptyContent);
        }
        let language = Language::normalize(&req.language);
        let theme = Theme::normalize(&req.theme);
        let ttl = Ttl::parse(&req.ttl)?;
        let author = req.author.trim().to_string();

        let now = Utc::now();
        let expires_at = now
            + chrono::Duration::from_std(ttl.as_duration())
                .map_err(|_| StoreError::InvalidTtl(req.ttl.clone()))?;

        let first = Version::new(content, language, author.clone(), now)?;
        let edit_key = req.editable.then(EditToken::generate);

        let mut items = self.inner.items.write().expect("lock poisoned");
        let id = loop {
            let candidate = PasteId::generate();
            match items.get(&candidate) {
                Some(existing) if !existing.is_expired(now) => continue,
                _ => break candidate,
            }
        };

        let paste = Paste {
            id: id.clone(),
            language,
            theme,
            expires_at,
            editable: req.editable,
            edit_key,
            author,
            versions: vec![first],
            created_at: now,
            updated_at: now,
        };
        items.insert(id, paste.clone());
        debug!(id = %paste.id, editable = paste.editable, "created paste");
        Ok(paste)
    }

    /// Look up a paste by id.
    ///
    /// Returns `None` for unknown ids and for entries whose expiry has
    /// passed; the two are indistinguishable to the caller. The returned
    /// paste is a value copy; mutating it does not touch the store.
    pub fn get(&self, id: &PasteId) -> Option<Paste> {
        let items = self.inner.items.read().expect("lock poisoned");
        let paste = items.get(id)?;
        if paste.is_expired(Utc::now()) {
            return None;
        }
        Some(paste.clone())
    }

    /// Append a new version to a live paste, or refresh its metadata when
    /// the content and language are unchanged.
    ///
    /// The compare-against-current and the append happen under one
    /// exclusive-lock critical section, so concurrent edits to the same
    /// paste serialize: each call appends a valid version or is a valid
    /// no-op, and the history is never corrupted. Editing does not extend
    /// the paste's expiry.
    ///
    /// Returns the version count after the call.
    pub fn append_version(
        &self,
        id: &PasteId,
        content: &str,
        language: &str,
        author: &str,
    ) -> StoreResult<usize> {
        let content = content.trim();
        if content.is_empty() {
            return Err(StoreError::EmptyContent);
        }
        let language = Language::normalize(language);
        let author = author.trim();
        let now = Utc::now();

        let mut items = self.inner.items.write().expect("lock poisoned");
        let paste = match items.get_mut(id) {
            Some(p) if !p.is_expired(now) => p,
            _ => return Err(StoreError::NotFound),
        };

        let changed = {
            let current = paste.current_version();
            language != current.language || content != current.content()?
        };
        if changed {
            paste
                .versions
                .push(Version::new(content, language, author, now)?);
            paste.language = language;
        }
        if !author.is_empty() {
            paste.author = author.to_string();
        }
        paste.updated_at = now;

        Ok(paste.versions.len())
    }

    /// Number of pastes whose expiry is still in the future, at this
    /// instant. Advisory only; nothing depends on it for correctness.
    pub fn count_active(&self) -> usize {
        let now = Utc::now();
        self.inner
            .items
            .read()
            .expect("lock poisoned")
            .values()
            .filter(|paste| !paste.is_expired(now))
            .count()
    }

    /// Number of entries physically in the container, expired included.
    pub fn len(&self) -> usize {
        self.inner.items.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the container is physically empty.
    pub fn is_empty(&self) -> bool {
        self.inner.items.read().expect("lock poisoned").is_empty()
    }

    /// Run one sweep pass immediately. Returns the number of pastes
    /// reclaimed. The background sweeper does this on its own interval.
    pub fn sweep_now(&self) -> usize {
        Self::sweep_map(&self.inner.items)
    }

    /// Stop the background sweeper. Called automatically when the last
    /// store handle is dropped; calling it twice is harmless.
    pub fn shutdown(&self) {
        let _ = self.inner.shutdown_tx.send(true);
    }
}

impl Default for PasteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for StoreInner {
    fn drop(&mut self) {
        // Last handle gone: stop the sweeper.
        let _ = self.shutdown_tx.send(true);
    }
}

impl std::fmt::Debug for PasteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasteStore")
            .field("paste_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    /// Helper to create a store within a tokio runtime for sync tests.
    /// The long sweep interval keeps the background task out of the way.
    fn create_test_store() -> PasteStore {
        create_test_store_with(StoreConfig::default().with_sweep_interval(Duration::from_secs(3600)))
    }

    fn create_test_store_with(config: StoreConfig) -> PasteStore {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();
        // Keep the runtime alive by leaking it (fine for tests).
        let rt = Box::leak(Box::new(rt));
        let _guard = rt.enter();
        PasteStore::with_config(config)
    }

    fn python_paste(content: &str) -> CreateRequest {
        CreateRequest {
            content: content.into(),
            language: "python".into(),
            ttl: "1h".into(),
            theme: "dark".into(),
            editable: false,
            author: String::new(),
        }
    }

    fn editable_paste(content: &str) -> CreateRequest {
        CreateRequest {
            editable: true,
            ..python_paste(content)
        }
    }

    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    #[test]
    fn create_non_editable_has_one_version_and_no_key() {
        let store = create_test_store();
        let paste = store.create(python_paste("print(1)")).unwrap();

        assert_eq!(paste.version_count(), 1);
        assert!(paste.edit_key.is_none());
        assert!(!paste.editable);

        let read_back = store.get(&paste.id).expect("should be live");
        assert_eq!(read_back.current_version().content().unwrap(), "print(1)");
    }

    #[test]
    fn create_editable_yields_edit_token() {
        let store = create_test_store();
        let paste = store.create(editable_paste("print(1)")).unwrap();

        let key = paste.edit_key.as_ref().expect("editable paste has a key");
        assert!(!key.as_str().is_empty());
    }

    #[test]
    fn create_rejects_empty_content() {
        let store = create_test_store();
        for content in ["", "   ", "\n\t"] {
            let err = store.create(python_paste(content)).unwrap_err();
            assert!(matches!(err, StoreError::EmptyContent));
        }
        assert!(store.is_empty());
    }

    #[test]
    fn create_rejects_bad_ttl() {
        let store = create_test_store();
        let req = CreateRequest {
            ttl: "never".into(),
            ..python_paste("x")
        };
        let err = store.create(req).unwrap_err();
        assert!(matches!(err, StoreError::InvalidTtl(_)));
    }

    #[test]
    fn create_normalizes_unknown_tags() {
        let store = create_test_store();
        let req = CreateRequest {
            language: "cobol".into(),
            theme: "solarized".into(),
            ..python_paste("x")
        };
        let paste = store.create(req).unwrap();
        assert_eq!(paste.language, Language::Plaintext);
        assert_eq!(paste.theme, Theme::Dark);
    }

    #[test]
    fn create_trims_content_and_author() {
        let store = create_test_store();
        let req = CreateRequest {
            author: "  ada  ".into(),
            ..python_paste("  print(1)  ")
        };
        let paste = store.create(req).unwrap();
        assert_eq!(paste.author, "ada");
        assert_eq!(paste.current_version().content().unwrap(), "print(1)");
    }

    #[test]
    fn created_ids_are_unique() {
        let store = create_test_store();
        let mut ids = std::collections::HashSet::new();
        for _ in 0..100 {
            let paste = store.create(python_paste("x")).unwrap();
            assert!(ids.insert(paste.id));
        }
    }

    // -----------------------------------------------------------------------
    // Get / expiry
    // -----------------------------------------------------------------------

    #[test]
    fn get_unknown_id_is_none() {
        let store = create_test_store();
        assert!(store.get(&PasteId::from("nonexistent")).is_none());
    }

    #[test]
    fn expired_paste_reads_as_absent_without_sweep() {
        let store = create_test_store();
        let req = CreateRequest {
            ttl: "1ns".into(),
            ..python_paste("gone")
        };
        let paste = store.create(req).unwrap();

        thread::sleep(Duration::from_millis(5));

        // Still physically present (the sweeper has not run), yet absent
        // to readers: lazy expiry is the authoritative check.
        assert_eq!(store.len(), 1);
        assert!(store.get(&paste.id).is_none());
    }

    #[test]
    fn get_returns_a_copy() {
        let store = create_test_store();
        let paste = store.create(python_paste("original")).unwrap();

        let mut copy = store.get(&paste.id).unwrap();
        copy.author = "mallory".into();
        copy.versions.clear();

        let read_back = store.get(&paste.id).unwrap();
        assert_eq!(read_back.author, "");
        assert_eq!(read_back.version_count(), 1);
    }

    // -----------------------------------------------------------------------
    // Append
    // -----------------------------------------------------------------------

    #[test]
    fn append_changed_content_grows_history() {
        let store = create_test_store();
        let paste = store.create(editable_paste("print(1)")).unwrap();

        let count = store
            .append_version(&paste.id, "print(2)", "python", "bob")
            .unwrap();
        assert_eq!(count, 2);

        let read_back = store.get(&paste.id).unwrap();
        assert_eq!(read_back.current_version().content().unwrap(), "print(2)");
        assert_eq!(read_back.author, "bob");
        // Version 1 is still intact when addressed by index.
        assert_eq!(read_back.versions[0].content().unwrap(), "print(1)");
    }

    #[test]
    fn append_unchanged_content_is_a_no_op_on_history() {
        let store = create_test_store();
        let paste = store.create(editable_paste("print(1)")).unwrap();
        let before = store.get(&paste.id).unwrap();

        let count = store
            .append_version(&paste.id, "print(1)", "python", "bob")
            .unwrap();
        assert_eq!(count, 1);

        let after = store.get(&paste.id).unwrap();
        assert_eq!(after.version_count(), 1);
        // Metadata still refreshes.
        assert_eq!(after.author, "bob");
        assert!(after.updated_at >= before.updated_at);
    }

    #[test]
    fn append_unchanged_with_empty_author_keeps_author() {
        let store = create_test_store();
        let req = CreateRequest {
            author: "ada".into(),
            ..editable_paste("print(1)")
        };
        let paste = store.create(req).unwrap();

        store.append_version(&paste.id, "print(1)", "python", "").unwrap();
        assert_eq!(store.get(&paste.id).unwrap().author, "ada");
    }

    #[test]
    fn append_language_change_alone_makes_a_version() {
        let store = create_test_store();
        let paste = store.create(editable_paste("select 1")).unwrap();

        let count = store
            .append_version(&paste.id, "select 1", "sql", "")
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(store.get(&paste.id).unwrap().language, Language::Sql);
    }

    #[test]
    fn append_does_not_extend_expiry() {
        let store = create_test_store();
        let paste = store.create(editable_paste("print(1)")).unwrap();

        store
            .append_version(&paste.id, "print(2)", "python", "")
            .unwrap();
        let read_back = store.get(&paste.id).unwrap();
        assert_eq!(read_back.expires_at, paste.expires_at);
    }

    #[test]
    fn append_to_unknown_or_expired_is_not_found() {
        let store = create_test_store();
        let err = store
            .append_version(&PasteId::from("missing"), "x", "python", "")
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));

        let req = CreateRequest {
            ttl: "1ns".into(),
            ..editable_paste("x")
        };
        let paste = store.create(req).unwrap();
        thread::sleep(Duration::from_millis(5));
        let err = store
            .append_version(&paste.id, "y", "python", "")
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn append_rejects_empty_content() {
        let store = create_test_store();
        let paste = store.create(editable_paste("x")).unwrap();
        let err = store
            .append_version(&paste.id, "   ", "python", "")
            .unwrap_err();
        assert!(matches!(err, StoreError::EmptyContent));
    }

    // -----------------------------------------------------------------------
    // Concurrency
    // -----------------------------------------------------------------------

    #[test]
    fn concurrent_appends_to_same_paste_lose_nothing() {
        let store = create_test_store();
        let paste = store.create(editable_paste("print(1)")).unwrap();

        let handles: Vec<_> = ["print(2)", "print(3)"]
            .into_iter()
            .map(|content| {
                let store = store.clone();
                let id = paste.id.clone();
                thread::spawn(move || store.append_version(&id, content, "python", "race"))
            })
            .collect();

        for handle in handles {
            handle.join().expect("thread panicked").unwrap();
        }

        // 1 initial + 2 distinct appends, whatever their order.
        let read_back = store.get(&paste.id).unwrap();
        assert_eq!(read_back.version_count(), 3);
    }

    #[test]
    fn concurrent_creates_and_reads() {
        let store = create_test_store();
        let seed: Vec<PasteId> = (0..50)
            .map(|i| store.create(python_paste(&format!("seed {i}"))).unwrap().id)
            .collect();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let store = store.clone();
            let ids = seed.clone();
            handles.push(thread::spawn(move || {
                for id in &ids {
                    assert!(store.get(id).is_some());
                }
            }));
        }
        for t in 0..4 {
            let store = store.clone();
            handles.push(thread::spawn(move || {
                for i in 0..50 {
                    store
                        .create(python_paste(&format!("writer {t} paste {i}")))
                        .unwrap();
                }
            }));
        }

        for handle in handles {
            handle.join().expect("thread panicked");
        }
        assert_eq!(store.len(), 250);
    }

    // -----------------------------------------------------------------------
    // Counting / sweeping
    // -----------------------------------------------------------------------

    #[test]
    fn count_active_excludes_expired() {
        let store = create_test_store();
        store.create(python_paste("a")).unwrap();
        store.create(python_paste("b")).unwrap();
        store
            .create(CreateRequest {
                ttl: "1ns".into(),
                ..python_paste("c")
            })
            .unwrap();

        thread::sleep(Duration::from_millis(5));

        assert_eq!(store.count_active(), 2);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn sweep_now_reclaims_only_expired() {
        let store = create_test_store();
        store.create(python_paste("keep")).unwrap();
        for i in 0..3 {
            store
                .create(CreateRequest {
                    ttl: "1ns".into(),
                    ..python_paste(&format!("drop {i}"))
                })
                .unwrap();
        }

        thread::sleep(Duration::from_millis(5));

        assert_eq!(store.sweep_now(), 3);
        assert_eq!(store.len(), 1);
        // Sweeping an already-clean store removes nothing.
        assert_eq!(store.sweep_now(), 0);
    }

    #[tokio::test]
    async fn background_sweeper_reclaims_expired() {
        let store = PasteStore::with_config(
            StoreConfig::default().with_sweep_interval(Duration::from_millis(50)),
        );
        store
            .create(CreateRequest {
                ttl: "1ms".into(),
                ..python_paste("ephemeral")
            })
            .unwrap();
        store.create(python_paste("durable")).unwrap();
        assert_eq!(store.len(), 2);

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(store.len(), 1);
        assert_eq!(store.count_active(), 1);
    }

    #[tokio::test]
    async fn shutdown_stops_the_sweeper() {
        let store = PasteStore::with_config(
            StoreConfig::default().with_sweep_interval(Duration::from_millis(50)),
        );
        let paste = store
            .create(CreateRequest {
                ttl: "1ms".into(),
                ..python_paste("ephemeral")
            })
            .unwrap();

        store.shutdown();
        tokio::time::sleep(Duration::from_millis(150)).await;

        // The entry was never physically reclaimed, but reads still treat
        // it as absent.
        assert_eq!(store.len(), 1);
        assert!(store.get(&paste.id).is_none());
    }

    #[tokio::test]
    async fn clones_share_the_container() {
        let store = PasteStore::new();
        let other = store.clone();

        let paste = store.create(python_paste("shared")).unwrap();
        assert!(other.get(&paste.id).is_some());
    }

    #[test]
    fn debug_reports_count() {
        let store = create_test_store();
        store.create(python_paste("x")).unwrap();
        let debug = format!("{store:?}");
        assert!(debug.contains("PasteStore"));
        assert!(debug.contains("paste_count"));
    }
}
