//! Autosave editor controller.
//!
//! Holds one [`Draft`] and keeps the server copy eventually consistent with it.
//! Every edit restarts a single debounce timer; when the timer runs out the
//! draft is reconciled: created on the first save, updated in place after that.
//!
//! At most one reconciliation is outstanding at a time. A timer that fires
//! while a save is in flight is dropped rather than queued, so an edit made
//! during a slow save is only persisted once a later edit restarts the timer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::NoteRemote;
use crate::config::ClientConfig;
use crate::error::Error;
use crate::format::format_last_edited;
use crate::models::{CategoryId, Draft, Note, NoteId};
use crate::state::SyncStatus;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("A save is already in flight")]
    InFlight,
    #[error(transparent)]
    Remote(#[from] Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorSettings {
    /// Quiet period after the last edit before saving
    pub autosave_delay: Duration,
    /// Category sent when the draft has none
    pub default_category: CategoryId,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

impl EditorSettings {
    pub const fn from_config(config: &ClientConfig) -> Self {
        Self {
            autosave_delay: config.autosave_delay(),
            default_category: config.default_category(),
        }
    }
}

/// A single user edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Title(String),
    Content(String),
    Category(Option<CategoryId>),
}

struct EditorState {
    draft: Draft,
    /// Bumped on every edit
    version: u64,
    /// Version captured by the last successful save
    saved_version: u64,
    /// Bumped whenever the draft is replaced wholesale
    generation: u64,
    /// Pending debounce timer, if any
    timer: Option<JoinHandle<()>>,
}

impl EditorState {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

struct Inner<R> {
    remote: R,
    settings: EditorSettings,
    state: Mutex<EditorState>,
    in_flight: AtomicBool,
    status: watch::Sender<SyncStatus>,
}

/// Clears the in-flight flag when a reconciliation ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Debounced autosave controller for one open note.
///
/// Edits must be made from within a tokio runtime; each one spawns the
/// debounce timer task.
pub struct Editor<R: NoteRemote> {
    inner: Arc<Inner<R>>,
}

impl<R: NoteRemote> Editor<R> {
    /// Editor for a brand-new note. Nothing is sent until the first edit.
    pub fn new(remote: R, settings: EditorSettings) -> Self {
        let (status, _) = watch::channel(SyncStatus::Idle);
        Self {
            inner: Arc::new(Inner {
                remote,
                settings,
                state: Mutex::new(EditorState {
                    draft: Draft::default(),
                    version: 0,
                    saved_version: 0,
                    generation: 0,
                    timer: None,
                }),
                in_flight: AtomicBool::new(false),
                status,
            }),
        }
    }

    /// Editor for an existing note.
    ///
    /// If the note cannot be fetched the failure is logged and the editor
    /// starts from an empty, unsaved draft instead.
    pub async fn open(remote: R, settings: EditorSettings, id: NoteId) -> Self {
        let editor = Self::new(remote, settings);
        if let Err(error) = editor.load_draft(id).await {
            tracing::warn!("Failed to load note {id}, starting a new draft: {error}");
        }
        editor
    }

    /// Replace the draft with the server's copy of note `id`.
    pub async fn load_draft(&self, id: NoteId) -> Result<(), Error> {
        let note = self.inner.remote.fetch_note(id).await?;
        let mut state = self.inner.lock_state();
        state.cancel_timer();
        state.draft = Draft::from_note(&note);
        state.version = 0;
        state.saved_version = 0;
        state.generation += 1;
        self.inner.status.send_replace(SyncStatus::Idle);
        drop(state);
        tracing::debug!("Loaded note {id} into editor");
        Ok(())
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.edit(Edit::Title(title.into()));
    }

    pub fn set_content(&self, content: impl Into<String>) {
        self.edit(Edit::Content(content.into()));
    }

    pub fn set_category(&self, category: Option<CategoryId>) {
        self.edit(Edit::Category(category));
    }

    /// Apply an edit to the draft and restart the debounce timer.
    pub fn edit(&self, edit: Edit) {
        let mut state = self.inner.lock_state();
        match edit {
            Edit::Title(title) => state.draft.title = title,
            Edit::Content(content) => state.draft.content = content,
            Edit::Category(category) => state.draft.category_id = category,
        }
        state.version += 1;

        state.cancel_timer();
        let version = state.version;
        let delay = self.inner.settings.autosave_delay;
        let weak = Arc::downgrade(&self.inner);
        state.timer = Some(tokio::spawn(run_timer(weak, version, delay)));
    }

    /// Reconcile the draft with the server right now.
    ///
    /// Skips the attempt (returning [`SaveError::InFlight`]) if another save
    /// has not finished yet.
    pub async fn reconcile(&self) -> Result<Note, SaveError> {
        self.inner.reconcile().await
    }

    /// Save immediately instead of waiting out the debounce delay.
    ///
    /// Returns `Ok(None)` when there is nothing new to save.
    pub async fn save_now(&self) -> Result<Option<Note>, SaveError> {
        {
            let mut state = self.inner.lock_state();
            state.cancel_timer();
            if state.version == state.saved_version {
                return Ok(None);
            }
        }
        self.inner.reconcile().await.map(Some)
    }

    /// Cancel the pending debounce timer. In-flight saves run to completion.
    pub fn close(&self) {
        self.inner.lock_state().cancel_timer();
    }

    /// Snapshot of the current draft
    pub fn draft(&self) -> Draft {
        self.inner.lock_state().draft.clone()
    }

    pub fn remote_id(&self) -> Option<NoteId> {
        self.inner.lock_state().draft.remote_id
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.inner.lock_state().draft.created_at
    }

    /// Header label for the note's creation time, in local time.
    pub fn last_edited_label(&self) -> Option<String> {
        self.created_at()
            .map(|at| format_last_edited(&at.with_timezone(&Local)))
    }

    /// Whether the draft holds edits the server has not acknowledged.
    pub fn has_unsaved_changes(&self) -> bool {
        let state = self.inner.lock_state();
        state.version != state.saved_version
    }

    pub fn is_saving(&self) -> bool {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    /// Subscribe to sync status changes.
    pub fn status(&self) -> watch::Receiver<SyncStatus> {
        self.inner.status.subscribe()
    }
}

impl<R: NoteRemote> Drop for Editor<R> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<R: NoteRemote> Inner<R> {
    fn lock_state(&self) -> MutexGuard<'_, EditorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn on_timer_fire(&self, version: u64) {
        {
            let mut state = self.lock_state();
            if state.version != version {
                return;
            }
            // Past this point an abort would cancel a save mid-request.
            state.timer = None;
            if state.draft.is_blank() {
                return;
            }
        }

        match self.reconcile().await {
            Ok(note) => tracing::debug!("Autosaved note {}", note.id),
            Err(SaveError::InFlight) => {
                tracing::debug!("Skipped autosave, a save is already in flight");
            }
            Err(SaveError::Remote(error)) => tracing::error!("Failed to save note: {error}"),
        }
    }

    async fn reconcile(&self) -> Result<Note, SaveError> {
        let Some(guard) = InFlightGuard::acquire(&self.in_flight) else {
            return Err(SaveError::InFlight);
        };

        let (payload, remote_id, version, generation) = {
            let state = self.lock_state();
            (
                state.draft.payload(self.settings.default_category),
                state.draft.remote_id,
                state.version,
                state.generation,
            )
        };
        self.status.send_replace(SyncStatus::Saving);

        let result = match remote_id {
            None => self.remote.create_note(&payload).await,
            Some(id) => self.remote.update_note(id, &payload).await,
        };

        let mut state = self.lock_state();
        let (outcome, status) = if state.generation != generation {
            // A draft loaded mid-save owns the state now.
            tracing::debug!("Discarding save result for a draft that was replaced");
            (result.map_err(SaveError::from), SyncStatus::Idle)
        } else {
            match result {
                Ok(note) => {
                    if remote_id.is_none() {
                        state.draft.bind(&note);
                    }
                    state.saved_version = state.saved_version.max(version);
                    let status = SyncStatus::Saved(note.id);
                    (Ok(note), status)
                }
                Err(error) => {
                    let status = SyncStatus::Failed(error.to_string());
                    (Err(error.into()), status)
                }
            }
        };

        // Watchers woken by this status must be able to start the next save.
        drop(guard);
        self.status.send_replace(status);
        drop(state);
        outcome
    }
}

async fn run_timer<R: NoteRemote>(inner: Weak<Inner<R>>, version: u64, delay: Duration) {
    tokio::time::sleep(delay).await;
    let Some(inner) = inner.upgrade() else {
        return;
    };
    inner.on_timer_fire(version).await;
}
