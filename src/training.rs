//! Training sessions: per-user progress through the lexicon.
//!
//! Each user moves `NoSession -> InProgress -> Completed`, and can drop back
//! to `NoSession` with `stop`. The store is a sharded concurrent map, so two
//! users never contend on the same lock while calls for one user are
//! serialised by the shard lock of their entry.

use crate::error::GatewayError;
use crate::i18n::Lexicon;
use dashmap::DashMap;
use tracing::debug;

/// Progress of one user's session. `completed <= total` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: u32,
    pub total: u32,
}

impl Progress {
    fn is_finished(&self) -> bool {
        self.completed >= self.total
    }
}

/// What the user sees after starting or answering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainingStep {
    /// Next word to translate, with the counters after this step.
    Word {
        word: &'static str,
        completed: u32,
        total: u32,
    },
    /// Every word has been answered.
    AllDone,
}

/// Concurrent map from user id to training progress.
pub struct SessionStore {
    sessions: DashMap<String, Progress>,
    lexicon: &'static Lexicon,
}

impl SessionStore {
    pub fn new(lexicon: &'static Lexicon) -> Self {
        Self {
            sessions: DashMap::new(),
            lexicon,
        }
    }

    /// Start (or restart) a session for `user_id`.
    ///
    /// Any previous progress for this user is replaced, never accumulated.
    pub fn start(&self, user_id: &str) -> TrainingStep {
        let progress = Progress {
            completed: 0,
            total: u32::try_from(self.lexicon.len()).unwrap_or(u32::MAX),
        };
        self.sessions.insert(user_id.to_string(), progress);
        debug!(user_id, total = progress.total, "Training session started");
        self.step(progress)
    }

    /// Record an answer and return the next step.
    ///
    /// Any non-empty answer counts as correct; an empty one leaves progress
    /// untouched. A finished session stays finished.
    pub fn submit(&self, user_id: &str, answer: &str) -> Result<TrainingStep, GatewayError> {
        let mut entry = self
            .sessions
            .get_mut(user_id)
            .ok_or(GatewayError::NoActiveSession)?;

        if entry.is_finished() {
            return Ok(TrainingStep::AllDone);
        }

        if !answer.is_empty() {
            entry.completed += 1;
        }

        let progress = *entry;
        drop(entry);

        debug!(
            user_id,
            completed = progress.completed,
            total = progress.total,
            "Answer recorded"
        );
        Ok(self.step(progress))
    }

    /// End the session for `user_id`.
    pub fn stop(&self, user_id: &str) -> Result<(), GatewayError> {
        if self.sessions.remove(user_id).is_none() {
            return Err(GatewayError::NoActiveSession);
        }
        debug!(user_id, "Training session stopped");
        Ok(())
    }

    /// Current progress of `user_id`, if a session exists.
    pub fn progress(&self, user_id: &str) -> Option<Progress> {
        self.sessions.get(user_id).map(|entry| *entry)
    }

    /// Number of users with a session.
    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    fn step(&self, progress: Progress) -> TrainingStep {
        if progress.is_finished() {
            return TrainingStep::AllDone;
        }
        match self.lexicon.training_word(progress.completed as usize) {
            Some(word) => TrainingStep::Word {
                word,
                completed: progress.completed,
                total: progress.total,
            },
            None => TrainingStep::AllDone,
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Lexicon::get())
    }
}
