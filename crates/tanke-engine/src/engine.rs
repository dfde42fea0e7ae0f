//! The 5D progression state machine.
//!
//! [`ProgressionEngine`] exclusively owns the [`ProgressionState`]. Every
//! operation takes a short `std::sync::Mutex` section; `submit_answer`
//! releases it while the tutor is thinking and marks the session as
//! awaiting a response, so a second submission in that window is a no-op.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tanke_core::{recommend, KnowledgeMap, QuestionBank};
use tanke_models::{ChatMessage, Dimension, LearningStatus, QuestionItem, ScaffoldResource};
use tanke_tutor::prompts;
use tanke_tutor::{Tutor, TutorReply};
use tracing::{debug, info, warn};

use crate::error::{EngineError, Result};

/// Snapshot of a learning session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionState {
    pub current_dimension: Dimension,
    /// Index into the current dimension's question list.
    pub current_question_index: usize,
    /// Completed dimensions in completion order; never shrinks.
    pub completed_dimensions: Vec<Dimension>,
    pub transcript: Vec<ChatMessage>,
    pub last_diagnosis: Option<LearningStatus>,
    pub awaiting_response: bool,
}

impl ProgressionState {
    /// Check whether `dimension` has been completed.
    pub fn is_completed(&self, dimension: Dimension) -> bool {
        self.completed_dimensions.contains(&dimension)
    }
}

/// Result of [`ProgressionEngine::submit_answer`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The text was blank; nothing happened.
    Rejected,
    /// Another submission is in flight; nothing happened.
    Busy,
    /// The tutor replied and the reply was appended.
    Answered(TutorReply),
}

/// Result of [`ProgressionEngine::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Moved to another question in the same dimension.
    NextQuestion { dimension: Dimension, index: usize },
    /// Finished a dimension and entered the next one.
    NextDimension { completed: Dimension, next: Dimension },
    /// Finished the last dimension; the completion message was appended.
    Completed,
    /// The chain was already complete; nothing changed.
    AlreadyComplete,
}

struct Session {
    state: ProgressionState,
    /// Set once the completion message has been appended.
    finished: bool,
}

/// Clears `awaiting_response` if a submission ends without appending a
/// reply, e.g. when its future is dropped while the tutor is thinking.
struct PendingReply<'a> {
    session: &'a Mutex<Option<Session>>,
    armed: bool,
}

impl<'a> PendingReply<'a> {
    fn new(session: &'a Mutex<Option<Session>>) -> Self {
        Self {
            session,
            armed: true,
        }
    }

    /// The reply was appended and the flag cleared under the same lock.
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingReply<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut guard = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(session) = guard.as_mut() {
            session.state.awaiting_response = false;
        }
        warn!("Submission abandoned before the tutor replied");
    }
}

/// Drives a student through the 5D question chain.
pub struct ProgressionEngine {
    bank: Arc<QuestionBank>,
    tutor: Arc<dyn Tutor>,
    catalog: Vec<ScaffoldResource>,
    session: Mutex<Option<Session>>,
}

impl ProgressionEngine {
    /// Create an engine over `bank`, asking `tutor` for replies.
    ///
    /// The engine starts uninitialized; call [`initialize`](Self::initialize)
    /// before anything else.
    pub fn new(bank: Arc<QuestionBank>, tutor: Arc<dyn Tutor>) -> Self {
        Self {
            bank,
            tutor,
            catalog: tanke_core::default_catalog(),
            session: Mutex::new(None),
        }
    }

    /// Replace the scaffold catalog.
    pub fn with_catalog(mut self, catalog: Vec<ScaffoldResource>) -> Self {
        self.catalog = catalog;
        self
    }

    /// The question bank in use.
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Start the session at the first question of the first dimension.
    pub fn initialize(&self) -> Result<()> {
        let mut guard = self.lock()?;
        if guard.is_some() {
            return Err(EngineError::AlreadyInitialized);
        }

        let dimension = Dimension::first();
        let first = self.bank.question(dimension, 0)?;
        let intro = ChatMessage::model(prompts::intro_message(dimension, &first.question));

        *guard = Some(Session {
            state: ProgressionState {
                current_dimension: dimension,
                current_question_index: 0,
                completed_dimensions: Vec::new(),
                transcript: vec![intro],
                last_diagnosis: None,
                awaiting_response: false,
            },
            finished: false,
        });

        info!(dimension = %dimension.code(), question_id = first.id, "Session initialized");
        Ok(())
    }

    /// Submit a student answer and wait for the tutor's reply.
    ///
    /// Blank text is rejected and a submission while another is in flight
    /// is ignored; neither reaches the tutor. Dropping the returned future
    /// releases the in-flight slot; the student's message stays in the
    /// transcript without a reply.
    pub async fn submit_answer(&self, text: &str) -> Result<SubmitOutcome> {
        let (transcript, question) = {
            let mut guard = self.lock()?;
            let session = guard.as_mut().ok_or(EngineError::NotInitialized)?;

            if text.trim().is_empty() {
                debug!("Rejected blank answer");
                return Ok(SubmitOutcome::Rejected);
            }
            if session.state.awaiting_response {
                debug!("Ignored answer while awaiting response");
                return Ok(SubmitOutcome::Busy);
            }

            let question = self
                .bank
                .question(
                    session.state.current_dimension,
                    session.state.current_question_index,
                )?
                .question
                .clone();

            session.state.transcript.push(ChatMessage::user(text));
            session.state.awaiting_response = true;
            (session.state.transcript.clone(), question)
        };

        let pending = PendingReply::new(&self.session);
        let reply = self.tutor.ask(&transcript, &question).await;

        let mut guard = self.lock()?;
        let session = guard.as_mut().ok_or(EngineError::NotInitialized)?;
        let state = &mut session.state;

        state.transcript.push(ChatMessage::model_with_analysis(
            reply.text.clone(),
            reply.diagnosis.clone(),
        ));
        if let Some(diagnosis) = &reply.diagnosis {
            debug!(
                mastery = diagnosis.mastery_level,
                gaps = diagnosis.identified_gaps.len(),
                "Diagnosis updated"
            );
            state.last_diagnosis = Some(diagnosis.clone());
        }
        state.awaiting_response = false;
        pending.disarm();

        Ok(SubmitOutcome::Answered(reply))
    }

    /// Move to the next question, or to the next dimension when the current
    /// one is exhausted.
    ///
    /// Once the last dimension is done this becomes a no-op returning
    /// [`AdvanceOutcome::AlreadyComplete`].
    pub fn advance(&self) -> Result<AdvanceOutcome> {
        let mut guard = self.lock()?;
        let session = guard.as_mut().ok_or(EngineError::NotInitialized)?;
        let state = &mut session.state;

        let dimension = state.current_dimension;
        let next_index = state.current_question_index + 1;

        if next_index < self.bank.len_for(dimension) {
            let question = self.bank.question(dimension, next_index)?;
            state.current_question_index = next_index;
            state
                .transcript
                .push(ChatMessage::model(prompts::next_question_message(&question.question)));

            debug!(dimension = %dimension.code(), index = next_index, "Advanced to next question");
            return Ok(AdvanceOutcome::NextQuestion {
                dimension,
                index: next_index,
            });
        }

        if !state.completed_dimensions.contains(&dimension) {
            state.completed_dimensions.push(dimension);
        }

        match dimension.next() {
            Some(next) => {
                let question = self.bank.question(next, 0)?;
                state.current_dimension = next;
                state.current_question_index = 0;
                state.transcript.push(ChatMessage::model(prompts::next_dimension_message(
                    dimension,
                    next,
                    &question.question,
                )));

                info!(
                    completed = %dimension.code(),
                    next = %next.code(),
                    "Dimension completed"
                );
                Ok(AdvanceOutcome::NextDimension {
                    completed: dimension,
                    next,
                })
            }
            None if session.finished => Ok(AdvanceOutcome::AlreadyComplete),
            None => {
                session.finished = true;
                state.transcript.push(ChatMessage::model(prompts::completion_message(
                    state.completed_dimensions.len(),
                )));

                info!(
                    completed = state.completed_dimensions.len(),
                    "Question chain completed"
                );
                Ok(AdvanceOutcome::Completed)
            }
        }
    }

    /// Jump to `dimension` at its first question.
    ///
    /// Navigation is unrestricted and leaves the transcript and completed
    /// set untouched.
    pub fn select_dimension(&self, dimension: Dimension) -> Result<()> {
        let mut guard = self.lock()?;
        let session = guard.as_mut().ok_or(EngineError::NotInitialized)?;

        if session.state.awaiting_response {
            warn!(
                dimension = %dimension.code(),
                "Switching dimension while a reply is pending"
            );
        }

        session.state.current_dimension = dimension;
        session.state.current_question_index = 0;

        debug!(dimension = %dimension.code(), "Dimension selected");
        Ok(())
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> Result<ProgressionState> {
        self.read(|session| session.state.clone())
    }

    /// The question in focus.
    pub fn current_question(&self) -> Result<QuestionItem> {
        let (dimension, index) = self.read(|session| {
            (
                session.state.current_dimension,
                session.state.current_question_index,
            )
        })?;
        Ok(self.bank.question(dimension, index)?.clone())
    }

    /// Most recent diagnosis, if any.
    pub fn last_diagnosis(&self) -> Result<Option<LearningStatus>> {
        self.read(|session| session.state.last_diagnosis.clone())
    }

    /// Check if a submission is waiting on the tutor.
    pub fn is_awaiting_response(&self) -> Result<bool> {
        self.read(|session| session.state.awaiting_response)
    }

    /// Check if the completion message has been reached.
    pub fn is_complete(&self) -> Result<bool> {
        self.read(|session| session.finished)
    }

    /// Scaffold resources for the current dimension.
    pub fn recommended_scaffolds(&self) -> Result<Vec<ScaffoldResource>> {
        let dimension = self.read(|session| session.state.current_dimension)?;
        Ok(recommend(&self.catalog, dimension)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Knowledge map for the current progress.
    pub fn knowledge_map(&self) -> Result<KnowledgeMap> {
        let (current, completed) = self.read(|session| {
            (
                session.state.current_dimension,
                session.state.completed_dimensions.clone(),
            )
        })?;
        Ok(KnowledgeMap::build(&self.bank, current, &completed))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Session>>> {
        self.session
            .lock()
            .map_err(|e| EngineError::LockPoisoned(e.to_string()))
    }

    fn read<T>(&self, f: impl FnOnce(&Session) -> T) -> Result<T> {
        let guard = self.lock()?;
        let session = guard.as_ref().ok_or(EngineError::NotInitialized)?;
        Ok(f(session))
    }
}
