//! Session actor implementation with async message handling.

use super::{
    config::SessionConfig,
    errors::{SessionError, SessionResult},
    messages::{Completion, SessionMessage, SessionNotification, Ticket},
};
use crate::{
    bot::{Generator, models::GenerationError},
    game::{
        entities::{GameView, ParticipantId, Phase, RequestedAction},
        orchestration::{NextStep, build_request, interpret_response, next_step},
        rng::{GameRng, SeededRng},
        state_machine::{
            ClueSubmission, GameError, GameEvent, Reset, SessionState, SetupPlan,
            VoteSubmission,
        },
        words::WordSupplier,
    },
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};

/// Completions are rare and consumed immediately.
const COMPLETION_CAPACITY: usize = 8;

/// Session actor handle for sending messages
#[derive(Clone, Debug)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionMessage>,
}

impl SessionHandle {
    /// Create a new session handle
    pub fn new(sender: mpsc::Sender<SessionMessage>) -> Self {
        Self { sender }
    }

    /// Send a message to the session
    pub async fn send(&self, message: SessionMessage) -> SessionResult<()> {
        self.sender
            .send(message)
            .await
            .map_err(|_| SessionError::Closed)
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> SessionMessage,
    ) -> SessionResult<T> {
        let (response, reply) = oneshot::channel();
        self.send(build(response)).await?;
        reply.await.map_err(|_| SessionError::Closed)
    }

    pub async fn new_game(&self) -> SessionResult<Arc<SessionState>> {
        self.request(|response| SessionMessage::NewGame { response })
            .await?
    }

    pub async fn submit_clue(
        &self,
        participant_id: &ParticipantId,
        word: &str,
    ) -> SessionResult<Arc<SessionState>> {
        self.request(|response| SessionMessage::SubmitClue {
            participant_id: participant_id.clone(),
            word: word.to_string(),
            response,
        })
        .await?
    }

    pub async fn submit_vote(
        &self,
        voter_id: &ParticipantId,
        suspect_id: &ParticipantId,
    ) -> SessionResult<Arc<SessionState>> {
        self.request(|response| SessionMessage::SubmitVote {
            voter_id: voter_id.clone(),
            suspect_id: suspect_id.clone(),
            response,
        })
        .await?
    }

    pub async fn reset(&self) -> SessionResult<Arc<SessionState>> {
        self.request(|response| SessionMessage::Reset { response })
            .await?
    }

    pub async fn snapshot(&self) -> SessionResult<Arc<SessionState>> {
        self.request(|response| SessionMessage::GetSnapshot { response })
            .await
    }

    pub async fn view(&self, participant_id: &ParticipantId) -> SessionResult<Option<GameView>> {
        self.request(|response| SessionMessage::GetView {
            participant_id: participant_id.clone(),
            response,
        })
        .await
    }

    pub async fn phase_log(&self) -> SessionResult<Vec<Phase>> {
        self.request(|response| SessionMessage::GetPhaseLog { response })
            .await
    }

    /// Subscribe to notifications. Notifications are dropped, not queued,
    /// while the returned receiver is full.
    pub async fn subscribe(
        &self,
        subscriber: &str,
        capacity: usize,
    ) -> SessionResult<mpsc::Receiver<SessionNotification>> {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        self.send(SessionMessage::Subscribe {
            subscriber: subscriber.to_string(),
            sender,
        })
        .await?;
        Ok(receiver)
    }

    pub async fn unsubscribe(&self, subscriber: &str) -> SessionResult<()> {
        self.send(SessionMessage::Unsubscribe {
            subscriber: subscriber.to_string(),
        })
        .await
    }

    pub async fn close(&self) -> SessionResult<()> {
        self.request(|response| SessionMessage::Close { response })
            .await
    }
}

/// Session actor owning the only mutable pointer to the current snapshot.
///
/// Every transition is applied here, one at a time. Automated seats are
/// served by spawned generator tasks whose results come back through the
/// completion channel, tagged with the game generation they were issued
/// for.
pub struct SessionActor {
    /// Session configuration
    config: SessionConfig,

    /// Current snapshot
    state: Arc<SessionState>,

    /// Message inbox
    inbox: mpsc::Receiver<SessionMessage>,

    /// Generator results
    completions: mpsc::Receiver<Completion>,
    completion_sender: mpsc::Sender<Completion>,

    generator: Arc<dyn Generator>,
    words: Arc<dyn WordSupplier>,
    rng: Box<dyn GameRng>,

    /// The one outstanding generator request, if any
    pending: Option<Ticket>,
    in_flight: Option<JoinHandle<()>>,

    /// Phases entered by the current game
    phase_log: Vec<Phase>,

    /// Subscribers for state change notifications
    subscribers: HashMap<String, mpsc::Sender<SessionNotification>>,

    /// Is session closed
    is_closed: bool,
}

impl SessionActor {
    /// Create a new session actor
    ///
    /// # Returns
    ///
    /// * `(SessionActor, SessionHandle)` - Actor and handle for sending messages
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidConfig`] if `config` fails validation.
    pub fn new(
        config: SessionConfig,
        generator: Arc<dyn Generator>,
        words: Arc<dyn WordSupplier>,
    ) -> SessionResult<(Self, SessionHandle)> {
        config.validate().map_err(SessionError::InvalidConfig)?;

        let (sender, inbox) = mpsc::channel(config.inbox_capacity);
        let (completion_sender, completions) = mpsc::channel(COMPLETION_CAPACITY);
        let state = Arc::new(SessionState::with_tie_break(config.tie_break));
        let rng = Box::new(SeededRng::new(config.seed));

        let actor = Self {
            config,
            phase_log: vec![state.phase],
            state,
            inbox,
            completions,
            completion_sender,
            generator,
            words,
            rng,
            pending: None,
            in_flight: None,
            subscribers: HashMap::new(),
            is_closed: false,
        };

        Ok((actor, SessionHandle::new(sender)))
    }

    /// Replace the randomness source used for setup and fallbacks.
    pub fn with_rng(mut self, rng: Box<dyn GameRng>) -> Self {
        self.rng = rng;
        self
    }

    /// Run the session actor event loop
    pub async fn run(mut self) {
        log::info!("Session {} starting", self.state.session_id);

        loop {
            tokio::select! {
                message = self.inbox.recv() => match message {
                    Some(message) => self.handle_message(message),
                    None => break,
                },

                Some(completion) = self.completions.recv() => {
                    self.handle_completion(completion);
                }
            }

            if self.is_closed {
                break;
            }
        }

        self.cancel_in_flight();
        log::info!("Session {} closed", self.state.session_id);
    }

    /// Handle a session message
    fn handle_message(&mut self, message: SessionMessage) {
        match message {
            SessionMessage::NewGame { response } => {
                let result = self.handle_new_game();
                let accepted = result.is_ok();
                let _ = response.send(result);
                if accepted {
                    self.drive();
                }
            }

            SessionMessage::SubmitClue {
                participant_id,
                word,
                response,
            } => {
                let event = ClueSubmission {
                    participant_id: participant_id.clone(),
                    raw_word: word,
                    at: Utc::now(),
                };
                let result = self.apply_human(&participant_id, event.into());
                let accepted = result.is_ok();
                let _ = response.send(result);
                if accepted {
                    self.drive();
                }
            }

            SessionMessage::SubmitVote {
                voter_id,
                suspect_id,
                response,
            } => {
                let event = VoteSubmission {
                    voter_id: voter_id.clone(),
                    suspect_id,
                };
                let result = self.apply_human(&voter_id, event.into());
                let accepted = result.is_ok();
                let _ = response.send(result);
                if accepted {
                    self.drive();
                }
            }

            SessionMessage::Reset { response } => {
                self.cancel_in_flight();
                let result = self.apply(&Reset.into());
                if result.is_ok() {
                    self.phase_log = vec![self.state.phase];
                }
                let _ = response.send(result.map(|()| Arc::clone(&self.state)));
            }

            SessionMessage::GetSnapshot { response } => {
                let _ = response.send(Arc::clone(&self.state));
            }

            SessionMessage::GetView {
                participant_id,
                response,
            } => {
                let _ = response.send(self.state.view_for(&participant_id));
            }

            SessionMessage::GetPhaseLog { response } => {
                let _ = response.send(self.phase_log.clone());
            }

            SessionMessage::Subscribe { subscriber, sender } => {
                log::debug!("Subscriber {} added", subscriber);
                self.subscribers.insert(subscriber, sender);
            }

            SessionMessage::Unsubscribe { subscriber } => {
                self.subscribers.remove(&subscriber);
            }

            SessionMessage::Close { response } => {
                self.cancel_in_flight();
                self.is_closed = true;
                let _ = response.send(());
            }
        }
    }

    fn handle_new_game(&mut self) -> SessionResult<Arc<SessionState>> {
        let plan = SetupPlan::draw(&self.config.roster, self.rng.as_mut(), self.words.as_ref())?;
        self.cancel_in_flight();

        let from_lobby = self.state.phase == Phase::Lobby;
        self.apply(&plan.into())?;
        self.phase_log = if from_lobby {
            vec![Phase::Lobby, Phase::Setup]
        } else {
            vec![Phase::Setup]
        };

        log::info!(
            "Session {} generation {} set up with {} participants",
            self.state.session_id,
            self.state.generation,
            self.state.participants.len()
        );
        Ok(Arc::clone(&self.state))
    }

    /// Apply an event submitted on behalf of the human seat.
    fn apply_human(
        &mut self,
        participant_id: &ParticipantId,
        event: GameEvent,
    ) -> SessionResult<Arc<SessionState>> {
        match self.state.participant(participant_id) {
            Some(p) if p.is_human() => {}
            Some(_) => return Err(SessionError::NotHumanSeat(participant_id.clone())),
            None => return Err(GameError::UnknownParticipant(participant_id.clone()).into()),
        }
        self.apply(&event)?;
        Ok(Arc::clone(&self.state))
    }

    /// Apply `event` to the current snapshot and broadcast the result.
    fn apply(&mut self, event: &GameEvent) -> SessionResult<()> {
        let next = self.state.apply(event)?;
        if next.phase != self.state.phase {
            log::debug!(
                "Session {} phase {} -> {}",
                next.session_id,
                self.state.phase,
                next.phase
            );
            self.phase_log.push(next.phase);
        }
        self.state = Arc::new(next);
        self.notify_state_change(SessionNotification::StateChanged(Arc::clone(&self.state)));
        Ok(())
    }

    /// Advance until the game needs outside input.
    fn drive(&mut self) {
        while self.pending.is_none() {
            match next_step(&self.state) {
                NextStep::Advance(advance) => {
                    if let Err(e) = self.apply(&advance.event()) {
                        log::error!(
                            "Session {}: auto-advance {:?} failed: {}",
                            self.state.session_id,
                            advance,
                            e
                        );
                        return;
                    }
                    if self.state.phase == Phase::Results {
                        log::info!(
                            "Session {} finished: {} side wins",
                            self.state.session_id,
                            self.state
                                .winning_side
                                .map(|side| side.to_string())
                                .unwrap_or_default()
                        );
                    }
                }
                NextStep::Generate {
                    participant,
                    action,
                } => {
                    self.dispatch(participant, action);
                    return;
                }
                NextStep::AwaitHuman {
                    participant,
                    action,
                } => {
                    self.notify_state_change(SessionNotification::AwaitingHuman {
                        participant,
                        action,
                    });
                    return;
                }
                NextStep::Idle => return,
            }
        }
    }

    /// Issue one generator request on a separate task.
    fn dispatch(&mut self, participant: ParticipantId, action: RequestedAction) {
        let request = match build_request(&self.state, &participant, action) {
            Ok(request) => request,
            Err(e) => {
                log::error!("Session {}: {}", self.state.session_id, e);
                return;
            }
        };

        let ticket = Ticket {
            generation: self.state.generation,
            participant,
            action,
        };
        self.pending = Some(ticket.clone());

        let generator = Arc::clone(&self.generator);
        let completions = self.completion_sender.clone();
        let timeout = self.config.generation_timeout();
        self.in_flight = Some(tokio::spawn(async move {
            let response = tokio::time::timeout(timeout, generator.generate(&request))
                .await
                .unwrap_or(Err(GenerationError::Timeout));
            let _ = completions.send(Completion { ticket, response }).await;
        }));
    }

    fn handle_completion(&mut self, completion: Completion) {
        if self.pending.as_ref() != Some(&completion.ticket) {
            log::debug!(
                "Session {}: discarding stale {} for {} (generation {})",
                self.state.session_id,
                completion.ticket.action,
                completion.ticket.participant,
                completion.ticket.generation
            );
            return;
        }
        self.pending = None;
        self.in_flight = None;

        let Ticket {
            participant,
            action,
            ..
        } = completion.ticket;
        let applied = interpret_response(
            &self.state,
            &participant,
            action,
            completion.response,
            self.rng.as_mut(),
        )
        .map_err(SessionError::from)
        .and_then(|event| self.apply(&event));

        if let Err(e) = applied {
            log::warn!(
                "Session {}: {} for {} rejected ({}), using fallback",
                self.state.session_id,
                action,
                participant,
                e
            );
            let fallback = interpret_response(
                &self.state,
                &participant,
                action,
                Err(GenerationError::Malformed(e.to_string())),
                self.rng.as_mut(),
            )
            .map_err(SessionError::from)
            .and_then(|event| self.apply(&event));
            if let Err(e) = fallback {
                log::error!("Session {}: fallback failed: {}", self.state.session_id, e);
                return;
            }
        }

        self.drive();
    }

    fn cancel_in_flight(&mut self) {
        self.pending = None;
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
    }

    /// Notify all subscribers of a state change
    fn notify_state_change(&mut self, notification: SessionNotification) {
        self.subscribers.retain(|subscriber, sender| {
            match sender.try_send(notification.clone()) {
                Ok(_) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::warn!(
                        "Subscriber {} channel full, dropping notification",
                        subscriber
                    );
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    log::debug!("Subscriber {} disconnected, removing", subscriber);
                    false
                }
            }
        });
    }
}
