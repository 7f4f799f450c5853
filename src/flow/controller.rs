use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::audio::SoundCue;
use crate::constants::{FLOW_EVENT_CAPACITY, LAST_PAGE};
use crate::flow::assessment::{AnswerOutcome, Assessment, AssessmentStep};
use crate::flow::cursor::{Cursor, CursorStep};
use crate::flow::events::FlowEvent;
use crate::flow::phase::{FlowFailure, InputMode, Phase, PhaseKind};
use crate::flow::selection::TextSelection;
use crate::flow::FlowError;
use crate::mood::MoodPublisher;
use crate::session::{manual, Session};
use crate::validation::{non_blank, validate_session};

/// Identity of one generation attempt. Every async completion carries the
/// ticket it was issued under; the controller drops completions whose ticket
/// is no longer current.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionTicket(pub u64);

impl SessionTicket {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SessionTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Work for the generator, issued when the flow enters `Generating`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub ticket: SessionTicket,
    pub mode: InputMode,
    pub input: String,
    pub manual_words: Vec<String>,
}

/// One illustrative image to fetch for word `index` of session `ticket`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageJob {
    pub ticket: SessionTicket,
    pub index: usize,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submitted {
    /// Analyze-text mode: the learner picks words next.
    Selecting,
    /// A generation call must be made.
    Generate(GenerationRequest),
    /// A manual payload was installed directly.
    Installed(Vec<ImageJob>),
    /// A manual payload was rejected; the flow is back at the input screen.
    Failed(FlowFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Installed(Vec<ImageJob>),
    Failed(FlowFailure),
    /// The ticket was superseded; nothing changed.
    Stale,
}

/// Generated images by word index. Absent means still pending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageCache {
    images: HashMap<usize, String>,
}

impl ImageCache {
    pub fn get(&self, index: usize) -> Option<&str> {
        self.images.get(&index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    fn insert(&mut self, index: usize, image: String) {
        self.images.insert(index, image);
    }

    fn clear(&mut self) {
        self.images.clear();
    }
}

/// Owns the session and every piece of state derived from it. Screens only
/// read snapshots and request transitions through the methods below.
pub struct FlowController {
    mode: InputMode,
    phase: Phase,
    session: Option<Arc<Session>>,
    session_id: Option<Uuid>,
    images: ImageCache,
    input: String,
    ticket: SessionTicket,
    mood: MoodPublisher,
    events: broadcast::Sender<FlowEvent>,
}

impl fmt::Debug for FlowController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowController")
            .field("mode", &self.mode)
            .field("phase", &self.phase.kind())
            .field("session_id", &self.session_id)
            .field("images", &self.images.len())
            .field("ticket", &self.ticket)
            .finish()
    }
}

impl FlowController {
    pub fn new(mood: MoodPublisher) -> Self {
        let (events, _) = broadcast::channel(FLOW_EVENT_CAPACITY);
        Self {
            mode: InputMode::default(),
            phase: Phase::Idle { error: None },
            session: None,
            session_id: None,
            images: ImageCache::default(),
            input: String::new(),
            ticket: SessionTicket::default(),
            mood,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FlowEvent> {
        self.events.subscribe()
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn phase_kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn session(&self) -> Option<&Arc<Session>> {
        self.session.as_ref()
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn ticket(&self) -> SessionTicket {
        self.ticket
    }

    pub fn mood_color(&self) -> String {
        self.mood.current().to_string()
    }

    /// The pagination cursor, present only inside the learning sequence.
    pub fn cursor(&self) -> Option<Cursor> {
        match self.phase {
            Phase::LearningSequence(cursor) => Some(cursor),
            _ => None,
        }
    }

    pub fn last_error(&self) -> Option<FlowFailure> {
        match self.phase {
            Phase::Idle { error } => error,
            _ => None,
        }
    }

    fn emit(&self, event: FlowEvent) {
        // No subscribers is the normal state between page loads.
        let _ = self.events.send(event);
    }

    fn cue(&self, cue: SoundCue) {
        self.emit(FlowEvent::Sound { cue });
    }

    fn set_phase(&mut self, next: Phase) {
        let from = self.phase.kind();
        let to = next.kind();
        debug_assert!(from.can_transition_to(to), "illegal edge {from:?} -> {to:?}");
        self.phase = next;
        if from != to {
            tracing::debug!(?from, ?to, ticket = %self.ticket, "Flow phase changed");
            self.emit(FlowEvent::Phase {
                phase: to,
                ticket: self.ticket,
                at: chrono::Utc::now(),
            });
        }
    }

    fn invalid(&self, action: &'static str) -> FlowError {
        FlowError::InvalidTransition {
            phase: self.phase.kind(),
            action,
        }
    }

    fn publish_mood_for(&self, index: usize) {
        let Some(word) = self.session.as_ref().and_then(|s| s.word(index)) else {
            return;
        };
        if self.mood.publish(&word.mood_color) {
            self.emit(FlowEvent::Mood {
                color: word.mood_color.to_string(),
            });
        }
    }

    fn word_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.len())
    }

    pub fn set_mode(&mut self, mode: InputMode) -> Result<(), FlowError> {
        if !matches!(self.phase, Phase::Idle { .. }) {
            return Err(self.invalid("set_mode"));
        }
        self.mode = mode;
        self.phase = Phase::Idle { error: None };
        Ok(())
    }

    /// Starts a session from the input screen according to the current mode.
    pub fn submit(&mut self, input: &str) -> Result<Submitted, FlowError> {
        if !matches!(self.phase, Phase::Idle { .. }) {
            return Err(self.invalid("submit"));
        }
        let text = non_blank(input).ok_or(FlowError::EmptyInput)?;
        self.input = input.to_string();

        match self.mode {
            InputMode::Text => {
                self.set_phase(Phase::TextSelection(TextSelection::new(text)));
                self.cue(SoundCue::Click);
                Ok(Submitted::Selecting)
            }
            InputMode::Topic => Ok(Submitted::Generate(self.start_generation(text, Vec::new())?)),
            InputMode::Forge => Ok(self.forge(text)),
        }
    }

    fn forge(&mut self, raw: &str) -> Submitted {
        self.ticket = self.ticket.next();
        match manual::parse_payload(raw) {
            Ok(session) => {
                let jobs = self.install(session);
                Submitted::Installed(jobs)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Manual session payload rejected");
                self.fail(FlowFailure::MalformedPayload);
                Submitted::Failed(FlowFailure::MalformedPayload)
            }
        }
    }

    /// Clears the previous session and enters `Generating` under a fresh
    /// ticket. The caller runs the returned request and reports back through
    /// [`complete_generation`](Self::complete_generation).
    pub fn start_generation(
        &mut self,
        text: &str,
        manual_words: Vec<String>,
    ) -> Result<GenerationRequest, FlowError> {
        if !matches!(self.phase, Phase::Idle { .. } | Phase::TextSelection(_)) {
            return Err(self.invalid("start_generation"));
        }
        if non_blank(text).is_none() {
            return Err(FlowError::EmptyInput);
        }

        self.ticket = self.ticket.next();
        self.session = None;
        self.session_id = None;
        self.images.clear();
        self.set_phase(Phase::Generating {
            ticket: self.ticket,
        });

        tracing::info!(
            ticket = %self.ticket,
            mode = ?self.mode,
            manual_words = manual_words.len(),
            "Session generation started"
        );

        Ok(GenerationRequest {
            ticket: self.ticket,
            mode: self.mode,
            input: text.to_string(),
            manual_words,
        })
    }

    pub fn complete_generation<E: fmt::Display>(
        &mut self,
        ticket: SessionTicket,
        result: Result<Session, E>,
    ) -> Completion {
        let current = matches!(self.phase, Phase::Generating { ticket: t } if t == ticket);
        if !current || ticket != self.ticket {
            tracing::debug!(%ticket, current = %self.ticket, "Dropping stale generation result");
            return Completion::Stale;
        }

        let session = match result {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(%ticket, error = %e, "Session generation failed");
                let failure = FlowFailure::for_mode(self.mode);
                self.fail(failure);
                return Completion::Failed(failure);
            }
        };

        if let Err(e) = validate_session(&session) {
            tracing::warn!(%ticket, error = %e, "Generated session is invalid");
            let failure = FlowFailure::for_mode(self.mode);
            self.fail(failure);
            return Completion::Failed(failure);
        }

        Completion::Installed(self.install(session))
    }

    fn fail(&mut self, failure: FlowFailure) {
        self.set_phase(Phase::Idle {
            error: Some(failure),
        });
    }

    fn install(&mut self, session: Session) -> Vec<ImageJob> {
        self.images.clear();
        let mut jobs = Vec::new();
        for (index, word) in session.words.iter().enumerate() {
            match &word.image_url {
                Some(url) => self.images.insert(index, url.clone()),
                None => jobs.push(ImageJob {
                    ticket: self.ticket,
                    index,
                    prompt: word.visual_prompt.clone(),
                }),
            }
        }

        let id = Uuid::new_v4();
        tracing::info!(
            session_id = %id,
            ticket = %self.ticket,
            topic = %session.topic,
            words = session.len(),
            pending_images = jobs.len(),
            "Session installed"
        );

        self.session = Some(Arc::new(session));
        self.session_id = Some(id);
        self.set_phase(Phase::ParagraphPreview);
        self.publish_mood_for(0);
        self.cue(SoundCue::Success);
        jobs
    }

    /// Stores a finished image if it belongs to the current session. Returns
    /// whether it was stored.
    pub fn merge_image(&mut self, ticket: SessionTicket, index: usize, image: Option<String>) -> bool {
        if ticket != self.ticket || index >= self.word_count() {
            tracing::debug!(%ticket, current = %self.ticket, index, "Dropping stale image");
            return false;
        }
        let Some(image) = image else {
            return false;
        };
        self.images.insert(index, image);
        self.emit(FlowEvent::Image { ticket, index });
        true
    }

    pub fn selection(&self) -> Option<&TextSelection> {
        match &self.phase {
            Phase::TextSelection(sel) => Some(sel),
            _ => None,
        }
    }

    fn selection_mut(&mut self, action: &'static str) -> Result<&mut TextSelection, FlowError> {
        let phase = self.phase.kind();
        match &mut self.phase {
            Phase::TextSelection(sel) => Ok(sel),
            _ => Err(FlowError::InvalidTransition { phase, action }),
        }
    }

    pub fn edit_selection(&mut self, text: &str) -> Result<(), FlowError> {
        self.selection_mut("edit_selection")?.edit(text)
    }

    pub fn lock_selection(&mut self) -> Result<(), FlowError> {
        self.selection_mut("lock_selection")?.lock()?;
        self.cue(SoundCue::Click);
        Ok(())
    }

    pub fn unlock_selection(&mut self) -> Result<(), FlowError> {
        self.selection_mut("unlock_selection")?.unlock();
        self.cue(SoundCue::Click);
        Ok(())
    }

    pub fn toggle_word(&mut self, token: &str) -> Result<bool, FlowError> {
        let selected = self.selection_mut("toggle_word")?.toggle(token)?;
        self.cue(SoundCue::Click);
        Ok(selected)
    }

    pub fn analyze_selection(&mut self) -> Result<GenerationRequest, FlowError> {
        let (text, words) = self.selection_mut("analyze_selection")?.analyze()?;
        self.start_generation(&text, words)
    }

    pub fn leave_selection(&mut self) -> Result<(), FlowError> {
        self.selection_mut("leave_selection")?;
        self.set_phase(Phase::Idle { error: None });
        Ok(())
    }

    /// Paragraph preview → first page of the first word.
    pub fn begin_sequence(&mut self) -> Result<PhaseKind, FlowError> {
        if !matches!(self.phase, Phase::ParagraphPreview) {
            return Err(self.invalid("begin_sequence"));
        }
        self.set_phase(Phase::LearningSequence(Cursor::ORIGIN));
        self.publish_mood_for(0);
        Ok(self.phase.kind())
    }

    fn step(
        &mut self,
        action: &'static str,
        movement: impl FnOnce(Cursor, usize) -> CursorStep,
    ) -> Result<PhaseKind, FlowError> {
        let Phase::LearningSequence(cursor) = self.phase else {
            return Err(self.invalid(action));
        };
        match movement(cursor, self.word_count()) {
            CursorStep::Moved(next) => {
                self.phase = Phase::LearningSequence(next);
                if next.word_index != cursor.word_index {
                    self.publish_mood_for(next.word_index);
                }
                self.cue(SoundCue::Transition);
            }
            CursorStep::PastEnd => {
                self.set_phase(Phase::ParagraphReview {
                    acknowledged: false,
                });
                self.cue(SoundCue::Success);
            }
            CursorStep::BeforeStart => {
                self.set_phase(Phase::ParagraphPreview);
            }
        }
        Ok(self.phase.kind())
    }

    pub fn advance(&mut self) -> Result<PhaseKind, FlowError> {
        self.step("advance", |c, n| c.advance(n))
    }

    pub fn retreat(&mut self) -> Result<PhaseKind, FlowError> {
        self.step("retreat", |c, _| c.retreat())
    }

    pub fn next_word(&mut self) -> Result<PhaseKind, FlowError> {
        self.step("next_word", |c, n| c.next_word(n))
    }

    pub fn previous_word(&mut self) -> Result<PhaseKind, FlowError> {
        self.step("previous_word", |c, _| c.previous_word())
    }

    /// Jumps to `page` of the current word.
    pub fn set_page(&mut self, page: usize) -> Result<Cursor, FlowError> {
        let Phase::LearningSequence(cursor) = self.phase else {
            return Err(self.invalid("set_page"));
        };
        if page > LAST_PAGE {
            return Err(FlowError::PageOutOfRange(page));
        }
        let next = Cursor::new(cursor.word_index, page);
        if next != cursor {
            self.phase = Phase::LearningSequence(next);
            self.cue(SoundCue::Transition);
        }
        Ok(next)
    }

    /// Dismisses the review paragraph in favour of the "mastery unlocked"
    /// interstitial.
    pub fn acknowledge_review(&mut self) -> Result<(), FlowError> {
        if !matches!(self.phase, Phase::ParagraphReview { .. }) {
            return Err(self.invalid("acknowledge_review"));
        }
        self.phase = Phase::ParagraphReview { acknowledged: true };
        self.cue(SoundCue::Success);
        Ok(())
    }

    pub fn complete_review(&mut self) -> Result<PhaseKind, FlowError> {
        if !matches!(self.phase, Phase::ParagraphReview { .. }) {
            return Err(self.invalid("complete_review"));
        }
        let session = self.session.clone().ok_or(FlowError::NoSession)?;
        self.set_phase(Phase::FinalAssessment(Assessment::new(&session)));
        self.cue(SoundCue::Click);
        Ok(self.phase.kind())
    }

    pub fn answer(&mut self, option: &str) -> Result<AnswerOutcome, FlowError> {
        let session = self.session.clone().ok_or(FlowError::NoSession)?;
        let phase = self.phase.kind();
        let Phase::FinalAssessment(assessment) = &mut self.phase else {
            return Err(FlowError::InvalidTransition {
                phase,
                action: "answer",
            });
        };
        let outcome = assessment.answer(&session, option)?;
        self.cue(if outcome.correct {
            SoundCue::Success
        } else {
            SoundCue::Click
        });
        Ok(outcome)
    }

    /// Moves to the next question, finishing the assessment after the last.
    pub fn next_question(&mut self) -> Result<PhaseKind, FlowError> {
        let phase = self.phase.kind();
        let Phase::FinalAssessment(assessment) = &mut self.phase else {
            return Err(FlowError::InvalidTransition {
                phase,
                action: "next_question",
            });
        };
        match assessment.next()? {
            AssessmentStep::Question(_) => Ok(PhaseKind::FinalAssessment),
            AssessmentStep::Finished { .. } => self.complete_assessment(),
        }
    }

    /// Final assessment → completion screen, once the last question has been
    /// answered.
    pub fn complete_assessment(&mut self) -> Result<PhaseKind, FlowError> {
        let Phase::FinalAssessment(assessment) = &self.phase else {
            return Err(self.invalid("complete_assessment"));
        };
        let on_last = assessment.step() + 1 >= assessment.total();
        if !on_last || !assessment.is_answered() {
            return Err(FlowError::NotAnswered);
        }
        let (score, total) = (assessment.score(), assessment.total());
        tracing::info!(session_id = ?self.session_id, score, total, "Assessment complete");
        self.set_phase(Phase::SessionComplete { score, total });
        Ok(self.phase.kind())
    }

    /// Runs the same session again from its first page.
    pub fn replay(&mut self) -> Result<PhaseKind, FlowError> {
        if !matches!(self.phase, Phase::SessionComplete { .. }) {
            return Err(self.invalid("replay"));
        }
        self.set_phase(Phase::LearningSequence(Cursor::ORIGIN));
        self.publish_mood_for(0);
        self.cue(SoundCue::Click);
        Ok(self.phase.kind())
    }

    pub fn new_session(&mut self) -> Result<PhaseKind, FlowError> {
        if !matches!(self.phase, Phase::SessionComplete { .. }) {
            return Err(self.invalid("new_session"));
        }
        self.input.clear();
        self.set_phase(Phase::Idle { error: None });
        self.cue(SoundCue::Success);
        Ok(self.phase.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::{mood_signal, MoodColor};
    use crate::session::fixtures;

    fn controller() -> FlowController {
        let (publisher, _reader) = mood_signal();
        FlowController::new(publisher)
    }

    fn in_sequence(words: usize) -> FlowController {
        let mut flow = controller();
        let request = flow.start_generation("topic", Vec::new()).unwrap();
        let done = flow.complete_generation::<String>(request.ticket, Ok(fixtures::session(words)));
        assert!(matches!(done, Completion::Installed(_)));
        flow.begin_sequence().unwrap();
        flow
    }

    #[test]
    fn empty_submit_changes_nothing() {
        let mut flow = controller();
        assert!(matches!(flow.submit("   "), Err(FlowError::EmptyInput)));
        assert_eq!(flow.phase_kind(), PhaseKind::Idle);
        assert_eq!(flow.ticket(), SessionTicket(0));
        assert_eq!(flow.input(), "");
    }

    #[test]
    fn topic_submit_generates_then_previews() {
        let mut flow = controller();
        let Submitted::Generate(request) = flow.submit("photosynthesis").unwrap() else {
            panic!("topic mode must generate");
        };
        assert_eq!(flow.phase_kind(), PhaseKind::Generating);
        assert_eq!(request.input, "photosynthesis");

        let done = flow.complete_generation::<String>(request.ticket, Ok(fixtures::session(3)));
        let Completion::Installed(jobs) = done else {
            panic!("expected install");
        };
        assert_eq!(jobs.len(), 3);
        assert_eq!(flow.phase_kind(), PhaseKind::ParagraphPreview);
        assert!(flow.session().unwrap().len() >= 1);

        flow.begin_sequence().unwrap();
        assert_eq!(flow.cursor(), Some(Cursor::ORIGIN));
    }

    #[test]
    fn text_mode_goes_through_selection() {
        let mut flow = controller();
        flow.set_mode(InputMode::Text).unwrap();
        assert_eq!(flow.submit("serene lake").unwrap(), Submitted::Selecting);
        assert_eq!(flow.phase_kind(), PhaseKind::TextSelection);

        assert!(matches!(flow.analyze_selection(), Err(FlowError::SelectionUnlocked)));
        flow.lock_selection().unwrap();
        flow.toggle_word("lake").unwrap();
        let request = flow.analyze_selection().unwrap();
        assert_eq!(request.manual_words, vec!["lake".to_string()]);
        assert_eq!(request.mode, InputMode::Text);
        assert_eq!(flow.phase_kind(), PhaseKind::Generating);
    }

    #[test]
    fn selection_back_returns_to_idle() {
        let mut flow = controller();
        flow.set_mode(InputMode::Text).unwrap();
        flow.submit("serene lake").unwrap();
        flow.leave_selection().unwrap();
        assert_eq!(flow.phase_kind(), PhaseKind::Idle);
        assert_eq!(flow.input(), "serene lake");
    }

    #[test]
    fn generation_failure_reverts_with_input_kept() {
        let mut flow = controller();
        let Submitted::Generate(request) = flow.submit("photosynthesis").unwrap() else {
            panic!("topic mode must generate");
        };
        let done = flow.complete_generation::<&str>(request.ticket, Err("timeout"));
        assert_eq!(done, Completion::Failed(FlowFailure::ConnectionLost));
        assert_eq!(flow.last_error(), Some(FlowFailure::ConnectionLost));
        assert_eq!(flow.input(), "photosynthesis");
    }

    #[test]
    fn invalid_generated_session_is_a_failure() {
        let mut flow = controller();
        let request = flow.start_generation("topic", Vec::new()).unwrap();
        let mut bad = fixtures::session(1);
        bad.words[0].quiz[0].answer = "nope".to_string();
        let done = flow.complete_generation::<String>(request.ticket, Ok(bad));
        assert_eq!(done, Completion::Failed(FlowFailure::ConnectionLost));
        assert!(flow.session().is_none());
    }

    #[test]
    fn forge_installs_payload_and_seeds_images() {
        let mut flow = controller();
        flow.set_mode(InputMode::Forge).unwrap();
        let mut session = fixtures::session(2);
        session.words[1].image_url = Some("data:image/png;base64,QQ==".to_string());
        let raw = serde_json::to_string(&session).unwrap();

        let Submitted::Installed(jobs) = flow.submit(&raw).unwrap() else {
            panic!("forge must install");
        };
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].index, 0);
        assert_eq!(flow.images().get(1), Some("data:image/png;base64,QQ=="));
        assert_eq!(flow.phase_kind(), PhaseKind::ParagraphPreview);
    }

    #[test]
    fn forge_rejects_malformed_payload() {
        let mut flow = controller();
        flow.set_mode(InputMode::Forge).unwrap();
        let result = flow.submit("{\"topic\": 1").unwrap();
        assert_eq!(result, Submitted::Failed(FlowFailure::MalformedPayload));
        assert_eq!(flow.phase_kind(), PhaseKind::Idle);
        assert_eq!(flow.last_error().map(FlowFailure::message), Some("JSON error."));

        flow.set_mode(InputMode::Topic).unwrap();
        assert_eq!(flow.last_error(), None);
    }

    #[test]
    fn advance_walks_words_and_ends_in_review() {
        let mut flow = in_sequence(5);
        for _ in 0..(2 * 7 + 6) {
            flow.advance().unwrap();
        }
        assert_eq!(flow.cursor(), Some(Cursor::new(2, 6)));
        flow.advance().unwrap();
        assert_eq!(flow.cursor(), Some(Cursor::new(3, 0)));

        for _ in 0..13 {
            flow.advance().unwrap();
        }
        assert_eq!(flow.cursor(), Some(Cursor::new(4, 6)));
        assert_eq!(flow.advance().unwrap(), PhaseKind::ParagraphReview);
        assert_eq!(flow.cursor(), None);
    }

    #[test]
    fn retreat_from_origin_returns_to_preview() {
        let mut flow = in_sequence(2);
        assert_eq!(flow.retreat().unwrap(), PhaseKind::ParagraphPreview);
    }

    #[test]
    fn previous_word_lands_on_last_page() {
        let mut flow = in_sequence(3);
        flow.next_word().unwrap();
        flow.set_page(3).unwrap();
        flow.previous_word().unwrap();
        assert_eq!(flow.cursor(), Some(Cursor::new(0, 6)));
        assert!(matches!(flow.set_page(7), Err(FlowError::PageOutOfRange(7))));
    }

    #[test]
    fn mood_follows_the_active_word() {
        let (publisher, reader) = mood_signal();
        let mut flow = FlowController::new(publisher);
        let request = flow.start_generation("topic", Vec::new()).unwrap();
        flow.complete_generation::<String>(request.ticket, Ok(fixtures::session(2)));
        assert_eq!(reader.current(), MoodColor::parse("#00F0FF").unwrap());

        flow.begin_sequence().unwrap();
        flow.next_word().unwrap();
        assert_eq!(reader.current(), MoodColor::parse("#BD00FF").unwrap());
        assert_eq!(flow.mood_color(), "#BD00FF");
    }

    #[test]
    fn stale_images_are_discarded() {
        let mut flow = controller();
        let first = flow.start_generation("alpha", Vec::new()).unwrap();
        flow.complete_generation::<String>(first.ticket, Ok(fixtures::session(2)));
        assert!(flow.merge_image(first.ticket, 0, Some("a0".to_string())));

        // replace the session while an image for the first is in flight
        flow.begin_sequence().unwrap();
        for _ in 0..14 {
            flow.advance().unwrap();
        }
        flow.complete_review().unwrap();
        flow.answer("word0").unwrap();
        flow.next_question().unwrap();
        flow.answer("word1").unwrap();
        flow.next_question().unwrap();
        flow.new_session().unwrap();
        let second = flow.start_generation("beta", Vec::new()).unwrap();
        flow.complete_generation::<String>(second.ticket, Ok(fixtures::session(2)));

        assert!(!flow.merge_image(first.ticket, 1, Some("a1".to_string())));
        assert!(flow.images().is_empty());
        assert!(flow.merge_image(second.ticket, 1, Some("b1".to_string())));
        assert_eq!(flow.images().get(1), Some("b1"));
    }

    #[test]
    fn stale_generation_result_is_ignored() {
        let mut flow = controller();
        flow.set_mode(InputMode::Text).unwrap();
        flow.submit("serene lake").unwrap();
        flow.lock_selection().unwrap();
        flow.toggle_word("lake").unwrap();
        let first = flow.analyze_selection().unwrap();
        flow.complete_generation::<&str>(first.ticket, Err("down"));
        flow.set_mode(InputMode::Topic).unwrap();
        let Submitted::Generate(second) = flow.submit("tides").unwrap() else {
            panic!("topic mode must generate");
        };

        let late = flow.complete_generation::<String>(first.ticket, Ok(fixtures::session(1)));
        assert_eq!(late, Completion::Stale);
        assert_eq!(flow.phase_kind(), PhaseKind::Generating);

        let done = flow.complete_generation::<String>(second.ticket, Ok(fixtures::session(1)));
        assert!(matches!(done, Completion::Installed(_)));
    }

    #[test]
    fn missing_image_is_not_stored() {
        let mut flow = in_sequence(1);
        let ticket = flow.ticket();
        assert!(!flow.merge_image(ticket, 0, None));
        assert!(!flow.merge_image(ticket, 9, Some("x".to_string())));
        assert!(flow.images().is_empty());
    }

    #[test]
    fn assessment_through_replay_and_new_session() {
        let mut flow = in_sequence(1);
        for _ in 0..7 {
            flow.advance().unwrap();
        }
        assert_eq!(flow.phase_kind(), PhaseKind::ParagraphReview);
        assert!(matches!(flow.next_question(), Err(FlowError::InvalidTransition { .. })));

        flow.acknowledge_review().unwrap();
        assert_eq!(flow.complete_review().unwrap(), PhaseKind::FinalAssessment);
        assert!(matches!(flow.complete_assessment(), Err(FlowError::NotAnswered)));

        assert!(flow.answer("word0").unwrap().correct);
        assert!(matches!(flow.answer("other"), Err(FlowError::AlreadyAnswered)));
        assert_eq!(flow.next_question().unwrap(), PhaseKind::SessionComplete);
        assert_eq!(
            *flow.phase(),
            Phase::SessionComplete { score: 1, total: 1 }
        );

        assert_eq!(flow.replay().unwrap(), PhaseKind::LearningSequence);
        assert_eq!(flow.cursor(), Some(Cursor::ORIGIN));
        for _ in 0..7 {
            flow.advance().unwrap();
        }
        flow.complete_review().unwrap();
        flow.answer("other").unwrap();
        flow.next_question().unwrap();
        assert_eq!(*flow.phase(), Phase::SessionComplete { score: 0, total: 1 });

        assert_eq!(flow.new_session().unwrap(), PhaseKind::Idle);
        assert_eq!(flow.input(), "");
    }

    #[test]
    fn actions_outside_their_phase_are_rejected() {
        let mut flow = controller();
        assert!(matches!(flow.advance(), Err(FlowError::InvalidTransition { .. })));
        assert!(matches!(flow.begin_sequence(), Err(FlowError::InvalidTransition { .. })));
        assert!(matches!(flow.replay(), Err(FlowError::InvalidTransition { .. })));
        assert!(matches!(flow.complete_review(), Err(FlowError::InvalidTransition { .. })));
        assert!(matches!(flow.toggle_word("x"), Err(FlowError::InvalidTransition { .. })));
        assert_eq!(flow.phase_kind(), PhaseKind::Idle);

        let mut flow = in_sequence(1);
        assert!(matches!(flow.submit("again"), Err(FlowError::InvalidTransition { .. })));
        assert!(matches!(flow.set_mode(InputMode::Forge), Err(FlowError::InvalidTransition { .. })));
    }

    #[test]
    fn phase_events_are_broadcast() {
        let mut flow = controller();
        let mut rx = flow.subscribe();
        flow.submit("photosynthesis").unwrap();
        let mut saw_generating = false;
        while let Ok(event) = rx.try_recv() {
            if let FlowEvent::Phase { phase, .. } = event {
                saw_generating |= phase == PhaseKind::Generating;
            }
        }
        assert!(saw_generating);
    }
}
