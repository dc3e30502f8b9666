//! Quiz Controller
//!
//! Drives one quiz run through `Start -> InProgress -> Analyzing ->
//! [LeadCapture] -> Finished`. The session sits behind a tokio mutex that is
//! never held across a collaborator call; results that come back after a
//! restart are recognised by their generation and dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use quiz_funnel_core::{
    build_transcript, Answer, Catalog, FetchError, FunnelEvent, FunnelNotifier, QuizError,
    QuizResult, QuizState, RecommendationClient, TranscriptEntry,
};

use super::session::{QuizSession, QuizSnapshot};

/// Shown when questions could not be loaded
pub const LOAD_QUIZ_ERROR: &str = "Sorry, we couldn't load the quiz. Please try again later.";
/// Shown when the recommendation step failed
pub const RECOMMENDATION_ERROR: &str =
    "Sorry, we couldn't generate your recommendation. Please try again.";
/// Shown inline at the lead-capture step
pub const INVALID_EMAIL_ERROR: &str = "Please enter a valid email address.";

/// Default floor for the analyzing step
pub const DEFAULT_MIN_ANALYZING: Duration = Duration::from_millis(3500);

/// Tunables for a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    /// The analyzing step never completes before this has elapsed
    pub min_analyzing: Duration,
    /// Insert the lead-capture step between analyzing and the result
    pub lead_capture: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            min_analyzing: DEFAULT_MIN_ANALYZING,
            lead_capture: false,
        }
    }
}

/// Owns the quiz session and sequences calls to the recommendation client.
///
/// Cloning yields another handle onto the same session.
#[derive(Clone)]
pub struct QuizController {
    session: Arc<Mutex<QuizSession>>,
    client: Arc<dyn RecommendationClient>,
    notifier: Arc<dyn FunnelNotifier>,
    catalog: Arc<Catalog>,
    options: ControllerOptions,
}

/// What recording an answer led to
enum AnswerOutcome {
    /// More questions remain
    Advanced(QuizSnapshot),
    /// That was the last answer; the transcript goes to the recommender
    Analyze {
        generation: u64,
        transcript: Vec<TranscriptEntry>,
    },
}

impl QuizController {
    pub fn new(
        client: Arc<dyn RecommendationClient>,
        notifier: Arc<dyn FunnelNotifier>,
        catalog: Catalog,
        options: ControllerOptions,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(QuizSession::new())),
            client,
            notifier,
            catalog: Arc::new(catalog),
            options,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn options(&self) -> ControllerOptions {
        self.options
    }

    /// Current snapshot of the session
    pub async fn snapshot(&self) -> QuizSnapshot {
        self.session.lock().await.snapshot()
    }

    /// Load questions and enter `InProgress`.
    ///
    /// A fetch failure leaves the quiz at `Start` with the error set.
    pub async fn start_quiz(&self) -> QuizResult<QuizSnapshot> {
        let generation = {
            let mut session = self.session.lock().await;
            if session.state != QuizState::Start || session.loading {
                return Err(QuizError::invalid_transition("start the quiz", session.state));
            }
            session.loading = true;
            session.error = None;
            session.generation
        };

        debug!(generation, "fetching quiz questions");
        let result = self.client.fetch_questions().await;

        let mut session = self.session.lock().await;
        if session.generation != generation {
            debug!(
                generation,
                current = session.generation,
                "discarding stale question fetch"
            );
            return Ok(session.snapshot());
        }

        session.loading = false;
        let result = result.and_then(|questions| {
            if questions.is_empty() {
                Err(FetchError::NoQuestions)
            } else {
                Ok(questions)
            }
        });

        let event = match result {
            Ok(questions) => {
                let question_count = questions.len();
                info!(generation, question_count, "quiz started");
                session.questions = questions;
                session.answers.clear();
                session.current_index = 0;
                session.state = QuizState::InProgress;
                Some(FunnelEvent::QuizStarted { question_count })
            }
            Err(e) => {
                warn!(generation, error = %e, "failed to load quiz questions");
                session.fail(LOAD_QUIZ_ERROR);
                None
            }
        };

        let snapshot = session.snapshot();
        drop(session);

        if let Some(event) = event {
            self.notifier.notify(generation, event);
        }
        Ok(snapshot)
    }

    /// Record a free-text answer for the current question.
    ///
    /// On the last question this also runs the analyzing step and only
    /// returns once it has finished.
    pub async fn submit_answer(&self, answer: impl Into<Answer>) -> QuizResult<QuizSnapshot> {
        let answer = answer.into();
        if answer.as_str().trim().is_empty() {
            return Err(QuizError::invalid_input("answer must not be empty"));
        }

        let outcome = {
            let mut session = self.session.lock().await;
            Self::record_answer(&mut session, answer)?
        };
        self.follow_up(outcome).await
    }

    /// Answer the current question with the option at `index`
    pub async fn submit_option(&self, index: usize) -> QuizResult<QuizSnapshot> {
        let outcome = {
            let mut session = self.session.lock().await;
            Self::ensure_answerable(&session)?;
            let question = session
                .current_question()
                .ok_or_else(|| QuizError::invalid_transition("choose an option", session.state))?;
            let option = question.options.get(index).ok_or_else(|| {
                QuizError::invalid_input(format!(
                    "option {} is out of range ({} options)",
                    index,
                    question.options.len()
                ))
            })?;
            let answer = Answer::from(option);
            Self::record_answer(&mut session, answer)?
        };
        self.follow_up(outcome).await
    }

    fn ensure_answerable(session: &QuizSession) -> QuizResult<()> {
        if session.state != QuizState::InProgress || session.loading {
            return Err(QuizError::invalid_transition(
                "submit an answer",
                session.state,
            ));
        }
        Ok(())
    }

    /// Append the answer, then either advance or enter `Analyzing`.
    fn record_answer(session: &mut QuizSession, answer: Answer) -> QuizResult<AnswerOutcome> {
        Self::ensure_answerable(session)?;

        session.answers.push(answer);
        if session.current_index + 1 < session.questions.len() {
            session.current_index += 1;
            debug!(index = session.current_index, "advanced to next question");
            return Ok(AnswerOutcome::Advanced(session.snapshot()));
        }

        session.state = QuizState::Analyzing;
        session.loading = true;
        debug!(answers = session.answers.len(), "all questions answered, analyzing");
        Ok(AnswerOutcome::Analyze {
            generation: session.generation,
            transcript: build_transcript(&session.questions, &session.answers),
        })
    }

    async fn follow_up(&self, outcome: AnswerOutcome) -> QuizResult<QuizSnapshot> {
        match outcome {
            AnswerOutcome::Advanced(snapshot) => Ok(snapshot),
            AnswerOutcome::Analyze {
                generation,
                transcript,
            } => Ok(self.analyze(generation, transcript).await),
        }
    }

    /// Request the recommendation and wait out the minimum duration, both
    /// to completion, then apply the result if the run is still current.
    async fn analyze(&self, generation: u64, transcript: Vec<TranscriptEntry>) -> QuizSnapshot {
        let (result, ()) = tokio::join!(
            self.client.request_recommendation(&transcript),
            tokio::time::sleep(self.options.min_analyzing),
        );

        let mut session = self.session.lock().await;
        if session.generation != generation {
            debug!(
                generation,
                current = session.generation,
                "discarding stale recommendation"
            );
            return session.snapshot();
        }

        session.loading = false;
        let event = match result {
            Ok(recommendation) => {
                let product = self
                    .catalog
                    .find_by_title(&recommendation.recommended_product_title)
                    .cloned();
                if product.is_none() {
                    warn!(
                        title = %recommendation.recommended_product_title,
                        "recommended title does not match any catalog product"
                    );
                }

                let event = FunnelEvent::QuizCompleted {
                    recommended_title: recommendation.recommended_product_title.clone(),
                    product_id: product.as_ref().map(|p| p.id.clone()),
                    archetype: recommendation.archetype.clone(),
                };

                session.recommendation = Some(recommendation);
                session.matched_product = product;
                session.state = if self.options.lead_capture {
                    QuizState::LeadCapture
                } else {
                    QuizState::Finished
                };
                info!(generation, state = %session.state, "recommendation received");
                Some(event)
            }
            Err(e) => {
                warn!(generation, error = %e, "failed to get recommendation");
                session.fail(RECOMMENDATION_ERROR);
                None
            }
        };

        let snapshot = session.snapshot();
        drop(session);

        if let Some(event) = event {
            self.notifier.notify(generation, event);
        }
        snapshot
    }

    /// Submit the lead-capture email.
    ///
    /// An invalid address keeps the quiz at `LeadCapture` with the error set.
    pub async fn submit_email(&self, email: &str) -> QuizResult<QuizSnapshot> {
        let mut session = self.session.lock().await;
        if session.state != QuizState::LeadCapture {
            return Err(QuizError::invalid_transition("submit an email", session.state));
        }

        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            session.error = Some(INVALID_EMAIL_ERROR.to_string());
            return Ok(session.snapshot());
        }

        session.lead_email = Some(email.to_string());
        session.error = None;
        session.state = QuizState::Finished;
        let generation = session.generation;
        let snapshot = session.snapshot();
        drop(session);

        info!(generation, "lead captured");
        self.notifier.notify(
            generation,
            FunnelEvent::LeadCaptured {
                email: email.to_string(),
            },
        );
        Ok(snapshot)
    }

    /// Discard the run and return to `Start`. Valid from any state.
    pub async fn restart(&self) -> QuizSnapshot {
        let mut session = self.session.lock().await;
        let was = session.state;
        session.reset();
        info!(from = %was, generation = session.generation, "quiz restarted");
        session.snapshot()
    }

    /// Record a click on the offer and return the outbound link
    pub async fn record_offer_click(&self) -> QuizResult<String> {
        let session = self.session.lock().await;
        if session.state != QuizState::Finished {
            return Err(QuizError::invalid_transition("follow the offer", session.state));
        }
        let product = session
            .matched_product
            .clone()
            .ok_or_else(|| QuizError::invalid_input("no product matched the recommendation"))?;
        let generation = session.generation;
        drop(session);

        self.notifier.notify(
            generation,
            FunnelEvent::OfferClicked {
                product_id: product.id,
                link: product.link.clone(),
            },
        );
        Ok(product.link)
    }
}
