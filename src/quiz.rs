use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use crate::catalog::QuestionCatalog;
use crate::config::QuizConfig;
use crate::notification::{NotificationInfo, NotificationState, NotificationStore};
use crate::progression::{ProgressionState, ProgressionStore};
use crate::question::Question;
use crate::timeline::{Timeline, TimerId};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("an answer is already in flight for this question")]
    AnswerInFlight,
    #[error("the quiz is complete; there is no question to answer")]
    QuizComplete,
    #[error("option {option} does not exist; the question has {count} options")]
    OptionOutOfRange { option: usize, count: usize },
}

/// Changes the rendering layer and the coin gateway react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEvent {
    ModalShown {
        info: NotificationInfo,
        highlighted_level: Option<u32>,
    },
    ModalHidden,
    LevelCommitted {
        level: u32,
        reward: u64,
    },
    CoinsChanged {
        balance: u64,
    },
    CoinAnimation {
        active: bool,
    },
    QuestionAdvanced {
        index: usize,
    },
    Restarted,
}

/// Read-only view handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSnapshot {
    pub progression: ProgressionState,
    pub notification: NotificationState,
    pub coin_animation: bool,
    pub selected_option: Option<usize>,
    pub current_question: Option<Question>,
    pub complete: bool,
    pub total_questions: usize,
    pub elapsed_ms: u64,
}

/// One row of the level ladder shown inside the modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelRow {
    pub level: u32,
    pub colored: bool,
    pub highlighted: bool,
    pub reward: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Effect {
    SubmitAnswer { correct: bool },
    ShowLevelModal { level: u32, reward: u64 },
    CommitLevel { level: u32, reward: u64 },
    ClearCoinAnimation,
    AutoDismiss,
}

/// Drives one player through a catalog.
///
/// Owns both stores and a virtual clock. All delayed transitions are
/// effects on that clock; nothing fires until [`Quiz::advance_time`] moves
/// it, which keeps every timing sequence reproducible.
#[derive(Debug)]
pub struct Quiz {
    catalog: QuestionCatalog,
    config: QuizConfig,
    progression: ProgressionStore,
    notification: NotificationStore,
    timeline: Timeline<Effect>,
    selected_option: Option<usize>,
    coin_animation: bool,
    coin_animation_timer: Option<TimerId>,
    auto_dismiss_timer: Option<TimerId>,
    events: Vec<QuizEvent>,
}

impl Quiz {
    pub fn new(catalog: QuestionCatalog, config: QuizConfig) -> Self {
        Self::from_parts(
            catalog,
            config,
            ProgressionStore::new(),
            NotificationStore::new(),
        )
    }

    pub fn from_parts(
        catalog: QuestionCatalog,
        config: QuizConfig,
        progression: ProgressionStore,
        notification: NotificationStore,
    ) -> Self {
        Self {
            catalog,
            config,
            progression,
            notification,
            timeline: Timeline::new(),
            selected_option: None,
            coin_animation: false,
            coin_animation_timer: None,
            auto_dismiss_timer: None,
            events: Vec::new(),
        }
    }

    /// Like [`Quiz::new`], shuffling every question's options first when the
    /// config asks for it.
    pub fn start<R: Rng + ?Sized>(
        catalog: QuestionCatalog,
        config: QuizConfig,
        rng: &mut R,
    ) -> Self {
        let catalog = if config.shuffle_options {
            catalog.with_shuffled_options(rng)
        } else {
            catalog
        };

        Self::new(catalog, config)
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn progression(&self) -> ProgressionState {
        self.progression.state()
    }

    pub fn notification(&self) -> &NotificationState {
        self.notification.state()
    }

    pub fn coin_animation(&self) -> bool {
        self.coin_animation
    }

    pub fn selected_option(&self) -> Option<usize> {
        self.selected_option
    }

    pub fn now(&self) -> Duration {
        self.timeline.now()
    }

    pub fn pending_effects(&self) -> usize {
        self.timeline.pending_len()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.catalog
            .get(self.progression.state().current_question_index)
    }

    pub fn is_complete(&self) -> bool {
        self.catalog
            .is_complete_at(self.progression.state().current_question_index)
    }

    /// True once the player has picked an option or anything has moved past
    /// the first question. A fresh session can still be swapped out.
    pub fn has_started(&self) -> bool {
        self.selected_option.is_some()
            || self.progression.state().current_question_index > 0
            || self.notification.is_visible()
            || !self.timeline.is_idle()
    }

    /// Level to display: the optimistic highlighted level while a commit is
    /// pending, the committed level otherwise.
    pub fn displayed_level(&self) -> u32 {
        self.notification
            .state()
            .highlighted_level
            .unwrap_or(self.progression.state().current_level)
    }

    pub fn snapshot(&self) -> QuizSnapshot {
        QuizSnapshot {
            progression: self.progression.state(),
            notification: self.notification.state().clone(),
            coin_animation: self.coin_animation,
            selected_option: self.selected_option,
            current_question: self.current_question().cloned(),
            complete: self.is_complete(),
            total_questions: self.catalog.len(),
            elapsed_ms: u64::try_from(self.timeline.now().as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Rows `1..=max_level`. A highlighted level is the only coloured row;
    /// without one, only the last coloured level is. A row's reward is what
    /// arriving at that level pays, i.e. the payout keyed on the level below.
    pub fn level_ladder(&self, max_level: u32) -> Vec<LevelRow> {
        let highlighted_level = self.notification.state().highlighted_level;
        let last_colored = self.progression.state().last_colored_level;

        (1..=max_level)
            .map(|level| {
                let highlighted = highlighted_level == Some(level);
                LevelRow {
                    level,
                    colored: highlighted
                        || (highlighted_level.is_none() && last_colored == level),
                    highlighted,
                    reward: self.config.rewards.milestone(level - 1),
                }
            })
            .collect()
    }

    pub fn drain_events(&mut self) -> Vec<QuizEvent> {
        std::mem::take(&mut self.events)
    }

    /// Input boundary: records the player's pick and submits it after the
    /// selection delay. Only one pick is accepted per question.
    pub fn select_option(&mut self, option: usize) -> Result<(), QuizError> {
        if self.selected_option.is_some() {
            return Err(QuizError::AnswerInFlight);
        }

        let question = self.current_question().ok_or(QuizError::QuizComplete)?;
        if option >= question.options.len() {
            return Err(QuizError::OptionOutOfRange {
                option,
                count: question.options.len(),
            });
        }

        let correct = question.is_correct(option);
        self.selected_option = Some(option);
        debug!(option, correct, "option selected");

        let delay = self.config.selection_delay();
        if delay.is_zero() {
            self.answer_question(correct);
        } else {
            self.timeline
                .schedule(delay, Effect::SubmitAnswer { correct });
        }

        Ok(())
    }

    pub fn answer_question(&mut self, was_correct: bool) {
        if !was_correct {
            info!(
                question = self.progression.state().current_question_index,
                "wrong answer"
            );
            self.show(NotificationInfo::wrong_answer(), None);
            return;
        }

        let current_level = self.progression.state().current_level;
        let next_level = current_level.saturating_add(1);
        let reward = self.config.rewards.reward_for(current_level);
        info!(from = current_level, to = next_level, reward, "correct answer");

        self.timeline.schedule(
            self.config.modal_delay(),
            Effect::ShowLevelModal {
                level: next_level,
                reward,
            },
        );
        self.timeline.schedule(
            self.config.level_commit_delay(),
            Effect::CommitLevel {
                level: next_level,
                reward,
            },
        );
    }

    /// Hides the modal and moves to the next question. A level commit still
    /// pending for this cycle is applied now; pending presentation effects
    /// are dropped.
    pub fn close_modal_now(&mut self) {
        self.hide();

        let stale = self
            .timeline
            .take_where(|effect| !matches!(effect, Effect::ClearCoinAnimation));
        for effect in stale {
            match effect {
                Effect::CommitLevel { level, reward } => self.commit_level(level, reward),
                other => debug!(effect = ?other, "dropped pending effect"),
            }
        }
        self.auto_dismiss_timer = None;

        self.progression.advance_question();
        self.selected_option = None;

        let index = self.progression.state().current_question_index;
        debug!(index, "question advanced");
        self.events.push(QuizEvent::QuestionAdvanced { index });
    }

    pub fn restart_quiz(&mut self) {
        self.hide();
        self.cancel_pending();
        self.progression.reset();

        info!(coins = self.progression.state().coins, "quiz restarted");
        self.events.push(QuizEvent::Restarted);
    }

    /// Cancels everything pending; call when the owning view goes away.
    pub fn teardown(&mut self) {
        self.cancel_pending();
    }

    pub fn set_coin_animation(&mut self, active: bool) {
        if let Some(timer) = self.coin_animation_timer.take() {
            self.timeline.cancel(timer);
        }

        if active {
            self.coin_animation_timer = Some(
                self.timeline
                    .schedule(self.config.coin_animation(), Effect::ClearCoinAnimation),
            );
        }

        if self.coin_animation != active {
            self.coin_animation = active;
            self.events.push(QuizEvent::CoinAnimation { active });
        }
    }

    /// Completion signal from the renderer; clears the flag early.
    pub fn coin_animation_complete(&mut self) {
        self.set_coin_animation(false);
    }

    /// Overwrites the balance, e.g. with a value restored from storage.
    pub fn restore_coins(&mut self, coins: u64) {
        self.progression.set_coins(coins);
    }

    /// Moves the virtual clock forward by `elapsed`, firing every effect that
    /// falls due on the way.
    pub fn advance_time(&mut self, elapsed: Duration) {
        let target = self.timeline.now() + elapsed;

        while let Some(effect) = self.timeline.pop_due(target) {
            self.apply(effect);
        }

        self.timeline.advance_to(target);
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::SubmitAnswer { correct } => self.answer_question(correct),
            Effect::ShowLevelModal { level, reward } => {
                self.show(NotificationInfo::level_reached(level, reward), Some(level));
            }
            Effect::CommitLevel { level, reward } => self.commit_level(level, reward),
            Effect::ClearCoinAnimation => {
                self.coin_animation_timer = None;
                if self.coin_animation {
                    self.coin_animation = false;
                    self.events.push(QuizEvent::CoinAnimation { active: false });
                }
            }
            Effect::AutoDismiss => {
                self.auto_dismiss_timer = None;
                if self.notification.is_visible() {
                    debug!("auto-dismissing notification");
                    self.close_modal_now();
                }
            }
        }
    }

    fn show(&mut self, info: NotificationInfo, highlighted_level: Option<u32>) {
        self.notification.show(info.clone(), highlighted_level);
        self.events.push(QuizEvent::ModalShown {
            info,
            highlighted_level,
        });

        if let Some(timer) = self.auto_dismiss_timer.take() {
            self.timeline.cancel(timer);
        }
        if let Some(delay) = self.config.auto_dismiss() {
            self.auto_dismiss_timer = Some(self.timeline.schedule(delay, Effect::AutoDismiss));
        }
    }

    fn hide(&mut self) {
        if self.notification.is_visible() {
            self.events.push(QuizEvent::ModalHidden);
        }
        self.notification.hide();
    }

    fn commit_level(&mut self, level: u32, reward: u64) {
        let before = self.progression.state().coins;

        self.progression.set_level(level);
        self.progression
            .increment_coins(i64::try_from(reward).unwrap_or(i64::MAX));

        let balance = self.progression.state().coins;
        info!(level, reward, balance, "level committed");
        self.events.push(QuizEvent::LevelCommitted { level, reward });

        if balance != before {
            self.events.push(QuizEvent::CoinsChanged { balance });
        }
        if reward > 0 {
            self.set_coin_animation(true);
        }
    }

    fn cancel_pending(&mut self) {
        let dropped = self.timeline.cancel_all();
        if dropped > 0 {
            debug!(dropped, "cancelled pending effects");
        }

        self.coin_animation_timer = None;
        self.auto_dismiss_timer = None;
        self.selected_option = None;

        if self.coin_animation {
            self.coin_animation = false;
            self.events.push(QuizEvent::CoinAnimation { active: false });
        }
    }
}
