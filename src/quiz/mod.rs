pub mod questions;

use std::collections::HashMap;

use crate::effects::{CelebrationEffects, STAR_OVERLAY_DELAY_MS};

/// Which top-level view the chat is currently on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum Stage {
    #[default]
    Quiz,
    Result,
    Celebration,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Question {
    pub text: String,
    pub options: Vec<AnswerOption>,
}
impl Question {
    pub fn new(text: String, options: Vec<AnswerOption>) -> Self {
        Self { text, options }
    }
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct AnswerOption {
    pub value: String,
    pub label: String,
    pub is_correct: bool,
}
impl AnswerOption {
    pub fn new(value: String, label: String, is_correct: bool) -> Self {
        Self {
            value,
            label,
            is_correct,
        }
    }
}

/// The celebration flow controller: tracks the user's run through the quiz,
/// scores it once the last answer is confirmed, and moves the chat through
/// the Quiz -> Result -> Celebration stages.
///
/// The cosmetic side of each transition goes through a [`CelebrationEffects`]
/// collaborator; the scoring and stage logic never depends on what those
/// effects actually do.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct QuizEngine {
    questions: Vec<Question>,
    current_index: usize,
    answers: HashMap<usize, String>,
    completed: bool,
    passed: Option<bool>,
    stage: Stage,
    display_name: String,
}

impl QuizEngine {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            current_index: 0,
            answers: HashMap::new(),
            completed: false,
            passed: None,
            stage: Stage::Quiz,
            display_name: questions::DEFAULT_GREETING.to_string(),
        }
    }

    /// A fresh run over the fixed birthday question set.
    pub fn birthday() -> Self {
        Self::new(questions::birthday_questions())
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    /// 1-based, for display.
    pub fn question_number(&self) -> usize {
        self.current_index + 1
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn passed(&self) -> Option<bool> {
        self.passed
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn answered_current(&self) -> bool {
        self.answers.contains_key(&self.current_index)
    }

    /// Records (or overwrites) the answer for the current question. The
    /// caller only ever offers the current question's option values, so the
    /// value is not validated here.
    pub fn select_option(&mut self, value: &str) {
        self.answers.insert(self.current_index, value.to_string());
    }

    /// Locks in the answer for the current question. A no-op while nothing
    /// has been selected yet. On the last question this scores the whole run,
    /// enters the Result stage, and kicks off the sustained celebration if
    /// every answer was correct.
    pub fn confirm_answer(&mut self, effects: &dyn CelebrationEffects) {
        if !self.answered_current() {
            return;
        }
        if self.current_index < self.questions.len() - 1 {
            self.current_index += 1;
            return;
        }

        let all_correct = self.questions.iter().enumerate().all(|(index, question)| {
            match self.answers.get(&index) {
                Some(value) => question
                    .options
                    .iter()
                    .any(|option| &option.value == value && option.is_correct),
                None => false,
            }
        });

        self.completed = true;
        self.passed = Some(all_correct);
        self.stage = Stage::Result;

        if all_correct {
            effects.trigger_sustained_celebration();
        }
    }

    /// Moves from the Result stage onto the celebration card. Only valid
    /// after a passed run; anything else is a no-op.
    pub fn confirm_celebration(&mut self, effects: &dyn CelebrationEffects) {
        if self.stage != Stage::Result || self.passed != Some(true) {
            return;
        }
        self.stage = Stage::Celebration;
        effects.show_delayed_overlay(STAR_OVERLAY_DELAY_MS);
    }

    /// Back to question one with a clean slate, from any stage. A customized
    /// greeting is kept.
    pub fn reset(&mut self) {
        self.current_index = 0;
        self.answers.clear();
        self.completed = false;
        self.passed = None;
        self.stage = Stage::Quiz;
    }

    /// Replaces the card's greeting line wholesale. Blank input (empty or
    /// whitespace-only) is silently ignored; a real change fires a small
    /// one-shot burst.
    pub fn set_display_name(&mut self, text: &str, effects: &dyn CelebrationEffects) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        self.display_name = trimmed.to_string();
        effects.trigger_burst();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{CelebrationEffects, NoopEffects};
    use std::cell::RefCell;

    /// Remembers which effects fired, in order. Lets the tests check the
    /// fire-and-forget calls without any real visuals behind them.
    #[derive(Default)]
    struct RecordingEffects {
        fired: RefCell<Vec<String>>,
    }
    impl RecordingEffects {
        fn fired(&self) -> Vec<String> {
            self.fired.borrow().clone()
        }
    }
    impl CelebrationEffects for RecordingEffects {
        fn trigger_sustained_celebration(&self) {
            self.fired.borrow_mut().push("sustained".to_string());
        }
        fn trigger_burst(&self) {
            self.fired.borrow_mut().push("burst".to_string());
        }
        fn show_delayed_overlay(&self, after_ms: u64) {
            self.fired.borrow_mut().push(format!("overlay:{}", after_ms));
        }
    }

    fn answer_all(engine: &mut QuizEngine, values: &[&str], effects: &dyn CelebrationEffects) {
        for value in values {
            engine.select_option(value);
            engine.confirm_answer(effects);
        }
    }

    #[test]
    fn all_correct_answers_pass() {
        let mut engine = QuizEngine::birthday();
        answer_all(&mut engine, &["yes", "yes", "yes", "no", "yes"], &NoopEffects);

        assert!(engine.completed());
        assert_eq!(engine.passed(), Some(true));
        assert_eq!(engine.stage(), Stage::Result);
    }

    #[test]
    fn one_wrong_answer_fails() {
        let mut engine = QuizEngine::birthday();
        answer_all(&mut engine, &["no", "yes", "yes", "no", "yes"], &NoopEffects);

        assert!(engine.completed());
        assert_eq!(engine.passed(), Some(false));
        assert_eq!(engine.stage(), Stage::Result);
    }

    #[test]
    fn trick_question_catches_a_plain_yes_run() {
        // Question 4 is the one where "no" is the correct answer.
        let mut engine = QuizEngine::birthday();
        answer_all(&mut engine, &["yes", "yes", "yes", "yes", "yes"], &NoopEffects);

        assert_eq!(engine.passed(), Some(false));
    }

    #[test]
    fn passing_fires_the_sustained_celebration() {
        let effects = RecordingEffects::default();
        let mut engine = QuizEngine::birthday();
        answer_all(&mut engine, &["yes", "yes", "yes", "no", "yes"], &effects);

        assert_eq!(effects.fired(), vec!["sustained".to_string()]);
    }

    #[test]
    fn failing_fires_nothing() {
        let effects = RecordingEffects::default();
        let mut engine = QuizEngine::birthday();
        answer_all(&mut engine, &["no", "no", "no", "no", "no"], &effects);

        assert!(effects.fired().is_empty());
    }

    #[test]
    fn confirm_without_a_selection_is_a_noop() {
        let mut engine = QuizEngine::birthday();
        engine.confirm_answer(&NoopEffects);

        assert_eq!(engine.question_number(), 1);
        assert!(!engine.completed());
        assert_eq!(engine.passed(), None);
    }

    #[test]
    fn reselecting_before_confirming_overwrites_the_answer() {
        let mut engine = QuizEngine::birthday();
        engine.select_option("no");
        engine.select_option("yes");
        engine.confirm_answer(&NoopEffects);

        assert_eq!(engine.question_number(), 2);

        // Finish the run; question 1 must count as the overwritten "yes".
        answer_all(&mut engine, &["yes", "yes", "no", "yes"], &NoopEffects);
        assert_eq!(engine.passed(), Some(true));
    }

    #[test]
    fn answers_advance_one_question_at_a_time() {
        let mut engine = QuizEngine::birthday();
        for expected in 1..=engine.total_questions() {
            assert_eq!(engine.question_number(), expected);
            assert!(!engine.completed());
            engine.select_option("yes");
            engine.confirm_answer(&NoopEffects);
        }
        // The index stays on the last question once the run is scored.
        assert_eq!(engine.question_number(), engine.total_questions());
        assert!(engine.completed());
    }

    #[test]
    fn confirm_celebration_enters_the_card_after_a_pass() {
        let effects = RecordingEffects::default();
        let mut engine = QuizEngine::birthday();
        answer_all(&mut engine, &["yes", "yes", "yes", "no", "yes"], &effects);

        engine.confirm_celebration(&effects);

        assert_eq!(engine.stage(), Stage::Celebration);
        assert_eq!(
            effects.fired(),
            vec![
                "sustained".to_string(),
                format!("overlay:{}", STAR_OVERLAY_DELAY_MS)
            ]
        );
    }

    #[test]
    fn confirm_celebration_is_a_noop_after_a_fail() {
        let effects = RecordingEffects::default();
        let mut engine = QuizEngine::birthday();
        answer_all(&mut engine, &["no", "yes", "yes", "no", "yes"], &effects);

        engine.confirm_celebration(&effects);

        assert_eq!(engine.stage(), Stage::Result);
        assert!(effects.fired().is_empty());
    }

    #[test]
    fn confirm_celebration_is_a_noop_mid_quiz() {
        let mut engine = QuizEngine::birthday();
        engine.select_option("yes");
        engine.confirm_answer(&NoopEffects);

        engine.confirm_celebration(&NoopEffects);

        assert_eq!(engine.stage(), Stage::Quiz);
    }

    #[test]
    fn reset_restores_the_initial_state() {
        let mut engine = QuizEngine::birthday();
        answer_all(&mut engine, &["yes", "yes", "yes", "no", "yes"], &NoopEffects);
        engine.confirm_celebration(&NoopEffects);

        engine.reset();

        assert_eq!(engine.stage(), Stage::Quiz);
        assert_eq!(engine.question_number(), 1);
        assert!(!engine.answered_current());
        assert!(!engine.completed());
        assert_eq!(engine.passed(), None);

        // Idempotent.
        engine.reset();
        assert_eq!(engine.stage(), Stage::Quiz);
        assert_eq!(engine.question_number(), 1);
    }

    #[test]
    fn default_greeting_is_in_place() {
        let engine = QuizEngine::birthday();
        assert_eq!(engine.display_name(), questions::DEFAULT_GREETING);
    }

    #[test]
    fn blank_greetings_are_ignored() {
        let effects = RecordingEffects::default();
        let mut engine = QuizEngine::birthday();

        engine.set_display_name("", &effects);
        engine.set_display_name("   ", &effects);

        assert_eq!(engine.display_name(), questions::DEFAULT_GREETING);
        assert!(effects.fired().is_empty());
    }

    #[test]
    fn setting_a_greeting_replaces_it_and_fires_a_burst() {
        let effects = RecordingEffects::default();
        let mut engine = QuizEngine::birthday();

        engine.set_display_name("Alex", &effects);

        assert_eq!(engine.display_name(), "Alex");
        assert_eq!(effects.fired(), vec!["burst".to_string()]);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed_off_the_greeting() {
        let mut engine = QuizEngine::birthday();
        engine.set_display_name("  Happy birthday, Alex!  ", &NoopEffects);
        assert_eq!(engine.display_name(), "Happy birthday, Alex!");
    }

    #[test]
    fn greeting_survives_a_reset() {
        let mut engine = QuizEngine::birthday();
        engine.set_display_name("Alex", &NoopEffects);
        engine.reset();
        assert_eq!(engine.display_name(), "Alex");
    }
}
