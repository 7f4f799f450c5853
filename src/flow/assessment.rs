use serde::Serialize;

use crate::flow::FlowError;
use crate::session::{QuizItem, Session};

/// Final quiz over the first quiz item of every word, one question at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    step: usize,
    score: usize,
    total: usize,
    selected: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub correct: bool,
    pub answer: String,
    pub explanation: String,
    pub score: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssessmentStep {
    Question(usize),
    Finished { score: usize, total: usize },
}

/// What the quiz screen shows for the current question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub step: usize,
    pub total: usize,
    pub score: usize,
    pub word: String,
    pub question: String,
    pub options: Vec<String>,
    pub selected: Option<String>,
    /// Present once the question has been answered.
    pub outcome: Option<AnswerOutcome>,
}

fn quiz_at(session: &Session, step: usize) -> Option<&QuizItem> {
    session.word(step).and_then(|w| w.assessed_quiz())
}

impl Assessment {
    pub fn new(session: &Session) -> Self {
        Self {
            step: 0,
            score: 0,
            total: session.len(),
            selected: None,
        }
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_answered(&self) -> bool {
        self.selected.is_some()
    }

    /// Records the first answer to the current question. Later answers to the
    /// same question are rejected and never change the score.
    pub fn answer(&mut self, session: &Session, option: &str) -> Result<AnswerOutcome, FlowError> {
        if self.selected.is_some() {
            return Err(FlowError::AlreadyAnswered);
        }
        let quiz = quiz_at(session, self.step).ok_or(FlowError::NoSession)?;
        if !quiz.options.iter().any(|o| o == option) {
            return Err(FlowError::UnknownOption(option.to_string()));
        }

        let correct = quiz.is_correct(option);
        if correct {
            self.score += 1;
        }
        self.selected = Some(option.to_string());

        Ok(AnswerOutcome {
            correct,
            answer: quiz.answer.clone(),
            explanation: quiz.explanation.clone(),
            score: self.score,
        })
    }

    /// Moves past an answered question.
    pub fn next(&mut self) -> Result<AssessmentStep, FlowError> {
        if self.selected.is_none() {
            return Err(FlowError::NotAnswered);
        }
        if self.step + 1 < self.total {
            self.step += 1;
            self.selected = None;
            Ok(AssessmentStep::Question(self.step))
        } else {
            Ok(AssessmentStep::Finished {
                score: self.score,
                total: self.total,
            })
        }
    }

    pub fn view(&self, session: &Session) -> Option<QuestionView> {
        let word = session.word(self.step)?;
        let quiz = word.assessed_quiz()?;
        let outcome = self.selected.as_ref().map(|sel| AnswerOutcome {
            correct: quiz.is_correct(sel),
            answer: quiz.answer.clone(),
            explanation: quiz.explanation.clone(),
            score: self.score,
        });
        Some(QuestionView {
            step: self.step,
            total: self.total,
            score: self.score,
            word: word.word.clone(),
            question: quiz.question.clone(),
            options: quiz.options.clone(),
            selected: self.selected.clone(),
            outcome,
        })
    }
}
