//! Qaida quiz generation and quiz sessions
//!
//! Sampling and shuffling take the random source as a parameter, so tests can
//! seed it. Production callers use [`generate_quiz`], which draws from the
//! thread-local generator.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::qaida::{FormKey, QaidaLesson, QaidaLetter, QaidaSyllableExample, QuizConfig, QuizMode, QuizSource};

/// Upper bound on answer options per question.
pub const MAX_OPTIONS: usize = 4;

/// Questions with fewer options than this are not generated.
pub const MIN_OPTIONS: usize = 2;

/// One generated question. Each variant holds only the options of its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum QuizQuestion {
    LetterToSound {
        prompt_letter: QaidaLetter,
        options_letters: Vec<QaidaLetter>,
        correct_index: usize,
    },
    SoundToLetter {
        prompt_syllable: QaidaSyllableExample,
        options_examples: Vec<QaidaSyllableExample>,
        correct_index: usize,
    },
    IdentifyForm {
        prompt_letter: QaidaLetter,
        options_form_keys: Vec<FormKey>,
        correct_index: usize,
        correct_form_type: FormKey,
    },
}

impl QuizQuestion {
    /// Question type name used in serialized quizzes.
    pub fn question_type(&self) -> &'static str {
        match self {
            QuizQuestion::LetterToSound { .. } => "letterToSound",
            QuizQuestion::SoundToLetter { .. } => "soundToLetter",
            QuizQuestion::IdentifyForm { .. } => "identifyForm",
        }
    }

    pub fn correct_index(&self) -> usize {
        match self {
            QuizQuestion::LetterToSound { correct_index, .. }
            | QuizQuestion::SoundToLetter { correct_index, .. }
            | QuizQuestion::IdentifyForm { correct_index, .. } => *correct_index,
        }
    }

    pub fn option_count(&self) -> usize {
        match self {
            QuizQuestion::LetterToSound { options_letters, .. } => options_letters.len(),
            QuizQuestion::SoundToLetter { options_examples, .. } => options_examples.len(),
            QuizQuestion::IdentifyForm { options_form_keys, .. } => options_form_keys.len(),
        }
    }

    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_index()
    }
}

// Wire shape: all three option lists are always present, empty when unused.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuestionWire<'a> {
    question_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt_letter: Option<&'a QaidaLetter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt_syllable: Option<&'a QaidaSyllableExample>,
    options_letters: &'a [QaidaLetter],
    options_examples: &'a [QaidaSyllableExample],
    options_form_keys: &'a [FormKey],
    options_form_labels: Vec<&'static str>,
    correct_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    correct_form_type: Option<FormKey>,
}

impl Serialize for QuizQuestion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut wire = QuestionWire {
            question_type: self.question_type(),
            prompt_letter: None,
            prompt_syllable: None,
            options_letters: &[],
            options_examples: &[],
            options_form_keys: &[],
            options_form_labels: Vec::new(),
            correct_index: self.correct_index(),
            correct_form_type: None,
        };
        match self {
            QuizQuestion::LetterToSound { prompt_letter, options_letters, .. } => {
                wire.prompt_letter = Some(prompt_letter);
                wire.options_letters = options_letters.as_slice();
            }
            QuizQuestion::SoundToLetter { prompt_syllable, options_examples, .. } => {
                wire.prompt_syllable = Some(prompt_syllable);
                wire.options_examples = options_examples.as_slice();
            }
            QuizQuestion::IdentifyForm { prompt_letter, options_form_keys, correct_form_type, .. } => {
                wire.prompt_letter = Some(prompt_letter);
                wire.options_form_keys = options_form_keys.as_slice();
                wire.options_form_labels = options_form_keys.iter().map(FormKey::tajik_label).collect();
                wire.correct_form_type = Some(*correct_form_type);
            }
        }
        wire.serialize(serializer)
    }
}

/// Generate a quiz with the thread-local random source.
pub fn generate_quiz(config: &QuizConfig, lesson: &QaidaLesson) -> Vec<QuizQuestion> {
    generate(config, lesson, &mut rand::rng())
}

/// Generate up to `config.items_per_quiz` questions from a lesson.
///
/// Prompts are sampled without replacement. Distractors come from the
/// lesson's whole item set, so an item can be a prompt in one question and a
/// distractor in another. Items that cannot yield a valid question are skipped
/// and the quiz comes back shorter.
pub fn generate<R: Rng + ?Sized>(config: &QuizConfig, lesson: &QaidaLesson, rng: &mut R) -> Vec<QuizQuestion> {
    let questions: Vec<QuizQuestion> = match config.mode {
        QuizMode::LetterToSound => {
            let letters = lesson.letters(QuizSource::LettersChart);
            sample(letters, config.items_per_quiz, rng)
                .into_iter()
                .filter_map(|prompt| {
                    let (options, correct_index) = build_options(prompt, letters, |l| l.id.as_str(), rng)?;
                    Some(QuizQuestion::LetterToSound {
                        prompt_letter: prompt.clone(),
                        options_letters: options,
                        correct_index,
                    })
                })
                .collect()
        }
        QuizMode::SoundToLetter => {
            let examples = lesson.syllable_examples();
            sample(examples, config.items_per_quiz, rng)
                .into_iter()
                .filter_map(|prompt| {
                    let (options, correct_index) = build_options(prompt, examples, |e| e.id.as_str(), rng)?;
                    Some(QuizQuestion::SoundToLetter {
                        prompt_syllable: prompt.clone(),
                        options_examples: options,
                        correct_index,
                    })
                })
                .collect()
        }
        QuizMode::IdentifyForm => {
            let eligible: Vec<QaidaLetter> = lesson
                .letters(QuizSource::LettersFormsChart)
                .iter()
                .filter(|l| l.distinct_forms().len() >= MIN_OPTIONS)
                .cloned()
                .collect();
            sample(&eligible, config.items_per_quiz, rng)
                .into_iter()
                .filter_map(|letter| identify_form_question(letter, rng))
                .collect()
        }
    };

    debug!(
        lesson = lesson.id,
        mode = ?config.mode,
        requested = config.items_per_quiz,
        generated = questions.len(),
        "generated quiz"
    );
    questions
}

fn sample<'a, T, R: Rng + ?Sized>(pool: &'a [T], amount: usize, rng: &mut R) -> Vec<&'a T> {
    let mut picked: Vec<&T> = pool.iter().collect();
    picked.shuffle(rng);
    picked.truncate(amount);
    picked
}

// Prompt plus distinct distractors from the full pool, shuffled.
fn build_options<T, R, F>(prompt: &T, pool: &[T], key: F, rng: &mut R) -> Option<(Vec<T>, usize)>
where
    T: Clone,
    R: Rng + ?Sized,
    F: Fn(&T) -> &str,
{
    let mut candidates: Vec<&T> = pool.iter().collect();
    candidates.shuffle(rng);

    let mut options: Vec<&T> = vec![prompt];
    for candidate in candidates {
        if options.len() >= MAX_OPTIONS {
            break;
        }
        if !options.iter().any(|o| key(*o) == key(candidate)) {
            options.push(candidate);
        }
    }

    if options.len() < MIN_OPTIONS {
        return None;
    }

    options.shuffle(rng);
    let correct_index = options.iter().position(|o| key(*o) == key(prompt))?;
    Some((options.into_iter().cloned().collect(), correct_index))
}

fn identify_form_question<R: Rng + ?Sized>(letter: &QaidaLetter, rng: &mut R) -> Option<QuizQuestion> {
    let mut options = letter.distinct_forms();
    if options.len() < MIN_OPTIONS {
        return None;
    }

    let correct_form_type = *options.choose(rng)?;
    options.shuffle(rng);
    let correct_index = options.iter().position(|k| *k == correct_form_type)?;

    Some(QuizQuestion::IdentifyForm {
        prompt_letter: letter.clone(),
        options_form_keys: options,
        correct_index,
        correct_form_type,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Excellent,
    Fair,
    Retry,
}

impl Grade {
    pub fn from_percentage(percentage: u32) -> Self {
        if percentage >= 80 {
            Grade::Excellent
        } else if percentage >= 60 {
            Grade::Fair
        } else {
            Grade::Retry
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Grade::Excellent => "Офарин! Шумо хеле хуб қироат ва фаҳмидед.",
            Grade::Fair => "Натиҷа бад нест. Боз каме тамрин кунед.",
            Grade::Retry => "Ҳеҷ гап нест. Боз як бор дарс ва санҷишро такрор кунед.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResults {
    pub correct: usize,
    pub total: usize,
    pub percentage: u32,
    pub grade: Grade,
}

/// Progress through one quiz: current question, locked answers, score.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    current: usize,
    answers: BTreeMap<usize, usize>,
    correct: usize,
    finished: bool,
}

impl QuizSession {
    /// Returns `None` for an empty quiz; there is nothing to start.
    pub fn new(questions: Vec<QuizQuestion>) -> Option<Self> {
        if questions.is_empty() {
            return None;
        }
        Some(Self {
            questions,
            current: 0,
            answers: BTreeMap::new(),
            correct: 0,
            finished: false,
        })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        if self.finished {
            return None;
        }
        self.questions.get(self.current)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn selected_answer(&self, question: usize) -> Option<usize> {
        self.answers.get(&question).copied()
    }

    /// Record an answer for the current question.
    ///
    /// The first answer locks: later calls for the same question, out-of-range
    /// options and calls after the quiz finished return `None`.
    pub fn select_answer(&mut self, option: usize) -> Option<bool> {
        let question = self.current_question()?;
        if option >= question.option_count() || self.answers.contains_key(&self.current) {
            return None;
        }

        let is_correct = question.is_correct(option);
        self.answers.insert(self.current, option);
        if is_correct {
            self.correct += 1;
        }
        Some(is_correct)
    }

    pub fn previous(&mut self) {
        if !self.finished {
            self.current = self.current.saturating_sub(1);
        }
    }

    /// Advance; moving past the last question finishes the quiz.
    pub fn next(&mut self) {
        if self.finished {
            return;
        }
        if self.current + 1 >= self.questions.len() {
            self.finished = true;
        } else {
            self.current += 1;
        }
    }

    pub fn results(&self) -> QuizResults {
        let total = self.questions.len();
        let percentage = if total == 0 {
            0
        } else {
            ((self.correct as f64 / total as f64) * 100.0).round() as u32
        };
        QuizResults {
            correct: self.correct,
            total,
            percentage,
            grade: Grade::from_percentage(percentage),
        }
    }
}
