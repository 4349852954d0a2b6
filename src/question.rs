use rand::Rng;
use rand::seq::SliceRandom;

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Stable identifier, unique within a catalog.
    pub id: u32,
    /// Text shown as the question prompt.
    pub text: String,
    /// Answer options in presentation order.
    pub options: Vec<String>,
    /// Index in `options` that contains the correct answer.
    pub correct_index: usize,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuestionError {
    #[error("question {id} has {count} options but at least 2 are required")]
    TooFewOptions { id: u32, count: usize },
    #[error("question {id} marks option {index} as correct but only has {count} options")]
    CorrectIndexOutOfRange { id: u32, index: usize, count: usize },
}

impl Question {
    /// Checks the record invariants: at least two options and a correct index
    /// that points into them.
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                id: self.id,
                count: self.options.len(),
            });
        }

        if self.correct_index >= self.options.len() {
            return Err(QuestionError::CorrectIndexOutOfRange {
                id: self.id,
                index: self.correct_index,
                count: self.options.len(),
            });
        }

        Ok(())
    }

    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_index
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_index).map(String::as_str)
    }

    /// Returns a copy with the options permuted by `rng` and `correct_index`
    /// remapped to the new position of the correct answer.
    pub fn with_shuffled_options<R: Rng + ?Sized>(&self, rng: &mut R) -> Question {
        let mut order: Vec<usize> = (0..self.options.len()).collect();
        order.shuffle(rng);

        let correct_index = order
            .iter()
            .position(|original| *original == self.correct_index)
            .unwrap_or(self.correct_index);

        Question {
            id: self.id,
            text: self.text.clone(),
            options: order
                .into_iter()
                .map(|original| self.options[original].clone())
                .collect(),
            correct_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn spider() -> Question {
        Question {
            id: 8,
            text: "How many legs does a spider have?".to_string(),
            options: vec![
                "6".to_string(),
                "8".to_string(),
                "4".to_string(),
                "10".to_string(),
            ],
            correct_index: 1,
        }
    }

    #[test]
    fn validates_well_formed_question() {
        assert_eq!(spider().validate(), Ok(()));
    }

    #[test]
    fn rejects_single_option() {
        let question = Question {
            options: vec!["8".to_string()],
            correct_index: 0,
            ..spider()
        };

        assert_eq!(
            question.validate(),
            Err(QuestionError::TooFewOptions { id: 8, count: 1 })
        );
    }

    #[test]
    fn rejects_correct_index_past_options() {
        let question = Question {
            correct_index: 4,
            ..spider()
        };

        assert_eq!(
            question.validate(),
            Err(QuestionError::CorrectIndexOutOfRange {
                id: 8,
                index: 4,
                count: 4
            })
        );
    }

    #[test]
    fn shuffle_keeps_correct_answer_reachable() {
        let question = spider();

        for seed in 0..16 {
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            let shuffled = question.with_shuffled_options(&mut rng);

            assert_eq!(shuffled.options.len(), 4);
            assert_eq!(shuffled.correct_option(), Some("8"));
            assert!(shuffled.is_correct(shuffled.correct_index));
        }
    }

    #[test]
    fn deserializes_camel_case_record() {
        let json = r#"{"id":1,"text":"What is 2 + 2?","options":["3","4"],"correctIndex":1}"#;
        let question: Question = serde_json::from_str(json).expect("question should parse");

        assert_eq!(question.correct_option(), Some("4"));
    }
}
