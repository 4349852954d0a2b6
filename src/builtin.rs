use crate::{Question, QuestionCatalog};

/// Number of levels a full run through the built-in questions can reach.
pub const BUILTIN_LEVEL_COUNT: u32 = 10;

fn question(id: u32, text: &str, options: [&str; 4], correct_index: usize) -> Question {
    Question {
        id,
        text: text.to_string(),
        options: options.iter().map(|option| option.to_string()).collect(),
        correct_index,
    }
}

pub fn builtin_questions() -> Vec<Question> {
    vec![
        question(1, "What is 2 + 2?", ["3", "4", "5", "6"], 1),
        question(
            2,
            "Which color is the sky on a clear day?",
            ["Green", "Blue", "Red", "Yellow"],
            1,
        ),
        question(
            3,
            "What is the capital city of France?",
            ["Paris", "London", "Berlin", "Madrid"],
            0,
        ),
        question(4, "Which animal barks?", ["Cat", "Dog", "Cow", "Sheep"], 1),
        question(
            5,
            "Which fruit is typically yellow?",
            ["Apple", "Banana", "Grape", "Cherry"],
            1,
        ),
        question(
            6,
            "What do bees produce?",
            ["Milk", "Honey", "Wax", "Oil"],
            1,
        ),
        question(
            7,
            "Which day comes after Monday?",
            ["Sunday", "Tuesday", "Friday", "Saturday"],
            1,
        ),
        question(
            8,
            "How many legs does a spider have?",
            ["6", "8", "4", "10"],
            1,
        ),
        question(
            9,
            "Which shape has 4 equal sides?",
            ["Triangle", "Rectangle", "Square", "Circle"],
            2,
        ),
        question(
            10,
            "What is the opposite of hot?",
            ["Cold", "Warm", "Cool", "Boiling"],
            0,
        ),
    ]
}

pub fn builtin_catalog() -> QuestionCatalog {
    QuestionCatalog::from_trusted(builtin_questions())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_questions_pass_validation() {
        let catalog = QuestionCatalog::new(builtin_questions()).expect("builtin set is valid");

        assert_eq!(catalog.len(), BUILTIN_LEVEL_COUNT as usize);
    }

    #[test]
    fn builtin_answers_match_expected_options() {
        let catalog = builtin_catalog();

        assert_eq!(catalog.get(0).and_then(Question::correct_option), Some("4"));
        assert_eq!(catalog.get(2).and_then(Question::correct_option), Some("Paris"));
        assert_eq!(catalog.get(8).and_then(Question::correct_option), Some("Square"));
        assert_eq!(catalog.get(9).and_then(Question::correct_option), Some("Cold"));
    }
}
