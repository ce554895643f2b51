use super::{AnswerOption, Question};

pub const DEFAULT_GREETING: &str = "Happy birthday, willow!";

fn yes_no(correct_value: &str) -> Vec<AnswerOption> {
    vec![
        AnswerOption::new("yes".to_string(), "Yes".to_string(), correct_value == "yes"),
        AnswerOption::new("no".to_string(), "No".to_string(), correct_value == "no"),
    ]
}

/// The five fixed friend-quiz questions. Number 4 is the trick one.
pub fn birthday_questions() -> Vec<Question> {
    vec![
        Question::new(
            "Willow's favorite dessert is tiramisu.".to_string(),
            yes_no("yes"),
        ),
        Question::new(
            "Willow is secretly fluent in Japanese.".to_string(),
            yes_no("yes"),
        ),
        Question::new("Willow turns 21 this year.".to_string(), yes_no("yes")),
        Question::new(
            "Willow's birthday is on April 20th.".to_string(),
            yes_no("no"),
        ),
        Question::new("Willow is a great singer.".to_string(), yes_no("yes")),
    ]
}
