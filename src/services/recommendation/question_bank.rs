//! Fixed Question Bank
//!
//! Built-in questions used when the settings choose `question_source =
//! "fixed"`. They cover the same ground the generated quiz is asked to.

use quiz_funnel_core::{Question, QuizOption};

/// The built-in quiz, in display order
pub fn fixed_questions() -> Vec<Question> {
    vec![
        Question::new(
            "How much experience do you have with keto and carnivore?",
            vec![
                QuizOption::new("None yet", "I have never tried either diet"),
                QuizOption::new("Some keto", "I have done keto but never carnivore"),
                QuizOption::new("Some carnivore", "I have tried carnivore, on and off"),
                QuizOption::new("Both", "I have been low-carb for a while"),
            ],
        )
        .with_category("Experience"),
        Question::new(
            "What is your main goal right now?",
            vec![
                QuizOption::new("Lose weight", "Shed fat with a clear plan"),
                QuizOption::new("Feel better", "Calm autoimmune or digestive issues"),
                QuizOption::new("More energy", "No more afternoon crashes"),
                QuizOption::new("More variety", "Enjoy my meals again"),
            ],
        )
        .with_category("Goal"),
        Question::new(
            "How active are you day to day?",
            vec![
                QuizOption::new("Sedentary", "Mostly sitting, little exercise"),
                QuizOption::new("Getting back", "It has been a while since I trained"),
                QuizOption::new("Active", "I train several times a week"),
            ],
        )
        .with_category("Lifestyle"),
        Question::new(
            "How do you feel about cooking?",
            vec![
                QuizOption::new("Keep it quick", "I want meals ready in minutes"),
                QuizOption::new("I enjoy it", "I like trying new recipes"),
                QuizOption::new("I get bored", "Eating the same thing wears me down"),
            ],
        )
        .with_category("Kitchen"),
        Question::new(
            "What has tripped you up on other diets?",
            vec![
                QuizOption::new("Hunger", "I never felt full"),
                QuizOption::new("Cravings", "Sugar always won in the end"),
                QuizOption::new("Complexity", "Too many rules to keep track of"),
                QuizOption::new("Monotony", "The food got boring fast"),
            ],
        )
        .with_category("Obstacles"),
    ]
}
