//! Built-in sample quizzes for offline play and demos.

use quiz_core::model::{Question, QuestionSet};

fn question(
    id: &str,
    text: &str,
    options: [&str; 4],
    correct: usize,
    explanation: &str,
) -> Question {
    Question::new(
        id,
        text,
        options.iter().map(|s| (*s).to_string()).collect(),
        correct,
        Some(explanation.to_string()),
    )
    .expect("sample question should be valid")
}

/// Returns a canned ten-question quiz matched to the topic by keyword,
/// falling back to the history set.
#[must_use]
pub fn offline_question_set(topic: &str) -> QuestionSet {
    let topic = topic.to_lowercase();
    let questions = if ["program", "coding", "software", "computer", "rust"]
        .iter()
        .any(|k| topic.contains(k))
    {
        programming_questions()
    } else if ["space", "astronom", "planet", "cosmos"]
        .iter()
        .any(|k| topic.contains(k))
    {
        space_questions()
    } else {
        history_questions()
    };

    QuestionSet::new(questions).expect("sample set should have ten questions")
}

fn history_questions() -> Vec<Question> {
    vec![
        question(
            "hist-1",
            "In which year did World War II end?",
            ["1943", "1944", "1945", "1946"],
            2,
            "World War II ended in 1945 with the surrender of Japan in September.",
        ),
        question(
            "hist-2",
            "Who was the first President of the United States?",
            [
                "Thomas Jefferson",
                "George Washington",
                "John Adams",
                "Benjamin Franklin",
            ],
            1,
            "George Washington served as the first President from 1789 to 1797.",
        ),
        question(
            "hist-3",
            "Which ancient wonder stood at Giza?",
            [
                "The Hanging Gardens",
                "The Colossus of Rhodes",
                "The Great Pyramid",
                "The Lighthouse of Alexandria",
            ],
            2,
            "The Great Pyramid of Giza is the only ancient wonder still standing.",
        ),
        question(
            "hist-4",
            "Who published the Ninety-five Theses in 1517?",
            ["John Calvin", "Martin Luther", "Erasmus", "Thomas More"],
            1,
            "Martin Luther's theses sparked the Protestant Reformation.",
        ),
        question(
            "hist-5",
            "In which year did the Berlin Wall fall?",
            ["1987", "1988", "1989", "1991"],
            2,
            "The wall was opened on 9 November 1989.",
        ),
        question(
            "hist-6",
            "The Magna Carta was sealed in which year?",
            ["1066", "1215", "1337", "1453"],
            1,
            "King John sealed the Magna Carta at Runnymede in 1215.",
        ),
        question(
            "hist-7",
            "Which empire was ruled from Constantinople for a thousand years?",
            [
                "The Ottoman Empire",
                "The Byzantine Empire",
                "The Holy Roman Empire",
                "The Persian Empire",
            ],
            1,
            "The Byzantine Empire lasted from 330 until 1453.",
        ),
        question(
            "hist-8",
            "Who reached the Americas in 1492 sailing for Spain?",
            [
                "Ferdinand Magellan",
                "Vasco da Gama",
                "Christopher Columbus",
                "Amerigo Vespucci",
            ],
            2,
            "Columbus landed in the Caribbean in October 1492.",
        ),
        question(
            "hist-9",
            "The French Revolution began in which year?",
            ["1776", "1789", "1799", "1804"],
            1,
            "The storming of the Bastille in 1789 marks its start.",
        ),
        question(
            "hist-10",
            "Who was the first person to walk on the Moon?",
            [
                "Buzz Aldrin",
                "Yuri Gagarin",
                "Neil Armstrong",
                "Michael Collins",
            ],
            2,
            "Neil Armstrong stepped onto the Moon on 20 July 1969.",
        ),
    ]
}

fn programming_questions() -> Vec<Question> {
    vec![
        question(
            "prog-1",
            "What is the name of Rust's package manager?",
            ["Crater", "Cargo", "Rustup", "Crates"],
            1,
            "Cargo builds projects and manages dependencies from crates.io.",
        ),
        question(
            "prog-2",
            "What does HTML stand for?",
            [
                "HyperText Markup Language",
                "HighText Machine Language",
                "Hyperlink Text Management Language",
                "Home Tool Markup Language",
            ],
            0,
            "HTML is the markup language of the web.",
        ),
        question(
            "prog-3",
            "Who created the Linux kernel?",
            [
                "Dennis Ritchie",
                "Richard Stallman",
                "Linus Torvalds",
                "Ken Thompson",
            ],
            2,
            "Linus Torvalds released the first Linux kernel in 1991.",
        ),
        question(
            "prog-4",
            "What is the time complexity of binary search?",
            ["O(1)", "O(log n)", "O(n)", "O(n log n)"],
            1,
            "Each step halves the remaining search range.",
        ),
        question(
            "prog-5",
            "Which data structure is last-in, first-out?",
            ["Queue", "Stack", "Heap", "Linked list"],
            1,
            "A stack pops the most recently pushed element first.",
        ),
        question(
            "prog-6",
            "Which HTTP status code means Not Found?",
            ["301", "403", "404", "500"],
            2,
            "404 indicates the server cannot find the requested resource.",
        ),
        question(
            "prog-7",
            "Which Git command records staged changes into history?",
            ["git push", "git commit", "git stage", "git merge"],
            1,
            "git commit creates a new commit from the staging area.",
        ),
        question(
            "prog-8",
            "Who created the Python programming language?",
            [
                "Guido van Rossum",
                "James Gosling",
                "Bjarne Stroustrup",
                "Brendan Eich",
            ],
            0,
            "Guido van Rossum first released Python in 1991.",
        ),
        question(
            "prog-9",
            "In which decade did the C language first appear?",
            ["1960s", "1970s", "1980s", "1990s"],
            1,
            "Dennis Ritchie developed C at Bell Labs in the early 1970s.",
        ),
        question(
            "prog-10",
            "What does SQL stand for?",
            [
                "Structured Query Language",
                "Simple Question Language",
                "Standard Queue Logic",
                "Sequential Query Library",
            ],
            0,
            "SQL is the standard language for relational databases.",
        ),
    ]
}

fn space_questions() -> Vec<Question> {
    vec![
        question(
            "space-1",
            "Which is the largest planet in the Solar System?",
            ["Saturn", "Neptune", "Jupiter", "Uranus"],
            2,
            "Jupiter's mass is more than twice that of all other planets combined.",
        ),
        question(
            "space-2",
            "Who was the first human in space?",
            [
                "Alan Shepard",
                "Yuri Gagarin",
                "John Glenn",
                "Valentina Tereshkova",
            ],
            1,
            "Yuri Gagarin orbited Earth aboard Vostok 1 in April 1961.",
        ),
        question(
            "space-3",
            "Which planet is known as the Red Planet?",
            ["Venus", "Mercury", "Mars", "Jupiter"],
            2,
            "Iron oxide on its surface gives Mars its reddish color.",
        ),
        question(
            "space-4",
            "How many planets are in the Solar System?",
            ["7", "8", "9", "10"],
            1,
            "Eight, since Pluto was reclassified as a dwarf planet in 2006.",
        ),
        question(
            "space-5",
            "What is the name of our galaxy?",
            ["Andromeda", "The Milky Way", "Triangulum", "Whirlpool"],
            1,
            "The Solar System sits in a spiral arm of the Milky Way.",
        ),
        question(
            "space-6",
            "In which year did Apollo 11 land on the Moon?",
            ["1967", "1968", "1969", "1970"],
            2,
            "Apollo 11 touched down on 20 July 1969.",
        ),
        question(
            "space-7",
            "Which planet is famous for its prominent ring system?",
            ["Mars", "Saturn", "Venus", "Mercury"],
            1,
            "Saturn's rings are made mostly of ice particles.",
        ),
        question(
            "space-8",
            "What was the first artificial satellite?",
            ["Explorer 1", "Sputnik 1", "Vanguard 1", "Luna 1"],
            1,
            "The Soviet Union launched Sputnik 1 in October 1957.",
        ),
        question(
            "space-9",
            "What kind of celestial object is the Sun?",
            ["A planet", "A comet", "A star", "A nebula"],
            2,
            "The Sun is a main-sequence star at the center of the Solar System.",
        ),
        question(
            "space-10",
            "What is the closest star system to the Sun?",
            [
                "Alpha Centauri",
                "Barnard's Star",
                "Sirius",
                "Proxima Centauri",
            ],
            0,
            "The Alpha Centauri system, including Proxima Centauri, is about 4.3 light-years away.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QUESTIONS_PER_QUIZ;

    #[test]
    fn every_topic_routes_to_a_full_set() {
        for topic in ["Roman History", "Rust programming", "space exploration", ""] {
            let set = offline_question_set(topic);
            assert_eq!(set.len(), QUESTIONS_PER_QUIZ);
        }
    }

    #[test]
    fn keyword_routing_picks_matching_bank() {
        let programming = offline_question_set("intro to coding");
        assert!(programming.as_slice()[0].id().starts_with("prog-"));

        let space = offline_question_set("Planets and moons");
        assert!(space.as_slice()[0].id().starts_with("space-"));

        let fallback = offline_question_set("French cuisine");
        assert!(fallback.as_slice()[0].id().starts_with("hist-"));
    }
}
