use rand::seq::SliceRandom;
use rand::Rng;

/// Sentences synthesized for every practice word
pub const SENTENCES_PER_WORD: usize = 3;
/// A connector phrase is inserted before every n-th sentence
pub const CONNECTOR_EVERY: usize = 3;

const WORD_SLOT: &str = "{word}";

pub const SENTENCE_TEMPLATES: [&str; 10] = [
    "I need to practice typing the word {word} correctly.",
    "The word {word} is challenging for me to type accurately.",
    "When I type {word}, I should focus on each letter carefully.",
    "Typing {word} requires attention to detail and precision.",
    "I will improve my accuracy when typing {word} with practice.",
    "The more I practice typing {word}, the better I will become.",
    "Each time I type {word}, I should check for errors.",
    "Careful typing of {word} will help me build muscle memory.",
    "I should slow down when typing {word} to avoid mistakes.",
    "Repetition of typing {word} will help me master it.",
];

pub const CONNECTORS: [&str; 5] = [
    "Let's continue practicing. ",
    "Moving on to more practice. ",
    "Now for some more typing practice. ",
    "Let's focus on these words again. ",
    "Continuing with our practice session. ",
];

/// Build practice text that repeats every word in `words`.
pub fn synthesize<R: Rng + ?Sized>(words: &[String], rng: &mut R) -> String {
    let mut sentences = sentences_for(words, rng);
    sentences.shuffle(rng);
    join_with_connectors(&sentences, rng)
}

/// Exactly [`SENTENCES_PER_WORD`] sentences per word, in word order.
pub fn sentences_for<R: Rng + ?Sized>(words: &[String], rng: &mut R) -> Vec<String> {
    let mut sentences = Vec::with_capacity(words.len() * SENTENCES_PER_WORD);
    for word in words {
        for _ in 0..SENTENCES_PER_WORD {
            let template = SENTENCE_TEMPLATES[rng.gen_range(0..SENTENCE_TEMPLATES.len())];
            sentences.push(template.replace(WORD_SLOT, word));
        }
    }
    sentences
}

fn join_with_connectors<R: Rng + ?Sized>(sentences: &[String], rng: &mut R) -> String {
    let mut text = String::new();
    for (i, sentence) in sentences.iter().enumerate() {
        if i > 0 && i % CONNECTOR_EVERY == 0 {
            text.push_str(CONNECTORS[rng.gen_range(0..CONNECTORS.len())]);
        }
        text.push_str(sentence);
        text.push(' ');
    }
    text
}
