//! Stop-word statistics.
//!
//! Stop words are used here as a *positive* signal: a block of text dense in
//! common function words reads like prose, while link lists, code and
//! navigation chrome barely contain any. The lookup contract is all that
//! matters to the pipeline; the list itself is compiled in.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Common English function words.
const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "almost", "alone", "along",
    "already", "also", "although", "always", "am", "among", "an", "and", "another", "any",
    "anybody", "anyone", "anything", "anywhere", "are", "area", "around", "as", "ask", "asked",
    "at", "away", "back", "be", "became", "because", "become", "becomes", "been", "before",
    "began", "behind", "being", "best", "better", "between", "big", "both", "but", "by", "came",
    "can", "cannot", "case", "certain", "certainly", "clear", "clearly", "come", "could", "did",
    "differ", "different", "do", "does", "done", "down", "during", "each", "early", "either",
    "end", "enough", "even", "evenly", "ever", "every", "everybody", "everyone", "everything",
    "everywhere", "far", "felt", "few", "find", "finds", "first", "for", "four", "from", "full",
    "fully", "further", "gave", "general", "generally", "get", "gets", "give", "given", "gives",
    "go", "going", "good", "got", "great", "had", "has", "have", "having", "he", "her", "here",
    "herself", "high", "higher", "him", "himself", "his", "how", "however", "i", "if", "important",
    "in", "interest", "into", "is", "it", "its", "itself", "just", "keep", "kind", "knew", "know",
    "known", "knows", "large", "largely", "last", "later", "latest", "least", "less", "let",
    "like", "likely", "long", "longer", "made", "make", "making", "man", "many", "may", "me",
    "member", "men", "might", "more", "most", "mostly", "mr", "mrs", "much", "must", "my",
    "myself", "necessary", "need", "needed", "never", "new", "newer", "next", "no", "nobody",
    "non", "not", "nothing", "now", "nowhere", "number", "of", "off", "often", "old", "older",
    "on", "once", "one", "only", "open", "or", "order", "other", "others", "our", "out", "over",
    "part", "per", "perhaps", "place", "point", "possible", "present", "put", "quite", "rather",
    "really", "right", "room", "said", "same", "saw", "say", "says", "second", "see", "seem",
    "seemed", "seeming", "seems", "several", "shall", "she", "should", "show", "showed", "shows",
    "side", "since", "small", "so", "some", "somebody", "someone", "something", "somewhere",
    "state", "still", "such", "sure", "take", "taken", "than", "that", "the", "their", "them",
    "then", "there", "therefore", "these", "they", "thing", "things", "think", "thinks", "this",
    "those", "though", "thought", "three", "through", "thus", "to", "today", "together", "too",
    "toward", "turn", "two", "under", "until", "up", "upon", "us", "use", "used", "uses", "very",
    "want", "wanted", "wants", "was", "way", "ways", "we", "well", "went", "were", "what", "when",
    "where", "whether", "which", "while", "who", "whole", "whose", "why", "will", "with",
    "within", "without", "work", "worked", "working", "would", "year", "years", "yet", "you",
    "young", "your", "yours",
];

static STOP_WORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ENGLISH_STOP_WORDS.iter().copied().collect());

/// Word statistics for a text fragment. Purely derived, recomputed freely.
#[derive(Debug, Default, Clone)]
pub struct WordStats {
    /// Number of stop words found.
    pub stop_word_count: usize,

    /// Total number of candidate words.
    pub word_count: usize,

    /// The stop words found, in encounter order.
    pub stop_words: Vec<String>,
}

/// Computes stop-word statistics for a text fragment.
///
/// Punctuation is stripped before splitting so "don" and "don," count as the
/// same candidate word.
#[must_use]
pub fn stop_word_count(text: &str) -> WordStats {
    if text.trim().is_empty() {
        return WordStats::default();
    }

    let stripped = strip_punctuation(text);
    let mut stats = WordStats::default();

    for word in stripped.split_whitespace() {
        stats.word_count += 1;
        let lowered = word.to_lowercase();
        if STOP_WORD_SET.contains(lowered.as_str()) {
            stats.stop_words.push(lowered);
        }
    }
    stats.stop_word_count = stats.stop_words.len();

    stats
}

fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect()
}
