//! Linguistic pipeline: tokenization, stopword flags and noun chunking

use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// English stopwords, the list common NLP toolkits ship with
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "amount",
    "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "becoming",
    "been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "both", "bottom", "but", "by", "ca", "call", "can", "cannot", "could", "did", "do",
    "does", "doing", "done", "down", "due", "during", "each", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "first", "five", "for", "former",
    "formerly", "forty", "four", "from", "front", "full", "further", "get", "give", "go", "had",
    "has", "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein", "hereupon",
    "hers", "herself", "him", "himself", "his", "how", "however", "hundred", "i", "if", "in",
    "indeed", "into", "is", "it", "its", "itself", "just", "keep", "last", "latter", "latterly",
    "least", "less", "made", "make", "many", "may", "me", "meanwhile", "might", "mine", "more",
    "moreover", "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely",
    "neither", "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor",
    "not", "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
    "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "part",
    "per", "perhaps", "please", "put", "quite", "rather", "re", "really", "regarding", "same",
    "say", "see", "seem", "seemed", "seeming", "seems", "serious", "several", "she", "should",
    "show", "side", "since", "six", "sixty", "so", "some", "somehow", "someone", "something",
    "sometime", "sometimes", "somewhere", "still", "such", "take", "ten", "than", "that", "the",
    "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
    "therefore", "therein", "thereupon", "these", "they", "third", "this", "those", "though",
    "three", "through", "throughout", "thru", "thus", "to", "together", "too", "top", "toward",
    "towards", "twelve", "twenty", "two", "under", "unless", "until", "up", "upon", "us", "used",
    "using", "various", "very", "via", "was", "we", "well", "were", "what", "whatever", "when",
    "whence", "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon",
    "wherever", "whether", "which", "while", "whither", "who", "whoever", "whole", "whom", "whose",
    "why", "will", "with", "within", "without", "would", "yet", "you", "your", "yours", "yourself",
    "yourselves",
];

/// Words that may open a noun chunk
const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "my", "our", "your", "their", "his",
    "her", "its", "some", "any", "every", "each",
];

/// Verbs common in job postings that are rarely used as nouns
const VERBS: &[&str] = &[
    "achieve", "analyze", "apply", "architect", "automate", "build", "builds", "built",
    "collaborate", "collaborates", "communicate", "contribute", "contributes", "create",
    "creates", "define", "deliver", "delivers", "deploy", "deploys", "develop", "develops",
    "developed", "enable", "ensure", "ensures", "establish", "evaluate", "hire", "identify",
    "implement", "implements", "implemented", "improve", "improves", "join", "learn", "maintain",
    "maintains", "maintained", "mentor", "mentors", "optimize", "optimizes", "partner", "provide",
    "provides", "seek", "seeks", "troubleshoot", "understand", "want", "wants", "write", "writes",
    "wrote",
];

/// "-ing" words that name a field or practice rather than an action
const NOMINAL_ING: &[&str] = &[
    "accounting", "advertising", "auditing", "banking", "benchmarking", "branding", "budgeting",
    "caching", "computing", "consulting", "copywriting", "engineering", "financing", "forecasting",
    "hosting", "learning", "licensing", "logging", "manufacturing", "mapping", "marketing",
    "messaging", "modeling", "modelling", "monitoring", "networking", "onboarding", "planning",
    "pricing", "processing", "profiling", "programming", "publishing", "purchasing", "rendering",
    "reporting", "routing", "scheduling", "scripting", "shipping", "staffing", "streaming",
    "testing", "tooling", "tracing", "tracking", "training", "writing",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub is_stop: bool,
}

/// Output of one pipeline run over a text
#[derive(Debug, Clone, Default)]
pub struct ParsedText {
    pub tokens: Vec<Token>,
    pub noun_chunks: Vec<String>,
}

/// Loaded once by the entry point and shared read-only between requests
pub trait LinguisticPipeline: Send + Sync {
    fn parse(&self, text: &str) -> ParsedText;

    fn name(&self) -> &str;
}

/// Lexicon-driven pipeline needing no model files.
///
/// Noun chunks are maximal runs of non-stopword tokens, optionally opened by
/// one determiner. Verb-like tokens end a run, so a chunk never starts with
/// or spans a verb. A run only becomes a chunk once it spans at least two
/// tokens.
pub struct RuleBasedPipeline {
    stop_words: HashSet<&'static str>,
    determiners: HashSet<&'static str>,
    verbs: HashSet<&'static str>,
    nominal_ing: HashSet<&'static str>,
}

impl Default for RuleBasedPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleBasedPipeline {
    pub fn new() -> Self {
        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
            determiners: DETERMINERS.iter().copied().collect(),
            verbs: VERBS.iter().copied().collect(),
            nominal_ing: NOMINAL_ING.iter().copied().collect(),
        }
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word.to_lowercase().as_str())
    }

    /// Known verbs, and "-ing" forms that modify what follows them
    /// ("building rest apis"). A trailing "-ing" word heads the phrase
    /// ("load balancing") and is kept.
    fn is_verb_like(&self, tokens: &[Token], i: usize, run_end: usize) -> bool {
        let word = tokens[i].text.to_lowercase();
        if self.verbs.contains(word.as_str()) {
            return true;
        }
        word.len() > 5
            && word.ends_with("ing")
            && i + 1 < run_end
            && !self.nominal_ing.contains(word.as_str())
    }

    fn chunk(&self, tokens: &[Token]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            if tokens[i].is_stop {
                i += 1;
                continue;
            }

            let mut run_end = i;
            while run_end < tokens.len() && !tokens[run_end].is_stop {
                run_end += 1;
            }

            let mut start = i;
            for j in i..=run_end {
                if j < run_end && !self.is_verb_like(tokens, j, run_end) {
                    continue;
                }
                if j > start {
                    if let Some(chunk) = self.make_chunk(tokens, start, j) {
                        chunks.push(chunk);
                    }
                }
                start = j + 1;
            }

            i = run_end;
        }

        chunks
    }

    /// Span `tokens[start..end]`, opened by the determiner right before it if any
    fn make_chunk(&self, tokens: &[Token], start: usize, end: usize) -> Option<String> {
        let determiner = start
            .checked_sub(1)
            .map(|prev| &tokens[prev])
            .filter(|prev| self.determiners.contains(prev.text.to_lowercase().as_str()));

        let words: Vec<&str> = determiner
            .into_iter()
            .chain(tokens[start..end].iter())
            .map(|t| t.text.as_str())
            .collect();

        (words.len() >= 2).then(|| words.join(" "))
    }
}

impl LinguisticPipeline for RuleBasedPipeline {
    fn parse(&self, text: &str) -> ParsedText {
        let tokens: Vec<Token> = text
            .unicode_words()
            .map(|word| Token {
                text: word.to_string(),
                is_stop: self.is_stop_word(word),
            })
            .collect();

        let noun_chunks = self.chunk(&tokens);
        ParsedText { tokens, noun_chunks }
    }

    fn name(&self) -> &str {
        "rule-based-en"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopword_flags() {
        let parsed = RuleBasedPipeline::new().parse("the python developer with skills");
        let flags: Vec<(&str, bool)> = parsed
            .tokens
            .iter()
            .map(|t| (t.text.as_str(), t.is_stop))
            .collect();

        assert_eq!(
            flags,
            vec![
                ("the", true),
                ("python", false),
                ("developer", false),
                ("with", true),
                ("skills", false)
            ]
        );
    }

    #[test]
    fn test_noun_chunks_take_leading_determiner() {
        let parsed = RuleBasedPipeline::new()
            .parse("looking for a python developer with strong communication skills");

        assert_eq!(
            parsed.noun_chunks,
            vec!["a python developer", "strong communication skills"]
        );
    }

    #[test]
    fn test_single_word_runs_are_not_chunks() {
        let parsed = RuleBasedPipeline::new().parse("rust and go");
        assert!(parsed.noun_chunks.is_empty());

        let parsed = RuleBasedPipeline::new().parse("the team");
        assert_eq!(parsed.noun_chunks, vec!["the team"]);
    }

    #[test]
    fn test_adverbs_stay_in_the_span() {
        let parsed = RuleBasedPipeline::new().parse("a highly motivated engineer");
        assert_eq!(parsed.noun_chunks, vec!["a highly motivated engineer"]);
    }

    #[test]
    fn test_verbs_do_not_lead_chunks() {
        let pipeline = RuleBasedPipeline::new();

        let parsed = pipeline.parse("develop and maintain scalable services");
        assert_eq!(parsed.noun_chunks, vec!["scalable services"]);

        let parsed = pipeline.parse("we are hiring a senior rust engineer who writes clean code");
        assert_eq!(parsed.noun_chunks, vec!["a senior rust engineer", "clean code"]);

        let parsed = pipeline.parse("must have experience building rest apis");
        assert_eq!(parsed.noun_chunks, vec!["rest apis"]);
    }

    #[test]
    fn test_nominal_ing_words_stay_in_chunks() {
        let parsed = RuleBasedPipeline::new()
            .parse("programming languages for machine learning and data engineering teams");
        assert_eq!(
            parsed.noun_chunks,
            vec!["programming languages", "machine learning", "data engineering teams"]
        );
    }

    #[test]
    fn test_empty_text() {
        let parsed = RuleBasedPipeline::new().parse("");
        assert!(parsed.tokens.is_empty());
        assert!(parsed.noun_chunks.is_empty());
    }
}
