//! Lexicon-based polarity scorer.
//!
//! Polarity is the mean of the scores of known words. A preceding
//! intensifier scales a word's score, and a negation within the two
//! preceding tokens flips it at half strength. Text with no known words
//! scores 0.
//!
//! The built-in word list covers common English. A fuller lexicon can be
//! merged in from a JSON file of `{"word": score}` pairs.

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use crate::collaborators::SentimentScorer;
use crate::error::{InferenceError, InferenceResult};

/// Multiplier applied to a word that follows a negation.
const NEGATION_FACTOR: f64 = -0.5;

/// How many tokens back a negation still applies.
const NEGATION_WINDOW: usize = 2;

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "none", "nothing", "cannot", "hardly",
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("so", 1.3),
    ("too", 1.2),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("absolutely", 1.5),
    ("totally", 1.4),
    ("truly", 1.2),
    ("super", 1.3),
    ("quite", 1.1),
    ("somewhat", 0.7),
    ("slightly", 0.5),
    ("barely", 0.4),
];

const LEXICON: &[(&str, f64)] = &[
    // positive
    ("good", 0.7),
    ("great", 0.8),
    ("excellent", 1.0),
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("wonderful", 1.0),
    ("fantastic", 0.4),
    ("superb", 1.0),
    ("outstanding", 0.5),
    ("brilliant", 0.9),
    ("perfect", 1.0),
    ("best", 1.0),
    ("better", 0.5),
    ("nice", 0.6),
    ("fine", 0.4),
    ("okay", 0.5),
    ("ok", 0.5),
    ("cool", 0.35),
    ("happy", 0.8),
    ("glad", 0.5),
    ("cheerful", 0.6),
    ("joy", 0.8),
    ("joyful", 0.8),
    ("delighted", 0.7),
    ("thrilled", 0.6),
    ("excited", 0.375),
    ("exciting", 0.3),
    ("ecstatic", 1.0),
    ("love", 0.5),
    ("loved", 0.7),
    ("lovely", 0.5),
    ("beautiful", 0.85),
    ("pleasant", 0.733),
    ("enjoy", 0.4),
    ("enjoyed", 0.4),
    ("fun", 0.3),
    ("funny", 0.25),
    ("calm", 0.3),
    ("peaceful", 0.25),
    ("relaxed", 0.3),
    ("satisfied", 0.5),
    ("proud", 0.8),
    ("grateful", 0.8),
    ("thankful", 0.4),
    ("hopeful", 0.5),
    ("kind", 0.6),
    ("sweet", 0.35),
    ("favorite", 0.5),
    ("positive", 0.23),
    ("success", 0.3),
    ("successful", 0.75),
    ("win", 0.8),
    ("won", 0.6),
    ("adorable", 0.5),
    ("admire", 0.5),
    ("admirable", 0.6),
    ("affectionate", 0.5),
    ("agreeable", 0.4),
    ("alive", 0.1),
    ("amazed", 0.5),
    ("amused", 0.4),
    ("appealing", 0.4),
    ("appreciate", 0.5),
    ("appreciated", 0.5),
    ("attractive", 0.5),
    ("beloved", 0.7),
    ("blessed", 0.6),
    ("bliss", 0.8),
    ("blissful", 0.8),
    ("bright", 0.4),
    ("brave", 0.6),
    ("breathtaking", 0.8),
    ("capable", 0.3),
    ("care", 0.3),
    ("caring", 0.5),
    ("celebrate", 0.6),
    ("charming", 0.6),
    ("cheer", 0.5),
    ("clean", 0.4),
    ("clever", 0.5),
    ("comfortable", 0.4),
    ("comforting", 0.4),
    ("confident", 0.5),
    ("congratulations", 0.7),
    ("content", 0.4),
    ("cozy", 0.4),
    ("creative", 0.5),
    ("cute", 0.5),
    ("dazzling", 0.7),
    ("dear", 0.4),
    ("delicious", 0.8),
    ("delight", 0.7),
    ("delightful", 0.8),
    ("easy", 0.4),
    ("elegant", 0.6),
    ("encouraging", 0.5),
    ("energetic", 0.5),
    ("enjoyable", 0.6),
    ("enthusiastic", 0.6),
    ("exceptional", 0.7),
    ("exquisite", 0.8),
    ("fabulous", 0.8),
    ("fair", 0.3),
    ("faithful", 0.5),
    ("fantastically", 0.6),
    ("fascinating", 0.6),
    ("free", 0.3),
    ("fresh", 0.3),
    ("friendly", 0.5),
    ("generous", 0.6),
    ("gentle", 0.4),
    ("genuine", 0.4),
    ("gifted", 0.6),
    ("glorious", 0.8),
    ("gorgeous", 0.8),
    ("graceful", 0.6),
    ("gracious", 0.6),
    ("healthy", 0.5),
    ("heartwarming", 0.7),
    ("helpful", 0.5),
    ("heroic", 0.6),
    ("honest", 0.5),
    ("hooray", 0.7),
    ("hug", 0.4),
    ("ideal", 0.7),
    ("impressive", 0.7),
    ("incredible", 0.7),
    ("inspired", 0.6),
    ("inspiring", 0.6),
    ("interesting", 0.5),
    ("joyous", 0.8),
    ("laugh", 0.4),
    ("laughing", 0.4),
    ("liked", 0.4),
    ("like", 0.2),
    ("likes", 0.2),
    ("lively", 0.4),
    ("loving", 0.6),
    ("lucky", 0.6),
    ("magnificent", 0.9),
    ("marvelous", 0.9),
    ("meaningful", 0.5),
    ("merry", 0.6),
    ("neat", 0.4),
    ("optimistic", 0.6),
    ("overjoyed", 0.9),
    ("paradise", 0.7),
    ("passionate", 0.5),
    ("phenomenal", 0.8),
    ("playful", 0.4),
    ("pleased", 0.6),
    ("pleasure", 0.6),
    ("polite", 0.4),
    ("precious", 0.6),
    ("pretty", 0.3),
    ("promising", 0.5),
    ("rewarding", 0.6),
    ("relieved", 0.4),
    ("remarkable", 0.7),
    ("respect", 0.4),
    ("rich", 0.3),
    ("right", 0.3),
    ("romantic", 0.5),
    ("safe", 0.4),
    ("smart", 0.5),
    ("smile", 0.5),
    ("smiling", 0.5),
    ("smooth", 0.3),
    ("spectacular", 0.8),
    ("splendid", 0.8),
    ("strong", 0.4),
    ("stunning", 0.8),
    ("supportive", 0.5),
    ("sure", 0.3),
    ("terrific", 0.9),
    ("thank", 0.4),
    ("thanks", 0.4),
    ("thoughtful", 0.5),
    ("tremendous", 0.7),
    ("trust", 0.4),
    ("useful", 0.4),
    ("valuable", 0.5),
    ("victory", 0.7),
    ("warm", 0.4),
    ("welcome", 0.5),
    ("well", 0.3),
    ("wise", 0.5),
    ("wow", 0.6),
    ("yay", 0.7),
    // negative
    ("bad", -0.7),
    ("poor", -0.4),
    ("worse", -0.4),
    ("worst", -1.0),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("horrible", -1.0),
    ("dreadful", -1.0),
    ("nasty", -1.0),
    ("disgusting", -1.0),
    ("pathetic", -1.0),
    ("miserable", -1.0),
    ("boring", -1.0),
    ("sad", -0.5),
    ("unhappy", -0.6),
    ("upset", -0.4),
    ("lonely", -0.4),
    ("gloomy", -0.6),
    ("depressed", -0.5),
    ("depressing", -0.6),
    ("heartbroken", -0.8),
    ("devastated", -0.9),
    ("hopeless", -0.6),
    ("angry", -0.5),
    ("annoyed", -0.4),
    ("annoying", -0.8),
    ("frustrated", -0.7),
    ("frustrating", -0.4),
    ("hate", -0.8),
    ("hated", -0.9),
    ("afraid", -0.6),
    ("scared", -0.5),
    ("anxious", -0.4),
    ("worried", -0.3),
    ("tired", -0.4),
    ("sick", -0.7),
    ("pain", -0.5),
    ("painful", -0.7),
    ("ugly", -0.7),
    ("stupid", -0.8),
    ("wrong", -0.5),
    ("useless", -0.5),
    ("broken", -0.4),
    ("dull", -0.3),
    ("fail", -0.5),
    ("failed", -0.5),
    ("failure", -0.3),
    ("disappointed", -0.75),
    ("disappointing", -0.6),
    ("crying", -0.3),
    ("abandoned", -0.6),
    ("abysmal", -1.0),
    ("aggressive", -0.5),
    ("agony", -0.8),
    ("alarming", -0.6),
    ("alone", -0.3),
    ("anger", -0.6),
    ("angrier", -0.6),
    ("anguish", -0.8),
    ("annoy", -0.5),
    ("appalling", -0.9),
    ("ashamed", -0.6),
    ("atrocious", -1.0),
    ("awkward", -0.4),
    ("bitter", -0.5),
    ("bleak", -0.6),
    ("bored", -0.5),
    ("bother", -0.3),
    ("bothered", -0.4),
    ("broke", -0.4),
    ("bullshit", -0.8),
    ("burden", -0.4),
    ("careless", -0.4),
    ("catastrophe", -0.9),
    ("chaos", -0.5),
    ("cheap", -0.2),
    ("complain", -0.4),
    ("confused", -0.4),
    ("confusing", -0.4),
    ("cruel", -0.8),
    ("cry", -0.4),
    ("damaged", -0.5),
    ("danger", -0.5),
    ("dangerous", -0.6),
    ("dead", -0.6),
    ("death", -0.6),
    ("defeated", -0.6),
    ("desperate", -0.6),
    ("despair", -0.8),
    ("destroyed", -0.7),
    ("difficult", -0.4),
    ("dirty", -0.5),
    ("disaster", -0.8),
    ("disastrous", -0.9),
    ("discouraged", -0.5),
    ("disgusted", -0.8),
    ("dislike", -0.5),
    ("dismal", -0.7),
    ("distressed", -0.6),
    ("disturbing", -0.6),
    ("dread", -0.6),
    ("embarrassed", -0.5),
    ("embarrassing", -0.5),
    ("empty", -0.3),
    ("enraged", -0.9),
    ("evil", -0.9),
    ("exhausted", -0.5),
    ("fake", -0.5),
    ("fear", -0.6),
    ("fearful", -0.6),
    ("filthy", -0.7),
    ("foolish", -0.5),
    ("frightened", -0.6),
    ("frightening", -0.6),
    ("furious", -0.8),
    ("gross", -0.6),
    ("grief", -0.8),
    ("grim", -0.6),
    ("grumpy", -0.4),
    ("guilty", -0.5),
    ("harsh", -0.5),
    ("hateful", -0.9),
    ("hates", -0.8),
    ("hating", -0.8),
    ("hell", -0.6),
    ("helpless", -0.6),
    ("hostile", -0.6),
    ("hurt", -0.5),
    ("hurting", -0.5),
    ("idiot", -0.8),
    ("ill", -0.5),
    ("inferior", -0.5),
    ("insane", -0.4),
    ("insult", -0.6),
    ("irritated", -0.5),
    ("irritating", -0.6),
    ("jealous", -0.4),
    ("lame", -0.5),
    ("lazy", -0.4),
    ("lose", -0.4),
    ("loser", -0.7),
    ("losing", -0.4),
    ("lost", -0.3),
    ("mad", -0.6),
    ("mean", -0.4),
    ("mediocre", -0.4),
    ("mess", -0.4),
    ("messy", -0.4),
    ("mistake", -0.4),
    ("mourning", -0.7),
    ("nervous", -0.4),
    ("nightmare", -0.8),
    ("offended", -0.5),
    ("outraged", -0.8),
    ("overwhelmed", -0.4),
    ("panic", -0.6),
    ("pessimistic", -0.5),
    ("pity", -0.4),
    ("problem", -0.3),
    ("regret", -0.5),
    ("rejected", -0.6),
    ("resent", -0.6),
    ("ridiculous", -0.5),
    ("rotten", -0.7),
    ("rude", -0.6),
    ("ruined", -0.7),
    ("sadly", -0.5),
    ("sadness", -0.6),
    ("scary", -0.6),
    ("selfish", -0.5),
    ("shame", -0.6),
    ("shameful", -0.7),
    ("shocking", -0.5),
    ("sorrow", -0.7),
    ("sorry", -0.4),
    ("stressed", -0.5),
    ("stressful", -0.5),
    ("struggle", -0.4),
    ("struggling", -0.4),
    ("suck", -0.7),
    ("sucks", -0.7),
    ("suffer", -0.6),
    ("suffering", -0.7),
    ("terrified", -0.8),
    ("terrifying", -0.8),
    ("threat", -0.5),
    ("tragedy", -0.8),
    ("tragic", -0.8),
    ("trouble", -0.4),
    ("ugh", -0.5),
    ("unfair", -0.6),
    ("unfortunate", -0.5),
    ("unpleasant", -0.6),
    ("unwell", -0.5),
    ("upsetting", -0.6),
    ("vile", -0.9),
    ("violent", -0.7),
    ("weak", -0.4),
    ("weary", -0.4),
    ("weird", -0.3),
    ("wicked", -0.6),
    ("worthless", -0.8),
    ("wounded", -0.5),
    ("wretched", -0.8),
];

/// Word-list polarity scorer.
#[derive(Debug, Clone)]
pub struct LexiconSentiment {
    lexicon: HashMap<String, f64>,
    intensifiers: HashMap<String, f64>,
}

impl Default for LexiconSentiment {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconSentiment {
    /// Scorer with the built-in English word list.
    pub fn new() -> Self {
        Self {
            lexicon: LEXICON.iter().map(|(w, s)| (w.to_string(), *s)).collect(),
            intensifiers: INTENSIFIERS.iter().map(|(w, s)| (w.to_string(), *s)).collect(),
        }
    }

    /// Add or override word scores. Scores are clamped to [-1, 1].
    pub fn with_entries<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        for (word, score) in entries {
            self.lexicon.insert(word.into().to_lowercase(), score.clamp(-1.0, 1.0));
        }
        self
    }

    /// Merge word scores from a JSON object onto the built-in list.
    pub fn from_json(bytes: &[u8]) -> InferenceResult<Self> {
        let entries: HashMap<String, f64> = serde_json::from_slice(bytes).map_err(|e| {
            InferenceError::Lexicon(format!("expected a JSON object of word scores: {}", e))
        })?;
        Ok(Self::new().with_entries(entries))
    }

    /// Load a lexicon file and merge it onto the built-in list.
    pub async fn from_path(path: impl AsRef<Path>) -> InferenceResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let scorer = Self::from_json(&bytes)?;
        info!(path = %path.display(), words = scorer.lexicon.len(), "Loaded sentiment lexicon");
        Ok(scorer)
    }

    fn is_negation(token: &str) -> bool {
        NEGATIONS.contains(&token) || token.ends_with("n't")
    }

    fn word_score(&self, tokens: &[String], index: usize, base: f64) -> f64 {
        let mut score = base;

        if index > 0 {
            if let Some(factor) = self.intensifiers.get(&tokens[index - 1]) {
                score = (score * factor).clamp(-1.0, 1.0);
            }
        }

        let window_start = index.saturating_sub(NEGATION_WINDOW);
        if tokens[window_start..index].iter().any(|t| Self::is_negation(t)) {
            score *= NEGATION_FACTOR;
        }

        score
    }
}

impl SentimentScorer for LexiconSentiment {
    fn polarity(&self, text: &str) -> f64 {
        let tokens = tokenize(text);
        let scores: Vec<f64> = tokens
            .iter()
            .enumerate()
            .filter_map(|(i, token)| {
                self.lexicon
                    .get(token)
                    .map(|base| self.word_score(&tokens, i, *base))
            })
            .collect();

        if scores.is_empty() {
            return 0.0;
        }
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        mean.clamp(-1.0, 1.0)
    }
}

/// Lowercase word tokens; apostrophes stay inside words ("don't").
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '\u{2019}'))
        .map(|t| t.trim_matches(|c| c == '\'' || c == '\u{2019}').replace('\u{2019}', "'"))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lens_models::SentimentCategory;

    fn category(text: &str) -> SentimentCategory {
        SentimentCategory::from_polarity(LexiconSentiment::new().polarity(text))
    }

    #[test]
    fn test_no_known_words_is_neutral() {
        let scorer = LexiconSentiment::new();
        assert_eq!(scorer.polarity("The train leaves at noon."), 0.0);
        assert_eq!(scorer.polarity(""), 0.0);
        assert_eq!(category("The train leaves at noon."), SentimentCategory::Neutral);
    }

    #[test]
    fn test_mean_of_known_words() {
        let scorer = LexiconSentiment::new();
        assert!((scorer.polarity("I love this, it is wonderful!") - 0.75).abs() < 1e-9);
        assert_eq!(category("I love this, it is wonderful!"), SentimentCategory::Ecstatic);
    }

    #[test]
    fn test_negation_flips_at_half_strength() {
        let scorer = LexiconSentiment::new();
        assert!((scorer.polarity("This is not good") + 0.35).abs() < 1e-9);
        assert!((scorer.polarity("This isn't good") + 0.35).abs() < 1e-9);
        assert!((scorer.polarity("I don\u{2019}t feel good") + 0.35).abs() < 1e-9);
        assert_eq!(category("This is not good"), SentimentCategory::Sad);
    }

    #[test]
    fn test_intensifier() {
        let scorer = LexiconSentiment::new();
        assert!((scorer.polarity("very good") - 0.91).abs() < 1e-9);
        assert_eq!(scorer.polarity("extremely excellent"), 1.0);
        assert!((scorer.polarity("slightly bad") + 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_categories() {
        assert_eq!(category("What a terrible, awful day"), SentimentCategory::Depressed);
        assert_eq!(category("I feel sad"), SentimentCategory::Sad);
        assert_eq!(category("It's okay"), SentimentCategory::Happy);
        assert_eq!(category("a fun little trip"), SentimentCategory::Content);
    }

    #[test]
    fn test_custom_entries() {
        let scorer = LexiconSentiment::new().with_entries([("Rad", 2.0)]);
        assert_eq!(scorer.polarity("rad"), 1.0);
    }

    #[test]
    fn test_common_words_are_scored() {
        assert!(LexiconSentiment::new().polarity("I am furious about this") < -0.5);
        assert_eq!(category("I am furious about this"), SentimentCategory::Depressed);
        assert_eq!(category("Thanks for the help"), SentimentCategory::Happy);
        assert_eq!(category("I'm so stressed and exhausted"), SentimentCategory::Sad);
    }

    #[test]
    fn test_from_json_merges_onto_builtin() {
        let scorer = LexiconSentiment::from_json(br#"{"Gnarly": 0.6, "good": -0.2}"#).unwrap();
        assert!((scorer.polarity("gnarly") - 0.6).abs() < 1e-9);
        assert!((scorer.polarity("good") + 0.2).abs() < 1e-9);
        assert!(scorer.polarity("wonderful") > 0.9);

        let err = LexiconSentiment::from_json(br#"["good"]"#).unwrap_err();
        assert!(matches!(err, InferenceError::Lexicon(_)));
    }

    #[tokio::test]
    async fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("lexicon.json");
        std::fs::write(&file, r#"{"meh": -0.3}"#).unwrap();

        let scorer = LexiconSentiment::from_path(&file).await.unwrap();
        assert!((scorer.polarity("meh") + 0.3).abs() < 1e-9);

        assert!(LexiconSentiment::from_path(dir.path().join("missing.json")).await.is_err());
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("Don't STOP, 'believing'!"), vec!["don't", "stop", "believing"]);
    }
}
