//! Keyword intent classification
//!
//! Scores normalized input against the knowledge base's ordered groups and
//! returns the single best group with a confidence value. Winner selection
//! is deterministic: groups are evaluated in construction order and a later
//! group only replaces the current best with a strictly greater score, so
//! ties always keep the earlier group.

use rand::Rng;

use snackbot_core::contains_arabic;
use unicode_segmentation::UnicodeSegmentation;

use crate::knowledge::{GroupTier, KnowledgeBase, KnowledgeGroup, ReplyPayload};

/// Result of classifying one input
#[derive(Debug, Clone)]
pub struct Classification<'a> {
    pub group: &'a KnowledgeGroup,
    /// Normalized match score, or the tier's forced confidence
    pub confidence: f32,
}

/// Whether a token reads as laughter ("hhh", "ههه", "hahaha", "lool")
fn is_laughter_token(word: &str) -> bool {
    let len = word.chars().count();
    if len >= 2 && word.chars().all(|c| c == 'h') {
        return true;
    }
    if len >= 2 && word.chars().all(|c| c == 'ه') {
        return true;
    }
    if word.contains("haha") {
        return true;
    }
    // "lol", "lool", "looool"
    if len >= 3 && word.starts_with('l') && word.ends_with('l') {
        let middle: String = word.chars().skip(1).take(len - 2).collect();
        if !middle.is_empty() && middle.chars().all(|c| c == 'o') {
            return true;
        }
    }
    false
}

/// The fuzzy-matching intent classifier
pub struct IntentClassifier {
    kb: KnowledgeBase,
}

impl IntentClassifier {
    pub fn new(kb: KnowledgeBase) -> Self {
        Self { kb }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.kb
    }

    /// Classify normalized input, returning the best group or `None`
    ///
    /// The caller applies its own acceptance threshold; greeting candidacy
    /// (> 0.1) and the event floor (> 0.3) are enforced here.
    pub fn classify(&self, normalized: &str) -> Option<Classification<'_>> {
        let words: Vec<&str> = normalized.unicode_words().collect();
        if words.is_empty() {
            return None;
        }

        let mut best: Option<(usize, f32)> = None;
        for (idx, group) in self.kb.groups.iter().enumerate() {
            let score = self.score_group(group, normalized, &words);
            if score <= group.tier.candidate_floor() {
                continue;
            }
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((idx, score));
            }
        }

        best.map(|(idx, confidence)| {
            let group = &self.kb.groups[idx];
            tracing::debug!(
                group = %group.name,
                confidence,
                "classified input"
            );
            Classification { group, confidence }
        })
    }

    fn score_group(&self, group: &KnowledgeGroup, normalized: &str, words: &[&str]) -> f32 {
        if let Some(forced) = group.tier.forced_confidence() {
            let hit = match group.tier {
                // Whole-utterance phrase equality
                GroupTier::HumanFlow => group.keywords.iter().any(|p| p.as_str() == normalized),
                // Exact word equality
                _ => words
                    .iter()
                    .any(|w| group.keywords.iter().any(|k| k.as_str() == *w)),
            };
            return if hit { forced } else { 0.0 };
        }

        let matched = words
            .iter()
            .filter(|w| self.word_matches(group, w))
            .count();
        matched as f32 / words.len() as f32
    }

    fn word_matches(&self, group: &KnowledgeGroup, word: &str) -> bool {
        if group.laughter && is_laughter_token(word) {
            return true;
        }
        group.keywords.iter().any(|kw| {
            kw.as_str() == word || (word.chars().count() > 4 && kw.contains(word))
        })
    }

    /// Pick the reply for a winning group
    ///
    /// `Variants` draws from the injected RNG; `Bilingual` picks the Arabic
    /// variant only when the raw (pre-normalization) input carries Arabic
    /// characters; `None` (and empty variant lists) leave the reply to the
    /// composer.
    pub fn select_reply<R: Rng>(
        &self,
        classification: &Classification<'_>,
        raw_input: &str,
        rng: &mut R,
    ) -> Option<String> {
        match &classification.group.reply {
            ReplyPayload::Variants(list) if !list.is_empty() => {
                let idx = rng.gen_range(0..list.len());
                Some(list[idx].clone())
            }
            ReplyPayload::Variants(_) => None,
            ReplyPayload::Bilingual { latin, arabic } => {
                if contains_arabic(raw_input) {
                    Some(arabic.clone())
                } else {
                    Some(latin.clone())
                }
            }
            ReplyPayload::None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::ReplyPayload;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn group(name: &str, tier: GroupTier, keywords: &[&str]) -> KnowledgeGroup {
        KnowledgeGroup {
            name: name.to_string(),
            tier,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            reply: ReplyPayload::None,
            laughter: false,
        }
    }

    fn classifier(groups: Vec<KnowledgeGroup>) -> IntentClassifier {
        IntentClassifier::new(KnowledgeBase { groups })
    }

    #[test]
    fn test_tie_keeps_earlier_group() {
        let c = classifier(vec![
            group("first", GroupTier::Category, &["foo"]),
            group("second", GroupTier::Mood, &["foo"]),
        ]);
        let result = c.classify("foo").unwrap();
        assert_eq!(result.group.name, "first");
        assert!((result.confidence - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_strictly_greater_overrides() {
        let c = classifier(vec![
            group("first", GroupTier::Category, &["foo"]),
            group("second", GroupTier::Mood, &["foo", "bar"]),
        ]);
        // "foo bar": first scores 0.5, second scores 1.0
        let result = c.classify("foo bar").unwrap();
        assert_eq!(result.group.name, "second");
    }

    #[test]
    fn test_substring_match_needs_five_chars() {
        let c = classifier(vec![group("g", GroupTier::Faq, &["margherita"])]);
        // 9 chars, substring of the keyword
        assert!(c.classify("margherit").is_some());
        // 4 chars, too short for substring matching
        assert!(c.classify("marg").is_none());
    }

    #[test]
    fn test_empty_input_scores_nothing() {
        let c = classifier(vec![group("g", GroupTier::Faq, &["foo"])]);
        assert!(c.classify("").is_none());
    }

    #[test]
    fn test_greeting_needs_floor() {
        let c = classifier(vec![group("greeting", GroupTier::Greeting, &["salam"])]);
        // 1 of 12 words: score ~0.083, below the 0.1 greeting floor
        let long = "salam a b c d e f g h i j k";
        assert!(c.classify(long).is_none());
        assert!(c.classify("salam khoya").is_some());
    }

    #[test]
    fn test_event_floor() {
        let c = classifier(vec![group("event", GroupTier::Event, &["ramadan"])]);
        // 1 of 4 words: 0.25, below the 0.3 event floor
        assert!(c.classify("ramadan a b c").is_none());
        // 1 of 2 words: 0.5
        assert!(c.classify("ramadan karim").is_some());
    }

    #[test]
    fn test_forced_phrase_confidence() {
        let c = classifier(vec![group(
            "human_check",
            GroupTier::HumanFlow,
            &["wach nta robot"],
        )]);
        let result = c.classify("wach nta robot").unwrap();
        assert!((result.confidence - 0.95).abs() < f32::EPSILON);
        // Partial phrase is not an exact match
        assert!(c.classify("wach nta").is_none());
    }

    #[test]
    fn test_forced_word_confidence() {
        let c = classifier(vec![group(
            "personality",
            GroupTier::Personality,
            &["hmar"],
        )]);
        let result = c.classify("nta hmar bezaf").unwrap();
        assert!((result.confidence - 0.96).abs() < f32::EPSILON);
    }

    #[test]
    fn test_laughter_fuzzy_match() {
        let mut g = group("laugh", GroupTier::Emotional, &["funny"]);
        g.laughter = true;
        let c = classifier(vec![g]);
        assert!(c.classify("hhhhh").is_some());
        assert!(c.classify("hahahaha").is_some());
        assert!(c.classify("loool").is_some());
        assert!(c.classify("ههههه").is_some());
    }

    #[test]
    fn test_laughter_only_for_flagged_groups() {
        let c = classifier(vec![group("plain", GroupTier::Faq, &["funny"])]);
        assert!(c.classify("hhhhh").is_none());
    }

    #[test]
    fn test_variant_reply_is_seed_deterministic() {
        let g = KnowledgeGroup {
            name: "v".to_string(),
            tier: GroupTier::Greeting,
            keywords: vec!["salam".to_string()],
            reply: ReplyPayload::Variants(vec![
                "one".to_string(),
                "two".to_string(),
                "three".to_string(),
            ]),
            laughter: false,
        };
        let c = classifier(vec![g]);
        let result = c.classify("salam").unwrap();

        let mut rng_a = StdRng::seed_from_u64(7);
        let mut rng_b = StdRng::seed_from_u64(7);
        let a = c.select_reply(&result, "salam", &mut rng_a);
        let b = c.select_reply(&result, "salam", &mut rng_b);
        assert_eq!(a, b);
        assert!(a.is_some());
    }

    #[test]
    fn test_bilingual_reply_follows_input_script() {
        let g = KnowledgeGroup {
            name: "b".to_string(),
            tier: GroupTier::Faq,
            keywords: vec!["halal".to_string(), "حلال".to_string()],
            reply: ReplyPayload::Bilingual {
                latin: "latin reply".to_string(),
                arabic: "جواب عربي".to_string(),
            },
            laughter: false,
        };
        let c = classifier(vec![g]);
        let mut rng = StdRng::seed_from_u64(0);

        let result = c.classify("halal").unwrap();
        assert_eq!(
            c.select_reply(&result, "halal?", &mut rng),
            Some("latin reply".to_string())
        );

        let result = c.classify("حلال").unwrap();
        assert_eq!(
            c.select_reply(&result, "واش حلال؟", &mut rng),
            Some("جواب عربي".to_string())
        );
    }
}
