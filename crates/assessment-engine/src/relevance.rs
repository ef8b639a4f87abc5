//! Keyword relevance retrieval over the knowledge-clip corpus
//!
//! Deliberately a simple containment match, not a scored search: the
//! corpus is small and curated, so corpus order is ranking enough.

use shared_types::{KnowledgeClip, Violation};
use std::collections::HashSet;

/// Violation description words shorter than this carry no signal
const MIN_WORD_LEN: usize = 5;

/// Derive context keywords from an analysis context: the work-type label,
/// violation description words of 5+ characters, and code-section
/// identifiers. Lowercased, deduplicated, order-preserving.
pub fn context_keywords(work_type: &str, violations: &[Violation]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut keywords: Vec<String> = Vec::new();

    let mut push = |raw: &str| {
        let kw = raw.trim().to_lowercase();
        if !kw.is_empty() && seen.insert(kw.clone()) {
            keywords.push(kw);
        }
    };

    push(work_type);
    for v in violations {
        for word in v
            .description
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.len() >= MIN_WORD_LEN)
        {
            push(word);
        }
        push(&v.code_section);
    }

    keywords
}

fn clip_matches(clip: &KnowledgeClip, keywords: &[String]) -> bool {
    let title = clip.title.to_lowercase();
    let content = clip.content.to_lowercase();
    let author = clip.author.to_lowercase();

    keywords.iter().any(|kw| {
        clip.trigger_keywords
            .iter()
            .any(|t| t.eq_ignore_ascii_case(kw))
            || title.contains(kw.as_str())
            || content.contains(kw.as_str())
            || author.contains(kw.as_str())
    })
}

/// Lazily yield the clips matching any context keyword, in corpus order.
/// Pure function of (keywords, corpus): identical inputs produce
/// identical, order-stable output.
pub fn matching_clips<'a>(
    keywords: Vec<String>,
    corpus: &'a [KnowledgeClip],
) -> impl Iterator<Item = &'a KnowledgeClip> + 'a {
    corpus
        .iter()
        .filter(move |clip| clip_matches(clip, &keywords))
}

/// Narrow a corpus to one task type (callers may apply before or after
/// keyword matching)
pub fn for_task_type<'a>(
    corpus: &'a [KnowledgeClip],
    task_type: &'a str,
) -> impl Iterator<Item = &'a KnowledgeClip> + 'a {
    corpus
        .iter()
        .filter(move |clip| clip.task_type.eq_ignore_ascii_case(task_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::Severity;

    fn clip(id: &str, title: &str, triggers: &[&str]) -> KnowledgeClip {
        KnowledgeClip {
            id: id.to_string(),
            title: title.to_string(),
            author: "Ray Delgado".to_string(),
            content: "Always bond the grounding conductor first.".to_string(),
            task_type: "electrical".to_string(),
            trigger_keywords: triggers.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn corpus() -> Vec<KnowledgeClip> {
        vec![
            clip("k1", "GFCI placement in kitchens", &["gfci", "receptacle"]),
            clip("k2", "Panel labeling basics", &["panel", "breaker"]),
            clip("k3", "Deck ledger flashing", &["ledger", "flashing"]),
        ]
    }

    #[test]
    fn test_keywords_from_context() {
        let violations = vec![Violation {
            description: "Missing GFCI near wet area".to_string(),
            code_section: "NEC 210.8".to_string(),
            severity: Severity::Critical,
            fix_instruction: "Install GFCI".to_string(),
        }];
        let keywords = context_keywords("electrical", &violations);
        // "near", "wet", "area" are under the length floor; "GFCI" is 4
        // chars and also dropped; "Missing" survives.
        assert_eq!(
            keywords,
            vec![
                "electrical".to_string(),
                "missing".to_string(),
                "nec 210.8".to_string(),
            ]
        );
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let keywords = vec!["GFCI".to_lowercase()];
        let corpus = corpus();
        let matched: Vec<_> = matching_clips(keywords.clone(), &corpus).collect();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "k1");

        let upper_trigger = vec![clip("k9", "Title", &["RECEPTACLE"])];
        let matched: Vec<_> = matching_clips(keywords.clone(), &upper_trigger).collect();
        assert!(matched.is_empty()); // "gfci" does not match "RECEPTACLE"
        let kw = vec!["receptacle".to_string()];
        let matched: Vec<_> = matching_clips(kw, &upper_trigger).collect();
        assert_eq!(matched.len(), 1);
    }

    #[test]
    fn test_substring_match_on_title_and_content() {
        let corpus = corpus();
        let keywords = vec!["labeling".to_string()];
        let matched: Vec<_> = matching_clips(keywords.clone(), &corpus).collect();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "k2");

        let keywords = vec!["grounding".to_string()];
        let matched: Vec<_> = matching_clips(keywords.clone(), &corpus).collect();
        assert_eq!(matched.len(), 3); // appears in every clip's content
    }

    #[test]
    fn test_output_is_corpus_order_and_stable() {
        let keywords = vec!["gfci".to_string(), "flashing".to_string()];
        let corpus = corpus();
        let first: Vec<&str> = matching_clips(keywords.clone(), &corpus)
            .map(|c| c.id.as_str())
            .collect();
        let second: Vec<&str> = matching_clips(keywords.clone(), &corpus)
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(first, vec!["k1", "k3"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_keywords_matches_nothing() {
        let corpus = corpus();
        let matched: Vec<_> = matching_clips(vec![], &corpus).collect();
        assert!(matched.is_empty());
    }

    #[test]
    fn test_task_type_filter() {
        let mut all = corpus();
        all.push(KnowledgeClip {
            task_type: "carpentry".to_string(),
            ..clip("k4", "Joist hangers", &["joist"])
        });
        let carpentry: Vec<_> = for_task_type(&all, "Carpentry").collect();
        assert_eq!(carpentry.len(), 1);
        assert_eq!(carpentry[0].id, "k4");
    }
}
