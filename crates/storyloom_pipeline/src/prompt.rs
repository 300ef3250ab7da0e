//! Prompt assembly from topic fields.

use storyloom_core::Topic;

/// Build the story prompt from a topic's query, categories, and related
/// terms. Empty fields are omitted; a topic with none of the three yields no
/// prompt at all and is skipped upstream.
pub fn story_prompt(topic: &Topic) -> Option<String> {
    let mut sections = Vec::new();

    let query = topic.record.query.trim();
    if !query.is_empty() {
        sections.push(format!("Trending topic: {}", query));
    }

    let categories: Vec<&str> = topic
        .record
        .categories
        .iter()
        .map(|c| c.name.as_str())
        .filter(|name| !name.is_empty())
        .collect();
    if !categories.is_empty() {
        sections.push(format!("Categories: {}", categories.join(", ")));
    }

    let related: Vec<&str> = topic
        .record
        .trend_breakdown
        .iter()
        .map(String::as_str)
        .filter(|term| !term.is_empty())
        .collect();
    if !related.is_empty() {
        sections.push(format!("Related terms: {}", related.join(", ")));
    }

    if sections.is_empty() {
        None
    } else {
        Some(sections.join("\n"))
    }
}

/// Build the input for the image-prompt derivation call: the narrative text
/// with the query restated, for keyword extraction by the service.
pub fn image_prompt_input(narrative: &str, query: &str) -> String {
    format!("Topic: {}\n\n{}", query, narrative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyloom_core::{TrendCategory, TrendingTopic};

    fn topic(query: &str, categories: &[&str], related: &[&str]) -> Topic {
        Topic {
            id: 1,
            record: TrendingTopic {
                query: query.to_string(),
                categories: categories
                    .iter()
                    .enumerate()
                    .map(|(i, name)| TrendCategory {
                        id: i as i64,
                        name: (*name).to_string(),
                    })
                    .collect(),
                trend_breakdown: related.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            },
            batch_date: "2026-08-07".to_string(),
        }
    }

    #[test]
    fn test_full_prompt_has_all_sections() {
        let prompt = story_prompt(&topic(
            "solar eclipse",
            &["Science"],
            &["eclipse glasses"],
        ))
        .unwrap();
        assert!(prompt.contains("Trending topic: solar eclipse"));
        assert!(prompt.contains("Categories: Science"));
        assert!(prompt.contains("Related terms: eclipse glasses"));
    }

    #[test]
    fn test_empty_sections_omitted() {
        let prompt = story_prompt(&topic("quake", &[], &[])).unwrap();
        assert_eq!(prompt, "Trending topic: quake");
    }

    #[test]
    fn test_all_empty_yields_none() {
        assert!(story_prompt(&topic("", &[], &[])).is_none());
        assert!(story_prompt(&topic("   ", &[], &[])).is_none());
    }

    #[test]
    fn test_image_prompt_input_carries_query() {
        let input = image_prompt_input("A short story.", "red pandas");
        assert!(input.starts_with("Topic: red pandas"));
        assert!(input.ends_with("A short story."));
    }
}
