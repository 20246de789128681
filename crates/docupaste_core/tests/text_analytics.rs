use docupaste_core::analytics::histogram::{MIN_FREQUENCY_WORD_LEN, TOP_WORDS_LIMIT};
use docupaste_core::{
    analyze, paragraph_distribution, word_frequency, DocumentAnalytics, DocumentStats,
    ParagraphBucket,
};

#[test]
fn empty_content_yields_zero_stats_and_empty_views() {
    assert_eq!(analyze(""), DocumentStats::default());
    assert!(word_frequency("").is_empty());
    assert!(paragraph_distribution("").iter().all(|b| b.count == 0));
}

#[test]
fn hello_world_stats() {
    let stats = analyze("Hello world.");
    assert_eq!(stats.word_count, 2);
    assert_eq!(stats.char_count, 12);
    assert_eq!(stats.sentence_count, 1);
    assert_eq!(stats.paragraph_count, 1);
    assert_eq!(stats.reading_time_minutes, 1);
}

#[test]
fn four_hundred_fifty_words_read_in_two_minutes() {
    let content = vec!["a"; 450].join(" ");
    let stats = analyze(&content);
    assert_eq!(stats.word_count, 450);
    assert_eq!(stats.reading_time_minutes, 2);
}

#[test]
fn multi_paragraph_document() {
    let content = "  Title line\n\nFirst paragraph. Two sentences!\r\n\n\nSecond one? Yes...  ";
    let stats = analyze(content);
    assert_eq!(stats.word_count, 9);
    assert_eq!(stats.paragraph_count, 3);
    assert_eq!(stats.sentence_count, 4);
    assert_eq!(stats.char_count, content.chars().count());
}

#[test]
fn word_frequency_is_capped_and_skips_short_tokens() {
    let mut content = String::new();
    for (idx, word) in [
        "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "india",
        "juliet", "kilo", "lima",
    ]
    .iter()
    .enumerate()
    {
        for _ in 0..=idx {
            content.push_str(word);
            content.push(' ');
        }
    }
    content.push_str("the and for a an is");

    let top = word_frequency(&content);
    assert_eq!(top.len(), TOP_WORDS_LIMIT);
    assert!(top.iter().all(|w| w.word.len() >= MIN_FREQUENCY_WORD_LEN));
    assert_eq!(top[0].word, "lima");
    assert_eq!(top[0].count, 12);
    assert!(top.windows(2).all(|pair| pair[0].count >= pair[1].count));
}

#[test]
fn paragraph_distribution_sums_to_paragraph_count() {
    let content = [
        "short".to_string(),
        "m".repeat(75),
        "m".repeat(150),
        "l".repeat(250),
        "v".repeat(500),
        "tiny".to_string(),
    ]
    .join("\n\n");

    let buckets = paragraph_distribution(&content);
    let counts: Vec<_> = buckets.iter().map(|b| (b.bucket, b.count)).collect();
    assert_eq!(
        counts,
        vec![
            (ParagraphBucket::VeryShort, 2),
            (ParagraphBucket::Short, 1),
            (ParagraphBucket::Medium, 1),
            (ParagraphBucket::Long, 1),
            (ParagraphBucket::VeryLong, 1),
        ]
    );
    let total: usize = buckets.iter().map(|b| b.count).sum();
    assert_eq!(total, analyze(&content).paragraph_count);
}

#[test]
fn analytics_bundle_serializes_for_the_view() {
    let bundle = DocumentAnalytics::compute("Rust rust RUST. Cargo builds crates.");
    assert_eq!(bundle.stats.sentence_count, 2);
    assert_eq!(bundle.word_frequency[0].word, "rust");
    assert_eq!(bundle.word_frequency[0].count, 3);

    let json = serde_json::to_value(&bundle).unwrap();
    assert_eq!(json["stats"]["wordCount"], 6);
    assert_eq!(json["paragraphDistribution"][0]["bucket"], "very_short");
    assert_eq!(ParagraphBucket::VeryShort.label(), "Very Short (< 50)");
}
