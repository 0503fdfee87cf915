// tests/pipeline.rs - end-to-end runs over synthetic corpora, no network
use awards_lib::config::CeremonyConfig;
use awards_lib::ingest::{load_corpus, parse_reference_page, MessageCorpus};
use awards_lib::matching::entities::TaggingError;
use awards_lib::matching::{
    build_award_features, classify_messages, AwardRouter, EntityExtractor, PersonTagger,
    RoleClassifier,
};
use awards_lib::models::core::{Ceremony, Role};
use awards_lib::synthesis::build_results;
use awards_lib::text::consolidate_freqs;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const TITLES: [&str; 3] = [
    "Best Actor – Motion Picture",
    "Best Director",
    "Best Television Series – Drama",
];

/// Tags exactly the names it was given and counts how often it is asked.
struct StubTagger {
    names: Vec<&'static str>,
    calls: Arc<AtomicUsize>,
}

impl StubTagger {
    fn extractor(names: Vec<&'static str>) -> (EntityExtractor, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let tagger = StubTagger {
            names,
            calls: calls.clone(),
        };
        (EntityExtractor::new(Box::new(tagger)), calls)
    }
}

impl PersonTagger for StubTagger {
    fn person_spans(&self, text: &str) -> Result<Vec<Vec<String>>, TaggingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .names
            .iter()
            .filter(|name| text.contains(*name))
            .map(|name| name.split(' ').map(str::to_string).collect())
            .collect())
    }
}

struct BrokenTagger;

impl PersonTagger for BrokenTagger {
    fn person_spans(&self, _text: &str) -> Result<Vec<Vec<String>>, TaggingError> {
        Err(TaggingError::Failed("tagger crashed".to_string()))
    }
}

fn ceremony(titles: &[&str]) -> Ceremony {
    let mut ceremony = Ceremony::new(CeremonyConfig::default());
    ceremony.populate(titles.iter().copied(), Vec::new());
    build_award_features(&ceremony);
    ceremony
}

fn corpus(messages: &[&str]) -> MessageCorpus {
    MessageCorpus::from_messages(messages.iter().map(|s| s.to_string()))
}

#[test]
fn test_winner_message_is_classified_and_tagged() {
    let ceremony = ceremony(&TITLES);
    let message = "Gary Oldman wins Best Actor!! #goldenglobes";

    let roles = RoleClassifier::new(&ceremony.config).unwrap();
    let flags = roles.classify(message);
    assert!(flags.winner);
    assert!(!flags.nominee);
    assert!(!flags.presenter);

    let (extractor, _) = StubTagger::extractor(vec!["Gary Oldman"]);
    assert_eq!(extractor.extract_people(message).names(), ["Gary Oldman"]);

    // the gate is all-or-nothing: without "Motion" and "Picture" the message
    // is routed nowhere
    for award in &ceremony.awards {
        let router = AwardRouter::new(award, &ceremony.config).unwrap();
        assert!(!router.matches(message), "{} should not match", award.title);
    }
}

#[test]
fn test_winner_routed_to_matching_award_only() {
    let mut ceremony = ceremony(&TITLES);
    let (extractor, _) = StubTagger::extractor(vec!["Gary Oldman"]);
    let messages = corpus(&["Gary Oldman wins Best Actor in a Motion Picture!! #goldenglobes"]);

    let stats = classify_messages(&mut ceremony, &messages, &extractor, None).unwrap();
    assert_eq!(stats.matched_messages, 1);
    assert_eq!(stats.discarded_messages, 0);

    let actor = &ceremony.awards[0];
    assert_eq!(actor.winners.count("Gary Oldman"), 1);
    assert!(actor.nominees.is_empty());
    assert!(actor.presenters.is_empty());
    for other in &ceremony.awards[1..] {
        for role in Role::ALL {
            assert!(other.table(role).is_empty());
        }
    }

    let results = build_results(&ceremony).unwrap();
    assert_eq!(results[0].winner.as_deref(), Some("Gary Oldman"));
    assert!(!results[1].has_winner());
    assert!(!results[2].has_winner());
}

#[test]
fn test_message_without_role_keywords_is_discarded_before_extraction() {
    let mut ceremony = ceremony(&TITLES);
    let (extractor, calls) = StubTagger::extractor(vec!["Gary Oldman"]);
    let messages = corpus(&[
        "So excited for the Golden Globes tonight!",
        "So excited for Best Actor in a Motion Picture at the Golden Globes tonight!",
    ]);

    let stats = classify_messages(&mut ceremony, &messages, &extractor, None).unwrap();
    assert_eq!(stats.matched_messages, 1);
    assert_eq!(stats.discarded_messages, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    for award in &ceremony.awards {
        for role in Role::ALL {
            assert!(award.table(role).is_empty());
        }
    }
}

#[test]
fn test_duplicate_messages_count_once() {
    let mut ceremony = ceremony(&TITLES);
    let (extractor, calls) = StubTagger::extractor(vec!["Gary Oldman"]);
    let message = "Gary Oldman wins Best Actor in a Motion Picture";
    let messages = corpus(&[message, message, message]);

    classify_messages(&mut ceremony, &messages, &extractor, None).unwrap();
    assert_eq!(ceremony.awards[0].winners.count("Gary Oldman"), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_tagger_failure_degrades_to_no_signal() {
    let mut ceremony = ceremony(&TITLES);
    let extractor = EntityExtractor::new(Box::new(BrokenTagger));
    let messages = corpus(&[
        "Gary Oldman wins Best Actor in a Motion Picture",
        "Guillermo del Toro wins Best Director",
    ]);

    let stats = classify_messages(&mut ceremony, &messages, &extractor, None).unwrap();
    assert_eq!(stats.extraction_failures, 2);

    let results = build_results(&ceremony).unwrap();
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| !r.has_winner()));
}

#[test]
fn test_consolidate_folds_variant_into_anchor() {
    let freqs = vec![
        ("Meryl Streep".to_string(), 5),
        ("Meryl Streep wins".to_string(), 2),
        ("La La Land".to_string(), 3),
    ];
    assert_eq!(
        consolidate_freqs(&freqs, 1),
        vec![("Meryl Streep".to_string(), 7), ("La La Land".to_string(), 3)]
    );
}

const REFERENCE_PAGE: &str = r#"
<table class="infobox vevent">
  <tr><th>Hosted by</th><td><a href="/wiki/Seth_Meyers">Seth Meyers</a></td></tr>
</table>
<div class="navbox" aria-labelledby="Golden_Globe_Awards"><table><tr><td><ul>
  <li><a title="Golden Globe Award for Best Actor – Motion Picture Drama">Actor</a></li>
  <li><a title="Golden Globe Award for Best Director">Director</a></li>
  <li><a title="Golden Globe Award for Best Television Series – Drama">Series</a></li>
  <li><a title="Golden Globe Award for Best Documentary">Documentary</a></li>
  <li><a title="Golden Globe Award for New Star of the Year">New Star</a></li>
  <li><a title="Golden Globe Award for Best English-Language Foreign Film">Foreign</a></li>
</ul></td></tr></table></div>
"#;

#[tokio::test]
async fn test_offline_run_from_saved_page_and_corpus_file() {
    let mut ceremony = Ceremony::new(CeremonyConfig::default());
    let page = parse_reference_page(REFERENCE_PAGE, "fixture", &ceremony.config).unwrap();
    ceremony.populate(page.awards, page.hosts);
    assert_eq!(ceremony.awards.len(), 4);
    assert_eq!(ceremony.hosts, vec!["Seth Meyers"]);
    assert_eq!(ceremony.to_string(), "The 75th Golden Globe Awards held during 2018");

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"{{"text": "Gary Oldman wins Best Actor in a Motion Picture Drama", "id": 1}}"#
    )
    .unwrap();
    writeln!(file, r#"{{"text": "Oprah Winfrey wins the Cecil B. DeMille Award", "id": 2}}"#).unwrap();
    writeln!(file, r#"{{"text": "Oprah Winfrey wins the Cecil B. DeMille Award", "id": 3}}"#).unwrap();
    writeln!(file, r#"{{"text": "So excited for the Golden Globes tonight!", "id": 4}}"#).unwrap();

    let messages = load_corpus(file.path()).await.unwrap();
    assert_eq!(messages.len(), 4);
    let corpus = MessageCorpus::from_messages(messages);
    assert_eq!(corpus.len(), 3);

    build_award_features(&ceremony);
    let (extractor, _) = StubTagger::extractor(vec!["Gary Oldman", "Oprah Winfrey"]);
    classify_messages(&mut ceremony, &corpus, &extractor, None).unwrap();

    let results = build_results(&ceremony).unwrap();
    let winner_of = |title: &str| {
        results
            .iter()
            .find(|r| r.award == title)
            .and_then(|r| r.winner.clone())
    };
    assert_eq!(
        winner_of("Golden Globe Award for Best Actor – Motion Picture Drama").as_deref(),
        Some("Gary Oldman")
    );
    assert_eq!(winner_of("Cecil B. DeMille Award").as_deref(), Some("Oprah Winfrey"));
    assert_eq!(winner_of("Golden Globe Award for Best Director"), None);
}
