// src/matching/router.rs - routes messages to awards and records role candidates
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use log::debug;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;

use crate::config::{CeremonyConfig, ProvenancePolicy};
use crate::ingest::corpus::MessageCorpus;
use crate::matching::entities::{mixed_case_names, presented_by, work_candidates, EntityExtractor};
use crate::matching::features::{effective_features, FeatureGate};
use crate::models::core::{Award, Ceremony, Role};
use crate::text::NoiseFilter;
use crate::utils::logging::{PipelineLogger, Stage};

/// Which role claims a single message makes. Flags are independent; one
/// message may count toward several roles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleFlags {
    pub winner: bool,
    pub nominee: bool,
    pub presenter: bool,
}

impl RoleFlags {
    pub fn any(&self) -> bool {
        self.winner || self.nominee || self.presenter
    }

    pub fn is_set(&self, role: Role) -> bool {
        match role {
            Role::Winner => self.winner,
            Role::Nominee => self.nominee,
            Role::Presenter => self.presenter,
        }
    }
}

/// Drops repeats, keeping first occurrences in order. A message credits each
/// candidate at most once per role.
fn unique_in_order<I: IntoIterator<Item = String>>(items: I) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

fn keyword_regex(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Keyword tests for the three roles plus the provenance policy.
#[derive(Debug, Clone)]
pub struct RoleClassifier {
    winner: Regex,
    nominee: Regex,
    presenter: Regex,
    marker: String,
    policy: ProvenancePolicy,
}

impl RoleClassifier {
    pub fn new(config: &CeremonyConfig) -> Result<Self> {
        let keywords = &config.keywords;
        Ok(Self {
            winner: keyword_regex(&keywords.winner).context("invalid winner keyword pattern")?,
            nominee: keyword_regex(&keywords.nominee).context("invalid nominee keyword pattern")?,
            presenter: keyword_regex(&keywords.presenter)
                .context("invalid presenter keyword pattern")?,
            marker: config.provenance.marker.to_lowercase(),
            policy: config.provenance.clone(),
        })
    }

    pub fn classify(&self, message: &str) -> RoleFlags {
        let has_marker =
            !self.marker.is_empty() && message.to_lowercase().contains(&self.marker);
        let allowed = |requires_provenance: bool| !requires_provenance || has_marker;

        RoleFlags {
            winner: self.winner.is_match(message) && allowed(self.policy.winner.requires_provenance),
            nominee: self.nominee.is_match(message)
                && allowed(self.policy.nominee.requires_provenance),
            presenter: self.presenter.is_match(message)
                && allowed(self.policy.presenter.requires_provenance),
        }
    }
}

/// Candidates a single routed message contributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageCandidates {
    pub roles: RoleFlags,
    /// Names or titles credited to winner and nominee tables.
    pub candidates: Vec<String>,
    /// Names credited to the presenter table.
    pub presenters: Vec<String>,
    pub tagger_failed: bool,
}

/// Per-award matcher: the required feature gate plus the person/work branch.
#[derive(Debug, Clone)]
pub struct AwardRouter {
    title: String,
    gate: FeatureGate,
    person_award: bool,
}

impl AwardRouter {
    pub fn new(award: &Award, config: &CeremonyConfig) -> Result<Self> {
        let effective = effective_features(&award.title, award.features(), &config.keywords);
        let gate = FeatureGate::new(&effective, config.required_features)
            .with_context(|| format!("invalid feature pattern for award '{}'", award.title))?;
        let person_award = keyword_regex(&config.keywords.person)
            .context("invalid person keyword pattern")?
            .is_match(&award.title);

        Ok(Self {
            title: award.title.clone(),
            gate,
            person_award,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn required_features(&self) -> &[String] {
        self.gate.features()
    }

    pub fn is_person_award(&self) -> bool {
        self.person_award
    }

    pub fn matches(&self, message: &str) -> bool {
        self.gate.matches(message)
    }

    /// Role flags and candidates for a message that already passed the gate.
    /// Returns None when no role keyword fires; extraction is skipped then.
    pub fn extract(
        &self,
        message: &str,
        roles: &RoleClassifier,
        extractor: &EntityExtractor,
        person_noise: &NoiseFilter,
    ) -> Option<MessageCandidates> {
        let flags = roles.classify(message);
        if !flags.any() {
            return None;
        }

        let extraction = extractor.extract_people(message);
        let tagger_failed = extraction.is_failure();
        let mut people = extraction.into_names();
        for name in mixed_case_names(message) {
            if !people.contains(&name) {
                people.push(name);
            }
        }

        let candidates = if self.person_award {
            unique_in_order(people.iter().filter(|p| !person_noise.is_noise(p)).cloned())
        } else {
            unique_in_order(work_candidates(message))
        };

        let presenters = if flags.presenter {
            unique_in_order(people.iter().cloned().chain(presented_by(message)))
        } else {
            Vec::new()
        };

        Some(MessageCandidates {
            roles: flags,
            candidates,
            presenters,
            tagger_failed,
        })
    }
}

impl MessageCandidates {
    /// Adds one count per candidate to each flagged role table.
    pub fn record(&self, award: &mut Award) {
        for role in [Role::Winner, Role::Nominee] {
            if !self.roles.is_set(role) {
                continue;
            }
            let table = award.table_mut(role);
            for candidate in &self.candidates {
                table.increment(candidate);
            }
        }
        let presenters = award.table_mut(Role::Presenter);
        for presenter in &self.presenters {
            presenters.increment(presenter);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationStats {
    pub awards_processed: usize,
    /// Message/award pairs that passed the feature gate.
    pub matched_messages: usize,
    /// Gate matches dropped for lack of any role keyword.
    pub discarded_messages: usize,
    pub extraction_failures: usize,
}

/// One sequential pass per award over the whole working corpus, filling every
/// award's winner, nominee and presenter tables.
///
/// Awards without features match nothing. Per-message problems never abort
/// the pass; tagger failures are only counted.
pub fn classify_messages(
    ceremony: &mut Ceremony,
    corpus: &MessageCorpus,
    extractor: &EntityExtractor,
    progress: Option<&ProgressBar>,
) -> Result<ClassificationStats> {
    let logger = PipelineLogger::new(Stage::Classify);
    logger.log_start(&format!(
        "{} awards over {} messages",
        ceremony.awards.len(),
        corpus.len()
    ));

    let config = &ceremony.config;
    let roles = RoleClassifier::new(config)?;
    let person_noise =
        NoiseFilter::new(&config.person_noise).context("invalid person noise word list")?;
    let routers = ceremony
        .awards
        .iter()
        .map(|award| AwardRouter::new(award, config))
        .collect::<Result<Vec<_>>>()?;

    logger.log_phase(
        "Routers built",
        Some(&format!(
            "{} awards, {} without features",
            routers.len(),
            ceremony.awards.iter().filter(|a| !a.has_features()).count()
        )),
    );

    let mut stats = ClassificationStats::default();

    for (award, router) in ceremony.awards.iter_mut().zip(routers.iter()) {
        if let Some(pb) = progress {
            pb.set_message(router.title().to_string());
        }

        let mut matched = 0;
        let mut discarded = 0;
        for message in corpus.iter() {
            if !router.matches(message) {
                continue;
            }
            matched += 1;
            match router.extract(message, &roles, extractor, &person_noise) {
                Some(found) => {
                    if found.tagger_failed {
                        stats.extraction_failures += 1;
                    }
                    debug!(
                        "{} <- {:?} {:?} from '{}'",
                        router.title(),
                        found.roles,
                        found.candidates,
                        message
                    );
                    found.record(award);
                }
                None => discarded += 1,
            }
        }

        logger.log_award_routing(router.title(), matched, discarded, router.required_features());
        stats.awards_processed += 1;
        stats.matched_messages += matched;
        stats.discarded_messages += discarded;

        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    logger.log_extraction_failures(stats.extraction_failures);
    logger.log_completion(&format!(
        "{} gate matches, {} discarded",
        stats.matched_messages, stats.discarded_messages
    ));
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::entities::{PersonTagger, TaggingError};
    use crate::matching::features::build_award_features;

    struct FailingTagger;

    impl PersonTagger for FailingTagger {
        fn person_spans(&self, _text: &str) -> Result<Vec<Vec<String>>, TaggingError> {
            Err(TaggingError::Failed("offline".to_string()))
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
    fn test_role_flags_are_independent() {
        let roles = RoleClassifier::new(&CeremonyConfig::default()).unwrap();

        let flags = roles.classify("Gary Oldman wins Best Actor!! #goldenglobes");
        assert!(flags.winner);
        assert!(!flags.nominee);
        assert!(!flags.presenter);

        let flags = roles.classify("Can't believe she won, should not have");
        assert!(flags.winner);
        assert!(flags.nominee);

        assert!(!roles.classify("So excited for the Golden Globes tonight!").any());
    }

    #[test]
    fn test_presenter_requires_marker_by_default() {
        let config = CeremonyConfig::default();
        let roles = RoleClassifier::new(&config).unwrap();
        assert!(!roles.classify("Emma Stone presents Best Director").presenter);
        assert!(roles.classify("Emma Stone presents Best Director via @AWARDS_WATCH").presenter);

        let mut relaxed = config.clone();
        relaxed.provenance.presenter.requires_provenance = false;
        let roles = RoleClassifier::new(&relaxed).unwrap();
        assert!(roles.classify("Emma Stone presents Best Director").presenter);
    }

    #[test]
    fn test_policy_can_require_marker_for_winners() {
        let mut config = CeremonyConfig::default();
        config.provenance.winner.requires_provenance = true;
        let roles = RoleClassifier::new(&config).unwrap();
        assert!(!roles.classify("Gary Oldman wins").winner);
        assert!(roles.classify("Gary Oldman wins awards_watch").winner);
    }

    #[test]
    fn test_router_gate_and_branch() {
        let ceremony = ceremony(&[
            "Best Actor – Motion Picture",
            "Best Director",
            "Best Television Series – Drama",
        ]);
        let actor = AwardRouter::new(&ceremony.awards[0], &ceremony.config).unwrap();
        assert!(actor.is_person_award());
        assert_eq!(actor.required_features(), ["actor", "motion", "picture"]);
        assert!(actor.matches("Gary Oldman wins Best Actor in a Motion Picture"));
        assert!(!actor.matches("Gary Oldman wins Best Actor!! #goldenglobes"));

        let series = AwardRouter::new(&ceremony.awards[2], &ceremony.config).unwrap();
        assert!(!series.is_person_award());
        assert_eq!(series.required_features()[0], "(tele|tv)");
        assert!(series.matches("The Handmaid's Tale wins best TV series drama"));
    }

    #[test]
    fn test_extract_skips_messages_without_roles() {
        let ceremony = ceremony(&["Best Actor – Motion Picture", "Best Director"]);
        let router = AwardRouter::new(&ceremony.awards[0], &ceremony.config).unwrap();
        let roles = RoleClassifier::new(&ceremony.config).unwrap();
        let noise = NoiseFilter::new(&ceremony.config.person_noise).unwrap();
        let extractor = EntityExtractor::default();

        assert!(router
            .extract("Best Actor Motion Picture is up next", &roles, &extractor, &noise)
            .is_none());

        let found = router
            .extract("Gary Oldman wins Best Actor!! #goldenglobes", &roles, &extractor, &noise)
            .unwrap();
        assert!(found.roles.winner);
        assert!(found.candidates.contains(&"Gary Oldman".to_string()));
        assert!(found.presenters.is_empty());
    }

    #[test]
    fn test_tagger_failure_is_counted_not_fatal() {
        let mut ceremony = ceremony(&["Best Actor – Motion Picture", "Best Director"]);
        let extractor = EntityExtractor::new(Box::new(FailingTagger));
        let messages = corpus(&[
            "Gary Oldman wins Best Actor Motion Picture",
            "Sam Rockwell should have won Best Actor Motion Picture",
        ]);

        let stats = classify_messages(&mut ceremony, &messages, &extractor, None).unwrap();
        assert_eq!(stats.awards_processed, 2);
        assert_eq!(stats.matched_messages, 2);
        assert_eq!(stats.extraction_failures, 2);
        assert!(ceremony.awards[0].winners.is_empty());
    }

    #[test]
    fn test_work_award_collects_titles_and_presenters() {
        let mut ceremony = ceremony(&[
            "Best Motion Picture – Drama",
            "Best Motion Picture – Musical or Comedy",
            "Best Director",
        ]);
        let extractor = EntityExtractor::default();
        let messages = corpus(&[
            "Three Billboards wins Best Motion Picture Drama",
            "Best Motion Picture Drama presented by Emma Stone via awards_watch",
        ]);

        classify_messages(&mut ceremony, &messages, &extractor, None).unwrap();
        let drama = &ceremony.awards[0];
        assert_eq!(drama.winners.count("Three Billboards"), 1);
        assert_eq!(drama.presenters.count("Emma Stone"), 1);
    }

    #[test]
    fn test_repeated_title_in_one_message_counts_once() {
        let mut ceremony = ceremony(&[
            "Best Motion Picture – Drama",
            "Best Motion Picture – Musical or Comedy",
            "Best Director",
        ]);
        let extractor = EntityExtractor::default();
        let messages = corpus(&[
            "Lady Bird wins Best Motion Picture Drama, so happy for Lady Bird #LadyBird",
        ]);

        classify_messages(&mut ceremony, &messages, &extractor, None).unwrap();
        let drama = &ceremony.awards[0];
        assert_eq!(drama.winners.count("Lady Bird"), 1);
        assert!(drama.winners.ranked().iter().all(|(_, count)| *count == 1));
    }

    #[test]
    fn test_presented_by_name_counts_once() {
        let ceremony = ceremony(&[
            "Best Motion Picture – Drama",
            "Best Motion Picture – Musical or Comedy",
            "Best Director",
        ]);
        let router = AwardRouter::new(&ceremony.awards[0], &ceremony.config).unwrap();
        let roles = RoleClassifier::new(&ceremony.config).unwrap();
        let noise = NoiseFilter::new(&ceremony.config.person_noise).unwrap();
        let extractor = EntityExtractor::default();

        let found = router
            .extract(
                "Best Motion Picture Drama presented by Emma Stone via awards_watch",
                &roles,
                &extractor,
                &noise,
            )
            .unwrap();
        assert!(found.roles.presenter);
        assert_eq!(
            found.presenters.iter().filter(|p| p.as_str() == "Emma Stone").count(),
            1
        );
    }

    #[test]
    fn test_unique_in_order_keeps_first_occurrence() {
        let items = ["Lady Bird", "Get Out", "Lady Bird", "Dunkirk", "Get Out"]
            .iter()
            .map(|s| s.to_string());
        assert_eq!(unique_in_order(items), vec!["Lady Bird", "Get Out", "Dunkirk"]);
    }
}
