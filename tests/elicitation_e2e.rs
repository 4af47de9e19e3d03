//! End-to-end elicitation scenarios

use chrono::{Duration, Utc};
use pref_elicit::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn alt(name: &str, performance: Vec<f64>) -> Alternative {
    Alternative::new(name, performance)
}

fn pc(a: &str, b: &str, id: u64, iteration: usize) -> PreferenceInformationWrapper {
    let statement = PreferenceStatement::preference(alt(a, vec![0.2, 0.8]), alt(b, vec![0.8, 0.2]));
    PreferenceInformationWrapper::untimed(statement, id, iteration)
}

fn population() -> AlternativeSet {
    AlternativeSet::from_alternatives(vec![
        alt("A1", vec![0.05, 0.95]),
        alt("A2", vec![0.30, 0.60]),
        alt("A3", vec![0.30, 0.60]),
        alt("A4", vec![0.55, 0.35]),
        alt("A5", vec![0.90, 0.10]),
        alt("A6", vec![0.95, 0.95]),
    ])
    .unwrap()
}

fn consecutive_pairs(
    _context: &DMContext,
    alternatives: &AlternativeSet,
) -> ElicitResult<ReferenceSetsResult> {
    let sets: ReferenceSets = alternatives
        .as_slice()
        .windows(2)
        .map(|pair| ReferenceSet::new(pair.to_vec()))
        .collect();
    Ok(ReferenceSetsResult::common(sets))
}

#[test]
fn history_register_then_prune() {
    let mut history = History::new("H");

    history
        .register_preference_information(vec![pc("A1", "A2", 0, 0), pc("A3", "A4", 1, 1)])
        .unwrap();
    assert_eq!(history.len(), 2);

    let stranger = pc("A5", "A6", 7, 1);
    let err = history
        .update_history_with_a_subset(vec![stranger.clone()], 2, None)
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Membership(_)));
    assert_eq!(err.context.subject, Some(stranger.to_string()));
    assert_eq!(history.len(), 2);

    let now = Utc::now();
    let report = history
        .update_history_with_a_subset(vec![pc("A1", "A2", 0, 0)], 2, Some(now))
        .unwrap();
    assert_eq!(report.count_before, 2);
    assert_eq!(report.count_after, 1);
    assert_eq!(report.removed, vec![pc("A3", "A4", 1, 1)]);
    assert_eq!(report.timestamp, Some(now));
    assert_eq!(history.wrappers()[0].id(), 0);
}

#[test]
fn duplicate_batch_is_rejected_by_name() {
    let mut history = History::new("H");
    let err = history
        .register_preference_information(vec![pc("A1", "A2", 0, 0), pc("A1", "A2", 0, 0)])
        .unwrap_err();

    assert!(matches!(err.kind, ErrorKind::Duplicate(_)));
    assert!(err.to_string().contains("PC(A1 > A2)"));
    assert!(history.is_empty());
}

#[test]
fn artificial_dm_feedback_is_consistent_with_hidden_model() {
    init_tracing();
    let hidden = LNorm::chebyshev(Some(vec![0.6, 0.4]));
    let provider = FeedbackProvider::common(ArtificialValueDM::new(hidden.clone())).unwrap();
    let mut cycle = ElicitationCycle::new(
        Refiner::default(),
        provider,
        vec![DecisionMakingSystem::new("dm1")],
    )
    .unwrap();

    let ctx = cycle
        .context_builder(5)
        .timestamp(Utc::now())
        .criteria(Criteria::all_cost(2))
        .alternatives(population())
        .build();
    let report = cycle.run(&ctx, &consecutive_pairs).unwrap();

    // A3 duplicates A2 and A6 is dominated
    let refined = report.refiner.refined_alternatives.as_ref().unwrap();
    assert_eq!(refined.names(), vec!["A1", "A2", "A4", "A5"]);
    assert_eq!(report.total_registered(), 3);

    let system = cycle.system(&"dm1".into()).unwrap();
    for wrapper in system.history().iter() {
        let statement = wrapper.statement();
        let first = hidden.evaluate(statement.first()).unwrap();
        let second = hidden.evaluate(statement.second()).unwrap();
        assert!(first <= second, "{} contradicts the hidden model", statement);
        assert_eq!(wrapper.iteration(), 5);
    }

    // the hidden weights violate none of the recorded judgments
    let cone = system.preference_cone();
    assert_eq!(cone.count_violations(&[0.6, 0.4]).unwrap(), 0);
}

#[test]
fn elicitation_resumes_after_json_restore() {
    init_tracing();
    let hidden = LNorm::chebyshev(Some(vec![0.6, 0.4]));
    let mut cycle = ElicitationCycle::new(
        Refiner::default(),
        FeedbackProvider::common(ArtificialValueDM::new(hidden.clone())).unwrap(),
        vec![DecisionMakingSystem::new("dm1")],
    )
    .unwrap();
    let ctx = cycle
        .context_builder(1)
        .criteria(Criteria::all_cost(2))
        .alternatives(population())
        .build();
    cycle.run(&ctx, &consecutive_pairs).unwrap();

    let json = cycle.system(&"dm1".into()).unwrap().history().to_json().unwrap();
    let restored = History::from_json(&json).unwrap();
    let next = restored.peek_next_id();
    assert_eq!(next, 3);

    let mut resumed = ElicitationCycle::new(
        Refiner::default(),
        FeedbackProvider::common(ArtificialValueDM::new(hidden)).unwrap(),
        vec![DecisionMakingSystem::with_history("dm1", restored)],
    )
    .unwrap();
    let ctx = resumed
        .context_builder(2)
        .criteria(Criteria::all_cost(2))
        .alternatives(population())
        .build();
    let report = resumed.run(&ctx, &consecutive_pairs).unwrap();
    assert_eq!(report.total_registered(), 3);

    let history = resumed.system(&"dm1".into()).unwrap().history();
    let ids: Vec<u64> = history.iter().map(|w| w.id()).collect();
    assert_eq!(ids, (0..next + 3).collect::<Vec<_>>());
    assert_eq!(history.entries_for_iteration(2)[0].id(), next);
}

#[test]
fn inconsistent_judgment_is_pruned_through_cone() {
    init_tracing();
    let mut history = History::new("dm1");
    let a = alt("A", vec![1.0, 5.0]);
    let b = alt("B", vec![2.0, 1.0]);
    let now = Utc::now();

    let w1 = history
        .wrap(PreferenceStatement::preference(a.clone(), b.clone()), 1, Some(now))
        .unwrap();
    let w2 = history
        .wrap(
            PreferenceStatement::preference(b.clone(), a.clone()),
            1,
            Some(now + Duration::seconds(1)),
        )
        .unwrap();
    history
        .register_preference_information(vec![w1.clone(), w2.clone()])
        .unwrap();

    let cone = PreferenceCone::from_history(&history);
    let candidates = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
    let (best, violations) = cone.most_compatible(&candidates).unwrap().unwrap();
    assert_eq!((best, violations), (0, 1));

    // keep only the judgment the most compatible weights agree with
    let consistent: Vec<_> = history
        .wrappers()
        .iter()
        .filter(|w| {
            PreferenceCone::new(vec![w.statement().clone()])
                .count_violations(&candidates[best])
                .map(|v| v == 0)
                .unwrap_or(false)
        })
        .cloned()
        .collect();
    let report = history
        .update_history_with_a_subset(consistent, 2, Some(now))
        .unwrap();

    assert_eq!(report.removed, vec![w2]);
    assert_eq!(history.wrappers(), &[w1]);
    assert!(!history.remove(&report.removed[0]));
}

#[test]
fn per_dm_provider_routes_private_sets() {
    let roster: Vec<DecisionMakerId> = vec!["alice".into(), "bob".into()];
    let alice: Box<dyn FeedbackSource> =
        Box::new(ArtificialValueDM::new(LNorm::chebyshev(Some(vec![0.9, 0.1]))));
    let bob: Box<dyn FeedbackSource> =
        Box::new(ArtificialValueDM::new(LNorm::chebyshev(Some(vec![0.1, 0.9]))));
    let mut provider = FeedbackProvider::per_decision_maker(
        roster.clone(),
        vec![(roster[0].clone(), alice), (roster[1].clone(), bob)],
    )
    .unwrap();

    let common = ReferenceSets::new().with_set(ReferenceSet::new(vec![
        alt("A1", vec![0.1, 0.9]),
        alt("A5", vec![0.9, 0.1]),
    ]));
    let private = ReferenceSets::new().with_set(ReferenceSet::new(vec![
        alt("B1", vec![0.2, 0.7]),
        alt("B2", vec![0.6, 0.3]),
    ]));
    let sets = ReferenceSetsResult::common(common).with_private("bob", private);
    let ctx = DMContext::builder(3).decision_makers(roster.clone()).build();

    let result = provider
        .generate_feedback(&ctx, &roster, Some(&sets))
        .unwrap();

    let alice = result.for_decision_maker(&roster[0]).unwrap();
    assert_eq!(alice.len(), 1);
    assert_eq!(alice.statements[0].statement().first().name(), "A1");

    let bob = result.for_decision_maker(&roster[1]).unwrap();
    assert_eq!(bob.len(), 2);
    assert_eq!(bob.statements[0].statement().first().name(), "A5");
    assert_eq!(bob.statements[1].statement().first().name(), "B2");
}

#[test]
fn config_drives_refiner_and_form() {
    let config = ElicitationConfig::from_json(
        r#"{
            "history_name": "dm1",
            "refiner": { "remove_dominated": false, "min_alternatives": 10 },
            "pairwise": { "indifference_threshold": 0.5 }
        }"#,
    )
    .unwrap();

    let refiner = Refiner::from_config(&config.refiner).unwrap();
    let ctx = DMContext::builder(0)
        .criteria(Criteria::all_cost(2))
        .alternatives(population())
        .build();
    let result = refiner.refine(&ctx).unwrap();
    assert!(result.is_terminated());
    assert!(result.termination_message.unwrap().contains("6 < 10"));

    let form = PairwiseComparisons::from_config(&config.pairwise).unwrap();
    let sets = ReferenceSets::new().with_set(ReferenceSet::new(vec![
        alt("A1", vec![0.1, 0.1]),
        alt("A2", vec![0.2, 0.2]),
    ]));
    let statements = form
        .construct(&LNorm::weighted_sum(None), &sets)
        .unwrap();
    assert_eq!(statements[0].kind(), StatementKind::Indifference);
}

#[cfg(feature = "checkpoint")]
#[test]
fn history_survives_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dm1.json");

    let mut history = History::new("dm1");
    history
        .register_preference_information(vec![pc("A1", "A2", 0, 0), pc("A3", "A4", 1, 1)])
        .unwrap();
    history.save(&path, SnapshotFormat::Json).unwrap();

    let mut restored = History::load(&path).unwrap();
    assert_eq!(restored.wrappers(), history.wrappers());
    assert_eq!(restored.next_id().unwrap(), 2);

    let tampered = std::fs::read_to_string(&path)
        .unwrap()
        .replace("\"A3\"", "\"A9\"");
    std::fs::write(&path, tampered).unwrap();
    let err = History::load(&path).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Corrupted(_)));
}
