//! Tests for MorphologyService

use rstest::{fixture, rstest};

use sarf::application::services::MorphologyService;
use sarf::domain::{
    DerivationRecord, DomainError, LoadReport, Placeholders, RootRecord, SchemeRecord,
    SchemeType, Snapshot, Validation,
};
use sarf::util::testing;

const KASRA_AGENT: &str = "فاعِل";

/// Engine with roots كتب and قرأ and an explicit active participle with kasra.
#[fixture]
fn engine() -> MorphologyService {
    testing::init_test_setup();
    let mut service = MorphologyService::new().unwrap();
    service.add_root("كتب").unwrap();
    service.add_root("قرأ").unwrap();
    service
        .add_explicit_scheme(KASRA_AGENT, SchemeType::ActiveParticiple, |a, b, c| {
            format!("{a}ا{b}ِ{c}")
        })
        .unwrap();
    service
}

// ------------- scenarios -------------

#[rstest]
fn given_explicit_scheme_when_generating_then_word_recorded_and_validates(
    mut engine: MorphologyService,
) {
    // Act
    let word = engine.generate("كتب", KASRA_AGENT).unwrap();
    let validation = engine.validate("كتب", &word).unwrap();

    // Assert
    assert_eq!(word, "كاتِب");
    assert_eq!(
        validation,
        Validation::Valid {
            scheme: KASRA_AGENT.to_string()
        }
    );
    let derivations = engine.list_derivations("كتب").unwrap();
    assert_eq!(derivations.len(), 1, "validate must not duplicate the word");
    assert_eq!(derivations[0].word, "كاتِب");
    assert_eq!(derivations[0].scheme, KASRA_AGENT);
}

#[rstest]
fn given_two_letter_root_when_adding_then_invalid_root_and_store_unchanged(
    mut engine: MorphologyService,
) {
    // Arrange
    let before = engine.list_roots();

    // Act
    let result = engine.add_root("كت");

    // Assert
    assert_eq!(result, Err(DomainError::InvalidRoot("كت".to_string())));
    assert_eq!(engine.list_roots(), before);
}

#[rstest]
fn given_removed_scheme_when_generating_then_scheme_not_found(mut engine: MorphologyService) {
    // Arrange
    engine.remove_scheme("مفعول").unwrap();

    // Act
    let result = engine.generate("قرأ", "مفعول");

    // Assert
    assert_eq!(result, Err(DomainError::SchemeNotFound("مفعول".to_string())));
}

#[rstest]
fn given_generated_word_when_analyzing_then_root_and_scheme_found(mut engine: MorphologyService) {
    // Arrange
    engine.generate("كتب", KASRA_AGENT).unwrap();

    // Act
    let analysis = engine.analyze("كاتِب").unwrap();

    // Assert
    assert_eq!(analysis.root.as_str(), "كتب");
    assert_eq!(analysis.scheme, KASRA_AGENT);
}

// ------------- generation -------------

#[rstest]
#[case("كتب", "فاعل", "كاتب")]
#[case("كتب", "مفعول", "مكتوب")]
#[case("قرأ", "فعل", "قرأ")]
#[case("قرأ", "مفعل", "مقرأ")]
fn given_builtin_scheme_when_generating_then_expected_word(
    mut engine: MorphologyService,
    #[case] root: &str,
    #[case] scheme: &str,
    #[case] expected: &str,
) {
    assert_eq!(engine.generate(root, scheme).unwrap(), expected);
}

#[rstest]
fn given_unknown_root_when_generating_then_root_not_found(mut engine: MorphologyService) {
    let result = engine.generate("درس", "فاعل");

    assert_eq!(result, Err(DomainError::RootNotFound("درس".to_string())));
}

#[rstest]
fn given_same_generation_twice_when_listing_then_recorded_once(mut engine: MorphologyService) {
    // Act
    engine.generate("كتب", "مفعول").unwrap();
    engine.generate("كتب", "مفعول").unwrap();

    // Assert
    assert_eq!(engine.list_derivations("كتب").unwrap().len(), 1);
    let usage = engine
        .list_schemes()
        .into_iter()
        .find(|s| s.name == "مفعول")
        .map(|s| s.usage);
    assert_eq!(usage, Some(1));
}

#[rstest]
fn given_validated_word_when_listing_schemes_then_usage_unchanged(
    mut engine: MorphologyService,
) {
    // Act
    let validation = engine.validate("كتب", "مكتوب").unwrap();

    // Assert
    assert!(validation.is_valid());
    assert_eq!(engine.list_derivations("كتب").unwrap().len(), 1);
    assert!(engine.list_schemes().iter().all(|s| s.usage == 0));
}

#[rstest]
fn given_validated_word_when_generating_it_then_usage_unchanged(mut engine: MorphologyService) {
    // Arrange
    engine.validate("كتب", "مكتوب").unwrap();

    // Act
    engine.generate("كتب", "مفعول").unwrap();

    // Assert
    assert_eq!(engine.popular_schemes(1)[0].usage, 0);
}

#[rstest]
fn given_generations_when_ranking_schemes_then_most_used_first_ties_by_name(
    mut engine: MorphologyService,
) {
    // Arrange
    engine.generate("كتب", "مفعول").unwrap();
    engine.generate("قرأ", "مفعول").unwrap();
    engine.generate("كتب", "فاعل").unwrap();
    engine.generate("قرأ", "مفعل").unwrap();

    // Act
    let top = engine.popular_schemes(3);

    // Assert
    let ranked: Vec<(String, u64)> = top.into_iter().map(|s| (s.name, s.usage)).collect();
    let mut tied = vec!["فاعل".to_string(), "مفعل".to_string()];
    tied.sort();
    assert_eq!(
        ranked,
        vec![
            ("مفعول".to_string(), 2),
            (tied[0].clone(), 1),
            (tied[1].clone(), 1),
        ]
    );
    assert_eq!(engine.popular_schemes(100).len(), 11);
    assert!(engine.popular_schemes(0).is_empty());
}

#[rstest]
fn given_every_scheme_when_generating_then_validate_agrees(mut engine: MorphologyService) {
    let names: Vec<String> = engine.list_schemes().into_iter().map(|s| s.name).collect();
    for name in names {
        let word = engine.generate("كتب", &name).unwrap();
        assert!(
            engine.validate("كتب", &word).unwrap().is_valid(),
            "{} -> {}",
            name,
            word
        );
    }
}

#[rstest]
fn given_unrelated_word_when_validating_then_invalid_and_nothing_recorded(
    mut engine: MorphologyService,
) {
    let validation = engine.validate("كتب", "مدرسة").unwrap();

    assert_eq!(validation, Validation::Invalid);
    assert!(engine.list_derivations("كتب").unwrap().is_empty());
}

#[rstest]
fn given_unknown_root_when_validating_then_root_not_found(mut engine: MorphologyService) {
    let result = engine.validate("درس", "دارس");

    assert!(matches!(result, Err(DomainError::RootNotFound(_))));
}

// ------------- schemes -------------

#[rstest]
fn given_dynamic_scheme_when_added_then_generates_from_its_name(mut engine: MorphologyService) {
    // Act
    engine.add_scheme("استفعال", SchemeType::VerbalNoun).unwrap();

    // Assert
    engine.add_root("خرج").unwrap();
    assert_eq!(engine.generate("خرج", "استفعال").unwrap(), "استخراج");
    assert_eq!(engine.schemes_by_type(SchemeType::VerbalNoun).len(), 4);
}

#[rstest]
fn given_pattern_without_placeholders_when_adding_scheme_then_rejected(
    mut engine: MorphologyService,
) {
    let before = engine.list_schemes().len();

    let result = engine.add_scheme("مكتب", SchemeType::Custom);

    assert!(matches!(result, Err(DomainError::InvalidPattern { .. })));
    assert_eq!(engine.list_schemes().len(), before);
}

#[rstest]
fn given_modified_scheme_when_generating_then_old_name_uses_new_pattern(
    mut engine: MorphologyService,
) {
    // Act
    engine.modify_scheme("فاعل", "فعّال").unwrap();

    // Assert
    assert_eq!(engine.generate("كتب", "فاعل").unwrap(), "كتّاب");
}

// ------------- analysis -------------

#[rstest]
fn given_word_from_several_roots_when_analyzing_then_smallest_root_wins() {
    // Arrange
    let mut service = MorphologyService::empty(Placeholders::default());
    service
        .add_explicit_scheme("ثابت", SchemeType::Custom, |_, _, _| "ثابت".to_string())
        .unwrap();
    for root in ["كتب", "درس", "قرأ"] {
        service.add_root(root).unwrap();
    }

    // Act
    let analysis = service.analyze("ثابت").unwrap();

    // Assert
    let mut roots = vec!["كتب", "درس", "قرأ"];
    roots.sort();
    assert_eq!(analysis.root.as_str(), roots[0]);
}

#[rstest]
fn given_empty_store_when_analyzing_then_none() {
    let service = MorphologyService::new().unwrap();

    assert_eq!(service.analyze("كاتب"), None);
    assert_eq!(service.search_space(), 0);
}

#[rstest]
fn given_word_when_analyzing_then_nothing_recorded(engine: MorphologyService) {
    assert!(engine.analyze("مكتوب").is_some());

    assert!(engine.list_derivations("كتب").unwrap().is_empty());
    assert_eq!(engine.search_space(), 2 * 11);
}

// ------------- bulk load -------------

#[rstest]
fn given_mixed_candidates_when_loading_then_report_counts_each_kind(
    mut engine: MorphologyService,
) {
    // Act
    let report = engine.load_roots(["درس", "كتب", "كت", "علم", "درس", "كتبت"]);

    // Assert
    assert_eq!(
        report,
        LoadReport {
            added: 2,
            duplicates: 2,
            invalid: 2,
        }
    );
    assert_eq!(engine.root_count(), 4);
    assert!(engine.store().is_balanced());
}

// ------------- snapshot -------------

#[rstest]
fn given_engine_state_when_round_tripping_snapshot_then_state_restored(
    mut engine: MorphologyService,
) {
    // Arrange
    engine.generate("كتب", "مفعول").unwrap();
    engine.add_scheme("استفعال", SchemeType::VerbalNoun).unwrap();
    engine.modify_scheme("فاعل", "فعّال").unwrap();

    // Act
    let snapshot = engine.snapshot();
    let (restored, report) = MorphologyService::from_snapshot(snapshot, Placeholders::default());

    // Assert
    assert_eq!(report.skipped_schemes, vec![KASRA_AGENT.to_string()]);
    assert!(report.invalid_roots.is_empty());
    assert_eq!(restored.list_roots(), engine.list_roots());
    assert_eq!(
        restored.list_derivations("كتب").unwrap(),
        engine.list_derivations("كتب").unwrap()
    );
    let mut restored = restored;
    assert_eq!(restored.generate("كتب", "فاعل").unwrap(), "كتّاب");
    assert_eq!(restored.generate("قرأ", "استفعال").unwrap(), "استقراأ");
    let usage = restored
        .list_schemes()
        .into_iter()
        .find(|s| s.name == "مفعول")
        .map(|s| s.usage);
    assert_eq!(usage, Some(1));
}

#[test]
fn given_snapshot_with_bad_records_when_restoring_then_reported_and_skipped() {
    // Arrange
    let snapshot = Snapshot {
        schemes: vec![
            SchemeRecord {
                name: "مفعول".to_string(),
                pattern: None,
                dynamic: false,
                scheme_type: SchemeType::PassiveParticiple,
                usage: 3,
            },
            SchemeRecord {
                name: "مكسور".to_string(),
                pattern: Some("مكسور".to_string()),
                dynamic: true,
                scheme_type: SchemeType::Custom,
                usage: 0,
            },
        ],
        roots: vec![
            RootRecord {
                root: "كتب".to_string(),
                derivations: vec![DerivationRecord {
                    word: "مكتوب".to_string(),
                    scheme: "مفعول".to_string(),
                    timestamp: chrono::Utc::now(),
                }],
            },
            RootRecord {
                root: "كتب".to_string(),
                derivations: vec![],
            },
            RootRecord {
                root: "كتاب".to_string(),
                derivations: vec![],
            },
        ],
    };

    // Act
    let (service, report) = MorphologyService::from_snapshot(snapshot, Placeholders::default());

    // Assert
    assert_eq!(report.skipped_schemes, vec!["مكسور".to_string()]);
    assert_eq!(report.duplicate_roots, vec!["كتب".to_string()]);
    assert_eq!(report.invalid_roots, vec!["كتاب".to_string()]);
    assert!(!report.is_clean());
    assert_eq!(service.list_roots(), vec!["كتب".to_string()]);
    assert_eq!(service.list_derivations("كتب").unwrap()[0].word, "مكتوب");
    assert_eq!(service.list_schemes().len(), 1);
    assert_eq!(service.list_schemes()[0].usage, 3);
}
