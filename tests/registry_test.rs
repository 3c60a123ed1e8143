//! Tests for SchemeRegistry

use rstest::{fixture, rstest};

use sarf::domain::{
    DomainError, Placeholders, Root, Scheme, SchemeRegistry, SchemeRule, SchemeType,
};

#[fixture]
fn registry() -> SchemeRegistry {
    let placeholders = Placeholders::default();
    let mut registry = SchemeRegistry::new();
    registry
        .add(Scheme::dynamic("مفعول", SchemeType::PassiveParticiple, &placeholders).unwrap())
        .unwrap();
    registry
        .add(Scheme::dynamic("فاعل", SchemeType::ActiveParticiple, &placeholders).unwrap())
        .unwrap();
    registry
        .add(
            Scheme::explicit("تفعيل", SchemeType::VerbalNoun, |a, b, c| {
                format!("ت{a}{b}ي{c}")
            })
            .unwrap(),
        )
        .unwrap();
    registry
}

#[rstest]
fn given_registry_when_getting_then_scheme_generates(registry: SchemeRegistry) {
    let root = Root::new("درس").unwrap();

    assert_eq!(registry.get("مفعول").unwrap().generate(&root).unwrap(), "مدروس");
    assert_eq!(registry.get("تفعيل").unwrap().generate(&root).unwrap(), "تدريس");
    assert_eq!(registry.len(), 3);
}

#[rstest]
fn given_existing_name_when_adding_then_duplicate_scheme(mut registry: SchemeRegistry) {
    // Act
    let result = registry.add(
        Scheme::dynamic("فاعل", SchemeType::Custom, &Placeholders::default()).unwrap(),
    );

    // Assert
    assert_eq!(result, Err(DomainError::DuplicateScheme("فاعل".to_string())));
    assert_eq!(
        registry.get("فاعل").unwrap().scheme_type(),
        SchemeType::ActiveParticiple
    );
}

#[rstest]
fn given_unknown_name_when_getting_or_removing_then_scheme_not_found(
    mut registry: SchemeRegistry,
) {
    assert!(matches!(
        registry.get("فعلان"),
        Err(DomainError::SchemeNotFound(_))
    ));
    assert!(matches!(
        registry.remove("فعلان"),
        Err(DomainError::SchemeNotFound(_))
    ));
    assert_eq!(registry.len(), 3);
}

#[rstest]
fn given_scheme_when_removing_then_gone(mut registry: SchemeRegistry) {
    let removed = registry.remove("مفعول").unwrap();

    assert_eq!(removed.name(), "مفعول");
    assert!(registry.get("مفعول").is_err());
    assert_eq!(registry.len(), 2);
}

#[rstest]
fn given_explicit_scheme_when_modifying_then_becomes_compiled_under_same_key(
    mut registry: SchemeRegistry,
) {
    // Act
    registry
        .modify("تفعيل", "تفعال", &Placeholders::default())
        .unwrap();

    // Assert
    let scheme = registry.get("تفعيل").unwrap();
    assert!(matches!(scheme.rule(), SchemeRule::Compiled(_)));
    assert!(scheme.is_dynamic());
    assert_eq!(scheme.pattern(), Some("تفعال"));
    assert_eq!(
        scheme.generate(&Root::new("كرر").unwrap()).unwrap(),
        "تكرار"
    );
}

#[rstest]
fn given_unknown_name_when_modifying_then_scheme_not_found(mut registry: SchemeRegistry) {
    let result = registry.modify("فعلان", "فعلان", &Placeholders::default());

    assert_eq!(result, Err(DomainError::SchemeNotFound("فعلان".to_string())));
}

#[rstest]
fn given_unknown_name_and_bad_pattern_when_modifying_then_scheme_not_found(
    mut registry: SchemeRegistry,
) {
    let result = registry.modify("فعلان", "مكتب", &Placeholders::default());

    assert_eq!(result, Err(DomainError::SchemeNotFound("فعلان".to_string())));
}

#[rstest]
fn given_known_name_and_bad_pattern_when_modifying_then_invalid_pattern_and_rule_kept(
    mut registry: SchemeRegistry,
) {
    // Act
    let result = registry.modify("تفعيل", "مكتب", &Placeholders::default());

    // Assert
    assert!(matches!(result, Err(DomainError::InvalidPattern { .. })));
    let scheme = registry.get("تفعيل").unwrap();
    assert!(matches!(scheme.rule(), SchemeRule::Explicit(_)));
    assert_eq!(
        scheme.generate(&Root::new("درس").unwrap()).unwrap(),
        "تدريس"
    );
}

#[rstest]
fn given_registry_when_listing_by_type_then_filtered(registry: SchemeRegistry) {
    // Act
    let nouns = registry.list_by_type(SchemeType::VerbalNoun);
    let verbs = registry.list_by_type(SchemeType::Verb);
    let mut all: Vec<String> = registry.list_all().into_iter().map(|s| s.name).collect();
    all.sort();

    // Assert
    assert_eq!(nouns.len(), 1);
    assert_eq!(nouns[0].name, "تفعيل");
    assert!(!nouns[0].dynamic);
    assert!(verbs.is_empty());
    let mut expected = vec!["فاعل", "مفعول", "تفعيل"];
    expected.sort();
    assert_eq!(all, expected);
}

#[rstest]
#[case("")]
#[case("   ")]
fn given_blank_name_when_creating_scheme_then_invalid_scheme_name(#[case] name: &str) {
    let explicit = Scheme::explicit(name, SchemeType::Custom, |a, b, c| format!("{a}{b}{c}"));
    let dynamic = Scheme::dynamic(name, SchemeType::Custom, &Placeholders::default());

    assert_eq!(explicit.unwrap_err(), DomainError::InvalidSchemeName);
    assert_eq!(dynamic.unwrap_err(), DomainError::InvalidSchemeName);
}
