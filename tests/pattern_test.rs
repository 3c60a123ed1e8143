//! Tests for the scheme compiler

use rstest::rstest;

use sarf::domain::{CompiledPattern, DomainError, Instruction, Placeholders, Root};

fn letters(root: &str) -> [char; 3] {
    Root::new(root).unwrap().letters().unwrap()
}

#[rstest]
#[case("فاعل", "كتب", "كاتب")]
#[case("مفعول", "كتب", "مكتوب")]
#[case("استفعال", "خرج", "استخراج")]
#[case("فعّال", "كتب", "كتّاب")]
#[case("لعف", "كتب", "بتك")]
fn given_pattern_when_rendering_then_letters_substituted(
    #[case] pattern: &str,
    #[case] root: &str,
    #[case] expected: &str,
) {
    // Arrange
    let compiled = CompiledPattern::compile(pattern, &Placeholders::default()).unwrap();

    // Act
    let word = compiled.render(letters(root));

    // Assert
    assert_eq!(word, expected);
}

#[test]
fn given_pattern_when_compiling_then_literals_keep_their_position() {
    let compiled = CompiledPattern::compile("مفعول", &Placeholders::default()).unwrap();

    assert_eq!(
        compiled.instructions(),
        &[
            Instruction::Literal("م".to_string()),
            Instruction::Slot(0),
            Instruction::Slot(1),
            Instruction::Literal("و".to_string()),
            Instruction::Slot(2),
        ]
    );
    assert_eq!(compiled.source(), "مفعول");
}

#[rstest]
#[case::missing_lam("فاع", "ل")]
#[case::missing_fa_and_ain("مكتل", "فع")]
#[case::empty("", "فعل")]
fn given_incomplete_pattern_when_compiling_then_invalid_pattern(
    #[case] pattern: &str,
    #[case] missing: &str,
) {
    // Act
    let result = CompiledPattern::compile(pattern, &Placeholders::default());

    // Assert
    assert_eq!(
        result.unwrap_err(),
        DomainError::InvalidPattern {
            pattern: pattern.to_string(),
            missing: missing.to_string(),
        }
    );
}

#[test]
fn given_custom_placeholders_when_compiling_then_they_mark_the_slots() {
    // Arrange
    let placeholders: Placeholders = "xyz".parse().unwrap();

    // Act
    let compiled = CompiledPattern::compile("axyz", &placeholders).unwrap();

    // Assert
    assert_eq!(compiled.render(letters("كتب")), "aكتب");
    // the default symbols are plain literals here
    assert!(CompiledPattern::compile("فاعل", &placeholders).is_err());
}

#[rstest]
#[case("فف")]
#[case("ففل")]
#[case("فعلن")]
fn given_bad_placeholder_text_when_parsing_then_rejected(#[case] text: &str) {
    let result: Result<Placeholders, _> = text.parse();

    assert!(matches!(result, Err(DomainError::InvalidPlaceholders(_))));
}
