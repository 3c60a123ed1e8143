//! Built-in schemes seeded into every new engine.
//!
//! Built-ins are explicit: their rules are plain functions, so they do not
//! depend on the configured placeholder symbols.

use crate::domain::entities::SchemeType;
use crate::domain::error::DomainResult;
use crate::domain::scheme::Scheme;

type BuiltinFn = fn(char, char, char) -> String;

/// (name, type, rule)
const BUILTINS: [(&str, SchemeType, BuiltinFn); 10] = [
    ("فعل", SchemeType::Verb, |a, b, c| format!("{a}{b}{c}")),
    ("فاعل", SchemeType::ActiveParticiple, |a, b, c| format!("{a}ا{b}{c}")),
    ("مفعول", SchemeType::PassiveParticiple, |a, b, c| format!("م{a}{b}و{c}")),
    ("فعال", SchemeType::VerbalNoun, |a, b, c| format!("{a}{b}ا{c}")),
    ("تفعيل", SchemeType::VerbalNoun, |a, b, c| format!("ت{a}{b}ي{c}")),
    ("افتعال", SchemeType::VerbalNoun, |a, b, c| format!("ا{a}ت{b}ا{c}")),
    ("فعيل", SchemeType::Intensive, |a, b, c| format!("{a}{b}ي{c}")),
    ("فعّال", SchemeType::Intensive, |a, b, c| format!("{a}{b}ّا{c}")),
    ("مفعل", SchemeType::PlaceNoun, |a, b, c| format!("م{a}{b}{c}")),
    ("مفعال", SchemeType::InstrumentNoun, |a, b, c| format!("م{a}{b}ا{c}")),
];

/// Names of all built-in schemes.
pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(|(name, _, _)| *name)
}

/// Build the built-in scheme called `name`, if there is one.
pub fn builtin_scheme(name: &str) -> Option<DomainResult<Scheme>> {
    BUILTINS
        .iter()
        .find(|(n, _, _)| *n == name)
        .map(|(n, t, rule)| Scheme::explicit(*n, *t, *rule))
}

/// All built-in schemes.
pub fn builtin_schemes() -> DomainResult<Vec<Scheme>> {
    BUILTINS
        .iter()
        .map(|(n, t, rule)| Scheme::explicit(*n, *t, *rule))
        .collect()
}
