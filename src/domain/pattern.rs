//! Scheme compiler: turns a textual pattern into a list of instructions.
//!
//! A pattern such as `مفعول` mixes the three placeholder letters (`ف`, `ع`,
//! `ل` by default) with literal characters. Compilation scans it once;
//! generation only walks the instruction list.

use std::fmt;
use std::str::FromStr;

use crate::domain::entities::ROOT_LEN;
use crate::domain::error::{DomainError, DomainResult};

/// The three symbols marking where root letters 1, 2 and 3 go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholders {
    symbols: [char; ROOT_LEN],
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            symbols: ['ف', 'ع', 'ل'],
        }
    }
}

impl Placeholders {
    pub fn new(first: char, second: char, third: char) -> DomainResult<Self> {
        if first == second || second == third || first == third {
            return Err(DomainError::InvalidPlaceholders(
                [first, second, third].iter().collect(),
            ));
        }
        Ok(Self {
            symbols: [first, second, third],
        })
    }

    pub fn symbols(&self) -> [char; ROOT_LEN] {
        self.symbols
    }

    /// Slot (0-based) of `c`, if it is a placeholder.
    pub fn slot_of(&self, c: char) -> Option<usize> {
        self.symbols.iter().position(|&s| s == c)
    }
}

impl FromStr for Placeholders {
    type Err = DomainError;

    /// Parse three consecutive characters, e.g. `"فعل"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.trim().chars().collect();
        match chars.as_slice() {
            [a, b, c] => Self::new(*a, *b, *c),
            _ => Err(DomainError::InvalidPlaceholders(s.to_string())),
        }
    }
}

impl fmt::Display for Placeholders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.symbols {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// One step of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Copy this text verbatim
    Literal(String),
    /// Insert root letter at this 0-based position
    Slot(usize),
}

/// A pattern compiled into instructions. Pure and reusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    source: String,
    instructions: Vec<Instruction>,
    /// Upper bound on output size in bytes, used to pre-size the buffer
    capacity: usize,
}

impl CompiledPattern {
    /// Compile `pattern`, rejecting it unless all three placeholders occur.
    pub fn compile(pattern: &str, placeholders: &Placeholders) -> DomainResult<Self> {
        let mut instructions = Vec::new();
        let mut seen = [false; ROOT_LEN];
        let mut literal = String::new();
        let mut capacity = 0;

        for c in pattern.chars() {
            match placeholders.slot_of(c) {
                Some(slot) => {
                    if !literal.is_empty() {
                        capacity += literal.len();
                        instructions.push(Instruction::Literal(std::mem::take(&mut literal)));
                    }
                    seen[slot] = true;
                    capacity += 4;
                    instructions.push(Instruction::Slot(slot));
                }
                None => literal.push(c),
            }
        }
        if !literal.is_empty() {
            capacity += literal.len();
            instructions.push(Instruction::Literal(literal));
        }

        let missing: String = placeholders
            .symbols()
            .iter()
            .zip(seen)
            .filter(|(_, found)| !found)
            .map(|(c, _)| *c)
            .collect();
        if !missing.is_empty() {
            return Err(DomainError::InvalidPattern {
                pattern: pattern.to_string(),
                missing,
            });
        }

        Ok(Self {
            source: pattern.to_string(),
            instructions,
            capacity,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn render(&self, letters: [char; ROOT_LEN]) -> String {
        let mut word = String::with_capacity(self.capacity);
        for instruction in &self.instructions {
            match instruction {
                Instruction::Literal(text) => word.push_str(text),
                Instruction::Slot(slot) => word.push(letters[*slot]),
            }
        }
        word
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_groups_literal_runs() {
        let pattern = CompiledPattern::compile("استفعال", &Placeholders::default()).unwrap();
        assert_eq!(
            pattern.instructions(),
            &[
                Instruction::Literal("است".to_string()),
                Instruction::Slot(0),
                Instruction::Slot(1),
                Instruction::Literal("ا".to_string()),
                Instruction::Slot(2),
            ]
        );
    }

    #[test]
    fn test_missing_placeholders_are_reported() {
        let err = CompiledPattern::compile("فاعة", &Placeholders::default()).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidPattern {
                pattern: "فاعة".to_string(),
                missing: "ل".to_string(),
            }
        );
    }

    #[test]
    fn test_placeholders_must_be_distinct() {
        assert!("فعل".parse::<Placeholders>().is_ok());
        assert!("ففل".parse::<Placeholders>().is_err());
        assert!("فع".parse::<Placeholders>().is_err());
    }
}
