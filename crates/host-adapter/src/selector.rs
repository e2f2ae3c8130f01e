//! A small CSS-subset selector engine.
//!
//! A live host resolves selectors itself; the in-memory host needs its own
//! matcher. The grammar is the subset this domain actually uses: `tag`,
//! `#id` and `.class` simple selectors, compounds (`button.preferences`),
//! and descendant (whitespace) / child (`>`) combinators.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Selector parse failures, reported at configuration time.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum SelectorError {
    #[error("selector is empty")]
    Empty,

    #[error("combinator without a selector on both sides")]
    DanglingCombinator,

    #[error("empty simple selector in '{0}'")]
    EmptyPart(String),
}

/// Relation between a compound and the compound to its left.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Combinator {
    /// Any ancestor (whitespace).
    Descendant,
    /// Direct parent (`>`).
    Child,
}

/// One compound selector: optional tag plus id/class constraints.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

impl Compound {
    /// Check this compound against one element's tag, id and class list.
    pub fn matches(&self, tag: &str, id: Option<&str>, classes: &[String]) -> bool {
        if let Some(want) = &self.tag {
            if want != tag {
                return false;
            }
        }
        if let Some(want) = &self.id {
            if id != Some(want.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|c| classes.iter().any(|have| have == c))
    }
}

/// One step of a parsed selector: how to reach it, and what must match there.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Relation to the previous step; ignored for the first step.
    pub combinator: Combinator,
    pub compound: Compound,
}

/// A parsed selector. Construction via [`Selector::parse`] is the validation
/// point: an `anchor_selector` that survives registry construction is known
/// to be well formed, though it may still match nothing at injection time.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Selector {
    raw: String,
    steps: Vec<Step>,
}

impl Selector {
    pub fn parse(raw: &str) -> Result<Self, SelectorError> {
        let mut steps = Vec::new();
        let mut pending = Combinator::Descendant;
        let mut pending_child = false;

        for token in tokenize(raw) {
            if token == ">" {
                if steps.is_empty() || pending_child {
                    return Err(SelectorError::DanglingCombinator);
                }
                pending = Combinator::Child;
                pending_child = true;
                continue;
            }
            steps.push(Step {
                combinator: pending,
                compound: parse_compound(&token)?,
            });
            pending = Combinator::Descendant;
            pending_child = false;
        }

        if pending_child {
            return Err(SelectorError::DanglingCombinator);
        }
        if steps.is_empty() {
            return Err(SelectorError::Empty);
        }

        Ok(Self {
            raw: raw.trim().to_string(),
            steps,
        })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

fn tokenize(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for ch in raw.chars() {
        match ch {
            '>' => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                tokens.push(">".to_string());
            }
            c if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn parse_compound(token: &str) -> Result<Compound, SelectorError> {
    if token == "*" {
        return Ok(Compound::default());
    }

    let mut compound = Compound::default();
    let mut chars = token.chars().peekable();

    let mut tag = String::new();
    while let Some(&c) = chars.peek() {
        if c == '#' || c == '.' {
            break;
        }
        tag.push(c);
        chars.next();
    }
    if !tag.is_empty() {
        compound.tag = Some(tag);
    }

    while let Some(marker) = chars.next() {
        let mut ident = String::new();
        while let Some(&c) = chars.peek() {
            if c == '#' || c == '.' {
                break;
            }
            ident.push(c);
            chars.next();
        }
        if ident.is_empty() {
            return Err(SelectorError::EmptyPart(token.to_string()));
        }
        match marker {
            '#' => compound.id = Some(ident),
            '.' => compound.classes.push(ident),
            _ => return Err(SelectorError::EmptyPart(token.to_string())),
        }
    }

    if compound.tag.is_none() && compound.id.is_none() && compound.classes.is_empty() {
        return Err(SelectorError::EmptyPart(token.to_string()));
    }

    Ok(compound)
}
