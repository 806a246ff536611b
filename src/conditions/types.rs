//! core types for the condition system

use std::fmt;

use serde::{Deserialize, Serialize};

/// exact token match against tags, display name and lineage editor ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringMatch {
    pub tokens: Vec<String>,
    /// every token must match (AND) instead of any (OR)
    #[serde(default)]
    pub all: bool,
}

/// form reference match; entries are plugin names, `0x` form ids or editor ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormMatch {
    pub entries: Vec<String>,
    #[serde(default)]
    pub all: bool,
}

/// inclusive level bounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRange {
    #[serde(default)]
    pub min: Option<u16>,
    #[serde(default)]
    pub max: Option<u16>,
}

impl LevelRange {
    pub fn contains(&self, level: u16) -> bool {
        self.min.map_or(true, |min| level >= min) && self.max.map_or(true, |max| level <= max)
    }
}

/// the condition tree evaluated against a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// all conditions must be true (AND)
    All(Vec<Condition>),
    /// any condition must be true (OR)
    Any(Vec<Condition>),
    /// negate a condition (NOT)
    Not(Box<Condition>),
    Strings(StringMatch),
    /// substring match of any token
    Contains(Vec<String>),
    Forms(FormMatch),
    Level(LevelRange),
    Child(bool),
    Leveled(bool),
    /// true when the character already has something exclusive with this form
    ExclusiveWith(String),
}

impl Condition {
    /// create an AND condition
    pub fn all(conditions: Vec<Condition>) -> Self {
        Condition::All(conditions)
    }

    /// create an OR condition
    pub fn any(conditions: Vec<Condition>) -> Self {
        Condition::Any(conditions)
    }

    /// create a NOT condition
    pub fn negate(condition: Condition) -> Self {
        Condition::Not(Box::new(condition))
    }

    pub fn strings<S: Into<String>>(tokens: impl IntoIterator<Item = S>, all: bool) -> Self {
        Condition::Strings(StringMatch {
            tokens: tokens.into_iter().map(Into::into).collect(),
            all,
        })
    }

    pub fn contains<S: Into<String>>(tokens: impl IntoIterator<Item = S>) -> Self {
        Condition::Contains(tokens.into_iter().map(Into::into).collect())
    }

    pub fn forms<S: Into<String>>(entries: impl IntoIterator<Item = S>, all: bool) -> Self {
        Condition::Forms(FormMatch {
            entries: entries.into_iter().map(Into::into).collect(),
            all,
        })
    }

    pub fn level(min: Option<u16>, max: Option<u16>) -> Self {
        Condition::Level(LevelRange { min, max })
    }

    /// check if this condition is empty (constant)
    pub fn is_empty(&self) -> bool {
        match self {
            Condition::All(v) => v.is_empty(),
            Condition::Any(v) => v.is_empty(),
            _ => false,
        }
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

fn combinator(all: bool) -> &'static str {
    if all {
        "all"
    } else {
        "any"
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::All(conditions) => {
                write!(f, "all(")?;
                write_list(f, conditions)?;
                write!(f, ")")
            }
            Condition::Any(conditions) => {
                write!(f, "any(")?;
                write_list(f, conditions)?;
                write!(f, ")")
            }
            Condition::Not(inner) => write!(f, "not({})", inner),
            Condition::Strings(m) => {
                write!(f, "strings[{}](", combinator(m.all))?;
                write_list(f, &m.tokens)?;
                write!(f, ")")
            }
            Condition::Contains(tokens) => {
                write!(f, "contains(")?;
                write_list(f, tokens)?;
                write!(f, ")")
            }
            Condition::Forms(m) => {
                write!(f, "forms[{}](", combinator(m.all))?;
                write_list(f, &m.entries)?;
                write!(f, ")")
            }
            Condition::Level(range) => match (range.min, range.max) {
                (Some(min), Some(max)) => write!(f, "level({}..={})", min, max),
                (Some(min), None) => write!(f, "level(>={})", min),
                (None, Some(max)) => write!(f, "level(<={})", max),
                (None, None) => write!(f, "level(*)"),
            },
            Condition::Child(b) => write!(f, "child == {}", b),
            Condition::Leveled(b) => write!(f, "leveled == {}", b),
            Condition::ExclusiveWith(token) => write!(f, "exclusive_with({})", token),
        }
    }
}
