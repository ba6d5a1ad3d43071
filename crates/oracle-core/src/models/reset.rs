//! Reset procedure models

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Service;

/// Model value that makes a procedure apply to every model of its brand
pub const ALL_MODELS: &str = "All Models";

/// Step-by-step procedure to clear an alarm category on a controller family
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetProcedure {
    pub id: String,
    pub brand: String,
    /// Model, comma separated model list, or [`ALL_MODELS`]
    pub model: String,
    pub alarm_category: String,
    pub service: Service,
    pub method: ResetMethod,
    pub difficulty: Difficulty,
    pub requires_tools: IndexSet<String>,
    /// Conditions that must all hold before the first step
    pub preconditions: Vec<String>,
    /// Steps numbered 1..=n
    pub steps: Vec<ResetStep>,
    /// Issue → solution
    pub troubleshooting: IndexMap<String, String>,
    pub success_indicators: IndexSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A single operator action
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetStep {
    /// 1-based step number
    pub step: u32,
    pub instruction: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub key_sequence: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub menu_navigation: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub expected_result: String,
}

impl ResetProcedure {
    /// Whether this procedure covers `model`.
    ///
    /// Matches the wildcard model, or any entry of the comma separated model
    /// list ignoring case.
    pub fn applies_to_model(&self, model: &str) -> bool {
        if self.model.eq_ignore_ascii_case(ALL_MODELS) {
            return true;
        }
        let wanted = model.trim();
        self.model
            .split(',')
            .any(|m| m.trim().eq_ignore_ascii_case(wanted))
    }

    /// Classification key of this procedure
    pub fn key(&self) -> (&str, &str, &str) {
        (&self.brand, &self.model, &self.alarm_category)
    }
}

/// How a reset is carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResetMethod {
    Keypad,
    Software,
    Manual,
    Automatic,
}

impl ResetMethod {
    pub fn as_name(&self) -> &'static str {
        match self {
            ResetMethod::Keypad => "keypad",
            ResetMethod::Software => "software",
            ResetMethod::Manual => "manual",
            ResetMethod::Automatic => "automatic",
        }
    }
}

impl std::fmt::Display for ResetMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_name())
    }
}

impl std::str::FromStr for ResetMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keypad" => Ok(ResetMethod::Keypad),
            "software" => Ok(ResetMethod::Software),
            "manual" => Ok(ResetMethod::Manual),
            "automatic" | "auto" => Ok(ResetMethod::Automatic),
            _ => Err(format!("unknown reset method: '{}'", s)),
        }
    }
}

/// Operator skill needed for a procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Difficulty {
    Easy,
    Moderate,
    Advanced,
}

impl Difficulty {
    pub fn as_name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Moderate => "moderate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_name())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "moderate" => Ok(Difficulty::Moderate),
            "advanced" => Ok(Difficulty::Advanced),
            _ => Err(format!("unknown difficulty: '{}'", s)),
        }
    }
}

macro_rules! serde_by_name {
    ($($ty:ty),*) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.serialize_str(self.as_name())
                }
            }

            impl<'de> Deserialize<'de> for $ty {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    let s = String::deserialize(deserializer)?;
                    s.parse().map_err(serde::de::Error::custom)
                }
            }
        )*
    };
}

serde_by_name!(ResetMethod, Difficulty);
