//! Fault code models

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Service;

/// A manufacturer fault code for a controller family
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaultCodeEntry {
    /// Fault code as shown on the controller ("E-102", "SPN 100 FMI 1")
    pub code: String,
    /// Equipment service category
    pub service: Service,
    /// Controller manufacturer
    pub brand: String,
    /// Controller model or product line
    pub model: String,
    /// Human-readable description of the malfunction
    pub issue: String,
    /// Severity level
    pub severity: Severity,
    /// Subsystem grouping ("Engine", "Mains", ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub symptoms: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
    /// Recommended fix
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
}

impl FaultCodeEntry {
    /// Create an entry with the required fields only
    pub fn new(
        code: impl Into<String>,
        service: Service,
        brand: impl Into<String>,
        model: impl Into<String>,
        issue: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            code: code.into(),
            service,
            brand: brand.into(),
            model: model.into(),
            issue: issue.into(),
            severity,
            category: None,
            symptoms: Vec::new(),
            causes: Vec::new(),
            solution: None,
            parts: Vec::new(),
            tools: Vec::new(),
        }
    }

    /// Add a category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Add a recommended solution
    pub fn with_solution(mut self, solution: impl Into<String>) -> Self {
        self.solution = Some(solution.into());
        self
    }

    /// Unique key of this entry within the store
    pub fn key(&self) -> FaultKey<'_> {
        FaultKey {
            brand: &self.brand,
            model: &self.model,
            code: &self.code,
        }
    }
}

/// Borrowed `(brand, model, code)` key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaultKey<'a> {
    pub brand: &'a str,
    pub model: &'a str,
    pub code: &'a str,
}

impl std::fmt::Display for FaultKey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {} / {}", self.brand, self.model, self.code)
    }
}

/// Fault severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Moderate,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Low, Severity::Moderate, Severity::Critical];

    pub fn as_name(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_name())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "moderate" | "medium" => Ok(Severity::Moderate),
            "critical" => Ok(Severity::Critical),
            _ => Err(format!("unknown severity: '{}'", s)),
        }
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_name())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Counts over the fault store
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaultStats {
    pub total: usize,
    /// Brand → count, in first-seen order
    pub by_brand: IndexMap<String, usize>,
    pub by_severity: IndexMap<Severity, usize>,
    pub by_service: IndexMap<Service, usize>,
    /// Category → count; uncategorized entries are left out
    pub by_category: IndexMap<String, usize>,
}

impl FaultStats {
    /// Tally a sequence of entries
    pub fn collect<'a>(entries: impl IntoIterator<Item = &'a FaultCodeEntry>) -> Self {
        let mut stats = FaultStats::default();
        for entry in entries {
            stats.total += 1;
            *stats.by_brand.entry(entry.brand.clone()).or_insert(0) += 1;
            *stats.by_severity.entry(entry.severity).or_insert(0) += 1;
            *stats.by_service.entry(entry.service).or_insert(0) += 1;
            if let Some(category) = &entry.category {
                *stats.by_category.entry(category.clone()).or_insert(0) += 1;
            }
        }
        stats
    }
}
