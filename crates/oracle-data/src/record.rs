//! Catalog document format and record validation
//!
//! Documents are deserialized into permissive raw records (every field
//! optional, enumerations as strings) and then validated one by one. A
//! missing field, unknown enumeration value or misnumbered step list is
//! reported as a data integrity error naming the record's position and key.
//!
//! A value of the wrong shape, such as a string where a list is expected,
//! fails deserialization itself and surfaces as a YAML/JSON parse error. The
//! parser's message carries the field path (`faultCodes[1].symptoms`).

use indexmap::{IndexMap, IndexSet};
use oracle_core::{
    CatalogError, CatalogResult, Difficulty, FaultCodeEntry, ResetMethod, ResetProcedure,
    ResetStep, Service, Severity,
};
use serde::{Deserialize, Serialize};

/// Metadata about a catalog document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Top-level structure of a YAML/JSON catalog file
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    #[serde(default)]
    pub meta: Option<CatalogMeta>,
    #[serde(default)]
    pub fault_codes: Vec<FaultRecord>,
    #[serde(default)]
    pub reset_procedures: Vec<ResetRecord>,
    /// Where this document came from, used in error messages
    #[serde(skip)]
    pub source: Option<String>,
}

impl CatalogDocument {
    /// Parse a YAML (or JSON, which YAML accepts) document
    pub fn from_yaml(yaml: &str) -> CatalogResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a JSON document
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Tag the document with its origin
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Validate every record, failing on the first bad one
    pub fn into_records(self) -> CatalogResult<(Vec<FaultCodeEntry>, Vec<ResetProcedure>)> {
        let (faults, resets) = self.into_labeled_records()?;
        Ok((
            faults.into_iter().map(|l| l.value).collect(),
            resets.into_iter().map(|l| l.value).collect(),
        ))
    }

    /// Validate every record, keeping the label each one was authored under
    pub fn into_labeled_records(
        self,
    ) -> CatalogResult<(Vec<Labeled<FaultCodeEntry>>, Vec<Labeled<ResetProcedure>>)> {
        let prefix = self.source.map(|s| format!("{}: ", s)).unwrap_or_default();

        let faults = self
            .fault_codes
            .into_iter()
            .enumerate()
            .map(|(i, r)| {
                let label = r.label(&prefix, i);
                r.validate(&label).map(|value| Labeled { label, value })
            })
            .collect::<CatalogResult<Vec<_>>>()?;

        let resets = self
            .reset_procedures
            .into_iter()
            .enumerate()
            .map(|(i, r)| {
                let label = r.label(&prefix, i);
                r.validate(&label).map(|value| Labeled { label, value })
            })
            .collect::<CatalogResult<Vec<_>>>()?;

        Ok((faults, resets))
    }
}

/// A validated record with the source position it was read from,
/// e.g. `site.yaml: faultCodes[3] (Cummins / QSK60 / E-102)`
#[derive(Debug, Clone, PartialEq)]
pub struct Labeled<T> {
    pub label: String,
    pub value: T,
}

/// Unvalidated fault code record
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FaultRecord {
    pub code: Option<String>,
    pub service: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub issue: Option<String>,
    pub severity: Option<String>,
    pub category: Option<String>,
    pub symptoms: Vec<String>,
    pub causes: Vec<String>,
    pub solution: Option<String>,
    pub parts: Vec<String>,
    pub tools: Vec<String>,
}

impl FaultRecord {
    fn label(&self, prefix: &str, index: usize) -> String {
        format!(
            "{}faultCodes[{}] ({} / {} / {})",
            prefix,
            index,
            self.brand.as_deref().unwrap_or("?"),
            self.model.as_deref().unwrap_or("?"),
            self.code.as_deref().unwrap_or("?"),
        )
    }

    fn validate(self, record: &str) -> CatalogResult<FaultCodeEntry> {
        Ok(FaultCodeEntry {
            code: required(self.code, "code", record)?,
            service: enumerated::<Service>(self.service, "service", record)?,
            brand: required(self.brand, "brand", record)?,
            model: required(self.model, "model", record)?,
            issue: required(self.issue, "issue", record)?,
            severity: enumerated::<Severity>(self.severity, "severity", record)?,
            category: optional(self.category),
            symptoms: self.symptoms,
            causes: self.causes,
            solution: optional(self.solution),
            parts: self.parts,
            tools: self.tools,
        })
    }
}

/// Unvalidated reset procedure record
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResetRecord {
    pub id: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub alarm_category: Option<String>,
    pub service: Option<String>,
    pub method: Option<String>,
    pub difficulty: Option<String>,
    pub requires_tools: Vec<String>,
    pub preconditions: Vec<String>,
    pub steps: Vec<StepRecord>,
    pub troubleshooting: Vec<TroubleshootingRecord>,
    pub success_indicators: Vec<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StepRecord {
    pub step: Option<i64>,
    pub instruction: Option<String>,
    pub key_sequence: Vec<String>,
    pub menu_navigation: Vec<String>,
    pub timing: Option<String>,
    pub warning: Option<String>,
    pub expected_result: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TroubleshootingRecord {
    pub issue: Option<String>,
    pub solution: Option<String>,
}

impl ResetRecord {
    fn label(&self, prefix: &str, index: usize) -> String {
        format!(
            "{}resetProcedures[{}] ({})",
            prefix,
            index,
            self.id.as_deref().unwrap_or("?"),
        )
    }

    fn validate(self, record: &str) -> CatalogResult<ResetProcedure> {
        let id = required(self.id, "id", record)?;
        let brand = required(self.brand, "brand", record)?;
        let model = required(self.model, "model", record)?;
        let alarm_category = required(self.alarm_category, "alarmCategory", record)?;
        let service = match optional(self.service) {
            Some(s) => s
                .parse::<Service>()
                .map_err(|e| CatalogError::integrity(record, e))?,
            None => Service::Generator,
        };
        let method = enumerated::<ResetMethod>(self.method, "method", record)?;
        let difficulty = enumerated::<Difficulty>(self.difficulty, "difficulty", record)?;
        let steps = validate_steps(self.steps, record)?;

        let mut troubleshooting = IndexMap::new();
        for (i, entry) in self.troubleshooting.into_iter().enumerate() {
            let field = format!("troubleshooting[{}]", i);
            let issue = required(entry.issue, &format!("{}.issue", field), record)?;
            let solution = required(entry.solution, &format!("{}.solution", field), record)?;
            if troubleshooting.contains_key(&issue) {
                return Err(CatalogError::integrity(
                    record,
                    format!("duplicate troubleshooting issue '{}'", issue),
                ));
            }
            troubleshooting.insert(issue, solution);
        }

        Ok(ResetProcedure {
            id,
            brand,
            model,
            alarm_category,
            service,
            method,
            difficulty,
            requires_tools: self.requires_tools.into_iter().collect::<IndexSet<_>>(),
            preconditions: self.preconditions,
            steps,
            troubleshooting,
            success_indicators: self.success_indicators.into_iter().collect(),
            notes: optional(self.notes),
        })
    }
}

/// Steps must be numbered exactly 1..=n in order
fn validate_steps(steps: Vec<StepRecord>, record: &str) -> CatalogResult<Vec<ResetStep>> {
    if steps.is_empty() {
        return Err(CatalogError::integrity(record, "procedure has no steps"));
    }

    let numbers: Vec<Option<i64>> = steps.iter().map(|s| s.step).collect();
    let contiguous = numbers
        .iter()
        .enumerate()
        .all(|(i, n)| *n == Some(i as i64 + 1));
    if !contiguous {
        let found: Vec<String> = numbers
            .iter()
            .map(|n| n.map(|v| v.to_string()).unwrap_or_else(|| "?".to_string()))
            .collect();
        return Err(CatalogError::integrity(
            record,
            format!(
                "steps must be numbered 1..={} without gaps or repeats, found [{}]",
                steps.len(),
                found.join(", ")
            ),
        ));
    }

    steps
        .into_iter()
        .enumerate()
        .map(|(i, s)| -> CatalogResult<ResetStep> {
            let field = format!("steps[{}]", i);
            Ok(ResetStep {
                step: i as u32 + 1,
                instruction: required(s.instruction, &format!("{}.instruction", field), record)?,
                key_sequence: s.key_sequence,
                menu_navigation: s.menu_navigation,
                timing: optional(s.timing),
                warning: optional(s.warning),
                expected_result: required(
                    s.expected_result,
                    &format!("{}.expectedResult", field),
                    record,
                )?,
            })
        })
        .collect()
}

fn required(value: Option<String>, field: &str, record: &str) -> CatalogResult<String> {
    optional(value).ok_or_else(|| {
        CatalogError::integrity(record, format!("missing required field `{}`", field))
    })
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn enumerated<T>(value: Option<String>, field: &str, record: &str) -> CatalogResult<T>
where
    T: std::str::FromStr<Err = String>,
{
    required(value, field, record)?
        .parse::<T>()
        .map_err(|e| CatalogError::integrity(record, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PROCEDURE: &str = r#"
resetProcedures:
  - id: smartgen-hgm-reset
    brand: SmartGen
    model: HGM6100, HGM420, HGM5310
    alarmCategory: All Alarms
    method: keypad
    difficulty: easy
    requiresTools: [Multimeter, Multimeter]
    preconditions:
      - Engine stopped
      - Fault condition resolved
    steps:
      - step: 1
        instruction: Press STOP to ensure engine is off
        keySequence: [STOP]
        expectedResult: Engine stops
      - step: 2
        instruction: Press RESET button
        keySequence: [RESET]
        expectedResult: Fault indicator clears
    troubleshooting:
      - issue: Reset has no effect
        solution: Hold RESET for 3 seconds for latched faults
    successIndicators: [Fault LED off, Ready for start]
"#;

    fn steps_doc(numbers: &[i64]) -> String {
        let mut yaml = String::from(
            "resetProcedures:\n  - id: p1\n    brand: B\n    model: M\n    alarmCategory: C\n    method: manual\n    difficulty: easy\n",
        );
        if numbers.is_empty() {
            yaml.push_str("    steps: []\n");
        } else {
            yaml.push_str("    steps:\n");
        }
        for n in numbers {
            yaml.push_str(&format!(
                "      - step: {}\n        instruction: do {}\n        expectedResult: done\n",
                n, n
            ));
        }
        yaml
    }

    #[test]
    fn test_valid_procedure() {
        let (_, resets) = CatalogDocument::from_yaml(PROCEDURE)
            .unwrap()
            .into_records()
            .unwrap();
        let p = &resets[0];

        assert_eq!(p.service, Service::Generator);
        assert_eq!(p.method, ResetMethod::Keypad);
        assert_eq!(p.requires_tools.len(), 1);
        assert_eq!(p.steps.len(), 2);
        assert_eq!(p.steps[1].key_sequence, vec!["RESET".to_string()]);
        assert_eq!(
            p.troubleshooting.get("Reset has no effect").map(String::as_str),
            Some("Hold RESET for 3 seconds for latched faults")
        );
    }

    #[test]
    fn test_contiguous_steps_pass() {
        let doc = CatalogDocument::from_yaml(&steps_doc(&[1, 2, 3])).unwrap();
        let (_, resets) = doc.into_records().unwrap();
        assert_eq!(resets[0].steps.len(), 3);
    }

    #[test]
    fn test_step_gap_fails() {
        let doc = CatalogDocument::from_yaml(&steps_doc(&[1, 3])).unwrap();
        let err = doc.into_records().unwrap_err();
        assert!(err.is_integrity());
        assert!(err.to_string().contains("found [1, 3]"));
    }

    #[test]
    fn test_step_duplicate_fails() {
        let doc = CatalogDocument::from_yaml(&steps_doc(&[1, 1, 2])).unwrap();
        assert!(doc.into_records().unwrap_err().is_integrity());
    }

    #[test]
    fn test_no_steps_fails() {
        let doc = CatalogDocument::from_yaml(&steps_doc(&[])).unwrap();
        let err = doc.into_records().unwrap_err();
        assert!(err.to_string().contains("no steps"));
    }

    #[test]
    fn test_missing_field_names_record() {
        let yaml = r#"
faultCodes:
  - code: E-102
    service: generator
    brand: Cummins
    model: PowerCommand 3.3
    severity: critical
"#;
        let err = CatalogDocument::from_yaml(yaml)
            .unwrap()
            .with_source("cummins.yaml")
            .into_records()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "data integrity error in cummins.yaml: faultCodes[0] (Cummins / PowerCommand 3.3 / E-102): missing required field `issue`"
        );
    }

    #[test]
    fn test_unknown_service_fails() {
        let yaml = r#"
faultCodes:
  - code: H1
    service: hydro
    brand: X
    model: Y
    issue: Z
    severity: low
"#;
        let err = CatalogDocument::from_yaml(yaml)
            .unwrap()
            .into_records()
            .unwrap_err();
        assert!(err.is_integrity());
        assert!(err.to_string().contains("unknown service"));
    }

    #[test]
    fn test_duplicate_troubleshooting_issue_fails() {
        let yaml = steps_doc(&[1])
            + "    troubleshooting:\n      - issue: A\n        solution: B\n      - issue: A\n        solution: C\n";
        let err = CatalogDocument::from_yaml(&yaml)
            .unwrap()
            .into_records()
            .unwrap_err();
        assert!(err.to_string().contains("duplicate troubleshooting issue"));
    }

    #[test]
    fn test_json_document() {
        let json = r#"{
            "meta": {"name": "UPS codes"},
            "faultCodes": [{
                "code": "A01", "service": "ups", "brand": "APC", "model": "Smart-UPS",
                "issue": "Battery needs replacement", "severity": "medium"
            }]
        }"#;
        let doc = CatalogDocument::from_json(json).unwrap();
        assert_eq!(doc.meta.as_ref().and_then(|m| m.name.clone()), Some("UPS codes".into()));
        let (faults, _) = doc.into_records().unwrap();
        assert_eq!(faults[0].severity, Severity::Moderate);
        assert_eq!(faults[0].service, Service::Ups);
    }

    #[test]
    fn test_unquoted_numeric_code_loads_as_string() {
        let yaml = r#"
faultCodes:
  - code: 1045
    service: generator
    brand: Generac
    model: Evolution
    issue: Overcrank
    severity: critical
"#;
        let (faults, _) = CatalogDocument::from_yaml(yaml)
            .unwrap()
            .into_records()
            .unwrap();
        assert_eq!(faults[0].code, "1045");
    }

    #[test]
    fn test_wrong_shape_is_parse_error_with_field_path() {
        let yaml = r#"
faultCodes:
  - code: A1
    service: ups
    brand: APC
    model: X
    issue: Y
    severity: low
  - code: A2
    service: ups
    brand: APC
    model: X
    issue: Y
    severity: low
    symptoms: "beeping"
"#;
        let err = CatalogDocument::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, CatalogError::Yaml(_)));
        assert!(err.to_string().contains("faultCodes[1].symptoms"));
    }

    #[test]
    fn test_labels_carry_source_and_local_index() {
        let (faults, resets) = CatalogDocument::from_yaml(PROCEDURE)
            .unwrap()
            .with_source("smartgen.yaml")
            .into_labeled_records()
            .unwrap();
        assert!(faults.is_empty());
        assert_eq!(resets[0].label, "smartgen.yaml: resetProcedures[0] (smartgen-hgm-reset)");
        assert_eq!(resets[0].value.id, "smartgen-hgm-reset");
    }
}
