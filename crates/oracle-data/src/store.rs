//! Immutable record stores
//!
//! Both stores are built once from validated records and never change.
//! Every accessor takes `&self`, so a store can be shared across threads
//! without locking.

use std::collections::HashMap;

use oracle_core::{
    filter, CatalogError, CatalogResult, FaultCodeEntry, FaultQuery, FaultStats, ResetProcedure,
    ResetQuery, Service,
};

use crate::record::Labeled;

type Key = (String, String, String);

fn key(a: &str, b: &str, c: &str) -> Key {
    (a.to_string(), b.to_string(), c.to_string())
}

/// Fault code records in authoring order, indexed by `(brand, model, code)`
#[derive(Debug, Default)]
pub struct FaultStore {
    entries: Vec<FaultCodeEntry>,
    index: HashMap<Key, usize>,
}

impl FaultStore {
    /// Build the store, rejecting duplicate keys
    pub fn new(entries: Vec<FaultCodeEntry>) -> CatalogResult<Self> {
        Self::from_labeled(
            entries
                .into_iter()
                .enumerate()
                .map(|(i, value)| Labeled {
                    label: format!("faultCodes[{}] ({})", i, value.key()),
                    value,
                })
                .collect(),
        )
    }

    /// Build the store from records that remember where they were authored,
    /// so a duplicate is reported against both source positions
    pub fn from_labeled(records: Vec<Labeled<FaultCodeEntry>>) -> CatalogResult<Self> {
        let mut index = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            let entry = &record.value;
            let k = key(&entry.brand, &entry.model, &entry.code);
            if let Some(first) = index.insert(k, i) {
                return Err(CatalogError::integrity(
                    record.label.as_str(),
                    format!("duplicate key, first defined at {}", records[first].label),
                ));
            }
        }
        let entries = records.into_iter().map(|r| r.value).collect();
        Ok(Self { entries, index })
    }

    /// Every entry, in authoring order
    pub fn load_all(&self) -> &[FaultCodeEntry] {
        &self.entries
    }

    /// Entries for one service, in authoring order
    pub fn by_service(&self, service: Service) -> Vec<&FaultCodeEntry> {
        self.entries
            .iter()
            .filter(|e| e.service == service)
            .collect()
    }

    /// Exact lookup by key
    pub fn get(&self, brand: &str, model: &str, code: &str) -> Option<&FaultCodeEntry> {
        self.index
            .get(&key(brand, model, code))
            .map(|&i| &self.entries[i])
    }

    /// Distinct brands in first-seen order
    pub fn brands(&self) -> Vec<&str> {
        let mut brands: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !brands.contains(&entry.brand.as_str()) {
                brands.push(&entry.brand);
            }
        }
        brands
    }

    pub fn stats(&self) -> FaultStats {
        FaultStats::collect(&self.entries)
    }

    pub fn search(&self, query: &FaultQuery) -> Vec<&FaultCodeEntry> {
        filter(&self.entries, query)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reset procedures in authoring order, indexed by id and by
/// `(brand, model, alarmCategory)`
#[derive(Debug, Default)]
pub struct ResetStore {
    procedures: Vec<ResetProcedure>,
    by_key: HashMap<Key, usize>,
    by_id: HashMap<String, usize>,
}

impl ResetStore {
    /// Build the store, rejecting duplicate ids and duplicate keys
    pub fn new(procedures: Vec<ResetProcedure>) -> CatalogResult<Self> {
        Self::from_labeled(
            procedures
                .into_iter()
                .enumerate()
                .map(|(i, value)| Labeled {
                    label: format!("resetProcedures[{}] ({})", i, value.id),
                    value,
                })
                .collect(),
        )
    }

    /// Build the store from records labeled with their source position
    pub fn from_labeled(records: Vec<Labeled<ResetProcedure>>) -> CatalogResult<Self> {
        let mut by_key = HashMap::with_capacity(records.len());
        let mut by_id = HashMap::with_capacity(records.len());

        for (i, record) in records.iter().enumerate() {
            let p = &record.value;
            if let Some(first) = by_id.insert(p.id.clone(), i) {
                return Err(CatalogError::integrity(
                    record.label.as_str(),
                    format!("duplicate id, first defined at {}", records[first].label),
                ));
            }
            if let Some(first) = by_key.insert(key(&p.brand, &p.model, &p.alarm_category), i) {
                return Err(CatalogError::integrity(
                    record.label.as_str(),
                    format!(
                        "duplicate key ({} / {} / {}), first defined at {}",
                        p.brand, p.model, p.alarm_category, records[first].label
                    ),
                ));
            }
        }

        Ok(Self {
            procedures: records.into_iter().map(|r| r.value).collect(),
            by_key,
            by_id,
        })
    }

    /// Every procedure, in authoring order
    pub fn load_all(&self) -> &[ResetProcedure] {
        &self.procedures
    }

    /// Exact match on the classification key
    pub fn find(&self, brand: &str, model: &str, alarm_category: &str) -> Option<&ResetProcedure> {
        self.by_key
            .get(&key(brand, model, alarm_category))
            .map(|&i| &self.procedures[i])
    }

    pub fn by_id(&self, id: &str) -> Option<&ResetProcedure> {
        self.by_id.get(id).map(|&i| &self.procedures[i])
    }

    /// All procedures of a brand, in authoring order
    pub fn by_brand(&self, brand: &str) -> Vec<&ResetProcedure> {
        self.procedures.iter().filter(|p| p.brand == brand).collect()
    }

    /// Procedures of `brand` that cover `model`, including brand-wide ones
    pub fn applicable_to(&self, brand: &str, model: &str) -> Vec<&ResetProcedure> {
        self.procedures
            .iter()
            .filter(|p| p.brand == brand && p.applies_to_model(model))
            .collect()
    }

    pub fn search(&self, query: &ResetQuery) -> Vec<&ResetProcedure> {
        filter(&self.procedures, query)
    }

    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }
}
