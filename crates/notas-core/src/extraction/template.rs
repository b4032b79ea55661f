//! Templates: the rule set for one invoice layout.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::rule::{AnchorRule, RuleTrace};
use crate::error::TemplateError;
use crate::page::TextPage;

/// Ordered anchor rules plus constant fields for one layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Layout identifier, e.g. a municipality.
    pub layout_key: String,
    #[serde(default)]
    pub description: String,
    pub rules: Vec<AnchorRule>,
    /// Fields with no geometric source.
    #[serde(default)]
    pub static_fields: BTreeMap<String, String>,
}

impl Template {
    pub fn new(layout_key: impl Into<String>) -> Self {
        Self {
            layout_key: layout_key.into(),
            description: String::new(),
            rules: Vec::new(),
            static_fields: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_rule(mut self, rule: AnchorRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_static(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.static_fields.insert(field.into(), value.into());
        self
    }

    /// Check that rule fields are unique and disjoint from static fields.
    pub fn validate(&self) -> Result<(), TemplateError> {
        let mut seen = HashSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.field.as_str()) {
                return Err(TemplateError::DuplicateField {
                    layout: self.layout_key.clone(),
                    field: rule.field.clone(),
                });
            }
        }
        if let Some(field) = self.static_fields.keys().find(|f| seen.contains(f.as_str())) {
            return Err(TemplateError::FieldCollision {
                layout: self.layout_key.clone(),
                field: field.clone(),
            });
        }
        Ok(())
    }

    /// Evaluate every rule, then add the static fields.
    ///
    /// Rules are independent: a missing anchor leaves only its own field unset.
    pub fn apply<P: TextPage + ?Sized>(&self, page: &P) -> BTreeMap<String, String> {
        let mut fields = BTreeMap::new();

        for rule in &self.rules {
            match rule.evaluate(page) {
                Some(value) => {
                    fields.insert(rule.field.clone(), value);
                }
                None if rule.required => {
                    warn!("{}: required field '{}' not found", self.layout_key, rule.field);
                }
                None => {
                    debug!("{}: field '{}' not found", self.layout_key, rule.field);
                }
            }
        }

        for (field, value) in &self.static_fields {
            fields.insert(field.clone(), value.clone());
        }

        fields
    }

    /// Trace every rule without building a record.
    pub fn trace<P: TextPage + ?Sized>(&self, page: &P) -> Vec<RuleTrace> {
        self.rules.iter().map(|rule| rule.trace(page)).collect()
    }

    /// Every field this template can produce, rules first.
    pub fn field_names(&self) -> Vec<&str> {
        self.rules
            .iter()
            .map(|r| r.field.as_str())
            .chain(self.static_fields.keys().map(String::as_str))
            .collect()
    }
}
