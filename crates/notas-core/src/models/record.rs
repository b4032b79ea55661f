//! Per-document extraction record.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use super::columns::*;

/// Outcome of extracting one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStatus {
    /// The document was read and the layout's rules were evaluated.
    Success,
    /// The document could not be opened or parsed.
    OpenError(String),
    /// No template is registered for the requested layout key.
    UnsupportedLayout,
}

impl ExecutionStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionStatus::Success)
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionStatus::Success => f.write_str("success"),
            ExecutionStatus::OpenError(detail) => write!(f, "open_error: {detail}"),
            ExecutionStatus::UnsupportedLayout => f.write_str("unsupported_layout"),
        }
    }
}

impl Serialize for ExecutionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Fields read from one document plus its status.
///
/// Absent fields have no entry; values are never empty strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionRecord {
    pub fields: BTreeMap<String, String>,
    pub status: ExecutionStatus,
    /// Which folder/municipality the document came from. Set by the caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_group: Option<String>,
}

impl ExtractionRecord {
    pub fn success(fields: BTreeMap<String, String>) -> Self {
        Self {
            fields,
            status: ExecutionStatus::Success,
            source_group: None,
        }
    }

    pub fn open_error(detail: impl Into<String>) -> Self {
        Self {
            fields: BTreeMap::new(),
            status: ExecutionStatus::OpenError(detail.into()),
            source_group: None,
        }
    }

    pub fn unsupported_layout() -> Self {
        Self {
            fields: BTreeMap::new(),
            status: ExecutionStatus::UnsupportedLayout,
            source_group: None,
        }
    }

    pub fn with_source_group(mut self, group: impl Into<String>) -> Self {
        self.source_group = Some(group.into());
        self
    }

    /// Extracted value of a field.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// The values a form-filling consumer types into the tax portal.
    pub fn form_feed(&self) -> FormFeed<'_> {
        FormFeed {
            cnpj_fornecedor: self.get(CNPJ_FORNECEDOR),
            serie: self.get(SERIE_NF),
            numero: self.get(NUMERO_NF),
            data_emissao: self.get(DATA_EMISSAO_NF),
            valor_bruto: self.get(VALOR_BRUTO),
            valor_retencao: self.get(VALOR_RETENCAO),
        }
    }
}

/// Borrowed view of the fields a form filler needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormFeed<'a> {
    pub cnpj_fornecedor: Option<&'a str>,
    pub serie: Option<&'a str>,
    pub numero: Option<&'a str>,
    pub data_emissao: Option<&'a str>,
    pub valor_bruto: Option<&'a str>,
    pub valor_retencao: Option<&'a str>,
}

impl FormFeed<'_> {
    /// True when every form field has a value.
    pub fn is_complete(&self) -> bool {
        [
            self.cnpj_fornecedor,
            self.serie,
            self.numero,
            self.data_emissao,
            self.valor_bruto,
            self.valor_retencao,
        ]
        .iter()
        .all(Option::is_some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_strings() {
        assert_eq!(ExecutionStatus::Success.to_string(), "success");
        assert_eq!(
            ExecutionStatus::OpenError("PDF has no pages".into()).to_string(),
            "open_error: PDF has no pages"
        );
        assert_eq!(
            ExecutionStatus::UnsupportedLayout.to_string(),
            "unsupported_layout"
        );
    }

    #[test]
    fn test_record_json_shape() {
        let record = ExtractionRecord::unsupported_layout().with_source_group("manaus");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["status"], "unsupported_layout");
        assert_eq!(json["source_group"], "manaus");
        assert!(json["fields"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_form_feed() {
        let mut fields = BTreeMap::new();
        fields.insert(NUMERO_NF.to_string(), "123".to_string());
        fields.insert(SERIE_NF.to_string(), "1".to_string());
        let record = ExtractionRecord::success(fields);
        let feed = record.form_feed();

        assert_eq!(feed.numero, Some("123"));
        assert_eq!(feed.valor_retencao, None);
        assert!(!feed.is_complete());
    }
}
