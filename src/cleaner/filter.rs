// file: src/cleaner/filter.rs
// description: configuration-driven record filtering predicates
// reference: internal pipeline rules

use crate::config::FilterConfig;
use crate::models::SourceRecord;
use std::collections::HashSet;

/// Why a record was rejected. Used for debug logging only; the pipeline
/// treats every rejection the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    UrlSuffix,
    TypeNotAllowed,
    EmptyBody,
    NotXml,
}

/// Pure predicate over one record. Every configured check must pass for the
/// record to proceed; disabled checks always pass.
pub struct RecordFilter {
    skip_suffixes: Vec<String>,
    allowed_types: HashSet<String>,
    drop_empty: bool,
    require_xml: bool,
}

impl RecordFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            skip_suffixes: config
                .skip_suffixes
                .iter()
                .map(|s| s.to_lowercase())
                .collect(),
            allowed_types: config.allowed_types.into_iter().collect(),
            drop_empty: config.drop_empty,
            require_xml: config.require_xml,
        }
    }

    pub fn accept(&self, record: &SourceRecord) -> bool {
        self.rejection(record).is_none()
    }

    pub fn rejection(&self, record: &SourceRecord) -> Option<RejectReason> {
        if let Some(url) = record.url.as_deref() {
            let url_lower = url.to_lowercase();
            if self
                .skip_suffixes
                .iter()
                .any(|suffix| url_lower.ends_with(suffix))
            {
                return Some(RejectReason::UrlSuffix);
            }
        }

        if !self.allowed_types.is_empty()
            && let Some(document_type) = record.document_type.as_deref()
            && !document_type.is_empty()
            && !self.allowed_types.contains(document_type)
        {
            return Some(RejectReason::TypeNotAllowed);
        }

        let body = record.body().trim();

        if self.drop_empty && body.is_empty() {
            return Some(RejectReason::EmptyBody);
        }

        if self.require_xml && !body.is_empty() && !body.starts_with('<') {
            return Some(RejectReason::NotXml);
        }

        None
    }
}
