//! Template CRUD
//!
//! Every mutation is read-all → modify-in-memory → write-all against the
//! `audit_templates` collection. Legacy flat-checkpoint sections are
//! upgraded on load; the stored form is only rewritten when the document
//! is next saved.

use crate::error::AuditError;
use auditkit_model::{
    template_id, ColumnDef, HeaderConfig, InfoField, SectionGroup, TemplateDocument,
};
use auditkit_store::{CollectionKind, DocumentStore};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Partial update for a template; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePatch {
    /// New name (must be non-empty when present)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// New revision label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Activate/deactivate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// Replace header config
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_config: Option<HeaderConfig>,
    /// Replace info-field schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_fields: Option<Vec<InfoField>>,
    /// Replace column schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<ColumnDef>>,
    /// Replace default sections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sections: Option<Vec<SectionGroup>>,
}

impl TemplatePatch {
    fn apply(self, template: &mut TemplateDocument) {
        if let Some(name) = self.name {
            template.name = name;
        }
        if let Some(description) = self.description {
            template.description = description;
        }
        if let Some(category) = self.category {
            template.category = category;
        }
        if let Some(version) = self.version {
            template.version = version;
        }
        if let Some(is_active) = self.is_active {
            template.is_active = is_active;
        }
        if let Some(header_config) = self.header_config {
            template.header_config = header_config;
        }
        if let Some(info_fields) = self.info_fields {
            template.info_fields = info_fields;
        }
        if let Some(columns) = self.columns {
            template.columns = columns;
        }
        if let Some(default_sections) = self.default_sections {
            template.default_sections = default_sections;
        }
    }
}

/// CRUD over the template collection.
#[derive(Debug)]
pub struct TemplateService {
    store: Arc<DocumentStore>,
}

impl TemplateService {
    /// Create a service over a store.
    #[inline]
    #[must_use]
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// All templates, legacy sections upgraded in the returned copies.
    ///
    /// # Errors
    /// Returns an error when the backend fails.
    pub fn list(&self) -> Result<Vec<TemplateDocument>, AuditError> {
        let mut templates: Vec<TemplateDocument> =
            self.store.load_all(CollectionKind::Templates)?;
        for template in &mut templates {
            template.normalize_sections();
        }
        Ok(templates)
    }

    /// One template by id.
    ///
    /// # Errors
    /// `NotFound` when no template has the id; backend errors propagate.
    pub fn get(&self, id: &str) -> Result<TemplateDocument, AuditError> {
        self.list()?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| AuditError::not_found(CollectionKind::Templates, id))
    }

    /// Persist a new template.
    ///
    /// Assigns a fresh id and sets both timestamps to now, whatever the
    /// draft carried.
    ///
    /// # Errors
    /// `Validation` when the name is empty; backend errors propagate.
    pub fn create(&self, mut template: TemplateDocument) -> Result<TemplateDocument, AuditError> {
        if template.name.trim().is_empty() {
            return Err(AuditError::validation("template name must not be empty"));
        }
        let now = Utc::now();
        template.id = template_id();
        template.created_at = now;
        template.updated_at = now;

        let mut templates: Vec<TemplateDocument> =
            self.store.load_all(CollectionKind::Templates)?;
        templates.push(template.clone());
        self.store.save_all(CollectionKind::Templates, &templates)?;
        tracing::info!(id = %template.id, name = %template.name, "template created");
        Ok(template)
    }

    /// Merge a patch onto a template and refresh its `updated_at`.
    ///
    /// # Errors
    /// `NotFound` for an unknown id, `Validation` for an empty patched
    /// name; backend errors propagate.
    pub fn update(&self, id: &str, patch: TemplatePatch) -> Result<TemplateDocument, AuditError> {
        if patch
            .name
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(AuditError::validation("template name must not be empty"));
        }

        let mut templates: Vec<TemplateDocument> =
            self.store.load_all(CollectionKind::Templates)?;
        let template = templates
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AuditError::not_found(CollectionKind::Templates, id))?;

        patch.apply(template);
        template.touch();
        let updated = template.clone();
        self.store.save_all(CollectionKind::Templates, &templates)?;
        tracing::debug!(id = %id, "template updated");
        Ok(updated)
    }

    /// Delete a template.
    ///
    /// Audits created from it keep their denormalized copy, so no cascade
    /// runs; their `template_id` is left dangling on purpose.
    ///
    /// # Errors
    /// `NotFound` for an unknown id; backend errors propagate.
    pub fn delete(&self, id: &str) -> Result<(), AuditError> {
        let mut templates: Vec<TemplateDocument> =
            self.store.load_all(CollectionKind::Templates)?;
        let before = templates.len();
        templates.retain(|t| t.id != id);
        if templates.len() == before {
            return Err(AuditError::not_found(CollectionKind::Templates, id));
        }
        self.store.save_all(CollectionKind::Templates, &templates)?;
        tracing::info!(id = %id, "template deleted");
        Ok(())
    }

    /// Deep-clone a template under a fresh id and " (Copy)" name.
    ///
    /// # Errors
    /// `NotFound` for an unknown source id; backend errors propagate.
    pub fn duplicate(&self, id: &str) -> Result<TemplateDocument, AuditError> {
        let mut templates: Vec<TemplateDocument> =
            self.store.load_all(CollectionKind::Templates)?;
        let source = templates
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| AuditError::not_found(CollectionKind::Templates, id))?;

        let now = Utc::now();
        let mut copy = source.clone();
        copy.id = template_id();
        copy.name = format!("{} (Copy)", source.name);
        copy.created_at = now;
        copy.updated_at = now;

        templates.push(copy.clone());
        self.store.save_all(CollectionKind::Templates, &templates)?;
        tracing::info!(source = %id, copy = %copy.id, "template duplicated");
        Ok(copy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auditkit_model::{CheckpointRecord, SectionGroup};
    use auditkit_store::{MemoryBackend, StorageBackend};

    fn service() -> TemplateService {
        TemplateService::new(Arc::new(DocumentStore::in_memory()))
    }

    #[test]
    fn create_assigns_id_and_timestamps() {
        let svc = service();
        let created = svc.create(TemplateDocument::new("Safety Check")).unwrap();
        assert!(created.id.starts_with("template_"));
        assert!(created.is_active);
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(svc.list().unwrap().len(), 1);
    }

    #[test]
    fn create_rejects_empty_name() {
        let svc = service();
        let err = svc.create(TemplateDocument::new("  ")).unwrap_err();
        assert!(matches!(err, AuditError::Validation(_)));
        assert!(svc.list().unwrap().is_empty());
    }

    #[test]
    fn update_merges_and_touches() {
        let svc = service();
        let created = svc.create(TemplateDocument::new("Safety Check")).unwrap();
        let updated = svc
            .update(
                &created.id,
                TemplatePatch {
                    description: Some("rev B".to_string()),
                    ..TemplatePatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Safety Check");
        assert_eq!(updated.description, "rev B");
        assert!(updated.updated_at >= created.updated_at);
    }

    #[test]
    fn update_of_unknown_id_is_not_found() {
        let err = service()
            .update("template_0", TemplatePatch::default())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn update_rejects_empty_patched_name() {
        let svc = service();
        let created = svc.create(TemplateDocument::new("Safety Check")).unwrap();
        let err = svc
            .update(
                &created.id,
                TemplatePatch {
                    name: Some(String::new()),
                    ..TemplatePatch::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, AuditError::Validation(_)));
    }

    #[test]
    fn delete_of_unknown_id_is_not_found() {
        assert!(service().delete("template_0").unwrap_err().is_not_found());
    }

    #[test]
    fn duplicate_clones_under_copy_name() {
        let svc = service();
        let created = svc
            .create(TemplateDocument::new("Safety Check").with_category("assembly"))
            .unwrap();
        let copy = svc.duplicate(&created.id).unwrap();

        assert_ne!(copy.id, created.id);
        assert_eq!(copy.name, "Safety Check (Copy)");
        assert_eq!(copy.category, "assembly");
        assert_eq!(svc.list().unwrap().len(), 2);
    }

    #[test]
    fn duplicate_of_unknown_id_is_not_found() {
        assert!(service().duplicate("template_0").unwrap_err().is_not_found());
    }

    #[test]
    fn legacy_sections_migrate_on_load_but_not_on_disk() {
        let backend = MemoryBackend::new();
        backend
            .write(
                "audit_templates",
                r#"[{
                    "id": "template_1",
                    "name": "Old",
                    "defaultSections": [
                        {"id": "s1", "sectionName": "A",
                         "checkPoints": [{"id": "cp1", "checkPoint": "x"}]}
                    ],
                    "createdAt": "2023-01-01T00:00:00Z",
                    "updatedAt": "2023-01-01T00:00:00Z"
                }]"#,
            )
            .unwrap();
        let svc = TemplateService::new(Arc::new(DocumentStore::new(Box::new(backend))));

        let loaded = svc.list().unwrap();
        assert!(!loaded[0].default_sections[0].is_legacy());

        // Nothing was written back: a reload sees the legacy shape again
        // until an explicit save.
        let raw: Vec<serde_json::Value> = svc
            .store
            .load_all(CollectionKind::Templates)
            .unwrap();
        assert!(raw[0]["defaultSections"][0].get("stages").is_none());
    }

    #[test]
    fn explicit_save_persists_migrated_shape() {
        let svc = service();
        let legacy_section = SectionGroup::legacy(
            "s1",
            "A",
            vec![CheckpointRecord::new("cp1", "x")],
        );
        let created = svc
            .create(TemplateDocument::new("Old").with_section(legacy_section))
            .unwrap();

        let loaded = svc.get(&created.id).unwrap();
        svc.update(
            &created.id,
            TemplatePatch {
                default_sections: Some(loaded.default_sections),
                ..TemplatePatch::default()
            },
        )
        .unwrap();

        let raw: Vec<serde_json::Value> = svc
            .store
            .load_all(CollectionKind::Templates)
            .unwrap();
        assert!(raw[0]["defaultSections"][0].get("stages").is_some());
    }
}
