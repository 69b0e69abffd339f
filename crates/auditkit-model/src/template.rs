//! Template documents
//!
//! A template defines the shape of an audit sheet: header flags, the
//! dynamic info-field schema filled in per audit, the column schema the
//! sheet renders, and the default section tree new audits start from.

use crate::id;
use crate::section::SectionGroup;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Column ids every template must carry as group columns.
///
/// `section` and `stage` render with a row-span covering the checkpoints
/// they summarize ([`SectionGroup::checkpoint_count`] /
/// [`crate::StageGroup::len`]).
pub const RESERVED_GROUP_COLUMNS: [&str; 2] = ["section", "stage"];

/// Header rendering flags plus their default values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderConfig {
    /// Render the format-number cell
    #[serde(default = "default_true")]
    pub show_format_no: bool,
    /// Render the revision-number cell
    #[serde(default = "default_true")]
    pub show_rev_no: bool,
    /// Render the revision-date cell
    #[serde(default = "default_true")]
    pub show_rev_date: bool,
    /// Default format number
    #[serde(default)]
    pub format_no: String,
    /// Default revision number
    #[serde(default)]
    pub rev_no: String,
    /// Default revision date
    #[serde(default)]
    pub rev_date: String,
}

fn default_true() -> bool {
    true
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            show_format_no: true,
            show_rev_no: true,
            show_rev_date: true,
            format_no: String::new(),
            rev_no: String::new(),
            rev_date: String::new(),
        }
    }
}

/// Input widget type for an info field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InfoFieldType {
    /// Free text
    Text,
    /// Calendar date
    Date,
    /// One of a fixed option list
    Select,
    /// Numeric entry
    Number,
    /// Time of day
    Time,
}

/// One header info field (serial number, shift, line, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoField {
    /// Field identifier, the key into an audit's info data
    pub id: String,
    /// Display label
    pub name: String,
    /// Input widget type
    #[serde(rename = "type")]
    pub field_type: InfoFieldType,
    /// Whether a value must be entered
    #[serde(default)]
    pub required: bool,
    /// Whether the field renders
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Option list for `select` fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl InfoField {
    /// Create a visible, optional field.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, field_type: InfoFieldType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            field_type,
            required: false,
            visible: true,
            options: None,
        }
    }

    /// Mark required
    #[inline]
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Cell content type of a sheet column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Plain text cell
    Text,
    /// Numeric cell
    Number,
    /// Status badge cell
    Status,
    /// Date cell
    Date,
    /// Evidence image cell
    Image,
}

/// One column of the audit sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    /// Column identifier
    pub id: String,
    /// Display label
    pub name: String,
    /// Whether the column renders
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Whether an entry is mandatory
    #[serde(default)]
    pub required: bool,
    /// Render width in pixels, when fixed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Cell content type
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Checkpoint field this column reads/writes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_field: Option<String>,
    /// Whether the column spans the rows of its group
    #[serde(default)]
    pub is_group_column: bool,
}

impl ColumnDef {
    /// Create a visible data column bound to a checkpoint field.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        column_type: ColumnType,
        entry_field: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            visible: true,
            required: false,
            width: None,
            column_type,
            entry_field: Some(entry_field.into()),
            is_group_column: false,
        }
    }

    /// Create a required group column (`section` / `stage`).
    #[must_use]
    pub fn group(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            visible: true,
            required: true,
            width: None,
            column_type: ColumnType::Text,
            entry_field: None,
            is_group_column: true,
        }
    }
}

/// Named, versioned audit-sheet definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDocument {
    /// `template_<millis>` identifier
    pub id: String,
    /// Template name (non-empty)
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Grouping category
    #[serde(default)]
    pub category: String,
    /// Template revision label
    #[serde(default)]
    pub version: String,
    /// Whether new audits may be created from it
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Header flags and defaults
    #[serde(default)]
    pub header_config: HeaderConfig,
    /// Dynamic info-field schema
    #[serde(default, deserialize_with = "crate::serde_util::null_to_default")]
    pub info_fields: Vec<InfoField>,
    /// Sheet column schema
    #[serde(default, deserialize_with = "crate::serde_util::null_to_default")]
    pub columns: Vec<ColumnDef>,
    /// Section tree new audits start from
    #[serde(default, deserialize_with = "crate::serde_util::null_to_default")]
    pub default_sections: Vec<SectionGroup>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl TemplateDocument {
    /// Create a template with the standard column set and fresh timestamps.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id::template_id(),
            name: name.into(),
            description: String::new(),
            category: String::new(),
            version: "1.0".to_string(),
            is_active: true,
            header_config: HeaderConfig::default(),
            info_fields: Vec::new(),
            columns: Self::standard_columns(),
            default_sections: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// With category
    #[inline]
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// With an info field appended
    #[inline]
    #[must_use]
    pub fn with_info_field(mut self, field: InfoField) -> Self {
        self.info_fields.push(field);
        self
    }

    /// With a default section appended
    #[inline]
    #[must_use]
    pub fn with_section(mut self, section: SectionGroup) -> Self {
        self.default_sections.push(section);
        self
    }

    /// The column set every new template starts from.
    ///
    /// Leads with the reserved `section`/`stage` group columns followed by
    /// the standard checkpoint entry columns.
    #[must_use]
    pub fn standard_columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::group("section", "Section"),
            ColumnDef::group("stage", "Stage"),
            ColumnDef::new("checkPoint", "Check Point", ColumnType::Text, "checkPoint"),
            ColumnDef::new("method", "Method", ColumnType::Text, "method"),
            ColumnDef::new(
                "specification",
                "Specification",
                ColumnType::Text,
                "specification",
            ),
            ColumnDef::new(
                "observation",
                "Observation",
                ColumnType::Text,
                "observation",
            ),
            ColumnDef::new("status", "Status", ColumnType::Status, "status"),
        ]
    }

    /// Whether both reserved group columns are present and well-formed.
    #[must_use]
    pub fn has_reserved_group_columns(&self) -> bool {
        RESERVED_GROUP_COLUMNS.iter().all(|reserved| {
            self.columns
                .iter()
                .any(|c| c.id == *reserved && c.is_group_column && c.required)
        })
    }

    /// Upgrade any legacy default sections to the staged schema in place.
    pub fn normalize_sections(&mut self) {
        for section in &mut self.default_sections {
            section.normalize();
        }
    }

    /// Refresh the modification timestamp.
    #[inline]
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
