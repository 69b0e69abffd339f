//! Section trees
//!
//! A section groups checkpoints for one area of an audit sheet. The current
//! schema nests them as section → stage → checkpoint; documents written
//! before stages existed hold a flat `checkPoints` list directly on the
//! section. Both shapes deserialize; [`SectionGroup::normalize`] upgrades a
//! legacy section in memory (the stored form is only rewritten on the next
//! explicit save).
//!
//! # Invariants
//! - A stage always holds at least one checkpoint; removing the last one is
//!   a no-op.
//! - A normalized section always holds at least one stage; same rule.
//! - When both `stages` and legacy `checkPoints` are present, `stages` wins.

use crate::id;
use crate::status::CheckpointStatus;
use serde::{Deserialize, Serialize};

/// One inspectable item on an audit sheet.
///
/// `check_point`, `method` and `specification` come from the template and
/// are fixed once the record exists; `observation`, `remark`, `image` and
/// `status` are filled in at audit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointRecord {
    /// Unique within the owning stage
    pub id: String,
    /// What is being inspected
    #[serde(default)]
    pub check_point: String,
    /// How it is inspected
    #[serde(default)]
    pub method: String,
    /// Acceptance criteria
    #[serde(default)]
    pub specification: String,
    /// Recorded measurement or finding
    #[serde(default)]
    pub observation: String,
    /// Free-form auditor note
    #[serde(default)]
    pub remark: String,
    /// Optional evidence image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Inspection outcome
    #[serde(default)]
    pub status: CheckpointStatus,
}

impl CheckpointRecord {
    /// Create a checkpoint with template-defined fields.
    #[must_use]
    pub fn new(id: impl Into<String>, check_point: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            check_point: check_point.into(),
            method: String::new(),
            specification: String::new(),
            observation: String::new(),
            remark: String::new(),
            image: None,
            status: CheckpointStatus::Pending,
        }
    }

    /// With inspection method
    #[inline]
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// With acceptance specification
    #[inline]
    #[must_use]
    pub fn with_specification(mut self, specification: impl Into<String>) -> Self {
        self.specification = specification.into();
        self
    }

    /// With inspection outcome
    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: CheckpointStatus) -> Self {
        self.status = status;
        self
    }
}

/// Ordered checkpoints under a named stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageGroup {
    /// Stage identifier
    pub id: String,
    /// Display name
    #[serde(default)]
    pub stage_name: String,
    /// Checkpoints, in sheet order (never empty)
    #[serde(default, deserialize_with = "crate::serde_util::null_to_default")]
    pub check_points: Vec<CheckpointRecord>,
}

impl StageGroup {
    /// Create a stage around an initial checkpoint list.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        stage_name: impl Into<String>,
        check_points: Vec<CheckpointRecord>,
    ) -> Self {
        Self {
            id: id.into(),
            stage_name: stage_name.into(),
            check_points,
        }
    }

    /// Number of checkpoints in this stage.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.check_points.len()
    }

    /// Whether the stage holds no checkpoints.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.check_points.is_empty()
    }

    /// Append a checkpoint.
    pub fn add_checkpoint(&mut self, checkpoint: CheckpointRecord) {
        self.check_points.push(checkpoint);
    }

    /// Remove a checkpoint by id.
    ///
    /// A stage keeps at least one checkpoint: removing the last remaining
    /// one is a no-op. Returns whether a checkpoint was removed.
    pub fn remove_checkpoint(&mut self, checkpoint_id: &str) -> bool {
        if self.check_points.len() <= 1 {
            return false;
        }
        let before = self.check_points.len();
        self.check_points.retain(|c| c.id != checkpoint_id);
        self.check_points.len() < before
    }

    /// Mutable lookup by checkpoint id.
    pub fn checkpoint_mut(&mut self, checkpoint_id: &str) -> Option<&mut CheckpointRecord> {
        self.check_points.iter_mut().find(|c| c.id == checkpoint_id)
    }
}

/// Ordered stages under a named section.
///
/// Legacy documents store checkpoints directly on the section; see module
/// docs for the migration rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionGroup {
    /// Section identifier
    pub id: String,
    /// Display name
    #[serde(default)]
    pub section_name: String,
    /// Stages (current schema); `None` marks a legacy section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stages: Option<Vec<StageGroup>>,
    /// Flat checkpoints (legacy schema)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_points: Option<Vec<CheckpointRecord>>,
}

impl SectionGroup {
    /// Create a section in the current (staged) schema.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        section_name: impl Into<String>,
        stages: Vec<StageGroup>,
    ) -> Self {
        Self {
            id: id.into(),
            section_name: section_name.into(),
            stages: Some(stages),
            check_points: None,
        }
    }

    /// Create a section in the legacy flat schema (tests / migration).
    #[must_use]
    pub fn legacy(
        id: impl Into<String>,
        section_name: impl Into<String>,
        check_points: Vec<CheckpointRecord>,
    ) -> Self {
        Self {
            id: id.into(),
            section_name: section_name.into(),
            stages: None,
            check_points: Some(check_points),
        }
    }

    /// Whether this section still carries the pre-stage flat shape.
    #[inline]
    #[must_use]
    pub fn is_legacy(&self) -> bool {
        self.stages.is_none()
    }

    /// Upgrade a legacy section to the staged schema in place.
    ///
    /// The flat checkpoints are wrapped in a single stage named after the
    /// section. Checkpoint ids are preserved; the synthesized stage id
    /// derives from the section id, falling back to a generated one when
    /// the section has no id. Already-staged sections are untouched.
    pub fn normalize(&mut self) {
        if self.stages.is_some() {
            return;
        }
        let check_points = self.check_points.take().unwrap_or_default();
        let stage_id = if self.id.is_empty() {
            id::stage_id()
        } else {
            format!("stage_{}", self.id)
        };
        self.stages = Some(vec![StageGroup::new(
            stage_id,
            self.section_name.clone(),
            check_points,
        )]);
    }

    /// Iterate every checkpoint in sheet order, whichever shape holds them.
    ///
    /// When a document carries both shapes, only `stages` is walked.
    pub fn checkpoints(&self) -> impl Iterator<Item = &CheckpointRecord> {
        let staged = self
            .stages
            .iter()
            .flatten()
            .flat_map(|stage| stage.check_points.iter());
        let flat = if self.stages.is_some() {
            &[]
        } else {
            self.check_points.as_deref().unwrap_or_default()
        };
        staged.chain(flat.iter())
    }

    /// Total checkpoints across all stages (or the legacy list).
    ///
    /// This is the row-span a group column covers when the section renders.
    #[inline]
    #[must_use]
    pub fn checkpoint_count(&self) -> usize {
        self.checkpoints().count()
    }

    /// Append a stage (normalizes a legacy section first).
    pub fn add_stage(&mut self, stage: StageGroup) {
        self.normalize();
        if let Some(stages) = self.stages.as_mut() {
            stages.push(stage);
        }
    }

    /// Remove a stage by id.
    ///
    /// A section keeps at least one stage: removing the last remaining one
    /// is a no-op. Returns whether a stage was removed.
    pub fn remove_stage(&mut self, stage_id: &str) -> bool {
        self.normalize();
        let Some(stages) = self.stages.as_mut() else {
            return false;
        };
        if stages.len() <= 1 {
            return false;
        }
        let before = stages.len();
        stages.retain(|s| s.id != stage_id);
        stages.len() < before
    }

    /// Mutable lookup by stage id (normalizes a legacy section first).
    pub fn stage_mut(&mut self, stage_id: &str) -> Option<&mut StageGroup> {
        self.normalize();
        self.stages
            .as_mut()
            .and_then(|stages| stages.iter_mut().find(|s| s.id == stage_id))
    }
}
