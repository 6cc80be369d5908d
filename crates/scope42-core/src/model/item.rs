use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ErrorCode;
use crate::id::{ItemId, ItemKind};
use crate::model::status::{
    DecisionStatus, ImprovementStatus, IssueStatus, ParseStatusError, RiskStatus,
};

/// The item mapping of a workspace, keyed and ordered by [`ItemId`].
pub type Items = BTreeMap<ItemId, Item>;

/// The semantic meaning of a reference field.
///
/// Every reference field on an item is one of these; the graph labels and
/// the kinds a field may point at follow from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    Causes,
    Solves,
    Modifies,
    Supersedes,
}

impl RelationKind {
    /// Label of the edge as seen from the referencing item.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Causes => "causes",
            Self::Solves => "solves",
            Self::Modifies => "modifies",
            Self::Supersedes => "supersedes",
        }
    }

    /// Label of the same edge as seen from the referenced item.
    #[must_use]
    pub const fn inverse_label(self) -> &'static str {
        match self {
            Self::Causes => "caused by",
            Self::Solves => "solved by",
            Self::Modifies => "modified by",
            Self::Supersedes => "superseded by",
        }
    }

    /// Kinds a reference of this relation may point at.
    #[must_use]
    pub const fn allowed_targets(self) -> &'static [ItemKind] {
        match self {
            Self::Causes | Self::Solves => &[ItemKind::Issue, ItemKind::Risk],
            Self::Modifies | Self::Supersedes => &[ItemKind::Decision],
        }
    }

    /// Which relation a `source` item uses to reference a `target` kind, if any.
    #[must_use]
    pub const fn between(source: ItemKind, target: ItemKind) -> Option<Self> {
        match (source, target) {
            (ItemKind::Issue | ItemKind::Risk, ItemKind::Issue | ItemKind::Risk) => {
                Some(Self::Causes)
            }
            (ItemKind::Improvement, ItemKind::Issue | ItemKind::Risk) => Some(Self::Solves),
            (ItemKind::Improvement, ItemKind::Decision) => Some(Self::Modifies),
            (ItemKind::Decision, ItemKind::Decision) => Some(Self::Supersedes),
            _ => None,
        }
    }
}

/// A comment attached to an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub content: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IssueDetails {
    #[serde(default)]
    pub status: IssueStatus,
    /// Issues and risks this issue causes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<ItemId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskDetails {
    #[serde(default)]
    pub status: RiskStatus,
    /// Issues and risks this risk causes once it materializes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<ItemId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImprovementDetails {
    #[serde(default)]
    pub status: ImprovementStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub solves: Vec<ItemId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifies: Vec<ItemId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DecisionDetails {
    #[serde(default)]
    pub status: DecisionStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deciders: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supersedes: Vec<ItemId>,
}

/// Kind-specific part of an item. Serialized inline with a `type` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Details {
    Issue(IssueDetails),
    Risk(RiskDetails),
    Improvement(ImprovementDetails),
    Decision(DecisionDetails),
}

impl Details {
    /// Empty details for a freshly created item of `kind`.
    #[must_use]
    pub fn empty(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Issue => Self::Issue(IssueDetails::default()),
            ItemKind::Risk => Self::Risk(RiskDetails::default()),
            ItemKind::Improvement => Self::Improvement(ImprovementDetails::default()),
            ItemKind::Decision => Self::Decision(DecisionDetails::default()),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        match self {
            Self::Issue(_) => ItemKind::Issue,
            Self::Risk(_) => ItemKind::Risk,
            Self::Improvement(_) => ItemKind::Improvement,
            Self::Decision(_) => ItemKind::Decision,
        }
    }

    /// Status rendered as text, whatever the kind.
    #[must_use]
    pub const fn status_str(&self) -> &'static str {
        match self {
            Self::Issue(d) => d.status.as_str(),
            Self::Risk(d) => d.status.as_str(),
            Self::Improvement(d) => d.status.as_str(),
            Self::Decision(d) => d.status.as_str(),
        }
    }

    /// Reference fields in declaration order.
    #[must_use]
    pub fn reference_fields(&self) -> Vec<(RelationKind, &[ItemId])> {
        match self {
            Self::Issue(d) => vec![(RelationKind::Causes, d.causes.as_slice())],
            Self::Risk(d) => vec![(RelationKind::Causes, d.causes.as_slice())],
            Self::Improvement(d) => vec![
                (RelationKind::Solves, d.solves.as_slice()),
                (RelationKind::Modifies, d.modifies.as_slice()),
            ],
            Self::Decision(d) => vec![(RelationKind::Supersedes, d.supersedes.as_slice())],
        }
    }

    /// Set the status from its text form, checked against this kind's states.
    ///
    /// # Errors
    ///
    /// Returns [`ParseStatusError`] if `raw` is not a status of this kind.
    pub fn set_status(&mut self, raw: &str) -> Result<(), ParseStatusError> {
        match self {
            Self::Issue(d) => d.status = raw.parse()?,
            Self::Risk(d) => d.status = raw.parse()?,
            Self::Improvement(d) => d.status = raw.parse()?,
            Self::Decision(d) => d.status = raw.parse()?,
        }
        Ok(())
    }

    /// Add a reference to `target`, choosing the field from the two kinds.
    ///
    /// Adding an existing reference is a no-op. Returns the relation used.
    ///
    /// # Errors
    ///
    /// Returns [`ItemError::UnsupportedLink`] when this kind has no field
    /// that may point at `target`'s kind.
    pub fn link_to(&mut self, target: ItemId) -> Result<RelationKind, ItemError> {
        let kind = self.kind();
        let unsupported = || ItemError::UnsupportedLink {
            from: kind,
            to: target.kind(),
        };
        let relation = RelationKind::between(kind, target.kind()).ok_or_else(unsupported)?;
        let field = self
            .reference_field_mut(relation)
            .ok_or_else(unsupported)?;
        if !field.contains(&target) {
            field.push(target);
        }
        Ok(relation)
    }

    fn reference_field_mut(&mut self, relation: RelationKind) -> Option<&mut Vec<ItemId>> {
        match (self, relation) {
            (Self::Issue(d), RelationKind::Causes) => Some(&mut d.causes),
            (Self::Risk(d), RelationKind::Causes) => Some(&mut d.causes),
            (Self::Improvement(d), RelationKind::Solves) => Some(&mut d.solves),
            (Self::Improvement(d), RelationKind::Modifies) => Some(&mut d.modifies),
            (Self::Decision(d), RelationKind::Supersedes) => Some(&mut d.supersedes),
            _ => None,
        }
    }
}

/// Validation failures for a single item.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemError {
    #[error("item {id} is stored as type '{kind}'")]
    KindMismatch { id: ItemId, kind: ItemKind },
    #[error("item {id} cannot reference {target} as '{}'", .relation.label())]
    InvalidReference {
        id: ItemId,
        relation: RelationKind,
        target: ItemId,
    },
    #[error("a {from} cannot reference a {to}")]
    UnsupportedLink { from: ItemKind, to: ItemKind },
    #[error("item {0} has an empty title")]
    EmptyTitle(ItemId),
}

impl ItemError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::KindMismatch { .. } => ErrorCode::KindMismatch,
            Self::InvalidReference { .. } | Self::UnsupportedLink { .. } => {
                ErrorCode::InvalidReference
            }
            Self::EmptyTitle(_) => ErrorCode::InvalidItem,
        }
    }
}

/// A tracked item: common attributes plus kind-specific [`Details`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket: Option<String>,
    #[serde(flatten)]
    pub details: Details,
}

impl Item {
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        self.details.kind()
    }

    /// All outgoing references as `(relation, target)` pairs, in field then
    /// list order.
    #[must_use]
    pub fn references(&self) -> Vec<(RelationKind, ItemId)> {
        self.details
            .reference_fields()
            .into_iter()
            .flat_map(|(relation, ids)| ids.iter().map(move |id| (relation, *id)))
            .collect()
    }

    /// Add a reference to `target`. See [`Details::link_to`].
    ///
    /// # Errors
    ///
    /// Returns [`ItemError::UnsupportedLink`] for a kind pair without a
    /// reference field.
    pub fn link_to(&mut self, target: ItemId) -> Result<RelationKind, ItemError> {
        self.details.link_to(target)
    }

    /// Person names on this item: comment authors, then decision deciders.
    #[must_use]
    pub fn person_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.comments.iter().map(|c| c.author.as_str()).collect();
        if let Details::Decision(decision) = &self.details {
            names.extend(decision.deciders.iter().map(String::as_str));
        }
        names
    }

    /// Check the structural invariants of a single item.
    ///
    /// Referenced items are not required to exist; only their kinds are
    /// checked against the field they appear in.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ItemError> {
        if self.id.kind() != self.kind() {
            return Err(ItemError::KindMismatch {
                id: self.id,
                kind: self.kind(),
            });
        }
        if self.title.trim().is_empty() {
            return Err(ItemError::EmptyTitle(self.id));
        }
        for (relation, target) in self.references() {
            if !relation.allowed_targets().contains(&target.kind()) {
                return Err(ItemError::InvalidReference {
                    id: self.id,
                    relation,
                    target,
                });
            }
        }
        Ok(())
    }
}

/// An item that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket: Option<String>,
    #[serde(flatten)]
    pub details: Details,
}

impl NewItem {
    /// A new item with `created`/`modified` stamped to now and no optional
    /// fields set.
    #[must_use]
    pub fn new(title: impl Into<String>, details: Details) -> Self {
        let now = Utc::now();
        Self {
            title: title.into(),
            description: None,
            created: now,
            modified: now,
            tags: Vec::new(),
            comments: Vec::new(),
            ticket: None,
            details,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        self.details.kind()
    }

    /// Attach the allocated identifier.
    #[must_use]
    pub fn into_item(self, id: ItemId) -> Item {
        Item {
            id,
            title: self.title,
            description: self.description,
            created: self.created,
            modified: self.modified,
            tags: self.tags,
            comments: self.comments,
            ticket: self.ticket,
            details: self.details,
        }
    }
}
