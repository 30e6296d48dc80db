//! Item definitions and stack policy

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Item kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemKind {
    /// Ordinary items (food, tools, clothing)
    #[default]
    #[serde(rename = "item")]
    Regular,
    /// Weapons
    #[serde(rename = "weapon")]
    Weapon,
}

/// Maximum quantity a single slot may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "RawStackLimit", into = "RawStackLimit")]
pub enum StackLimit {
    /// At most this many units (always at least 1)
    Limited(u32),
    /// No per-slot cap
    #[default]
    Unlimited,
}

impl StackLimit {
    /// Create a limited stack size, clamped to at least 1
    pub fn limited(max: u32) -> Self {
        Self::Limited(max.max(1))
    }

    /// The cap, if any
    pub fn max(&self) -> Option<u32> {
        match self {
            Self::Limited(max) => Some(*max),
            Self::Unlimited => None,
        }
    }

    /// Units a slot already holding `current` can still absorb.
    /// `None` means unbounded.
    pub fn room_for(&self, current: u32) -> Option<u32> {
        self.max().map(|max| max.saturating_sub(current))
    }

    /// Clamp a requested amount to what one fresh slot can hold
    pub fn clamp(&self, amount: u32) -> u32 {
        match self {
            Self::Limited(max) => amount.min(*max),
            Self::Unlimited => amount,
        }
    }

    /// Clamp `amount` to the room left above `current`
    pub fn fit(&self, current: u32, amount: u32) -> u32 {
        match self.room_for(current) {
            Some(room) => amount.min(room),
            None => amount,
        }
    }
}

/// Host representation: a positive number, or `false` for no cap
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawStackLimit {
    Count(u32),
    Flag(bool),
}

impl TryFrom<RawStackLimit> for StackLimit {
    type Error = String;

    fn try_from(raw: RawStackLimit) -> Result<Self, Self::Error> {
        match raw {
            RawStackLimit::Count(0) => Err("stack limit must be positive".to_string()),
            RawStackLimit::Count(max) => Ok(Self::Limited(max)),
            RawStackLimit::Flag(false) => Ok(Self::Unlimited),
            RawStackLimit::Flag(true) => Err("stack limit must be a number or false".to_string()),
        }
    }
}

impl From<StackLimit> for RawStackLimit {
    fn from(limit: StackLimit) -> Self {
        match limit {
            StackLimit::Limited(max) => Self::Count(max),
            StackLimit::Unlimited => Self::Flag(false),
        }
    }
}

/// Which jobs may use an item
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawJobs", into = "RawJobs")]
pub enum JobRestriction {
    /// Anyone
    #[default]
    Unrestricted,
    /// Only these jobs (never empty)
    Jobs(BTreeSet<String>),
}

impl JobRestriction {
    /// Restrict to the given jobs; an empty list means unrestricted
    pub fn jobs<I, S>(jobs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = jobs.into_iter().map(Into::into).collect();
        if set.is_empty() {
            Self::Unrestricted
        } else {
            Self::Jobs(set)
        }
    }

    /// Check if a player with `job` passes the restriction
    pub fn allows(&self, job: Option<&str>) -> bool {
        match (self, job) {
            (Self::Unrestricted, _) => true,
            (Self::Jobs(_), None) => false,
            (Self::Jobs(jobs), Some(job)) => jobs.contains(job),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawJobs {
    List(Vec<String>),
    Flag(bool),
}

impl From<RawJobs> for JobRestriction {
    fn from(raw: RawJobs) -> Self {
        match raw {
            RawJobs::List(jobs) => Self::jobs(jobs),
            RawJobs::Flag(_) => Self::Unrestricted,
        }
    }
}

impl From<JobRestriction> for RawJobs {
    fn from(restriction: JobRestriction) -> Self {
        match restriction {
            JobRestriction::Unrestricted => Self::Flag(false),
            JobRestriction::Jobs(jobs) => Self::List(jobs.into_iter().collect()),
        }
    }
}

/// Static, read-only description of an item type, keyed by `name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDefinition {
    /// Unique key
    pub name: String,
    /// Display name
    pub label: String,
    /// Weight of one unit in grams
    #[serde(default)]
    pub weight: u32,
    /// Kind
    #[serde(rename = "type", default)]
    pub kind: ItemKind,
    /// At most one unit across inventory and hotbar
    #[serde(default)]
    pub is_unique: bool,
    /// Declared stack limit (ignored for unique items)
    #[serde(rename = "stackLimits", default)]
    pub stack_limit: StackLimit,
    /// Whether the item can be used
    #[serde(rename = "isUseable", default)]
    pub usable: bool,
    /// Whether using the item closes the container view
    #[serde(rename = "closeInventory", default)]
    pub closes_container_on_use: bool,
    /// Job restriction
    #[serde(rename = "job", default)]
    pub allowed_jobs: JobRestriction,
    /// Icon path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ItemDefinition {
    /// Create a new item definition
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            weight: 0,
            kind: ItemKind::default(),
            is_unique: false,
            stack_limit: StackLimit::default(),
            usable: false,
            closes_container_on_use: false,
            allowed_jobs: JobRestriction::default(),
            image: None,
            description: None,
        }
    }

    /// Set unit weight in grams
    pub fn with_weight(mut self, grams: u32) -> Self {
        self.weight = grams;
        self
    }

    /// Set kind
    pub fn with_kind(mut self, kind: ItemKind) -> Self {
        self.kind = kind;
        self
    }

    /// Mark as unique
    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    /// Set declared stack limit
    pub fn with_stack_limit(mut self, limit: StackLimit) -> Self {
        self.stack_limit = limit;
        self
    }

    /// Set usable
    pub fn usable(mut self, usable: bool) -> Self {
        self.usable = usable;
        self
    }

    /// Close the container view when used
    pub fn closes_container(mut self) -> Self {
        self.closes_container_on_use = true;
        self
    }

    /// Restrict to jobs
    pub fn with_jobs<I, S>(mut self, jobs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_jobs = JobRestriction::jobs(jobs);
        self
    }

    /// Set icon path
    pub fn with_image(mut self, path: impl Into<String>) -> Self {
        self.image = Some(path.into());
        self
    }

    /// Set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Check if unique
    pub fn is_unique(&self) -> bool {
        self.is_unique
    }

    /// Check if two entries of this item may ever share a slot
    pub fn can_stack(&self) -> bool {
        !self.is_unique
    }

    /// Effective stack limit: exactly 1 for unique items
    pub fn stack_limit(&self) -> StackLimit {
        if self.is_unique {
            StackLimit::Limited(1)
        } else {
            self.stack_limit
        }
    }

    /// Check if usable
    pub fn is_usable(&self) -> bool {
        self.usable
    }

    /// Check if using closes the container view
    pub fn closes_container_on_use(&self) -> bool {
        self.closes_container_on_use
    }

    /// Check if restricted to some jobs
    pub fn is_job_restricted(&self) -> bool {
        matches!(self.allowed_jobs, JobRestriction::Jobs(_))
    }

    /// Check if a player with `job` may use this item
    pub fn can_be_used_by(&self, job: Option<&str>) -> bool {
        self.allowed_jobs.allows(job)
    }

    /// Check if weapon
    pub fn is_weapon(&self) -> bool {
        self.kind == ItemKind::Weapon
    }

    /// Check if an icon is set
    pub fn has_image(&self) -> bool {
        self.image.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Check if a description is set
    pub fn has_description(&self) -> bool {
        self.description.as_deref().is_some_and(|s| !s.is_empty())
    }
}
