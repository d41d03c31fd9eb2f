//! # Step Kinds
//!
//! The closed set of steps a catalogue path can pass through.
//!
//! ```text
//! Country → Series → Year → Currency → Denomination → Color → Paper
//!         → Watermark → Perforation → ItemType → StampDetail
//!
//! any frame ──► SideCategory(k)   (k not yet consumed on this path)
//! ```
//!
//! The linear order is fixed: a drill always moves exactly one step forward.
//! Side-categories sit outside that order and may branch off any frame.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

/// Optional, non-linear branches of the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SideCategory {
    PostalHistory,
    Postmarks,
    Proofs,
    Essays,
    OnPiece,
    Errors,
    Other,
}

impl SideCategory {
    pub const ALL: [SideCategory; 7] = [
        SideCategory::PostalHistory,
        SideCategory::Postmarks,
        SideCategory::Proofs,
        SideCategory::Essays,
        SideCategory::OnPiece,
        SideCategory::Errors,
        SideCategory::Other,
    ];

    /// The segment this category contributes to a composite code.
    pub fn slug(self) -> &'static str {
        match self {
            SideCategory::PostalHistory => "postal-history",
            SideCategory::Postmarks => "postmarks",
            SideCategory::Proofs => "proofs",
            SideCategory::Essays => "essays",
            SideCategory::OnPiece => "on-piece",
            SideCategory::Errors => "errors",
            SideCategory::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SideCategory::PostalHistory => "Postal History",
            SideCategory::Postmarks => "Postmarks",
            SideCategory::Proofs => "Proofs",
            SideCategory::Essays => "Essays",
            SideCategory::OnPiece => "On Piece",
            SideCategory::Errors => "Errors",
            SideCategory::Other => "Other",
        }
    }

    pub fn from_slug(slug: &str) -> Option<SideCategory> {
        SideCategory::ALL.into_iter().find(|c| c.slug() == slug)
    }
}

impl fmt::Display for SideCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single level of the drill-down hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Country,
    Series,
    Year,
    Currency,
    Denomination,
    Color,
    Paper,
    Watermark,
    Perforation,
    ItemType,
    StampDetail,
    SideCategory(SideCategory),
}

/// The authoritative linear order. Side-categories are not part of it.
pub const STEP_ORDER: [StepKind; 11] = [
    StepKind::Country,
    StepKind::Series,
    StepKind::Year,
    StepKind::Currency,
    StepKind::Denomination,
    StepKind::Color,
    StepKind::Paper,
    StepKind::Watermark,
    StepKind::Perforation,
    StepKind::ItemType,
    StepKind::StampDetail,
];

impl StepKind {
    /// Successor in the fixed order. `None` for `StampDetail` and side-categories.
    pub fn next(self) -> Option<StepKind> {
        match self {
            StepKind::Country => Some(StepKind::Series),
            StepKind::Series => Some(StepKind::Year),
            StepKind::Year => Some(StepKind::Currency),
            StepKind::Currency => Some(StepKind::Denomination),
            StepKind::Denomination => Some(StepKind::Color),
            StepKind::Color => Some(StepKind::Paper),
            StepKind::Paper => Some(StepKind::Watermark),
            StepKind::Watermark => Some(StepKind::Perforation),
            StepKind::Perforation => Some(StepKind::ItemType),
            StepKind::ItemType => Some(StepKind::StampDetail),
            StepKind::StampDetail | StepKind::SideCategory(_) => None,
        }
    }

    /// The kind of the options listed inside a frame of this kind.
    ///
    /// Same as [`next`](Self::next) for the linear steps; a side-category
    /// frame lists stamps directly.
    pub fn child_kind(self) -> Option<StepKind> {
        match self {
            StepKind::SideCategory(_) => Some(StepKind::StampDetail),
            other => other.next(),
        }
    }

    /// Position in [`STEP_ORDER`], `None` for side-categories.
    pub fn position(self) -> Option<usize> {
        STEP_ORDER.iter().position(|k| *k == self)
    }

    pub fn is_side_category(self) -> bool {
        matches!(self, StepKind::SideCategory(_))
    }

    pub fn side_category(self) -> Option<SideCategory> {
        match self {
            StepKind::SideCategory(c) => Some(c),
            _ => None,
        }
    }

    /// Whether a frame of this kind may have a frame of `child` pushed on top.
    ///
    /// Duplicate side-categories are not checked here; that depends on the
    /// path, not on the kinds.
    pub fn accepts_child(self, child: StepKind) -> bool {
        match child {
            StepKind::SideCategory(_) => true,
            StepKind::Country => false,
            StepKind::StampDetail => {
                matches!(self, StepKind::ItemType | StepKind::SideCategory(_))
            }
            linear => self.next() == Some(linear),
        }
    }

    /// Canonical segment used when an option carries no segment of its own.
    pub fn placeholder_segment(self) -> &'static str {
        match self {
            StepKind::Watermark => "NoWmk",
            _ => "Unknown",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            StepKind::Country => "country",
            StepKind::Series => "series",
            StepKind::Year => "year",
            StepKind::Currency => "currency",
            StepKind::Denomination => "denomination",
            StepKind::Color => "color",
            StepKind::Paper => "paper",
            StepKind::Watermark => "watermark",
            StepKind::Perforation => "perforation",
            StepKind::ItemType => "item-type",
            StepKind::StampDetail => "stamp-detail",
            StepKind::SideCategory(c) => c.slug(),
        }
    }

    pub fn from_slug(slug: &str) -> Option<StepKind> {
        STEP_ORDER
            .into_iter()
            .find(|k| k.slug() == slug)
            .or_else(|| SideCategory::from_slug(slug).map(StepKind::SideCategory))
    }

    /// Returns a human-readable label for display
    pub fn label(self) -> &'static str {
        match self {
            StepKind::Country => "Country",
            StepKind::Series => "Series",
            StepKind::Year => "Year",
            StepKind::Currency => "Currency",
            StepKind::Denomination => "Denomination",
            StepKind::Color => "Color",
            StepKind::Paper => "Paper",
            StepKind::Watermark => "Watermark",
            StepKind::Perforation => "Perforation",
            StepKind::ItemType => "Item Type",
            StepKind::StampDetail => "Stamp",
            StepKind::SideCategory(c) => c.label(),
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for StepKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.slug())
    }
}

impl<'de> Deserialize<'de> for StepKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let slug = String::deserialize(deserializer)?;
        StepKind::from_slug(&slug)
            .ok_or_else(|| de::Error::custom(format!("unknown step kind: {slug}")))
    }
}
