use egui::Color32;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A horizontal grouping row on the Timeline. List order is display order
/// (top to bottom).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swimlane {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "super::task::opt_color_serde", default)]
    pub color: Option<Color32>,
}

impl Swimlane {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            color: None,
        }
    }
}

/// A Kanban lane definition. Every task has exactly one status, so unlike
/// swimlanes the reference is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusColumn {
    pub id: Uuid,
    pub title: String,
    #[serde(with = "super::task::opt_color_serde", default)]
    pub color: Option<Color32>,
}

impl StatusColumn {
    pub fn new(title: impl Into<String>, color: Color32) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            color: Some(color),
        }
    }
}

/// An assignee. Rows in the Timeline's "People" grouping mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "super::task::opt_color_serde", default)]
    pub color: Option<Color32>,
}

impl Person {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            color: None,
        }
    }
}
