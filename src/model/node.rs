// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caseboard-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caseboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::geometry::{Point, Size};
use super::ids::NodeId;

/// The kind of content a node card holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Note,
    Link,
    Image,
    Person,
    Location,
}

impl NodeKind {
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Note,
        NodeKind::Link,
        NodeKind::Image,
        NodeKind::Person,
        NodeKind::Location,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Link => "link",
            Self::Image => "image",
            Self::Person => "person",
            Self::Location => "location",
        }
    }

    /// Kind-specific data fields, in editing order. The title is shared by every kind.
    pub fn fields(self) -> &'static [DataField] {
        match self {
            Self::Note => &[DataField::Content],
            Self::Link => &[DataField::Url],
            Self::Image => &[DataField::ImageUrl],
            Self::Person => &[DataField::Aliases, DataField::Description],
            Self::Location => &[DataField::Location],
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown node kind '{0}'")]
pub struct ParseNodeKindError(String);

impl FromStr for NodeKind {
    type Err = ParseNodeKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ParseNodeKindError(s.to_owned()))
    }
}

/// A named field in a node's data bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataField {
    Title,
    Content,
    Url,
    ImageUrl,
    Aliases,
    Description,
    Location,
}

impl DataField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Content => "Notes",
            Self::Url => "URL",
            Self::ImageUrl => "Image",
            Self::Aliases => "Aliases",
            Self::Description => "Description",
            Self::Location => "Location",
        }
    }
}

/// Type-specific content carried by a node.
///
/// Stored as a flat bag so records written for one kind still load if a field from another kind
/// is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl NodeData {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn get(&self, field: DataField) -> Option<&str> {
        match field {
            DataField::Title => Some(self.title.as_str()),
            DataField::Content => self.content.as_deref(),
            DataField::Url => self.url.as_deref(),
            DataField::ImageUrl => self.image_url.as_deref(),
            DataField::Aliases => self.aliases.as_deref(),
            DataField::Description => self.description.as_deref(),
            DataField::Location => self.location.as_deref(),
        }
    }

    pub fn set(&mut self, field: DataField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DataField::Title => self.title = value,
            DataField::Content => self.content = Some(value),
            DataField::Url => self.url = Some(value),
            DataField::ImageUrl => self.image_url = Some(value),
            DataField::Aliases => self.aliases = Some(value),
            DataField::Description => self.description = Some(value),
            DataField::Location => self.location = Some(value),
        }
    }
}

/// A positioned, typed content card on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub data: NodeData,
}

impl Node {
    pub fn new(id: NodeId, kind: NodeKind, position: Point, size: Size, data: NodeData) -> Self {
        Self {
            id,
            kind,
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
            data,
        }
    }

    /// A fresh card as created from the context menu: `"New <kind>"` with empty notes.
    pub fn blank(id: NodeId, kind: NodeKind, position: Point, size: Size) -> Self {
        let data = NodeData {
            title: format!("New {kind}"),
            content: Some(String::new()),
            ..NodeData::default()
        };
        Self::new(id, kind, position, size, data)
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Edges are inclusive so a click on the border still lands on the node.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::{DataField, Node, NodeData, NodeKind};
    use crate::model::{NodeId, Point, Size};

    #[test]
    fn blank_node_matches_context_menu_defaults() {
        let node = Node::blank(
            NodeId::new("n1").expect("node id"),
            NodeKind::Person,
            Point::new(10.0, 20.0),
            Size::new(200.0, 150.0),
        );
        assert_eq!(node.data.title, "New person");
        assert_eq!(node.data.content.as_deref(), Some(""));
        assert_eq!(node.center(), Point::new(110.0, 95.0));
    }

    #[test]
    fn node_serializes_with_browser_field_names() {
        let mut data = NodeData::titled("Photo");
        data.image_url = Some("data:image/png;base64,AA==".to_owned());
        let node = Node::new(
            NodeId::new("n1").expect("node id"),
            NodeKind::Image,
            Point::new(1.0, 2.0),
            Size::new(200.0, 200.0),
            data,
        );

        let json = serde_json::to_value(&node).expect("serialize");
        assert_eq!(json["type"], "image");
        assert_eq!(json["data"]["imageUrl"], "data:image/png;base64,AA==");
        assert!(json["data"].get("content").is_none());
    }

    #[test]
    fn kind_fields_cover_every_kind() {
        assert_eq!(NodeKind::Person.fields(), &[DataField::Aliases, DataField::Description]);
        assert_eq!("location".parse::<NodeKind>(), Ok(NodeKind::Location));
        assert!("folder".parse::<NodeKind>().is_err());
    }

    #[test]
    fn contains_is_inclusive_of_edges() {
        let node = Node::blank(
            NodeId::new("n1").expect("node id"),
            NodeKind::Note,
            Point::new(0.0, 0.0),
            Size::new(10.0, 10.0),
        );
        assert!(node.contains(Point::new(10.0, 10.0)));
        assert!(!node.contains(Point::new(10.5, 0.0)));
    }
}
