//! Fixed visual vocabulary of the diagram.
//!
//! | Relation            | Printed as                 | Arrow                     |
//! |---------------------|----------------------------|---------------------------|
//! | extends             | sub -> super               | `arrowhead=empty`         |
//! | implements          | class -> interface         | `arrowhead=diamond`       |
//! | extends-interface   | sub -> super               | `arrowhead=odiamond`      |
//! | tagged-by           | type -> tag                | `arrowhead=dot`           |
//! | meta-tagged-by      | tag -> meta-tag            | `arrowhead=invdot`        |
//! | member-tagged-by    | type -> tag                | `arrowhead=odot`          |
//! | attribute type ref  | referenced -> holder, back | `arrowtail=obox`          |
//! | routine type ref    | referenced -> holder, back | `arrowtail=box`           |

use crate::types::{RelationKind, TypeKind};
use std::fmt;

/// Header rows are this much darker than the node fill
pub const HEADER_DARKNESS: f32 = 0.8;

/// 24-bit colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const STANDARD_FILL: Rgb = Rgb(0xff, 0xf2, 0xb6);
    pub const INTERFACE_FILL: Rgb = Rgb(0xb6, 0xe7, 0xff);
    pub const TAG_FILL: Rgb = Rgb(0xf3, 0xc9, 0xff);

    /// Scale every channel by `factor`, truncating
    pub fn darken(self, factor: f32) -> Rgb {
        let scale = |c: u8| (f32::from(c) * factor).clamp(0.0, 255.0) as u8;
        Rgb(scale(self.0), scale(self.1), scale(self.2))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Shape and fill of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeStyle {
    pub shape: &'static str,
    pub fill: Rgb,
}

impl NodeStyle {
    pub fn header_background(&self) -> Rgb {
        self.fill.darken(HEADER_DARKNESS)
    }
}

impl TypeKind {
    pub const fn node_style(self) -> NodeStyle {
        match self {
            Self::Standard => NodeStyle {
                shape: "box",
                fill: Rgb::STANDARD_FILL,
            },
            Self::Interface => NodeStyle {
                shape: "diamond",
                fill: Rgb::INTERFACE_FILL,
            },
            Self::Tag => NodeStyle {
                shape: "oval",
                fill: Rgb::TAG_FILL,
            },
        }
    }
}

/// How one relation kind is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeStyle {
    /// DOT attribute list (without brackets)
    pub attributes: &'static str,

    /// Print target -> source and point the tail back at the source
    pub reversed: bool,
}

impl RelationKind {
    pub const fn edge_style(self) -> EdgeStyle {
        let (attributes, reversed) = match self {
            Self::Extends => ("arrowhead=empty, arrowsize=2.5", false),
            Self::Implements => ("arrowhead=diamond, arrowsize=2.5", false),
            Self::ExtendsInterface => ("arrowhead=odiamond, arrowsize=2.5", false),
            Self::TaggedBy => ("arrowhead=dot, arrowsize=2.5", false),
            Self::MetaTaggedBy => ("arrowhead=invdot, arrowsize=2.5", false),
            Self::AttributeTaggedBy | Self::RoutineTaggedBy => {
                ("arrowhead=odot, arrowsize=2.5", false)
            }
            Self::AttributeTypeRef => ("arrowtail=obox, arrowsize=2.5, dir=back", true),
            Self::RoutineTypeRef => ("arrowtail=box, arrowsize=2.5, dir=back", true),
        };
        EdgeStyle {
            attributes,
            reversed,
        }
    }
}
