// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed OBJ records.

use smallvec::SmallVec;
use std::fmt::Write;

/// The OBJ record kinds that carry their own 1-based id sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Vertex,
    VertexNormal,
    VertexPoint,
    VertexTexture,
    Face,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 5] = [
        ComponentKind::Vertex,
        ComponentKind::VertexNormal,
        ComponentKind::VertexPoint,
        ComponentKind::VertexTexture,
        ComponentKind::Face,
    ];

    /// Leading keyword of the record's line.
    pub fn keyword(self) -> &'static str {
        match self {
            ComponentKind::Vertex => "v",
            ComponentKind::VertexNormal => "vn",
            ComponentKind::VertexPoint => "vp",
            ComponentKind::VertexTexture => "vt",
            ComponentKind::Face => "f",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ComponentKind::Vertex => "vertex",
            ComponentKind::VertexNormal => "vertex_normal",
            ComponentKind::VertexPoint => "vertex_point",
            ComponentKind::VertexTexture => "vertex_texture",
            ComponentKind::Face => "face",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == keyword)
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// One corner of a face: `v`, `v/vt`, `v//vn` or `v/vt/vn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceItem {
    pub vertex_id: i64,
    pub vertex_texture_id: Option<i64>,
    pub vertex_normal_id: Option<i64>,
}

impl FaceItem {
    pub fn vertex(vertex_id: i64) -> Self {
        Self {
            vertex_id,
            vertex_texture_id: None,
            vertex_normal_id: None,
        }
    }
}

/// Payload of a component line.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    /// `v x y z [w]`
    Vertex { x: f64, y: f64, z: f64, w: Option<f64> },
    /// `vn i j k`
    VertexNormal { i: f64, j: f64, k: f64 },
    /// `vp u v [w]`, w defaults to 1.0
    VertexPoint { u: f64, v: f64, w: f64 },
    /// `vt u v [w]`, w defaults to 0.0
    VertexTexture { u: f64, v: f64, w: f64 },
    /// `f item item ...`
    Face { parts: SmallVec<[FaceItem; 4]> },
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Vertex { .. } => ComponentKind::Vertex,
            Component::VertexNormal { .. } => ComponentKind::VertexNormal,
            Component::VertexPoint { .. } => ComponentKind::VertexPoint,
            Component::VertexTexture { .. } => ComponentKind::VertexTexture,
            Component::Face { .. } => ComponentKind::Face,
        }
    }

    /// Renders the component as an OBJ line, without a line terminator.
    pub fn to_line(&self) -> String {
        let mut line = String::from(self.kind().keyword());
        // Writing into a String cannot fail.
        let _ = match self {
            Component::Vertex { x, y, z, w } => {
                let _ = write!(line, " {:?} {:?} {:?}", x, y, z);
                match w {
                    Some(w) => write!(line, " {:?}", w),
                    None => Ok(()),
                }
            }
            Component::VertexNormal { i, j, k } => write!(line, " {:?} {:?} {:?}", i, j, k),
            Component::VertexPoint { u, v, w } | Component::VertexTexture { u, v, w } => {
                write!(line, " {:?} {:?} {:?}", u, v, w)
            }
            Component::Face { parts } => parts.iter().try_for_each(|part| {
                match (part.vertex_texture_id, part.vertex_normal_id) {
                    (None, None) => write!(line, " {}", part.vertex_id),
                    (Some(vt), None) => write!(line, " {}/{}", part.vertex_id, vt),
                    (None, Some(vn)) => write!(line, " {}//{}", part.vertex_id, vn),
                    (Some(vt), Some(vn)) => write!(line, " {}/{}/{}", part.vertex_id, vt, vn),
                }
            }),
        };
        line
    }
}

/// One line of an OBJ document.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// `# text`; the text excludes the marker and leading whitespace.
    Comment(String),
    /// A component line with its 1-based id within its kind.
    Component { id: usize, component: Component },
    /// An empty line. Only produced for rendering.
    Blank,
}

impl Record {
    pub fn to_line(&self) -> String {
        match self {
            Record::Comment(text) => format!("# {}", text),
            Record::Component { component, .. } => component.to_line(),
            Record::Blank => String::new(),
        }
    }

    pub fn component(&self) -> Option<&Component> {
        match self {
            Record::Component { component, .. } => Some(component),
            _ => None,
        }
    }
}

/// Joins records into OBJ text, terminating every line with `\n`.
pub fn render(records: &[Record]) -> String {
    let mut output = String::new();
    for record in records {
        output.push_str(&record.to_line());
        output.push('\n');
    }
    output
}
