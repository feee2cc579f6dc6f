// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! OBJ line grammar using nom
//!
//! Vertex-like records (`v`, `vn`, `vp`, `vt`), faces (`f`) and comments are
//! recognized. Lines with any other keyword are skipped.

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1, one_of, space1},
    combinator::{all_consuming, map, map_res, opt, recognize},
    multi::many1,
    number::complete::recognize_float,
    sequence::{pair, preceded, tuple},
    IResult,
};
use smallvec::SmallVec;
use std::path::Path;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::record::{Component, ComponentKind, FaceItem, Record};

/// A parsed line before id assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum Line<'a> {
    Comment(&'a str),
    Component(Component),
    /// Blank line or unrecognized keyword.
    Empty,
}

/// Decimal or exponential number: 1, -2.5, 1.5e-10
fn number(input: &str) -> IResult<&str, f64> {
    map_res(recognize_float, |s: &str| fast_float::parse::<f64, _>(s))(input)
}

/// Whitespace-separated field
fn field(input: &str) -> IResult<&str, f64> {
    preceded(space1, number)(input)
}

/// Signed integer index
fn index(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(one_of("+-")), digit1)), |s: &str| {
        s.parse::<i64>()
    })(input)
}

fn keyword<'a>(kind: ComponentKind) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    tag(kind.keyword())
}

/// v x y z [w]
fn vertex(input: &str) -> IResult<&str, Component> {
    map(
        preceded(
            keyword(ComponentKind::Vertex),
            tuple((field, field, field, opt(field))),
        ),
        |(x, y, z, w)| Component::Vertex { x, y, z, w },
    )(input)
}

/// vn i j k
fn vertex_normal(input: &str) -> IResult<&str, Component> {
    map(
        preceded(
            keyword(ComponentKind::VertexNormal),
            tuple((field, field, field)),
        ),
        |(i, j, k)| Component::VertexNormal { i, j, k },
    )(input)
}

/// vp u v [w]
fn vertex_point(input: &str) -> IResult<&str, Component> {
    map(
        preceded(
            keyword(ComponentKind::VertexPoint),
            tuple((field, field, opt(field))),
        ),
        |(u, v, w)| Component::VertexPoint {
            u,
            v,
            w: w.unwrap_or(1.0),
        },
    )(input)
}

/// vt u v [w]
fn vertex_texture(input: &str) -> IResult<&str, Component> {
    map(
        preceded(
            keyword(ComponentKind::VertexTexture),
            tuple((field, field, opt(field))),
        ),
        |(u, v, w)| Component::VertexTexture {
            u,
            v,
            w: w.unwrap_or(0.0),
        },
    )(input)
}

/// Face item. The full form is tried first so that no alternative matches a
/// prefix of a longer one.
fn face_item(input: &str) -> IResult<&str, FaceItem> {
    alt((
        // v/vt/vn
        map(
            tuple((index, char('/'), index, char('/'), index)),
            |(v, _, vt, _, vn)| FaceItem {
                vertex_id: v,
                vertex_texture_id: Some(vt),
                vertex_normal_id: Some(vn),
            },
        ),
        // v//vn
        map(tuple((index, tag("//"), index)), |(v, _, vn)| FaceItem {
            vertex_id: v,
            vertex_texture_id: None,
            vertex_normal_id: Some(vn),
        }),
        // v/vt
        map(tuple((index, char('/'), index)), |(v, _, vt)| FaceItem {
            vertex_id: v,
            vertex_texture_id: Some(vt),
            vertex_normal_id: None,
        }),
        // v
        map(index, FaceItem::vertex),
    ))(input)
}

/// f item item ...
fn face(input: &str) -> IResult<&str, Component> {
    map(
        preceded(
            keyword(ComponentKind::Face),
            many1(preceded(space1, face_item)),
        ),
        |parts| Component::Face {
            parts: SmallVec::from_vec(parts),
        },
    )(input)
}

fn component(kind: ComponentKind, input: &str) -> IResult<&str, Component> {
    let parser: fn(&str) -> IResult<&str, Component> = match kind {
        ComponentKind::Vertex => vertex,
        ComponentKind::VertexNormal => vertex_normal,
        ComponentKind::VertexPoint => vertex_point,
        ComponentKind::VertexTexture => vertex_texture,
        ComponentKind::Face => face,
    };
    all_consuming(parser)(input)
}

/// Parses a single line. `line_number` is 1-based and only used for errors.
///
/// A line whose keyword is known but whose fields do not match the grammar
/// is an error; blank lines and unknown keywords yield [`Line::Empty`].
pub fn parse_line(line_number: usize, input: &str) -> Result<Line<'_>> {
    let line = input.trim();
    if line.is_empty() {
        return Ok(Line::Empty);
    }
    if let Some(text) = line.strip_prefix('#') {
        return Ok(Line::Comment(text.trim_start()));
    }

    let keyword = line.split_whitespace().next().unwrap_or_default();
    let Some(kind) = ComponentKind::from_keyword(keyword) else {
        return Ok(Line::Empty);
    };

    component(kind, line)
        .map(|(_, component)| Line::Component(component))
        .map_err(|_| Error::Format {
            line: line_number,
            message: format!("expected {} record, found {:?}", kind.name(), line),
        })
}

/// Parses OBJ text into records.
///
/// Component ids are 1-based and dense within each [`ComponentKind`]: the
/// n-th vertex line gets id n regardless of the faces or other records
/// around it. Blank and unrecognized lines are dropped.
pub fn parse_str(content: &str) -> Result<Vec<Record>> {
    let start = Instant::now();
    let mut counters = [0usize; ComponentKind::ALL.len()];
    let mut records = Vec::new();
    let mut lines = 0;

    for (number, raw) in content.lines().enumerate() {
        lines += 1;
        match parse_line(number + 1, raw)? {
            Line::Empty => {}
            Line::Comment(text) => records.push(Record::Comment(text.to_string())),
            Line::Component(component) => {
                let counter = &mut counters[component.kind().index()];
                *counter += 1;
                records.push(Record::Component {
                    id: *counter,
                    component,
                });
            }
        }
    }

    tracing::info!(
        parse_time_ms = start.elapsed().as_millis() as u64,
        lines,
        records = records.len(),
        "Parsed OBJ data"
    );
    Ok(records)
}

/// Reads and parses an OBJ file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    parse_str(&content)
}
