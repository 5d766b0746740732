//! Core data model for mind maps.
//!
//! A mind map is a tree of topic `Node`s joined by `Link`s. The tree shape
//! lives in `Node::parent_id`; links are the visual (and physical)
//! connections and normally mirror the parent relation one-to-one.
//! Positions are a copy of the physics state, refreshed once per frame.

use crate::id::{LinkId, NodeId};
use kurbo::Point;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Title given to nodes created without one.
pub const DEFAULT_TITLE: &str = "New Node";

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Multiplier used by `brighter`, matching the common CSS/d3 convention.
const BRIGHTER: f32 = 1.0 / 0.7;

impl Color {
    /// Fill of the central topic.
    pub const CENTER: Color = Color::rgb8(0x4a, 0x6b, 0xdf);
    /// Fill of a child topic that has no parent to derive from.
    pub const CHILD: Color = Color::rgb8(0x6b, 0xdf, 0x4a);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Parse a hex color string: `#RGB`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();
        let byte = |i: usize| Some(hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?);

        match bytes.len() {
            3 => {
                let r = hex_val(bytes[0])?;
                let g = hex_val(bytes[1])?;
                let b = hex_val(bytes[2])?;
                Some(Self::rgb8(r * 17, g * 17, b * 17))
            }
            6 => Some(Self::rgb8(byte(0)?, byte(2)?, byte(4)?)),
            8 => {
                let mut c = Self::rgb8(byte(0)?, byte(2)?, byte(4)?);
                c.a = byte(6)? as f32 / 255.0;
                Some(c)
            }
            _ => None,
        }
    }

    /// Parse CSS functional notation: `rgb(r, g, b)` or `rgba(r, g, b, a)`,
    /// channels in 0..=255 (fractions allowed) and alpha in 0..=1.
    pub fn from_css_rgb(s: &str) -> Option<Self> {
        let s = s.trim();
        let inner = s
            .strip_prefix("rgba(")
            .or_else(|| s.strip_prefix("rgb("))?
            .strip_suffix(')')?;
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        let channel = |p: &str| {
            p.parse::<f64>()
                .ok()
                .map(|v| (v / 255.0).clamp(0.0, 1.0) as f32)
        };
        let alpha = |p: &str| p.parse::<f32>().ok().map(|a| a.clamp(0.0, 1.0));
        match parts.as_slice() {
            [r, g, b] => Some(Self::rgba(channel(r)?, channel(g)?, channel(b)?, 1.0)),
            [r, g, b, a] => Some(Self::rgba(channel(r)?, channel(g)?, channel(b)?, alpha(a)?)),
            _ => None,
        }
    }

    /// Parse either hex or CSS `rgb()`/`rgba()` notation.
    pub fn parse(s: &str) -> Option<Self> {
        Self::from_hex(s.trim()).or_else(|| Self::from_css_rgb(s))
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (r, g, b, a) = (
            channel(self.r),
            channel(self.g),
            channel(self.b),
            channel(self.a),
        );
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }

    /// Emit in the file form: hex when 8-bit channels hold the color
    /// exactly, else `rgba()` with fractional channels. Parsing the result
    /// gives back the same color bit for bit.
    pub fn to_css(&self) -> String {
        let hex = self.to_hex();
        if Self::from_hex(&hex) == Some(*self) {
            return hex;
        }
        let channel = |v: f32| f64::from(v) * 255.0;
        format!(
            "rgba({}, {}, {}, {})",
            channel(self.r),
            channel(self.g),
            channel(self.b),
            self.a
        )
    }

    /// Lighten by `k` steps; each step scales RGB by 1/0.7. Alpha is kept.
    pub fn brighter(&self, k: f32) -> Self {
        let factor = BRIGHTER.powf(k);
        Self::rgba(
            (self.r * factor).min(1.0),
            (self.g * factor).min(1.0),
            (self.b * factor).min(1.0),
            self.a,
        )
    }

    /// Color of a node created under a parent of this color.
    pub fn derive_child(&self) -> Self {
        let mut c = self.brighter(0.2);
        c.a = 0.9;
        c
    }

    /// Channel-wise comparison within one 8-bit step.
    pub fn approx_eq(&self, other: &Color) -> bool {
        const EPS: f32 = 1.0 / 255.0;
        (self.r - other.r).abs() <= EPS
            && (self.g - other.g).abs() <= EPS
            && (self.b - other.b).abs() <= EPS
            && (self.a - other.a).abs() <= EPS
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color `{s}`")))
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// Role of a node within its mind map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Center,
    Child,
}

impl NodeKind {
    /// Fill used when there is no parent color to derive from.
    pub fn base_color(self) -> Color {
        match self {
            NodeKind::Center => Color::CENTER,
            NodeKind::Child => Color::CHILD,
        }
    }
}

/// A topic in the mind map.
///
/// The physics body is not stored here; the physics adapter keeps it in a
/// table keyed by the same `NodeId`.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub title: String,
    pub content: String,
    pub kind: NodeKind,
    pub parent_id: Option<NodeId>,
    /// Last position copied from the physics body.
    pub position: Point,
    pub color: Color,
}

impl Node {
    pub fn new(id: NodeId, title: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id,
            title: title.into(),
            content: String::new(),
            kind,
            parent_id: None,
            position: Point::ZERO,
            color: kind.base_color(),
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent_id = Some(parent);
        self
    }

    #[must_use]
    pub fn at(mut self, position: Point) -> Self {
        self.position = position;
        self
    }
}

// ─── Links ───────────────────────────────────────────────────────────────

/// A connection between two nodes (normally parent → child).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Link {
    pub id: LinkId,
}

impl Link {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self {
            id: LinkId::new(source, target),
        }
    }

    pub fn source(&self) -> NodeId {
        self.id.source
    }

    pub fn target(&self) -> NodeId {
        self.id.target
    }
}

// ─── Snapshot ────────────────────────────────────────────────────────────

/// A detached copy of a whole mind map, without physics bindings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_hex_roundtrip() {
        let c = Color::from_hex("#4A6BDF").unwrap();
        assert_eq!(c.to_hex(), "#4A6BDF");

        let c2 = Color::from_hex("#FF000080").unwrap();
        assert!((c2.a - 128.0 / 255.0).abs() < 0.01);
        assert_eq!(c2.to_hex().len(), 9);
    }

    #[test]
    fn css_rgba_is_accepted() {
        let c = Color::parse("rgba(105, 152, 255, 0.5)").unwrap();
        assert_eq!(c.to_hex(), "#6998FF80");
        assert!(Color::parse("rgb(1, 2)").is_none());
        assert!(Color::parse("not a color").is_none());
    }

    #[test]
    fn file_form_is_exact() {
        assert_eq!(Color::CENTER.to_css(), "#4A6BDF");
        let child = Color::CENTER.derive_child();
        let text = child.to_css();
        assert!(text.starts_with("rgba("), "{text}");
        assert_eq!(Color::parse(&text), Some(child));

        let grandchild = child.derive_child();
        assert_eq!(Color::parse(&grandchild.to_css()), Some(grandchild));
    }

    #[test]
    fn derived_child_color_is_lighter_and_translucent() {
        let child = Color::CENTER.derive_child();
        assert!(child.r > Color::CENTER.r);
        assert!(child.g > Color::CENTER.g);
        assert!(child.b >= Color::CENTER.b);
        assert!(child.b <= 1.0);
        assert_eq!(child.a, 0.9);
    }

    #[test]
    fn base_color_per_kind() {
        assert_eq!(NodeKind::Center.base_color().to_hex(), "#4A6BDF");
        assert_eq!(NodeKind::Child.base_color().to_hex(), "#6BDF4A");
    }
}
