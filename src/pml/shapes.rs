/// Shape types making up a part's content tree.
use crate::pml::Emu;
use std::collections::HashMap;

/// Shape position and size in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShapeGeometry {
    /// X position in EMUs
    pub x: Emu,
    /// Y position in EMUs
    pub y: Emu,
    /// Width in EMUs
    pub cx: Emu,
    /// Height in EMUs
    pub cy: Emu,
}

impl ShapeGeometry {
    /// Create a new geometry record.
    pub fn new(x: Emu, y: Emu, cx: Emu, cy: Emu) -> Self {
        Self { x, y, cx, cy }
    }
}

/// Placeholder kind enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    /// Title placeholder
    Title,
    /// Body placeholder
    Body,
    /// Subtitle placeholder
    Subtitle,
}

/// A text box shape (p:sp with a text frame).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBox {
    /// Shape name
    pub name: String,
    /// Position and size
    pub geometry: ShapeGeometry,
    /// Text content
    pub text: String,
    /// Relationship id of a hyperlink attached to the text, if any
    pub hyperlink_rid: Option<String>,
}

impl TextBox {
    /// Create a new text box with default geometry and no hyperlink.
    pub fn new(name: &str, text: &str) -> Self {
        Self {
            name: name.to_string(),
            geometry: ShapeGeometry::default(),
            text: text.to_string(),
            hyperlink_rid: None,
        }
    }
}

/// A placeholder shape inherited visually from the layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Placeholder kind
    pub kind: PlaceholderKind,
    /// Shape name
    pub name: String,
    /// Position and size
    pub geometry: ShapeGeometry,
    /// Text content
    pub text: String,
}

impl Placeholder {
    /// Create a new empty placeholder with default geometry.
    pub fn new(kind: PlaceholderKind, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            geometry: ShapeGeometry::default(),
            text: String::new(),
        }
    }
}

/// A picture shape (p:pic) whose fill references an image part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    /// Shape name
    pub name: String,
    /// Position and size
    pub geometry: ShapeGeometry,
    /// Relationship id of the image part providing the fill
    pub image_rid: String,
}

impl Picture {
    /// Create a new picture referencing an image relationship.
    pub fn new(name: &str, image_rid: &str) -> Self {
        Self {
            name: name.to_string(),
            geometry: ShapeGeometry::default(),
            image_rid: image_rid.to_string(),
        }
    }
}

/// A group shape (p:grpSp) holding child shapes in order.
#[derive(Debug, PartialEq, Eq)]
pub struct Group {
    /// Shape name
    pub name: String,
    /// Child shapes, in sibling order
    pub children: Vec<Shape>,
}

/// A content-tree node.
///
/// Shapes keep a stable position among their siblings and may hold
/// relationship references by id (an image fill, a hyperlink); those ids are
/// scoped to the owning part's relationship table.
#[derive(Debug, PartialEq, Eq)]
pub enum Shape {
    /// A text shape
    TextBox(TextBox),
    /// A placeholder shape
    Placeholder(Placeholder),
    /// A picture shape
    Picture(Picture),
    /// A group of shapes
    Group(Group),
}

impl Shape {
    /// Get the shape name.
    pub fn name(&self) -> &str {
        match self {
            Shape::TextBox(shape) => &shape.name,
            Shape::Placeholder(shape) => &shape.name,
            Shape::Picture(shape) => &shape.name,
            Shape::Group(shape) => &shape.name,
        }
    }

    /// Check if this shape is a placeholder.
    #[inline]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Shape::Placeholder(_))
    }

    /// Deep-clone this shape.
    ///
    /// Every variant produces a structurally equal, identity-distinct copy;
    /// group children are cloned recursively in sibling order.
    pub fn deep_clone(&self) -> Shape {
        match self {
            Shape::TextBox(shape) => Shape::TextBox(shape.clone()),
            Shape::Placeholder(shape) => Shape::Placeholder(shape.clone()),
            Shape::Picture(shape) => Shape::Picture(shape.clone()),
            Shape::Group(group) => Shape::Group(Group {
                name: group.name.clone(),
                children: group.children.iter().map(Shape::deep_clone).collect(),
            }),
        }
    }

    /// Collect every relationship id referenced by this shape, recursively.
    pub fn collect_rel_ids<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Shape::TextBox(shape) => {
                if let Some(rid) = &shape.hyperlink_rid {
                    out.push(rid);
                }
            },
            Shape::Placeholder(_) => {},
            Shape::Picture(shape) => out.push(&shape.image_rid),
            Shape::Group(group) => {
                for child in &group.children {
                    child.collect_rel_ids(out);
                }
            },
        }
    }

    /// Rewrite relationship ids held by this shape through a remap table.
    ///
    /// Ids absent from the table are left untouched.
    pub fn remap_rel_ids(&mut self, remap: &HashMap<String, String>) {
        match self {
            Shape::TextBox(shape) => {
                if let Some(rid) = &shape.hyperlink_rid
                    && let Some(new_rid) = remap.get(rid)
                {
                    shape.hyperlink_rid = Some(new_rid.clone());
                }
            },
            Shape::Placeholder(_) => {},
            Shape::Picture(shape) => {
                if let Some(new_rid) = remap.get(&shape.image_rid) {
                    shape.image_rid = new_rid.clone();
                }
            },
            Shape::Group(group) => {
                for child in &mut group.children {
                    child.remap_rel_ids(remap);
                }
            },
        }
    }
}

/// The ordered content tree owned by a part.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ShapeTree {
    shapes: Vec<Shape>,
}

impl ShapeTree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self { shapes: Vec::new() }
    }

    /// Create a tree from shapes in the given order.
    pub fn from_shapes(shapes: Vec<Shape>) -> Self {
        Self { shapes }
    }

    /// Append a shape after the current last sibling.
    pub fn append(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Remove all shapes.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Get the number of top-level shapes.
    #[inline]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Check if the tree is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Get a shape by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    /// Get an iterator over the shapes in sibling order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    /// Get an iterator over the placeholder shapes, in order.
    pub fn placeholders(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(|shape| shape.is_placeholder())
    }

    /// Deep-clone the whole tree, preserving order.
    pub fn deep_clone(&self) -> ShapeTree {
        ShapeTree {
            shapes: self.shapes.iter().map(Shape::deep_clone).collect(),
        }
    }

    /// Consume the tree, yielding its shapes in order.
    pub fn into_shapes(self) -> Vec<Shape> {
        self.shapes
    }

    /// Collect every relationship id referenced anywhere in the tree.
    pub fn rel_ids(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for shape in &self.shapes {
            shape.collect_rel_ids(&mut out);
        }
        out
    }

    /// Rewrite relationship ids throughout the tree through a remap table.
    pub fn remap_rel_ids(&mut self, remap: &HashMap<String, String>) {
        for shape in &mut self.shapes {
            shape.remap_rel_ids(remap);
        }
    }
}
