use crate::opc::constants::content_type;
use crate::opc::error::{OpcError, Result};
use crate::opc::packuri::PackURI;
use crate::opc::rel::Relationships;
use crate::pml::shapes::ShapeTree;

/// The part registry: a flat arena of package parts addressed by opaque handles.
///
/// Parts reference each other through relationship edges rather than nested
/// ownership pointers, which keeps the ownership structure tree-shaped even
/// though the reference graph may contain cycles.

/// Opaque handle identifying a part in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartRef(usize);

impl PartRef {
    #[cfg(test)]
    pub(crate) fn for_test(index: usize) -> Self {
        Self(index)
    }
}

/// The kind of content a part holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    /// A slide part (p:sld)
    Slide,
    /// A slide layout part (p:sldLayout)
    SlideLayout,
    /// A slide master part (p:sldMaster)
    SlideMaster,
    /// An image part referenced by a picture fill
    Image,
}

impl PartKind {
    /// Get the partname template for numbering new parts of this kind.
    fn partname_template(&self) -> &'static str {
        match self {
            PartKind::Slide => "/ppt/slides/slide%d.xml",
            PartKind::SlideLayout => "/ppt/slideLayouts/slideLayout%d.xml",
            PartKind::SlideMaster => "/ppt/slideMasters/slideMaster%d.xml",
            PartKind::Image => "/ppt/media/image%d.png",
        }
    }

    /// Get the content type of parts of this kind.
    pub fn content_type(&self) -> &'static str {
        match self {
            PartKind::Slide => content_type::PML_SLIDE,
            PartKind::SlideLayout => content_type::PML_SLIDE_LAYOUT,
            PartKind::SlideMaster => content_type::PML_SLIDE_MASTER,
            PartKind::Image => content_type::PNG,
        }
    }
}

/// A part in the package: a named unit of content with its own
/// relationship table.
#[derive(Debug)]
pub struct Part {
    /// The partname (URI) of this part
    partname: PackURI,

    /// The kind of content this part holds
    kind: PartKind,

    /// The ordered content tree owned by this part
    shapes: ShapeTree,

    /// Relationships from this part to other parts
    rels: Relationships,
}

impl Part {
    fn new(partname: PackURI, kind: PartKind, shapes: ShapeTree) -> Self {
        Self {
            partname,
            kind,
            shapes,
            rels: Relationships::new(),
        }
    }

    /// Get the partname of this part.
    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    /// Get the kind of this part.
    #[inline]
    pub fn kind(&self) -> PartKind {
        self.kind
    }

    /// Get the content type of this part.
    #[inline]
    pub fn content_type(&self) -> &'static str {
        self.kind.content_type()
    }

    /// Get the content tree of this part.
    #[inline]
    pub fn shapes(&self) -> &ShapeTree {
        &self.shapes
    }

    /// Get mutable access to the content tree of this part.
    #[inline]
    pub fn shapes_mut(&mut self) -> &mut ShapeTree {
        &mut self.shapes
    }

    /// Get the relationships for this part.
    #[inline]
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    /// Get mutable access to the relationships for this part.
    #[inline]
    pub fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }

    /// Add a relationship to another part.
    ///
    /// Always mints a fresh edge; internal targets are never shared between
    /// relationships (see [`Relationships::add`]).
    ///
    /// # Returns
    /// The new rId
    pub fn relate_to(&mut self, target: PartRef, reltype: &str) -> String {
        self.rels.add(reltype, crate::opc::rel::RelTarget::Part(target))
    }

    /// Add or get an external relationship.
    pub fn relate_to_ext(&mut self, target_url: &str, reltype: &str) -> String {
        self.rels.get_or_add_ext_rel(reltype, target_url)
    }
}

/// Flat registry of all subordinate parts in a package.
///
/// Parts are stored in an arena and addressed by [`PartRef`] handles; handles
/// stay valid for the lifetime of the registry (parts are never removed, only
/// left unreferenced for the owning collaborator to collect).
#[derive(Debug, Default)]
pub struct PartRegistry {
    parts: Vec<Part>,
}

impl PartRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// Create a new part of the given kind holding the given content tree.
    ///
    /// The part is named from the kind's partname template with the next free
    /// number and starts with an empty relationship table.
    pub fn create_part(&mut self, kind: PartKind, shapes: ShapeTree) -> Result<PartRef> {
        let partname = self.next_partname(kind.partname_template())?;
        self.parts.push(Part::new(partname, kind, shapes));
        Ok(PartRef(self.parts.len() - 1))
    }

    /// Clone a part into a fresh identity.
    ///
    /// The content tree is deep-copied; the clone's relationship table is
    /// empty. Relationships are re-established by the caller, never copied
    /// automatically, since copying them would duplicate ownership of the
    /// target parts.
    pub fn clone_part(&mut self, part: PartRef) -> Result<PartRef> {
        let source = self.part(part)?;
        let kind = source.kind();
        let shapes = source.shapes().deep_clone();
        self.create_part(kind, shapes)
    }

    /// Resolve a relationship id against a relationship table.
    ///
    /// # Arguments
    /// * `rels` - The relationship table of the part the id is scoped to
    /// * `r_id` - The relationship ID to resolve
    ///
    /// # Returns
    /// The referenced part, or `UnresolvedRelationship` if the id is absent
    /// from the table, or `InvalidRelationship` if the edge is external.
    pub fn resolve(&self, rels: &Relationships, r_id: &str) -> Result<PartRef> {
        let rel = rels
            .get(r_id)
            .map_err(|_| OpcError::UnresolvedRelationship(r_id.to_string()))?;
        let part = rel.target_part()?;
        if part.0 >= self.parts.len() {
            return Err(OpcError::PartNotFound(format!(
                "Relationship '{}' targets a part outside the registry",
                r_id
            )));
        }
        Ok(part)
    }

    /// Get a part by its handle.
    pub fn part(&self, part: PartRef) -> Result<&Part> {
        self.parts
            .get(part.0)
            .ok_or_else(|| OpcError::PartNotFound(format!("part #{}", part.0)))
    }

    /// Get a mutable reference to a part by its handle.
    pub fn part_mut(&mut self, part: PartRef) -> Result<&mut Part> {
        self.parts
            .get_mut(part.0)
            .ok_or_else(|| OpcError::PartNotFound(format!("part #{}", part.0)))
    }

    /// Get the number of parts in the registry.
    #[inline]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Get an iterator over all parts with their handles.
    pub fn iter_parts(&self) -> impl Iterator<Item = (PartRef, &Part)> {
        self.parts
            .iter()
            .enumerate()
            .map(|(index, part)| (PartRef(index), part))
    }

    /// Check if a part with the given partname exists.
    pub fn contains_partname(&self, partname: &PackURI) -> bool {
        self.parts.iter().any(|part| part.partname() == partname)
    }

    /// Find the next available partname for a partname template.
    ///
    /// Fills the template's %d placeholder with sequential numbers
    /// (e.g., /ppt/slides/slide1.xml, /ppt/slides/slide2.xml).
    fn next_partname(&self, template: &str) -> Result<PackURI> {
        let mut n = 1u32;
        loop {
            let candidate = PackURI::new(template.replace("%d", &n.to_string()))?;
            if !self.contains_partname(&candidate) {
                return Ok(candidate);
            }
            n += 1;
            if n > 10000 {
                // Safety limit to prevent infinite loops
                return Err(OpcError::InvalidPartName(
                    "Too many parts, cannot find next partname".to_string(),
                ));
            }
        }
    }
}
