/// Main presentation object - the root of the document model.
///
/// Owns the part registry, the root part's relationship table, the backing
/// store for the slide and master id lists, and the deck-level properties.
use crate::opc::constants::relationship_type;
use crate::opc::registry::{PartKind, PartRef, PartRegistry};
use crate::opc::rel::{RelTarget, Relationship, Relationships};
use crate::pml::Emu;
use crate::pml::error::{PmlError, Result};
use crate::pml::id_list::{MasterEntry, SlideEntry, SlideId, SlideIdList};
use crate::pml::shapes::{Placeholder, PlaceholderKind, Shape, ShapeTree};
use crate::pml::slide::{
    Slide, SlideLayout, SlideLayouts, SlideMaster, SlideMasters, Slides, index_out_of_range,
};
use std::collections::HashMap;

/// Default slide width: 10 inches (standard 4:3 aspect ratio).
pub const DEFAULT_SLIDE_WIDTH: Emu = 9_144_000;

/// Default slide height: 7.5 inches.
pub const DEFAULT_SLIDE_HEIGHT: Emu = 6_858_000;

/// Slide ids are numbered from 256 by convention.
pub const FIRST_SLIDE_ID: SlideId = 256;

/// Master ids are numbered from 2147483648 by convention.
const FIRST_MASTER_ID: u32 = 2_147_483_648;

/// Slide dimensions in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideSize {
    /// Slide width in EMUs
    pub width: Emu,
    /// Slide height in EMUs
    pub height: Emu,
}

/// The root presentation part.
///
/// Holds the root relationship table, the optional slide-size record, and the
/// serialized id lists until the deck collections are materialized. A
/// container collaborator builds one of these from the package bytes and
/// receives it back for serialization.
#[derive(Debug)]
pub struct PresentationPart {
    /// Relationships from the root part to slides and masters
    rels: Relationships,

    /// Slide entries in deck order, pending materialization of [`Slides`]
    slide_entries: Vec<SlideEntry>,

    /// Master entries in order, pending materialization of [`SlideMasters`]
    master_entries: Vec<MasterEntry>,

    /// Optional slide-size record; absent means undefined, not zero
    sld_sz: Option<SlideSize>,

    /// Next slide id to allocate
    next_slide_id: SlideId,
}

impl PresentationPart {
    /// Create a root part from materialized package data.
    ///
    /// # Arguments
    /// * `rels` - The root part's relationship table
    /// * `slide_entries` - Slide entries in deck order
    /// * `master_entries` - Master entries in order
    /// * `sld_sz` - The slide-size record, if the package defines one
    pub fn new(
        rels: Relationships,
        slide_entries: Vec<SlideEntry>,
        master_entries: Vec<MasterEntry>,
        sld_sz: Option<SlideSize>,
    ) -> Self {
        let next_slide_id = slide_entries
            .iter()
            .map(|entry| entry.slide_id + 1)
            .max()
            .unwrap_or(FIRST_SLIDE_ID)
            .max(FIRST_SLIDE_ID);
        Self {
            rels,
            slide_entries,
            master_entries,
            sld_sz,
            next_slide_id,
        }
    }

    /// Get the root part's relationship table.
    #[inline]
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    /// Get mutable access to the root part's relationship table.
    #[inline]
    pub fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }

    /// Allocate the next slide id.
    fn allocate_slide_id(&mut self) -> SlideId {
        let slide_id = self.next_slide_id;
        self.next_slide_id += 1;
        slide_id
    }
}

/// A presentation.
///
/// The main high-level API for working with a slide deck, following the
/// python-pptx interface design. Constructed either empty via
/// [`Presentation::new`] or from a materialized package via
/// [`Presentation::from_package`].
///
/// The deck collections ([`Slides`], [`SlideMasters`]) are materialized
/// lazily on first access and cached for the presentation's lifetime; the
/// same instance is returned on every subsequent access.
///
/// All mutating operations take `&mut self`: the document model is
/// single-writer and a presentation must be exclusively owned during a
/// mutating call.
#[derive(Debug)]
pub struct Presentation {
    /// All subordinate parts of the package
    registry: PartRegistry,

    /// The root presentation part
    part: PresentationPart,

    /// Lazily-materialized slide collection, cached once built
    slides: Option<Slides>,

    /// Lazily-materialized master collection, cached once built
    slide_masters: Option<SlideMasters>,
}

impl Presentation {
    /// Create a new presentation with the minimal default deck.
    ///
    /// The deck has one slide master, one layout (with title and body
    /// placeholders) bound to it, no slides, and the default 4:3 slide size.
    pub fn new() -> Self {
        // Building against a fresh registry cannot exhaust partnames
        Self::default_deck().expect("default deck construction cannot fail")
    }

    fn default_deck() -> Result<Self> {
        let mut registry = PartRegistry::new();

        let layout_shapes = ShapeTree::from_shapes(vec![
            Shape::Placeholder(Placeholder::new(PlaceholderKind::Title, "Title 1")),
            Shape::Placeholder(Placeholder::new(PlaceholderKind::Body, "Content Placeholder 2")),
        ]);
        let layout = registry.create_part(PartKind::SlideLayout, layout_shapes)?;

        let master = registry.create_part(PartKind::SlideMaster, ShapeTree::new())?;
        registry
            .part_mut(master)?
            .relate_to(layout, relationship_type::SLIDE_LAYOUT);

        let mut rels = Relationships::new();
        let master_rid = rels.add(relationship_type::SLIDE_MASTER, RelTarget::Part(master));
        let master_entries = vec![MasterEntry {
            id: FIRST_MASTER_ID,
            r_id: master_rid,
        }];

        let sld_sz = Some(SlideSize {
            width: DEFAULT_SLIDE_WIDTH,
            height: DEFAULT_SLIDE_HEIGHT,
        });
        let part = PresentationPart::new(rels, Vec::new(), master_entries, sld_sz);

        Ok(Self::from_package(registry, part))
    }

    /// Create a presentation over an already-materialized package.
    ///
    /// This is the constructor the container collaborator uses after loading
    /// the physical package into a part registry and root part.
    pub fn from_package(registry: PartRegistry, part: PresentationPart) -> Self {
        Self {
            registry,
            part,
            slides: None,
            slide_masters: None,
        }
    }

    /// Consume the presentation, handing the package back for serialization.
    ///
    /// Materialized collections are flushed back into the root part so the
    /// returned pair reflects every mutation.
    pub fn into_package(mut self) -> (PartRegistry, PresentationPart) {
        if let Some(slides) = self.slides.take() {
            self.part.slide_entries = slides.into_list().into_entries();
        }
        if let Some(masters) = self.slide_masters.take() {
            self.part.master_entries = masters.into_entries().into_vec();
        }
        (self.registry, self.part)
    }

    /// Get the part registry.
    #[inline]
    pub fn registry(&self) -> &PartRegistry {
        &self.registry
    }

    /// Get mutable access to the part registry.
    ///
    /// Lower-level access for collaborators that populate part content
    /// directly.
    #[inline]
    pub fn registry_mut(&mut self) -> &mut PartRegistry {
        &mut self.registry
    }

    /// Get the root part's relationship table.
    #[inline]
    pub fn rels(&self) -> &Relationships {
        self.part.rels()
    }

    // ========================================================================
    // Slide Collection
    // ========================================================================

    /// Get the slide collection.
    ///
    /// The collection is built on first access and the same instance is
    /// returned thereafter; a mutation performed through one access is
    /// visible through the next.
    pub fn slides(&mut self) -> &Slides {
        self.slides_mut()
    }

    fn slides_mut(&mut self) -> &mut Slides {
        let pending = &mut self.part.slide_entries;
        self.slides
            .get_or_insert_with(|| Slides::new(SlideIdList::from_entries(std::mem::take(pending))))
    }

    /// Get the number of slides in the presentation.
    pub fn slide_count(&mut self) -> usize {
        self.slides().len()
    }

    /// Get a specific slide by index.
    ///
    /// # Arguments
    /// * `index` - Zero-based position in the deck
    pub fn slide(&mut self, index: usize) -> Result<Slide<'_>> {
        let entry = self.slides().get(index)?;
        let (slide_id, r_id) = (entry.slide_id, entry.r_id.clone());

        let part_ref = self.registry.resolve(self.part.rels(), &r_id)?;
        let part = self.registry.part(part_ref)?;
        if part.kind() != PartKind::Slide {
            return Err(crate::opc::error::OpcError::InvalidRelationship(format!(
                "Relationship '{}' does not target a slide part",
                r_id
            ))
            .into());
        }
        Ok(Slide::new(part_ref, slide_id, part))
    }

    // ========================================================================
    // Slide Mutation
    // ========================================================================

    /// Add a new slide bound to the given layout.
    ///
    /// The new slide's content tree is the empty-slide skeleton: clones of
    /// the layout's placeholder shapes. The slide part is related to the
    /// layout, the root part is related to the slide, and a new entry is
    /// appended to the slide id list.
    ///
    /// Fails with `InvalidLayoutBinding` if the layout is not referenced by
    /// any slide master; the deck is unmodified in that case.
    pub fn add_slide(&mut self, layout: SlideLayout) -> Result<Slide<'_>> {
        let (part_ref, slide_id) = self.add_slide_part(layout.part_ref())?;
        let part = self.registry.part(part_ref)?;
        Ok(Slide::new(part_ref, slide_id, part))
    }

    /// Create the slide part and wire it into the deck.
    ///
    /// All fallible validation happens before the first mutation, so a
    /// failure leaves the id list, the tables, and the registry untouched.
    fn add_slide_part(&mut self, layout: PartRef) -> Result<(PartRef, SlideId)> {
        self.validate_layout(layout)?;

        // Empty-slide skeleton: the layout's placeholders, cloned in order.
        let skeleton = ShapeTree::from_shapes(
            self.registry
                .part(layout)?
                .shapes()
                .placeholders()
                .map(Shape::deep_clone)
                .collect(),
        );

        let slide_ref = self.registry.create_part(PartKind::Slide, skeleton)?;
        self.registry
            .part_mut(slide_ref)?
            .relate_to(layout, relationship_type::SLIDE_LAYOUT);

        let r_id = self
            .part
            .rels_mut()
            .add(relationship_type::SLIDE, RelTarget::Part(slide_ref));
        let slide_id = self.part.allocate_slide_id();
        self.slides_mut()
            .list_mut()
            .push(SlideEntry { slide_id, r_id })?;

        Ok((slide_ref, slide_id))
    }

    /// Check that the layout is a layout part referenced by some master.
    fn validate_layout(&mut self, layout: PartRef) -> Result<()> {
        let layout_part = self.registry.part(layout)?;
        if layout_part.kind() != PartKind::SlideLayout {
            return Err(PmlError::InvalidLayoutBinding(format!(
                "Part '{}' is not a slide layout",
                layout_part.partname()
            )));
        }

        let master_rids: Vec<String> = self
            .slide_masters()
            .iter()
            .map(|entry| entry.r_id.clone())
            .collect();

        for master_rid in master_rids {
            let master_ref = self.registry.resolve(self.part.rels(), &master_rid)?;
            let master = self.registry.part(master_ref)?;
            let bound = master.rels().iter().any(|rel| {
                rel.reltype() == relationship_type::SLIDE_LAYOUT
                    && rel.target().part() == Some(layout)
            });
            if bound {
                return Ok(());
            }
        }

        Err(PmlError::InvalidLayoutBinding(format!(
            "Layout '{}' is not referenced by any slide master",
            self.registry.part(layout)?.partname()
        )))
    }

    /// Copy a slide, placing the copy at the requested index.
    ///
    /// The copy binds the same layout as the source (the layout is shared,
    /// not cloned), carries a deep clone of the source's content tree in the
    /// original order, and re-establishes the source's relationships on the
    /// destination: external edges are deduplicated via
    /// [`Relationships::get_or_add_ext_rel`], internal targets are cloned
    /// into fresh parts, and every relationship id held by the cloned shapes
    /// is remapped to the destination table's ids.
    ///
    /// Both indices are validated - and the source fully resolved - before
    /// anything is mutated, so a failure leaves the deck exactly as it was.
    pub fn copy_slide(&mut self, source_index: usize, target_index: usize) -> Result<Slide<'_>> {
        let len = self.slides().len();
        if source_index >= len {
            return index_out_of_range(source_index, len);
        }
        if target_index >= len {
            return index_out_of_range(target_index, len);
        }

        let source_rid = self.slides().get(source_index)?.r_id.clone();
        let source_ref = self.registry.resolve(self.part.rels(), &source_rid)?;

        // The copy binds the source's layout.
        let layout_ref = self
            .registry
            .part(source_ref)?
            .rels()
            .part_with_reltype(relationship_type::SLIDE_LAYOUT)?
            .target_part()?;

        // Snapshot the source table and check every internal target is live
        // while nothing has been mutated yet.
        let source_rels: Vec<Relationship> = self
            .registry
            .part(source_ref)?
            .rels()
            .iter()
            .cloned()
            .collect();
        for rel in &source_rels {
            if let RelTarget::Part(target) = rel.target() {
                self.registry.part(*target)?;
            }
        }

        let (dest_ref, dest_slide_id) = self.add_slide_part(layout_ref)?;

        // The skeleton placeholders are dropped so the destination starts
        // blank, then the source tree is cloned over in original order.
        let cloned = self.registry.part(source_ref)?.shapes().deep_clone();
        {
            let tree = self.registry.part_mut(dest_ref)?.shapes_mut();
            tree.clear();
            for shape in cloned.into_shapes() {
                tree.append(shape);
            }
        }

        // Re-establish relationships on the destination, building the
        // old-id -> new-id remap as we go.
        let mut remap: HashMap<String, String> = HashMap::new();
        for rel in &source_rels {
            match rel.target() {
                RelTarget::External(url) => {
                    let new_rid = self
                        .registry
                        .part_mut(dest_ref)?
                        .relate_to_ext(url, rel.reltype());
                    remap.insert(rel.r_id().to_string(), new_rid);
                },
                RelTarget::Part(target) => {
                    // The layout edge was established by add_slide against
                    // the shared layout; no shape references it by id.
                    if rel.reltype() == relationship_type::SLIDE_LAYOUT {
                        continue;
                    }
                    let clone_ref = self.registry.clone_part(*target)?;
                    let new_rid = self
                        .registry
                        .part_mut(dest_ref)?
                        .relate_to(clone_ref, rel.reltype());
                    remap.insert(rel.r_id().to_string(), new_rid);
                },
            }
        }
        self.registry
            .part_mut(dest_ref)?
            .shapes_mut()
            .remap_rel_ids(&remap);

        // The new entry was appended at the end; move it into place.
        self.slides_mut().list_mut().move_to(len, target_index)?;

        let part = self.registry.part(dest_ref)?;
        Ok(Slide::new(dest_ref, dest_slide_id, part))
    }

    /// Move a slide from its current index to a new index.
    ///
    /// Both indices are validated against the current slide count; an
    /// out-of-range index fails with `IndexOutOfRange` and leaves the deck
    /// unmodified.
    pub fn move_slide(&mut self, new_index: usize, current_index: usize) -> Result<()> {
        self.slides_mut().list_mut().move_to(current_index, new_index)
    }

    /// Remove the slide at the given index from the deck.
    ///
    /// The entry and the root relationship it names are removed; the slide
    /// part stays in the registry as garbage, to be collected by the owning
    /// collaborator once nothing references it.
    pub fn remove_slide(&mut self, index: usize) -> Result<()> {
        let entry = self.slides_mut().list_mut().remove_at(index)?;
        self.part.rels_mut().remove(&entry.r_id);
        Ok(())
    }

    // ========================================================================
    // Masters and Layouts
    // ========================================================================

    /// Get the slide-master collection.
    ///
    /// Built on first access, same instance returned thereafter.
    pub fn slide_masters(&mut self) -> &SlideMasters {
        let pending = &mut self.part.master_entries;
        self.slide_masters
            .get_or_insert_with(|| SlideMasters::new(std::mem::take(pending).into()))
    }

    /// Get the first slide master.
    ///
    /// Typically presentations have only a single master; this provides
    /// simpler access in that common case.
    pub fn slide_master(&mut self) -> Result<SlideMaster<'_>> {
        let r_id = match self.slide_masters().get(0) {
            Some(entry) => entry.r_id.clone(),
            None => return index_out_of_range(0, 0),
        };

        let part_ref = self.registry.resolve(self.part.rels(), &r_id)?;
        let part = self.registry.part(part_ref)?;
        Ok(SlideMaster::new(part_ref, part))
    }

    /// Get the layouts belonging to the first slide master.
    ///
    /// A presentation can have more than one master, each with its own set of
    /// layouts; this is a convenience for the common single-master case.
    pub fn slide_layouts(&mut self) -> Result<SlideLayouts> {
        Ok(self.slide_master()?.layouts())
    }

    // ========================================================================
    // Slide Size
    // ========================================================================

    /// Get the slide width in EMUs.
    ///
    /// Returns `None` if no slide size is defined.
    pub fn slide_width(&self) -> Option<Emu> {
        self.part.sld_sz.map(|size| size.width)
    }

    /// Set the slide width in EMUs.
    ///
    /// Creates the slide-size record on first write, defaulting the height.
    pub fn set_slide_width(&mut self, width: Emu) {
        let size = self.part.sld_sz.get_or_insert(SlideSize {
            width,
            height: DEFAULT_SLIDE_HEIGHT,
        });
        size.width = width;
    }

    /// Get the slide height in EMUs.
    ///
    /// Returns `None` if no slide size is defined.
    pub fn slide_height(&self) -> Option<Emu> {
        self.part.sld_sz.map(|size| size.height)
    }

    /// Set the slide height in EMUs.
    ///
    /// Creates the slide-size record on first write, defaulting the width.
    pub fn set_slide_height(&mut self, height: Emu) {
        let size = self.part.sld_sz.get_or_insert(SlideSize {
            width: DEFAULT_SLIDE_WIDTH,
            height,
        });
        size.height = height;
    }

    /// Get the slide dimensions, if defined.
    pub fn slide_size(&self) -> Option<SlideSize> {
        self.part.sld_sz
    }
}

impl Default for Presentation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pml::shapes::TextBox;

    /// Build a deck of `n` slides, each tagged with a marker text box so
    /// order can be observed after copies and moves.
    fn deck_with_slides(n: usize) -> Presentation {
        let mut pres = Presentation::new();
        let layout = pres.slide_layouts().unwrap().get(0).unwrap();
        for i in 0..n {
            pres.add_slide(layout).unwrap();
            let part_ref = pres.slide(i).unwrap().part_ref();
            pres.registry_mut()
                .part_mut(part_ref)
                .unwrap()
                .shapes_mut()
                .append(Shape::TextBox(TextBox::new("Marker", &format!("slide-{}", i))));
        }
        pres
    }

    /// Read the marker text of the slide at `index`.
    fn marker(pres: &mut Presentation, index: usize) -> String {
        let slide = pres.slide(index).unwrap();
        slide
            .shapes()
            .iter()
            .find_map(|shape| match shape {
                Shape::TextBox(text_box) => Some(text_box.text.clone()),
                _ => None,
            })
            .expect("slide has a marker text box")
    }

    fn markers(pres: &mut Presentation) -> Vec<String> {
        (0..pres.slide_count())
            .map(|index| marker(pres, index))
            .collect()
    }

    /// Check the deck-wide invariants: unique slide ids, every entry
    /// resolving to a slide part, and no dangling relationship ids in any
    /// slide's content tree.
    fn assert_deck_consistent(pres: &mut Presentation) {
        let entries: Vec<SlideEntry> = pres.slides().iter().cloned().collect();

        for (i, a) in entries.iter().enumerate() {
            for b in &entries[i + 1..] {
                assert_ne!(a.slide_id, b.slide_id, "slide ids must be unique");
            }
        }

        for entry in &entries {
            let part_ref = pres
                .registry()
                .resolve(pres.rels(), &entry.r_id)
                .expect("every listed entry resolves");
            let part = pres.registry().part(part_ref).unwrap();
            assert_eq!(part.kind(), PartKind::Slide);

            for rid in part.shapes().rel_ids() {
                assert!(
                    part.rels().contains(rid),
                    "shape references '{}' absent from the part's table",
                    rid
                );
            }
        }
    }

    #[test]
    fn test_new_presentation() {
        let mut pres = Presentation::new();

        assert_eq!(pres.slide_count(), 0);
        assert_eq!(pres.slide_masters().len(), 1);
        assert_eq!(pres.slide_layouts().unwrap().len(), 1);
        assert_eq!(pres.slide_width(), Some(DEFAULT_SLIDE_WIDTH));
        assert_eq!(pres.slide_height(), Some(DEFAULT_SLIDE_HEIGHT));
    }

    #[test]
    fn test_slides_is_cached_once() {
        let mut pres = deck_with_slides(1);

        let first = pres.slides() as *const Slides;
        let second = pres.slides() as *const Slides;
        assert_eq!(first, second);

        // A mutation through the presentation is visible through the cached
        // collection on the next access.
        let layout = pres.slide_layouts().unwrap().get(0).unwrap();
        pres.add_slide(layout).unwrap();
        assert_eq!(pres.slides().len(), 2);
    }

    #[test]
    fn test_slide_masters_is_cached_once() {
        let mut pres = Presentation::new();

        let first = pres.slide_masters() as *const SlideMasters;
        let second = pres.slide_masters() as *const SlideMasters;
        assert_eq!(first, second);
    }

    #[test]
    fn test_add_slide() {
        let mut pres = Presentation::new();
        let layout = pres.slide_layouts().unwrap().get(0).unwrap();

        let (part_ref, slide_id) = {
            let slide = pres.add_slide(layout).unwrap();
            // Skeleton: the layout's two placeholders, cloned in order
            assert_eq!(slide.shape_count(), 2);
            assert!(slide.shapes().iter().all(Shape::is_placeholder));
            (slide.part_ref(), slide.slide_id())
        };

        assert_eq!(slide_id, FIRST_SLIDE_ID);
        assert_eq!(pres.slide_count(), 1);

        // The slide part is bound to the layout it was created from
        let slide_part = pres.registry().part(part_ref).unwrap();
        let layout_rel = slide_part
            .rels()
            .part_with_reltype(relationship_type::SLIDE_LAYOUT)
            .unwrap();
        assert_eq!(layout_rel.target_part().unwrap(), layout.part_ref());

        assert_deck_consistent(&mut pres);
    }

    #[test]
    fn test_add_slide_rejects_foreign_layout() {
        let mut pres = Presentation::new();

        // A slide part is not a layout
        let bogus = pres
            .registry_mut()
            .create_part(PartKind::Slide, ShapeTree::new())
            .unwrap();
        let result = pres.add_slide(SlideLayout::new(bogus));
        assert!(matches!(result, Err(PmlError::InvalidLayoutBinding(_))));

        // A layout part no master references is rejected too
        let unbound = pres
            .registry_mut()
            .create_part(PartKind::SlideLayout, ShapeTree::new())
            .unwrap();
        let result = pres.add_slide(SlideLayout::new(unbound));
        assert!(matches!(result, Err(PmlError::InvalidLayoutBinding(_))));

        assert_eq!(pres.slide_count(), 0);
    }

    #[test]
    fn test_copy_slide_places_at_requested_index() {
        let mut pres = deck_with_slides(3);

        let copy_id = pres.copy_slide(0, 2).unwrap().slide_id();

        // Append-then-move: [S0,S1,S2] -> [S0,S1,S2,Copy] -> [S0,S1,Copy,S2]
        assert_eq!(pres.slide_count(), 4);
        assert_eq!(
            markers(&mut pres),
            vec!["slide-0", "slide-1", "slide-0", "slide-2"]
        );
        assert_eq!(pres.slide(2).unwrap().slide_id(), copy_id);

        assert_deck_consistent(&mut pres);
    }

    #[test]
    fn test_copy_slide_preserves_content_order() {
        let mut pres = deck_with_slides(1);
        let source_ref = pres.slide(0).unwrap().part_ref();
        {
            let tree = pres
                .registry_mut()
                .part_mut(source_ref)
                .unwrap()
                .shapes_mut();
            tree.append(Shape::TextBox(TextBox::new("Second", "n2")));
            tree.append(Shape::TextBox(TextBox::new("Third", "n3")));
        }

        pres.copy_slide(0, 1).unwrap();

        let source_names: Vec<String> = {
            let slide = pres.slide(0).unwrap();
            slide.shapes().iter().map(|s| s.name().to_string()).collect()
        };
        let dest = pres.slide(1).unwrap();
        let dest_names: Vec<&str> = dest.shapes().iter().map(Shape::name).collect();
        assert_eq!(dest_names, source_names);

        // Structurally equal, identity-distinct: the whole tree matches
        let dest_ref = dest.part_ref();
        assert_ne!(dest_ref, source_ref);
        assert_eq!(
            pres.registry().part(dest_ref).unwrap().shapes(),
            pres.registry().part(source_ref).unwrap().shapes()
        );
    }

    #[test]
    fn test_copy_slide_shares_the_layout() {
        let mut pres = deck_with_slides(1);
        pres.copy_slide(0, 0).unwrap();

        let layout_of = |pres: &mut Presentation, index: usize| {
            let slide = pres.slide(index).unwrap();
            slide
                .rels()
                .part_with_reltype(relationship_type::SLIDE_LAYOUT)
                .unwrap()
                .target_part()
                .unwrap()
        };
        let copy_layout = layout_of(&mut pres, 0);
        let source_layout = layout_of(&mut pres, 1);
        assert_eq!(copy_layout, source_layout);
    }

    #[test]
    fn test_copy_slide_preserves_external_relationships() {
        let mut pres = deck_with_slides(1);
        let source_ref = pres.slide(0).unwrap().part_ref();
        pres.registry_mut()
            .part_mut(source_ref)
            .unwrap()
            .relate_to_ext("https://example.com/x", relationship_type::HYPERLINK);

        pres.copy_slide(0, 0).unwrap();

        let dest = pres.slide(0).unwrap();
        let external: Vec<_> = dest.rels().iter().filter(|rel| rel.is_external()).collect();
        assert_eq!(external.len(), 1);
        assert_eq!(external[0].reltype(), relationship_type::HYPERLINK);
        assert_eq!(external[0].target().url(), Some("https://example.com/x"));
    }

    #[test]
    fn test_copy_slide_clones_internal_targets() {
        let mut pres = deck_with_slides(1);
        let source_ref = pres.slide(0).unwrap().part_ref();

        // Give the source a picture backed by an image part
        let image_ref = pres
            .registry_mut()
            .create_part(PartKind::Image, ShapeTree::new())
            .unwrap();
        let image_rid = pres
            .registry_mut()
            .part_mut(source_ref)
            .unwrap()
            .relate_to(image_ref, relationship_type::IMAGE);
        pres.registry_mut()
            .part_mut(source_ref)
            .unwrap()
            .shapes_mut()
            .append(Shape::Picture(crate::pml::shapes::Picture::new(
                "Picture 9",
                &image_rid,
            )));

        pres.copy_slide(0, 0).unwrap();

        // The copy's picture resolves in the copy's own table, to a fresh
        // image part rather than the source's
        let dest = pres.slide(0).unwrap();
        let dest_rid = dest
            .shapes()
            .iter()
            .find_map(|shape| match shape {
                Shape::Picture(picture) => Some(picture.image_rid.clone()),
                _ => None,
            })
            .expect("copied picture");
        let dest_image = dest.rels().get(&dest_rid).unwrap().target_part().unwrap();
        assert_ne!(dest_image, image_ref);
        assert_eq!(
            pres.registry().part(dest_image).unwrap().kind(),
            PartKind::Image
        );

        assert_deck_consistent(&mut pres);
    }

    #[test]
    fn test_copy_slide_rejects_invalid_indices() {
        let mut pres = deck_with_slides(3);

        assert!(matches!(
            pres.copy_slide(3, 0),
            Err(PmlError::IndexOutOfRange { index: 3, len: 3 })
        ));
        assert!(matches!(
            pres.copy_slide(0, 3),
            Err(PmlError::IndexOutOfRange { index: 3, len: 3 })
        ));

        // Deck unmodified
        assert_eq!(pres.slide_count(), 3);
        assert_eq!(markers(&mut pres), vec!["slide-0", "slide-1", "slide-2"]);
        assert_deck_consistent(&mut pres);
    }

    #[test]
    fn test_move_slide() {
        let mut pres = deck_with_slides(4);

        // [A,B,C,D]: move current 0 to position 2 -> [B,C,A,D]
        pres.move_slide(2, 0).unwrap();
        assert_eq!(
            markers(&mut pres),
            vec!["slide-1", "slide-2", "slide-0", "slide-3"]
        );

        // Move current 3 to the front -> [D,B,C,A] in original labels
        pres.move_slide(0, 3).unwrap();
        assert_eq!(
            markers(&mut pres),
            vec!["slide-3", "slide-1", "slide-2", "slide-0"]
        );

        assert_deck_consistent(&mut pres);
    }

    #[test]
    fn test_move_slide_rejects_invalid_indices() {
        let mut pres = deck_with_slides(2);

        assert!(matches!(
            pres.move_slide(2, 0),
            Err(PmlError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert!(matches!(
            pres.move_slide(0, 2),
            Err(PmlError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert_eq!(markers(&mut pres), vec!["slide-0", "slide-1"]);
    }

    #[test]
    fn test_remove_slide() {
        let mut pres = deck_with_slides(3);
        let removed_rid = pres.slides().get(1).unwrap().r_id.clone();

        pres.remove_slide(1).unwrap();

        assert_eq!(pres.slide_count(), 2);
        assert_eq!(markers(&mut pres), vec!["slide-0", "slide-2"]);
        // The root relationship the entry named is gone
        assert!(!pres.rels().contains(&removed_rid));
        assert_deck_consistent(&mut pres);

        assert!(matches!(
            pres.remove_slide(2),
            Err(PmlError::IndexOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_slide_size_absent_reads_as_none() {
        let registry = PartRegistry::new();
        let part = PresentationPart::new(Relationships::new(), Vec::new(), Vec::new(), None);
        let mut pres = Presentation::from_package(registry, part);

        assert_eq!(pres.slide_width(), None);
        assert_eq!(pres.slide_height(), None);
        assert_eq!(pres.slide_size(), None);

        // First write materializes the record, defaulting the other axis
        pres.set_slide_width(12_192_000);
        assert_eq!(pres.slide_width(), Some(12_192_000));
        assert_eq!(pres.slide_height(), Some(DEFAULT_SLIDE_HEIGHT));

        pres.set_slide_height(6_858_000);
        assert_eq!(
            pres.slide_size(),
            Some(SlideSize {
                width: 12_192_000,
                height: 6_858_000
            })
        );
    }

    #[test]
    fn test_into_package_flushes_materialized_state() {
        let mut pres = deck_with_slides(2);
        pres.copy_slide(0, 1).unwrap();

        let (registry, part) = pres.into_package();

        assert_eq!(part.slide_entries.len(), 3);
        assert_eq!(part.master_entries.len(), 1);
        for entry in &part.slide_entries {
            registry
                .resolve(part.rels(), &entry.r_id)
                .expect("flushed entries resolve");
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn prop_moves_keep_the_deck_consistent(
                len in 1usize..5,
                moves in prop::collection::vec((0usize..8, 0usize..8), 0..6),
            ) {
                let mut pres = deck_with_slides(len);
                let original: Vec<SlideId> =
                    pres.slides().iter().map(|entry| entry.slide_id).collect();

                for (new_seed, cur_seed) in moves {
                    pres.move_slide(new_seed % len, cur_seed % len).unwrap();
                }

                // Still the same set of slides, in some order
                let mut after: Vec<SlideId> =
                    pres.slides().iter().map(|entry| entry.slide_id).collect();
                after.sort_unstable();
                let mut expected = original.clone();
                expected.sort_unstable();
                prop_assert_eq!(after, expected);

                assert_deck_consistent(&mut pres);
            }
        }
    }
}
