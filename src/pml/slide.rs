/// Slide-related objects, including the Slide and SlideMaster handles and the
/// deck-level collections built over the root part's id lists.
use crate::opc::constants::relationship_type;
use crate::opc::registry::{Part, PartRef};
use crate::opc::rel::Relationships;
use crate::pml::error::{PmlError, Result};
use crate::pml::id_list::{MasterEntry, SlideEntry, SlideId, SlideIdList};
use crate::pml::shapes::ShapeTree;
use smallvec::SmallVec;

/// A slide in a presentation.
///
/// A read handle over the slide part, exposing the part's content tree and
/// relationship table.
pub struct Slide<'a> {
    /// Handle of the slide part in the registry
    part_ref: PartRef,
    /// Position-independent slide identity
    slide_id: SlideId,
    /// The underlying part
    part: &'a Part,
}

impl<'a> Slide<'a> {
    /// Create a new Slide handle.
    ///
    /// This is typically called internally.
    #[inline]
    pub(crate) fn new(part_ref: PartRef, slide_id: SlideId, part: &'a Part) -> Self {
        Self {
            part_ref,
            slide_id,
            part,
        }
    }

    /// Get the slide id.
    #[inline]
    pub fn slide_id(&self) -> SlideId {
        self.slide_id
    }

    /// Get the registry handle of the slide part.
    #[inline]
    pub fn part_ref(&self) -> PartRef {
        self.part_ref
    }

    /// Get the slide name, derived from the partname.
    pub fn name(&self) -> &str {
        self.part.partname().filename()
    }

    /// Get the content tree of the slide.
    #[inline]
    pub fn shapes(&self) -> &ShapeTree {
        self.part.shapes()
    }

    /// Get the relationship table of the slide part.
    #[inline]
    pub fn rels(&self) -> &Relationships {
        self.part.rels()
    }

    /// Get the number of shapes on the slide.
    #[inline]
    pub fn shape_count(&self) -> usize {
        self.part.shapes().len()
    }
}

/// A slide layout, identified by its part handle.
///
/// Layouts are shared: a new slide binds to one without cloning it, so the
/// handle is a plain copyable reference into the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideLayout {
    part: PartRef,
}

impl SlideLayout {
    #[inline]
    pub(crate) fn new(part: PartRef) -> Self {
        Self { part }
    }

    /// Get the registry handle of the layout part.
    #[inline]
    pub fn part_ref(&self) -> PartRef {
        self.part
    }
}

/// The layouts belonging to one slide master, in relationship-id order.
#[derive(Debug, Default)]
pub struct SlideLayouts {
    refs: SmallVec<[PartRef; 4]>,
}

impl SlideLayouts {
    pub(crate) fn new(refs: SmallVec<[PartRef; 4]>) -> Self {
        Self { refs }
    }

    /// Get a layout by index.
    pub fn get(&self, index: usize) -> Option<SlideLayout> {
        self.refs.get(index).copied().map(SlideLayout::new)
    }

    /// Get the number of layouts.
    #[inline]
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    /// Check if the collection is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Get an iterator over the layouts in order.
    pub fn iter(&self) -> impl Iterator<Item = SlideLayout> + '_ {
        self.refs.iter().copied().map(SlideLayout::new)
    }
}

/// A slide master in a presentation.
pub struct SlideMaster<'a> {
    /// Handle of the master part in the registry
    part_ref: PartRef,
    /// The underlying part
    part: &'a Part,
}

impl<'a> SlideMaster<'a> {
    #[inline]
    pub(crate) fn new(part_ref: PartRef, part: &'a Part) -> Self {
        Self { part_ref, part }
    }

    /// Get the registry handle of the master part.
    #[inline]
    pub fn part_ref(&self) -> PartRef {
        self.part_ref
    }

    /// Get the content tree of the master.
    #[inline]
    pub fn shapes(&self) -> &ShapeTree {
        self.part.shapes()
    }

    /// Get the relationship table of the master part.
    #[inline]
    pub fn rels(&self) -> &Relationships {
        self.part.rels()
    }

    /// Get the layouts belonging to this master.
    ///
    /// Layouts are the master's internal slide-layout relationships, ordered
    /// by relationship-id number.
    pub fn layouts(&self) -> SlideLayouts {
        let mut ordered: SmallVec<[(u32, PartRef); 4]> = self
            .part
            .rels()
            .iter()
            .filter(|rel| rel.reltype() == relationship_type::SLIDE_LAYOUT)
            .filter_map(|rel| {
                let part = rel.target().part()?;
                Some((rel_id_number(rel.r_id()), part))
            })
            .collect();
        ordered.sort_unstable_by_key(|(number, _)| *number);

        SlideLayouts::new(ordered.into_iter().map(|(_, part)| part).collect())
    }
}

/// Extract the numeric suffix of an "rId{n}" relationship id.
///
/// Ids that don't follow the convention sort last.
fn rel_id_number(r_id: &str) -> u32 {
    if r_id.len() > 3 && &r_id[..3] == "rId" {
        atoi_simd::parse::<u32, false, false>(&r_id.as_bytes()[3..]).unwrap_or(u32::MAX)
    } else {
        u32::MAX
    }
}

/// The ordered slide collection of a deck.
///
/// A façade over the slide id list, materialized lazily by the presentation
/// on first access and cached for its lifetime. Exposes order, length, and
/// index access; the algorithms that must mutate the id list and the part
/// registry together (add, copy, move, remove) live on the presentation.
#[derive(Debug, Default)]
pub struct Slides {
    list: SlideIdList,
}

impl Slides {
    pub(crate) fn new(list: SlideIdList) -> Self {
        Self { list }
    }

    /// Get the number of slides.
    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Check if the deck has no slides.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Get the entry at the given index.
    pub fn get(&self, index: usize) -> Result<&SlideEntry> {
        self.list.get(index)
    }

    /// Get an iterator over the entries in presentation order.
    pub fn iter(&self) -> impl Iterator<Item = &SlideEntry> {
        self.list.iter()
    }

    /// Get mutable access to the underlying id list.
    #[inline]
    pub(crate) fn list_mut(&mut self) -> &mut SlideIdList {
        &mut self.list
    }

    pub(crate) fn into_list(self) -> SlideIdList {
        self.list
    }
}

/// The ordered slide-master collection of a deck.
///
/// Like [`Slides`], materialized lazily by the presentation on first access
/// and cached for its lifetime.
#[derive(Debug, Default)]
pub struct SlideMasters {
    entries: SmallVec<[MasterEntry; 2]>,
}

impl SlideMasters {
    pub(crate) fn new(entries: SmallVec<[MasterEntry; 2]>) -> Self {
        Self { entries }
    }

    /// Get the number of masters.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the collection is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the entry at the given index.
    pub fn get(&self, index: usize) -> Option<&MasterEntry> {
        self.entries.get(index)
    }

    /// Get an iterator over the entries in order.
    pub fn iter(&self) -> impl Iterator<Item = &MasterEntry> {
        self.entries.iter()
    }

    pub(crate) fn into_entries(self) -> SmallVec<[MasterEntry; 2]> {
        self.entries
    }
}

/// Map a collection lookup miss to the index error the caller reported.
pub(crate) fn index_out_of_range<T>(index: usize, len: usize) -> Result<T> {
    Err(PmlError::IndexOutOfRange { index, len })
}
