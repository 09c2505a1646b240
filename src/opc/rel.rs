use crate::opc::error::{OpcError, Result};
use crate::opc::registry::PartRef;
/// Relationship-related objects for presentation packages.
///
/// This module provides types for managing relationships between parts in a
/// package, including internal and external relationships.
use std::collections::HashMap;

/// The target of a relationship edge.
///
/// Internal relationships reference another part in the registry and convey
/// ownership of it; external relationships point outside the package (e.g., a
/// hyperlink URL) and own nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelTarget {
    /// An internal target: a part in the registry
    Part(PartRef),
    /// An external target: a URL outside the package
    External(String),
}

impl RelTarget {
    /// Check if this target is external to the package.
    #[inline]
    pub fn is_external(&self) -> bool {
        matches!(self, RelTarget::External(_))
    }

    /// Get the target part for internal targets.
    #[inline]
    pub fn part(&self) -> Option<PartRef> {
        match self {
            RelTarget::Part(part) => Some(*part),
            RelTarget::External(_) => None,
        }
    }

    /// Get the target URL for external targets.
    #[inline]
    pub fn url(&self) -> Option<&str> {
        match self {
            RelTarget::Part(_) => None,
            RelTarget::External(url) => Some(url),
        }
    }
}

/// A single relationship from a source part to a target.
///
/// Represents a connection between parts in a package, identified by an rId
/// (relationship ID) unique within the owning part's table.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1", "rId2")
    r_id: String,

    /// Relationship type URI
    reltype: String,

    /// Target of the relationship edge
    target: RelTarget,
}

impl Relationship {
    /// Create a new relationship.
    ///
    /// # Arguments
    /// * `r_id` - Relationship ID (e.g., "rId1")
    /// * `reltype` - Relationship type URI
    /// * `target` - Target of the relationship edge
    pub fn new(r_id: String, reltype: String, target: RelTarget) -> Self {
        Self {
            r_id,
            reltype,
            target,
        }
    }

    /// Get the relationship ID.
    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    /// Get the relationship type.
    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    /// Get the relationship target.
    #[inline]
    pub fn target(&self) -> &RelTarget {
        &self.target
    }

    /// Check if this is an external relationship.
    #[inline]
    pub fn is_external(&self) -> bool {
        self.target.is_external()
    }

    /// Get the target part for internal relationships.
    ///
    /// Returns an error if this is an external relationship.
    pub fn target_part(&self) -> Result<PartRef> {
        self.target.part().ok_or_else(|| {
            OpcError::InvalidRelationship(format!(
                "Cannot get target part for external relationship '{}'",
                self.r_id
            ))
        })
    }
}

/// Collection of relationships from a single source part.
///
/// Uses a HashMap for O(1) lookup by relationship ID. Ids are unique within
/// one table, not across the package.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    /// Map of relationship ID to Relationship
    rels: HashMap<String, Relationship>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    pub fn new() -> Self {
        Self {
            rels: HashMap::new(),
        }
    }

    /// Add a relationship with a freshly generated id.
    ///
    /// Internal targets are never deduplicated: sharing an internal part
    /// between two source parts would entangle their content trees, so every
    /// call mints a new edge. Use [`get_or_add_ext_rel`](Self::get_or_add_ext_rel)
    /// for external targets, which are safe to share.
    ///
    /// # Arguments
    /// * `reltype` - Relationship type URI
    /// * `target` - Target of the relationship edge
    ///
    /// # Returns
    /// The newly generated relationship ID
    pub fn add(&mut self, reltype: &str, target: RelTarget) -> String {
        let r_id = self.next_r_id();
        self.add_relationship(reltype.to_string(), target, r_id.clone());
        r_id
    }

    /// Add a relationship under a caller-supplied id.
    ///
    /// This is the load path used when materializing a package: the ids come
    /// from the serialized relationship tables.
    ///
    /// # Arguments
    /// * `reltype` - Relationship type URI
    /// * `target` - Target of the relationship edge
    /// * `r_id` - Relationship ID
    ///
    /// # Returns
    /// Reference to the newly added relationship
    pub fn add_relationship(
        &mut self,
        reltype: String,
        target: RelTarget,
        r_id: String,
    ) -> &Relationship {
        let rel = Relationship::new(r_id.clone(), reltype, target);
        self.rels.insert(r_id.clone(), rel);
        // Safe to unwrap since we just inserted it
        self.rels.get(r_id.as_str()).unwrap()
    }

    /// Get a relationship by its ID.
    pub fn get(&self, r_id: &str) -> Result<&Relationship> {
        self.rels
            .get(r_id)
            .ok_or_else(|| OpcError::UnknownRelationship(r_id.to_string()))
    }

    /// Check whether a relationship with the given ID exists.
    #[inline]
    pub fn contains(&self, r_id: &str) -> bool {
        self.rels.contains_key(r_id)
    }

    /// Get or add an external relationship.
    ///
    /// If an external relationship of the given type to the target URL already
    /// exists, returns its rId. Otherwise, creates a new one with the next
    /// available rId. Only externals are deduplicated this way; the same
    /// hyperlink reused by two shapes is safe to share.
    pub fn get_or_add_ext_rel(&mut self, reltype: &str, target_url: &str) -> String {
        // Check if matching relationship already exists
        for rel in self.rels.values() {
            if rel.reltype() == reltype && rel.target().url() == Some(target_url) {
                return rel.r_id().to_string();
            }
        }

        self.add(reltype, RelTarget::External(target_url.to_string()))
    }

    /// Get the next available relationship ID.
    ///
    /// Generates IDs in the format "rId1", "rId2", etc., filling in gaps
    /// if any exist. Uses efficient integer parsing with atoi_simd.
    fn next_r_id(&self) -> String {
        // Find the highest existing rId number and any gaps
        let mut used_numbers: Vec<u32> = self
            .rels
            .keys()
            .filter_map(|r_id| {
                // Extract number from "rId123" format using fast byte searching
                if r_id.len() > 3 && &r_id[..3] == "rId" {
                    atoi_simd::parse::<u32, false, false>(&r_id.as_bytes()[3..]).ok()
                } else {
                    None
                }
            })
            .collect();

        // Sort to find gaps efficiently
        used_numbers.sort_unstable();

        // Find first gap or use next number
        let mut next_num = 1u32;
        for &num in &used_numbers {
            match num.cmp(&next_num) {
                std::cmp::Ordering::Equal => next_num += 1,
                std::cmp::Ordering::Greater => break,
                std::cmp::Ordering::Less => {},
            }
        }

        format!("rId{}", next_num)
    }

    /// Get the relationship of a specific type.
    ///
    /// Returns an error if no relationship of the type is found,
    /// or if multiple relationships of the type exist.
    pub fn part_with_reltype(&self, reltype: &str) -> Result<&Relationship> {
        let matching: Vec<&Relationship> = self
            .rels
            .values()
            .filter(|rel| rel.reltype() == reltype)
            .collect();

        match matching.len() {
            0 => Err(OpcError::UnknownRelationship(format!(
                "No relationship of type '{}'",
                reltype
            ))),
            1 => Ok(matching[0]),
            _ => Err(OpcError::InvalidRelationship(format!(
                "Multiple relationships of type '{}'",
                reltype
            ))),
        }
    }

    /// Get an iterator over all relationships.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.values()
    }

    /// Get the number of relationships in the collection.
    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    /// Check if the collection is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    /// Remove a relationship by its ID.
    pub fn remove(&mut self, r_id: &str) -> Option<Relationship> {
        self.rels.remove(r_id)
    }
}
