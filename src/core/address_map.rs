//! The process address map: every loadable segment of every loaded image.
//!
//! Entries keep loader order, then load-command order. They may overlap and
//! are never sorted or merged, so every query is a linear scan that treats the
//! map as a plain set of intervals.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::address_range::AddressRange;
use crate::core::segment::Segment;

/// Ordered collection of mapped segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressMap {
    segments: Vec<Segment>,
}

impl AddressMap {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Ranges in map order.
    pub fn ranges(&self) -> impl Iterator<Item = &AddressRange> + '_ {
        self.segments.iter().map(|seg| &seg.range)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True when some range satisfies `start <= address < end`.
    pub fn contains(&self, address: usize) -> bool {
        self.ranges().any(|range| range.contains(address))
    }

    /// First segment, in map order, whose range contains `address`.
    pub fn covering(&self, address: usize) -> Option<&Segment> {
        self.segments.iter().find(|seg| seg.range.contains(address))
    }

    /// True when a single range holds all of `[address, address + len)`.
    ///
    /// Overlapping ranges are not stitched together.
    pub fn covers_span(&self, address: usize, len: usize) -> bool {
        self.ranges().any(|range| range.contains_span(address, len))
    }

    /// Segments belonging to the image at `index` in loader order.
    pub fn image_segments(&self, index: usize) -> impl Iterator<Item = &Segment> + '_ {
        self.segments.iter().filter(move |seg| seg.image == index)
    }

    /// Sum of all range sizes. Overlaps are counted twice.
    pub fn total_size(&self) -> usize {
        self.ranges()
            .fold(0usize, |acc, range| acc.saturating_add(range.len()))
    }

    /// Pretty JSON dump for diagnostics.
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl FromIterator<Segment> for AddressMap {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Display for AddressMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} segments, {:#x} bytes",
            self.segments.len(),
            self.total_size()
        )?;
        for seg in &self.segments {
            writeln!(f, "  {}", seg)?;
        }
        Ok(())
    }
}
