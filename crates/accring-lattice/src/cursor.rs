//! Cursors over a lattice.
//!
//! A [`Cursor`] is a position in the sorted element storage plus a shared
//! borrow of the [`Lattice`]. The borrow checker therefore rejects any
//! mount or dismount while a cursor is alive. One position past the last
//! element is the *end*; dereferencing it fails with
//! [`LatticeError::EndOfLattice`].

use crate::anchor::{locate, Anchor};
use crate::element::{Element, ElementKind, Family, Plane};
use crate::error::LatticeError;
use crate::lattice::Lattice;
use std::fmt;

// ── Filter ─────────────────────────────────────────────────────────

/// Match elements by kind, and optionally plane and family.
///
/// [`Plane::None`] and [`Family::None`] match anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Filter {
    /// Required kind.
    pub kind: ElementKind,
    /// Required plane, or [`Plane::None`] for any.
    pub plane: Plane,
    /// Required family, or [`Family::None`] for any.
    pub family: Family,
}

impl Filter {
    /// Match every element of `kind`.
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            plane: Plane::None,
            family: Family::None,
        }
    }

    /// Also require `plane`.
    pub fn plane(mut self, plane: Plane) -> Self {
        self.plane = plane;
        self
    }

    /// Also require `family`.
    pub fn family(mut self, family: Family) -> Self {
        self.family = family;
        self
    }

    /// Whether `element` passes.
    pub fn matches(&self, element: &Element) -> bool {
        element.kind() == self.kind
            && (self.plane == Plane::None || element.plane == self.plane)
            && (self.family == Family::None || element.family == self.family)
    }
}

impl From<ElementKind> for Filter {
    fn from(kind: ElementKind) -> Self {
        Self::new(kind)
    }
}

// ── Cursor ─────────────────────────────────────────────────────────

/// A position in a [`Lattice`].
#[derive(Clone, Copy)]
pub struct Cursor<'a> {
    lattice: &'a Lattice,
    index: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(lattice: &'a Lattice, index: usize) -> Self {
        Self {
            lattice,
            index: index.min(lattice.len()),
        }
    }

    /// The lattice this cursor walks.
    pub fn lattice(&self) -> &'a Lattice {
        self.lattice
    }

    /// Storage index (equals `lattice.len()` at the end).
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether the cursor is past the last element.
    pub fn is_end(&self) -> bool {
        self.index >= self.lattice.len()
    }

    /// Step to the next element. Stays at the end once there.
    pub fn move_next(&mut self) {
        if !self.is_end() {
            self.index += 1;
        }
    }

    /// Step to the previous element.
    ///
    /// From the first element this moves to the end; from the end it moves
    /// to the last element.
    pub fn move_prev(&mut self) {
        let len = self.lattice.len();
        self.index = match self.index {
            0 => len,
            i if i >= len => len.saturating_sub(1),
            i => i - 1,
        };
    }

    /// Step forward, wrapping from the last element to the first.
    pub fn revolve(&mut self) {
        let len = self.lattice.len();
        if len == 0 {
            return;
        }
        self.index = if self.index + 1 >= len { 0 } else { self.index + 1 };
    }

    /// Advance to the next element matching `filter`.
    ///
    /// # Errors
    ///
    /// [`LatticeError::NoMatchingElement`] if the end is reached first. The
    /// cursor is then at the end.
    pub fn next_matching(&mut self, filter: impl Into<Filter>) -> Result<(), LatticeError> {
        let filter = filter.into();
        self.advance_matching(filter);
        if self.is_end() {
            Err(LatticeError::NoMatchingElement { kind: filter.kind })
        } else {
            Ok(())
        }
    }

    /// Advance to the next element matching `filter`, stopping at the end.
    pub fn advance_matching(&mut self, filter: impl Into<Filter>) {
        let filter = filter.into();
        let entries = self.lattice.entries();
        let start = (self.index + 1).min(entries.len());
        self.index = entries[start..]
            .iter()
            .position(|(_, e)| filter.matches(e))
            .map_or(entries.len(), |i| start + i);
    }

    /// Step back to the previous element matching `filter`, or to the end
    /// if there is none.
    pub fn retreat_matching(&mut self, filter: impl Into<Filter>) {
        let filter = filter.into();
        let entries = self.lattice.entries();
        let stop = self.index.min(entries.len());
        self.index = entries[..stop]
            .iter()
            .rposition(|(_, e)| filter.matches(e))
            .unwrap_or(entries.len());
    }

    /// Advance to the next element matching `filter`, wrapping around the
    /// ring. Lands on the end only if nothing matches.
    pub fn revolve_matching(&mut self, filter: impl Into<Filter>) {
        let filter = filter.into();
        let entries = self.lattice.entries();
        let len = entries.len();
        if len == 0 {
            return;
        }
        let start = if self.is_end() { 0 } else { self.index + 1 };
        self.index = (0..len)
            .map(|i| (start + i) % len)
            .find(|&i| filter.matches(&entries[i].1))
            .unwrap_or(len);
    }

    // ── Dereference ────────────────────────────────────────────────

    /// The element under the cursor.
    pub fn element(&self) -> Result<&'a Element, LatticeError> {
        self.lattice
            .entry(self.index)
            .map(|(_, e)| e)
            .ok_or(LatticeError::EndOfLattice)
    }

    /// The element's key (the position of its reference anchor).
    pub fn key(&self) -> Result<f64, LatticeError> {
        self.lattice
            .entry(self.index)
            .map(|(k, _)| *k)
            .ok_or(LatticeError::EndOfLattice)
    }

    /// Position of `anchor` of the element under the cursor.
    pub fn pos(&self, anchor: Anchor) -> Result<f64, LatticeError> {
        let (key, e) = self.lattice.entry(self.index).ok_or(LatticeError::EndOfLattice)?;
        Ok(locate(*key, e.length(), self.lattice.ref_pos(), anchor))
    }

    /// Whether `pos` lies in the footprint of the element under the cursor.
    pub fn at(&self, pos: f64) -> Result<bool, LatticeError> {
        Ok(self.pos(Anchor::Begin)? <= pos && pos <= self.pos(Anchor::End)?)
    }

    /// Signed distance from `anchor` of this element to `target`.
    pub fn distance(&self, anchor: Anchor, target: f64) -> Result<f64, LatticeError> {
        Ok(target - self.pos(anchor)?)
    }

    /// Forward distance from `anchor` of this element to the same anchor of
    /// the next element, wrapping around the ring. Never negative.
    ///
    /// For a single-element lattice this is the circumference.
    pub fn distance_next(&self, anchor: Anchor) -> Result<f64, LatticeError> {
        let mut next = *self;
        next.revolve();
        self.forward_to(&next, anchor)
    }

    /// Signed distance to `target` the shorter way around the ring.
    ///
    /// Positive means forward. When both ways are equally long the forward
    /// distance is returned.
    pub fn distance_ring(&self, anchor: Anchor, target: f64) -> Result<f64, LatticeError> {
        let c = self.lattice.circumference();
        let forward = (target - self.pos(anchor)?).rem_euclid(c);
        let backward = forward - c;
        Ok(if forward <= -backward { forward } else { backward })
    }

    fn forward_to(&self, next: &Cursor<'_>, anchor: Anchor) -> Result<f64, LatticeError> {
        let d = next.pos(anchor)? - self.pos(anchor)?;
        if next.index <= self.index {
            Ok(d + self.lattice.circumference())
        } else {
            Ok(d)
        }
    }
}

impl PartialEq for Cursor<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.lattice, other.lattice) && self.index == other.index
    }
}

impl Eq for Cursor<'_> {}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lattice.entry(self.index) {
            Some((k, e)) => write!(f, "Cursor({} @ {k})", e.name),
            None => f.write_str("Cursor(end)"),
        }
    }
}

// ── TypedCursor ────────────────────────────────────────────────────

/// A cursor that only ever stops on elements matching a fixed [`Filter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypedCursor<'a> {
    cursor: Cursor<'a>,
    filter: Filter,
}

impl<'a> TypedCursor<'a> {
    pub(crate) fn new(cursor: Cursor<'a>, filter: Filter) -> Self {
        Self { cursor, filter }
    }

    /// The bound filter.
    pub fn bound_filter(&self) -> Filter {
        self.filter
    }

    /// The underlying unfiltered cursor.
    pub fn cursor(&self) -> Cursor<'a> {
        self.cursor
    }

    /// Whether the cursor is past the last matching element.
    pub fn is_end(&self) -> bool {
        self.cursor.is_end()
    }

    /// Step to the next match, stopping at the end.
    pub fn move_next(&mut self) {
        self.cursor.advance_matching(self.filter);
    }

    /// Step to the previous match, or to the end if there is none.
    pub fn move_prev(&mut self) {
        self.cursor.retreat_matching(self.filter);
    }

    /// Step to the next match.
    ///
    /// # Errors
    ///
    /// [`LatticeError::NoMatchingElement`] when the end is reached.
    pub fn try_next(&mut self) -> Result<(), LatticeError> {
        self.cursor.next_matching(self.filter)
    }

    /// Step to the next match, wrapping around the ring.
    pub fn revolve(&mut self) {
        self.cursor.revolve_matching(self.filter);
    }

    /// The element under the cursor.
    pub fn element(&self) -> Result<&'a Element, LatticeError> {
        self.cursor.element()
    }

    /// The element's key.
    pub fn key(&self) -> Result<f64, LatticeError> {
        self.cursor.key()
    }

    /// Position of `anchor` of the element under the cursor.
    pub fn pos(&self, anchor: Anchor) -> Result<f64, LatticeError> {
        self.cursor.pos(anchor)
    }

    /// Whether `pos` lies in the element's footprint.
    pub fn at(&self, pos: f64) -> Result<bool, LatticeError> {
        self.cursor.at(pos)
    }

    /// Signed distance from `anchor` of this element to `target`.
    pub fn distance(&self, anchor: Anchor, target: f64) -> Result<f64, LatticeError> {
        self.cursor.distance(anchor, target)
    }

    /// Forward distance to the next matching element, wrapping around the
    /// ring.
    pub fn distance_next(&self, anchor: Anchor) -> Result<f64, LatticeError> {
        let mut next = *self;
        next.revolve();
        self.cursor.forward_to(&next.cursor, anchor)
    }

    /// Signed distance to `target` the shorter way around the ring.
    pub fn distance_ring(&self, anchor: Anchor, target: f64) -> Result<f64, LatticeError> {
        self.cursor.distance_ring(anchor, target)
    }
}

impl<'a> Iterator for TypedCursor<'a> {
    type Item = (f64, &'a Element);

    /// Yield the current match and step to the next one.
    fn next(&mut self) -> Option<Self::Item> {
        let key = self.cursor.key().ok()?;
        let element = self.cursor.element().ok()?;
        self.move_next();
        Some((key, element))
    }
}
