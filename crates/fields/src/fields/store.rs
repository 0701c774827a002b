//! The field store.
//!
//! Entries live in an arena of slots addressed by index. Two orderings are
//! kept over the same slots:
//!
//! - the name index, a vector of slot indices sorted by the entry key with an
//!   ASCII case-insensitive comparison, used for lookups;
//! - the sequence, a doubly linked list threaded through the slots, used for
//!   iteration and serialization.
//!
//! Every live slot appears exactly once in both. Entries with equal keys are
//! adjacent in the name index and contiguous in the sequence, in the same
//! relative order.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Index;

use tracing::{debug, trace};

use crate::fields::entry::FieldEntry;
use crate::fields::start_line::StartLine;
use crate::protocol::{Field, FieldError, Http, Protocol};

/// Anything that names a header field.
///
/// A [`Field`] is written in the wire form the protocol prefers (compact
/// letters for SIP over datagrams). A string keeps its exact text and is
/// resolved to a [`Field`] through [`Protocol::string_to_field`].
pub trait FieldName {
    /// Returns the resolved field and the name text to transmit.
    fn resolve<P: Protocol>(&self) -> (Field, &str);
}

impl FieldName for Field {
    fn resolve<P: Protocol>(&self) -> (Field, &str) {
        (*self, P::field_to_compact(*self))
    }
}

impl FieldName for str {
    fn resolve<P: Protocol>(&self) -> (Field, &str) {
        (P::string_to_field(self), self)
    }
}

impl FieldName for String {
    fn resolve<P: Protocol>(&self) -> (Field, &str) {
        self.as_str().resolve::<P>()
    }
}

impl<T: FieldName + ?Sized> FieldName for &T {
    fn resolve<P: Protocol>(&self) -> (Field, &str) {
        (**self).resolve::<P>()
    }
}

/// Stable handle to an entry of a [`Fields`] store.
///
/// A handle stays valid until its entry is removed; a handle to a removed
/// entry never resolves again, even when the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId {
    index: usize,
    generation: u32,
}

#[derive(Clone)]
pub(crate) struct Node {
    pub(crate) entry: FieldEntry,
    prev: Option<usize>,
    pub(crate) next: Option<usize>,
}

#[derive(Clone)]
pub(crate) struct Slot {
    generation: u32,
    pub(crate) node: Option<Node>,
}

/// An ordered collection of header fields plus the start line text.
///
/// The protocol policy `P` decides how [`Field`] names are written, how
/// compact names are resolved, and the defaults used by the derived
/// semantics and the wire view.
#[derive(Clone)]
pub struct Fields<P: Protocol = Http> {
    slots: Vec<Slot>,
    free: Vec<usize>,
    by_name: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
    pub(crate) start_line: StartLine,
    _protocol: PhantomData<P>,
}

impl<P: Protocol> Fields<P> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty store with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            by_name: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            len: 0,
            start_line: StartLine::default(),
            _protocol: PhantomData,
        }
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Adds a field, keeping any existing field with the same name.
    ///
    /// A duplicate is placed right after the last entry with the same name, so
    /// fields sharing a name stay contiguous in iteration order.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::TooLong`] if the name or the trimmed value does
    /// not fit the packed layout.
    pub fn insert<N: FieldName>(&mut self, name: N, value: &str) -> Result<FieldId, FieldError> {
        let entry = self.new_entry(&name, value)?;
        Ok(self.insert_entry(entry))
    }

    fn insert_entry(&mut self, entry: FieldEntry) -> FieldId {
        let upper = self.upper_bound(entry.key());
        let neighbour = upper
            .checked_sub(1)
            .map(|pos| self.by_name[pos])
            .filter(|&index| eq_ignore_case(self.node(index).entry.key(), entry.key()));

        trace!(name = entry.name(), value = entry.value(), "insert field");
        let index = self.alloc(entry);
        match neighbour {
            Some(prev) => self.link_after(prev, index),
            None => self.link_back(index),
        }
        self.by_name.insert(upper, index);
        self.id_of(index)
    }

    /// Replaces every field with this name by a single new field.
    ///
    /// The new entry takes the name index slot of the first removed entry and
    /// goes to the end of the iteration order. Without an existing field this
    /// behaves like [`insert`](Self::insert).
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::TooLong`] as [`insert`](Self::insert) does. The
    /// store is left unchanged on error.
    pub fn set<N: FieldName>(&mut self, name: N, value: &str) -> Result<FieldId, FieldError> {
        let entry = self.new_entry(&name, value)?;

        let (lower, upper) = self.equal_bounds(entry.key());
        if lower == upper {
            return Ok(self.insert_entry(entry));
        }

        trace!(name = entry.name(), value = entry.value(), replaced = upper - lower, "set field");
        for pos in lower..upper {
            let index = self.by_name[pos];
            self.unlink(index);
            self.release(index);
        }
        let index = self.alloc(entry);
        self.link_back(index);
        self.by_name.splice(lower..upper, [index]);
        Ok(self.id_of(index))
    }

    /// Removes every field with this name and returns how many were removed.
    pub fn erase<N: FieldName>(&mut self, name: N) -> usize {
        let (lower, upper) = self.bounds_of(&name);
        for pos in lower..upper {
            let index = self.by_name[pos];
            self.unlink(index);
            self.release(index);
        }
        self.by_name.drain(lower..upper);
        if upper > lower {
            trace!(removed = upper - lower, "erase fields");
        }
        upper - lower
    }

    /// Removes one entry.
    ///
    /// Returns the handle of the entry that followed it in iteration order.
    /// A stale handle removes nothing and returns `None`.
    pub fn erase_at(&mut self, id: FieldId) -> Option<FieldId> {
        let index = self.resolve_id(id)?;
        let (lower, upper) = self.equal_bounds(self.node(index).entry.key());
        let pos = (lower..upper).find(|&pos| self.by_name[pos] == index)?;
        self.by_name.remove(pos);

        let next = self.node(index).next;
        self.unlink(index);
        self.release(index);
        next.map(|next| self.id_of(next))
    }

    /// Returns the first entry with this name in iteration order.
    pub fn find<N: FieldName>(&self, name: N) -> Option<&FieldEntry> {
        self.find_index(&name).map(|index| &self.node(index).entry)
    }

    /// Returns the handle of the first entry with this name.
    pub fn find_id<N: FieldName>(&self, name: N) -> Option<FieldId> {
        self.find_index(&name).map(|index| self.id_of(index))
    }

    /// Returns the entry behind a handle, or `None` if it was removed.
    pub fn get_entry(&self, id: FieldId) -> Option<&FieldEntry> {
        self.resolve_id(id).map(|index| &self.node(index).entry)
    }

    /// Number of entries with this name.
    pub fn count<N: FieldName>(&self, name: N) -> usize {
        let (lower, upper) = self.bounds_of(&name);
        upper - lower
    }

    pub fn contains<N: FieldName>(&self, name: N) -> bool {
        self.count(name) > 0
    }

    /// Iterates every entry with this name, in iteration order.
    pub fn equal_range<N: FieldName>(&self, name: N) -> Iter<'_> {
        let (lower, upper) = self.bounds_of(&name);
        let cursor = (lower < upper).then(|| self.by_name[lower]);
        Iter { slots: &self.slots, cursor, remaining: upper - lower }
    }

    /// Returns the value of the first field with this name.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NotFound`] if there is no such field.
    pub fn at<N: FieldName>(&self, name: N) -> Result<&str, FieldError> {
        match self.find(&name) {
            Some(entry) => Ok(entry.value()),
            None => Err(FieldError::not_found(lookup_key::<P>(&name))),
        }
    }

    /// Returns the value of the first field with this name, or `""`.
    pub fn get<N: FieldName>(&self, name: N) -> &str {
        self.find(name).map_or("", FieldEntry::value)
    }

    /// Iterates every entry in iteration order.
    pub fn iter(&self) -> Iter<'_> {
        Iter { slots: &self.slots, cursor: self.head, remaining: self.len }
    }

    /// Iterates the handles of every entry in iteration order.
    pub fn ids(&self) -> impl Iterator<Item = FieldId> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let index = cursor?;
            cursor = self.node(index).next;
            Some(self.id_of(index))
        })
    }

    /// Removes every entry. The start line is kept.
    pub fn clear(&mut self) {
        // slots are kept so stale handles cannot match a reused slot
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index);
            }
        }
        self.by_name.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Removes every entry and resets the start line.
    pub fn clear_all(&mut self) {
        self.clear();
        self.start_line = StartLine::default();
    }

    /// Exchanges the whole contents of two stores.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Replaces the contents of this store with a copy of a store using a
    /// different protocol policy.
    ///
    /// Entries are re-inserted one by one and their names rewritten through
    /// [`Protocol::name_to_compact`] of this store's policy.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::TooLong`] if an entry does not fit; entries
    /// copied before the failing one are kept.
    pub fn copy_from<Q: Protocol>(&mut self, other: &Fields<Q>) -> Result<(), FieldError> {
        self.clear_all();
        self.start_line = other.start_line.clone();
        for entry in other {
            self.insert(P::name_to_compact(entry.name()), entry.value())?;
        }
        debug!(from = Q::name(), to = P::name(), len = self.len, "copied fields");
        Ok(())
    }

    fn new_entry<N: FieldName>(&self, name: &N, value: &str) -> Result<FieldEntry, FieldError> {
        let (field, text) = name.resolve::<P>();
        FieldEntry::new(field, text, value).inspect_err(|e| debug!(cause = %e, "reject field"))
    }

    fn find_index<N: FieldName>(&self, name: &N) -> Option<usize> {
        let (lower, upper) = self.bounds_of(name);
        (lower < upper).then(|| self.by_name[lower])
    }

    fn bounds_of<N: FieldName>(&self, name: &N) -> (usize, usize) {
        self.equal_bounds(lookup_key::<P>(name))
    }

    fn equal_bounds(&self, key: &str) -> (usize, usize) {
        let lower = self.by_name.partition_point(|&index| cmp_ignore_case(self.node(index).entry.key(), key) == Ordering::Less);
        let upper = lower + self.by_name[lower..].partition_point(|&index| eq_ignore_case(self.node(index).entry.key(), key));
        (lower, upper)
    }

    fn upper_bound(&self, key: &str) -> usize {
        self.by_name.partition_point(|&index| cmp_ignore_case(self.node(index).entry.key(), key) != Ordering::Greater)
    }

    pub(crate) fn node(&self, index: usize) -> &Node {
        match &self.slots[index].node {
            Some(node) => node,
            None => unreachable!("slot {index} is vacant"),
        }
    }

    fn node_mut(&mut self, index: usize) -> &mut Node {
        match &mut self.slots[index].node {
            Some(node) => node,
            None => unreachable!("slot {index} is vacant"),
        }
    }

    fn id_of(&self, index: usize) -> FieldId {
        FieldId { index, generation: self.slots[index].generation }
    }

    fn resolve_id(&self, id: FieldId) -> Option<usize> {
        let slot = self.slots.get(id.index)?;
        (slot.generation == id.generation && slot.node.is_some()).then_some(id.index)
    }

    fn alloc(&mut self, entry: FieldEntry) -> usize {
        let node = Node { entry, prev: None, next: None };
        self.len += 1;
        match self.free.pop() {
            Some(index) => {
                self.slots[index].node = Some(node);
                index
            }
            None => {
                self.slots.push(Slot { generation: 0, node: Some(node) });
                self.slots.len() - 1
            }
        }
    }

    /// Drops the entry in a slot that is already unlinked from both orderings.
    fn release(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        slot.node = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        self.len -= 1;
    }

    fn link_back(&mut self, index: usize) {
        let tail = self.tail;
        {
            let node = self.node_mut(index);
            node.prev = tail;
            node.next = None;
        }
        match tail {
            Some(tail) => self.node_mut(tail).next = Some(index),
            None => self.head = Some(index),
        }
        self.tail = Some(index);
    }

    fn link_after(&mut self, prev: usize, index: usize) {
        let next = self.node(prev).next;
        {
            let node = self.node_mut(index);
            node.prev = Some(prev);
            node.next = next;
        }
        self.node_mut(prev).next = Some(index);
        match next {
            Some(next) => self.node_mut(next).prev = Some(index),
            None => self.tail = Some(index),
        }
    }

    fn unlink(&mut self, index: usize) {
        let (prev, next) = {
            let node = self.node(index);
            (node.prev, node.next)
        };
        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.tail = prev,
        }
    }
}

/// The key the name index orders by.
fn lookup_key<P: Protocol>(name: &impl FieldName) -> &str {
    match name.resolve::<P>() {
        (Field::Unknown, text) => text,
        (field, _) => field.as_str(),
    }
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.bytes().map(|c| c.to_ascii_lowercase()).cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

impl<P: Protocol> Default for Fields<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Protocol> fmt::Debug for Fields<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fields")
            .field("protocol", &P::name())
            .field("start_line", &self.start_line)
            .field("entries", &DebugEntries(self))
            .finish()
    }
}

struct DebugEntries<'a, P: Protocol>(&'a Fields<P>);

impl<P: Protocol> fmt::Debug for DebugEntries<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter().map(|entry| (entry.name(), entry.value()))).finish()
    }
}

impl<P: Protocol, N: FieldName> Index<N> for Fields<P> {
    type Output = str;

    /// Same as [`Fields::get`]: a missing field reads as `""`.
    fn index(&self, name: N) -> &str {
        self.get(name)
    }
}

impl<'a, P: Protocol> IntoIterator for &'a Fields<P> {
    type Item = &'a FieldEntry;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over entries in iteration order.
#[derive(Clone)]
pub struct Iter<'a> {
    slots: &'a [Slot],
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a FieldEntry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.slots[self.cursor?].node.as_ref()?;
        self.cursor = node.next;
        self.remaining -= 1;
        Some(&node.entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl fmt::Debug for Iter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").field("remaining", &self.remaining).finish()
    }
}
