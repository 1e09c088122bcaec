use super::iterator::{FlameIterator, IteratorGroup};
use crate::{
    foundation::{
        error::{FlameError, FlameResult},
        ids::{FlameId, IteratorId},
    },
    session::Session,
    xml::XmlElement,
};

/// Ordered iterators of one flame: every regular iterator precedes every
/// final one, and at least one regular iterator exists.
#[derive(Clone, Debug)]
pub struct IteratorCollection {
    owner: FlameId,
    next_id: u32,
    items: Vec<FlameIterator>,
}

impl IteratorCollection {
    /// Collection holding one default regular iterator.
    pub fn new(session: &Session, owner: FlameId) -> Self {
        let mut out = Self {
            owner,
            next_id: 0,
            items: Vec::new(),
        };
        let id = out.take_id();
        out.items.push(FlameIterator::new(session, owner, id));
        out
    }

    fn take_id(&mut self) -> IteratorId {
        let id = IteratorId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn owner(&self) -> FlameId {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: FlameId) {
        self.owner = owner;
        for it in &mut self.items {
            it.set_owner(owner);
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FlameIterator> {
        self.items.iter()
    }

    /// Mutable access to every iterator; group changes go through
    /// [`IteratorCollection::convert`].
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, FlameIterator> {
        self.items.iter_mut()
    }

    pub fn regular(&self) -> impl Iterator<Item = &FlameIterator> {
        self.in_group(IteratorGroup::Regular)
    }

    pub fn finals(&self) -> impl Iterator<Item = &FlameIterator> {
        self.in_group(IteratorGroup::Final)
    }

    fn in_group(&self, group: IteratorGroup) -> impl Iterator<Item = &FlameIterator> {
        self.items.iter().filter(move |it| it.group() == group)
    }

    pub fn count_in(&self, group: IteratorGroup) -> usize {
        self.in_group(group).count()
    }

    pub fn at(&self, index: usize) -> Option<&FlameIterator> {
        self.items.get(index)
    }

    pub fn get(&self, id: IteratorId) -> Option<&FlameIterator> {
        self.items.iter().find(|it| it.id() == id)
    }

    pub fn get_mut(&mut self, id: IteratorId) -> Option<&mut FlameIterator> {
        self.items.iter_mut().find(|it| it.id() == id)
    }

    /// Position in the whole collection.
    pub fn index_of(&self, id: IteratorId) -> Option<usize> {
        self.items.iter().position(|it| it.id() == id)
    }

    /// Position among the iterators of the same group.
    pub fn group_item_index(&self, id: IteratorId) -> Option<usize> {
        let group = self.get(id)?.group();
        self.in_group(group).position(|it| it.id() == id)
    }

    pub fn is_single_in_group(&self, id: IteratorId) -> bool {
        self.get(id)
            .is_some_and(|it| self.count_in(it.group()) == 1)
    }

    /// The last regular iterator cannot be removed; finals always can.
    pub fn can_remove(&self, id: IteratorId) -> bool {
        self.get(id).is_some_and(|it| {
            it.group() == IteratorGroup::Final || self.count_in(IteratorGroup::Regular) > 1
        })
    }

    fn missing(id: IteratorId) -> FlameError {
        FlameError::validation(format!("iterator {} is not part of this flame", id.0))
    }

    /// Insertion point that keeps regular iterators ahead of finals.
    fn end_of(&self, group: IteratorGroup) -> usize {
        match group {
            IteratorGroup::Regular => self.count_in(IteratorGroup::Regular),
            IteratorGroup::Final => self.items.len(),
        }
    }

    fn insert(&mut self, mut it: FlameIterator, group: IteratorGroup) -> IteratorId {
        let id = self.take_id();
        it.set_id(id);
        it.set_group(group);
        let at = self.end_of(group);
        self.items.insert(at, it);
        tracing::debug!(iterator = id.0, ?group, "iterator added");
        id
    }

    /// Append a reset iterator to the end of `group`.
    pub fn add(&mut self, session: &Session, group: IteratorGroup) -> IteratorId {
        let it = FlameIterator::new(session, self.owner, IteratorId(0));
        self.insert(it, group)
    }

    /// Append a copy of `id` to the end of its group.
    pub fn duplicate(&mut self, id: IteratorId) -> FlameResult<IteratorId> {
        let src = self.get(id).ok_or_else(|| Self::missing(id))?;
        let (copy, group) = (src.copy(), src.group());
        Ok(self.insert(copy, group))
    }

    pub fn remove(&mut self, id: IteratorId) -> FlameResult<FlameIterator> {
        let idx = self.index_of(id).ok_or_else(|| Self::missing(id))?;
        if !self.can_remove(id) {
            return Err(FlameError::validation(
                "a flame must keep at least one regular iterator",
            ));
        }
        tracing::debug!(iterator = id.0, "iterator removed");
        Ok(self.items.remove(idx))
    }

    /// Move `id` to the end of `group`. Converting the only regular
    /// iterator to a final one fails.
    pub fn convert(&mut self, id: IteratorId, group: IteratorGroup) -> FlameResult<()> {
        let idx = self.index_of(id).ok_or_else(|| Self::missing(id))?;
        let current = self.items[idx].group();
        if current == group {
            return Ok(());
        }
        if current == IteratorGroup::Regular && self.count_in(IteratorGroup::Regular) == 1 {
            return Err(FlameError::validation(
                "a flame must keep at least one regular iterator",
            ));
        }
        let mut it = self.items.remove(idx);
        it.set_group(group);
        let at = self.end_of(group);
        self.items.insert(at, it);
        tracing::debug!(iterator = id.0, ?group, "iterator converted");
        Ok(())
    }

    /// Regular iterator chosen by cumulative weight for `u` in `[0, 1)`.
    pub fn select_regular(&self, u: f64) -> Option<&FlameIterator> {
        let total: f64 = self.regular().map(FlameIterator::weight).sum();
        let mut target = u.clamp(0.0, 1.0) * total;
        let mut last = None;
        for it in self.regular() {
            if target < it.weight() {
                return Some(it);
            }
            target -= it.weight();
            last = Some(it);
        }
        last
    }

    /// Deep copy whose iterators belong to `owner`; ids are preserved.
    pub fn copy_for(&self, owner: FlameId) -> Self {
        Self {
            owner,
            next_id: self.next_id,
            items: self.items.iter().map(|it| it.copy_for(owner)).collect(),
        }
    }

    /// Same iterators in the same order.
    pub fn is_equal(&self, other: &IteratorCollection) -> bool {
        self.items.len() == other.items.len()
            && self
                .items
                .iter()
                .zip(&other.items)
                .all(|(a, b)| a.is_equal(b))
    }

    /// Build a collection from `xform` / `finalxform` elements. Elements are
    /// read in order; the group follows each element's tag.
    pub fn read_xml<'a>(
        session: &Session,
        owner: FlameId,
        elements: impl IntoIterator<Item = &'a XmlElement>,
    ) -> FlameResult<Self> {
        let mut out = Self {
            owner,
            next_id: 0,
            items: Vec::new(),
        };
        for element in elements {
            let mut it = FlameIterator::new(session, owner, IteratorId(0));
            it.read_xml(element, session)?;
            let group = it.group();
            out.insert(it, group);
        }
        if out.count_in(IteratorGroup::Regular) == 0 {
            return Err(FlameError::format(
                "a flame needs at least one \"xform\" element",
            ));
        }
        Ok(out)
    }

    pub fn write_xml(&self) -> impl Iterator<Item = XmlElement> + '_ {
        self.items.iter().map(FlameIterator::write_xml)
    }
}

impl<'a> IntoIterator for &'a IteratorCollection {
    type Item = &'a FlameIterator;
    type IntoIter = std::slice::Iter<'a, FlameIterator>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/iterators.rs"]
mod tests;
