use super::*;

fn collection(session: &Session) -> IteratorCollection {
    IteratorCollection::new(session, FlameId(3))
}

fn groups(c: &IteratorCollection) -> Vec<IteratorGroup> {
    c.iter().map(FlameIterator::group).collect()
}

#[test]
fn starts_with_one_regular_iterator() {
    let c = collection(&Session::default());
    assert_eq!(c.len(), 1);
    let only = c.at(0).unwrap();
    assert_eq!(only.owner(), FlameId(3));
    assert!(c.is_single_in_group(only.id()));
    assert!(!c.can_remove(only.id()));
}

#[test]
fn regular_iterators_stay_ahead_of_finals() {
    let s = Session::default();
    let mut c = collection(&s);
    let f = c.add(&s, IteratorGroup::Final);
    let r = c.add(&s, IteratorGroup::Regular);
    assert_eq!(
        groups(&c),
        [IteratorGroup::Regular, IteratorGroup::Regular, IteratorGroup::Final]
    );
    assert_eq!(c.index_of(r), Some(1));
    assert_eq!(c.index_of(f), Some(2));
    assert_eq!(c.group_item_index(f), Some(0));
    assert_eq!(c.regular().count(), 2);
    assert_eq!(c.finals().count(), 1);
}

#[test]
fn last_regular_iterator_is_protected() {
    let s = Session::default();
    let mut c = collection(&s);
    let first = c.at(0).unwrap().id();
    assert!(c.remove(first).unwrap_err().is_validation());
    assert!(c.convert(first, IteratorGroup::Final).unwrap_err().is_validation());

    let f = c.add(&s, IteratorGroup::Final);
    assert!(c.can_remove(f));
    c.remove(f).unwrap();
    assert_eq!(c.len(), 1);
}

#[test]
fn convert_moves_between_groups() {
    let s = Session::default();
    let mut c = collection(&s);
    let a = c.at(0).unwrap().id();
    let b = c.add(&s, IteratorGroup::Regular);
    let f = c.add(&s, IteratorGroup::Final);

    c.convert(a, IteratorGroup::Final).unwrap();
    assert_eq!(c.index_of(b), Some(0));
    assert_eq!(c.index_of(a), Some(2));
    assert_eq!(c.group_item_index(a), Some(1));
    assert!(c.is_single_in_group(b));

    c.convert(f, IteratorGroup::Regular).unwrap();
    assert_eq!(
        groups(&c),
        [IteratorGroup::Regular, IteratorGroup::Regular, IteratorGroup::Final]
    );
    assert_eq!(c.index_of(f), Some(1));
}

#[test]
fn duplicate_copies_into_same_group_with_new_id() {
    let s = Session::default();
    let mut c = collection(&s);
    let a = c.at(0).unwrap().id();
    c.get_mut(a).unwrap().set_color(0.7).unwrap();
    let d = c.duplicate(a).unwrap();
    assert_ne!(a, d);
    assert!(c.get(d).unwrap().is_equal(c.get(a).unwrap()));
    assert!(c.duplicate(IteratorId(99)).unwrap_err().is_validation());
}

#[test]
fn select_regular_follows_cumulative_weight() {
    let s = Session::default();
    let mut c = collection(&s);
    let a = c.at(0).unwrap().id();
    let b = c.add(&s, IteratorGroup::Regular);
    c.add(&s, IteratorGroup::Final);
    c.get_mut(a).unwrap().set_weight(1.0).unwrap();
    c.get_mut(b).unwrap().set_weight(3.0).unwrap();

    assert_eq!(c.select_regular(0.0).unwrap().id(), a);
    assert_eq!(c.select_regular(0.2).unwrap().id(), a);
    assert_eq!(c.select_regular(0.3).unwrap().id(), b);
    assert_eq!(c.select_regular(1.0).unwrap().id(), b);
}

#[test]
fn copy_for_reparents_every_iterator() {
    let s = Session::default();
    let mut c = collection(&s);
    c.add(&s, IteratorGroup::Final);
    let copy = c.copy_for(FlameId(8));
    assert_eq!(copy.owner(), FlameId(8));
    assert!(copy.iter().all(|it| it.owner() == FlameId(8)));
    assert!(copy.is_equal(&c));
}

#[test]
fn read_requires_a_regular_iterator() {
    let s = Session::default();
    let f = XmlElement::parse(r#"<finalxform linear="1"/>"#).unwrap();
    let err = IteratorCollection::read_xml(&s, FlameId(1), [&f]).unwrap_err();
    assert!(err.is_format());
}

#[test]
fn read_orders_finals_last() {
    let s = Session::default();
    let f = XmlElement::parse(r#"<finalxform linear="1"/>"#).unwrap();
    let x = XmlElement::parse(r#"<xform linear="1" weight="2"/>"#).unwrap();
    let c = IteratorCollection::read_xml(&s, FlameId(1), [&f, &x]).unwrap();
    assert_eq!(groups(&c), [IteratorGroup::Regular, IteratorGroup::Final]);
    assert_eq!(c.at(0).unwrap().weight(), 2.0);
}
