mod common;

use common::{Gadget, GadgetArgs, Widget, WidgetArgs, store};
use recordlayer::prelude::*;

#[test]
fn property_reads_back_what_was_written() {
    let store = store();
    let mut widget = Widget::new(&store, "test").unwrap();
    assert_eq!(widget.name(), "test");

    widget.set_name("test2").unwrap();

    assert_eq!(widget.name(), "test2");
    assert_eq!(Widget::schema().fields(), &["updated_at", "created_at", "id", "name"]);
}

#[test]
fn identity_cannot_be_set() {
    let store = store();
    let mut widget = Widget::new(&store, "test").unwrap();

    let err = widget.set_id(123).unwrap_err();

    assert_eq!(err, RecordError::immutable("id", PropertyOperation::Write));
    assert_eq!(widget.id(), 1);
}

#[test]
fn write_disabled_field_keeps_its_default() {
    let store = store();
    let mut gadget = Gadget::new(&store, 1.0).unwrap();
    let updated_at = gadget.updated_at();

    let err = gadget.set_sku("G-1").unwrap_err();

    assert_eq!(err, RecordError::immutable("sku", PropertyOperation::Write));
    assert_eq!(gadget.sku(), "unassigned");
    assert_eq!(gadget.updated_at(), updated_at);
}

#[test]
fn construction_sets_equal_timestamps() {
    let store = store();
    let widget = Widget::new(&store, "test").unwrap();

    assert_eq!(widget.created_at(), widget.updated_at());
}

#[test]
fn writes_after_construction_refresh_updated_at() {
    let store = store();
    let mut widget = Widget::new(&store, "test").unwrap();

    widget.set_name("test2").unwrap();
    widget.save(&store).unwrap();

    assert!(widget.updated_at() > widget.created_at());

    let stored = store
        .collection::<Widget>()
        .find_one(Filter::eq("name", "test2"))
        .unwrap()
        .unwrap();
    assert_eq!(stored.created_at(), widget.created_at());
    assert_eq!(stored.updated_at(), widget.updated_at());
}

#[test]
fn updated_at_cannot_be_moved_back_after_a_write() {
    let store = store();
    let mut widget = Widget::new(&store, "a").unwrap();
    let created_at = widget.created_at();
    widget.set_name("b").unwrap();
    let updated_at = widget.updated_at();

    let err = widget.meta_mut().set_updated_at(created_at).unwrap_err();

    assert!(matches!(err, RecordError::Validation { ref field, .. } if field == "updated_at"));
    assert_eq!(widget.updated_at(), updated_at);
}

#[test]
fn rejected_write_leaves_record_untouched() {
    let store = store();
    let mut gadget = Gadget::new(&store, 5.0).unwrap();
    let before = gadget.clone();

    let err = gadget.set_price(-1.0).unwrap_err();

    assert_eq!(err, RecordError::validation("price", Bson::Double(-1.0)));
    assert_eq!(gadget.price(), 5.0);
    assert_eq!(gadget.updated_at(), before.updated_at());
}

#[test]
fn rejected_construction_is_a_validation_error() {
    let store = store();

    let err = store
        .collection::<Gadget>()
        .create(GadgetArgs { price: -3.0 })
        .unwrap_err();

    assert!(matches!(err, RecordError::Validation { ref field, .. } if field == "price"));
    assert_eq!(store.collection::<Gadget>().count(Query::new()).unwrap(), 0);
}

#[test]
fn delete_restores_default_and_touches() {
    let store = store();
    let mut widget = Widget::new(&store, "test").unwrap();

    widget.clear_name().unwrap();

    assert_eq!(widget.name(), "");
    assert!(widget.updated_at() > widget.created_at());
}

#[test]
fn containers_are_per_type() {
    let store = store();
    let widgets = store.collection::<Widget>();
    let gadgets = store.collection::<Gadget>();
    assert!(widgets.all().unwrap().is_empty());

    let widget = widgets.create(WidgetArgs { name: "abc".into() }).unwrap();
    let gadget = gadgets.create(GadgetArgs { price: 15.3 }).unwrap();

    assert_eq!(widgets.all().unwrap().len(), 1);
    assert_eq!(widgets.all().unwrap()[0].name(), widget.name());
    assert_eq!(gadgets.all().unwrap().len(), 1);
    assert_eq!(gadgets.all().unwrap()[0].price(), gadget.price());
}

#[test]
fn identities_are_sequential_per_type() {
    let store = store();

    let first = Widget::new(&store, "a").unwrap();
    let second = Widget::new(&store, "b").unwrap();
    let gadget = Gadget::new(&store, 1.0).unwrap();

    assert_eq!(first.id(), 1);
    assert_eq!(second.id(), 2);
    assert_eq!(gadget.id(), 1);
}

#[test]
fn find_returns_matches_in_store_order() {
    let store = store();
    let widgets = store.collection::<Widget>();
    let m1 = widgets.create(WidgetArgs { name: "abc".into() }).unwrap();
    let m2 = widgets.create(WidgetArgs { name: "abc 2".into() }).unwrap();
    let m3 = widgets.create(WidgetArgs { name: "abc".into() }).unwrap();

    let found = widgets.find(Filter::eq("name", "abc")).unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0], m1);
    assert_ne!(found[1], m1);
    assert_eq!(found[1], m3);
    assert_ne!(found[0], m3);

    let found = widgets.find(Filter::eq("name", "abc 2")).unwrap();
    assert_eq!(found, vec![m2]);
}

#[test]
fn count_matches_without_materializing() {
    let store = store();
    let widgets = store.collection::<Widget>();
    widgets
        .seed([bson!(["abc"]), bson!(["abc 2"]), bson!(["abc"])])
        .unwrap();

    assert_eq!(widgets.count(Filter::eq("name", "abc")).unwrap(), 2);
    assert_eq!(widgets.count(Filter::eq("name", "abc 2")).unwrap(), 1);
    assert_eq!(widgets.count(Query::new()).unwrap(), 3);
}

#[test]
fn find_one_returns_first_match_or_none() {
    let store = store();
    let widgets = store.collection::<Widget>();
    let m1 = widgets.create(WidgetArgs { name: "abc".into() }).unwrap();
    widgets.create(WidgetArgs { name: "abc 2".into() }).unwrap();
    widgets.create(WidgetArgs { name: "abc".into() }).unwrap();

    assert_eq!(widgets.find_one(Filter::eq("name", "abc")).unwrap(), Some(m1));
    assert_eq!(widgets.find_one(Filter::eq("name", "zzz")).unwrap(), None);
}

#[test]
fn records_of_different_types_are_never_equal() {
    let store = store();
    let widget = Widget::new(&store, "abc").unwrap();
    let gadget = Gadget::new(&store, 15.4).unwrap();

    assert_eq!(widget.id(), gadget.id());
    assert!(!widget.same_record(&gadget));
    assert!(widget.same_record(&widget.clone()));
}

#[test]
fn save_appends_unsaved_records() {
    let store = store();
    let widgets = store.collection::<Widget>();
    let widget = Widget::new(&store, "abc").unwrap();
    assert_eq!(widgets.find(Filter::eq("name", "abc")).unwrap().len(), 0);

    widget.save(&store).unwrap();

    assert_eq!(widgets.find(Filter::eq("name", "abc")).unwrap().len(), 1);
}

#[test]
fn changes_only_take_effect_once_saved() {
    let store = store();
    let widgets = store.collection::<Widget>();
    let mut widget = Widget::new(&store, "abc").unwrap();
    widget.save(&store).unwrap();
    assert_eq!(widgets.find(Filter::eq("name", "abc")).unwrap().len(), 1);

    widget.set_name("test").unwrap();
    assert_eq!(widgets.find(Filter::eq("name", "abc")).unwrap().len(), 1);

    widget.save(&store).unwrap();
    assert_eq!(widgets.find(Filter::eq("name", "abc")).unwrap().len(), 0);
    assert_eq!(widgets.find(Filter::eq("name", "test")).unwrap().len(), 1);
    assert_eq!(widgets.count(Query::new()).unwrap(), 1);
}

#[test]
fn returned_records_are_independent_copies() {
    let store = store();
    let widgets = store.collection::<Widget>();
    let mut created = widgets.create(WidgetArgs { name: "abc".into() }).unwrap();

    created.set_name("local").unwrap();
    let mut fetched = widgets.get(created.id()).unwrap().unwrap();
    fetched.set_name("other").unwrap();

    assert_eq!(widgets.get(created.id()).unwrap().unwrap().name(), "abc");
}

#[test]
fn seed_binds_positional_and_keyed_entries() {
    let store = store();

    let seeded = store
        .collection::<Widget>()
        .seed([bson!(["test1"]), bson!({ "name": "test2" })])
        .unwrap();

    assert_eq!(seeded.len(), 2);
    assert_eq!(seeded[0].name(), "test1");
    assert_eq!(seeded[1].name(), "test2");
}

#[test]
fn seed_rejects_other_shapes() {
    let store = store();
    let widgets = store.collection::<Widget>();

    let err = widgets.seed([bson!("test1")]).unwrap_err();
    assert!(matches!(err, RecordError::InvalidSeedData(_)));

    let err = widgets.seed([bson!(["a", "b"])]).unwrap_err();
    assert!(matches!(err, RecordError::InvalidSeedData(_)));

    assert_eq!(widgets.count(Query::new()).unwrap(), 0);
}

#[test]
fn seed_rejects_unknown_keys() {
    let store = store();
    let widgets = store.collection::<Widget>();

    let err = widgets.seed([bson!({ "name": "x", "nmae": "y" })]).unwrap_err();

    assert!(matches!(err, RecordError::InvalidSeedData(ref message) if message.contains("nmae")));
    assert_eq!(widgets.count(Query::new()).unwrap(), 0);
}

#[test]
fn seed_keeps_records_created_before_a_failure() {
    let store = store();
    let gadgets = store.collection::<Gadget>();

    let err = gadgets.seed([bson!([1.0]), bson!([-1.0]), bson!([2.0])]).unwrap_err();

    assert!(matches!(err, RecordError::Validation { .. }));
    assert_eq!(gadgets.count(Query::new()).unwrap(), 1);
}

#[test]
fn remove_deletes_by_identity() {
    let store = store();
    let widgets = store.collection::<Widget>();
    let m1 = widgets.create(WidgetArgs { name: "abc".into() }).unwrap();
    widgets.create(WidgetArgs { name: "abc 2".into() }).unwrap();
    let m3 = widgets.create(WidgetArgs { name: "abc".into() }).unwrap();
    assert_eq!(widgets.count(Query::new()).unwrap(), 3);

    m1.remove(&store).unwrap();
    assert_eq!(widgets.count(Query::new()).unwrap(), 2);
    assert_eq!(widgets.find_one(Filter::eq("name", "abc")).unwrap(), Some(m3.clone()));

    widgets.remove(&m3).unwrap();
    assert_eq!(widgets.count(Query::new()).unwrap(), 1);
    assert_eq!(widgets.find_one(Filter::eq("name", "abc")).unwrap(), None);
}

#[test]
fn removing_an_unsaved_record_is_not_found() {
    let store = store();
    let widget = Widget::new(&store, "abc").unwrap();

    assert_eq!(widget.remove(&store), Err(RecordError::not_found(widget.id(), "widgets")));
}

#[test]
fn create_with_existing_identity_is_rejected() {
    let store = store();
    let widgets = store.collection::<Widget>();
    widgets.create(WidgetArgs { name: "abc".into() }).unwrap();

    let err = widgets
        .create_with(Meta::builder().id(1), WidgetArgs { name: "dup".into() })
        .unwrap_err();

    assert_eq!(err, RecordError::AlreadyExists(1, "widgets".to_string()));
}

#[test]
fn pinned_identities_are_skipped_by_the_sequence() {
    let store = store();
    let widgets = store.collection::<Widget>();
    widgets
        .create_with(Meta::builder().id(2), WidgetArgs { name: "pinned".into() })
        .unwrap();

    let first = widgets.create(WidgetArgs { name: "a".into() }).unwrap();
    let second = widgets.create(WidgetArgs { name: "b".into() }).unwrap();

    assert_eq!(first.id(), 1);
    assert_eq!(second.id(), 3);
    assert_eq!(widgets.count(Query::new()).unwrap(), 3);
}

#[test]
fn reset_all_clears_every_type_but_keeps_sequences() {
    let store = store();
    store.collection::<Widget>().create(WidgetArgs { name: "abc".into() }).unwrap();
    store.collection::<Gadget>().create(GadgetArgs { price: 1.0 }).unwrap();

    store.reset_all().unwrap();

    assert_eq!(store.collection::<Widget>().count(Query::new()).unwrap(), 0);
    assert_eq!(store.collection::<Gadget>().count(Query::new()).unwrap(), 0);
    assert_eq!(Widget::new(&store, "next").unwrap().id(), 2);
}

#[test]
fn clear_only_empties_one_type() {
    let store = store();
    store.collection::<Widget>().create(WidgetArgs { name: "abc".into() }).unwrap();
    store.collection::<Gadget>().create(GadgetArgs { price: 1.0 }).unwrap();

    store.collection::<Widget>().clear().unwrap();

    assert_eq!(store.collection::<Widget>().count(Query::new()).unwrap(), 0);
    assert_eq!(store.collection::<Gadget>().count(Query::new()).unwrap(), 1);
}

#[test]
fn stores_are_isolated_from_each_other() {
    let first = store();
    let second = store();
    first.collection::<Widget>().create(WidgetArgs { name: "abc".into() }).unwrap();

    assert_eq!(second.collection::<Widget>().count(Query::new()).unwrap(), 0);
    assert_eq!(Widget::new(&second, "abc").unwrap().id(), 1);
}

#[test]
fn register_and_list_collections() {
    let store = store();

    store.register::<Widget>().unwrap();
    store.register::<Gadget>().unwrap();

    assert_eq!(
        store.list_collections().unwrap(),
        vec!["gadgets".to_string(), "widgets".to_string()]
    );
}

#[test]
fn describe_lists_declared_fields() {
    let store = store();
    let gadget = Gadget::new(&store, 2.5).unwrap();

    let description = gadget.describe().unwrap();

    assert!(description.starts_with("gadgets[updated_at="));
    assert!(description.ends_with(", id=1, sku=\"unassigned\", price=2.5]"));
}
