//! Model tests for eye
//!
//! Definition from builders and JSON, instantiation, and slot refresh.

use eye::{Dom, Event, EventListener, Layer, Model, ModelError, ModelValues};
use std::cell::Cell;
use std::rc::Rc;

fn two_slot_card(dom: &Dom) -> Model {
    let layer = Layer::new()
        .leaf("h2:title-Untitled")
        .leaf("h3:subtitle-None");
    Model::define(dom, &layer).unwrap()
}

#[test]
fn test_default_slot_text() {
    let dom = Dom::new();
    let layer: Layer = serde_json::from_str(r#"{ "div.card:title-Untitled": {} }"#).unwrap();
    let model = Model::define(&dom, &layer).unwrap();

    let instance = model.instantiate(&ModelValues::new()).unwrap();
    assert_eq!(instance.slot_text("title").as_deref(), Some("Untitled"));
}

#[test]
fn test_instances_are_independent() {
    let dom = Dom::new();
    let model = two_slot_card(&dom);
    let first = model.instantiate(&ModelValues::new()).unwrap();
    let second = model.instantiate(&ModelValues::new()).unwrap();

    first
        .refresh(&ModelValues::new().set("title", "Changed"))
        .unwrap();
    assert_eq!(first.slot_text("title").as_deref(), Some("Changed"));
    assert_eq!(second.slot_text("title").as_deref(), Some("Untitled"));

    assert_eq!(
        model.prototype_html(),
        "<div class=\"eye-model\">\
         <h2 data-value=\"title\"></h2><h3 data-value=\"subtitle\"></h3>\
         </div>"
    );
}

#[test]
fn test_sparse_refresh_touches_named_slots_only() {
    let dom = Dom::new();
    let model = two_slot_card(&dom);
    let instance = model
        .instantiate(&ModelValues::new().set("title", "A").set("subtitle", "B"))
        .unwrap();

    instance
        .refresh(&ModelValues::new().sparse().set("title", "X"))
        .unwrap();
    assert_eq!(instance.slot_text("title").as_deref(), Some("X"));
    assert_eq!(instance.slot_text("subtitle").as_deref(), Some("B"));
}

#[test]
fn test_full_refresh_resets_unnamed_slots() {
    let dom = Dom::new();
    let model = two_slot_card(&dom);
    let instance = model
        .instantiate(&ModelValues::new().set("subtitle", "B"))
        .unwrap();

    instance
        .refresh(&ModelValues::new().set("title", "X"))
        .unwrap();
    assert_eq!(instance.slot_text("subtitle").as_deref(), Some("None"));
}

#[test]
fn test_json_descriptor_keeps_key_order() {
    let dom = Dom::new();
    let layer: Layer = serde_json::from_str(
        r#"{
            "header.top": { "h1:title": null, "small:tag-new": "" },
            "ul.items": { "li": [1, 2] },
            "footer:note-end": true
        }"#,
    )
    .unwrap();
    let model = Model::define(&dom, &layer).unwrap();

    let names: Vec<&str> = model.slots().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["title", "tag", "note"]);

    assert_eq!(
        model.prototype_html(),
        "<div class=\"eye-model\">\
         <header class=\"top\">\
         <h1 data-value=\"title\"></h1><small data-value=\"tag\"></small>\
         </header>\
         <ul class=\"items\"><li></li></ul>\
         <footer data-value=\"note\"></footer>\
         </div>"
    );
}

#[test]
fn test_empty_json_descriptor_rejected() {
    let dom = Dom::new();
    let layer: Layer = serde_json::from_str("{}").unwrap();
    assert_eq!(
        Model::define(&dom, &layer).unwrap_err(),
        ModelError::MissingDescriptor
    );
}

#[test]
fn test_instantiate_appends_to_parent() {
    let dom = Dom::new();
    let body = dom.borrow().body();
    let model = two_slot_card(&dom);
    let instance = model
        .instantiate(&ModelValues::new().parent(body).set("title", "Hi"))
        .unwrap();

    let doc = dom.borrow();
    assert_eq!(doc.tree.parent(instance.node()), Some(body));
    assert_eq!(doc.tree.element_children(body), vec![instance.node()]);
    assert_eq!(doc.tree.text_content(instance.node()), "HiNone");
}

#[test]
fn test_refresh_reuses_slot_text_nodes() {
    let dom = Dom::new();
    let model = two_slot_card(&dom);
    let instance = model.instantiate(&ModelValues::new()).unwrap();
    let before = dom.borrow().tree.len();

    for i in 0..100 {
        let title = format!("Title {i}");
        instance
            .refresh(&ModelValues::new().set("title", &title))
            .unwrap();
    }
    assert_eq!(dom.borrow().tree.len(), before);
    assert_eq!(instance.slot_text("title").as_deref(), Some("Title 99"));
    assert_eq!(instance.slot_text("subtitle").as_deref(), Some("None"));
}

#[test]
fn test_nesting_into_instance_keeps_prototype_clean() {
    let dom = Dom::new();
    let body = dom.borrow().body();
    let model = two_slot_card(&dom);
    let outer = model.instantiate(&ModelValues::new().parent(body)).unwrap();
    let html = model.prototype_html();

    let inner = model
        .instantiate(&ModelValues::new().parent(outer.node()))
        .unwrap();
    assert_eq!(dom.borrow().tree.parent(inner.node()), Some(outer.node()));
    assert_eq!(model.prototype_html(), html);

    let fresh = model.instantiate(&ModelValues::new()).unwrap();
    assert_eq!(dom.borrow().tree.element_children(fresh.node()).len(), 2);
}

#[test]
fn test_instance_receives_delegated_listeners() {
    let dom = Dom::new();
    let body = dom.borrow().body();
    let layer = Layer::new().nest("div.row", Layer::new().leaf("button.remove:label-Remove"));
    let model = Model::define(&dom, &layer).unwrap();
    let instance = model.instantiate(&ModelValues::new().parent(body)).unwrap();

    let hits = Rc::new(Cell::new(0));
    let seen = hits.clone();
    let eye = instance.eye().unwrap();
    eye.on(
        "click",
        Some(".remove"),
        &EventListener::new(move |_, _| seen.set(seen.get() + 1)),
    )
    .unwrap();

    let button = {
        let doc = dom.borrow();
        let selector = eye::dom::Selector::parse("button").unwrap();
        doc.tree.query_selector(instance.node(), &selector).unwrap()
    };
    dom.dispatch_event(button, &mut Event::new("click")).unwrap();
    assert_eq!(hits.get(), 1);
}
