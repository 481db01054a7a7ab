//! eye Demo - Todo List
//!
//! Builds a small todo list from a JSON model descriptor, wires item removal
//! through a delegated click handler and prints the markup after each step.

use anyhow::Context;
use eye::{Attrs, Event, EventListener, Eye, Layer, Model, ModelValues, NodeId};
use eye_dom::{Dom, Selector};
use tracing_subscriber::EnvFilter;

const ITEM_MODEL: &str = r#"{
    "span.label:label-Untitled": null,
    "small.due:due-someday": null,
    "button.remove:action-remove": null
}"#;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let dom = Dom::new();
    let body = dom.borrow().body();
    let list = Eye::create(&dom, "ul", Attrs::new().id("todos").parent(body))?;
    let list_node = list.first().context("list element missing")?;

    let layer: Layer = serde_json::from_str(ITEM_MODEL).context("bad item descriptor")?;
    let item = Model::define_with(&dom, &["todo"], &layer, &Default::default())?;

    let tasks = [("Write docs", Some("monday")), ("Fix parser", None), ("Ship", Some("friday"))];
    let mut instances = Vec::new();
    for (label, due) in tasks {
        let mut values = ModelValues::new().parent(list_node).set("label", label);
        if let Some(due) = due {
            values = values.set("due", due);
        }
        instances.push(item.instantiate(&values)?);
    }
    tracing::info!(items = instances.len(), "todo list built");
    println!("{}", dom.borrow().tree.outer_html(list_node));

    list.on("click", Some(".remove"), &remove_item(&dom)?)?;

    // Rename the first item without touching its due date
    instances[0].refresh(&ModelValues::new().sparse().set("label", "Write more docs"))?;

    // Click the remove button of the second item
    let button = find(&dom, instances[1].node(), "button.remove")?;
    dom.dispatch_event(button, &mut Event::new("click"))?;
    println!("{}", dom.borrow().tree.outer_html(list_node));

    Ok(())
}

/// Delegated handler detaching the `.eye-model` around the clicked button
fn remove_item(dom: &Dom) -> anyhow::Result<EventListener> {
    let weak = dom.downgrade();
    let row: Selector = ".eye-model".parse()?;
    Ok(EventListener::new(move |event: &mut Event, _| {
        let Some(dom) = weak.upgrade() else {
            return;
        };
        let hit = dom.borrow().tree.closest(event.target(), &row);
        if let Some(hit) = hit {
            if let Err(err) = dom.borrow_mut().tree.detach(hit) {
                tracing::warn!(%err, "could not remove item");
                return;
            }
            tracing::info!(item = %hit, "item removed");
        }
    }))
}

fn find(dom: &Dom, root: NodeId, selector: &str) -> anyhow::Result<NodeId> {
    let parsed: Selector = selector.parse()?;
    dom.borrow()
        .tree
        .query_selector(root, &parsed)
        .with_context(|| format!("no {selector} under {root}"))
}
