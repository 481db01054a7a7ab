//! Models
//!
//! A [`Model`] compiles a [`Layer`] into a detached prototype element and a
//! list of named text slots. Each [`ModelInstance`] is an independent deep
//! copy of the prototype whose slots can be refreshed.

use crate::collection::Eye;
use crate::config::Config;
use crate::error::{EyeResult, ModelError, report};
use crate::template::{Branch, Layer, TemplateKey};
use eye_dom::{Dom, DomError, DomTree, NodeId};
use std::collections::HashMap;
use std::rc::Rc;

/// Named text position inside a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDescriptor {
    pub name: String,
    pub default: Option<String>,
}

impl SlotDescriptor {
    /// Set the text of the slot element under `container` to `value`, or to
    /// the declared default when `value` is `None`
    pub fn apply(
        &self,
        tree: &mut DomTree,
        container: NodeId,
        value: Option<&str>,
        slot_attribute: &str,
    ) -> Result<(), ModelError> {
        let Some(element) = tree.descendants(container).into_iter().find(|&d| {
            tree.get_attribute(d, slot_attribute).as_deref() == Some(self.name.as_str())
        }) else {
            return Err(report(ModelError::SlotMissing {
                name: self.name.clone(),
            }));
        };

        let text = value.or(self.default.as_deref()).unwrap_or_default();
        tree.set_text_content(element, text)
            .map_err(ModelError::reported)?;
        Ok(())
    }
}

/// Values for [`Model::instantiate`] and [`ModelInstance::refresh`]
#[derive(Debug, Clone)]
pub struct ModelValues {
    values: HashMap<String, Option<String>>,
    parent: Option<NodeId>,
    defaults: bool,
}

impl Default for ModelValues {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
            parent: None,
            defaults: true,
        }
    }
}

impl ModelValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: &str, value: &str) -> Self {
        self.values.insert(name.to_string(), Some(value.to_string()));
        self
    }

    /// Name the slot without a value; it falls back to its default
    pub fn unset(mut self, name: &str) -> Self {
        self.values.insert(name.to_string(), None);
        self
    }

    /// Append new instances to `parent`
    pub fn parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Only touch the slots named in these values
    pub fn sparse(mut self) -> Self {
        self.defaults = false;
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(|v| v.as_deref())
    }

    /// Whether slots missing from these values are reset to their default
    pub fn defaults(&self) -> bool {
        self.defaults
    }
}

/// Compiled model: prototype plus slot list
#[derive(Debug, Clone)]
pub struct Model {
    dom: Dom,
    prototype: NodeId,
    slots: Rc<[SlotDescriptor]>,
    config: Rc<Config>,
}

impl Model {
    pub fn define(dom: &Dom, layer: &Layer) -> Result<Self, ModelError> {
        Self::define_with(dom, &[], layer, &Config::default())
    }

    /// Compile `layer` under a root carrying the model class and
    /// `extra_classes`
    pub fn define_with(
        dom: &Dom,
        extra_classes: &[&str],
        layer: &Layer,
        config: &Config,
    ) -> Result<Self, ModelError> {
        if layer.is_empty() {
            return Err(report(ModelError::MissingDescriptor));
        }

        let mut slots = Vec::new();
        let prototype = {
            let mut doc = dom.borrow_mut();
            let tree = &mut doc.tree;
            let root = tree.create_element("div").map_err(ModelError::reported)?;
            {
                let classes = tree
                    .class_list_mut(root)
                    .map_err(ModelError::reported)?;
                classes.add(&config.model_class);
                for class in extra_classes.iter().flat_map(|c| c.split_whitespace()) {
                    classes.add(class);
                }
            }
            compile(tree, root, layer, config, &mut slots)?;
            root
        };

        tracing::debug!(%prototype, slots = slots.len(), "model defined");
        Ok(Self {
            dom: dom.clone(),
            prototype,
            slots: slots.into(),
            config: Rc::new(config.clone()),
        })
    }

    /// Detached root the instances are copied from
    pub(crate) fn prototype(&self) -> NodeId {
        self.prototype
    }

    /// Markup of the prototype
    pub fn prototype_html(&self) -> String {
        self.dom.borrow().tree.outer_html(self.prototype)
    }

    pub fn slots(&self) -> &[SlotDescriptor] {
        &self.slots
    }

    /// Copy the prototype, append it to the requested parent and fill its
    /// slots from `values`. The parent may not lie inside the prototype.
    pub fn instantiate(&self, values: &ModelValues) -> Result<ModelInstance, ModelError> {
        let node = {
            let mut doc = self.dom.borrow_mut();
            if let Some(parent) = values.parent {
                if doc.tree.contains(self.prototype, parent) {
                    return Err(ModelError::reported(DomError::HierarchyRequest {
                        parent,
                        child: self.prototype,
                    }));
                }
            }
            let node = doc
                .tree
                .clone_node(self.prototype, true)
                .map_err(ModelError::reported)?;
            if let Some(parent) = values.parent {
                doc.tree
                    .append_child(parent, node)
                    .map_err(ModelError::reported)?;
            }
            node
        };

        let instance = ModelInstance {
            dom: self.dom.clone(),
            node,
            slots: Rc::clone(&self.slots),
            config: Rc::clone(&self.config),
        };
        instance.refresh(values)?;
        Ok(instance)
    }
}

/// Walk `layer` depth-first in key order, building elements under `parent`
fn compile(
    tree: &mut DomTree,
    parent: NodeId,
    layer: &Layer,
    config: &Config,
    slots: &mut Vec<SlotDescriptor>,
) -> Result<(), ModelError> {
    for (key, branch) in layer.entries() {
        let parsed: TemplateKey = key.parse().map_err(|e| report(ModelError::from(e)))?;
        let element = tree
            .create_element(&parsed.tag)
            .map_err(ModelError::reported)?;
        {
            let classes = tree
                .class_list_mut(element)
                .map_err(ModelError::reported)?;
            for class in &parsed.classes {
                classes.add(class);
            }
        }

        if let Some(slot) = parsed.slot {
            if slots.iter().any(|s| s.name == slot.name) {
                return Err(report(ModelError::DuplicateSlot { name: slot.name }));
            }
            tree.set_attribute(element, &config.slot_attribute, &slot.name)
                .map_err(ModelError::reported)?;
            slots.push(SlotDescriptor {
                name: slot.name,
                default: slot.default,
            });
        }

        tree.append_child(parent, element)
            .map_err(ModelError::reported)?;
        if let Branch::Nested(children) = branch {
            compile(tree, element, children, config, slots)?;
        }
    }
    Ok(())
}

/// One copy of a model
#[derive(Debug, Clone)]
pub struct ModelInstance {
    dom: Dom,
    node: NodeId,
    slots: Rc<[SlotDescriptor]>,
    config: Rc<Config>,
}

impl ModelInstance {
    /// Apply `values` to the slots.
    ///
    /// With defaults on, every slot is written: named slots get their value,
    /// the rest their default. With [`ModelValues::sparse`], only named slots
    /// are written.
    pub fn refresh(&self, values: &ModelValues) -> Result<&Self, ModelError> {
        let mut doc = self.dom.borrow_mut();
        for slot in self.slots.iter() {
            if values.defaults() || values.contains(&slot.name) {
                slot.apply(
                    &mut doc.tree,
                    self.node,
                    values.get(&slot.name),
                    &self.config.slot_attribute,
                )?;
            }
        }
        Ok(self)
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn slots(&self) -> &[SlotDescriptor] {
        &self.slots
    }

    /// Current text of a slot
    pub fn slot_text(&self, name: &str) -> Option<String> {
        let doc = self.dom.borrow();
        let attribute = self.config.slot_attribute.as_str();
        doc.tree
            .descendants(self.node)
            .into_iter()
            .find(|&d| doc.tree.get_attribute(d, attribute).as_deref() == Some(name))
            .map(|d| doc.tree.text_content(d))
    }

    /// Wrap the instance root in a collection
    pub fn eye(&self) -> EyeResult<Eye> {
        Eye::wrap(&self.dom, [self.node])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> Layer {
        Layer::new()
            .leaf("h2.title:title-Untitled")
            .nest("div.body", Layer::new().leaf("p:text"))
    }

    #[test]
    fn test_define_builds_prototype() {
        let dom = Dom::new();
        let model =
            Model::define_with(&dom, &["card wide"], &card(), &Config::default()).unwrap();

        let names: Vec<&str> = model.slots().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["title", "text"]);

        let doc = dom.borrow();
        assert_eq!(doc.tree.parent(model.prototype()), None);
        assert_eq!(
            doc.tree.outer_html(model.prototype()),
            "<div class=\"eye-model card wide\">\
             <h2 class=\"title\" data-value=\"title\"></h2>\
             <div class=\"body\"><p data-value=\"text\"></p></div>\
             </div>"
        );
    }

    #[test]
    fn test_empty_descriptor() {
        let dom = Dom::new();
        assert_eq!(
            Model::define(&dom, &Layer::new()).unwrap_err(),
            ModelError::MissingDescriptor
        );
    }

    #[test]
    fn test_duplicate_slot() {
        let dom = Dom::new();
        let layer = Layer::new().leaf("h1:name").leaf("h2:name-x");
        assert_eq!(
            Model::define(&dom, &layer).unwrap_err(),
            ModelError::DuplicateSlot {
                name: "name".to_string()
            }
        );
    }

    #[test]
    fn test_bad_key() {
        let dom = Dom::new();
        let layer = Layer::new().nest("div", Layer::new().leaf(".x"));
        assert!(matches!(
            Model::define(&dom, &layer),
            Err(ModelError::Template(_))
        ));
    }

    #[test]
    fn test_custom_config() {
        let dom = Dom::new();
        let config = Config {
            model_class: "tpl".to_string(),
            slot_attribute: "data-slot".to_string(),
        };
        let model = Model::define_with(&dom, &[], &Layer::new().leaf("b:x-y"), &config).unwrap();
        let instance = model.instantiate(&ModelValues::new()).unwrap();
        assert_eq!(instance.slot_text("x").as_deref(), Some("y"));
        let doc = dom.borrow();
        assert!(doc.tree.class_list(instance.node()).unwrap().contains("tpl"));
    }

    #[test]
    fn test_unset_falls_back_to_default() {
        let dom = Dom::new();
        let model = Model::define(&dom, &card()).unwrap();
        let instance = model
            .instantiate(&ModelValues::new().set("title", "Hello").set("text", "Body"))
            .unwrap();

        instance
            .refresh(&ModelValues::new().sparse().unset("title"))
            .unwrap();
        assert_eq!(instance.slot_text("title").as_deref(), Some("Untitled"));
        assert_eq!(instance.slot_text("text").as_deref(), Some("Body"));

        instance.refresh(&ModelValues::new()).unwrap();
        assert_eq!(instance.slot_text("text").as_deref(), Some(""));
    }

    #[test]
    fn test_slot_missing() {
        let dom = Dom::new();
        let model = Model::define(&dom, &card()).unwrap();
        let instance = model.instantiate(&ModelValues::new()).unwrap();
        {
            let mut doc = dom.borrow_mut();
            let h2 = doc.tree.element_children(instance.node())[0];
            doc.tree.remove_attribute(h2, "data-value").unwrap();
        }
        assert_eq!(
            instance.refresh(&ModelValues::new()).unwrap_err(),
            ModelError::SlotMissing {
                name: "title".to_string()
            }
        );
    }

    #[test]
    fn test_parent_inside_prototype_rejected() {
        let dom = Dom::new();
        let model = Model::define(&dom, &card()).unwrap();
        let html = model.prototype_html();
        let inner = dom.borrow().tree.element_children(model.prototype())[1];

        for parent in [model.prototype(), inner] {
            assert!(matches!(
                model.instantiate(&ModelValues::new().parent(parent)),
                Err(ModelError::Dom(DomError::HierarchyRequest { .. }))
            ));
        }
        assert_eq!(model.prototype_html(), html);

        let fresh = model.instantiate(&ModelValues::new()).unwrap();
        assert_eq!(dom.borrow().tree.element_children(fresh.node()).len(), 2);
    }

    #[test]
    fn test_instantiate_into_text_parent_fails() {
        let dom = Dom::new();
        let model = Model::define(&dom, &card()).unwrap();
        let text = dom.borrow_mut().tree.create_text("t");
        assert!(matches!(
            model.instantiate(&ModelValues::new().parent(text)),
            Err(ModelError::Dom(_))
        ));
    }
}
