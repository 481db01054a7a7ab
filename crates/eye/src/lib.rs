//! eye
//!
//! Element collections over an `eye-dom` document, with event delegation and
//! refreshable DOM models.
//!
//! # Example
//! ```rust,ignore
//! use eye::{Eye, Attrs, EventListener, Layer, Model, ModelValues};
//!
//! let dom = eye_dom::Dom::new();
//! let list = Eye::create(&dom, "ul", Attrs::new().parent(dom.borrow().body()))?;
//! list.on("click", Some("li"), &EventListener::new(|_, _| println!("item")))?;
//!
//! let item = Model::define(&dom, &Layer::new().leaf("li:label-New"))?;
//! item.instantiate(&ModelValues::new().parent(list.first().unwrap()))?;
//! ```

mod collection;
mod config;
pub mod delegation;
mod error;
mod model;
pub mod template;

pub use collection::{Attrs, Eye};
pub use config::Config;
pub use delegation::{DELEGABLE_EVENTS, DelegationRegistry, Handler, is_delegable};
pub use error::{EyeError, EyeResult, ModelError, TemplateError};
pub use model::{Model, ModelInstance, ModelValues, SlotDescriptor};
pub use template::{Branch, Layer, SlotSpec, TemplateKey};

// Re-export the host DOM for callers that only depend on this crate
pub use eye_dom as dom;
pub use eye_dom::{Dom, Event, EventListener, NodeId};
