//! The live `web-sys` implementation of [`DomDocument`].

use std::cell::RefCell;
use std::rc::Rc;

use elm_dom_core::EventArg;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement, Node};

use crate::dom::DomDocument;

/// A live listener binding, kept alive for as long as it's registered so
/// the underlying `web_sys::Node` keeps firing it; dropped (and detached)
/// on `remove_listener`.
struct Binding {
    node: Node,
    event_name: String,
    closure: Closure<dyn FnMut(Event)>,
}

/// `web-sys`-backed [`DomDocument`]. One instance wraps the page's
/// `Document` and owns every listener `Closure` registered through it:
/// `wasm-bindgen` closures must be kept alive for as long as the browser
/// can call them, so they live here rather than being `.forget()`-leaked.
pub struct WebSysDocument {
    document: Document,
    bindings: RefCell<Vec<Binding>>,
}

impl WebSysDocument {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            bindings: RefCell::new(Vec::new()),
        }
    }

    /// The document's own `Node` handle, usually used as the mount root's
    /// parent.
    pub fn as_node(&self) -> Node {
        self.document.clone().unchecked_into()
    }
}

/// Per §4.5: `change`/`input` events carry the live element's current
/// `value`; reading it requires knowing the concrete element type, since
/// `value` isn't part of the plain `Element` interface.
fn extract_event_arg(event_name: &str, event: &Event) -> EventArg {
    if event_name != "change" && event_name != "input" {
        return None;
    }
    let target = event.target()?;
    if let Ok(input) = target.clone().dyn_into::<HtmlInputElement>() {
        return Some(input.value());
    }
    if let Ok(textarea) = target.clone().dyn_into::<HtmlTextAreaElement>() {
        return Some(textarea.value());
    }
    if let Ok(select) = target.dyn_into::<HtmlSelectElement>() {
        return Some(select.value());
    }
    None
}

impl DomDocument for WebSysDocument {
    type Node = Node;

    fn create_element(&self, tag: &str) -> Self::Node {
        self.document
            .create_element(tag)
            .expect("tag name rejected by the DOM")
            .unchecked_into()
    }

    fn create_text(&self, text: &str) -> Self::Node {
        self.document.create_text_node(text).unchecked_into()
    }

    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) {
        let element: &web_sys::Element = node.unchecked_ref();
        element
            .set_attribute(name, value)
            .expect("attribute name rejected by the DOM");
    }

    fn remove_attribute(&self, node: &Self::Node, name: &str) {
        let element: &web_sys::Element = node.unchecked_ref();
        let _ = element.remove_attribute(name);
    }

    fn add_listener(&self, node: &Self::Node, event_name: &str, callback: Rc<dyn Fn(EventArg)>) {
        let owned_event_name = event_name.to_string();
        let closure_event_name = owned_event_name.clone();
        let closure = Closure::wrap(Box::new(move |event: Event| {
            let arg = extract_event_arg(&closure_event_name, &event);
            callback(arg);
        }) as Box<dyn FnMut(Event)>);

        node.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())
            .expect("add_event_listener_with_callback failed");

        self.bindings.borrow_mut().push(Binding {
            node: node.clone(),
            event_name: owned_event_name,
            closure,
        });
    }

    fn remove_listener(&self, node: &Self::Node, event_name: &str) {
        let mut bindings = self.bindings.borrow_mut();
        if let Some(index) = bindings
            .iter()
            .position(|b| &b.node == node && b.event_name == event_name)
        {
            let binding = bindings.remove(index);
            let _ = binding
                .node
                .remove_event_listener_with_callback(event_name, binding.closure.as_ref().unchecked_ref());
        }
    }

    fn append_child(&self, parent: &Self::Node, child: &Self::Node) {
        parent.append_child(child).expect("append_child failed");
    }

    fn insert_before(&self, parent: &Self::Node, child: &Self::Node, reference: Option<&Self::Node>) {
        parent
            .insert_before(child, reference)
            .expect("insert_before failed");
    }

    fn remove_child(&self, parent: &Self::Node, child: &Self::Node) {
        let _ = parent.remove_child(child);
    }

    fn first_child(&self, node: &Self::Node) -> Option<Self::Node> {
        node.first_child()
    }

    fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node> {
        node.next_sibling()
    }
}
