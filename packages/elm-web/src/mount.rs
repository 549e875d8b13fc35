//! The mount API (§6) and the `App<Model, Msg>` runtime that wires an
//! `Init`/`Update`/`View` loop to C3/C4/C5 (§5: single-threaded, one
//! suspension point per dispatched message, no transactional grouping
//! across events).
//!
//! Grounded on `packages/web/src/lib.rs`'s `launch`/`launch_cfg`/
//! `launch_with_props` three-tier entry points and its `WebConfig` builder
//! (named in that file's doc comments, not present in this pruned pack).

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use elm_dom_core::{diff_siblings, to_realized, IdGen, Node, RealizedNode};
use wasm_bindgen::JsCast;

use crate::bridge::HandlerRegistry;
use crate::error::PatchError;
use crate::patch::Patcher;
use crate::webdom::WebSysDocument;

/// Mount-time configuration, mirroring `WebConfig`'s builder shape.
pub struct MountConfig {
    pub selector: &'static str,
    /// Install `console_error_panic_hook` so a wasm panic surfaces a real
    /// stack trace in the browser console. A no-op when the `panic-hook`
    /// cargo feature is disabled.
    pub panic_hook: bool,
}

impl MountConfig {
    pub fn new(selector: &'static str) -> Self {
        Self { selector, panic_hook: true }
    }

    pub fn panic_hook(mut self, enabled: bool) -> Self {
        self.panic_hook = enabled;
        self
    }
}

fn query_root(selector: &str) -> Result<(web_sys::Document, web_sys::Node), PatchError> {
    let window = web_sys::window().ok_or(PatchError::ExpectedElement("no global window"))?;
    let document = window.document().ok_or(PatchError::ExpectedElement("no document on window"))?;
    let element = document
        .query_selector(selector)
        .ok()
        .flatten()
        .ok_or(PatchError::ExpectedElement("mount selector matched no element"))?;
    Ok((document, element.unchecked_into::<web_sys::Node>()))
}

/// A one-shot, non-reactive mount: renders `initial_view` once and attaches
/// it under `selector`. Event handlers still fire (and their `Msg` is
/// still produced), but nothing re-renders: there is no `update`/`view`
/// loop to feed the message to. Exists for the spec's literal `mount(selector,
/// initialView)` primitive; `App::mount` is the form real applications want.
pub struct StaticMount<Msg> {
    #[allow(dead_code)] // kept alive so materialized HandlerRefs' closures stay valid
    document: WebSysDocument,
    root: web_sys::Node,
    #[allow(dead_code)]
    realized: Vec<RealizedNode<Msg>>,
}

impl<Msg> StaticMount<Msg> {
    pub fn root(&self) -> &web_sys::Node {
        &self.root
    }
}

/// Renders `initial_view` and attaches it under the element matched by
/// `selector`. See [`StaticMount`] for what happens to fired events.
pub fn mount<Msg: 'static>(selector: &str, initial_view: Node<Msg>) -> Result<StaticMount<Msg>, PatchError> {
    let (document, root) = query_root(selector)?;
    let doc = WebSysDocument::new(document);

    let mut ids = IdGen::new();
    let realized = to_realized(std::slice::from_ref(&initial_view), &mut ids)
        .unwrap_or_else(|e| unreachable!("a freshly authored node always realizes: {e}"));

    let dispatch: Rc<dyn Fn(Msg)> = Rc::new(|_msg: Msg| {
        log::warn!("event fired on a statically mounted view; no update loop is attached, message dropped");
    });
    let registry = HandlerRegistry::new(dispatch);
    let patcher = Patcher::new(&doc);
    for node in &realized {
        for dom_node in patcher.materialize(node, &registry) {
            doc.append_child(&root, &dom_node);
        }
    }

    Ok(StaticMount { document: doc, root, realized })
}

struct AppState<Model, Msg> {
    document: WebSysDocument,
    root: web_sys::Node,
    model: RefCell<Model>,
    update: Box<dyn Fn(Msg, &Model) -> Model>,
    view: Box<dyn Fn(&Model) -> Node<Msg>>,
    realized: RefCell<Vec<RealizedNode<Msg>>>,
    ids: RefCell<IdGen>,
    registry: HandlerRegistry<Msg>,
    /// Set once a patch returns a [`PatchError`] (§7 category 2). Checked
    /// before every later dispatch so a mount that's drifted out of sync
    /// with the live DOM doesn't keep computing diffs against a realized
    /// tree nobody can vouch for any more.
    degraded: Cell<bool>,
}

/// An Elm-architecture app mounted under a single DOM root (§6's
/// "host-facing Elm loop interface"). Owns the `Model` plus the `update`/
/// `view` functions and the realized tree from the last render; every
/// dispatched `Msg` drives exactly one `diff_siblings` → `Patcher::apply`
/// cycle, and two messages arriving before the first patch completes are
/// serialized (§5) since everything here runs on the single event-loop
/// thread with no `await` points of its own.
pub struct App<Model, Msg> {
    state: Rc<AppState<Model, Msg>>,
}

impl<Model, Msg> Clone for App<Model, Msg> {
    fn clone(&self) -> Self {
        Self { state: self.state.clone() }
    }
}

impl<Model: 'static, Msg: 'static> App<Model, Msg> {
    /// Mounts `init`/`update`/`view` under `selector` with default
    /// [`MountConfig`] and performs the first render.
    pub fn mount(
        selector: &'static str,
        init: impl FnOnce() -> Model,
        update: impl Fn(Msg, &Model) -> Model + 'static,
        view: impl Fn(&Model) -> Node<Msg> + 'static,
    ) -> Result<Self, PatchError> {
        Self::mount_with_config(MountConfig::new(selector), init, update, view)
    }

    /// Same as [`App::mount`], with an explicit [`MountConfig`].
    pub fn mount_with_config(
        config: MountConfig,
        init: impl FnOnce() -> Model,
        update: impl Fn(Msg, &Model) -> Model + 'static,
        view: impl Fn(&Model) -> Node<Msg> + 'static,
    ) -> Result<Self, PatchError> {
        if config.panic_hook {
            #[cfg(feature = "panic-hook")]
            console_error_panic_hook::set_once();
        }

        let (document, root) = query_root(config.selector)?;
        let doc = WebSysDocument::new(document);

        let model = init();
        let first_view = view(&model);
        let mut ids = IdGen::new();
        let realized = to_realized(std::slice::from_ref(&first_view), &mut ids)
            .unwrap_or_else(|e| unreachable!("a freshly authored node always realizes: {e}"));

        let state = Rc::new_cyclic(|weak: &Weak<AppState<Model, Msg>>| {
            let weak = weak.clone();
            let dispatch: Rc<dyn Fn(Msg)> = Rc::new(move |msg: Msg| {
                if let Some(state) = weak.upgrade() {
                    dispatch_msg(&state, msg);
                } else {
                    log::warn!("event fired after its mount was dropped; message dropped");
                }
            });
            AppState {
                document: doc,
                root: root.clone(),
                model: RefCell::new(model),
                update: Box::new(update),
                view: Box::new(view),
                realized: RefCell::new(realized),
                ids: RefCell::new(ids),
                registry: HandlerRegistry::new(dispatch),
                degraded: Cell::new(false),
            }
        });

        {
            let patcher = Patcher::new(&state.document);
            let realized = state.realized.borrow();
            for node in realized.iter() {
                for dom_node in patcher.materialize(node, &state.registry) {
                    state.document.append_child(&root, &dom_node);
                }
            }
        }

        Ok(Self { state })
    }

    /// Whether the last patch failed and left this mount out of sync with
    /// the live DOM (§7 category 2). A degraded mount still accepts
    /// messages (`update`/`view` keep running) but stops attempting
    /// further patches.
    pub fn is_degraded(&self) -> bool {
        self.state.degraded.get()
    }
}

/// One full message cycle: `Update` the model, re-`View` it, diff against
/// the stored realized tree, and patch the live DOM. A patch failure (§7
/// category 2: a diff/patch contract violation) is logged and marks the
/// mount degraded rather than panicking. No partial edit is ever applied
/// underneath a failed `Patcher::apply` call (§5: edit arrays apply
/// atomically or not at all from the caller's point of view).
fn dispatch_msg<Model, Msg: 'static>(state: &Rc<AppState<Model, Msg>>, msg: Msg) {
    if state.degraded.get() {
        log::warn!("message dropped: mount is degraded after an earlier patch failure");
        return;
    }

    log::trace!("dispatching message, rebuilding view");
    let new_view = {
        let mut model = state.model.borrow_mut();
        let new_model = (state.update)(msg, &model);
        *model = new_model;
        (state.view)(&model)
    };

    let mut realized = state.realized.borrow_mut();
    let mut ids = state.ids.borrow_mut();
    let out = diff_siblings(0, realized.as_slice(), std::slice::from_ref(&new_view), &mut ids);

    let patcher = Patcher::new(&state.document);
    match patcher.apply(&state.root, &out.edits, &state.registry) {
        Ok(()) => {
            log::trace!("patch applied, {} handler(s) disposed", out.disposed);
            *realized = out.realized;
        }
        Err(err) => {
            log::error!("patch failed, marking mount degraded: {err}");
            state.degraded.set(true);
        }
    }
}
