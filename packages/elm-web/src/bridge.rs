//! C5: the event bridge, live half. `elm-dom-core::HandlerRef` already
//! carries the mutable-cell/dispose lifecycle; this module is just the
//! glue that turns one into a DOM-callable, `Msg`-typed closure and feeds
//! its result back into the application's dispatch loop.

use std::rc::Rc;

use elm_dom_core::{EventArg, HandlerRef};

/// Builds DOM-callable closures for handlers, and owns the sink every fired
/// event's resulting `Msg` is pushed into. One registry is shared by the
/// whole mounted tree; it outlives any single diff/patch cycle.
pub struct HandlerRegistry<Msg> {
    dispatch: Rc<dyn Fn(Msg)>,
}

impl<Msg: 'static> HandlerRegistry<Msg> {
    pub fn new(dispatch: Rc<dyn Fn(Msg)>) -> Self {
        Self { dispatch }
    }

    /// Wraps a `HandlerRef` into the Msg-erased callback `DomDocument::add_listener`
    /// expects. Safe to call more than once for the same handler: each
    /// call just produces another closure that reads the handler's current
    /// binding at fire time.
    pub fn callback(&self, handler: Rc<HandlerRef<Msg>>) -> Rc<dyn Fn(EventArg)> {
        let dispatch = self.dispatch.clone();
        Rc::new(move |arg: EventArg| {
            if handler.is_disposed() {
                log::warn!("An event was triggered but there was no listener to handle it");
                return;
            }
            let msg = handler.call(arg);
            dispatch(msg);
        })
    }
}
