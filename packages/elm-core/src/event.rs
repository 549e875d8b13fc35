//! The argument passed to an authored handler when a DOM event fires.

/// Per §4.5: `change`/`input` events carry the element's current `value`;
/// every other event carries nothing. Kept as a plain alias rather than a
/// growable struct: the bridge only ever needs this one field today, and a
/// richer payload is a real future extension, not a speculative one.
pub type EventArg = Option<String>;
