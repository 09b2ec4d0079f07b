//! Exact-match denylists.
//!
//! Property names are checked at every member read, identifier lookup,
//! object-literal key and `in` probe. Method names are checked only at call
//! sites and are a superset of the property names.

use hashbrown::HashSet;
use lazy_static::lazy_static;

/// Prototype-chain accessors and argument-object leaks.
const PROTOTYPE_CHAIN: &[&str] = &[
    "constructor",
    "prototype",
    "__proto__",
    "__defineGetter__",
    "__defineSetter__",
    "__lookupGetter__",
    "__lookupSetter__",
    "caller",
    "callee",
    "arguments",
];

/// Internal markers the host uses on reactive state.
const HOST_MARKERS: &[&str] = &[
    "__raw__",
    "__reactive__",
    "__owner__",
    "__scope__",
    "$$raw",
    "$$reactive",
];

/// Surfaces that reach the window, the document or browser storage.
const GLOBAL_ESCAPE: &[&str] = &[
    "window",
    "self",
    "top",
    "parent",
    "frames",
    "opener",
    "globalThis",
    "global",
    "document",
    "ownerDocument",
    "defaultView",
    "contentWindow",
    "contentDocument",
    "location",
    "navigator",
    "localStorage",
    "sessionStorage",
    "indexedDB",
    "cookie",
    "innerHTML",
    "outerHTML",
    "srcdoc",
];

/// Code execution, module loading and networking primitives.
const CODE_EXECUTION: &[&str] = &[
    "eval",
    "Function",
    "AsyncFunction",
    "GeneratorFunction",
    "setTimeout",
    "setInterval",
    "setImmediate",
    "execScript",
    "importScripts",
    "fetch",
    "XMLHttpRequest",
    "WebSocket",
    "EventSource",
    "Worker",
    "SharedWorker",
    "sendBeacon",
    "require",
    "process",
    "module",
    "exports",
    "import",
    "Reflect",
    "Proxy",
    "WebAssembly",
];

/// Call-site only: context rebinding.
const CONTEXT_REBINDING: &[&str] = &["call", "apply", "bind"];

/// Call-site only: legacy string methods that emit markup.
const HTML_STRING_METHODS: &[&str] = &[
    "anchor",
    "big",
    "blink",
    "bold",
    "fixed",
    "fontcolor",
    "fontsize",
    "italics",
    "link",
    "small",
    "strike",
    "sub",
    "sup",
];

/// Call-site only: markup writers, schedulers and reflective mutation.
const SIDE_EFFECT_METHODS: &[&str] = &[
    "insertAdjacentHTML",
    "write",
    "writeln",
    "requestAnimationFrame",
    "requestIdleCallback",
    "queueMicrotask",
    "postMessage",
    "defineProperty",
    "defineProperties",
    "setPrototypeOf",
    "getPrototypeOf",
    "assign",
];

lazy_static! {
    pub static ref FORBIDDEN_PROPERTIES: HashSet<&'static str> = [
        PROTOTYPE_CHAIN,
        HOST_MARKERS,
        GLOBAL_ESCAPE,
        CODE_EXECUTION,
    ]
    .concat()
    .into_iter()
    .collect();

    pub static ref FORBIDDEN_METHODS: HashSet<&'static str> = FORBIDDEN_PROPERTIES
        .iter()
        .copied()
        .chain(CONTEXT_REBINDING.iter().copied())
        .chain(HTML_STRING_METHODS.iter().copied())
        .chain(SIDE_EFFECT_METHODS.iter().copied())
        .collect();
}

/// Exact match against the property denylist.
pub fn is_forbidden_property(name: &str) -> bool {
    FORBIDDEN_PROPERTIES.contains(name)
}

/// Exact match against the method denylist.
pub fn is_forbidden_method(name: &str) -> bool {
    FORBIDDEN_METHODS.contains(name)
}
