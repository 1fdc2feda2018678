//! Action router: free-text input resolved to declared action paths.
//!
//! An application declares a finite route table, each route carrying a typed
//! parameter schema. User text is posted to a remote matcher constrained to
//! answer with exactly one declared path plus correctly typed parameters; the
//! router folds the in-flight request and its outcome into one reactive state
//! that view code reads.
//!
//! # Architecture
//!
//! ```text
//! RouterOutlet (rendering boundary)
//!   │
//!   ├── ActionRouter (state machine)
//!   │     ├── RouterState via watch channel (one writer, many readers)
//!   │     ├── SchemaSet (compiled once from the route table)
//!   │     └── MessageService (transport collaborator, one POST per send)
//!   │
//!   └── ActionRoute[] (declaration + view binding)
//!         └── active flags: result.path == route.path
//! ```
//!
//! # Transitions
//!
//! | Action | Effect |
//! |--------|--------|
//! | update_input | replace the unsent text |
//! | clear_input | empty the unsent text |
//! | send_message | mark in-flight, post `{message, actionPathSchemas}` |
//! | (success) | store the match, clear flags |
//! | (failure) | set `api_error` |
//! | reset | initial state; in-flight resolutions discarded |
//!
//! # Usage
//!
//! ```ignore
//! use action_router::{ActionPath, ActionRoute, HttpMessageService, ParamConfig, RouterOutlet};
//! use std::sync::Arc;
//!
//! let outlet = RouterOutlet::new(
//!     vec![
//!         ActionRoute::render(
//!             ActionPath::new("search").with_param(ParamConfig::string("city")),
//!             |router| { /* view reads router.state() */ },
//!         ),
//!         ActionRoute::render(ActionPath::new("notFound"), |_| { /* fallback */ }),
//!     ],
//!     Arc::new(HttpMessageService::default()),
//! )?;
//!
//! outlet.router().update_input("find me pizza in Paris");
//! outlet.router().send_input();
//! ```

pub mod dispatch;
pub mod logging;
pub mod message;
pub mod route;
pub mod router;
pub mod schema;

pub use dispatch::{
    active_flags, is_active, ActionRoute, OutletSnapshot, RenderFn, RouteView, RouterOutlet,
    ViewBinding,
};
pub use message::{
    ActionResult, HttpMessageService, MessageService, MessageServiceConfig, ParamValue,
    PostMessagePayload, DEFAULT_ENDPOINT,
};
pub use route::{ActionPath, ParamConfig, ParamType, NOT_FOUND_PATH};
pub use router::{reduce, ActionRouter, RouterAction, RouterState};
pub use schema::{ActionPathSchema, SchemaError, SchemaSet};
