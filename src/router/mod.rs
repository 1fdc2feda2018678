//! Action router: the reactive state machine over free-text matching
//!
//! # Components
//!
//! - **RouterState / reduce**: pure fold of actions over the canonical state
//! - **ActionRouter**: cloneable handle that owns the state, publishes every
//!   transition through a watch channel, and runs the async send cycle
//!
//! # Send cycle
//!
//! ```text
//! send_message(msg) → sending_message=true, epoch token issued
//!                          │
//!                          ▼ (spawned task)
//!                 MessageService.post_message({message, actionPathSchemas})
//!                          │
//!              Ok ─────────┴───────── Err
//!               ▼                      ▼
//!       SendMessageSuccess      SendMessageFailure
//!       (applied only if the token still matches the epoch)
//! ```

mod router;
mod state;

pub use router::ActionRouter;
pub use state::{reduce, RouterAction, RouterState};
