//! `inviteqr_session` v1:
//! Upload, select, generate and package, owned by one session object.
//!
//! Architecture:
//! - `spec`    : session options, run tickets, errors
//! - `session` : epoch-tagged session state machine
pub mod session;
pub mod spec;

pub use session::Session;
pub use spec::{N_PREVIEW_ITEMS_DEFAULT, SessionError, SpecGenerationTicket, SpecSessionOptions};
