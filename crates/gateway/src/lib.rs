//! Notification intake and the HTTP boundary: validate inbound webhook
//! calls, schedule fan-out without blocking the caller, expose status.

mod error;
mod intake;
mod routes;
mod server;

pub use {
    error::ValidationError,
    intake::{NotificationIntake, RawNotification},
    routes::{AppState, build_router},
    server::serve,
};
