//! flux-messages
//!
//! Centralized messaging for the flux-app-generator CLI.
//! Provides the message templates (`MESSAGES`), a placeholder-substituting
//! builder, and the `msg!` macro used by every crate that prints to the user.

pub mod builder;
pub mod macros;
pub mod messages;

pub use builder::MessageBuilder;
pub use messages::MESSAGES;
