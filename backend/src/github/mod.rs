//! Talk to GitHub on behalf of a user who is logging in.

mod client;
pub use client::*;

mod errors;
pub use errors::*;

mod types;
pub use types::*;
