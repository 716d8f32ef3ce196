//! Octologin backend: log in with GitHub and show the user’s profile.

pub mod api;
pub mod config;
pub mod github;
pub mod pages;

#[cfg(test)]
pub mod test;
