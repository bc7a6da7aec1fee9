//! Beanstalk server library.
//!
//! Turns product discovery conversations into PRDs, breaks PRDs into epics
//! and user stories, and renders a React project scaffold from the epics.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
