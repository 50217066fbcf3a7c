//! Client for AI-assisted productivity features: chat, writing assistance,
//! homework solving from text or images, and image generation
//!
//! Text requests are sent through a backend generation proxy, images come
//! from a public synthesis endpoint, and accounts live in a hosted auth
//! backend.

pub mod ai;
pub mod app;
pub mod auth;
pub mod error;
pub mod features;
pub mod image;
pub mod models;
pub mod options;
pub mod prompts;

pub use error::{Error, Result};
