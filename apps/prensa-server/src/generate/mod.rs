//! Generative-text proxy

mod client;

pub use client::TextGenerator;
