//! Bank Concierge - Banking-Support Chat Assistant
//!
//! This crate implements a chat backend that answers banking questions through
//! an LLM provider and drafts complaint emails which are dispatched to the
//! user's bank only after explicit confirmation.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
