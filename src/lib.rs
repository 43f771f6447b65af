//! Scam Honeypot - Conversational scam engagement and intelligence extraction
//!
//! This crate keeps suspected scammers talking through a cautious victim
//! persona while it extracts payment handles, contact details and links from
//! every message, classifies the scam, and reports what it has learned.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
