//! Generation providers for seopress.
//!
//! Implements [`seopress_core::GenerationCapability`] on top of
//! OpenAI-compatible chat completion APIs (DeepSeek, OpenAI, local
//! gateways). Providers are tried in configured order; the first success
//! wins.

mod chain;
mod client;

pub use chain::ProviderChain;
pub use client::ChatProvider;
