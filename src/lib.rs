// src/lib.rs

use std::sync::Arc;

// Re-export commonly used types
pub use ethers::types::{Address, H160, H256, U256, U64};

pub mod actions;
pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod mcp;
pub mod utils;

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: config::Config,
    /// Every registered action, in listing order
    pub actions: Arc<Vec<Arc<dyn actions::Action>>>,
    /// Signer and collaborators; `None` when no private key is configured
    pub context: Option<Arc<actions::ActionContext>>,
}

impl AppState {
    pub fn new(config: config::Config, context: Option<actions::ActionContext>) -> Self {
        Self {
            config,
            actions: Arc::new(actions::all_actions()),
            context: context.map(Arc::new),
        }
    }
}
