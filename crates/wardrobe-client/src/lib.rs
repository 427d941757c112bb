//! # wardrobe-client: Backend Client & Dashboard Session
//!
//! The I/O half of Wardrobe. It fetches the catalog and the monthly sales
//! feed, confirms sales with the inventory backend, and drives the pure
//! `wardrobe-core` reducer with the results.
//!
//! ## Module Organization
//! ```text
//! wardrobe_client/
//! ├── lib.rs          ◄─── You are here (exports, tracing setup)
//! ├── config.rs       ◄─── Layered config (env > wardrobe.toml > defaults)
//! ├── backend.rs      ◄─── InventoryBackend trait + HttpBackend (reqwest)
//! ├── session.rs      ◄─── Dashboard<B>: async driver around the reducer
//! ├── error.rs        ◄─── ClientError + ErrorCode for UI consumers
//! └── bin/
//!     └── wardrobe-report.rs ◄─── fetch, filter, print JSON
//! ```
//!
//! ## Example
//! ```rust,no_run
//! use wardrobe_client::{Dashboard, HttpBackend, WardrobeConfig};
//! use wardrobe_core::{Constraint, Field};
//!
//! # async fn run() -> Result<(), wardrobe_client::ClientError> {
//! let config = WardrobeConfig::load(None)?;
//! let dashboard = Dashboard::new(HttpBackend::new(config.backend)?);
//!
//! dashboard.load().await?;
//! let view = dashboard
//!     .set_constraint(Field::Type, Constraint::parse("Camiseta"))
//!     .await?;
//! println!("{} items", view.aggregate.summary.total_items);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod session;

pub use backend::{HttpBackend, InventoryBackend};
pub use config::WardrobeConfig;
pub use error::{ClientError, ClientResult, ErrorCode, ErrorPayload};
pub use session::{Dashboard, Report};

use tracing_subscriber::EnvFilter;

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,wardrobe=debug,reqwest=warn";

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=wardrobe_client=trace` - Trace the client only
/// - Default: [`DEFAULT_LOG_FILTER`]
///
/// Logs go to stderr so stdout stays clean for report output.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
