//! Testing Utilities Module
//!
//! Helpers shared by unit tests and the live relay tests.
//!
//! ## Submodules
//!
//! - `assertions` - Balance and polling assertions returning `Result`
//! - `mock_vaa` - In-memory `VaaSource` and VAA byte builders

pub mod assertions;
pub mod mock_vaa;

// Re-export commonly used items
pub use assertions::*;
pub use mock_vaa::*;
