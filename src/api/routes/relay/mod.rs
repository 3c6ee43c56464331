pub mod public;
mod router;
pub use router::{not_found, router};
