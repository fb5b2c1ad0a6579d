//! Implementations of ports (hexagonal adapters).

#[cfg(feature = "highs")]
pub mod inbound;
pub mod outbound;
