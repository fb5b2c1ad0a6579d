//! Outbound ports (driven side): interfaces implemented by outbound adapters.

pub mod discrete;
pub mod oracle;
pub mod recovery;
