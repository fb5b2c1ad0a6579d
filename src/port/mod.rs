//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! The outer-approximation driver talks to its collaborators exclusively
//! through these traits:
//!
//! ```text
//!                  ┌──────────────────────────┐
//!                  │ OuterApproximation       │
//!                  │ (application::driver)    │
//!                  └──────────────────────────┘
//!                      │          │         │
//!                      ▼          ▼         ▼
//!              ┌────────────┐ ┌────────┐ ┌──────────┐
//!              │ Discrete   │ │ Convex │ │ Primal   │
//!              │ Solver     │ │ Oracle │ │ Recovery │
//!              └────────────┘ └────────┘ └──────────┘
//! ```

pub mod outbound;
