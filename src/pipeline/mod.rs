//! Pipeline stages for one classification run.
//!
//! Each submodule implements exactly one step so each can be tested alone.
//!
//! ## Data Flow
//!
//! ```text
//! endpoint ──▶ encode ──▶ request ──▶ normalize
//! (mapping)    (base64)   (HTTP POST)  (TestResult)
//! ```
//!
//! 1. [`endpoint`]  — resolve the model to its configured endpoint; an
//!    unmapped model stops the run before any I/O
//! 2. [`encode`]    — read the selected file and base64-wrap it
//! 3. [`request`]   — the single POST; the only stage with network I/O
//! 4. [`normalize`] — map the endpoint's JSON onto a [`crate::TestResult`]

pub mod encode;
pub mod endpoint;
pub mod normalize;
pub mod request;
