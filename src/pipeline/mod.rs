//! Pipeline stages for one invoice submission.
//!
//! Each submodule implements exactly one step, so each can be tested
//! without the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ validate ──▶ upload ──▶ render
//! (path)    (type/size)  (POST)     (HTML table)
//! ```
//!
//! 1. [`input`]    — read a file from disk and guess its MIME type
//! 2. [`validate`] — reject missing, non-image or oversized files; never
//!    touches the network
//! 3. [`upload`]   — multipart POST to `{api_base}/upload` and interpretation
//!    of the reply; the only stage with network I/O
//! 4. [`render`]   — project the invoice data into an HTML table with
//!    shekel formatting

pub mod input;
pub mod render;
pub mod upload;
pub mod validate;
