//! End-to-end API tests.
//!
//! Every test builds the real `/api` route table on top of an in-memory store.
//! Model replies come from a scripted model, or from a mock OpenAI-compatible
//! server when the HTTP client itself is under test.
//!
//! Run with: cargo test --test api_e2e

mod test_codegen;
mod test_conversation;
mod test_epics;
mod test_flow;
mod test_prds;
mod test_upload;
