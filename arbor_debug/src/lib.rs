// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree printing, trace pretty-printing, and JSON layout snapshots for arbor
//! diagnostics.
//!
//! - [`pretty::PrettyPrintSink`] — a [`TraceSink`](arbor_core::trace::TraceSink)
//!   writing human-readable one-line-per-event output.
//! - [`print::print_tree`] — an indented text rendering of a subtree with its
//!   active layouts.
//! - [`json::snapshot`] — a JSON document of a laid-out subtree, for golden
//!   files and external tooling.

pub mod json;
pub mod pretty;
pub mod print;
