// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — bridges the command line to the docscan backend crates.
//
// Each service wraps one concern of a CLI run: parsing typed corners,
// answering correction requests from the terminal, and writing results.

pub mod corners;
pub mod debug_output;
pub mod output;
pub mod terminal;
