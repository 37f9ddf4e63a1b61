// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Chat model implementations

pub mod ernie;

pub use ernie::{chat_endpoint, Credentials, ErnieBot};
