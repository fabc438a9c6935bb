// SPDX-License-Identifier: Apache-2.0

pub mod authenticated_agent;
pub mod tls;
