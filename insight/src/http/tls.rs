// SPDX-License-Identifier: Apache-2.0

//! Constructs an [`Agent`] with TLS using the platform certificate verifier.

use rustls::{
	crypto::{ring::default_provider, CryptoProvider},
	ClientConfig,
};
use rustls_platform_verifier::ConfigVerifierExt;
use std::{sync::Arc, time::Duration};
use ureq::{Agent, AgentBuilder};

/// Construct a new agent verifying certificates against the platform's
/// trust store.
pub fn new_agent(timeout: Duration, user_agent: &str) -> Agent {
	// Rustls makes us set up a crypto provider for this process before we can
	// build a client config. Use the one backed by `ring`. Installing fails
	// only when a provider is already set, which is fine.
	if CryptoProvider::get_default().is_none() {
		let _ = CryptoProvider::install_default(default_provider());
	}

	let tls_config = ClientConfig::with_platform_verifier();

	AgentBuilder::new()
		.tls_config(Arc::new(tls_config))
		.timeout(timeout)
		.user_agent(user_agent)
		.build()
}
