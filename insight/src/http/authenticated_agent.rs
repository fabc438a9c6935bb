// SPDX-License-Identifier: Apache-2.0

//! An [`Agent`] that attaches the caller's credential, if any, to every
//! request.

use crate::util::redacted::Redacted;
use std::fmt::{self, Debug, Formatter};
use ureq::{Agent, Request};

/// The key to use for the authorization HTTP header.
const AUTH_KEY: &str = "Authorization";

/// Media type for the GitHub REST API.
const ACCEPT: &str = "application/vnd.github+json";

/// An [`Agent`] bound to one credential.
///
/// Each gateway owns its own, so analyses running under different tokens
/// never share authentication state.
pub struct AuthenticatedAgent {
	agent: Agent,
	token: Option<Redacted<String>>,
}

impl AuthenticatedAgent {
	pub fn new(agent: Agent, token: Option<Redacted<String>>) -> AuthenticatedAgent {
		AuthenticatedAgent { agent, token }
	}

	pub fn is_authenticated(&self) -> bool {
		self.token.is_some()
	}

	/// Make a GET request, authenticated when a token is held.
	pub fn get(&self, url: &str) -> Request {
		let request = self.agent.get(url).set("Accept", ACCEPT);

		match &self.token {
			Some(token) => request.token_auth(token.expose()),
			None => request,
		}
	}
}

impl Debug for AuthenticatedAgent {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("AuthenticatedAgent")
			.field("token", &self.token)
			.finish_non_exhaustive()
	}
}

/// Extension trait to add a convenient "token auth" method.
trait TokenAuth {
	/// Sets a token authentication header on a request.
	fn token_auth(self, token: &str) -> Self;
}

impl TokenAuth for Request {
	fn token_auth(self, token: &str) -> Self {
		self.set(AUTH_KEY, &format!("token {}", token))
	}
}
