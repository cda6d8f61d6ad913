//! Launcher seam and the single-shot credential completion it reports through.

// std
use std::task::{Context, Poll};
// crates.io
use tokio::sync::oneshot;
// self
use crate::{
	_prelude::*,
	auth::{CredentialToken, LoginStyle, ServiceName},
};

/// Popup window dimensions requested for popup-style logins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PopupOptions {
	/// Window width; `None` lets the launcher pick.
	pub width: Option<u32>,
	/// Window height.
	pub height: u32,
}
impl PopupOptions {
	/// Height requested when the caller does not choose one.
	pub const DEFAULT_HEIGHT: u32 = 600;
}
impl Default for PopupOptions {
	fn default() -> Self {
		Self { width: None, height: Self::DEFAULT_HEIGHT }
	}
}

/// Everything a launcher needs to present the authorization page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginLaunch {
	/// Service the login belongs to.
	pub login_service: ServiceName,
	/// Fully formed authorization URL.
	pub login_url: Url,
	/// Effective login style.
	pub login_style: LoginStyle,
	/// Token the callback page will report back.
	pub credential_token: CredentialToken,
	/// Popup dimensions.
	pub popup: PopupOptions,
	/// Page to return to after a redirect-style login.
	pub redirect_url: Option<String>,
}

/// Host capability that opens the authorization page (popup window or full redirect).
pub trait LoginLauncher
where
	Self: Send + Sync,
{
	/// Presents `launch` to the end user and reports the outcome through `completion`.
	///
	/// Dropping `completion` without reporting resolves the pending credential with
	/// [`Error::LoginAborted`].
	fn launch(&self, launch: LoginLaunch, completion: CredentialCompletion);
}

/// Single-use handle that resolves a [`PendingCredential`].
#[derive(Debug)]
pub struct CredentialCompletion {
	credential_token: CredentialToken,
	sender: oneshot::Sender<Result<CredentialToken>>,
}
impl CredentialCompletion {
	/// Token the completion reports on success.
	pub fn credential_token(&self) -> &CredentialToken {
		&self.credential_token
	}

	/// Reports that the login finished and the credential is ready.
	pub fn succeed(self) {
		self.complete(Ok(()));
	}

	/// Reports that the launcher could not finish the login.
	pub fn fail(self, reason: impl Into<String>) {
		self.complete(Err(reason.into()));
	}

	/// Reports the outcome of the launch.
	pub fn complete(self, outcome: Result<(), String>) {
		let Self { credential_token, sender } = self;
		let result = match outcome {
			Ok(()) => Ok(credential_token),
			Err(reason) => Err(Error::Launch { reason }),
		};

		// The receiver is gone when the caller stopped waiting.
		let _ = sender.send(result);
	}
}

/// Future returned by [`Goalify::begin_login`](crate::flows::Goalify::begin_login).
///
/// Resolves exactly once: with the credential token after [`CredentialCompletion::succeed`],
/// with [`Error::Launch`] after [`CredentialCompletion::fail`], or with [`Error::LoginAborted`]
/// when the completion is dropped.
#[derive(Debug)]
pub struct PendingCredential {
	credential_token: CredentialToken,
	receiver: oneshot::Receiver<Result<CredentialToken>>,
}
impl PendingCredential {
	/// Token generated for this attempt.
	pub fn credential_token(&self) -> &CredentialToken {
		&self.credential_token
	}
}
impl Future for PendingCredential {
	type Output = Result<CredentialToken>;

	fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		Pin::new(&mut self.receiver).poll(cx).map(|received| match received {
			Ok(result) => result,
			Err(_) => Err(Error::LoginAborted),
		})
	}
}

/// Creates a linked completion handle and pending future for `credential_token`.
pub(crate) fn credential_channel(
	credential_token: CredentialToken,
) -> (CredentialCompletion, PendingCredential) {
	let (sender, receiver) = oneshot::channel();

	(
		CredentialCompletion { credential_token: credential_token.clone(), sender },
		PendingCredential { credential_token, receiver },
	)
}
