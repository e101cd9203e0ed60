use std::fmt;
use std::io;

// libssh2 error codes the classifier cares about.
pub const LIBSSH2_ERROR_SOCKET_SEND: i32 = -7;
pub const LIBSSH2_ERROR_SOCKET_DISCONNECT: i32 = -13;
pub const LIBSSH2_ERROR_PASSWORD_EXPIRED: i32 = -15;
pub const LIBSSH2_ERROR_AUTHENTICATION_FAILED: i32 = -18;
pub const LIBSSH2_ERROR_PUBLICKEY_UNVERIFIED: i32 = -19;
pub const LIBSSH2_ERROR_TIMEOUT: i32 = -9;
pub const LIBSSH2_ERROR_SOCKET_TIMEOUT: i32 = -30;
pub const LIBSSH2_ERROR_SOCKET_RECV: i32 = -43;

/// What the transport observed during a single login attempt, before any
/// policy is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawAttempt {
    /// The server accepted the credentials.
    Authenticated,
    /// Authentication completed without error but the session is not authenticated.
    Denied,
    ConnectFailed(io::ErrorKind, String),
    /// libssh2 error code and message from the handshake.
    HandshakeFailed(i32, String),
    /// libssh2 error code and message from `userauth_password`.
    AuthError(i32, String),
    TimedOut,
}

/// The typed result of one attempt, as seen by the attack loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    AuthRejected,
    Unreachable(String),
    ProtocolError(String),
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptOutcome::Success => write!(f, "success"),
            AttemptOutcome::AuthRejected => write!(f, "rejected"),
            AttemptOutcome::Unreachable(reason) => write!(f, "unreachable: {}", reason),
            AttemptOutcome::ProtocolError(reason) => write!(f, "protocol error: {}", reason),
        }
    }
}

pub trait AttemptClassifier: Send + Sync {
    fn classify(&self, raw: RawAttempt) -> AttemptOutcome;
}

/// Classifier for attempts made with [`crate::transport::SshAuthenticator`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SshClassifier;

impl SshClassifier {
    fn is_socket_error(code: i32) -> bool {
        matches!(
            code,
            LIBSSH2_ERROR_SOCKET_SEND
                | LIBSSH2_ERROR_SOCKET_DISCONNECT
                | LIBSSH2_ERROR_TIMEOUT
                | LIBSSH2_ERROR_SOCKET_TIMEOUT
                | LIBSSH2_ERROR_SOCKET_RECV
        )
    }

    fn is_credential_error(code: i32) -> bool {
        matches!(
            code,
            LIBSSH2_ERROR_AUTHENTICATION_FAILED
                | LIBSSH2_ERROR_PUBLICKEY_UNVERIFIED
        )
    }
}

impl AttemptClassifier for SshClassifier {
    fn classify(&self, raw: RawAttempt) -> AttemptOutcome {
        match raw {
            RawAttempt::Authenticated => AttemptOutcome::Success,
            RawAttempt::Denied => AttemptOutcome::AuthRejected,
            RawAttempt::ConnectFailed(kind, msg) => {
                AttemptOutcome::Unreachable(format!("connection failed ({:?}): {}", kind, msg))
            }
            RawAttempt::TimedOut => AttemptOutcome::Unreachable("attempt timed out".to_string()),
            RawAttempt::HandshakeFailed(code, msg) if Self::is_socket_error(code) => {
                AttemptOutcome::Unreachable(format!("connection lost during handshake: {}", msg))
            }
            RawAttempt::HandshakeFailed(_, msg) => {
                AttemptOutcome::ProtocolError(format!("handshake failed: {}", msg))
            }
            // The server only reports expiry after accepting the password.
            RawAttempt::AuthError(LIBSSH2_ERROR_PASSWORD_EXPIRED, _) => AttemptOutcome::Success,
            RawAttempt::AuthError(code, _) if Self::is_credential_error(code) => {
                AttemptOutcome::AuthRejected
            }
            RawAttempt::AuthError(code, msg) if Self::is_socket_error(code) => {
                AttemptOutcome::Unreachable(format!("connection lost during authentication: {}", msg))
            }
            RawAttempt::AuthError(code, msg) => {
                AttemptOutcome::ProtocolError(format!("authentication error {}: {}", code, msg))
            }
        }
    }
}
