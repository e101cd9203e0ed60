use crate::classifier::RawAttempt;
use async_trait::async_trait;
use log::debug;
use ssh2::{ErrorCode, Session};
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;
use tokio::time::timeout;

/// One authentication try against one address.
///
/// Implementations must not retry internally; the attack loop owns
/// retry and abort decisions.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn attempt_login(
        &self,
        target: SocketAddr,
        username: &str,
        password: &str,
        timeout: Duration,
    ) -> RawAttempt;

    fn service_name(&self) -> &'static str;
}

/// Password authentication over SSH using libssh2.
#[derive(Debug, Default, Clone, Copy)]
pub struct SshAuthenticator;

fn session_code(err: &ssh2::Error) -> i32 {
    match err.code() {
        ErrorCode::Session(code) => code,
        ErrorCode::SFTP(code) => code,
    }
}

fn login_blocking(target: SocketAddr, username: &str, password: &str, limit: Duration) -> RawAttempt {
    let tcp = match TcpStream::connect_timeout(&target, limit) {
        Ok(tcp) => tcp,
        Err(e) if e.kind() == std::io::ErrorKind::TimedOut => return RawAttempt::TimedOut,
        Err(e) => return RawAttempt::ConnectFailed(e.kind(), e.to_string()),
    };

    let mut session = match Session::new() {
        Ok(session) => session,
        Err(e) => return RawAttempt::HandshakeFailed(session_code(&e), e.to_string()),
    };
    session.set_timeout(limit.as_millis().min(u32::MAX as u128) as u32);
    session.set_tcp_stream(tcp);

    if let Err(e) = session.handshake() {
        return RawAttempt::HandshakeFailed(session_code(&e), e.to_string());
    }

    match session.userauth_password(username, password) {
        Ok(()) if session.authenticated() => {
            let _ = session.disconnect(None, "", None);
            RawAttempt::Authenticated
        }
        Ok(()) => RawAttempt::Denied,
        Err(e) => RawAttempt::AuthError(session_code(&e), e.to_string()),
    }
}

#[async_trait]
impl Authenticator for SshAuthenticator {
    async fn attempt_login(
        &self,
        target: SocketAddr,
        username: &str,
        password: &str,
        limit: Duration,
    ) -> RawAttempt {
        let username = username.to_string();
        let password = password.to_string();

        let task = tokio::task::spawn_blocking(move || login_blocking(target, &username, &password, limit));

        // The blocking task gets its own socket timeouts; this outer bound
        // covers the connect, the handshake and the auth exchange together.
        match timeout(limit * 3, task).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => {
                debug!("SSH attempt task against {} failed: {}", target, e);
                RawAttempt::HandshakeFailed(0, format!("attempt task failed: {}", e))
            }
            Err(_) => RawAttempt::TimedOut,
        }
    }

    fn service_name(&self) -> &'static str {
        "ssh"
    }
}
