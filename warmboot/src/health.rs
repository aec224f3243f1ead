//! Container health probe.
//!
//! One GET against the service's health endpoint, bounded by a hard
//! timeout. The outcome is a binary verdict mapped to a process exit code;
//! no error ever escapes. Retries are the orchestrator's job.

use std::fmt;
use std::time::Duration;

use http_body_util::Empty;
use hyper::body::Bytes;
use hyper::header::ACCEPT;
use hyper::{Request, StatusCode, Uri};
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::options::ProbeOptions;

/// Why a probe judged the service unhealthy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    /// Service answered with a status other than 200.
    Status(u16),
    /// No response head within the configured bound.
    Timeout,
    /// Connection refused, DNS failure, bad URL, or any other request error.
    Transport(String),
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeFailure::Status(code) => write!(f, "unexpected status {}", code),
            ProbeFailure::Timeout => write!(f, "timed out"),
            ProbeFailure::Transport(msg) => write!(f, "request failed: {}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeVerdict {
    Healthy,
    Unhealthy(ProbeFailure),
}

impl ProbeVerdict {
    pub fn is_healthy(&self) -> bool {
        matches!(self, ProbeVerdict::Healthy)
    }

    /// 0 when healthy, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            ProbeVerdict::Healthy => 0,
            ProbeVerdict::Unhealthy(_) => 1,
        }
    }
}

/// Probe `url` once, waiting at most `timeout` for the response head.
pub async fn probe(url: &str, timeout: Duration) -> ProbeVerdict {
    let verdict = match request(url, timeout).await {
        Ok(()) => ProbeVerdict::Healthy,
        Err(failure) => ProbeVerdict::Unhealthy(failure),
    };

    match &verdict {
        ProbeVerdict::Healthy => tracing::debug!(url = %url, "Service healthy"),
        ProbeVerdict::Unhealthy(failure) => {
            tracing::warn!(
                url = %url,
                timeout_ms = timeout.as_millis() as u64,
                reason = %failure,
                "Service unhealthy"
            )
        }
    }

    verdict
}

async fn request(url: &str, timeout: Duration) -> Result<(), ProbeFailure> {
    let uri: Uri = url
        .parse()
        .map_err(|e| ProbeFailure::Transport(format!("invalid url {}: {}", url, e)))?;

    let req = Request::get(uri)
        .header(ACCEPT, "application/json")
        .body(Empty::<Bytes>::new())
        .map_err(|e| ProbeFailure::Transport(e.to_string()))?;

    let client: Client<_, Empty<Bytes>> = Client::builder(TokioExecutor::new()).build_http();

    let response = tokio::time::timeout(timeout, client.request(req))
        .await
        .map_err(|_| ProbeFailure::Timeout)?
        .map_err(|e| ProbeFailure::Transport(e.to_string()))?;

    let status = response.status();
    if status == StatusCode::OK {
        Ok(())
    } else {
        Err(ProbeFailure::Status(status.as_u16()))
    }
}

/// Blocking wrapper: runs [`probe`] on a throw-away current-thread runtime.
pub fn probe_blocking(options: &ProbeOptions) -> ProbeVerdict {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start probe runtime");
            return ProbeVerdict::Unhealthy(ProbeFailure::Transport(e.to_string()));
        }
    };

    let verdict = runtime.block_on(probe(&options.url(), options.timeout));

    // A timed-out DNS lookup may still occupy a blocking thread
    runtime.shutdown_timeout(Duration::from_millis(100));
    verdict
}
