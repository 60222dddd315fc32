//! HTTP server and graceful shutdown.
//!
//! Once the shutdown future resolves (SIGTERM or Ctrl-C for
//! [`Server::serve`]) the listener is dropped and every open connection is
//! told to shut down gracefully: in-flight requests finish, idle keep-alive
//! and HTTP/2 connections close. `serve` returns when the last one has.
//!
//! A request may wait on several sequential upstream calls (a planet with
//! ten residents is twenty-one of them), so give the orchestrator a grace
//! period longer than the slowest of those chains.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http_body_util::Full;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::error::Error;
use crate::method::Method;
use crate::middleware;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::status::Status;

/// The HTTP server.
pub struct Server {
    addr: SocketAddr,
}

impl Server {
    pub fn bind(addr: SocketAddr) -> Self {
        Self { addr }
    }

    /// Serves `router` until SIGTERM or Ctrl-C, then drains.
    pub async fn serve<S: Send + Sync + 'static>(self, router: Router<S>) -> Result<(), Error> {
        self.serve_with_shutdown(router, shutdown_signal()).await
    }

    /// Serves `router` until `shutdown` resolves, then closes every accepted
    /// connection gracefully and waits for them to finish.
    pub async fn serve_with_shutdown<S, F>(self, router: Router<S>, shutdown: F) -> Result<(), Error>
    where
        S: Send + Sync + 'static,
        F: Future<Output = ()> + Send,
    {
        let listener = TcpListener::bind(self.addr).await?;
        let router = Arc::new(router);
        let builder = ConnBuilder::new(TokioExecutor::new());
        let graceful = GracefulShutdown::new();
        let mut connections = JoinSet::new();
        info!(addr = %self.addr, "holonet listening");

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                // shutdown wins over a backlog of pending accepts
                biased;

                () = &mut shutdown => break,

                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        debug!(%peer, "connection accepted");
                        let router = Arc::clone(&router);
                        let svc = service_fn(move |req| dispatch(Arc::clone(&router), req, peer));
                        // auto::Builder speaks HTTP/1.1 and HTTP/2, whichever the client negotiates
                        let conn = builder.serve_connection(TokioIo::new(stream), svc).into_owned();
                        let conn = graceful.watch(conn);
                        connections.spawn(async move {
                            if let Err(e) = conn.await {
                                error!(%peer, "connection error: {e}");
                            }
                        });
                    }
                    Err(e) => warn!("accept failed: {e}"),
                },

                Some(_) = connections.join_next(), if !connections.is_empty() => {}
            }
        }

        drop(listener);
        info!(open = connections.len(), "shutting down, draining connections");
        graceful.shutdown().await;
        while connections.join_next().await.is_some() {}
        info!("holonet stopped");
        Ok(())
    }
}

/// Routes one request from the wire and logs it.
///
/// Infallible: every failure is already a response by the time it gets here.
async fn dispatch<S: Send + Sync + 'static>(
    router: Arc<Router<S>>,
    req: hyper::Request<hyper::body::Incoming>,
    peer: SocketAddr,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, _body) = req.into_parts();

    let response = match Method::try_from(&parts.method) {
        Ok(method) => router.call(Request::from_parts(method, &parts)).await,
        Err(()) => Response::status(Status::MethodNotAllowed),
    };

    middleware::trace::access(
        parts.method.as_str(),
        parts.uri.path(),
        response.status_code(),
        started.elapsed(),
        peer,
    );
    Ok(response.into_inner())
}

/// Resolves on the first SIGTERM or SIGINT (Ctrl-C only, off Unix).
///
/// A handler that cannot be installed is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                error!("cannot listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = sigterm => {}
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    fn free_port() -> SocketAddr {
        let probe = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        probe.local_addr().unwrap()
    }

    async fn connect(addr: SocketAddr) -> TcpStream {
        loop {
            match TcpStream::connect(addr).await {
                Ok(stream) => return stream,
                Err(_) => tokio::time::sleep(Duration::from_millis(10)).await,
            }
        }
    }

    async fn ping(_req: Request, _state: Arc<()>) -> &'static str {
        "pong"
    }

    async fn raw_get(addr: SocketAddr, path: &str) -> String {
        let mut stream = connect(addr).await;
        let request = format!("GET {path} HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut reply = String::new();
        stream.read_to_string(&mut reply).await.unwrap();
        reply
    }

    #[tokio::test]
    async fn returns_once_shutdown_resolves() {
        let router: Router = Router::new();
        Server::bind(free_port()).serve_with_shutdown(router, async {}).await.unwrap();
    }

    #[tokio::test]
    async fn serves_routes_until_shutdown() {
        let addr = free_port();
        let router = Router::new().get("/ping", ping);
        let (stop, stopped) = oneshot::channel::<()>();
        let server = tokio::spawn(Server::bind(addr).serve_with_shutdown(router, async {
            let _ = stopped.await;
        }));

        let reply = raw_get(addr, "/ping").await;
        assert!(reply.starts_with("HTTP/1.1 200"), "{reply}");
        assert!(reply.ends_with("pong"), "{reply}");

        let reply = raw_get(addr, "/missing").await;
        assert!(reply.starts_with("HTTP/1.1 404"), "{reply}");

        stop.send(()).unwrap();
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn idle_keep_alive_connection_is_closed_on_shutdown() {
        let addr = free_port();
        let router = Router::new().get("/ping", ping);
        let (stop, stopped) = oneshot::channel::<()>();
        let server = tokio::spawn(Server::bind(addr).serve_with_shutdown(router, async {
            let _ = stopped.await;
        }));

        let mut stream = connect(addr).await;
        stream.write_all(b"GET /ping HTTP/1.1\r\nhost: localhost\r\n\r\n").await.unwrap();
        let mut reply = Vec::new();
        let mut chunk = [0_u8; 512];
        while !reply.ends_with(b"pong") {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before the reply was complete");
            reply.extend_from_slice(&chunk[..n]);
        }
        assert!(reply.starts_with(b"HTTP/1.1 200"));

        // the connection stays open and idle across shutdown
        stop.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .expect("server did not finish draining")
            .unwrap()
            .unwrap();

        let n = stream.read(&mut chunk).await.unwrap();
        assert_eq!(n, 0, "server should have closed the idle connection");
    }
}
