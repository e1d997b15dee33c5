// src/server/livereload.rs

//! Live-reload channel for connected browser clients.
//!
//! Clients connect over a plain WebSocket and receive text frames:
//! `"reload"` for a full page reload and `"refresh-styles"` for an in-place
//! style-sheet refresh. The channel is append-only notification; broken
//! clients are pruned on the next broadcast.

use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tracing::{debug, warn};
use tungstenite::WebSocket;

/// Keep at most this many connections; the oldest beyond it are closed.
const MAX_CLIENTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Reload,
    RefreshStyles,
}

impl Signal {
    fn frame(self) -> &'static str {
        match self {
            Signal::Reload => "reload",
            Signal::RefreshStyles => "refresh-styles",
        }
    }
}

/// Cloneable handle to the live-reload channel. Sends are fire-and-forget;
/// with no connected clients a broadcast is a no-op.
#[derive(Debug, Clone)]
pub struct LiveReload {
    tx: Sender<Signal>,
}

impl LiveReload {
    /// Build a detached handle plus the receiving end of its channel.
    /// [`start_livereload`] wires the receiver to the broadcast thread;
    /// callers that only want to observe signals can keep it instead.
    pub fn channel() -> (LiveReload, std::sync::mpsc::Receiver<Signal>) {
        let (tx, rx) = std::sync::mpsc::channel();
        (LiveReload { tx }, rx)
    }

    /// Signal a full page reload.
    pub fn reload(&self) {
        let _ = self.tx.send(Signal::Reload);
    }

    /// Signal an in-place style refresh.
    pub fn stream(&self) {
        let _ = self.tx.send(Signal::RefreshStyles);
    }
}

/// Bind the WebSocket listener (preferred port, falling back to an
/// ephemeral one) and spawn the accept and broadcast threads. Returns the
/// channel handle and the bound port.
pub fn start_livereload(preferred_port: u16) -> Result<(LiveReload, u16)> {
    let listener = match TcpListener::bind(("127.0.0.1", preferred_port)) {
        Ok(sock) => sock,
        Err(_) => TcpListener::bind("127.0.0.1:0")
            .context("binding live-reload WebSocket listener")?,
    };
    let port = listener
        .local_addr()
        .context("reading live-reload listener address")?
        .port();

    let clients: Arc<Mutex<Vec<WebSocket<TcpStream>>>> = Arc::new(Mutex::new(Vec::new()));

    spawn_accept_thread(listener, clients.clone());
    let (handle, rx) = LiveReload::channel();
    spawn_broadcast_thread(clients, rx);

    debug!(port, "live-reload channel listening");
    Ok((handle, port))
}

fn spawn_accept_thread(listener: TcpListener, clients: Arc<Mutex<Vec<WebSocket<TcpStream>>>>) {
    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(err) => {
                    warn!("live-reload accept failed: {err}");
                    continue;
                }
            };
            match tungstenite::accept(stream) {
                Ok(socket) => clients.lock().unwrap().push(socket),
                Err(err) => warn!("live-reload handshake failed: {err}"),
            }
        }
    });
}

fn spawn_broadcast_thread(
    clients: Arc<Mutex<Vec<WebSocket<TcpStream>>>>,
    rx: std::sync::mpsc::Receiver<Signal>,
) {
    std::thread::spawn(move || {
        while let Ok(signal) = rx.recv() {
            let mut clients = clients.lock().unwrap();
            broadcast_frame(&mut clients, signal);

            let len = clients.len();
            if len > MAX_CLIENTS {
                for mut socket in clients.drain(0..len - MAX_CLIENTS) {
                    socket.close(None).ok();
                }
            }
        }
    });
}

/// Send one frame to every connected client. Any send error drops the
/// client from the list, so a browser that went away stops costing a
/// failed write on every later broadcast.
fn broadcast_frame<S: std::io::Read + std::io::Write>(
    clients: &mut Vec<WebSocket<S>>,
    signal: Signal,
) {
    clients.retain_mut(|socket| match socket.send(signal.frame().into()) {
        Ok(()) => true,
        Err(err) => {
            warn!("live-reload send failed, dropping client: {err}");
            false
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Read, Write};
    use tungstenite::protocol::Role;

    enum TestStream {
        Dead,
        Live(Vec<u8>),
    }

    impl Read for TestStream {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::WouldBlock))
        }
    }

    impl Write for TestStream {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            match self {
                TestStream::Dead => Err(io::Error::from(io::ErrorKind::ConnectionReset)),
                TestStream::Live(sink) => {
                    sink.extend_from_slice(buf);
                    Ok(buf.len())
                }
            }
        }

        fn flush(&mut self) -> io::Result<()> {
            match self {
                TestStream::Dead => Err(io::Error::from(io::ErrorKind::ConnectionReset)),
                TestStream::Live(_) => Ok(()),
            }
        }
    }

    fn socket(stream: TestStream) -> WebSocket<TestStream> {
        WebSocket::from_raw_socket(stream, Role::Server, None)
    }

    #[test]
    fn dead_clients_are_dropped_on_broadcast() {
        let mut clients = vec![
            socket(TestStream::Dead),
            socket(TestStream::Live(Vec::new())),
        ];

        broadcast_frame(&mut clients, Signal::Reload);
        assert_eq!(clients.len(), 1);

        // The surviving client still receives later broadcasts.
        broadcast_frame(&mut clients, Signal::RefreshStyles);
        assert_eq!(clients.len(), 1);
        match clients[0].get_ref() {
            TestStream::Live(sink) => {
                let text = String::from_utf8_lossy(sink);
                assert!(text.contains("reload"));
                assert!(text.contains("refresh-styles"));
            }
            TestStream::Dead => panic!("wrong client survived"),
        }
    }
}
