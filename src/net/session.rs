//! The table session: a persistent connection plus its receive loop.
//!
//! A session owns the TCP stream and a single long-lived receive thread.
//! That thread is the only writer of the [`Table`]; everything else reads
//! it through the shared mutex. Frame dispatch and the state-changed
//! notification complete before the next read begins, so notifications
//! arrive in strict frame order. The ordering is load-bearing: the
//! winner-announcement hold depends on it.

use anyhow::{Error, bail};
use log::{debug, error, warn};
use std::{
    io::{self, ErrorKind, Read, Write},
    net::{Shutdown, SocketAddr, TcpStream},
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use super::{
    codec::{self, FrameAssembler},
    errors::SessionError,
    protocol::{ActionKind, PlayerAction},
};
use crate::game::{
    entities::{Chips, SeatIndex, Table},
    reconcile::{self, Applied},
};

/// Default timeout for reading from the server. Doubles as the poll
/// interval for the stop signal.
pub const READ_TIMEOUT: Duration = Duration::from_millis(250);

/// Default timeout for writing to the server.
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(1);

/// Default grace period given to an in-flight dispatch during disconnect.
pub const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Session tunables.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    /// How long [`Session::disconnect`] waits for the receive thread to
    /// finish its current frame before closing the socket.
    pub drain_grace: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            read_timeout: READ_TIMEOUT,
            write_timeout: WRITE_TIMEOUT,
            drain_grace: DRAIN_GRACE,
        }
    }
}

/// The external collaborator notified by the session, replacing a UI layer.
///
/// Callbacks run on the session's receive thread, one at a time, in frame
/// order.
pub trait TableObserver: Send + Sync {
    /// A frame warranting a refresh has been applied to the table.
    fn on_state_changed(&self);

    /// The session has ended; no further callbacks will arrive.
    fn on_fatal_disconnect(&self, reason: &str);
}

/// A live connection to a table server.
///
/// Sends are fire-and-forget: a failed send is logged and dropped with no
/// retry and no backpressure signal.
pub struct Session {
    table: Arc<Mutex<Table>>,
    stream: TcpStream,
    stop: Arc<AtomicBool>,
    receiver: Option<JoinHandle<()>>,
    config: SessionConfig,
}

impl Session {
    /// Connect to a table server under `name` and start the receive loop.
    ///
    /// Connection attempts back off over three tries with decreasing
    /// timeouts (1s, 500ms, 100ms).
    ///
    /// # Errors
    ///
    /// Returns an error if no attempt connects or if announcing the chosen
    /// name fails.
    pub fn connect(
        name: &str,
        addr: &SocketAddr,
        observer: Arc<dyn TableObserver>,
        config: SessionConfig,
    ) -> Result<Self, Error> {
        let mut connect_timeouts = vec![
            Duration::from_secs(1),
            Duration::from_millis(500),
            Duration::from_millis(100),
        ];
        while let Some(connect_timeout) = connect_timeouts.pop() {
            match TcpStream::connect_timeout(addr, connect_timeout) {
                Ok(mut stream) => {
                    stream.set_read_timeout(Some(config.read_timeout))?;
                    stream.set_write_timeout(Some(config.write_timeout))?;
                    stream.write_all(&codec::encode(ActionKind::Connected, name)?)?;
                    let table = Arc::new(Mutex::new(Table::new(name)));
                    let stop = Arc::new(AtomicBool::new(false));
                    let receiver = spawn_receiver(
                        stream.try_clone()?,
                        Arc::clone(&table),
                        Arc::clone(&stop),
                        observer,
                    );
                    return Ok(Self {
                        table,
                        stream,
                        stop,
                        receiver: Some(receiver),
                        config,
                    });
                }
                _ => thread::sleep(connect_timeout),
            }
        }
        bail!("couldn't connect to {addr} as {name}")
    }

    /// Shared handle to the table state for reads.
    pub fn table(&self) -> Arc<Mutex<Table>> {
        Arc::clone(&self.table)
    }

    /// Send an outbound frame. Failures are logged and dropped; the
    /// protocol offers no retry or backpressure.
    pub fn send(&mut self, action: ActionKind, payload: &str) {
        match codec::encode(action, payload) {
            Ok(bytes) => {
                if let Err(error) = self.stream.write_all(&bytes) {
                    warn!("dropping {action} send: {error}");
                }
            }
            Err(error) => warn!("refusing to send {action}: {error}"),
        }
    }

    /// Ask the server to start a new hand.
    pub fn start_game(&mut self) {
        self.send(ActionKind::Start, "");
    }

    /// Set the table blinds.
    pub fn set_blinds(&mut self, small: Chips, big: Chips) {
        self.send(ActionKind::SetBlinds, &format!("{small}:{big}"));
    }

    /// Take an in-hand betting action.
    pub fn act(&mut self, action: PlayerAction) {
        self.send(ActionKind::Action, &action.wire_payload());
    }

    /// Send a chat line.
    pub fn chat(&mut self, text: &str) {
        self.send(ActionKind::Chat, text);
    }

    /// Adjust a seat's stack by a signed amount.
    pub fn adjust_stack(&mut self, seat: SeatIndex, delta: i64) {
        self.send(ActionKind::Stack, &format!("{seat} {delta}"));
    }

    /// Ask the server to resend the full table state.
    pub fn request_state(&mut self) {
        self.send(ActionKind::RequestState, "");
    }

    /// Disconnect in two phases: signal the receive thread to stop after
    /// its current frame, wait the drain grace, then best-effort send the
    /// disconnect notice and close the socket.
    ///
    /// Never fails observably; every teardown error is swallowed.
    pub fn disconnect(mut self) {
        self.stop.store(true, Ordering::Release);
        thread::sleep(self.config.drain_grace);
        self.send(ActionKind::Disconnect, "");
        if let Err(error) = self.stream.shutdown(Shutdown::Both) {
            debug!("socket shutdown during disconnect: {error}");
        }
        if let Some(receiver) = self.receiver.take()
            && receiver.join().is_err()
        {
            debug!("receive thread panicked during disconnect");
        }
    }
}

fn spawn_receiver(
    stream: TcpStream,
    table: Arc<Mutex<Table>>,
    stop: Arc<AtomicBool>,
    observer: Arc<dyn TableObserver>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        if let Err(error) = receive_loop(stream, &table, &stop, observer.as_ref()) {
            // A requested stop tears the stream down underneath the loop;
            // only an unrequested end is fatal.
            if !stop.load(Ordering::Acquire) {
                stop.store(true, Ordering::Release);
                error!("session ended: {error}");
                observer.on_fatal_disconnect(&error.to_string());
            }
        }
    })
}

fn receive_loop(
    mut stream: TcpStream,
    table: &Mutex<Table>,
    stop: &AtomicBool,
    observer: &dyn TableObserver,
) -> Result<(), SessionError> {
    let mut assembler = FrameAssembler::new();
    let mut buf = [0u8; 1024];
    while !stop.load(Ordering::Acquire) {
        let n = match stream.read(&mut buf) {
            Ok(0) => return Err(io::Error::from(ErrorKind::UnexpectedEof).into()),
            Ok(n) => n,
            // A read timeout is just a poll point for the stop signal.
            Err(error) if matches!(error.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                continue;
            }
            Err(error) => return Err(error.into()),
        };
        assembler.extend(&buf[..n]);
        while let Some(frame) = assembler.next_frame()? {
            debug!("frame received: {} {:?}", frame.code, frame.command);
            let applied = reconcile::apply_frame(&mut lock_table(table), &frame)?;
            match applied {
                Applied::Refresh => observer.on_state_changed(),
                Applied::Silent => {}
                Applied::Disconnect => return Err(SessionError::ServerDisconnect),
            }
        }
    }
    Ok(())
}

// A poisoned table just means a reader panicked mid-lock; the state itself
// is still consistent because only this thread writes it.
fn lock_table(table: &Mutex<Table>) -> MutexGuard<'_, Table> {
    match table.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
