//! Integration tests driving a full session against a loopback server.
//!
//! Each test plays the server side of the wire protocol over a real TCP
//! stream and asserts on the table state and the notifications the
//! collaborator receives.

use std::{
    io::{Read, Write},
    net::{TcpListener, TcpStream},
    sync::{Arc, Mutex, mpsc},
    thread,
    time::Duration,
};

use holdem_client::{Session, SessionConfig, TableObserver};

const NOTICE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Eq, PartialEq)]
enum Notice {
    StateChanged,
    FatalDisconnect(String),
}

struct ChannelObserver {
    sender: Mutex<mpsc::Sender<Notice>>,
}

impl TableObserver for ChannelObserver {
    fn on_state_changed(&self) {
        let _ = self.sender.lock().unwrap().send(Notice::StateChanged);
    }

    fn on_fatal_disconnect(&self, reason: &str) {
        let _ = self
            .sender
            .lock()
            .unwrap()
            .send(Notice::FatalDisconnect(reason.to_string()));
    }
}

fn quick_config() -> SessionConfig {
    SessionConfig {
        read_timeout: Duration::from_millis(50),
        drain_grace: Duration::from_millis(50),
        ..SessionConfig::default()
    }
}

/// Connect a session to a fresh loopback listener and return the server
/// side of the stream once the name announcement has been read.
fn start_session(name: &str) -> (Session, TcpStream, mpsc::Receiver<Notice>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (sender, notices) = mpsc::channel();
    let observer = Arc::new(ChannelObserver {
        sender: Mutex::new(sender),
    });
    let session = Session::connect(name, &addr, observer, quick_config()).unwrap();
    let (mut server, _) = listener.accept().unwrap();
    server
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();
    assert_eq!(read_frame(&mut server), format!("00 {name}"));
    (session, server, notices)
}

fn read_frame(stream: &mut TcpStream) -> String {
    let mut frame = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        let n = stream.read(&mut byte).unwrap();
        assert_eq!(n, 1, "peer closed before frame end");
        if byte[0] == b'$' {
            break;
        }
        frame.push(byte[0]);
    }
    String::from_utf8(frame).unwrap()
}

#[test]
fn table_state_frame_updates_table() {
    let (session, mut server, notices) = start_session("Alice");
    server
        .write_all(
            b"01 ON:1 BL:5:10 PL:0:Alice:1000:0:1,1:Bob:1000:0:1 BT:0:0 PT:0 DL:0 AC:0 CM: NR:0$",
        )
        .unwrap();
    assert_eq!(
        notices.recv_timeout(NOTICE_TIMEOUT).unwrap(),
        Notice::StateChanged
    );

    {
        let table = session.table();
        let table = table.lock().unwrap();
        assert!(table.active);
        assert_eq!(table.small_blind, 5);
        assert_eq!(table.big_blind, 10);
        assert_eq!(table.seats[0].name, "Alice");
        assert_eq!(table.seats[1].name, "Bob");
        assert_eq!(table.my_seat, 0);
        assert_eq!(table.dealer, 0);
        assert_eq!(table.acting, 0);
        assert_eq!(table.community, [None; 5]);
        assert_eq!(table.pots, [0; 5]);
    }
    session.disconnect();
}

#[test]
fn frames_assemble_across_split_writes() {
    let (session, mut server, notices) = start_session("alice");
    server.write_all(b"02 hel").unwrap();
    server.flush().unwrap();
    thread::sleep(Duration::from_millis(20));
    server.write_all(b"lo$").unwrap();

    assert_eq!(
        notices.recv_timeout(NOTICE_TIMEOUT).unwrap(),
        Notice::StateChanged
    );
    {
        let table = session.table();
        let table = table.lock().unwrap();
        assert_eq!(table.chat.front().map(String::as_str), Some("hello"));
    }
    session.disconnect();
}

#[test]
fn name_correction_is_not_a_visible_event() {
    let (session, mut server, notices) = start_session("alice");
    // The rename must be applied silently; only the chat line that follows
    // may surface as a notification.
    server.write_all(b"03 alice2$02 hi$").unwrap();

    assert_eq!(
        notices.recv_timeout(NOTICE_TIMEOUT).unwrap(),
        Notice::StateChanged
    );
    assert!(notices.try_recv().is_err());
    {
        let table = session.table();
        let table = table.lock().unwrap();
        assert_eq!(table.my_name, "alice2");
        assert_eq!(table.chat.front().map(String::as_str), Some("hi"));
    }
    session.disconnect();
}

#[test]
fn announcement_sets_the_display_hold() {
    let (session, mut server, notices) = start_session("alice");
    server.write_all(b"04 0:0233$05 bob wins 100 chips$").unwrap();

    assert_eq!(
        notices.recv_timeout(NOTICE_TIMEOUT).unwrap(),
        Notice::StateChanged
    );
    assert_eq!(
        notices.recv_timeout(NOTICE_TIMEOUT).unwrap(),
        Notice::StateChanged
    );
    {
        let table = session.table();
        let mut table = table.lock().unwrap();
        // The hold reads set exactly once, then clears.
        assert!(table.take_winner_announcement());
        assert!(!table.take_winner_announcement());
    }
    session.disconnect();
}

#[test]
fn server_ordered_disconnect_is_fatal() {
    let (_session, mut server, notices) = start_session("alice");
    server.write_all(b"-1$").unwrap();

    match notices.recv_timeout(NOTICE_TIMEOUT).unwrap() {
        Notice::FatalDisconnect(reason) => {
            assert!(reason.contains("disconnected by the server"), "{reason}");
        }
        other => panic!("expected a fatal disconnect, got {other:?}"),
    }
}

#[test]
fn malformed_frame_is_fatal() {
    let (_session, mut server, notices) = start_session("alice");
    server.write_all(b"0$").unwrap();

    match notices.recv_timeout(NOTICE_TIMEOUT).unwrap() {
        Notice::FatalDisconnect(reason) => {
            assert!(reason.contains("protocol violation"), "{reason}");
        }
        other => panic!("expected a fatal disconnect, got {other:?}"),
    }
}

#[test]
fn peer_close_is_fatal() {
    let (_session, server, notices) = start_session("alice");
    drop(server);

    assert!(matches!(
        notices.recv_timeout(NOTICE_TIMEOUT).unwrap(),
        Notice::FatalDisconnect(_)
    ));
}

#[test]
fn graceful_disconnect_sends_the_notice_and_stays_quiet() {
    let (mut session, mut server, notices) = start_session("alice");
    session.chat("goodbye");
    assert_eq!(read_frame(&mut server), "04 goodbye");

    session.disconnect();
    assert_eq!(read_frame(&mut server), "-1");
    // Teardown must never surface as a fatal event.
    assert!(notices.try_recv().is_err());
}

#[test]
fn outbound_helpers_use_the_wire_table() {
    let (mut session, mut server, _notices) = start_session("alice");
    session.start_game();
    session.set_blinds(5, 10);
    session.act(holdem_client::PlayerAction::Bet(120));
    session.adjust_stack(1, -15);
    session.request_state();

    assert_eq!(read_frame(&mut server), "01");
    assert_eq!(read_frame(&mut server), "02 5:10");
    assert_eq!(read_frame(&mut server), "03 5 120");
    assert_eq!(read_frame(&mut server), "05 1 -15");
    assert_eq!(read_frame(&mut server), "06");
    session.disconnect();
}
