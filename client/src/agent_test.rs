use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use canvas::{Color, Shape};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::time::timeout;

use super::*;

const WAIT: Duration = Duration::from_secs(5);

async fn listener() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    (listener, addr)
}

fn counter() -> (Arc<AtomicUsize>, impl Redraw) {
    let count = Arc::new(AtomicUsize::new(0));
    let hook = Arc::clone(&count);
    (count, move || {
        hook.fetch_add(1, Ordering::SeqCst);
    })
}

async fn until(mut check: impl FnMut() -> bool) {
    timeout(WAIT, async {
        while !check() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn connect_failure_is_reported() {
    let (listener, addr) = listener().await;
    drop(listener);
    let err = ClientAgent::connect(&addr, SharedSketch::new(), || {}).await.err().unwrap();
    assert!(matches!(err, ClientError::Connect { .. }), "{err}");
}

#[tokio::test]
async fn applies_server_lines_and_skips_garbage() {
    let (listener, addr) = listener().await;
    let (redraws, redraw) = counter();
    let sketch = SharedSketch::new();
    let agent = ClientAgent::connect(&addr, sketch.clone(), redraw).await.unwrap();

    let (mut server, _) = listener.accept().await.unwrap();
    server
        .write_all(b"draw rectangle 0 0 10 10 -16777216\nbogus 1\nmove 0 5 5\ndelete 9\n")
        .await
        .unwrap();

    until(|| redraws.load(Ordering::SeqCst) == 3).await;
    assert_eq!(sketch.snapshot(), vec![(0, Shape::rectangle(5, 5, 15, 15, Color::BLACK))]);
    assert_eq!(*agent.status().borrow(), ConnectionStatus::Connected);
}

#[tokio::test]
async fn non_utf8_line_is_skipped_and_listener_keeps_reading() {
    let (listener, addr) = listener().await;
    let (redraws, redraw) = counter();
    let sketch = SharedSketch::new();
    let agent = ClientAgent::connect(&addr, sketch.clone(), redraw).await.unwrap();

    let (mut server, _) = listener.accept().await.unwrap();
    server
        .write_all(b"draw ellipse 1 1 \xff\xfe 2 -16777216\ndraw segment 0 0 5 5 -16777216\n")
        .await
        .unwrap();

    until(|| redraws.load(Ordering::SeqCst) == 1).await;
    assert_eq!(sketch.snapshot(), vec![(0, Shape::segment(0, 0, 5, 5, Color::BLACK))]);
    assert!(!agent.is_hung_up());
}

#[tokio::test]
async fn send_writes_newline_terminated_lines() {
    let (listener, addr) = listener().await;
    let agent = ClientAgent::connect(&addr, SharedSketch::new(), || {}).await.unwrap();
    let (server, _) = listener.accept().await.unwrap();
    let mut lines = BufReader::new(server).lines();

    agent.send(&Command::Delete { id: 3 }).unwrap();
    agent.send_line("move 1 2 3").unwrap();

    let first = timeout(WAIT, lines.next_line()).await.unwrap().unwrap();
    let second = timeout(WAIT, lines.next_line()).await.unwrap().unwrap();
    assert_eq!(first.as_deref(), Some("delete 3"));
    assert_eq!(second.as_deref(), Some("move 1 2 3"));
}

#[tokio::test]
async fn hang_up_is_observed_and_sends_fail() {
    let (listener, addr) = listener().await;
    let agent = ClientAgent::connect(&addr, SharedSketch::new(), || {}).await.unwrap();
    let (server, _) = listener.accept().await.unwrap();
    drop(server);

    timeout(WAIT, agent.wait_closed()).await.unwrap();
    assert!(agent.is_hung_up());
    assert!(matches!(agent.send_line("delete 0"), Err(ClientError::Closed)));
}

#[tokio::test]
async fn dropping_agent_closes_connection() {
    let (listener, addr) = listener().await;
    let agent = ClientAgent::connect(&addr, SharedSketch::new(), || {}).await.unwrap();
    let (server, _) = listener.accept().await.unwrap();
    let mut lines = BufReader::new(server).lines();

    drop(agent);
    let eof = timeout(WAIT, lines.next_line()).await.unwrap().unwrap();
    assert_eq!(eof, None);
}

#[tokio::test]
async fn close_flushes_queued_lines() {
    let (listener, addr) = listener().await;
    let agent = ClientAgent::connect(&addr, SharedSketch::new(), || {}).await.unwrap();
    let (server, _) = listener.accept().await.unwrap();
    let mut lines = BufReader::new(server).lines();

    for id in 0..3 {
        agent.send(&Command::Delete { id }).unwrap();
    }
    agent.close().await;

    let mut got = Vec::new();
    while let Some(line) = timeout(WAIT, lines.next_line()).await.unwrap().unwrap() {
        got.push(line);
    }
    assert_eq!(got, vec!["delete 0", "delete 1", "delete 2"]);
}
