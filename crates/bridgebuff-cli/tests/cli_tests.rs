//! End-to-end tests for the bridgebuff binary.
//!
//! A small score server runs on a loopback socket in a background thread and
//! the real binary is pointed at it.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::process::{Command, Output};
use std::thread::{self, JoinHandle};

fn games() -> Vec<(u64, &'static str, u32, u32, &'static str)> {
    // (id, auth, sunk, escaped, cannons)
    vec![
        (1, "A", 2, 3, "[[1,0],[2,0],[3,1]]"),
        (2, "A", 4, 1, "[[1,0],[1,1],[1,2],[1,3],[1,4]]"),
        (3, "B", 5, 5, "[[1,0],[2,0],[3,1]]"),
        (4, "A", 0, 2, "[[4,4],[3,3],[2,2],[1,1],[5,0]]"),
    ]
}

fn respond(target: &str) -> String {
    let body = if let Some(rest) = target.strip_prefix("/api/rank/") {
        let (ranking, query) = rest.split_once('?').unwrap_or((rest, ""));
        let start: usize = query
            .split('&')
            .find_map(|pair| pair.strip_prefix("start="))
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let ids: Vec<String> = if start == 0 {
            games().iter().map(|g| g.0.to_string()).collect()
        } else {
            Vec::new()
        };
        format!(
            r#"{{"ranking":"{}","limit":50,"start":{},"games":[{}],"prev":null,"next":null}}"#,
            ranking,
            start,
            ids.join(",")
        )
    } else if let Some(id) = target.strip_prefix("/api/game/") {
        let id: u64 = id.parse().unwrap_or(0);
        match games().into_iter().find(|g| g.0 == id) {
            Some((id, auth, sunk, escaped, cannons)) => format!(
                r#"{{"id":{},"game_stats":{{"auth":"{}","sunk_ships":{},"escaped_ships":{},"cannons":{}}}}}"#,
                id, auth, sunk, escaped, cannons
            ),
            None => r#"{"detail":"Not Found"}"#.to_string(),
        }
    } else {
        r#"{"detail":"Not Found"}"#.to_string()
    };

    format!(
        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\r\n{}",
        body.len(),
        body
    )
}

fn serve(mut stream: TcpStream) {
    let mut pending = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        let n = match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        pending.extend_from_slice(&buf[..n]);

        while let Some(end) = pending.windows(4).position(|w| w == b"\r\n\r\n") {
            let request: Vec<u8> = pending.drain(..end + 4).collect();
            let request = String::from_utf8_lossy(&request).into_owned();
            let target = request
                .split_whitespace()
                .nth(1)
                .unwrap_or_default()
                .to_string();
            if stream.write_all(respond(&target).as_bytes()).is_err() {
                return;
            }
        }
    }
}

fn start_server() -> (u16, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = thread::spawn(move || {
        if let Ok((stream, _)) = listener.accept() {
            serve(stream);
        }
    });
    (port, handle)
}

fn run_bridgebuff(port: u16, analysis: &str, output: &Path, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bridgebuff"))
        .arg("127.0.0.1")
        .arg(port.to_string())
        .arg(analysis)
        .arg(output)
        .args(["--timeout-ms", "50", "--quiet"])
        .args(extra)
        .env_remove("BRIDGEBUFF_CONFIG")
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

#[test]
fn test_gas_performance_csv() {
    let (port, server) = start_server();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("gas.csv");

    let result = run_bridgebuff(port, "1", &output, &[]);
    assert!(result.status.success(), "{:?}", result);
    server.join().unwrap();

    let csv = std::fs::read_to_string(&output).unwrap();
    assert_eq!(csv, "gas,games,average_sunk\nA,3,2\nB,1,5\n");
}

#[test]
fn test_cannon_placement_json() {
    let (port, server) = start_server();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("nested").join("placement.json");

    let result = run_bridgebuff(port, "placement", &output, &[]);
    assert!(result.status.success(), "{:?}", result);
    server.join().unwrap();

    let json = std::fs::read_to_string(&output).unwrap();
    assert!(json.contains(r#""analysis": "cannon_placement""#));
    // "05000000" (escaped 1 and 2) averages 1.5 and sorts before "31100000" (3 and 5)
    let spread = json.find("05000000").unwrap();
    let clustered = json.find("31100000").unwrap();
    assert!(spread < clustered);
    assert!(json.contains("1.5"));
}

#[test]
fn test_connection_refused_fails() {
    // Bind then drop to get a port with nothing listening
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let dir = tempfile::tempdir().unwrap();

    let result = run_bridgebuff(port, "gas", &dir.path().join("out.csv"), &[]);
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("Failed to connect"));
}

#[test]
fn test_unknown_analysis_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let result = run_bridgebuff(1, "3", &dir.path().join("out.csv"), &[]);
    assert!(!result.status.success());
}
