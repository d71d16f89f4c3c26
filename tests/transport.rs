use std::fs;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

use roster_cards::bootstrap::{RenderOptions, run};
use roster_cards::feed::{Feed, FeedSource, HttpFeedSource};
use roster_cards::http_cache::DiskCache;
use roster_cards::page::{DeckId, Page};

const ROSTER_BODY: &str = r##"{"values":[["Alice","#1","EMT"],["Bob","#2","Command"]]}"##;
const INFO_BODY: &str = r#"{"values":[["FTO"],["FTO M"]]}"#;

/// Answers one connection per canned response, in order, and hands back the
/// raw request heads it saw.
fn serve(responses: Vec<String>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for response in responses {
            let (mut stream, _) = listener.accept().expect("accept");
            seen.push(read_head(&mut stream));
            stream.write_all(response.as_bytes()).expect("write response");
            stream.flush().expect("flush");
        }
        seen
    });
    (format!("http://{addr}"), handle)
}

fn read_head(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).expect("read request");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    String::from_utf8_lossy(&buf).to_ascii_lowercase()
}

fn response(status: &str, headers: &[(&str, &str)], body: &str) -> String {
    let extra: String = headers
        .iter()
        .map(|(name, value)| format!("{name}: {value}\r\n"))
        .collect();
    format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n{extra}\r\n{body}",
        body.len()
    )
}

fn source_for(base: &str, cache: Option<DiskCache>) -> HttpFeedSource {
    HttpFeedSource {
        roster_url: Some(format!("{base}/roster")),
        info_url: Some(format!("{base}/info")),
        cache,
    }
}

fn scratch_cache(name: &str) -> DiskCache {
    let mut path = std::env::temp_dir();
    path.push(format!("roster_cards_{}_{name}", std::process::id()));
    let _ = fs::remove_dir_all(&path);
    path.push("http_cache.json");
    DiskCache::at(path)
}

fn cleanup(cache: &DiskCache) {
    if let Some(dir) = cache.path().parent() {
        let _ = fs::remove_dir_all(dir);
    }
}

#[test]
fn server_error_carries_status_body_and_feed() {
    let (base, server) = serve(vec![response(
        "500 Internal Server Error",
        &[],
        "backend exploded",
    )]);
    let err = source_for(&base, None)
        .fetch(Feed::Roster)
        .expect_err("500 should fail");
    let msg = format!("{err:#}");
    assert!(msg.contains("roster feed request failed"), "{msg}");
    assert!(msg.contains("http 500"), "{msg}");
    assert!(msg.contains("backend exploded"), "{msg}");
    server.join().expect("server thread");
}

#[test]
fn plain_fetch_returns_body_and_sends_json_accept() {
    let (base, server) = serve(vec![response("200 OK", &[("ETag", "\"v1\"")], ROSTER_BODY)]);
    let body = source_for(&base, None).fetch(Feed::Roster).expect("fetch");
    assert_eq!(body, ROSTER_BODY);
    let heads = server.join().expect("server thread");
    assert!(heads[0].starts_with("get /roster "), "{}", heads[0]);
    assert!(heads[0].contains("accept: application/json"), "{}", heads[0]);
    assert!(heads[0].contains("user-agent: roster_cards/"), "{}", heads[0]);
}

#[test]
fn not_modified_is_served_from_disk_cache() {
    let cache = scratch_cache("not_modified");
    let (base, server) = serve(vec![
        response("200 OK", &[("ETag", "\"v1\"")], ROSTER_BODY),
        response("304 Not Modified", &[("ETag", "\"v1\"")], ""),
    ]);
    let source = source_for(&base, Some(cache.clone()));

    assert_eq!(source.fetch(Feed::Roster).expect("first fetch"), ROSTER_BODY);
    assert!(cache.path().exists());
    assert_eq!(source.fetch(Feed::Roster).expect("second fetch"), ROSTER_BODY);

    let heads = server.join().expect("server thread");
    assert!(!heads[0].contains("if-none-match"));
    assert!(heads[1].contains("if-none-match: \"v1\""), "{}", heads[1]);
    cleanup(&cache);
}

#[test]
fn not_modified_without_entry_is_an_error() {
    let cache = scratch_cache("no_entry");
    let (base, server) = serve(vec![response("304 Not Modified", &[], "")]);
    let err = source_for(&base, Some(cache.clone()))
        .fetch(Feed::Info)
        .expect_err("304 with nothing cached");
    assert!(format!("{err:#}").contains("received 304 without cache body"));
    server.join().expect("server thread");
    cleanup(&cache);
}

#[test]
fn uncached_source_writes_nothing() {
    let cache = scratch_cache("uncached");
    let (base, server) = serve(vec![response("200 OK", &[("ETag", "\"v1\"")], ROSTER_BODY)]);
    source_for(&base, None).fetch(Feed::Roster).expect("fetch");
    server.join().expect("server thread");
    assert!(!cache.path().exists());
    assert!(!cache.path().parent().is_some_and(|dir| dir.exists()));
}

#[test]
fn full_run_over_http() {
    let (base, server) = serve(vec![
        response("200 OK", &[], ROSTER_BODY),
        response("200 OK", &[], INFO_BODY),
    ]);
    let mut page = Page::with_default_template();
    let outcome =
        run(&source_for(&base, None), &mut page, RenderOptions::default()).expect("run");
    assert_eq!(outcome.tally.emt, 1);
    assert_eq!(page.cards(DeckId::FtoManager)[0].title, "Bob");

    let heads = server.join().expect("server thread");
    assert!(heads[0].starts_with("get /roster "));
    assert!(heads[1].starts_with("get /info "));
}
