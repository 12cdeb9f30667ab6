//! End-to-end exports against a real Chrome/Chromium.
//!
//! Run with `cargo test -- --ignored` on a machine with a browser installed.
//! Set `WEBPDF_TEST_NO_SANDBOX=1` when running as root or in a container.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::thread;
use std::time::Duration;

use tempfile::TempDir;

const PAGE: &str = "<html><body>hi</body></html>";

/// Serves `PAGE` for every request on an ephemeral localhost port.
fn serve_static_page() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
    let addr = listener.local_addr().expect("local addr");
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut buf = [0u8; 4096];
            let mut request = Vec::new();
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                PAGE.len(),
                PAGE
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });
    format!("http://{addr}/")
}

/// Accepts connections and holds them open without ever answering.
fn serve_never_responding() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
    let addr = listener.local_addr().expect("local addr");
    thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming().flatten() {
            held.push(stream);
        }
    });
    format!("http://{addr}/")
}

fn write_config(dir: &Path) -> PathBuf {
    write_config_with_navigation(dir, "20s")
}

fn write_config_with_navigation(dir: &Path, navigation: &str) -> PathBuf {
    let path = dir.join("webpdf.toml");
    let sandbox = std::env::var_os("WEBPDF_TEST_NO_SANDBOX").is_none();
    std::fs::write(
        &path,
        format!("[timeouts]\nnavigation = \"{navigation}\"\n\n[browser]\nsandbox = {sandbox}\n"),
    )
    .expect("write config");
    path
}

/// Runs webpdf with its temporary files (the browser profile) under `tmp`.
fn run_webpdf(tmp: &Path, config: &Path, url: &str, out: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_webpdf"))
        .args([
            "--config",
            config.to_str().unwrap(),
            url,
            out.to_str().unwrap(),
        ])
        .env("TMPDIR", tmp)
        .output()
        .expect("run webpdf")
}

fn assert_is_pdf(path: &Path) {
    let bytes = std::fs::read(path).expect("read pdf");
    assert!(bytes.len() > 4, "pdf should not be empty");
    assert_eq!(&bytes[..4], b"%PDF", "output should be a PDF document");
}

/// Processes whose command line mentions `needle`.
#[cfg(target_os = "linux")]
fn processes_mentioning(needle: &str) -> Vec<u32> {
    let Ok(entries) = std::fs::read_dir("/proc") else {
        return Vec::new();
    };
    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().to_str()?.parse::<u32>().ok())
        .filter(|pid| {
            std::fs::read(format!("/proc/{pid}/cmdline"))
                .map(|raw| String::from_utf8_lossy(&raw).contains(needle))
                .unwrap_or(false)
        })
        .collect()
}

#[cfg(target_os = "linux")]
fn assert_no_browser_left(tmp: &Path) {
    let needle = tmp.to_string_lossy().to_string();
    let mut remaining = processes_mentioning(&needle);
    for _ in 0..20 {
        if remaining.is_empty() {
            break;
        }
        thread::sleep(Duration::from_millis(100));
        remaining = processes_mentioning(&needle);
    }
    assert!(remaining.is_empty(), "browser processes left running: {remaining:?}");
}

#[cfg(not(target_os = "linux"))]
fn assert_no_browser_left(_tmp: &Path) {}

#[test]
#[ignore = "requires a local Chrome/Chromium"]
fn exports_static_page() {
    let dir = TempDir::new().expect("tempdir");
    let tmp = TempDir::new().expect("browser tmp");
    let config = write_config(dir.path());
    let out = dir.path().join("out.pdf");
    let url = serve_static_page();

    let output = run_webpdf(tmp.path(), &config, &url, &out);

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_is_pdf(&out);
    assert_no_browser_left(tmp.path());
    let profiles = std::fs::read_dir(tmp.path())
        .expect("read tmp")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("webpdf-profile-"))
        .count();
    assert_eq!(profiles, 0, "browser profile directory should be removed");
}

#[test]
#[ignore = "requires a local Chrome/Chromium"]
fn overwrites_existing_output() {
    let dir = TempDir::new().expect("tempdir");
    let tmp = TempDir::new().expect("browser tmp");
    let config = write_config(dir.path());
    let out = dir.path().join("out.pdf");
    std::fs::write(&out, vec![b'x'; 1 << 20]).expect("seed output");
    let url = serve_static_page();

    let output = run_webpdf(tmp.path(), &config, &url, &out);

    assert_eq!(output.status.code(), Some(0));
    assert_is_pdf(&out);
    let bytes = std::fs::read(&out).expect("read pdf");
    assert!(
        !bytes.ends_with(b"xxxx"),
        "old contents must be replaced, not merged"
    );
}

#[test]
#[ignore = "requires a local Chrome/Chromium"]
fn unresolvable_host_fails_without_output() {
    let dir = TempDir::new().expect("tempdir");
    let tmp = TempDir::new().expect("browser tmp");
    let config = write_config(dir.path());
    let out = dir.path().join("out.pdf");

    let output = run_webpdf(tmp.path(), &config, "http://nonexistent.invalid/", &out);

    assert_ne!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error[navigation]"), "got: {stderr}");
    assert!(!out.exists(), "no file may be created for a failed navigation");
    assert_no_browser_left(tmp.path());
}

#[test]
#[ignore = "requires a local Chrome/Chromium"]
fn missing_output_directory_fails_without_output() {
    let dir = TempDir::new().expect("tempdir");
    let tmp = TempDir::new().expect("browser tmp");
    let config = write_config(dir.path());
    let out = dir.path().join("missing").join("out.pdf");
    let url = serve_static_page();

    let output = run_webpdf(tmp.path(), &config, &url, &out);

    assert_ne!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error[output]"), "got: {stderr}");
    assert!(!out.exists());
    assert!(!dir.path().join("missing").exists(), "directories are not created");
    assert_no_browser_left(tmp.path());
}

#[test]
#[ignore = "requires a local Chrome/Chromium"]
fn unresponsive_server_hits_navigation_deadline() {
    let dir = TempDir::new().expect("tempdir");
    let tmp = TempDir::new().expect("browser tmp");
    let config = write_config_with_navigation(dir.path(), "1s");
    let out = dir.path().join("out.pdf");
    let url = serve_never_responding();

    let output = run_webpdf(tmp.path(), &config, &url, &out);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error[timeout]"), "got: {stderr}");
    assert!(stderr.contains("after 1s"), "got: {stderr}");
    assert!(!out.exists(), "no file may be created when navigation times out");
    assert_no_browser_left(tmp.path());
}
