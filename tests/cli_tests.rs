use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::process::Command;
use std::thread;
use tempfile::TempDir;

fn avbill_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("avbill"))
}

/// Minimal canned-response HTTP server standing in for the billing backend.
/// Serves the given routes until the test process exits.
fn mock_server(routes: Vec<(&'static str, u16, &'static str, Vec<u8>)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                match stream.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        request.extend_from_slice(&buf[..n]);
                        if request.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }

            let request = String::from_utf8_lossy(&request).to_string();
            let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();

            let (status, content_type, body) = routes
                .iter()
                .find(|(p, _, _, _)| *p == path)
                .map(|(_, s, c, b)| (*s, *c, b.clone()))
                .unwrap_or((
                    404,
                    "application/json",
                    br#"{"message":"not found"}"#.to_vec(),
                ));

            let reason = if status == 200 { "OK" } else { "Error" };
            let header = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(header.as_bytes());
            let _ = stream.write_all(&body);
            let _ = stream.flush();
        }
    });

    format!("http://{addr}")
}

fn sample_invoice_json() -> Vec<u8> {
    br#"{
        "id": 1,
        "invoice_number": "AV-2025-0042",
        "client_name": "AirCargo Ltd",
        "callsign": "ACL204",
        "departure": "FZAA",
        "destination": "FAOR",
        "flight_date": "2025-03-10",
        "fir_name": "Kinshasa FIR",
        "currency": "XAF",
        "fee_amount": 100.0,
        "other_fees": [{"name": "Tax", "amount": 50.0, "amount_usd": 13.6}],
        "total_original": 65000.0,
        "fx_rate": 655.957,
        "total_usd": 0.0
    }"#
    .to_vec()
}

#[test]
fn test_help() {
    avbill_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Aviation billing invoice viewer"));
}

#[test]
fn test_version() {
    avbill_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("avbill"));
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("avbill-config");

    avbill_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized avbill config"));

    assert!(config_path.join("config.toml").exists());
    assert!(config_path.join("downloads").exists());
}

#[test]
fn test_init_fails_if_exists() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("avbill-config");

    avbill_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success();

    avbill_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_show_without_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent");

    avbill_cmd()
        .args(["-C", config_path.to_str().unwrap(), "show", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_templates_list() {
    avbill_cmd()
        .arg("templates")
        .assert()
        .success()
        .stdout(predicate::str::contains("Standard"))
        .stdout(predicate::str::contains("Compact"))
        .stdout(predicate::str::contains("Detailed"))
        .stdout(predicate::str::contains("Default: 1"));
}

#[test]
fn test_show_renders_invoice() {
    let base_url = mock_server(vec![(
        "/api/invoices/1",
        200,
        "application/json",
        sample_invoice_json(),
    )]);
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("no-config");

    avbill_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "--base-url",
            &base_url,
            "show",
            "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("AV-2025-0042"))
        .stdout(predicate::str::contains("Air Navigation Fee"))
        .stdout(predicate::str::contains("Tax"))
        // declared subtotal is 0, so it is recomputed: 100 + 13.6
        .stdout(predicate::str::contains("113.60"));
}

#[test]
fn test_show_template_override() {
    let base_url = mock_server(vec![(
        "/api/invoices/1",
        200,
        "application/json",
        sample_invoice_json(),
    )]);
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("no-config");

    avbill_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "--base-url",
            &base_url,
            "show",
            "1",
            "--template",
            "2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("AV-2025-0042 | AirCargo Ltd"))
        .stdout(predicate::str::contains("TOTAL"));
}

#[test]
fn test_show_unknown_template_falls_back() {
    // Invoice asks for template "99"; the standard layout must come out
    let body = br#"{
        "id": 2,
        "invoice_number": "AV-2025-0099",
        "template": "99",
        "fee_amount": 10.0
    }"#
    .to_vec();
    let base_url = mock_server(vec![("/api/invoices/2", 200, "application/json", body)]);
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("no-config");

    avbill_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "--base-url",
            &base_url,
            "show",
            "2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("AV-2025-0099"))
        .stdout(predicate::str::contains("Subtotal (USD)"));
}

#[test]
fn test_api_error_message_surfaced() {
    let base_url = mock_server(vec![(
        "/api/invoices/7",
        404,
        "application/json",
        br#"{"message":"Invoice 7 is not available"}"#.to_vec(),
    )]);
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("no-config");

    avbill_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "--base-url",
            &base_url,
            "show",
            "7",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invoice 7 is not available"));
}

#[test]
fn test_consolidated_renders() {
    let body = br#"{
        "data": {
            "id": 3,
            "invoice_number": "CON-2025-007",
            "client_name": "AirCargo Ltd",
            "period_start": "2025-03-01",
            "period_end": "2025-03-31",
            "total_usd": 0.0,
            "invoices": [
                {"id": 1, "invoice_number": "AV-2025-0042", "fee_amount": 100.0,
                 "other_fees": [{"name": "Tax", "amount": 50.0, "amount_usd": 13.6}]},
                {"id": 8, "invoice_number": "AV-2025-0043", "fee_amount": 200.0}
            ]
        }
    }"#
    .to_vec();
    let base_url = mock_server(vec![(
        "/api/invoices/consolidated/3",
        200,
        "application/json",
        body,
    )]);
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("no-config");

    avbill_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "--base-url",
            &base_url,
            "consolidated",
            "3",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("CONSOLIDATED INVOICE CON-2025-007"))
        .stdout(predicate::str::contains("AV-2025-0042"))
        .stdout(predicate::str::contains("AV-2025-0043"))
        .stdout(predicate::str::contains("313.60"));
}

#[test]
fn test_pdf_download() {
    let base_url = mock_server(vec![(
        "/api/invoices/1/pdf",
        200,
        "application/pdf",
        b"%PDF-1.4 canned".to_vec(),
    )]);
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("no-config");
    let pdf_path = temp_dir.path().join("out").join("invoice.pdf");

    avbill_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "--base-url",
            &base_url,
            "pdf",
            "1",
            "--output",
            pdf_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved"));

    let saved = fs::read(&pdf_path).unwrap();
    assert_eq!(saved, b"%PDF-1.4 canned");
}

#[test]
fn test_pdf_rejects_non_pdf_body() {
    let base_url = mock_server(vec![(
        "/api/invoices/1/pdf",
        200,
        "text/html",
        b"<html>oops</html>".to_vec(),
    )]);
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("no-config");
    let pdf_path = temp_dir.path().join("invoice.pdf");

    avbill_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "--base-url",
            &base_url,
            "pdf",
            "1",
            "--output",
            pdf_path.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("did not return a PDF"));

    assert!(!pdf_path.exists());
}

#[test]
fn test_show_json_dump() {
    let base_url = mock_server(vec![(
        "/api/invoices/1",
        200,
        "application/json",
        sample_invoice_json(),
    )]);
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("no-config");

    avbill_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "--base-url",
            &base_url,
            "show",
            "1",
            "--json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"invoice_number\": \"AV-2025-0042\""))
        .stdout(predicate::str::contains("\"amount_usd\": 13.6"));
}
