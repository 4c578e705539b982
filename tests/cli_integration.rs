use chrono::{Days, NaiveDate, Utc};
use serde_json::Value;
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "shopstats-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

type Route = dyn Fn(&str, &str) -> (u16, String) + Send + Sync;

/// Minimal HTTP/1.1 backend: one response per connection, every request line recorded
struct FakeBackend {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeBackend {
    fn start(route: impl Fn(&str, &str) -> (u16, String) + Send + Sync + 'static) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let route: Arc<Route> = Arc::new(route);
        let seen = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let route = Arc::clone(&route);
                let seen = Arc::clone(&seen);
                thread::spawn(move || handle_connection(stream, route.as_ref(), &seen));
            }
        });
        FakeBackend { addr, requests }
    }

    fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("lock").clone()
    }

    fn saw(&self, needle: &str) -> bool {
        self.requests().iter().any(|r| r.contains(needle))
    }
}

fn handle_connection(stream: TcpStream, route: &Route, seen: &Mutex<Vec<String>>) {
    let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    loop {
        let mut header = String::new();
        match reader.read_line(&mut header) {
            Ok(0) | Err(_) => break,
            Ok(_) if header == "\r\n" || header == "\n" => break,
            Ok(_) => {}
        }
    }

    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();
    seen.lock().expect("lock").push(format!("{method} {target}"));

    let path = target.split('?').next().unwrap_or_default();
    let (status, body) = route(&method, path);
    let response = format!(
        "HTTP/1.1 {status} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let mut stream = stream;
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn run_shopstats(args: &[&str], home: &Path) -> (bool, Vec<u8>, Vec<u8>) {
    let bin = std::env::var("CARGO_BIN_EXE_shopstats").unwrap_or_else(|_| {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("target");
        path.push("debug");
        if cfg!(windows) {
            path.push("shopstats.exe");
        } else {
            path.push("shopstats");
        }
        path.to_string_lossy().into_owned()
    });
    let output = Command::new(bin)
        .args(args)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("SHOPSTATS_BASE_URL")
        .env_remove("SHOPSTATS_TOKEN")
        .env_remove("RUST_LOG")
        .output()
        .expect("run shopstats");
    (output.status.success(), output.stdout, output.stderr)
}

fn ok_json(body: &str) -> (u16, String) {
    (200, body.to_string())
}

#[test]
fn today_falls_back_to_aggregated_week() {
    let home = unique_temp_dir("fallback");
    let backend = FakeBackend::start(|_, path| match path {
        "/analytics/daily" => ok_json(
            r#"{"date":"2026-03-10","dailyRevenue":0,"totalOrders":0,"completedOrders":0,"cancelledOrders":2}"#,
        ),
        "/analytics/range" => ok_json(
            r#"{"content":[
                {"date":"2026-03-09","dailyRevenue":100,"totalOrders":2,"completedOrders":2,"totalProducts":5,"totalCustomers":10},
                {"date":"2026-03-08","dailyRevenue":50,"totalOrders":1,"completedOrders":1,"totalProducts":9,"totalCustomers":8},
                {"date":"2026-03-07","dailyRevenue":null,"totalProducts":3}
            ],"pageNumber":0,"pageSize":7,"totalElements":3,"totalPages":1,"lastPage":true}"#,
        ),
        _ => (404, "{}".to_string()),
    });

    let url = backend.url();
    let (ok, stdout, stderr) = run_shopstats(
        &["today", "--no-generate", "-j", "--timezone", "UTC", "--base-url", &url],
        &home,
    );
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));

    let json: Value = serde_json::from_slice(&stdout).expect("json");
    assert_eq!(json["source"], "aggregated-range");
    assert_eq!(json["message"], "Showing aggregated data from the last 7 days");
    assert_eq!(json["stat"]["dailyRevenue"].as_f64(), Some(150.0));
    assert_eq!(json["stat"]["totalOrders"], 3);
    assert_eq!(json["stat"]["averageOrderValue"].as_f64(), Some(50.0));
    assert_eq!(json["stat"]["totalProducts"], 9);
    assert_eq!(json["stat"]["totalCustomers"], 10);

    assert!(backend.saw("pageSize=7"));
    assert!(backend.saw("sortDir=desc"));
    assert!(!backend.saw("POST /analytics/generate"));

    let _ = fs::remove_dir_all(home);
}

fn range_start_for(today: NaiveDate) -> String {
    let start = today.checked_sub_days(Days::new(6)).expect("date");
    format!("startDate={start}")
}

#[test]
fn fallback_window_ends_on_client_today() {
    let home = unique_temp_dir("anchor");
    let backend = FakeBackend::start(|_, path| match path {
        "/analytics/daily" => ok_json(r#"{"date":"2020-01-01T18:30:00Z","totalOrders":0}"#),
        "/analytics/range" => ok_json(r#"{"content":[],"lastPage":true}"#),
        _ => (404, "{}".to_string()),
    });

    let url = backend.url();
    let before = Utc::now().date_naive();
    let (ok, stdout, stderr) = run_shopstats(
        &["today", "--no-generate", "-j", "--timezone", "UTC", "--base-url", &url],
        &home,
    );
    let after = Utc::now().date_naive();
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));

    assert!(
        backend.saw(&range_start_for(before)) || backend.saw(&range_start_for(after)),
        "requests: {:?}",
        backend.requests()
    );
    assert!(!backend.saw("startDate=2019-12-26"));

    let json: Value = serde_json::from_slice(&stdout).expect("json");
    assert_eq!(json["source"], "empty");
    let stat_date = json["stat"]["date"].as_str().expect("date");
    assert!(stat_date == before.to_string() || stat_date == after.to_string());

    let _ = fs::remove_dir_all(home);
}

#[test]
fn today_with_sales_skips_range_and_triggers_generation() {
    let home = unique_temp_dir("today");
    let backend = FakeBackend::start(|method, path| match (method, path) {
        ("POST", "/analytics/generate") => ok_json("{}"),
        ("GET", "/analytics/daily") => ok_json(
            r#"{"date":"2026-03-10","dailyRevenue":80.5,"totalOrders":2,"completedOrders":1,"averageOrderValue":40.25}"#,
        ),
        _ => (404, "{}".to_string()),
    });

    let url = backend.url();
    let (ok, stdout, stderr) = run_shopstats(&["today", "-j", "--base-url", &url], &home);
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));

    let json: Value = serde_json::from_slice(&stdout).expect("json");
    assert_eq!(json["source"], "today");
    assert!(json.get("message").is_none());
    assert_eq!(json["stat"]["averageOrderValue"].as_f64(), Some(40.25));
    assert!(backend.saw("POST /analytics/generate"));
    assert!(!backend.saw("/analytics/range"));

    let _ = fs::remove_dir_all(home);
}

#[test]
fn generation_failure_is_not_fatal() {
    let home = unique_temp_dir("genfail");
    let backend = FakeBackend::start(|method, path| match (method, path) {
        ("POST", "/analytics/generate") => (500, r#"{"message":"job queue full"}"#.to_string()),
        ("GET", "/analytics/daily") => ok_json(r#"{"totalOrders":1,"dailyRevenue":10}"#),
        _ => (404, "{}".to_string()),
    });

    let url = backend.url();
    let (ok, stdout, stderr) = run_shopstats(&["today", "-j", "--base-url", &url], &home);
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));
    let json: Value = serde_json::from_slice(&stdout).expect("json");
    assert_eq!(json["source"], "today");

    let _ = fs::remove_dir_all(home);
}

#[test]
fn empty_week_reports_no_data() {
    let home = unique_temp_dir("empty");
    let backend = FakeBackend::start(|_, path| match path {
        "/analytics/daily" => ok_json("{}"),
        "/analytics/range" => ok_json(r#"{"content":[],"totalPages":0,"lastPage":true}"#),
        _ => (404, "{}".to_string()),
    });

    let url = backend.url();
    let (ok, stdout, stderr) =
        run_shopstats(&["today", "--no-generate", "-j", "--base-url", &url], &home);
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));

    let json: Value = serde_json::from_slice(&stdout).expect("json");
    assert_eq!(json["source"], "empty");
    assert_eq!(json["message"], "No sales data found for the selected period");
    assert_eq!(json["stat"]["totalOrders"], 0);
    assert_eq!(json["stat"]["dailyRevenue"].as_f64(), Some(0.0));

    let _ = fs::remove_dir_all(home);
}

#[test]
fn range_failure_propagates_as_error() {
    let home = unique_temp_dir("rangefail");
    let backend = FakeBackend::start(|_, path| match path {
        "/analytics/daily" => ok_json("{}"),
        "/analytics/range" => (500, r#"{"message":"database unavailable"}"#.to_string()),
        _ => (404, "{}".to_string()),
    });

    let url = backend.url();
    let (ok, _stdout, stderr) =
        run_shopstats(&["today", "--no-generate", "--base-url", &url], &home);
    assert!(!ok);
    let stderr = String::from_utf8_lossy(&stderr);
    assert!(stderr.contains("Analytics range unavailable"), "stderr: {stderr}");
    assert!(stderr.contains("database unavailable"), "stderr: {stderr}");

    let _ = fs::remove_dir_all(home);
}

#[test]
fn forbidden_daily_reports_permission_error() {
    let home = unique_temp_dir("forbidden");
    let backend = FakeBackend::start(|_, _| (403, "{}".to_string()));

    let url = backend.url();
    let (ok, _stdout, stderr) =
        run_shopstats(&["today", "--no-generate", "--base-url", &url], &home);
    assert!(!ok);
    let stderr = String::from_utf8_lossy(&stderr);
    assert!(stderr.contains("do not have permission"), "stderr: {stderr}");

    let _ = fs::remove_dir_all(home);
}

#[test]
fn bearer_token_from_config_file() {
    let home = unique_temp_dir("config");
    let backend = FakeBackend::start(|_, path| match path {
        "/admin/dashboard/stats" => ok_json(
            r#"{"data":{"products":42,"categories":6,"orders":1300,"users":250}}"#,
        ),
        _ => (404, "{}".to_string()),
    });
    let config_dir = home.join(".config").join("shopstats");
    fs::create_dir_all(&config_dir).expect("config dir");
    fs::write(
        config_dir.join("config.toml"),
        format!("base_url = \"{}\"\ntoken = \"s3cret\"\n", backend.url()),
    )
    .expect("write config");

    let (ok, stdout, stderr) = run_shopstats(&["overview", "-j"], &home);
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));

    let json: Value = serde_json::from_slice(&stdout).expect("json");
    assert_eq!(json["totalProducts"], 42);
    assert_eq!(json["totalCategories"], 6);
    assert_eq!(json["totalOrders"], 1300);
    assert_eq!(json["totalUsers"], 250);

    let _ = fs::remove_dir_all(home);
}

#[test]
fn categories_json_in_revenue_order() {
    let home = unique_temp_dir("categories");
    let backend = FakeBackend::start(|_, path| match path {
        "/categories" => ok_json(
            r#"{"content":[{"categoryId":"c1","title":"Phones"},{"categoryId":"c2","title":"Cases"}],
                "pageNumber":0,"totalPages":1,"lastPage":true}"#,
        ),
        "/analytics/category/c1" => ok_json(r#"{"dailyRevenue":900}"#),
        "/analytics/category/c2" => ok_json(r#"{"dailyRevenue":45.5}"#),
        _ => (404, "{}".to_string()),
    });

    let url = backend.url();
    let (ok, stdout, stderr) = run_shopstats(
        &["categories", "-j", "--order", "desc", "--base-url", &url],
        &home,
    );
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));

    let json: Value = serde_json::from_slice(&stdout).expect("json");
    let arr = json.as_array().expect("array output");
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["title"], "Phones");
    assert_eq!(arr[0]["revenue"].as_f64(), Some(900.0));
    assert_eq!(arr[1]["categoryId"], "c2");

    let _ = fs::remove_dir_all(home);
}

#[test]
fn range_json_includes_total() {
    let home = unique_temp_dir("range");
    let backend = FakeBackend::start(|_, path| match path {
        "/analytics/range" => ok_json(
            r#"{"content":[
                {"date":"2026-03-02","dailyRevenue":30,"totalOrders":1,"totalProducts":4},
                {"date":"2026-03-01","dailyRevenue":70,"totalOrders":3,"totalProducts":6}
            ],"pageNumber":0,"totalPages":1,"lastPage":true}"#,
        ),
        _ => (404, "{}".to_string()),
    });

    let url = backend.url();
    let (ok, stdout, stderr) = run_shopstats(
        &[
            "range",
            "--since",
            "2026-03-01",
            "--until",
            "20260302",
            "-j",
            "--base-url",
            &url,
        ],
        &home,
    );
    assert!(ok, "stderr: {}", String::from_utf8_lossy(&stderr));

    let json: Value = serde_json::from_slice(&stdout).expect("json");
    let days = json["days"].as_array().expect("days");
    assert_eq!(days[0]["date"], "2026-03-01");
    assert_eq!(days[1]["date"], "2026-03-02");
    assert_eq!(json["total"]["dailyRevenue"].as_f64(), Some(100.0));
    assert_eq!(json["total"]["totalOrders"], 4);
    assert_eq!(json["total"]["averageOrderValue"].as_f64(), Some(25.0));
    assert_eq!(json["total"]["totalProducts"], 6);
    assert!(backend.saw("pageSize=2"));

    let _ = fs::remove_dir_all(home);
}

#[test]
fn invalid_date_fails_without_network() {
    let home = unique_temp_dir("baddate");
    let (ok, _stdout, stderr) = run_shopstats(
        &["range", "--since", "03/01/2026", "--base-url", "http://127.0.0.1:9"],
        &home,
    );
    assert!(!ok);
    assert!(String::from_utf8_lossy(&stderr).contains("Invalid date \"03/01/2026\""));

    let _ = fs::remove_dir_all(home);
}

#[test]
fn invalid_timezone_fails() {
    let home = unique_temp_dir("badtz");
    let (ok, _stdout, stderr) = run_shopstats(&["today", "--timezone", "Mars/Olympus"], &home);
    assert!(!ok);
    assert!(String::from_utf8_lossy(&stderr).contains("Invalid timezone: Mars/Olympus"));

    let _ = fs::remove_dir_all(home);
}

#[test]
fn invalid_base_url_fails() {
    let home = unique_temp_dir("badurl");
    let (ok, _stdout, stderr) = run_shopstats(&["overview", "--base-url", "localhost:9090"], &home);
    assert!(!ok);
    assert!(String::from_utf8_lossy(&stderr).contains("Invalid base URL"));

    let _ = fs::remove_dir_all(home);
}

#[test]
fn unreachable_backend_reports_connection_error() {
    let home = unique_temp_dir("unreachable");
    // Bind then drop to get a port nothing listens on
    let port = TcpListener::bind("127.0.0.1:0")
        .expect("bind")
        .local_addr()
        .expect("addr")
        .port();
    let url = format!("http://127.0.0.1:{port}");
    let (ok, _stdout, stderr) = run_shopstats(&["overview", "--base-url", &url, "--timeout", "2"], &home);
    assert!(!ok);
    assert!(String::from_utf8_lossy(&stderr).contains("Cannot connect to the server"));

    let _ = fs::remove_dir_all(home);
}
