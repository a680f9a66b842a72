//! End-to-end tests for the `loopgen` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

const STOCK_QUOTE: &str = r#"<?xml version="1.0"?>
<definitions name="StockQuote"
    targetNamespace="http://example.com/stockquote.wsdl"
    xmlns:tns="http://example.com/stockquote.wsdl"
    xmlns:xsd1="http://example.com/stockquote.xsd"
    xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
    xmlns="http://schemas.xmlsoap.org/wsdl/">
  <types>
    <schema targetNamespace="http://example.com/stockquote.xsd"
            xmlns="http://www.w3.org/2001/XMLSchema">
      <element name="TradePriceRequest">
        <complexType><all><element name="tickerSymbol" type="string"/></all></complexType>
      </element>
      <element name="TradePrice">
        <complexType><all><element name="price" type="float"/></all></complexType>
      </element>
    </schema>
  </types>
  <message name="GetLastTradePriceInput">
    <part name="body" element="xsd1:TradePriceRequest"/>
  </message>
  <message name="GetLastTradePriceOutput">
    <part name="body" element="xsd1:TradePrice"/>
  </message>
  <portType name="StockQuotePortType">
    <operation name="GetLastTradePrice">
      <input message="tns:GetLastTradePriceInput"/>
      <output message="tns:GetLastTradePriceOutput"/>
    </operation>
  </portType>
  <binding name="StockQuoteSoapBinding" type="tns:StockQuotePortType">
    <soap:binding style="document" transport="http://schemas.xmlsoap.org/soap/http"/>
    <operation name="GetLastTradePrice">
      <soap:operation soapAction="http://example.com/GetLastTradePrice"/>
    </operation>
  </binding>
  <service name="StockQuoteService">
    <port name="StockQuotePort" binding="tns:StockQuoteSoapBinding">
      <soap:address location="http://example.com/stockquote"/>
    </port>
  </service>
</definitions>
"#;

/// `loopgen` running in `dir`, isolated from the user's config and logging.
fn loopgen(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("loopgen").unwrap();
    cmd.current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env("HOME", dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("LOOPGEN_TEMPLATES_DIR");
    cmd
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn stdout_json(cmd: &mut Command) -> Value {
    let out = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).unwrap()
}

fn scaffold(dir: &Path, name: &str) {
    loopgen(dir).args(["app", name, "--yes"]).assert().success();
}

// ── general ──────────────────────────────────────────────────────────────────

#[test]
fn help_lists_subcommands() {
    let temp = TempDir::new().unwrap();
    loopgen(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("middleware"))
        .stdout(predicate::str::contains("datasource"))
        .stdout(predicate::str::contains("soap"));
}

#[test]
fn version_flag_prints_package_version() {
    let temp = TempDir::new().unwrap();
    loopgen(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// ── app ──────────────────────────────────────────────────────────────────────

#[test]
fn app_creates_a_loopback_project() {
    let temp = TempDir::new().unwrap();
    loopgen(temp.path())
        .args(["app", "my-api", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("npm install"));

    let root = temp.path().join("my-api");
    for file in [
        "package.json",
        ".yo-rc.json",
        "server/server.js",
        "server/middleware.json",
        "server/datasources.json",
        "server/model-config.json",
        "server/component-config.json",
    ] {
        assert!(root.join(file).is_file(), "missing {file}");
    }
    let package = read_json(&root.join("package.json"));
    assert_eq!(package["name"], "my-api");
    assert_eq!(package["dependencies"]["loopback"], "^3.0.0");
}

#[test]
fn app_name_is_normalized_into_the_directory() {
    let temp = TempDir::new().unwrap();
    loopgen(temp.path())
        .args(["app", "my.api", "--yes"])
        .assert()
        .success();
    assert!(temp.path().join("my-api/package.json").is_file());
}

#[test]
fn app_without_explorer_leaves_the_component_out() {
    let temp = TempDir::new().unwrap();
    loopgen(temp.path())
        .args(["app", "bare", "--no-explorer", "--yes"])
        .assert()
        .success();
    let package = read_json(&temp.path().join("bare/package.json"));
    assert!(package["dependencies"].get("loopback-component-explorer").is_none());
}

#[test]
fn app_dry_run_writes_nothing() {
    let temp = TempDir::new().unwrap();
    loopgen(temp.path())
        .args(["app", "preview", "--template", "notes", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("common/models/note.json"));
    assert!(!temp.path().join("preview").exists());
}

#[test]
fn app_json_output_lists_created_files() {
    let temp = TempDir::new().unwrap();
    let report = stdout_json(loopgen(temp.path()).args([
        "--output-format",
        "json",
        "app",
        "hello",
        "--template",
        "hello-world",
        "--yes",
    ]));
    assert_eq!(report["template"], "hello-world");
    let files: Vec<&str> = report["files"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(files.contains(&"common/models/message.json"));
}

#[test]
fn invalid_loopback_version_lists_available_versions() {
    let temp = TempDir::new().unwrap();
    loopgen(temp.path())
        .args(["app", "x", "--loopback-version", "4.x", "--yes"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "Invalid LoopBack version: 4.x. Available versions are 2.x, 3.x.",
        ));
}

#[test]
fn notes_template_is_not_offered_for_loopback_2() {
    let temp = TempDir::new().unwrap();
    loopgen(temp.path())
        .args(["app", "x", "-l", "2.x", "-t", "notes", "--yes"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid template"));
}

#[test]
fn existing_directory_needs_force() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("taken")).unwrap();

    loopgen(temp.path())
        .args(["app", "taken", "--yes"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--force"));

    loopgen(temp.path())
        .args(["app", "taken", "--yes", "--force"])
        .assert()
        .success();
    assert!(temp.path().join("taken/package.json").is_file());
}

#[test]
fn configured_default_template_is_used() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(".loopgen.toml"),
        "[defaults]\ntemplate = \"notes\"\n",
    )
    .unwrap();
    loopgen(temp.path())
        .args(["app", "jot", "--yes"])
        .assert()
        .success();
    assert!(temp.path().join("jot/common/models/note.json").is_file());
}

// ── middleware ───────────────────────────────────────────────────────────────

#[test]
fn middleware_phase_is_created_before_routes() {
    let temp = TempDir::new().unwrap();
    scaffold(temp.path(), "app");
    let root = temp.path().join("app");

    loopgen(temp.path())
        .args([
            "middleware",
            "morgan",
            "--phase",
            "logging",
            "--before",
            "routes",
            "--params",
            "{\"format\": \"dev\"}",
            "--project",
        ])
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("logging"));

    let middleware = read_json(&root.join("server/middleware.json"));
    assert_eq!(middleware["logging"]["morgan"]["params"]["format"], "dev");
    assert!(middleware["logging"]["morgan"].get("enabled").is_none());

    let phases = stdout_json(
        loopgen(temp.path())
            .args(["--output-format", "json", "phases", "--project"])
            .arg(&root),
    );
    let phases: Vec<&str> = phases
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    let logging = phases.iter().position(|p| *p == "logging").unwrap();
    assert_eq!(phases[logging + 1], "routes");
}

#[test]
fn duplicate_middleware_is_rejected() {
    let temp = TempDir::new().unwrap();
    scaffold(temp.path(), "app");
    let root = temp.path().join("app");
    let add = |cmd: &mut Command| {
        cmd.args(["middleware", "compression", "--phase", "initial", "--project"])
            .arg(&root)
            .assert()
    };

    add(&mut loopgen(temp.path())).success();
    add(&mut loopgen(temp.path()))
        .code(2)
        .stderr(predicate::str::contains("already registered"));
}

#[test]
fn middleware_outside_a_project_is_not_found() {
    let temp = TempDir::new().unwrap();
    loopgen(temp.path())
        .args(["middleware", "morgan", "--phase", "routes"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("--project"));
}

#[test]
fn middleware_without_phase_fails_when_not_interactive() {
    let temp = TempDir::new().unwrap();
    scaffold(temp.path(), "app");
    loopgen(temp.path())
        .args(["middleware", "morgan", "--project", "app"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--phase"));
}

// ── datasource + soap ────────────────────────────────────────────────────────

#[test]
fn datasource_options_are_written() {
    let temp = TempDir::new().unwrap();
    scaffold(temp.path(), "app");

    loopgen(temp.path())
        .args([
            "datasource",
            "mongo",
            "--connector",
            "mongodb",
            "--option",
            "port=27017",
            "--option",
            "host=localhost",
            "--project",
            "app",
        ])
        .assert()
        .success();

    let sources = read_json(&temp.path().join("app/server/datasources.json"));
    assert_eq!(sources["mongo"]["connector"], "mongodb");
    assert_eq!(sources["mongo"]["port"], 27017);
    assert_eq!(sources["mongo"]["host"], "localhost");
}

#[test]
fn soap_datasource_requires_url() {
    let temp = TempDir::new().unwrap();
    scaffold(temp.path(), "app");
    loopgen(temp.path())
        .args(["datasource", "weather", "--connector", "soap", "--project", "app"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--url"));
}

#[test]
fn soap_models_are_generated_from_a_wsdl_file() {
    let temp = TempDir::new().unwrap();
    scaffold(temp.path(), "app");
    let wsdl = temp.path().join("stockquote.wsdl");
    fs::write(&wsdl, STOCK_QUOTE).unwrap();

    loopgen(temp.path())
        .args([
            "datasource",
            "quotes",
            "--connector",
            "soap",
            "--url",
            "http://example.com/stockquote",
            "--wsdl",
        ])
        .arg(&wsdl)
        .args(["--project", "app"])
        .assert()
        .success();

    let report = stdout_json(loopgen(temp.path()).args([
        "--output-format",
        "json",
        "soap",
        "--datasource",
        "quotes",
        "--project",
        "app",
    ]));
    assert_eq!(report["api_model"], "SoapStockQuoteSoapBinding");
    assert_eq!(report["operations"][0], "GetLastTradePrice");

    let root = temp.path().join("app");
    for file in report["files"].as_array().unwrap() {
        assert!(root.join(file.as_str().unwrap()).is_file(), "missing {file}");
    }
    let model_config = read_json(&root.join("server/model-config.json"));
    assert_eq!(model_config["SoapStockQuoteSoapBinding"]["dataSource"], "quotes");
}

#[test]
fn relative_wsdl_path_is_read_from_the_project() {
    let temp = TempDir::new().unwrap();
    scaffold(temp.path(), "app");
    let root = temp.path().join("app");
    fs::create_dir_all(root.join("soap")).unwrap();
    fs::write(root.join("soap/stockquote.wsdl"), STOCK_QUOTE).unwrap();

    loopgen(temp.path())
        .args([
            "datasource",
            "quotes",
            "--connector",
            "soap",
            "--url",
            "http://example.com/stockquote",
            "--wsdl",
            "soap/stockquote.wsdl",
            "--project",
            "app",
        ])
        .assert()
        .success();

    let report = stdout_json(loopgen(temp.path()).args([
        "--output-format",
        "json",
        "soap",
        "--datasource",
        "quotes",
        "--project",
        "app",
    ]));
    assert_eq!(report["api_model"], "SoapStockQuoteSoapBinding");
    assert!(root.join("server/models/soap-stock-quote-soap-binding.js").is_file());
}

#[test]
fn soap_on_a_memory_datasource_is_rejected() {
    let temp = TempDir::new().unwrap();
    scaffold(temp.path(), "app");
    loopgen(temp.path())
        .args(["datasource", "cache", "--project", "app"])
        .assert()
        .success();
    loopgen(temp.path())
        .args(["soap", "--datasource", "cache", "--project", "app"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("expected 'soap'"));
}

#[test]
fn soap_unknown_service_lists_available() {
    let temp = TempDir::new().unwrap();
    scaffold(temp.path(), "app");
    let wsdl = temp.path().join("stockquote.wsdl");
    fs::write(&wsdl, STOCK_QUOTE).unwrap();
    loopgen(temp.path())
        .args(["datasource", "quotes", "--connector", "soap", "--url", "http://x", "--wsdl"])
        .arg(&wsdl)
        .args(["--project", "app"])
        .assert()
        .success();

    loopgen(temp.path())
        .args([
            "soap",
            "--datasource",
            "quotes",
            "--service",
            "Nope",
            "--project",
            "app",
        ])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("StockQuoteService"));
}

// ── list / config / completions ──────────────────────────────────────────────

#[test]
fn list_json_contains_builtin_templates() {
    let temp = TempDir::new().unwrap();
    let templates = stdout_json(loopgen(temp.path()).args(["list", "--format", "json"]));
    let ids: Vec<&str> = templates
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["id"].as_str())
        .collect();
    for id in ["api-server", "empty-server", "hello-world", "notes"] {
        assert!(ids.contains(&id), "missing {id}");
    }
}

#[test]
fn list_for_loopback_2_omits_notes() {
    let temp = TempDir::new().unwrap();
    loopgen(temp.path())
        .args(["list", "-l", "2.x", "--format", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api-server"))
        .stdout(predicate::str::contains("notes").not());
}

#[test]
fn config_get_reports_defaults() {
    let temp = TempDir::new().unwrap();
    loopgen(temp.path())
        .args(["config", "get", "defaults.template"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api-server"));
}

#[test]
fn init_local_writes_a_loadable_config() {
    let temp = TempDir::new().unwrap();
    loopgen(temp.path())
        .args(["init", "--local"])
        .assert()
        .success();
    assert!(temp.path().join(".loopgen.toml").is_file());

    loopgen(temp.path())
        .args(["config", "get", "defaults.loopback_version"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3.x"));
}

#[test]
fn missing_explicit_config_is_a_configuration_error() {
    let temp = TempDir::new().unwrap();
    loopgen(temp.path())
        .args(["--config", "nope.toml", "list"])
        .assert()
        .code(4);
}

#[test]
fn completions_mention_the_binary() {
    let temp = TempDir::new().unwrap();
    loopgen(temp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("loopgen"));
}
