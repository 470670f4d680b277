//! ipstr CLI — validate address and host strings from the command line.
//!
//! Subcommands:
//! - `ip <text>... [--options <file>]` — validate IP address strings
//! - `mac <text>... [--options <file>]` — validate MAC address strings
//! - `host <text>... [--options <file>]` — validate host strings
//!
//! Each input prints one JSON line. The exit status is 1 when any input is
//! invalid. `RUST_LOG` controls diagnostics on stderr.

use std::process;

use ipstr::prelude::*;
use ipstr::HostKind;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "ip" => cmd_ip(&args[2..]),
        "mac" => cmd_mac(&args[2..]),
        "host" => cmd_host(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(true)
        }
        other => {
            eprintln!("error: unknown command \"{other}\"");
            print_usage();
            process::exit(1);
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(2);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

/// Each command returns whether every input was valid.
fn cmd_ip(args: &[String]) -> Result<bool, String> {
    let (inputs, params) = parse_args::<IpAddressStringParams>(args)?;
    Ok(report(&inputs, |text| {
        let s = IpAddressString::with_params(text, params.unwrap_or_default());
        s.provider().map(|p| describe_provider(p))
    }))
}

fn cmd_mac(args: &[String]) -> Result<bool, String> {
    let (inputs, params) = parse_args::<MacAddressStringParams>(args)?;
    Ok(report(&inputs, |text| {
        let s = MacAddressString::with_params(text, params.unwrap_or_default());
        s.parsed().map(|mac| {
            json!({
                "format": mac.format().map(|f| f.to_string()),
                "bits": mac.bit_count(),
                "multiple": mac.is_multiple(),
                "value": mac.lower_value().map(|v| format!("{v:x}")),
                "upper": mac.upper_value().map(|v| format!("{v:x}")),
            })
        })
    }))
}

fn cmd_host(args: &[String]) -> Result<bool, String> {
    let (inputs, params) = parse_args::<HostNameParams>(args)?;
    Ok(report(&inputs, |text| {
        let s = HostName::with_params(text, params.unwrap_or_default());
        s.parsed().map(|host| {
            let mut out = match host.kind() {
                HostKind::Name(name) => json!({ "name": name }),
                HostKind::Address(provider) => describe_provider(provider),
                HostKind::Empty { loopback } => {
                    json!({ "empty": true, "address": loopback.map(|a| a.to_string()) })
                }
            };
            out["port"] = json!(host.port());
            out["service"] = json!(host.service());
            out
        })
    }))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Output
// ═══════════════════════════════════════════════════════════════════════════════

fn describe_provider(provider: &IpAddressProvider) -> Value {
    let kind = if provider.is_invalid() {
        "invalid"
    } else if provider.is_empty() {
        "empty"
    } else if provider.is_all() {
        "all"
    } else if provider.is_mask() {
        "mask"
    } else {
        "address"
    };
    json!({
        "kind": kind,
        "version": provider.version(),
        "address": provider.address().map(|a| a.to_string()),
        "upper": provider.upper_address().map(|a| a.to_string()),
        "prefix_len": provider.prefix_len(),
        "zone": provider.qualifier().and_then(|q| q.zone()),
        "multiple": provider.is_multiple(),
    })
}

fn describe_error(err: &AddressStringError) -> Value {
    let mut out = json!({
        "key": err.key().key(),
        "rule": err.key(),
        "kind": err.kind(),
        "message": err.key().message(),
        "index": err.index(),
    });
    if let Some(cause) = err.cause() {
        out["cause"] = describe_error(cause);
    }
    out
}

/// Print one JSON line per input; returns whether all were valid.
fn report<F>(inputs: &[String], mut validate: F) -> bool
where
    F: FnMut(&str) -> Result<Value, AddressStringError>,
{
    let mut all_valid = true;
    for text in inputs {
        let line = match validate(text) {
            Ok(detail) => json!({ "input": text, "valid": true, "detail": detail }),
            Err(err) => {
                all_valid = false;
                json!({ "input": text, "valid": false, "error": describe_error(&err) })
            }
        };
        println!("{line}");
    }
    all_valid
}

// ═══════════════════════════════════════════════════════════════════════════════
// Params loading
// ═══════════════════════════════════════════════════════════════════════════════

fn load_params<P: DeserializeOwned>(path: &str) -> Result<P, String> {
    tracing::debug!(path, "loading params");
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("failed to read \"{path}\": {e}"))?;

    let is_json = std::path::Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&content).map_err(|e| format!("JSON parse error: {e}"))
    } else {
        // Default to YAML (handles .yaml and .yml)
        serde_yaml::from_str(&content).map_err(|e| format!("YAML parse error: {e}"))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Argument parsing
// ═══════════════════════════════════════════════════════════════════════════════

fn parse_args<P: DeserializeOwned>(args: &[String]) -> Result<(Vec<String>, Option<P>), String> {
    let mut inputs = Vec::new();
    let mut params = None;
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--options" => {
                let path = args.get(i + 1).ok_or("--options requires a file path")?;
                params = Some(load_params(path)?);
                i += 2;
            }
            // Everything after `--` is input, even if it looks like a flag.
            "--" => {
                inputs.extend(args[i + 1..].iter().cloned());
                break;
            }
            other => {
                inputs.push(other.to_owned());
                i += 1;
            }
        }
    }

    if inputs.is_empty() {
        return Err("at least one input string is required".into());
    }
    Ok((inputs, params))
}

fn print_usage() {
    eprintln!(
        "Usage: ipstr <command> <text>... [--options <file>]

Commands:
  ip <text>...      Validate IP address strings
  mac <text>...     Validate MAC address strings
  host <text>...    Validate host strings
  help              Show this help

Options:
  --options <file>  Validation params as JSON (.json) or YAML
  --                Treat the remaining arguments as inputs"
    );
}
