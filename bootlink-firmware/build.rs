//! Build script for bootlink-firmware
//!
//! - Sets up linker search paths and link arguments for memory.x
//! - Validates firmware.toml and compiles it into constants

use std::env;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use bootlink_core::Variant;

/// Payload limit keeping both `INFO payload=...` and the canonical message in bounds
const MAX_PAYLOAD_LEN: usize = 64;

const MAX_BOOT_DELAY_MS: i64 = 60_000;

/// Validated contents of firmware.toml
struct BuildConfig {
    variant: Variant,
    boot_delay_ms: u64,
    baudrate: u32,
    payload: String,
    target_magic: u32,
}

fn main() {
    setup_linker();
    let config = load_config();
    generate_config(&config);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Abort the build with a boxed list of problems
fn fail(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Read and validate firmware.toml, applying environment overrides
fn load_config() -> BuildConfig {
    println!("cargo:rerun-if-changed=firmware.toml");
    println!("cargo:rerun-if-env-changed=TARGET_MAGIC_HEX");
    println!("cargo:rerun-if-env-changed=TARGET_MAGIC");

    let config_path = Path::new("firmware.toml");
    if !config_path.exists() {
        fail(
            "firmware.toml not found",
            &["Create one in the bootlink-firmware directory".to_string()],
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read firmware.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            let lines: Vec<String> = e.to_string().lines().map(truncate).collect();
            fail("Invalid TOML syntax in firmware.toml", &lines);
        }
    };

    let mut errors = Vec::new();

    let variant = match get(&config, "firmware", "variant") {
        Some(toml::Value::String(name)) => {
            Variant::from_name(name).unwrap_or_else(|| {
                errors.push(format!("[firmware] unknown variant '{}'", name));
                Variant::UartDemo
            })
        }
        Some(_) => {
            errors.push("[firmware] variant must be a string".to_string());
            Variant::UartDemo
        }
        None => {
            errors.push("[firmware] missing 'variant'".to_string());
            Variant::UartDemo
        }
    };

    let boot_delay_ms = match get(&config, "firmware", "boot_delay_ms") {
        Some(toml::Value::Integer(ms)) if (0..=MAX_BOOT_DELAY_MS).contains(ms) => *ms as u64,
        Some(_) => {
            errors.push(format!("[firmware] boot_delay_ms must be 0-{}", MAX_BOOT_DELAY_MS));
            0
        }
        None => 1200,
    };

    let baudrate = match get(&config, "uart", "baudrate") {
        Some(toml::Value::Integer(baud)) if (1200..=4_000_000).contains(baud) => *baud as u32,
        Some(_) => {
            errors.push("[uart] baudrate must be 1200-4000000".to_string());
            115_200
        }
        None => 115_200,
    };

    let payload = match get(&config, "signature", "payload") {
        Some(toml::Value::String(payload)) => {
            errors.extend(validate_payload(payload));
            payload.clone()
        }
        Some(_) => {
            errors.push("[signature] payload must be a string".to_string());
            String::new()
        }
        None => "PING_SEQ_001".to_string(),
    };

    let file_magic = match get(&config, "signature", "target_magic") {
        Some(toml::Value::Integer(magic)) if (0..=u32::MAX as i64).contains(magic) => {
            *magic as u32
        }
        Some(toml::Value::String(magic)) => parse_magic(magic).unwrap_or_else(|| {
            errors.push(format!("[signature] target_magic '{}' is not a u32", magic));
            0
        }),
        Some(_) => {
            errors.push("[signature] target_magic must be a 32-bit value".to_string());
            0
        }
        None => 0xC0FF_EE42,
    };

    let target_magic = match magic_override() {
        Some(Ok(magic)) => magic,
        Some(Err(raw)) => {
            errors.push(format!("TARGET_MAGIC override '{}' is not a u32", truncate(&raw)));
            file_magic
        }
        None => file_magic,
    };

    if !errors.is_empty() {
        fail("Invalid firmware.toml configuration", &errors);
    }

    println!(
        "cargo:warning=firmware.toml validated: variant={} magic=0x{:08X}",
        variant.name(),
        target_magic
    );

    BuildConfig {
        variant,
        boot_delay_ms,
        baudrate,
        payload,
        target_magic,
    }
}

fn get<'a>(config: &'a toml::Value, section: &str, key: &str) -> Option<&'a toml::Value> {
    config.get(section)?.get(key)
}

fn validate_payload(payload: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if payload.is_empty() || payload.len() > MAX_PAYLOAD_LEN {
        errors.push(format!("[signature] payload must be 1-{} bytes", MAX_PAYLOAD_LEN));
    }
    if !payload.bytes().all(|b| b.is_ascii_graphic() && b != b'|') {
        errors.push("[signature] payload must be printable ASCII without '|'".to_string());
    }
    errors
}

/// `0x`-prefixed hex or plain decimal
fn parse_magic(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}

/// TARGET_MAGIC_HEX is always hex; TARGET_MAGIC may be either form
fn magic_override() -> Option<Result<u32, String>> {
    if let Ok(raw) = env::var("TARGET_MAGIC_HEX") {
        let hex = raw.trim();
        let hex = hex
            .strip_prefix("0x")
            .or_else(|| hex.strip_prefix("0X"))
            .unwrap_or(hex);
        return Some(u32::from_str_radix(hex, 16).map_err(|_| raw.clone()));
    }
    env::var("TARGET_MAGIC")
        .ok()
        .map(|raw| parse_magic(&raw).ok_or(raw))
}

/// Fit a message line into the diagnostic box, cutting on a char boundary
fn truncate(line: &str) -> String {
    if line.chars().count() > 60 {
        format!("{}...", line.chars().take(57).collect::<String>())
    } else {
        line.to_string()
    }
}

/// Write `$OUT_DIR/build_config.rs`
fn generate_config(config: &BuildConfig) {
    let mut out = String::new();
    out.push_str("// Generated by build.rs from firmware.toml\n\n");
    writeln!(out, "pub const VARIANT: Variant = Variant::{:?};", config.variant).unwrap();
    writeln!(out, "pub const BOOT_DELAY_MS: u64 = {};", config.boot_delay_ms).unwrap();
    writeln!(out, "pub const UART_BAUDRATE: u32 = {};", config.baudrate).unwrap();
    writeln!(out, "pub const SIGNATURE_PAYLOAD: &str = {:?};", config.payload).unwrap();
    writeln!(out, "pub const TARGET_MAGIC: u32 = 0x{:08X};", config.target_magic).unwrap();

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("build_config.rs"), out).unwrap();
}
