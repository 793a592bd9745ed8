//! Shared CLI helpers used across multiple commands.

use std::path::{Path, PathBuf};

use texgraph_config::{Settings, settings_path};
use texgraph_core::{DataKind, InputPort, LiteralValue, Rgba};

/// Parse a `key=value` string for clap's `value_parser`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) => Ok((key.trim().to_string(), value.trim().to_string())),
        None => Err(format!(
            "Invalid parameter format: '{}' (expected key=value)",
            s
        )),
    }
}

/// Loads settings from `path`, or from the user settings file.
///
/// A missing file yields the defaults.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<(Settings, PathBuf)> {
    let path = path.map_or_else(settings_path, Path::to_path_buf);
    let settings = Settings::load_or_default(&path)?;
    Ok((settings, path))
}

/// Parses `text` into a literal shaped for `port`.
///
/// Numbers parse as floats or integers depending on the port's current
/// literal; choices accept an index or an option label; colors accept
/// `#rrggbb`, `#rrggbbaa` or `r,g,b[,a]`.
pub fn parse_literal(port: &InputPort, text: &str) -> anyhow::Result<LiteralValue> {
    let bad = || anyhow::anyhow!("Invalid value '{}' for port '{}'", text, port.id);

    let literal = match port.value {
        Some(LiteralValue::Float(_)) => LiteralValue::Float(text.parse().map_err(|_| bad())?),
        Some(LiteralValue::Int(_)) => LiteralValue::Int(text.parse().map_err(|_| bad())?),
        Some(LiteralValue::Bool(_)) => LiteralValue::Bool(parse_bool(text).ok_or_else(bad)?),
        Some(LiteralValue::Choice(choice)) => {
            let index = match text.parse::<usize>() {
                Ok(index) if index < choice.options().len() => index,
                _ => choice
                    .options()
                    .iter()
                    .position(|label| label_matches(label, text))
                    .ok_or_else(|| {
                        anyhow::anyhow!(
                            "Unknown option '{}' for port '{}' (options: {})",
                            text,
                            port.id,
                            choice.options().join(", ")
                        )
                    })?,
            };
            LiteralValue::Int(index as i32)
        }
        Some(LiteralValue::Color(_)) => LiteralValue::Color(parse_color(text).ok_or_else(bad)?),
        None if port.kind == DataKind::Color => {
            LiteralValue::Color(parse_color(text).ok_or_else(bad)?)
        }
        None => LiteralValue::Float(text.parse().map_err(|_| bad())?),
    };
    Ok(literal)
}

/// Formats a literal for listings.
pub fn format_literal(literal: Option<LiteralValue>) -> String {
    match literal {
        None => "-".to_string(),
        Some(LiteralValue::Float(v)) => format!("{v}"),
        Some(LiteralValue::Int(v)) => format!("{v}"),
        Some(LiteralValue::Bool(v)) => format!("{v}"),
        Some(LiteralValue::Color(c)) => {
            format!("#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a)
        }
        Some(LiteralValue::Choice(c)) => c.selected_label().unwrap_or("-").to_string(),
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Matches `"Func: Add"` by `add`, and `"Smooth F1"` by `smooth f1` or `smooth_f1`.
fn label_matches(label: &str, text: &str) -> bool {
    let normalize = |s: &str| s.to_ascii_lowercase().replace(['_', '-'], " ");
    let label = normalize(label);
    let text = normalize(text);
    label == text || label.rsplit_once(": ").is_some_and(|(_, short)| short == text)
}

fn parse_color(text: &str) -> Option<Rgba> {
    if let Some(hex) = text.strip_prefix('#') {
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        return match hex.len() {
            6 => Some(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Rgba::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        };
    }
    let channels: Vec<u8> = text
        .split(',')
        .map(|c| c.trim().parse().ok())
        .collect::<Option<_>>()?;
    match channels[..] {
        [r, g, b] => Some(Rgba::rgb(r, g, b)),
        [r, g, b, a] => Some(Rgba::new(r, g, b, a)),
        _ => None,
    }
}
