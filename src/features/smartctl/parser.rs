use crate::features::smartctl::models::{AttributeMap, Device, SmartAttribute};
use crate::shared::config::{Framing, ParsePolicy};
use crate::shared::error::CollectionError;
use crate::shared::traits::CommandExecutor;
use log::{debug, warn};
use regex::Regex;
use std::sync::OnceLock;

pub const ATTRIBUTES_ARG: &str = "--attributes";

const HEADER_LINES: usize = 7;
const FOOTER_LINES: usize = 1;

const NAME_COLUMN: usize = 1;
const WHEN_FAILED_COLUMN: usize = 8;
const RAW_VALUE_COLUMN: usize = 9;
const MIN_COLUMNS: usize = RAW_VALUE_COLUMN + 1;

fn attribute_row_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // ID# and name; the column count is checked by `parse_row`.
    PATTERN.get_or_init(|| Regex::new(r"^\s*\d+\s+\S+").expect("valid attribute row pattern"))
}

pub struct AttributeParser<'a, E: CommandExecutor> {
    executor: &'a E,
    framing: Framing,
    policy: ParsePolicy,
}

impl<'a, E: CommandExecutor> AttributeParser<'a, E> {
    pub fn new(executor: &'a E, framing: Framing, policy: ParsePolicy) -> Self {
        Self {
            executor,
            framing,
            policy,
        }
    }

    /// Runs `smartctl --attributes <device>`; an empty map means the device is unsupported.
    pub fn attributes(&self, device: &Device) -> Result<AttributeMap, CollectionError> {
        let lines = self.executor.run(&[ATTRIBUTES_ARG, device.as_str()])?;
        parse_attribute_report(device, &lines, self.framing, self.policy)
    }
}

pub fn parse_attribute_report<S: AsRef<str>>(
    device: &Device,
    lines: &[S],
    framing: Framing,
    policy: ParsePolicy,
) -> Result<AttributeMap, CollectionError> {
    let rows: Vec<&str> = match framing {
        Framing::Fixed => data_section(lines),
        Framing::Detect => lines
            .iter()
            .map(S::as_ref)
            .filter(|line| attribute_row_pattern().is_match(line))
            .collect(),
    }
    .into_iter()
    .filter(|line| !line.trim().is_empty())
    .collect();

    if !rows.iter().any(|line| starts_with_attribute_id(line)) {
        debug!("{} reported no attribute rows", device);
        return Ok(AttributeMap::new());
    }

    let mut attributes = AttributeMap::new();
    for line in rows {
        match parse_row(line) {
            Ok((name, attribute)) => {
                attributes.insert(name, attribute);
            }
            Err(reason) => match policy {
                ParsePolicy::Strict => {
                    return Err(CollectionError::Parse {
                        device: device.to_string(),
                        line: line.to_string(),
                        reason,
                    })
                }
                ParsePolicy::Lenient => {
                    warn!("Skipping malformed attribute row of {}: {} ({:?})", device, reason, line)
                }
            },
        }
    }

    Ok(attributes)
}

fn data_section<S: AsRef<str>>(lines: &[S]) -> Vec<&str> {
    if lines.len() <= HEADER_LINES + FOOTER_LINES {
        return Vec::new();
    }
    lines[HEADER_LINES..lines.len() - FOOTER_LINES]
        .iter()
        .map(S::as_ref)
        .collect()
}

fn starts_with_attribute_id(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .map_or(false, |id| id.parse::<u32>().is_ok())
}

fn parse_row(line: &str) -> Result<(String, SmartAttribute), String> {
    let cols: Vec<&str> = line.split_whitespace().collect();
    if cols.len() < MIN_COLUMNS {
        return Err(format!(
            "expected at least {} columns, found {}",
            MIN_COLUMNS,
            cols.len()
        ));
    }

    let raw_value = cols[RAW_VALUE_COLUMN]
        .parse::<i64>()
        .map_err(|e| format!("raw value {:?} is not an integer: {}", cols[RAW_VALUE_COLUMN], e))?;

    Ok((
        cols[NAME_COLUMN].to_string(),
        SmartAttribute {
            raw_value,
            when_failed: cols[WHEN_FAILED_COLUMN].to_string(),
        },
    ))
}
