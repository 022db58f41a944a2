//! Volume descriptors and the fstab entry grammar.
//!
//! An entry has the form
//!
//! ```text
//! <source>:<path>:<driver>[:<flags>[:<options>[:<control-options>]]]
//! ```
//!
//! Fields are borrowed straight out of the entry, so a parsed [`Volume`]
//! lives exactly as long as the string it was parsed from.

use crate::error::AutomountError;
use std::fmt;

pub const VOLUME_ARGS_SEP: char = ':';

/// Driver name that selects archive extraction instead of a mount.
pub const EXTRACT_DRIVER: &str = "extract";

/// One requested mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Volume<'a> {
    /// Source device; empty when the filesystem needs none.
    pub source: &'a str,
    /// Absolute mount point.
    pub path: &'a str,
    pub driver: &'a str,
    pub flags: u64,
    /// Filesystem specific options, handed to the driver untouched.
    pub options: Option<&'a str>,
    /// Comma separated directives handled by the automounter itself.
    pub control_options: Option<&'a str>,
}

impl<'a> Volume<'a> {
    /// Tokenize one fstab entry.
    pub fn parse(entry: &'a str) -> Result<Self, AutomountError> {
        let mut fields = Fields::new(entry);

        let source = fields.next_field();
        let path = fields.next_field();
        let driver = fields.next_field();
        let flags = fields.next_field();
        let options = fields.next_field();
        let control_options = fields.next_field();

        if let Some(rest) = fields.rest {
            tracing::warn!("vfs.fstab: Ignoring trailing fields {:?} in {:?}", rest, entry);
        }

        let (Some(path), Some(driver)) = (path, non_empty(driver)) else {
            tracing::error!(
                "vfs.fstab: Incomplete entry: Require mountpoint and filesystem driver"
            );
            return Err(AutomountError::MalformedEntry(entry.to_string()));
        };

        if !path.starts_with('/') {
            tracing::error!("vfs.fstab: Mountpoint {:?} is not absolute", path);
            return Err(AutomountError::InvalidPath(path.to_string()));
        }

        let volume = Volume {
            source: source.unwrap_or(""),
            path,
            driver,
            flags: non_empty(flags).map(parse_flags).unwrap_or(0),
            options: non_empty(options),
            control_options: non_empty(control_options),
        };

        tracing::debug!("vfs.fstab: Parsed: {}", volume);
        Ok(volume)
    }

    pub fn is_extract(&self) -> bool {
        self.driver == EXTRACT_DRIVER
    }

    /// Source as shown in logs.
    pub fn device(&self) -> &'a str {
        if self.source.is_empty() {
            "none"
        } else {
            self.source
        }
    }

    pub fn is_root(&self) -> bool {
        self.path == "/"
    }
}

impl fmt::Display for Volume<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{:#x}:{}:{}",
            self.device(),
            self.path,
            self.driver,
            self.flags,
            self.options.unwrap_or(""),
            self.control_options.unwrap_or("")
        )
    }
}

/// Positional field splitter.
///
/// `next_field` yields `Some("")` for a field that is present but empty and
/// `None` once the entry is exhausted.
struct Fields<'a> {
    rest: Option<&'a str>,
}

impl<'a> Fields<'a> {
    fn new(entry: &'a str) -> Self {
        Self { rest: Some(entry) }
    }

    fn next_field(&mut self) -> Option<&'a str> {
        let rest = self.rest?;
        match rest.split_once(VOLUME_ARGS_SEP) {
            Some((field, remainder)) => {
                self.rest = Some(remainder);
                Some(field)
            }
            None => {
                self.rest = None;
                Some(rest)
            }
        }
    }
}

fn non_empty(field: Option<&str>) -> Option<&str> {
    field.filter(|f| !f.is_empty())
}

/// Parse mount flags the way `strtol(text, NULL, 0)` does.
///
/// Accepts an optional sign, a `0x` prefix for hex, a leading `0` for octal
/// and decimal otherwise. Parsing stops at the first invalid character; text
/// without any digits yields zero. Negative values wrap to their unsigned
/// representation and out of range values saturate.
pub fn parse_flags(text: &str) -> u64 {
    // C locale isspace(), which unlike char::is_ascii_whitespace includes \v
    let s = text.trim_start_matches([' ', '\t', '\n', '\x0b', '\x0c', '\r']);
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let hex = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .filter(|h| h.starts_with(|c: char| c.is_ascii_hexdigit()));

    let (radix, digits, mut consumed) = match hex {
        Some(h) => (16, h, true),
        None if s.starts_with('0') => (8, &s[1..], true),
        None => (10, s, false),
    };

    let mut value: u64 = 0;
    let mut overflow = false;
    let mut end = digits.len();
    for (idx, c) in digits.char_indices() {
        let Some(digit) = c.to_digit(radix) else {
            end = idx;
            break;
        };
        consumed = true;
        match value
            .checked_mul(u64::from(radix))
            .and_then(|v| v.checked_add(u64::from(digit)))
        {
            Some(v) => value = v,
            None => overflow = true,
        }
    }

    if !consumed || end < digits.len() {
        tracing::warn!(
            "vfs.fstab: Flags {:?} are not a valid number, using {:#x}",
            text,
            if consumed { value } else { 0 }
        );
    }
    if !consumed {
        return 0;
    }

    let limit = if negative { 1u64 << 63 } else { i64::MAX as u64 };
    if overflow || value > limit {
        value = limit;
    }

    if negative { value.wrapping_neg() } else { value }
}
