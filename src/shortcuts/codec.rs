//! Bit-exact codec for Steam's binary shortcuts.vdf.
//!
//! The file is `0x00 "shortcuts" 0x00`, then per record `0x00 <decimal
//! index> 0x00 <fields> 0x08 0x08`, closed by one extra `0x08 0x08`. Field
//! tags: `0x02` number (name, NUL, u32 LE), `0x01` string (name, NUL, value,
//! NUL), `0x00` nested list (name, NUL, children inline). Records are kept
//! as opaque byte spans; only the `appid` field is ever pulled out of one.

use crate::shortcuts::errors::ShortcutError;

const NUL: u8 = 0x00;
const TAG_STRING: u8 = 0x01;
const TAG_NUMBER: u8 = 0x02;
const ENTRY_END: u8 = 0x08;
const HEADER_NAME: &[u8] = b"shortcuts";

/// One binary-encoded shortcut entry, without its index framing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutRecord {
    bytes: Vec<u8>,
}

impl ShortcutRecord {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Scan for the `0x02 "appid" 0x00` pattern and read the 4 bytes after
    /// it as little-endian. A record without the field (or with the field
    /// truncated) has no app ID; that is not an error.
    pub fn app_id(&self) -> Option<u32> {
        const PATTERN: [u8; 7] = [TAG_NUMBER, b'a', b'p', b'p', b'i', b'd', NUL];
        let at = self
            .bytes
            .windows(PATTERN.len())
            .position(|window| window == PATTERN)?;
        let value = self.bytes.get(at + PATTERN.len()..at + PATTERN.len() + 4)?;
        Some(u32::from_le_bytes([value[0], value[1], value[2], value[3]]))
    }
}

fn push_number_field(out: &mut Vec<u8>, name: &str, value: u32) {
    out.push(TAG_NUMBER);
    out.extend_from_slice(name.as_bytes());
    out.push(NUL);
    out.extend_from_slice(&value.to_le_bytes());
}

fn push_string_field(out: &mut Vec<u8>, name: &str, value: &str) {
    out.push(TAG_STRING);
    out.extend_from_slice(name.as_bytes());
    out.push(NUL);
    out.extend_from_slice(value.as_bytes());
    out.push(NUL);
}

fn push_string_list_field(out: &mut Vec<u8>, name: &str, values: &[String]) {
    out.push(NUL);
    out.extend_from_slice(name.as_bytes());
    out.push(NUL);
    for (index, value) in values.iter().enumerate() {
        push_string_field(out, &index.to_string(), value);
    }
}

/// Encode one shortcut record with Steam's full field set in its fixed
/// order. Fields the caller does not control are zero or empty.
pub fn encode_record(
    app_id: u32,
    name: &str,
    exe: &str,
    start_dir: &str,
    launch_options: &str,
) -> ShortcutRecord {
    let mut out = Vec::new();
    push_number_field(&mut out, "appid", app_id);
    push_string_field(&mut out, "AppName", name);
    push_string_field(&mut out, "Exe", exe);
    push_string_field(&mut out, "StartDir", start_dir);
    push_string_field(&mut out, "icon", "");
    push_string_field(&mut out, "ShortcutPath", "");
    push_string_field(&mut out, "LaunchOptions", launch_options);
    push_number_field(&mut out, "IsHidden", 0);
    push_number_field(&mut out, "AllowDesktopConfig", 0);
    push_number_field(&mut out, "AllowOverlay", 0);
    push_number_field(&mut out, "OpenVR", 0);
    push_number_field(&mut out, "Devkit", 0);
    push_string_field(&mut out, "DevkitGameID", "");
    push_number_field(&mut out, "DevkitOverrideAppID", 0);
    push_number_field(&mut out, "LastPlayTime", 0);
    push_string_field(&mut out, "FlatpakAppID", "");
    push_string_list_field(&mut out, "tags", &[]);
    ShortcutRecord::from_bytes(out)
}

fn find_entry_end(data: &[u8], start: usize) -> Option<usize> {
    (start..data.len().saturating_sub(1))
        .find(|&i| data[i] == ENTRY_END && data[i + 1] == ENTRY_END)
}

/// Decode a shortcuts.vdf buffer into its record byte spans.
///
/// An empty buffer decodes to an empty list; a missing file is an empty set.
pub fn decode(data: &[u8]) -> Result<Vec<ShortcutRecord>, ShortcutError> {
    let mut records = Vec::new();
    if data.is_empty() {
        return Ok(records);
    }

    if data.len() < HEADER_NAME.len() + 2 || data[0] != NUL {
        return Err(ShortcutError::InvalidHeader);
    }
    if &data[1..1 + HEADER_NAME.len()] != HEADER_NAME || data[1 + HEADER_NAME.len()] != NUL {
        return Err(ShortcutError::InvalidHeader);
    }

    let mut pos = 1 + HEADER_NAME.len() + 1;
    while pos < data.len() {
        // The closing 0x08 0x08 pair ends the set
        if data[pos] == ENTRY_END && data.get(pos + 1) == Some(&ENTRY_END) {
            return Ok(records);
        }
        if data[pos] != NUL {
            return Err(ShortcutError::MalformedEntry { offset: pos });
        }
        let index_start = pos + 1;
        let mut index_end = index_start;
        while index_end < data.len() && data[index_end] != NUL {
            index_end += 1;
        }
        if index_end >= data.len() {
            return Err(ShortcutError::MalformedEntry { offset: index_start });
        }
        pos = index_end + 1;
        let entry_end = find_entry_end(data, pos)
            .ok_or(ShortcutError::MalformedEntry { offset: pos })?;
        records.push(ShortcutRecord::from_bytes(data[pos..entry_end].to_vec()));
        pos = entry_end + 2;
    }
    Ok(records)
}

/// Re-serialize the full record set with fresh decimal indices.
///
/// Exact inverse of [`decode`]: `decode(&serialize(r))` yields `r` again,
/// byte for byte.
pub fn serialize(records: &[ShortcutRecord]) -> Vec<u8> {
    let mut out = Vec::new();
    out.push(NUL);
    out.extend_from_slice(HEADER_NAME);
    out.push(NUL);
    for (index, record) in records.iter().enumerate() {
        out.push(NUL);
        out.extend_from_slice(index.to_string().as_bytes());
        out.push(NUL);
        out.extend_from_slice(record.as_bytes());
        out.push(ENTRY_END);
        out.push(ENTRY_END);
    }
    out.push(ENTRY_END);
    out.push(ENTRY_END);
    out
}
