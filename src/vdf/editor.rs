//! Surgical editor for Steam's CompatToolMapping in config.vdf.
//!
//! Edits are planned against byte offsets from a fresh parse of the current
//! file content and expressed as a single verified [`Edit`]. Every byte
//! outside the spliced span is left untouched, so comments, indentation, and
//! line endings elsewhere in the file survive the edit. One plan per editor
//! instance; a second edit requires re-reading and re-parsing the file.

use crate::edit::{Edit, EditResult};
use crate::vdf::errors::VdfError;
use crate::vdf::lexer::tokenize;
use crate::vdf::parser::{parse_root, Entry, Object};
use std::fs;
use std::path::{Path, PathBuf};

/// Planned outcome of a compat-tool edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompatPlan {
    Edit(Edit),
    NoOp(String),
}

pub struct CompatEditor {
    file: PathBuf,
    content: String,
    root: Object,
}

impl CompatEditor {
    /// Tokenize and parse a fresh snapshot of the file content.
    pub fn from_path(path: impl Into<PathBuf>, content: &str) -> Result<Self, VdfError> {
        let tokens = tokenize(content)?;
        let root = parse_root(&tokens)?;
        Ok(Self {
            file: path.into(),
            content: content.to_string(),
            root,
        })
    }

    /// Plan the edit that maps `app_id` to `tool` under
    /// `InstallConfigStore.Software.Valve.Steam.CompatToolMapping`.
    ///
    /// Three cases, in order of preference: the mapping entry exists and its
    /// `name` value is replaced in place; the section exists and a new entry
    /// block is inserted before its closing brace; the section itself is
    /// synthesized before `Steam`'s closing brace.
    pub fn plan_set_compat_tool(&self, app_id: u32, tool: &str) -> Result<CompatPlan, VdfError> {
        let install = descend(&self.root, "InstallConfigStore", "InstallConfigStore")?;
        let software = descend(install, "Software", "InstallConfigStore.Software")?;
        // Steam writes both `Valve` and `valve` in the wild
        let valve = software
            .get("Valve")
            .and_then(|entry| entry.as_object())
            .or_else(|| software.get("valve").and_then(|entry| entry.as_object()))
            .ok_or_else(|| VdfError::SectionNotFound {
                path: "InstallConfigStore.Software.Valve".to_string(),
            })?;
        let steam = descend(valve, "Steam", "InstallConfigStore.Software.Valve.Steam")?;

        let newline = detect_newline(&self.content);
        let app_id_text = app_id.to_string();

        let compat = steam
            .get("CompatToolMapping")
            .and_then(|entry| entry.as_object());
        let Some(compat) = compat else {
            return self.plan_insert_mapping_section(steam, &app_id_text, tool, newline);
        };

        let mapping = compat.get(&app_id_text).and_then(|entry| {
            entry
                .as_object()
                .map(|object| (entry, object))
        });
        let Some((mapping_entry, mapping_object)) = mapping else {
            return self.plan_insert_entry_block(compat, &app_id_text, tool, newline);
        };

        self.plan_update_entry(mapping_entry, mapping_object, tool, newline)
    }

    /// Case A: the mapping entry exists. Replace its `name` value span, or
    /// insert a `name` line before the entry's closing brace if absent.
    fn plan_update_entry(
        &self,
        mapping_entry: &Entry,
        object: &Object,
        tool: &str,
        newline: &str,
    ) -> Result<CompatPlan, VdfError> {
        if let Some(name_entry) = object
            .get("name")
            .filter(|entry| entry.as_str().is_some() && entry.value_end > entry.value_start)
        {
            let replacement = format!("\"{}\"", escape_vdf(tool));
            let current = &self.content[name_entry.value_start..name_entry.value_end];
            if current == replacement {
                return Ok(CompatPlan::NoOp(format!(
                    "compat tool already set to {tool:?}"
                )));
            }
            return Ok(CompatPlan::Edit(Edit::new(
                self.file.clone(),
                name_entry.value_start,
                name_entry.value_end,
                replacement,
                current,
            )));
        }

        let brace_end = closing_brace(object, mapping_entry.value_start)?;
        let entry_indent = line_indent(&self.content, mapping_entry.key_start);
        let field_indent = match object.entries.first() {
            Some(first) => line_indent(&self.content, first.key_start),
            None => format!("{entry_indent}{}", indent_unit(&entry_indent)),
        };
        let mut insertion = String::new();
        if needs_leading_newline(&self.content, brace_end) {
            insertion.push_str(newline);
        }
        insertion.push_str(&format!(
            "{field_indent}\"name\" \"{}\"{newline}",
            escape_vdf(tool)
        ));
        Ok(CompatPlan::Edit(self.insertion(brace_end, insertion)))
    }

    /// Case B: the section exists but has no entry for this app. Insert a
    /// full entry block before the section's closing brace.
    fn plan_insert_entry_block(
        &self,
        compat: &Object,
        app_id_text: &str,
        tool: &str,
        newline: &str,
    ) -> Result<CompatPlan, VdfError> {
        let brace_end = closing_brace(compat, 0)?;

        // Indentation comes from an existing sibling entry where one exists,
        // otherwise from the section's own line plus one unit
        let (entry_indent, field_indent) = match compat.entries.first() {
            Some(first) => {
                let entry_indent = line_indent(&self.content, first.key_start);
                let field_indent = match first.as_object().and_then(|o| o.entries.first()) {
                    Some(grandchild) => line_indent(&self.content, grandchild.key_start),
                    None => format!("{entry_indent}{}", indent_unit(&entry_indent)),
                };
                (entry_indent, field_indent)
            }
            None => {
                let section_start = compat.brace_start.unwrap_or(brace_end);
                let mapping_indent = line_indent(&self.content, section_start);
                let unit = indent_unit(&mapping_indent);
                let entry_indent = format!("{mapping_indent}{unit}");
                let field_indent = format!("{entry_indent}{unit}");
                (entry_indent, field_indent)
            }
        };

        let mut insertion = String::new();
        if needs_leading_newline(&self.content, brace_end) {
            insertion.push_str(newline);
        }
        insertion.push_str(&compat_entry_block(
            app_id_text,
            tool,
            &entry_indent,
            &field_indent,
            newline,
        ));
        Ok(CompatPlan::Edit(self.insertion(brace_end, insertion)))
    }

    /// Case C: no CompatToolMapping at all. Synthesize the section wrapper
    /// plus the entry block before `Steam`'s closing brace.
    fn plan_insert_mapping_section(
        &self,
        steam: &Object,
        app_id_text: &str,
        tool: &str,
        newline: &str,
    ) -> Result<CompatPlan, VdfError> {
        let brace_end = closing_brace(steam, 0)?;

        let section_indent = match steam.entries.first() {
            Some(first) => line_indent(&self.content, first.key_start),
            None => {
                let steam_start = steam.brace_start.unwrap_or(brace_end);
                let steam_indent = line_indent(&self.content, steam_start);
                format!("{steam_indent}{}", indent_unit(&steam_indent))
            }
        };
        let unit = indent_unit(&section_indent);
        let entry_indent = format!("{section_indent}{unit}");
        let field_indent = format!("{entry_indent}{unit}");

        let mut insertion = String::new();
        if needs_leading_newline(&self.content, brace_end) {
            insertion.push_str(newline);
        }
        insertion.push_str(&format!("{section_indent}\"CompatToolMapping\"{newline}"));
        insertion.push_str(&format!("{section_indent}{{{newline}"));
        insertion.push_str(&compat_entry_block(
            app_id_text,
            tool,
            &entry_indent,
            &field_indent,
            newline,
        ));
        insertion.push_str(&format!("{section_indent}}}{newline}"));
        Ok(CompatPlan::Edit(self.insertion(brace_end, insertion)))
    }

    fn insertion(&self, at: usize, text: String) -> Edit {
        Edit::new(self.file.clone(), at, at, text, "")
    }
}

fn descend<'a>(object: &'a Object, key: &str, full_path: &str) -> Result<&'a Object, VdfError> {
    object
        .get(key)
        .and_then(|entry| entry.as_object())
        .ok_or_else(|| VdfError::SectionNotFound {
            path: full_path.to_string(),
        })
}

/// Closing-brace offset of a nested object. The parser guarantees this is
/// present for any object reached through an entry; the fallback error keeps
/// the invariant checked instead of assumed.
fn closing_brace(object: &Object, opened_at: usize) -> Result<usize, VdfError> {
    object
        .brace_end
        .ok_or(VdfError::UnclosedObject { offset: opened_at })
}

/// Read, plan, and apply the compat-tool mapping for one app.
///
/// A planned no-op (tool already set) is reported as `AlreadyApplied`.
pub fn set_compat_tool(path: &Path, app_id: u32, tool: &str) -> Result<EditResult, VdfError> {
    let content = fs::read_to_string(path)?;
    let editor = CompatEditor::from_path(path, &content)?;
    match editor.plan_set_compat_tool(app_id, tool)? {
        CompatPlan::Edit(edit) => Ok(edit.apply()?),
        CompatPlan::NoOp(_) => Ok(EditResult::AlreadyApplied {
            file: path.to_path_buf(),
        }),
    }
}

/// Escape `\` and `"` for embedding in a quoted VDF string.
pub fn escape_vdf(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch == '\\' || ch == '"' {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Leading whitespace of the line containing byte offset `pos`.
fn line_indent(text: &str, pos: usize) -> String {
    let bytes = text.as_bytes();
    let mut line_start = match text[..pos.min(text.len())].rfind('\n') {
        Some(idx) => idx + 1,
        None => 0,
    };
    if bytes.get(line_start) == Some(&b'\r') {
        line_start += 1;
    }
    let mut end = line_start;
    while matches!(bytes.get(end), Some(b' ') | Some(b'\t')) {
        end += 1;
    }
    text[line_start..end].to_string()
}

/// Tab if the base indentation contains one, four spaces otherwise.
fn indent_unit(base_indent: &str) -> &'static str {
    if base_indent.contains('\t') {
        "\t"
    } else {
        "    "
    }
}

/// Newline style is inferred from the file: the first `\r\n` wins.
fn detect_newline(text: &str) -> &'static str {
    if text.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

/// Insertions before a closing brace only prepend a newline when the byte
/// before the brace is not already one, to avoid doubled blank lines.
fn needs_leading_newline(text: &str, brace_end: usize) -> bool {
    brace_end > 0 && !matches!(text.as_bytes()[brace_end - 1], b'\n' | b'\r')
}

fn compat_entry_block(
    app_id_text: &str,
    tool: &str,
    entry_indent: &str,
    field_indent: &str,
    newline: &str,
) -> String {
    let mut block = String::new();
    block.push_str(&format!("{entry_indent}\"{app_id_text}\"{newline}"));
    block.push_str(&format!("{entry_indent}{{{newline}"));
    block.push_str(&format!(
        "{field_indent}\"name\" \"{}\"{newline}",
        escape_vdf(tool)
    ));
    block.push_str(&format!("{field_indent}\"config\" \"\"{newline}"));
    block.push_str(&format!("{field_indent}\"priority\" \"250\"{newline}"));
    block.push_str(&format!("{entry_indent}}}{newline}"));
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_vdf() {
        assert_eq!(escape_vdf("plain"), "plain");
        assert_eq!(escape_vdf(r#"a"b\c"#), r#"a\"b\\c"#);
    }

    #[test]
    fn test_line_indent() {
        let text = "a\n\t\t\"key\" \"v\"\n";
        assert_eq!(line_indent(text, text.find("\"key\"").unwrap()), "\t\t");
        assert_eq!(line_indent(text, 0), "");
    }

    #[test]
    fn test_line_indent_crlf() {
        let text = "a\r\n    \"key\" \"v\"\r\n";
        assert_eq!(line_indent(text, text.find("\"key\"").unwrap()), "    ");
    }

    #[test]
    fn test_indent_unit() {
        assert_eq!(indent_unit("\t\t"), "\t");
        assert_eq!(indent_unit("        "), "    ");
        assert_eq!(indent_unit(""), "    ");
    }

    #[test]
    fn test_detect_newline() {
        assert_eq!(detect_newline("a\nb\n"), "\n");
        assert_eq!(detect_newline("a\r\nb\r\n"), "\r\n");
        assert_eq!(detect_newline(""), "\n");
    }

    #[test]
    fn missing_section_reports_full_path() {
        let content = "\"InstallConfigStore\"\n{\n}\n";
        let editor = CompatEditor::from_path("config.vdf", content).unwrap();
        let err = editor.plan_set_compat_tool(1, "proton").unwrap_err();
        match err {
            VdfError::SectionNotFound { path } => {
                assert_eq!(path, "InstallConfigStore.Software");
            }
            other => panic!("expected SectionNotFound, got {other:?}"),
        }
    }

    #[test]
    fn lowercase_valve_is_accepted() {
        let content = "\"InstallConfigStore\"\n{\n\t\"Software\"\n\t{\n\t\t\"valve\"\n\t\t{\n\t\t\t\"Steam\"\n\t\t\t{\n\t\t\t}\n\t\t}\n\t}\n}\n";
        let editor = CompatEditor::from_path("config.vdf", content).unwrap();
        let plan = editor.plan_set_compat_tool(42, "proton-9").unwrap();
        assert!(matches!(plan, CompatPlan::Edit(_)));
    }

    #[test]
    fn noop_when_tool_already_set() {
        let content = concat!(
            "\"InstallConfigStore\"\n{\n\t\"Software\"\n\t{\n\t\t\"Valve\"\n\t\t{\n",
            "\t\t\t\"Steam\"\n\t\t\t{\n\t\t\t\t\"CompatToolMapping\"\n\t\t\t\t{\n",
            "\t\t\t\t\t\"42\"\n\t\t\t\t\t{\n\t\t\t\t\t\t\"name\" \"proton-9\"\n",
            "\t\t\t\t\t}\n\t\t\t\t}\n\t\t\t}\n\t\t}\n\t}\n}\n"
        );
        let editor = CompatEditor::from_path("config.vdf", content).unwrap();
        let plan = editor.plan_set_compat_tool(42, "proton-9").unwrap();
        assert!(matches!(plan, CompatPlan::NoOp(_)));
    }
}
