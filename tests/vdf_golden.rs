use std::fs;
use std::io::Write;
use steam_patcher::vdf::{CompatEditor, CompatPlan};

fn load_fixture(name: &str) -> String {
    fs::read_to_string(format!("tests/fixtures/{name}"))
        .unwrap_or_else(|err| panic!("failed to load fixture {name}: {err}"))
}

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut temp = tempfile::NamedTempFile::new().expect("tempfile");
    temp.write_all(contents.as_bytes()).expect("write temp");
    temp.flush().expect("flush temp");
    temp
}

#[test]
fn replace_tool_name_fixture() {
    let input = load_fixture("config.vdf.input");
    let expected = load_fixture("config.vdf.expected");
    let temp = write_temp(&input);

    let editor = CompatEditor::from_path(temp.path(), &input).expect("editor");
    let plan = editor.plan_set_compat_tool(489830, "proton-9").expect("plan");
    match plan {
        CompatPlan::Edit(edit) => {
            let _ = edit.apply().expect("apply edit");
        }
        CompatPlan::NoOp(reason) => panic!("unexpected no-op: {reason}"),
    }

    let output = fs::read_to_string(temp.path()).expect("read output");
    assert_eq!(output, expected);

    let editor = CompatEditor::from_path(temp.path(), &output).expect("editor");
    let plan = editor.plan_set_compat_tool(489830, "proton-9").expect("plan");
    match plan {
        CompatPlan::NoOp(_) => {}
        CompatPlan::Edit(_) => panic!("expected no-op on second application"),
    }
}

#[test]
fn fixture_parse_does_not_disturb_offsets() {
    let input = load_fixture("config.vdf.input");
    let editor = CompatEditor::from_path("config.vdf", &input).expect("editor");

    // Planning against a different app ID must leave the existing entry's
    // bytes alone: the edit is a pure insertion
    let plan = editor.plan_set_compat_tool(123456789, "proton-9").expect("plan");
    match plan {
        CompatPlan::Edit(edit) => {
            assert_eq!(edit.byte_start, edit.byte_end);
            assert!(edit.new_text.contains("\"123456789\""));
        }
        CompatPlan::NoOp(reason) => panic!("unexpected no-op: {reason}"),
    }
}
