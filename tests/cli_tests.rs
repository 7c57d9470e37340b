use std::{
    fs,
    path::PathBuf,
    process::{Command, Output},
};

fn scratch_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("goose-cli-{}-{test}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_source(test: &str, file: &str, contents: &str) -> PathBuf {
    let path = scratch_dir(test).join(file);
    fs::write(&path, contents).unwrap();
    path
}

fn goose(args: &[&std::ffi::OsStr]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_goose"))
        .args(args)
        .env_remove("GOOSE_LOG")
        .output()
        .expect("spawn goose")
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

/// Assert a failed run with exactly one `error: ...` line on stderr.
fn assert_single_error(out: &Output, prefix: &str) -> String {
    assert!(!out.status.success());
    assert_eq!(out.status.code(), Some(1));
    let err = stderr(out);
    let lines: Vec<&str> = err.lines().collect();
    assert_eq!(lines.len(), 1, "{err}");
    assert!(lines[0].starts_with(prefix), "{err}");
    lines[0].to_string()
}

#[test]
fn run_prints_globals() {
    let src = write_source("run", "calc.gs", "x = 1 + 2 * 3;\n");
    let out = goose(&[src.as_os_str(), "--run".as_ref()]);
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(String::from_utf8_lossy(&out.stdout), "x = 7\n");
    assert!(out.stderr.is_empty());
}

#[test]
fn emit_ll_writes_ir_file() {
    let dir = scratch_dir("emit-ll");
    let src = write_source("emit-ll", "prog.gs", "answer = 6 * 7");
    let stem = dir.join("prog");
    let out = goose(&[
        src.as_os_str(),
        "--emit".as_ref(),
        "ll".as_ref(),
        "-o".as_ref(),
        stem.as_os_str(),
    ]);
    assert!(out.status.success(), "{}", stderr(&out));
    let text = fs::read_to_string(dir.join("prog.ll")).unwrap();
    assert!(text.contains("@answer = global i32 0"));
    assert!(text.contains("define void @main()"));
    assert!(!dir.join("prog.o").exists());
}

#[test]
fn wrong_extension_is_rejected() {
    let out = goose(&["prog.txt".as_ref()]);
    let line = assert_single_error(&out, "error: ");
    assert!(line.contains("not a .gs file"), "{line}");
}

#[test]
fn missing_file_is_reported() {
    let out = goose(&["no/such/prog.gs".as_ref()]);
    let line = assert_single_error(&out, "error: cannot read");
    assert!(line.contains("prog.gs"), "{line}");
}

#[test]
fn lex_error_names_the_character() {
    let src = write_source("lex", "bad.gs", "x = 3 # 4");
    let out = goose(&[src.as_os_str(), "--run".as_ref()]);
    let line = assert_single_error(&out, "error: lex error:");
    assert!(line.contains("'#'"), "{line}");
}

#[test]
fn syntax_error_names_the_token() {
    let src = write_source("syntax", "open.gs", "(1 + 2");
    let out = goose(&[src.as_os_str(), "--run".as_ref()]);
    let line = assert_single_error(&out, "error: syntax error:");
    assert!(line.contains("end of input"), "{line}");
}

#[test]
fn undefined_variable_is_a_codegen_error() {
    let src = write_source("undef", "y.gs", "y");
    let out = goose(&[src.as_os_str(), "--run".as_ref()]);
    assert_single_error(&out, "error: codegen error: undefined variable `y`");
}

#[test]
fn entry_name_as_variable_is_rejected() {
    let src = write_source("entry", "main.gs", "main = 1");
    let out = goose(&[src.as_os_str(), "--emit".as_ref(), "ll".as_ref()]);
    assert_single_error(&out, "error: codegen error:");
}

#[test]
fn division_by_zero_faults_at_runtime() {
    let src = write_source("div0", "div.gs", "x = 1 / (3 - 3)");
    let out = goose(&[src.as_os_str(), "--run".as_ref()]);
    let line = assert_single_error(&out, "error: program faulted");
    assert!(line.contains("division by zero"), "{line}");
}

#[cfg(not(feature = "llvm"))]
#[test]
fn missing_llc_is_reported() {
    let dir = scratch_dir("no-llc");
    let src = write_source("no-llc", "prog.gs", "x = 1");
    let stem = dir.join("prog");
    let out = Command::new(env!("CARGO_BIN_EXE_goose"))
        .args([
            src.as_os_str(),
            "--emit".as_ref(),
            "obj".as_ref(),
            "-o".as_ref(),
            stem.as_os_str(),
        ])
        .env_remove("GOOSE_LOG")
        .env("GOOSE_LLC", "goose-no-such-tool")
        .output()
        .expect("spawn goose");
    let line = assert_single_error(&out, "error: building");
    assert!(line.contains("goose-no-such-tool"), "{line}");
    // the text form is written before the tool runs
    assert!(dir.join("prog.ll").exists());
}

#[test]
fn input_is_required() {
    let out = goose(&[]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("<INPUT>"));
}
