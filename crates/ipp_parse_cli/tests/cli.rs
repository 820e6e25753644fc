use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

const PROGRAM: &str = "\
.IPPcode22
# loops forever
LABEL top
WRITE string@tick
JUMP top
CALL missing
";

fn ipp_parse(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_ipp-parse"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("could not start ipp-parse");
    // usage errors exit before reading, a closed pipe is fine
    let _ = child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes());
    child.wait_with_output().expect("ipp-parse did not finish")
}

#[test]
fn test_xml_on_stdout() {
    let output = ipp_parse(&[], PROGRAM);
    assert_eq!(output.status.code(), Some(0));
    let xml = String::from_utf8(output.stdout).unwrap();
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
    assert!(xml.contains("\t<instruction order=\"4\" opcode=\"CALL\">\n"));
    assert!(xml.contains("\t\t<arg1 type=\"string\">tick</arg1>\n"));
}

#[test]
fn test_exit_codes() {
    for (src, code) in [
        ("", 0),
        ("foo\n", 21),
        (".IPPcode22\nBADOP\n", 22),
        (".IPPcode22\nMOVE GF@x\n", 23),
        (".IPPcode22\nWRITE string@a\\1\n", 23),
    ] {
        let output = ipp_parse(&[], src);
        assert_eq!(output.status.code(), Some(code), "{src:?}");
    }
}

#[test]
fn test_no_output_on_error() {
    let output = ipp_parse(&[], ".IPPcode22\nBREAK\nBREAK GF@x\n");
    assert_eq!(output.status.code(), Some(23));
    assert!(output.stdout.is_empty());
    assert!(!output.stderr.is_empty());
}

#[test]
fn test_input_file() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("prog.ippcode22");
    fs::write(&source, PROGRAM).unwrap();
    let output = ipp_parse(&["--input", source.to_str().unwrap()], "");
    assert_eq!(output.status.code(), Some(0));
    assert!(!output.stdout.is_empty());

    let missing = dir.path().join("missing.ippcode22");
    let output = ipp_parse(&["--input", missing.to_str().unwrap()], "");
    assert_eq!(output.status.code(), Some(11));
}

#[test]
fn test_stats_files() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.txt");
    let second = dir.path().join("second.txt");
    let first_option = format!("--stats={}", first.display());
    let output = ipp_parse(
        &[
            &first_option,
            "--loc",
            "--comments",
            "--labels",
            "--jumps",
            "--stats",
            second.to_str().unwrap(),
            "--backjumps",
            "--fwjumps",
            "--badjumps",
            "--backjumps",
        ],
        PROGRAM,
    );
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(fs::read_to_string(&first).unwrap(), "4\n1\n1\n2\n");
    assert_eq!(fs::read_to_string(&second).unwrap(), "1\n0\n1\n");
}

#[test]
fn test_usage_errors() {
    for args in [
        &["--unknown"][..],
        &["--loc", "--stats", "out.txt"],
        &["--stats", "out.txt", "--lines"],
        &["--help", "--stats", "out.txt"],
        &["-v", "--help"],
    ] {
        let output = ipp_parse(args, PROGRAM);
        assert_eq!(output.status.code(), Some(10), "{args:?}");
        assert!(output.stdout.is_empty(), "{args:?}");
    }
    let output = ipp_parse(&["--help"], "");
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_duplicate_stats_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("stats.txt");
    let file = file.to_str().unwrap();
    let output = ipp_parse(
        &["--stats", file, "--loc", "--stats", file, "--jumps"],
        PROGRAM,
    );
    assert_eq!(output.status.code(), Some(12));
    assert!(!std::path::Path::new(file).exists());
}

#[cfg(target_os = "linux")]
#[test]
fn test_unwritable_stdout() {
    let full = fs::File::options()
        .write(true)
        .open("/dev/full")
        .expect("/dev/full is available on linux");
    let mut child = Command::new(env!("CARGO_BIN_EXE_ipp-parse"))
        .stdin(Stdio::piped())
        .stdout(Stdio::from(full))
        .stderr(Stdio::piped())
        .spawn()
        .expect("could not start ipp-parse");
    let _ = child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(PROGRAM.as_bytes());
    let output = child.wait_with_output().expect("ipp-parse did not finish");
    assert_eq!(output.status.code(), Some(99));
    assert!(!output.stderr.is_empty());
}
