use std::{
    fs,
    io::Write,
    path::PathBuf,
    process::{Command, Output, Stdio},
};

fn cborg(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cborg"))
        .args(args)
        .output()
        .unwrap()
}

fn cborg_stdin(args: &[&str], input: &[u8]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_cborg"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(input).unwrap();
    child.wait_with_output().unwrap()
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("cborg_cli_{}_{name}", std::process::id()))
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

const MAP_HEX: &str = "a4616101616282020363627566440102036165736d696c6564f09f9880";

const MAP_DIAG: &str = r#"a4                                                # map(4)
  61                                              #   string(1)
    61                                            #     "a"
  01                                              #   uint(1)
  61                                              #   string(1)
    62                                            #     "b"
  82                                              #   array(2)
    02                                            #     uint(2)
    03                                            #     uint(3)
  63                                              #   string(3)
    627566                                        #     "buf"
  44                                              #   bytes(4)
    01020361                                      #     "\x01\x02\x03a"
  65                                              #   string(5)
    736d696c65                                    #     "smile"
  64                                              #   string(4)
    f09f9880                                      #     "😀"
"#;

#[test]
fn hex2diag() {
    assert_eq!(stdout(&cborg(&["hex2diag", MAP_HEX])), MAP_DIAG);

    let output = cborg(&["hex2diag", "a4zz"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("hexadecimal"));
}

#[test]
fn narrow_width() {
    let out = stdout(&cborg(&["hex2diag", "--width", "20", "8201"]));
    assert_eq!(out, "82        # array(2)\n  01      #   uint(1)\n");
}

#[test]
fn diag_round_trip_through_files() {
    let bin = temp_path("round_trip.cbor");
    let copy = temp_path("round_trip_copy.cbor");

    stdout(&cborg(&["hex2bin", MAP_HEX, "-o", bin.to_str().unwrap()]));
    let diag = stdout(&cborg(&["bin2diag", bin.to_str().unwrap()]));
    assert_eq!(diag, MAP_DIAG);

    stdout(&cborg_stdin(&["diag2bin", "-o", copy.to_str().unwrap()], diag.as_bytes()));
    assert_eq!(fs::read(&bin).unwrap(), fs::read(&copy).unwrap());
    assert_eq!(stdout(&cborg(&["bin2hex", copy.to_str().unwrap()])), format!("{MAP_HEX}\n"));

    fs::remove_file(bin).unwrap();
    fs::remove_file(copy).unwrap();
}

#[test]
fn diag2hex_from_stdin() {
    let out = stdout(&cborg_stdin(&["diag2hex"], MAP_DIAG.as_bytes()));
    assert_eq!(out, format!("{MAP_HEX}\n"));

    let output = cborg_stdin(&["diag2hex"], b"82 # array\n  0g\n");
    assert!(!output.status.success());
}

#[test]
fn check() {
    let map = [0xa2, 0x61, 0x61, 0x01, 0x61, 0x62, 0x82, 0x02, 0x03];
    let out = stdout(&cborg_stdin(&["check"], &map));
    assert_eq!(out, "Object({\"a\": Int(1), \"b\": Array([Int(2), Int(3)])})\n");

    let out = stdout(&cborg_stdin(&["check"], &[0xc1, 0x1a, 0x51, 0x4b, 0x67, 0xb0]));
    assert_eq!(out, "Tag(1, Int(1363896240))\n");

    let out = stdout(&cborg_stdin(&["check", "--tag", "99"], &[0xd8, 0x63, 0xf6]));
    assert_eq!(out, "Tag(99, Null)\n");
    let output = cborg_stdin(&["check"], &[0xd8, 0x63, 0xf6]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("tag not supported (99)"));

    // overlong uint
    assert!(stdout(&cborg_stdin(&["check"], &[0x18, 0x01])).starts_with("Int(1)"));
    let output = cborg_stdin(&["check", "--strict"], &[0x18, 0x01]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("CBOR decode error:"));
}
