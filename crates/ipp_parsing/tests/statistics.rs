use ipp_parsing::parse_str;
use ipp_parsing::stats::{Metric, StatRequest};
use std::path::Path;
use test_log::test;

mod common;

/// Pads `lines` so that each `(row, text)` lands on its row
fn program(lines: &[(usize, &str)]) -> String {
    let mut src = String::from(".IPPcode22\n");
    let mut row = 2;
    for &(target, text) in lines {
        while row < target {
            src.push('\n');
            row += 1;
        }
        src.push_str(text);
        src.push('\n');
        row += 1;
    }
    src
}

#[test]
fn test_jumps_resolve_against_last_definition() {
    let src = program(&[
        (3, "JUMP twice"),
        (5, "LABEL twice"),
        (8, "JUMPIFEQ twice GF@a GF@b"),
        (12, "LABEL twice"),
        (20, "JUMPIFNEQ twice int@1 nil@nil"),
    ]);
    let (program, metrics) = common::parse_file(&src).unwrap();
    let rows = program
        .instructions()
        .iter()
        .map(|i| i.position().row())
        .collect::<Vec<_>>();
    assert_eq!(rows, [3, 5, 8, 12, 20]);
    assert_eq!(metrics.forward_jumps, 2);
    assert_eq!(metrics.backward_jumps, 1);
    assert_eq!(metrics.dangling_jumps, 0);
    assert_eq!(metrics.distinct_labels, 1);
}

#[test]
fn test_dangling_target_counted_once() {
    let src = program(&[
        (2, "JUMP nowhere"),
        (3, "JUMP nowhere"),
        (4, "CALL nowhere"),
        (5, "RETURN"),
    ]);
    let (_, metrics) = parse_str(&src).unwrap();
    assert_eq!(metrics.dangling_jumps, 1);
    assert_eq!(metrics.jump_instructions, 4);
}

#[test]
fn test_independent_runs() {
    let src = program(&[(2, "LABEL a"), (3, "JUMP a")]);
    let (_, first) = parse_str(&src).unwrap();
    let (_, second) = parse_str(&src).unwrap();
    assert_eq!(first, second);
    assert_eq!(second.distinct_labels, 1);
    assert_eq!(second.backward_jumps, 1);
}

#[test]
fn test_report_only_requested() {
    let src = program(&[(2, "# one"), (3, "BREAK # two"), (4, "JUMP missing")]);
    let (_, metrics) = parse_str(&src).unwrap();

    let mut request = StatRequest::new();
    request
        .add("first", [Metric::Comments, Metric::BadJumps])
        .unwrap();
    request.add("second", [Metric::Loc]).unwrap();
    let report = metrics.report(&request);
    let entries = report.iter().collect::<Vec<_>>();
    assert_eq!(
        entries,
        [
            (
                Path::new("first"),
                &[(Metric::Comments, 2), (Metric::BadJumps, 1)][..]
            ),
            (Path::new("second"), &[(Metric::Loc, 2)][..]),
        ]
    );
}
