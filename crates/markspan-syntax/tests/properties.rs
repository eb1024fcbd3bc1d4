//! Properties every parse result must have, checked over a spread of
//! well-formed and hostile inputs.

use markspan_syntax::{HeaderLevel, ParseResult, StyleKind, parse, tokenize};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::time::{Duration, Instant};

fn assert_well_formed(input: &str, result: &ParseResult) {
    let len = result.plain_text.len();
    assert!(
        len <= input.len(),
        "plain text longer than source for {input:?}"
    );

    for span in &result.spans {
        assert!(
            span.start <= span.end && span.end <= len,
            "span {span:?} out of bounds for {input:?}"
        );
        assert!(
            result.plain_text.is_char_boundary(span.start)
                && result.plain_text.is_char_boundary(span.end),
            "span {span:?} splits a character in {input:?}"
        );
    }

    for link in &result.links {
        assert!(
            link.range.start <= link.range.end && link.range.end <= len,
            "link {link:?} out of bounds for {input:?}"
        );
    }

    for pair in result.spans.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(
            a.start < b.start || (a.start == b.start && a.len() >= b.len()),
            "spans out of order: {a:?} then {b:?}"
        );
    }

    let inline: Vec<_> = result.spans.iter().filter(|s| s.kind.is_inline()).collect();
    for (i, a) in inline.iter().enumerate() {
        for b in &inline[i + 1..] {
            assert!(
                a.end <= b.start || b.end <= a.start,
                "inline spans overlap: {a:?} and {b:?}"
            );
        }
    }
}

#[rstest]
#[case("")]
#[case("\n\n\n")]
#[case("*")]
#[case("**")]
#[case("***")]
#[case("_*_*_*")]
#[case("[")]
#[case("](")]
#[case("[](\"\")")]
#[case("[a](b \"")]
#[case("#")]
#[case("# ")]
#[case("#######")]
#[case(">")]
#[case("> > >")]
#[case("\\")]
#[case("\\\\*a*")]
#[case("*a **b* c** d*")]
#[case("**a *b** c*")]
#[case("[*a](b)*")]
#[case("[**a**](b \"t\") **c")]
#[case("# *a\n> **b\n\n_c")]
#[case("ünïcödé *ëm* **strøng** [lïnk](ü)")]
#[case("\r\n*a*\r\n\r\n# b\r\n")]
#[case("\u{a0}*\u{a0}x\u{a0}*")]
#[case("!@#$%^&*()_+-=[]{}|;':\",./<>?")]
fn parse_is_total(#[case] input: &str) {
    let result = parse(input);
    assert_well_formed(input, &result);
}

#[test]
fn empty_input_yields_empty_result() {
    assert_eq!(parse(""), ParseResult::default());
}

#[test]
fn structural_markers_are_stripped() {
    let input = "## *a* **b** ***c*** _d_ __e__\n>> [f](g \"h\")";
    let result = parse(input);
    assert_well_formed(input, &result);
    assert_eq!(result.plain_text, "a b c d e\nf");
    for marker in ['*', '_', '#', '>', '[', ']', '(', ')', '"'] {
        assert!(
            !result.plain_text.contains(marker),
            "{marker:?} leaked into {:?}",
            result.plain_text
        );
    }
}

#[test]
fn escaped_and_unmatched_markers_stay() {
    let result = parse(r"\# \*a\* [b] (c) 2 * 3");
    assert_eq!(result.plain_text, "# *a* [b] (c) 2 * 3");
    assert!(result.spans.is_empty());
}

#[test]
fn spans_reference_output_not_source() {
    let input = "# **Hello** [world](https://example.com)";
    let result = parse(input);
    assert_eq!(result.plain_text, "Hello world");

    let strong = result
        .spans
        .iter()
        .find(|s| s.kind == StyleKind::Strong)
        .unwrap();
    assert_eq!(result.text_of(strong.range()), Some("Hello"));

    let header = result
        .spans
        .iter()
        .find(|s| s.kind == StyleKind::Header(HeaderLevel::H1))
        .unwrap();
    assert_eq!(header.range(), 0..11);

    assert_eq!(result.text_of(result.links[0].range.clone()), Some("world"));
}

#[test]
fn token_lines_are_monotonic() {
    let input = "# a\n\n> b *c*\nd\r\n[e](f)\n";
    let lines: Vec<u32> = tokenize(input).iter().map(|t| t.line).collect();
    assert!(lines.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(lines.first(), Some(&1));
    assert_eq!(lines.last(), Some(&5));
}

#[test]
fn repeated_parses_are_equal() {
    let input = "# T\n> *q* **[l](u \"t\")**\n\n***x** y*\n";
    let first = parse(input);
    for _ in 0..3 {
        assert_eq!(parse(input), first);
    }
}

#[test]
fn parses_on_many_threads() {
    let inputs = ["*a*", "**b**", "# c", "> d", "[e](f)"];
    let expected: Vec<_> = inputs.iter().map(|i| parse(i)).collect();

    let handles: Vec<_> = inputs
        .iter()
        .map(|input| {
            let input = input.to_string();
            std::thread::spawn(move || parse(&input))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, expected);
}

/// Fastest of a few runs, to keep scheduler noise out of the comparison.
fn parse_time(input: &str) -> Duration {
    (0..3)
        .map(|_| {
            let started = Instant::now();
            std::hint::black_box(parse(std::hint::black_box(input)));
            started.elapsed()
        })
        .min()
        .unwrap_or_default()
}

#[rstest]
#[case("[")]
#[case("[x")]
#[case("](")]
#[case("[a](x")]
#[case("[a](x \"")]
#[case("*a [")]
fn parse_time_grows_linearly(#[case] unit: &str) {
    let small = unit.repeat(20_000);
    let large = unit.repeat(160_000);

    let small_time = parse_time(&small).max(Duration::from_micros(100));
    let large_time = parse_time(&large);

    // Eight times the input; quadratic work would take about 64 times as long.
    let ratio = large_time.as_secs_f64() / small_time.as_secs_f64();
    assert!(
        ratio < 24.0,
        "{unit:?}: {small_time:?} for 20k repeats, {large_time:?} for 160k (x{ratio:.1})"
    );
}
