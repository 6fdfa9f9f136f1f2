pub mod grouping;
mod xml;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::error::PipelineError;
use crate::models::{ParseResult, TestFailure, TestResult, TestSuite};

use self::xml::{XmlSuite, XmlSuites};

/// Exact layout harnesses are expected to use for the suite timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Decode a harness report into a normalized [`ParseResult`].
///
/// A `<testsuites>` envelope is tried first and its first suite is used;
/// if that yields no suite, the document is decoded as a bare `<testsuite>`.
pub fn parse_report(mut reader: impl Read) -> Result<ParseResult, PipelineError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| PipelineError::Decode(e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|e| PipelineError::Decode(e.to_string()))?;

    let suite = decode_suite(&text)?;
    build_result(suite)
}

/// Open and parse the report at `path`.
pub fn parse_report_file(path: &Path) -> Result<ParseResult, PipelineError> {
    let file = File::open(path).map_err(|_| PipelineError::not_found("test report", path))?;
    debug!(path = %path.display(), "parsing test report");
    parse_report(BufReader::new(file))
}

/// Pick the report file inside `dir`: the lexicographically first `*.xml` entry.
pub fn find_report(dir: &Path) -> Result<PathBuf, PipelineError> {
    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let pattern = Path::new(&escaped).join("*.xml");

    let mut candidates: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
        .map_err(|_| PipelineError::not_found("test report directory", dir))?
        .flatten()
        .filter(|p| p.is_file())
        .collect();
    candidates.sort();

    if candidates.len() > 1 {
        debug!(count = candidates.len(), dir = %dir.display(), "multiple reports, using first");
    }

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| PipelineError::not_found("test report", dir.join("*.xml")))
}

fn decode_suite(text: &str) -> Result<XmlSuite, PipelineError> {
    let wrapper_err = match quick_xml::de::from_str::<XmlSuites>(text) {
        Ok(wrapper) => match wrapper.suites.into_iter().next() {
            Some(first) => return Ok(first),
            None => {
                debug!("report has no <testsuite> children, trying bare suite");
                None
            }
        },
        Err(e) => {
            debug!(error = %e, "report is not a <testsuites> document");
            Some(e)
        }
    };

    match (xml::root_element(text).as_deref(), wrapper_err) {
        (Some("testsuite"), _) => {}
        // A wrapper that failed to decode: its own error names the bad content.
        (Some("testsuites"), Some(e)) => return Err(PipelineError::Decode(e.to_string())),
        (Some(other), _) => {
            return Err(PipelineError::Decode(format!(
                "unexpected root element <{}>",
                other
            )));
        }
        (None, _) => return Err(PipelineError::Decode("no root element".into())),
    }

    quick_xml::de::from_str::<XmlSuite>(text).map_err(|e| PipelineError::Decode(e.to_string()))
}

fn build_result(suite: XmlSuite) -> Result<ParseResult, PipelineError> {
    let timestamp = NaiveDateTime::parse_from_str(&suite.timestamp, TIMESTAMP_FORMAT).map_err(
        |_| PipelineError::TimestampFormat {
            value: suite.timestamp.clone(),
        },
    )?;

    let mut passed_tests = Vec::new();
    let mut failed_tests = Vec::new();
    let mut results = Vec::with_capacity(suite.cases.len());

    for case in suite.cases {
        let failure = case.failure.map(|f| TestFailure {
            message: f.message,
            kind: f.kind,
            content: f.content,
        });
        let passed = failure.is_none();
        if passed {
            passed_tests.push(case.name.clone());
        } else {
            failed_tests.push(case.name.clone());
        }

        results.push(TestResult {
            name: case.name,
            class_name: case.class_name,
            time: case.time,
            passed,
            failure,
            output: case.system_out,
        });
    }

    if results.len() != suite.tests {
        warn!(
            declared = suite.tests,
            found = results.len(),
            suite = %suite.name,
            "suite test count does not match test cases"
        );
    }

    let grouped = grouping::group_by_task(&results);

    Ok(ParseResult {
        passed_tests,
        failed_tests,
        suite: TestSuite {
            name: suite.name,
            tests: suite.tests,
            skipped: suite.skipped,
            failures: suite.failures,
            errors: suite.errors,
            timestamp,
            hostname: suite.hostname,
            time: suite.time,
            results,
        },
        grouped,
    })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const WRAPPED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuites>
  <testsuite name="example" tests="3" skipped="0" failures="1" errors="0"
             timestamp="2024-03-01T12:30:45" hostname="runner" time="1.234">
    <testcase name="TestPassing" classname="TestTask1" time="0.100"/>
    <testcase name="TestFailing" classname="TestTask1" time="0.200">
      <failure message="expected 2, got 3" type="AssertionError">assert_eq failed at line 10</failure>
    </testcase>
    <testcase name="TestAnotherPassing" classname="TestTask2" time="0.300"/>
  </testsuite>
</testsuites>"#;

    const BARE: &str = r#"<testsuite name="bare" tests="2" failures="0" errors="0" skipped="0"
        timestamp="2024-01-02T03:04:05" hostname="box" time="0.5">
  <properties><property name="go.version" value="1.22"/></properties>
  <testcase name="A" classname="pkg.TaskA" time="0.25">
    <system-out>hello</system-out>
  </testcase>
  <testcase name="B" classname="pkg.task_3" time="0.25"/>
</testsuite>"#;

    fn parse(xml: &str) -> Result<ParseResult, PipelineError> {
        parse_report(xml.as_bytes())
    }

    #[test]
    fn parses_wrapped_suite() {
        let result = parse(WRAPPED).unwrap();

        assert_eq!(result.passed_tests, ["TestPassing", "TestAnotherPassing"]);
        assert_eq!(result.failed_tests, ["TestFailing"]);
        assert_eq!(result.suite.name, "example");
        assert_eq!(result.suite.failures, 1);
        assert_eq!(result.suite.hostname, "runner");
        assert!((result.suite.time - 1.234).abs() < 1e-9);
        assert_eq!(
            result.suite.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            "2024-03-01T12:30:45"
        );
    }

    #[test]
    fn copies_failure_details() {
        let result = parse(WRAPPED).unwrap();
        let failing = &result.suite.results[1];

        assert!(!failing.passed);
        let failure = failing.failure.as_ref().unwrap();
        assert_eq!(failure.message, "expected 2, got 3");
        assert_eq!(failure.kind, "AssertionError");
        assert_eq!(failure.content, "assert_eq failed at line 10");
        assert!(result.suite.results[0].failure.is_none());
    }

    #[test]
    fn parses_bare_suite_with_properties_and_output() {
        let result = parse(BARE).unwrap();

        assert_eq!(result.suite.name, "bare");
        assert_eq!(result.passed_tests, ["A", "B"]);
        assert_eq!(result.suite.results[0].output.as_deref(), Some("hello"));
        assert_eq!(result.suite.results[1].output, None);
    }

    #[test]
    fn uses_first_suite_of_many() {
        let xml = r#"<testsuites>
  <testsuite name="one" tests="1" timestamp="2024-01-01T00:00:00" time="0">
    <testcase name="x" classname="c" time="0"/>
  </testsuite>
  <testsuite name="two" tests="1" timestamp="2024-01-01T00:00:00" time="0">
    <testcase name="y" classname="c" time="0"/>
  </testsuite>
</testsuites>"#;
        let result = parse(xml).unwrap();
        assert_eq!(result.suite.name, "one");
        assert_eq!(result.passed_tests, ["x"]);
    }

    #[test]
    fn passed_and_failed_partition_results() {
        let result = parse(WRAPPED).unwrap();
        assert_eq!(result.total(), result.suite.results.len());

        let mut passed = result.passed_tests.iter();
        let mut failed = result.failed_tests.iter();
        for case in &result.suite.results {
            let next = if case.passed { passed.next() } else { failed.next() };
            assert_eq!(next, Some(&case.name));
        }
        assert!(passed.next().is_none());
        assert!(failed.next().is_none());
    }

    fn suite_xml(cases: &[bool]) -> String {
        let body: String = cases
            .iter()
            .enumerate()
            .map(|(i, passed)| {
                if *passed {
                    format!(r#"<testcase name="t{i}" classname="TestTask1" time="0.1"/>"#)
                } else {
                    format!(
                        r#"<testcase name="t{i}" classname="TestTask1" time="0.1"><failure message="m" type="E">x</failure></testcase>"#
                    )
                }
            })
            .collect();
        format!(
            r#"<testsuites><testsuite name="p" tests="{}" timestamp="2024-01-01T00:00:00" time="1">{}</testsuite></testsuites>"#,
            cases.len(),
            body
        )
    }

    proptest! {
        #[test]
        fn outcomes_partition_results_in_order(cases in prop::collection::vec(any::<bool>(), 1..30)) {
            let result = parse(&suite_xml(&cases)).unwrap();

            let expected_passed: Vec<String> = cases
                .iter()
                .enumerate()
                .filter(|(_, passed)| **passed)
                .map(|(i, _)| format!("t{i}"))
                .collect();
            let expected_failed: Vec<String> = cases
                .iter()
                .enumerate()
                .filter(|(_, passed)| !**passed)
                .map(|(i, _)| format!("t{i}"))
                .collect();

            prop_assert_eq!(&result.passed_tests, &expected_passed);
            prop_assert_eq!(&result.failed_tests, &expected_failed);
            prop_assert_eq!(result.total(), result.suite.results.len());
            for case in &result.suite.results {
                prop_assert_eq!(case.passed, case.failure.is_none());
            }
        }
    }

    #[test]
    fn groups_results_by_task() {
        let result = parse(WRAPPED).unwrap();
        let names: Vec<&str> = result.grouped.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Task1", "Task2"]);
        assert_eq!(result.grouped.total_tests, 3);
        assert_eq!(result.grouped.total_failed, 1);
    }

    #[test]
    fn malformed_xml_is_decode_error() {
        let err = parse("<testsuite name=\"x\"><testcase").unwrap_err();
        assert!(matches!(err, PipelineError::Decode(_)), "{err:?}");

        let err = parse("not xml at all").unwrap_err();
        assert!(matches!(err, PipelineError::Decode(_)), "{err:?}");
    }

    #[test]
    fn bad_attribute_in_wrapper_reports_decode_cause() {
        let xml = r#"<testsuites>
  <testsuite name="s" tests="1" timestamp="2024-01-01T00:00:00" time="0">
    <testcase name="a" classname="c" time="soon"/>
  </testsuite>
</testsuites>"#;
        let err = parse(xml).unwrap_err();
        match &err {
            PipelineError::Decode(msg) => {
                assert!(!msg.contains("unexpected root element"), "{msg}");
                assert!(msg.contains("soon") || msg.contains("float"), "{msg}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_wrapper_is_decode_error() {
        let err = parse("<testsuites></testsuites>").unwrap_err();
        assert!(matches!(err, PipelineError::Decode(_)), "{err:?}");
    }

    #[test]
    fn invalid_utf8_is_decode_error() {
        let err = parse_report(&[0xff, 0xfe, 0x3c][..]).unwrap_err();
        assert!(matches!(err, PipelineError::Decode(_)));
    }

    #[test]
    fn timestamp_must_match_exact_layout() {
        for bad in ["2024-03-01 12:30:45", "2024-03-01T12:30:45Z", "2024-03-01T12:30:45.123", ""] {
            let xml = WRAPPED.replace("2024-03-01T12:30:45", bad);
            let err = parse(&xml).unwrap_err();
            assert!(
                matches!(&err, PipelineError::TimestampFormat { value } if value == bad),
                "{bad:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn finds_first_xml_report_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.xml"), BARE).unwrap();
        std::fs::write(dir.path().join("a.xml"), BARE).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        let found = find_report(dir.path()).unwrap();
        assert_eq!(found.file_name().unwrap(), "a.xml");
    }

    #[test]
    fn missing_report_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("report.json"), "{}").unwrap();

        let err = find_report(dir.path()).unwrap_err();
        assert!(matches!(err, PipelineError::NotFound { .. }));

        let err = find_report(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, PipelineError::NotFound { .. }));
    }

    #[test]
    fn parses_report_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xml");
        std::fs::write(&path, WRAPPED).unwrap();

        let result = parse_report_file(&path).unwrap();
        assert_eq!(result.failed_tests, ["TestFailing"]);
    }
}
