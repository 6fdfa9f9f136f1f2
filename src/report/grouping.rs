use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::{GroupedTestResults, TestClass, TestResult};

/// One way of spotting a task number inside a test class name.
struct TaskRule {
    name: &'static str,
    pattern: Regex,
}

/// Extraction rules, evaluated top to bottom; the first rule that matches decides.
///
/// The order is part of the contract: a class name such as `task_5_Task9` is
/// assigned to task 9 because the whitespace rule is consulted before the
/// separator rule.
///
/// 1. `testtask` followed directly by digits (case-insensitive)
/// 2. `task`, optional whitespace, digits (case-insensitive)
/// 3. `task`, then `_` or `-`, then digits (case-insensitive)
/// 4. digits appearing anywhere before a lowercase `task`
static TASK_RULES: LazyLock<Vec<TaskRule>> = LazyLock::new(|| {
    [
        ("test-task-prefix", r"(?i)testtask(\d+)"),
        ("task-space", r"(?i)task\s*(\d+)"),
        ("task-separator", r"(?i)task[_-](\d+)"),
        ("digits-before-task", r"(\d+).*task"),
    ]
    .into_iter()
    .map(|(name, pattern)| TaskRule {
        name,
        pattern: Regex::new(pattern).expect("task rule pattern is valid"),
    })
    .collect()
});

/// Task number embedded in `class_name`, or `None` when no rule matches.
pub fn extract_task_number(class_name: &str) -> Option<u32> {
    TASK_RULES.iter().find_map(|rule| {
        let number = rule
            .pattern
            .captures(class_name)?
            .get(1)?
            .as_str()
            .parse::<u32>()
            .ok()?;
        tracing::trace!(rule = rule.name, class_name, number, "matched task rule");
        Some(number)
    })
}

fn class_labels(task_number: u32) -> (String, String) {
    if task_number == 0 {
        ("Uncategorized".to_string(), "Uncategorized Tests".to_string())
    } else {
        (format!("Task{}", task_number), format!("Task {}", task_number))
    }
}

/// Bucket results by task number, keeping source order inside each bucket.
pub fn group_by_task(results: &[TestResult]) -> GroupedTestResults {
    let mut buckets: BTreeMap<u32, TestClass> = BTreeMap::new();
    let mut grouped = GroupedTestResults::default();

    for result in results {
        let task_number = extract_task_number(&result.class_name).unwrap_or(0);
        let class = buckets.entry(task_number).or_insert_with(|| {
            let (name, display_name) = class_labels(task_number);
            TestClass {
                name,
                display_name,
                task_number,
                tests: Vec::new(),
                passed_count: 0,
                failed_count: 0,
                total_time: 0.0,
            }
        });

        if result.passed {
            class.passed_count += 1;
            grouped.total_passed += 1;
        } else {
            class.failed_count += 1;
            grouped.total_failed += 1;
        }
        class.total_time += result.time;
        class.tests.push(result.clone());

        grouped.total_tests += 1;
        grouped.total_time += result.time;
    }

    grouped.classes = buckets.into_values().collect();
    grouped
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::models::TestFailure;

    fn case(name: &str, class_name: &str, passed: bool, time: f64) -> TestResult {
        TestResult {
            name: name.to_string(),
            class_name: class_name.to_string(),
            time,
            passed,
            failure: (!passed).then(|| TestFailure {
                message: "assertion failed".into(),
                kind: "AssertionError".into(),
                content: String::new(),
            }),
            output: None,
        }
    }

    #[test]
    fn extracts_numbers_from_known_shapes() {
        assert_eq!(extract_task_number("TestTask7Upper"), Some(7));
        assert_eq!(extract_task_number("task_1_description"), Some(1));
        assert_eq!(extract_task_number("com.example.Task 12"), Some(12));
        assert_eq!(extract_task_number("exercise-TASK-3"), Some(3));
        assert_eq!(extract_task_number("Exercise4_task"), Some(4));
        assert_eq!(extract_task_number("SomeOtherClass"), None);
    }

    #[test]
    fn earlier_rules_win_over_later_ones() {
        // Separator rule alone would pick 5.
        assert_eq!(extract_task_number("check_task_5_then_Task9"), Some(9));
        // Digits-before-task only applies when nothing else matched.
        assert_eq!(extract_task_number("42_testtask3"), Some(3));
    }

    #[test]
    fn digits_before_task_needs_lowercase_literal() {
        assert_eq!(extract_task_number("Step2Task"), None);
        assert_eq!(extract_task_number("Step2task"), Some(2));
    }

    #[test]
    fn overflowing_digits_do_not_match() {
        assert_eq!(extract_task_number("Task99999999999"), None);
    }

    #[test]
    fn extraction_is_deterministic() {
        for name in ["TestTask7Upper", "task_1_description", "SomeOtherClass"] {
            assert_eq!(extract_task_number(name), extract_task_number(name));
        }
    }

    #[test]
    fn groups_two_tasks_and_uncategorized() {
        let results = vec![
            case("TestOne", "TestTask1", true, 0.1),
            case("TestTwo", "TestTask1", false, 0.2),
            case("TestThree", "TestTask2", true, 0.3),
            case("TestFour", "TestTask2", false, 0.4),
            case("TestFive", "HelperTests", true, 0.5),
        ];

        let grouped = group_by_task(&results);

        let names: Vec<&str> = grouped.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Uncategorized", "Task1", "Task2"]);
        assert_eq!(grouped.total_tests, 5);
        assert_eq!(grouped.total_passed, 3);
        assert_eq!(grouped.total_failed, 2);

        let task1 = &grouped.classes[1];
        assert_eq!(task1.display_name, "Task 1");
        assert_eq!((task1.passed_count, task1.failed_count), (1, 1));
        let task2 = &grouped.classes[2];
        assert_eq!((task2.passed_count, task2.failed_count), (1, 1));

        let uncategorized = &grouped.classes[0];
        assert!(uncategorized.is_uncategorized());
        assert_eq!(uncategorized.display_name, "Uncategorized Tests");
        assert!((grouped.total_time - 1.5).abs() < 1e-9);
    }

    #[test]
    fn classes_sorted_numerically_not_lexically() {
        let results = vec![
            case("a", "Task10", true, 0.0),
            case("b", "Task2", true, 0.0),
            case("c", "Task1", true, 0.0),
        ];
        let grouped = group_by_task(&results);
        let numbers: Vec<u32> = grouped.classes.iter().map(|c| c.task_number).collect();
        assert_eq!(numbers, [1, 2, 10]);
    }

    #[test]
    fn keeps_source_order_within_a_class() {
        let results = vec![
            case("first", "Task1", true, 0.0),
            case("other", "Task2", true, 0.0),
            case("second", "Task1", false, 0.0),
        ];
        let grouped = group_by_task(&results);
        let names: Vec<&str> = grouped.classes[0]
            .tests
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn empty_input_gives_empty_groups() {
        let grouped = group_by_task(&[]);
        assert!(grouped.classes.is_empty());
        assert_eq!(grouped.total_tests, 0);
    }

    proptest! {
        #[test]
        fn class_sums_match_totals(
            cases in prop::collection::vec((prop::option::of(0u32..20), any::<bool>(), 0.0f64..5.0), 0..40)
        ) {
            let results: Vec<TestResult> = cases
                .iter()
                .enumerate()
                .map(|(i, (task, passed, time))| {
                    let class_name = match task {
                        Some(n) => format!("TestTask{}", n),
                        None => "Plain".to_string(),
                    };
                    case(&format!("t{}", i), &class_name, *passed, *time)
                })
                .collect();

            let grouped = group_by_task(&results);

            let passed: usize = grouped.classes.iter().map(|c| c.passed_count).sum();
            let failed: usize = grouped.classes.iter().map(|c| c.failed_count).sum();
            let tests: usize = grouped.classes.iter().map(|c| c.tests.len()).sum();
            prop_assert_eq!(passed, grouped.total_passed);
            prop_assert_eq!(failed, grouped.total_failed);
            prop_assert_eq!(tests, grouped.total_tests);
            prop_assert_eq!(tests, results.len());

            let numbers: Vec<u32> = grouped.classes.iter().map(|c| c.task_number).collect();
            prop_assert!(numbers.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
