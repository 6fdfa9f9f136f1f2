pub mod group;
pub mod project;
pub mod result;
pub mod status;

pub use group::{GroupedTestResults, TestClass};
pub use project::Project;
pub use result::{ParseResult, TestFailure, TestResult, TestSuite};
pub use status::TestStatus;
