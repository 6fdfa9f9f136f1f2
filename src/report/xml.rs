//! Serde shapes for JUnit-style report documents.
//!
//! Harnesses emit either a `<testsuites>` envelope or a bare `<testsuite>`
//! root; both share the suite/case/failure layout below.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct XmlSuites {
    #[serde(rename = "testsuite", default)]
    pub suites: Vec<XmlSuite>,
}

#[derive(Debug, Deserialize)]
pub(super) struct XmlSuite {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@tests", default)]
    pub tests: usize,
    #[serde(rename = "@skipped", default)]
    pub skipped: usize,
    #[serde(rename = "@failures", default)]
    pub failures: usize,
    #[serde(rename = "@errors", default)]
    pub errors: usize,
    #[serde(rename = "@timestamp", default)]
    pub timestamp: String,
    #[serde(rename = "@hostname", default)]
    pub hostname: String,
    #[serde(rename = "@time", default)]
    pub time: f64,
    #[serde(rename = "testcase", default)]
    pub cases: Vec<XmlCase>,
}

#[derive(Debug, Deserialize)]
pub(super) struct XmlCase {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@classname", default)]
    pub class_name: String,
    #[serde(rename = "@time", default)]
    pub time: f64,
    #[serde(default)]
    pub failure: Option<XmlFailure>,
    #[serde(rename = "system-out", default)]
    pub system_out: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct XmlFailure {
    #[serde(rename = "@message", default)]
    pub message: String,
    #[serde(rename = "@type", default)]
    pub kind: String,
    #[serde(rename = "$text", default)]
    pub content: String,
}

/// Local name of the document's root element, if any.
pub(super) fn root_element(xml: &str) -> Option<String> {
    use quick_xml::events::Event;

    let mut reader = quick_xml::Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) | Ok(Event::Empty(start)) => {
                return Some(String::from_utf8_lossy(start.local_name().as_ref()).into_owned());
            }
            Ok(Event::Eof) | Err(_) => return None,
            Ok(_) => {}
        }
    }
}
