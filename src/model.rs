use crate::analyzer::trace::TraceEvent;
use serde::Serialize;

#[derive(Debug, Serialize, Clone)]
pub struct FileReport {
    pub path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub usings: Vec<String>,
    pub classes: Vec<ClassReport>,
}

#[derive(Debug, Serialize, Clone)]
pub struct ClassReport {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
    pub methods: Vec<MethodReport>,
}

#[derive(Debug, Serialize, Clone)]
pub struct MethodReport {
    pub name: String,
    pub line: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sends: Vec<SendReport>,
}

#[derive(Debug, Serialize, Clone)]
pub struct SendReport {
    pub line: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verb: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    pub verify_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_status: Option<String>,
}

/// `analyze` command output: one file report plus collected trace
/// events when requested.
#[derive(Debug, Serialize)]
pub struct AnalyzeReport {
    pub file: FileReport,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<TraceEvent>,
}

#[derive(Debug, Serialize)]
pub struct AnnotateStats {
    pub scanned: usize,
    pub annotated: usize,
    pub attributes: usize,
    pub skipped: usize,
    pub errors: usize,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<FileChanges>,
}

#[derive(Debug, Serialize, Clone)]
pub struct FileChanges {
    pub path: String,
    pub methods: Vec<MethodChange>,
}

#[derive(Debug, Serialize, Clone)]
pub struct MethodChange {
    pub method: String,
    pub attribute: String,
}

#[derive(Debug, Serialize)]
pub struct PathResolution {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
}
