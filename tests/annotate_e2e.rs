use anyhow::Result;
use std::fs;
use tempfile::TempDir;

use swagtag::analyzer::routes::RouteTable;
use swagtag::analyzer::trace::NullTrace;
use swagtag::analyzer::Analyzer;
use swagtag::config::GlobalEnv;
use swagtag::patch;
use swagtag::scan::{self, ScanOptions};

const ROUTES: &str = r#"public const string ShareSharelinkid = "/api/Share/{shareLinkId}";"#;

const SOURCE: &str = r#"public sealed class Share_Link : APITest
{
    private string Endpoint => "/api/Share";

    [Test]
    public void GET_Share_Ok_200_1()
    {
        Send(Get($"{Endpoint}/abc123"));
        Verify(Response.StatusCode).Is(OK);
    }

    [Test]
    public void SetUpOnly()
    {
        Prepare();
    }
}
"#;

const PATCHED: &str = r#"public sealed class Share_Link : APITest
{
    private string Endpoint => "/api/Share";

    [Test]
    [Swagger(Path = Paths.ShareSharelinkid, Operation = OperationType.GET, ResponseCode = 200)]
    public void GET_Share_Ok_200_1()
    {
        Send(Get($"{Endpoint}/abc123"));
        Verify(Response.StatusCode).Is(OK);
    }

    [Test]
    public void SetUpOnly()
    {
        Prepare();
    }
}
"#;

fn annotate(source: &str) -> (String, usize) {
    let routes = RouteTable::parse(ROUTES);
    let mut analyzer = Analyzer::new(GlobalEnv::default()).unwrap();
    let analysis = analyzer.analyze(source, &mut NullTrace).unwrap();
    let (patched, changes) = patch::annotate_source(&analysis, &routes, source);
    (patched, changes.len())
}

#[test]
fn annotate_inserts_attribute_above_declaration() {
    let routes = RouteTable::parse(ROUTES);
    let mut analyzer = Analyzer::new(GlobalEnv::default()).unwrap();
    let analysis = analyzer.analyze(SOURCE, &mut NullTrace).unwrap();
    let (patched, changes) = patch::annotate_source(&analysis, &routes, SOURCE);

    assert_eq!(patched, PATCHED);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].method, "GET_Share_Ok_200_1");
    assert_eq!(
        changes[0].attribute,
        "[Swagger(Path = Paths.ShareSharelinkid, Operation = OperationType.GET, ResponseCode = 200)]"
    );
}

#[test]
fn second_pass_is_a_no_op() {
    let (patched, first) = annotate(SOURCE);
    assert_eq!(first, 1);
    let (again, second) = annotate(&patched);
    assert_eq!(second, 0);
    assert_eq!(again, patched);
}

#[test]
fn classes_outside_the_api_harness_are_left_alone() {
    let source = r#"public class ShareHelper : TestBase
{
    [Test]
    public void GET_Share_Ok_200_2()
    {
        Send(Get("/api/Share/abc123"));
        Verify(Response.StatusCode).Is(OK);
    }
}
"#;
    let (patched, changes) = annotate(source);
    assert_eq!(changes, 0);
    assert_eq!(patched, source);
}

fn setup_scan_dir() -> Result<TempDir> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    fs::write(root.join(".gitignore"), "Generated.cs\n")?;
    fs::write(root.join("ShareTests.cs"), "// share")?;
    fs::write(root.join("Generated.cs"), "// generated")?;
    fs::create_dir_all(root.join("Admin"))?;
    fs::write(root.join("Admin").join("BlackListTests.cs"), "// admin")?;
    fs::write(root.join("readme.md"), "# notes")?;
    Ok(temp_dir)
}

#[test]
fn scan_honors_gitignore_by_default() {
    let temp_dir = setup_scan_dir().expect("setup failed");
    let files = scan::scan_tests(temp_dir.path(), ScanOptions::default()).unwrap();
    let rel: Vec<&str> = files.iter().map(|file| file.rel_path.as_str()).collect();
    assert_eq!(rel, ["Admin/BlackListTests.cs", "ShareTests.cs"]);
}

#[test]
fn no_ignore_includes_everything_with_a_cs_extension() {
    let temp_dir = setup_scan_dir().expect("setup failed");
    let files = scan::scan_tests(temp_dir.path(), ScanOptions::new(true)).unwrap();
    let rel: Vec<&str> = files.iter().map(|file| file.rel_path.as_str()).collect();
    assert_eq!(
        rel,
        ["Admin/BlackListTests.cs", "Generated.cs", "ShareTests.cs"]
    );
}
