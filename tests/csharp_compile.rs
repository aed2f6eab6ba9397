use swagtag::analyzer::scope::Callable;
use swagtag::analyzer::trace::{BufferTrace, NullTrace};
use swagtag::analyzer::{Analyzer, FileAnalysis};
use swagtag::config::GlobalEnv;

fn analyze(globals: &str, source: &str) -> FileAnalysis {
    let mut analyzer = Analyzer::new(GlobalEnv::parse(globals)).unwrap();
    analyzer.analyze(source, &mut NullTrace).unwrap()
}

#[test]
fn compile_class_members_and_scopes() {
    let source = r#"
using TransPerfect.Automation.Framework;

[Parallelizable]
public sealed class Admin_Share_Disability : APITest
{
    private string Endpoint => $"{GlobalLabShare}/gl-share/api/Admin/share";
    private string EndpointWithShareLink(string shareLink) => $"{Endpoint}/{shareLink}";
    private const string Suffix = "/disability";

    [Test]
    public void PATCH_AdminShare_Disability_200_141461()
    {
        var path = EndpointWithShareLink("abc123") + Suffix;
        Send(Patch(new { }).To(path));
        Verify(Response.StatusCode).Is(OK);
    }
}
"#;
    let analysis = analyze("GlobalLabShare=https://qa.example.com\n", source);

    assert_eq!(
        analysis.file.usings,
        vec!["using TransPerfect.Automation.Framework;".to_string()]
    );
    assert_eq!(analysis.file.classes, vec!["Admin_Share_Disability".to_string()]);

    let class = analysis.classes().next().unwrap();
    assert_eq!(class.base_type, "APITest");
    assert_eq!(class.attributes, vec!["[Parallelizable]".to_string()]);
    assert_eq!(
        class.members,
        vec![
            "Endpoint".to_string(),
            "EndpointWithShareLink".to_string(),
            "PATCH_AdminShare_Disability_200_141461".to_string(),
        ]
    );

    // zero-arity expression member materialized with the global spliced in
    assert_eq!(
        analysis.scopes.variable(class.scope, "Endpoint"),
        Ok("\"https://qa.example.com/gl-share/api/Admin/share\"")
    );
    assert_eq!(
        analysis.scopes.variable(class.scope, "Suffix"),
        Ok("\"/disability\"")
    );

    let Ok(Callable::Block(method)) = analysis
        .scopes
        .callable(class.scope, "PATCH_AdminShare_Disability_200_141461")
    else {
        panic!("method not compiled as a block body");
    };
    assert_eq!(method.arity, 0);
    assert_eq!(method.attributes, vec!["[Test]".to_string()]);
    assert_eq!(method.sends.len(), 1);

    // the local picked up the parameterized member plus the const field
    assert_eq!(
        analysis.scopes.variable(method.scope, "path"),
        Ok("\"https://qa.example.com/gl-share/api/Admin/share/abc123/disability\"")
    );

    let site = &method.sends[0];
    assert_eq!(site.verb.map(|v| v.as_str()), Some("PATCH"));
    assert_eq!(
        site.resolved_path.as_deref(),
        Some("https://qa.example.com/gl-share/api/Admin/share/abc123/disability")
    );
    assert_eq!(site.expected_status.as_deref(), Some("200"));
    assert_eq!(site.verify_count, 1);
}

#[test]
fn members_see_only_earlier_declarations() {
    let source = r#"
public class Ordering : APITest
{
    private string First => "/api/first";
    private string Early => Late;
    private string Late => "/api/late";
    private string AfterBoth => Late;
}
"#;
    let analysis = analyze("", source);
    let class = analysis.classes().next().unwrap();
    // Late is not defined yet when Early materializes
    assert_eq!(analysis.scopes.variable(class.scope, "Early"), Ok("\"Late\""));
    assert_eq!(
        analysis.scopes.variable(class.scope, "AfterBoth"),
        Ok("\"/api/late\"")
    );
    assert_eq!(analysis.scopes.variable(class.scope, "First"), Ok("\"/api/first\""));
}

#[test]
fn uninitialized_field_is_empty_uninitialized_local_is_absent() {
    let source = r#"
public class Defaults : APITest
{
    private string Uninit;

    [Test]
    public void GET_Defaults_200_1()
    {
        string tmp;
        Send(Get("/api/health"));
        Verify(Response.StatusCode).Is(OK);
    }
}
"#;
    let analysis = analyze("", source);
    let class = analysis.classes().next().unwrap();
    assert_eq!(analysis.scopes.variable(class.scope, "Uninit"), Ok(""));

    let Ok(Callable::Block(method)) = analysis.scopes.callable(class.scope, "GET_Defaults_200_1")
    else {
        panic!("method not compiled");
    };
    assert!(analysis.scopes.variable(method.scope, "tmp").is_err());
    assert_eq!(method.sends[0].resolved_path.as_deref(), Some("/api/health"));
}

#[test]
fn namespaced_file_yields_no_classes() {
    let source = r#"
using Models.Requests;

namespace Tests.API.Share;

public sealed class Share_shareLink : APITest
{
}
"#;
    let analysis = analyze("", source);
    assert_eq!(analysis.file.classes.len(), 0);
    assert_eq!(analysis.file.usings.len(), 1);
}

#[test]
fn trace_collects_call_sites_and_statuses() {
    let source = r#"
public class Traced : APITest
{
    [Test]
    public void GET_Traced_200_9()
    {
        Send(Get("/api/health"));
        Verify(Response.StatusCode).Is(OK);
    }
}
"#;
    let mut analyzer = Analyzer::new(GlobalEnv::default()).unwrap();
    let mut sink = BufferTrace::default();
    analyzer.analyze(source, &mut sink).unwrap();
    let rendered = serde_json::to_string(&sink.events).unwrap();
    assert!(rendered.contains("\"event\":\"call_site_found\""));
    assert!(rendered.contains("\"event\":\"status_inferred\""));
    assert!(rendered.contains("\"status\":\"200\""));
}
