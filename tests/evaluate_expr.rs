use swagtag::analyzer::eval::evaluate;
use swagtag::analyzer::scope::{BlockBody, Callable, ExpressionBody, ScopeArena, ScopeId};
use swagtag::config::GlobalEnv;

fn seeded_arena(globals: &str) -> (ScopeArena, ScopeId) {
    let mut scopes = ScopeArena::new();
    let root = scopes.push(None);
    for (name, value) in GlobalEnv::parse(globals).entries() {
        scopes.define_variable(root, name, value);
    }
    (scopes, root)
}

#[test]
fn concatenation_with_unresolvable_member_access() {
    let globals = "ShareAPI=https://qa-share.example.com/gl-share/api/Share\nAPIVersion=?api-version=1\n";
    let (mut scopes, root) = seeded_arena(globals);
    // ShareAPI is truncated to its /api/ suffix when the globals load
    assert_eq!(
        evaluate("ShareAPI + \"/\" + share.Id + APIVersion", &mut scopes, root),
        "\"/api/Share/share.Id?api-version=1\""
    );
}

#[test]
fn interpolation_resolves_nested_call_argument() {
    let (mut scopes, root) = seeded_arena("");
    scopes.define_variable(root, "Endpoint", "\"/api/Admin/share\"");
    scopes.define_callable(
        root,
        Callable::Expression(ExpressionBody {
            name: "EndpointWithShareLink".to_string(),
            body: "$\"{Endpoint}/{shareLink}\"".to_string(),
            params: vec!["shareLink".to_string()],
        }),
    );
    scopes.define_variable(root, "linkId", "\"abc123\"");
    assert_eq!(
        evaluate(
            "$\"{EndpointWithShareLink(linkId)}/disability\"",
            &mut scopes,
            root
        ),
        "\"/api/Admin/share/abc123/disability\""
    );
}

#[test]
fn call_body_resolves_against_the_call_site() {
    let (mut scopes, root) = seeded_arena("");
    scopes.define_callable(
        root,
        Callable::Expression(ExpressionBody {
            name: "Path".to_string(),
            body: "$\"{Base}/tail\"".to_string(),
            params: Vec::new(),
        }),
    );
    let method = scopes.push(Some(root));
    scopes.define_variable(method, "Base", "\"/api/share\"");
    assert_eq!(evaluate("Path()", &mut scopes, method), "\"/api/share/tail\"");
    // same call without the binding leaves the placeholder name
    assert_eq!(evaluate("Path()", &mut scopes, root), "\"Base/tail\"");
}

#[test]
fn inner_scope_shadows_outer_binding() {
    let (mut scopes, root) = seeded_arena("Endpoint=/api/outer\n");
    let method = scopes.push(Some(root));
    scopes.define_variable(method, "Endpoint", "\"/api/inner\"");
    assert_eq!(evaluate("Endpoint", &mut scopes, method), "\"/api/inner\"");
    assert_eq!(evaluate("Endpoint", &mut scopes, root), "/api/outer");
}

#[test]
fn block_bodied_call_synthesizes_placeholder() {
    let (mut scopes, root) = seeded_arena("");
    let body_scope = scopes.push(Some(root));
    scopes.define_callable(
        root,
        Callable::Block(BlockBody {
            name: "Setup".to_string(),
            arity: 1,
            attributes: Vec::new(),
            scope: body_scope,
            sends: Vec::new(),
            start_line: 1,
            end_line: 2,
        }),
    );
    assert_eq!(
        evaluate("Setup(\"a\")", &mut scopes, root),
        "\"Setup(\"a\")\""
    );
}

#[test]
fn evaluation_is_total_on_arbitrary_text() {
    let (mut scopes, root) = seeded_arena("");
    let inputs = [
        "new { }.As(SerializationFormat.Json)",
        "shareGroup.Token.AccessToken[..^1]",
        "Get<ShareGroup>(Shares.BeeNoMessagePrivate)",
        "await client.SendAsync(request)",
        "12345",
    ];
    for input in inputs {
        assert_eq!(evaluate(input, &mut scopes, root), input);
    }
}
