//! Example-bound test function synthesis.
//!
//! Each generated test targets one (path, verb, direction, status) unit:
//! it binds parameter values, builds the request URL from the path template,
//! and asserts the response decodes as the recovered type (comparing against
//! the example payload when one is bound). Test names are globally unique and
//! exactly invertible so failures can be reported by name alone.

use std::collections::BTreeSet;
use std::fmt;

use serde_json::Value;
use tracing::warn;
use url::Url;

use crate::error::TestGenError;
use crate::spec::{Parameter, TestOverride};
use crate::swift::decl::{Expr, FunctionDecl, InterpPart, Stmt, SwiftTypeRef};
use crate::swift::ident::member_identifier;

/// HTTP verb of a generation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpVerb {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpVerb::Get => "get",
            HttpVerb::Post => "post",
            HttpVerb::Put => "put",
            HttpVerb::Patch => "patch",
            HttpVerb::Delete => "delete",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "get" => Some(HttpVerb::Get),
            "post" => Some(HttpVerb::Post),
            "put" => Some(HttpVerb::Put),
            "patch" => Some(HttpVerb::Patch),
            "delete" => Some(HttpVerb::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a unit describes the request body or a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Request,
    Response,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Request => "request",
            Direction::Response => "response",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "request" => Some(Direction::Request),
            "response" => Some(Direction::Response),
            _ => None,
        }
    }
}

/// A structured test function name.
///
/// Canonical form: `test__{slug}__{path}__{verb}__{direction}__{status}`,
/// fields joined by `__` and path components by `_`. Components are pre-split
/// on `_` at construction so canonical form and parsed form always agree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestFunctionName {
    pub slug: String,
    pub path_components: Vec<String>,
    pub verb: HttpVerb,
    pub direction: Direction,
    pub status: String,
}

impl TestFunctionName {
    pub fn new(
        slug: &str,
        path_components: &[&str],
        verb: HttpVerb,
        direction: Direction,
        status: &str,
    ) -> Result<Self, TestGenError> {
        check_field(slug)?;
        check_field(status)?;

        let mut components = Vec::new();
        for component in path_components {
            check_field(component)?;
            for part in component.split('_') {
                components.push(part.to_string());
            }
        }

        Ok(Self {
            slug: slug.to_string(),
            path_components: components,
            verb,
            direction,
            status: status.to_string(),
        })
    }

    /// The canonical external form, usable as a Swift function name.
    pub fn canonical(&self) -> String {
        format!(
            "test__{}__{}__{}__{}__{}",
            self.slug,
            self.path_components.join("_"),
            self.verb,
            self.direction.as_str(),
            self.status
        )
    }

    /// Parse a canonical external form back into its descriptor.
    pub fn parse(name: &str) -> Result<Self, TestGenError> {
        let unparseable = || TestGenError::UnparseableTestName {
            name: name.to_string(),
        };

        let rest = name.strip_prefix("test__").ok_or_else(unparseable)?;
        let fields: Vec<&str> = rest.split("__").collect();
        let &[slug, path, verb, direction, status] = fields.as_slice() else {
            return Err(unparseable());
        };

        let verb = HttpVerb::parse(verb).ok_or_else(unparseable)?;
        let direction = Direction::parse(direction).ok_or_else(unparseable)?;
        Self::new(slug, &[path], verb, direction, status)
    }
}

/// A name field must survive the canonical form's separators: non-empty, no
/// `__` run, no leading or trailing `_`.
fn check_field(field: &str) -> Result<(), TestGenError> {
    if field.is_empty()
        || field.contains("__")
        || field.starts_with('_')
        || field.ends_with('_')
    {
        return Err(TestGenError::UnrepresentableNameField {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Resolve the host a generated test should target.
///
/// Precedence, highest first: per-test `test_host`, suite-wide host override,
/// the OpenAPI server URL. The winning URL must parse and carry a scheme and
/// host; a bad override is a configuration error, never a warning.
pub fn resolve_host(
    test_host: Option<&str>,
    suite_host: Option<&str>,
    server_url: Option<&str>,
) -> Result<String, TestGenError> {
    let raw = test_host
        .or(suite_host)
        .or(server_url)
        .ok_or(TestGenError::NoHostAvailable)?;

    let parsed = Url::parse(raw).map_err(|error| match error {
        url::ParseError::RelativeUrlWithoutBase => TestGenError::TestHostUrlMustContainScheme {
            url: raw.to_string(),
        },
        _ => TestGenError::MalformedTestHostUrl {
            url: raw.to_string(),
        },
    })?;

    if parsed.host_str().is_none() {
        return Err(TestGenError::TestHostUrlMustContainScheme {
            url: raw.to_string(),
        });
    }

    Ok(raw.trim_end_matches('/').to_string())
}

/// One segment of a parsed path template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    Literal(String),
    Parameter(String),
}

/// Split an OpenAPI path template into literal runs and `{param}` segments.
fn parse_path_template(path: &str) -> Vec<PathSegment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut parameter: Option<String> = None;

    for c in path.chars() {
        match (&mut parameter, c) {
            (None, '{') => {
                if !literal.is_empty() {
                    segments.push(PathSegment::Literal(std::mem::take(&mut literal)));
                }
                parameter = Some(String::new());
            }
            (Some(name), '}') => {
                segments.push(PathSegment::Parameter(std::mem::take(name)));
                parameter = None;
            }
            (Some(name), c) => name.push(c),
            (None, c) => literal.push(c),
        }
    }
    if !literal.is_empty() {
        segments.push(PathSegment::Literal(literal));
    }
    segments
}

/// Synthesize one request test function.
///
/// `parameters` are the operation's declared path and header parameters;
/// every one of them must have a value in `overrides.parameters`. Overrides
/// naming no declared parameter produce a warning unless suppressed by
/// `ignore_missing_parameter_warnings`. When an example payload is bound
/// (and not skipped), the body embeds it as a JSON literal and asserts the
/// decoded response equals it; otherwise the test is parse-only.
#[allow(clippy::too_many_arguments)]
pub fn request_test(
    name: &TestFunctionName,
    host: &str,
    path_template: &str,
    parameters: &[Parameter],
    overrides: &TestOverride,
    response_type: &str,
    expected_status: Option<u16>,
    example: Option<&Value>,
) -> Result<FunctionDecl, TestGenError> {
    let mut bound = BTreeSet::new();
    // Identifiers the body binds itself.
    for fixed in ["testHost", "requestUrl", "headers", "expectedPayload"] {
        bound.insert(fixed.to_string());
    }

    let mut body = vec![Stmt::Let {
        name: "testHost".to_string(),
        type_ref: None,
        value: Expr::str(host),
    }];

    let bindable: Vec<&Parameter> = parameters
        .iter()
        .filter(|p| p.location == "path" || p.location == "header")
        .collect();

    for parameter in &bindable {
        let identifier = member_identifier(&parameter.name);
        if !bound.insert(identifier.clone()) {
            return Err(TestGenError::DuplicateArgument { name: identifier });
        }
        let value = overrides.parameters.get(&parameter.name).ok_or_else(|| {
            TestGenError::ValueMissingForParameter {
                name: parameter.name.clone(),
            }
        })?;
        body.push(Stmt::Let {
            name: identifier,
            type_ref: None,
            value: Expr::str(value),
        });
    }

    if !overrides.ignore_missing_parameter_warnings {
        for supplied in overrides.parameters.keys() {
            if !bindable.iter().any(|p| &p.name == supplied) {
                warn!(
                    parameter = %supplied,
                    test = %name.canonical(),
                    "override value matches no declared parameter"
                );
            }
        }
    }

    let mut interp = vec![InterpPart::Expr(Expr::ident("testHost"))];
    for segment in parse_path_template(path_template) {
        match segment {
            PathSegment::Literal(text) => interp.push(InterpPart::Literal(text)),
            PathSegment::Parameter(parameter) => {
                interp.push(InterpPart::Expr(Expr::ident(&member_identifier(&parameter))));
            }
        }
    }
    if !overrides.query_parameters.is_empty() {
        let query: Vec<String> = overrides
            .query_parameters
            .iter()
            .map(|q| format!("{}={}", q.name, q.value))
            .collect();
        interp.push(InterpPart::Literal(format!("?{}", query.join("&"))));
    }
    body.push(Stmt::Let {
        name: "requestUrl".to_string(),
        type_ref: None,
        value: Expr::StringInterp(interp),
    });

    let mut header_pairs = vec![(
        Expr::str("Accept"),
        Expr::str("application/vnd.api+json"),
    )];
    for parameter in &bindable {
        if parameter.location == "header" {
            header_pairs.push((
                Expr::str(&parameter.name),
                Expr::ident(&member_identifier(&parameter.name)),
            ));
        }
    }
    body.push(Stmt::Let {
        name: "headers".to_string(),
        type_ref: Some(SwiftTypeRef::generic(
            "Dictionary",
            vec![SwiftTypeRef::named("String"), SwiftTypeRef::named("String")],
        )),
        value: Expr::DictLit(header_pairs),
    });

    let compared_example = if overrides.skip_example { None } else { example };
    if let Some(payload) = compared_example {
        body.push(Stmt::Let {
            name: "expectedPayload".to_string(),
            type_ref: None,
            value: Expr::str(&payload.to_string()),
        });
    }

    let mut assert_args = vec![
        (Some("url".to_string()), Expr::ident("requestUrl")),
        (Some("method".to_string()), Expr::str(name.verb.as_str())),
        (Some("headers".to_string()), Expr::ident("headers")),
    ];
    if let Some(status) = expected_status {
        assert_args.push((
            Some("expectedStatus".to_string()),
            Expr::Int(i64::from(status)),
        ));
    }
    assert_args.push((
        Some("decoding".to_string()),
        Expr::member(Expr::ident(response_type), "self"),
    ));
    if compared_example.is_some() {
        assert_args.push((
            Some("expectedPayload".to_string()),
            Expr::ident("expectedPayload"),
        ));
    }
    body.push(Stmt::Expr(Expr::call(
        Expr::ident("assertJSONAPIRequest"),
        assert_args,
    )));

    Ok(FunctionDecl {
        name: name.canonical(),
        generic_params: Vec::new(),
        generic_constraints: Vec::new(),
        params: Vec::new(),
        body,
    })
}
