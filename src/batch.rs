//! Batch driver: one OpenAPI document in, declarations plus tests out.
//!
//! Each (path, verb, status) unit is processed independently; a failing unit
//! is recorded and excluded from output, never aborting its siblings. The
//! walk order is deterministic (paths and statuses sorted), so output is
//! stable across runs.

use std::fmt;

use tracing::{debug, warn};

use crate::error::UnitError;
use crate::synth::context::GenerationContext;
use crate::synth::reverse::{self, ReverseOptions};
use crate::synth::testgen::{self, Direction, HttpVerb, TestFunctionName};
use crate::schema::SchemaNode;
use crate::spec::{MediaType, OpenApiDocument, Operation, Parameter, TestOverride};
use crate::swift::decl::{Decl, FunctionDecl};
use crate::swift::emit::render;

/// Run-wide configuration.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    pub allow_placeholders: bool,
    /// Suite-wide host override, between per-test `test_host` and the
    /// document's server URL in precedence.
    pub host_override: Option<String>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            // Same lenient default as [`ReverseOptions`]: unmapped schemas
            // degrade to placeholder identifiers instead of failing the unit.
            allow_placeholders: true,
            host_override: None,
        }
    }
}

/// One failed generation unit, with enough context to locate the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFailure {
    pub verb: HttpVerb,
    pub path: String,
    /// Response status code, or `"request"` for a request-body unit.
    pub status: String,
    pub error: UnitError,
}

impl fmt::Display for UnitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}]: {}",
            self.verb.as_str().to_uppercase(),
            self.path,
            self.status,
            self.error
        )
    }
}

/// Everything one generation run produced.
#[derive(Debug, Default)]
pub struct BatchOutput {
    pub declarations: Vec<Decl>,
    pub tests: Vec<FunctionDecl>,
    pub failures: Vec<UnitFailure>,
}

impl BatchOutput {
    /// Render the full generated source: imports, type declarations, then
    /// test functions.
    pub fn render(&self) -> String {
        let mut decls = vec![
            Decl::Import {
                module: "Foundation".to_string(),
            },
            Decl::Import {
                module: "JSONAPI".to_string(),
            },
        ];
        decls.extend(self.declarations.iter().cloned());
        decls.extend(self.tests.iter().cloned().map(Decl::Function));
        render(&decls)
    }

    /// One line per failed unit, for the batch report.
    pub fn failure_report(&self) -> String {
        self.failures
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

const VERBS: [HttpVerb; 5] = [
    HttpVerb::Get,
    HttpVerb::Post,
    HttpVerb::Put,
    HttpVerb::Patch,
    HttpVerb::Delete,
];

/// Generate declarations and tests for every unit in the document.
pub fn generate(document: &OpenApiDocument, options: &GeneratorOptions) -> BatchOutput {
    let reverse_options = ReverseOptions {
        allow_placeholders: options.allow_placeholders,
    };
    let server_url = document.servers.first().map(|s| s.url.as_str());

    let mut ctx = GenerationContext::new();
    let mut tests = Vec::new();
    let mut failures = Vec::new();

    for (path, item) in &document.paths {
        for verb in VERBS {
            let operation = match verb {
                HttpVerb::Get => &item.get,
                HttpVerb::Post => &item.post,
                HttpVerb::Put => &item.put,
                HttpVerb::Patch => &item.patch,
                HttpVerb::Delete => &item.delete,
            };
            let Some(operation) = operation else {
                continue;
            };

            let mut parameters: Vec<Parameter> =
                item.parameters.clone().unwrap_or_default();
            if let Some(own) = &operation.parameters {
                parameters.extend(own.iter().cloned());
            }

            run_operation(
                path,
                verb,
                operation,
                &parameters,
                server_url,
                options,
                &reverse_options,
                &mut ctx,
                &mut tests,
                &mut failures,
            );
        }
    }

    for json_type in ctx.pending_relationship_targets() {
        debug!(%json_type, "emitting relationship stub");
        for decl in reverse::stub_declarations(&json_type) {
            // A stub can only conflict with another stub of the same name,
            // and those are structurally identical.
            if let Err(error) = ctx.insert_declaration(decl) {
                warn!(%json_type, %error, "stub declaration collided");
            }
        }
    }

    BatchOutput {
        declarations: ctx.into_declarations(),
        tests,
        failures,
    }
}

#[allow(clippy::too_many_arguments)]
fn run_operation(
    path: &str,
    verb: HttpVerb,
    operation: &Operation,
    parameters: &[Parameter],
    server_url: Option<&str>,
    options: &GeneratorOptions,
    reverse_options: &ReverseOptions,
    ctx: &mut GenerationContext,
    tests: &mut Vec<FunctionDecl>,
    failures: &mut Vec<UnitFailure>,
) {
    let hint = name_hint(path);

    if let Some(body) = &operation.request_body {
        if let Some(media) = json_media(body.content.as_ref()) {
            if let Some(schema) = &media.schema {
                let node = SchemaNode::from_raw(schema);
                debug!(path, verb = verb.as_str(), "recovering request document");
                if let Err(error) =
                    reverse::document_declarations(&node, &hint, ctx, reverse_options)
                {
                    record_failure(failures, verb, path, "request", error.into());
                }
            }
        }
    }

    for (status, response) in &operation.responses {
        let Some(media) = json_media(response.content.as_ref()) else {
            continue;
        };
        let Some(schema) = &media.schema else {
            continue;
        };

        let node = SchemaNode::from_raw(schema);
        debug!(path, verb = verb.as_str(), %status, "recovering response document");
        let type_name = match reverse::document_declarations(&node, &hint, ctx, reverse_options)
        {
            Ok(type_name) => type_name,
            Err(error) => {
                record_failure(failures, verb, path, status, error.into());
                continue;
            }
        };

        for (slug, override_config, example) in test_cases(media, response) {
            if let Err(error) = synthesize_test(
                path,
                verb,
                status,
                &slug,
                &override_config,
                example,
                parameters,
                server_url,
                options,
                &type_name,
                ctx,
                tests,
            ) {
                record_failure(failures, verb, path, status, error.into());
            }
        }
    }
}

/// Test cases for one response: every example payload plus every `x-tests`
/// entry, merged by slug. An `x-tests` entry with no matching example still
/// gets a parse-only test.
fn test_cases<'a>(
    media: &'a MediaType,
    response: &crate::spec::Response,
) -> Vec<(String, TestOverride, Option<&'a serde_json::Value>)> {
    let mut cases = Vec::new();
    let examples = media.example_payloads();

    for (slug, payload) in &examples {
        let override_config = response.x_tests.get(slug).cloned().unwrap_or_default();
        cases.push((slug.clone(), override_config, Some(*payload)));
    }
    for (slug, override_config) in &response.x_tests {
        if !examples.iter().any(|(name, _)| name == slug) {
            cases.push((slug.clone(), override_config.clone(), None));
        }
    }
    cases
}

#[allow(clippy::too_many_arguments)]
fn synthesize_test(
    path: &str,
    verb: HttpVerb,
    status: &str,
    slug: &str,
    override_config: &TestOverride,
    example: Option<&serde_json::Value>,
    parameters: &[Parameter],
    server_url: Option<&str>,
    options: &GeneratorOptions,
    type_name: &str,
    ctx: &mut GenerationContext,
    tests: &mut Vec<FunctionDecl>,
) -> Result<(), crate::error::TestGenError> {
    let components = path_name_components(path);
    let component_refs: Vec<&str> = components.iter().map(String::as_str).collect();
    let name = TestFunctionName::new(slug, &component_refs, verb, Direction::Response, status)?;
    ctx.register_test_name(&name.canonical())?;

    let host = testgen::resolve_host(
        override_config.test_host.as_deref(),
        options.host_override.as_deref(),
        server_url,
    )?;
    let expected_status = status.parse::<u16>().ok();
    let decl = testgen::request_test(
        &name,
        &host,
        path,
        parameters,
        override_config,
        type_name,
        expected_status,
        example,
    )?;
    tests.push(decl);
    Ok(())
}

fn record_failure(
    failures: &mut Vec<UnitFailure>,
    verb: HttpVerb,
    path: &str,
    status: &str,
    error: UnitError,
) {
    let failure = UnitFailure {
        verb,
        path: path.to_string(),
        status: status.to_string(),
        error,
    };
    warn!(%failure, "generation unit failed");
    failures.push(failure);
}

/// The JSON media type of a content map, preferring `application/json` and
/// falling back to the lexicographically first JSON-ish entry (e.g.
/// `application/vnd.api+json`), so the pick is stable across runs.
fn json_media(
    content: Option<&std::collections::HashMap<String, MediaType>>,
) -> Option<&MediaType> {
    let content = content?;
    content.get("application/json").or_else(|| {
        let mut candidates: Vec<(&String, &MediaType)> = content
            .iter()
            .filter(|(key, _)| key.contains("json"))
            .collect();
        candidates.sort_by_key(|(key, _)| *key);
        candidates.first().map(|(_, media)| *media)
    })
}

/// Path components usable in a test function name: template braces stripped.
fn path_name_components(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.trim_matches(['{', '}']).to_string())
        .collect()
}

/// A readable type-name hint for a path: its last literal segment.
fn name_hint(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty() && !segment.starts_with('{'))
        .next_back()
        .unwrap_or("document")
        .to_string()
}
