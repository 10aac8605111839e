//! Swift source emission via the Emit trait.
//!
//! Each declaration-tree node implements `Emit`, converting itself to its
//! Swift source representation. All structural decisions are made before a
//! tree reaches this module; emission is string assembly only.

use super::decl::{
    BlockKind, Decl, Expr, FunctionDecl, FunctionParam, InterpPart, PropertyDecl, Stmt,
    SwiftTypeRef, TypeBlock,
};
use super::ident::escape_string;

/// Trait for emitting Swift source from declaration-tree nodes.
pub trait Emit {
    /// Convert the node to its Swift source representation.
    fn emit(&self) -> String;
}

/// Render a whole declaration forest to one source text, separated by blank
/// lines. This is the "hand the tree to the formatter" boundary.
pub fn render(decls: &[Decl]) -> String {
    let mut output = String::new();
    for (i, decl) in decls.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        output.push_str(&decl.emit());
    }
    output
}

impl Emit for SwiftTypeRef {
    fn emit(&self) -> String {
        match self {
            SwiftTypeRef::Named(name) => name.clone(),
            SwiftTypeRef::Generic { base, args } => {
                let args_str = args.iter().map(Emit::emit).collect::<Vec<_>>().join(", ");
                format!("{base}<{args_str}>")
            }
            SwiftTypeRef::Optional(inner) => format!("{}?", inner.emit()),
            SwiftTypeRef::Array(inner) => format!("[{}]", inner.emit()),
            SwiftTypeRef::Placeholder { hint } => format!("<#T##{hint}#>"),
        }
    }
}

impl Emit for BlockKind {
    fn emit(&self) -> String {
        match self {
            BlockKind::Struct => "struct".to_string(),
            BlockKind::Enum => "enum".to_string(),
            BlockKind::Extension => "extension".to_string(),
        }
    }
}

impl Emit for Expr {
    fn emit(&self) -> String {
        match self {
            Expr::Ident(name) => name.clone(),
            Expr::Str(value) => format!("\"{}\"", escape_string(value)),
            Expr::Int(value) => value.to_string(),
            Expr::Bool(value) => value.to_string(),
            Expr::Call { callee, args } => {
                let args_str = args
                    .iter()
                    .map(|(label, value)| match label {
                        Some(label) => format!("{label}: {}", value.emit()),
                        None => value.emit(),
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}({})", callee.emit(), args_str)
            }
            Expr::Member { base, name } => format!("{}.{}", base.emit(), name),
            Expr::StringInterp(parts) => {
                let content: String = parts
                    .iter()
                    .map(|part| match part {
                        InterpPart::Literal(s) => escape_string(s),
                        InterpPart::Expr(e) => format!("\\({})", e.emit()),
                    })
                    .collect();
                format!("\"{content}\"")
            }
            Expr::ArrayLit(items) => {
                let items_str = items.iter().map(Emit::emit).collect::<Vec<_>>().join(", ");
                format!("[{items_str}]")
            }
            Expr::DictLit(pairs) => {
                if pairs.is_empty() {
                    "[:]".to_string()
                } else {
                    let pairs_str = pairs
                        .iter()
                        .map(|(k, v)| format!("{}: {}", k.emit(), v.emit()))
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!("[{pairs_str}]")
                }
            }
            Expr::Raw(code) => code.clone(),
        }
    }
}

impl Emit for Stmt {
    fn emit(&self) -> String {
        self.emit_indented(1)
    }
}

impl Stmt {
    /// Emit with the given indentation level (4 spaces per level).
    pub fn emit_indented(&self, indent: usize) -> String {
        let prefix = "    ".repeat(indent);
        match self {
            Stmt::Let {
                name,
                type_ref,
                value,
            } => {
                let ty_str = type_ref
                    .as_ref()
                    .map(|t| format!(": {}", t.emit()))
                    .unwrap_or_default();
                format!("{prefix}let {name}{ty_str} = {}\n", value.emit())
            }
            Stmt::Expr(expr) => format!("{prefix}{}\n", expr.emit()),
            Stmt::Raw(code) => code
                .lines()
                .map(|line| {
                    if line.is_empty() {
                        "\n".to_string()
                    } else {
                        format!("{prefix}{line}\n")
                    }
                })
                .collect(),
        }
    }
}

impl Emit for PropertyDecl {
    fn emit(&self) -> String {
        self.emit_indented(0)
    }
}

impl PropertyDecl {
    fn emit_indented(&self, indent: usize) -> String {
        let prefix = "    ".repeat(indent);
        let access = if self.is_public { "public " } else { "" };
        let statics = if self.is_static { "static " } else { "" };
        let ty_str = self
            .type_ref
            .as_ref()
            .map(|t| format!(": {}", t.emit()))
            .unwrap_or_default();
        match &self.value {
            Some(value) => format!(
                "{prefix}{access}{statics}let {}{ty_str} = {}\n",
                self.name,
                value.emit()
            ),
            None => format!("{prefix}{access}{statics}let {}{ty_str}\n", self.name),
        }
    }
}

impl Emit for FunctionParam {
    fn emit(&self) -> String {
        match &self.label {
            Some(label) if label != &self.name => {
                format!("{label} {}: {}", self.name, self.type_ref.emit())
            }
            Some(_) | None => format!("{}: {}", self.name, self.type_ref.emit()),
        }
    }
}

impl Emit for FunctionDecl {
    fn emit(&self) -> String {
        self.emit_indented(0)
    }
}

impl FunctionDecl {
    fn emit_indented(&self, indent: usize) -> String {
        let prefix = "    ".repeat(indent);
        let generics = if self.generic_params.is_empty() {
            String::new()
        } else {
            format!("<{}>", self.generic_params.join(", "))
        };
        let params = self
            .params
            .iter()
            .map(Emit::emit)
            .collect::<Vec<_>>()
            .join(", ");
        let where_clause = if self.generic_constraints.is_empty() {
            String::new()
        } else {
            let constraints = self
                .generic_constraints
                .iter()
                .map(|(param, requirement)| format!("{param}: {requirement}"))
                .collect::<Vec<_>>()
                .join(", ");
            format!(" where {constraints}")
        };

        let mut output = format!(
            "{prefix}func {}{generics}({params}){where_clause} {{\n",
            self.name
        );
        for stmt in &self.body {
            output.push_str(&stmt.emit_indented(indent + 1));
        }
        output.push_str(&format!("{prefix}}}\n"));
        output
    }
}

impl Emit for TypeBlock {
    fn emit(&self) -> String {
        self.emit_indented(0)
    }
}

impl TypeBlock {
    fn emit_indented(&self, indent: usize) -> String {
        let prefix = "    ".repeat(indent);
        let access = if self.is_public { "public " } else { "" };
        let conformances = if self.conformances.is_empty() {
            String::new()
        } else {
            format!(": {}", self.conformances.join(", "))
        };

        let mut output = format!(
            "{prefix}{access}{} {}{conformances} {{\n",
            self.kind.emit(),
            self.name
        );
        for decl in &self.decls {
            output.push_str(&decl.emit_indented(indent + 1));
        }
        output.push_str(&format!("{prefix}}}\n"));
        output
    }
}

impl Emit for Decl {
    fn emit(&self) -> String {
        self.emit_indented(0)
    }
}

impl Decl {
    /// Emit with the given indentation level.
    pub fn emit_indented(&self, indent: usize) -> String {
        let prefix = "    ".repeat(indent);
        match self {
            Decl::Import { module } => format!("{prefix}import {module}\n"),
            Decl::Typealias {
                name,
                target,
                is_public,
            } => {
                let access = if *is_public { "public " } else { "" };
                format!("{prefix}{access}typealias {name} = {}\n", target.emit())
            }
            Decl::Property(property) => property.emit_indented(indent),
            Decl::TypeBlock(block) => block.emit_indented(indent),
            Decl::Function(function) => function.emit_indented(indent),
            Decl::Raw(code) => code
                .lines()
                .map(|line| {
                    if line.is_empty() {
                        "\n".to_string()
                    } else {
                        format!("{prefix}{line}\n")
                    }
                })
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_type_refs() {
        assert_eq!(SwiftTypeRef::named("String").emit(), "String");
        assert_eq!(
            SwiftTypeRef::generic("Attribute", vec![SwiftTypeRef::named("String")]).emit(),
            "Attribute<String>"
        );
        assert_eq!(
            SwiftTypeRef::generic(
                "Attribute",
                vec![SwiftTypeRef::named("String").optional()]
            )
            .optional()
            .emit(),
            "Attribute<String?>?"
        );
        assert_eq!(SwiftTypeRef::named("Widgets").array_of().emit(), "[Widgets]");
    }

    #[test]
    fn test_emit_placeholder_carries_hint() {
        let ty = SwiftTypeRef::placeholder("Swift Type: Any");
        assert_eq!(ty.emit(), "<#T##Swift Type: Any#>");
        assert!(ty.contains_placeholder());
        assert!(
            SwiftTypeRef::generic("Attribute", vec![ty]).contains_placeholder()
        );
    }

    #[test]
    fn test_emit_typealias() {
        let decl = Decl::typealias("Widgets", SwiftTypeRef::named("ResourceObject"));
        assert_eq!(decl.emit(), "public typealias Widgets = ResourceObject\n");
    }

    #[test]
    fn test_emit_static_property() {
        let decl = Decl::static_property(
            "jsonType",
            SwiftTypeRef::named("String"),
            Expr::str("widgets"),
        );
        assert_eq!(
            decl.emit(),
            "public static let jsonType: String = \"widgets\"\n"
        );
    }

    #[test]
    fn test_emit_struct_block_nested() {
        let decl = Decl::block(
            BlockKind::Struct,
            "Attributes",
            &["Codable", "Equatable"],
            vec![Decl::let_property(
                "productName",
                SwiftTypeRef::generic("Attribute", vec![SwiftTypeRef::named("String")]),
            )],
        );
        let expected = "public struct Attributes: Codable, Equatable {\n    public let productName: Attribute<String>\n}\n";
        assert_eq!(decl.emit(), expected);
    }

    #[test]
    fn test_emit_function_with_constraints() {
        let decl = Decl::Function(FunctionDecl {
            name: "decode".to_string(),
            generic_params: vec!["T".to_string()],
            generic_constraints: vec![("T".to_string(), "Decodable".to_string())],
            params: vec![FunctionParam {
                label: Some("from".to_string()),
                name: "data".to_string(),
                type_ref: SwiftTypeRef::named("Data"),
            }],
            body: vec![Stmt::Raw("return try JSONDecoder().decode(T.self, from: data)".to_string())],
        });
        let emitted = decl.emit();
        assert!(emitted.contains("func decode<T>(from data: Data) where T: Decodable {"));
        assert!(emitted.contains("    return try JSONDecoder().decode(T.self, from: data)"));
    }

    #[test]
    fn test_emit_string_interpolation() {
        let expr = Expr::StringInterp(vec![
            InterpPart::Expr(Expr::ident("testHost")),
            InterpPart::Literal("/widgets/".to_string()),
            InterpPart::Expr(Expr::ident("widgetId")),
        ]);
        assert_eq!(expr.emit(), "\"\\(testHost)/widgets/\\(widgetId)\"");
    }

    #[test]
    fn test_emit_dict_literal() {
        assert_eq!(Expr::DictLit(vec![]).emit(), "[:]");
        let dict = Expr::DictLit(vec![(Expr::str("Accept"), Expr::str("application/vnd.api+json"))]);
        assert_eq!(dict.emit(), "[\"Accept\": \"application/vnd.api+json\"]");
    }

    #[test]
    fn test_render_separates_decls() {
        let source = render(&[
            Decl::Import {
                module: "JSONAPI".to_string(),
            },
            Decl::typealias("A", SwiftTypeRef::named("B")),
        ]);
        assert_eq!(source, "import JSONAPI\n\npublic typealias A = B\n");
    }
}
