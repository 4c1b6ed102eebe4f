/// Syntax node kinds the graph builder understands.
///
/// Anything else maps to [`NodeKind::Other`]: such nodes never produce graph
/// entities but are still traversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,

    // Imports
    ImportStatement,
    ImportClause,
    NamedImports,
    ImportSpecifier,
    NamespaceImport,

    // Callables
    FunctionDeclaration,
    GeneratorFunctionDeclaration,
    FunctionExpression,
    ArrowFunction,
    MethodDefinition,
    FormalParameters,

    // Classes
    ClassDeclaration,
    ClassHeritage,
    ClassBody,

    // Variables
    VariableDeclaration,
    LexicalDeclaration,
    VariableDeclarator,

    // Expressions
    CallExpression,
    MemberExpression,
    Identifier,
    TypeIdentifier,
    ShorthandPropertyIdentifier,
    ShorthandPropertyIdentifierPattern,
    String,
    StringFragment,

    // Blocks
    StatementBlock,
    ForStatement,
    ForInStatement,
    CatchClause,

    Other,
}

impl NodeKind {
    /// Classify a parser node type tag
    pub fn from_type(node_type: &str) -> Self {
        match node_type {
            "program" => Self::Program,
            "import_statement" => Self::ImportStatement,
            "import_clause" => Self::ImportClause,
            "named_imports" => Self::NamedImports,
            "import_specifier" => Self::ImportSpecifier,
            "namespace_import" => Self::NamespaceImport,
            "function_declaration" => Self::FunctionDeclaration,
            "generator_function_declaration" => Self::GeneratorFunctionDeclaration,
            "function_expression" | "generator_function" => Self::FunctionExpression,
            "arrow_function" => Self::ArrowFunction,
            "method_definition" => Self::MethodDefinition,
            "formal_parameters" | "formal_parameter_list" => Self::FormalParameters,
            "class_declaration" => Self::ClassDeclaration,
            "class_heritage" => Self::ClassHeritage,
            "class_body" => Self::ClassBody,
            "variable_declaration" => Self::VariableDeclaration,
            "lexical_declaration" => Self::LexicalDeclaration,
            "variable_declarator" => Self::VariableDeclarator,
            "call_expression" => Self::CallExpression,
            "member_expression" => Self::MemberExpression,
            "identifier" => Self::Identifier,
            "type_identifier" => Self::TypeIdentifier,
            "shorthand_property_identifier" => Self::ShorthandPropertyIdentifier,
            "shorthand_property_identifier_pattern" => Self::ShorthandPropertyIdentifierPattern,
            "string" => Self::String,
            "string_fragment" => Self::StringFragment,
            "statement_block" => Self::StatementBlock,
            "for_statement" => Self::ForStatement,
            "for_in_statement" => Self::ForInStatement,
            "catch_clause" => Self::CatchClause,
            _ => Self::Other,
        }
    }

    /// Kinds that open a function scope (parameters, hoisted `var`)
    pub const fn is_function_like(self) -> bool {
        matches!(
            self,
            Self::FunctionDeclaration
                | Self::GeneratorFunctionDeclaration
                | Self::FunctionExpression
                | Self::ArrowFunction
                | Self::MethodDefinition
        )
    }

    /// Kinds that open a block scope for `let`/`const`/`class`
    pub const fn is_block_like(self) -> bool {
        matches!(
            self,
            Self::StatementBlock
                | Self::ForStatement
                | Self::ForInStatement
                | Self::CatchClause
                | Self::ClassBody
        )
    }

    /// `var`-style or `let`/`const`-style declaration statements
    pub const fn is_variable_declaration(self) -> bool {
        matches!(self, Self::VariableDeclaration | Self::LexicalDeclaration)
    }

    /// Identifier leaves that can name a binding inside a pattern
    pub const fn is_binding_identifier(self) -> bool {
        matches!(self, Self::Identifier | Self::ShorthandPropertyIdentifierPattern)
    }

    /// Identifier leaves that read a binding (`x`, or `{ x }` in an object literal)
    pub const fn is_reference_identifier(self) -> bool {
        matches!(self, Self::Identifier | Self::ShorthandPropertyIdentifier)
    }
}
