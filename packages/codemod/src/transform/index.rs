//! Program Index
//!
//! An owned, allocator-free view of one parse of the source: import declarations, calls
//! through a plain identifier callee, identifier references, statement-level declarations
//! and return statements. Every query of a round runs against this index; the arena the
//! tree lived in is dropped as soon as the index is built.

use std::collections::{HashMap, HashSet};

use oxc_ast::ast::{
    Argument, ArrayExpression, ArrayExpressionElement, ArrowFunctionExpression, CallExpression,
    Expression, ExpressionStatement, Function, FunctionBody, IdentifierReference,
    ImportDeclaration, ImportDeclarationSpecifier, JSXChild, JSXExpressionContainer,
    NewExpression, ParenthesizedExpression, ReturnStatement, Statement, TemplateLiteral,
    VariableDeclarationKind, VariableDeclarator,
};
use oxc_ast_visit::{walk, Visit};
use oxc_semantic::Scoping;
use oxc_span::{GetSpan, Span};
use oxc_syntax::scope::ScopeFlags;
use oxc_syntax::symbol::SymbolId;

/// Whether `inner` lies within `outer`.
pub fn span_contains(outer: Span, inner: Span) -> bool {
    outer.start <= inner.start && inner.end <= outer.end
}

#[derive(Debug, Default)]
pub struct ProgramIndex {
    pub imports: Vec<ImportInfo>,
    /// Calls whose callee is a plain identifier, in source pre-order.
    pub calls: Vec<CallInfo>,
    pub references: Vec<ReferenceInfo>,
    /// Declarations sitting directly in a statement list. Exported ones are not recorded.
    pub declarations: Vec<DeclarationInfo>,
    /// Return statements and the span of their enclosing function.
    pub returns: Vec<(Span, Option<Span>)>,
}

impl ProgramIndex {
    pub fn has_own_return(&self, function: Span) -> bool {
        self.returns
            .iter()
            .any(|(_, enclosing)| *enclosing == Some(function))
    }

    pub fn import(&self, statement: Span) -> Option<&ImportInfo> {
        self.imports.iter().find(|import| import.span == statement)
    }
}

#[derive(Debug, Clone)]
pub struct ImportInfo {
    pub span: Span,
    pub source: String,
    pub is_type: bool,
    pub specifiers: Vec<SpecifierInfo>,
}

#[derive(Debug, Clone)]
pub struct SpecifierInfo {
    pub span: Span,
    pub kind: SpecifierKind,
    pub local: String,
    pub symbol: Option<SymbolId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecifierKind {
    Default,
    Namespace,
    Named { imported: String, is_type: bool },
}

#[derive(Debug, Clone)]
pub struct CallInfo {
    pub span: Span,
    pub callee: String,
    pub callee_symbol: Option<SymbolId>,
    pub slot: Slot,
    pub arguments: Vec<ArgumentInfo>,
}

/// Syntactic position of an expression, as seen by its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// The whole expression of an expression statement.
    Statement { statement: Span, listed: bool },
    /// Directly inside `${ }`; `target` is the slot's full expression, parentheses included.
    Interpolation { target: Span },
    /// A JSX child `{ }` container.
    JsxChild { container: Span },
    /// An array element or call argument. `element` includes any parentheses; the
    /// neighbours are the adjacent items of the same list.
    ListElement {
        element: Span,
        previous: Option<Span>,
        next: Option<Span>,
    },
    /// A position where any assignment expression is allowed without parentheses.
    Free,
    /// Operand of some other expression.
    Nested,
}

#[derive(Debug, Clone)]
pub enum ArgumentInfo {
    Spread(Span),
    Expression(ExprInfo),
}

impl ArgumentInfo {
    pub fn span(&self) -> Span {
        match self {
            Self::Spread(span) => *span,
            Self::Expression(expr) => expr.span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExprInfo {
    pub span: Span,
    pub shape: ExprShape,
}

#[derive(Debug, Clone)]
pub enum ExprShape {
    Null,
    String(String),
    /// Template literal, possibly tagged by an identifier or a static member chain.
    Template { tag: Option<Span>, quasi: Span },
    Function(Box<FunctionShape>),
    Primary,
    /// Would be read as a declaration or block at the start of a statement.
    StatementAmbiguous,
    Compound,
}

impl ExprShape {
    /// Safe as an operand of any other expression.
    pub fn is_primary(&self) -> bool {
        matches!(
            self,
            Self::Null | Self::String(_) | Self::Template { .. } | Self::Primary
        )
    }

    pub fn is_statement_ambiguous(&self) -> bool {
        match self {
            Self::StatementAmbiguous => true,
            Self::Function(function) => !function.is_arrow,
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FunctionShape {
    pub span: Span,
    pub is_arrow: bool,
    /// No parameters, not async, not a generator.
    pub simple: bool,
    pub body: BodyShape,
}

#[derive(Debug, Clone)]
pub enum BodyShape {
    Expression(ExprInfo),
    Block {
        /// Includes the braces.
        span: Span,
        empty: bool,
        sole_return: Option<ExprInfo>,
        /// Declares `let`/`const`/class/function bindings at the top level.
        declares_bindings: bool,
    },
}

#[derive(Debug, Clone)]
pub struct ReferenceInfo {
    pub name: String,
    pub span: Span,
    pub symbol: Option<SymbolId>,
}

#[derive(Debug, Clone)]
pub struct DeclarationInfo {
    pub name: String,
    pub symbol: Option<SymbolId>,
    pub span: Span,
    pub statement: Span,
    pub kind: DeclarationKind,
}

#[derive(Debug, Clone)]
pub enum DeclarationKind {
    /// One declarator of a `var`/`let`/`const` statement.
    Declarator { position: usize, siblings: Vec<Span> },
    Function,
    Class,
}

/// Build the index of a parsed program.
pub fn index_program(program: &oxc_ast::ast::Program<'_>, scoping: &Scoping) -> ProgramIndex {
    let mut indexer = Indexer {
        scoping,
        index: ProgramIndex::default(),
        slots: HashMap::new(),
        listed: HashSet::new(),
        functions: Vec::new(),
    };
    indexer.visit_program(program);
    indexer.index
}

struct Indexer<'s> {
    scoping: &'s Scoping,
    index: ProgramIndex,
    /// Slots assigned by parents, keyed by the child expression's span.
    slots: HashMap<Span, Slot>,
    /// Statements that are direct members of a statement list.
    listed: HashSet<Span>,
    functions: Vec<Span>,
}

impl Indexer<'_> {
    fn mark(&mut self, span: Span, slot: Slot) {
        self.slots.entry(span).or_insert(slot);
    }

    /// Mark every expression item of a comma separated list. `items` pairs each item's
    /// span with whether it is a plain expression.
    fn mark_list(&mut self, items: &[(Span, bool)]) {
        for (position, (element, is_expression)) in items.iter().enumerate() {
            if !is_expression {
                continue;
            }
            let slot = Slot::ListElement {
                element: *element,
                previous: position.checked_sub(1).map(|p| items[p].0),
                next: items.get(position + 1).map(|(span, _)| *span),
            };
            self.mark(*element, slot);
        }
    }

    fn mark_arguments(&mut self, arguments: &[Argument<'_>]) {
        let items: Vec<(Span, bool)> = arguments
            .iter()
            .map(|argument| (argument.span(), argument.as_expression().is_some()))
            .collect();
        self.mark_list(&items);
    }

    fn resolve(&self, ident: &IdentifierReference<'_>) -> Option<SymbolId> {
        ident
            .reference_id
            .get()
            .and_then(|id| self.scoping.get_reference(id).symbol_id())
    }

    fn record_declarations(&mut self, statement: &Statement<'_>) {
        match statement {
            Statement::VariableDeclaration(decl) => {
                let siblings: Vec<Span> = decl.declarations.iter().map(|d| d.span).collect();
                for (position, declarator) in decl.declarations.iter().enumerate() {
                    let Some(id) = declarator.id.get_binding_identifier() else {
                        continue;
                    };
                    self.index.declarations.push(DeclarationInfo {
                        name: id.name.to_string(),
                        symbol: id.symbol_id.get(),
                        span: declarator.span,
                        statement: decl.span,
                        kind: DeclarationKind::Declarator {
                            position,
                            siblings: siblings.clone(),
                        },
                    });
                }
            }
            Statement::FunctionDeclaration(function) => {
                if let Some(id) = &function.id {
                    self.index.declarations.push(DeclarationInfo {
                        name: id.name.to_string(),
                        symbol: id.symbol_id.get(),
                        span: function.span,
                        statement: function.span,
                        kind: DeclarationKind::Function,
                    });
                }
            }
            Statement::ClassDeclaration(class) => {
                if let Some(id) = &class.id {
                    self.index.declarations.push(DeclarationInfo {
                        name: id.name.to_string(),
                        symbol: id.symbol_id.get(),
                        span: class.span,
                        statement: class.span,
                        kind: DeclarationKind::Class,
                    });
                }
            }
            _ => {}
        }
    }
}

impl<'a> Visit<'a> for Indexer<'_> {
    fn visit_statements(&mut self, it: &oxc_allocator::Vec<'a, Statement<'a>>) {
        for statement in it.iter() {
            self.listed.insert(statement.span());
            self.record_declarations(statement);
        }
        walk::walk_statements(self, it);
    }

    fn visit_import_declaration(&mut self, it: &ImportDeclaration<'a>) {
        let specifiers = it
            .specifiers
            .iter()
            .flatten()
            .map(|specifier| match specifier {
                ImportDeclarationSpecifier::ImportSpecifier(s) => SpecifierInfo {
                    span: s.span,
                    kind: SpecifierKind::Named {
                        imported: s.imported.name().to_string(),
                        is_type: s.import_kind.is_type(),
                    },
                    local: s.local.name.to_string(),
                    symbol: s.local.symbol_id.get(),
                },
                ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => SpecifierInfo {
                    span: s.span,
                    kind: SpecifierKind::Default,
                    local: s.local.name.to_string(),
                    symbol: s.local.symbol_id.get(),
                },
                ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => SpecifierInfo {
                    span: s.span,
                    kind: SpecifierKind::Namespace,
                    local: s.local.name.to_string(),
                    symbol: s.local.symbol_id.get(),
                },
            })
            .collect();

        self.index.imports.push(ImportInfo {
            span: it.span,
            source: it.source.value.to_string(),
            is_type: it.import_kind.is_type(),
            specifiers,
        });
        walk::walk_import_declaration(self, it);
    }

    fn visit_expression_statement(&mut self, it: &ExpressionStatement<'a>) {
        let listed = self.listed.contains(&it.span);
        self.mark(
            it.expression.span(),
            Slot::Statement {
                statement: it.span,
                listed,
            },
        );
        walk::walk_expression_statement(self, it);
    }

    fn visit_parenthesized_expression(&mut self, it: &ParenthesizedExpression<'a>) {
        let inherited = match self.slots.get(&it.span) {
            Some(
                slot @ (Slot::Statement { .. }
                | Slot::Interpolation { .. }
                | Slot::JsxChild { .. }
                | Slot::ListElement { .. }),
            ) => *slot,
            _ => Slot::Free,
        };
        self.mark(it.expression.span(), inherited);
        walk::walk_parenthesized_expression(self, it);
    }

    fn visit_template_literal(&mut self, it: &TemplateLiteral<'a>) {
        for expression in &it.expressions {
            let target = expression.span();
            self.mark(target, Slot::Interpolation { target });
        }
        walk::walk_template_literal(self, it);
    }

    fn visit_jsx_child(&mut self, it: &JSXChild<'a>) {
        if let JSXChild::ExpressionContainer(container) = it {
            if let Some(expression) = container.expression.as_expression() {
                self.mark(
                    expression.span(),
                    Slot::JsxChild {
                        container: container.span,
                    },
                );
            }
        }
        walk::walk_jsx_child(self, it);
    }

    fn visit_jsx_expression_container(&mut self, it: &JSXExpressionContainer<'a>) {
        if let Some(expression) = it.expression.as_expression() {
            self.mark(expression.span(), Slot::Free);
        }
        walk::walk_jsx_expression_container(self, it);
    }

    fn visit_variable_declarator(&mut self, it: &VariableDeclarator<'a>) {
        if let Some(init) = &it.init {
            self.mark(init.span(), Slot::Free);
        }
        walk::walk_variable_declarator(self, it);
    }

    fn visit_return_statement(&mut self, it: &ReturnStatement<'a>) {
        if let Some(argument) = &it.argument {
            self.mark(argument.span(), Slot::Free);
        }
        self.index
            .returns
            .push((it.span, self.functions.last().copied()));
        walk::walk_return_statement(self, it);
    }

    fn visit_arrow_function_expression(&mut self, it: &ArrowFunctionExpression<'a>) {
        if it.expression {
            if let Some(Statement::ExpressionStatement(body)) = it.body.statements.first() {
                self.mark(body.expression.span(), Slot::Free);
            }
        }
        self.functions.push(it.span);
        walk::walk_arrow_function_expression(self, it);
        self.functions.pop();
    }

    fn visit_function(&mut self, it: &Function<'a>, flags: ScopeFlags) {
        self.functions.push(it.span);
        walk::walk_function(self, it, flags);
        self.functions.pop();
    }

    fn visit_array_expression(&mut self, it: &ArrayExpression<'a>) {
        let holes = it
            .elements
            .iter()
            .any(|element| matches!(element, ArrayExpressionElement::Elision(_)));
        if holes {
            for element in &it.elements {
                if let Some(expression) = element.as_expression() {
                    self.mark(expression.span(), Slot::Free);
                }
            }
        } else {
            let items: Vec<(Span, bool)> = it
                .elements
                .iter()
                .map(|element| (element.span(), element.as_expression().is_some()))
                .collect();
            self.mark_list(&items);
        }
        walk::walk_array_expression(self, it);
    }

    fn visit_new_expression(&mut self, it: &NewExpression<'a>) {
        self.mark_arguments(&it.arguments);
        walk::walk_new_expression(self, it);
    }

    fn visit_call_expression(&mut self, it: &CallExpression<'a>) {
        self.mark_arguments(&it.arguments);

        if let Expression::Identifier(callee) = &it.callee {
            let call = CallInfo {
                span: it.span,
                callee: callee.name.to_string(),
                callee_symbol: self.resolve(callee),
                slot: self.slots.get(&it.span).copied().unwrap_or(Slot::Nested),
                arguments: it.arguments.iter().map(classify_argument).collect(),
            };
            self.index.calls.push(call);
        }
        walk::walk_call_expression(self, it);
    }

    fn visit_identifier_reference(&mut self, it: &IdentifierReference<'a>) {
        let symbol = self.resolve(it);
        self.index.references.push(ReferenceInfo {
            name: it.name.to_string(),
            span: it.span,
            symbol,
        });
    }
}

fn classify_argument(argument: &Argument<'_>) -> ArgumentInfo {
    match argument {
        Argument::SpreadElement(spread) => ArgumentInfo::Spread(spread.span),
        _ => match argument.as_expression() {
            Some(expression) => ArgumentInfo::Expression(classify(expression)),
            None => ArgumentInfo::Spread(argument.span()),
        },
    }
}

pub(crate) fn classify(expression: &Expression<'_>) -> ExprInfo {
    let shape = match expression {
        Expression::NullLiteral(_) => ExprShape::Null,
        Expression::StringLiteral(literal) => ExprShape::String(literal.value.to_string()),
        Expression::TemplateLiteral(template) => ExprShape::Template {
            tag: None,
            quasi: template.span,
        },
        Expression::TaggedTemplateExpression(tagged) if is_plain_tag(&tagged.tag) => {
            ExprShape::Template {
                tag: Some(tagged.tag.span()),
                quasi: tagged.quasi.span,
            }
        }
        Expression::ArrowFunctionExpression(arrow) => ExprShape::Function(Box::new(FunctionShape {
            span: arrow.span,
            is_arrow: true,
            simple: arrow.params.items.is_empty() && arrow.params.rest.is_none() && !arrow.r#async,
            body: body_shape(&arrow.body, arrow.expression),
        })),
        Expression::FunctionExpression(function) => match &function.body {
            Some(body) => ExprShape::Function(Box::new(FunctionShape {
                span: function.span,
                is_arrow: false,
                simple: function.params.items.is_empty()
                    && function.params.rest.is_none()
                    && !function.r#async
                    && !function.generator,
                body: body_shape(body, false),
            })),
            None => ExprShape::StatementAmbiguous,
        },
        Expression::ObjectExpression(_) | Expression::ClassExpression(_) => {
            ExprShape::StatementAmbiguous
        }
        _ if is_primary(expression) => ExprShape::Primary,
        _ => ExprShape::Compound,
    };
    ExprInfo {
        span: expression.span(),
        shape,
    }
}

fn body_shape(body: &FunctionBody<'_>, expression_body: bool) -> BodyShape {
    if expression_body {
        if let Some(Statement::ExpressionStatement(statement)) = body.statements.first() {
            return BodyShape::Expression(classify(&statement.expression));
        }
    }

    let sole_return = match body.statements.first() {
        Some(Statement::ReturnStatement(ret)) if body.statements.len() == 1 => {
            ret.argument.as_ref().map(classify)
        }
        _ => None,
    };
    let declares_bindings = body.statements.iter().any(|statement| match statement {
        Statement::VariableDeclaration(decl) => decl.kind != VariableDeclarationKind::Var,
        Statement::FunctionDeclaration(_) | Statement::ClassDeclaration(_) => true,
        _ => false,
    });
    BodyShape::Block {
        span: body.span,
        empty: body.statements.is_empty() && body.directives.is_empty(),
        sole_return,
        declares_bindings,
    }
}

fn is_plain_tag(tag: &Expression<'_>) -> bool {
    match tag {
        Expression::Identifier(_) => true,
        Expression::StaticMemberExpression(member) => is_plain_tag(&member.object),
        _ => false,
    }
}

fn is_primary(expression: &Expression<'_>) -> bool {
    matches!(
        expression,
        Expression::Identifier(_)
            | Expression::BooleanLiteral(_)
            | Expression::NumericLiteral(_)
            | Expression::BigIntLiteral(_)
            | Expression::RegExpLiteral(_)
            | Expression::ThisExpression(_)
            | Expression::Super(_)
            | Expression::ArrayExpression(_)
            | Expression::CallExpression(_)
            | Expression::NewExpression(_)
            | Expression::ComputedMemberExpression(_)
            | Expression::StaticMemberExpression(_)
            | Expression::PrivateFieldExpression(_)
            | Expression::ParenthesizedExpression(_)
            | Expression::MetaProperty(_)
            | Expression::TaggedTemplateExpression(_)
            | Expression::JSXElement(_)
            | Expression::JSXFragment(_)
    )
}
