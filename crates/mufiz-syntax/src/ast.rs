//! Typed wrappers around the raw syntax tree.
//!
//! Every wrapper is a zero-cost view over a [`SyntaxNode`] of one kind. The
//! [`Stmt`] and [`Expr`] enums close over all statement and expression kinds,
//! so consumers match on them exhaustively.

use crate::SyntaxKind::{self, *};
use crate::{Field, SyntaxNode, SyntaxToken};

pub trait AstNode<'a>: Sized {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self>;

    fn syntax(self) -> SyntaxNode<'a>;
}

fn child<'a, N: AstNode<'a>>(parent: SyntaxNode<'a>, field: Field) -> Option<N> {
    parent.node_by_field(field).and_then(N::cast)
}

fn children<'a, N: AstNode<'a> + 'a>(parent: SyntaxNode<'a>) -> impl Iterator<Item = N> + 'a {
    parent.children().filter_map(N::cast)
}

macro_rules! ast_node {
    ($($(#[$attr:meta])* $name:ident => $kind:ident),* $(,)?) => {$(
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name<'a>(SyntaxNode<'a>);

        impl<'a> AstNode<'a> for $name<'a> {
            fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
                (syntax.kind() == $kind).then_some(Self(syntax))
            }

            fn syntax(self) -> SyntaxNode<'a> {
                self.0
            }
        }
    )*};
}

ast_node! {
    SourceFile => SOURCE_FILE,
    ExpressionStatement => EXPRESSION_STATEMENT,
    VariableDeclaration => VARIABLE_DECLARATION,
    PrintStatement => PRINT_STATEMENT,
    IfStatement => IF_STATEMENT,
    WhileStatement => WHILE_STATEMENT,
    ForStatement => FOR_STATEMENT,
    ForeachStatement => FOREACH_STATEMENT,
    FunctionDeclaration => FUNCTION_DECLARATION,
    ClassDeclaration => CLASS_DECLARATION,
    ClassBody => CLASS_BODY,
    MethodDeclaration => METHOD_DECLARATION,
    ParameterList => PARAMETER_LIST,
    ReturnStatement => RETURN_STATEMENT,
    BlockStatement => BLOCK_STATEMENT,

    AssignmentExpression => ASSIGNMENT_EXPRESSION,
    LogicalOrExpression => LOGICAL_OR_EXPRESSION,
    LogicalAndExpression => LOGICAL_AND_EXPRESSION,
    EqualityExpression => EQUALITY_EXPRESSION,
    ComparisonExpression => COMPARISON_EXPRESSION,
    AdditionExpression => ADDITION_EXPRESSION,
    MultiplicationExpression => MULTIPLICATION_EXPRESSION,
    UnaryExpression => UNARY_EXPRESSION,
    CallExpression => CALL_EXPRESSION,
    ArgumentList => ARGUMENT_LIST,
    MemberExpression => MEMBER_EXPRESSION,
    IndexExpression => INDEX_EXPRESSION,
    VectorLiteral => VECTOR_LITERAL,
    HashTableLiteral => HASH_TABLE_LITERAL,
    HashPair => HASH_PAIR,
    LinkedListLiteral => LINKED_LIST_LITERAL,
    ParenthesizedExpression => PARENTHESIZED_EXPRESSION,
    ComplexNumber => COMPLEX_NUMBER,
    Identifier => IDENTIFIER,
    NumberLiteral => NUMBER,
    StringLiteral => STRING,
    BooleanLiteral => BOOLEAN,
    NilLiteral => NIL,
    SelfExpression => SELF,
    SuperExpression => SUPER,
    /// Region the parser could not make sense of.
    ErrorNode => ERROR,
}

macro_rules! closed_enum {
    ($(#[$attr:meta])* $name:ident { $($variant:ident($ty:ident)),* $(,)? }) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name<'a> {
            $($variant($ty<'a>),)*
        }

        impl<'a> AstNode<'a> for $name<'a> {
            fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
                None$(.or_else(|| $ty::cast(syntax).map(Self::$variant)))*
            }

            fn syntax(self) -> SyntaxNode<'a> {
                match self {
                    $(Self::$variant(it) => it.syntax(),)*
                }
            }
        }
    };
}

closed_enum! {
    /// Any node that may stand in statement position.
    Stmt {
        Expression(ExpressionStatement),
        Variable(VariableDeclaration),
        Print(PrintStatement),
        If(IfStatement),
        While(WhileStatement),
        For(ForStatement),
        Foreach(ForeachStatement),
        Function(FunctionDeclaration),
        Class(ClassDeclaration),
        Return(ReturnStatement),
        Block(BlockStatement),
        Error(ErrorNode),
    }
}

closed_enum! {
    /// Any node that may stand in expression position.
    Expr {
        Assignment(AssignmentExpression),
        LogicalOr(LogicalOrExpression),
        LogicalAnd(LogicalAndExpression),
        Equality(EqualityExpression),
        Comparison(ComparisonExpression),
        Addition(AdditionExpression),
        Multiplication(MultiplicationExpression),
        Unary(UnaryExpression),
        Call(CallExpression),
        Member(MemberExpression),
        Index(IndexExpression),
        Identifier(Identifier),
        Number(NumberLiteral),
        String(StringLiteral),
        Boolean(BooleanLiteral),
        Nil(NilLiteral),
        Complex(ComplexNumber),
        Vector(VectorLiteral),
        HashTable(HashTableLiteral),
        LinkedList(LinkedListLiteral),
        Parenthesized(ParenthesizedExpression),
        SelfExpr(SelfExpression),
        Super(SuperExpression),
        Error(ErrorNode),
    }
}

closed_enum! {
    /// A member of a class body.
    ClassMember {
        Method(MethodDeclaration),
        Function(FunctionDeclaration),
    }
}

impl<'a> SourceFile<'a> {
    pub fn statements(self) -> impl Iterator<Item = Stmt<'a>> + 'a {
        children(self.0)
    }
}

impl<'a> ExpressionStatement<'a> {
    pub fn expr(self) -> Option<Expr<'a>> {
        children(self.0).next()
    }
}

impl<'a> VariableDeclaration<'a> {
    pub fn name(self) -> Option<Identifier<'a>> {
        child(self.0, Field::Name)
    }

    pub fn value(self) -> Option<Expr<'a>> {
        child(self.0, Field::Value)
    }
}

impl<'a> PrintStatement<'a> {
    pub fn value(self) -> Option<Expr<'a>> {
        child(self.0, Field::Value)
    }
}

impl<'a> IfStatement<'a> {
    pub fn condition(self) -> Option<Expr<'a>> {
        child(self.0, Field::Condition)
    }

    pub fn then_branch(self) -> Option<Stmt<'a>> {
        child(self.0, Field::Then)
    }

    pub fn else_branch(self) -> Option<Stmt<'a>> {
        child(self.0, Field::Else)
    }
}

impl<'a> WhileStatement<'a> {
    pub fn condition(self) -> Option<Expr<'a>> {
        child(self.0, Field::Condition)
    }

    pub fn body(self) -> Option<Stmt<'a>> {
        child(self.0, Field::Body)
    }
}

/// Initializer slot of a `for` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForInit<'a> {
    Variable(VariableDeclaration<'a>),
    Expr(Expr<'a>),
}

impl<'a> ForStatement<'a> {
    pub fn init(self) -> Option<ForInit<'a>> {
        let init = self.0.node_by_field(Field::Init)?;
        match VariableDeclaration::cast(init) {
            Some(decl) => Some(ForInit::Variable(decl)),
            None => Expr::cast(init).map(ForInit::Expr),
        }
    }

    pub fn condition(self) -> Option<Expr<'a>> {
        child(self.0, Field::Condition)
    }

    pub fn update(self) -> Option<Expr<'a>> {
        child(self.0, Field::Update)
    }

    pub fn body(self) -> Option<Stmt<'a>> {
        child(self.0, Field::Body)
    }
}

impl<'a> ForeachStatement<'a> {
    pub fn variable(self) -> Option<Identifier<'a>> {
        child(self.0, Field::Variable)
    }

    pub fn iterable(self) -> Option<Expr<'a>> {
        child(self.0, Field::Iterable)
    }

    pub fn body(self) -> Option<Stmt<'a>> {
        child(self.0, Field::Body)
    }
}

impl<'a> FunctionDeclaration<'a> {
    pub fn name(self) -> Option<Identifier<'a>> {
        child(self.0, Field::Name)
    }

    pub fn parameters(self) -> Option<ParameterList<'a>> {
        child(self.0, Field::Parameters)
    }

    pub fn body(self) -> Option<BlockStatement<'a>> {
        child(self.0, Field::Body)
    }
}

impl<'a> MethodDeclaration<'a> {
    pub fn name(self) -> Option<Identifier<'a>> {
        child(self.0, Field::Name)
    }

    pub fn parameters(self) -> Option<ParameterList<'a>> {
        child(self.0, Field::Parameters)
    }

    pub fn body(self) -> Option<BlockStatement<'a>> {
        child(self.0, Field::Body)
    }
}

impl<'a> ParameterList<'a> {
    pub fn params(self) -> impl Iterator<Item = Identifier<'a>> + 'a {
        children(self.0)
    }
}

impl<'a> ClassDeclaration<'a> {
    pub fn name(self) -> Option<Identifier<'a>> {
        child(self.0, Field::Name)
    }

    pub fn superclass(self) -> Option<Identifier<'a>> {
        child(self.0, Field::Superclass)
    }

    pub fn body(self) -> Option<ClassBody<'a>> {
        child(self.0, Field::Body)
    }
}

impl<'a> ClassBody<'a> {
    pub fn members(self) -> impl Iterator<Item = ClassMember<'a>> + 'a {
        children(self.0)
    }
}

impl<'a> ReturnStatement<'a> {
    pub fn value(self) -> Option<Expr<'a>> {
        child(self.0, Field::Value)
    }
}

impl<'a> BlockStatement<'a> {
    pub fn statements(self) -> impl Iterator<Item = Stmt<'a>> + 'a {
        children(self.0)
    }
}

impl<'a> AssignmentExpression<'a> {
    pub fn target(self) -> Option<Expr<'a>> {
        child(self.0, Field::Left)
    }

    pub fn value(self) -> Option<Expr<'a>> {
        child(self.0, Field::Right)
    }
}

macro_rules! binary_accessors {
    ($($name:ident),*) => {$(
        impl<'a> $name<'a> {
            pub fn lhs(self) -> Option<Expr<'a>> {
                child(self.0, Field::Left)
            }

            pub fn op(self) -> Option<SyntaxToken<'a>> {
                self.0.token_by_field(Field::Operator)
            }

            pub fn op_kind(self) -> Option<SyntaxKind> {
                self.op().map(SyntaxToken::kind)
            }

            pub fn rhs(self) -> Option<Expr<'a>> {
                child(self.0, Field::Right)
            }
        }
    )*};
}

binary_accessors!(
    LogicalOrExpression,
    LogicalAndExpression,
    EqualityExpression,
    ComparisonExpression,
    AdditionExpression,
    MultiplicationExpression
);

impl<'a> UnaryExpression<'a> {
    pub fn op(self) -> Option<SyntaxToken<'a>> {
        self.0.token_by_field(Field::Operator)
    }

    pub fn operand(self) -> Option<Expr<'a>> {
        child(self.0, Field::Operand)
    }
}

impl<'a> CallExpression<'a> {
    pub fn callee(self) -> Option<Expr<'a>> {
        child(self.0, Field::Function)
    }

    pub fn arguments(self) -> Option<ArgumentList<'a>> {
        child(self.0, Field::Arguments)
    }
}

impl<'a> ArgumentList<'a> {
    pub fn args(self) -> impl Iterator<Item = Expr<'a>> + 'a {
        children(self.0)
    }
}

impl<'a> MemberExpression<'a> {
    pub fn object(self) -> Option<Expr<'a>> {
        child(self.0, Field::Object)
    }

    pub fn property(self) -> Option<Identifier<'a>> {
        child(self.0, Field::Property)
    }
}

impl<'a> IndexExpression<'a> {
    pub fn object(self) -> Option<Expr<'a>> {
        child(self.0, Field::Object)
    }

    pub fn index(self) -> Option<Expr<'a>> {
        child(self.0, Field::Index)
    }
}

impl<'a> VectorLiteral<'a> {
    pub fn elements(self) -> impl Iterator<Item = Expr<'a>> + 'a {
        children(self.0)
    }
}

impl<'a> LinkedListLiteral<'a> {
    pub fn elements(self) -> impl Iterator<Item = Expr<'a>> + 'a {
        children(self.0)
    }
}

impl<'a> HashTableLiteral<'a> {
    pub fn pairs(self) -> impl Iterator<Item = HashPair<'a>> + 'a {
        children(self.0)
    }
}

impl<'a> HashPair<'a> {
    pub fn key(self) -> Option<Expr<'a>> {
        child(self.0, Field::Key)
    }

    pub fn value(self) -> Option<Expr<'a>> {
        child(self.0, Field::Value)
    }
}

impl<'a> ParenthesizedExpression<'a> {
    pub fn expr(self) -> Option<Expr<'a>> {
        children(self.0).next()
    }
}

impl<'a> ComplexNumber<'a> {
    pub fn real(self) -> Option<NumberLiteral<'a>> {
        child(self.0, Field::Real)
    }

    pub fn imaginary(self) -> Option<NumberLiteral<'a>> {
        child(self.0, Field::Imaginary)
    }

    /// `true` for `a - bi`.
    pub fn is_negative(self) -> bool {
        self.0.token_of_kind(MINUS).is_some()
    }
}

impl<'a> Identifier<'a> {
    pub fn name(self) -> &'a str {
        self.0.text()
    }
}

impl NumberLiteral<'_> {
    pub fn is_integer(self) -> bool {
        self.0.token_of_kind(INT_NUMBER).is_some()
    }

    pub fn value(self) -> Option<f64> {
        self.0.text().parse().ok()
    }
}

impl StringLiteral<'_> {
    /// The literal body with escape sequences decoded.
    ///
    /// Returns `None` for malformed literals, which the tokenizer has already
    /// reported.
    pub fn value(self) -> Option<String> {
        let text = self.0.text();
        let quote = text.chars().next()?;
        let body = text.strip_prefix(quote)?.strip_suffix(quote)?;
        unescape(body)
    }
}

impl BooleanLiteral<'_> {
    pub fn value(self) -> bool {
        self.0.token_of_kind(TRUE_KW).is_some()
    }
}

fn unescape(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let decoded = match chars.next()? {
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'u' => hex_char(&mut chars, 4)?,
            'x' => hex_char(&mut chars, 2)?,
            first @ '0'..='7' => {
                let mut value = first.to_digit(8)?;
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                char::from_u32(value)?
            }
            _ => return None,
        };
        out.push(decoded);
    }

    Some(out)
}

fn hex_char(chars: &mut impl Iterator<Item = char>, digits: usize) -> Option<char> {
    let mut value = 0;
    for _ in 0..digits {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    char::from_u32(value)
}

#[cfg(test)]
mod tests {
    use text_size::{TextRange, TextSize};

    use super::*;
    use crate::{Builder, SyntaxTree};

    /// Builds a tree over `text`, locating each token after the previous one.
    struct TreeBuilder {
        text: &'static str,
        offset: usize,
        builder: Builder,
    }

    impl TreeBuilder {
        fn new(text: &'static str) -> Self {
            Self { text, offset: 0, builder: Builder::new(text) }
        }

        fn start(&mut self, kind: SyntaxKind, field: Option<Field>) -> &mut Self {
            self.builder.start_node(kind, field);
            self
        }

        fn token(&mut self, kind: SyntaxKind, text: &str) -> &mut Self {
            let start = self.offset + self.text[self.offset..].find(text).unwrap();
            self.offset = start + text.len();
            let range = TextRange::at(TextSize::new(start as u32), TextSize::of(text));
            self.builder.token(kind, range, None);
            self
        }

        fn leaf(
            &mut self,
            kind: SyntaxKind,
            field: Option<Field>,
            token: SyntaxKind,
            text: &str,
        ) -> &mut Self {
            self.start(kind, field).token(token, text).finish()
        }

        fn finish(&mut self) -> &mut Self {
            self.builder.finish_node();
            self
        }

        fn build(self) -> SyntaxTree {
            self.builder.finish()
        }
    }

    fn for_statement(tree: &SyntaxTree) -> ForStatement<'_> {
        tree.root().children().find_map(ForStatement::cast).unwrap()
    }

    #[test]
    fn for_init_declaration_or_expression() {
        let mut b = TreeBuilder::new("for (var i = 0;;) x;");
        b.start(SOURCE_FILE, None).start(FOR_STATEMENT, None);
        b.token(FOR_KW, "for").token(LEFT_PAREN, "(");
        b.start(VARIABLE_DECLARATION, Some(Field::Init)).token(VAR_KW, "var");
        b.leaf(IDENTIFIER, Some(Field::Name), NAME, "i").token(EQ, "=");
        b.leaf(NUMBER, Some(Field::Value), INT_NUMBER, "0").token(SEMICOLON, ";").finish();
        b.token(SEMICOLON, ";").token(RIGHT_PAREN, ")");
        b.start(EXPRESSION_STATEMENT, Some(Field::Body)).leaf(IDENTIFIER, None, NAME, "x");
        b.token(SEMICOLON, ";").finish().finish().finish();
        let tree = b.build();

        let stmt = for_statement(&tree);
        let Some(ForInit::Variable(decl)) = stmt.init() else { panic!() };
        assert_eq!(decl.name().map(Identifier::name), Some("i"));
        assert_eq!(decl.value().and_then(|value| value.syntax().text().parse().ok()), Some(0));
        assert!(stmt.condition().is_none());
        assert!(stmt.update().is_none());
        assert!(matches!(stmt.body(), Some(Stmt::Expression(_))));

        let mut b = TreeBuilder::new("for (j;;) x;");
        b.start(SOURCE_FILE, None).start(FOR_STATEMENT, None);
        b.token(FOR_KW, "for").token(LEFT_PAREN, "(");
        b.leaf(IDENTIFIER, Some(Field::Init), NAME, "j");
        b.token(SEMICOLON, ";").token(SEMICOLON, ";").token(RIGHT_PAREN, ")");
        b.start(EXPRESSION_STATEMENT, Some(Field::Body)).leaf(IDENTIFIER, None, NAME, "x");
        b.token(SEMICOLON, ";").finish().finish().finish();
        let tree = b.build();

        let Some(ForInit::Expr(Expr::Identifier(init))) = for_statement(&tree).init() else {
            panic!()
        };
        assert_eq!(init.name(), "j");
    }

    #[test]
    fn class_members_skip_error_nodes() {
        let mut b = TreeBuilder::new("class A { f() {} fun g() {} }");
        b.start(CLASS_DECLARATION, None).token(CLASS_KW, "class");
        b.leaf(IDENTIFIER, Some(Field::Name), NAME, "A");
        b.start(CLASS_BODY, Some(Field::Body)).token(LEFT_BRACE, "{");
        b.start(METHOD_DECLARATION, None).leaf(IDENTIFIER, Some(Field::Name), NAME, "f");
        b.token(LEFT_PAREN, "(").token(RIGHT_PAREN, ")");
        b.start(BLOCK_STATEMENT, Some(Field::Body));
        b.token(LEFT_BRACE, "{").token(RIGHT_BRACE, "}").finish().finish();
        b.start(FUNCTION_DECLARATION, None).token(FUN_KW, "fun");
        b.leaf(IDENTIFIER, Some(Field::Name), NAME, "g");
        b.token(LEFT_PAREN, "(").token(RIGHT_PAREN, ")");
        b.start(BLOCK_STATEMENT, Some(Field::Body));
        b.token(LEFT_BRACE, "{").token(RIGHT_BRACE, "}").finish().finish();
        b.start(ERROR, None).finish();
        b.token(RIGHT_BRACE, "}").finish().finish();
        let tree = b.build();

        let class = ClassDeclaration::cast(tree.root()).unwrap();
        assert_eq!(class.name().map(Identifier::name), Some("A"));
        assert!(class.superclass().is_none());

        let members: Vec<_> = class.body().unwrap().members().collect();
        let [ClassMember::Method(method), ClassMember::Function(function)] = members[..] else {
            panic!("{members:?}")
        };
        assert_eq!(method.name().map(Identifier::name), Some("f"));
        assert!(method.parameters().is_none());
        assert_eq!(method.body().map(|body| body.statements().count()), Some(0));
        assert_eq!(function.name().map(Identifier::name), Some("g"));
        assert_eq!(members[1].syntax().kind(), FUNCTION_DECLARATION);
    }

    #[test]
    fn hash_pair_key_and_value() {
        let mut b = TreeBuilder::new("table {'a': 1}");
        b.start(HASH_TABLE_LITERAL, None).token(TABLE_KW, "table").token(LEFT_BRACE, "{");
        b.start(HASH_PAIR, None);
        b.leaf(STRING, Some(Field::Key), QUOTED_STRING, "'a'").token(COLON, ":");
        b.leaf(NUMBER, Some(Field::Value), INT_NUMBER, "1").finish();
        b.token(RIGHT_BRACE, "}").finish();
        let tree = b.build();

        let Some(Expr::HashTable(table)) = Expr::cast(tree.root()) else { panic!() };
        let [pair] = table.pairs().collect::<Vec<_>>()[..] else { panic!() };
        let Some(Expr::String(key)) = pair.key() else { panic!() };
        assert_eq!(key.value().as_deref(), Some("a"));
        let Some(Expr::Number(value)) = pair.value() else { panic!() };
        assert!(value.is_integer());
        assert_eq!(value.value(), Some(1.0));
    }

    #[test]
    fn cast_checks_kind() {
        let mut b = TreeBuilder::new("x");
        b.start(SOURCE_FILE, None).leaf(IDENTIFIER, None, NAME, "x").start(ERROR, None);
        b.finish().finish();
        let tree = b.build();

        let mut children = tree.root().children();
        let identifier = children.next().unwrap();
        let error = children.next().unwrap();

        assert!(ForStatement::cast(identifier).is_none());
        assert!(Stmt::cast(identifier).is_none());
        assert!(matches!(Expr::cast(identifier), Some(Expr::Identifier(_))));
        assert!(matches!(Stmt::cast(error), Some(Stmt::Error(_))));
        assert!(matches!(Expr::cast(error), Some(Expr::Error(_))));
        assert!(ClassMember::cast(error).is_none());
    }

    #[test]
    fn unescape_decodes_every_escape_form() {
        assert_eq!(unescape(r#"a\nb"#).as_deref(), Some("a\nb"));
        assert_eq!(unescape(r#"\"\'\\"#).as_deref(), Some("\"'\\"));
        assert_eq!(unescape(r#"A\x42"#).as_deref(), Some("AB"));
        assert_eq!(unescape(r#"\101\0"#).as_deref(), Some("A\0"));
        assert_eq!(unescape(r#"\b\f"#).as_deref(), Some("\u{8}\u{c}"));
    }

    #[test]
    fn unescape_rejects_malformed_escapes() {
        assert_eq!(unescape(r#"\q"#), None);
        assert_eq!(unescape(r#"\u12"#), None);
        assert_eq!(unescape("\\"), None);
    }
}
