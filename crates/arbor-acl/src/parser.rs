use crate::ast::{
    Access, Binding, ComponentDecl, Document, ElementNode, Expr, FieldDecl, Import, PropertyDecl,
    StructDecl,
};
use crate::error::ParseError;
use crate::lexer::{Lexer, Token, TokenWithPos};

// ── Parser ────────────────────────────────────────────────────────────────

pub struct Parser {
    tokens: Vec<TokenWithPos>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<TokenWithPos>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn current_pos(&self) -> (usize, usize) {
        self.tokens
            .get(self.pos)
            .map(|t| (t.line, t.col))
            .or_else(|| self.tokens.last().map(|t| (t.line, t.col)))
            .unwrap_or((1, 1))
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).map(|t| &t.token).unwrap_or(&Token::Eof)
    }

    /// Look at the token `offset` positions ahead of current without consuming.
    fn peek_ahead(&self, offset: usize) -> &Token {
        self.tokens.get(self.pos + offset).map(|t| &t.token).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens.get(self.pos)
            .map(|t| t.token.clone())
            .unwrap_or(Token::Eof);
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn err(&self, msg: impl Into<String>) -> ParseError {
        let (line, col) = self.current_pos();
        ParseError::new(msg, line, col)
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.advance() {
            Token::Ident(s) => Ok(s),
            tok => Err(self.err(format!("expected identifier, got {:?}", tok))),
        }
    }

    fn expect_str(&mut self) -> Result<String, ParseError> {
        match self.advance() {
            Token::Str(s) => Ok(s),
            tok => Err(self.err(format!("expected string, got {:?}", tok))),
        }
    }

    fn expect_token(&mut self, expected: &Token) -> Result<(), ParseError> {
        let got = self.advance();
        if &got == expected {
            Ok(())
        } else {
            Err(self.err(format!("expected {:?}, got {:?}", expected, got)))
        }
    }

    /// Type names are plain identifiers; builtin names like `string` stay
    /// unreserved, so this only has to accept `Token::Ident`.
    fn expect_type_name(&mut self) -> Result<String, ParseError> {
        match self.advance() {
            Token::Ident(s) => Ok(s),
            tok => Err(self.err(format!("expected type name, got {:?}", tok))),
        }
    }

    // ── Document ──────────────────────────────────────────────────────────

    pub fn parse_document(&mut self) -> Result<Document, ParseError> {
        let mut imports = Vec::new();

        // Consume all leading `import` declarations.
        while self.peek() == &Token::Import {
            imports.push(self.parse_import()?);
        }

        let mut structs = Vec::new();
        let mut components = Vec::new();

        loop {
            match self.peek() {
                Token::Eof => break,
                Token::Export | Token::Struct | Token::Component => {
                    let (line, col) = self.current_pos();
                    let exported = if self.peek() == &Token::Export {
                        self.advance();
                        true
                    } else {
                        false
                    };
                    match self.peek() {
                        Token::Struct => {
                            structs.push(self.parse_struct(exported, line, col)?);
                        }
                        Token::Component => {
                            components.push(self.parse_component(exported, line, col)?);
                        }
                        tok => {
                            return Err(self.err(format!(
                                "expected `struct` or `component` after `export`, got {:?}",
                                tok
                            )));
                        }
                    }
                }
                tok => {
                    return Err(self.err(format!(
                        "unexpected {:?} at top level — expected `struct` or `component`",
                        tok
                    )));
                }
            }
        }

        Ok(Document { imports, structs, components })
    }

    // ── Import ────────────────────────────────────────────────────────────

    fn parse_import(&mut self) -> Result<Import, ParseError> {
        let (line, col) = self.current_pos();
        self.advance(); // consume `import`
        let path = self.expect_str()?;
        self.expect_token(&Token::Semicolon)?;
        Ok(Import { path, line, col })
    }

    // ── Struct ────────────────────────────────────────────────────────────

    /// Parse `struct Ident { field ("," field)* ","? }`.
    fn parse_struct(&mut self, exported: bool, line: usize, col: usize) -> Result<StructDecl, ParseError> {
        self.advance(); // consume `struct`
        let name = self.expect_ident()?;
        self.expect_token(&Token::LBrace)?;

        let mut fields = Vec::new();
        loop {
            match self.peek() {
                Token::RBrace => { self.advance(); break; }
                Token::Eof    => return Err(self.err("unclosed '{' in struct declaration")),
                Token::Ident(_) => {
                    let (fline, fcol) = self.current_pos();
                    let fname = self.expect_ident()?;
                    self.expect_token(&Token::Colon)?;
                    let type_name = self.expect_type_name()?;
                    fields.push(FieldDecl { name: fname, type_name, line: fline, col: fcol });
                    // Separator: `,` between fields, optional before `}`.
                    if self.peek() == &Token::Comma {
                        self.advance();
                    } else if self.peek() != &Token::RBrace {
                        return Err(self.err(format!(
                            "expected `,` or `}}` after struct field, got {:?}",
                            self.peek()
                        )));
                    }
                }
                tok => return Err(self.err(format!("expected field name, got {:?}", tok))),
            }
        }

        Ok(StructDecl { name, exported, fields, line, col })
    }

    // ── Component ─────────────────────────────────────────────────────────

    fn parse_component(&mut self, exported: bool, line: usize, col: usize) -> Result<ComponentDecl, ParseError> {
        self.advance(); // consume `component`
        let name = self.expect_ident()?;
        self.expect_token(&Token::LBrace)?;

        let mut properties = Vec::new();
        let mut children = Vec::new();

        loop {
            match self.peek() {
                Token::RBrace => { self.advance(); break; }
                Token::Eof    => return Err(self.err("unclosed '{' in component body")),
                Token::In | Token::Out | Token::InOut | Token::Property => {
                    properties.push(self.parse_property()?);
                }
                Token::Ident(_) => {
                    children.push(self.parse_element()?);
                }
                tok => {
                    return Err(self.err(format!(
                        "unexpected {:?} in component body — expected a property declaration or an element",
                        tok
                    )));
                }
            }
        }

        Ok(ComponentDecl { name, exported, properties, children, line, col })
    }

    // ── Property ──────────────────────────────────────────────────────────

    /// Parse `("in" | "out" | "in-out")? "property" "<" type ">" name (":" expr)? ";"`.
    fn parse_property(&mut self) -> Result<PropertyDecl, ParseError> {
        let (line, col) = self.current_pos();
        let access = match self.peek() {
            Token::In    => { self.advance(); Access::In }
            Token::Out   => { self.advance(); Access::Out }
            Token::InOut => { self.advance(); Access::InOut }
            _            => Access::InOut,
        };
        self.expect_token(&Token::Property)?;
        self.expect_token(&Token::LAngle)?;
        let type_name = self.expect_type_name()?;
        self.expect_token(&Token::RAngle)?;
        let name = self.expect_ident()?;

        let default = if self.peek() == &Token::Colon {
            self.advance(); // consume `:`
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect_token(&Token::Semicolon)?;

        Ok(PropertyDecl { access, type_name, name, default, line, col })
    }

    // ── Element ───────────────────────────────────────────────────────────

    /// Parse `Ident { (binding | element)* }`.
    ///
    /// Disambiguation inside the block: when we see `Ident`, we look one
    /// token ahead:
    /// - `Ident ":"` → binding
    /// - `Ident <anything else>` → child element
    fn parse_element(&mut self) -> Result<ElementNode, ParseError> {
        let (line, col) = self.current_pos();
        let name = self.expect_ident()?;
        self.expect_token(&Token::LBrace)?;

        let mut bindings = Vec::new();
        let mut children = Vec::new();

        loop {
            match self.peek() {
                Token::RBrace => { self.advance(); break; }
                Token::Eof    => return Err(self.err("unclosed '{' in element body")),
                Token::Ident(_) => {
                    if self.peek_ahead(1) == &Token::Colon {
                        let key = self.expect_ident()?;
                        self.advance(); // consume `:`
                        let value = self.parse_expr()?;
                        self.expect_token(&Token::Semicolon)?;
                        bindings.push(Binding { key, value });
                    } else {
                        children.push(self.parse_element()?);
                    }
                }
                tok => {
                    return Err(self.err(format!(
                        "unexpected {:?} inside element — expected a binding (key: value;) or a child element",
                        tok
                    )));
                }
            }
        }

        Ok(ElementNode { name, bindings, children, line, col })
    }

    // ── Expr ──────────────────────────────────────────────────────────────

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        match self.advance() {
            Token::Str(s)    => Ok(Expr::Str(s)),
            Token::Number(n) => Ok(Expr::Number(n)),
            Token::True      => Ok(Expr::Bool(true)),
            Token::False     => Ok(Expr::Bool(false)),
            Token::Ident(s)  => Ok(Expr::Ident(s)),
            Token::LBrace    => self.parse_object(),
            tok => Err(self.err(format!("expected a value, got {:?}", tok))),
        }
    }

    /// Parse the entries of `{ (Ident ":" expr ","?)* }`; the opening `{`
    /// has already been consumed.
    fn parse_object(&mut self) -> Result<Expr, ParseError> {
        let mut entries = Vec::new();
        loop {
            match self.peek() {
                Token::RBrace => { self.advance(); break; }
                Token::Eof    => return Err(self.err("unclosed '{' in object literal")),
                Token::Ident(_) => {
                    let key = self.expect_ident()?;
                    self.expect_token(&Token::Colon)?;
                    let value = self.parse_expr()?;
                    entries.push((key, value));
                    if self.peek() == &Token::Comma {
                        self.advance();
                    } else if self.peek() != &Token::RBrace {
                        return Err(self.err(format!(
                            "expected `,` or `}}` after object entry, got {:?}",
                            self.peek()
                        )));
                    }
                }
                tok => return Err(self.err(format!("expected object key, got {:?}", tok))),
            }
        }
        Ok(Expr::Object(entries))
    }
}

// ── Public parse entry point ──────────────────────────────────────────────

/// Parse a `.acl` source string into a [`Document`].
pub fn parse_str(src: &str) -> Result<Document, ParseError> {
    let tokens = Lexer::new(src).tokenize()?;
    Parser::new(tokens).parse_document()
}
