//! Preprocessor states and the directive handling done in their hooks.

use super::error::PreprocessError;
use super::events::{LineToken, PreprocessorEvent};
use super::include::unquote;
use super::machine::PreprocessorMachine;
use crate::core::State;
use crate::engine::Context;
use crate::lexical::Keyword;
use crate::tokenizer::{Token, TokenKind};
use tracing::{debug, trace, warn};

type Cx<'a> = Context<'a, PreprocessorMachine>;

/// States of the preprocessor machine.
///
/// Directive states keep the line of their `#`. A token arriving on a later
/// line ends the directive and is handled as an ordinary token.
#[derive(Debug)]
pub enum PreprocessorState {
    Initialised,
    ReceiveToken(Token),
    Directive(LineToken),
    Include(LineToken),
    /// Collecting `<...>`; `path` holds the text seen so far.
    IncludeFromPath { at: LineToken, path: String },
    EndIncludeFromPath(Token),
    /// `<...` ended without `>`. Holds the token that ended the line, if any.
    IncludeUnterminated { at: LineToken, next: Option<Token> },
    Define(LineToken),
    Undef(LineToken),
    Ifdef(LineToken),
    Ifndef(LineToken),
    Endif(LineToken),
}

impl PreprocessorState {
    /// Line of the directive being processed, if any.
    pub fn directive_line(&self) -> Option<usize> {
        match self {
            Self::Directive(at)
            | Self::Include(at)
            | Self::IncludeFromPath { at, .. }
            | Self::Define(at)
            | Self::Undef(at)
            | Self::Ifdef(at)
            | Self::Ifndef(at)
            | Self::Endif(at) => Some(at.line),
            _ => None,
        }
    }
}

impl State<PreprocessorMachine> for PreprocessorState {
    fn name(&self) -> &'static str {
        match self {
            Self::Initialised => "Initialised",
            Self::ReceiveToken(_) => "ReceiveToken",
            Self::Directive(_) => "Directive",
            Self::Include(_) => "Include",
            Self::IncludeFromPath { .. } => "IncludeFromPath",
            Self::EndIncludeFromPath(_) => "EndIncludeFromPath",
            Self::IncludeUnterminated { .. } => "IncludeUnterminated",
            Self::Define(_) => "Define",
            Self::Undef(_) => "Undef",
            Self::Ifdef(_) => "Ifdef",
            Self::Ifndef(_) => "Ifndef",
            Self::Endif(_) => "Endif",
        }
    }

    fn enter(&mut self, cx: &mut Cx<'_>) -> Result<(), PreprocessError> {
        match self {
            Self::ReceiveToken(token) => receive_token(token, cx),
            Self::EndIncludeFromPath(token) => close_directive(token.line, cx),
            Self::IncludeUnterminated { at, next } => {
                warn!(line = at.line, "#include <...> is missing its '>'");
                if let Some(token) = next.take() {
                    cx.emit(PreprocessorEvent::OnToken(token));
                }
                return Err(malformed("include", at));
            }
            Self::Endif(at) => {
                debug!(line = at.line, "#endif");
                close_directive(at.line, cx);
            }
            _ => {}
        }
        Ok(())
    }

    /// Directive states do their work when the next token on the line
    /// re-enters them.
    fn reenter(&mut self, cx: &mut Cx<'_>) -> Result<(), PreprocessError> {
        match self {
            Self::ReceiveToken(token) => {
                receive_token(token, cx);
                Ok(())
            }
            Self::Directive(at) => {
                directive(at, cx);
                Ok(())
            }
            Self::Include(at) => include(at, cx),
            Self::IncludeFromPath { at, path } => {
                if at.token.text != ">" {
                    return Ok(());
                }
                cx.emit(PreprocessorEvent::IncludeCloseBracket(at.token.clone()));
                cx.machine().include_from_path(path)
            }
            Self::Define(at) => {
                let name = symbol_operand("define", at, cx)?;
                if !cx.machine().symbols().define(name) {
                    debug!(name, "symbol redefined");
                }
                Ok(())
            }
            Self::Undef(at) => {
                let name = symbol_operand("undef", at, cx)?;
                cx.machine().symbols().undef(name)
            }
            Self::Ifdef(at) => {
                let name = symbol_operand("ifdef", at, cx)?;
                let defined = cx.machine().symbols().is_defined(name);
                debug!(name, defined, "#ifdef");
                Ok(())
            }
            Self::Ifndef(at) => {
                let name = symbol_operand("ifndef", at, cx)?;
                let defined = cx.machine().symbols().is_defined(name);
                debug!(name, defined, "#ifndef");
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Report an ordinary token, or open a directive on a `#` in column 1.
/// Tokens left on the line of a handled directive are dropped.
fn receive_token(token: &Token, cx: &mut Cx<'_>) {
    let machine = cx.machine();
    if machine.is_closed_line(token.line) {
        trace!(line = token.line, text = %token.text, "directive tail dropped");
        return;
    }
    let marker = machine.grammar().lookup_keyword(&token.text) == Some(Keyword::DirectiveMarker);
    if marker && token.column == 1 {
        cx.emit(PreprocessorEvent::SeenDirective(token.clone()));
    } else {
        trace!(line = token.line, column = token.column, text = %token.text, "token");
        machine.report_token(token);
    }
}

/// The token after `#` names the directive.
fn directive(at: &LineToken, cx: &mut Cx<'_>) {
    let at = at.clone();
    let event = match cx.machine().grammar().lookup_keyword(&at.token.text) {
        Some(Keyword::Include) => PreprocessorEvent::SeenInclude(at),
        Some(Keyword::Define) => PreprocessorEvent::SeenDefine(at),
        Some(Keyword::Undef) => PreprocessorEvent::SeenUndef(at),
        Some(Keyword::Ifdef) => PreprocessorEvent::SeenIfdef(at),
        Some(Keyword::Ifndef) => PreprocessorEvent::SeenIfndef(at),
        Some(Keyword::Endif) => PreprocessorEvent::SeenEndif(at),
        Some(keyword) if keyword.is_directive() => {
            debug!(line = at.line, directive = %at.token.text, "directive ignored");
            return close_directive(at.line, cx);
        }
        _ => {
            debug!(line = at.line, directive = %at.token.text, "unknown directive");
            return close_directive(at.line, cx);
        }
    };
    cx.emit(event);
}

/// Back to `Initialised`; the rest of `line` is not reported.
fn close_directive(line: usize, cx: &mut Cx<'_>) {
    cx.machine().close_line(line);
    cx.emit(PreprocessorEvent::Initialise);
}

fn include(at: &LineToken, cx: &mut Cx<'_>) -> Result<(), PreprocessError> {
    let token = &at.token;
    if token.kind == TokenKind::String {
        close_directive(at.line, cx);
        return cx.machine().include_quoted(unquote(&token.text));
    }
    if token.text == "<" {
        cx.emit(PreprocessorEvent::IncludeOpenBracket(at.clone()));
        return Ok(());
    }
    close_directive(at.line, cx);
    Err(malformed("include", at))
}

/// The symbol a `#define`-like directive operates on. Always returns the
/// machine to `Initialised` and closes the line.
fn symbol_operand<'t>(
    directive: &'static str,
    at: &'t LineToken,
    cx: &mut Cx<'_>,
) -> Result<&'t str, PreprocessError> {
    close_directive(at.line, cx);
    if at.token.kind == TokenKind::Symbol {
        Ok(&at.token.text)
    } else {
        Err(malformed(directive, at))
    }
}

fn malformed(directive: &'static str, at: &LineToken) -> PreprocessError {
    PreprocessError::MalformedDirective {
        directive,
        line: at.line,
        found: at.token.text.clone(),
    }
}
