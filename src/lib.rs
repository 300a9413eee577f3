#![allow(clippy::module_inception)]

use std::rc::Rc;

use inkwell::context::Context;
use log::debug;

use crate::{
    ast::{ast::Program, builder::build_ast},
    compiler::compiler::{compile, Compiler, CompilerConfig},
    errors::errors::{Error, ErrorTip},
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::type_checker::type_check,
};

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod scope;
pub mod type_checker;

extern crate regex;

/// Byte offset into a source file, plus the file's name.
#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Runs the front end: tokens, parse tree, AST, then type checking.
///
/// Lexer, parser and builder failures are fatal and come back as a single
/// error. Semantic errors are accumulated over the whole program.
pub fn check_source(source: &str, file_name: &str) -> Result<Program, Vec<Error>> {
    let tokens = tokenize(source.to_string(), Some(file_name.to_string())).map_err(|e| vec![e])?;
    debug!("tokenized {} tokens", tokens.len());

    let tree = parse(tokens, Rc::new(file_name.to_string())).map_err(|e| vec![e])?;
    let mut program = build_ast(&tree).map_err(|e| vec![e])?;
    debug!("built AST with {} top-level items", program.body.len());

    type_check(&mut program)?;
    Ok(program)
}

/// Runs the whole pipeline and returns the generated (verified) module.
pub fn compile_source<'ctx>(
    source: &str,
    file_name: &str,
    context: &'ctx Context,
    config: &CompilerConfig,
) -> Result<Compiler<'ctx>, Vec<Error>> {
    let program = check_source(source, file_name)?;
    compile(&program, context, config).map_err(|e| vec![e])
}

/// Finds the line containing `position`.
///
/// Returns the 1-based line number, the line text and the offset of the
/// position within that line.
pub fn get_line_at_position(source: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return Some((line_number, line.to_string(), pos - start));
        }

        start = end;
        line_number += 1;
    }

    // End of file points just past the final line.
    if pos == source.len() {
        let last = source.split_inclusive('\n').last().unwrap_or("");
        return Some((line_number.saturating_sub(1).max(1), last.to_string(), last.len()));
    }

    None
}


/// Renders an error with the offending source line underneath.
pub fn display_error(error: &Error, file: &str, source: &str) {
    /*
        Error: TypeMismatchError (Expected type `int`, received `string`)
        -> final.ru
           |
        20 | let a: int = "a";
           | -------------^
    */

    if let ErrorTip::None = error.get_tip() {
        eprintln!("Error: {}", error.get_error_name());
    } else {
        eprintln!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    eprintln!("-> {}", file);

    let Some((line, line_text, line_pos)) = get_line_at_position(source, error.get_position().0)
    else {
        return;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    eprintln!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    eprintln!("{} | {}", line_string, line_text_removed.trim_end());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    eprintln!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string.chars().take_while(|c| *c == ' ' || *c == '\t').count();

    (String::from(&string[start..]), start)
}
