use std::sync::Arc;

use anyhow::{Result, anyhow};
use swc_common::{FileName, GLOBALS, Globals, SourceFile, SourceMap};
use swc_ecma_ast::Program;
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};

pub struct ParsedSource {
    pub program: Program,
    pub source_map: Arc<SourceMap>,
    pub source_file: Arc<SourceFile>,
}

/// Pick the parser syntax from the file id's extension.
///
/// Query strings (`App.vue?vue&type=script`) are ignored. Anything that is not
/// TypeScript is parsed as JavaScript with JSX enabled.
pub fn syntax_for(id: &str) -> Syntax {
    let path = id.split('?').next().unwrap_or(id);
    let extension = path.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");

    match extension {
        "ts" | "mts" | "cts" => Syntax::Typescript(TsSyntax {
            decorators: true,
            ..Default::default()
        }),
        "tsx" => Syntax::Typescript(TsSyntax {
            tsx: true,
            decorators: true,
            ..Default::default()
        }),
        _ => Syntax::Es(EsSyntax {
            jsx: true,
            decorators: true,
            ..Default::default()
        }),
    }
}

/// Parse a script or module into an AST.
///
/// `parse_program` keeps CommonJS scripts parseable alongside ES modules.
pub fn parse_source(code: String, id: &str, source_map: Arc<SourceMap>) -> Result<ParsedSource> {
    GLOBALS.set(&Globals::new(), || {
        let source_file = source_map.new_source_file(FileName::Custom(id.to_string()).into(), code);

        let mut parser = Parser::new(syntax_for(id), StringInput::from(&*source_file), None);

        let program = parser
            .parse_program()
            .map_err(|e| anyhow!("Failed to parse {}: {:?}", id, e))?;

        Ok(ParsedSource {
            program,
            source_map,
            source_file,
        })
    })
}
