//! zinc-drv - Compiler driver.
//!
//! The driver owns one compilation session: it reads the input file,
//! runs the front-end pipeline (lex, parse, resolve) and the assembly
//! emitter, and writes the output file. The pipeline fails at the first
//! error; the driver renders that error as a single source-located line.
//!
//! ```text
//! source file -> [Lexer] -> tokens -> [Parser] -> AST -> [AsmEmitter] -> .s file
//! ```

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use zinc_gen::AsmEmitter;
use zinc_util::SourceMap;

/// Driver configuration for one invocation
#[derive(Debug, Clone)]
pub struct Config {
    /// The C source file to compile
    pub input: PathBuf,
}

impl Config {
    /// Configuration for a single input file
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// Where the assembly goes: the input path with an `.s` extension
    pub fn output_path(&self) -> PathBuf {
        self.input.with_extension("s")
    }
}

/// State for one compiler invocation
pub struct Session {
    config: Config,
    /// All source files read during this session
    pub sources: SourceMap,
}

impl Session {
    /// Create a session for the given configuration
    pub fn new(config: Config) -> Self {
        Self {
            config,
            sources: SourceMap::new(),
        }
    }

    /// Run the whole pipeline and write the output file
    ///
    /// Returns the path of the written assembly file.
    pub fn compile(&mut self) -> anyhow::Result<PathBuf> {
        let input = self.config.input.clone();
        let content = std::fs::read_to_string(&input)
            .with_context(|| format!("error: cannot read '{}'", input.display()))?;
        let file_id = self
            .sources
            .add_file(input.display().to_string(), content.as_str());

        let (ast, types) = zinc_par::parse_file(&content, file_id)
            .map_err(|e| anyhow!("{}", e.render(&self.sources)))?;

        let asm = AsmEmitter::new(&ast, &types)
            .emit_translation_unit()
            .map_err(|e| anyhow!("error: {}", e))?;

        let output = self.config.output_path();
        std::fs::write(&output, asm)
            .with_context(|| format!("error: cannot write '{}'", output.display()))?;
        Ok(output)
    }
}

/// Compile one file; convenience for tests and the binary
pub fn compile_file(input: impl AsRef<Path>) -> anyhow::Result<PathBuf> {
    let mut session = Session::new(Config::new(input.as_ref()));
    session.compile()
}
