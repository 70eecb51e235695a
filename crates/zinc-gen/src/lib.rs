//! zinc-gen - x86-64 assembly emission.
//!
//! The emitter walks the finished AST and produces AT&T-syntax assembly.
//! It exposes one visitor per declaration, statement, and expression
//! variant; the driver invokes the declaration visitor on each top-level
//! declaration in source order and the emitter traverses children
//! itself.
//!
//! Code generation is a straightforward stack machine: every expression
//! leaves its value in `%rax`, binary operators spill the left operand
//! to the machine stack, and a stack-depth counter tracks outstanding
//! spills (it also keeps calls 16-byte aligned). Constructs the
//! skeleton does not lower, such as floating-point arithmetic, surface
//! as [`EmitError`] rather than silently producing wrong code.

mod asm;
mod error;

pub use asm::AsmEmitter;
pub use error::EmitError;
