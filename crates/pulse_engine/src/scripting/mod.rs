//! Embedded behavior scripts
//!
//! A small line-oriented language drives component state through the
//! name-based property layer, so scripts never touch engine internals
//! directly. Sources compile once into an instruction list; each context
//! owns its program counter and wait timer, and advances deterministically
//! when stepped.
//!
//! The language, one instruction per line (`#` starts a comment):
//!
//! ```text
//! set transform.position 0 2 0    # write a property (three numbers form a vector)
//! add transform.position.y 0.5    # read, add, write back
//! wait 0.25                       # suspend for a quarter second
//! invoke camera.reset_blend       # call a zero-argument method
//! goto 0                          # jump to an instruction index
//! ```

use thiserror::Error;

use crate::foundation::math::Vec3;
use crate::world::property::{BindingError, PropertyAccess, PropertyValue};

/// Compilation failures, reported with one-based source line numbers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// The first token of a line is not an instruction
    #[error("line {line}: unknown instruction '{found}'")]
    UnknownInstruction {
        /// Source line
        line: usize,
        /// Token that was found instead
        found: String,
    },

    /// An instruction is missing a required argument
    #[error("line {line}: '{instruction}' is missing an argument")]
    MissingArgument {
        /// Source line
        line: usize,
        /// Instruction that was short an argument
        instruction: &'static str,
    },

    /// A token that had to be numeric was not
    #[error("line {line}: '{token}' is not a number")]
    BadNumber {
        /// Source line
        line: usize,
        /// Offending token
        token: String,
    },

    /// A `goto` target points past the end of the program
    #[error("line {line}: goto target {target} is outside the program ({len} instructions)")]
    BadTarget {
        /// Source line
        line: usize,
        /// Requested instruction index
        target: usize,
        /// Number of instructions in the program
        len: usize,
    },
}

#[derive(Debug, Clone)]
enum Op {
    Set { path: String, value: PropertyValue },
    Add { path: String, value: PropertyValue },
    Wait { seconds: f32 },
    Invoke { path: String },
    Goto { target: usize },
}

/// A compiled script, ready to be executed by any number of contexts
#[derive(Debug, Clone)]
pub struct ScriptProgram {
    ops: Vec<Op>,
}

impl ScriptProgram {
    /// Compile a source string
    pub fn compile(source: &str) -> Result<Self, CompileError> {
        let mut ops = Vec::new();
        let mut goto_sites = Vec::new();

        for (index, raw) in source.lines().enumerate() {
            let line = index + 1;
            let text = match raw.split_once('#') {
                Some((before, _)) => before.trim(),
                None => raw.trim(),
            };
            if text.is_empty() {
                continue;
            }

            let mut tokens = text.split_whitespace();
            let instruction = tokens.next().unwrap_or_default();
            let rest: Vec<&str> = tokens.collect();

            let op = match instruction {
                "set" => {
                    let (path, value) = parse_path_and_value(line, "set", &rest)?;
                    Op::Set { path, value }
                }
                "add" => {
                    let (path, value) = parse_path_and_value(line, "add", &rest)?;
                    Op::Add { path, value }
                }
                "wait" => {
                    let token = single_argument(line, "wait", &rest)?;
                    let seconds = parse_number(line, token)?;
                    Op::Wait {
                        seconds: seconds.max(0.0),
                    }
                }
                "invoke" => {
                    let token = single_argument(line, "invoke", &rest)?;
                    Op::Invoke {
                        path: token.to_string(),
                    }
                }
                "goto" => {
                    let token = single_argument(line, "goto", &rest)?;
                    let target = token.parse::<usize>().map_err(|_| CompileError::BadNumber {
                        line,
                        token: token.to_string(),
                    })?;
                    goto_sites.push((line, target));
                    Op::Goto { target }
                }
                other => {
                    return Err(CompileError::UnknownInstruction {
                        line,
                        found: other.to_string(),
                    })
                }
            };
            ops.push(op);
        }

        // Targets may point forward, so range-check them after the full pass.
        for (line, target) in goto_sites {
            if target >= ops.len() {
                return Err(CompileError::BadTarget {
                    line,
                    target,
                    len: ops.len(),
                });
            }
        }

        Ok(Self { ops })
    }

    /// Number of compiled instructions
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the program has no instructions
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

fn single_argument<'t>(
    line: usize,
    instruction: &'static str,
    rest: &[&'t str],
) -> Result<&'t str, CompileError> {
    match rest {
        &[token] => Ok(token),
        _ => Err(CompileError::MissingArgument { line, instruction }),
    }
}

fn parse_path_and_value(
    line: usize,
    instruction: &'static str,
    rest: &[&str],
) -> Result<(String, PropertyValue), CompileError> {
    let Some((path, value_tokens)) = rest.split_first() else {
        return Err(CompileError::MissingArgument { line, instruction });
    };
    let value = parse_value(line, instruction, value_tokens)?;
    Ok(((*path).to_string(), value))
}

/// Literals: `true`/`false`, one number (float), or three numbers (vector).
/// Anything else is taken verbatim as a string.
fn parse_value(
    line: usize,
    instruction: &'static str,
    tokens: &[&str],
) -> Result<PropertyValue, CompileError> {
    match tokens {
        &[] => Err(CompileError::MissingArgument { line, instruction }),
        &["true"] => Ok(PropertyValue::Bool(true)),
        &["false"] => Ok(PropertyValue::Bool(false)),
        &[one] => match one.parse::<f32>() {
            Ok(number) => Ok(PropertyValue::Float(number)),
            Err(_) => Ok(PropertyValue::Str(one.to_string())),
        },
        &[x, y, z] => {
            let x = parse_number(line, x)?;
            let y = parse_number(line, y)?;
            let z = parse_number(line, z)?;
            Ok(PropertyValue::Vec3(Vec3::new(x, y, z)))
        }
        many => Ok(PropertyValue::Str(many.join(" "))),
    }
}

fn parse_number(line: usize, token: &str) -> Result<f32, CompileError> {
    token.parse::<f32>().map_err(|_| CompileError::BadNumber {
        line,
        token: token.to_string(),
    })
}

/// Where a context currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptStatus {
    /// Executing instructions
    Running,
    /// Suspended on a `wait`
    Waiting,
    /// Ran past the last instruction
    Finished,
    /// Stopped by a binding error
    Faulted,
}

/// Execution state for one instance of a program
///
/// The context is the only mutable interpreter state: a program counter, the
/// remaining wait time, and a status. Stepping twice with the same deltas
/// against the same scope replays identically.
#[derive(Debug, Clone)]
pub struct ScriptContext {
    program: ScriptProgram,
    pc: usize,
    wait_remaining: f32,
    status: ScriptStatus,
}

impl ScriptContext {
    /// Instructions executed per step before yielding to the next frame.
    ///
    /// Bounds scripts that loop without ever waiting.
    const OP_BUDGET: usize = 64;

    /// Create a context at the start of the program
    pub fn new(program: ScriptProgram) -> Self {
        Self {
            program,
            pc: 0,
            wait_remaining: 0.0,
            status: ScriptStatus::Running,
        }
    }

    /// Current status
    pub fn status(&self) -> ScriptStatus {
        self.status
    }

    /// Rewind to the first instruction and clear any wait or fault
    pub fn restart(&mut self) {
        self.pc = 0;
        self.wait_remaining = 0.0;
        self.status = ScriptStatus::Running;
    }

    /// Advance the script by one frame of `delta_time` seconds
    ///
    /// Executes until the script waits, finishes, or exhausts its
    /// per-step budget. A binding error stops the script permanently and is
    /// returned to the caller; finished and faulted contexts step as no-ops.
    pub fn step(
        &mut self,
        delta_time: f32,
        scope: &mut dyn PropertyAccess,
    ) -> Result<(), BindingError> {
        if matches!(self.status, ScriptStatus::Finished | ScriptStatus::Faulted) {
            return Ok(());
        }
        if self.wait_remaining > 0.0 {
            self.wait_remaining -= delta_time;
            if self.wait_remaining > 0.0 {
                self.status = ScriptStatus::Waiting;
                return Ok(());
            }
            self.wait_remaining = 0.0;
        }
        self.status = ScriptStatus::Running;
        match self.run(scope) {
            Ok(()) => Ok(()),
            Err(error) => {
                self.status = ScriptStatus::Faulted;
                Err(error)
            }
        }
    }

    fn run(&mut self, scope: &mut dyn PropertyAccess) -> Result<(), BindingError> {
        for _ in 0..Self::OP_BUDGET {
            let Some(op) = self.program.ops.get(self.pc).cloned() else {
                self.status = ScriptStatus::Finished;
                return Ok(());
            };
            match op {
                Op::Set { path, value } => {
                    scope.set(&path, value)?;
                    self.pc += 1;
                }
                Op::Add { path, value } => {
                    let current = scope.get(&path)?;
                    let sum = add_values(&path, current, value)?;
                    scope.set(&path, sum)?;
                    self.pc += 1;
                }
                Op::Wait { seconds } => {
                    self.pc += 1;
                    self.wait_remaining = seconds;
                    self.status = ScriptStatus::Waiting;
                    return Ok(());
                }
                Op::Invoke { path } => {
                    scope.invoke(&path)?;
                    self.pc += 1;
                }
                Op::Goto { target } => {
                    self.pc = target;
                }
            }
        }
        Ok(())
    }
}

fn add_values(
    property: &str,
    current: PropertyValue,
    delta: PropertyValue,
) -> Result<PropertyValue, BindingError> {
    match (current, delta) {
        (PropertyValue::Float(a), PropertyValue::Float(b)) => Ok(PropertyValue::Float(a + b)),
        (PropertyValue::Vec3(a), PropertyValue::Vec3(b)) => Ok(PropertyValue::Vec3(a + b)),
        (current, delta) => Err(BindingError::TypeMismatch {
            property: property.to_string(),
            expected: current.kind(),
            actual: delta.kind(),
        }),
    }
}
