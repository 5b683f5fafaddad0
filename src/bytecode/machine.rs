//! Stack-based virtual machine for executing bytecode.
//!
//! The machine is a plain value. Every operation consumes the current state
//! and hands back the next one, so a run can be replayed one [`Machine::step`]
//! at a time. Code is shared read-only between clones, stacks are owned.

use std::fmt;
use std::sync::Arc;

use colored::Colorize;

use crate::bytecode::instruction::OpCode;
use crate::bytecode::word::{wrap, Word};
use crate::error::RuntimeError;

/// Operand stack capacity.
pub const MAIN_STACK_SIZE: usize = 0x800;
/// Call stack capacity. No opcode uses the call stack yet.
pub const CALL_STACK_SIZE: usize = 0x400;

/// Result type for VM operations.
pub type VMResult<T> = Result<T, RuntimeError>;

/// Execution options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Print every dispatched instruction to stderr.
    pub trace: bool,
}

/// A copy of the machine state taken when an error is raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineSnapshot {
    pub main_stack: Vec<Word>,
    pub call_stack: Vec<Word>,
    pub ip: isize,
    pub code_len: usize,
}

impl fmt::Display for MachineSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ip={}, stack={:?}, calls={:?}",
            self.ip, self.main_stack, self.call_stack
        )
    }
}

/// Body of an `++ Exec` trace line. `ip` is the pointer after the opcode fetch.
fn exec_trace(ip: isize, word: Word, opcode: OpCode) -> String {
    format!("ip={} [{:#04x} -> {}]", ip, word, opcode.name())
}

/// The state of one virtual machine.
#[derive(Debug, Clone)]
pub struct Machine {
    main_stack: Vec<Word>,
    // Reserved for subroutine call/return.
    call_stack: Vec<Word>,
    ip: isize,
    code: Arc<[Word]>,
    trace: bool,
}

impl Machine {
    /// Create a machine positioned at the start of `code`.
    pub fn new(code: impl Into<Arc<[Word]>>) -> Self {
        Self {
            main_stack: Vec::new(),
            call_stack: Vec::with_capacity(CALL_STACK_SIZE),
            ip: 0,
            code: code.into(),
            trace: false,
        }
    }

    pub fn with_options(self, options: RunOptions) -> Self {
        self.with_trace(options.trace)
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn ip(&self) -> isize {
        self.ip
    }

    pub fn code(&self) -> &[Word] {
        &self.code
    }

    /// The operand stack, bottom first.
    pub fn stack(&self) -> &[Word] {
        &self.main_stack
    }

    pub fn call_stack(&self) -> &[Word] {
        &self.call_stack
    }

    pub fn top(&self) -> Option<Word> {
        self.main_stack.last().copied()
    }

    /// Whether the word at the instruction pointer is HALT.
    pub fn is_halted(&self) -> bool {
        self.word_at(self.ip) == Some(OpCode::Halt.word())
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            main_stack: self.main_stack.clone(),
            call_stack: self.call_stack.clone(),
            ip: self.ip,
            code_len: self.code.len(),
        }
    }

    fn word_at(&self, ip: isize) -> Option<Word> {
        usize::try_from(ip)
            .ok()
            .and_then(|index| self.code.get(index))
            .copied()
    }

    /// Fetch the word at the instruction pointer and advance past it.
    pub fn next(mut self) -> VMResult<(Word, Machine)> {
        let word = self
            .word_at(self.ip)
            .ok_or_else(|| RuntimeError::ip_out_of_range(self.ip, self.snapshot()))?;
        self.ip += 1;
        Ok((word, self))
    }

    /// Push a value, wrapped into word range.
    pub fn push(mut self, value: impl Into<i64>) -> VMResult<Machine> {
        if self.main_stack.len() >= MAIN_STACK_SIZE {
            return Err(RuntimeError::stack_overflow(self.snapshot()));
        }
        self.main_stack.push(wrap(value.into()));
        Ok(self)
    }

    pub fn pop(mut self) -> VMResult<(Word, Machine)> {
        match self.main_stack.pop() {
            Some(value) => Ok((value, self)),
            None => Err(RuntimeError::stack_underflow(self.snapshot())),
        }
    }

    /// Pop two values, returning them in push order.
    fn pop_pair(self) -> VMResult<(Word, Word, Machine)> {
        let (b, machine) = self.pop()?;
        let (a, machine) = machine.pop()?;
        Ok((a, b, machine))
    }

    /// Execute the single instruction at the instruction pointer.
    ///
    /// Stepping a HALT leaves the machine parked on it.
    pub fn step(self) -> VMResult<Machine> {
        let at = self.ip;
        let (word, machine) = self.next()?;
        let opcode = match OpCode::from_word(word) {
            Some(op) => op,
            None => return Err(RuntimeError::unknown_opcode(word, machine.snapshot())),
        };

        if machine.trace {
            eprintln!("{} {}", "++ Exec".cyan(), exec_trace(machine.ip, word, opcode));
        }

        match opcode {
            OpCode::Halt => {
                let mut machine = machine;
                machine.ip = at;
                Ok(machine)
            }

            OpCode::Push => {
                let (literal, machine) = machine.next()?;
                machine.push(literal)
            }

            OpCode::Add => {
                let (a, b, machine) = machine.pop_pair()?;
                machine.push(a as i64 + b as i64)
            }

            OpCode::Subtract => {
                let (a, b, machine) = machine.pop_pair()?;
                machine.push(a as i64 - b as i64)
            }

            OpCode::Jz => {
                let (target, machine) = machine.pop()?;
                let (value, mut machine) = machine.pop()?;
                if value == 0 {
                    machine.ip = target as isize;
                }
                Ok(machine)
            }

            OpCode::Pop
            | OpCode::Copy
            | OpCode::Swap
            | OpCode::Jg
            | OpCode::Jl
            | OpCode::Putch
            | OpCode::Putdec
            | OpCode::Puthex => Err(RuntimeError::unimplemented_opcode(
                word,
                machine.snapshot(),
            )),
        }
    }

    /// Run until the instruction pointer reaches a HALT or an error occurs.
    pub fn run(mut self) -> VMResult<Machine> {
        loop {
            if self.is_halted() {
                if self.trace {
                    eprintln!("{}", "++ HALT".green());
                }
                return Ok(self);
            }
            self = self.step()?;
        }
    }

    /// The value left on top of the stack.
    pub fn result(&self) -> VMResult<Word> {
        self.top()
            .ok_or_else(|| RuntimeError::stack_underflow(self.snapshot()))
    }
}
