use std::{fmt::Display, str::FromStr};

use int_enum::IntEnum;
use log::trace;

use crate::Error;

pub type Word = u64;

pub const DEFAULT_STEP_LIMIT: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntEnum)]
#[repr(u8)]
pub enum RegisterName {
    A = 0,
    B = 1,
    C = 2,
}

impl Display for RegisterName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RegisterName::A => "A",
            RegisterName::B => "B",
            RegisterName::C => "C",
        };
        write!(f, "{}", name)
    }
}

/// Tape of 3-bit codes, read as (opcode, operand) pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    codes: Vec<u8>,
}

impl Program {
    pub fn new(codes: Vec<u8>) -> Result<Self, Error> {
        if codes.len() % 2 != 0 {
            return Err(Error::OddProgramLength(codes.len()));
        }
        if let Some((ind, &code)) = codes.iter().enumerate().find(|&(_, &code)| code > 7) {
            return Err(Error::CodeOutOfRange(ind, code));
        }

        Ok(Self { codes })
    }

    pub fn codes(&self) -> &[u8] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    fn fetch(&self, inst_ptr: usize) -> Option<(Instruction, u8)> {
        let opcode = *self.codes.get(inst_ptr)?;
        let operand = *self.codes.get(inst_ptr + 1)?;
        // Every 3-bit code is a known opcode.
        Instruction::try_from(opcode)
            .ok()
            .map(|inst| (inst, operand))
    }
}

impl TryFrom<Vec<u8>> for Program {
    type Error = Error;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        Program::new(value)
    }
}

impl FromStr for Program {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Program::new(Vec::new());
        }

        s.split(',')
            .map(|t| {
                let t = t.trim();
                t.parse::<u8>()
                    .map_err(|_| Error::InvalidCode(t.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
            .and_then(Program::new)
    }
}

trait ExecutionContext {
    fn reg(&self, name: RegisterName) -> Word;
    fn reg_mut(&mut self, name: RegisterName) -> &mut Word;
    fn cur_inst_ptr(&self) -> usize;
    fn inst_ptr_mut(&mut self) -> &mut usize;
    fn emit(&mut self, value: u8);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntEnum)]
#[repr(u8)]
pub enum Instruction {
    Adv = 0,
    Bxl = 1,
    Bst = 2,
    Jnz = 3,
    Bxc = 4,
    Out = 5,
    Bdv = 6,
    Cdv = 7,
}

impl Instruction {
    fn exec_in(&self, operand: u8, context: &mut impl ExecutionContext) -> Result<(), Error> {
        match self {
            Instruction::Adv => {
                let value = Self::shifted_a(operand, context)?;
                *context.reg_mut(RegisterName::A) = value;
            }
            Instruction::Bxl => *context.reg_mut(RegisterName::B) ^= Word::from(operand),
            Instruction::Bst => {
                let value = Self::combo_operand(operand, context)? % 8;
                *context.reg_mut(RegisterName::B) = value;
            }
            Instruction::Jnz => {
                if context.reg(RegisterName::A) != 0 {
                    let target = usize::from(operand);
                    if target % 2 != 0 {
                        return Err(Error::MisalignedJump(target));
                    }
                    *context.inst_ptr_mut() = target;
                    return Ok(());
                }
            }
            Instruction::Bxc => {
                let c = context.reg(RegisterName::C);
                *context.reg_mut(RegisterName::B) ^= c;
            }
            Instruction::Out => {
                let value = Self::combo_operand(operand, context)? % 8;
                context.emit(value as u8);
            }
            Instruction::Bdv => {
                let value = Self::shifted_a(operand, context)?;
                *context.reg_mut(RegisterName::B) = value;
            }
            Instruction::Cdv => {
                let value = Self::shifted_a(operand, context)?;
                *context.reg_mut(RegisterName::C) = value;
            }
        }
        *context.inst_ptr_mut() += 2;

        Ok(())
    }

    fn combo_operand(operand: u8, context: &impl ExecutionContext) -> Result<Word, Error> {
        match operand {
            0..=3 => Ok(Word::from(operand)),
            4 => Ok(context.reg(RegisterName::A)),
            5 => Ok(context.reg(RegisterName::B)),
            6 => Ok(context.reg(RegisterName::C)),
            _ => Err(Error::InvalidComboOperand(context.cur_inst_ptr())),
        }
    }

    // A / 2^combo, truncated. Shifting by the word width or more leaves 0.
    fn shifted_a(operand: u8, context: &impl ExecutionContext) -> Result<Word, Error> {
        let shift = Self::combo_operand(operand, context)?;
        let a = context.reg(RegisterName::A);

        Ok(u32::try_from(shift)
            .ok()
            .and_then(|s| a.checked_shr(s))
            .unwrap_or(0))
    }
}

/// State of one run of a program. Create a new machine for every run.
#[derive(Debug)]
pub struct Machine<'p> {
    program: &'p Program,
    registers: [Word; 3],
    inst_ptr: usize,
    output: Vec<u8>,
    step_count: usize,
    step_limit: usize,
}

impl<'p> ExecutionContext for Machine<'p> {
    fn reg(&self, name: RegisterName) -> Word {
        self.registers[usize::from(u8::from(name))]
    }

    fn reg_mut(&mut self, name: RegisterName) -> &mut Word {
        &mut self.registers[usize::from(u8::from(name))]
    }

    fn cur_inst_ptr(&self) -> usize {
        self.inst_ptr
    }

    fn inst_ptr_mut(&mut self) -> &mut usize {
        &mut self.inst_ptr
    }

    fn emit(&mut self, value: u8) {
        self.output.push(value);
    }
}

impl<'p> Machine<'p> {
    pub fn new(program: &'p Program, registers: [Word; 3]) -> Self {
        Self {
            program,
            registers,
            inst_ptr: 0,
            output: Vec::new(),
            step_count: 0,
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }

    /// Machine with `a` in register A and zero in B and C.
    pub fn with_seed(program: &'p Program, a: Word) -> Self {
        Self::new(program, [a, 0, 0])
    }

    pub fn with_step_limit(mut self, step_limit: usize) -> Self {
        self.step_limit = step_limit;
        self
    }

    /// Executes until the instruction pointer leaves the tape.
    pub fn run(&mut self) -> Result<(), Error> {
        while let Some((inst, operand)) = self.program.fetch(self.inst_ptr) {
            if self.step_count >= self.step_limit {
                return Err(Error::StepLimitExceeded(self.step_limit));
            }
            trace!(
                "Step #{}: {:?} {} @ {}, registers {:?}.",
                self.step_count,
                inst,
                operand,
                self.inst_ptr,
                self.registers
            );

            inst.exec_in(operand, self)?;
            self.step_count += 1;
        }

        Ok(())
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    pub fn into_output(self) -> Vec<u8> {
        self.output
    }

    pub fn register(&self, name: RegisterName) -> Word {
        self.reg(name)
    }

    pub fn registers(&self) -> &[Word; 3] {
        &self.registers
    }

    pub fn inst_ptr(&self) -> usize {
        self.inst_ptr
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }
}

/// Runs `program` with `a` in register A and returns everything it outputs.
pub fn run(program: &Program, a: Word) -> Result<Vec<u8>, Error> {
    let mut machine = Machine::with_seed(program, a);
    machine.run()?;

    Ok(machine.into_output())
}
