pub mod debug_info;
pub mod inverter;
pub mod machine;

use std::{error, fmt::Display, path::PathBuf};

use clap::Parser;

pub use debug_info::{read_debug_info, DebugInfo};
pub use inverter::{find_quine_seed, Descent, Inverter, SearchStats};
pub use machine::{run, Instruction, Machine, Program, RegisterName, Word, DEFAULT_STEP_LIMIT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    NoRegisterLine(RegisterName),
    NoProgram,
    UnexpectedLine(String),
    InvalidRegisterValue(String),
    InvalidCode(String),
    OddProgramLength(usize),
    CodeOutOfRange(usize, u8), // (index in tape, value)
    InvalidComboOperand(usize),
    MisalignedJump(usize),
    StepLimitExceeded(usize),
    IrregularOutputGrowth { digits: usize, output_len: usize },
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NoRegisterLine(name) => {
                write!(f, "Can't find line for register {} in debug information.", name)
            }
            Error::NoProgram => write!(f, "Can't find line for program in debug information."),
            Error::UnexpectedLine(s) => write!(f, "Unexpected line({}) in debug information.", s),
            Error::InvalidRegisterValue(s) => write!(f, "Invalid text({}) for register value.", s),
            Error::InvalidCode(s) => write!(f, "Invalid text({}) for code.", s),
            Error::OddProgramLength(n) => write!(
                f,
                "Program has odd length({}), every opcode needs an operand.",
                n
            ),
            Error::CodeOutOfRange(ind, n) => {
                write!(f, "Code({}) at {} is not a 3-bit number.", n, ind)
            }
            Error::InvalidComboOperand(ptr) => {
                write!(f, "Reserved combo operand 7 is used by instruction at {}.", ptr)
            }
            Error::MisalignedJump(target) => {
                write!(f, "Jump to odd position({}) of the program.", target)
            }
            Error::StepLimitExceeded(n) => {
                write!(f, "Program doesn't halt within {} steps.", n)
            }
            Error::IrregularOutputGrowth { digits, output_len } => write!(
                f,
                "Register A with {} octal digits makes {} outputs, expect one output per digit.",
                digits, output_len
            ),
        }
    }
}

impl error::Error for Error {}

impl Error {
    /// Whether this error was raised while the machine was executing.
    pub fn is_machine_fault(&self) -> bool {
        matches!(
            self,
            Error::InvalidComboOperand(_) | Error::MisalignedJump(_) | Error::StepLimitExceeded(_)
        )
    }
}

#[derive(Debug, Parser)]
pub struct CLIArgs {
    pub input_path: PathBuf,
    /// Maximum number of instructions executed by one run
    #[arg(long, default_value_t = DEFAULT_STEP_LIMIT)]
    pub step_limit: usize,
    /// Search without checking that each octal digit of A adds one output
    #[arg(long)]
    pub unchecked: bool,
}

pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}

pub fn format_output(values: &[u8]) -> String {
    values
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
