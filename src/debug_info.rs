use std::{fs, path::Path, str::FromStr};

use anyhow::{Context, Result};

use crate::{
    machine::{Program, RegisterName, Word},
    Error,
};

/// Initial registers and program shown by the device's debugger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugInfo {
    pub registers: [Word; 3],
    pub program: Program,
}

impl FromStr for DebugInfo {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        static PROGRAM_HEADER: &str = "Program:";
        let mut registers = [None; 3];
        let mut program = None;
        for line in s.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if let Some(rest) = line.strip_prefix("Register ") {
                let (name, value) = read_register(rest)
                    .ok_or_else(|| Error::UnexpectedLine(line.to_string()))??;
                registers[usize::from(u8::from(name))] = Some(value);
            } else if let Some(codes) = line.strip_prefix(PROGRAM_HEADER) {
                program = Some(codes.parse::<Program>()?);
            } else {
                return Err(Error::UnexpectedLine(line.to_string()));
            }
        }

        let mut values = [0; 3];
        for (ind, name) in [RegisterName::A, RegisterName::B, RegisterName::C]
            .into_iter()
            .enumerate()
        {
            values[ind] = registers[ind].ok_or(Error::NoRegisterLine(name))?;
        }

        Ok(DebugInfo {
            registers: values,
            program: program.ok_or(Error::NoProgram)?,
        })
    }
}

// `None` when the text after "Register " doesn't name a register.
fn read_register(text: &str) -> Option<Result<(RegisterName, Word), Error>> {
    let (name, value_text) = text.split_once(':')?;
    let name = match name.trim() {
        "A" => RegisterName::A,
        "B" => RegisterName::B,
        "C" => RegisterName::C,
        _ => return None,
    };
    let value_text = value_text.trim();

    Some(
        value_text
            .parse::<Word>()
            .map(|value| (name, value))
            .map_err(|_| Error::InvalidRegisterValue(value_text.to_string())),
    )
}

pub fn read_debug_info<P: AsRef<Path>>(path: P) -> Result<DebugInfo> {
    let text = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read given file({}).", path.as_ref().display()))?;
    let info = text.parse::<DebugInfo>().with_context(|| {
        format!(
            "Failed to parse debug information in given file({}).",
            path.as_ref().display()
        )
    })?;

    Ok(info)
}
