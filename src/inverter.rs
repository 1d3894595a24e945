use log::{debug, info};

use crate::{
    format_output,
    machine::{Machine, Program, Word, DEFAULT_STEP_LIMIT},
    Error,
};

const DIGIT_BASE: Word = 8;

/// A prefix of register A the search descended into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descent {
    pub depth: usize,
    pub prefix: Word,
}

#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    pub runs: usize,
    pub descents: Vec<Descent>,
}

/// Digit-wise search for the least value of register A that makes a program
/// output a target sequence.
///
/// Candidates are built from the most significant octal digit down: a prefix
/// is extended only while its output is a suffix of the target, so each level
/// costs at most eight runs of the machine. The search relies on every octal
/// digit of A contributing exactly one output; [`Inverter::check_growth`]
/// tests that before searching unless disabled.
#[derive(Debug)]
pub struct Inverter<'a> {
    program: &'a Program,
    target: &'a [u8],
    step_limit: usize,
    growth_check: bool,
    stats: SearchStats,
}

impl<'a> Inverter<'a> {
    /// Searches for the program's own tape.
    pub fn new(program: &'a Program) -> Self {
        Self {
            program,
            target: program.codes(),
            step_limit: DEFAULT_STEP_LIMIT,
            growth_check: true,
            stats: SearchStats::default(),
        }
    }

    pub fn with_target(mut self, target: &'a [u8]) -> Self {
        self.target = target;
        self
    }

    pub fn with_step_limit(mut self, step_limit: usize) -> Self {
        self.step_limit = step_limit;
        self
    }

    pub fn with_growth_check(mut self, enabled: bool) -> Self {
        self.growth_check = enabled;
        self
    }

    /// Statistics of the last search.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// `Ok(None)` means no seed exists with one output per octal digit.
    pub fn find_seed(&mut self) -> Result<Option<Word>, Error> {
        self.stats = SearchStats::default();
        if self.growth_check {
            self.check_growth()?;
        }

        info!(
            "Searching register A for output {}.",
            format_output(self.target)
        );
        let seed = self.search(0, 0, 0)?;
        info!(
            "Search finished after {} runs and {} descents, found {:?}.",
            self.stats.runs,
            self.stats.descents.len(),
            seed
        );

        Ok(seed)
    }

    /// Checks that the least k-digit octal value of A makes exactly k outputs,
    /// for every k up to the target length.
    pub fn check_growth(&self) -> Result<(), Error> {
        for digits in 1..=self.target.len() {
            let Some(a) = u32::try_from(digits - 1)
                .ok()
                .and_then(|exp| DIGIT_BASE.checked_pow(exp))
            else {
                break;
            };

            let output_len = self.output_of(a)?.len();
            debug!("A = {:o} makes {} outputs.", a, output_len);
            if output_len != digits {
                return Err(Error::IrregularOutputGrowth { digits, output_len });
            }
        }

        Ok(())
    }

    fn search(&mut self, prefix: Word, depth: usize, matched: usize) -> Result<Option<Word>, Error> {
        let Some(base) = prefix.checked_mul(DIGIT_BASE) else {
            return Ok(None);
        };

        for digit in 0..DIGIT_BASE {
            let candidate = base + digit;
            let output = self.output_of(candidate)?;
            self.stats.runs += 1;

            if output == self.target {
                return Ok(Some(candidate));
            }
            if output.len() > self.target.len() {
                continue;
            }
            // Descend only when the output grew, or a zero prefix would repeat forever.
            if output.len() > matched
                && depth + 1 < self.target.len()
                && self.target.ends_with(&output)
            {
                debug!(
                    "Prefix {:o} at depth {} outputs {}.",
                    candidate,
                    depth,
                    format_output(&output)
                );
                self.stats.descents.push(Descent {
                    depth,
                    prefix: candidate,
                });
                if let Some(seed) = self.search(candidate, depth + 1, output.len())? {
                    return Ok(Some(seed));
                }
            }
        }

        Ok(None)
    }

    fn output_of(&self, a: Word) -> Result<Vec<u8>, Error> {
        let mut machine = Machine::with_seed(self.program, a).with_step_limit(self.step_limit);
        machine.run()?;

        Ok(machine.into_output())
    }
}

/// Least value of register A that makes `program` output its own tape.
pub fn find_quine_seed(program: &Program) -> Result<Option<Word>, Error> {
    Inverter::new(program).find_seed()
}
