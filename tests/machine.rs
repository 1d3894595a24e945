use chronospatial::{run, Error, Machine, Program, RegisterName, Word};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn program(text: &str) -> Program {
    text.parse().unwrap()
}

fn run_with(text: &str, registers: [Word; 3]) -> (Vec<u8>, [Word; 3]) {
    let program = program(text);
    let mut machine = Machine::new(&program, registers);
    machine.run().unwrap();
    let registers = *machine.registers();

    (machine.into_output(), registers)
}

#[test]
fn bst_reads_register_c() {
    init_logger();
    let (_, registers) = run_with("2,6", [0, 0, 9]);

    assert_eq!(registers[1], 1);
}

#[test]
fn out_reads_literals_and_register_a() {
    init_logger();
    let (output, _) = run_with("5,0,5,1,5,4", [10, 0, 0]);

    assert_eq!(output, vec![0, 1, 2]);
}

#[test]
fn halving_loop_empties_register_a() {
    init_logger();
    let program = program("0,1,5,4,3,0");
    let mut machine = Machine::with_seed(&program, 2024);
    machine.run().unwrap();

    assert_eq!(machine.output(), &[4, 2, 5, 6, 7, 7, 7, 7, 3, 1, 0]);
    assert_eq!(machine.register(RegisterName::A), 0);
}

#[test]
fn bxl_takes_literal_seven() {
    init_logger();
    let (_, registers) = run_with("1,7", [0, 29, 0]);

    assert_eq!(registers[1], 26);
}

#[test]
fn bxc_ignores_operand() {
    init_logger();
    let (_, registers) = run_with("4,0", [0, 2024, 43690]);
    assert_eq!(registers[1], 44354);

    let (_, registers) = run_with("4,7", [0, 2024, 43690]);
    assert_eq!(registers[1], 44354);
}

#[test]
fn debugger_example_outputs_digits() {
    init_logger();
    let output = run(&program("0,1,5,4,3,0"), 729).unwrap();

    assert_eq!(output, vec![4, 6, 3, 5, 6, 3, 5, 2, 1, 0]);
    assert_eq!(
        chronospatial::format_output(&output),
        "4,6,3,5,6,3,5,2,1,0"
    );
}

#[test]
fn divisions_are_exact_above_40_bits() {
    init_logger();
    let a: Word = 0xABCD_EF01_2345;
    assert!(a > 1 << 40);

    let (_, registers) = run_with("7,1,6,2,0,3", [a, 0, 0]);
    let reference = u128::from(a);
    assert_eq!(u128::from(registers[2]), reference / 2);
    assert_eq!(u128::from(registers[1]), reference / 4);
    assert_eq!(u128::from(registers[0]), reference / 8);
}

#[test]
fn octal_loop_matches_reference_above_40_bits() {
    init_logger();
    let a: Word = (1 << 45) + 0o1234567;
    let mut expected = Vec::new();
    let mut reference = u128::from(a);
    loop {
        reference /= 8;
        expected.push((reference % 8) as u8);
        if reference == 0 {
            break;
        }
    }

    assert_eq!(run(&program("0,3,5,4,3,0"), a).unwrap(), expected);
}

#[test]
fn shifting_by_register_value() {
    init_logger();
    let (_, registers) = run_with("0,5", [Word::MAX, 63, 0]);
    assert_eq!(registers[0], 1);

    let (_, registers) = run_with("0,5", [Word::MAX, 64, 0]);
    assert_eq!(registers[0], 0);

    // Shift count is A itself.
    let (_, registers) = run_with("6,4", [1 << 50, 0, 0]);
    assert_eq!(registers[1], 0);
}

#[test]
fn jump_past_end_halts_with_output_so_far() {
    init_logger();
    let program = program("5,4,3,6");
    let mut machine = Machine::with_seed(&program, 13);
    machine.run().unwrap();

    assert_eq!(machine.output(), &[5]);
    assert_eq!(machine.inst_ptr(), 6);
}

#[test]
fn runs_are_deterministic() {
    init_logger();
    let program = program("2,4,1,1,7,5,1,5,4,0,5,5,0,3,3,0");
    for a in [0, 1, 7, 2024, 0o1234_5670_1234_5670] {
        assert_eq!(run(&program, a).unwrap(), run(&program, a).unwrap());
    }
}

#[test]
fn empty_program_outputs_nothing() {
    init_logger();
    let program = program("");

    assert!(program.is_empty());
    assert!(run(&program, 42).unwrap().is_empty());
}

#[test]
fn step_count_and_limit() {
    init_logger();
    let program = program("0,3,5,4,3,0");
    let mut machine = Machine::with_seed(&program, 117440).with_step_limit(18);
    machine.run().unwrap();
    assert_eq!(machine.step_count(), 18);

    let mut machine = Machine::with_seed(&program, 117440).with_step_limit(17);
    assert_eq!(machine.run(), Err(Error::StepLimitExceeded(17)));
}

#[test]
fn endless_loop_is_a_fault() {
    init_logger();
    let program = program("5,4,3,0");
    let mut machine = Machine::with_seed(&program, 1).with_step_limit(100);
    let err = machine.run().unwrap_err();

    assert_eq!(err, Error::StepLimitExceeded(100));
    assert!(err.is_machine_fault());
    assert_eq!(machine.output().len(), 50);
}

#[test]
fn reserved_combo_operand_is_a_fault() {
    init_logger();
    let err = run(&program("1,7,5,7"), 0).unwrap_err();

    assert_eq!(err, Error::InvalidComboOperand(2));
    assert!(err.is_machine_fault());
}

#[test]
fn odd_jump_target_is_a_fault() {
    init_logger();
    assert_eq!(run(&program("3,1"), 1), Err(Error::MisalignedJump(1)));
    // Not taken when A is zero.
    assert_eq!(run(&program("3,1"), 0), Ok(Vec::new()));
}

#[test]
fn malformed_programs_are_rejected() {
    assert_eq!(Program::new(vec![0, 1, 2]), Err(Error::OddProgramLength(3)));
    assert_eq!(
        "0,3,5,8".parse::<Program>(),
        Err(Error::CodeOutOfRange(3, 8))
    );
    assert_eq!(
        "0,x".parse::<Program>(),
        Err(Error::InvalidCode("x".to_string()))
    );
    assert!(!Error::OddProgramLength(3).is_machine_fault());
}
