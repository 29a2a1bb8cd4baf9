use trait_lox::runner::{Lox, LoxError};

use regex::Regex;
use test_generator::test_resources;

#[derive(Debug, PartialEq)]
enum ExpectedOutput {
    StaticErrors(Vec<String>),
    Ran(Output),
}

#[derive(Debug, PartialEq)]
struct Output {
    output: Vec<String>,
    runtime_error: Option<String>,
    warnings: Option<Vec<String>>,
}

#[test_resources("tests/lox_test_cases/**/*.lox")]
fn test_treewalk_interpreter(file: &str) {
    let source = std::fs::read_to_string(file).unwrap();

    let expected_output = get_expected_output(&source);
    let checks_warnings = matches!(
        &expected_output,
        ExpectedOutput::Ran(Output {
            warnings: Some(_),
            ..
        })
    );
    let output = run_interpreter_on_source(&source, checks_warnings);

    assert_eq!(expected_output, output);
}

fn run_interpreter_on_source(source: &str, checks_warnings: bool) -> ExpectedOutput {
    let mut output = vec![];
    let mut result = Output {
        output: vec![],
        runtime_error: None,
        warnings: None,
    };

    let run_result = {
        let mut lox = Lox::new_with_output(std::io::Cursor::new(&mut output));
        let program = match lox.prepare(source) {
            Ok(program) => program,
            Err(error) => return ExpectedOutput::StaticErrors(error.render(source)),
        };

        if checks_warnings {
            let warnings = program.warnings.iter().map(|w| w.message()).collect();
            result.warnings = Some(warnings);
        }

        lox.execute(&program)
    };

    result.output = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| l.to_owned())
        .collect();
    result.runtime_error = match run_result {
        Ok(()) => None,
        Err(LoxError::Runtime(error)) => Some(error.error.to_string()),
        Err(other) => panic!("unexpected error while running: {}", other),
    };

    ExpectedOutput::Ran(result)
}

fn get_expected_output(source: &str) -> ExpectedOutput {
    let output_regexer = Regex::new(r"// expect: (.*)$").unwrap();
    let runtime_error_regexer = Regex::new(r"// expect runtime error: (.*)$").unwrap();
    let warning_regexer = Regex::new(r"// expect warning: (.*)$").unwrap();
    let static_error_regexer = Regex::new(r"// (\[line (\d+)\] )?(Error.*)").unwrap();

    let mut static_errors = vec![];
    let mut warnings = vec![];
    let mut result = Output {
        output: vec![],
        runtime_error: None,
        warnings: None,
    };

    for (i, line) in source.lines().enumerate() {
        if let Some(r) = output_regexer.captures(line) {
            result.output.push(r.get(1).unwrap().as_str().to_owned());
        }
        if let Some(r) = runtime_error_regexer.captures(line) {
            result
                .runtime_error
                .replace(r.get(1).unwrap().as_str().to_owned());
        }
        if let Some(r) = warning_regexer.captures(line) {
            warnings.push(r.get(1).unwrap().as_str().to_owned());
        }
        if let Some(r) = static_error_regexer.captures(line) {
            // Without an explicit line the error is expected where the
            // comment sits.
            let line_number = match r.get(2) {
                Some(n) => n.as_str().parse().unwrap(),
                None => i + 1,
            };
            let message = r.get(3).unwrap().as_str();
            static_errors.push(format!("[line {}] {}", line_number, message));
        }
    }

    if !warnings.is_empty() {
        result.warnings = Some(warnings);
    }

    if !static_errors.is_empty() {
        ExpectedOutput::StaticErrors(static_errors)
    } else {
        ExpectedOutput::Ran(result)
    }
}
