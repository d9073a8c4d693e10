use pretty_assertions::assert_eq;
use rstest::rstest;
use std::io::Write;
use tally::context::Context;
use tally::repl::Command;
use tally::runner::{self, RunOptions};
use tally::value::Value;

#[rstest]
#[case("", Command::Empty)]
#[case("   \n", Command::Empty)]
#[case("help", Command::Help)]
#[case("#cls", Command::Clear)]
#[case("exit", Command::Exit)]
#[case("quit\n", Command::Exit)]
#[case("loadFile", Command::LoadFile(None))]
#[case("loadFile   ", Command::LoadFile(None))]
#[case("loadFile demo.tl", Command::LoadFile(Some("demo.tl")))]
#[case("loadFileX;", Command::Source("loadFileX;"))]
#[case("declare x = 1;\n", Command::Source("declare x = 1;"))]
fn classifies_input_lines(#[case] line: &str, #[case] expected: Command) {
    assert_eq!(Command::parse(line), expected);
}

#[test]
fn run_file_shares_the_session_context() {
    let path = std::env::temp_dir().join(format!("tally-run-file-{}.tl", std::process::id()));
    {
        let mut file = std::fs::File::create(&path).expect("create script");
        writeln!(file, "declare total = 0;").expect("write script");
        writeln!(file, "declare i = 1;").expect("write script");
        writeln!(file, "while (i <= 4) {{ declare total = total + i; declare i = i + 1; }}")
            .expect("write script");
    }

    let mut context = Context::new();
    let options = RunOptions {
        color: false,
        ..RunOptions::default()
    };
    let evaluation = runner::run_file(&path, &mut context, &options).expect("readable script");
    std::fs::remove_file(&path).ok();

    assert!(evaluation.is_ok());
    assert_eq!(context.lookup("total"), Some(Value::Number(10.0)));
}

#[test]
fn run_file_reports_missing_files() {
    let mut context = Context::new();
    let missing = std::path::Path::new("definitely/not/here.tl");

    assert!(runner::run_file(missing, &mut context, &RunOptions::default()).is_err());
}
