use std::io::{self, IsTerminal};
use std::process::ExitCode;

use iris_classifier::app::{IrisApp, error_report};
use iris_classifier::color::Painter;
use iris_classifier::console::Console;
use iris_classifier::sdca::SdcaOptions;

fn main() -> ExitCode {
    env_logger::init();

    let painter = Painter::new(io::stdout().is_terminal());
    let mut console = Console::new(io::stdin().lock(), io::stdout().lock(), painter);

    match IrisApp::new(SdcaOptions::default()).run(&mut console) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("{err:?}");
            eprintln!("{}", error_report(&err, Painter::new(io::stderr().is_terminal())));
            ExitCode::FAILURE
        }
    }
}
