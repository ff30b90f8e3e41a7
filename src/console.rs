use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use palette::Srgb;

use crate::color::{Painter, Role};
use crate::data::model::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector, IrisSample};

/// File read when the user answers the data path prompt with `.` or nothing.
pub const DEFAULT_DATA_FILE: &str = "iris-data.txt";

pub const DATA_PATH_PROMPT: &str = "Enter data path. If no path is provided, the program will look for \"iris-data.txt\" in the current working directory. Enter period if you do not wish to provide path: ";

/// Turn the answer to the data path prompt into a path.
pub fn resolve_data_path(answer: &str) -> PathBuf {
    let answer = answer.trim();
    if answer.is_empty() || answer == "." {
        PathBuf::from(DEFAULT_DATA_FILE)
    } else {
        PathBuf::from(answer)
    }
}

// ---------------------------------------------------------------------------
// Console: blocking prompts and colored output
// ---------------------------------------------------------------------------

/// Line-oriented prompt/answer protocol over any reader and writer.
pub struct Console<R, W> {
    input: R,
    output: W,
    painter: Painter,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, painter: Painter) -> Self {
        Self {
            input,
            output,
            painter,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Print `prompt` and block for one line, typed in the answer colour.
    /// End of input is an error.
    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}{}", self.painter.start(Role::Answer))?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line);
        write!(self.output, "{}", self.painter.reset())?;
        let read = read.context("reading from standard input")?;
        if read == 0 {
            bail!("no answer to '{}': input ended", prompt.trim_end());
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    pub fn read_data_path(&mut self) -> Result<PathBuf> {
        let answer = self.ask(DATA_PATH_PROMPT)?;
        writeln!(self.output)?;
        Ok(resolve_data_path(&answer))
    }

    /// Read one measurement. Anything that is not a number ends the run.
    pub fn read_feature(&mut self, name: &str) -> Result<f32> {
        let answer = self.ask(&format!("Enter {name}: "))?;
        answer
            .trim()
            .parse::<f32>()
            .with_context(|| format!("{name}: '{answer}' is not a number"))
    }

    /// Read the four measurements of an unlabeled sample, in file column order.
    pub fn read_sample(&mut self) -> Result<IrisSample> {
        let mut values = [0.0f32; FEATURE_COUNT];
        for (value, name) in values.iter_mut().zip(FEATURE_NAMES) {
            *value = self.read_feature(name)?;
        }
        Ok(IrisSample::unlabeled(FeatureVector(values)))
    }

    pub fn status(&mut self, message: &str) -> Result<()> {
        let line = self.painter.role(Role::Status, message);
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    pub fn success(&mut self, message: &str) -> Result<()> {
        let line = self.painter.role(Role::Success, message);
        writeln!(self.output, "{line}")?;
        writeln!(self.output)?;
        Ok(())
    }

    pub fn prediction(&mut self, label: &str, color: Srgb<u8>) -> Result<()> {
        let label = self.painter.paint(color, label);
        writeln!(self.output, "Predicted flower type is: {label}")?;
        self.output.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn console(input: &str) -> Console<&[u8], Vec<u8>> {
        Console::new(input.as_bytes(), Vec::new(), Painter::new(false))
    }

    #[test]
    fn period_selects_default_file() {
        assert_eq!(resolve_data_path("."), PathBuf::from("iris-data.txt"));
        assert_eq!(resolve_data_path(" .\n"), PathBuf::from("iris-data.txt"));
        assert_eq!(resolve_data_path(""), PathBuf::from("iris-data.txt"));
        assert_eq!(resolve_data_path("data/iris.csv"), PathBuf::from("data/iris.csv"));
    }

    #[test]
    fn data_path_prompt_is_shown() {
        let mut c = console(".\n");
        let path = c.read_data_path().unwrap();
        assert_eq!(path, PathBuf::from(DEFAULT_DATA_FILE));
        let out = String::from_utf8(c.output).unwrap();
        assert!(out.starts_with(DATA_PATH_PROMPT));
    }

    #[test]
    fn features_are_read_in_column_order() {
        let mut c = console("5.1\n3.5\r\n1.4\n 0.2 \n");
        let sample = c.read_sample().unwrap();
        assert_eq!(sample.features(), FeatureVector([5.1, 3.5, 1.4, 0.2]));
        assert_eq!(sample.label, None);

        let out = String::from_utf8(c.output).unwrap();
        assert_eq!(
            out,
            "Enter Sepal Length: Enter Sepal Width: Enter Petal Length: Enter Petal Width: "
        );
    }

    #[test]
    fn non_numeric_answer_is_an_error() {
        for (input, name) in [
            ("abc\n", "Sepal Length"),
            ("5.1\nwide\n", "Sepal Width"),
            ("5.1\n3.5\n\n", "Petal Length"),
            ("5.1\n3.5\n1.4\n0,2\n", "Petal Width"),
        ] {
            let err = console(input).read_sample().unwrap_err();
            assert!(err.to_string().starts_with(name), "{err}");
            assert!(err.to_string().contains("is not a number"));
        }
    }

    #[test]
    fn end_of_input_is_an_error() {
        let err = console("5.1\n").read_sample().unwrap_err();
        assert!(err.to_string().contains("input ended"));
    }

    #[test]
    fn answers_are_typed_in_green() {
        let mut c = Console::new("6.1\n".as_bytes(), Vec::new(), Painter::new(true));
        assert_eq!(c.read_feature("Sepal Length").unwrap(), 6.1);
        let out = String::from_utf8(c.output).unwrap();
        assert_eq!(out, "Enter Sepal Length: \x1b[38;2;80;200;120m\x1b[0m");
    }

    #[test]
    fn colour_is_reset_when_input_ends() {
        let mut c = Console::new("".as_bytes(), Vec::new(), Painter::new(true));
        assert!(c.read_data_path().is_err());
        let out = String::from_utf8(c.output).unwrap();
        assert!(out.ends_with("\x1b[0m"));
    }

    #[test]
    fn prediction_line_format() {
        let mut c = console("");
        c.prediction("Iris-setosa", Srgb::new(0, 0, 0)).unwrap();
        let out = String::from_utf8(c.output).unwrap();
        assert_eq!(out, "Predicted flower type is: Iris-setosa\n");
    }
}
