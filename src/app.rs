use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use log::info;

use crate::color::{ColorMap, Painter, Role};
use crate::console::Console;
use crate::data::loader;
use crate::pipeline::Pipeline;
use crate::sdca::SdcaOptions;

/// Fields in the data file are comma separated.
pub const DATA_SEPARATOR: u8 = b',';

// ---------------------------------------------------------------------------
// One run of the program: load → train → read a sample → predict
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct IrisApp {
    pub options: SdcaOptions,
}

impl IrisApp {
    pub fn new(options: SdcaOptions) -> Self {
        Self { options }
    }

    /// Run the whole console session once. Any failure ends it.
    pub fn run<R: BufRead, W: Write>(&self, console: &mut Console<R, W>) -> Result<String> {
        let path = console.read_data_path()?;
        let dataset = loader::load_file(&path, DATA_SEPARATOR)?;

        console.status("Training the model...")?;
        let model = Pipeline::new(self.options.clone())
            .train(&dataset)
            .with_context(|| format!("training on '{}'", path.display()))?;
        info!(
            "training accuracy {:.1}%",
            100.0 * model.accuracy(&dataset)
        );
        console.success("Training complete.")?;

        let sample = console.read_sample()?;
        let label = model.predict(&sample.features())?;

        let colors = ColorMap::new(model.labels());
        console.prediction(label, colors.color_for(label))?;
        Ok(label.to_string())
    }
}

/// The one line shown for a failed run: the error chain in the error colour.
pub fn error_report(err: &anyhow::Error, painter: Painter) -> String {
    painter.role(Role::Error, &format!("{err:#}"))
}
