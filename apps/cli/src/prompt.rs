//! Interactive prompts on a line-oriented terminal

use std::io::{BufRead, Write};

use workshop::{Result, ScrapeError, SelectionRequest, Selector};

/// Reads one trimmed line; `None` at end of input
pub fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .map_err(|source| ScrapeError::Input { source })?;
    if read == 0 {
        Ok(None)
    } else {
        Ok(Some(line.trim().to_string()))
    }
}

/// Ask for the collection URL
pub fn ask_collection_url<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<String> {
    loop {
        writeln!(output, "Enter the URL of the workshop collection you want to parse:")
            .map_err(|source| ScrapeError::Input { source })?;
        match read_line(input)? {
            Some(line) if !line.is_empty() => return Ok(line),
            Some(_) => continue,
            None => return Err(ScrapeError::InputClosed),
        }
    }
}

/// Selector that lists the options and reads an index per request
///
/// Non-numeric or out-of-range answers are reported and asked again, so a
/// typo never throws away a finished scan. End of input aborts.
pub struct PromptSelector<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn write_options(&mut self, request: &SelectionRequest<'_>) -> std::io::Result<()> {
        writeln!(self.output, "{}", request.headline())?;
        for index in 0..request.options.len() {
            writeln!(self.output, "{} :  {}", index, request.label(index))?;
        }
        self.output.flush()
    }
}

impl<R: BufRead, W: Write> Selector for PromptSelector<R, W> {
    fn select(&mut self, request: &SelectionRequest<'_>) -> Result<usize> {
        self.write_options(request)
            .map_err(|source| ScrapeError::Input { source })?;

        loop {
            let Some(answer) = read_line(&mut self.input)? else {
                return Err(ScrapeError::InputClosed);
            };

            match answer.parse::<usize>() {
                Ok(index) if index < request.options.len() => return Ok(index),
                _ => writeln!(
                    self.output,
                    "Please enter a number between 0 and {}",
                    request.options.len().saturating_sub(1)
                )
                .map_err(|source| ScrapeError::Input { source })?,
            }
        }
    }
}
