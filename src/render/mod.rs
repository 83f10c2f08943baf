//! Output rendering
//!
//! Plain output is a banner comment per file; document output wraps every
//! file in an indexed `<document>` element for LLM context windows.

use std::io::{self, Write};

use crate::domain::{OutputFormat, README_PLACEHOLDER};

/// Streams documents to a writer in the configured format
pub struct Emitter<W: Write> {
    writer: W,
    format: OutputFormat,
    banner_prefix: &'static str,
    next_index: usize,
    documents: usize,
    bytes_written: u64,
}

impl<W: Write> Emitter<W> {
    pub fn new(writer: W, format: OutputFormat, banner_prefix: &'static str) -> Self {
        Self { writer, format, banner_prefix, next_index: 0, documents: 0, bytes_written: 0 }
    }

    /// Open the output and write the README slot.
    ///
    /// Document output always fills index 0, using a placeholder when there is
    /// no README; plain output only writes a README that exists.
    pub fn begin(&mut self, readme: Option<(&str, &str)>) -> io::Result<()> {
        match self.format {
            OutputFormat::Plain => {
                if let Some((path, content)) = readme {
                    self.emit(path, content)?;
                }
            }
            OutputFormat::Documents => {
                self.write("<documents>\n")?;
                let (path, content) = readme.unwrap_or(("README.md", README_PLACEHOLDER));
                self.emit(path, content)?;
            }
        }
        Ok(())
    }

    /// Write one file.
    pub fn emit(&mut self, path: &str, content: &str) -> io::Result<()> {
        match self.format {
            OutputFormat::Plain => {
                let banner = format!("{} File: {}\n", self.banner_prefix, path);
                self.write(&banner)?;
                self.write(content)?;
                self.write("\n\n")?;
            }
            OutputFormat::Documents => {
                let open = format!(
                    "<document index=\"{}\">\n<source>{}</source>\n<document_content>\n",
                    self.next_index, path
                );
                self.write(&open)?;
                self.write(content)?;
                if !content.ends_with('\n') {
                    self.write("\n")?;
                }
                self.write("</document_content>\n</document>\n")?;
                self.next_index += 1;
            }
        }
        self.documents += 1;
        Ok(())
    }

    /// Close the output, flush, and hand back the writer.
    pub fn finish(mut self) -> io::Result<W> {
        if self.format == OutputFormat::Documents {
            self.write("</documents>\n")?;
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    pub fn documents(&self) -> usize {
        self.documents
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.bytes_written += text.len() as u64;
        Ok(())
    }
}
