use anyhow::Result;

/// Line-oriented user I/O. `read_line` blocks until the user submits a line;
/// `Ok(None)` means the input was closed.
pub trait Channel {
    fn read_line(&mut self) -> Result<Option<String>>;

    fn reply(&mut self, text: &str) -> Result<()>;

    fn report_error(&mut self, error: &anyhow::Error) -> Result<()>;
}
