//! Interactive prompting seam.
//!
//! The build pipeline suspends only inside [`Prompter`] calls. The CLI uses a
//! [`LinePrompter`] over stdin/stdout; tests drive the same type with byte
//! slices or substitute their own implementation.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

use super::Question;
use crate::error::QuestionError;

/// Outcome of a yes/no confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Proceed,
    Abort,
}

/// Source of answers for the resolution protocol.
#[async_trait::async_trait]
pub trait Prompter: Send + Sync {
    /// Displays an informational message.
    async fn notify(&self, text: &str) -> Result<(), QuestionError>;

    /// Asks a question and waits for its answer.
    async fn ask(&self, question: &Question) -> Result<String, QuestionError>;

    /// Asks for a yes/no confirmation.
    async fn confirm(&self, message: &str) -> Result<Confirmation, QuestionError>;
}

/// Line-oriented prompter over an async reader/writer pair.
///
/// Answers are read one line at a time with the trailing newline removed.
/// Reader and writer sit behind separate `tokio::sync::Mutex` locks since
/// they are held across `.await` points.
pub struct LinePrompter<R, W> {
    reader: Mutex<R>,
    writer: Mutex<W>,
}

impl LinePrompter<BufReader<tokio::io::Stdin>, tokio::io::Stdout> {
    /// Prompter bound to the process stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> LinePrompter<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    #[must_use]
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: Mutex::new(reader),
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the prompter, returning the reader and writer.
    pub fn into_inner(self) -> (R, W) {
        (self.reader.into_inner(), self.writer.into_inner())
    }

    async fn write(&self, text: &str) -> Result<(), QuestionError> {
        let mut writer = self.writer.lock().await;
        writer.write_all(text.as_bytes()).await?;
        writer.flush().await?;
        drop(writer);
        Ok(())
    }

    async fn read_answer(&self) -> Result<String, QuestionError> {
        let mut line = String::new();
        let n = self.reader.lock().await.read_line(&mut line).await?;
        if n == 0 {
            return Err(QuestionError::InputClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl<R, W> std::fmt::Debug for LinePrompter<R, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinePrompter").finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl<R, W> Prompter for LinePrompter<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn notify(&self, text: &str) -> Result<(), QuestionError> {
        self.write(&format!("{text}\n")).await
    }

    async fn ask(&self, question: &Question) -> Result<String, QuestionError> {
        self.write(&format!("? {}: ", question.prompt)).await?;
        self.read_answer().await
    }

    async fn confirm(&self, message: &str) -> Result<Confirmation, QuestionError> {
        loop {
            self.write(&format!("{message} (y/n) ")).await?;
            match self.read_answer().await?.trim() {
                "y" | "Y" => return Ok(Confirmation::Proceed),
                "n" | "N" => return Ok(Confirmation::Abort),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(prompt: &str) -> Question {
        Question {
            token: "t".into(),
            prompt: prompt.into(),
            answer: None,
        }
    }

    #[tokio::test]
    async fn ask_writes_prompt_and_reads_line() {
        let p = LinePrompter::new(&b"an answer\r\n"[..], Vec::new());
        let answer = p.ask(&question("Summary")).await.unwrap();
        assert_eq!(answer, "an answer");
        let (_, out) = p.into_inner();
        assert_eq!(String::from_utf8(out).unwrap(), "? Summary: ");
    }

    #[tokio::test]
    async fn empty_line_is_empty_answer() {
        let p = LinePrompter::new(&b"\n"[..], Vec::new());
        assert_eq!(p.ask(&question("x")).await.unwrap(), "");
    }

    #[tokio::test]
    async fn last_line_without_newline() {
        let p = LinePrompter::new(&b"tail"[..], Vec::new());
        assert_eq!(p.ask(&question("x")).await.unwrap(), "tail");
        assert!(matches!(
            p.ask(&question("x")).await,
            Err(QuestionError::InputClosed)
        ));
    }

    #[tokio::test]
    async fn confirm_reasks_until_valid() {
        let p = LinePrompter::new(&b"maybe\nyes\nY\n"[..], Vec::new());
        assert_eq!(p.confirm("Continue?").await.unwrap(), Confirmation::Proceed);
        let (_, out) = p.into_inner();
        assert_eq!(String::from_utf8(out).unwrap().matches("Continue?").count(), 3);
    }

    #[tokio::test]
    async fn confirm_no_aborts() {
        let p = LinePrompter::new(&b"n\n"[..], Vec::new());
        assert_eq!(p.confirm("Continue?").await.unwrap(), Confirmation::Abort);
    }

    #[tokio::test]
    async fn confirm_on_closed_input() {
        let p = LinePrompter::new(&b""[..], Vec::new());
        assert!(matches!(
            p.confirm("Continue?").await,
            Err(QuestionError::InputClosed)
        ));
    }
}
