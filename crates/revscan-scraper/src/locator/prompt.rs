use std::io::{self, BufRead, BufReader, Write};
use std::thread;

use revscan_core::{absolutize_listing_url, BusinessRecord};
use tokio::sync::mpsc;

use crate::error::ScraperError;

const PROFILE_PATH: &str = "/biz/";

/// Human-in-the-loop locator: shows the business and a ready-made search
/// URL, then reads the review-page URL an operator pastes.
///
/// Input lines are read on a dedicated thread and handed over a channel, so
/// a pending prompt can be abandoned when the run is interrupted. Meant for
/// small interactive batches.
pub struct PromptLocator {
    site_base_url: String,
    lines: mpsc::Receiver<io::Result<String>>,
    output: Box<dyn Write + Send>,
}

impl std::fmt::Debug for PromptLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptLocator")
            .field("site_base_url", &self.site_base_url)
            .finish_non_exhaustive()
    }
}

impl PromptLocator {
    /// Prompt on the process's stdin/stdout.
    #[must_use]
    pub fn stdio(site_base_url: impl Into<String>) -> Self {
        Self::new(
            site_base_url,
            Box::new(BufReader::new(io::stdin())),
            Box::new(io::stdout()),
        )
    }

    /// Starts the reader thread for `input`. The thread exits at end of
    /// input, on a read error, or once the locator is dropped.
    #[must_use]
    pub fn new(
        site_base_url: impl Into<String>,
        input: Box<dyn BufRead + Send>,
        output: Box<dyn Write + Send>,
    ) -> Self {
        let (tx, lines) = mpsc::channel(1);
        thread::spawn(move || read_lines(input, &tx));
        Self {
            site_base_url: site_base_url.into(),
            lines,
            output,
        }
    }

    pub(super) async fn locate(
        &mut self,
        record: &BusinessRecord,
    ) -> Result<Option<String>, ScraperError> {
        let search = super::search_url(&self.site_base_url, record)?;
        let out = &mut self.output;
        writeln!(out)?;
        writeln!(out, "{}", "=".repeat(70))?;
        writeln!(out, "Business: {} ({})", record.name, record.location())?;
        writeln!(out, "{}", "=".repeat(70))?;
        writeln!(out, "Search: {search}")?;
        writeln!(
            out,
            "Paste the business page URL (e.g. {}/biz/company-name-city), or press Enter to skip.",
            self.site_base_url.trim_end_matches('/')
        )?;

        let url = self.ask("URL: ").await?;
        if url.is_empty() {
            return Ok(None);
        }

        if !url.contains(PROFILE_PATH) {
            let answer = self
                .ask("That does not look like a business page URL. Use it anyway? (y/n): ")
                .await?;
            if !answer.eq_ignore_ascii_case("y") {
                return Ok(None);
            }
        }

        Ok(Some(absolutize_listing_url(&url, &self.site_base_url)))
    }

    /// Writes `question` and waits for one trimmed line.
    ///
    /// # Errors
    ///
    /// End of input is [`io::ErrorKind::UnexpectedEof`]; nobody is left to
    /// answer, so the run should not read it as a skip.
    async fn ask(&mut self, question: &str) -> Result<String, ScraperError> {
        write!(self.output, "{question}")?;
        self.output.flush()?;
        match self.lines.recv().await {
            Some(line) => Ok(line?.trim().to_owned()),
            None => Err(ScraperError::Terminal(io::ErrorKind::UnexpectedEof.into())),
        }
    }
}

/// Forwards lines until end of input, the first read error, or the
/// receiver going away.
fn read_lines(mut input: Box<dyn BufRead + Send>, tx: &mpsc::Sender<io::Result<String>>) {
    loop {
        let mut line = String::new();
        let read = match input.read_line(&mut line) {
            Ok(0) => return,
            Ok(_) => Ok(line),
            Err(e) => Err(e),
        };
        let failed = read.is_err();
        if tx.blocking_send(read).is_err() || failed {
            return;
        }
    }
}
