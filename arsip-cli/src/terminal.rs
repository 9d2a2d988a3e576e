use arsip_client::exit_form::{ConfirmPrompt, Notice, NoticeLevel, Notifier};
use async_trait::async_trait;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Prints notices to the terminal and asks for confirmation on stdin.
pub struct TerminalNotifier {
    assume_yes: bool,
}

impl TerminalNotifier {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }

    async fn ask(prompt: &ConfirmPrompt) -> io::Result<bool> {
        let mut stdout = io::stdout();
        stdout
            .write_all(
                format!(
                    "❓ {}\n   {}\n   [y] {} / [N] {}: ",
                    prompt.title, prompt.message, prompt.confirm_label, prompt.cancel_label
                )
                .as_bytes(),
            )
            .await?;
        stdout.flush().await?;

        let mut answer = String::new();
        BufReader::new(io::stdin()).read_line(&mut answer).await?;
        Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }
}

#[async_trait]
impl Notifier for TerminalNotifier {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
        if self.assume_yes {
            println!("❓ {} (confirmed by --yes)", prompt.title);
            return true;
        }

        match Self::ask(prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                log::error!("Could not read confirmation: {}", e);
                false
            }
        }
    }

    fn notify(&self, notice: Notice) {
        let icon = match notice.level {
            NoticeLevel::Info => "ℹ️ ",
            NoticeLevel::Success => "✅",
            NoticeLevel::Warning => "⚠️ ",
            NoticeLevel::Error => "🔥",
        };
        match notice.level {
            NoticeLevel::Warning | NoticeLevel::Error => {
                eprintln!("{} {}: {}", icon, notice.title, notice.message)
            }
            NoticeLevel::Info | NoticeLevel::Success => {
                println!("{} {}: {}", icon, notice.title, notice.message)
            }
        }
    }
}
