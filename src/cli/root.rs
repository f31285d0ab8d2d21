use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::entry::{DialogEntry, Outcome};
use crate::config::Config;
use crate::dialogs::{ChoiceOption, Content, DialogRenderer, DialogStore, Dialogs, ModalSize};
use crate::tui;

/// Ask questions from shell scripts with terminal dialogs
#[derive(Parser, Debug)]
#[command(
    name = "action-dialogs",
    version,
    about = "Ask questions from shell scripts with terminal dialogs",
    long_about = r#"Opens one or more dialogs in the terminal and prints how each one settled as JSON.
The exit status is 1 when any dialog was rejected (declined, dismissed or invalid).

Examples:
  action-dialogs confirm "Deploy to production?"
  action-dialogs prompt "Release name" --value v1.2.0 --required
  action-dialogs choose "Region" "Where to deploy?" -o eu=Europe -o us=America
  action-dialogs stack dialogs.json"#
)]
pub struct Cli {
    /// Configuration file to use instead of the discovered one
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long = "log-file", global = true)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a message
    Alert(AlertArgs),
    /// Ask a yes/no question
    Confirm(ConfirmArgs),
    /// Ask for text
    Prompt(PromptArgs),
    /// Pick one option
    Choose(ChooseArgs),
    /// Pick any number of options
    Pick(PickArgs),
    /// Show a custom modal
    Modal(ModalArgs),
    /// Open every dialog described in a JSON file at once
    Stack(StackArgs),
}

#[derive(Args, Debug)]
pub struct AlertArgs {
    pub message: String,
    #[arg(short, long)]
    pub title: Option<String>,
    /// Label of the acknowledge button
    #[arg(long)]
    pub ok_label: Option<String>,
}

#[derive(Args, Debug)]
pub struct ConfirmArgs {
    pub message: String,
    #[arg(short, long)]
    pub title: Option<String>,
    #[arg(long)]
    pub yes_label: Option<String>,
    #[arg(long)]
    pub no_label: Option<String>,
}

#[derive(Args, Debug)]
pub struct PromptArgs {
    pub message: String,
    #[arg(short, long)]
    pub title: Option<String>,
    /// Initial value
    #[arg(long)]
    pub value: Option<String>,
    /// Only close once a value is saved or through the close control
    #[arg(long)]
    pub required: bool,
    /// Multi-line input
    #[arg(long = "long")]
    pub long_prompt: bool,
    /// Show the value without allowing changes
    #[arg(long)]
    pub readonly: bool,
    #[arg(long)]
    pub save_label: Option<String>,
}

#[derive(Args, Debug)]
pub struct ChoiceArgs {
    pub title: String,
    pub message: String,
    /// Option as VALUE or VALUE=LABEL, repeatable
    #[arg(short = 'o', long = "option", value_parser = parse_option, required = true)]
    pub options: Vec<ChoiceOption>,
    /// Value of an option that cannot be selected, repeatable
    #[arg(long = "disabled")]
    pub disabled: Vec<String>,
    /// Only close once applied or through the close control
    #[arg(long)]
    pub required: bool,
    #[arg(long)]
    pub apply_label: Option<String>,
}

impl ChoiceArgs {
    fn options(&self) -> Vec<ChoiceOption> {
        self.options
            .iter()
            .cloned()
            .map(|option| {
                let disabled = self.disabled.contains(&option.value);
                option.disabled(disabled)
            })
            .collect()
    }
}

#[derive(Args, Debug)]
pub struct ChooseArgs {
    #[command(flatten)]
    pub choice: ChoiceArgs,
    /// Initially selected value
    #[arg(long)]
    pub value: Option<String>,
}

#[derive(Args, Debug)]
pub struct PickArgs {
    #[command(flatten)]
    pub choice: ChoiceArgs,
    /// Initially selected value, repeatable
    #[arg(long)]
    pub value: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ModalArgs {
    pub title: String,
    pub message: String,
    /// Width class: xs, sm, md or lg
    #[arg(long)]
    pub size: Option<ModalSize>,
    /// Hide the close control
    #[arg(long)]
    pub no_close_button: bool,
    /// Ignore backdrop clicks and Escape
    #[arg(long)]
    pub lock: bool,
}

#[derive(Args, Debug)]
pub struct StackArgs {
    /// JSON file holding an array of dialogs, `-` for stdin
    pub file: PathBuf,
}

/// Parse `VALUE` or `VALUE=LABEL`
fn parse_option(s: &str) -> std::result::Result<ChoiceOption, String> {
    let (value, label) = s.split_once('=').unwrap_or((s, s));
    if value.is_empty() {
        return Err(format!("option '{}' has an empty value", s));
    }
    Ok(ChoiceOption::new(label, value))
}

impl Commands {
    /// Dialogs this command opens
    async fn entries(self) -> Result<Vec<DialogEntry>> {
        let entry = match self {
            Commands::Alert(args) => DialogEntry::Alert {
                title: args.title.map(Content::from),
                message: args.message.into(),
                yes_label: args.ok_label,
            },
            Commands::Confirm(args) => DialogEntry::Confirm {
                title: args.title.map(Content::from),
                message: args.message.into(),
                yes_label: args.yes_label,
                no_label: args.no_label,
            },
            Commands::Prompt(args) => DialogEntry::Prompt {
                title: args.title.map(Content::from),
                message: args.message.into(),
                value: args.value,
                required: args.required,
                long_prompt: args.long_prompt,
                readonly: args.readonly,
                save_label: args.save_label,
            },
            Commands::Choose(args) => DialogEntry::ChoiceSingle {
                options: args.choice.options(),
                title: args.choice.title.into(),
                message: args.choice.message.into(),
                value: args.value,
                required: args.choice.required,
                apply_label: args.choice.apply_label,
            },
            Commands::Pick(args) => DialogEntry::ChoiceMultiple {
                options: args.choice.options(),
                title: args.choice.title.into(),
                message: args.choice.message.into(),
                value: args.value,
                required: args.choice.required,
                apply_label: args.choice.apply_label,
            },
            Commands::Modal(args) => DialogEntry::Modal {
                title: args.title.into(),
                message: args.message.into(),
                size: args.size,
                show_close_button: args.no_close_button.then_some(false),
                disable_backdrop_click: args.lock,
            },
            Commands::Stack(args) => return read_stack(&args.file).await,
        };

        Ok(vec![entry])
    }
}

async fn read_stack(path: &Path) -> Result<Vec<DialogEntry>> {
    let content = if path.as_os_str() == "-" {
        let mut content = String::new();
        tokio::io::AsyncReadExt::read_to_string(&mut tokio::io::stdin(), &mut content)
            .await
            .context("Failed to read dialogs from stdin")?;
        content
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read dialogs from {}", path.display()))?
    };

    serde_json::from_str(&content).context("Invalid dialog stack")
}

impl Cli {
    /// Run the command; returns the process exit status
    pub async fn execute(self) -> Result<i32> {
        if self.debug {
            debug!("Debug logging enabled");
        }

        let config = Config::init(self.config.as_deref()).await?;
        debug!("Configuration initialized");

        let single = !matches!(self.command, Commands::Stack(_));
        let entries = self.command.entries().await?;
        if entries.is_empty() {
            anyhow::bail!("No dialogs to open");
        }

        let dialogs = Dialogs::with_defaults(DialogStore::new(), config.defaults.clone());
        let renderer = DialogRenderer::new(dialogs.clone());

        info!("Opening {} dialog(s)", entries.len());
        let pending: Vec<_> = entries
            .into_iter()
            .map(|entry| entry.open(&dialogs))
            .collect();
        let outcomes: Vec<Outcome> =
            tui::run(renderer, config.terminal.clone(), futures::future::join_all(pending)).await?;

        let json = match (single, outcomes.as_slice()) {
            (true, [outcome]) => serde_json::to_string_pretty(outcome)?,
            _ => serde_json::to_string_pretty(&outcomes)?,
        };
        println!("{}", json);

        let status = if outcomes.iter().all(Outcome::is_resolved) {
            0
        } else {
            1
        };
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_option() {
        let option = parse_option("eu=Europe").unwrap();
        assert_eq!(option.value, "eu");
        assert_eq!(option.label, Content::from("Europe"));

        let option = parse_option("plain").unwrap();
        assert_eq!(option.label, Content::from("plain"));

        assert!(parse_option("=Label").is_err());
    }

    #[tokio::test]
    async fn test_choose_command_builds_entry() {
        let cli = Cli::try_parse_from([
            "action-dialogs",
            "choose",
            "Region",
            "Where?",
            "-o",
            "eu=Europe",
            "-o",
            "us",
            "--disabled",
            "us",
            "--value",
            "eu",
        ])
        .unwrap();

        let entries = cli.command.entries().await.unwrap();
        match &entries[..] {
            [DialogEntry::ChoiceSingle { options, value, .. }] => {
                assert_eq!(options.len(), 2);
                assert!(!options[0].disabled);
                assert!(options[1].disabled);
                assert_eq!(value.as_deref(), Some("eu"));
            }
            other => panic!("unexpected entries {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_modal_flags() {
        let cli = Cli::try_parse_from([
            "action-dialogs",
            "--debug",
            "modal",
            "Title",
            "Body",
            "--size",
            "lg",
            "--no-close-button",
            "--lock",
        ])
        .unwrap();
        assert!(cli.debug);

        let entries = cli.command.entries().await.unwrap();
        assert_eq!(
            entries,
            vec![DialogEntry::Modal {
                title: "Title".into(),
                message: "Body".into(),
                size: Some(ModalSize::Lg),
                show_close_button: Some(false),
                disable_backdrop_click: true,
            }]
        );
    }

    #[test]
    fn test_choose_requires_options() {
        assert!(Cli::try_parse_from(["action-dialogs", "choose", "T", "M"]).is_err());
    }

    #[tokio::test]
    async fn test_stack_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"kind": "alert", "message": "one"}}, {{"kind": "prompt", "message": "two", "required": true}}]"#
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "action-dialogs".to_string(),
            "stack".to_string(),
            file.path().display().to_string(),
        ])
        .unwrap();

        let entries = cli.command.entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(matches!(entries[1], DialogEntry::Prompt { required: true, .. }));
    }
}
